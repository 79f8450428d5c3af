//! On-disk cache of the roster.
//!
//! The mirror is a best-effort copy of the store: one JSON file under a fixed
//! name in the data directory. The backend stays the source of truth.

use std::fs;
use std::io;
use std::path::PathBuf;

use crate::error::MirrorError;
use crate::models::Attendee;
use crate::store::AttendeeStore;

pub const MIRROR_FILENAME: &str = "eventAttendees.json";

#[derive(Debug, Clone)]
pub struct LocalMirror {
    data_dir: PathBuf,
}

impl LocalMirror {
    pub fn new(data_dir: PathBuf) -> Self {
        Self { data_dir }
    }

    pub fn path(&self) -> PathBuf {
        self.data_dir.join(MIRROR_FILENAME)
    }

    pub fn exists(&self) -> bool {
        self.path().exists()
    }

    /// Overwrites the cache with `attendees`.
    ///
    /// Creates the data directory if it doesn't exist.
    pub fn save(&self, attendees: &[Attendee]) -> Result<(), MirrorError> {
        fs::create_dir_all(&self.data_dir)
            .map_err(|e| MirrorError::Io(self.data_dir.clone(), e))?;

        let path = self.path();
        let json = serde_json::to_vec(attendees).map_err(MirrorError::Serialize)?;
        fs::write(&path, json).map_err(|e| MirrorError::Io(path, e))?;

        tracing::debug!("Mirrored {} attendee(s) to {}", attendees.len(), self.path().display());
        Ok(())
    }

    /// Saves the store's current contents.
    pub fn save_store(&self, store: &AttendeeStore) -> Result<(), MirrorError> {
        self.save(&store.attendees())
    }

    /// Loads the cached roster.
    ///
    /// Returns `Ok(None)` if nothing has been cached yet.
    pub fn load(&self) -> Result<Option<Vec<Attendee>>, MirrorError> {
        let path = self.path();

        match fs::read(&path) {
            Ok(bytes) => {
                let attendees =
                    serde_json::from_slice(&bytes).map_err(|e| MirrorError::Parse(path, e))?;
                Ok(Some(attendees))
            }
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(MirrorError::Io(path, e)),
        }
    }

    /// Replaces the store with the cached roster.
    ///
    /// Returns true if the store was replaced. A missing or unreadable cache
    /// leaves the store untouched; read failures are logged, not returned.
    pub fn restore(&self, store: &AttendeeStore) -> bool {
        match self.load() {
            Ok(Some(attendees)) => {
                store.replace_all(attendees);
                true
            }
            Ok(None) => false,
            Err(e) => {
                tracing::error!("Error loading attendees from storage: {}", e);
                false
            }
        }
    }
}
