//! CSV roster import.
//!
//! The whole file is parsed before anything is sent: a single malformed row
//! aborts the import. Rows are then submitted one by one and a rejected row
//! is skipped without stopping the others. The store ends up holding exactly
//! the rows the backend accepted, in file order.

use std::fs::File;
use std::io::Read;
use std::path::Path;

use futures::stream::{self, StreamExt};
use serde::Deserialize;

use crate::client::BackendClient;
use crate::error::{ClientError, ImportError};
use crate::mirror::LocalMirror;
use crate::models::{Attendee, AttendeeRecord, DEFAULT_ROLE};
use crate::outcome::Outcome;
use crate::qr::{generate_qr_code, qr_payload};
use crate::store::AttendeeStore;

/// One data row of a roster file. Column names are case-sensitive.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct RosterRow {
    #[serde(rename = "Name", default)]
    pub name: Option<String>,
    #[serde(rename = "Email", default)]
    pub email: Option<String>,
    #[serde(rename = "Phone", default)]
    pub phone: Option<String>,
    #[serde(rename = "Role", default)]
    pub role: Option<String>,
    /// Present in files produced by the exporter.
    #[serde(rename = "UniqueId", default)]
    pub unique_id: Option<String>,
}

impl RosterRow {
    /// Builds the attendee for this row, assigning its identity and badge.
    pub fn into_attendee(self) -> Attendee {
        let name = self.name.unwrap_or_default();
        let attendee = match non_empty(self.unique_id) {
            Some(unique_id) => Attendee::new(name, unique_id),
            None => Attendee::with_generated_id(name),
        };
        let qr_code = generate_qr_code(&qr_payload(&attendee.unique_id));

        attendee
            .with_email(self.email.unwrap_or_default())
            .with_phone(self.phone.unwrap_or_default())
            .with_role(non_empty(self.role).unwrap_or_else(|| DEFAULT_ROLE.to_string()))
            .with_qr_code(qr_code)
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}

/// Parses every row of a roster. Fails on the first malformed row.
pub fn parse_roster<R: Read>(reader: R) -> Result<Vec<RosterRow>, ImportError> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .from_reader(reader);

    let rows = reader
        .deserialize::<RosterRow>()
        .collect::<Result<Vec<_>, csv::Error>>()?;
    Ok(rows)
}

pub struct RosterImporter<'a> {
    client: &'a BackendClient,
    store: &'a AttendeeStore,
    mirror: &'a LocalMirror,
    concurrency: usize,
}

impl<'a> RosterImporter<'a> {
    /// Creates an importer that submits rows strictly one at a time.
    pub fn new(client: &'a BackendClient, store: &'a AttendeeStore, mirror: &'a LocalMirror) -> Self {
        Self {
            client,
            store,
            mirror,
            concurrency: 1,
        }
    }

    /// Allows up to `concurrency` creation requests in flight. Result order
    /// still follows the file.
    pub fn with_concurrency(mut self, concurrency: usize) -> Self {
        self.concurrency = concurrency.max(1);
        self
    }

    pub async fn import_file(&self, path: &Path) -> Outcome {
        match File::open(path) {
            Ok(file) => self.import(file).await,
            Err(e) => Outcome::failure(ImportError::Read(path.to_path_buf(), e).to_string()),
        }
    }

    pub async fn import<R: Read>(&self, reader: R) -> Outcome {
        let rows = match parse_roster(reader) {
            Ok(rows) => rows,
            Err(e) => {
                tracing::warn!("Roster import aborted: {}", e);
                return Outcome::failure(e.to_string());
            }
        };

        let attendees: Vec<Attendee> = rows.into_iter().map(RosterRow::into_attendee).collect();
        tracing::debug!(rows = attendees.len(), concurrency = self.concurrency, "Submitting roster");

        let (saved, failed) = self.submit_all(attendees).await;
        let imported = saved.len();

        self.store.replace_all(saved);
        if let Err(e) = self.mirror.save_store(self.store) {
            tracing::warn!("Failed to mirror imported roster: {}", e);
        }

        let mut message = format!("Imported {} attendees", imported);
        if failed > 0 {
            message.push_str(&format!(", {} failed to save to backend", failed));
        }
        tracing::info!(imported, failed, "Roster import finished");

        if failed == 0 {
            Outcome::success(message)
        } else {
            Outcome::failure(message)
        }
    }

    /// Returns the accepted attendees in input order and the rejection count.
    async fn submit_all(&self, attendees: Vec<Attendee>) -> (Vec<Attendee>, usize) {
        let client = self.client;
        let results: Vec<(Attendee, Result<(), ClientError>)> = stream::iter(attendees)
            .map(|attendee| async move {
                let result = client
                    .create_attendee(&AttendeeRecord::for_creation(&attendee))
                    .await;
                (attendee, result)
            })
            .buffered(self.concurrency)
            .collect()
            .await;

        let mut saved = Vec::with_capacity(results.len());
        let mut failed = 0;
        for (attendee, result) in results {
            match result {
                Ok(()) => saved.push(attendee),
                Err(e) => {
                    tracing::warn!(
                        unique_id = %attendee.unique_id,
                        name = %attendee.name,
                        "Failed to save attendee to backend: {}",
                        e
                    );
                    failed += 1;
                }
            }
        }
        (saved, failed)
    }
}
