//! Checkin Core Library
//!
//! Models, backend client and roster workflows for the event check-in
//! admin tool. The binary crate wires these into CLI commands.

pub mod client;
pub mod error;
pub mod mirror;
pub mod models;
pub mod outcome;
pub mod qr;
pub mod roster;
pub mod status;
pub mod store;

pub use client::{BackendClient, EventQuery, DEFAULT_BACKEND_URL};
pub use error::{ClientError, ExportError, ImportError, MirrorError, QrError, StatusError};
pub use mirror::{LocalMirror, MIRROR_FILENAME};
pub use models::{
    Attendee, AttendeeEvent, AttendeeRecord, EventStats, NewAttendeeEvent, StatusField,
    StatusKind, StatusUpdate,
};
pub use outcome::Outcome;
pub use qr::{generate_qr_code, qr_payload, render_png};
pub use roster::{export_filename, parse_roster, to_csv, RosterFetcher, RosterImporter, RosterRow};
pub use status::StatusUpdater;
pub use store::{AttendeeStore, RosterSnapshot};

pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
