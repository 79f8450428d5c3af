//! Roster workflows: CSV import, backend fetch, CSV export.

mod export;
mod fetch;
mod import;

pub use export::{export_filename, to_csv, ExportRow};
pub use fetch::RosterFetcher;
pub use import::{parse_roster, RosterImporter, RosterRow};
