mod attendee;
mod attendee_event;
mod stats;
mod status_kind;

pub use attendee::{Attendee, AttendeeRecord, DEFAULT_ROLE, ROLE_ORGANIZER, ROLE_SPEAKER};
pub use attendee_event::{AttendeeEvent, NewAttendeeEvent, StatusUpdate, StatusUpdateResponse};
pub use stats::EventStats;
pub use status_kind::{StatusField, StatusKind};
