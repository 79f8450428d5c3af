use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

use super::status_kind::StatusField;

/// Per-day status record owned by the backend, keyed by `(attendee_id, event_date)`.
///
/// Listing endpoints join the attendee's contact fields onto each record,
/// so those come back as optional extras.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AttendeeEvent {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    pub attendee_id: i64,
    pub event_date: NaiveDate,
    #[serde(default)]
    pub is_checked_in: bool,
    #[serde(default)]
    pub has_collected_kit: bool,
    #[serde(default)]
    pub has_collected_lunch: bool,
    #[serde(default)]
    pub registration_time: Option<NaiveDateTime>,
    #[serde(default)]
    pub kit_collection_time: Option<NaiveDateTime>,
    #[serde(default)]
    pub lunch_collection_time: Option<NaiveDateTime>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unique_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

impl AttendeeEvent {
    pub fn new(attendee_id: i64, event_date: NaiveDate) -> Self {
        Self {
            id: None,
            attendee_id,
            event_date,
            is_checked_in: false,
            has_collected_kit: false,
            has_collected_lunch: false,
            registration_time: None,
            kit_collection_time: None,
            lunch_collection_time: None,
            unique_id: None,
            name: None,
        }
    }
}

/// Body of `POST /attendee_events/`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct NewAttendeeEvent {
    pub attendee_id: i64,
    pub event_date: NaiveDate,
}

/// Body of `POST /attendee_events/update`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct StatusUpdate {
    pub unique_id: String,
    pub event_date: NaiveDate,
    pub field: StatusField,
    pub value: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct StatusUpdateResponse {
    #[serde(default)]
    pub success: bool,
}
