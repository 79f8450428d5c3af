use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

use super::attendee_event::AttendeeEvent;

pub const DEFAULT_ROLE: &str = "Attendee";
pub const ROLE_SPEAKER: &str = "Speaker";
pub const ROLE_ORGANIZER: &str = "Organizer";

/// An attendee as held by the roster store and the local cache.
///
/// `unique_id` is assigned once on import and never changes; it is what the
/// QR badge encodes. `id` only exists after the backend accepted the record.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Attendee {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub role: String,
    pub unique_id: String,
    /// PNG data URI, empty when no QR could be generated
    #[serde(default)]
    pub qr_code: String,
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
}

impl Attendee {
    pub fn new(name: impl Into<String>, unique_id: impl Into<String>) -> Self {
        Self {
            id: None,
            name: name.into(),
            email: String::new(),
            phone: String::new(),
            role: DEFAULT_ROLE.to_string(),
            unique_id: unique_id.into(),
            qr_code: String::new(),
            is_checked_in: false,
            has_collected_kit: false,
            has_collected_lunch: false,
            registration_time: None,
            kit_collection_time: None,
            lunch_collection_time: None,
        }
    }

    /// New attendee with a freshly generated unique id.
    pub fn with_generated_id(name: impl Into<String>) -> Self {
        Self::new(name, Uuid::new_v4().to_string())
    }

    pub fn with_email(mut self, email: impl Into<String>) -> Self {
        self.email = email.into();
        self
    }

    pub fn with_phone(mut self, phone: impl Into<String>) -> Self {
        self.phone = phone.into();
        self
    }

    pub fn with_role(mut self, role: impl Into<String>) -> Self {
        self.role = role.into();
        self
    }

    pub fn with_qr_code(mut self, qr_code: impl Into<String>) -> Self {
        self.qr_code = qr_code.into();
        self
    }

    pub fn has_qr_code(&self) -> bool {
        !self.qr_code.is_empty()
    }

    /// Roster-only view of a backend record: all day status cleared.
    pub fn from_record(record: AttendeeRecord) -> Self {
        Self {
            id: record.id,
            name: record.name,
            email: record.email,
            phone: record.phone,
            role: record.role,
            unique_id: record.unique_id,
            qr_code: record.qr_code,
            is_checked_in: false,
            has_collected_kit: false,
            has_collected_lunch: false,
            registration_time: None,
            kit_collection_time: None,
            lunch_collection_time: None,
        }
    }

    /// Backend record merged with that attendee's record for one day.
    ///
    /// Without a day record every status is false and every timestamp absent.
    pub fn from_record_for_day(record: AttendeeRecord, day: Option<&AttendeeEvent>) -> Self {
        let mut attendee = Self::from_record(record);
        if let Some(day) = day {
            attendee.is_checked_in = day.is_checked_in;
            attendee.has_collected_kit = day.has_collected_kit;
            attendee.has_collected_lunch = day.has_collected_lunch;
            attendee.registration_time = day.registration_time;
            attendee.kit_collection_time = day.kit_collection_time;
            attendee.lunch_collection_time = day.lunch_collection_time;
        }
        attendee
    }
}

impl fmt::Display for Attendee {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", self.name)?;
        writeln!(f, "{}", "=".repeat(self.name.chars().count()))?;
        if let Some(id) = self.id {
            writeln!(f, "ID: {}", id)?;
        }
        writeln!(f, "Unique ID: {}", self.unique_id)?;
        writeln!(f, "Role: {}", self.role)?;
        if !self.email.is_empty() {
            writeln!(f, "Email: {}", self.email)?;
        }
        if !self.phone.is_empty() {
            writeln!(f, "Phone: {}", self.phone)?;
        }
        writeln!(f, "QR code: {}", if self.has_qr_code() { "yes" } else { "no" })?;
        writeln!(f, "Checked in: {}", yes_no(self.is_checked_in, self.registration_time))?;
        writeln!(f, "Kit collected: {}", yes_no(self.has_collected_kit, self.kit_collection_time))?;
        write!(f, "Lunch collected: {}", yes_no(self.has_collected_lunch, self.lunch_collection_time))
    }
}

fn yes_no(flag: bool, at: Option<NaiveDateTime>) -> String {
    match (flag, at) {
        (true, Some(at)) => format!("yes ({})", at.format("%Y-%m-%d %H:%M")),
        (true, None) => "yes".to_string(),
        (false, _) => "no".to_string(),
    }
}

/// Attendee as the backend sends and accepts it.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AttendeeRecord {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub role: String,
    pub unique_id: String,
    #[serde(default)]
    pub qr_code: String,
    #[serde(default)]
    pub is_checked_in: bool,
    #[serde(default)]
    pub has_collected_kit: bool,
    #[serde(default)]
    pub has_collected_lunch: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub registration_time: Option<NaiveDateTime>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub kit_collection_time: Option<NaiveDateTime>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lunch_collection_time: Option<NaiveDateTime>,
}

impl AttendeeRecord {
    /// Creation payload for a freshly imported attendee.
    ///
    /// Status flags always go out false: day status lives in per-day records.
    pub fn for_creation(attendee: &Attendee) -> Self {
        Self {
            id: None,
            name: attendee.name.clone(),
            email: attendee.email.clone(),
            phone: attendee.phone.clone(),
            role: attendee.role.clone(),
            unique_id: attendee.unique_id.clone(),
            qr_code: attendee.qr_code.clone(),
            is_checked_in: false,
            has_collected_kit: false,
            has_collected_lunch: false,
            registration_time: None,
            kit_collection_time: None,
            lunch_collection_time: None,
        }
    }
}
