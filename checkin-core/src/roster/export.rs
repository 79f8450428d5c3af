use chrono::{NaiveDate, NaiveDateTime};
use serde::Serialize;

use crate::error::ExportError;
use crate::models::Attendee;

/// Flattened CSV shape of an attendee. Column names line up with the
/// importer's so an export can be re-imported as is.
#[derive(Debug, Serialize)]
pub struct ExportRow<'a> {
    #[serde(rename = "Id")]
    pub id: Option<i64>,
    #[serde(rename = "Name")]
    pub name: &'a str,
    #[serde(rename = "Email")]
    pub email: &'a str,
    #[serde(rename = "Phone")]
    pub phone: &'a str,
    #[serde(rename = "Role")]
    pub role: &'a str,
    #[serde(rename = "UniqueId")]
    pub unique_id: &'a str,
    #[serde(rename = "QrCode")]
    pub qr_code: &'a str,
    #[serde(rename = "CheckedIn")]
    pub is_checked_in: bool,
    #[serde(rename = "KitCollected")]
    pub has_collected_kit: bool,
    #[serde(rename = "LunchCollected")]
    pub has_collected_lunch: bool,
    #[serde(rename = "RegistrationTime")]
    pub registration_time: Option<NaiveDateTime>,
    #[serde(rename = "KitCollectionTime")]
    pub kit_collection_time: Option<NaiveDateTime>,
    #[serde(rename = "LunchCollectionTime")]
    pub lunch_collection_time: Option<NaiveDateTime>,
}

impl<'a> From<&'a Attendee> for ExportRow<'a> {
    fn from(a: &'a Attendee) -> Self {
        Self {
            id: a.id,
            name: &a.name,
            email: &a.email,
            phone: &a.phone,
            role: &a.role,
            unique_id: &a.unique_id,
            qr_code: &a.qr_code,
            is_checked_in: a.is_checked_in,
            has_collected_kit: a.has_collected_kit,
            has_collected_lunch: a.has_collected_lunch,
            registration_time: a.registration_time,
            kit_collection_time: a.kit_collection_time,
            lunch_collection_time: a.lunch_collection_time,
        }
    }
}

/// Serializes attendees to CSV text with a header row.
pub fn to_csv(attendees: &[Attendee]) -> Result<String, ExportError> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    for attendee in attendees {
        writer.serialize(ExportRow::from(attendee))?;
    }
    let bytes = writer
        .into_inner()
        .map_err(|e| csv::Error::from(e.into_error()))?;
    Ok(String::from_utf8(bytes)?)
}

/// `event-attendees-<YYYY-MM-DD>.csv`
pub fn export_filename(date: NaiveDate) -> String {
    format!("event-attendees-{}.csv", date.format("%Y-%m-%d"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::roster::parse_roster;

    fn attendees() -> Vec<Attendee> {
        let mut ada = Attendee::new("Ada, Countess of Lovelace", "u-1")
            .with_email("ada@example.com")
            .with_phone("+44 20 7946 0000")
            .with_role("Speaker");
        ada.id = Some(1);
        ada.is_checked_in = true;
        ada.registration_time = NaiveDate::from_ymd_opt(2025, 3, 1)
            .unwrap()
            .and_hms_opt(8, 30, 0);

        let bob = Attendee::new("Bob \"The Builder\"", "u-2");
        vec![ada, bob]
    }

    #[test]
    fn test_export_filename() {
        let date = NaiveDate::from_ymd_opt(2025, 3, 1).unwrap();
        assert_eq!(export_filename(date), "event-attendees-2025-03-01.csv");
    }

    #[test]
    fn test_header_row() {
        let csv = to_csv(&attendees()).unwrap();
        let header = csv.lines().next().unwrap();
        assert_eq!(
            header,
            "Id,Name,Email,Phone,Role,UniqueId,QrCode,CheckedIn,KitCollected,LunchCollected,\
             RegistrationTime,KitCollectionTime,LunchCollectionTime"
        );
    }

    #[test]
    fn test_row_values() {
        let csv = to_csv(&attendees()).unwrap();
        let mut reader = csv::Reader::from_reader(csv.as_bytes());
        let records: Vec<csv::StringRecord> = reader.records().map(|r| r.unwrap()).collect();
        assert_eq!(records.len(), 2);
        assert_eq!(&records[0][0], "1");
        assert_eq!(&records[0][1], "Ada, Countess of Lovelace");
        assert_eq!(&records[0][7], "true");
        assert_eq!(&records[0][10], "2025-03-01T08:30:00");
        assert_eq!(&records[1][0], "");
        assert_eq!(&records[1][1], "Bob \"The Builder\"");
    }

    #[test]
    fn test_empty_roster_exports_nothing() {
        assert_eq!(to_csv(&[]).unwrap(), "");
    }

    #[test]
    fn test_export_then_reimport_preserves_identity() {
        let original = attendees();
        let csv = to_csv(&original).unwrap();

        let reimported: Vec<Attendee> = parse_roster(csv.as_bytes())
            .unwrap()
            .into_iter()
            .map(|row| row.into_attendee())
            .collect();

        assert_eq!(reimported.len(), original.len());
        for (before, after) in original.iter().zip(&reimported) {
            assert_eq!(before.name, after.name);
            assert_eq!(before.email, after.email);
            assert_eq!(before.phone, after.phone);
            assert_eq!(before.role, after.role);
            assert_eq!(before.unique_id, after.unique_id);
            assert!(after.id.is_none());
            assert!(!after.is_checked_in);
        }
    }
}
