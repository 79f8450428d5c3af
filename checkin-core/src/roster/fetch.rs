use std::collections::HashMap;

use chrono::NaiveDate;

use crate::client::{BackendClient, EventQuery};
use crate::error::ClientError;
use crate::models::{Attendee, AttendeeEvent, AttendeeRecord};
use crate::store::AttendeeStore;

/// Loads the roster from the backend into the store.
pub struct RosterFetcher<'a> {
    client: &'a BackendClient,
    store: &'a AttendeeStore,
}

impl<'a> RosterFetcher<'a> {
    pub fn new(client: &'a BackendClient, store: &'a AttendeeStore) -> Self {
        Self { client, store }
    }

    /// Replaces the store with the backend's roster and returns its size.
    ///
    /// Without a date every status is reported false: that view is the
    /// roster only. With a date each attendee carries that day's record, or
    /// defaults when there is none. On any error the store is left as is.
    pub async fn fetch(&self, event_date: Option<NaiveDate>) -> Result<usize, ClientError> {
        let records = self.client.list_attendees().await?;

        let attendees: Vec<Attendee> = match event_date {
            None => records.into_iter().map(Attendee::from_record).collect(),
            Some(date) => {
                let events = self
                    .client
                    .list_attendee_events(&EventQuery::for_date(date))
                    .await?;
                merge_day(records, events)
            }
        };

        let count = attendees.len();
        self.store.replace_all(attendees);
        tracing::info!(count, event_date = ?event_date, "Roster fetched");
        Ok(count)
    }
}

fn merge_day(records: Vec<AttendeeRecord>, events: Vec<AttendeeEvent>) -> Vec<Attendee> {
    let by_attendee: HashMap<i64, AttendeeEvent> =
        events.into_iter().map(|e| (e.attendee_id, e)).collect();

    records
        .into_iter()
        .map(|record| {
            let day = record.id.and_then(|id| by_attendee.get(&id));
            Attendee::from_record_for_day(record, day)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 3, 1).unwrap()
    }

    fn attendee_json(id: i64, name: &str, checked_in: bool) -> serde_json::Value {
        json!({
            "id": id, "name": name, "email": "", "phone": "", "role": "Attendee",
            "unique_id": format!("u-{}", id), "qr_code": "",
            "is_checked_in": checked_in, "has_collected_kit": checked_in,
            "has_collected_lunch": checked_in,
            "registration_time": null, "kit_collection_time": null, "lunch_collection_time": null
        })
    }

    async fn roster_server() -> MockServer {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/attendees/"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([
                attendee_json(1, "Ada", true),
                attendee_json(2, "Bob", true),
            ])))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/attendee_events"))
            .and(query_param("event_date", "2025-03-01"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([{
                "id": 10, "attendee_id": 1, "event_date": "2025-03-01",
                "is_checked_in": true, "has_collected_kit": false, "has_collected_lunch": true,
                "registration_time": "2025-03-01T08:30:00", "kit_collection_time": null,
                "lunch_collection_time": "2025-03-01T12:05:00",
                "name": "Ada", "unique_id": "u-1"
            }])))
            .mount(&server)
            .await;
        server
    }

    #[tokio::test]
    async fn test_fetch_without_date_clears_status() {
        let server = roster_server().await;
        let client = BackendClient::new(server.uri());
        let store = AttendeeStore::new();

        let count = RosterFetcher::new(&client, &store).fetch(None).await.unwrap();

        assert_eq!(count, 2);
        for attendee in store.attendees().iter() {
            assert!(!attendee.is_checked_in);
            assert!(!attendee.has_collected_kit);
            assert!(!attendee.has_collected_lunch);
            assert!(attendee.registration_time.is_none());
        }
        assert_eq!(store.stats().checked_in, 0);
    }

    #[tokio::test]
    async fn test_fetch_with_date_merges_day_records() {
        let server = roster_server().await;
        let client = BackendClient::new(server.uri());
        let store = AttendeeStore::new();

        RosterFetcher::new(&client, &store)
            .fetch(Some(date()))
            .await
            .unwrap();

        let ada = store.find("u-1").unwrap();
        assert!(ada.is_checked_in);
        assert!(!ada.has_collected_kit);
        assert!(ada.has_collected_lunch);
        assert_eq!(
            ada.registration_time,
            Some(date().and_hms_opt(8, 30, 0).unwrap())
        );
        assert!(ada.kit_collection_time.is_none());
        assert_eq!(
            ada.lunch_collection_time,
            Some(date().and_hms_opt(12, 5, 0).unwrap())
        );

        let bob = store.find("u-2").unwrap();
        assert!(!bob.is_checked_in);
        assert!(!bob.has_collected_kit);
        assert!(!bob.has_collected_lunch);
        assert!(bob.registration_time.is_none());

        assert_eq!(store.stats().checked_in, 1);
        assert_eq!(store.stats().lunch_distributed, 1);
    }

    #[tokio::test]
    async fn test_failed_day_fetch_leaves_store_untouched() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/attendees/"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([attendee_json(1, "Ada", false)])))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/attendee_events"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;

        let client = BackendClient::new(server.uri());
        let store = AttendeeStore::new();
        store.replace_all(vec![Attendee::new("Cached", "c")]);

        let result = RosterFetcher::new(&client, &store).fetch(Some(date())).await;

        assert!(result.is_err());
        assert_eq!(store.len(), 1);
        assert_eq!(store.attendees()[0].name, "Cached");
    }

    #[test]
    fn test_merge_ignores_records_without_id() {
        let record: AttendeeRecord = serde_json::from_value(attendee_json(1, "Ada", false)).unwrap();
        let mut unsaved = record.clone();
        unsaved.id = None;

        let mut day = AttendeeEvent::new(1, date());
        day.has_collected_kit = true;

        let merged = merge_day(vec![record, unsaved], vec![day]);
        assert!(merged[0].has_collected_kit);
        assert!(!merged[1].has_collected_kit);
    }
}
