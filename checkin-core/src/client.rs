//! HTTP client for the attendee backend.
//!
//! One method per endpoint. Non-success responses become
//! [`ClientError::Rejected`] carrying the backend's `detail` message when the
//! error body has one.

use std::time::Duration;

use chrono::NaiveDate;
use reqwest::{Client, Response, StatusCode};
use serde::de::DeserializeOwned;

use crate::error::ClientError;
use crate::models::{
    AttendeeEvent, AttendeeRecord, NewAttendeeEvent, StatusKind, StatusUpdate,
    StatusUpdateResponse,
};

pub const DEFAULT_BACKEND_URL: &str = "http://localhost:8000";

/// Filter for `GET /attendee_events`. Unset fields are left out of the query.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EventQuery {
    pub event_date: Option<NaiveDate>,
    pub attendee_id: Option<i64>,
    pub unique_id: Option<String>,
}

impl EventQuery {
    pub fn for_date(event_date: NaiveDate) -> Self {
        Self {
            event_date: Some(event_date),
            ..Self::default()
        }
    }

    pub fn for_attendee_day(attendee_id: i64, event_date: NaiveDate) -> Self {
        Self {
            event_date: Some(event_date),
            attendee_id: Some(attendee_id),
            unique_id: None,
        }
    }

    pub fn for_unique_id_day(unique_id: impl Into<String>, event_date: NaiveDate) -> Self {
        Self {
            event_date: Some(event_date),
            attendee_id: None,
            unique_id: Some(unique_id.into()),
        }
    }

    fn params(&self) -> Vec<(&'static str, String)> {
        let mut params = Vec::new();
        if let Some(date) = self.event_date {
            params.push(("event_date", date.to_string()));
        }
        if let Some(id) = self.attendee_id {
            params.push(("attendee_id", id.to_string()));
        }
        if let Some(uuid) = &self.unique_id {
            params.push(("uuid", uuid.clone()));
        }
        params
    }
}

/// Client for the attendee backend.
#[derive(Debug, Clone)]
pub struct BackendClient {
    client: Client,
    base_url: String,
}

impl BackendClient {
    /// Creates a client with reqwest's default settings.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            base_url: normalize_base_url(base_url.into()),
        }
    }

    /// Creates a client whose requests fail after `timeout`.
    pub fn with_timeout(base_url: impl Into<String>, timeout: Duration) -> Result<Self, ClientError> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| ClientError::RequestFailed(e.to_string()))?;

        Ok(Self {
            client,
            base_url: normalize_base_url(base_url.into()),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// `POST /attendees/`
    pub async fn create_attendee(&self, record: &AttendeeRecord) -> Result<(), ClientError> {
        tracing::debug!(unique_id = %record.unique_id, "Creating attendee");
        let response = self
            .client
            .post(self.url("/attendees/"))
            .json(record)
            .send()
            .await?;
        check(response).await.map(|_| ())
    }

    /// `GET /attendees/`
    pub async fn list_attendees(&self) -> Result<Vec<AttendeeRecord>, ClientError> {
        let response = self.client.get(self.url("/attendees/")).send().await?;
        let attendees: Vec<AttendeeRecord> = parse_json(check(response).await?).await?;
        tracing::debug!("Fetched {} attendee(s)", attendees.len());
        Ok(attendees)
    }

    /// `GET /attendees/{uuid}`. A 404 means no such attendee.
    pub async fn get_attendee(&self, unique_id: &str) -> Result<Option<AttendeeRecord>, ClientError> {
        let path = format!("/attendees/{}", urlencoding::encode(unique_id));
        let response = self.client.get(self.url(&path)).send().await?;
        if response.status() == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        parse_json(check(response).await?).await.map(Some)
    }

    /// `DELETE /attendees/{unique_id}`
    pub async fn delete_attendee(&self, unique_id: &str) -> Result<(), ClientError> {
        let path = format!("/attendees/{}", urlencoding::encode(unique_id));
        let response = self.client.delete(self.url(&path)).send().await?;
        check(response).await.map(|_| ())
    }

    /// `GET /attendee_events`
    pub async fn list_attendee_events(
        &self,
        query: &EventQuery,
    ) -> Result<Vec<AttendeeEvent>, ClientError> {
        let response = self
            .client
            .get(self.url("/attendee_events"))
            .query(&query.params())
            .send()
            .await?;
        let events: Vec<AttendeeEvent> = parse_json(check(response).await?).await?;
        tracing::debug!(?query, "Fetched {} day record(s)", events.len());
        Ok(events)
    }

    /// One attendee's day record, looked up by unique id.
    ///
    /// The backend may return more than it was asked for; the first record
    /// whose `unique_id` matches wins.
    pub async fn get_attendee_event(
        &self,
        unique_id: &str,
        event_date: NaiveDate,
    ) -> Result<Option<AttendeeEvent>, ClientError> {
        let events = self
            .list_attendee_events(&EventQuery::for_unique_id_day(unique_id, event_date))
            .await?;
        Ok(events
            .into_iter()
            .find(|e| e.unique_id.as_deref() == Some(unique_id)))
    }

    /// `POST /attendee_events/`
    pub async fn create_attendee_event(&self, event: &NewAttendeeEvent) -> Result<(), ClientError> {
        tracing::debug!(
            attendee_id = event.attendee_id,
            event_date = %event.event_date,
            "Creating day record"
        );
        let response = self
            .client
            .post(self.url("/attendee_events/"))
            .json(event)
            .send()
            .await?;
        check(response).await.map(|_| ())
    }

    /// `PUT /attendee_events/{attendee_id}/{event_date}/{checkin|kit|lunch}`
    pub async fn mark_status(
        &self,
        attendee_id: i64,
        event_date: NaiveDate,
        kind: StatusKind,
    ) -> Result<(), ClientError> {
        let path = format!(
            "/attendee_events/{}/{}/{}",
            attendee_id,
            event_date,
            kind.endpoint()
        );
        let response = self.client.put(self.url(&path)).send().await?;
        check(response).await.map(|_| ())
    }

    /// `POST /attendee_events/update`. Returns the backend's `success` flag.
    pub async fn update_status(&self, update: &StatusUpdate) -> Result<bool, ClientError> {
        let response = self
            .client
            .post(self.url("/attendee_events/update"))
            .json(update)
            .send()
            .await?;
        let body: StatusUpdateResponse = parse_json(check(response).await?).await?;
        Ok(body.success)
    }
}

fn normalize_base_url(url: String) -> String {
    let trimmed = url.trim().trim_end_matches('/');
    if trimmed.starts_with("http://") || trimmed.starts_with("https://") {
        trimmed.to_string()
    } else {
        format!("http://{}", trimmed)
    }
}

/// Passes success responses through; turns anything else into `Rejected`.
async fn check(response: Response) -> Result<Response, ClientError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().await.unwrap_or_default();
    let detail = serde_json::from_str::<serde_json::Value>(&body)
        .ok()
        .and_then(|v| v.get("detail").and_then(|d| d.as_str()).map(str::to_string));

    tracing::debug!(status = status.as_u16(), ?detail, "Backend rejected request");
    Err(ClientError::Rejected {
        status: status.as_u16(),
        detail,
    })
}

async fn parse_json<T: DeserializeOwned>(response: Response) -> Result<T, ClientError> {
    response
        .json()
        .await
        .map_err(|e| ClientError::ResponseParseFailed(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{body_json, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 3, 1).unwrap()
    }

    fn attendee_json(id: i64, unique_id: &str) -> serde_json::Value {
        json!({
            "id": id, "name": "Ada", "email": "ada@example.com", "phone": "555",
            "role": "Speaker", "unique_id": unique_id, "qr_code": "",
            "is_checked_in": false, "has_collected_kit": false, "has_collected_lunch": false,
            "registration_time": null, "kit_collection_time": null, "lunch_collection_time": null
        })
    }

    #[test]
    fn test_normalize_base_url() {
        assert_eq!(
            normalize_base_url("http://localhost:8000/".into()),
            "http://localhost:8000"
        );
        assert_eq!(
            normalize_base_url("https://checkin.example.com".into()),
            "https://checkin.example.com"
        );
        assert_eq!(normalize_base_url("localhost:8000".into()), "http://localhost:8000");
    }

    #[test]
    fn test_event_query_params() {
        assert!(EventQuery::default().params().is_empty());
        assert_eq!(
            EventQuery::for_attendee_day(5, date()).params(),
            vec![
                ("event_date", "2025-03-01".to_string()),
                ("attendee_id", "5".to_string())
            ]
        );
        assert_eq!(
            EventQuery::for_unique_id_day("u-1", date()).params(),
            vec![
                ("event_date", "2025-03-01".to_string()),
                ("uuid", "u-1".to_string())
            ]
        );
    }

    #[tokio::test]
    async fn test_list_attendees() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/attendees/"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!([attendee_json(1, "a"), attendee_json(2, "b")])),
            )
            .mount(&server)
            .await;

        let client = BackendClient::new(server.uri());
        let attendees = client.list_attendees().await.unwrap();
        assert_eq!(attendees.len(), 2);
        assert_eq!(attendees[1].id, Some(2));
        assert_eq!(attendees[1].unique_id, "b");
    }

    #[tokio::test]
    async fn test_create_attendee_sends_snake_case_body() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/attendees/"))
            .and(body_json(json!({
                "name": "Ada", "email": "", "phone": "", "role": "Attendee",
                "unique_id": "u-1", "qr_code": "",
                "is_checked_in": false, "has_collected_kit": false, "has_collected_lunch": false
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
            .expect(1)
            .mount(&server)
            .await;

        let client = BackendClient::new(server.uri());
        let attendee = crate::models::Attendee::new("Ada", "u-1");
        client
            .create_attendee(&AttendeeRecord::for_creation(&attendee))
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_rejection_carries_detail() {
        let server = MockServer::start().await;
        Mock::given(method("PUT"))
            .and(path("/attendee_events/3/2025-03-01/kit"))
            .respond_with(
                ResponseTemplate::new(400)
                    .set_body_json(json!({"detail": "Attendee event not found or already collected kit"})),
            )
            .mount(&server)
            .await;

        let client = BackendClient::new(server.uri());
        let err = client
            .mark_status(3, date(), StatusKind::Kit)
            .await
            .unwrap_err();
        assert_eq!(err.status(), Some(400));
        assert_eq!(
            err.detail(),
            Some("Attendee event not found or already collected kit")
        );
    }

    #[tokio::test]
    async fn test_rejection_without_json_body() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/attendees/"))
            .respond_with(ResponseTemplate::new(502).set_body_string("Bad Gateway"))
            .mount(&server)
            .await;

        let client = BackendClient::new(server.uri());
        let err = client.list_attendees().await.unwrap_err();
        assert!(err.detail().is_none());
        assert_eq!(err.to_string(), "Backend returned status 502");
    }

    #[tokio::test]
    async fn test_get_attendee_not_found_is_none() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/attendees/missing"))
            .respond_with(ResponseTemplate::new(404).set_body_json(json!({"detail": "Not Found"})))
            .mount(&server)
            .await;

        let client = BackendClient::new(server.uri());
        assert!(client.get_attendee("missing").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_list_attendee_events_sends_query() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/attendee_events"))
            .and(query_param("event_date", "2025-03-01"))
            .and(query_param("attendee_id", "9"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([{
                "id": 1, "attendee_id": 9, "event_date": "2025-03-01",
                "is_checked_in": true, "has_collected_kit": false, "has_collected_lunch": false,
                "registration_time": "2025-03-01T08:00:00", "kit_collection_time": null,
                "lunch_collection_time": null
            }])))
            .mount(&server)
            .await;

        let client = BackendClient::new(server.uri());
        let events = client
            .list_attendee_events(&EventQuery::for_attendee_day(9, date()))
            .await
            .unwrap();
        assert_eq!(events.len(), 1);
        assert!(events[0].is_checked_in);
    }

    #[tokio::test]
    async fn test_get_attendee_event_matches_unique_id() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/attendee_events"))
            .and(query_param("event_date", "2025-03-01"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([
                {"attendee_id": 1, "event_date": "2025-03-01", "unique_id": "u-1",
                 "is_checked_in": true},
                {"attendee_id": 2, "event_date": "2025-03-01", "unique_id": "u-2",
                 "has_collected_kit": true}
            ])))
            .mount(&server)
            .await;

        let client = BackendClient::new(server.uri());
        let event = client.get_attendee_event("u-2", date()).await.unwrap().unwrap();
        assert_eq!(event.attendee_id, 2);
        assert!(event.has_collected_kit);
        assert!(!event.is_checked_in);

        // The backend returns the whole day; unknown ids are filtered out here.
        assert!(client.get_attendee_event("u-3", date()).await.unwrap().is_none());

        let requests = server.received_requests().await.unwrap();
        assert_eq!(requests.len(), 2);
        assert!(requests[1].url.query().unwrap().contains("uuid=u-3"));
    }

    #[tokio::test]
    async fn test_update_status_returns_success_flag() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/attendee_events/update"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"success": true})))
            .mount(&server)
            .await;

        let client = BackendClient::new(server.uri());
        let update = StatusUpdate {
            unique_id: "u-1".into(),
            event_date: date(),
            field: crate::models::StatusField::IsCheckedIn,
            value: true,
        };
        assert!(client.update_status(&update).await.unwrap());
    }

    #[tokio::test]
    async fn test_connection_refused_is_request_failed() {
        // Nothing listens on port 9 on test machines.
        let client = BackendClient::new("http://127.0.0.1:9");
        let err = client.list_attendees().await.unwrap_err();
        assert!(matches!(err, ClientError::RequestFailed(_)));
    }
}
