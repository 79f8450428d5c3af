//! Per-day status updates (check-in, kit, lunch).
//!
//! Each update resolves the attendee's backend id from their unique id,
//! makes sure a record exists for that day, then flips one flag. Creating
//! the day record twice is prevented by the backend's uniqueness constraint
//! on `(attendee_id, event_date)`; a rejected create is tolerated here.

use chrono::NaiveDate;

use crate::client::{BackendClient, EventQuery};
use crate::error::{ClientError, StatusError};
use crate::models::{NewAttendeeEvent, StatusField, StatusKind, StatusUpdate};
use crate::outcome::Outcome;

const UPDATE_FAILED: &str = "Failed to update attendee event";

pub struct StatusUpdater<'a> {
    client: &'a BackendClient,
}

impl<'a> StatusUpdater<'a> {
    pub fn new(client: &'a BackendClient) -> Self {
        Self { client }
    }

    pub async fn check_in(&self, unique_id: &str, event_date: NaiveDate) -> Outcome {
        self.apply(unique_id, event_date, StatusKind::CheckIn).await
    }

    pub async fn collect_kit(&self, unique_id: &str, event_date: NaiveDate) -> Outcome {
        self.apply(unique_id, event_date, StatusKind::Kit).await
    }

    pub async fn collect_lunch(&self, unique_id: &str, event_date: NaiveDate) -> Outcome {
        self.apply(unique_id, event_date, StatusKind::Lunch).await
    }

    /// Runs one status update and reports it as an outcome.
    pub async fn apply(&self, unique_id: &str, event_date: NaiveDate, kind: StatusKind) -> Outcome {
        tracing::debug!(unique_id, %event_date, %kind, "Updating attendee status");
        match self.try_apply(unique_id, event_date, kind).await {
            Ok(()) => {
                tracing::info!(unique_id, %event_date, %kind, "Status updated");
                Outcome::success(kind.success_message())
            }
            Err(e) => {
                tracing::warn!(unique_id, %event_date, %kind, "Status update failed: {}", e);
                Outcome::failure(e.to_string())
            }
        }
    }

    async fn try_apply(
        &self,
        unique_id: &str,
        event_date: NaiveDate,
        kind: StatusKind,
    ) -> Result<(), StatusError> {
        let attendee_id = self.resolve_attendee_id(unique_id).await?;
        self.ensure_attendee_event(attendee_id, event_date).await?;

        self.client
            .mark_status(attendee_id, event_date, kind)
            .await
            .map_err(|e| match e {
                ClientError::Rejected { detail, .. } => {
                    StatusError::UpdateRejected(detail.unwrap_or_else(|| UPDATE_FAILED.to_string()))
                }
                other => StatusError::Client(other),
            })
    }

    /// Looks up the backend id for `unique_id` by scanning the full roster.
    ///
    /// A rejected roster request is reported as "not found".
    pub async fn resolve_attendee_id(&self, unique_id: &str) -> Result<i64, StatusError> {
        let attendees = match self.client.list_attendees().await {
            Ok(attendees) => attendees,
            Err(ClientError::Rejected { status, .. }) => {
                tracing::warn!(status, "Roster request rejected while resolving attendee");
                return Err(StatusError::AttendeeNotFound);
            }
            Err(e) => return Err(e.into()),
        };

        match attendees.iter().find(|a| a.unique_id == unique_id) {
            Some(record) => record.id.ok_or(StatusError::AttendeeNotFound),
            None => {
                tracing::warn!(
                    unique_id,
                    available = attendees.len(),
                    "No attendee with this unique id"
                );
                Err(StatusError::AttendeeNotFound)
            }
        }
    }

    /// Makes sure a day record exists for `(attendee_id, event_date)`.
    pub async fn ensure_attendee_event(
        &self,
        attendee_id: i64,
        event_date: NaiveDate,
    ) -> Result<(), StatusError> {
        let query = EventQuery::for_attendee_day(attendee_id, event_date);
        match self.client.list_attendee_events(&query).await {
            Ok(events) if !events.is_empty() => return Ok(()),
            Ok(_) => {}
            Err(ClientError::Rejected { status, .. }) => {
                tracing::debug!(status, "Day record lookup rejected, creating instead");
            }
            Err(e) => return Err(e.into()),
        }

        let new_event = NewAttendeeEvent {
            attendee_id,
            event_date,
        };
        match self.client.create_attendee_event(&new_event).await {
            Ok(()) => Ok(()),
            Err(e @ ClientError::Rejected { .. }) => {
                tracing::warn!(attendee_id, %event_date, "Day record creation rejected: {}", e);
                Ok(())
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Sets one flag through the backend's generic update endpoint.
    pub async fn set_status(
        &self,
        unique_id: &str,
        event_date: NaiveDate,
        field: StatusField,
        value: bool,
    ) -> Outcome {
        let update = StatusUpdate {
            unique_id: unique_id.to_string(),
            event_date,
            field,
            value,
        };

        match self.client.update_status(&update).await {
            Ok(true) => Outcome::success(format!("Set {} to {}", field, value)),
            Ok(false) => Outcome::failure("Failed to update status"),
            Err(e) => {
                tracing::error!(unique_id, %event_date, %field, "Error updating attendee status: {}", e);
                Outcome::failure(format!("Failed to update status: {}", e))
            }
        }
    }
}
