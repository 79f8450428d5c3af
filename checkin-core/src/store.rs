//! Observable in-memory roster.
//!
//! The store owns the attendee list. Every replacement recomputes the
//! derived [`EventStats`] and notifies subscribers through a watch channel.

use std::sync::Arc;

use tokio::sync::watch;

use crate::models::{Attendee, EventStats};

/// Immutable view of the roster at one point in time.
#[derive(Debug, Clone, Default)]
pub struct RosterSnapshot {
    pub attendees: Arc<Vec<Attendee>>,
    pub stats: EventStats,
}

impl RosterSnapshot {
    fn new(attendees: Vec<Attendee>) -> Self {
        let stats = EventStats::from_attendees(&attendees);
        Self {
            attendees: Arc::new(attendees),
            stats,
        }
    }
}

#[derive(Debug)]
pub struct AttendeeStore {
    tx: watch::Sender<RosterSnapshot>,
}

impl AttendeeStore {
    pub fn new() -> Self {
        let (tx, _rx) = watch::channel(RosterSnapshot::default());
        Self { tx }
    }

    /// Replaces the whole roster. Partial updates are not supported.
    pub fn replace_all(&self, attendees: Vec<Attendee>) {
        let snapshot = RosterSnapshot::new(attendees);
        tracing::debug!(
            total = snapshot.stats.total_attendees,
            checked_in = snapshot.stats.checked_in,
            "Roster replaced"
        );
        self.tx.send_replace(snapshot);
    }

    pub fn snapshot(&self) -> RosterSnapshot {
        self.tx.borrow().clone()
    }

    pub fn attendees(&self) -> Arc<Vec<Attendee>> {
        Arc::clone(&self.tx.borrow().attendees)
    }

    pub fn stats(&self) -> EventStats {
        self.tx.borrow().stats
    }

    pub fn len(&self) -> usize {
        self.tx.borrow().attendees.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn find(&self, unique_id: &str) -> Option<Attendee> {
        self.tx
            .borrow()
            .attendees
            .iter()
            .find(|a| a.unique_id == unique_id)
            .cloned()
    }

    /// Receiver that observes every subsequent replacement.
    pub fn subscribe(&self) -> watch::Receiver<RosterSnapshot> {
        self.tx.subscribe()
    }
}

impl Default for AttendeeStore {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn checked_in(name: &str, id: &str) -> Attendee {
        let mut attendee = Attendee::new(name, id);
        attendee.is_checked_in = true;
        attendee
    }

    #[test]
    fn test_new_store_is_empty() {
        let store = AttendeeStore::new();
        assert!(store.is_empty());
        assert_eq!(store.stats(), EventStats::default());
    }

    #[test]
    fn test_replace_all_recomputes_stats() {
        let store = AttendeeStore::new();
        store.replace_all(vec![
            checked_in("A", "a"),
            Attendee::new("B", "b").with_role("Speaker"),
        ]);
        assert_eq!(store.len(), 2);
        assert_eq!(store.stats().checked_in, 1);
        assert_eq!(store.stats().speaker_count, 1);

        store.replace_all(vec![Attendee::new("C", "c")]);
        assert_eq!(store.len(), 1);
        assert_eq!(store.stats().checked_in, 0);
        assert_eq!(store.stats().total_attendees, 1);
    }

    #[test]
    fn test_replace_all_keeps_given_order() {
        let store = AttendeeStore::new();
        store.replace_all(vec![Attendee::new("Z", "z"), Attendee::new("A", "a")]);
        let names: Vec<_> = store.attendees().iter().map(|a| a.name.clone()).collect();
        assert_eq!(names, vec!["Z", "A"]);
    }

    #[test]
    fn test_find_by_unique_id() {
        let store = AttendeeStore::new();
        store.replace_all(vec![Attendee::new("A", "a"), Attendee::new("B", "b")]);
        assert_eq!(store.find("b").unwrap().name, "B");
        assert!(store.find("nope").is_none());
    }

    #[test]
    fn test_subscriber_sees_replacement() {
        let store = AttendeeStore::new();
        let mut rx = store.subscribe();
        assert!(!rx.has_changed().unwrap());

        store.replace_all(vec![checked_in("A", "a")]);

        assert!(rx.has_changed().unwrap());
        let snapshot = rx.borrow_and_update().clone();
        assert_eq!(snapshot.attendees.len(), 1);
        assert_eq!(snapshot.stats.checked_in, 1);
        assert!(!rx.has_changed().unwrap());
    }

    #[test]
    fn test_snapshot_is_detached_from_later_replacements() {
        let store = AttendeeStore::new();
        store.replace_all(vec![Attendee::new("A", "a")]);
        let before = store.snapshot();
        store.replace_all(Vec::new());
        assert_eq!(before.attendees.len(), 1);
        assert!(store.is_empty());
    }
}
