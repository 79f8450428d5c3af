use serde::Serialize;
use std::fmt;

use super::attendee::{Attendee, DEFAULT_ROLE, ROLE_ORGANIZER, ROLE_SPEAKER};

/// Aggregate counts over a roster. Always derived, never stored.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct EventStats {
    pub total_attendees: usize,
    pub checked_in: usize,
    pub kits_distributed: usize,
    pub lunch_distributed: usize,
    pub attendee_count: usize,
    pub speaker_count: usize,
    pub organizer_count: usize,
}

impl EventStats {
    pub fn from_attendees(attendees: &[Attendee]) -> Self {
        Self {
            total_attendees: attendees.len(),
            checked_in: count(attendees, |a| a.is_checked_in),
            kits_distributed: count(attendees, |a| a.has_collected_kit),
            lunch_distributed: count(attendees, |a| a.has_collected_lunch),
            attendee_count: count(attendees, |a| a.role == DEFAULT_ROLE),
            speaker_count: count(attendees, |a| a.role == ROLE_SPEAKER),
            organizer_count: count(attendees, |a| a.role == ROLE_ORGANIZER),
        }
    }
}

fn count(attendees: &[Attendee], pred: impl Fn(&Attendee) -> bool) -> usize {
    attendees.iter().filter(|a| pred(a)).count()
}

impl fmt::Display for EventStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Total:      {}", self.total_attendees)?;
        writeln!(f, "Checked in: {}", self.checked_in)?;
        writeln!(f, "Kits:       {}", self.kits_distributed)?;
        writeln!(f, "Lunches:    {}", self.lunch_distributed)?;
        write!(
            f,
            "Roles:      {} attendee(s), {} speaker(s), {} organizer(s)",
            self.attendee_count, self.speaker_count, self.organizer_count
        )
    }
}
