use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// The three per-day actions an operator can record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StatusKind {
    CheckIn,
    Kit,
    Lunch,
}

impl StatusKind {
    /// Last path segment of the backend's PUT endpoint.
    pub fn endpoint(&self) -> &'static str {
        match self {
            StatusKind::CheckIn => "checkin",
            StatusKind::Kit => "kit",
            StatusKind::Lunch => "lunch",
        }
    }

    pub fn success_message(&self) -> &'static str {
        match self {
            StatusKind::CheckIn => "Checked in successfully",
            StatusKind::Kit => "Kit collected",
            StatusKind::Lunch => "Lunch collected",
        }
    }
}

impl fmt::Display for StatusKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.endpoint())
    }
}

/// Boolean field names on a per-day record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StatusField {
    IsCheckedIn,
    HasCollectedKit,
    HasCollectedLunch,
}

impl StatusField {
    pub fn as_str(&self) -> &'static str {
        match self {
            StatusField::IsCheckedIn => "is_checked_in",
            StatusField::HasCollectedKit => "has_collected_kit",
            StatusField::HasCollectedLunch => "has_collected_lunch",
        }
    }
}

impl fmt::Display for StatusField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for StatusField {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "is_checked_in" | "checkin" | "check-in" => Ok(StatusField::IsCheckedIn),
            "has_collected_kit" | "kit" => Ok(StatusField::HasCollectedKit),
            "has_collected_lunch" | "lunch" => Ok(StatusField::HasCollectedLunch),
            _ => Err(format!(
                "Invalid status field '{}'. Valid options: is_checked_in, has_collected_kit, has_collected_lunch",
                s
            )),
        }
    }
}
