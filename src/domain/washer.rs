use std::str::FromStr;

use chrono::{Local, NaiveDateTime};
use pushkind_common::pagination::Pagination;
use serde::{Deserialize, Serialize};

/// Employment status of a washer.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum WasherStatus {
    #[default]
    Active,
    OnLeave,
    Inactive,
}

impl WasherStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::OnLeave => "on_leave",
            Self::Inactive => "inactive",
        }
    }
}

impl FromStr for WasherStatus {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim() {
            "active" => Ok(Self::Active),
            "on_leave" => Ok(Self::OnLeave),
            "inactive" => Ok(Self::Inactive),
            other => Err(other.to_string()),
        }
    }
}

/// Domain representation of a washer employed by a branch.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Washer {
    pub id: i32,
    pub hub_id: i32,
    pub branch_id: i32,
    pub name: String,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub status: WasherStatus,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

/// Payload required to insert a new washer.
#[derive(Debug, Clone)]
pub struct NewWasher {
    pub hub_id: i32,
    pub branch_id: i32,
    pub name: String,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub status: WasherStatus,
    pub updated_at: NaiveDateTime,
}

impl NewWasher {
    pub fn new(hub_id: i32, branch_id: i32, name: impl Into<String>) -> Self {
        Self {
            hub_id,
            branch_id,
            name: name.into(),
            phone: None,
            email: None,
            status: WasherStatus::default(),
            updated_at: Local::now().naive_utc(),
        }
    }

    pub fn with_phone(mut self, phone: impl Into<String>) -> Self {
        self.phone = Some(phone.into());
        self
    }

    pub fn with_email(mut self, email: impl Into<String>) -> Self {
        self.email = Some(email.into());
        self
    }
}

/// Full replacement of the editable washer fields.
#[derive(Debug, Clone)]
pub struct UpdateWasher {
    pub branch_id: i32,
    pub name: String,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub status: WasherStatus,
    pub updated_at: NaiveDateTime,
}

/// Query definition used to list washers.
#[derive(Debug, Clone)]
pub struct WasherListQuery {
    pub hub_id: i32,
    pub branch_ids: Option<Vec<i32>>,
    pub branch_id: Option<i32>,
    pub status: Option<WasherStatus>,
    /// Matches name, phone or email.
    pub search: Option<String>,
    pub pagination: Option<Pagination>,
}

impl WasherListQuery {
    pub fn new(hub_id: i32) -> Self {
        Self {
            hub_id,
            branch_ids: None,
            branch_id: None,
            status: None,
            search: None,
            pagination: None,
        }
    }

    pub fn restrict_to(mut self, branch_ids: Option<Vec<i32>>) -> Self {
        self.branch_ids = branch_ids;
        self
    }

    pub fn branch(mut self, branch_id: i32) -> Self {
        self.branch_id = Some(branch_id);
        self
    }

    pub fn status(mut self, status: WasherStatus) -> Self {
        self.status = Some(status);
        self
    }

    pub fn search(mut self, term: impl Into<String>) -> Self {
        self.search = Some(term.into());
        self
    }

    pub fn paginate(mut self, page: usize, per_page: usize) -> Self {
        self.pagination = Some(Pagination { page, per_page });
        self
    }
}

const DAY_NAMES: [&str; 7] = [
    "Monday",
    "Tuesday",
    "Wednesday",
    "Thursday",
    "Friday",
    "Saturday",
    "Sunday",
];

/// One working slot of a washer's weekly schedule.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct ScheduleSlot {
    /// Day of the week, Monday = 0.
    pub day_of_week: i32,
    /// Start of the shift in `HH:MM`.
    pub start_time: String,
    /// End of the shift in `HH:MM`.
    pub end_time: String,
}

impl ScheduleSlot {
    pub fn new(day_of_week: i32, start_time: impl Into<String>, end_time: impl Into<String>) -> Self {
        Self {
            day_of_week,
            start_time: start_time.into(),
            end_time: end_time.into(),
        }
    }

    pub fn day_name(&self) -> &'static str {
        usize::try_from(self.day_of_week)
            .ok()
            .and_then(|index| DAY_NAMES.get(index))
            .copied()
            .unwrap_or("Unknown")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn washer_status_round_trips_through_str() {
        for status in [WasherStatus::Active, WasherStatus::OnLeave, WasherStatus::Inactive] {
            assert_eq!(status.as_str().parse::<WasherStatus>(), Ok(status));
        }
        assert!("retired".parse::<WasherStatus>().is_err());
    }

    #[test]
    fn schedule_slot_names_days() {
        assert_eq!(ScheduleSlot::new(0, "09:00", "18:00").day_name(), "Monday");
        assert_eq!(ScheduleSlot::new(6, "09:00", "18:00").day_name(), "Sunday");
        assert_eq!(ScheduleSlot::new(9, "09:00", "18:00").day_name(), "Unknown");
    }
}
