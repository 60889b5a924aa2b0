use std::str::FromStr;

use chrono::{Local, NaiveDateTime};
use pushkind_common::pagination::Pagination;
use serde::{Deserialize, Serialize};

/// Lifecycle states of a booking.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "snake_case")]
pub enum BookingStatus {
    /// Booking requested by the customer and not yet confirmed by the branch.
    #[default]
    Pending,
    /// Branch accepted the booking.
    Confirmed,
    /// The car is being washed.
    InProgress,
    /// Service delivered; the booking can be reviewed and paid.
    Completed,
    /// Booking was cancelled and will not be served.
    Cancelled,
}

impl BookingStatus {
    pub const ALL: [BookingStatus; 5] = [
        BookingStatus::Pending,
        BookingStatus::Confirmed,
        BookingStatus::InProgress,
        BookingStatus::Completed,
        BookingStatus::Cancelled,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Confirmed => "confirmed",
            Self::InProgress => "in_progress",
            Self::Completed => "completed",
            Self::Cancelled => "cancelled",
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Completed | Self::Cancelled)
    }

    /// Whether a booking in this state may move to `next`.
    pub fn can_transition_to(&self, next: BookingStatus) -> bool {
        matches!(
            (self, next),
            (Self::Pending, Self::Confirmed)
                | (Self::Pending, Self::Cancelled)
                | (Self::Confirmed, Self::InProgress)
                | (Self::Confirmed, Self::Cancelled)
                | (Self::InProgress, Self::Completed)
        )
    }
}

impl FromStr for BookingStatus {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim() {
            "pending" => Ok(Self::Pending),
            "confirmed" => Ok(Self::Confirmed),
            "in_progress" => Ok(Self::InProgress),
            "completed" => Ok(Self::Completed),
            "cancelled" => Ok(Self::Cancelled),
            other => Err(other.to_string()),
        }
    }
}

/// Domain representation of a customer booking at a branch.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Booking {
    pub id: i32,
    pub hub_id: i32,
    pub branch_id: i32,
    /// Booked service; cleared when the service is deleted.
    pub service_id: Option<i32>,
    /// Washer assigned to the booking.
    pub washer_id: Option<i32>,
    pub customer_name: String,
    pub customer_phone: Option<String>,
    pub car_plate: Option<String>,
    pub scheduled_at: NaiveDateTime,
    pub status: BookingStatus,
    /// Price captured at booking time in the smallest currency unit.
    pub price_cents: i32,
    pub notes: Option<String>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

/// Payload required to insert a new booking.
#[derive(Debug, Clone)]
pub struct NewBooking {
    pub hub_id: i32,
    pub branch_id: i32,
    pub service_id: Option<i32>,
    pub washer_id: Option<i32>,
    pub customer_name: String,
    pub customer_phone: Option<String>,
    pub car_plate: Option<String>,
    pub scheduled_at: NaiveDateTime,
    pub status: BookingStatus,
    pub price_cents: i32,
    pub notes: Option<String>,
    pub updated_at: NaiveDateTime,
}

impl NewBooking {
    pub fn new(
        hub_id: i32,
        branch_id: i32,
        customer_name: impl Into<String>,
        scheduled_at: NaiveDateTime,
        price_cents: i32,
    ) -> Self {
        Self {
            hub_id,
            branch_id,
            service_id: None,
            washer_id: None,
            customer_name: customer_name.into(),
            customer_phone: None,
            car_plate: None,
            scheduled_at,
            status: BookingStatus::default(),
            price_cents,
            notes: None,
            updated_at: Local::now().naive_utc(),
        }
    }

    pub fn with_service_id(mut self, service_id: i32) -> Self {
        self.service_id = Some(service_id);
        self
    }

    pub fn with_washer_id(mut self, washer_id: i32) -> Self {
        self.washer_id = Some(washer_id);
        self
    }

    pub fn with_customer_phone(mut self, phone: impl Into<String>) -> Self {
        self.customer_phone = Some(phone.into());
        self
    }

    pub fn with_car_plate(mut self, plate: impl Into<String>) -> Self {
        self.car_plate = Some(plate.into());
        self
    }

    pub fn with_notes(mut self, notes: impl Into<String>) -> Self {
        self.notes = Some(notes.into());
        self
    }

    pub fn with_status(mut self, status: BookingStatus) -> Self {
        self.status = status;
        self
    }
}

/// Patch data applied when updating an existing booking.
#[derive(Debug, Clone)]
pub struct UpdateBooking {
    pub status: Option<BookingStatus>,
    /// `Some(None)` unassigns the washer.
    pub washer_id: Option<Option<i32>>,
    pub scheduled_at: Option<NaiveDateTime>,
    pub notes: Option<Option<String>>,
    pub updated_at: NaiveDateTime,
}

impl Default for UpdateBooking {
    fn default() -> Self {
        Self::new()
    }
}

impl UpdateBooking {
    pub fn new() -> Self {
        Self {
            status: None,
            washer_id: None,
            scheduled_at: None,
            notes: None,
            updated_at: Local::now().naive_utc(),
        }
    }

    pub fn status(mut self, status: BookingStatus) -> Self {
        self.status = Some(status);
        self
    }

    pub fn washer_id(mut self, washer_id: Option<i32>) -> Self {
        self.washer_id = Some(washer_id);
        self
    }

    pub fn scheduled_at(mut self, scheduled_at: NaiveDateTime) -> Self {
        self.scheduled_at = Some(scheduled_at);
        self
    }

    pub fn notes(mut self, notes: Option<impl Into<String>>) -> Self {
        self.notes = Some(notes.map(|value| value.into()));
        self
    }
}

/// Query definition used to list bookings.
#[derive(Debug, Clone)]
pub struct BookingListQuery {
    pub hub_id: i32,
    pub branch_ids: Option<Vec<i32>>,
    pub branch_id: Option<i32>,
    pub status: Option<BookingStatus>,
    /// Matches customer name, phone or car plate.
    pub search: Option<String>,
    /// Inclusive lower bound on `scheduled_at`.
    pub from: Option<NaiveDateTime>,
    /// Exclusive upper bound on `scheduled_at`.
    pub to: Option<NaiveDateTime>,
    pub pagination: Option<Pagination>,
}

impl BookingListQuery {
    pub fn new(hub_id: i32) -> Self {
        Self {
            hub_id,
            branch_ids: None,
            branch_id: None,
            status: None,
            search: None,
            from: None,
            to: None,
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

    pub fn status(mut self, status: BookingStatus) -> Self {
        self.status = Some(status);
        self
    }

    pub fn search(mut self, term: impl Into<String>) -> Self {
        self.search = Some(term.into());
        self
    }

    pub fn between(mut self, from: Option<NaiveDateTime>, to: Option<NaiveDateTime>) -> Self {
        self.from = from;
        self.to = to;
        self
    }

    pub fn paginate(mut self, page: usize, per_page: usize) -> Self {
        self.pagination = Some(Pagination { page, per_page });
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn booking_transitions_follow_the_workflow() {
        use BookingStatus::*;

        assert!(Pending.can_transition_to(Confirmed));
        assert!(Pending.can_transition_to(Cancelled));
        assert!(Confirmed.can_transition_to(InProgress));
        assert!(InProgress.can_transition_to(Completed));

        assert!(!Pending.can_transition_to(Completed));
        assert!(!InProgress.can_transition_to(Cancelled));
        assert!(!Completed.can_transition_to(Pending));
        assert!(!Cancelled.can_transition_to(Confirmed));
    }

    #[test]
    fn terminal_states() {
        assert!(BookingStatus::Completed.is_terminal());
        assert!(BookingStatus::Cancelled.is_terminal());
        assert!(!BookingStatus::Confirmed.is_terminal());
    }

    #[test]
    fn status_parsing_is_strict() {
        assert_eq!("in_progress".parse(), Ok(BookingStatus::InProgress));
        assert!("done".parse::<BookingStatus>().is_err());
    }
}
