use pushkind_common::routes::empty_string_as_none;
use serde::Deserialize;
use thiserror::Error;
use validator::{Validate, ValidationErrors};

use crate::domain::booking::{BookingStatus, NewBooking};
use crate::forms::{
    optional_inline, optional_multiline, parse_datetime, parse_money, parse_optional_id,
    sanitize_inline_text,
};

const NAME_MAX_LEN: u64 = 128;
const PHONE_MAX_LEN: u64 = 32;
const PLATE_MAX_LEN: u64 = 16;
const NOTES_MAX_LEN: u64 = 2048;

#[derive(Debug, Error)]
pub enum BookingFormError {
    #[error("validation failed: {0}")]
    Validation(#[from] ValidationErrors),
    #[error("customer name cannot be empty")]
    EmptyCustomerName,
    #[error("invalid date and time `{0}`")]
    InvalidScheduledAt(String),
    #[error("invalid price `{0}`")]
    InvalidPrice(String),
    #[error("invalid service `{0}`")]
    InvalidService(String),
    #[error("invalid washer `{0}`")]
    InvalidWasher(String),
    #[error("unknown booking status `{0}`")]
    InvalidStatus(String),
}

/// Car plates are stored uppercase without inner whitespace.
pub fn normalize_plate(input: &str) -> String {
    input
        .chars()
        .filter(|ch| !ch.is_whitespace() && !ch.is_control())
        .flat_map(char::to_uppercase)
        .collect()
}

/// A validated booking whose price may still have to come from the service.
#[derive(Debug)]
pub struct NewBookingPayload {
    pub booking: NewBooking,
    /// Price typed by the operator; `None` means "use the service price".
    pub price_cents: Option<i32>,
}

#[derive(Debug, Deserialize, Validate)]
pub struct AddBookingForm {
    #[validate(range(min = 1))]
    pub branch_id: i32,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    pub service_id: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    pub washer_id: Option<String>,
    #[validate(length(min = 1, max = NAME_MAX_LEN))]
    pub customer_name: String,
    #[validate(length(max = PHONE_MAX_LEN))]
    #[serde(default, deserialize_with = "empty_string_as_none")]
    pub customer_phone: Option<String>,
    #[validate(length(max = PLATE_MAX_LEN))]
    #[serde(default, deserialize_with = "empty_string_as_none")]
    pub car_plate: Option<String>,
    /// `datetime-local` value such as `2024-05-01T09:30`.
    pub scheduled_at: String,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    pub price: Option<String>,
    #[validate(length(max = NOTES_MAX_LEN))]
    #[serde(default, deserialize_with = "empty_string_as_none")]
    pub notes: Option<String>,
}

impl AddBookingForm {
    pub fn into_new_booking(self, hub_id: i32) -> Result<NewBookingPayload, BookingFormError> {
        self.validate()?;

        let customer_name = sanitize_inline_text(&self.customer_name);
        if customer_name.is_empty() {
            return Err(BookingFormError::EmptyCustomerName);
        }

        let scheduled_at = parse_datetime(&self.scheduled_at)
            .ok_or_else(|| BookingFormError::InvalidScheduledAt(self.scheduled_at.clone()))?;

        let price_cents = match self.price.as_deref() {
            Some(raw) => Some(
                parse_money(raw).ok_or_else(|| BookingFormError::InvalidPrice(raw.to_string()))?,
            ),
            None => None,
        };

        let service_id = parse_optional_id(self.service_id.as_deref())
            .map_err(BookingFormError::InvalidService)?;
        let washer_id = parse_optional_id(self.washer_id.as_deref())
            .map_err(BookingFormError::InvalidWasher)?;

        let mut booking = NewBooking::new(
            hub_id,
            self.branch_id,
            customer_name,
            scheduled_at,
            price_cents.unwrap_or_default(),
        );
        if let Some(service_id) = service_id {
            booking = booking.with_service_id(service_id);
        }
        if let Some(washer_id) = washer_id {
            booking = booking.with_washer_id(washer_id);
        }
        if let Some(phone) = optional_inline(self.customer_phone.as_deref()) {
            booking = booking.with_customer_phone(phone);
        }
        if let Some(plate) = self
            .car_plate
            .as_deref()
            .map(normalize_plate)
            .filter(|plate| !plate.is_empty())
        {
            booking = booking.with_car_plate(plate);
        }
        if let Some(notes) = optional_multiline(self.notes.as_deref()) {
            booking = booking.with_notes(notes);
        }

        Ok(NewBookingPayload {
            booking,
            price_cents,
        })
    }
}

#[derive(Debug, Deserialize, Validate)]
pub struct BookingStatusForm {
    #[validate(range(min = 1))]
    pub booking_id: i32,
    pub status: String,
}

impl BookingStatusForm {
    pub fn into_parts(self) -> Result<(i32, BookingStatus), BookingFormError> {
        self.validate()?;
        let status = self
            .status
            .parse::<BookingStatus>()
            .map_err(BookingFormError::InvalidStatus)?;
        Ok((self.booking_id, status))
    }
}

/// Assigns a washer; a blank washer unassigns the booking.
#[derive(Debug, Deserialize, Validate)]
pub struct AssignWasherForm {
    #[validate(range(min = 1))]
    pub booking_id: i32,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    pub washer_id: Option<String>,
}

impl AssignWasherForm {
    pub fn into_parts(self) -> Result<(i32, Option<i32>), BookingFormError> {
        self.validate()?;
        let washer_id = parse_optional_id(self.washer_id.as_deref())
            .map_err(BookingFormError::InvalidWasher)?;
        Ok((self.booking_id, washer_id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn add_form() -> AddBookingForm {
        AddBookingForm {
            branch_id: 3,
            service_id: Some("8".to_string()),
            washer_id: None,
            customer_name: "  John   Smith ".to_string(),
            customer_phone: Some("+1 555 0100".to_string()),
            car_plate: Some(" ab 123 c ".to_string()),
            scheduled_at: "2024-05-01T09:30".to_string(),
            price: None,
            notes: None,
        }
    }

    #[test]
    fn add_booking_form_converts() {
        let payload = add_form().into_new_booking(1).expect("expected success");

        assert!(payload.price_cents.is_none());
        assert_eq!(payload.booking.branch_id, 3);
        assert_eq!(payload.booking.service_id, Some(8));
        assert_eq!(payload.booking.customer_name, "John Smith");
        assert_eq!(payload.booking.car_plate.as_deref(), Some("AB123C"));
        assert_eq!(payload.booking.status, BookingStatus::Pending);
        assert_eq!(
            payload.booking.scheduled_at.to_string(),
            "2024-05-01 09:30:00"
        );
    }

    #[test]
    fn add_booking_form_keeps_explicit_price() {
        let mut form = add_form();
        form.price = Some("25.00".to_string());

        let payload = form.into_new_booking(1).expect("expected success");

        assert_eq!(payload.price_cents, Some(2500));
        assert_eq!(payload.booking.price_cents, 2500);
    }

    #[test]
    fn add_booking_form_rejects_bad_datetime() {
        let mut form = add_form();
        form.scheduled_at = "tomorrow".to_string();

        assert!(matches!(
            form.into_new_booking(1),
            Err(BookingFormError::InvalidScheduledAt(value)) if value == "tomorrow"
        ));
    }

    #[test]
    fn status_and_assignment_forms_parse() {
        let form = BookingStatusForm {
            booking_id: 5,
            status: "in_progress".to_string(),
        };
        assert!(matches!(form.into_parts(), Ok((5, BookingStatus::InProgress))));

        let form = BookingStatusForm {
            booking_id: 5,
            status: "done".to_string(),
        };
        assert!(matches!(form.into_parts(), Err(BookingFormError::InvalidStatus(_))));

        let form = AssignWasherForm {
            booking_id: 5,
            washer_id: None,
        };
        assert!(matches!(form.into_parts(), Ok((5, None))));
    }
}
