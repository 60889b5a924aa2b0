use chrono::Local;
use pushkind_common::routes::empty_string_as_none;
use serde::Deserialize;
use thiserror::Error;
use validator::{Validate, ValidationErrors};

use crate::domain::washer::{NewWasher, ScheduleSlot, UpdateWasher, WasherStatus};
use crate::forms::{is_valid_time_of_day, optional_inline, sanitize_email, sanitize_inline_text};

const NAME_MAX_LEN: u64 = 128;
const PHONE_MAX_LEN: u64 = 32;

#[derive(Debug, Error)]
pub enum WasherFormError {
    #[error("validation failed: {0}")]
    Validation(#[from] ValidationErrors),
    #[error("washer name cannot be empty")]
    EmptyName,
    #[error("unknown washer status `{0}`")]
    InvalidStatus(String),
    #[error("schedule rows are incomplete")]
    MismatchedSchedule,
    #[error("invalid day of week {0}")]
    InvalidDay(i32),
    #[error("invalid time `{0}`, expected HH:MM")]
    InvalidTime(String),
    #[error("shift on {0} must end after it starts")]
    EndBeforeStart(&'static str),
    #[error("{0} is scheduled more than once")]
    DuplicateDay(&'static str),
}

fn washer_name(raw: &str) -> Result<String, WasherFormError> {
    let name = sanitize_inline_text(raw);
    if name.is_empty() {
        return Err(WasherFormError::EmptyName);
    }
    Ok(name)
}

#[derive(Debug, Deserialize, Validate)]
pub struct AddWasherForm {
    #[validate(range(min = 1))]
    pub branch_id: i32,
    #[validate(length(min = 1, max = NAME_MAX_LEN))]
    pub name: String,
    #[validate(length(max = PHONE_MAX_LEN))]
    #[serde(default, deserialize_with = "empty_string_as_none")]
    pub phone: Option<String>,
    #[validate(email)]
    #[serde(default, deserialize_with = "empty_string_as_none")]
    pub email: Option<String>,
}

impl AddWasherForm {
    pub fn into_new_washer(self, hub_id: i32) -> Result<NewWasher, WasherFormError> {
        self.validate()?;

        let mut washer = NewWasher::new(hub_id, self.branch_id, washer_name(&self.name)?);
        if let Some(phone) = optional_inline(self.phone.as_deref()) {
            washer = washer.with_phone(phone);
        }
        if let Some(email) = self.email.as_deref().map(sanitize_email) {
            washer = washer.with_email(email);
        }
        Ok(washer)
    }
}

#[derive(Debug)]
pub struct EditWasherPayload {
    pub washer_id: i32,
    pub update: UpdateWasher,
}

#[derive(Debug, Deserialize, Validate)]
pub struct EditWasherForm {
    #[validate(range(min = 1))]
    pub washer_id: i32,
    #[validate(range(min = 1))]
    pub branch_id: i32,
    #[validate(length(min = 1, max = NAME_MAX_LEN))]
    pub name: String,
    #[validate(length(max = PHONE_MAX_LEN))]
    #[serde(default, deserialize_with = "empty_string_as_none")]
    pub phone: Option<String>,
    #[validate(email)]
    #[serde(default, deserialize_with = "empty_string_as_none")]
    pub email: Option<String>,
    pub status: String,
}

impl EditWasherForm {
    pub fn into_update_washer(self) -> Result<EditWasherPayload, WasherFormError> {
        self.validate()?;

        let status = self
            .status
            .parse::<WasherStatus>()
            .map_err(WasherFormError::InvalidStatus)?;

        Ok(EditWasherPayload {
            washer_id: self.washer_id,
            update: UpdateWasher {
                branch_id: self.branch_id,
                name: washer_name(&self.name)?,
                phone: optional_inline(self.phone.as_deref()),
                email: self.email.as_deref().map(sanitize_email),
                status,
                updated_at: Local::now().naive_utc(),
            },
        })
    }
}

/// Weekly schedule submitted as parallel repeated fields, one row per day.
///
/// Rows whose start and end are both blank mark a day off and are skipped.
#[derive(Debug, Default, Deserialize)]
pub struct ScheduleForm {
    #[serde(default)]
    pub day_of_week: Vec<i32>,
    #[serde(default)]
    pub start_time: Vec<String>,
    #[serde(default)]
    pub end_time: Vec<String>,
}

impl ScheduleForm {
    /// Validated slots ordered by day of week.
    pub fn into_slots(self) -> Result<Vec<ScheduleSlot>, WasherFormError> {
        if self.day_of_week.len() != self.start_time.len()
            || self.day_of_week.len() != self.end_time.len()
        {
            return Err(WasherFormError::MismatchedSchedule);
        }

        let mut slots: Vec<ScheduleSlot> = Vec::with_capacity(self.day_of_week.len());

        for ((day, start), end) in self
            .day_of_week
            .into_iter()
            .zip(self.start_time)
            .zip(self.end_time)
        {
            let start = start.trim();
            let end = end.trim();
            if start.is_empty() && end.is_empty() {
                continue;
            }

            if !(0..=6).contains(&day) {
                return Err(WasherFormError::InvalidDay(day));
            }
            for time in [start, end] {
                if !is_valid_time_of_day(time) {
                    return Err(WasherFormError::InvalidTime(time.to_string()));
                }
            }

            let slot = ScheduleSlot::new(day, start, end);
            if end <= start {
                return Err(WasherFormError::EndBeforeStart(slot.day_name()));
            }
            if slots.iter().any(|existing| existing.day_of_week == day) {
                return Err(WasherFormError::DuplicateDay(slot.day_name()));
            }
            slots.push(slot);
        }

        slots.sort_by_key(|slot| slot.day_of_week);
        Ok(slots)
    }
}
