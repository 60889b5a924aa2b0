use chrono::{Local, NaiveDateTime};
use pushkind_common::routes::empty_string_as_none;
use serde::Deserialize;
use thiserror::Error;
use validator::{Validate, ValidationErrors};

use crate::domain::offer::{NewOffer, UpdateOffer};
use crate::forms::{optional_multiline, parse_datetime, sanitize_inline_text};

const TITLE_MAX_LEN: u64 = 128;
const DESCRIPTION_MAX_LEN: u64 = 2048;
const CODE_MAX_LEN: u64 = 32;

#[derive(Debug, Error)]
pub enum OfferFormError {
    #[error("validation failed: {0}")]
    Validation(#[from] ValidationErrors),
    #[error("offer title cannot be empty")]
    EmptyTitle,
    #[error("invalid date and time `{0}`")]
    InvalidDateTime(String),
    #[error("offer must end after it starts")]
    EndsBeforeStart,
}

/// Promo codes are uppercase without whitespace.
fn normalize_code(input: &str) -> Option<String> {
    let code: String = input
        .chars()
        .filter(|ch| !ch.is_whitespace() && !ch.is_control())
        .flat_map(char::to_uppercase)
        .collect();
    (!code.is_empty()).then_some(code)
}

fn optional_datetime(raw: Option<&str>) -> Result<Option<NaiveDateTime>, OfferFormError> {
    match raw {
        Some(value) => parse_datetime(value)
            .map(Some)
            .ok_or_else(|| OfferFormError::InvalidDateTime(value.trim().to_string())),
        None => Ok(None),
    }
}

/// Title, window and code shared by the add and edit forms.
struct OfferFields {
    title: String,
    description: Option<String>,
    code: Option<String>,
    starts_at: Option<NaiveDateTime>,
    ends_at: Option<NaiveDateTime>,
}

fn offer_fields(
    title: &str,
    description: Option<&str>,
    code: Option<&str>,
    starts_at: Option<&str>,
    ends_at: Option<&str>,
) -> Result<OfferFields, OfferFormError> {
    let title = sanitize_inline_text(title);
    if title.is_empty() {
        return Err(OfferFormError::EmptyTitle);
    }

    let starts_at = optional_datetime(starts_at)?;
    let ends_at = optional_datetime(ends_at)?;
    if let (Some(starts_at), Some(ends_at)) = (starts_at, ends_at)
        && ends_at <= starts_at
    {
        return Err(OfferFormError::EndsBeforeStart);
    }

    Ok(OfferFields {
        title,
        description: optional_multiline(description),
        code: code.and_then(normalize_code),
        starts_at,
        ends_at,
    })
}

#[derive(Debug, Deserialize, Validate)]
pub struct AddOfferForm {
    #[validate(length(min = 1, max = TITLE_MAX_LEN))]
    pub title: String,
    #[validate(length(max = DESCRIPTION_MAX_LEN))]
    #[serde(default, deserialize_with = "empty_string_as_none")]
    pub description: Option<String>,
    #[validate(range(min = 1, max = 100))]
    pub discount_percent: i32,
    #[validate(length(max = CODE_MAX_LEN))]
    #[serde(default, deserialize_with = "empty_string_as_none")]
    pub code: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    pub starts_at: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    pub ends_at: Option<String>,
}

impl AddOfferForm {
    pub fn into_new_offer(self, hub_id: i32) -> Result<NewOffer, OfferFormError> {
        self.validate()?;

        let fields = offer_fields(
            &self.title,
            self.description.as_deref(),
            self.code.as_deref(),
            self.starts_at.as_deref(),
            self.ends_at.as_deref(),
        )?;

        let mut offer = NewOffer::new(hub_id, fields.title, self.discount_percent)
            .valid_between(fields.starts_at, fields.ends_at);
        if let Some(description) = fields.description {
            offer = offer.with_description(description);
        }
        if let Some(code) = fields.code {
            offer = offer.with_code(code);
        }
        Ok(offer)
    }
}

#[derive(Debug, Deserialize, Validate)]
pub struct EditOfferForm {
    #[validate(range(min = 1))]
    pub offer_id: i32,
    #[validate(length(min = 1, max = TITLE_MAX_LEN))]
    pub title: String,
    #[validate(length(max = DESCRIPTION_MAX_LEN))]
    #[serde(default, deserialize_with = "empty_string_as_none")]
    pub description: Option<String>,
    #[validate(range(min = 1, max = 100))]
    pub discount_percent: i32,
    #[validate(length(max = CODE_MAX_LEN))]
    #[serde(default, deserialize_with = "empty_string_as_none")]
    pub code: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    pub starts_at: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    pub ends_at: Option<String>,
    #[serde(default)]
    pub is_active: bool,
}

impl EditOfferForm {
    pub fn into_update_offer(self) -> Result<(i32, UpdateOffer), OfferFormError> {
        self.validate()?;

        let fields = offer_fields(
            &self.title,
            self.description.as_deref(),
            self.code.as_deref(),
            self.starts_at.as_deref(),
            self.ends_at.as_deref(),
        )?;

        Ok((
            self.offer_id,
            UpdateOffer {
                title: fields.title,
                description: fields.description,
                discount_percent: self.discount_percent,
                code: fields.code,
                starts_at: fields.starts_at,
                ends_at: fields.ends_at,
                is_active: self.is_active,
                updated_at: Local::now().naive_utc(),
            },
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn add_form() -> AddOfferForm {
        AddOfferForm {
            title: " Summer  shine ".to_string(),
            description: None,
            discount_percent: 15,
            code: Some(" sun 15 ".to_string()),
            starts_at: Some("2024-06-01T00:00".to_string()),
            ends_at: Some("2024-09-01T00:00".to_string()),
        }
    }

    #[test]
    fn add_offer_form_converts() {
        let offer = add_form().into_new_offer(1).expect("expected success");

        assert_eq!(offer.title, "Summer shine");
        assert_eq!(offer.code.as_deref(), Some("SUN15"));
        assert_eq!(offer.discount_percent, 15);
        assert!(offer.starts_at.is_some());
        assert!(offer.ends_at.is_some());
    }

    #[test]
    fn add_offer_form_rejects_inverted_window() {
        let mut form = add_form();
        form.ends_at = Some("2024-05-01T00:00".to_string());

        assert!(matches!(
            form.into_new_offer(1),
            Err(OfferFormError::EndsBeforeStart)
        ));
    }

    #[test]
    fn add_offer_form_rejects_discount_out_of_range() {
        for discount in [0, 101] {
            let mut form = add_form();
            form.discount_percent = discount;
            assert!(matches!(
                form.into_new_offer(1),
                Err(OfferFormError::Validation(_))
            ));
        }
    }

    #[test]
    fn edit_offer_form_allows_open_window() {
        let form = EditOfferForm {
            offer_id: 3,
            title: "Always on".to_string(),
            description: None,
            discount_percent: 100,
            code: None,
            starts_at: None,
            ends_at: None,
            is_active: false,
        };

        let (offer_id, update) = form.into_update_offer().expect("expected success");

        assert_eq!(offer_id, 3);
        assert!(update.starts_at.is_none() && update.ends_at.is_none());
        assert!(!update.is_active);
    }
}
