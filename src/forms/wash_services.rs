use chrono::Local;
use pushkind_common::routes::empty_string_as_none;
use serde::Deserialize;
use thiserror::Error;
use validator::{Validate, ValidationErrors};

use crate::domain::wash_service::{NewWashService, UpdateWashService};
use crate::forms::{optional_multiline, parse_money, sanitize_inline_text};

const NAME_MAX_LEN: u64 = 128;
const DESCRIPTION_MAX_LEN: u64 = 2048;
/// A single wash never takes longer than a working day.
const MAX_DURATION_MINUTES: i32 = 24 * 60;

#[derive(Debug, Error)]
pub enum WashServiceFormError {
    #[error("validation failed: {0}")]
    Validation(#[from] ValidationErrors),
    #[error("service name cannot be empty")]
    EmptyName,
    #[error("invalid price `{0}`")]
    InvalidPrice(String),
}

fn service_price(raw: &str) -> Result<i32, WashServiceFormError> {
    parse_money(raw).ok_or_else(|| WashServiceFormError::InvalidPrice(raw.trim().to_string()))
}

fn service_name(raw: &str) -> Result<String, WashServiceFormError> {
    let name = sanitize_inline_text(raw);
    if name.is_empty() {
        return Err(WashServiceFormError::EmptyName);
    }
    Ok(name)
}

#[derive(Debug, Deserialize, Validate)]
pub struct AddWashServiceForm {
    #[validate(range(min = 1))]
    pub branch_id: i32,
    #[validate(length(min = 1, max = NAME_MAX_LEN))]
    pub name: String,
    #[validate(length(max = DESCRIPTION_MAX_LEN))]
    #[serde(default, deserialize_with = "empty_string_as_none")]
    pub description: Option<String>,
    pub price: String,
    #[validate(range(min = 1, max = MAX_DURATION_MINUTES))]
    pub duration_minutes: i32,
}

impl AddWashServiceForm {
    pub fn into_new_service(self, hub_id: i32) -> Result<NewWashService, WashServiceFormError> {
        self.validate()?;

        let name = service_name(&self.name)?;
        let price_cents = service_price(&self.price)?;

        let mut service =
            NewWashService::new(hub_id, self.branch_id, name, price_cents, self.duration_minutes);
        if let Some(description) = optional_multiline(self.description.as_deref()) {
            service = service.with_description(description);
        }
        Ok(service)
    }
}

#[derive(Debug)]
pub struct EditWashServicePayload {
    pub service_id: i32,
    pub update: UpdateWashService,
}

#[derive(Debug, Deserialize, Validate)]
pub struct EditWashServiceForm {
    #[validate(range(min = 1))]
    pub service_id: i32,
    #[validate(length(min = 1, max = NAME_MAX_LEN))]
    pub name: String,
    #[validate(length(max = DESCRIPTION_MAX_LEN))]
    #[serde(default, deserialize_with = "empty_string_as_none")]
    pub description: Option<String>,
    pub price: String,
    #[validate(range(min = 1, max = MAX_DURATION_MINUTES))]
    pub duration_minutes: i32,
    #[serde(default)]
    pub is_active: bool,
}

impl EditWashServiceForm {
    pub fn into_update_service(self) -> Result<EditWashServicePayload, WashServiceFormError> {
        self.validate()?;

        Ok(EditWashServicePayload {
            service_id: self.service_id,
            update: UpdateWashService {
                name: service_name(&self.name)?,
                description: optional_multiline(self.description.as_deref()),
                price_cents: service_price(&self.price)?,
                duration_minutes: self.duration_minutes,
                is_active: self.is_active,
                updated_at: Local::now().naive_utc(),
            },
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn add_service_form_parses_price() {
        let form = AddWashServiceForm {
            branch_id: 2,
            name: " Exterior  wash ".to_string(),
            description: None,
            price: "15,9".to_string(),
            duration_minutes: 30,
        };

        let service = form.into_new_service(1).expect("expected success");

        assert_eq!(service.branch_id, 2);
        assert_eq!(service.name, "Exterior wash");
        assert_eq!(service.price_cents, 1590);
        assert_eq!(service.duration_minutes, 30);
    }

    #[test]
    fn add_service_form_rejects_zero_duration() {
        let form = AddWashServiceForm {
            branch_id: 2,
            name: "Wash".to_string(),
            description: None,
            price: "10".to_string(),
            duration_minutes: 0,
        };

        assert!(matches!(
            form.into_new_service(1),
            Err(WashServiceFormError::Validation(_))
        ));
    }

    #[test]
    fn edit_service_form_rejects_bad_price() {
        let form = EditWashServiceForm {
            service_id: 4,
            name: "Wash".to_string(),
            description: None,
            price: "ten".to_string(),
            duration_minutes: 20,
            is_active: true,
        };

        assert!(matches!(
            form.into_update_service(),
            Err(WashServiceFormError::InvalidPrice(value)) if value == "ten"
        ));
    }
}
