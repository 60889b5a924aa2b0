use pushkind_common::routes::empty_string_as_none;
use serde::Deserialize;
use thiserror::Error;
use validator::{Validate, ValidationErrors};

use crate::domain::franchise::{NewFranchise, UpdateFranchise};
use crate::forms::{optional_inline, optional_multiline, sanitize_email, sanitize_inline_text};

const NAME_MAX_LEN: u64 = 128;
const DESCRIPTION_MAX_LEN: u64 = 2048;
const PHONE_MAX_LEN: u64 = 32;

pub type FranchiseFormResult<T> = Result<T, FranchiseFormError>;

#[derive(Debug, Error)]
pub enum FranchiseFormError {
    #[error("validation failed: {0}")]
    Validation(#[from] ValidationErrors),
    #[error("franchise name cannot be empty")]
    EmptyName,
}

/// Form payload emitted when submitting the "Add franchise" dialog.
#[derive(Debug, Deserialize, Validate)]
pub struct AddFranchiseForm {
    #[validate(length(min = 1, max = NAME_MAX_LEN))]
    pub name: String,
    #[validate(length(max = DESCRIPTION_MAX_LEN))]
    #[serde(default, deserialize_with = "empty_string_as_none")]
    pub description: Option<String>,
    #[validate(email)]
    #[serde(default, deserialize_with = "empty_string_as_none")]
    pub contact_email: Option<String>,
    #[validate(length(max = PHONE_MAX_LEN))]
    #[serde(default, deserialize_with = "empty_string_as_none")]
    pub contact_phone: Option<String>,
}

impl AddFranchiseForm {
    pub fn into_new_franchise(self, hub_id: i32) -> FranchiseFormResult<NewFranchise> {
        self.validate()?;

        let name = sanitize_inline_text(&self.name);
        if name.is_empty() {
            return Err(FranchiseFormError::EmptyName);
        }

        let mut franchise = NewFranchise::new(hub_id, name);
        if let Some(description) = optional_multiline(self.description.as_deref()) {
            franchise = franchise.with_description(description);
        }
        if let Some(email) = self.contact_email.as_deref().map(sanitize_email) {
            franchise = franchise.with_contact_email(email);
        }
        if let Some(phone) = optional_inline(self.contact_phone.as_deref()) {
            franchise = franchise.with_contact_phone(phone);
        }

        Ok(franchise)
    }
}

#[derive(Debug)]
pub struct EditFranchisePayload {
    pub franchise_id: i32,
    pub update: UpdateFranchise,
}

/// Form payload emitted when editing a franchise; blank optional fields clear the value.
#[derive(Debug, Deserialize, Validate)]
pub struct EditFranchiseForm {
    #[validate(range(min = 1))]
    pub franchise_id: i32,
    #[validate(length(min = 1, max = NAME_MAX_LEN))]
    pub name: String,
    #[validate(length(max = DESCRIPTION_MAX_LEN))]
    #[serde(default, deserialize_with = "empty_string_as_none")]
    pub description: Option<String>,
    #[validate(email)]
    #[serde(default, deserialize_with = "empty_string_as_none")]
    pub contact_email: Option<String>,
    #[validate(length(max = PHONE_MAX_LEN))]
    #[serde(default, deserialize_with = "empty_string_as_none")]
    pub contact_phone: Option<String>,
    /// Checkbox; absent when unchecked.
    #[serde(default)]
    pub is_active: bool,
}

impl EditFranchiseForm {
    pub fn into_update_franchise(self) -> FranchiseFormResult<EditFranchisePayload> {
        self.validate()?;

        let name = sanitize_inline_text(&self.name);
        if name.is_empty() {
            return Err(FranchiseFormError::EmptyName);
        }

        let update = UpdateFranchise {
            name,
            description: optional_multiline(self.description.as_deref()),
            contact_email: self.contact_email.as_deref().map(sanitize_email),
            contact_phone: optional_inline(self.contact_phone.as_deref()),
            is_active: self.is_active,
            updated_at: chrono::Local::now().naive_utc(),
        };

        Ok(EditFranchisePayload {
            franchise_id: self.franchise_id,
            update,
        })
    }
}
