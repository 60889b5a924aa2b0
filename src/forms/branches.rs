use chrono::Local;
use pushkind_common::routes::empty_string_as_none;
use serde::Deserialize;
use thiserror::Error;
use validator::{Validate, ValidationErrors};

use crate::domain::branch::{NewBranch, UpdateBranch};
use crate::forms::{is_valid_time_of_day, optional_inline, parse_optional_id, sanitize_inline_text};

const NAME_MAX_LEN: u64 = 128;
const ADDRESS_MAX_LEN: u64 = 512;
const PHONE_MAX_LEN: u64 = 32;

pub type BranchFormResult<T> = Result<T, BranchFormError>;

#[derive(Debug, Error)]
pub enum BranchFormError {
    #[error("validation failed: {0}")]
    Validation(#[from] ValidationErrors),
    #[error("branch name cannot be empty")]
    EmptyName,
    #[error("branch address cannot be empty")]
    EmptyAddress,
    #[error("invalid {field} `{value}`, expected HH:MM")]
    InvalidTime { field: &'static str, value: String },
    #[error("closing time must be after opening time")]
    ClosingBeforeOpening,
    #[error("invalid franchise `{0}`")]
    InvalidFranchise(String),
}

/// Checks both times and their order; `HH:MM` strings compare chronologically.
fn opening_hours(opening: &str, closing: &str) -> BranchFormResult<(String, String)> {
    let opening = opening.trim();
    let closing = closing.trim();

    if !is_valid_time_of_day(opening) {
        return Err(BranchFormError::InvalidTime {
            field: "opening time",
            value: opening.to_string(),
        });
    }
    if !is_valid_time_of_day(closing) {
        return Err(BranchFormError::InvalidTime {
            field: "closing time",
            value: closing.to_string(),
        });
    }
    if closing <= opening {
        return Err(BranchFormError::ClosingBeforeOpening);
    }

    Ok((opening.to_string(), closing.to_string()))
}

fn name_and_address(name: &str, address: &str) -> BranchFormResult<(String, String)> {
    let name = sanitize_inline_text(name);
    if name.is_empty() {
        return Err(BranchFormError::EmptyName);
    }
    let address = sanitize_inline_text(address);
    if address.is_empty() {
        return Err(BranchFormError::EmptyAddress);
    }
    Ok((name, address))
}

#[derive(Debug, Deserialize, Validate)]
pub struct AddBranchForm {
    /// Ignored for franchise admins, who always create inside their own franchise.
    #[serde(default, deserialize_with = "empty_string_as_none")]
    pub franchise_id: Option<String>,
    #[validate(length(min = 1, max = NAME_MAX_LEN))]
    pub name: String,
    #[validate(length(min = 1, max = ADDRESS_MAX_LEN))]
    pub address: String,
    #[validate(length(max = PHONE_MAX_LEN))]
    #[serde(default, deserialize_with = "empty_string_as_none")]
    pub phone: Option<String>,
    pub opening_time: String,
    pub closing_time: String,
}

impl AddBranchForm {
    pub fn into_new_branch(self, hub_id: i32) -> BranchFormResult<NewBranch> {
        self.validate()?;

        let (name, address) = name_and_address(&self.name, &self.address)?;
        let (opening, closing) = opening_hours(&self.opening_time, &self.closing_time)?;
        let franchise_id = parse_optional_id(self.franchise_id.as_deref())
            .map_err(BranchFormError::InvalidFranchise)?;

        let mut branch = NewBranch::new(hub_id, name, address, opening, closing);
        if let Some(franchise_id) = franchise_id {
            branch = branch.with_franchise_id(franchise_id);
        }
        if let Some(phone) = optional_inline(self.phone.as_deref()) {
            branch = branch.with_phone(phone);
        }

        Ok(branch)
    }
}

#[derive(Debug)]
pub struct EditBranchPayload {
    pub branch_id: i32,
    pub update: UpdateBranch,
}

#[derive(Debug, Deserialize, Validate)]
pub struct EditBranchForm {
    #[validate(range(min = 1))]
    pub branch_id: i32,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    pub franchise_id: Option<String>,
    #[validate(length(min = 1, max = NAME_MAX_LEN))]
    pub name: String,
    #[validate(length(min = 1, max = ADDRESS_MAX_LEN))]
    pub address: String,
    #[validate(length(max = PHONE_MAX_LEN))]
    #[serde(default, deserialize_with = "empty_string_as_none")]
    pub phone: Option<String>,
    pub opening_time: String,
    pub closing_time: String,
    #[serde(default)]
    pub is_active: bool,
}

impl EditBranchForm {
    pub fn into_update_branch(self) -> BranchFormResult<EditBranchPayload> {
        self.validate()?;

        let (name, address) = name_and_address(&self.name, &self.address)?;
        let (opening_time, closing_time) = opening_hours(&self.opening_time, &self.closing_time)?;
        let franchise_id = parse_optional_id(self.franchise_id.as_deref())
            .map_err(BranchFormError::InvalidFranchise)?;

        Ok(EditBranchPayload {
            branch_id: self.branch_id,
            update: UpdateBranch {
                franchise_id,
                name,
                address,
                phone: optional_inline(self.phone.as_deref()),
                opening_time,
                closing_time,
                is_active: self.is_active,
                updated_at: Local::now().naive_utc(),
            },
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn add_form(opening: &str, closing: &str) -> AddBranchForm {
        AddBranchForm {
            franchise_id: Some("4".to_string()),
            name: " Downtown ".to_string(),
            address: " 1  Main St ".to_string(),
            phone: None,
            opening_time: opening.to_string(),
            closing_time: closing.to_string(),
        }
    }

    #[test]
    fn add_branch_form_converts() {
        let branch = add_form("08:00", "20:30")
            .into_new_branch(2)
            .expect("expected success");

        assert_eq!(branch.hub_id, 2);
        assert_eq!(branch.franchise_id, Some(4));
        assert_eq!(branch.name, "Downtown");
        assert_eq!(branch.address, "1 Main St");
        assert_eq!(branch.opening_time, "08:00");
        assert_eq!(branch.closing_time, "20:30");
    }

    #[test]
    fn add_branch_form_rejects_malformed_time() {
        let result = add_form("8:00", "20:00").into_new_branch(1);

        assert!(matches!(
            result,
            Err(BranchFormError::InvalidTime { field, value })
                if field == "opening time" && value == "8:00"
        ));
    }

    #[test]
    fn add_branch_form_rejects_closing_before_opening() {
        let result = add_form("18:00", "09:00").into_new_branch(1);
        assert!(matches!(result, Err(BranchFormError::ClosingBeforeOpening)));

        let result = add_form("09:00", "09:00").into_new_branch(1);
        assert!(matches!(result, Err(BranchFormError::ClosingBeforeOpening)));
    }

    #[test]
    fn edit_branch_form_clears_franchise() {
        let form = EditBranchForm {
            branch_id: 5,
            franchise_id: None,
            name: "Uptown".to_string(),
            address: "2 High St".to_string(),
            phone: Some(" ".to_string()),
            opening_time: "07:00".to_string(),
            closing_time: "22:00".to_string(),
            is_active: true,
        };

        let payload = form.into_update_branch().expect("expected success");

        assert_eq!(payload.branch_id, 5);
        assert!(payload.update.franchise_id.is_none());
        assert!(payload.update.phone.is_none());
        assert!(payload.update.is_active);
    }
}
