use pushkind_common::routes::empty_string_as_none;
use serde::Deserialize;
use thiserror::Error;
use validator::{Validate, ValidationErrors};

use crate::domain::admin::{AdminRole, NewAdmin};
use crate::forms::{parse_optional_id, sanitize_email, sanitize_inline_text};

const NAME_MAX_LEN: u64 = 128;

#[derive(Debug, Error)]
pub enum AdminFormError {
    #[error("validation failed: {0}")]
    Validation(#[from] ValidationErrors),
    #[error("admin name cannot be empty")]
    EmptyName,
    #[error("unknown admin role `{0}`")]
    InvalidRole(String),
    #[error("invalid franchise `{0}`")]
    InvalidFranchise(String),
    #[error("franchise admins need a franchise")]
    MissingFranchise,
    #[error("branch admins need at least one branch")]
    MissingBranches,
}

/// Positive ids in submission order without duplicates.
fn unique_branch_ids(ids: Vec<i32>) -> Vec<i32> {
    let mut unique = Vec::with_capacity(ids.len());
    for id in ids {
        if id > 0 && !unique.contains(&id) {
            unique.push(id);
        }
    }
    unique
}

/// Submitted with repeated `branch_ids` fields, so it is decoded with `serde_html_form`.
#[derive(Debug, Deserialize, Validate)]
pub struct AddAdminForm {
    #[validate(email)]
    pub email: String,
    #[validate(length(min = 1, max = NAME_MAX_LEN))]
    pub name: String,
    pub role: String,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    pub franchise_id: Option<String>,
    #[serde(default)]
    pub branch_ids: Vec<i32>,
}

impl AddAdminForm {
    pub fn into_new_admin(self, hub_id: i32) -> Result<NewAdmin, AdminFormError> {
        self.validate()?;

        let name = sanitize_inline_text(&self.name);
        if name.is_empty() {
            return Err(AdminFormError::EmptyName);
        }
        let email = sanitize_email(&self.email);

        let role = self
            .role
            .parse::<AdminRole>()
            .map_err(AdminFormError::InvalidRole)?;

        match role {
            AdminRole::Franchise => {
                let franchise_id = parse_optional_id(self.franchise_id.as_deref())
                    .map_err(AdminFormError::InvalidFranchise)?
                    .ok_or(AdminFormError::MissingFranchise)?;
                Ok(NewAdmin::franchise(hub_id, email, name, franchise_id))
            }
            AdminRole::Branch => {
                let branch_ids = unique_branch_ids(self.branch_ids);
                if branch_ids.is_empty() {
                    return Err(AdminFormError::MissingBranches);
                }
                Ok(NewAdmin::branch(hub_id, email, name, branch_ids))
            }
        }
    }
}

/// Replaces the branches of a branch administrator.
#[derive(Debug, Deserialize, Validate)]
pub struct AssignBranchesForm {
    #[validate(range(min = 1))]
    pub admin_id: i32,
    #[serde(default)]
    pub branch_ids: Vec<i32>,
}

impl AssignBranchesForm {
    pub fn into_parts(self) -> Result<(i32, Vec<i32>), AdminFormError> {
        self.validate()?;
        let branch_ids = unique_branch_ids(self.branch_ids);
        if branch_ids.is_empty() {
            return Err(AdminFormError::MissingBranches);
        }
        Ok((self.admin_id, branch_ids))
    }
}
