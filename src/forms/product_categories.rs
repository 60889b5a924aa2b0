use pushkind_common::routes::empty_string_as_none;
use serde::Deserialize;
use thiserror::Error;
use validator::{Validate, ValidationErrors};

use crate::domain::product_category::{NewProductCategory, UpdateProductCategory};
use crate::forms::{optional_multiline, sanitize_inline_text};

const NAME_MAX_LEN: u64 = 128;
const DESCRIPTION_MAX_LEN: u64 = 1024;

#[derive(Debug, Error)]
pub enum ProductCategoryFormError {
    #[error("validation failed: {0}")]
    Validation(#[from] ValidationErrors),
    #[error("category name cannot be empty")]
    EmptyName,
}

#[derive(Debug, Deserialize, Validate)]
pub struct AddProductCategoryForm {
    #[validate(length(min = 1, max = NAME_MAX_LEN))]
    pub name: String,
    #[validate(length(max = DESCRIPTION_MAX_LEN))]
    #[serde(default, deserialize_with = "empty_string_as_none")]
    pub description: Option<String>,
}

impl AddProductCategoryForm {
    pub fn into_new_category(
        self,
        hub_id: i32,
    ) -> Result<NewProductCategory, ProductCategoryFormError> {
        self.validate()?;

        let name = sanitize_inline_text(&self.name);
        if name.is_empty() {
            return Err(ProductCategoryFormError::EmptyName);
        }

        let mut category = NewProductCategory::new(hub_id, name);
        if let Some(description) = optional_multiline(self.description.as_deref()) {
            category = category.with_description(description);
        }
        Ok(category)
    }
}

#[derive(Debug, Deserialize, Validate)]
pub struct EditProductCategoryForm {
    #[validate(range(min = 1))]
    pub category_id: i32,
    #[validate(length(min = 1, max = NAME_MAX_LEN))]
    pub name: String,
    #[validate(length(max = DESCRIPTION_MAX_LEN))]
    #[serde(default, deserialize_with = "empty_string_as_none")]
    pub description: Option<String>,
}

impl EditProductCategoryForm {
    pub fn into_update_category(
        self,
    ) -> Result<(i32, UpdateProductCategory), ProductCategoryFormError> {
        self.validate()?;

        let name = sanitize_inline_text(&self.name);
        if name.is_empty() {
            return Err(ProductCategoryFormError::EmptyName);
        }

        Ok((
            self.category_id,
            UpdateProductCategory::new(name, optional_multiline(self.description.as_deref())),
        ))
    }
}
