use chrono::{Local, NaiveDateTime};
use serde::{Deserialize, Serialize};

/// Flat category used to group retail products sold at the branches.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct ProductCategory {
    pub id: i32,
    pub hub_id: i32,
    pub name: String,
    pub description: Option<String>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

#[derive(Debug, Clone)]
pub struct NewProductCategory {
    pub hub_id: i32,
    pub name: String,
    pub description: Option<String>,
    pub updated_at: NaiveDateTime,
}

impl NewProductCategory {
    pub fn new(hub_id: i32, name: impl Into<String>) -> Self {
        Self {
            hub_id,
            name: name.into(),
            description: None,
            updated_at: Local::now().naive_utc(),
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}

#[derive(Debug, Clone)]
pub struct UpdateProductCategory {
    pub name: String,
    pub description: Option<String>,
    pub updated_at: NaiveDateTime,
}

impl UpdateProductCategory {
    pub fn new(name: String, description: Option<String>) -> Self {
        Self {
            name,
            description,
            updated_at: Local::now().naive_utc(),
        }
    }
}
