use chrono::{Local, NaiveDateTime};
use pushkind_common::pagination::Pagination;
use serde::{Deserialize, Serialize};

/// Domain representation of a franchise grouping several branches.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Franchise {
    /// Unique identifier of the franchise.
    pub id: i32,
    /// Owning hub identifier.
    pub hub_id: i32,
    /// Display name, unique within the hub.
    pub name: String,
    /// Optional free-form description.
    pub description: Option<String>,
    /// Optional contact email of the franchisee.
    pub contact_email: Option<String>,
    /// Optional contact phone of the franchisee.
    pub contact_phone: Option<String>,
    /// Inactive franchises are kept for history but hidden from pickers.
    pub is_active: bool,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

/// Payload required to insert a new franchise.
#[derive(Debug, Clone)]
pub struct NewFranchise {
    pub hub_id: i32,
    pub name: String,
    pub description: Option<String>,
    pub contact_email: Option<String>,
    pub contact_phone: Option<String>,
    pub updated_at: NaiveDateTime,
}

impl NewFranchise {
    /// Build a new franchise payload with the current timestamp.
    pub fn new(hub_id: i32, name: impl Into<String>) -> Self {
        Self {
            hub_id,
            name: name.into(),
            description: None,
            contact_email: None,
            contact_phone: None,
            updated_at: Local::now().naive_utc(),
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_contact_email(mut self, email: impl Into<String>) -> Self {
        self.contact_email = Some(email.into());
        self
    }

    pub fn with_contact_phone(mut self, phone: impl Into<String>) -> Self {
        self.contact_phone = Some(phone.into());
        self
    }
}

/// Full replacement of the editable franchise fields.
#[derive(Debug, Clone)]
pub struct UpdateFranchise {
    pub name: String,
    /// `None` clears the stored value.
    pub description: Option<String>,
    pub contact_email: Option<String>,
    pub contact_phone: Option<String>,
    pub is_active: bool,
    pub updated_at: NaiveDateTime,
}

/// Query definition used to list franchises of a hub.
#[derive(Debug, Clone)]
pub struct FranchiseListQuery {
    pub hub_id: i32,
    /// Optional substring search applied to the name.
    pub search: Option<String>,
    pub pagination: Option<Pagination>,
}

impl FranchiseListQuery {
    pub fn new(hub_id: i32) -> Self {
        Self {
            hub_id,
            search: None,
            pagination: None,
        }
    }

    pub fn search(mut self, term: impl Into<String>) -> Self {
        self.search = Some(term.into());
        self
    }

    pub fn paginate(mut self, page: usize, per_page: usize) -> Self {
        self.pagination = Some(Pagination { page, per_page });
        self
    }
}
