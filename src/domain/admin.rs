use std::str::FromStr;

use chrono::{Local, NaiveDateTime};
use pushkind_common::pagination::Pagination;
use serde::{Deserialize, Serialize};

/// Kind of scoped administrator stored in the `admins` table.
///
/// Platform administrators are identified purely by their auth-service role
/// and have no row here.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum AdminRole {
    #[default]
    Branch,
    Franchise,
}

impl AdminRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Branch => "branch",
            Self::Franchise => "franchise",
        }
    }
}

impl FromStr for AdminRole {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim() {
            "branch" => Ok(Self::Branch),
            "franchise" => Ok(Self::Franchise),
            other => Err(other.to_string()),
        }
    }
}

/// Domain representation of a franchise or branch administrator.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Admin {
    pub id: i32,
    pub hub_id: i32,
    /// Lowercased email matched against the authenticated user.
    pub email: String,
    pub name: String,
    pub role: AdminRole,
    /// Franchise managed by a franchise administrator.
    pub franchise_id: Option<i32>,
    /// Branches assigned to a branch administrator.
    pub branch_ids: Vec<i32>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

/// Payload required to insert a new administrator.
#[derive(Debug, Clone)]
pub struct NewAdmin {
    pub hub_id: i32,
    pub email: String,
    pub name: String,
    pub role: AdminRole,
    pub franchise_id: Option<i32>,
    pub branch_ids: Vec<i32>,
    pub updated_at: NaiveDateTime,
}

impl NewAdmin {
    /// Build a franchise administrator payload.
    pub fn franchise(
        hub_id: i32,
        email: impl Into<String>,
        name: impl Into<String>,
        franchise_id: i32,
    ) -> Self {
        Self {
            hub_id,
            email: email.into().to_lowercase(),
            name: name.into(),
            role: AdminRole::Franchise,
            franchise_id: Some(franchise_id),
            branch_ids: Vec::new(),
            updated_at: Local::now().naive_utc(),
        }
    }

    /// Build a branch administrator payload.
    pub fn branch(
        hub_id: i32,
        email: impl Into<String>,
        name: impl Into<String>,
        branch_ids: Vec<i32>,
    ) -> Self {
        Self {
            hub_id,
            email: email.into().to_lowercase(),
            name: name.into(),
            role: AdminRole::Branch,
            franchise_id: None,
            branch_ids,
            updated_at: Local::now().naive_utc(),
        }
    }
}

/// Query definition used to list administrators of a hub.
#[derive(Debug, Clone)]
pub struct AdminListQuery {
    pub hub_id: i32,
    pub role: Option<AdminRole>,
    /// Matches name or email.
    pub search: Option<String>,
    pub pagination: Option<Pagination>,
}

impl AdminListQuery {
    pub fn new(hub_id: i32) -> Self {
        Self {
            hub_id,
            role: None,
            search: None,
            pagination: None,
        }
    }

    pub fn role(mut self, role: AdminRole) -> Self {
        self.role = Some(role);
        self
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
