use chrono::{Local, NaiveDateTime};
use serde::{Deserialize, Serialize};

/// A wash service offered by a branch (e.g. "Exterior wash").
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct WashService {
    pub id: i32,
    pub hub_id: i32,
    /// Branch offering the service.
    pub branch_id: i32,
    pub name: String,
    pub description: Option<String>,
    /// Price in the smallest currency unit.
    pub price_cents: i32,
    /// Expected duration used when scheduling bookings.
    pub duration_minutes: i32,
    pub is_active: bool,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

/// Payload required to insert a new wash service.
#[derive(Debug, Clone)]
pub struct NewWashService {
    pub hub_id: i32,
    pub branch_id: i32,
    pub name: String,
    pub description: Option<String>,
    pub price_cents: i32,
    pub duration_minutes: i32,
    pub updated_at: NaiveDateTime,
}

impl NewWashService {
    pub fn new(
        hub_id: i32,
        branch_id: i32,
        name: impl Into<String>,
        price_cents: i32,
        duration_minutes: i32,
    ) -> Self {
        Self {
            hub_id,
            branch_id,
            name: name.into(),
            description: None,
            price_cents,
            duration_minutes,
            updated_at: Local::now().naive_utc(),
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}

/// Full replacement of the editable service fields.
#[derive(Debug, Clone)]
pub struct UpdateWashService {
    pub name: String,
    pub description: Option<String>,
    pub price_cents: i32,
    pub duration_minutes: i32,
    pub is_active: bool,
    pub updated_at: NaiveDateTime,
}

/// Query definition used to list services.
#[derive(Debug, Clone)]
pub struct WashServiceListQuery {
    pub hub_id: i32,
    /// Access-scope restriction; `None` leaves the hub unrestricted.
    pub branch_ids: Option<Vec<i32>>,
    pub branch_id: Option<i32>,
    pub include_inactive: bool,
}

impl WashServiceListQuery {
    pub fn new(hub_id: i32) -> Self {
        Self {
            hub_id,
            branch_ids: None,
            branch_id: None,
            include_inactive: true,
        }
    }

    pub fn restrict_to(mut self, branch_ids: Option<Vec<i32>>) -> Self {
        self.branch_ids = branch_ids;
        self
    }

    pub fn branch(mut self, branch_id: i32) -> Self {
        self.branch_id = Some(branch_id);
        self
    }

    pub fn active_only(mut self) -> Self {
        self.include_inactive = false;
        self
    }
}
