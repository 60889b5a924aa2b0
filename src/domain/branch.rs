use chrono::{Local, NaiveDateTime};
use pushkind_common::pagination::Pagination;
use serde::{Deserialize, Serialize};

/// Domain representation of a car-wash branch.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Branch {
    /// Unique identifier of the branch.
    pub id: i32,
    /// Owning hub identifier.
    pub hub_id: i32,
    /// Franchise the branch belongs to; `None` for company-owned branches.
    pub franchise_id: Option<i32>,
    /// Display name, unique within the hub.
    pub name: String,
    /// Street address shown to customers.
    pub address: String,
    /// Optional contact phone.
    pub phone: Option<String>,
    /// Opening time in `HH:MM` format.
    pub opening_time: String,
    /// Closing time in `HH:MM` format.
    pub closing_time: String,
    /// Public URL of the branch photo.
    pub image_url: Option<String>,
    /// Average review rating rounded to one decimal, `0.0` without reviews.
    pub rating: f64,
    /// Inactive branches stop accepting bookings.
    pub is_active: bool,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

/// Payload required to insert a new branch.
#[derive(Debug, Clone)]
pub struct NewBranch {
    pub hub_id: i32,
    pub franchise_id: Option<i32>,
    pub name: String,
    pub address: String,
    pub phone: Option<String>,
    pub opening_time: String,
    pub closing_time: String,
    pub updated_at: NaiveDateTime,
}

impl NewBranch {
    /// Build a new branch payload with the supplied working hours.
    pub fn new(
        hub_id: i32,
        name: impl Into<String>,
        address: impl Into<String>,
        opening_time: impl Into<String>,
        closing_time: impl Into<String>,
    ) -> Self {
        Self {
            hub_id,
            franchise_id: None,
            name: name.into(),
            address: address.into(),
            phone: None,
            opening_time: opening_time.into(),
            closing_time: closing_time.into(),
            updated_at: Local::now().naive_utc(),
        }
    }

    pub fn with_franchise_id(mut self, franchise_id: i32) -> Self {
        self.franchise_id = Some(franchise_id);
        self
    }

    pub fn with_phone(mut self, phone: impl Into<String>) -> Self {
        self.phone = Some(phone.into());
        self
    }
}

/// Full replacement of the editable branch fields.
#[derive(Debug, Clone)]
pub struct UpdateBranch {
    pub franchise_id: Option<i32>,
    pub name: String,
    pub address: String,
    pub phone: Option<String>,
    pub opening_time: String,
    pub closing_time: String,
    pub is_active: bool,
    pub updated_at: NaiveDateTime,
}

/// Query definition used to list branches.
#[derive(Debug, Clone)]
pub struct BranchListQuery {
    pub hub_id: i32,
    /// Restricts results to these branches; `None` leaves the hub unrestricted.
    pub branch_ids: Option<Vec<i32>>,
    pub franchise_id: Option<i32>,
    /// Substring search over name and address.
    pub search: Option<String>,
    pub include_inactive: bool,
    pub pagination: Option<Pagination>,
}

impl BranchListQuery {
    pub fn new(hub_id: i32) -> Self {
        Self {
            hub_id,
            branch_ids: None,
            franchise_id: None,
            search: None,
            include_inactive: true,
            pagination: None,
        }
    }

    /// Apply an access-scope restriction when one is present.
    pub fn restrict_to(mut self, branch_ids: Option<Vec<i32>>) -> Self {
        self.branch_ids = branch_ids;
        self
    }

    pub fn franchise(mut self, franchise_id: i32) -> Self {
        self.franchise_id = Some(franchise_id);
        self
    }

    pub fn active_only(mut self) -> Self {
        self.include_inactive = false;
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
