use std::str::FromStr;

use chrono::{Local, NaiveDateTime};
use pushkind_common::pagination::Pagination;
use serde::{Deserialize, Serialize};

/// Possible lifecycle states for a product order.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum OrderStatus {
    /// Order has been placed and awaits processing.
    #[default]
    Pending,
    /// Order is being prepared at the branch.
    Processing,
    /// Order has been handed over to the customer.
    Completed,
    /// Order has been cancelled and should not be processed further.
    Cancelled,
}

impl OrderStatus {
    pub const ALL: [OrderStatus; 4] = [
        OrderStatus::Pending,
        OrderStatus::Processing,
        OrderStatus::Completed,
        OrderStatus::Cancelled,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Processing => "processing",
            Self::Completed => "completed",
            Self::Cancelled => "cancelled",
        }
    }

    /// Whether an order in this state may move to `next`.
    pub fn can_transition_to(&self, next: OrderStatus) -> bool {
        matches!(
            (self, next),
            (Self::Pending, Self::Processing)
                | (Self::Pending, Self::Cancelled)
                | (Self::Processing, Self::Completed)
                | (Self::Processing, Self::Cancelled)
        )
    }

    /// States reachable from this one, in display order.
    pub fn next_statuses(&self) -> Vec<OrderStatus> {
        Self::ALL
            .into_iter()
            .filter(|next| self.can_transition_to(*next))
            .collect()
    }
}

impl FromStr for OrderStatus {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim() {
            "pending" => Ok(Self::Pending),
            "processing" => Ok(Self::Processing),
            "completed" => Ok(Self::Completed),
            "cancelled" => Ok(Self::Cancelled),
            other => Err(other.to_string()),
        }
    }
}

/// Line of a product order; name and price are copied at order time.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct OrderItem {
    pub product_id: Option<i32>,
    pub name: String,
    pub price_cents: i32,
    pub quantity: i32,
}

impl OrderItem {
    pub fn subtotal_cents(&self) -> i64 {
        i64::from(self.price_cents) * i64::from(self.quantity)
    }
}

/// Domain representation of a product order.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Order {
    pub id: i32,
    pub hub_id: i32,
    /// Branch where the order is picked up.
    pub branch_id: Option<i32>,
    pub customer_name: String,
    pub status: OrderStatus,
    /// Total amount represented in the smallest currency unit.
    pub total_cents: i32,
    pub currency: String,
    pub notes: Option<String>,
    pub items: Vec<OrderItem>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

/// Payload required to insert a new order with its items.
#[derive(Debug, Clone)]
pub struct NewOrder {
    pub hub_id: i32,
    pub branch_id: Option<i32>,
    pub customer_name: String,
    pub status: OrderStatus,
    pub currency: String,
    pub notes: Option<String>,
    pub items: Vec<OrderItem>,
    pub updated_at: NaiveDateTime,
}

impl NewOrder {
    pub fn new(hub_id: i32, customer_name: impl Into<String>, currency: impl Into<String>) -> Self {
        Self {
            hub_id,
            branch_id: None,
            customer_name: customer_name.into(),
            status: OrderStatus::default(),
            currency: currency.into(),
            notes: None,
            items: Vec::new(),
            updated_at: Local::now().naive_utc(),
        }
    }

    pub fn with_branch_id(mut self, branch_id: i32) -> Self {
        self.branch_id = Some(branch_id);
        self
    }

    pub fn with_item(mut self, item: OrderItem) -> Self {
        self.items.push(item);
        self
    }

    pub fn with_notes(mut self, notes: impl Into<String>) -> Self {
        self.notes = Some(notes.into());
        self
    }

    /// Order total derived from the items, saturated to the column range.
    pub fn total_cents(&self) -> i32 {
        let total: i64 = self.items.iter().map(OrderItem::subtotal_cents).sum();
        i32::try_from(total).unwrap_or(i32::MAX)
    }
}

/// Query definition used to list orders for a hub.
#[derive(Debug, Clone)]
pub struct OrderListQuery {
    pub hub_id: i32,
    /// Access-scope restriction; orders without a branch are platform-only.
    pub branch_ids: Option<Vec<i32>>,
    pub status: Option<OrderStatus>,
    /// Matches customer name or notes.
    pub search: Option<String>,
    pub pagination: Option<Pagination>,
}

impl OrderListQuery {
    pub fn new(hub_id: i32) -> Self {
        Self {
            hub_id,
            branch_ids: None,
            status: None,
            search: None,
            pagination: None,
        }
    }

    pub fn restrict_to(mut self, branch_ids: Option<Vec<i32>>) -> Self {
        self.branch_ids = branch_ids;
        self
    }

    pub fn status(mut self, status: OrderStatus) -> Self {
        self.status = Some(status);
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
