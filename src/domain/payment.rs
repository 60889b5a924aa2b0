use std::str::FromStr;

use chrono::{Local, NaiveDateTime};
use pushkind_common::pagination::Pagination;
use serde::{Deserialize, Serialize};

/// How the customer paid.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum PaymentMethod {
    #[default]
    Cash,
    Card,
    /// Paid through the payment gateway; `gateway_reference` holds the intent id.
    Online,
}

impl PaymentMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Cash => "cash",
            Self::Card => "card",
            Self::Online => "online",
        }
    }
}

impl FromStr for PaymentMethod {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim() {
            "cash" => Ok(Self::Cash),
            "card" => Ok(Self::Card),
            "online" => Ok(Self::Online),
            other => Err(other.to_string()),
        }
    }
}

/// Settlement state of a payment.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum PaymentStatus {
    #[default]
    Pending,
    Succeeded,
    Failed,
    Refunded,
    PartiallyRefunded,
}

impl PaymentStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Succeeded => "succeeded",
            Self::Failed => "failed",
            Self::Refunded => "refunded",
            Self::PartiallyRefunded => "partially_refunded",
        }
    }

    /// Whether money was collected at some point.
    pub fn is_collected(&self) -> bool {
        matches!(
            self,
            Self::Succeeded | Self::Refunded | Self::PartiallyRefunded
        )
    }
}

impl FromStr for PaymentStatus {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim() {
            "pending" => Ok(Self::Pending),
            "succeeded" => Ok(Self::Succeeded),
            "failed" => Ok(Self::Failed),
            "refunded" => Ok(Self::Refunded),
            "partially_refunded" => Ok(Self::PartiallyRefunded),
            other => Err(other.to_string()),
        }
    }
}

/// Domain representation of a payment for a booking or a product order.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Payment {
    pub id: i32,
    pub hub_id: i32,
    pub booking_id: Option<i32>,
    pub order_id: Option<i32>,
    /// Charged amount in the smallest currency unit.
    pub amount_cents: i32,
    /// Sum of all refunds issued against this payment.
    pub refunded_cents: i32,
    pub currency: String,
    pub method: PaymentMethod,
    pub status: PaymentStatus,
    /// Payment intent identifier at the gateway for online payments.
    pub gateway_reference: Option<String>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

impl Payment {
    /// Amount still refundable.
    pub fn remaining_cents(&self) -> i32 {
        (self.amount_cents - self.refunded_cents).max(0)
    }

    /// Revenue retained from this payment.
    pub fn net_cents(&self) -> i64 {
        if self.status.is_collected() {
            i64::from(self.remaining_cents())
        } else {
            0
        }
    }

    /// Status after refunding `refund_cents` more.
    pub fn status_after_refund(&self, refund_cents: i32) -> PaymentStatus {
        if self.refunded_cents + refund_cents >= self.amount_cents {
            PaymentStatus::Refunded
        } else {
            PaymentStatus::PartiallyRefunded
        }
    }
}

/// Payload required to record a new payment.
#[derive(Debug, Clone)]
pub struct NewPayment {
    pub hub_id: i32,
    pub booking_id: Option<i32>,
    pub order_id: Option<i32>,
    pub amount_cents: i32,
    pub currency: String,
    pub method: PaymentMethod,
    pub status: PaymentStatus,
    pub gateway_reference: Option<String>,
    pub updated_at: NaiveDateTime,
}

impl NewPayment {
    pub fn new(
        hub_id: i32,
        amount_cents: i32,
        currency: impl Into<String>,
        method: PaymentMethod,
    ) -> Self {
        Self {
            hub_id,
            booking_id: None,
            order_id: None,
            amount_cents,
            currency: currency.into(),
            method,
            status: PaymentStatus::default(),
            gateway_reference: None,
            updated_at: Local::now().naive_utc(),
        }
    }

    pub fn for_booking(mut self, booking_id: i32) -> Self {
        self.booking_id = Some(booking_id);
        self
    }

    pub fn for_order(mut self, order_id: i32) -> Self {
        self.order_id = Some(order_id);
        self
    }

    pub fn with_status(mut self, status: PaymentStatus) -> Self {
        self.status = status;
        self
    }

    pub fn with_gateway_reference(mut self, reference: impl Into<String>) -> Self {
        self.gateway_reference = Some(reference.into());
        self
    }
}

/// Query definition used to list payments.
#[derive(Debug, Clone)]
pub struct PaymentListQuery {
    pub hub_id: i32,
    /// Access-scope restriction applied through the booking or order branch.
    pub branch_ids: Option<Vec<i32>>,
    pub status: Option<PaymentStatus>,
    pub booking_id: Option<i32>,
    /// Inclusive lower bound on `created_at`.
    pub from: Option<NaiveDateTime>,
    /// Exclusive upper bound on `created_at`.
    pub to: Option<NaiveDateTime>,
    pub pagination: Option<Pagination>,
}

impl PaymentListQuery {
    pub fn new(hub_id: i32) -> Self {
        Self {
            hub_id,
            branch_ids: None,
            status: None,
            booking_id: None,
            from: None,
            to: None,
            pagination: None,
        }
    }

    pub fn restrict_to(mut self, branch_ids: Option<Vec<i32>>) -> Self {
        self.branch_ids = branch_ids;
        self
    }

    pub fn status(mut self, status: PaymentStatus) -> Self {
        self.status = Some(status);
        self
    }

    pub fn booking(mut self, booking_id: i32) -> Self {
        self.booking_id = Some(booking_id);
        self
    }

    pub fn between(mut self, from: Option<NaiveDateTime>, to: Option<NaiveDateTime>) -> Self {
        self.from = from;
        self.to = to;
        self
    }

    pub fn paginate(mut self, page: usize, per_page: usize) -> Self {
        self.pagination = Some(Pagination { page, per_page });
        self
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;

    fn payment(amount_cents: i32, refunded_cents: i32, status: PaymentStatus) -> Payment {
        let timestamp = NaiveDate::from_ymd_opt(2024, 5, 1)
            .and_then(|date| date.and_hms_opt(10, 0, 0))
            .unwrap_or_default();
        Payment {
            id: 1,
            hub_id: 1,
            booking_id: Some(1),
            order_id: None,
            amount_cents,
            refunded_cents,
            currency: "USD".to_string(),
            method: PaymentMethod::Online,
            status,
            gateway_reference: Some("pi_1".to_string()),
            created_at: timestamp,
            updated_at: timestamp,
        }
    }

    #[test]
    fn net_amount_ignores_uncollected_payments() {
        assert_eq!(payment(1000, 0, PaymentStatus::Succeeded).net_cents(), 1000);
        assert_eq!(payment(1000, 250, PaymentStatus::PartiallyRefunded).net_cents(), 750);
        assert_eq!(payment(1000, 1000, PaymentStatus::Refunded).net_cents(), 0);
        assert_eq!(payment(1000, 0, PaymentStatus::Pending).net_cents(), 0);
        assert_eq!(payment(1000, 0, PaymentStatus::Failed).net_cents(), 0);
    }

    #[test]
    fn refund_status_depends_on_remaining_amount() {
        let paid = payment(1000, 200, PaymentStatus::PartiallyRefunded);

        assert_eq!(paid.remaining_cents(), 800);
        assert_eq!(paid.status_after_refund(300), PaymentStatus::PartiallyRefunded);
        assert_eq!(paid.status_after_refund(800), PaymentStatus::Refunded);
    }
}
