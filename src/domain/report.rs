use chrono::NaiveDate;
use serde::Serialize;

use crate::domain::booking::BookingStatus;

/// Label shown instead of a date range when the report is empty.
pub const NO_DATA_PLACEHOLDER: &str = "No data for the selected period";

/// Number of bookings in one status.
#[derive(Debug, Serialize, Clone, PartialEq)]
pub struct StatusCount {
    pub status: BookingStatus,
    pub count: usize,
}

/// Aggregated figures of one branch.
#[derive(Debug, Serialize, Clone, PartialEq)]
pub struct BranchReportRow {
    pub branch_id: i32,
    pub branch_name: String,
    pub bookings: usize,
    pub completed: usize,
    /// Net collected revenue in the smallest currency unit.
    pub revenue_cents: i64,
    /// Revenue divided by completed bookings; `0` without completed bookings.
    pub average_ticket_cents: i64,
}

/// How often a service was booked.
#[derive(Debug, Serialize, Clone, PartialEq)]
pub struct ServiceUsage {
    pub service_id: i32,
    pub service_name: String,
    pub bookings: usize,
}

/// Summary of bookings and payments over a period.
#[derive(Debug, Serialize, Clone, PartialEq)]
pub struct Report {
    /// Human-readable span of the data, or [`NO_DATA_PLACEHOLDER`].
    pub period_label: String,
    pub first_date: Option<NaiveDate>,
    pub last_date: Option<NaiveDate>,
    pub total_bookings: usize,
    pub by_status: Vec<StatusCount>,
    pub revenue_cents: i64,
    pub refunded_cents: i64,
    pub branches: Vec<BranchReportRow>,
    pub top_services: Vec<ServiceUsage>,
}

impl Report {
    pub fn is_empty(&self) -> bool {
        self.first_date.is_none()
    }
}
