use chrono::{Days, NaiveDate, NaiveDateTime, NaiveTime};
use pushkind_common::repository::errors::RepositoryError;
use thiserror::Error;

use crate::gateway::GatewayError;
use crate::storage::StorageError;

pub mod access;
pub mod admins;
pub mod banners;
pub mod bookings;
pub mod branches;
pub mod franchises;
pub mod main;
pub mod offers;
pub mod orders;
pub mod payments;
pub mod product_categories;
pub mod products;
pub mod reports;
pub mod reviews;
pub mod wash_services;
pub mod washers;

/// Errors returned by the service layer and matched by the routes.
#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("unauthorized")]
    Unauthorized,
    #[error("not found")]
    NotFound,
    /// The request clashes with existing data; the message is shown to the user.
    #[error("conflict: {0}")]
    Conflict(String),
    /// Invalid user input; the message is shown to the user.
    #[error("{0}")]
    Form(String),
    #[error("repository error: {0}")]
    Repository(RepositoryError),
    #[error("payment gateway error: {0}")]
    Gateway(#[from] GatewayError),
    #[error("storage error: {0}")]
    Storage(#[from] StorageError),
    #[error("internal error: {0}")]
    Internal(String),
}

impl From<RepositoryError> for ServiceError {
    fn from(err: RepositoryError) -> Self {
        match err {
            RepositoryError::NotFound => ServiceError::NotFound,
            other => ServiceError::Repository(other),
        }
    }
}

pub type ServiceResult<T> = Result<T, ServiceError>;

/// Page and search parameters shared by the list pages.
#[derive(Debug, Default, Clone, serde::Deserialize)]
pub struct ListParams {
    pub search: Option<String>,
    pub page: Option<usize>,
}

impl ListParams {
    pub fn page(&self) -> usize {
        self.page.unwrap_or(1).max(1)
    }

    /// Trimmed, non-empty search term.
    pub fn search_term(&self) -> Option<&str> {
        self.search
            .as_deref()
            .map(str::trim)
            .filter(|term| !term.is_empty())
    }
}

/// Converts inclusive calendar days into a `[from, to)` timestamp range.
pub fn day_range(
    from: Option<NaiveDate>,
    to: Option<NaiveDate>,
) -> (Option<NaiveDateTime>, Option<NaiveDateTime>) {
    let start = from.map(|date| date.and_time(NaiveTime::MIN));
    let end = to
        .and_then(|date| date.checked_add_days(Days::new(1)))
        .map(|date| date.and_time(NaiveTime::MIN));
    (start, end)
}

/// Parses an optional `YYYY-MM-DD` query value, ignoring blanks and garbage.
pub fn query_date(value: Option<&str>) -> Option<NaiveDate> {
    value.and_then(crate::forms::parse_date)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn day_range_includes_the_last_day() {
        let from = NaiveDate::from_ymd_opt(2024, 5, 1);
        let to = NaiveDate::from_ymd_opt(2024, 5, 3);

        let (start, end) = day_range(from, to);

        assert_eq!(start.map(|value| value.to_string()).as_deref(), Some("2024-05-01 00:00:00"));
        assert_eq!(end.map(|value| value.to_string()).as_deref(), Some("2024-05-04 00:00:00"));
        assert_eq!(day_range(None, None), (None, None));
    }

    #[test]
    fn list_params_trim_search_and_clamp_page() {
        let params = ListParams {
            search: Some("   ".to_string()),
            page: Some(0),
        };

        assert_eq!(params.search_term(), None);
        assert_eq!(params.page(), 1);
        assert_eq!(query_date(Some("2024-02-30")), None);
    }
}
