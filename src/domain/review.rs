use chrono::{Local, NaiveDateTime};
use pushkind_common::pagination::Pagination;
use serde::{Deserialize, Serialize};

pub const MIN_RATING: i32 = 1;
pub const MAX_RATING: i32 = 5;

/// Customer review left for a completed booking.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Review {
    pub id: i32,
    pub hub_id: i32,
    /// Reviewed booking; at most one review per booking.
    pub booking_id: i32,
    /// Star rating between 1 and 5.
    pub rating: i32,
    pub comment: Option<String>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

#[derive(Debug, Clone)]
pub struct NewReview {
    pub hub_id: i32,
    pub booking_id: i32,
    pub rating: i32,
    pub comment: Option<String>,
    pub updated_at: NaiveDateTime,
}

impl NewReview {
    pub fn new(hub_id: i32, booking_id: i32, rating: i32) -> Self {
        Self {
            hub_id,
            booking_id,
            rating,
            comment: None,
            updated_at: Local::now().naive_utc(),
        }
    }

    pub fn with_comment(mut self, comment: impl Into<String>) -> Self {
        self.comment = Some(comment.into());
        self
    }
}

/// Query definition used to list reviews.
#[derive(Debug, Clone)]
pub struct ReviewListQuery {
    pub hub_id: i32,
    /// Access-scope restriction applied through the booking branch.
    pub branch_ids: Option<Vec<i32>>,
    /// Limits results to reviews of these bookings.
    pub booking_ids: Option<Vec<i32>>,
    pub min_rating: Option<i32>,
    pub max_rating: Option<i32>,
    pub pagination: Option<Pagination>,
}

impl ReviewListQuery {
    pub fn new(hub_id: i32) -> Self {
        Self {
            hub_id,
            branch_ids: None,
            booking_ids: None,
            min_rating: None,
            max_rating: None,
            pagination: None,
        }
    }

    pub fn restrict_to(mut self, branch_ids: Option<Vec<i32>>) -> Self {
        self.branch_ids = branch_ids;
        self
    }

    pub fn bookings(mut self, booking_ids: Vec<i32>) -> Self {
        self.booking_ids = Some(booking_ids);
        self
    }

    pub fn rating_between(mut self, min_rating: Option<i32>, max_rating: Option<i32>) -> Self {
        self.min_rating = min_rating;
        self.max_rating = max_rating;
        self
    }

    pub fn paginate(mut self, page: usize, per_page: usize) -> Self {
        self.pagination = Some(Pagination { page, per_page });
        self
    }
}

/// Arithmetic mean of the ratings rounded to one decimal; `0.0` when empty.
pub fn average_rating(ratings: &[i32]) -> f64 {
    if ratings.is_empty() {
        return 0.0;
    }

    let sum: i64 = ratings.iter().map(|rating| i64::from(*rating)).sum();
    let mean = sum as f64 / ratings.len() as f64;
    (mean * 10.0).round() / 10.0
}
