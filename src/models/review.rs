use chrono::NaiveDateTime;
use diesel::prelude::*;

use crate::domain::review::{NewReview as DomainNewReview, Review as DomainReview};

#[derive(Debug, Clone, Identifiable, Queryable, Selectable)]
#[diesel(table_name = crate::schema::reviews)]
pub struct Review {
    pub id: i32,
    pub hub_id: i32,
    pub booking_id: i32,
    pub rating: i32,
    pub comment: Option<String>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

#[derive(Insertable)]
#[diesel(table_name = crate::schema::reviews)]
pub struct NewReview<'a> {
    pub hub_id: i32,
    pub booking_id: i32,
    pub rating: i32,
    pub comment: Option<&'a str>,
    pub updated_at: NaiveDateTime,
}

impl From<Review> for DomainReview {
    fn from(value: Review) -> Self {
        Self {
            id: value.id,
            hub_id: value.hub_id,
            booking_id: value.booking_id,
            rating: value.rating,
            comment: value.comment,
            created_at: value.created_at,
            updated_at: value.updated_at,
        }
    }
}

impl<'a> From<&'a DomainNewReview> for NewReview<'a> {
    fn from(value: &'a DomainNewReview) -> Self {
        Self {
            hub_id: value.hub_id,
            booking_id: value.booking_id,
            rating: value.rating,
            comment: value.comment.as_deref(),
            updated_at: value.updated_at,
        }
    }
}
