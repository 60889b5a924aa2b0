use diesel::prelude::*;
use diesel::sqlite::Sqlite;
use pushkind_common::repository::errors::{RepositoryError, RepositoryResult};

use crate::{
    domain::review::{NewReview as DomainNewReview, Review as DomainReview, ReviewListQuery},
    models::review::{NewReview as DbNewReview, Review as DbReview},
    repository::{DieselRepository, ReviewReader, ReviewWriter, page_bounds},
    schema::{bookings, reviews},
};

fn filtered(query: &ReviewListQuery) -> reviews::BoxedQuery<'static, Sqlite> {
    let mut boxed = reviews::table
        .filter(reviews::hub_id.eq(query.hub_id))
        .into_boxed::<Sqlite>();

    if let Some(ids) = query.branch_ids.as_ref() {
        let scoped_bookings = bookings::table
            .filter(bookings::branch_id.eq_any(ids.clone()))
            .select(bookings::id);
        boxed = boxed.filter(reviews::booking_id.eq_any(scoped_bookings));
    }

    if let Some(ids) = query.booking_ids.as_ref() {
        boxed = boxed.filter(reviews::booking_id.eq_any(ids.clone()));
    }

    if let Some(min_rating) = query.min_rating {
        boxed = boxed.filter(reviews::rating.ge(min_rating));
    }

    if let Some(max_rating) = query.max_rating {
        boxed = boxed.filter(reviews::rating.le(max_rating));
    }

    boxed
}

impl ReviewReader for DieselRepository {
    fn get_review_by_id(&self, id: i32, hub_id: i32) -> RepositoryResult<Option<DomainReview>> {
        let mut conn = self.conn()?;
        let review = reviews::table
            .filter(reviews::id.eq(id))
            .filter(reviews::hub_id.eq(hub_id))
            .first::<DbReview>(&mut conn)
            .optional()?;

        Ok(review.map(Into::into))
    }

    fn get_review_by_booking(
        &self,
        booking_id: i32,
        hub_id: i32,
    ) -> RepositoryResult<Option<DomainReview>> {
        let mut conn = self.conn()?;
        let review = reviews::table
            .filter(reviews::booking_id.eq(booking_id))
            .filter(reviews::hub_id.eq(hub_id))
            .first::<DbReview>(&mut conn)
            .optional()?;

        Ok(review.map(Into::into))
    }

    fn list_reviews(&self, query: ReviewListQuery) -> RepositoryResult<(usize, Vec<DomainReview>)> {
        let mut conn = self.conn()?;

        let total = filtered(&query).count().get_result::<i64>(&mut conn)? as usize;

        let mut items = filtered(&query).order((reviews::created_at.desc(), reviews::id.desc()));
        if let Some(pagination) = &query.pagination {
            let (offset, limit) = page_bounds(pagination.page, pagination.per_page);
            items = items.offset(offset).limit(limit);
        }

        let rows = items.load::<DbReview>(&mut conn)?;
        Ok((total, rows.into_iter().map(Into::into).collect()))
    }
}

impl ReviewWriter for DieselRepository {
    fn create_review(&self, new_review: &DomainNewReview) -> RepositoryResult<DomainReview> {
        let mut conn = self.conn()?;
        let db_new = DbNewReview::from(new_review);

        let created = diesel::insert_into(reviews::table)
            .values(&db_new)
            .get_result::<DbReview>(&mut conn)?;

        Ok(created.into())
    }

    fn delete_review(&self, review_id: i32, hub_id: i32) -> RepositoryResult<()> {
        let mut conn = self.conn()?;

        let target = reviews::table
            .filter(reviews::id.eq(review_id))
            .filter(reviews::hub_id.eq(hub_id));

        let deleted = diesel::delete(target).execute(&mut conn)?;
        if deleted == 0 {
            return Err(RepositoryError::NotFound);
        }

        Ok(())
    }
}
