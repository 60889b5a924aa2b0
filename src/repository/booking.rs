use diesel::prelude::*;
use diesel::sqlite::Sqlite;
use pushkind_common::repository::errors::{RepositoryError, RepositoryResult};

use crate::{
    domain::booking::{
        Booking as DomainBooking, BookingListQuery, NewBooking as DomainNewBooking,
        UpdateBooking as DomainUpdateBooking,
    },
    models::booking::{
        Booking as DbBooking, NewBooking as DbNewBooking, UpdateBooking as DbUpdateBooking,
    },
    repository::{BookingReader, BookingWriter, DieselRepository, page_bounds},
    schema::{bookings, payments, reviews},
};

fn filtered(query: &BookingListQuery) -> bookings::BoxedQuery<'static, Sqlite> {
    let mut boxed = bookings::table
        .filter(bookings::hub_id.eq(query.hub_id))
        .into_boxed::<Sqlite>();

    if let Some(ids) = query.branch_ids.as_ref() {
        boxed = boxed.filter(bookings::branch_id.eq_any(ids.clone()));
    }

    if let Some(branch_id) = query.branch_id {
        boxed = boxed.filter(bookings::branch_id.eq(branch_id));
    }

    if let Some(status) = query.status {
        boxed = boxed.filter(bookings::status.eq(status.as_str()));
    }

    if let Some(from) = query.from {
        boxed = boxed.filter(bookings::scheduled_at.ge(from));
    }

    if let Some(to) = query.to {
        boxed = boxed.filter(bookings::scheduled_at.lt(to));
    }

    if let Some(term) = query.search.as_ref() {
        let pattern = format!("%{}%", term);
        boxed = boxed.filter(
            bookings::customer_name
                .like(pattern.clone())
                .or(bookings::customer_phone.like(pattern.clone()))
                .or(bookings::car_plate.like(pattern)),
        );
    }

    boxed
}

impl BookingReader for DieselRepository {
    fn get_booking_by_id(&self, id: i32, hub_id: i32) -> RepositoryResult<Option<DomainBooking>> {
        let mut conn = self.conn()?;
        let booking = bookings::table
            .filter(bookings::id.eq(id))
            .filter(bookings::hub_id.eq(hub_id))
            .first::<DbBooking>(&mut conn)
            .optional()?;

        Ok(booking.map(Into::into))
    }

    fn list_bookings(
        &self,
        query: BookingListQuery,
    ) -> RepositoryResult<(usize, Vec<DomainBooking>)> {
        let mut conn = self.conn()?;

        let total = filtered(&query).count().get_result::<i64>(&mut conn)? as usize;

        let mut items = filtered(&query).order((bookings::scheduled_at.desc(), bookings::id.desc()));
        if let Some(pagination) = &query.pagination {
            let (offset, limit) = page_bounds(pagination.page, pagination.per_page);
            items = items.offset(offset).limit(limit);
        }

        let rows = items.load::<DbBooking>(&mut conn)?;
        Ok((total, rows.into_iter().map(Into::into).collect()))
    }
}

impl BookingWriter for DieselRepository {
    fn create_booking(&self, new_booking: &DomainNewBooking) -> RepositoryResult<DomainBooking> {
        let mut conn = self.conn()?;
        let db_new = DbNewBooking::from(new_booking);

        let created = diesel::insert_into(bookings::table)
            .values(&db_new)
            .get_result::<DbBooking>(&mut conn)?;

        Ok(created.into())
    }

    fn update_booking(
        &self,
        booking_id: i32,
        hub_id: i32,
        updates: &DomainUpdateBooking,
    ) -> RepositoryResult<DomainBooking> {
        let mut conn = self.conn()?;
        let db_updates = DbUpdateBooking::from(updates);

        let target = bookings::table
            .filter(bookings::id.eq(booking_id))
            .filter(bookings::hub_id.eq(hub_id));

        let updated = diesel::update(target)
            .set(&db_updates)
            .get_result::<DbBooking>(&mut conn)?;

        Ok(updated.into())
    }

    fn delete_booking(&self, booking_id: i32, hub_id: i32) -> RepositoryResult<()> {
        let mut conn = self.conn()?;

        conn.transaction::<(), RepositoryError, _>(|conn| {
            let target = bookings::table
                .filter(bookings::id.eq(booking_id))
                .filter(bookings::hub_id.eq(hub_id));

            let exists = target
                .clone()
                .select(bookings::id)
                .first::<i32>(conn)
                .optional()?;
            if exists.is_none() {
                return Err(RepositoryError::NotFound);
            }

            // Payments outlive the booking they were collected for.
            diesel::update(payments::table.filter(payments::booking_id.eq(booking_id)))
                .set(payments::booking_id.eq(None::<i32>))
                .execute(conn)?;
            diesel::delete(reviews::table.filter(reviews::booking_id.eq(booking_id)))
                .execute(conn)?;
            diesel::delete(target).execute(conn)?;

            Ok(())
        })
    }
}
