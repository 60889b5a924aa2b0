use chrono::Local;
use diesel::prelude::*;
use diesel::sqlite::Sqlite;
use pushkind_common::repository::errors::{RepositoryError, RepositoryResult};

use crate::{
    domain::payment::{NewPayment as DomainNewPayment, Payment as DomainPayment, PaymentListQuery},
    models::payment::{NewPayment as DbNewPayment, Payment as DbPayment},
    repository::{DieselRepository, PaymentReader, PaymentWriter, page_bounds},
    schema::{bookings, payments, product_orders},
};

fn filtered(query: &PaymentListQuery) -> payments::BoxedQuery<'static, Sqlite> {
    let mut boxed = payments::table
        .filter(payments::hub_id.eq(query.hub_id))
        .into_boxed::<Sqlite>();

    // Payments carry no branch; scope through the booking or the order they settle.
    if let Some(ids) = query.branch_ids.as_ref() {
        let scoped_bookings = bookings::table
            .filter(bookings::branch_id.eq_any(ids.clone()))
            .select(bookings::id.nullable());
        let scoped_orders = product_orders::table
            .filter(product_orders::branch_id.eq_any(ids.clone()))
            .select(product_orders::id.nullable());
        boxed = boxed.filter(
            payments::booking_id
                .eq_any(scoped_bookings)
                .or(payments::order_id.eq_any(scoped_orders)),
        );
    }

    if let Some(status) = query.status {
        boxed = boxed.filter(payments::status.eq(status.as_str()));
    }

    if let Some(booking_id) = query.booking_id {
        boxed = boxed.filter(payments::booking_id.eq(booking_id));
    }

    if let Some(from) = query.from {
        boxed = boxed.filter(payments::created_at.ge(from));
    }

    if let Some(to) = query.to {
        boxed = boxed.filter(payments::created_at.lt(to));
    }

    boxed
}

impl PaymentReader for DieselRepository {
    fn get_payment_by_id(&self, id: i32, hub_id: i32) -> RepositoryResult<Option<DomainPayment>> {
        let mut conn = self.conn()?;
        let payment = payments::table
            .filter(payments::id.eq(id))
            .filter(payments::hub_id.eq(hub_id))
            .first::<DbPayment>(&mut conn)
            .optional()?;

        Ok(payment.map(Into::into))
    }

    fn get_payment_by_gateway_reference(
        &self,
        reference: &str,
        hub_id: i32,
    ) -> RepositoryResult<Option<DomainPayment>> {
        let mut conn = self.conn()?;
        let payment = payments::table
            .filter(payments::gateway_reference.eq(reference))
            .filter(payments::hub_id.eq(hub_id))
            .first::<DbPayment>(&mut conn)
            .optional()?;

        Ok(payment.map(Into::into))
    }

    fn list_payments(
        &self,
        query: PaymentListQuery,
    ) -> RepositoryResult<(usize, Vec<DomainPayment>)> {
        let mut conn = self.conn()?;

        let total = filtered(&query).count().get_result::<i64>(&mut conn)? as usize;

        let mut items = filtered(&query).order((payments::created_at.desc(), payments::id.desc()));
        if let Some(pagination) = &query.pagination {
            let (offset, limit) = page_bounds(pagination.page, pagination.per_page);
            items = items.offset(offset).limit(limit);
        }

        let rows = items.load::<DbPayment>(&mut conn)?;
        Ok((total, rows.into_iter().map(Into::into).collect()))
    }
}

impl PaymentWriter for DieselRepository {
    fn create_payment(&self, new_payment: &DomainNewPayment) -> RepositoryResult<DomainPayment> {
        let mut conn = self.conn()?;
        let db_new = DbNewPayment::from(new_payment);

        let created = diesel::insert_into(payments::table)
            .values(&db_new)
            .get_result::<DbPayment>(&mut conn)?;

        Ok(created.into())
    }

    fn record_refund(
        &self,
        payment_id: i32,
        hub_id: i32,
        refund_cents: i32,
    ) -> RepositoryResult<DomainPayment> {
        let mut conn = self.conn()?;

        conn.transaction::<DomainPayment, RepositoryError, _>(|conn| {
            let target = payments::table
                .filter(payments::id.eq(payment_id))
                .filter(payments::hub_id.eq(hub_id));

            let current: DomainPayment = target
                .clone()
                .first::<DbPayment>(conn)
                .optional()?
                .ok_or(RepositoryError::NotFound)?
                .into();

            let status = current.status_after_refund(refund_cents);
            let refunded = (current.refunded_cents + refund_cents).min(current.amount_cents);

            let updated = diesel::update(target)
                .set((
                    payments::refunded_cents.eq(refunded),
                    payments::status.eq(status.as_str()),
                    payments::updated_at.eq(Local::now().naive_utc()),
                ))
                .get_result::<DbPayment>(conn)?;

            Ok(updated.into())
        })
    }
}
