use std::collections::HashMap;

use chrono::Local;
use diesel::prelude::*;
use diesel::sqlite::{Sqlite, SqliteConnection};
use pushkind_common::repository::errors::{RepositoryError, RepositoryResult};

use crate::{
    domain::order::{NewOrder as DomainNewOrder, Order as DomainOrder, OrderListQuery, OrderStatus},
    models::order::{
        NewOrder as DbNewOrder, NewOrderItem as DbNewOrderItem, Order as DbOrder,
        OrderItem as DbOrderItem,
    },
    repository::{DieselRepository, OrderReader, OrderWriter, page_bounds},
    schema::{order_items, product_orders},
};

fn filtered(query: &OrderListQuery) -> product_orders::BoxedQuery<'static, Sqlite> {
    let mut boxed = product_orders::table
        .filter(product_orders::hub_id.eq(query.hub_id))
        .into_boxed::<Sqlite>();

    if let Some(ids) = query.branch_ids.as_ref() {
        boxed = boxed.filter(product_orders::branch_id.eq_any(ids.clone()));
    }

    if let Some(status) = query.status {
        boxed = boxed.filter(product_orders::status.eq(status.as_str()));
    }

    if let Some(term) = query.search.as_ref() {
        let pattern = format!("%{}%", term);
        boxed = boxed.filter(
            product_orders::customer_name
                .like(pattern.clone())
                .or(product_orders::notes.like(pattern)),
        );
    }

    boxed
}

fn load_items(
    conn: &mut SqliteConnection,
    order_ids: &[i32],
) -> RepositoryResult<HashMap<i32, Vec<DbOrderItem>>> {
    let mut items_by_order: HashMap<i32, Vec<DbOrderItem>> = HashMap::new();
    if order_ids.is_empty() {
        return Ok(items_by_order);
    }

    let rows = order_items::table
        .filter(order_items::order_id.eq_any(order_ids))
        .order(order_items::id.asc())
        .load::<DbOrderItem>(conn)?;

    for item in rows {
        items_by_order.entry(item.order_id).or_default().push(item);
    }

    Ok(items_by_order)
}

fn with_items(conn: &mut SqliteConnection, order: DbOrder) -> RepositoryResult<DomainOrder> {
    let mut items = load_items(conn, &[order.id])?;
    let rows = items.remove(&order.id).unwrap_or_default();
    Ok(DomainOrder::from((order, rows)))
}

impl OrderReader for DieselRepository {
    fn get_order_by_id(&self, id: i32, hub_id: i32) -> RepositoryResult<Option<DomainOrder>> {
        let mut conn = self.conn()?;
        let order = product_orders::table
            .filter(product_orders::id.eq(id))
            .filter(product_orders::hub_id.eq(hub_id))
            .first::<DbOrder>(&mut conn)
            .optional()?;

        let Some(order) = order else {
            return Ok(None);
        };

        Ok(Some(with_items(&mut conn, order)?))
    }

    fn list_orders(&self, query: OrderListQuery) -> RepositoryResult<(usize, Vec<DomainOrder>)> {
        let mut conn = self.conn()?;

        let total = filtered(&query).count().get_result::<i64>(&mut conn)? as usize;

        let mut items = filtered(&query).order(product_orders::created_at.desc());
        if let Some(pagination) = &query.pagination {
            let (offset, limit) = page_bounds(pagination.page, pagination.per_page);
            items = items.offset(offset).limit(limit);
        }

        let db_orders = items.load::<DbOrder>(&mut conn)?;
        if db_orders.is_empty() {
            return Ok((total, Vec::new()));
        }

        let order_ids: Vec<i32> = db_orders.iter().map(|order| order.id).collect();
        let mut items_by_order = load_items(&mut conn, &order_ids)?;

        let orders = db_orders
            .into_iter()
            .map(|order| {
                let rows = items_by_order.remove(&order.id).unwrap_or_default();
                DomainOrder::from((order, rows))
            })
            .collect();

        Ok((total, orders))
    }
}

impl OrderWriter for DieselRepository {
    fn create_order(&self, new_order: &DomainNewOrder) -> RepositoryResult<DomainOrder> {
        let mut conn = self.conn()?;
        let db_new = DbNewOrder::from(new_order);

        conn.transaction::<DomainOrder, RepositoryError, _>(|conn| {
            let created = diesel::insert_into(product_orders::table)
                .values(&db_new)
                .get_result::<DbOrder>(conn)?;

            let rows: Vec<DbNewOrderItem> = new_order
                .items
                .iter()
                .map(|item| DbNewOrderItem::from_domain(created.id, item))
                .collect();

            if !rows.is_empty() {
                diesel::insert_into(order_items::table)
                    .values(&rows)
                    .execute(conn)?;
            }

            with_items(conn, created)
        })
    }

    fn update_order_status(
        &self,
        order_id: i32,
        hub_id: i32,
        status: OrderStatus,
    ) -> RepositoryResult<DomainOrder> {
        let mut conn = self.conn()?;

        let target = product_orders::table
            .filter(product_orders::id.eq(order_id))
            .filter(product_orders::hub_id.eq(hub_id));

        let updated = diesel::update(target)
            .set((
                product_orders::status.eq(status.as_str()),
                product_orders::updated_at.eq(Local::now().naive_utc()),
            ))
            .get_result::<DbOrder>(&mut conn)?;

        with_items(&mut conn, updated)
    }
}
