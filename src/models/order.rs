use chrono::NaiveDateTime;
use diesel::prelude::*;

use crate::domain::order::{
    NewOrder as DomainNewOrder, Order as DomainOrder, OrderItem as DomainOrderItem,
};

#[derive(Debug, Clone, Identifiable, Queryable, Selectable)]
#[diesel(table_name = crate::schema::product_orders)]
pub struct Order {
    pub id: i32,
    pub hub_id: i32,
    pub branch_id: Option<i32>,
    pub customer_name: String,
    pub status: String,
    pub total_cents: i32,
    pub currency: String,
    pub notes: Option<String>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

#[derive(Debug, Clone, Identifiable, Queryable, Selectable, Associations)]
#[diesel(table_name = crate::schema::order_items)]
#[diesel(belongs_to(Order, foreign_key = order_id))]
pub struct OrderItem {
    pub id: i32,
    pub order_id: i32,
    pub product_id: Option<i32>,
    pub name: String,
    pub price_cents: i32,
    pub quantity: i32,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

#[derive(Insertable)]
#[diesel(table_name = crate::schema::product_orders)]
pub struct NewOrder<'a> {
    pub hub_id: i32,
    pub branch_id: Option<i32>,
    pub customer_name: &'a str,
    pub status: &'a str,
    pub total_cents: i32,
    pub currency: &'a str,
    pub notes: Option<&'a str>,
    pub updated_at: NaiveDateTime,
}

#[derive(Insertable)]
#[diesel(table_name = crate::schema::order_items)]
pub struct NewOrderItem<'a> {
    pub order_id: i32,
    pub product_id: Option<i32>,
    pub name: &'a str,
    pub price_cents: i32,
    pub quantity: i32,
}

impl Order {
    pub fn into_domain(self, items: Vec<OrderItem>) -> DomainOrder {
        DomainOrder {
            id: self.id,
            hub_id: self.hub_id,
            branch_id: self.branch_id,
            customer_name: self.customer_name,
            status: self.status.parse().unwrap_or_default(),
            total_cents: self.total_cents,
            currency: self.currency,
            notes: self.notes,
            items: items.into_iter().map(OrderItem::into_domain).collect(),
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}

impl OrderItem {
    pub fn into_domain(self) -> DomainOrderItem {
        DomainOrderItem {
            product_id: self.product_id,
            name: self.name,
            price_cents: self.price_cents,
            quantity: self.quantity,
        }
    }
}

impl From<(Order, Vec<OrderItem>)> for DomainOrder {
    fn from(value: (Order, Vec<OrderItem>)) -> Self {
        value.0.into_domain(value.1)
    }
}

impl<'a> From<&'a DomainNewOrder> for NewOrder<'a> {
    fn from(value: &'a DomainNewOrder) -> Self {
        Self {
            hub_id: value.hub_id,
            branch_id: value.branch_id,
            customer_name: value.customer_name.as_str(),
            status: value.status.as_str(),
            total_cents: value.total_cents(),
            currency: value.currency.as_str(),
            notes: value.notes.as_deref(),
            updated_at: value.updated_at,
        }
    }
}

impl<'a> NewOrderItem<'a> {
    pub fn from_domain(order_id: i32, value: &'a DomainOrderItem) -> Self {
        Self {
            order_id,
            product_id: value.product_id,
            name: value.name.as_str(),
            price_cents: value.price_cents,
            quantity: value.quantity,
        }
    }
}
