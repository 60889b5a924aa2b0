use chrono::NaiveDateTime;
use diesel::prelude::*;

use crate::domain::payment::{NewPayment as DomainNewPayment, Payment as DomainPayment};

#[derive(Debug, Clone, Identifiable, Queryable, Selectable)]
#[diesel(table_name = crate::schema::payments)]
pub struct Payment {
    pub id: i32,
    pub hub_id: i32,
    pub booking_id: Option<i32>,
    pub order_id: Option<i32>,
    pub amount_cents: i32,
    pub refunded_cents: i32,
    pub currency: String,
    pub method: String,
    pub status: String,
    pub gateway_reference: Option<String>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

#[derive(Insertable)]
#[diesel(table_name = crate::schema::payments)]
pub struct NewPayment<'a> {
    pub hub_id: i32,
    pub booking_id: Option<i32>,
    pub order_id: Option<i32>,
    pub amount_cents: i32,
    pub currency: &'a str,
    pub method: &'a str,
    pub status: &'a str,
    pub gateway_reference: Option<&'a str>,
    pub updated_at: NaiveDateTime,
}

impl From<Payment> for DomainPayment {
    fn from(value: Payment) -> Self {
        Self {
            id: value.id,
            hub_id: value.hub_id,
            booking_id: value.booking_id,
            order_id: value.order_id,
            amount_cents: value.amount_cents,
            refunded_cents: value.refunded_cents,
            currency: value.currency,
            method: value.method.parse().unwrap_or_default(),
            status: value.status.parse().unwrap_or_default(),
            gateway_reference: value.gateway_reference,
            created_at: value.created_at,
            updated_at: value.updated_at,
        }
    }
}

impl<'a> From<&'a DomainNewPayment> for NewPayment<'a> {
    fn from(value: &'a DomainNewPayment) -> Self {
        Self {
            hub_id: value.hub_id,
            booking_id: value.booking_id,
            order_id: value.order_id,
            amount_cents: value.amount_cents,
            currency: value.currency.as_str(),
            method: value.method.as_str(),
            status: value.status.as_str(),
            gateway_reference: value.gateway_reference.as_deref(),
            updated_at: value.updated_at,
        }
    }
}
