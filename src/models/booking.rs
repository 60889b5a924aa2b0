use chrono::NaiveDateTime;
use diesel::prelude::*;

use crate::domain::booking::{
    Booking as DomainBooking, NewBooking as DomainNewBooking, UpdateBooking as DomainUpdateBooking,
};

#[derive(Debug, Clone, Identifiable, Queryable, Selectable)]
#[diesel(table_name = crate::schema::bookings)]
pub struct Booking {
    pub id: i32,
    pub hub_id: i32,
    pub branch_id: i32,
    pub service_id: Option<i32>,
    pub washer_id: Option<i32>,
    pub customer_name: String,
    pub customer_phone: Option<String>,
    pub car_plate: Option<String>,
    pub scheduled_at: NaiveDateTime,
    pub status: String,
    pub price_cents: i32,
    pub notes: Option<String>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

#[derive(Insertable)]
#[diesel(table_name = crate::schema::bookings)]
pub struct NewBooking<'a> {
    pub hub_id: i32,
    pub branch_id: i32,
    pub service_id: Option<i32>,
    pub washer_id: Option<i32>,
    pub customer_name: &'a str,
    pub customer_phone: Option<&'a str>,
    pub car_plate: Option<&'a str>,
    pub scheduled_at: NaiveDateTime,
    pub status: &'a str,
    pub price_cents: i32,
    pub notes: Option<&'a str>,
    pub updated_at: NaiveDateTime,
}

#[derive(AsChangeset)]
#[diesel(table_name = crate::schema::bookings)]
pub struct UpdateBooking<'a> {
    pub status: Option<&'a str>,
    pub washer_id: Option<Option<i32>>,
    pub scheduled_at: Option<NaiveDateTime>,
    pub notes: Option<Option<&'a str>>,
    pub updated_at: NaiveDateTime,
}

impl From<Booking> for DomainBooking {
    fn from(value: Booking) -> Self {
        Self {
            id: value.id,
            hub_id: value.hub_id,
            branch_id: value.branch_id,
            service_id: value.service_id,
            washer_id: value.washer_id,
            customer_name: value.customer_name,
            customer_phone: value.customer_phone,
            car_plate: value.car_plate,
            scheduled_at: value.scheduled_at,
            status: value.status.parse().unwrap_or_default(),
            price_cents: value.price_cents,
            notes: value.notes,
            created_at: value.created_at,
            updated_at: value.updated_at,
        }
    }
}

impl<'a> From<&'a DomainNewBooking> for NewBooking<'a> {
    fn from(value: &'a DomainNewBooking) -> Self {
        Self {
            hub_id: value.hub_id,
            branch_id: value.branch_id,
            service_id: value.service_id,
            washer_id: value.washer_id,
            customer_name: value.customer_name.as_str(),
            customer_phone: value.customer_phone.as_deref(),
            car_plate: value.car_plate.as_deref(),
            scheduled_at: value.scheduled_at,
            status: value.status.as_str(),
            price_cents: value.price_cents,
            notes: value.notes.as_deref(),
            updated_at: value.updated_at,
        }
    }
}

impl<'a> From<&'a DomainUpdateBooking> for UpdateBooking<'a> {
    fn from(value: &'a DomainUpdateBooking) -> Self {
        Self {
            status: value.status.map(|status| status.as_str()),
            washer_id: value.washer_id,
            scheduled_at: value.scheduled_at,
            notes: value
                .notes
                .as_ref()
                .map(|notes| notes.as_ref().map(String::as_str)),
            updated_at: value.updated_at,
        }
    }
}
