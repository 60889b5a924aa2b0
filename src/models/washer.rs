use chrono::NaiveDateTime;
use diesel::prelude::*;

use crate::domain::washer::{
    NewWasher as DomainNewWasher, ScheduleSlot, UpdateWasher as DomainUpdateWasher,
    Washer as DomainWasher,
};

#[derive(Debug, Clone, Identifiable, Queryable, Selectable)]
#[diesel(table_name = crate::schema::washers)]
pub struct Washer {
    pub id: i32,
    pub hub_id: i32,
    pub branch_id: i32,
    pub name: String,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub status: String,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

#[derive(Insertable)]
#[diesel(table_name = crate::schema::washers)]
pub struct NewWasher<'a> {
    pub hub_id: i32,
    pub branch_id: i32,
    pub name: &'a str,
    pub phone: Option<&'a str>,
    pub email: Option<&'a str>,
    pub status: &'a str,
    pub updated_at: NaiveDateTime,
}

#[derive(AsChangeset)]
#[diesel(table_name = crate::schema::washers)]
#[diesel(treat_none_as_null = true)]
pub struct UpdateWasher<'a> {
    pub branch_id: i32,
    pub name: &'a str,
    pub phone: Option<&'a str>,
    pub email: Option<&'a str>,
    pub status: &'a str,
    pub updated_at: NaiveDateTime,
}

#[derive(Debug, Clone, Identifiable, Queryable, Selectable, Associations)]
#[diesel(table_name = crate::schema::washer_schedules)]
#[diesel(belongs_to(Washer, foreign_key = washer_id))]
pub struct WasherSchedule {
    pub id: i32,
    pub washer_id: i32,
    pub day_of_week: i32,
    pub start_time: String,
    pub end_time: String,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

#[derive(Insertable)]
#[diesel(table_name = crate::schema::washer_schedules)]
pub struct NewWasherSchedule<'a> {
    pub washer_id: i32,
    pub day_of_week: i32,
    pub start_time: &'a str,
    pub end_time: &'a str,
}

impl From<Washer> for DomainWasher {
    fn from(value: Washer) -> Self {
        Self {
            id: value.id,
            hub_id: value.hub_id,
            branch_id: value.branch_id,
            name: value.name,
            phone: value.phone,
            email: value.email,
            status: value.status.parse().unwrap_or_default(),
            created_at: value.created_at,
            updated_at: value.updated_at,
        }
    }
}

impl<'a> From<&'a DomainNewWasher> for NewWasher<'a> {
    fn from(value: &'a DomainNewWasher) -> Self {
        Self {
            hub_id: value.hub_id,
            branch_id: value.branch_id,
            name: value.name.as_str(),
            phone: value.phone.as_deref(),
            email: value.email.as_deref(),
            status: value.status.as_str(),
            updated_at: value.updated_at,
        }
    }
}

impl<'a> From<&'a DomainUpdateWasher> for UpdateWasher<'a> {
    fn from(value: &'a DomainUpdateWasher) -> Self {
        Self {
            branch_id: value.branch_id,
            name: value.name.as_str(),
            phone: value.phone.as_deref(),
            email: value.email.as_deref(),
            status: value.status.as_str(),
            updated_at: value.updated_at,
        }
    }
}

impl From<WasherSchedule> for ScheduleSlot {
    fn from(value: WasherSchedule) -> Self {
        Self {
            day_of_week: value.day_of_week,
            start_time: value.start_time,
            end_time: value.end_time,
        }
    }
}

impl<'a> NewWasherSchedule<'a> {
    pub fn from_domain(washer_id: i32, value: &'a ScheduleSlot) -> Self {
        Self {
            washer_id,
            day_of_week: value.day_of_week,
            start_time: value.start_time.as_str(),
            end_time: value.end_time.as_str(),
        }
    }
}
