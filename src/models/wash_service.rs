use chrono::NaiveDateTime;
use diesel::prelude::*;

use crate::domain::wash_service::{
    NewWashService as DomainNewWashService, UpdateWashService as DomainUpdateWashService,
    WashService as DomainWashService,
};

#[derive(Debug, Clone, Identifiable, Queryable, Selectable)]
#[diesel(table_name = crate::schema::services)]
pub struct WashService {
    pub id: i32,
    pub hub_id: i32,
    pub branch_id: i32,
    pub name: String,
    pub description: Option<String>,
    pub price_cents: i32,
    pub duration_minutes: i32,
    pub is_active: bool,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

#[derive(Insertable)]
#[diesel(table_name = crate::schema::services)]
pub struct NewWashService<'a> {
    pub hub_id: i32,
    pub branch_id: i32,
    pub name: &'a str,
    pub description: Option<&'a str>,
    pub price_cents: i32,
    pub duration_minutes: i32,
    pub updated_at: NaiveDateTime,
}

#[derive(AsChangeset)]
#[diesel(table_name = crate::schema::services)]
#[diesel(treat_none_as_null = true)]
pub struct UpdateWashService<'a> {
    pub name: &'a str,
    pub description: Option<&'a str>,
    pub price_cents: i32,
    pub duration_minutes: i32,
    pub is_active: bool,
    pub updated_at: NaiveDateTime,
}

impl From<WashService> for DomainWashService {
    fn from(value: WashService) -> Self {
        Self {
            id: value.id,
            hub_id: value.hub_id,
            branch_id: value.branch_id,
            name: value.name,
            description: value.description,
            price_cents: value.price_cents,
            duration_minutes: value.duration_minutes,
            is_active: value.is_active,
            created_at: value.created_at,
            updated_at: value.updated_at,
        }
    }
}

impl<'a> From<&'a DomainNewWashService> for NewWashService<'a> {
    fn from(value: &'a DomainNewWashService) -> Self {
        Self {
            hub_id: value.hub_id,
            branch_id: value.branch_id,
            name: value.name.as_str(),
            description: value.description.as_deref(),
            price_cents: value.price_cents,
            duration_minutes: value.duration_minutes,
            updated_at: value.updated_at,
        }
    }
}

impl<'a> From<&'a DomainUpdateWashService> for UpdateWashService<'a> {
    fn from(value: &'a DomainUpdateWashService) -> Self {
        Self {
            name: value.name.as_str(),
            description: value.description.as_deref(),
            price_cents: value.price_cents,
            duration_minutes: value.duration_minutes,
            is_active: value.is_active,
            updated_at: value.updated_at,
        }
    }
}
