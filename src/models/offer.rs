use chrono::NaiveDateTime;
use diesel::prelude::*;

use crate::domain::offer::{
    NewOffer as DomainNewOffer, Offer as DomainOffer, UpdateOffer as DomainUpdateOffer,
};

#[derive(Debug, Clone, Identifiable, Queryable, Selectable)]
#[diesel(table_name = crate::schema::offers)]
pub struct Offer {
    pub id: i32,
    pub hub_id: i32,
    pub title: String,
    pub description: Option<String>,
    pub discount_percent: i32,
    pub code: Option<String>,
    pub starts_at: Option<NaiveDateTime>,
    pub ends_at: Option<NaiveDateTime>,
    pub is_active: bool,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

#[derive(Insertable)]
#[diesel(table_name = crate::schema::offers)]
pub struct NewOffer<'a> {
    pub hub_id: i32,
    pub title: &'a str,
    pub description: Option<&'a str>,
    pub discount_percent: i32,
    pub code: Option<&'a str>,
    pub starts_at: Option<NaiveDateTime>,
    pub ends_at: Option<NaiveDateTime>,
    pub updated_at: NaiveDateTime,
}

#[derive(AsChangeset)]
#[diesel(table_name = crate::schema::offers)]
#[diesel(treat_none_as_null = true)]
pub struct UpdateOffer<'a> {
    pub title: &'a str,
    pub description: Option<&'a str>,
    pub discount_percent: i32,
    pub code: Option<&'a str>,
    pub starts_at: Option<NaiveDateTime>,
    pub ends_at: Option<NaiveDateTime>,
    pub is_active: bool,
    pub updated_at: NaiveDateTime,
}

impl From<Offer> for DomainOffer {
    fn from(value: Offer) -> Self {
        Self {
            id: value.id,
            hub_id: value.hub_id,
            title: value.title,
            description: value.description,
            discount_percent: value.discount_percent,
            code: value.code,
            starts_at: value.starts_at,
            ends_at: value.ends_at,
            is_active: value.is_active,
            created_at: value.created_at,
            updated_at: value.updated_at,
        }
    }
}

impl<'a> From<&'a DomainNewOffer> for NewOffer<'a> {
    fn from(value: &'a DomainNewOffer) -> Self {
        Self {
            hub_id: value.hub_id,
            title: value.title.as_str(),
            description: value.description.as_deref(),
            discount_percent: value.discount_percent,
            code: value.code.as_deref(),
            starts_at: value.starts_at,
            ends_at: value.ends_at,
            updated_at: value.updated_at,
        }
    }
}

impl<'a> From<&'a DomainUpdateOffer> for UpdateOffer<'a> {
    fn from(value: &'a DomainUpdateOffer) -> Self {
        Self {
            title: value.title.as_str(),
            description: value.description.as_deref(),
            discount_percent: value.discount_percent,
            code: value.code.as_deref(),
            starts_at: value.starts_at,
            ends_at: value.ends_at,
            is_active: value.is_active,
            updated_at: value.updated_at,
        }
    }
}
