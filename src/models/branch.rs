use chrono::NaiveDateTime;
use diesel::prelude::*;

use crate::domain::branch::{
    Branch as DomainBranch, NewBranch as DomainNewBranch, UpdateBranch as DomainUpdateBranch,
};

#[derive(Debug, Clone, Identifiable, Queryable, Selectable)]
#[diesel(table_name = crate::schema::branches)]
pub struct Branch {
    pub id: i32,
    pub hub_id: i32,
    pub franchise_id: Option<i32>,
    pub name: String,
    pub address: String,
    pub phone: Option<String>,
    pub opening_time: String,
    pub closing_time: String,
    pub image_url: Option<String>,
    pub rating: f64,
    pub is_active: bool,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

#[derive(Insertable)]
#[diesel(table_name = crate::schema::branches)]
pub struct NewBranch<'a> {
    pub hub_id: i32,
    pub franchise_id: Option<i32>,
    pub name: &'a str,
    pub address: &'a str,
    pub phone: Option<&'a str>,
    pub opening_time: &'a str,
    pub closing_time: &'a str,
    pub updated_at: NaiveDateTime,
}

#[derive(AsChangeset)]
#[diesel(table_name = crate::schema::branches)]
#[diesel(treat_none_as_null = true)]
pub struct UpdateBranch<'a> {
    pub franchise_id: Option<i32>,
    pub name: &'a str,
    pub address: &'a str,
    pub phone: Option<&'a str>,
    pub opening_time: &'a str,
    pub closing_time: &'a str,
    pub is_active: bool,
    pub updated_at: NaiveDateTime,
}

impl From<Branch> for DomainBranch {
    fn from(value: Branch) -> Self {
        Self {
            id: value.id,
            hub_id: value.hub_id,
            franchise_id: value.franchise_id,
            name: value.name,
            address: value.address,
            phone: value.phone,
            opening_time: value.opening_time,
            closing_time: value.closing_time,
            image_url: value.image_url,
            rating: value.rating,
            is_active: value.is_active,
            created_at: value.created_at,
            updated_at: value.updated_at,
        }
    }
}

impl<'a> From<&'a DomainNewBranch> for NewBranch<'a> {
    fn from(value: &'a DomainNewBranch) -> Self {
        Self {
            hub_id: value.hub_id,
            franchise_id: value.franchise_id,
            name: value.name.as_str(),
            address: value.address.as_str(),
            phone: value.phone.as_deref(),
            opening_time: value.opening_time.as_str(),
            closing_time: value.closing_time.as_str(),
            updated_at: value.updated_at,
        }
    }
}

impl<'a> From<&'a DomainUpdateBranch> for UpdateBranch<'a> {
    fn from(value: &'a DomainUpdateBranch) -> Self {
        Self {
            franchise_id: value.franchise_id,
            name: value.name.as_str(),
            address: value.address.as_str(),
            phone: value.phone.as_deref(),
            opening_time: value.opening_time.as_str(),
            closing_time: value.closing_time.as_str(),
            is_active: value.is_active,
            updated_at: value.updated_at,
        }
    }
}
