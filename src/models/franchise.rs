use chrono::NaiveDateTime;
use diesel::prelude::*;

use crate::domain::franchise::{
    Franchise as DomainFranchise, NewFranchise as DomainNewFranchise,
    UpdateFranchise as DomainUpdateFranchise,
};

#[derive(Debug, Clone, Identifiable, Queryable, Selectable)]
#[diesel(table_name = crate::schema::franchises)]
pub struct Franchise {
    pub id: i32,
    pub hub_id: i32,
    pub name: String,
    pub description: Option<String>,
    pub contact_email: Option<String>,
    pub contact_phone: Option<String>,
    pub is_active: bool,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

#[derive(Insertable)]
#[diesel(table_name = crate::schema::franchises)]
pub struct NewFranchise<'a> {
    pub hub_id: i32,
    pub name: &'a str,
    pub description: Option<&'a str>,
    pub contact_email: Option<&'a str>,
    pub contact_phone: Option<&'a str>,
    pub updated_at: NaiveDateTime,
}

#[derive(AsChangeset)]
#[diesel(table_name = crate::schema::franchises)]
#[diesel(treat_none_as_null = true)]
pub struct UpdateFranchise<'a> {
    pub name: &'a str,
    pub description: Option<&'a str>,
    pub contact_email: Option<&'a str>,
    pub contact_phone: Option<&'a str>,
    pub is_active: bool,
    pub updated_at: NaiveDateTime,
}

impl From<Franchise> for DomainFranchise {
    fn from(value: Franchise) -> Self {
        Self {
            id: value.id,
            hub_id: value.hub_id,
            name: value.name,
            description: value.description,
            contact_email: value.contact_email,
            contact_phone: value.contact_phone,
            is_active: value.is_active,
            created_at: value.created_at,
            updated_at: value.updated_at,
        }
    }
}

impl<'a> From<&'a DomainNewFranchise> for NewFranchise<'a> {
    fn from(value: &'a DomainNewFranchise) -> Self {
        Self {
            hub_id: value.hub_id,
            name: value.name.as_str(),
            description: value.description.as_deref(),
            contact_email: value.contact_email.as_deref(),
            contact_phone: value.contact_phone.as_deref(),
            updated_at: value.updated_at,
        }
    }
}

impl<'a> From<&'a DomainUpdateFranchise> for UpdateFranchise<'a> {
    fn from(value: &'a DomainUpdateFranchise) -> Self {
        Self {
            name: value.name.as_str(),
            description: value.description.as_deref(),
            contact_email: value.contact_email.as_deref(),
            contact_phone: value.contact_phone.as_deref(),
            is_active: value.is_active,
            updated_at: value.updated_at,
        }
    }
}
