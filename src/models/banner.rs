use chrono::NaiveDateTime;
use diesel::prelude::*;

use crate::domain::banner::{
    Banner as DomainBanner, NewBanner as DomainNewBanner, UpdateBanner as DomainUpdateBanner,
};

#[derive(Debug, Clone, Identifiable, Queryable, Selectable)]
#[diesel(table_name = crate::schema::banners)]
pub struct Banner {
    pub id: i32,
    pub hub_id: i32,
    pub title: String,
    pub image_url: String,
    pub link_url: Option<String>,
    pub position: i32,
    pub is_active: bool,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

#[derive(Insertable)]
#[diesel(table_name = crate::schema::banners)]
pub struct NewBanner<'a> {
    pub hub_id: i32,
    pub title: &'a str,
    pub image_url: &'a str,
    pub link_url: Option<&'a str>,
    pub position: i32,
    pub updated_at: NaiveDateTime,
}

#[derive(AsChangeset)]
#[diesel(table_name = crate::schema::banners)]
#[diesel(treat_none_as_null = true)]
pub struct UpdateBanner<'a> {
    pub title: &'a str,
    pub link_url: Option<&'a str>,
    pub position: i32,
    pub is_active: bool,
    pub updated_at: NaiveDateTime,
}

impl From<Banner> for DomainBanner {
    fn from(value: Banner) -> Self {
        Self {
            id: value.id,
            hub_id: value.hub_id,
            title: value.title,
            image_url: value.image_url,
            link_url: value.link_url,
            position: value.position,
            is_active: value.is_active,
            created_at: value.created_at,
            updated_at: value.updated_at,
        }
    }
}

impl<'a> From<&'a DomainNewBanner> for NewBanner<'a> {
    fn from(value: &'a DomainNewBanner) -> Self {
        Self {
            hub_id: value.hub_id,
            title: value.title.as_str(),
            image_url: value.image_url.as_str(),
            link_url: value.link_url.as_deref(),
            position: value.position,
            updated_at: value.updated_at,
        }
    }
}

impl<'a> From<&'a DomainUpdateBanner> for UpdateBanner<'a> {
    fn from(value: &'a DomainUpdateBanner) -> Self {
        Self {
            title: value.title.as_str(),
            link_url: value.link_url.as_deref(),
            position: value.position,
            is_active: value.is_active,
            updated_at: value.updated_at,
        }
    }
}
