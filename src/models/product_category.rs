use chrono::NaiveDateTime;
use diesel::prelude::*;

use crate::domain::product_category::{
    NewProductCategory as DomainNewProductCategory, ProductCategory as DomainProductCategory,
    UpdateProductCategory as DomainUpdateProductCategory,
};

#[derive(Debug, Clone, Identifiable, Queryable, Selectable)]
#[diesel(table_name = crate::schema::product_categories)]
pub struct ProductCategory {
    pub id: i32,
    pub hub_id: i32,
    pub name: String,
    pub description: Option<String>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

#[derive(Insertable)]
#[diesel(table_name = crate::schema::product_categories)]
pub struct NewProductCategory<'a> {
    pub hub_id: i32,
    pub name: &'a str,
    pub description: Option<&'a str>,
    pub updated_at: NaiveDateTime,
}

#[derive(AsChangeset)]
#[diesel(table_name = crate::schema::product_categories)]
#[diesel(treat_none_as_null = true)]
pub struct UpdateProductCategory<'a> {
    pub name: &'a str,
    pub description: Option<&'a str>,
    pub updated_at: NaiveDateTime,
}

impl From<ProductCategory> for DomainProductCategory {
    fn from(value: ProductCategory) -> Self {
        Self {
            id: value.id,
            hub_id: value.hub_id,
            name: value.name,
            description: value.description,
            created_at: value.created_at,
            updated_at: value.updated_at,
        }
    }
}

impl<'a> From<&'a DomainNewProductCategory> for NewProductCategory<'a> {
    fn from(value: &'a DomainNewProductCategory) -> Self {
        Self {
            hub_id: value.hub_id,
            name: value.name.as_str(),
            description: value.description.as_deref(),
            updated_at: value.updated_at,
        }
    }
}

impl<'a> From<&'a DomainUpdateProductCategory> for UpdateProductCategory<'a> {
    fn from(value: &'a DomainUpdateProductCategory) -> Self {
        Self {
            name: value.name.as_str(),
            description: value.description.as_deref(),
            updated_at: value.updated_at,
        }
    }
}
