use chrono::{Local, NaiveDateTime};
use pushkind_common::pagination::Pagination;
use serde::{Deserialize, Serialize};

/// Domain representation of a retail product (wax, air fresheners, ...).
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Product {
    /// Unique identifier of the product.
    pub id: i32,
    /// Owning hub identifier.
    pub hub_id: i32,
    /// Optional category the product is listed under.
    pub category_id: Option<i32>,
    /// Human-readable name of the product.
    pub name: String,
    /// Optional stock keeping unit identifier.
    pub sku: Option<String>,
    /// Optional longer description shown to users.
    pub description: Option<String>,
    /// Price represented in the smallest currency unit (for example cents).
    pub price_cents: i32,
    /// ISO 4217 currency code associated with the product price.
    pub currency: String,
    /// Units in stock across the network.
    pub stock: i32,
    /// Public URL of the product photo.
    pub image_url: Option<String>,
    /// Flag indicating whether the product has been archived.
    pub is_archived: bool,
    /// Timestamp for when the product record was created.
    pub created_at: NaiveDateTime,
    /// Timestamp for the last update to the product record.
    pub updated_at: NaiveDateTime,
}

/// Payload required to insert a new product for a hub.
#[derive(Debug, Clone)]
pub struct NewProduct {
    pub hub_id: i32,
    pub category_id: Option<i32>,
    pub name: String,
    pub sku: Option<String>,
    pub description: Option<String>,
    pub price_cents: i32,
    pub currency: String,
    pub stock: i32,
    pub updated_at: NaiveDateTime,
}

impl NewProduct {
    /// Build a new product payload with the supplied details and current timestamp.
    pub fn new(
        hub_id: i32,
        name: impl Into<String>,
        price_cents: i32,
        currency: impl Into<String>,
    ) -> Self {
        Self {
            hub_id,
            category_id: None,
            name: name.into(),
            sku: None,
            description: None,
            price_cents,
            currency: currency.into(),
            stock: 0,
            updated_at: Local::now().naive_utc(),
        }
    }

    /// Attach an SKU identifier to the product payload.
    pub fn with_sku(mut self, sku: impl Into<String>) -> Self {
        self.sku = Some(sku.into());
        self
    }

    /// Attach a descriptive text to the product payload.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_category_id(mut self, category_id: i32) -> Self {
        self.category_id = Some(category_id);
        self
    }

    pub fn with_stock(mut self, stock: i32) -> Self {
        self.stock = stock;
        self
    }
}

/// Full replacement of the editable product fields.
#[derive(Debug, Clone)]
pub struct UpdateProduct {
    pub category_id: Option<i32>,
    pub name: String,
    pub sku: Option<String>,
    pub description: Option<String>,
    pub price_cents: i32,
    pub currency: String,
    pub stock: i32,
    pub is_archived: bool,
    pub updated_at: NaiveDateTime,
}

/// Query definition used to list products for a hub.
#[derive(Debug, Clone)]
pub struct ProductListQuery {
    /// Owning hub identifier.
    pub hub_id: i32,
    pub category_id: Option<i32>,
    /// Optional search term that matches the name or SKU.
    pub search: Option<String>,
    /// Whether archived products should be returned.
    pub include_archived: bool,
    pub pagination: Option<Pagination>,
}

impl ProductListQuery {
    /// Construct a query that targets all products belonging to `hub_id`.
    pub fn new(hub_id: i32) -> Self {
        Self {
            hub_id,
            category_id: None,
            search: None,
            include_archived: false,
            pagination: None,
        }
    }

    pub fn category(mut self, category_id: i32) -> Self {
        self.category_id = Some(category_id);
        self
    }

    /// Filter the results by a search term applied to name or SKU.
    pub fn search(mut self, term: impl Into<String>) -> Self {
        self.search = Some(term.into());
        self
    }

    /// Include archived products in the results.
    pub fn include_archived(mut self) -> Self {
        self.include_archived = true;
        self
    }

    /// Apply pagination to the query with the given page number and page size.
    pub fn paginate(mut self, page: usize, per_page: usize) -> Self {
        self.pagination = Some(Pagination { page, per_page });
        self
    }
}
