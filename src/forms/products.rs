use std::io::{Read, Seek};

use actix_multipart::form::{MultipartForm, tempfile::TempFile};
use chrono::Local;
use csv::{StringRecord, Trim};
use pushkind_common::routes::empty_string_as_none;
use serde::Deserialize;
use thiserror::Error;
use validator::{Validate, ValidationErrors};

use crate::domain::product::{NewProduct, UpdateProduct};
use crate::forms::{
    DEFAULT_CURRENCY, optional_multiline, parse_money, parse_optional_id, sanitize_currency,
    sanitize_inline_text,
};

/// Maximum allowed length for a product name.
const NAME_MAX_LEN: u64 = 128;

/// Maximum allowed length for a SKU.
const SKU_MAX_LEN: u64 = 64;

const DESCRIPTION_MAX_LEN: u64 = 4096;

/// Result type returned by the product form helpers.
pub type ProductFormResult<T> = Result<T, ProductFormError>;

/// Errors that can occur while processing product forms.
#[derive(Debug, Error)]
pub enum ProductFormError {
    /// Validation failures from the `validator` crate.
    #[error("validation failed: {0}")]
    Validation(#[from] ValidationErrors),
    #[error("product name cannot be empty")]
    EmptyName,
    #[error("invalid price `{value}`")]
    InvalidPrice { value: String },
    #[error("invalid currency code `{value}`")]
    InvalidCurrency { value: String },
    #[error("invalid stock `{value}`")]
    InvalidStock { value: String },
    #[error("invalid category `{0}`")]
    InvalidCategory(String),
    /// The uploaded CSV is missing required columns.
    #[error("upload is missing the required `name` or `price` headers")]
    MissingRequiredHeaders,
    #[error("row {row} is missing a product name")]
    UploadMissingName { row: usize },
    #[error("row {row} has invalid price `{value}`")]
    UploadInvalidPrice { row: usize, value: String },
    #[error("row {row} has invalid currency `{value}`")]
    UploadInvalidCurrency { row: usize, value: String },
    #[error("row {row} has invalid stock `{value}`")]
    UploadInvalidStock { row: usize, value: String },
    /// The uploaded CSV did not contain any usable products.
    #[error("upload contains no products")]
    EmptyUpload,
    #[error("error reading csv file")]
    Read(#[from] std::io::Error),
    #[error("failed to parse CSV: {0}")]
    Csv(#[from] csv::Error),
}

fn product_price(raw: &str) -> ProductFormResult<i32> {
    parse_money(raw).ok_or_else(|| ProductFormError::InvalidPrice {
        value: raw.trim().to_string(),
    })
}

fn product_currency(raw: Option<&str>) -> ProductFormResult<String> {
    match raw.map(str::trim).filter(|value| !value.is_empty()) {
        None => Ok(DEFAULT_CURRENCY.to_string()),
        Some(value) => sanitize_currency(value).ok_or_else(|| ProductFormError::InvalidCurrency {
            value: value.to_string(),
        }),
    }
}

fn product_stock(raw: Option<&str>) -> ProductFormResult<i32> {
    match raw.map(str::trim).filter(|value| !value.is_empty()) {
        None => Ok(0),
        Some(value) => value
            .parse::<i32>()
            .ok()
            .filter(|stock| *stock >= 0)
            .ok_or_else(|| ProductFormError::InvalidStock {
                value: value.to_string(),
            }),
    }
}

/// Form payload emitted when submitting the "Add product" form.
#[derive(Debug, Deserialize, Validate)]
pub struct AddProductForm {
    #[validate(length(min = 1, max = NAME_MAX_LEN))]
    pub name: String,
    #[validate(length(max = SKU_MAX_LEN))]
    #[serde(default, deserialize_with = "empty_string_as_none")]
    pub sku: Option<String>,
    #[validate(length(max = DESCRIPTION_MAX_LEN))]
    #[serde(default, deserialize_with = "empty_string_as_none")]
    pub description: Option<String>,
    /// Decimal price such as `12.50`.
    pub price: String,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    pub currency: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    pub stock: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    pub category_id: Option<String>,
}

impl AddProductForm {
    /// Validates and sanitizes the payload into a domain `NewProduct`.
    pub fn into_new_product(self, hub_id: i32) -> ProductFormResult<NewProduct> {
        self.validate()?;

        let name = sanitize_inline_text(&self.name);
        if name.is_empty() {
            return Err(ProductFormError::EmptyName);
        }

        let price_cents = product_price(&self.price)?;
        let currency = product_currency(self.currency.as_deref())?;
        let stock = product_stock(self.stock.as_deref())?;
        let category_id = parse_optional_id(self.category_id.as_deref())
            .map_err(ProductFormError::InvalidCategory)?;

        let mut product = NewProduct::new(hub_id, name, price_cents, currency).with_stock(stock);
        if let Some(sku) = self.sku.as_deref().map(sanitize_sku).filter(|sku| !sku.is_empty()) {
            product = product.with_sku(sku);
        }
        if let Some(description) = optional_multiline(self.description.as_deref()) {
            product = product.with_description(description);
        }
        if let Some(category_id) = category_id {
            product = product.with_category_id(category_id);
        }

        Ok(product)
    }
}

#[derive(Debug)]
pub struct EditProductPayload {
    pub product_id: i32,
    pub update: UpdateProduct,
}

/// Form payload emitted when editing an existing product; blank optional fields clear the value.
#[derive(Debug, Deserialize, Validate)]
pub struct EditProductForm {
    #[validate(range(min = 1))]
    pub product_id: i32,
    #[validate(length(min = 1, max = NAME_MAX_LEN))]
    pub name: String,
    #[validate(length(max = SKU_MAX_LEN))]
    #[serde(default, deserialize_with = "empty_string_as_none")]
    pub sku: Option<String>,
    #[validate(length(max = DESCRIPTION_MAX_LEN))]
    #[serde(default, deserialize_with = "empty_string_as_none")]
    pub description: Option<String>,
    pub price: String,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    pub currency: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    pub stock: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    pub category_id: Option<String>,
    /// Archiving hides the product from the default listing.
    #[serde(default)]
    pub is_archived: bool,
}

impl EditProductForm {
    pub fn into_update_product(self) -> ProductFormResult<EditProductPayload> {
        self.validate()?;

        let name = sanitize_inline_text(&self.name);
        if name.is_empty() {
            return Err(ProductFormError::EmptyName);
        }

        Ok(EditProductPayload {
            product_id: self.product_id,
            update: UpdateProduct {
                category_id: parse_optional_id(self.category_id.as_deref())
                    .map_err(ProductFormError::InvalidCategory)?,
                name,
                sku: self
                    .sku
                    .as_deref()
                    .map(sanitize_sku)
                    .filter(|sku| !sku.is_empty()),
                description: optional_multiline(self.description.as_deref()),
                price_cents: product_price(&self.price)?,
                currency: product_currency(self.currency.as_deref())?,
                stock: product_stock(self.stock.as_deref())?,
                is_archived: self.is_archived,
                updated_at: Local::now().naive_utc(),
            },
        })
    }
}

/// One product parsed from an import file, with the category still unresolved.
#[derive(Debug, Clone)]
pub struct ImportedProduct {
    pub product: NewProduct,
    /// Category name resolved on import; unknown names create a category.
    pub category: Option<String>,
}

#[derive(MultipartForm)]
/// Multipart form for uploading a CSV file with new products.
pub struct UploadProductsForm {
    #[multipart(limit = "10MB")]
    pub csv: TempFile,
}

impl UploadProductsForm {
    /// Parse the uploaded CSV file into products ready for insertion.
    pub fn parse(&mut self, hub_id: i32) -> ProductFormResult<Vec<ImportedProduct>> {
        self.csv.file.rewind()?;
        parse_products(self.csv.file.by_ref(), hub_id)
    }
}

struct ProductHeaderIndexes {
    name: usize,
    price: usize,
    sku: Option<usize>,
    description: Option<usize>,
    currency: Option<usize>,
    stock: Option<usize>,
    category: Option<usize>,
}

fn locate_header(headers: &StringRecord, expected: &str) -> Option<usize> {
    headers
        .iter()
        .position(|header| header.eq_ignore_ascii_case(expected))
}

fn locate_product_headers(headers: &StringRecord) -> ProductFormResult<ProductHeaderIndexes> {
    let (Some(name), Some(price)) = (locate_header(headers, "name"), locate_header(headers, "price"))
    else {
        return Err(ProductFormError::MissingRequiredHeaders);
    };

    Ok(ProductHeaderIndexes {
        name,
        price,
        sku: locate_header(headers, "sku"),
        description: locate_header(headers, "description"),
        currency: locate_header(headers, "currency"),
        stock: locate_header(headers, "stock"),
        category: locate_header(headers, "category"),
    })
}

/// Parses `name,sku,description,price,currency,stock,category` rows.
///
/// Only `name` and `price` are required; the first invalid row aborts the import.
pub fn parse_products<R: Read>(reader: R, hub_id: i32) -> ProductFormResult<Vec<ImportedProduct>> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(Trim::All)
        .flexible(true)
        .from_reader(reader);

    let headers = reader.headers()?.clone();
    let indexes = locate_product_headers(&headers)?;

    let mut products = Vec::new();

    for (index, row) in reader.records().enumerate() {
        let row_number = index + 2; // account for header row
        let record = row?;
        let field = |column: Option<usize>| column.and_then(|idx| record.get(idx));

        let name = sanitize_inline_text(record.get(indexes.name).unwrap_or(""));
        if name.is_empty() {
            return Err(ProductFormError::UploadMissingName { row: row_number });
        }

        let price_raw = record.get(indexes.price).unwrap_or("");
        let price_cents = parse_money(price_raw).ok_or_else(|| ProductFormError::UploadInvalidPrice {
            row: row_number,
            value: price_raw.to_string(),
        })?;

        let currency = product_currency(field(indexes.currency)).map_err(|_| {
            ProductFormError::UploadInvalidCurrency {
                row: row_number,
                value: field(indexes.currency).unwrap_or("").to_string(),
            }
        })?;

        let stock = product_stock(field(indexes.stock)).map_err(|_| {
            ProductFormError::UploadInvalidStock {
                row: row_number,
                value: field(indexes.stock).unwrap_or("").to_string(),
            }
        })?;

        let mut product = NewProduct::new(hub_id, name, price_cents, currency).with_stock(stock);
        if let Some(sku) = field(indexes.sku).map(sanitize_sku).filter(|sku| !sku.is_empty()) {
            product = product.with_sku(sku);
        }
        if let Some(description) = optional_multiline(field(indexes.description)) {
            product = product.with_description(description);
        }

        products.push(ImportedProduct {
            product,
            category: field(indexes.category)
                .map(sanitize_inline_text)
                .filter(|category| !category.is_empty()),
        });
    }

    if products.is_empty() {
        return Err(ProductFormError::EmptyUpload);
    }

    Ok(products)
}

fn sanitize_sku(input: &str) -> String {
    input
        .trim()
        .chars()
        .filter(|ch| !ch.is_control())
        .collect::<String>()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn add_form() -> AddProductForm {
        AddProductForm {
            name: "  Carnauba  Wax  ".to_string(),
            sku: Some(" wax-001 ".to_string()),
            description: Some(" First line.\n\n Second line.  ".to_string()),
            price: "12.50".to_string(),
            currency: Some("usd".to_string()),
            stock: Some("7".to_string()),
            category_id: Some("3".to_string()),
        }
    }

    #[test]
    fn add_product_form_converts_successfully() {
        let new_product = add_form().into_new_product(42).expect("expected success");

        assert_eq!(new_product.hub_id, 42);
        assert_eq!(new_product.name, "Carnauba Wax");
        assert_eq!(new_product.sku.as_deref(), Some("wax-001"));
        assert_eq!(
            new_product.description.as_deref(),
            Some("First line.\n\nSecond line.")
        );
        assert_eq!(new_product.price_cents, 1250);
        assert_eq!(new_product.currency, "USD");
        assert_eq!(new_product.stock, 7);
        assert_eq!(new_product.category_id, Some(3));
    }

    #[test]
    fn add_product_form_defaults_currency_and_stock() {
        let mut form = add_form();
        form.currency = None;
        form.stock = None;

        let new_product = form.into_new_product(1).expect("expected success");

        assert_eq!(new_product.currency, DEFAULT_CURRENCY);
        assert_eq!(new_product.stock, 0);
    }

    #[test]
    fn add_product_form_rejects_bad_values() {
        let mut form = add_form();
        form.name = "   ".to_string();
        assert!(matches!(form.into_new_product(1), Err(ProductFormError::EmptyName)));

        let mut form = add_form();
        form.price = "12.345".to_string();
        assert!(matches!(
            form.into_new_product(1),
            Err(ProductFormError::InvalidPrice { value }) if value == "12.345"
        ));

        let mut form = add_form();
        form.currency = Some("US!".to_string());
        assert!(matches!(
            form.into_new_product(1),
            Err(ProductFormError::InvalidCurrency { value }) if value == "US!"
        ));

        let mut form = add_form();
        form.stock = Some("-2".to_string());
        assert!(matches!(
            form.into_new_product(1),
            Err(ProductFormError::InvalidStock { value }) if value == "-2"
        ));
    }

    #[test]
    fn edit_product_form_clears_optional_fields() {
        let form = EditProductForm {
            product_id: 9,
            name: "  Premium  Wax ".to_string(),
            sku: Some("  ".to_string()),
            description: None,
            price: "3".to_string(),
            currency: Some("eur".to_string()),
            stock: None,
            category_id: None,
            is_archived: true,
        };

        let payload = form.into_update_product().expect("expected success");

        assert_eq!(payload.product_id, 9);
        assert_eq!(payload.update.name, "Premium Wax");
        assert!(payload.update.sku.is_none());
        assert!(payload.update.category_id.is_none());
        assert_eq!(payload.update.price_cents, 300);
        assert_eq!(payload.update.currency, "EUR");
        assert!(payload.update.is_archived);
    }

    #[test]
    fn parse_products_reads_rows() {
        let csv = b"name,sku,description,price,currency,stock,category\n\
Wax,W-1,Hard wax,12.50,usd,4,Care\n\
Cloth,,,3,,,\n";

        let products = parse_products(&csv[..], 5).expect("expected upload to succeed");

        assert_eq!(products.len(), 2);
        assert_eq!(products[0].product.name, "Wax");
        assert_eq!(products[0].product.sku.as_deref(), Some("W-1"));
        assert_eq!(products[0].product.price_cents, 1250);
        assert_eq!(products[0].product.currency, "USD");
        assert_eq!(products[0].product.stock, 4);
        assert_eq!(products[0].category.as_deref(), Some("Care"));

        assert_eq!(products[1].product.name, "Cloth");
        assert!(products[1].product.sku.is_none());
        assert_eq!(products[1].product.currency, DEFAULT_CURRENCY);
        assert!(products[1].category.is_none());
    }

    #[test]
    fn parse_products_requires_name_and_price_headers() {
        let result = parse_products(&b"name,sku\nWax,W-1\n"[..], 5);

        assert!(matches!(result, Err(ProductFormError::MissingRequiredHeaders)));
    }

    #[test]
    fn parse_products_reports_row_numbers() {
        let result = parse_products(&b"name,price\nWax,1.00\nCloth,abc\n"[..], 5);
        assert!(matches!(
            result,
            Err(ProductFormError::UploadInvalidPrice { row: 3, value }) if value == "abc"
        ));

        let result = parse_products(&b"name,price\n,1.00\n"[..], 5);
        assert!(matches!(result, Err(ProductFormError::UploadMissingName { row: 2 })));
    }

    #[test]
    fn parse_products_rejects_empty_file() {
        let result = parse_products(&b"name,price\n"[..], 5);

        assert!(matches!(result, Err(ProductFormError::EmptyUpload)));
    }
}
