use std::collections::HashMap;

use pushkind_common::domain::auth::AuthenticatedUser;
use pushkind_common::pagination::{DEFAULT_ITEMS_PER_PAGE, Paginated};
use serde::Deserialize;

use crate::domain::product::{NewProduct, Product, ProductListQuery};
use crate::domain::product_category::{NewProductCategory, ProductCategory};
use crate::forms::products::{AddProductForm, EditProductForm, ImportedProduct};
use crate::forms::uploads::ImageUpload;
use crate::repository::{ProductCategoryReader, ProductCategoryWriter, ProductReader, ProductWriter};
use crate::services::access::require_platform;
use crate::services::{ServiceError, ServiceResult};
use crate::storage::{ObjectStorage, upload_with_fallback};

/// Bucket holding product photos.
pub const PRODUCT_IMAGE_BUCKET: &str = "products";

/// Query parameters accepted by the products index page.
#[derive(Debug, Default, Deserialize)]
pub struct ProductsQuery {
    /// Optional search string entered by the user.
    pub search: Option<String>,
    /// Page requested by the UI (1-based).
    pub page: Option<usize>,
    pub category_id: Option<i32>,
    /// Whether archived items should be included in the response.
    #[serde(default)]
    pub show_archived: bool,
}

/// Data required to render the products index template.
pub struct ProductsPageData {
    pub products: Paginated<Product>,
    pub categories: Vec<ProductCategory>,
    pub search: Option<String>,
    pub category_id: Option<i32>,
    pub show_archived: bool,
}

/// Loads the products overview page.
pub fn load_products_page<R>(
    repo: &R,
    user: &AuthenticatedUser,
    query: ProductsQuery,
) -> ServiceResult<ProductsPageData>
where
    R: ProductReader + ProductCategoryReader + ?Sized,
{
    require_platform(user)?;

    let ProductsQuery {
        search,
        page,
        category_id,
        show_archived,
    } = query;

    let page = page.unwrap_or(1).max(1);
    let mut list_query = ProductListQuery::new(user.hub_id).paginate(page, DEFAULT_ITEMS_PER_PAGE);

    let search = search
        .map(|term| term.trim().to_string())
        .filter(|term| !term.is_empty());
    if let Some(search_term) = search.as_ref() {
        list_query = list_query.search(search_term);
    }
    if let Some(category_id) = category_id {
        list_query = list_query.category(category_id);
    }
    if show_archived {
        list_query = list_query.include_archived();
    }

    let (total, items) = repo.list_products(list_query).map_err(ServiceError::from)?;
    let categories = repo
        .list_product_categories(user.hub_id)
        .map_err(ServiceError::from)?;

    Ok(ProductsPageData {
        products: Paginated::new(items, page, total.div_ceil(DEFAULT_ITEMS_PER_PAGE)),
        categories,
        search,
        category_id,
        show_archived,
    })
}

fn ensure_category_exists<R>(repo: &R, hub_id: i32, category_id: Option<i32>) -> ServiceResult<()>
where
    R: ProductCategoryReader + ?Sized,
{
    let Some(category_id) = category_id else {
        return Ok(());
    };

    match repo
        .get_product_category_by_id(category_id, hub_id)
        .map_err(ServiceError::from)?
    {
        Some(_) => Ok(()),
        None => Err(ServiceError::Form(format!(
            "category {category_id} does not exist"
        ))),
    }
}

/// Creates a new product for the authenticated user's hub.
pub fn create_product<R>(repo: &R, user: &AuthenticatedUser, form: AddProductForm) -> ServiceResult<Product>
where
    R: ProductWriter + ProductCategoryReader + ?Sized,
{
    require_platform(user)?;

    let new_product = form
        .into_new_product(user.hub_id)
        .map_err(|err| ServiceError::Form(err.to_string()))?;
    ensure_category_exists(repo, user.hub_id, new_product.category_id)?;

    repo.create_product(&new_product)
        .map_err(ServiceError::from)
}

/// Updates a product; archiving and unarchiving go through here as well.
pub fn modify_product<R>(repo: &R, user: &AuthenticatedUser, form: EditProductForm) -> ServiceResult<Product>
where
    R: ProductWriter + ProductCategoryReader + ?Sized,
{
    require_platform(user)?;

    let payload = form
        .into_update_product()
        .map_err(|err| ServiceError::Form(err.to_string()))?;
    ensure_category_exists(repo, user.hub_id, payload.update.category_id)?;

    repo.update_product(payload.product_id, user.hub_id, &payload.update)
        .map_err(ServiceError::from)
}

pub fn remove_product<R>(repo: &R, user: &AuthenticatedUser, product_id: i32) -> ServiceResult<()>
where
    R: ProductWriter + ?Sized,
{
    require_platform(user)?;

    repo.delete_product(product_id, user.hub_id)
        .map_err(ServiceError::from)
}

pub fn upload_product_image<R, S>(
    repo: &R,
    storage: &S,
    default_bucket: &str,
    user: &AuthenticatedUser,
    product_id: i32,
    upload: ImageUpload,
) -> ServiceResult<Product>
where
    R: ProductReader + ProductWriter + ?Sized,
    S: ObjectStorage + ?Sized,
{
    require_platform(user)?;

    repo.get_product_by_id(product_id, user.hub_id)
        .map_err(ServiceError::from)?
        .ok_or(ServiceError::NotFound)?;

    let url = upload_with_fallback(
        storage,
        PRODUCT_IMAGE_BUCKET,
        default_bucket,
        &upload.file_name,
        &upload.bytes,
    )?;

    repo.set_product_image(product_id, user.hub_id, &url)
        .map_err(ServiceError::from)
}

/// Inserts products parsed from a CSV upload and returns how many were created.
///
/// Category names are matched case-insensitively; unknown names create a new
/// category so that the whole file imports in one pass.
pub fn import_products<R>(
    repo: &R,
    user: &AuthenticatedUser,
    rows: Vec<ImportedProduct>,
) -> ServiceResult<usize>
where
    R: ProductWriter + ProductCategoryReader + ProductCategoryWriter + ?Sized,
{
    require_platform(user)?;

    if rows.is_empty() {
        return Err(ServiceError::Form("the file contains no products".to_string()));
    }

    let mut categories: HashMap<String, i32> = repo
        .list_product_categories(user.hub_id)
        .map_err(ServiceError::from)?
        .into_iter()
        .map(|category| (category.name.to_lowercase(), category.id))
        .collect();

    let mut products: Vec<NewProduct> = Vec::with_capacity(rows.len());
    for row in rows {
        let mut product = row.product;
        if let Some(name) = row.category {
            let key = name.to_lowercase();
            let category_id = match categories.get(&key) {
                Some(id) => *id,
                None => {
                    let created = repo
                        .create_product_category(&NewProductCategory::new(user.hub_id, name))
                        .map_err(ServiceError::from)?;
                    log::info!("Created category {} during product import", created.name);
                    categories.insert(key, created.id);
                    created.id
                }
            };
            product = product.with_category_id(category_id);
        }
        products.push(product);
    }

    repo.create_products(&products).map_err(ServiceError::from)
}
