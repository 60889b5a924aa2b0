use actix_multipart::form::MultipartForm;
use actix_web::{HttpRequest, Responder, get, post, web};
use actix_web_flash_messages::{FlashMessage, IncomingFlashMessages};
use pushkind_common::domain::auth::AuthenticatedUser;
use pushkind_common::models::config::CommonServerConfig;
use pushkind_common::routes::{base_context, redirect, render_template};
use tera::Tera;

use crate::forms::products::{AddProductForm, EditProductForm, UploadProductsForm};
use crate::forms::uploads::ImageUploadForm;
use crate::repository::DieselRepository;
use crate::routes::{UploadStorage, action_error, filter_query, page_error};
use crate::services::products::{
    ProductsQuery, create_product, import_products, load_products_page, modify_product,
    remove_product, upload_product_image,
};

#[get("/products")]
pub async fn show_products(
    req: HttpRequest,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    flash_messages: IncomingFlashMessages,
    server_config: web::Data<CommonServerConfig>,
    tera: web::Data<Tera>,
) -> impl Responder {
    let query: ProductsQuery = filter_query(&req);

    match load_products_page(repo.get_ref(), &user, query) {
        Ok(data) => {
            let mut context = base_context(
                &flash_messages,
                &user,
                "products",
                &server_config.auth_service_url,
            );
            let has_active_filters =
                data.show_archived || data.search.is_some() || data.category_id.is_some();
            context.insert("products", &data.products);
            context.insert("categories", &data.categories);
            context.insert("search", &data.search);
            context.insert("category_id", &data.category_id);
            context.insert("show_archived", &data.show_archived);
            context.insert("has_active_filters", &has_active_filters);
            render_template(&tera, "products/index.html", &context)
        }
        Err(err) => page_error(err, "products"),
    }
}

#[post("/products/add")]
pub async fn add_product(
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    web::Form(form): web::Form<AddProductForm>,
) -> impl Responder {
    match create_product(repo.get_ref(), &user, form) {
        Ok(product) => {
            FlashMessage::success(format!("Product \"{}\" added.", product.name)).send();
            redirect("/products")
        }
        Err(err) => action_error(err, "add the product", "/products"),
    }
}

#[post("/products/edit")]
pub async fn edit_product(
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    web::Form(form): web::Form<EditProductForm>,
) -> impl Responder {
    match modify_product(repo.get_ref(), &user, form) {
        Ok(product) => {
            let message = if product.is_archived {
                format!("Product \"{}\" archived.", product.name)
            } else {
                format!("Product \"{}\" updated.", product.name)
            };
            FlashMessage::success(message).send();
            redirect("/products")
        }
        Err(err) => action_error(err, "update the product", "/products"),
    }
}

#[post("/products/{product_id}/delete")]
pub async fn delete_product(
    path: web::Path<i32>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    match remove_product(repo.get_ref(), &user, path.into_inner()) {
        Ok(()) => {
            FlashMessage::success("Product deleted.").send();
            redirect("/products")
        }
        Err(err) => action_error(err, "delete the product", "/products"),
    }
}

#[post("/products/{product_id}/image")]
pub async fn upload_image(
    path: web::Path<i32>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    uploads: web::Data<UploadStorage>,
    MultipartForm(form): MultipartForm<ImageUploadForm>,
) -> impl Responder {
    let upload = match form.into_upload() {
        Ok(upload) => upload,
        Err(err) => {
            FlashMessage::error(err.to_string()).send();
            return redirect("/products");
        }
    };

    match upload_product_image(
        repo.get_ref(),
        &uploads.storage,
        &uploads.default_bucket,
        &user,
        path.into_inner(),
        upload,
    ) {
        Ok(product) => {
            FlashMessage::success(format!("Image of \"{}\" uploaded.", product.name)).send();
            redirect("/products")
        }
        Err(err) => action_error(err, "upload the image", "/products"),
    }
}

#[post("/products/upload")]
pub async fn upload_products(
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    MultipartForm(mut form): MultipartForm<UploadProductsForm>,
) -> impl Responder {
    let rows = match form.parse(user.hub_id) {
        Ok(rows) => rows,
        Err(err) => {
            FlashMessage::error(format!("Failed to read the CSV file: {err}")).send();
            return redirect("/products");
        }
    };

    match import_products(repo.get_ref(), &user, rows) {
        Ok(count) => {
            FlashMessage::success(format!("{count} product(s) imported.")).send();
            redirect("/products")
        }
        Err(err) => action_error(err, "import products", "/products"),
    }
}
