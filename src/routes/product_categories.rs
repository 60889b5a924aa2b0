use actix_web::{Responder, get, post, web};
use actix_web_flash_messages::{FlashMessage, IncomingFlashMessages};
use pushkind_common::domain::auth::AuthenticatedUser;
use pushkind_common::models::config::CommonServerConfig;
use pushkind_common::routes::{base_context, redirect, render_template};
use tera::Tera;

use crate::forms::product_categories::{AddProductCategoryForm, EditProductCategoryForm};
use crate::repository::DieselRepository;
use crate::routes::{action_error, page_error};
use crate::services::product_categories::{
    create_product_category, load_product_categories, modify_product_category,
    remove_product_category,
};

#[get("/product-categories")]
pub async fn show_product_categories(
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    flash_messages: IncomingFlashMessages,
    server_config: web::Data<CommonServerConfig>,
    tera: web::Data<Tera>,
) -> impl Responder {
    match load_product_categories(repo.get_ref(), &user) {
        Ok(categories) => {
            let mut context = base_context(
                &flash_messages,
                &user,
                "product_categories",
                &server_config.auth_service_url,
            );
            context.insert("categories", &categories);
            render_template(&tera, "product_categories/index.html", &context)
        }
        Err(err) => page_error(err, "product categories"),
    }
}

#[post("/product-categories/add")]
pub async fn add_product_category(
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    web::Form(form): web::Form<AddProductCategoryForm>,
) -> impl Responder {
    match create_product_category(repo.get_ref(), &user, form) {
        Ok(category) => {
            FlashMessage::success(format!("Category \"{}\" added.", category.name)).send();
            redirect("/product-categories")
        }
        Err(err) => action_error(err, "add the category", "/product-categories"),
    }
}

#[post("/product-categories/edit")]
pub async fn edit_product_category(
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    web::Form(form): web::Form<EditProductCategoryForm>,
) -> impl Responder {
    match modify_product_category(repo.get_ref(), &user, form) {
        Ok(category) => {
            FlashMessage::success(format!("Category \"{}\" updated.", category.name)).send();
            redirect("/product-categories")
        }
        Err(err) => action_error(err, "update the category", "/product-categories"),
    }
}

#[post("/product-categories/{category_id}/delete")]
pub async fn delete_product_category(
    path: web::Path<i32>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    let category_id = path.into_inner();

    match remove_product_category(repo.get_ref(), &user, category_id) {
        Ok(()) => {
            FlashMessage::success("Category deleted.").send();
            redirect("/product-categories")
        }
        Err(err) => action_error(err, "delete the category", "/product-categories"),
    }
}
