use actix_web::{Responder, get, post, web};
use actix_web_flash_messages::{FlashMessage, IncomingFlashMessages};
use pushkind_common::domain::auth::AuthenticatedUser;
use pushkind_common::models::config::CommonServerConfig;
use pushkind_common::routes::{base_context, redirect, render_template};
use tera::Tera;

use crate::forms::franchises::{AddFranchiseForm, EditFranchiseForm};
use crate::repository::DieselRepository;
use crate::routes::{action_error, page_error};
use crate::services::ListParams;
use crate::services::franchises::{
    create_franchise, load_franchises_page, modify_franchise, remove_franchise,
};

#[get("/franchises")]
pub async fn show_franchises(
    params: web::Query<ListParams>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    flash_messages: IncomingFlashMessages,
    server_config: web::Data<CommonServerConfig>,
    tera: web::Data<Tera>,
) -> impl Responder {
    match load_franchises_page(repo.get_ref(), &user, params.into_inner()) {
        Ok(data) => {
            let mut context = base_context(
                &flash_messages,
                &user,
                "franchises",
                &server_config.auth_service_url,
            );
            context.insert("franchises", &data.franchises);
            context.insert("search", &data.search);
            render_template(&tera, "franchises/index.html", &context)
        }
        Err(err) => page_error(err, "franchises"),
    }
}

#[post("/franchises/add")]
pub async fn add_franchise(
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    web::Form(form): web::Form<AddFranchiseForm>,
) -> impl Responder {
    match create_franchise(repo.get_ref(), &user, form) {
        Ok(franchise) => {
            FlashMessage::success(format!("Franchise \"{}\" added.", franchise.name)).send();
            redirect("/franchises")
        }
        Err(err) => action_error(err, "add the franchise", "/franchises"),
    }
}

#[post("/franchises/edit")]
pub async fn edit_franchise(
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    web::Form(form): web::Form<EditFranchiseForm>,
) -> impl Responder {
    match modify_franchise(repo.get_ref(), &user, form) {
        Ok(franchise) => {
            FlashMessage::success(format!("Franchise \"{}\" updated.", franchise.name)).send();
            redirect("/franchises")
        }
        Err(err) => action_error(err, "update the franchise", "/franchises"),
    }
}

#[post("/franchises/{franchise_id}/delete")]
pub async fn delete_franchise(
    path: web::Path<i32>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    let franchise_id = path.into_inner();

    match remove_franchise(repo.get_ref(), &user, franchise_id) {
        Ok(()) => {
            FlashMessage::success("Franchise deleted.").send();
            redirect("/franchises")
        }
        Err(err) => action_error(err, "delete the franchise", "/franchises"),
    }
}
