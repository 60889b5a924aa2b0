use actix_web::{HttpRequest, Responder, get, post, web};
use actix_web_flash_messages::{FlashMessage, IncomingFlashMessages};
use pushkind_common::domain::auth::AuthenticatedUser;
use pushkind_common::models::config::CommonServerConfig;
use pushkind_common::routes::{base_context, redirect, render_template};
use tera::Tera;

use crate::forms::wash_services::{AddWashServiceForm, EditWashServiceForm};
use crate::repository::DieselRepository;
use crate::routes::{action_error, filter_query, page_error};
use crate::services::wash_services::{
    WashServicesQuery, create_service, load_services_page, modify_service, remove_service,
};

#[get("/services")]
pub async fn show_services(
    req: HttpRequest,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    flash_messages: IncomingFlashMessages,
    server_config: web::Data<CommonServerConfig>,
    tera: web::Data<Tera>,
) -> impl Responder {
    let query: WashServicesQuery = filter_query(&req);

    match load_services_page(repo.get_ref(), &user, query) {
        Ok(data) => {
            let mut context = base_context(
                &flash_messages,
                &user,
                "services",
                &server_config.auth_service_url,
            );
            context.insert("services", &data.services);
            context.insert("branches", &data.branches);
            context.insert("selected_branch", &data.selected_branch);
            render_template(&tera, "services/index.html", &context)
        }
        Err(err) => page_error(err, "services"),
    }
}

#[post("/services/add")]
pub async fn add_service(
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    web::Form(form): web::Form<AddWashServiceForm>,
) -> impl Responder {
    match create_service(repo.get_ref(), &user, form) {
        Ok(service) => {
            FlashMessage::success(format!("Service \"{}\" added.", service.name)).send();
            redirect(&format!("/services?branch_id={}", service.branch_id))
        }
        Err(err) => action_error(err, "add the service", "/services"),
    }
}

#[post("/services/edit")]
pub async fn edit_service(
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    web::Form(form): web::Form<EditWashServiceForm>,
) -> impl Responder {
    match modify_service(repo.get_ref(), &user, form) {
        Ok(service) => {
            FlashMessage::success(format!("Service \"{}\" updated.", service.name)).send();
            redirect(&format!("/services?branch_id={}", service.branch_id))
        }
        Err(err) => action_error(err, "update the service", "/services"),
    }
}

#[post("/services/{service_id}/delete")]
pub async fn delete_service(
    path: web::Path<i32>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    match remove_service(repo.get_ref(), &user, path.into_inner()) {
        Ok(()) => {
            FlashMessage::success("Service deleted.").send();
            redirect("/services")
        }
        Err(err) => action_error(err, "delete the service", "/services"),
    }
}
