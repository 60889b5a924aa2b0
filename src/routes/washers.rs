use actix_web::{HttpRequest, Responder, get, post, web};
use actix_web_flash_messages::{FlashMessage, IncomingFlashMessages};
use pushkind_common::domain::auth::AuthenticatedUser;
use pushkind_common::models::config::CommonServerConfig;
use pushkind_common::routes::{base_context, redirect, render_template};
use tera::Tera;

use crate::forms::washers::{AddWasherForm, EditWasherForm, ScheduleForm};
use crate::repository::DieselRepository;
use crate::routes::{action_error, filter_query, page_error};
use crate::services::washers::{
    WashersQuery, create_washer, load_washer_schedule, load_washers_page, modify_washer,
    remove_washer, replace_schedule,
};

#[get("/washers")]
pub async fn show_washers(
    req: HttpRequest,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    flash_messages: IncomingFlashMessages,
    server_config: web::Data<CommonServerConfig>,
    tera: web::Data<Tera>,
) -> impl Responder {
    let query: WashersQuery = filter_query(&req);
    let branch_id = query.branch_id;

    match load_washers_page(repo.get_ref(), &user, query) {
        Ok(data) => {
            let mut context = base_context(
                &flash_messages,
                &user,
                "washers",
                &server_config.auth_service_url,
            );
            context.insert("washers", &data.washers);
            context.insert("branches", &data.branches);
            context.insert("search", &data.search);
            context.insert("status", &data.status);
            context.insert("branch_id", &branch_id);
            render_template(&tera, "washers/index.html", &context)
        }
        Err(err) => page_error(err, "washers"),
    }
}

#[post("/washers/add")]
pub async fn add_washer(
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    web::Form(form): web::Form<AddWasherForm>,
) -> impl Responder {
    match create_washer(repo.get_ref(), &user, form) {
        Ok(washer) => {
            FlashMessage::success(format!("Washer \"{}\" added.", washer.name)).send();
            redirect("/washers")
        }
        Err(err) => action_error(err, "add the washer", "/washers"),
    }
}

#[post("/washers/edit")]
pub async fn edit_washer(
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    web::Form(form): web::Form<EditWasherForm>,
) -> impl Responder {
    match modify_washer(repo.get_ref(), &user, form) {
        Ok(washer) => {
            FlashMessage::success(format!("Washer \"{}\" updated.", washer.name)).send();
            redirect("/washers")
        }
        Err(err) => action_error(err, "update the washer", "/washers"),
    }
}

#[post("/washers/{washer_id}/delete")]
pub async fn delete_washer(
    path: web::Path<i32>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    match remove_washer(repo.get_ref(), &user, path.into_inner()) {
        Ok(()) => {
            FlashMessage::success("Washer deleted.").send();
            redirect("/washers")
        }
        Err(err) => action_error(err, "delete the washer", "/washers"),
    }
}

#[get("/washers/{washer_id}/schedule")]
pub async fn show_schedule(
    path: web::Path<i32>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    flash_messages: IncomingFlashMessages,
    server_config: web::Data<CommonServerConfig>,
    tera: web::Data<Tera>,
) -> impl Responder {
    match load_washer_schedule(repo.get_ref(), &user, path.into_inner()) {
        Ok(schedule) => {
            let mut context = base_context(
                &flash_messages,
                &user,
                "washers",
                &server_config.auth_service_url,
            );
            context.insert("washer", &schedule.washer);
            context.insert("slots", &schedule.slots);
            render_template(&tera, "washers/schedule.html", &context)
        }
        Err(err) => page_error(err, "the schedule"),
    }
}

/// The schedule posts one row per weekday as repeated fields.
#[post("/washers/{washer_id}/schedule")]
pub async fn save_schedule(
    path: web::Path<i32>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    body: web::Bytes,
) -> impl Responder {
    let washer_id = path.into_inner();
    let back = format!("/washers/{washer_id}/schedule");

    let form: ScheduleForm = match serde_html_form::from_bytes(&body) {
        Ok(form) => form,
        Err(err) => {
            log::error!("Failed to parse the schedule form: {err}");
            FlashMessage::error("Invalid schedule form.").send();
            return redirect(&back);
        }
    };

    match replace_schedule(repo.get_ref(), &user, washer_id, form) {
        Ok(slots) => {
            FlashMessage::success(format!("Schedule saved: {} working day(s).", slots.len()))
                .send();
            redirect(&back)
        }
        Err(err) => action_error(err, "save the schedule", &back),
    }
}
