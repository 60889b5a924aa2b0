use actix_web::{HttpRequest, Responder, get, post, web};
use actix_web_flash_messages::{FlashMessage, IncomingFlashMessages};
use pushkind_common::domain::auth::AuthenticatedUser;
use pushkind_common::models::config::CommonServerConfig;
use pushkind_common::routes::{base_context, redirect, render_template};
use serde::de::DeserializeOwned;
use tera::Tera;

use crate::forms::admins::{AddAdminForm, AssignBranchesForm};
use crate::repository::DieselRepository;
use crate::routes::{action_error, filter_query, page_error};
use crate::services::admins::{
    AdminsQuery, assign_branches, create_admin, load_admins_page, remove_admin,
};

/// Admin forms repeat `branch_ids`, which `web::Form` cannot decode.
fn parse_form<T: DeserializeOwned>(body: &[u8]) -> Result<T, String> {
    serde_html_form::from_bytes(body).map_err(|err| {
        log::error!("Failed to parse the administrator form: {err}");
        "Invalid administrator form.".to_string()
    })
}

#[get("/admins")]
pub async fn show_admins(
    req: HttpRequest,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    flash_messages: IncomingFlashMessages,
    server_config: web::Data<CommonServerConfig>,
    tera: web::Data<Tera>,
) -> impl Responder {
    let query: AdminsQuery = filter_query(&req);

    match load_admins_page(repo.get_ref(), &user, query) {
        Ok(data) => {
            let mut context = base_context(
                &flash_messages,
                &user,
                "admins",
                &server_config.auth_service_url,
            );
            context.insert("admins", &data.admins);
            context.insert("franchises", &data.franchises);
            context.insert("branches", &data.branches);
            context.insert("search", &data.search);
            context.insert("role", &data.role);
            render_template(&tera, "admins/index.html", &context)
        }
        Err(err) => page_error(err, "administrators"),
    }
}

#[post("/admins/add")]
pub async fn add_admin(
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    body: web::Bytes,
) -> impl Responder {
    let form: AddAdminForm = match parse_form(&body) {
        Ok(form) => form,
        Err(message) => {
            FlashMessage::error(message).send();
            return redirect("/admins");
        }
    };

    match create_admin(repo.get_ref(), &user, form) {
        Ok(admin) => {
            FlashMessage::success(format!("Administrator {} added.", admin.email)).send();
            redirect("/admins")
        }
        Err(err) => action_error(err, "add the administrator", "/admins"),
    }
}

#[post("/admins/branches")]
pub async fn edit_admin_branches(
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    body: web::Bytes,
) -> impl Responder {
    let form: AssignBranchesForm = match parse_form(&body) {
        Ok(form) => form,
        Err(message) => {
            FlashMessage::error(message).send();
            return redirect("/admins");
        }
    };

    match assign_branches(repo.get_ref(), &user, form) {
        Ok(admin) => {
            FlashMessage::success(format!("Branches of {} updated.", admin.email)).send();
            redirect("/admins")
        }
        Err(err) => action_error(err, "update the branches", "/admins"),
    }
}

#[post("/admins/{admin_id}/delete")]
pub async fn delete_admin(
    path: web::Path<i32>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    match remove_admin(repo.get_ref(), &user, path.into_inner()) {
        Ok(()) => {
            FlashMessage::success("Administrator deleted.").send();
            redirect("/admins")
        }
        Err(err) => action_error(err, "delete the administrator", "/admins"),
    }
}
