use actix_web::{Responder, get, web};
use actix_web_flash_messages::IncomingFlashMessages;
use pushkind_common::domain::auth::AuthenticatedUser;
use pushkind_common::models::config::CommonServerConfig;
use pushkind_common::routes::{base_context, render_template};
use tera::Tera;

use crate::repository::DieselRepository;
use crate::routes::page_error;
use crate::services::main as main_service;

/// Landing page; the template is chosen by the caller's scope.
#[get("/")]
pub async fn show_dashboard(
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    flash_messages: IncomingFlashMessages,
    server_config: web::Data<CommonServerConfig>,
    tera: web::Data<Tera>,
) -> impl Responder {
    match main_service::load_dashboard(repo.get_ref(), &user) {
        Ok(data) => {
            let mut context = base_context(
                &flash_messages,
                &user,
                "index",
                &server_config.auth_service_url,
            );
            context.insert("dashboard", &data);
            let template = format!("main/{}.html", data.kind.as_str());
            render_template(&tera, &template, &context)
        }
        Err(err) => page_error(err, "the dashboard"),
    }
}
