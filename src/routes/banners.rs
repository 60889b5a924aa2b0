use actix_multipart::form::MultipartForm;
use actix_web::{Responder, get, post, web};
use actix_web_flash_messages::{FlashMessage, IncomingFlashMessages};
use pushkind_common::domain::auth::AuthenticatedUser;
use pushkind_common::models::config::CommonServerConfig;
use pushkind_common::routes::{base_context, redirect, render_template};
use tera::Tera;

use crate::forms::banners::{AddBannerForm, EditBannerForm};
use crate::repository::DieselRepository;
use crate::routes::{UploadStorage, action_error, page_error};
use crate::services::banners::{create_banner, load_banners, modify_banner, remove_banner};

#[get("/banners")]
pub async fn show_banners(
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    flash_messages: IncomingFlashMessages,
    server_config: web::Data<CommonServerConfig>,
    tera: web::Data<Tera>,
) -> impl Responder {
    match load_banners(repo.get_ref(), &user) {
        Ok(banners) => {
            let mut context = base_context(
                &flash_messages,
                &user,
                "banners",
                &server_config.auth_service_url,
            );
            context.insert("banners", &banners);
            render_template(&tera, "banners/index.html", &context)
        }
        Err(err) => page_error(err, "banners"),
    }
}

#[post("/banners/add")]
pub async fn add_banner(
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    uploads: web::Data<UploadStorage>,
    MultipartForm(form): MultipartForm<AddBannerForm>,
) -> impl Responder {
    match create_banner(
        repo.get_ref(),
        &uploads.storage,
        &uploads.default_bucket,
        &user,
        form,
    ) {
        Ok(banner) => {
            FlashMessage::success(format!("Banner \"{}\" added.", banner.title)).send();
            redirect("/banners")
        }
        Err(err) => action_error(err, "add the banner", "/banners"),
    }
}

#[post("/banners/edit")]
pub async fn edit_banner(
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    web::Form(form): web::Form<EditBannerForm>,
) -> impl Responder {
    match modify_banner(repo.get_ref(), &user, form) {
        Ok(banner) => {
            FlashMessage::success(format!("Banner \"{}\" updated.", banner.title)).send();
            redirect("/banners")
        }
        Err(err) => action_error(err, "update the banner", "/banners"),
    }
}

#[post("/banners/{banner_id}/delete")]
pub async fn delete_banner(
    path: web::Path<i32>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    match remove_banner(repo.get_ref(), &user, path.into_inner()) {
        Ok(()) => {
            FlashMessage::success("Banner deleted.").send();
            redirect("/banners")
        }
        Err(err) => action_error(err, "delete the banner", "/banners"),
    }
}
