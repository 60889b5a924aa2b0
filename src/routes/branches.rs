use actix_multipart::form::MultipartForm;
use actix_web::{Responder, get, post, web};
use actix_web_flash_messages::{FlashMessage, IncomingFlashMessages};
use pushkind_common::domain::auth::AuthenticatedUser;
use pushkind_common::models::config::CommonServerConfig;
use pushkind_common::routes::{base_context, redirect, render_template};
use tera::Tera;

use crate::forms::branches::{AddBranchForm, EditBranchForm};
use crate::forms::uploads::ImageUploadForm;
use crate::repository::DieselRepository;
use crate::routes::{UploadStorage, action_error, page_error};
use crate::services::ListParams;
use crate::services::branches::{
    create_branch, load_branch, load_branches_page, modify_branch, refresh_branch_rating,
    remove_branch, upload_branch_image,
};

#[get("/branches")]
pub async fn show_branches(
    params: web::Query<ListParams>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    flash_messages: IncomingFlashMessages,
    server_config: web::Data<CommonServerConfig>,
    tera: web::Data<Tera>,
) -> impl Responder {
    match load_branches_page(repo.get_ref(), &user, params.into_inner()) {
        Ok(data) => {
            let mut context = base_context(
                &flash_messages,
                &user,
                "branches",
                &server_config.auth_service_url,
            );
            context.insert("branches", &data.branches);
            context.insert("search", &data.search);
            context.insert("franchises", &data.franchises);
            context.insert("can_manage", &data.scope.can_manage_branches());
            context.insert("is_platform", &data.scope.is_platform());
            render_template(&tera, "branches/index.html", &context)
        }
        Err(err) => page_error(err, "branches"),
    }
}

#[get("/branches/{branch_id}")]
pub async fn show_branch(
    path: web::Path<i32>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    flash_messages: IncomingFlashMessages,
    server_config: web::Data<CommonServerConfig>,
    tera: web::Data<Tera>,
) -> impl Responder {
    match load_branch(repo.get_ref(), &user, path.into_inner()) {
        Ok(detail) => {
            let mut context = base_context(
                &flash_messages,
                &user,
                "branches",
                &server_config.auth_service_url,
            );
            context.insert("branch", &detail.branch);
            context.insert("services", &detail.services);
            context.insert("washers", &detail.washers);
            context.insert("reviews", &detail.reviews);
            context.insert("can_manage", &detail.can_manage);
            render_template(&tera, "branches/show.html", &context)
        }
        Err(err) => page_error(err, "the branch"),
    }
}

#[post("/branches/add")]
pub async fn add_branch(
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    web::Form(form): web::Form<AddBranchForm>,
) -> impl Responder {
    match create_branch(repo.get_ref(), &user, form) {
        Ok(branch) => {
            FlashMessage::success(format!("Branch \"{}\" added.", branch.name)).send();
            redirect(&format!("/branches/{}", branch.id))
        }
        Err(err) => action_error(err, "add the branch", "/branches"),
    }
}

#[post("/branches/edit")]
pub async fn edit_branch(
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    web::Form(form): web::Form<EditBranchForm>,
) -> impl Responder {
    let back = format!("/branches/{}", form.branch_id);

    match modify_branch(repo.get_ref(), &user, form) {
        Ok(branch) => {
            FlashMessage::success(format!("Branch \"{}\" updated.", branch.name)).send();
            redirect(&back)
        }
        Err(err) => action_error(err, "update the branch", &back),
    }
}

#[post("/branches/{branch_id}/delete")]
pub async fn delete_branch(
    path: web::Path<i32>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    let branch_id = path.into_inner();

    match remove_branch(repo.get_ref(), &user, branch_id) {
        Ok(()) => {
            FlashMessage::success("Branch deleted.").send();
            redirect("/branches")
        }
        Err(err) => action_error(err, "delete the branch", "/branches"),
    }
}

#[post("/branches/{branch_id}/image")]
pub async fn upload_image(
    path: web::Path<i32>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    uploads: web::Data<UploadStorage>,
    MultipartForm(form): MultipartForm<ImageUploadForm>,
) -> impl Responder {
    let branch_id = path.into_inner();
    let back = format!("/branches/{branch_id}");

    let upload = match form.into_upload() {
        Ok(upload) => upload,
        Err(err) => {
            FlashMessage::error(err.to_string()).send();
            return redirect(&back);
        }
    };

    match upload_branch_image(
        repo.get_ref(),
        &uploads.storage,
        &uploads.default_bucket,
        &user,
        branch_id,
        upload,
    ) {
        Ok(_) => {
            FlashMessage::success("Image uploaded.").send();
            redirect(&back)
        }
        Err(err) => action_error(err, "upload the image", &back),
    }
}

#[post("/branches/{branch_id}/rating")]
pub async fn recalculate_rating(
    path: web::Path<i32>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    let branch_id = path.into_inner();
    let back = format!("/branches/{branch_id}");

    match refresh_branch_rating(repo.get_ref(), &user, branch_id) {
        Ok(rating) => {
            FlashMessage::success(format!("Rating recalculated: {rating:.1}.")).send();
            redirect(&back)
        }
        Err(err) => action_error(err, "recalculate the rating", &back),
    }
}
