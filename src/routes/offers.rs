use actix_web::{Responder, get, post, web};
use actix_web_flash_messages::{FlashMessage, IncomingFlashMessages};
use pushkind_common::domain::auth::AuthenticatedUser;
use pushkind_common::models::config::CommonServerConfig;
use pushkind_common::routes::{base_context, redirect, render_template};
use tera::Tera;

use crate::forms::offers::{AddOfferForm, EditOfferForm};
use crate::repository::DieselRepository;
use crate::routes::{action_error, page_error};
use crate::services::offers::{create_offer, load_offers, modify_offer, remove_offer};

#[get("/offers")]
pub async fn show_offers(
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    flash_messages: IncomingFlashMessages,
    server_config: web::Data<CommonServerConfig>,
    tera: web::Data<Tera>,
) -> impl Responder {
    match load_offers(repo.get_ref(), &user) {
        Ok(offers) => {
            let mut context = base_context(
                &flash_messages,
                &user,
                "offers",
                &server_config.auth_service_url,
            );
            context.insert("offers", &offers);
            render_template(&tera, "offers/index.html", &context)
        }
        Err(err) => page_error(err, "offers"),
    }
}

#[post("/offers/add")]
pub async fn add_offer(
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    web::Form(form): web::Form<AddOfferForm>,
) -> impl Responder {
    match create_offer(repo.get_ref(), &user, form) {
        Ok(offer) => {
            FlashMessage::success(format!("Offer \"{}\" added.", offer.title)).send();
            redirect("/offers")
        }
        Err(err) => action_error(err, "add the offer", "/offers"),
    }
}

#[post("/offers/edit")]
pub async fn edit_offer(
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    web::Form(form): web::Form<EditOfferForm>,
) -> impl Responder {
    match modify_offer(repo.get_ref(), &user, form) {
        Ok(offer) => {
            FlashMessage::success(format!("Offer \"{}\" updated.", offer.title)).send();
            redirect("/offers")
        }
        Err(err) => action_error(err, "update the offer", "/offers"),
    }
}

#[post("/offers/{offer_id}/delete")]
pub async fn delete_offer(
    path: web::Path<i32>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    match remove_offer(repo.get_ref(), &user, path.into_inner()) {
        Ok(()) => {
            FlashMessage::success("Offer deleted.").send();
            redirect("/offers")
        }
        Err(err) => action_error(err, "delete the offer", "/offers"),
    }
}
