use actix_web::{HttpRequest, Responder, get, post, web};
use actix_web_flash_messages::{FlashMessage, IncomingFlashMessages};
use pushkind_common::domain::auth::AuthenticatedUser;
use pushkind_common::models::config::CommonServerConfig;
use pushkind_common::routes::{base_context, redirect, render_template};
use tera::Tera;

use crate::forms::reviews::AddReviewForm;
use crate::repository::DieselRepository;
use crate::routes::{action_error, filter_query, page_error};
use crate::services::reviews::{ReviewsQuery, create_review, load_reviews_page, remove_review};

#[get("/reviews")]
pub async fn show_reviews(
    req: HttpRequest,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    flash_messages: IncomingFlashMessages,
    server_config: web::Data<CommonServerConfig>,
    tera: web::Data<Tera>,
) -> impl Responder {
    let query: ReviewsQuery = filter_query(&req);

    match load_reviews_page(repo.get_ref(), &user, query) {
        Ok(data) => {
            let mut context = base_context(
                &flash_messages,
                &user,
                "reviews",
                &server_config.auth_service_url,
            );
            context.insert("reviews", &data.reviews);
            context.insert("min_rating", &data.min_rating);
            context.insert("max_rating", &data.max_rating);
            render_template(&tera, "reviews/index.html", &context)
        }
        Err(err) => page_error(err, "reviews"),
    }
}

#[post("/reviews/add")]
pub async fn add_review(
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    web::Form(form): web::Form<AddReviewForm>,
) -> impl Responder {
    match create_review(repo.get_ref(), &user, form) {
        Ok(review) => {
            FlashMessage::success(format!(
                "Review for booking #{} added.",
                review.booking_id
            ))
            .send();
            redirect("/reviews")
        }
        Err(err) => action_error(err, "add the review", "/reviews"),
    }
}

#[post("/reviews/{review_id}/delete")]
pub async fn delete_review(
    path: web::Path<i32>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    match remove_review(repo.get_ref(), &user, path.into_inner()) {
        Ok(()) => {
            FlashMessage::success("Review deleted.").send();
            redirect("/reviews")
        }
        Err(err) => action_error(err, "delete the review", "/reviews"),
    }
}
