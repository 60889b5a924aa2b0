use actix_web::{HttpRequest, HttpResponse, Responder, get, post, web};
use pushkind_common::domain::auth::AuthenticatedUser;
use pushkind_common::pagination::DEFAULT_ITEMS_PER_PAGE;
use serde::Serialize;

use crate::forms::payments::RefundForm;
use crate::repository::DieselRepository;
use crate::routes::payments::IntentsQuery;
use crate::routes::{Gateway, api_error, filter_query};
use crate::services::access::resolve_scope;
use crate::services::bookings::{BookingsQuery, list_bookings};
use crate::services::branches::list_accessible_branches;
use crate::services::payments::{list_payment_intents, refund_payment, retrieve_payment_intent};

/// One page of a JSON listing.
#[derive(Serialize)]
struct Page<T> {
    items: Vec<T>,
    page: usize,
    total: usize,
}

#[get("/v1/branches")]
/// Branches visible to the caller.
pub async fn api_v1_branches(
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    let branches = resolve_scope(repo.get_ref(), &user)
        .and_then(|scope| list_accessible_branches(repo.get_ref(), user.hub_id, &scope));

    match branches {
        Ok(branches) => HttpResponse::Ok().json(branches),
        Err(err) => api_error(err, "list branches"),
    }
}

#[get("/v1/bookings")]
/// Bookings visible to the caller, filtered like the bookings page.
pub async fn api_v1_bookings(
    req: HttpRequest,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    let query: BookingsQuery = filter_query(&req);
    let page = query.page.unwrap_or(1).max(1);

    match list_bookings(repo.get_ref(), &user, query) {
        Ok((total, items)) => HttpResponse::Ok().json(Page {
            items,
            page,
            total: total.div_ceil(DEFAULT_ITEMS_PER_PAGE),
        }),
        Err(err) => api_error(err, "list bookings"),
    }
}

#[get("/v1/payment-intents")]
/// Payment intents at the gateway, paged with `starting_after`.
pub async fn api_v1_payment_intents(
    req: HttpRequest,
    user: AuthenticatedUser,
    gateway: web::Data<Gateway>,
) -> impl Responder {
    let query: IntentsQuery = filter_query(&req);

    match list_payment_intents(gateway.get(), &user, query.starting_after).await {
        Ok(page) => HttpResponse::Ok().json(page),
        Err(err) => api_error(err, "list payment intents"),
    }
}

#[get("/v1/payment-intents/{payment_intent_id}")]
pub async fn api_v1_payment_intent(
    path: web::Path<String>,
    user: AuthenticatedUser,
    gateway: web::Data<Gateway>,
) -> impl Responder {
    match retrieve_payment_intent(gateway.get(), &user, &path.into_inner()).await {
        Ok(intent) => HttpResponse::Ok().json(intent),
        Err(err) => api_error(err, "retrieve the payment intent"),
    }
}

#[post("/v1/refunds")]
/// Refunds a payment intent. A missing `amount` refunds what is left.
pub async fn api_v1_refund(
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    gateway: web::Data<Gateway>,
    web::Json(form): web::Json<RefundForm>,
) -> impl Responder {
    match refund_payment(repo.get_ref(), gateway.get(), &user, form).await {
        Ok(outcome) => HttpResponse::Ok().json(outcome),
        Err(err) => api_error(err, "refund the payment"),
    }
}
