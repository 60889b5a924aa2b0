use actix_web::{HttpRequest, Responder, get, post, web};
use actix_web_flash_messages::{FlashMessage, IncomingFlashMessages};
use pushkind_common::domain::auth::AuthenticatedUser;
use pushkind_common::models::config::CommonServerConfig;
use pushkind_common::routes::{base_context, redirect, render_template};
use serde::Deserialize;
use tera::Tera;

use crate::forms::format_money;
use crate::forms::payments::{ManualPaymentForm, RefundForm};
use crate::repository::DieselRepository;
use crate::routes::{Gateway, action_error, filter_query, page_error};
use crate::services::payments::{
    PaymentsQuery, list_payment_intents, load_payments_page, record_manual_payment,
    refund_payment, retrieve_payment_intent,
};

#[derive(Debug, Default, Deserialize)]
pub struct IntentsQuery {
    /// Id of the last intent of the previous page.
    pub starting_after: Option<String>,
}

#[get("/payments")]
pub async fn show_payments(
    req: HttpRequest,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    gateway: web::Data<Gateway>,
    flash_messages: IncomingFlashMessages,
    server_config: web::Data<CommonServerConfig>,
    tera: web::Data<Tera>,
) -> impl Responder {
    let query: PaymentsQuery = filter_query(&req);

    match load_payments_page(repo.get_ref(), &user, query, gateway.is_enabled()) {
        Ok(data) => {
            let mut context = base_context(
                &flash_messages,
                &user,
                "payments",
                &server_config.auth_service_url,
            );
            context.insert("payments", &data.payments);
            context.insert("status", &data.status);
            context.insert("gateway_enabled", &data.gateway_enabled);
            render_template(&tera, "payments/index.html", &context)
        }
        Err(err) => page_error(err, "payments"),
    }
}

#[post("/payments/add")]
pub async fn add_payment(
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    web::Form(form): web::Form<ManualPaymentForm>,
) -> impl Responder {
    match record_manual_payment(repo.get_ref(), &user, form) {
        Ok(payment) => {
            FlashMessage::success(format!(
                "Payment of {} {} recorded.",
                format_money(i64::from(payment.amount_cents)),
                payment.currency
            ))
            .send();
            redirect("/payments")
        }
        Err(err) => action_error(err, "record the payment", "/payments"),
    }
}

#[get("/payments/online")]
pub async fn show_payment_intents(
    req: HttpRequest,
    user: AuthenticatedUser,
    gateway: web::Data<Gateway>,
    flash_messages: IncomingFlashMessages,
    server_config: web::Data<CommonServerConfig>,
    tera: web::Data<Tera>,
) -> impl Responder {
    let query: IntentsQuery = filter_query(&req);

    match list_payment_intents(gateway.get(), &user, query.starting_after).await {
        Ok(page) => {
            let mut context = base_context(
                &flash_messages,
                &user,
                "payments",
                &server_config.auth_service_url,
            );
            context.insert("intents", &page.data);
            context.insert("next_cursor", &page.next_cursor());
            render_template(&tera, "payments/online.html", &context)
        }
        Err(err) => action_error(err, "load online payments", "/payments"),
    }
}

#[get("/payments/online/{payment_intent_id}")]
pub async fn show_payment_intent(
    path: web::Path<String>,
    user: AuthenticatedUser,
    gateway: web::Data<Gateway>,
    flash_messages: IncomingFlashMessages,
    server_config: web::Data<CommonServerConfig>,
    tera: web::Data<Tera>,
) -> impl Responder {
    match retrieve_payment_intent(gateway.get(), &user, &path.into_inner()).await {
        Ok(intent) => {
            let mut context = base_context(
                &flash_messages,
                &user,
                "payments",
                &server_config.auth_service_url,
            );
            context.insert("intent", &intent);
            render_template(&tera, "payments/intent.html", &context)
        }
        Err(err) => page_error(err, "the payment intent"),
    }
}

#[post("/payments/refund")]
pub async fn refund(
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    gateway: web::Data<Gateway>,
    web::Form(form): web::Form<RefundForm>,
) -> impl Responder {
    let back = format!("/payments/online/{}", form.payment_intent_id.trim());

    match refund_payment(repo.get_ref(), gateway.get(), &user, form).await {
        Ok(outcome) => {
            FlashMessage::success(format!(
                "Refunded {} {}.",
                format_money(outcome.refund.amount),
                outcome.refund.currency.to_uppercase()
            ))
            .send();
            redirect(&back)
        }
        Err(err) => action_error(err, "refund the payment", &back),
    }
}
