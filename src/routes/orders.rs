use actix_web::{HttpRequest, Responder, get, post, web};
use actix_web_flash_messages::{FlashMessage, IncomingFlashMessages};
use pushkind_common::domain::auth::AuthenticatedUser;
use pushkind_common::models::config::CommonServerConfig;
use pushkind_common::routes::{base_context, redirect, render_template};
use tera::Tera;

use crate::forms::orders::OrderStatusForm;
use crate::repository::DieselRepository;
use crate::routes::{action_error, filter_query, page_error};
use crate::services::orders::{OrdersQuery, change_order_status, load_order, load_orders_page};

#[get("/orders")]
pub async fn show_orders(
    req: HttpRequest,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    flash_messages: IncomingFlashMessages,
    server_config: web::Data<CommonServerConfig>,
    tera: web::Data<Tera>,
) -> impl Responder {
    let query: OrdersQuery = filter_query(&req);

    match load_orders_page(repo.get_ref(), &user, query) {
        Ok(data) => {
            let mut context = base_context(
                &flash_messages,
                &user,
                "orders",
                &server_config.auth_service_url,
            );
            context.insert("orders", &data.orders);
            context.insert("search", &data.search);
            context.insert("status", &data.status);
            render_template(&tera, "orders/index.html", &context)
        }
        Err(err) => page_error(err, "orders"),
    }
}

#[get("/orders/{order_id}")]
pub async fn show_order(
    path: web::Path<i32>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    flash_messages: IncomingFlashMessages,
    server_config: web::Data<CommonServerConfig>,
    tera: web::Data<Tera>,
) -> impl Responder {
    match load_order(repo.get_ref(), &user, path.into_inner()) {
        Ok(order) => {
            let mut context = base_context(
                &flash_messages,
                &user,
                "orders",
                &server_config.auth_service_url,
            );
            context.insert("order", &order);
            context.insert("next_statuses", &order.status.next_statuses());
            render_template(&tera, "orders/show.html", &context)
        }
        Err(err) => page_error(err, "the order"),
    }
}

#[post("/orders/status")]
pub async fn update_order_status(
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    web::Form(form): web::Form<OrderStatusForm>,
) -> impl Responder {
    let back = format!("/orders/{}", form.order_id);

    match change_order_status(repo.get_ref(), &user, form) {
        Ok(order) => {
            FlashMessage::success(format!(
                "Order #{} is now {}.",
                order.id,
                order.status.as_str()
            ))
            .send();
            redirect(&back)
        }
        Err(err) => action_error(err, "change the order status", &back),
    }
}
