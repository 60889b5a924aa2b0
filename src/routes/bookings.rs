use actix_web::{HttpRequest, Responder, get, post, web};
use actix_web_flash_messages::{FlashMessage, IncomingFlashMessages};
use pushkind_common::domain::auth::AuthenticatedUser;
use pushkind_common::models::config::CommonServerConfig;
use pushkind_common::routes::{base_context, redirect, render_template};
use tera::Tera;

use crate::domain::booking::BookingStatus;
use crate::forms::bookings::{AddBookingForm, AssignWasherForm, BookingStatusForm};
use crate::repository::DieselRepository;
use crate::routes::{action_error, filter_query, page_error};
use crate::services::bookings::{
    BookingsQuery, assign_washer, change_booking_status, create_booking, load_bookings_page,
    remove_booking,
};

#[get("/bookings")]
pub async fn show_bookings(
    req: HttpRequest,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    flash_messages: IncomingFlashMessages,
    server_config: web::Data<CommonServerConfig>,
    tera: web::Data<Tera>,
) -> impl Responder {
    let query: BookingsQuery = filter_query(&req);
    let filters = query.clone();

    match load_bookings_page(repo.get_ref(), &user, query) {
        Ok(data) => {
            let mut context = base_context(
                &flash_messages,
                &user,
                "bookings",
                &server_config.auth_service_url,
            );
            context.insert("bookings", &data.bookings);
            context.insert("branches", &data.branches);
            context.insert("services", &data.services);
            context.insert("washers", &data.washers);
            context.insert("status", &data.status);
            context.insert("search", &data.search);
            context.insert("branch_id", &filters.branch_id);
            context.insert("from", &filters.from);
            context.insert("to", &filters.to);
            context.insert("statuses", &BookingStatus::ALL);
            render_template(&tera, "bookings/index.html", &context)
        }
        Err(err) => page_error(err, "bookings"),
    }
}

#[post("/bookings/add")]
pub async fn add_booking(
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    web::Form(form): web::Form<AddBookingForm>,
) -> impl Responder {
    match create_booking(repo.get_ref(), &user, form) {
        Ok(booking) => {
            FlashMessage::success(format!("Booking for {} added.", booking.customer_name)).send();
            redirect("/bookings")
        }
        Err(err) => action_error(err, "add the booking", "/bookings"),
    }
}

#[post("/bookings/status")]
pub async fn update_status(
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    web::Form(form): web::Form<BookingStatusForm>,
) -> impl Responder {
    match change_booking_status(repo.get_ref(), &user, form) {
        Ok(booking) => {
            FlashMessage::success(format!(
                "Booking #{} is now {}.",
                booking.id,
                booking.status.as_str()
            ))
            .send();
            redirect("/bookings")
        }
        Err(err) => action_error(err, "change the booking status", "/bookings"),
    }
}

#[post("/bookings/assign")]
pub async fn update_washer(
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    web::Form(form): web::Form<AssignWasherForm>,
) -> impl Responder {
    match assign_washer(repo.get_ref(), &user, form) {
        Ok(booking) => {
            let message = match booking.washer_id {
                Some(_) => format!("Washer assigned to booking #{}.", booking.id),
                None => format!("Washer removed from booking #{}.", booking.id),
            };
            FlashMessage::success(message).send();
            redirect("/bookings")
        }
        Err(err) => action_error(err, "assign the washer", "/bookings"),
    }
}

#[post("/bookings/{booking_id}/delete")]
pub async fn delete_booking(
    path: web::Path<i32>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    match remove_booking(repo.get_ref(), &user, path.into_inner()) {
        Ok(()) => {
            FlashMessage::success("Booking deleted.").send();
            redirect("/bookings")
        }
        Err(err) => action_error(err, "delete the booking", "/bookings"),
    }
}
