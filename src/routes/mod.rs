//! HTTP handlers. Pages render Tera templates, mutations redirect back with a
//! flash message, and `api` serves JSON.

use std::collections::HashMap;
use std::sync::Arc;

use actix_web::{HttpRequest, HttpResponse};
use actix_web_flash_messages::FlashMessage;
use pushkind_common::routes::redirect;
use serde::de::DeserializeOwned;

use crate::forms::format_money;
use crate::gateway::{GatewayError, PaymentGateway};
use crate::services::ServiceError;
use crate::storage::FsObjectStorage;

pub mod admins;
pub mod api;
pub mod banners;
pub mod bookings;
pub mod branches;
pub mod franchises;
pub mod main;
pub mod offers;
pub mod orders;
pub mod payments;
pub mod product_categories;
pub mod products;
pub mod reports;
pub mod reviews;
pub mod wash_services;
pub mod washers;

/// Upload target shared by the image handlers.
pub struct UploadStorage {
    pub storage: FsObjectStorage,
    /// Bucket used when the requested one is missing.
    pub default_bucket: String,
}

/// Payment gateway, absent when no Stripe key is configured.
#[derive(Clone, Default)]
pub struct Gateway(pub Option<Arc<dyn PaymentGateway>>);

impl Gateway {
    pub fn get(&self) -> Option<&dyn PaymentGateway> {
        self.0.as_deref()
    }

    pub fn is_enabled(&self) -> bool {
        self.0.is_some()
    }
}

/// Tera filter `money`: renders an amount in cents as `12.50`.
pub fn money_filter(
    value: &tera::Value,
    _args: &HashMap<String, tera::Value>,
) -> tera::Result<tera::Value> {
    let cents = value
        .as_i64()
        .ok_or_else(|| tera::Error::msg("money filter expects an integer amount in cents"))?;
    Ok(tera::Value::String(format_money(cents)))
}

/// Decodes the query string with `serde_html_form`, so blank filter fields
/// become `None`. Malformed queries fall back to the defaults.
pub(crate) fn filter_query<T>(req: &HttpRequest) -> T
where
    T: DeserializeOwned + Default,
{
    serde_html_form::from_str(req.query_string()).unwrap_or_else(|err| {
        log::warn!("Ignoring malformed query `{}`: {err}", req.query_string());
        T::default()
    })
}

/// Response for a page that failed to load.
pub(crate) fn page_error(err: ServiceError, page: &str) -> HttpResponse {
    match err {
        ServiceError::Unauthorized => {
            FlashMessage::error("Insufficient permissions.").send();
            redirect("/na")
        }
        ServiceError::NotFound => HttpResponse::NotFound().finish(),
        err => {
            log::error!("Failed to load {page}: {err}");
            HttpResponse::InternalServerError().finish()
        }
    }
}

/// Flashes the failure of a form action and redirects to `back`.
pub(crate) fn action_error(err: ServiceError, action: &str, back: &str) -> HttpResponse {
    match err {
        ServiceError::Unauthorized => {
            FlashMessage::error("Insufficient permissions.").send();
            redirect("/na")
        }
        ServiceError::NotFound => {
            FlashMessage::error("The record was not found or has already been deleted.").send();
            redirect(back)
        }
        ServiceError::Form(message) | ServiceError::Conflict(message) => {
            FlashMessage::error(message).send();
            redirect(back)
        }
        ServiceError::Gateway(GatewayError::NotConfigured) => {
            FlashMessage::error("Online payments are not configured.").send();
            redirect(back)
        }
        err => {
            log::error!("Failed to {action}: {err}");
            FlashMessage::error(format!("Failed to {action}.")).send();
            redirect(back)
        }
    }
}

/// Status code for a failed API call.
pub(crate) fn api_error(err: ServiceError, action: &str) -> HttpResponse {
    match err {
        ServiceError::Unauthorized => HttpResponse::Unauthorized().finish(),
        ServiceError::NotFound => HttpResponse::NotFound().finish(),
        ServiceError::Form(message) => HttpResponse::BadRequest().json(ErrorBody { error: message }),
        ServiceError::Conflict(message) => HttpResponse::Conflict().json(ErrorBody { error: message }),
        ServiceError::Gateway(GatewayError::NotConfigured) => {
            HttpResponse::ServiceUnavailable().finish()
        }
        ServiceError::Gateway(err) => {
            log::error!("Gateway call failed while trying to {action}: {err}");
            HttpResponse::BadGateway().finish()
        }
        err => {
            log::error!("Failed to {action}: {err}");
            HttpResponse::InternalServerError().finish()
        }
    }
}

#[derive(serde::Serialize)]
struct ErrorBody {
    error: String,
}
