use std::sync::Arc;

use actix_files::Files;
use actix_identity::IdentityMiddleware;
use actix_session::{SessionMiddleware, storage::CookieSessionStore};
use actix_web::cookie::Key;
use actix_web::{App, HttpServer, middleware, web};
use actix_web_flash_messages::{FlashMessagesFramework, storage::CookieMessageStore};
use dotenvy::dotenv;
use pushkind_common::db::establish_connection_pool;
use pushkind_common::middleware::RedirectUnauthorized;
use pushkind_common::models::config::CommonServerConfig;
use pushkind_common::routes::{logout, not_assigned};
use tera::Tera;

use carwash_admin::config::AppConfig;
use carwash_admin::gateway::{PaymentGateway, StripeGateway};
use carwash_admin::i18n::{TranslateFunction, Translations};
use carwash_admin::repository::DieselRepository;
use carwash_admin::routes::admins::{add_admin, delete_admin, edit_admin_branches, show_admins};
use carwash_admin::routes::api::{
    api_v1_bookings, api_v1_branches, api_v1_payment_intent, api_v1_payment_intents,
    api_v1_refund,
};
use carwash_admin::routes::banners::{add_banner, delete_banner, edit_banner, show_banners};
use carwash_admin::routes::bookings::{
    add_booking, delete_booking, show_bookings, update_status, update_washer,
};
use carwash_admin::routes::branches::{
    add_branch, delete_branch, edit_branch, recalculate_rating, show_branch, show_branches,
    upload_image as upload_branch_image,
};
use carwash_admin::routes::franchises::{
    add_franchise, delete_franchise, edit_franchise, show_franchises,
};
use carwash_admin::routes::main::show_dashboard;
use carwash_admin::routes::offers::{add_offer, delete_offer, edit_offer, show_offers};
use carwash_admin::routes::orders::{show_order, show_orders, update_order_status};
use carwash_admin::routes::payments::{
    add_payment, refund, show_payment_intent, show_payment_intents, show_payments,
};
use carwash_admin::routes::product_categories::{
    add_product_category, delete_product_category, edit_product_category,
    show_product_categories,
};
use carwash_admin::routes::products::{
    add_product, delete_product, edit_product, show_products,
    upload_image as upload_product_image, upload_products,
};
use carwash_admin::routes::reports::{export_report, show_reports};
use carwash_admin::routes::reviews::{add_review, delete_review, show_reviews};
use carwash_admin::routes::wash_services::{
    add_service, delete_service, edit_service, show_services,
};
use carwash_admin::routes::washers::{
    add_washer, delete_washer, edit_washer, save_schedule, show_schedule, show_washers,
};
use carwash_admin::routes::{Gateway, UploadStorage, money_filter};
use carwash_admin::storage::{FsObjectStorage, PUBLIC_PREFIX, bootstrap_buckets};

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    env_logger::init_from_env(env_logger::Env::default().default_filter_or("info"));
    dotenv().ok(); // Load .env file

    let config = match AppConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            log::error!("Invalid configuration: {e}");
            std::process::exit(1);
        }
    };

    let secret_key = match &config.secret {
        Some(key) => Key::from(key.as_bytes()),
        None => Key::generate(),
    };

    let common_config = CommonServerConfig {
        secret: config.secret.clone().unwrap_or_default(),
        auth_service_url: config.auth_service_url.clone(),
    };

    let pool = match establish_connection_pool(&config.database_url) {
        Ok(pool) => pool,
        Err(e) => {
            log::error!("Failed to establish database connection: {e}");
            std::process::exit(1);
        }
    };
    let repo = DieselRepository::new(pool);

    let storage = FsObjectStorage::new(config.uploads_dir.clone());
    if let Err(e) = bootstrap_buckets(&storage, &config.default_bucket, &config.storage_buckets) {
        log::error!("Failed to prepare storage buckets: {e}");
        std::process::exit(1);
    }
    let uploads = web::Data::new(UploadStorage {
        storage,
        default_bucket: config.default_bucket.clone(),
    });

    let gateway = match config.stripe_secret_key.as_deref() {
        Some(secret_key) => match StripeGateway::new(config.stripe_api_base.clone(), secret_key) {
            Ok(stripe) => Gateway(Some(Arc::new(stripe) as Arc<dyn PaymentGateway>)),
            Err(e) => {
                log::error!("Failed to create the payment gateway client: {e}");
                std::process::exit(1);
            }
        },
        None => {
            log::warn!("STRIPE_SECRET_KEY not set, online payments are disabled");
            Gateway::default()
        }
    };

    let translations = match Translations::load(&config.locales_dir, &config.default_locale) {
        Ok(translations) => Arc::new(translations),
        Err(e) => {
            log::error!("Failed to load translations: {e}");
            std::process::exit(1);
        }
    };

    let message_store = CookieMessageStore::builder(secret_key.clone()).build();
    let message_framework = FlashMessagesFramework::builder(message_store).build();

    let mut tera = match Tera::new("templates/**/*") {
        Ok(t) => t,
        Err(e) => {
            log::error!("Parsing error(s): {e}");
            std::process::exit(1);
        }
    };
    tera.register_function("t", TranslateFunction::new(translations));
    tera.register_filter("money", money_filter);

    let domain = config.domain.clone();
    let uploads_dir = config.uploads_dir.clone();

    HttpServer::new(move || {
        App::new()
            .wrap(message_framework.clone())
            .wrap(IdentityMiddleware::default())
            .wrap(
                SessionMiddleware::builder(CookieSessionStore::default(), secret_key.clone())
                    .cookie_secure(false) // set to true in prod
                    .cookie_domain(Some(format!(".{domain}")))
                    .build(),
            )
            .wrap(middleware::Compress::default())
            .wrap(middleware::Logger::default())
            .service(Files::new("/assets", "./assets"))
            .service(Files::new(PUBLIC_PREFIX, uploads_dir.clone()))
            .service(not_assigned)
            .service(
                web::scope("/api")
                    .service(api_v1_branches)
                    .service(api_v1_bookings)
                    .service(api_v1_payment_intents)
                    .service(api_v1_payment_intent)
                    .service(api_v1_refund),
            )
            .service(
                web::scope("")
                    .wrap(RedirectUnauthorized)
                    .service(show_dashboard)
                    .service(show_franchises)
                    .service(add_franchise)
                    .service(edit_franchise)
                    .service(delete_franchise)
                    .service(show_branches)
                    .service(add_branch)
                    .service(edit_branch)
                    .service(delete_branch)
                    .service(upload_branch_image)
                    .service(recalculate_rating)
                    .service(show_branch)
                    .service(show_services)
                    .service(add_service)
                    .service(edit_service)
                    .service(delete_service)
                    .service(show_washers)
                    .service(add_washer)
                    .service(edit_washer)
                    .service(delete_washer)
                    .service(show_schedule)
                    .service(save_schedule)
                    .service(show_bookings)
                    .service(add_booking)
                    .service(update_status)
                    .service(update_washer)
                    .service(delete_booking)
                    .service(show_payments)
                    .service(add_payment)
                    .service(refund)
                    .service(show_payment_intents)
                    .service(show_payment_intent)
                    .service(show_product_categories)
                    .service(add_product_category)
                    .service(edit_product_category)
                    .service(delete_product_category)
                    .service(show_products)
                    .service(add_product)
                    .service(edit_product)
                    .service(delete_product)
                    .service(upload_product_image)
                    .service(upload_products)
                    .service(show_orders)
                    .service(update_order_status)
                    .service(show_order)
                    .service(show_reviews)
                    .service(add_review)
                    .service(delete_review)
                    .service(show_banners)
                    .service(add_banner)
                    .service(edit_banner)
                    .service(delete_banner)
                    .service(show_offers)
                    .service(add_offer)
                    .service(edit_offer)
                    .service(delete_offer)
                    .service(show_admins)
                    .service(add_admin)
                    .service(edit_admin_branches)
                    .service(delete_admin)
                    .service(show_reports)
                    .service(export_report)
                    .service(logout),
            )
            .app_data(web::Data::new(tera.clone()))
            .app_data(web::Data::new(repo.clone()))
            .app_data(web::Data::new(common_config.clone()))
            .app_data(web::Data::new(gateway.clone()))
            .app_data(uploads.clone())
    })
    .bind((config.address.clone(), config.port))?
    .run()
    .await
}
