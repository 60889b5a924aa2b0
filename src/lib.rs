pub mod config;
pub mod domain;
pub mod forms;
pub mod gateway;
pub mod i18n;
pub mod models;
pub mod repository;
pub mod routes;
pub mod schema;
pub mod services;
pub mod storage;

/// Role granted by the auth service to platform administrators.
pub const SERVICE_ACCESS_ROLE: &str = "carwash_admin";
/// Role granted to administrators of a single franchise.
pub const FRANCHISE_ADMIN_ROLE: &str = "carwash_franchise";
/// Role granted to administrators of individual branches.
pub const BRANCH_ADMIN_ROLE: &str = "carwash_branch";
