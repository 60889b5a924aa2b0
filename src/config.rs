//! Runtime configuration collected from environment variables.

use std::env;
use std::path::PathBuf;

use thiserror::Error;

const DEFAULT_DATABASE_URL: &str = "app.db";
const DEFAULT_ADDRESS: &str = "127.0.0.1";
const DEFAULT_PORT: u16 = 8080;
const DEFAULT_DOMAIN: &str = "localhost";
const DEFAULT_UPLOADS_DIR: &str = "./uploads";
const DEFAULT_BUCKET: &str = "public";
const DEFAULT_STORAGE_BUCKETS: &str = "branches,products,banners";
const DEFAULT_STRIPE_API_BASE: &str = "https://api.stripe.com";
const DEFAULT_LOCALES_DIR: &str = "./locales";
const DEFAULT_LOCALE: &str = "en";

/// Errors raised while reading the configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{0} environment variable not set")]
    Missing(&'static str),
    #[error("invalid value `{value}` for {name}")]
    Invalid { name: &'static str, value: String },
}

/// Settings shared by the HTTP server and its collaborators.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub database_url: String,
    pub address: String,
    pub port: u16,
    pub domain: String,
    /// Raw session secret; a random key is generated when absent.
    pub secret: Option<String>,
    pub auth_service_url: String,
    pub uploads_dir: PathBuf,
    /// Bucket used when an upload targets a bucket that does not exist.
    pub default_bucket: String,
    /// Buckets created at startup in addition to the default one.
    pub storage_buckets: Vec<String>,
    /// Payment gateway features are disabled when no key is configured.
    pub stripe_secret_key: Option<String>,
    pub stripe_api_base: String,
    pub locales_dir: PathBuf,
    pub default_locale: String,
}

impl AppConfig {
    /// Read the configuration from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Read the configuration using a custom variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |name: &str| lookup(name).filter(|value| !value.trim().is_empty());

        let port = match non_empty("PORT") {
            Some(value) => value.trim().parse::<u16>().map_err(|_| ConfigError::Invalid {
                name: "PORT",
                value,
            })?,
            None => DEFAULT_PORT,
        };

        let auth_service_url =
            non_empty("AUTH_SERVICE_URL").ok_or(ConfigError::Missing("AUTH_SERVICE_URL"))?;

        let storage_buckets = parse_list(
            &non_empty("STORAGE_BUCKETS").unwrap_or_else(|| DEFAULT_STORAGE_BUCKETS.to_string()),
        );

        Ok(Self {
            database_url: non_empty("DATABASE_URL")
                .unwrap_or_else(|| DEFAULT_DATABASE_URL.to_string()),
            address: non_empty("ADDRESS").unwrap_or_else(|| DEFAULT_ADDRESS.to_string()),
            port,
            domain: non_empty("DOMAIN").unwrap_or_else(|| DEFAULT_DOMAIN.to_string()),
            secret: non_empty("SECRET_KEY"),
            auth_service_url,
            uploads_dir: PathBuf::from(
                non_empty("UPLOADS_DIR").unwrap_or_else(|| DEFAULT_UPLOADS_DIR.to_string()),
            ),
            default_bucket: non_empty("DEFAULT_BUCKET")
                .unwrap_or_else(|| DEFAULT_BUCKET.to_string()),
            storage_buckets,
            stripe_secret_key: non_empty("STRIPE_SECRET_KEY"),
            stripe_api_base: non_empty("STRIPE_API_BASE")
                .unwrap_or_else(|| DEFAULT_STRIPE_API_BASE.to_string()),
            locales_dir: PathBuf::from(
                non_empty("LOCALES_DIR").unwrap_or_else(|| DEFAULT_LOCALES_DIR.to_string()),
            ),
            default_locale: non_empty("DEFAULT_LOCALE")
                .unwrap_or_else(|| DEFAULT_LOCALE.to_string()),
        })
    }
}

fn parse_list(raw: &str) -> Vec<String> {
    let mut items: Vec<String> = Vec::new();
    for item in raw.split(',') {
        let item = item.trim();
        if !item.is_empty() && !items.iter().any(|existing| existing == item) {
            items.push(item.to_string());
        }
    }
    items
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(key, value)| (key.to_string(), value.to_string()))
            .collect();
        move |name| map.get(name).cloned()
    }

    #[test]
    fn defaults_are_applied() {
        let config = AppConfig::from_lookup(lookup_from(&[("AUTH_SERVICE_URL", "http://auth")]))
            .expect("config should load");

        assert_eq!(config.database_url, "app.db");
        assert_eq!(config.port, 8080);
        assert_eq!(config.default_bucket, "public");
        assert_eq!(config.storage_buckets, vec!["branches", "products", "banners"]);
        assert!(config.stripe_secret_key.is_none());
        assert!(config.secret.is_none());
    }

    #[test]
    fn missing_auth_service_url_is_an_error() {
        let result = AppConfig::from_lookup(lookup_from(&[]));

        assert!(matches!(result, Err(ConfigError::Missing("AUTH_SERVICE_URL"))));
    }

    #[test]
    fn invalid_port_is_reported() {
        let result = AppConfig::from_lookup(lookup_from(&[
            ("AUTH_SERVICE_URL", "http://auth"),
            ("PORT", "eighty"),
        ]));

        assert!(matches!(
            result,
            Err(ConfigError::Invalid { name: "PORT", value }) if value == "eighty"
        ));
    }

    #[test]
    fn bucket_list_is_trimmed_and_deduplicated() {
        let config = AppConfig::from_lookup(lookup_from(&[
            ("AUTH_SERVICE_URL", "http://auth"),
            ("STORAGE_BUCKETS", " banners, ,banners,avatars "),
            ("STRIPE_SECRET_KEY", "sk_test_123"),
        ]))
        .expect("config should load");

        assert_eq!(config.storage_buckets, vec!["banners", "avatars"]);
        assert_eq!(config.stripe_secret_key.as_deref(), Some("sk_test_123"));
    }
}
