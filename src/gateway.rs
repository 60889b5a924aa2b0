//! Payment gateway client used for online payments and refunds.

use std::collections::HashMap;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Largest page Stripe returns for list endpoints.
pub const MAX_PAGE_SIZE: u32 = 100;

#[derive(Debug, Clone, Error)]
pub enum GatewayError {
    #[error("network error: {0}")]
    Transport(String),
    #[error("http {status}: {message}")]
    Http { status: u16, message: String },
    #[error("payment gateway is not configured")]
    NotConfigured,
    #[error("json error: {0}")]
    Serde(String),
}

impl GatewayError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::Http { status: 404, .. })
    }
}

pub type GatewayResult<T> = Result<T, GatewayError>;

/// A Stripe payment intent, reduced to the fields shown in the admin.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PaymentIntent {
    pub id: String,
    /// Requested amount in the smallest currency unit.
    pub amount: i64,
    #[serde(default)]
    pub amount_received: i64,
    pub currency: String,
    pub status: String,
    /// Unix timestamp of creation.
    pub created: i64,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub metadata: HashMap<String, String>,
    /// Charge id, or the charge itself when requested with `expand[]`.
    #[serde(default)]
    pub latest_charge: Option<LatestCharge>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum LatestCharge {
    Expanded(Charge),
    Id(String),
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Charge {
    pub id: String,
    #[serde(default)]
    pub amount_refunded: i64,
}

impl PaymentIntent {
    /// Amount already refunded; zero unless the latest charge was expanded.
    pub fn amount_refunded(&self) -> i64 {
        match &self.latest_charge {
            Some(LatestCharge::Expanded(charge)) => charge.amount_refunded,
            _ => 0,
        }
    }

    /// What is left to refund of the received amount.
    pub fn refundable_amount(&self) -> i64 {
        (self.amount_received - self.amount_refunded()).max(0)
    }

    /// Booking referenced by the `booking_id` metadata entry.
    pub fn booking_id(&self) -> Option<i32> {
        self.metadata
            .get("booking_id")
            .and_then(|value| value.parse().ok())
    }
}

/// One page of a cursor-paginated list.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PaymentIntentPage {
    pub data: Vec<PaymentIntent>,
    pub has_more: bool,
}

impl PaymentIntentPage {
    /// Cursor for the next page when more results exist.
    pub fn next_cursor(&self) -> Option<&str> {
        if self.has_more {
            self.data.last().map(|intent| intent.id.as_str())
        } else {
            None
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Refund {
    pub id: String,
    pub amount: i64,
    pub currency: String,
    pub status: String,
    #[serde(default)]
    pub payment_intent: Option<String>,
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PaymentGateway: Send + Sync {
    async fn list_payment_intents(
        &self,
        limit: u32,
        starting_after: Option<String>,
    ) -> GatewayResult<PaymentIntentPage>;

    async fn retrieve_payment_intent(&self, id: &str) -> GatewayResult<PaymentIntent>;

    /// Refunds `amount` cents, or everything that is left when `None`.
    async fn create_refund(&self, payment_intent_id: &str, amount: Option<i64>)
    -> GatewayResult<Refund>;
}

#[derive(Debug, Deserialize)]
struct StripeErrorBody {
    error: StripeErrorDetail,
}

#[derive(Debug, Deserialize)]
struct StripeErrorDetail {
    message: Option<String>,
}

/// Extracts Stripe's error message, falling back to the raw body.
fn error_message(body: &str) -> String {
    serde_json::from_str::<StripeErrorBody>(body)
        .ok()
        .and_then(|parsed| parsed.error.message)
        .unwrap_or_else(|| body.to_string())
}

/// Stripe REST client with bearer authentication.
#[derive(Debug, Clone)]
pub struct StripeGateway {
    http: Client,
    api_base: String,
    secret_key: String,
}

impl StripeGateway {
    const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

    pub fn new(api_base: impl Into<String>, secret_key: impl Into<String>) -> GatewayResult<Self> {
        let secret_key = secret_key.into();
        if secret_key.trim().is_empty() {
            return Err(GatewayError::NotConfigured);
        }

        let http = Client::builder()
            .timeout(Self::REQUEST_TIMEOUT)
            .user_agent(concat!("carwash-admin/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| GatewayError::Transport(e.to_string()))?;

        Ok(Self {
            http,
            api_base: api_base.into().trim_end_matches('/').to_string(),
            secret_key,
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.api_base)
    }

    async fn parse<T: for<'de> Deserialize<'de>>(
        response: reqwest::Response,
    ) -> GatewayResult<T> {
        let status = response.status();
        if status.is_success() {
            return response
                .json::<T>()
                .await
                .map_err(|e| GatewayError::Serde(e.to_string()));
        }

        let body = response.text().await.unwrap_or_default();
        Err(GatewayError::Http {
            status: status.as_u16(),
            message: error_message(&body),
        })
    }
}

fn map_reqwest_error(e: reqwest::Error) -> GatewayError {
    GatewayError::Transport(e.to_string())
}

#[async_trait]
impl PaymentGateway for StripeGateway {
    async fn list_payment_intents(
        &self,
        limit: u32,
        starting_after: Option<String>,
    ) -> GatewayResult<PaymentIntentPage> {
        let mut query = vec![("limit", limit.clamp(1, MAX_PAGE_SIZE).to_string())];
        if let Some(cursor) = starting_after {
            query.push(("starting_after", cursor));
        }

        let response = self
            .http
            .get(self.url("/v1/payment_intents"))
            .bearer_auth(&self.secret_key)
            .query(&query)
            .send()
            .await
            .map_err(map_reqwest_error)?;

        Self::parse(response).await
    }

    async fn retrieve_payment_intent(&self, id: &str) -> GatewayResult<PaymentIntent> {
        let response = self
            .http
            .get(self.url(&format!("/v1/payment_intents/{id}")))
            .bearer_auth(&self.secret_key)
            .query(&[("expand[]", "latest_charge")])
            .send()
            .await
            .map_err(map_reqwest_error)?;

        Self::parse(response).await
    }

    async fn create_refund(
        &self,
        payment_intent_id: &str,
        amount: Option<i64>,
    ) -> GatewayResult<Refund> {
        let mut form = vec![("payment_intent", payment_intent_id.to_string())];
        if let Some(amount) = amount {
            form.push(("amount", amount.to_string()));
        }

        let response = self
            .http
            .post(self.url("/v1/refunds"))
            .bearer_auth(&self.secret_key)
            .form(&form)
            .send()
            .await
            .map_err(map_reqwest_error)?;

        let refund: Refund = Self::parse(response).await?;
        log::info!(
            "Refunded {} {} of {payment_intent_id} ({})",
            refund.amount,
            refund.currency,
            refund.id
        );
        Ok(refund)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn intent(id: &str) -> PaymentIntent {
        PaymentIntent {
            id: id.to_string(),
            amount: 1500,
            amount_received: 1500,
            currency: "usd".to_string(),
            status: "succeeded".to_string(),
            created: 1_714_550_400,
            description: None,
            metadata: HashMap::from([("booking_id".to_string(), "42".to_string())]),
            latest_charge: None,
        }
    }

    #[test]
    fn error_message_prefers_stripe_message() {
        let body = r#"{"error":{"type":"invalid_request_error","message":"No such payment_intent"}}"#;
        assert_eq!(error_message(body), "No such payment_intent");
        assert_eq!(error_message("bad gateway"), "bad gateway");
    }

    #[test]
    fn page_cursor_points_at_last_intent() {
        let page = PaymentIntentPage {
            data: vec![intent("pi_1"), intent("pi_2")],
            has_more: true,
        };
        assert_eq!(page.next_cursor(), Some("pi_2"));

        let last = PaymentIntentPage {
            data: vec![intent("pi_3")],
            has_more: false,
        };
        assert_eq!(last.next_cursor(), None);
    }

    #[test]
    fn intent_deserializes_with_missing_optional_fields() {
        let json = r#"{"id":"pi_9","amount":990,"currency":"eur","status":"requires_payment_method","created":1}"#;
        let parsed: PaymentIntent = serde_json::from_str(json).expect("intent");

        assert_eq!(parsed.amount_received, 0);
        assert!(parsed.metadata.is_empty());
        assert_eq!(parsed.booking_id(), None);
        assert_eq!(intent("pi_1").booking_id(), Some(42));
        assert_eq!(parsed.latest_charge, None);
    }

    #[test]
    fn refundable_amount_subtracts_expanded_charge_refunds() {
        let json = r#"{"id":"pi_4","amount":2000,"amount_received":2000,"currency":"usd",
            "status":"succeeded","created":1,
            "latest_charge":{"id":"ch_1","amount_refunded":500}}"#;
        let expanded: PaymentIntent = serde_json::from_str(json).expect("intent");
        assert_eq!(expanded.amount_refunded(), 500);
        assert_eq!(expanded.refundable_amount(), 1500);

        let json = r#"{"id":"pi_5","amount":2000,"amount_received":2000,"currency":"usd",
            "status":"succeeded","created":1,"latest_charge":"ch_2"}"#;
        let collapsed: PaymentIntent = serde_json::from_str(json).expect("intent");
        assert_eq!(collapsed.latest_charge, Some(LatestCharge::Id("ch_2".to_string())));
        assert_eq!(collapsed.refundable_amount(), 2000);
    }

    #[test]
    fn blank_secret_key_is_not_configured() {
        assert!(matches!(
            StripeGateway::new("https://api.stripe.com", " "),
            Err(GatewayError::NotConfigured)
        ));
    }
}
