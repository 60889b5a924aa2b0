use pushkind_common::routes::empty_string_as_none;
use serde::Deserialize;
use thiserror::Error;
use validator::{Validate, ValidationErrors};

use crate::domain::payment::PaymentMethod;
use crate::forms::{parse_money, sanitize_currency};

const INTENT_ID_MAX_LEN: u64 = 255;

#[derive(Debug, Error)]
pub enum PaymentFormError {
    #[error("validation failed: {0}")]
    Validation(#[from] ValidationErrors),
    #[error("invalid amount `{0}`")]
    InvalidAmount(String),
    #[error("amount must be greater than zero")]
    ZeroAmount,
    #[error("invalid currency code `{0}`")]
    InvalidCurrency(String),
    #[error("manual payments accept cash or card, got `{0}`")]
    InvalidMethod(String),
}

fn positive_amount(raw: &str) -> Result<i32, PaymentFormError> {
    match parse_money(raw) {
        Some(0) => Err(PaymentFormError::ZeroAmount),
        Some(cents) => Ok(cents),
        None => Err(PaymentFormError::InvalidAmount(raw.trim().to_string())),
    }
}

/// Cash or card payment taken at the branch for a booking.
#[derive(Debug, Deserialize, Validate)]
pub struct ManualPaymentForm {
    #[validate(range(min = 1))]
    pub booking_id: i32,
    /// Blank charges the booking price.
    #[serde(default, deserialize_with = "empty_string_as_none")]
    pub amount: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    pub currency: Option<String>,
    pub method: String,
}

#[derive(Debug)]
pub struct ManualPayment {
    pub booking_id: i32,
    pub amount_cents: Option<i32>,
    pub currency: Option<String>,
    pub method: PaymentMethod,
}

impl ManualPaymentForm {
    pub fn into_manual_payment(self) -> Result<ManualPayment, PaymentFormError> {
        self.validate()?;

        let method = match self.method.parse::<PaymentMethod>() {
            Ok(method @ (PaymentMethod::Cash | PaymentMethod::Card)) => method,
            _ => return Err(PaymentFormError::InvalidMethod(self.method.trim().to_string())),
        };

        let amount_cents = self.amount.as_deref().map(positive_amount).transpose()?;

        let currency = match self.currency.as_deref() {
            Some(raw) => Some(
                sanitize_currency(raw)
                    .ok_or_else(|| PaymentFormError::InvalidCurrency(raw.trim().to_string()))?,
            ),
            None => None,
        };

        Ok(ManualPayment {
            booking_id: self.booking_id,
            amount_cents,
            currency,
            method,
        })
    }
}

/// Refund of a gateway payment intent; a blank amount refunds what is left.
#[derive(Debug, Deserialize, Validate)]
pub struct RefundForm {
    #[validate(length(min = 1, max = INTENT_ID_MAX_LEN))]
    pub payment_intent_id: String,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    pub amount: Option<String>,
}

impl RefundForm {
    pub fn into_parts(self) -> Result<(String, Option<i32>), PaymentFormError> {
        self.validate()?;
        let amount = self.amount.as_deref().map(positive_amount).transpose()?;
        Ok((self.payment_intent_id.trim().to_string(), amount))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn manual_payment_form_accepts_cash() {
        let form = ManualPaymentForm {
            booking_id: 4,
            amount: Some("19.99".to_string()),
            currency: Some("eur".to_string()),
            method: "cash".to_string(),
        };

        let payment = form.into_manual_payment().expect("expected success");

        assert_eq!(payment.booking_id, 4);
        assert_eq!(payment.amount_cents, Some(1999));
        assert_eq!(payment.currency.as_deref(), Some("EUR"));
        assert_eq!(payment.method, PaymentMethod::Cash);
    }

    #[test]
    fn manual_payment_form_rejects_online_method() {
        let form = ManualPaymentForm {
            booking_id: 4,
            amount: None,
            currency: None,
            method: "online".to_string(),
        };

        assert!(matches!(
            form.into_manual_payment(),
            Err(PaymentFormError::InvalidMethod(method)) if method == "online"
        ));
    }

    #[test]
    fn refund_form_rejects_zero_amount() {
        let form = RefundForm {
            payment_intent_id: "pi_123".to_string(),
            amount: Some("0.00".to_string()),
        };
        assert!(matches!(form.into_parts(), Err(PaymentFormError::ZeroAmount)));

        let form = RefundForm {
            payment_intent_id: " pi_123 ".to_string(),
            amount: None,
        };
        assert!(matches!(form.into_parts(), Ok((id, None)) if id == "pi_123"));
    }
}
