use serde::Deserialize;
use thiserror::Error;
use validator::{Validate, ValidationErrors};

use crate::domain::order::OrderStatus;

#[derive(Debug, Error)]
pub enum OrderFormError {
    #[error("validation failed: {0}")]
    Validation(#[from] ValidationErrors),
    #[error("unknown order status `{0}`")]
    InvalidStatus(String),
}

#[derive(Debug, Deserialize, Validate)]
pub struct OrderStatusForm {
    #[validate(range(min = 1))]
    pub order_id: i32,
    pub status: String,
}

impl OrderStatusForm {
    pub fn into_parts(self) -> Result<(i32, OrderStatus), OrderFormError> {
        self.validate()?;
        let status = self
            .status
            .parse::<OrderStatus>()
            .map_err(OrderFormError::InvalidStatus)?;
        Ok((self.order_id, status))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn order_status_form_parses_known_status() {
        let form = OrderStatusForm {
            order_id: 2,
            status: "processing".to_string(),
        };
        assert!(matches!(form.into_parts(), Ok((2, OrderStatus::Processing))));
    }

    #[test]
    fn order_status_form_rejects_unknown_status() {
        let form = OrderStatusForm {
            order_id: 2,
            status: "shipped".to_string(),
        };
        assert!(matches!(
            form.into_parts(),
            Err(OrderFormError::InvalidStatus(value)) if value == "shipped"
        ));
    }
}
