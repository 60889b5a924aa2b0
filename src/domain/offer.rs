use chrono::{Local, NaiveDateTime};
use serde::{Deserialize, Serialize};

/// Discount campaign advertised to customers.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Offer {
    pub id: i32,
    pub hub_id: i32,
    pub title: String,
    pub description: Option<String>,
    /// Discount between 1 and 100 percent.
    pub discount_percent: i32,
    /// Optional promo code entered at checkout.
    pub code: Option<String>,
    pub starts_at: Option<NaiveDateTime>,
    pub ends_at: Option<NaiveDateTime>,
    pub is_active: bool,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

impl Offer {
    /// Whether the offer is active and `now` falls inside its validity window.
    pub fn is_current(&self, now: NaiveDateTime) -> bool {
        self.is_active
            && self.starts_at.is_none_or(|starts_at| starts_at <= now)
            && self.ends_at.is_none_or(|ends_at| now < ends_at)
    }
}

#[derive(Debug, Clone)]
pub struct NewOffer {
    pub hub_id: i32,
    pub title: String,
    pub description: Option<String>,
    pub discount_percent: i32,
    pub code: Option<String>,
    pub starts_at: Option<NaiveDateTime>,
    pub ends_at: Option<NaiveDateTime>,
    pub updated_at: NaiveDateTime,
}

impl NewOffer {
    pub fn new(hub_id: i32, title: impl Into<String>, discount_percent: i32) -> Self {
        Self {
            hub_id,
            title: title.into(),
            description: None,
            discount_percent,
            code: None,
            starts_at: None,
            ends_at: None,
            updated_at: Local::now().naive_utc(),
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_code(mut self, code: impl Into<String>) -> Self {
        self.code = Some(code.into());
        self
    }

    pub fn valid_between(
        mut self,
        starts_at: Option<NaiveDateTime>,
        ends_at: Option<NaiveDateTime>,
    ) -> Self {
        self.starts_at = starts_at;
        self.ends_at = ends_at;
        self
    }
}

#[derive(Debug, Clone)]
pub struct UpdateOffer {
    pub title: String,
    pub description: Option<String>,
    pub discount_percent: i32,
    pub code: Option<String>,
    pub starts_at: Option<NaiveDateTime>,
    pub ends_at: Option<NaiveDateTime>,
    pub is_active: bool,
    pub updated_at: NaiveDateTime,
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;

    fn at(day: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 6, day)
            .and_then(|date| date.and_hms_opt(12, 0, 0))
            .unwrap_or_default()
    }

    fn offer(starts_at: Option<NaiveDateTime>, ends_at: Option<NaiveDateTime>) -> Offer {
        Offer {
            id: 1,
            hub_id: 1,
            title: "Summer".to_string(),
            description: None,
            discount_percent: 10,
            code: None,
            starts_at,
            ends_at,
            is_active: true,
            created_at: at(1),
            updated_at: at(1),
        }
    }

    #[test]
    fn open_ended_offer_is_current() {
        assert!(offer(None, None).is_current(at(10)));
    }

    #[test]
    fn offer_respects_window() {
        let windowed = offer(Some(at(5)), Some(at(15)));

        assert!(!windowed.is_current(at(4)));
        assert!(windowed.is_current(at(5)));
        assert!(windowed.is_current(at(14)));
        assert!(!windowed.is_current(at(15)));
    }

    #[test]
    fn inactive_offer_is_never_current() {
        let mut inactive = offer(None, None);
        inactive.is_active = false;

        assert!(!inactive.is_current(at(10)));
    }
}
