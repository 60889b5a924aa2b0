use chrono::{Local, NaiveDateTime};
use serde::{Deserialize, Serialize};

/// Promotional banner shown in the customer app.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Banner {
    pub id: i32,
    pub hub_id: i32,
    pub title: String,
    pub image_url: String,
    pub link_url: Option<String>,
    /// Display order, ascending.
    pub position: i32,
    pub is_active: bool,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

#[derive(Debug, Clone)]
pub struct NewBanner {
    pub hub_id: i32,
    pub title: String,
    pub image_url: String,
    pub link_url: Option<String>,
    pub position: i32,
    pub updated_at: NaiveDateTime,
}

impl NewBanner {
    pub fn new(
        hub_id: i32,
        title: impl Into<String>,
        image_url: impl Into<String>,
        position: i32,
    ) -> Self {
        Self {
            hub_id,
            title: title.into(),
            image_url: image_url.into(),
            link_url: None,
            position,
            updated_at: Local::now().naive_utc(),
        }
    }

    pub fn with_link_url(mut self, link_url: impl Into<String>) -> Self {
        self.link_url = Some(link_url.into());
        self
    }
}

#[derive(Debug, Clone)]
pub struct UpdateBanner {
    pub title: String,
    pub link_url: Option<String>,
    pub position: i32,
    pub is_active: bool,
    pub updated_at: NaiveDateTime,
}
