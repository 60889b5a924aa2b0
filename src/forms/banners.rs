use actix_multipart::form::{MultipartForm, tempfile::TempFile, text::Text};
use chrono::Local;
use pushkind_common::routes::empty_string_as_none;
use serde::Deserialize;
use thiserror::Error;
use validator::{Validate, ValidationErrors};

use crate::domain::banner::UpdateBanner;
use crate::forms::sanitize_inline_text;
use crate::forms::uploads::{ImageUpload, UploadFormError, read_image};

const TITLE_MAX_LEN: usize = 128;

#[derive(Debug, Error)]
pub enum BannerFormError {
    #[error("validation failed: {0}")]
    Validation(#[from] ValidationErrors),
    #[error("banner title cannot be empty")]
    EmptyTitle,
    #[error("banner title is too long")]
    TitleTooLong,
    #[error("link must be an http(s) URL or a path, got `{0}`")]
    InvalidLink(String),
    #[error("position cannot be negative")]
    NegativePosition,
    #[error(transparent)]
    Image(#[from] UploadFormError),
}

fn banner_title(raw: &str) -> Result<String, BannerFormError> {
    let title = sanitize_inline_text(raw);
    if title.is_empty() {
        return Err(BannerFormError::EmptyTitle);
    }
    if title.chars().count() > TITLE_MAX_LEN {
        return Err(BannerFormError::TitleTooLong);
    }
    Ok(title)
}

fn banner_link(raw: Option<&str>) -> Result<Option<String>, BannerFormError> {
    let Some(link) = raw.map(str::trim).filter(|link| !link.is_empty()) else {
        return Ok(None);
    };

    if link.starts_with("https://") || link.starts_with("http://") || link.starts_with('/') {
        Ok(Some(link.to_string()))
    } else {
        Err(BannerFormError::InvalidLink(link.to_string()))
    }
}

fn banner_position(position: Option<i32>) -> Result<i32, BannerFormError> {
    match position.unwrap_or_default() {
        value if value < 0 => Err(BannerFormError::NegativePosition),
        value => Ok(value),
    }
}

/// Banner fields validated before the image is stored.
#[derive(Debug)]
pub struct BannerDraft {
    pub title: String,
    pub link_url: Option<String>,
    pub position: i32,
    pub image: ImageUpload,
}

#[derive(MultipartForm)]
/// Multipart form creating a banner together with its image.
pub struct AddBannerForm {
    pub title: Text<String>,
    pub link_url: Option<Text<String>>,
    pub position: Option<Text<i32>>,
    #[multipart(limit = "5MB")]
    pub image: TempFile,
}

impl AddBannerForm {
    pub fn into_draft(self) -> Result<BannerDraft, BannerFormError> {
        let title = banner_title(&self.title)?;
        let link_url = banner_link(self.link_url.as_ref().map(|link| link.as_str()))?;
        let position = banner_position(self.position.map(Text::into_inner))?;
        let image = read_image(self.image)?;

        Ok(BannerDraft {
            title,
            link_url,
            position,
            image,
        })
    }
}

#[derive(Debug, Deserialize, Validate)]
pub struct EditBannerForm {
    #[validate(range(min = 1))]
    pub banner_id: i32,
    pub title: String,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    pub link_url: Option<String>,
    #[serde(default)]
    pub position: Option<i32>,
    #[serde(default)]
    pub is_active: bool,
}

impl EditBannerForm {
    pub fn into_update_banner(self) -> Result<(i32, UpdateBanner), BannerFormError> {
        self.validate()?;

        Ok((
            self.banner_id,
            UpdateBanner {
                title: banner_title(&self.title)?,
                link_url: banner_link(self.link_url.as_deref())?,
                position: banner_position(self.position)?,
                is_active: self.is_active,
                updated_at: Local::now().naive_utc(),
            },
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::forms::uploads::tests::temp_upload;

    #[test]
    fn add_banner_form_builds_draft() {
        let form = AddBannerForm {
            title: Text(" Spring  sale ".to_string()),
            link_url: Some(Text("https://example.com/spring".to_string())),
            position: Some(Text(2)),
            image: temp_upload("spring.webp", b"RIFF"),
        };

        let draft = form.into_draft().expect("expected success");

        assert_eq!(draft.title, "Spring sale");
        assert_eq!(draft.link_url.as_deref(), Some("https://example.com/spring"));
        assert_eq!(draft.position, 2);
        assert_eq!(draft.image.bytes, b"RIFF");
    }

    #[test]
    fn add_banner_form_rejects_non_image() {
        let form = AddBannerForm {
            title: Text("Spring".to_string()),
            link_url: None,
            position: None,
            image: temp_upload("spring.pdf", b"%PDF"),
        };

        assert!(matches!(
            form.into_draft(),
            Err(BannerFormError::Image(UploadFormError::UnsupportedType(_)))
        ));
    }

    #[test]
    fn edit_banner_form_validates_link() {
        let form = EditBannerForm {
            banner_id: 1,
            title: "Spring".to_string(),
            link_url: Some("javascript:alert(1)".to_string()),
            position: Some(0),
            is_active: true,
        };

        assert!(matches!(
            form.into_update_banner(),
            Err(BannerFormError::InvalidLink(_))
        ));

        let form = EditBannerForm {
            banner_id: 1,
            title: "Spring".to_string(),
            link_url: Some("/offers".to_string()),
            position: None,
            is_active: true,
        };
        let (banner_id, update) = form.into_update_banner().expect("expected success");
        assert_eq!(banner_id, 1);
        assert_eq!(update.position, 0);
        assert_eq!(update.link_url.as_deref(), Some("/offers"));
    }
}
