use pushkind_common::domain::auth::AuthenticatedUser;

use crate::domain::banner::{Banner, NewBanner};
use crate::forms::banners::{AddBannerForm, EditBannerForm};
use crate::repository::{BannerReader, BannerWriter};
use crate::services::access::require_platform;
use crate::services::{ServiceError, ServiceResult};
use crate::storage::{ObjectStorage, upload_with_fallback};

/// Bucket holding banner images.
pub const BANNER_IMAGE_BUCKET: &str = "banners";

/// Banners ordered by position.
pub fn load_banners<R>(repo: &R, user: &AuthenticatedUser) -> ServiceResult<Vec<Banner>>
where
    R: BannerReader + ?Sized,
{
    require_platform(user)?;

    repo.list_banners(user.hub_id).map_err(ServiceError::from)
}

/// Stores the uploaded image first, then inserts the banner pointing at it.
pub fn create_banner<R, S>(
    repo: &R,
    storage: &S,
    default_bucket: &str,
    user: &AuthenticatedUser,
    form: AddBannerForm,
) -> ServiceResult<Banner>
where
    R: BannerWriter + ?Sized,
    S: ObjectStorage + ?Sized,
{
    require_platform(user)?;

    let draft = form
        .into_draft()
        .map_err(|err| ServiceError::Form(err.to_string()))?;

    let image_url = upload_with_fallback(
        storage,
        BANNER_IMAGE_BUCKET,
        default_bucket,
        &draft.image.file_name,
        &draft.image.bytes,
    )?;

    let mut new_banner = NewBanner::new(user.hub_id, draft.title, image_url, draft.position);
    if let Some(link_url) = draft.link_url {
        new_banner = new_banner.with_link_url(link_url);
    }

    repo.create_banner(&new_banner).map_err(ServiceError::from)
}

pub fn modify_banner<R>(repo: &R, user: &AuthenticatedUser, form: EditBannerForm) -> ServiceResult<Banner>
where
    R: BannerWriter + ?Sized,
{
    require_platform(user)?;

    let (banner_id, update) = form
        .into_update_banner()
        .map_err(|err| ServiceError::Form(err.to_string()))?;

    repo.update_banner(banner_id, user.hub_id, &update)
        .map_err(ServiceError::from)
}

pub fn remove_banner<R>(repo: &R, user: &AuthenticatedUser, banner_id: i32) -> ServiceResult<()>
where
    R: BannerWriter + ?Sized,
{
    require_platform(user)?;

    repo.delete_banner(banner_id, user.hub_id)
        .map_err(ServiceError::from)
}
