use chrono::{Local, NaiveDateTime};
use pushkind_common::domain::auth::AuthenticatedUser;
use serde::Serialize;

use crate::domain::offer::Offer;
use crate::forms::offers::{AddOfferForm, EditOfferForm};
use crate::repository::{OfferReader, OfferWriter};
use crate::services::access::require_platform;
use crate::services::{ServiceError, ServiceResult};

/// An offer with its derived display state.
#[derive(Debug, Serialize)]
pub struct OfferView {
    #[serde(flatten)]
    pub offer: Offer,
    pub is_current: bool,
}

pub fn load_offers<R>(repo: &R, user: &AuthenticatedUser) -> ServiceResult<Vec<OfferView>>
where
    R: OfferReader + ?Sized,
{
    load_offers_at(repo, user, Local::now().naive_local())
}

/// Same as [`load_offers`] with an explicit "now".
pub fn load_offers_at<R>(
    repo: &R,
    user: &AuthenticatedUser,
    now: NaiveDateTime,
) -> ServiceResult<Vec<OfferView>>
where
    R: OfferReader + ?Sized,
{
    require_platform(user)?;

    let offers = repo.list_offers(user.hub_id).map_err(ServiceError::from)?;

    Ok(offers
        .into_iter()
        .map(|offer| OfferView {
            is_current: offer.is_current(now),
            offer,
        })
        .collect())
}

pub fn create_offer<R>(repo: &R, user: &AuthenticatedUser, form: AddOfferForm) -> ServiceResult<Offer>
where
    R: OfferWriter + ?Sized,
{
    require_platform(user)?;

    let new_offer = form
        .into_new_offer(user.hub_id)
        .map_err(|err| ServiceError::Form(err.to_string()))?;

    repo.create_offer(&new_offer).map_err(ServiceError::from)
}

pub fn modify_offer<R>(repo: &R, user: &AuthenticatedUser, form: EditOfferForm) -> ServiceResult<Offer>
where
    R: OfferWriter + ?Sized,
{
    require_platform(user)?;

    let (offer_id, update) = form
        .into_update_offer()
        .map_err(|err| ServiceError::Form(err.to_string()))?;

    repo.update_offer(offer_id, user.hub_id, &update)
        .map_err(ServiceError::from)
}

pub fn remove_offer<R>(repo: &R, user: &AuthenticatedUser, offer_id: i32) -> ServiceResult<()>
where
    R: OfferWriter + ?Sized,
{
    require_platform(user)?;

    repo.delete_offer(offer_id, user.hub_id)
        .map_err(ServiceError::from)
}
