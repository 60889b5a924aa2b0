use pushkind_common::domain::auth::AuthenticatedUser;
use pushkind_common::pagination::{DEFAULT_ITEMS_PER_PAGE, Paginated};

use crate::domain::access::AccessScope;
use crate::domain::booking::BookingListQuery;
use crate::domain::branch::{Branch, BranchListQuery};
use crate::domain::franchise::{Franchise, FranchiseListQuery};
use crate::domain::review::{Review, ReviewListQuery, average_rating};
use crate::domain::wash_service::{WashService, WashServiceListQuery};
use crate::domain::washer::{Washer, WasherListQuery};
use crate::forms::branches::{AddBranchForm, EditBranchForm};
use crate::forms::uploads::ImageUpload;
use crate::repository::{
    AdminReader, BookingReader, BranchReader, BranchWriter, FranchiseReader, ReviewReader,
    WashServiceReader, WasherReader,
};
use crate::services::access::{ensure_branch_access, resolve_scope};
use crate::services::{ListParams, ServiceError, ServiceResult};
use crate::storage::{ObjectStorage, upload_with_fallback};

/// Bucket holding branch photos.
pub const BRANCH_IMAGE_BUCKET: &str = "branches";
const RECENT_REVIEWS: usize = 10;

pub struct BranchesPageData {
    pub scope: AccessScope,
    pub branches: Paginated<Branch>,
    pub search: Option<String>,
    /// Franchise picker for platform administrators; empty otherwise.
    pub franchises: Vec<Franchise>,
}

/// Everything shown on a single branch page.
pub struct BranchDetail {
    pub branch: Branch,
    pub services: Vec<WashService>,
    pub washers: Vec<Washer>,
    pub reviews: Vec<Review>,
    pub can_manage: bool,
}

pub fn load_branches_page<R>(
    repo: &R,
    user: &AuthenticatedUser,
    params: ListParams,
) -> ServiceResult<BranchesPageData>
where
    R: AdminReader + BranchReader + FranchiseReader + ?Sized,
{
    let scope = resolve_scope(repo, user)?;
    let page = params.page();

    let mut query = BranchListQuery::new(user.hub_id)
        .restrict_to(scope.branch_filter())
        .paginate(page, DEFAULT_ITEMS_PER_PAGE);
    if let Some(term) = params.search_term() {
        query = query.search(term);
    }

    let (total, branches) = repo.list_branches(query).map_err(ServiceError::from)?;

    let franchises = if scope.is_platform() {
        repo.list_franchises(FranchiseListQuery::new(user.hub_id))
            .map_err(ServiceError::from)?
            .1
    } else {
        Vec::new()
    };

    Ok(BranchesPageData {
        branches: Paginated::new(branches, page, total.div_ceil(DEFAULT_ITEMS_PER_PAGE)),
        search: params.search_term().map(str::to_string),
        franchises,
        scope,
    })
}

/// Active branches visible to the user, for pickers on other pages.
pub fn list_accessible_branches<R>(repo: &R, hub_id: i32, scope: &AccessScope) -> ServiceResult<Vec<Branch>>
where
    R: BranchReader + ?Sized,
{
    let (_, branches) = repo
        .list_branches(BranchListQuery::new(hub_id).restrict_to(scope.branch_filter()))
        .map_err(ServiceError::from)?;
    Ok(branches)
}

/// Loads a branch the user can access. Branches outside the scope are reported as missing.
pub(crate) fn get_accessible_branch<R>(
    repo: &R,
    hub_id: i32,
    scope: &AccessScope,
    branch_id: i32,
) -> ServiceResult<Branch>
where
    R: BranchReader + ?Sized,
{
    ensure_branch_access(scope, branch_id)?;
    repo.get_branch_by_id(branch_id, hub_id)
        .map_err(ServiceError::from)?
        .ok_or(ServiceError::NotFound)
}

pub fn load_branch<R>(repo: &R, user: &AuthenticatedUser, branch_id: i32) -> ServiceResult<BranchDetail>
where
    R: AdminReader + BranchReader + WashServiceReader + WasherReader + ReviewReader + ?Sized,
{
    let scope = resolve_scope(repo, user)?;
    let branch = get_accessible_branch(repo, user.hub_id, &scope, branch_id)?;

    let services = repo
        .list_services(WashServiceListQuery::new(user.hub_id).branch(branch_id))
        .map_err(ServiceError::from)?;
    let (_, washers) = repo
        .list_washers(WasherListQuery::new(user.hub_id).branch(branch_id))
        .map_err(ServiceError::from)?;
    let (_, reviews) = repo
        .list_reviews(
            ReviewListQuery::new(user.hub_id)
                .restrict_to(Some(vec![branch_id]))
                .paginate(1, RECENT_REVIEWS),
        )
        .map_err(ServiceError::from)?;

    Ok(BranchDetail {
        branch,
        services,
        washers,
        reviews,
        can_manage: scope.can_manage_branches(),
    })
}

/// Resolves the franchise a new or edited branch belongs to.
///
/// Franchise administrators cannot move branches out of their franchise,
/// platform administrators may pick any existing franchise of the hub.
fn effective_franchise<R>(
    repo: &R,
    hub_id: i32,
    scope: &AccessScope,
    requested: Option<i32>,
) -> ServiceResult<Option<i32>>
where
    R: FranchiseReader + ?Sized,
{
    if let Some(franchise_id) = scope.franchise_id() {
        return Ok(Some(franchise_id));
    }

    match requested {
        Some(franchise_id) => {
            let exists = repo
                .get_franchise_by_id(franchise_id, hub_id)
                .map_err(ServiceError::from)?
                .is_some();
            if exists {
                Ok(Some(franchise_id))
            } else {
                Err(ServiceError::Form(format!("franchise {franchise_id} does not exist")))
            }
        }
        None => Ok(None),
    }
}

pub fn create_branch<R>(repo: &R, user: &AuthenticatedUser, form: AddBranchForm) -> ServiceResult<Branch>
where
    R: AdminReader + BranchReader + BranchWriter + FranchiseReader + ?Sized,
{
    let scope = resolve_scope(repo, user)?;
    if !scope.can_manage_branches() {
        return Err(ServiceError::Unauthorized);
    }

    let mut new_branch = form
        .into_new_branch(user.hub_id)
        .map_err(|err| ServiceError::Form(err.to_string()))?;
    new_branch.franchise_id = effective_franchise(repo, user.hub_id, &scope, new_branch.franchise_id)?;

    let branch = repo.create_branch(&new_branch).map_err(ServiceError::from)?;
    log::info!("Created branch {} in hub {}", branch.id, branch.hub_id);
    Ok(branch)
}

pub fn modify_branch<R>(repo: &R, user: &AuthenticatedUser, form: EditBranchForm) -> ServiceResult<Branch>
where
    R: AdminReader + BranchReader + BranchWriter + FranchiseReader + ?Sized,
{
    let scope = resolve_scope(repo, user)?;
    if !scope.can_manage_branches() {
        return Err(ServiceError::Unauthorized);
    }

    let mut payload = form
        .into_update_branch()
        .map_err(|err| ServiceError::Form(err.to_string()))?;
    ensure_branch_access(&scope, payload.branch_id)?;
    payload.update.franchise_id =
        effective_franchise(repo, user.hub_id, &scope, payload.update.franchise_id)?;

    repo.update_branch(payload.branch_id, user.hub_id, &payload.update)
        .map_err(ServiceError::from)
}

pub fn remove_branch<R>(repo: &R, user: &AuthenticatedUser, branch_id: i32) -> ServiceResult<()>
where
    R: AdminReader + BranchReader + BranchWriter + ?Sized,
{
    let scope = resolve_scope(repo, user)?;
    if !scope.can_manage_branches() {
        return Err(ServiceError::Unauthorized);
    }
    ensure_branch_access(&scope, branch_id)?;

    repo.delete_branch(branch_id, user.hub_id)
        .map_err(ServiceError::from)
}

/// Stores the photo and points the branch at its public URL.
pub fn upload_branch_image<R, S>(
    repo: &R,
    storage: &S,
    default_bucket: &str,
    user: &AuthenticatedUser,
    branch_id: i32,
    upload: ImageUpload,
) -> ServiceResult<Branch>
where
    R: AdminReader + BranchReader + BranchWriter + ?Sized,
    S: ObjectStorage + ?Sized,
{
    let scope = resolve_scope(repo, user)?;
    get_accessible_branch(repo, user.hub_id, &scope, branch_id)?;

    let url = upload_with_fallback(
        storage,
        BRANCH_IMAGE_BUCKET,
        default_bucket,
        &upload.file_name,
        &upload.bytes,
    )?;

    repo.set_branch_image(branch_id, user.hub_id, &url)
        .map_err(ServiceError::from)
}

/// Recomputes the average review rating of a branch and stores it.
pub fn recalculate_rating<R>(repo: &R, hub_id: i32, branch_id: i32) -> ServiceResult<f64>
where
    R: BookingReader + ReviewReader + BranchWriter + ?Sized,
{
    let (_, bookings) = repo
        .list_bookings(BookingListQuery::new(hub_id).branch(branch_id))
        .map_err(ServiceError::from)?;

    let rating = if bookings.is_empty() {
        0.0
    } else {
        let booking_ids = bookings.iter().map(|booking| booking.id).collect();
        let (_, reviews) = repo
            .list_reviews(ReviewListQuery::new(hub_id).bookings(booking_ids))
            .map_err(ServiceError::from)?;
        let ratings: Vec<i32> = reviews.iter().map(|review| review.rating).collect();
        average_rating(&ratings)
    };

    repo.set_branch_rating(branch_id, hub_id, rating)
        .map_err(ServiceError::from)?;
    log::debug!("Branch {branch_id} rating set to {rating}");
    Ok(rating)
}

/// On-demand rating refresh triggered from the branch page.
pub fn refresh_branch_rating<R>(repo: &R, user: &AuthenticatedUser, branch_id: i32) -> ServiceResult<f64>
where
    R: AdminReader + BranchReader + BranchWriter + BookingReader + ReviewReader + ?Sized,
{
    let scope = resolve_scope(repo, user)?;
    get_accessible_branch(repo, user.hub_id, &scope, branch_id)?;
    recalculate_rating(repo, user.hub_id, branch_id)
}
