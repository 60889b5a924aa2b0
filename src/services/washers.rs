use pushkind_common::domain::auth::AuthenticatedUser;
use pushkind_common::pagination::{DEFAULT_ITEMS_PER_PAGE, Paginated};
use serde::Deserialize;

use crate::domain::branch::Branch;
use crate::domain::washer::{ScheduleSlot, Washer, WasherListQuery, WasherStatus};
use crate::forms::washers::{AddWasherForm, EditWasherForm, ScheduleForm};
use crate::repository::{AdminReader, BranchReader, WasherReader, WasherWriter};
use crate::services::access::{ensure_branch_access, resolve_scope};
use crate::services::branches::list_accessible_branches;
use crate::services::{ServiceError, ServiceResult};

/// Query parameters accepted by the washers index page.
#[derive(Debug, Default, Deserialize)]
pub struct WashersQuery {
    pub search: Option<String>,
    pub page: Option<usize>,
    /// One of `active`, `on_leave`, `inactive`; anything else is ignored.
    pub status: Option<String>,
    pub branch_id: Option<i32>,
}

pub struct WashersPageData {
    pub washers: Paginated<Washer>,
    pub branches: Vec<Branch>,
    pub search: Option<String>,
    pub status: Option<WasherStatus>,
}

/// A washer together with the weekly working hours.
pub struct WasherSchedule {
    pub washer: Washer,
    pub slots: Vec<ScheduleSlot>,
}

pub fn load_washers_page<R>(
    repo: &R,
    user: &AuthenticatedUser,
    query: WashersQuery,
) -> ServiceResult<WashersPageData>
where
    R: AdminReader + BranchReader + WasherReader + ?Sized,
{
    let scope = resolve_scope(repo, user)?;
    let page = query.page.unwrap_or(1).max(1);

    let mut list_query = WasherListQuery::new(user.hub_id)
        .restrict_to(scope.branch_filter())
        .paginate(page, DEFAULT_ITEMS_PER_PAGE);

    let search = query
        .search
        .as_deref()
        .map(str::trim)
        .filter(|term| !term.is_empty())
        .map(str::to_string);
    if let Some(term) = &search {
        list_query = list_query.search(term);
    }

    let status = query
        .status
        .as_deref()
        .and_then(|value| value.parse::<WasherStatus>().ok());
    if let Some(status) = status {
        list_query = list_query.status(status);
    }

    if let Some(branch_id) = query.branch_id {
        ensure_branch_access(&scope, branch_id)?;
        list_query = list_query.branch(branch_id);
    }

    let (total, washers) = repo.list_washers(list_query).map_err(ServiceError::from)?;
    let branches = list_accessible_branches(repo, user.hub_id, &scope)?;

    Ok(WashersPageData {
        washers: Paginated::new(washers, page, total.div_ceil(DEFAULT_ITEMS_PER_PAGE)),
        branches,
        search,
        status,
    })
}

fn get_accessible_washer<R>(repo: &R, user: &AuthenticatedUser, washer_id: i32) -> ServiceResult<Washer>
where
    R: AdminReader + BranchReader + WasherReader + ?Sized,
{
    let scope = resolve_scope(repo, user)?;
    let washer = repo
        .get_washer_by_id(washer_id, user.hub_id)
        .map_err(ServiceError::from)?
        .ok_or(ServiceError::NotFound)?;
    ensure_branch_access(&scope, washer.branch_id)?;
    Ok(washer)
}

pub fn create_washer<R>(repo: &R, user: &AuthenticatedUser, form: AddWasherForm) -> ServiceResult<Washer>
where
    R: AdminReader + BranchReader + WasherWriter + ?Sized,
{
    let scope = resolve_scope(repo, user)?;

    let new_washer = form
        .into_new_washer(user.hub_id)
        .map_err(|err| ServiceError::Form(err.to_string()))?;
    ensure_branch_access(&scope, new_washer.branch_id)?;

    repo.create_washer(&new_washer)
        .map_err(ServiceError::from)
}

/// Updates a washer. Moving to another branch requires access to both branches.
pub fn modify_washer<R>(repo: &R, user: &AuthenticatedUser, form: EditWasherForm) -> ServiceResult<Washer>
where
    R: AdminReader + BranchReader + WasherReader + WasherWriter + ?Sized,
{
    let scope = resolve_scope(repo, user)?;

    let payload = form
        .into_update_washer()
        .map_err(|err| ServiceError::Form(err.to_string()))?;
    let current = get_accessible_washer(repo, user, payload.washer_id)?;
    if current.branch_id != payload.update.branch_id {
        ensure_branch_access(&scope, payload.update.branch_id)?;
    }

    repo.update_washer(payload.washer_id, user.hub_id, &payload.update)
        .map_err(ServiceError::from)
}

pub fn remove_washer<R>(repo: &R, user: &AuthenticatedUser, washer_id: i32) -> ServiceResult<()>
where
    R: AdminReader + BranchReader + WasherReader + WasherWriter + ?Sized,
{
    get_accessible_washer(repo, user, washer_id)?;

    repo.delete_washer(washer_id, user.hub_id)
        .map_err(ServiceError::from)
}

pub fn load_washer_schedule<R>(
    repo: &R,
    user: &AuthenticatedUser,
    washer_id: i32,
) -> ServiceResult<WasherSchedule>
where
    R: AdminReader + BranchReader + WasherReader + ?Sized,
{
    let washer = get_accessible_washer(repo, user, washer_id)?;
    let slots = repo
        .get_washer_schedule(washer_id, user.hub_id)
        .map_err(ServiceError::from)?;

    Ok(WasherSchedule { washer, slots })
}

/// Replaces the whole weekly schedule; an empty form clears it.
pub fn replace_schedule<R>(
    repo: &R,
    user: &AuthenticatedUser,
    washer_id: i32,
    form: ScheduleForm,
) -> ServiceResult<Vec<ScheduleSlot>>
where
    R: AdminReader + BranchReader + WasherReader + WasherWriter + ?Sized,
{
    get_accessible_washer(repo, user, washer_id)?;

    let slots = form
        .into_slots()
        .map_err(|err| ServiceError::Form(err.to_string()))?;

    repo.replace_washer_schedule(washer_id, user.hub_id, &slots)
        .map_err(ServiceError::from)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::mock::MockRepository;
    use crate::services::test_support::{HUB_ID, platform_user, sample_branch, sample_washer};

    fn schedule(rows: &[(i32, &str, &str)]) -> ScheduleForm {
        ScheduleForm {
            day_of_week: rows.iter().map(|row| row.0).collect(),
            start_time: rows.iter().map(|row| row.1.to_string()).collect(),
            end_time: rows.iter().map(|row| row.2.to_string()).collect(),
        }
    }

    #[test]
    fn page_applies_status_and_search_filters() {
        let mut repo = MockRepository::new();
        repo.expect_list_washers()
            .withf(|query| {
                query.status == Some(WasherStatus::OnLeave)
                    && query.search.as_deref() == Some("ann")
                    && query.branch_ids.is_none()
            })
            .returning(|_| Ok((1, vec![sample_washer(1, 1)])));
        repo.expect_list_branches()
            .returning(|_| Ok((1, vec![sample_branch(1)])));

        let query = WashersQuery {
            search: Some(" ann ".to_string()),
            page: None,
            status: Some("on_leave".to_string()),
            branch_id: None,
        };
        let data = load_washers_page(&repo, &platform_user(), query).expect("page");

        assert_eq!(data.status, Some(WasherStatus::OnLeave));
        assert_eq!(data.search.as_deref(), Some("ann"));
    }

    #[test]
    fn replace_schedule_stores_sorted_slots() {
        let mut repo = MockRepository::new();
        repo.expect_get_washer_by_id()
            .returning(|id, _| Ok(Some(sample_washer(id, 1))));
        repo.expect_replace_washer_schedule()
            .times(1)
            .withf(|washer_id, hub_id, slots| {
                *washer_id == 3
                    && *hub_id == HUB_ID
                    && slots.iter().map(|slot| slot.day_of_week).collect::<Vec<_>>() == vec![0, 2]
            })
            .returning(|_, _, slots| Ok(slots.to_vec()));

        let form = schedule(&[(2, "10:00", "18:00"), (0, "09:00", "17:00")]);
        let slots = replace_schedule(&repo, &platform_user(), 3, form).expect("saved");

        assert_eq!(slots.len(), 2);
    }

    #[test]
    fn replace_schedule_rejects_overlapping_days() {
        let mut repo = MockRepository::new();
        repo.expect_get_washer_by_id()
            .returning(|id, _| Ok(Some(sample_washer(id, 1))));
        repo.expect_replace_washer_schedule().never();

        let form = schedule(&[(1, "09:00", "12:00"), (1, "13:00", "17:00")]);
        let result = replace_schedule(&repo, &platform_user(), 3, form);

        assert!(matches!(result, Err(ServiceError::Form(_))));
    }

    #[test]
    fn missing_washer_is_not_found() {
        let mut repo = MockRepository::new();
        repo.expect_get_washer_by_id().returning(|_, _| Ok(None));

        let result = load_washer_schedule(&repo, &platform_user(), 99);

        assert!(matches!(result, Err(ServiceError::NotFound)));
    }
}
