use pushkind_common::domain::auth::AuthenticatedUser;
use serde::Deserialize;

use crate::domain::branch::Branch;
use crate::domain::wash_service::{WashService, WashServiceListQuery};
use crate::forms::wash_services::{AddWashServiceForm, EditWashServiceForm};
use crate::repository::{AdminReader, BranchReader, WashServiceReader, WashServiceWriter};
use crate::services::access::{ensure_branch_access, resolve_scope};
use crate::services::branches::list_accessible_branches;
use crate::services::{ServiceError, ServiceResult};

/// Query parameters accepted by the services index page.
#[derive(Debug, Default, Deserialize)]
pub struct WashServicesQuery {
    pub branch_id: Option<i32>,
}

pub struct WashServicesPageData {
    pub services: Vec<WashService>,
    /// Branches the user may pick from; also used to label the table rows.
    pub branches: Vec<Branch>,
    pub selected_branch: Option<i32>,
}

pub fn load_services_page<R>(
    repo: &R,
    user: &AuthenticatedUser,
    query: WashServicesQuery,
) -> ServiceResult<WashServicesPageData>
where
    R: AdminReader + BranchReader + WashServiceReader + ?Sized,
{
    let scope = resolve_scope(repo, user)?;

    let mut list_query = WashServiceListQuery::new(user.hub_id).restrict_to(scope.branch_filter());
    if let Some(branch_id) = query.branch_id {
        ensure_branch_access(&scope, branch_id)?;
        list_query = list_query.branch(branch_id);
    }

    let services = repo.list_services(list_query).map_err(ServiceError::from)?;
    let branches = list_accessible_branches(repo, user.hub_id, &scope)?;

    Ok(WashServicesPageData {
        services,
        branches,
        selected_branch: query.branch_id,
    })
}

/// Loads a service whose branch the user can access.
fn get_accessible_service<R>(
    repo: &R,
    user: &AuthenticatedUser,
    service_id: i32,
) -> ServiceResult<WashService>
where
    R: AdminReader + BranchReader + WashServiceReader + ?Sized,
{
    let scope = resolve_scope(repo, user)?;
    let service = repo
        .get_service_by_id(service_id, user.hub_id)
        .map_err(ServiceError::from)?
        .ok_or(ServiceError::NotFound)?;
    ensure_branch_access(&scope, service.branch_id)?;
    Ok(service)
}

pub fn create_service<R>(
    repo: &R,
    user: &AuthenticatedUser,
    form: AddWashServiceForm,
) -> ServiceResult<WashService>
where
    R: AdminReader + BranchReader + WashServiceWriter + ?Sized,
{
    let scope = resolve_scope(repo, user)?;

    let new_service = form
        .into_new_service(user.hub_id)
        .map_err(|err| ServiceError::Form(err.to_string()))?;
    ensure_branch_access(&scope, new_service.branch_id)?;

    repo.create_service(&new_service)
        .map_err(ServiceError::from)
}

pub fn modify_service<R>(
    repo: &R,
    user: &AuthenticatedUser,
    form: EditWashServiceForm,
) -> ServiceResult<WashService>
where
    R: AdminReader + BranchReader + WashServiceReader + WashServiceWriter + ?Sized,
{
    let payload = form
        .into_update_service()
        .map_err(|err| ServiceError::Form(err.to_string()))?;
    get_accessible_service(repo, user, payload.service_id)?;

    repo.update_service(payload.service_id, user.hub_id, &payload.update)
        .map_err(ServiceError::from)
}

/// Deletes a service; bookings keep their captured price and lose the reference.
pub fn remove_service<R>(repo: &R, user: &AuthenticatedUser, service_id: i32) -> ServiceResult<()>
where
    R: AdminReader + BranchReader + WashServiceReader + WashServiceWriter + ?Sized,
{
    get_accessible_service(repo, user, service_id)?;

    repo.delete_service(service_id, user.hub_id)
        .map_err(ServiceError::from)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::BRANCH_ADMIN_ROLE;
    use crate::domain::admin::{Admin, AdminRole};
    use crate::repository::mock::MockRepository;
    use crate::services::test_support::{
        HUB_ID, fixed_datetime, platform_user, sample_branch, sample_service, user_with_roles,
    };

    fn branch_admin_repo(branch_ids: Vec<i32>) -> MockRepository {
        let mut repo = MockRepository::new();
        repo.expect_get_admin_by_email().returning(move |_, _| {
            Ok(Some(Admin {
                id: 1,
                hub_id: HUB_ID,
                email: "admin@example.com".to_string(),
                name: "Admin".to_string(),
                role: AdminRole::Branch,
                franchise_id: None,
                branch_ids: branch_ids.clone(),
                created_at: fixed_datetime(),
                updated_at: fixed_datetime(),
            }))
        });
        repo
    }

    fn add_form(branch_id: i32) -> AddWashServiceForm {
        AddWashServiceForm {
            branch_id,
            name: "Full wash".to_string(),
            description: None,
            price: "15.00".to_string(),
            duration_minutes: 45,
        }
    }

    #[test]
    fn create_in_foreign_branch_is_not_found() {
        let repo = branch_admin_repo(vec![1]);
        let user = user_with_roles(&[BRANCH_ADMIN_ROLE]);

        let result = create_service(&repo, &user, add_form(2));

        assert!(matches!(result, Err(ServiceError::NotFound)));
    }

    #[test]
    fn create_in_own_branch_stores_cents() {
        let mut repo = branch_admin_repo(vec![1]);
        repo.expect_create_service()
            .times(1)
            .withf(|new| new.branch_id == 1 && new.price_cents == 1500 && new.duration_minutes == 45)
            .returning(|new| Ok(sample_service(3, new.branch_id, new.price_cents)));

        let user = user_with_roles(&[BRANCH_ADMIN_ROLE]);
        let service = create_service(&repo, &user, add_form(1)).expect("created");

        assert_eq!(service.price_cents, 1500);
    }

    #[test]
    fn edit_checks_the_stored_branch() {
        let mut repo = branch_admin_repo(vec![1]);
        repo.expect_get_service_by_id()
            .returning(|id, _| Ok(Some(sample_service(id, 2, 1000))));
        repo.expect_update_service().never();

        let form = EditWashServiceForm {
            service_id: 8,
            name: "Wax".to_string(),
            description: None,
            price: "9.99".to_string(),
            duration_minutes: 20,
            is_active: true,
        };
        let result = modify_service(&repo, &user_with_roles(&[BRANCH_ADMIN_ROLE]), form);

        assert!(matches!(result, Err(ServiceError::NotFound)));
    }

    #[test]
    fn page_filters_by_selected_branch() {
        let mut repo = MockRepository::new();
        repo.expect_list_services()
            .withf(|query| query.branch_id == Some(4) && query.branch_ids.is_none())
            .returning(|_| Ok(vec![sample_service(1, 4, 1000)]));
        repo.expect_list_branches()
            .returning(|_| Ok((1, vec![sample_branch(4)])));

        let query = WashServicesQuery { branch_id: Some(4) };
        let data = load_services_page(&repo, &platform_user(), query).expect("page");

        assert_eq!(data.services.len(), 1);
        assert_eq!(data.selected_branch, Some(4));
    }
}
