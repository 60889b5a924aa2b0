use pushkind_common::domain::auth::AuthenticatedUser;
use pushkind_common::pagination::{DEFAULT_ITEMS_PER_PAGE, Paginated};
use serde::Deserialize;

use crate::domain::access::AccessScope;
use crate::domain::admin::{Admin, AdminListQuery, AdminRole};
use crate::domain::branch::Branch;
use crate::domain::franchise::Franchise;
use crate::forms::admins::{AddAdminForm, AssignBranchesForm};
use crate::repository::{AdminReader, AdminWriter, BranchReader, FranchiseReader};
use crate::services::access::require_platform;
use crate::services::branches::list_accessible_branches;
use crate::services::franchises::list_all_franchises;
use crate::services::{ServiceError, ServiceResult};

#[derive(Debug, Default, Deserialize)]
pub struct AdminsQuery {
    pub search: Option<String>,
    pub page: Option<usize>,
    pub role: Option<String>,
}

/// Data required to render the administrators page.
pub struct AdminsPageData {
    pub admins: Paginated<Admin>,
    pub franchises: Vec<Franchise>,
    pub branches: Vec<Branch>,
    pub search: Option<String>,
    pub role: Option<AdminRole>,
}

pub fn load_admins_page<R>(
    repo: &R,
    user: &AuthenticatedUser,
    query: AdminsQuery,
) -> ServiceResult<AdminsPageData>
where
    R: AdminReader + BranchReader + FranchiseReader + ?Sized,
{
    require_platform(user)?;

    let page = query.page.unwrap_or(1).max(1);
    let search = query
        .search
        .as_deref()
        .map(str::trim)
        .filter(|term| !term.is_empty())
        .map(str::to_string);
    let role = query
        .role
        .as_deref()
        .and_then(|value| value.parse::<AdminRole>().ok());

    let mut list_query = AdminListQuery::new(user.hub_id).paginate(page, DEFAULT_ITEMS_PER_PAGE);
    if let Some(term) = &search {
        list_query = list_query.search(term.clone());
    }
    if let Some(role) = role {
        list_query = list_query.role(role);
    }

    let (total, admins) = repo.list_admins(list_query).map_err(ServiceError::from)?;

    Ok(AdminsPageData {
        admins: Paginated::new(admins, page, total.div_ceil(DEFAULT_ITEMS_PER_PAGE)),
        franchises: list_all_franchises(repo, user.hub_id)?,
        branches: list_accessible_branches(repo, user.hub_id, &AccessScope::Platform)?,
        search,
        role,
    })
}

/// Every id must name a branch of the hub.
fn ensure_branches_exist<R>(repo: &R, hub_id: i32, branch_ids: &[i32]) -> ServiceResult<()>
where
    R: BranchReader + ?Sized,
{
    for branch_id in branch_ids {
        if repo.get_branch_by_id(*branch_id, hub_id)?.is_none() {
            return Err(ServiceError::Form(format!("unknown branch {branch_id}")));
        }
    }
    Ok(())
}

pub fn create_admin<R>(repo: &R, user: &AuthenticatedUser, form: AddAdminForm) -> ServiceResult<Admin>
where
    R: AdminReader + AdminWriter + BranchReader + FranchiseReader + ?Sized,
{
    require_platform(user)?;

    let new_admin = form
        .into_new_admin(user.hub_id)
        .map_err(|err| ServiceError::Form(err.to_string()))?;

    if repo
        .get_admin_by_email(&new_admin.email, user.hub_id)
        .map_err(ServiceError::from)?
        .is_some()
    {
        return Err(ServiceError::Conflict(format!(
            "administrator {} already exists",
            new_admin.email
        )));
    }

    if let Some(franchise_id) = new_admin.franchise_id
        && repo
            .get_franchise_by_id(franchise_id, user.hub_id)
            .map_err(ServiceError::from)?
            .is_none()
    {
        return Err(ServiceError::Form(format!("unknown franchise {franchise_id}")));
    }
    ensure_branches_exist(repo, user.hub_id, &new_admin.branch_ids)?;

    let admin = repo.create_admin(&new_admin).map_err(ServiceError::from)?;
    log::info!(
        "Created {} admin {} in hub {}",
        admin.role.as_str(),
        admin.email,
        admin.hub_id
    );
    Ok(admin)
}

/// Replaces the branches of a branch administrator.
pub fn assign_branches<R>(
    repo: &R,
    user: &AuthenticatedUser,
    form: AssignBranchesForm,
) -> ServiceResult<Admin>
where
    R: AdminReader + AdminWriter + BranchReader + ?Sized,
{
    require_platform(user)?;

    let (admin_id, branch_ids) = form
        .into_parts()
        .map_err(|err| ServiceError::Form(err.to_string()))?;

    let admin = repo
        .get_admin_by_id(admin_id, user.hub_id)
        .map_err(ServiceError::from)?
        .ok_or(ServiceError::NotFound)?;
    if admin.role != AdminRole::Branch {
        return Err(ServiceError::Conflict(
            "only branch administrators have branch assignments".to_string(),
        ));
    }
    ensure_branches_exist(repo, user.hub_id, &branch_ids)?;

    repo.replace_branch_assignments(admin_id, user.hub_id, &branch_ids)
        .map_err(ServiceError::from)
}

pub fn remove_admin<R>(repo: &R, user: &AuthenticatedUser, admin_id: i32) -> ServiceResult<()>
where
    R: AdminWriter + ?Sized,
{
    require_platform(user)?;

    repo.delete_admin(admin_id, user.hub_id)
        .map_err(ServiceError::from)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::mock::MockRepository;
    use crate::services::test_support::{HUB_ID, fixed_datetime, platform_user, sample_branch};

    fn admin(id: i32, role: AdminRole) -> Admin {
        Admin {
            id,
            hub_id: HUB_ID,
            email: "manager@example.com".to_string(),
            name: "Manager".to_string(),
            role,
            franchise_id: None,
            branch_ids: vec![1],
            created_at: fixed_datetime(),
            updated_at: fixed_datetime(),
        }
    }

    fn branch_admin_form(email: &str, branch_ids: Vec<i32>) -> AddAdminForm {
        AddAdminForm {
            email: email.to_string(),
            name: "Manager".to_string(),
            role: "branch".to_string(),
            franchise_id: None,
            branch_ids,
        }
    }

    #[test]
    fn duplicate_email_is_a_conflict() {
        let mut repo = MockRepository::new();
        repo.expect_get_admin_by_email()
            .withf(|email, _| email == "manager@example.com")
            .returning(|_, _| Ok(Some(admin(1, AdminRole::Branch))));
        repo.expect_create_admin().never();

        let result = create_admin(
            &repo,
            &platform_user(),
            branch_admin_form("Manager@Example.com", vec![1]),
        );

        assert!(matches!(result, Err(ServiceError::Conflict(_))));
    }

    #[test]
    fn unknown_branch_is_rejected() {
        let mut repo = MockRepository::new();
        repo.expect_get_admin_by_email().returning(|_, _| Ok(None));
        repo.expect_get_branch_by_id()
            .returning(|id, _| Ok((id == 1).then(|| sample_branch(1))));
        repo.expect_create_admin().never();

        let result = create_admin(
            &repo,
            &platform_user(),
            branch_admin_form("new@example.com", vec![1, 9]),
        );

        assert!(matches!(result, Err(ServiceError::Form(message)) if message.contains('9')));
    }

    #[test]
    fn creates_branch_admin() {
        let mut repo = MockRepository::new();
        repo.expect_get_admin_by_email().returning(|_, _| Ok(None));
        repo.expect_get_branch_by_id()
            .returning(|id, _| Ok(Some(sample_branch(id))));
        repo.expect_create_admin()
            .withf(|new_admin| new_admin.branch_ids == vec![1, 2] && new_admin.hub_id == HUB_ID)
            .times(1)
            .returning(|_| Ok(admin(5, AdminRole::Branch)));

        let created = create_admin(
            &repo,
            &platform_user(),
            branch_admin_form("new@example.com", vec![1, 2]),
        )
        .expect("admin");

        assert_eq!(created.id, 5);
    }

    #[test]
    fn franchise_admins_have_no_branch_assignments() {
        let mut repo = MockRepository::new();
        repo.expect_get_admin_by_id()
            .returning(|id, _| Ok(Some(admin(id, AdminRole::Franchise))));
        repo.expect_replace_branch_assignments().never();

        let form = AssignBranchesForm {
            admin_id: 3,
            branch_ids: vec![1],
        };

        assert!(matches!(
            assign_branches(&repo, &platform_user(), form),
            Err(ServiceError::Conflict(_))
        ));
    }
}
