use pushkind_common::domain::auth::AuthenticatedUser;
use pushkind_common::pagination::{DEFAULT_ITEMS_PER_PAGE, Paginated};

use crate::domain::franchise::{Franchise, FranchiseListQuery};
use crate::forms::franchises::{AddFranchiseForm, EditFranchiseForm};
use crate::repository::{FranchiseReader, FranchiseWriter};
use crate::services::access::require_platform;
use crate::services::{ListParams, ServiceError, ServiceResult};

/// Data required to render the franchises index template.
pub struct FranchisesPageData {
    pub franchises: Paginated<Franchise>,
    pub search: Option<String>,
}

/// Loads the franchises overview page.
pub fn load_franchises_page<R>(
    repo: &R,
    user: &AuthenticatedUser,
    params: ListParams,
) -> ServiceResult<FranchisesPageData>
where
    R: FranchiseReader + ?Sized,
{
    require_platform(user)?;

    let page = params.page();
    let mut query = FranchiseListQuery::new(user.hub_id).paginate(page, DEFAULT_ITEMS_PER_PAGE);
    if let Some(term) = params.search_term() {
        query = query.search(term);
    }

    let (total, franchises) = repo.list_franchises(query).map_err(ServiceError::from)?;

    Ok(FranchisesPageData {
        franchises: Paginated::new(franchises, page, total.div_ceil(DEFAULT_ITEMS_PER_PAGE)),
        search: params.search_term().map(str::to_string),
    })
}

/// Every franchise of the hub, for pickers on other pages.
pub fn list_all_franchises<R>(repo: &R, hub_id: i32) -> ServiceResult<Vec<Franchise>>
where
    R: FranchiseReader + ?Sized,
{
    let (_, franchises) = repo
        .list_franchises(FranchiseListQuery::new(hub_id))
        .map_err(ServiceError::from)?;
    Ok(franchises)
}

pub fn create_franchise<R>(
    repo: &R,
    user: &AuthenticatedUser,
    form: AddFranchiseForm,
) -> ServiceResult<Franchise>
where
    R: FranchiseWriter + ?Sized,
{
    require_platform(user)?;

    let new_franchise = form
        .into_new_franchise(user.hub_id)
        .map_err(|err| ServiceError::Form(err.to_string()))?;

    repo.create_franchise(&new_franchise)
        .map_err(ServiceError::from)
}

pub fn modify_franchise<R>(
    repo: &R,
    user: &AuthenticatedUser,
    form: EditFranchiseForm,
) -> ServiceResult<Franchise>
where
    R: FranchiseWriter + ?Sized,
{
    require_platform(user)?;

    let payload = form
        .into_update_franchise()
        .map_err(|err| ServiceError::Form(err.to_string()))?;

    repo.update_franchise(payload.franchise_id, user.hub_id, &payload.update)
        .map_err(ServiceError::from)
}

/// Deletes a franchise; its branches become company-owned.
pub fn remove_franchise<R>(
    repo: &R,
    user: &AuthenticatedUser,
    franchise_id: i32,
) -> ServiceResult<()>
where
    R: FranchiseWriter + ?Sized,
{
    require_platform(user)?;

    repo.delete_franchise(franchise_id, user.hub_id)
        .map_err(ServiceError::from)
}

#[cfg(test)]
mod tests {
    use pushkind_common::repository::errors::RepositoryError;

    use super::*;
    use crate::FRANCHISE_ADMIN_ROLE;
    use crate::repository::mock::MockRepository;
    use crate::services::test_support::{HUB_ID, fixed_datetime, platform_user, user_with_roles};

    fn franchise(id: i32, name: &str) -> Franchise {
        Franchise {
            id,
            hub_id: HUB_ID,
            name: name.to_string(),
            description: None,
            contact_email: None,
            contact_phone: None,
            is_active: true,
            created_at: fixed_datetime(),
            updated_at: fixed_datetime(),
        }
    }

    #[test]
    fn franchise_pages_are_platform_only() {
        let repo = MockRepository::new();
        let user = user_with_roles(&[FRANCHISE_ADMIN_ROLE]);

        let result = load_franchises_page(&repo, &user, ListParams::default());

        assert!(matches!(result, Err(ServiceError::Unauthorized)));
    }

    #[test]
    fn list_passes_search_and_page() {
        let mut repo = MockRepository::new();
        repo.expect_list_franchises()
            .times(1)
            .withf(|query| {
                query.hub_id == HUB_ID
                    && query.search.as_deref() == Some("north")
                    && query
                        .pagination
                        .as_ref()
                        .is_some_and(|pagination| pagination.page == 2)
            })
            .returning(|_| Ok((21, vec![franchise(1, "North")])));

        let params = ListParams {
            search: Some("  north ".to_string()),
            page: Some(2),
        };
        let data = load_franchises_page(&repo, &platform_user(), params).expect("page");

        assert_eq!(data.search.as_deref(), Some("north"));
    }

    #[test]
    fn create_rejects_blank_name_before_touching_repository() {
        let repo = MockRepository::new();
        let form = AddFranchiseForm {
            name: "   ".to_string(),
            description: None,
            contact_email: None,
            contact_phone: None,
        };

        let result = create_franchise(&repo, &platform_user(), form);

        assert!(matches!(result, Err(ServiceError::Form(_))));
    }

    #[test]
    fn create_stores_sanitized_franchise() {
        let mut repo = MockRepository::new();
        repo.expect_create_franchise()
            .times(1)
            .withf(|new| new.hub_id == HUB_ID && new.name == "North Star")
            .returning(|new| Ok(franchise(3, &new.name)));

        let form = AddFranchiseForm {
            name: " North   Star ".to_string(),
            description: None,
            contact_email: Some("Owner@Example.com".to_string()),
            contact_phone: None,
        };
        let created = create_franchise(&repo, &platform_user(), form).expect("created");

        assert_eq!(created.id, 3);
    }

    #[test]
    fn delete_maps_missing_row_to_not_found() {
        let mut repo = MockRepository::new();
        repo.expect_delete_franchise()
            .withf(|id, hub_id| *id == 9 && *hub_id == HUB_ID)
            .returning(|_, _| Err(RepositoryError::NotFound));

        let result = remove_franchise(&repo, &platform_user(), 9);

        assert!(matches!(result, Err(ServiceError::NotFound)));
    }
}
