use pushkind_common::domain::auth::AuthenticatedUser;

use crate::domain::product_category::ProductCategory;
use crate::forms::product_categories::{AddProductCategoryForm, EditProductCategoryForm};
use crate::repository::{ProductCategoryReader, ProductCategoryWriter};
use crate::services::access::require_platform;
use crate::services::{ServiceError, ServiceResult};

/// Loads every product category of the hub ordered by name.
pub fn load_product_categories<R>(
    repo: &R,
    user: &AuthenticatedUser,
) -> ServiceResult<Vec<ProductCategory>>
where
    R: ProductCategoryReader + ?Sized,
{
    require_platform(user)?;

    let mut categories = repo
        .list_product_categories(user.hub_id)
        .map_err(ServiceError::from)?;
    categories.sort_by_key(|category| category.name.to_lowercase());
    Ok(categories)
}

/// Case-insensitive name clash with another category of the hub.
fn ensure_unique_name<R>(
    repo: &R,
    hub_id: i32,
    name: &str,
    except_id: Option<i32>,
) -> ServiceResult<()>
where
    R: ProductCategoryReader + ?Sized,
{
    let categories = repo
        .list_product_categories(hub_id)
        .map_err(ServiceError::from)?;
    let clash = categories.iter().any(|category| {
        Some(category.id) != except_id && category.name.to_lowercase() == name.to_lowercase()
    });

    if clash {
        Err(ServiceError::Conflict(format!("category `{name}` already exists")))
    } else {
        Ok(())
    }
}

pub fn create_product_category<R>(
    repo: &R,
    user: &AuthenticatedUser,
    form: AddProductCategoryForm,
) -> ServiceResult<ProductCategory>
where
    R: ProductCategoryReader + ProductCategoryWriter + ?Sized,
{
    require_platform(user)?;

    let new_category = form
        .into_new_category(user.hub_id)
        .map_err(|err| ServiceError::Form(err.to_string()))?;
    ensure_unique_name(repo, user.hub_id, &new_category.name, None)?;

    repo.create_product_category(&new_category)
        .map_err(ServiceError::from)
}

pub fn modify_product_category<R>(
    repo: &R,
    user: &AuthenticatedUser,
    form: EditProductCategoryForm,
) -> ServiceResult<ProductCategory>
where
    R: ProductCategoryReader + ProductCategoryWriter + ?Sized,
{
    require_platform(user)?;

    let (category_id, update) = form
        .into_update_category()
        .map_err(|err| ServiceError::Form(err.to_string()))?;
    ensure_unique_name(repo, user.hub_id, &update.name, Some(category_id))?;

    repo.update_product_category(category_id, user.hub_id, &update)
        .map_err(ServiceError::from)
}

/// Deletes a category; its products become uncategorized.
pub fn remove_product_category<R>(
    repo: &R,
    user: &AuthenticatedUser,
    category_id: i32,
) -> ServiceResult<()>
where
    R: ProductCategoryWriter + ?Sized,
{
    require_platform(user)?;

    repo.delete_product_category(category_id, user.hub_id)
        .map_err(ServiceError::from)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::FRANCHISE_ADMIN_ROLE;
    use crate::repository::mock::MockRepository;
    use crate::services::test_support::{HUB_ID, fixed_datetime, platform_user, user_with_roles};

    fn category(id: i32, name: &str) -> ProductCategory {
        ProductCategory {
            id,
            hub_id: HUB_ID,
            name: name.to_string(),
            description: None,
            created_at: fixed_datetime(),
            updated_at: fixed_datetime(),
        }
    }

    #[test]
    fn categories_are_sorted_by_name() {
        let mut repo = MockRepository::new();
        repo.expect_list_product_categories()
            .returning(|_| Ok(vec![category(1, "wax"), category(2, "Brushes")]));

        let categories = load_product_categories(&repo, &platform_user()).expect("categories");

        assert_eq!(categories[0].name, "Brushes");
    }

    #[test]
    fn duplicate_name_is_a_conflict() {
        let mut repo = MockRepository::new();
        repo.expect_list_product_categories()
            .returning(|_| Ok(vec![category(1, "Wax")]));
        repo.expect_create_product_category().never();

        let form = AddProductCategoryForm {
            name: "wax".to_string(),
            description: None,
        };
        let result = create_product_category(&repo, &platform_user(), form);

        assert!(matches!(result, Err(ServiceError::Conflict(_))));
    }

    #[test]
    fn renaming_to_own_name_is_allowed() {
        let mut repo = MockRepository::new();
        repo.expect_list_product_categories()
            .returning(|_| Ok(vec![category(1, "Wax")]));
        repo.expect_update_product_category()
            .times(1)
            .returning(|id, _, update| Ok(category(id, &update.name)));

        let form = EditProductCategoryForm {
            category_id: 1,
            name: "WAX".to_string(),
            description: Some("Protective coatings".to_string()),
        };
        let updated = modify_product_category(&repo, &platform_user(), form).expect("updated");

        assert_eq!(updated.name, "WAX");
    }

    #[test]
    fn catalog_is_platform_only() {
        let repo = MockRepository::new();

        let result = remove_product_category(&repo, &user_with_roles(&[FRANCHISE_ADMIN_ROLE]), 1);

        assert!(matches!(result, Err(ServiceError::Unauthorized)));
    }
}
