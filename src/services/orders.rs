use pushkind_common::domain::auth::AuthenticatedUser;
use pushkind_common::pagination::{DEFAULT_ITEMS_PER_PAGE, Paginated};
use serde::Deserialize;

use crate::domain::access::AccessScope;
use crate::domain::order::{Order, OrderListQuery, OrderStatus};
use crate::forms::orders::OrderStatusForm;
use crate::repository::{AdminReader, BranchReader, OrderReader, OrderWriter};
use crate::services::access::{ensure_branch_access, resolve_scope};
use crate::services::{ServiceError, ServiceResult};

#[derive(Debug, Default, Deserialize)]
pub struct OrdersQuery {
    pub search: Option<String>,
    pub page: Option<usize>,
    pub status: Option<String>,
}

pub struct OrdersPageData {
    pub orders: Paginated<Order>,
    pub search: Option<String>,
    pub status: Option<OrderStatus>,
}

pub fn load_orders_page<R>(
    repo: &R,
    user: &AuthenticatedUser,
    query: OrdersQuery,
) -> ServiceResult<OrdersPageData>
where
    R: AdminReader + BranchReader + OrderReader + ?Sized,
{
    let scope = resolve_scope(repo, user)?;
    let page = query.page.unwrap_or(1).max(1);

    let mut list_query = OrderListQuery::new(user.hub_id)
        .restrict_to(scope.branch_filter())
        .paginate(page, DEFAULT_ITEMS_PER_PAGE);

    let search = query
        .search
        .map(|term| term.trim().to_string())
        .filter(|term| !term.is_empty());
    if let Some(term) = &search {
        list_query = list_query.search(term);
    }
    let status = query
        .status
        .as_deref()
        .and_then(|value| value.parse::<OrderStatus>().ok());
    if let Some(status) = status {
        list_query = list_query.status(status);
    }

    let (total, orders) = repo.list_orders(list_query).map_err(ServiceError::from)?;

    Ok(OrdersPageData {
        orders: Paginated::new(orders, page, total.div_ceil(DEFAULT_ITEMS_PER_PAGE)),
        search,
        status,
    })
}

/// Orders placed without a branch are visible to platform administrators only.
fn ensure_order_access(scope: &AccessScope, order: &Order) -> ServiceResult<()> {
    match order.branch_id {
        Some(branch_id) => ensure_branch_access(scope, branch_id),
        None if scope.is_platform() => Ok(()),
        None => Err(ServiceError::NotFound),
    }
}

/// Loads an order with its items.
pub fn load_order<R>(repo: &R, user: &AuthenticatedUser, order_id: i32) -> ServiceResult<Order>
where
    R: AdminReader + BranchReader + OrderReader + ?Sized,
{
    let scope = resolve_scope(repo, user)?;
    let order = repo
        .get_order_by_id(order_id, user.hub_id)
        .map_err(ServiceError::from)?
        .ok_or(ServiceError::NotFound)?;
    ensure_order_access(&scope, &order)?;
    Ok(order)
}

pub fn change_order_status<R>(
    repo: &R,
    user: &AuthenticatedUser,
    form: OrderStatusForm,
) -> ServiceResult<Order>
where
    R: AdminReader + BranchReader + OrderReader + OrderWriter + ?Sized,
{
    let (order_id, status) = form
        .into_parts()
        .map_err(|err| ServiceError::Form(err.to_string()))?;
    let order = load_order(repo, user, order_id)?;

    if !order.status.can_transition_to(status) {
        return Err(ServiceError::Conflict(format!(
            "a {} order cannot become {}",
            order.status.as_str(),
            status.as_str()
        )));
    }

    repo.update_order_status(order_id, user.hub_id, status)
        .map_err(ServiceError::from)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::BRANCH_ADMIN_ROLE;
    use crate::domain::admin::{Admin, AdminRole};
    use crate::domain::order::OrderItem;
    use crate::repository::mock::MockRepository;
    use crate::services::test_support::{HUB_ID, fixed_datetime, platform_user, user_with_roles};

    fn order(id: i32, branch_id: Option<i32>, status: OrderStatus) -> Order {
        Order {
            id,
            hub_id: HUB_ID,
            branch_id,
            customer_name: "Jane".to_string(),
            status,
            total_cents: 2500,
            currency: "USD".to_string(),
            notes: None,
            items: vec![OrderItem {
                product_id: Some(1),
                name: "Wax".to_string(),
                price_cents: 1250,
                quantity: 2,
            }],
            created_at: fixed_datetime(),
            updated_at: fixed_datetime(),
        }
    }

    fn branch_admin_repo() -> MockRepository {
        let mut repo = MockRepository::new();
        repo.expect_get_admin_by_email().returning(|_, _| {
            Ok(Some(Admin {
                id: 1,
                hub_id: HUB_ID,
                email: "admin@example.com".to_string(),
                name: "Admin".to_string(),
                role: AdminRole::Branch,
                franchise_id: None,
                branch_ids: vec![1],
                created_at: fixed_datetime(),
                updated_at: fixed_datetime(),
            }))
        });
        repo
    }

    #[test]
    fn branchless_order_is_hidden_from_branch_admins() {
        let mut repo = branch_admin_repo();
        repo.expect_get_order_by_id()
            .returning(|id, _| Ok(Some(order(id, None, OrderStatus::Pending))));

        let result = load_order(&repo, &user_with_roles(&[BRANCH_ADMIN_ROLE]), 3);

        assert!(matches!(result, Err(ServiceError::NotFound)));
    }

    #[test]
    fn order_of_own_branch_is_visible() {
        let mut repo = branch_admin_repo();
        repo.expect_get_order_by_id()
            .returning(|id, _| Ok(Some(order(id, Some(1), OrderStatus::Pending))));

        let loaded = load_order(&repo, &user_with_roles(&[BRANCH_ADMIN_ROLE]), 3).expect("order");

        assert_eq!(loaded.items.len(), 1);
    }

    #[test]
    fn status_change_respects_transitions() {
        let mut repo = MockRepository::new();
        repo.expect_get_order_by_id()
            .returning(|id, _| Ok(Some(order(id, None, OrderStatus::Pending))));
        repo.expect_update_order_status().never();

        let form = OrderStatusForm {
            order_id: 3,
            status: "completed".to_string(),
        };
        let result = change_order_status(&repo, &platform_user(), form);

        assert!(matches!(result, Err(ServiceError::Conflict(_))));
    }

    #[test]
    fn status_change_is_stored() {
        let mut repo = MockRepository::new();
        repo.expect_get_order_by_id()
            .returning(|id, _| Ok(Some(order(id, None, OrderStatus::Pending))));
        repo.expect_update_order_status()
            .times(1)
            .withf(|id, _, status| *id == 3 && *status == OrderStatus::Processing)
            .returning(|id, _, status| Ok(order(id, None, status)));

        let form = OrderStatusForm {
            order_id: 3,
            status: "processing".to_string(),
        };
        let updated = change_order_status(&repo, &platform_user(), form).expect("updated");

        assert_eq!(updated.status, OrderStatus::Processing);
    }
}
