//! Resolution of the caller's [`AccessScope`].

use pushkind_common::domain::auth::AuthenticatedUser;
use pushkind_common::routes::check_role;

use crate::domain::access::AccessScope;
use crate::domain::admin::AdminRole;
use crate::repository::{AdminReader, BranchReader};
use crate::services::{ServiceError, ServiceResult};
use crate::{BRANCH_ADMIN_ROLE, FRANCHISE_ADMIN_ROLE, SERVICE_ACCESS_ROLE};

/// Computes the branches the user may see.
///
/// Platform administrators are recognised by role alone. Franchise and branch
/// administrators additionally need a row in `admins` matching their email
/// and hub, and the row's role must agree with the auth-service role.
pub fn resolve_scope<R>(repo: &R, user: &AuthenticatedUser) -> ServiceResult<AccessScope>
where
    R: AdminReader + BranchReader + ?Sized,
{
    if check_role(SERVICE_ACCESS_ROLE, &user.roles) {
        return Ok(AccessScope::Platform);
    }

    let is_franchise_admin = check_role(FRANCHISE_ADMIN_ROLE, &user.roles);
    let is_branch_admin = check_role(BRANCH_ADMIN_ROLE, &user.roles);
    if !is_franchise_admin && !is_branch_admin {
        return Err(ServiceError::Unauthorized);
    }

    let Some(admin) = repo.get_admin_by_email(&user.email, user.hub_id)? else {
        log::warn!("No admin record for {} in hub {}", user.email, user.hub_id);
        return Err(ServiceError::Unauthorized);
    };

    match admin.role {
        AdminRole::Franchise if is_franchise_admin => {
            let franchise_id = admin.franchise_id.ok_or(ServiceError::Unauthorized)?;
            let branch_ids = repo.list_branch_ids(user.hub_id, franchise_id)?;
            Ok(AccessScope::Franchise {
                franchise_id,
                branch_ids,
            })
        }
        AdminRole::Branch if is_branch_admin => Ok(AccessScope::Branch {
            branch_ids: admin.branch_ids,
        }),
        _ => Err(ServiceError::Unauthorized),
    }
}

/// Platform-only operations: franchises, catalog, promotions, administrators.
pub fn require_platform(user: &AuthenticatedUser) -> ServiceResult<()> {
    if check_role(SERVICE_ACCESS_ROLE, &user.roles) {
        Ok(())
    } else {
        Err(ServiceError::Unauthorized)
    }
}

/// Fails with `NotFound` for branches outside the scope so their existence is not leaked.
pub fn ensure_branch_access(scope: &AccessScope, branch_id: i32) -> ServiceResult<()> {
    if scope.can_access_branch(branch_id) {
        Ok(())
    } else {
        Err(ServiceError::NotFound)
    }
}
