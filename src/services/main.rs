use chrono::{Days, Local, NaiveDate, NaiveDateTime, NaiveTime};
use pushkind_common::domain::auth::AuthenticatedUser;
use serde::Serialize;

use crate::domain::access::{AccessScope, DashboardKind};
use crate::domain::booking::{Booking, BookingListQuery, BookingStatus};
use crate::domain::branch::BranchListQuery;
use crate::domain::payment::PaymentListQuery;
use crate::domain::washer::{WasherListQuery, WasherStatus};
use crate::repository::{AdminReader, BookingReader, BranchReader, PaymentReader, WasherReader};
use crate::services::ServiceResult;
use crate::services::access::resolve_scope;

const RECENT_BOOKINGS: usize = 5;
const REVENUE_WINDOW_DAYS: u64 = 30;

/// Figures shown on the landing page, restricted to the caller's scope.
#[derive(Debug, Serialize)]
pub struct DashboardData {
    pub kind: DashboardKind,
    pub scope: AccessScope,
    pub branch_count: usize,
    pub active_washers: usize,
    pub today_bookings: usize,
    pub pending_bookings: usize,
    /// Net revenue of the last 30 days in the smallest currency unit.
    pub revenue_cents: i64,
    pub recent_bookings: Vec<Booking>,
}

pub fn load_dashboard<R>(repo: &R, user: &AuthenticatedUser) -> ServiceResult<DashboardData>
where
    R: AdminReader + BranchReader + WasherReader + BookingReader + PaymentReader + ?Sized,
{
    let now = Local::now();
    load_dashboard_at(repo, user, now.date_naive(), now.naive_utc())
}

/// Same as [`load_dashboard`] with an explicit clock.
///
/// Bookings are scheduled in local wall-clock time, so "today" is the local
/// calendar day. Payment timestamps are UTC and the revenue window is
/// measured back from `now_utc`.
pub fn load_dashboard_at<R>(
    repo: &R,
    user: &AuthenticatedUser,
    today: NaiveDate,
    now_utc: NaiveDateTime,
) -> ServiceResult<DashboardData>
where
    R: AdminReader + BranchReader + WasherReader + BookingReader + PaymentReader + ?Sized,
{
    let scope = resolve_scope(repo, user)?;
    let filter = scope.branch_filter();
    let hub_id = user.hub_id;

    let (branch_count, _) = repo.list_branches(
        BranchListQuery::new(hub_id)
            .restrict_to(filter.clone())
            .paginate(1, 1),
    )?;

    let (active_washers, _) = repo.list_washers(
        WasherListQuery::new(hub_id)
            .restrict_to(filter.clone())
            .status(WasherStatus::Active)
            .paginate(1, 1),
    )?;

    let today = today.and_time(NaiveTime::MIN);
    let tomorrow = today.checked_add_days(Days::new(1));
    let (today_bookings, _) = repo.list_bookings(
        BookingListQuery::new(hub_id)
            .restrict_to(filter.clone())
            .between(Some(today), tomorrow)
            .paginate(1, 1),
    )?;

    let (pending_bookings, _) = repo.list_bookings(
        BookingListQuery::new(hub_id)
            .restrict_to(filter.clone())
            .status(BookingStatus::Pending)
            .paginate(1, 1),
    )?;

    let (_, recent_bookings) = repo.list_bookings(
        BookingListQuery::new(hub_id)
            .restrict_to(filter.clone())
            .paginate(1, RECENT_BOOKINGS),
    )?;

    let window_start = now_utc.checked_sub_days(Days::new(REVENUE_WINDOW_DAYS));
    let (_, payments) = repo.list_payments(
        PaymentListQuery::new(hub_id)
            .restrict_to(filter)
            .between(window_start, None),
    )?;
    let revenue_cents = payments.iter().map(|payment| payment.net_cents()).sum();

    Ok(DashboardData {
        kind: scope.dashboard(),
        scope,
        branch_count,
        active_washers,
        today_bookings,
        pending_bookings,
        revenue_cents,
        recent_bookings,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::BRANCH_ADMIN_ROLE;
    use crate::domain::admin::{Admin, AdminRole};
    use crate::domain::payment::PaymentStatus;
    use crate::repository::mock::MockRepository;
    use crate::services::ServiceError;
    use crate::services::test_support::{
        HUB_ID, datetime, fixed_datetime, platform_user, sample_booking, sample_payment,
        user_with_roles,
    };

    #[test]
    fn dashboard_requires_a_scope() {
        let repo = MockRepository::new();

        let result = load_dashboard(&repo, &user_with_roles(&["viewer"]));

        assert!(matches!(result, Err(ServiceError::Unauthorized)));
    }

    #[test]
    fn platform_dashboard_aggregates_counts() {
        let mut repo = MockRepository::new();
        repo.expect_list_branches()
            .withf(|query| query.branch_ids.is_none())
            .returning(|_| Ok((4, Vec::new())));
        repo.expect_list_washers()
            .withf(|query| query.status == Some(WasherStatus::Active))
            .returning(|_| Ok((9, Vec::new())));
        repo.expect_list_bookings().returning(|query| {
            if query.from.is_some() {
                assert_eq!(query.from, Some(datetime(5, 10, 0)));
                assert_eq!(query.to, Some(datetime(5, 11, 0)));
                Ok((3, Vec::new()))
            } else if query.status == Some(BookingStatus::Pending) {
                Ok((2, Vec::new()))
            } else {
                assert_eq!(
                    query.pagination.as_ref().map(|page| page.per_page),
                    Some(RECENT_BOOKINGS)
                );
                Ok((1, vec![sample_booking(1, 1, BookingStatus::Confirmed)]))
            }
        });
        repo.expect_list_payments()
            .withf(|query| query.from == Some(datetime(4, 10, 15)) && query.to.is_none())
            .returning(|_| {
                let mut refunded = sample_payment(2, Some(1), 1000);
                refunded.refunded_cents = 400;
                refunded.status = PaymentStatus::PartiallyRefunded;
                let mut pending = sample_payment(3, Some(1), 5000);
                pending.status = PaymentStatus::Pending;
                Ok((3, vec![sample_payment(1, Some(1), 2500), refunded, pending]))
            });

        let now = datetime(5, 10, 15);
        let data = load_dashboard_at(&repo, &platform_user(), now.date(), now).expect("dashboard");

        assert_eq!(data.kind, DashboardKind::Platform);
        assert_eq!(data.branch_count, 4);
        assert_eq!(data.active_washers, 9);
        assert_eq!(data.today_bookings, 3);
        assert_eq!(data.pending_bookings, 2);
        assert_eq!(data.revenue_cents, 3100);
        assert_eq!(data.recent_bookings.len(), 1);
    }

    #[test]
    fn branch_dashboard_is_restricted_to_assigned_branches() {
        let mut repo = MockRepository::new();
        repo.expect_get_admin_by_email().returning(|_, _| {
            Ok(Some(Admin {
                id: 1,
                hub_id: HUB_ID,
                email: "admin@example.com".to_string(),
                name: "Admin".to_string(),
                role: AdminRole::Branch,
                franchise_id: None,
                branch_ids: vec![5],
                created_at: fixed_datetime(),
                updated_at: fixed_datetime(),
            }))
        });
        repo.expect_list_branches()
            .withf(|query| query.branch_ids == Some(vec![5]))
            .returning(|_| Ok((1, Vec::new())));
        repo.expect_list_washers()
            .withf(|query| query.branch_ids == Some(vec![5]))
            .returning(|_| Ok((0, Vec::new())));
        repo.expect_list_bookings()
            .withf(|query| query.branch_ids == Some(vec![5]))
            .returning(|_| Ok((0, Vec::new())));
        repo.expect_list_payments()
            .withf(|query| query.branch_ids == Some(vec![5]))
            .returning(|_| Ok((0, Vec::new())));

        let data = load_dashboard(&repo, &user_with_roles(&[BRANCH_ADMIN_ROLE])).expect("dashboard");

        assert_eq!(data.kind, DashboardKind::Branch);
        assert_eq!(data.revenue_cents, 0);
    }

    #[test]
    fn local_day_and_utc_revenue_window_are_independent() {
        let mut repo = MockRepository::new();
        repo.expect_list_branches().returning(|_| Ok((1, Vec::new())));
        repo.expect_list_washers().returning(|_| Ok((0, Vec::new())));
        repo.expect_list_bookings().returning(|query| {
            if query.from.is_some() {
                assert_eq!(query.from, Some(datetime(5, 11, 0)));
                assert_eq!(query.to, Some(datetime(5, 12, 0)));
            }
            Ok((0, Vec::new()))
        });
        repo.expect_list_payments()
            .withf(|query| query.from == Some(datetime(4, 10, 22)))
            .returning(|_| Ok((0, Vec::new())));

        let local_today = datetime(5, 11, 0).date();
        let now_utc = datetime(5, 10, 22);
        let data =
            load_dashboard_at(&repo, &platform_user(), local_today, now_utc).expect("dashboard");

        assert_eq!(data.today_bookings, 0);
    }
}
