//! Booking and revenue reports over a period.

use std::collections::{BTreeMap, HashMap};

use chrono::NaiveDate;
use pushkind_common::domain::auth::AuthenticatedUser;
use serde::Deserialize;

use crate::domain::booking::{Booking, BookingListQuery, BookingStatus};
use crate::domain::branch::Branch;
use crate::domain::payment::{Payment, PaymentListQuery};
use crate::domain::report::{
    BranchReportRow, NO_DATA_PLACEHOLDER, Report, ServiceUsage, StatusCount,
};
use crate::domain::wash_service::{WashService, WashServiceListQuery};
use crate::forms::format_money;
use crate::repository::{
    AdminReader, BookingReader, BranchReader, PaymentReader, WashServiceReader,
};
use crate::services::access::{ensure_branch_access, resolve_scope};
use crate::services::branches::list_accessible_branches;
use crate::services::{ServiceError, ServiceResult, day_range, query_date};

/// Number of services listed in the "top services" table.
pub const TOP_SERVICES: usize = 5;

const DATE_FORMAT: &str = "%d %b %Y";

/// Raw query string of the reports page.
#[derive(Debug, Default, Clone, Deserialize)]
pub struct ReportQuery {
    pub from: Option<String>,
    pub to: Option<String>,
    pub branch_id: Option<i32>,
}

/// Data required to render the reports page.
pub struct ReportPageData {
    pub report: Report,
    pub branches: Vec<Branch>,
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
    pub branch_id: Option<i32>,
}

/// Formats the span between the earliest and latest date.
pub fn format_date_range(first: NaiveDate, last: NaiveDate) -> String {
    if first == last {
        first.format(DATE_FORMAT).to_string()
    } else {
        format!(
            "{} – {}",
            first.format(DATE_FORMAT),
            last.format(DATE_FORMAT)
        )
    }
}

/// Aggregates bookings and payments into a [`Report`].
///
/// Payments are attributed to a branch through their booking; payments whose
/// booking is not among `bookings` only count towards the totals.
pub fn generate_report(
    bookings: &[Booking],
    payments: &[Payment],
    branches: &[Branch],
    services: &[WashService],
    placeholder: &str,
) -> Report {
    let dates = bookings
        .iter()
        .map(|booking| booking.scheduled_at.date())
        .chain(payments.iter().map(|payment| payment.created_at.date()));
    let (first_date, last_date) = dates.fold((None, None), |(min, max), date| {
        (
            Some(min.map_or(date, |min: NaiveDate| min.min(date))),
            Some(max.map_or(date, |max: NaiveDate| max.max(date))),
        )
    });
    let period_label = match (first_date, last_date) {
        (Some(first), Some(last)) => format_date_range(first, last),
        _ => placeholder.to_string(),
    };

    let by_status = BookingStatus::ALL
        .iter()
        .map(|status| StatusCount {
            status: *status,
            count: bookings
                .iter()
                .filter(|booking| booking.status == *status)
                .count(),
        })
        .collect();

    let booking_branch: HashMap<i32, i32> = bookings
        .iter()
        .map(|booking| (booking.id, booking.branch_id))
        .collect();

    // Ordered by branch id so the table and the export are stable.
    let mut rows: BTreeMap<i32, BranchReportRow> = BTreeMap::new();
    let branch_name = |branch_id: i32| {
        branches
            .iter()
            .find(|branch| branch.id == branch_id)
            .map(|branch| branch.name.clone())
            .unwrap_or_else(|| format!("#{branch_id}"))
    };
    for booking in bookings {
        let row = rows
            .entry(booking.branch_id)
            .or_insert_with(|| BranchReportRow {
                branch_id: booking.branch_id,
                branch_name: branch_name(booking.branch_id),
                bookings: 0,
                completed: 0,
                revenue_cents: 0,
                average_ticket_cents: 0,
            });
        row.bookings += 1;
        if booking.status == BookingStatus::Completed {
            row.completed += 1;
        }
    }

    let mut revenue_cents = 0;
    let mut refunded_cents = 0;
    for payment in payments {
        let net = payment.net_cents();
        revenue_cents += net;
        refunded_cents += i64::from(payment.refunded_cents);

        let branch_id = payment
            .booking_id
            .and_then(|booking_id| booking_branch.get(&booking_id).copied());
        if let Some(branch_id) = branch_id
            && let Some(row) = rows.get_mut(&branch_id)
        {
            row.revenue_cents += net;
        }
    }

    for row in rows.values_mut() {
        if row.completed > 0 {
            row.average_ticket_cents = row.revenue_cents / row.completed as i64;
        }
    }

    let mut usage: HashMap<i32, usize> = HashMap::new();
    for service_id in bookings.iter().filter_map(|booking| booking.service_id) {
        *usage.entry(service_id).or_default() += 1;
    }
    let mut top_services: Vec<ServiceUsage> = usage
        .into_iter()
        .map(|(service_id, count)| ServiceUsage {
            service_id,
            service_name: services
                .iter()
                .find(|service| service.id == service_id)
                .map(|service| service.name.clone())
                .unwrap_or_else(|| format!("#{service_id}")),
            bookings: count,
        })
        .collect();
    top_services.sort_by(|a, b| {
        b.bookings
            .cmp(&a.bookings)
            .then_with(|| a.service_name.cmp(&b.service_name))
    });
    top_services.truncate(TOP_SERVICES);

    Report {
        period_label,
        first_date,
        last_date,
        total_bookings: bookings.len(),
        by_status,
        revenue_cents,
        refunded_cents,
        branches: rows.into_values().collect(),
        top_services,
    }
}

/// Builds the report for the caller's scope, optionally narrowed to one
/// branch and to an inclusive range of days.
pub fn load_report<R>(
    repo: &R,
    user: &AuthenticatedUser,
    query: ReportQuery,
) -> ServiceResult<ReportPageData>
where
    R: AdminReader + BranchReader + BookingReader + PaymentReader + WashServiceReader + ?Sized,
{
    let scope = resolve_scope(repo, user)?;

    let branch_filter = match query.branch_id {
        Some(branch_id) => {
            ensure_branch_access(&scope, branch_id)?;
            Some(vec![branch_id])
        }
        None => scope.branch_filter(),
    };

    let from = query_date(query.from.as_deref());
    let to = query_date(query.to.as_deref());
    let (start, end) = day_range(from, to);

    let (_, bookings) = repo
        .list_bookings(
            BookingListQuery::new(user.hub_id)
                .restrict_to(branch_filter.clone())
                .between(start, end),
        )
        .map_err(ServiceError::from)?;
    let (_, payments) = repo
        .list_payments(
            PaymentListQuery::new(user.hub_id)
                .restrict_to(branch_filter.clone())
                .between(start, end),
        )
        .map_err(ServiceError::from)?;
    let services = repo
        .list_services(WashServiceListQuery::new(user.hub_id).restrict_to(branch_filter))
        .map_err(ServiceError::from)?;
    let branches = list_accessible_branches(repo, user.hub_id, &scope)?;

    let report = generate_report(
        &bookings,
        &payments,
        &branches,
        &services,
        NO_DATA_PLACEHOLDER,
    );

    Ok(ReportPageData {
        report,
        branches,
        from,
        to,
        branch_id: query.branch_id,
    })
}

/// Per-branch rows followed by a totals row, as CSV.
pub fn export_report_csv(report: &Report) -> ServiceResult<Vec<u8>> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    let to_internal = |err: csv::Error| ServiceError::Internal(err.to_string());

    writer
        .write_record([
            "branch",
            "bookings",
            "completed",
            "revenue",
            "average_ticket",
        ])
        .map_err(to_internal)?;
    for row in &report.branches {
        writer
            .write_record([
                row.branch_name.clone(),
                row.bookings.to_string(),
                row.completed.to_string(),
                format_money(row.revenue_cents),
                format_money(row.average_ticket_cents),
            ])
            .map_err(to_internal)?;
    }
    let completed: usize = report.branches.iter().map(|row| row.completed).sum();
    writer
        .write_record([
            "total".to_string(),
            report.total_bookings.to_string(),
            completed.to_string(),
            format_money(report.revenue_cents),
            String::new(),
        ])
        .map_err(to_internal)?;

    writer
        .into_inner()
        .map_err(|err| ServiceError::Internal(err.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::payment::PaymentStatus;
    use crate::repository::mock::MockRepository;
    use crate::services::test_support::{
        HUB_ID, datetime, platform_user, sample_booking, sample_branch, sample_payment,
        sample_service,
    };

    fn booking(id: i32, branch_id: i32, status: BookingStatus, day: u32) -> Booking {
        let mut booking = sample_booking(id, branch_id, status);
        booking.scheduled_at = datetime(5, day, 9);
        booking
    }

    #[test]
    fn date_range_collapses_single_day() {
        let day = NaiveDate::from_ymd_opt(2024, 5, 1).unwrap_or_default();
        let later = NaiveDate::from_ymd_opt(2024, 5, 12).unwrap_or_default();

        assert_eq!(format_date_range(day, day), "01 May 2024");
        assert_eq!(format_date_range(day, later), "01 May 2024 – 12 May 2024");
    }

    #[test]
    fn empty_report_uses_placeholder() {
        let report = generate_report(&[], &[], &[], &[], NO_DATA_PLACEHOLDER);

        assert!(report.is_empty());
        assert_eq!(report.period_label, NO_DATA_PLACEHOLDER);
        assert_eq!(report.revenue_cents, 0);
        assert!(report.branches.is_empty());
    }

    #[test]
    fn report_aggregates_branches_and_services() {
        let mut first = booking(1, 1, BookingStatus::Completed, 3);
        first.service_id = Some(10);
        let mut second = booking(2, 1, BookingStatus::Completed, 5);
        second.service_id = Some(10);
        let mut third = booking(3, 2, BookingStatus::Cancelled, 4);
        third.service_id = Some(11);

        let mut refunded = sample_payment(2, Some(2), 2000);
        refunded.refunded_cents = 500;
        refunded.status = PaymentStatus::PartiallyRefunded;
        let mut failed = sample_payment(3, Some(3), 2000);
        failed.status = PaymentStatus::Failed;
        let payments = vec![sample_payment(1, Some(1), 2000), refunded, failed];

        let report = generate_report(
            &[first, second, third],
            &payments,
            &[sample_branch(1), sample_branch(2)],
            &[sample_service(10, 1, 2000), sample_service(11, 2, 1500)],
            NO_DATA_PLACEHOLDER,
        );

        assert_eq!(report.total_bookings, 3);
        assert_eq!(report.revenue_cents, 3500);
        assert_eq!(report.refunded_cents, 500);
        assert_eq!(report.period_label, "01 May 2024 – 05 May 2024");

        let completed = report
            .by_status
            .iter()
            .find(|count| count.status == BookingStatus::Completed)
            .map(|count| count.count);
        assert_eq!(completed, Some(2));

        assert_eq!(report.branches.len(), 2);
        assert_eq!(report.branches[0].branch_name, "Branch 1");
        assert_eq!(report.branches[0].revenue_cents, 3500);
        assert_eq!(report.branches[0].average_ticket_cents, 1750);
        assert_eq!(report.branches[1].revenue_cents, 0);
        assert_eq!(report.branches[1].average_ticket_cents, 0);

        assert_eq!(report.top_services[0].service_name, "Service 10");
        assert_eq!(report.top_services[0].bookings, 2);
    }

    #[test]
    fn csv_export_has_header_rows_and_total() {
        let report = generate_report(
            &[booking(1, 1, BookingStatus::Completed, 3)],
            &[sample_payment(1, Some(1), 1250)],
            &[sample_branch(1)],
            &[],
            NO_DATA_PLACEHOLDER,
        );

        let csv = String::from_utf8(export_report_csv(&report).expect("csv")).expect("utf8");
        let lines: Vec<&str> = csv.lines().collect();

        assert_eq!(lines[0], "branch,bookings,completed,revenue,average_ticket");
        assert_eq!(lines[1], "Branch 1,1,1,12.50,12.50");
        assert_eq!(lines[2], "total,1,1,12.50,");
    }

    #[test]
    fn report_dates_are_inclusive() {
        let mut repo = MockRepository::new();
        repo.expect_list_bookings()
            .withf(|query| {
                query.hub_id == HUB_ID
                    && query.branch_ids == Some(vec![2])
                    && query.from == Some(datetime(5, 1, 0))
                    && query.to == Some(datetime(5, 4, 0))
            })
            .returning(|_| Ok((0, Vec::new())));
        repo.expect_list_payments()
            .withf(|query| query.to == Some(datetime(5, 4, 0)))
            .returning(|_| Ok((0, Vec::new())));
        repo.expect_list_services().returning(|_| Ok(Vec::new()));
        repo.expect_list_branches()
            .returning(|_| Ok((1, vec![sample_branch(2)])));

        let query = ReportQuery {
            from: Some("2024-05-01".to_string()),
            to: Some("2024-05-03".to_string()),
            branch_id: Some(2),
        };
        let page = load_report(&repo, &platform_user(), query).expect("report");

        assert!(page.report.is_empty());
        assert_eq!(page.branch_id, Some(2));
    }
}
