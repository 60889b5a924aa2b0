use chrono::{NaiveDate, NaiveDateTime};
use pushkind_common::domain::auth::AuthenticatedUser;

use carwash_admin::domain::admin::NewAdmin;
use carwash_admin::domain::booking::{BookingStatus, NewBooking};
use carwash_admin::domain::branch::NewBranch;
use carwash_admin::domain::wash_service::NewWashService;
use carwash_admin::forms::bookings::AddBookingForm;
use carwash_admin::forms::payments::ManualPaymentForm;
use carwash_admin::repository::{AdminWriter, BookingWriter, BranchWriter, WashServiceWriter};
use carwash_admin::services::bookings::{self, BookingsQuery};
use carwash_admin::services::payments;
use carwash_admin::services::reports::{self, ReportQuery};
use carwash_admin::services::ServiceError;
use carwash_admin::{BRANCH_ADMIN_ROLE, SERVICE_ACCESS_ROLE};

mod common;

use common::HUB;


fn user(email: &str, role: &str) -> AuthenticatedUser {
    AuthenticatedUser {
        sub: "user".into(),
        email: email.into(),
        hub_id: HUB,
        name: "User".into(),
        roles: vec![role.to_string()],
        exp: 0,
    }
}

fn at(day: u32, hour: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2024, 5, day)
        .unwrap()
        .and_hms_opt(hour, 0, 0)
        .unwrap()
}

fn booking_form(branch_id: i32, service_id: Option<i32>, price: Option<&str>) -> AddBookingForm {
    AddBookingForm {
        branch_id,
        service_id: service_id.map(|id| id.to_string()),
        washer_id: None,
        customer_name: "Alice".to_string(),
        customer_phone: None,
        car_plate: Some("AB123".to_string()),
        scheduled_at: "2024-05-01T09:30".to_string(),
        price: price.map(str::to_string),
        notes: None,
    }
}

#[test]
fn branch_admin_sees_only_assigned_bookings() {
    let test_db = common::TestDb::new("service_branch_admin_sees_only_assigned_bookings.db");
    let repo = test_db.repo();

    let main = repo
        .create_branch(&NewBranch::new(HUB, "Main", "1 Main St", "08:00", "20:00"))
        .unwrap();
    let other = repo
        .create_branch(&NewBranch::new(HUB, "Other", "2 Side St", "08:00", "20:00"))
        .unwrap();
    repo.create_admin(&NewAdmin::branch(HUB, "manager@example.com", "Manager", vec![main.id]))
        .unwrap();

    repo.create_booking(&NewBooking::new(HUB, main.id, "Alice", at(1, 9), 2000))
        .unwrap();
    repo.create_booking(&NewBooking::new(HUB, other.id, "Bob", at(1, 10), 2000))
        .unwrap();

    let manager = user("manager@example.com", BRANCH_ADMIN_ROLE);
    let (total, items) = bookings::list_bookings(&repo, &manager, BookingsQuery::default())
        .expect("bookings for the branch admin");
    assert_eq!(total, 1);
    assert_eq!(items[0].branch_id, main.id);

    let result = bookings::create_booking(&repo, &manager, booking_form(other.id, None, Some("10")));
    assert!(matches!(result, Err(ServiceError::NotFound)));

    let stranger = user("stranger@example.com", BRANCH_ADMIN_ROLE);
    let result = bookings::list_bookings(&repo, &stranger, BookingsQuery::default());
    assert!(matches!(result, Err(ServiceError::Unauthorized)));
}

#[test]
fn booking_price_defaults_to_service_and_payment_to_booking() {
    let test_db = common::TestDb::new("service_booking_price_defaults.db");
    let repo = test_db.repo();
    let admin = user("admin@example.com", SERVICE_ACCESS_ROLE);

    let branch = repo
        .create_branch(&NewBranch::new(HUB, "Main", "1 Main St", "08:00", "20:00"))
        .unwrap();
    let service = repo
        .create_service(&NewWashService::new(HUB, branch.id, "Full wash", 2500, 45))
        .unwrap();

    let booking = bookings::create_booking(&repo, &admin, booking_form(branch.id, Some(service.id), None))
        .expect("booking created");
    assert_eq!(booking.price_cents, 2500);
    assert_eq!(booking.status, BookingStatus::Pending);

    let result = bookings::create_booking(&repo, &admin, booking_form(branch.id, None, None));
    assert!(matches!(result, Err(ServiceError::Form(_))));

    let payment = payments::record_manual_payment(
        &repo,
        &admin,
        ManualPaymentForm {
            booking_id: booking.id,
            amount: None,
            currency: None,
            method: "cash".to_string(),
        },
    )
    .expect("payment recorded");
    assert_eq!(payment.amount_cents, 2500);
    assert_eq!(payment.booking_id, Some(booking.id));
    assert_eq!(payment.currency, "USD");
}

#[test]
fn report_totals_follow_recorded_payments() {
    let test_db = common::TestDb::new("service_report_totals_follow_payments.db");
    let repo = test_db.repo();
    let admin = user("admin@example.com", SERVICE_ACCESS_ROLE);

    let branch = repo
        .create_branch(&NewBranch::new(HUB, "Main", "1 Main St", "08:00", "20:00"))
        .unwrap();
    let first = repo
        .create_booking(
            &NewBooking::new(HUB, branch.id, "Alice", at(1, 9), 2000)
                .with_status(BookingStatus::Completed),
        )
        .unwrap();
    repo.create_booking(&NewBooking::new(HUB, branch.id, "Bob", at(2, 9), 1000))
        .unwrap();

    payments::record_manual_payment(
        &repo,
        &admin,
        ManualPaymentForm {
            booking_id: first.id,
            amount: Some("20.00".to_string()),
            currency: None,
            method: "card".to_string(),
        },
    )
    .expect("payment recorded");

    let data = reports::load_report(&repo, &admin, ReportQuery::default()).expect("report");
    let report = data.report;
    assert_eq!(report.total_bookings, 2);
    assert_eq!(report.revenue_cents, 2000);
    assert_eq!(report.branches.len(), 1);
    assert_eq!(report.branches[0].completed, 1);
    assert_eq!(report.branches[0].average_ticket_cents, 2000);

    let csv = String::from_utf8(reports::export_report_csv(&report).expect("csv")).unwrap();
    assert!(csv.starts_with("branch,bookings,completed,revenue,average_ticket"));
    assert!(csv.contains("Main,2,1,20.00,20.00"));
}
