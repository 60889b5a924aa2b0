use chrono::NaiveDate;
use diesel::RunQueryDsl;
use diesel::sql_types::Integer;

use carwash_admin::domain::booking::NewBooking;
use carwash_admin::domain::review::NewReview;
use carwash_admin::domain::washer::NewWasher;
use carwash_admin::repository::{BookingWriter, ReviewWriter, WasherWriter};

mod common;

use common::HUB;

fn insert_slot(
    test_db: &common::TestDb,
    washer_id: i32,
    day_of_week: i32,
) -> diesel::QueryResult<usize> {
    let mut conn = test_db.pool().get().expect("connection");
    diesel::sql_query(
        "INSERT INTO washer_schedules (washer_id, day_of_week, start_time, end_time) \
         VALUES (?, ?, '08:00', '12:00')",
    )
    .bind::<Integer, _>(washer_id)
    .bind::<Integer, _>(day_of_week)
    .execute(&mut conn)
}

#[test]
fn test_database_files_are_removed_on_drop() {
    let base = "test_database_files_are_removed_on_drop.db";

    {
        let test_db = common::TestDb::new(base);
        assert!(test_db.pool().get().is_ok());
        test_db.seed_branch("Main");
    }

    assert!(!std::path::Path::new(base).exists());
    assert!(!std::path::Path::new(&format!("{base}-shm")).exists());
    assert!(!std::path::Path::new(&format!("{base}-wal")).exists());
}

#[test]
fn test_booking_accepts_a_single_review() {
    let test_db = common::TestDb::new("test_booking_accepts_a_single_review.db");
    let repo = test_db.repo();
    let branch = test_db.seed_branch("Main");

    let scheduled_at = NaiveDate::from_ymd_opt(2024, 5, 1)
        .unwrap()
        .and_hms_opt(9, 0, 0)
        .unwrap();
    let booking = repo
        .create_booking(&NewBooking::new(HUB, branch.id, "Alice", scheduled_at, 2000))
        .unwrap();

    repo.create_review(&NewReview::new(HUB, booking.id, 5)).unwrap();
    assert!(repo.create_review(&NewReview::new(HUB, booking.id, 4)).is_err());
}

#[test]
fn test_schedule_allows_one_slot_per_weekday() {
    let test_db = common::TestDb::new("test_schedule_allows_one_slot_per_weekday.db");
    let branch = test_db.seed_branch("Main");
    let washer = test_db
        .repo()
        .create_washer(&NewWasher::new(HUB, branch.id, "Sam"))
        .unwrap();

    assert_eq!(insert_slot(&test_db, washer.id, 1).unwrap(), 1);
    assert!(insert_slot(&test_db, washer.id, 1).is_err());
    assert!(insert_slot(&test_db, washer.id, 7).is_err());
}
