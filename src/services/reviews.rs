use pushkind_common::domain::auth::AuthenticatedUser;
use pushkind_common::pagination::{DEFAULT_ITEMS_PER_PAGE, Paginated};
use serde::Deserialize;

use crate::domain::booking::BookingStatus;
use crate::domain::review::{MAX_RATING, MIN_RATING, Review, ReviewListQuery};
use crate::forms::reviews::AddReviewForm;
use crate::repository::{
    AdminReader, BookingReader, BranchReader, BranchWriter, ReviewReader, ReviewWriter,
};
use crate::services::access::{ensure_branch_access, resolve_scope};
use crate::services::branches::recalculate_rating;
use crate::services::{ServiceError, ServiceResult};

#[derive(Debug, Default, Deserialize)]
pub struct ReviewsQuery {
    pub page: Option<usize>,
    pub min_rating: Option<i32>,
    pub max_rating: Option<i32>,
}

pub struct ReviewsPageData {
    pub reviews: Paginated<Review>,
    pub min_rating: Option<i32>,
    pub max_rating: Option<i32>,
}

fn rating_filter(value: Option<i32>) -> Option<i32> {
    value.filter(|rating| (MIN_RATING..=MAX_RATING).contains(rating))
}

pub fn load_reviews_page<R>(
    repo: &R,
    user: &AuthenticatedUser,
    query: ReviewsQuery,
) -> ServiceResult<ReviewsPageData>
where
    R: AdminReader + BranchReader + ReviewReader + ?Sized,
{
    let scope = resolve_scope(repo, user)?;
    let page = query.page.unwrap_or(1).max(1);
    let min_rating = rating_filter(query.min_rating);
    let max_rating = rating_filter(query.max_rating);

    let list_query = ReviewListQuery::new(user.hub_id)
        .restrict_to(scope.branch_filter())
        .rating_between(min_rating, max_rating)
        .paginate(page, DEFAULT_ITEMS_PER_PAGE);

    let (total, reviews) = repo.list_reviews(list_query).map_err(ServiceError::from)?;

    Ok(ReviewsPageData {
        reviews: Paginated::new(reviews, page, total.div_ceil(DEFAULT_ITEMS_PER_PAGE)),
        min_rating,
        max_rating,
    })
}

/// Records a review for a completed booking and refreshes the branch rating.
pub fn create_review<R>(repo: &R, user: &AuthenticatedUser, form: AddReviewForm) -> ServiceResult<Review>
where
    R: AdminReader
        + BranchReader
        + BranchWriter
        + BookingReader
        + ReviewReader
        + ReviewWriter
        + ?Sized,
{
    let scope = resolve_scope(repo, user)?;

    let new_review = form
        .into_new_review(user.hub_id)
        .map_err(|err| ServiceError::Form(err.to_string()))?;

    let booking = repo
        .get_booking_by_id(new_review.booking_id, user.hub_id)
        .map_err(ServiceError::from)?
        .ok_or(ServiceError::NotFound)?;
    ensure_branch_access(&scope, booking.branch_id)?;

    if booking.status != BookingStatus::Completed {
        return Err(ServiceError::Conflict(
            "only completed bookings can be reviewed".to_string(),
        ));
    }
    if repo
        .get_review_by_booking(booking.id, user.hub_id)
        .map_err(ServiceError::from)?
        .is_some()
    {
        return Err(ServiceError::Conflict(format!(
            "booking {} already has a review",
            booking.id
        )));
    }

    let review = repo.create_review(&new_review).map_err(ServiceError::from)?;
    recalculate_rating(repo, user.hub_id, booking.branch_id)?;
    Ok(review)
}

pub fn remove_review<R>(repo: &R, user: &AuthenticatedUser, review_id: i32) -> ServiceResult<()>
where
    R: AdminReader
        + BranchReader
        + BranchWriter
        + BookingReader
        + ReviewReader
        + ReviewWriter
        + ?Sized,
{
    let scope = resolve_scope(repo, user)?;

    let review = repo
        .get_review_by_id(review_id, user.hub_id)
        .map_err(ServiceError::from)?
        .ok_or(ServiceError::NotFound)?;
    let booking = repo
        .get_booking_by_id(review.booking_id, user.hub_id)
        .map_err(ServiceError::from)?
        .ok_or(ServiceError::NotFound)?;
    ensure_branch_access(&scope, booking.branch_id)?;

    repo.delete_review(review_id, user.hub_id)
        .map_err(ServiceError::from)?;
    recalculate_rating(repo, user.hub_id, booking.branch_id)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::mock::MockRepository;
    use crate::services::test_support::{HUB_ID, fixed_datetime, platform_user, sample_booking};

    fn review(id: i32, booking_id: i32, rating: i32) -> Review {
        Review {
            id,
            hub_id: HUB_ID,
            booking_id,
            rating,
            comment: None,
            created_at: fixed_datetime(),
            updated_at: fixed_datetime(),
        }
    }

    fn form(rating: i32) -> AddReviewForm {
        AddReviewForm {
            booking_id: 4,
            rating,
            comment: None,
        }
    }

    #[test]
    fn review_requires_completed_booking() {
        let mut repo = MockRepository::new();
        repo.expect_get_booking_by_id()
            .returning(|id, _| Ok(Some(sample_booking(id, 1, BookingStatus::InProgress))));
        repo.expect_create_review().never();

        let result = create_review(&repo, &platform_user(), form(5));

        assert!(matches!(result, Err(ServiceError::Conflict(_))));
    }

    #[test]
    fn second_review_is_a_conflict() {
        let mut repo = MockRepository::new();
        repo.expect_get_booking_by_id()
            .returning(|id, _| Ok(Some(sample_booking(id, 1, BookingStatus::Completed))));
        repo.expect_get_review_by_booking()
            .returning(|booking_id, _| Ok(Some(review(1, booking_id, 4))));
        repo.expect_create_review().never();

        let result = create_review(&repo, &platform_user(), form(5));

        assert!(matches!(result, Err(ServiceError::Conflict(_))));
    }

    #[test]
    fn out_of_range_rating_is_a_form_error() {
        let repo = MockRepository::new();

        let result = create_review(&repo, &platform_user(), form(6));

        assert!(matches!(result, Err(ServiceError::Form(_))));
    }

    #[test]
    fn creating_a_review_refreshes_branch_rating() {
        let mut repo = MockRepository::new();
        repo.expect_get_booking_by_id()
            .returning(|id, _| Ok(Some(sample_booking(id, 1, BookingStatus::Completed))));
        repo.expect_get_review_by_booking().returning(|_, _| Ok(None));
        repo.expect_create_review()
            .times(1)
            .returning(|new| Ok(review(9, new.booking_id, new.rating)));
        repo.expect_list_bookings()
            .returning(|_| Ok((1, vec![sample_booking(4, 1, BookingStatus::Completed)])));
        repo.expect_list_reviews()
            .returning(|_| Ok((1, vec![review(9, 4, 5)])));
        repo.expect_set_branch_rating()
            .times(1)
            .withf(|branch_id, _, rating| *branch_id == 1 && *rating == 5.0)
            .returning(|_, _, _| Ok(()));

        let created = create_review(&repo, &platform_user(), form(5)).expect("created");

        assert_eq!(created.id, 9);
    }

    #[test]
    fn deleting_a_review_refreshes_branch_rating() {
        let mut repo = MockRepository::new();
        repo.expect_get_review_by_id()
            .returning(|id, _| Ok(Some(review(id, 4, 2))));
        repo.expect_get_booking_by_id()
            .returning(|id, _| Ok(Some(sample_booking(id, 1, BookingStatus::Completed))));
        repo.expect_delete_review().times(1).returning(|_, _| Ok(()));
        repo.expect_list_bookings()
            .returning(|_| Ok((1, vec![sample_booking(4, 1, BookingStatus::Completed)])));
        repo.expect_list_reviews().returning(|_| Ok((0, Vec::new())));
        repo.expect_set_branch_rating()
            .times(1)
            .withf(|_, _, rating| *rating == 0.0)
            .returning(|_, _, _| Ok(()));

        assert!(remove_review(&repo, &platform_user(), 9).is_ok());
    }
}
