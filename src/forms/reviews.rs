use pushkind_common::routes::empty_string_as_none;
use serde::Deserialize;
use thiserror::Error;
use validator::{Validate, ValidationErrors};

use crate::domain::review::{MAX_RATING, MIN_RATING, NewReview};
use crate::forms::optional_multiline;

const COMMENT_MAX_LEN: u64 = 2048;

#[derive(Debug, Error)]
pub enum ReviewFormError {
    #[error("validation failed: {0}")]
    Validation(#[from] ValidationErrors),
}

#[derive(Debug, Deserialize, Validate)]
pub struct AddReviewForm {
    #[validate(range(min = 1))]
    pub booking_id: i32,
    #[validate(range(min = MIN_RATING, max = MAX_RATING))]
    pub rating: i32,
    #[validate(length(max = COMMENT_MAX_LEN))]
    #[serde(default, deserialize_with = "empty_string_as_none")]
    pub comment: Option<String>,
}

impl AddReviewForm {
    pub fn into_new_review(self, hub_id: i32) -> Result<NewReview, ReviewFormError> {
        self.validate()?;

        let mut review = NewReview::new(hub_id, self.booking_id, self.rating);
        if let Some(comment) = optional_multiline(self.comment.as_deref()) {
            review = review.with_comment(comment);
        }
        Ok(review)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn add_review_form_converts() {
        let form = AddReviewForm {
            booking_id: 11,
            rating: 5,
            comment: Some("  Spotless!  ".to_string()),
        };

        let review = form.into_new_review(2).expect("expected success");

        assert_eq!(review.booking_id, 11);
        assert_eq!(review.rating, 5);
        assert_eq!(review.comment.as_deref(), Some("Spotless!"));
    }

    #[test]
    fn add_review_form_rejects_out_of_range_rating() {
        for rating in [0, 6] {
            let form = AddReviewForm {
                booking_id: 11,
                rating,
                comment: None,
            };
            assert!(matches!(
                form.into_new_review(2),
                Err(ReviewFormError::Validation(_))
            ));
        }
    }
}
