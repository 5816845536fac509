//! Review form validation and the pending-review eligibility set.

use serde::{Deserialize, Serialize};
use std::{borrow::Cow, collections::HashSet};
use utoipa::ToSchema;
use validator::{Validate, ValidationError};

use crate::models::{CreateReviewPayload, DeliveredMedicine, Review};
use crate::validation::FieldErrors;

/// Review form as submitted. `rating` stays numeric so fractional input is
/// reported per field instead of failing deserialization.
#[derive(Debug, Clone, Deserialize, Serialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ReviewForm {
    #[validate(
        range(min = 1.0, max = 5.0, message = "Rating must be between 1 and 5 Stars"),
        custom(function = "validate_whole_stars")
    )]
    pub rating: f64,
    #[serde(default)]
    #[validate(length(max = 500, message = "Comment must be within 500 characters"))]
    pub comment: Option<String>,
}

fn validate_whole_stars(rating: f64) -> Result<(), ValidationError> {
    if rating.fract() == 0.0 {
        return Ok(());
    }
    let mut error = ValidationError::new("whole_stars");
    error.message = Some(Cow::Borrowed("Rating must be integer"));
    Err(error)
}

impl ReviewForm {
    /// A blank comment is sent as no comment.
    pub fn into_payload(self) -> Result<CreateReviewPayload, FieldErrors> {
        let form = Self {
            rating: self.rating,
            comment: self
                .comment
                .map(|comment| comment.trim().to_string())
                .filter(|comment| !comment.is_empty()),
        };
        form.validate().map_err(FieldErrors::from)?;
        Ok(CreateReviewPayload {
            rating: form.rating as u8,
            comment: form.comment,
        })
    }
}

/// Delivered medicines the user has not reviewed yet, one entry per medicine,
/// in the order the backend returned them.
pub fn pending_reviews(delivered: Vec<DeliveredMedicine>, reviews: &[Review]) -> Vec<DeliveredMedicine> {
    let reviewed: HashSet<&str> = reviews
        .iter()
        .map(|review| review.medicine_id.as_str())
        .collect();
    let mut seen: HashSet<String> = HashSet::new();

    delivered
        .into_iter()
        .filter(|item| !reviewed.contains(item.medicine_id.as_str()))
        .filter(|item| seen.insert(item.medicine_id.clone()))
        .collect()
}
