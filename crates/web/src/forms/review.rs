//! Review submission form.

use bookreview_core::reviews::is_valid_rating;
use bookreview_db::models::review::{ReviewDetail, UpdateReview};
use serde::Deserialize;
use validator::Validate;

use super::{required, FormErrors};

/// `POST /book/{id}/review/` and `POST /admin/reviews/{id}/` body.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(default)]
pub struct ReviewForm {
    #[validate(custom(function = "required"))]
    pub rating: String,
    #[validate(custom(function = "required"))]
    pub review_text: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CleanReview {
    pub rating: i64,
    pub review_text: String,
}

impl ReviewForm {
    /// Prefill the staff change form.
    pub fn from_review(review: &ReviewDetail) -> Self {
        Self {
            rating: review.rating.to_string(),
            review_text: review.review_text.clone(),
        }
    }

    pub fn clean(&self) -> Result<CleanReview, FormErrors> {
        let rating_raw = self.rating.trim();
        let review_text = self.review_text.trim().to_string();

        let mut errors = match self.validate() {
            Ok(()) => FormErrors::new(),
            Err(e) => FormErrors::from_validation(&e),
        };

        let rating = rating_raw.parse::<i64>().ok().filter(|r| is_valid_rating(*r));
        if rating.is_none() && !errors.has("rating") {
            errors.add(
                "rating",
                format!("Select a valid choice. {rating_raw} is not one of the available choices."),
            );
        }

        match rating {
            Some(rating) if errors.is_empty() => Ok(CleanReview {
                rating,
                review_text,
            }),
            _ => Err(errors),
        }
    }
}

impl CleanReview {
    pub fn into_update(self) -> UpdateReview {
        UpdateReview {
            rating: self.rating,
            review_text: self.review_text,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::forms::REQUIRED_MESSAGE;

    fn form(rating: &str, text: &str) -> ReviewForm {
        ReviewForm {
            rating: rating.into(),
            review_text: text.into(),
        }
    }

    #[test]
    fn valid_review() {
        assert_eq!(
            form("4", "  Gripping from start to finish. ").clean(),
            Ok(CleanReview {
                rating: 4,
                review_text: "Gripping from start to finish.".into(),
            })
        );
    }

    #[test]
    fn rating_out_of_range_is_rejected() {
        let errors = form("6", "Fine").clean().unwrap_err();
        assert_eq!(
            errors.field("rating"),
            ["Select a valid choice. 6 is not one of the available choices."]
        );

        let errors = form("great", "Fine").clean().unwrap_err();
        assert!(errors.has("rating"));
    }

    #[test]
    fn blank_fields_are_required() {
        let errors = form("", "   ").clean().unwrap_err();
        assert_eq!(errors.field("rating"), [REQUIRED_MESSAGE]);
        assert_eq!(errors.field("review_text"), [REQUIRED_MESSAGE]);
    }
}
