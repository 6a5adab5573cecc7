use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// reviews table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct Review {
    pub id: String,
    pub text: String,
    pub rating: i64,
    pub user_id: String,
    pub place_id: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Review creation payload
///
/// `user_id` defaults to the caller; only admins may write on behalf of
/// someone else.
#[derive(Debug, Clone, Deserialize)]
pub struct ReviewInput {
    pub text: String,
    pub rating: i64,
    pub place_id: String,
    #[serde(default)]
    pub user_id: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ReviewUpdate {
    pub text: Option<String>,
    pub rating: Option<i64>,
}

/// Aggregate rating for a place
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RatingStats {
    pub average_rating: Option<f64>,
    pub review_count: usize,
}

impl RatingStats {
    /// Mean rating rounded to two decimals, `None` without reviews
    pub fn from_reviews(reviews: &[Review]) -> Self {
        let review_count = reviews.len();
        if review_count == 0 {
            return Self {
                average_rating: None,
                review_count,
            };
        }

        let total: i64 = reviews.iter().map(|r| r.rating).sum();
        let mean = total as f64 / review_count as f64;

        Self {
            average_rating: Some((mean * 100.0).round() / 100.0),
            review_count,
        }
    }
}
