use async_trait::async_trait;
use sqlx::SqlitePool;

use crate::db::errors::{DatabaseError, Result};
use crate::db::repository::{Repository, ReviewRepository};
use crate::models::Review;

const REVIEW_COLUMNS: &str = "id, text, rating, user_id, place_id, created_at, updated_at";

pub struct SqliteReviewRepository {
    pool: SqlitePool,
}

impl SqliteReviewRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    async fn list_where(&self, column: &str, value: &str) -> Result<Vec<Review>> {
        let reviews = sqlx::query_as::<_, Review>(&format!(
            "SELECT {} FROM reviews WHERE {} = ? ORDER BY created_at, id",
            REVIEW_COLUMNS, column
        ))
        .bind(value)
        .fetch_all(&self.pool)
        .await?;

        Ok(reviews)
    }
}

#[async_trait]
impl Repository<Review> for SqliteReviewRepository {
    #[tracing::instrument(skip(self, review), fields(review_id = %review.id))]
    async fn add(&self, review: &Review) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO reviews (id, text, rating, user_id, place_id, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&review.id)
        .bind(&review.text)
        .bind(review.rating)
        .bind(&review.user_id)
        .bind(&review.place_id)
        .bind(review.created_at)
        .bind(review.updated_at)
        .execute(&self.pool)
        .await
        .map_err(|e| DatabaseError::from_query(e, "reviews"))?;

        Ok(())
    }

    async fn get(&self, id: &str) -> Result<Option<Review>> {
        let review = sqlx::query_as::<_, Review>(&format!(
            "SELECT {} FROM reviews WHERE id = ?",
            REVIEW_COLUMNS
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(review)
    }

    async fn get_all(&self) -> Result<Vec<Review>> {
        let reviews = sqlx::query_as::<_, Review>(&format!(
            "SELECT {} FROM reviews ORDER BY created_at, id",
            REVIEW_COLUMNS
        ))
        .fetch_all(&self.pool)
        .await?;

        Ok(reviews)
    }

    async fn update(&self, review: &Review) -> Result<()> {
        // Author and place are fixed once written
        let result = sqlx::query("UPDATE reviews SET text = ?, rating = ?, updated_at = ? WHERE id = ?")
            .bind(&review.text)
            .bind(review.rating)
            .bind(review.updated_at)
            .bind(&review.id)
            .execute(&self.pool)
            .await
            .map_err(|e| DatabaseError::from_query(e, "reviews"))?;

        if result.rows_affected() == 0 {
            return Err(DatabaseError::NotFound(format!("Review {}", review.id)));
        }
        Ok(())
    }

    async fn delete(&self, id: &str) -> Result<bool> {
        let result = sqlx::query("DELETE FROM reviews WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}

#[async_trait]
impl ReviewRepository for SqliteReviewRepository {
    async fn list_by_place(&self, place_id: &str) -> Result<Vec<Review>> {
        self.list_where("place_id", place_id).await
    }

    async fn list_by_user(&self, user_id: &str) -> Result<Vec<Review>> {
        self.list_where("user_id", user_id).await
    }

    async fn get_by_user_and_place(
        &self,
        user_id: &str,
        place_id: &str,
    ) -> Result<Option<Review>> {
        let review = sqlx::query_as::<_, Review>(&format!(
            "SELECT {} FROM reviews WHERE user_id = ? AND place_id = ?",
            REVIEW_COLUMNS
        ))
        .bind(user_id)
        .bind(place_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(review)
    }
}
