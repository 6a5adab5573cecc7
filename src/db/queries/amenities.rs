use async_trait::async_trait;
use sqlx::SqlitePool;

use crate::db::errors::{DatabaseError, Result};
use crate::db::repository::{AmenityRepository, Repository};
use crate::models::Amenity;

pub struct SqliteAmenityRepository {
    pool: SqlitePool,
}

impl SqliteAmenityRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl Repository<Amenity> for SqliteAmenityRepository {
    async fn add(&self, amenity: &Amenity) -> Result<()> {
        sqlx::query("INSERT INTO amenities (id, name, created_at, updated_at) VALUES (?, ?, ?, ?)")
            .bind(&amenity.id)
            .bind(&amenity.name)
            .bind(amenity.created_at)
            .bind(amenity.updated_at)
            .execute(&self.pool)
            .await
            .map_err(|e| DatabaseError::from_query(e, "amenities"))?;

        Ok(())
    }

    async fn get(&self, id: &str) -> Result<Option<Amenity>> {
        let amenity = sqlx::query_as::<_, Amenity>(
            "SELECT id, name, created_at, updated_at FROM amenities WHERE id = ?",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(amenity)
    }

    async fn get_all(&self) -> Result<Vec<Amenity>> {
        let amenities = sqlx::query_as::<_, Amenity>(
            "SELECT id, name, created_at, updated_at FROM amenities ORDER BY created_at, id",
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(amenities)
    }

    async fn update(&self, amenity: &Amenity) -> Result<()> {
        let result = sqlx::query("UPDATE amenities SET name = ?, updated_at = ? WHERE id = ?")
            .bind(&amenity.name)
            .bind(amenity.updated_at)
            .bind(&amenity.id)
            .execute(&self.pool)
            .await
            .map_err(|e| DatabaseError::from_query(e, "amenities"))?;

        if result.rows_affected() == 0 {
            return Err(DatabaseError::NotFound(format!("Amenity {}", amenity.id)));
        }
        Ok(())
    }

    async fn delete(&self, id: &str) -> Result<bool> {
        // place_amenity rows go with it (ON DELETE CASCADE)
        let result = sqlx::query("DELETE FROM amenities WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}

#[async_trait]
impl AmenityRepository for SqliteAmenityRepository {
    async fn get_by_name(&self, name: &str) -> Result<Option<Amenity>> {
        let amenity = sqlx::query_as::<_, Amenity>(
            "SELECT id, name, created_at, updated_at FROM amenities WHERE name = ?",
        )
        .bind(name)
        .fetch_optional(&self.pool)
        .await?;

        Ok(amenity)
    }
}
