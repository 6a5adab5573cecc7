use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{FromRow, Sqlite, SqlitePool, Transaction};
use std::collections::HashMap;
use tracing::debug;

use crate::db::errors::{DatabaseError, Result};
use crate::db::repository::{PlaceRepository, Repository};
use crate::models::Place;

const PLACE_COLUMNS: &str =
    "id, title, description, price, latitude, longitude, owner_id, created_at, updated_at";

/// places row without its amenity links
#[derive(Debug, FromRow)]
struct PlaceRow {
    id: String,
    title: String,
    description: Option<String>,
    price: f64,
    latitude: f64,
    longitude: f64,
    owner_id: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl PlaceRow {
    fn into_place(self, amenity_ids: Vec<String>) -> Place {
        Place {
            id: self.id,
            title: self.title,
            description: self.description,
            price: self.price,
            latitude: self.latitude,
            longitude: self.longitude,
            owner_id: self.owner_id,
            amenity_ids,
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}

pub struct SqlitePlaceRepository {
    pool: SqlitePool,
}

impl SqlitePlaceRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Attach amenity ids to a batch of rows with a single link query
    async fn hydrate(&self, rows: Vec<PlaceRow>) -> Result<Vec<Place>> {
        if rows.is_empty() {
            return Ok(Vec::new());
        }

        let links: Vec<(String, String)> = sqlx::query_as(
            "SELECT place_id, amenity_id FROM place_amenity ORDER BY place_id, position",
        )
        .fetch_all(&self.pool)
        .await?;

        let mut by_place: HashMap<String, Vec<String>> = HashMap::new();
        for (place_id, amenity_id) in links {
            by_place.entry(place_id).or_default().push(amenity_id);
        }

        Ok(rows
            .into_iter()
            .map(|row| {
                let amenity_ids = by_place.remove(&row.id).unwrap_or_default();
                row.into_place(amenity_ids)
            })
            .collect())
    }

    async fn fetch_rows(&self, filter: &str, bind: Option<&str>) -> Result<Vec<PlaceRow>> {
        let sql = format!(
            "SELECT {} FROM places {} ORDER BY created_at, id",
            PLACE_COLUMNS, filter
        );
        let mut query = sqlx::query_as::<_, PlaceRow>(&sql);
        if let Some(value) = bind {
            query = query.bind(value);
        }
        Ok(query.fetch_all(&self.pool).await?)
    }
}

async fn replace_amenity_links(
    tx: &mut Transaction<'_, Sqlite>,
    place_id: &str,
    amenity_ids: &[String],
) -> Result<()> {
    sqlx::query("DELETE FROM place_amenity WHERE place_id = ?")
        .bind(place_id)
        .execute(&mut **tx)
        .await?;

    for (position, amenity_id) in amenity_ids.iter().enumerate() {
        sqlx::query("INSERT INTO place_amenity (place_id, amenity_id, position) VALUES (?, ?, ?)")
            .bind(place_id)
            .bind(amenity_id)
            .bind(position as i64)
            .execute(&mut **tx)
            .await
            .map_err(|e| DatabaseError::from_query(e, "place_amenity"))?;
    }

    Ok(())
}

#[async_trait]
impl Repository<Place> for SqlitePlaceRepository {
    #[tracing::instrument(skip(self, place), fields(place_id = %place.id))]
    async fn add(&self, place: &Place) -> Result<()> {
        let mut tx = self.pool.begin().await.map_err(|e| {
            DatabaseError::TransactionError(format!("Failed to start transaction: {}", e))
        })?;

        sqlx::query(
            r#"
            INSERT INTO places (
                id, title, description, price, latitude, longitude, owner_id, created_at, updated_at
            )
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&place.id)
        .bind(&place.title)
        .bind(&place.description)
        .bind(place.price)
        .bind(place.latitude)
        .bind(place.longitude)
        .bind(&place.owner_id)
        .bind(place.created_at)
        .bind(place.updated_at)
        .execute(&mut *tx)
        .await
        .map_err(|e| DatabaseError::from_query(e, "places"))?;

        replace_amenity_links(&mut tx, &place.id, &place.amenity_ids).await?;

        tx.commit().await.map_err(|e| {
            DatabaseError::TransactionError(format!("Failed to commit transaction: {}", e))
        })?;

        debug!(amenity_count = place.amenity_ids.len(), "Inserted place");
        Ok(())
    }

    async fn get(&self, id: &str) -> Result<Option<Place>> {
        let row = sqlx::query_as::<_, PlaceRow>(&format!(
            "SELECT {} FROM places WHERE id = ?",
            PLACE_COLUMNS
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        let Some(row) = row else {
            return Ok(None);
        };

        let amenity_ids: Vec<(String,)> = sqlx::query_as(
            "SELECT amenity_id FROM place_amenity WHERE place_id = ? ORDER BY position",
        )
        .bind(id)
        .fetch_all(&self.pool)
        .await?;

        Ok(Some(row.into_place(
            amenity_ids.into_iter().map(|(amenity_id,)| amenity_id).collect(),
        )))
    }

    async fn get_all(&self) -> Result<Vec<Place>> {
        let rows = self.fetch_rows("", None).await?;
        self.hydrate(rows).await
    }

    #[tracing::instrument(skip(self, place), fields(place_id = %place.id))]
    async fn update(&self, place: &Place) -> Result<()> {
        let mut tx = self.pool.begin().await.map_err(|e| {
            DatabaseError::TransactionError(format!("Failed to start transaction: {}", e))
        })?;

        let result = sqlx::query(
            r#"
            UPDATE places
            SET title = ?, description = ?, price = ?, latitude = ?, longitude = ?,
                owner_id = ?, updated_at = ?
            WHERE id = ?
            "#,
        )
        .bind(&place.title)
        .bind(&place.description)
        .bind(place.price)
        .bind(place.latitude)
        .bind(place.longitude)
        .bind(&place.owner_id)
        .bind(place.updated_at)
        .bind(&place.id)
        .execute(&mut *tx)
        .await
        .map_err(|e| DatabaseError::from_query(e, "places"))?;

        if result.rows_affected() == 0 {
            // Dropping the transaction rolls it back
            return Err(DatabaseError::NotFound(format!("Place {}", place.id)));
        }

        replace_amenity_links(&mut tx, &place.id, &place.amenity_ids).await?;

        tx.commit().await.map_err(|e| {
            DatabaseError::TransactionError(format!("Failed to commit transaction: {}", e))
        })?;

        Ok(())
    }

    async fn delete(&self, id: &str) -> Result<bool> {
        let result = sqlx::query("DELETE FROM places WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}

#[async_trait]
impl PlaceRepository for SqlitePlaceRepository {
    async fn list_by_owner(&self, owner_id: &str) -> Result<Vec<Place>> {
        let rows = self.fetch_rows("WHERE owner_id = ?", Some(owner_id)).await?;
        self.hydrate(rows).await
    }

    async fn list_by_amenity(&self, amenity_id: &str) -> Result<Vec<Place>> {
        let rows = self
            .fetch_rows(
                "WHERE id IN (SELECT place_id FROM place_amenity WHERE amenity_id = ?)",
                Some(amenity_id),
            )
            .await?;
        self.hydrate(rows).await
    }
}
