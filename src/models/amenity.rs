use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// amenities table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct Amenity {
    pub id: String,
    pub name: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AmenityInput {
    pub name: String,
}
