use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::amenity::Amenity;
use super::review::{RatingStats, Review};
use super::user::OwnerSummary;

/// places table plus its place_amenity links
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Place {
    pub id: String,
    pub title: String,
    pub description: Option<String>,
    pub price: f64,
    pub latitude: f64,
    pub longitude: f64,
    pub owner_id: String,
    #[serde(rename = "amenities")]
    pub amenity_ids: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Place {
    pub fn has_amenity(&self, amenity_id: &str) -> bool {
        self.amenity_ids.iter().any(|id| id == amenity_id)
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct PlaceInput {
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    pub price: f64,
    pub latitude: f64,
    pub longitude: f64,
    #[serde(default)]
    pub owner_id: Option<String>,
    #[serde(default)]
    pub amenities: Vec<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct PlaceUpdate {
    pub title: Option<String>,
    pub description: Option<String>,
    pub price: Option<f64>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub owner_id: Option<String>,
    pub amenities: Option<Vec<String>>,
}

/// List view of a place
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlaceSummary {
    pub id: String,
    pub title: String,
    pub price: f64,
    pub latitude: f64,
    pub longitude: f64,
    pub owner_id: String,
    #[serde(flatten)]
    pub rating: RatingStats,
}

impl PlaceSummary {
    pub fn new(place: &Place, reviews: &[Review]) -> Self {
        Self {
            id: place.id.clone(),
            title: place.title.clone(),
            price: place.price,
            latitude: place.latitude,
            longitude: place.longitude,
            owner_id: place.owner_id.clone(),
            rating: RatingStats::from_reviews(reviews),
        }
    }
}

/// Detail view with owner, amenities and reviews resolved
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlaceDetails {
    pub id: String,
    pub title: String,
    pub description: Option<String>,
    pub price: f64,
    pub latitude: f64,
    pub longitude: f64,
    pub owner: OwnerSummary,
    pub amenities: Vec<Amenity>,
    pub reviews: Vec<Review>,
    #[serde(flatten)]
    pub rating: RatingStats,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
