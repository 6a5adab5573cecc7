//! Repository traits shared by the in-memory and SQLite backends.
//!
//! The facade only ever sees these traits, so switching storage is a matter
//! of building a different `Repositories` bundle.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::SqlitePool;
use std::sync::Arc;

use crate::db::errors::Result;
use crate::db::memory::InMemoryRepository;
use crate::db::queries::{
    SqliteAmenityRepository, SqlitePlaceRepository, SqliteReviewRepository, SqliteUserRepository,
};
use crate::models::{Amenity, Place, Review, User};

/// Anything stored by id
pub trait Entity: Clone + Send + Sync + 'static {
    const KIND: &'static str;

    fn id(&self) -> &str;
    fn created_at(&self) -> DateTime<Utc>;

    /// Secondary key that must be unique across the collection, if any.
    /// Mirrors the UNIQUE constraints of the SQLite schema.
    fn natural_key(&self) -> Option<String> {
        None
    }
}

impl Entity for User {
    const KIND: &'static str = "User";

    fn id(&self) -> &str {
        &self.id
    }

    fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    fn natural_key(&self) -> Option<String> {
        Some(self.email.to_lowercase())
    }
}

impl Entity for Place {
    const KIND: &'static str = "Place";

    fn id(&self) -> &str {
        &self.id
    }

    fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
}

impl Entity for Amenity {
    const KIND: &'static str = "Amenity";

    fn id(&self) -> &str {
        &self.id
    }

    fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    fn natural_key(&self) -> Option<String> {
        Some(self.name.clone())
    }
}

impl Entity for Review {
    const KIND: &'static str = "Review";

    fn id(&self) -> &str {
        &self.id
    }

    fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    // One review per (user, place)
    fn natural_key(&self) -> Option<String> {
        Some(format!("{}:{}", self.user_id, self.place_id))
    }
}

/// Basic CRUD over one entity type.
///
/// `get_all` returns rows ordered by creation time, then id.
#[async_trait]
pub trait Repository<T: Entity>: Send + Sync {
    /// Insert a new entity. Fails with `IntegrityError` on duplicate keys.
    async fn add(&self, entity: &T) -> Result<()>;

    async fn get(&self, id: &str) -> Result<Option<T>>;

    async fn get_all(&self) -> Result<Vec<T>>;

    /// Replace a stored entity. Fails with `NotFound` if it doesn't exist.
    async fn update(&self, entity: &T) -> Result<()>;

    /// Returns `false` when nothing was deleted.
    async fn delete(&self, id: &str) -> Result<bool>;
}

#[async_trait]
pub trait UserRepository: Repository<User> {
    async fn get_by_email(&self, email: &str) -> Result<Option<User>>;
}

#[async_trait]
pub trait AmenityRepository: Repository<Amenity> {
    async fn get_by_name(&self, name: &str) -> Result<Option<Amenity>>;
}

#[async_trait]
pub trait PlaceRepository: Repository<Place> {
    async fn list_by_owner(&self, owner_id: &str) -> Result<Vec<Place>>;

    async fn list_by_amenity(&self, amenity_id: &str) -> Result<Vec<Place>>;
}

#[async_trait]
pub trait ReviewRepository: Repository<Review> {
    async fn list_by_place(&self, place_id: &str) -> Result<Vec<Review>>;

    async fn list_by_user(&self, user_id: &str) -> Result<Vec<Review>>;

    async fn get_by_user_and_place(&self, user_id: &str, place_id: &str)
        -> Result<Option<Review>>;
}

/// Container for all repository trait objects
#[derive(Clone)]
pub struct Repositories {
    pub users: Arc<dyn UserRepository>,
    pub places: Arc<dyn PlaceRepository>,
    pub amenities: Arc<dyn AmenityRepository>,
    pub reviews: Arc<dyn ReviewRepository>,
}

impl Repositories {
    pub fn in_memory() -> Self {
        Self {
            users: Arc::new(InMemoryRepository::<User>::new()),
            places: Arc::new(InMemoryRepository::<Place>::new()),
            amenities: Arc::new(InMemoryRepository::<Amenity>::new()),
            reviews: Arc::new(InMemoryRepository::<Review>::new()),
        }
    }

    pub fn sqlite(pool: SqlitePool) -> Self {
        Self {
            users: Arc::new(SqliteUserRepository::new(pool.clone())),
            places: Arc::new(SqlitePlaceRepository::new(pool.clone())),
            amenities: Arc::new(SqliteAmenityRepository::new(pool.clone())),
            reviews: Arc::new(SqliteReviewRepository::new(pool)),
        }
    }
}
