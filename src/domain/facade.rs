use chrono::{DateTime, Utc};

use crate::auth::PasswordHasher;
use crate::db::{Repositories, Repository};
use crate::models::{Amenity, Place, Review, User};

use super::{DomainError, DomainResult};

/// Single entry point for every business operation.
///
/// The per-entity operations live in `users.rs`, `amenities.rs`,
/// `places.rs` and `reviews.rs` as further `impl HbnbFacade` blocks.
#[derive(Clone)]
pub struct HbnbFacade {
    pub(super) repos: Repositories,
    pub(super) hasher: PasswordHasher,
}

impl HbnbFacade {
    pub fn new(repos: Repositories, hasher: PasswordHasher) -> Self {
        Self { repos, hasher }
    }

    /// Facade over fresh in-memory repositories
    pub fn in_memory(hasher: PasswordHasher) -> Self {
        Self::new(Repositories::in_memory(), hasher)
    }

    pub fn repositories(&self) -> &Repositories {
        &self.repos
    }

    pub(super) fn new_id() -> String {
        uuid::Uuid::new_v4().to_string()
    }

    pub(super) fn now() -> DateTime<Utc> {
        Utc::now()
    }

    pub(super) async fn require_user(&self, id: &str) -> DomainResult<User> {
        self.repos
            .users
            .get(id)
            .await?
            .ok_or_else(|| DomainError::NotFound(format!("User {} not found", id)))
    }

    pub(super) async fn require_place(&self, id: &str) -> DomainResult<Place> {
        self.repos
            .places
            .get(id)
            .await?
            .ok_or_else(|| DomainError::NotFound(format!("Place {} not found", id)))
    }

    pub(super) async fn require_amenity(&self, id: &str) -> DomainResult<Amenity> {
        self.repos
            .amenities
            .get(id)
            .await?
            .ok_or_else(|| DomainError::NotFound(format!("Amenity {} not found", id)))
    }

    pub(super) async fn require_review(&self, id: &str) -> DomainResult<Review> {
        self.repos
            .reviews
            .get(id)
            .await?
            .ok_or_else(|| DomainError::NotFound(format!("Review {} not found", id)))
    }

    /// Like `require_user`, but a missing reference in a request body is a
    /// validation failure rather than a missing resource
    pub(super) async fn referenced_user(&self, id: &str) -> DomainResult<User> {
        self.repos
            .users
            .get(id)
            .await?
            .ok_or_else(|| DomainError::Validation(format!("User {} does not exist", id)))
    }

    pub(super) async fn referenced_place(&self, id: &str) -> DomainResult<Place> {
        self.repos
            .places
            .get(id)
            .await?
            .ok_or_else(|| DomainError::Validation(format!("Place {} does not exist", id)))
    }

    /// Every id must name an existing amenity
    pub(super) async fn check_amenities(&self, ids: &[String]) -> DomainResult<()> {
        for id in ids {
            if self.repos.amenities.get(id).await?.is_none() {
                return Err(DomainError::Validation(format!(
                    "Amenity {} does not exist",
                    id
                )));
            }
        }
        Ok(())
    }
}
