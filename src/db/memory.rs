use async_trait::async_trait;
use std::collections::HashMap;
use tokio::sync::RwLock;
use tracing::debug;

use crate::db::errors::{DatabaseError, Result};
use crate::db::repository::{
    AmenityRepository, Entity, PlaceRepository, Repository, ReviewRepository, UserRepository,
};
use crate::models::{Amenity, Place, Review, User};

/// Map-backed repository used when no database is configured (and in tests)
pub struct InMemoryRepository<T: Entity> {
    storage: RwLock<HashMap<String, T>>,
}

impl<T: Entity> InMemoryRepository<T> {
    pub fn new() -> Self {
        Self {
            storage: RwLock::new(HashMap::new()),
        }
    }

    /// All entities matching `predicate`, in creation order
    async fn filter<F>(&self, predicate: F) -> Vec<T>
    where
        F: Fn(&T) -> bool + Send,
    {
        let storage = self.storage.read().await;
        let mut matches: Vec<T> = storage.values().filter(|e| predicate(e)).cloned().collect();
        sort_by_creation(&mut matches);
        matches
    }

    async fn find_first<F>(&self, predicate: F) -> Option<T>
    where
        F: Fn(&T) -> bool + Send,
    {
        self.filter(predicate).await.into_iter().next()
    }
}

/// Reject `entity` if another stored entity already holds its natural key.
/// Must be called with the write lock held.
fn check_natural_key<T: Entity>(storage: &HashMap<String, T>, entity: &T) -> Result<()> {
    let Some(key) = entity.natural_key() else {
        return Ok(());
    };
    let taken = storage.values().any(|other| {
        other.id() != entity.id() && other.natural_key().as_deref() == Some(key.as_str())
    });
    if taken {
        return Err(DatabaseError::IntegrityError(format!(
            "{} with the same unique key already exists",
            T::KIND
        )));
    }
    Ok(())
}

impl<T: Entity> Default for InMemoryRepository<T> {
    fn default() -> Self {
        Self::new()
    }
}

fn sort_by_creation<T: Entity>(entities: &mut [T]) {
    entities.sort_by(|a, b| {
        a.created_at()
            .cmp(&b.created_at())
            .then_with(|| a.id().cmp(b.id()))
    });
}

#[async_trait]
impl<T: Entity> Repository<T> for InMemoryRepository<T> {
    async fn add(&self, entity: &T) -> Result<()> {
        let mut storage = self.storage.write().await;
        if storage.contains_key(entity.id()) {
            return Err(DatabaseError::IntegrityError(format!(
                "{} {} already exists",
                T::KIND,
                entity.id()
            )));
        }
        check_natural_key(&storage, entity)?;
        debug!(kind = T::KIND, id = entity.id(), "Storing entity in memory");
        storage.insert(entity.id().to_string(), entity.clone());
        Ok(())
    }

    async fn get(&self, id: &str) -> Result<Option<T>> {
        Ok(self.storage.read().await.get(id).cloned())
    }

    async fn get_all(&self) -> Result<Vec<T>> {
        Ok(self.filter(|_| true).await)
    }

    async fn update(&self, entity: &T) -> Result<()> {
        let mut storage = self.storage.write().await;
        if storage.contains_key(entity.id()) {
            check_natural_key(&storage, entity)?;
        }
        match storage.get_mut(entity.id()) {
            Some(slot) => {
                *slot = entity.clone();
                Ok(())
            }
            None => Err(DatabaseError::NotFound(format!(
                "{} {}",
                T::KIND,
                entity.id()
            ))),
        }
    }

    async fn delete(&self, id: &str) -> Result<bool> {
        Ok(self.storage.write().await.remove(id).is_some())
    }
}

#[async_trait]
impl UserRepository for InMemoryRepository<User> {
    async fn get_by_email(&self, email: &str) -> Result<Option<User>> {
        let email = email.to_lowercase();
        Ok(self.find_first(|u| u.email == email).await)
    }
}

#[async_trait]
impl AmenityRepository for InMemoryRepository<Amenity> {
    async fn get_by_name(&self, name: &str) -> Result<Option<Amenity>> {
        Ok(self.find_first(|a| a.name == name).await)
    }
}

#[async_trait]
impl PlaceRepository for InMemoryRepository<Place> {
    async fn list_by_owner(&self, owner_id: &str) -> Result<Vec<Place>> {
        Ok(self.filter(|p| p.owner_id == owner_id).await)
    }

    async fn list_by_amenity(&self, amenity_id: &str) -> Result<Vec<Place>> {
        Ok(self.filter(|p| p.has_amenity(amenity_id)).await)
    }
}

#[async_trait]
impl ReviewRepository for InMemoryRepository<Review> {
    async fn list_by_place(&self, place_id: &str) -> Result<Vec<Review>> {
        Ok(self.filter(|r| r.place_id == place_id).await)
    }

    async fn list_by_user(&self, user_id: &str) -> Result<Vec<Review>> {
        Ok(self.filter(|r| r.user_id == user_id).await)
    }

    async fn get_by_user_and_place(
        &self,
        user_id: &str,
        place_id: &str,
    ) -> Result<Option<Review>> {
        Ok(self
            .find_first(|r| r.user_id == user_id && r.place_id == place_id)
            .await)
    }
}
