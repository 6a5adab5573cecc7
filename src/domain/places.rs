use std::collections::HashMap;
use tracing::{info, warn};

use crate::db::{Repository, ReviewRepository};
use crate::models::{
    OwnerSummary, Place, PlaceDetails, PlaceInput, PlaceSummary, PlaceUpdate, RatingStats, Review,
};

use super::facade::HbnbFacade;
use super::validation;
use super::{Actor, DomainError, DomainResult};

impl HbnbFacade {
    /// The owner defaults to the caller; only admins may list for someone else
    #[tracing::instrument(skip(self, actor, input), fields(actor_id = %actor.user_id, title = %input.title))]
    pub async fn create_place(&self, actor: &Actor, input: PlaceInput) -> DomainResult<Place> {
        let owner_id = input
            .owner_id
            .clone()
            .unwrap_or_else(|| actor.user_id.clone());
        if !actor.can_act_for(&owner_id) {
            return Err(DomainError::Forbidden(
                "You cannot create a place for another user".to_string(),
            ));
        }

        let title = validation::title(&input.title)?;
        let description = validation::description(input.description.as_deref());
        let price = validation::price(input.price)?;
        let latitude = validation::latitude(input.latitude)?;
        let longitude = validation::longitude(input.longitude)?;

        let owner = self.referenced_user(&owner_id).await?;
        let amenity_ids = validation::dedup_ids(&input.amenities);
        self.check_amenities(&amenity_ids).await?;

        let now = Self::now();
        let place = Place {
            id: Self::new_id(),
            title,
            description,
            price,
            latitude,
            longitude,
            owner_id: owner.id,
            amenity_ids,
            created_at: now,
            updated_at: now,
        };
        self.repos.places.add(&place).await?;
        info!(place_id = %place.id, owner_id = %place.owner_id, "Place created");

        Ok(place)
    }

    pub async fn get_place(&self, id: &str) -> DomainResult<Place> {
        self.require_place(id).await
    }

    /// Place with owner, amenity objects, reviews and rating resolved
    #[tracing::instrument(skip(self))]
    pub async fn get_place_details(&self, id: &str) -> DomainResult<PlaceDetails> {
        let place = self.require_place(id).await?;
        let owner = self.repos.users.get(&place.owner_id).await?.ok_or_else(|| {
            DomainError::Internal(format!(
                "Owner {} of place {} is missing",
                place.owner_id, place.id
            ))
        })?;

        let mut amenities = Vec::with_capacity(place.amenity_ids.len());
        for amenity_id in &place.amenity_ids {
            match self.repos.amenities.get(amenity_id).await? {
                Some(amenity) => amenities.push(amenity),
                None => warn!(place_id = %place.id, amenity_id = %amenity_id, "Dangling amenity link"),
            }
        }

        let reviews = self.repos.reviews.list_by_place(&place.id).await?;
        let rating = RatingStats::from_reviews(&reviews);

        Ok(PlaceDetails {
            id: place.id,
            title: place.title,
            description: place.description,
            price: place.price,
            latitude: place.latitude,
            longitude: place.longitude,
            owner: OwnerSummary::from(&owner),
            amenities,
            reviews,
            rating,
            created_at: place.created_at,
            updated_at: place.updated_at,
        })
    }

    /// Summaries of every place with rating stats
    pub async fn list_places(&self) -> DomainResult<Vec<PlaceSummary>> {
        let places = self.repos.places.get_all().await?;

        let mut by_place: HashMap<String, Vec<Review>> = HashMap::new();
        for review in self.repos.reviews.get_all().await? {
            by_place.entry(review.place_id.clone()).or_default().push(review);
        }

        Ok(places
            .iter()
            .map(|place| {
                let reviews = by_place.get(&place.id).map(Vec::as_slice).unwrap_or(&[]);
                PlaceSummary::new(place, reviews)
            })
            .collect())
    }

    /// Owner or admin; only admins may hand a place to someone else
    #[tracing::instrument(skip(self, actor, update), fields(actor_id = %actor.user_id))]
    pub async fn update_place(
        &self,
        actor: &Actor,
        id: &str,
        update: PlaceUpdate,
    ) -> DomainResult<Place> {
        let mut place = self.require_place(id).await?;
        if !actor.can_act_for(&place.owner_id) {
            return Err(DomainError::Forbidden(
                "You can only modify your own places".to_string(),
            ));
        }

        if let Some(title) = update.title.as_deref() {
            place.title = validation::title(title)?;
        }
        if update.description.is_some() {
            place.description = validation::description(update.description.as_deref());
        }
        if let Some(price) = update.price {
            place.price = validation::price(price)?;
        }
        if let Some(latitude) = update.latitude {
            place.latitude = validation::latitude(latitude)?;
        }
        if let Some(longitude) = update.longitude {
            place.longitude = validation::longitude(longitude)?;
        }
        if let Some(owner_id) = update.owner_id.as_deref() {
            if owner_id != place.owner_id {
                actor.require_admin()?;
                let owner = self.referenced_user(owner_id).await?;
                if self
                    .repos
                    .reviews
                    .get_by_user_and_place(&owner.id, &place.id)
                    .await?
                    .is_some()
                {
                    return Err(DomainError::Validation(
                        "New owner has already reviewed this place".to_string(),
                    ));
                }
                place.owner_id = owner.id;
            }
        }
        if let Some(amenities) = update.amenities.as_deref() {
            let amenity_ids = validation::dedup_ids(amenities);
            self.check_amenities(&amenity_ids).await?;
            place.amenity_ids = amenity_ids;
        }

        place.updated_at = Self::now();
        self.repos.places.update(&place).await?;
        info!(place_id = %place.id, "Place updated");

        Ok(place)
    }

    #[tracing::instrument(skip(self, actor), fields(actor_id = %actor.user_id))]
    pub async fn delete_place(&self, actor: &Actor, id: &str) -> DomainResult<()> {
        let place = self.require_place(id).await?;
        if !actor.can_act_for(&place.owner_id) {
            return Err(DomainError::Forbidden(
                "You can only delete your own places".to_string(),
            ));
        }

        self.remove_place(&place.id).await?;
        info!(place_id = %place.id, "Place deleted");
        Ok(())
    }

    pub async fn list_place_reviews(&self, place_id: &str) -> DomainResult<Vec<Review>> {
        let place = self.require_place(place_id).await?;
        Ok(self.repos.reviews.list_by_place(&place.id).await?)
    }

    /// Delete a place and its reviews
    pub(super) async fn remove_place(&self, place_id: &str) -> DomainResult<()> {
        for review in self.repos.reviews.list_by_place(place_id).await? {
            self.repos.reviews.delete(&review.id).await?;
        }
        self.repos.places.delete(place_id).await?;
        Ok(())
    }
}
