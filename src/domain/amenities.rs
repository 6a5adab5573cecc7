use tracing::info;

use crate::db::{AmenityRepository, PlaceRepository, Repository};
use crate::models::{Amenity, AmenityInput};

use super::facade::HbnbFacade;
use super::validation;
use super::{Actor, DomainError, DomainResult};

impl HbnbFacade {
    #[tracing::instrument(skip(self, actor, input), fields(actor_id = %actor.user_id))]
    pub async fn create_amenity(&self, actor: &Actor, input: AmenityInput) -> DomainResult<Amenity> {
        actor.require_admin()?;
        let name = validation::amenity_name(&input.name)?;
        self.ensure_amenity_name_free(&name, None).await?;

        let now = Self::now();
        let amenity = Amenity {
            id: Self::new_id(),
            name,
            created_at: now,
            updated_at: now,
        };
        self.repos.amenities.add(&amenity).await?;
        info!(amenity_id = %amenity.id, name = %amenity.name, "Amenity created");

        Ok(amenity)
    }

    pub async fn get_amenity(&self, id: &str) -> DomainResult<Amenity> {
        self.require_amenity(id).await
    }

    pub async fn list_amenities(&self) -> DomainResult<Vec<Amenity>> {
        Ok(self.repos.amenities.get_all().await?)
    }

    #[tracing::instrument(skip(self, actor, input), fields(actor_id = %actor.user_id))]
    pub async fn update_amenity(
        &self,
        actor: &Actor,
        id: &str,
        input: AmenityInput,
    ) -> DomainResult<Amenity> {
        actor.require_admin()?;
        let mut amenity = self.require_amenity(id).await?;
        let name = validation::amenity_name(&input.name)?;
        self.ensure_amenity_name_free(&name, Some(id)).await?;

        amenity.name = name;
        amenity.updated_at = Self::now();
        self.repos.amenities.update(&amenity).await?;
        info!(amenity_id = %amenity.id, "Amenity updated");

        Ok(amenity)
    }

    /// Deletes the amenity and detaches it from every place offering it
    #[tracing::instrument(skip(self, actor), fields(actor_id = %actor.user_id))]
    pub async fn delete_amenity(&self, actor: &Actor, id: &str) -> DomainResult<()> {
        actor.require_admin()?;
        let amenity = self.require_amenity(id).await?;

        let places = self.repos.places.list_by_amenity(&amenity.id).await?;
        let detached = places.len();
        for mut place in places {
            place.amenity_ids.retain(|a| a != &amenity.id);
            place.updated_at = Self::now();
            self.repos.places.update(&place).await?;
        }
        self.repos.amenities.delete(&amenity.id).await?;

        info!(amenity_id = %amenity.id, detached, "Amenity deleted");
        Ok(())
    }

    async fn ensure_amenity_name_free(&self, name: &str, current_id: Option<&str>) -> DomainResult<()> {
        match self.repos.amenities.get_by_name(name).await? {
            Some(existing) if Some(existing.id.as_str()) != current_id => Err(
                DomainError::Conflict(format!("Amenity '{}' already exists", name)),
            ),
            _ => Ok(()),
        }
    }
}
