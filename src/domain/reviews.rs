use tracing::info;

use crate::db::{Repository, ReviewRepository};
use crate::models::{Review, ReviewInput, ReviewUpdate};

use super::facade::HbnbFacade;
use super::validation;
use super::{Actor, DomainError, DomainResult};

impl HbnbFacade {
    /// One review per (user, place), never on a place the author owns
    #[tracing::instrument(skip(self, actor, input), fields(actor_id = %actor.user_id, place_id = %input.place_id))]
    pub async fn create_review(&self, actor: &Actor, input: ReviewInput) -> DomainResult<Review> {
        let author_id = input
            .user_id
            .clone()
            .unwrap_or_else(|| actor.user_id.clone());
        if !actor.can_act_for(&author_id) {
            return Err(DomainError::Forbidden(
                "You cannot write a review for another user".to_string(),
            ));
        }

        let text = validation::review_text(&input.text)?;
        let rating = validation::rating(input.rating)?;

        let author = self.referenced_user(&author_id).await?;
        let place = self.referenced_place(&input.place_id).await?;

        if place.owner_id == author.id {
            return Err(DomainError::Validation(
                "You cannot review your own place".to_string(),
            ));
        }
        if self
            .repos
            .reviews
            .get_by_user_and_place(&author.id, &place.id)
            .await?
            .is_some()
        {
            return Err(DomainError::Conflict(
                "You have already reviewed this place".to_string(),
            ));
        }

        let now = Self::now();
        let review = Review {
            id: Self::new_id(),
            text,
            rating,
            user_id: author.id,
            place_id: place.id,
            created_at: now,
            updated_at: now,
        };
        self.repos.reviews.add(&review).await?;
        info!(review_id = %review.id, rating = review.rating, "Review created");

        Ok(review)
    }

    pub async fn get_review(&self, id: &str) -> DomainResult<Review> {
        self.require_review(id).await
    }

    pub async fn list_reviews(&self) -> DomainResult<Vec<Review>> {
        Ok(self.repos.reviews.get_all().await?)
    }

    #[tracing::instrument(skip(self, actor, update), fields(actor_id = %actor.user_id))]
    pub async fn update_review(
        &self,
        actor: &Actor,
        id: &str,
        update: ReviewUpdate,
    ) -> DomainResult<Review> {
        let mut review = self.require_review(id).await?;
        if !actor.can_act_for(&review.user_id) {
            return Err(DomainError::Forbidden(
                "You can only modify your own reviews".to_string(),
            ));
        }

        if let Some(text) = update.text.as_deref() {
            review.text = validation::review_text(text)?;
        }
        if let Some(rating) = update.rating {
            review.rating = validation::rating(rating)?;
        }

        review.updated_at = Self::now();
        self.repos.reviews.update(&review).await?;
        info!(review_id = %review.id, "Review updated");

        Ok(review)
    }

    #[tracing::instrument(skip(self, actor), fields(actor_id = %actor.user_id))]
    pub async fn delete_review(&self, actor: &Actor, id: &str) -> DomainResult<()> {
        let review = self.require_review(id).await?;
        if !actor.can_act_for(&review.user_id) {
            return Err(DomainError::Forbidden(
                "You can only delete your own reviews".to_string(),
            ));
        }

        self.repos.reviews.delete(&review.id).await?;
        info!(review_id = %review.id, "Review deleted");
        Ok(())
    }
}
