use tracing::{info, warn};

use crate::auth::verify_password;
use crate::db::{PlaceRepository, Repository, ReviewRepository, UserRepository};
use crate::models::{NewUser, User, UserUpdate};

use super::facade::HbnbFacade;
use super::validation;
use super::{Actor, DomainError, DomainResult};

/// Credentials used to bootstrap the first admin account
#[derive(Debug, Clone, PartialEq)]
pub struct AdminSeed {
    pub email: String,
    pub password: String,
    pub first_name: String,
    pub last_name: String,
}

impl AdminSeed {
    pub fn new(email: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            password: password.into(),
            first_name: "Admin".to_string(),
            last_name: "User".to_string(),
        }
    }
}

impl HbnbFacade {
    /// Public sign-up; never grants admin
    #[tracing::instrument(skip(self, input), fields(email = %input.email))]
    pub async fn register_user(&self, input: NewUser) -> DomainResult<User> {
        let input = NewUser {
            is_admin: false,
            ..input
        };
        self.insert_user(input).await
    }

    #[tracing::instrument(skip(self, actor, input), fields(actor_id = %actor.user_id, email = %input.email))]
    pub async fn create_user(&self, actor: &Actor, input: NewUser) -> DomainResult<User> {
        actor.require_admin()?;
        self.insert_user(input).await
    }

    async fn insert_user(&self, input: NewUser) -> DomainResult<User> {
        let first_name = validation::person_name("first_name", &input.first_name)?;
        let last_name = validation::person_name("last_name", &input.last_name)?;
        let email = validation::email(&input.email)?;
        validation::password(&input.password)?;

        if self.repos.users.get_by_email(&email).await?.is_some() {
            return Err(DomainError::Conflict("Email already registered".to_string()));
        }

        let password_hash = self.hash_password(input.password).await?;
        let now = Self::now();
        let user = User {
            id: Self::new_id(),
            first_name,
            last_name,
            email,
            password_hash,
            is_admin: input.is_admin,
            created_at: now,
            updated_at: now,
        };

        self.repos.users.add(&user).await?;
        info!(user_id = %user.id, is_admin = user.is_admin, "User created");

        Ok(user)
    }

    pub async fn get_user(&self, id: &str) -> DomainResult<User> {
        self.require_user(id).await
    }

    pub async fn get_user_by_email(&self, email: &str) -> DomainResult<Option<User>> {
        Ok(self
            .repos
            .users
            .get_by_email(&email.trim().to_lowercase())
            .await?)
    }

    pub async fn list_users(&self) -> DomainResult<Vec<User>> {
        Ok(self.repos.users.get_all().await?)
    }

    /// Admins may change anything; users may only rename themselves
    #[tracing::instrument(skip(self, actor, update), fields(actor_id = %actor.user_id))]
    pub async fn update_user(
        &self,
        actor: &Actor,
        id: &str,
        update: UserUpdate,
    ) -> DomainResult<User> {
        if !actor.can_act_for(id) {
            return Err(DomainError::Forbidden(
                "You can only modify your own account".to_string(),
            ));
        }
        if !actor.is_admin && update.touches_credentials() {
            return Err(DomainError::Validation(
                "You cannot modify email, password or admin status".to_string(),
            ));
        }

        let mut user = self.require_user(id).await?;

        if let Some(first_name) = update.first_name.as_deref() {
            user.first_name = validation::person_name("first_name", first_name)?;
        }
        if let Some(last_name) = update.last_name.as_deref() {
            user.last_name = validation::person_name("last_name", last_name)?;
        }
        if let Some(email) = update.email.as_deref() {
            let email = validation::email(email)?;
            if let Some(existing) = self.repos.users.get_by_email(&email).await? {
                if existing.id != user.id {
                    return Err(DomainError::Conflict("Email already registered".to_string()));
                }
            }
            user.email = email;
        }
        if let Some(password) = update.password {
            validation::password(&password)?;
            user.password_hash = self.hash_password(password).await?;
        }
        if let Some(is_admin) = update.is_admin {
            user.is_admin = is_admin;
        }

        user.updated_at = Self::now();
        self.repos.users.update(&user).await?;
        info!(user_id = %user.id, "User updated");

        Ok(user)
    }

    /// Removes the user along with their places (and those places' reviews)
    /// and every review they wrote
    #[tracing::instrument(skip(self, actor), fields(actor_id = %actor.user_id))]
    pub async fn delete_user(&self, actor: &Actor, id: &str) -> DomainResult<()> {
        if !actor.can_act_for(id) {
            return Err(DomainError::Forbidden(
                "You can only delete your own account".to_string(),
            ));
        }
        let user = self.require_user(id).await?;

        for review in self.repos.reviews.list_by_user(&user.id).await? {
            self.repos.reviews.delete(&review.id).await?;
        }
        let places = self.repos.places.list_by_owner(&user.id).await?;
        let place_count = places.len();
        for place in places {
            self.remove_place(&place.id).await?;
        }
        self.repos.users.delete(&user.id).await?;

        info!(user_id = %user.id, places = place_count, "User deleted");
        Ok(())
    }

    /// Unknown email and wrong password are indistinguishable to the caller
    #[tracing::instrument(skip(self, password))]
    pub async fn authenticate(&self, email: &str, password: &str) -> DomainResult<User> {
        let invalid = || DomainError::Unauthorized("Invalid email or password".to_string());

        let user = self.get_user_by_email(email).await?.ok_or_else(invalid)?;
        if !self.check_password(password, &user.password_hash).await? {
            return Err(invalid());
        }

        info!(user_id = %user.id, "User authenticated");
        Ok(user)
    }

    /// Create the seed admin unless that email is already registered.
    /// Returns the account and whether it was created. An existing account
    /// is never promoted, so callers must check `is_admin` on the result.
    #[tracing::instrument(skip(self, seed), fields(email = %seed.email))]
    pub async fn ensure_admin(&self, seed: &AdminSeed) -> DomainResult<(User, bool)> {
        if let Some(existing) = self.get_user_by_email(&seed.email).await? {
            if existing.is_admin {
                info!(user_id = %existing.id, "Admin seed already present");
            } else {
                warn!(user_id = %existing.id, "Admin seed email belongs to a non-admin account");
            }
            return Ok((existing, false));
        }

        let user = self
            .insert_user(NewUser {
                first_name: seed.first_name.clone(),
                last_name: seed.last_name.clone(),
                email: seed.email.clone(),
                password: seed.password.clone(),
                is_admin: true,
            })
            .await?;
        Ok((user, true))
    }

    async fn hash_password(&self, password: String) -> DomainResult<String> {
        let hasher = self.hasher;
        tokio::task::spawn_blocking(move || hasher.hash(&password))
            .await
            .map_err(|e| DomainError::Internal(format!("Password hashing task failed: {}", e)))?
            .map_err(DomainError::from)
    }

    async fn check_password(&self, password: &str, hash: &str) -> DomainResult<bool> {
        let password = password.to_string();
        let hash = hash.to_string();
        tokio::task::spawn_blocking(move || verify_password(&password, &hash))
            .await
            .map_err(|e| DomainError::Internal(format!("Password check task failed: {}", e)))
    }
}
