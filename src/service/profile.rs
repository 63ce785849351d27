//! Profile use cases: validate, check username uniqueness, persist.

use super::ProfileValidator;
use crate::error::{AppError, StoreError};
use crate::model::{not_null, NewProfile, Page, Profile, ProfileCreate, ProfileUpdate, Timestamps};
use crate::store::ProfileStore;
use std::sync::Arc;

const RESOURCE: &str = "Profile";

fn username_taken(username: &str) -> AppError {
    AppError::Conflict(format!("Username '{}' is already taken", username))
}

#[derive(Clone)]
pub struct ProfileService {
    store: Arc<dyn ProfileStore>,
}

impl ProfileService {
    pub fn new(store: Arc<dyn ProfileStore>) -> Self {
        ProfileService { store }
    }

    /// Validate (username, birthdate, avatar URL in that order), pre-check the username, then insert.
    /// A uniqueness violation raised by the insert itself is the same conflict as a failed pre-check.
    pub async fn create(&self, input: ProfileCreate) -> Result<Profile, AppError> {
        tracing::debug!(username = %input.username, "create profile");
        ProfileValidator::username(&input.username)?;
        ProfileValidator::birthdate(input.birthdate.as_deref())?;
        ProfileValidator::avatar_url(input.avatar_url.as_deref())?;

        if self.store.username_exists(&input.username, None).await? {
            tracing::warn!(username = %input.username, "username already taken");
            return Err(username_taken(&input.username));
        }

        let profile = NewProfile {
            username: input.username,
            bio: input.bio,
            avatar_url: input.avatar_url,
            birthdate: input.birthdate,
            user_id: input.user_id,
            timestamps: Timestamps::now(),
        };
        let username = profile.username.clone();
        match self.store.create(profile).await {
            Ok(created) => {
                tracing::info!(id = created.id, username = %created.username, "profile created");
                Ok(created)
            }
            Err(StoreError::UniqueViolation(constraint)) => {
                tracing::warn!(username = %username, constraint = %constraint, "username taken between check and insert");
                Err(username_taken(&username))
            }
            Err(e) => Err(e.into()),
        }
    }

    pub async fn get_by_id(&self, id: i64) -> Result<Profile, AppError> {
        self.store
            .get_by_id(id)
            .await?
            .ok_or_else(|| AppError::not_found(RESOURCE, id))
    }

    pub async fn get_by_username(&self, username: &str) -> Result<Profile, AppError> {
        self.store
            .get_by_username(username)
            .await?
            .ok_or_else(|| AppError::not_found(RESOURCE, username))
    }

    /// Non-empty `query`: case-insensitive username substring match, by username.
    /// Otherwise every profile, newest first.
    pub async fn search(&self, query: Option<&str>, page: Page) -> Result<Vec<Profile>, AppError> {
        let rows = match query.filter(|q| !q.is_empty()) {
            Some(q) => self.store.search_by_username(q, page).await?,
            None => self.store.list(page).await?,
        };
        Ok(rows)
    }

    /// Apply only the fields present in `patch`, re-validating each one that has a rule.
    pub async fn update(&self, id: i64, patch: ProfileUpdate) -> Result<Profile, AppError> {
        tracing::debug!(id, "update profile");
        let mut profile = self.get_by_id(id).await?;

        if let Some(username) = not_null("username", &patch.username)? {
            ProfileValidator::username(username)?;
            if self.store.username_exists(username, Some(id)).await? {
                tracing::warn!(id, username = %username, "username already taken");
                return Err(username_taken(username));
            }
        }
        if let Some(birthdate) = &patch.birthdate {
            ProfileValidator::birthdate(birthdate.as_deref())?;
        }
        if let Some(avatar_url) = &patch.avatar_url {
            ProfileValidator::avatar_url(avatar_url.as_deref())?;
        }

        if let Some(Some(username)) = patch.username {
            profile.username = username;
        }
        if let Some(bio) = patch.bio {
            profile.bio = bio;
        }
        if let Some(avatar_url) = patch.avatar_url {
            profile.avatar_url = avatar_url;
        }
        if let Some(birthdate) = patch.birthdate {
            profile.birthdate = birthdate;
        }
        if let Some(user_id) = patch.user_id {
            profile.user_id = user_id;
        }
        profile.timestamps.touch();

        match self.store.update(&profile).await {
            Ok(updated) => {
                tracing::info!(id, "profile updated");
                Ok(updated)
            }
            Err(StoreError::UniqueViolation(_)) => Err(username_taken(&profile.username)),
            Err(e) => Err(e.into()),
        }
    }

    pub async fn delete(&self, id: i64) -> Result<(), AppError> {
        let profile = self.get_by_id(id).await?;
        self.store.delete(&profile).await?;
        tracing::info!(id, "profile deleted");
        Ok(())
    }
}
