//! Profile entity and its create/update payloads.

use super::{check_max_len, double_option, not_null, Timestamps};
use crate::error::AppError;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

pub const USERNAME_MAX_LEN: usize = 50;
pub const BIO_MAX_LEN: usize = 500;
pub const AVATAR_URL_MAX_LEN: usize = 2048;
pub const USER_ID_MAX_LEN: usize = 100;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, sqlx::FromRow, ToSchema)]
pub struct Profile {
    pub id: i64,
    pub username: String,
    pub bio: Option<String>,
    pub avatar_url: Option<String>,
    /// `YYYY-MM-DD`.
    pub birthdate: Option<String>,
    pub user_id: Option<String>,
    #[serde(flatten)]
    #[sqlx(flatten)]
    pub timestamps: Timestamps,
}

/// A validated profile that has not been stored yet; the store assigns `id`.
#[derive(Clone, Debug, PartialEq)]
pub struct NewProfile {
    pub username: String,
    pub bio: Option<String>,
    pub avatar_url: Option<String>,
    pub birthdate: Option<String>,
    pub user_id: Option<String>,
    pub timestamps: Timestamps,
}

impl NewProfile {
    pub fn into_profile(self, id: i64) -> Profile {
        Profile {
            id,
            username: self.username,
            bio: self.bio,
            avatar_url: self.avatar_url,
            birthdate: self.birthdate,
            user_id: self.user_id,
            timestamps: self.timestamps,
        }
    }
}

#[derive(Clone, Debug, Default, Deserialize, ToSchema)]
pub struct ProfileCreate {
    pub username: String,
    #[serde(default)]
    pub bio: Option<String>,
    #[serde(default)]
    pub avatar_url: Option<String>,
    #[serde(default)]
    pub birthdate: Option<String>,
    #[serde(default)]
    pub user_id: Option<String>,
}

impl ProfileCreate {
    pub fn validate(&self) -> Result<(), AppError> {
        check_max_len("username", &self.username, USERNAME_MAX_LEN)?;
        check_optional_lengths(self.bio.as_deref(), self.avatar_url.as_deref(), self.user_id.as_deref())
    }
}

/// Partial update. Each field distinguishes omitted (`None`) from explicit `null` (`Some(None)`).
#[derive(Clone, Debug, Default, Deserialize, ToSchema)]
pub struct ProfileUpdate {
    #[serde(default, deserialize_with = "double_option")]
    #[schema(value_type = Option<String>)]
    pub username: Option<Option<String>>,
    #[serde(default, deserialize_with = "double_option")]
    #[schema(value_type = Option<String>)]
    pub bio: Option<Option<String>>,
    #[serde(default, deserialize_with = "double_option")]
    #[schema(value_type = Option<String>)]
    pub avatar_url: Option<Option<String>>,
    #[serde(default, deserialize_with = "double_option")]
    #[schema(value_type = Option<String>)]
    pub birthdate: Option<Option<String>>,
    #[serde(default, deserialize_with = "double_option")]
    #[schema(value_type = Option<String>)]
    pub user_id: Option<Option<String>>,
}

impl ProfileUpdate {
    pub fn validate(&self) -> Result<(), AppError> {
        if let Some(username) = not_null("username", &self.username)? {
            check_max_len("username", username, USERNAME_MAX_LEN)?;
        }
        check_optional_lengths(
            self.bio.as_ref().and_then(Option::as_deref),
            self.avatar_url.as_ref().and_then(Option::as_deref),
            self.user_id.as_ref().and_then(Option::as_deref),
        )
    }
}

fn check_optional_lengths(
    bio: Option<&str>,
    avatar_url: Option<&str>,
    user_id: Option<&str>,
) -> Result<(), AppError> {
    if let Some(bio) = bio {
        check_max_len("bio", bio, BIO_MAX_LEN)?;
    }
    if let Some(url) = avatar_url {
        check_max_len("avatar_url", url, AVATAR_URL_MAX_LEN)?;
    }
    if let Some(user_id) = user_id {
        check_max_len("user_id", user_id, USER_ID_MAX_LEN)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn update_distinguishes_omitted_from_null() {
        let update: ProfileUpdate =
            serde_json::from_str(r#"{"bio": null, "avatar_url": "https://a.example/x.png"}"#).unwrap();
        assert_eq!(update.username, None);
        assert_eq!(update.bio, Some(None));
        assert_eq!(update.avatar_url, Some(Some("https://a.example/x.png".into())));
        assert_eq!(update.birthdate, None);
    }

    #[test]
    fn update_rejects_null_username() {
        let update: ProfileUpdate = serde_json::from_str(r#"{"username": null}"#).unwrap();
        assert!(matches!(update.validate(), Err(AppError::Validation(_))));
    }

    #[test]
    fn create_enforces_length_bounds() {
        let ok = ProfileCreate {
            username: "jane".into(),
            bio: Some("b".repeat(BIO_MAX_LEN)),
            ..Default::default()
        };
        assert!(ok.validate().is_ok());

        let long_bio = ProfileCreate {
            bio: Some("b".repeat(BIO_MAX_LEN + 1)),
            ..ok.clone()
        };
        assert!(matches!(long_bio.validate(), Err(AppError::Validation(m)) if m.contains("bio")));

        let long_name = ProfileCreate {
            username: "u".repeat(USERNAME_MAX_LEN + 1),
            ..ok
        };
        assert!(long_name.validate().is_err());
    }

    #[test]
    fn serializes_timestamps_inline() {
        let profile = NewProfile {
            username: "jane".into(),
            bio: None,
            avatar_url: None,
            birthdate: None,
            user_id: None,
            timestamps: Timestamps::now(),
        }
        .into_profile(1);
        let json = serde_json::to_value(&profile).unwrap();
        assert_eq!(json["id"], 1);
        assert!(json.get("created_at").is_some());
        assert!(json.get("updated_at").is_some());
        assert!(json.get("timestamps").is_none());
    }
}
