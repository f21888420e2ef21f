use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// What the identity provider hands back after a successful sign-in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
    /// Provider subject id — becomes the user id
    pub subject_id: String,
    pub display_name: String,
    pub email: String,
    pub photo_url: String,
}

impl Identity {
    pub fn new(
        subject_id: impl Into<String>,
        display_name: impl Into<String>,
        email: impl Into<String>,
        photo_url: impl Into<String>,
    ) -> Self {
        Self {
            subject_id: subject_id.into(),
            display_name: display_name.into(),
            email: email.into(),
            photo_url: photo_url.into(),
        }
    }
}

/// A user record in the backend store, keyed by the provider subject id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    #[serde(rename = "_id")]
    pub id: String,

    #[serde(default)]
    pub name: String,

    #[serde(default)]
    pub email: String,

    /// Photo URL
    #[serde(default)]
    pub photo: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
}

impl From<Identity> for User {
    fn from(identity: Identity) -> Self {
        Self {
            id: identity.subject_id,
            name: identity.display_name,
            email: identity.email,
            photo: identity.photo_url,
            created_at: None,
        }
    }
}
