use serde::{Deserialize, Serialize};

use super::user::User;

/// The signed-in user, handed explicitly to every view operation.
///
/// Serialises as `{"user": {...}}`, the envelope the backend returns when a
/// user is created, so a host can store the sign-in response verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    pub user: User,
}

impl Session {
    pub fn new(user: User) -> Self {
        Self { user }
    }

    /// Id used to key every trade query.
    pub fn user_id(&self) -> &str {
        &self.user.id
    }
}
