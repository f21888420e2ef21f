use crate::errors::CoreError;
use crate::models::session::Session;
use crate::models::user::User;
use crate::stores::traits::{IdentityProvider, UserStore};

/// Sign-in and user administration.
///
/// Sign-in asks the identity provider who the person is, then creates (or
/// re-identifies) the matching user record. The store is expected to be
/// idempotent on the subject id.
pub struct UserService;

impl UserService {
    pub fn new() -> Self {
        Self
    }

    /// Run the identity flow and return a session for the resulting user.
    pub async fn sign_in(
        &self,
        identity_provider: &dyn IdentityProvider,
        store: &dyn UserStore,
    ) -> Result<Session, CoreError> {
        let identity = identity_provider.sign_in().await.inspect_err(|e| {
            log::warn!("{}: sign-in failed: {e}", identity_provider.name());
        })?;
        if identity.subject_id.trim().is_empty() {
            return Err(CoreError::ValidationError(format!(
                "{} returned an identity without a subject id",
                identity_provider.name()
            )));
        }

        let user = store.create_user(&User::from(identity)).await?;
        log::info!("Signed in user {} via {}", user.id, identity_provider.name());
        Ok(Session::new(user))
    }

    pub async fn list_users(&self, store: &dyn UserStore) -> Result<Vec<User>, CoreError> {
        store.list_users().await
    }

    pub async fn get_user(&self, store: &dyn UserStore, user_id: &str) -> Result<User, CoreError> {
        store.get_user(user_id).await
    }

    /// Administrative removal of a user record. Trades are left to the store.
    pub async fn delete_user(&self, store: &dyn UserStore, user_id: &str) -> Result<(), CoreError> {
        store.delete_user(user_id).await?;
        log::info!("Deleted user {user_id}");
        Ok(())
    }
}

impl Default for UserService {
    fn default() -> Self {
        Self::new()
    }
}
