use async_trait::async_trait;

use crate::errors::CoreError;
use crate::models::trade::{CloseTrade, NewTrade, Trade, TradeUpdate};
use crate::models::user::{Identity, User};

/// Backend store holding trades.
///
/// The ledger never filters through this trait: `list_trades` returns the
/// user's whole collection and all filtering happens in memory.
#[cfg_attr(target_arch = "wasm32", async_trait(?Send))]
#[cfg_attr(not(target_arch = "wasm32"), async_trait)]
pub trait TradeStore: Send + Sync {
    /// Human-readable name of this store (for logs/errors).
    fn name(&self) -> &str;

    /// Every trade owned by `user_id`, in store order.
    async fn list_trades(&self, user_id: &str) -> Result<Vec<Trade>, CoreError>;

    /// A single trade, or `CoreError::TradeNotFound`.
    async fn get_trade(&self, trade_id: &str) -> Result<Trade, CoreError>;

    /// Persist a new trade. The store assigns the id.
    async fn create_trade(&self, trade: &NewTrade) -> Result<Trade, CoreError>;

    /// Overwrite the editable entry fields of a trade.
    async fn update_trade(&self, trade_id: &str, update: &TradeUpdate) -> Result<Trade, CoreError>;

    /// Mark a trade completed with its outcome, profit/loss and remarks.
    async fn close_trade(&self, trade_id: &str, close: &CloseTrade) -> Result<Trade, CoreError>;

    /// Remove a trade permanently.
    async fn delete_trade(&self, trade_id: &str) -> Result<(), CoreError>;
}

/// Backend store holding user records.
#[cfg_attr(target_arch = "wasm32", async_trait(?Send))]
#[cfg_attr(not(target_arch = "wasm32"), async_trait)]
pub trait UserStore: Send + Sync {
    fn name(&self) -> &str;

    /// Create the user, or return the existing record for the same id.
    async fn create_user(&self, user: &User) -> Result<User, CoreError>;

    async fn list_users(&self) -> Result<Vec<User>, CoreError>;

    async fn get_user(&self, user_id: &str) -> Result<User, CoreError>;

    async fn delete_user(&self, user_id: &str) -> Result<(), CoreError>;
}

/// External sign-in (e.g. an OAuth popup run by the host application).
#[cfg_attr(target_arch = "wasm32", async_trait(?Send))]
#[cfg_attr(not(target_arch = "wasm32"), async_trait)]
pub trait IdentityProvider: Send + Sync {
    fn name(&self) -> &str;

    async fn sign_in(&self) -> Result<Identity, CoreError>;
}

/// Identity provider for hosts that already ran the sign-in flow themselves.
pub struct StaticIdentityProvider {
    identity: Identity,
}

impl StaticIdentityProvider {
    pub fn new(identity: Identity) -> Self {
        Self { identity }
    }
}

#[cfg_attr(target_arch = "wasm32", async_trait(?Send))]
#[cfg_attr(not(target_arch = "wasm32"), async_trait)]
impl IdentityProvider for StaticIdentityProvider {
    fn name(&self) -> &str {
        "Static"
    }

    async fn sign_in(&self) -> Result<Identity, CoreError> {
        Ok(self.identity.clone())
    }
}
