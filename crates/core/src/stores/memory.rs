use async_trait::async_trait;
use chrono::Utc;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};
use uuid::Uuid;

use crate::errors::CoreError;
use crate::models::trade::{CloseTrade, NewTrade, Trade, TradeUpdate};
use crate::models::user::User;
use super::traits::{TradeStore, UserStore};

const STORE_NAME: &str = "InMemory";

/// Process-local store for trades and users.
///
/// Used for tests, demos, and hosts running without a backend. Keeps
/// insertion order so `list_trades` behaves like the REST listing.
pub struct InMemoryStore {
    trades: RwLock<Vec<Trade>>,
    users: RwLock<Vec<User>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self {
            trades: RwLock::new(Vec::new()),
            users: RwLock::new(Vec::new()),
        }
    }

    /// Seed the store with existing trades (ids are kept as given).
    pub fn with_trades(trades: Vec<Trade>) -> Self {
        Self {
            trades: RwLock::new(trades),
            users: RwLock::new(Vec::new()),
        }
    }

    /// Number of trades across all users.
    pub fn trade_count(&self) -> usize {
        self.trades.read().map(|t| t.len()).unwrap_or(0)
    }

    fn read_trades(&self) -> Result<RwLockReadGuard<'_, Vec<Trade>>, CoreError> {
        self.trades.read().map_err(|_| poisoned())
    }

    fn write_trades(&self) -> Result<RwLockWriteGuard<'_, Vec<Trade>>, CoreError> {
        self.trades.write().map_err(|_| poisoned())
    }

    fn read_users(&self) -> Result<RwLockReadGuard<'_, Vec<User>>, CoreError> {
        self.users.read().map_err(|_| poisoned())
    }

    fn write_users(&self) -> Result<RwLockWriteGuard<'_, Vec<User>>, CoreError> {
        self.users.write().map_err(|_| poisoned())
    }
}

impl Default for InMemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

fn poisoned() -> CoreError {
    CoreError::Store {
        store: STORE_NAME.into(),
        message: "store lock poisoned".into(),
    }
}

#[cfg_attr(target_arch = "wasm32", async_trait(?Send))]
#[cfg_attr(not(target_arch = "wasm32"), async_trait)]
impl TradeStore for InMemoryStore {
    fn name(&self) -> &str {
        STORE_NAME
    }

    async fn list_trades(&self, user_id: &str) -> Result<Vec<Trade>, CoreError> {
        Ok(self
            .read_trades()?
            .iter()
            .filter(|t| t.user_id == user_id)
            .cloned()
            .collect())
    }

    async fn get_trade(&self, trade_id: &str) -> Result<Trade, CoreError> {
        self.read_trades()?
            .iter()
            .find(|t| t.id == trade_id)
            .cloned()
            .ok_or_else(|| CoreError::TradeNotFound(trade_id.to_string()))
    }

    async fn create_trade(&self, trade: &NewTrade) -> Result<Trade, CoreError> {
        let stored = Trade::from_new(Uuid::new_v4().to_string(), trade.clone(), Utc::now());
        self.write_trades()?.push(stored.clone());
        Ok(stored)
    }

    async fn update_trade(&self, trade_id: &str, update: &TradeUpdate) -> Result<Trade, CoreError> {
        let mut trades = self.write_trades()?;
        let trade = trades
            .iter_mut()
            .find(|t| t.id == trade_id)
            .ok_or_else(|| CoreError::TradeNotFound(trade_id.to_string()))?;
        trade.apply_update(update);
        Ok(trade.clone())
    }

    async fn close_trade(&self, trade_id: &str, close: &CloseTrade) -> Result<Trade, CoreError> {
        let mut trades = self.write_trades()?;
        let trade = trades
            .iter_mut()
            .find(|t| t.id == trade_id)
            .ok_or_else(|| CoreError::TradeNotFound(trade_id.to_string()))?;
        trade.apply_close(close);
        Ok(trade.clone())
    }

    async fn delete_trade(&self, trade_id: &str) -> Result<(), CoreError> {
        let mut trades = self.write_trades()?;
        let idx = trades
            .iter()
            .position(|t| t.id == trade_id)
            .ok_or_else(|| CoreError::TradeNotFound(trade_id.to_string()))?;
        trades.remove(idx);
        Ok(())
    }
}

#[cfg_attr(target_arch = "wasm32", async_trait(?Send))]
#[cfg_attr(not(target_arch = "wasm32"), async_trait)]
impl UserStore for InMemoryStore {
    fn name(&self) -> &str {
        STORE_NAME
    }

    async fn create_user(&self, user: &User) -> Result<User, CoreError> {
        let mut users = self.write_users()?;
        if let Some(existing) = users.iter().find(|u| u.id == user.id) {
            return Ok(existing.clone());
        }
        let mut stored = user.clone();
        stored.created_at.get_or_insert_with(Utc::now);
        users.push(stored.clone());
        Ok(stored)
    }

    async fn list_users(&self) -> Result<Vec<User>, CoreError> {
        Ok(self.read_users()?.clone())
    }

    async fn get_user(&self, user_id: &str) -> Result<User, CoreError> {
        self.read_users()?
            .iter()
            .find(|u| u.id == user_id)
            .cloned()
            .ok_or_else(|| CoreError::UserNotFound(user_id.to_string()))
    }

    async fn delete_user(&self, user_id: &str) -> Result<(), CoreError> {
        let mut users = self.write_users()?;
        let idx = users
            .iter()
            .position(|u| u.id == user_id)
            .ok_or_else(|| CoreError::UserNotFound(user_id.to_string()))?;
        users.remove(idx);
        Ok(())
    }
}
