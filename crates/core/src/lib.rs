pub mod errors;
pub mod models;
pub mod services;
pub mod storage;
pub mod stores;

use models::{
    analytics::{DashboardSummary, PnlReport, WinRatioStats},
    form::{CloseTradeForm, TradeForm, TradeUpdateForm},
    session::Session,
    settings::Settings,
    trade::{Trade, TradeStatus},
    user::User,
};
use services::{
    aggregator_service::AggregatorService, ledger_service::LedgerService,
    user_service::UserService,
};
use std::sync::Arc;
use stores::{
    memory::InMemoryStore,
    rest::RestBackend,
    traits::{IdentityProvider, TradeStore, UserStore},
};

use errors::CoreError;

/// Main entry point for the Trade Journal core library.
///
/// Holds the store handles, the services, and the trade collection of the
/// current view. Every view operation takes the caller's `&Session`; the
/// journal itself keeps no notion of "who is signed in".
///
/// Mutations make one store call and then re-fetch the whole collection, so
/// the cached view always mirrors the store rather than local edits.
#[must_use]
pub struct TradeJournal {
    trade_store: Arc<dyn TradeStore>,
    user_store: Arc<dyn UserStore>,
    ledger: LedgerService,
    aggregator: AggregatorService,
    user_service: UserService,
    trades: Vec<Trade>,
    /// User id the cached collection was loaded for.
    loaded_for: Option<String>,
    /// Set when a mutation succeeded but the follow-up re-fetch failed.
    stale: bool,
}

impl std::fmt::Debug for TradeJournal {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TradeJournal")
            .field("trade_store", &self.trade_store.name())
            .field("user_store", &self.user_store.name())
            .field("trades", &self.trades.len())
            .field("loaded_for", &self.loaded_for)
            .field("stale", &self.stale)
            .finish()
    }
}

impl TradeJournal {
    /// Build a journal over explicit store handles.
    pub fn new(trade_store: Arc<dyn TradeStore>, user_store: Arc<dyn UserStore>) -> Self {
        Self {
            trade_store,
            user_store,
            ledger: LedgerService::new(),
            aggregator: AggregatorService::new(),
            user_service: UserService::new(),
            trades: Vec::new(),
            loaded_for: None,
            stale: false,
        }
    }

    /// Build a journal over one backend serving both trades and users.
    pub fn from_backend<B>(backend: Arc<B>) -> Self
    where
        B: TradeStore + UserStore + 'static,
    {
        Self::new(backend.clone(), backend)
    }

    /// Journal talking to the REST backend described by `settings`.
    pub fn with_settings(settings: &Settings) -> Self {
        Self::from_backend(Arc::new(RestBackend::new(settings)))
    }

    /// Journal backed by a fresh process-local store.
    pub fn in_memory() -> Self {
        Self::from_backend(Arc::new(InMemoryStore::new()))
    }

    // ── Accounts ────────────────────────────────────────────────────

    /// Sign in through `identity_provider` and return the session for the user.
    /// The caller owns the session (see `storage::session_manager::SessionManager`).
    pub async fn sign_in(
        &mut self,
        identity_provider: &dyn IdentityProvider,
    ) -> Result<Session, CoreError> {
        let session = self
            .user_service
            .sign_in(identity_provider, self.user_store.as_ref())
            .await?;
        if self.loaded_for.as_deref() != Some(session.user_id()) {
            self.clear();
        }
        Ok(session)
    }

    /// Drop the cached view (e.g. on sign-out).
    pub fn clear(&mut self) {
        self.trades.clear();
        self.loaded_for = None;
        self.stale = false;
    }

    pub async fn list_users(&self) -> Result<Vec<User>, CoreError> {
        self.user_service.list_users(self.user_store.as_ref()).await
    }

    pub async fn get_user(&self, user_id: &str) -> Result<User, CoreError> {
        self.user_service
            .get_user(self.user_store.as_ref(), user_id)
            .await
    }

    /// Administrative deletion of a user record.
    pub async fn delete_user(&mut self, user_id: &str) -> Result<(), CoreError> {
        self.user_service
            .delete_user(self.user_store.as_ref(), user_id)
            .await?;
        if self.loaded_for.as_deref() == Some(user_id) {
            self.clear();
        }
        Ok(())
    }

    // ── Loading ─────────────────────────────────────────────────────

    /// Fetch the full trade collection for the session's user.
    /// On failure the previous view is kept.
    pub async fn refresh(&mut self, session: &Session) -> Result<&[Trade], CoreError> {
        let trades = self
            .trade_store
            .list_trades(session.user_id())
            .await
            .inspect_err(|e| {
                log::warn!("{}: loading trades failed: {e}", self.trade_store.name());
            })?;
        log::debug!("Loaded {} trades for {}", trades.len(), session.user_id());
        self.trades = trades;
        self.loaded_for = Some(session.user_id().to_string());
        self.stale = false;
        Ok(&self.trades)
    }

    /// Fetch one trade straight from the store (detail view).
    pub async fn load_trade(&self, trade_id: &str) -> Result<Trade, CoreError> {
        self.ledger
            .get_trade(self.trade_store.as_ref(), trade_id)
            .await
    }

    /// `true` if a mutation went through but the re-fetch afterwards failed.
    #[must_use]
    pub fn is_stale(&self) -> bool {
        self.stale
    }

    /// User id of the currently cached collection, if any.
    #[must_use]
    pub fn loaded_for(&self) -> Option<&str> {
        self.loaded_for.as_deref()
    }

    // ── Views (cached collection) ───────────────────────────────────

    /// All cached trades, in store order.
    #[must_use]
    pub fn trades(&self) -> &[Trade] {
        &self.trades
    }

    /// Get a cached trade by id.
    #[must_use]
    pub fn get_trade(&self, trade_id: &str) -> Option<&Trade> {
        self.aggregator.find_trade(&self.trades, trade_id)
    }

    #[must_use]
    pub fn trades_by_status(&self, status: TradeStatus) -> Vec<&Trade> {
        self.aggregator.list_by_status(&self.trades, status)
    }

    #[must_use]
    pub fn active_trades(&self) -> Vec<&Trade> {
        self.trades_by_status(TradeStatus::Active)
    }

    #[must_use]
    pub fn completed_trades(&self) -> Vec<&Trade> {
        self.trades_by_status(TradeStatus::Completed)
    }

    /// Completed trades with profit/loss > 0.
    #[must_use]
    pub fn winning_trades(&self) -> Vec<&Trade> {
        self.aggregator.list_wins(&self.trades)
    }

    /// Completed trades with profit/loss < 0.
    #[must_use]
    pub fn losing_trades(&self) -> Vec<&Trade> {
        self.aggregator.list_losses(&self.trades)
    }

    #[must_use]
    pub fn win_ratio(&self) -> f64 {
        self.aggregator.compute_win_ratio(&self.trades)
    }

    #[must_use]
    pub fn win_ratio_stats(&self) -> WinRatioStats {
        self.aggregator.win_ratio_stats(&self.trades)
    }

    #[must_use]
    pub fn total_pnl(&self) -> f64 {
        self.aggregator.compute_total_pnl(&self.trades)
    }

    #[must_use]
    pub fn pnl_report(&self) -> PnlReport {
        self.aggregator.compute_pnl_report(&self.trades)
    }

    #[must_use]
    pub fn dashboard_summary(&self) -> DashboardSummary {
        self.aggregator.dashboard_summary(&self.trades)
    }

    // ── Lifecycle ───────────────────────────────────────────────────

    /// Create a trade for the session's user from the entry form.
    pub async fn create_trade(
        &mut self,
        session: &Session,
        form: &TradeForm,
    ) -> Result<Trade, CoreError> {
        let created = self
            .ledger
            .create_trade(self.trade_store.as_ref(), session.user_id(), form)
            .await?;
        self.reload_after_mutation(session).await;
        Ok(created)
    }

    /// Edit an active trade.
    pub async fn update_trade(
        &mut self,
        session: &Session,
        trade_id: &str,
        form: &TradeUpdateForm,
    ) -> Result<Trade, CoreError> {
        let update = self.ledger.parse_update_form(form)?;
        let updated = self
            .ledger
            .update_trade(self.trade_store.as_ref(), trade_id, &update)
            .await?;
        self.reload_after_mutation(session).await;
        Ok(updated)
    }

    /// Close an active trade with the close dialog's outcome, amount and remarks.
    pub async fn close_trade(
        &mut self,
        session: &Session,
        trade_id: &str,
        form: &CloseTradeForm,
    ) -> Result<Trade, CoreError> {
        let closed = self
            .ledger
            .close_trade(self.trade_store.as_ref(), trade_id, form)
            .await?;
        self.reload_after_mutation(session).await;
        Ok(closed)
    }

    /// Delete a trade permanently. Confirmation is the caller's job.
    pub async fn delete_trade(&mut self, session: &Session, trade_id: &str) -> Result<(), CoreError> {
        self.ledger
            .delete_trade(self.trade_store.as_ref(), trade_id)
            .await?;
        self.reload_after_mutation(session).await;
        Ok(())
    }

    // ── Internal ────────────────────────────────────────────────────

    /// Re-fetch after a successful mutation. A failed re-fetch does not undo
    /// the mutation; the view is flagged stale instead.
    async fn reload_after_mutation(&mut self, session: &Session) {
        if self.refresh(session).await.is_err() {
            self.stale = true;
        }
    }
}
