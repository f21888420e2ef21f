use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use trade_journal_core::errors::CoreError;
use trade_journal_core::models::form::{CloseTradeForm, TradeForm, TradeUpdateForm};
use trade_journal_core::models::trade::{CloseTrade, NewTrade, Trade, TradeStatus, TradeUpdate};
use trade_journal_core::models::user::Identity;
use trade_journal_core::storage::session_manager::SessionManager;
use trade_journal_core::stores::memory::InMemoryStore;
use trade_journal_core::stores::traits::{StaticIdentityProvider, TradeStore};
use trade_journal_core::TradeJournal;

// ═══════════════════════════════════════════════════════════════════
// Flaky store (wraps InMemoryStore, fails on demand)
// ═══════════════════════════════════════════════════════════════════

#[derive(Default)]
struct FlakyStore {
    inner: InMemoryStore,
    fail_list: AtomicBool,
    fail_writes: AtomicBool,
}

impl FlakyStore {
    fn check(&self, flag: &AtomicBool) -> Result<(), CoreError> {
        if flag.load(Ordering::SeqCst) {
            Err(CoreError::Network("connection reset".into()))
        } else {
            Ok(())
        }
    }
}

#[async_trait]
impl TradeStore for FlakyStore {
    fn name(&self) -> &str {
        "Flaky"
    }

    async fn list_trades(&self, user_id: &str) -> Result<Vec<Trade>, CoreError> {
        self.check(&self.fail_list)?;
        self.inner.list_trades(user_id).await
    }

    async fn get_trade(&self, trade_id: &str) -> Result<Trade, CoreError> {
        self.inner.get_trade(trade_id).await
    }

    async fn create_trade(&self, trade: &NewTrade) -> Result<Trade, CoreError> {
        self.check(&self.fail_writes)?;
        self.inner.create_trade(trade).await
    }

    async fn update_trade(&self, trade_id: &str, update: &TradeUpdate) -> Result<Trade, CoreError> {
        self.check(&self.fail_writes)?;
        self.inner.update_trade(trade_id, update).await
    }

    async fn close_trade(&self, trade_id: &str, close: &CloseTrade) -> Result<Trade, CoreError> {
        self.check(&self.fail_writes)?;
        self.inner.close_trade(trade_id, close).await
    }

    async fn delete_trade(&self, trade_id: &str) -> Result<(), CoreError> {
        self.check(&self.fail_writes)?;
        self.inner.delete_trade(trade_id).await
    }
}

fn identity() -> StaticIdentityProvider {
    StaticIdentityProvider::new(Identity::new(
        "uid-asha",
        "Asha Rao",
        "asha@example.com",
        "https://example.com/asha.png",
    ))
}

fn tcs_form() -> TradeForm {
    TradeForm {
        script: "TCS".into(),
        quantity: "10".into(),
        buying_range: "98-102".into(),
        avg_price: "100".into(),
        stop_loss: "95".into(),
        support_levels: "95, 92".into(),
        take_profit_targets: "110".into(),
        ..TradeForm::default()
    }
}

// ═══════════════════════════════════════════════════════════════════
// End-to-end: sign in, create, close, aggregate
// ═══════════════════════════════════════════════════════════════════

#[tokio::test]
async fn full_trade_lifecycle() {
    let _ = env_logger::builder().is_test(true).try_init();
    let mut journal = TradeJournal::in_memory();
    let mut sessions = SessionManager::new();

    let session = journal.sign_in(&identity()).await.unwrap();
    sessions.sign_in(session);
    let session = sessions.current().unwrap().clone();
    assert_eq!(session.user_id(), "uid-asha");

    journal.refresh(&session).await.unwrap();
    assert!(journal.trades().is_empty());

    // Create → active
    let created = journal.create_trade(&session, &tcs_form()).await.unwrap();
    assert_eq!(created.status, TradeStatus::Active);
    assert_eq!(journal.active_trades().len(), 1);
    assert!(journal.completed_trades().is_empty());
    assert_eq!(journal.total_pnl(), 0.0);

    // Close with profit 200 → completed, counted as a win
    let closed = journal
        .close_trade(&session, &created.id, &CloseTradeForm::new("profit", "200", "target hit"))
        .await
        .unwrap();
    assert_eq!(closed.status, TradeStatus::Completed);
    assert_eq!(closed.profit_loss, Some(200.0));

    assert!(journal.active_trades().is_empty());
    assert_eq!(journal.completed_trades().len(), 1);
    assert_eq!(journal.winning_trades().len(), 1);
    assert!(journal.losing_trades().is_empty());
    assert_eq!(journal.total_pnl(), 200.0);
    assert_eq!(journal.win_ratio(), 100.0);

    let report = journal.pnl_report();
    assert_eq!(report.rows.len(), 1);
    assert_eq!(report.rows[0].selling_avg, 120.0);
    assert_eq!(report.rows[0].gain_pct, 20.0);

    let summary = journal.dashboard_summary();
    assert_eq!(summary.total_trades, 1);
    assert_eq!(summary.winning_trades, 1);
    assert_eq!(summary.total_profit_loss, 200.0);
}

#[tokio::test]
async fn sign_in_is_idempotent_and_user_is_listed() {
    let mut journal = TradeJournal::in_memory();
    let first = journal.sign_in(&identity()).await.unwrap();
    let second = journal.sign_in(&identity()).await.unwrap();
    assert_eq!(first, second);

    let users = journal.list_users().await.unwrap();
    assert_eq!(users.len(), 1);
    assert_eq!(journal.get_user("uid-asha").await.unwrap().email, "asha@example.com");
}

#[tokio::test]
async fn trades_are_scoped_per_user() {
    let store = Arc::new(InMemoryStore::new());
    let mut journal = TradeJournal::from_backend(store.clone());

    let asha = journal.sign_in(&identity()).await.unwrap();
    journal.create_trade(&asha, &tcs_form()).await.unwrap();

    let other = StaticIdentityProvider::new(Identity::new("uid-ravi", "Ravi", "r@example.com", ""));
    let ravi = journal.sign_in(&other).await.unwrap();
    assert!(journal.trades().is_empty());
    assert_eq!(journal.loaded_for(), None);

    journal.refresh(&ravi).await.unwrap();
    assert!(journal.trades().is_empty());
    assert_eq!(store.trade_count(), 1);
}

#[tokio::test]
async fn update_then_delete() {
    let mut journal = TradeJournal::in_memory();
    let session = journal.sign_in(&identity()).await.unwrap();
    let created = journal.create_trade(&session, &tcs_form()).await.unwrap();

    let edit = TradeUpdateForm {
        script: "TCS".into(),
        quantity: "15".into(),
        avg_price: "101".into(),
        stop_loss: "96".into(),
    };
    let updated = journal.update_trade(&session, &created.id, &edit).await.unwrap();
    assert_eq!(updated.quantity, 15);
    assert_eq!(journal.get_trade(&created.id).map(|t| t.quantity), Some(15));

    journal.delete_trade(&session, &created.id).await.unwrap();
    assert!(journal.trades().is_empty());
    assert!(journal.load_trade(&created.id).await.unwrap_err().is_not_found());
}

#[tokio::test]
async fn closing_completed_trade_is_rejected() {
    let mut journal = TradeJournal::in_memory();
    let session = journal.sign_in(&identity()).await.unwrap();
    let created = journal.create_trade(&session, &tcs_form()).await.unwrap();
    let close = CloseTradeForm::new("loss", "50", "");
    journal.close_trade(&session, &created.id, &close).await.unwrap();

    let err = journal
        .close_trade(&session, &created.id, &close)
        .await
        .unwrap_err();
    assert!(matches!(err, CoreError::InvalidTransition(_)));
    assert_eq!(journal.total_pnl(), -50.0);
}

// ═══════════════════════════════════════════════════════════════════
// Failure handling
// ═══════════════════════════════════════════════════════════════════

#[tokio::test]
async fn invalid_form_leaves_view_untouched() {
    let mut journal = TradeJournal::in_memory();
    let session = journal.sign_in(&identity()).await.unwrap();
    journal.create_trade(&session, &tcs_form()).await.unwrap();

    let mut bad = tcs_form();
    bad.avg_price = "abc".into();
    let err = journal.create_trade(&session, &bad).await.unwrap_err();
    assert!(err.is_validation());
    assert_eq!(journal.trades().len(), 1);
}

#[tokio::test]
async fn failed_mutation_keeps_cached_view() {
    let store = Arc::new(FlakyStore::default());
    let mut journal = TradeJournal::new(store.clone(), Arc::new(InMemoryStore::new()));
    let session = journal.sign_in(&identity()).await.unwrap();
    let created = journal.create_trade(&session, &tcs_form()).await.unwrap();

    store.fail_writes.store(true, Ordering::SeqCst);
    let err = journal.delete_trade(&session, &created.id).await.unwrap_err();
    assert!(matches!(err, CoreError::Network(_)));
    assert_eq!(journal.trades().len(), 1);
    assert!(!journal.is_stale());
}

#[tokio::test]
async fn failed_refetch_marks_view_stale() {
    let store = Arc::new(FlakyStore::default());
    let mut journal = TradeJournal::new(store.clone(), Arc::new(InMemoryStore::new()));
    let session = journal.sign_in(&identity()).await.unwrap();
    journal.refresh(&session).await.unwrap();

    store.fail_list.store(true, Ordering::SeqCst);
    let created = journal.create_trade(&session, &tcs_form()).await.unwrap();
    assert!(journal.is_stale());
    assert!(journal.trades().is_empty());
    assert_eq!(store.inner.trade_count(), 1);

    store.fail_list.store(false, Ordering::SeqCst);
    journal.refresh(&session).await.unwrap();
    assert!(!journal.is_stale());
    assert_eq!(journal.get_trade(&created.id).map(|t| t.id.as_str()), Some(created.id.as_str()));
}
