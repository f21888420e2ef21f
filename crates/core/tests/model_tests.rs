// ═══════════════════════════════════════════════════════════════════
// Model Tests — wire format, Outcome, CloseTrade, Settings, User
// ═══════════════════════════════════════════════════════════════════

use serde_json::json;
use trade_journal_core::models::session::Session;
use trade_journal_core::models::settings::{Settings, DEFAULT_API_BASE_URL, DEFAULT_TIMEOUT_SECS};
use trade_journal_core::models::trade::{CloseTrade, Outcome, Trade, TradeStatus};
use trade_journal_core::models::user::{Identity, User};

// ═══════════════════════════════════════════════════════════════════
// Trade wire format
// ═══════════════════════════════════════════════════════════════════

mod trade_serde {
    use super::*;

    #[test]
    fn deserializes_backend_document() {
        let raw = json!({
            "_id": "65a1",
            "userId": "uid-1",
            "script": "INFY",
            "quantity": 5,
            "buyingRange": "1500-1520",
            "avgPrice": 1510.5,
            "stopLoss": 1480.0,
            "supportLevels": [1490.0, 1475.0],
            "resistanceLevels": [1550.0],
            "takeProfitTargets": [1600.0],
            "exitPlan": "book half at T1",
            "trailingPlan": "trail under 20 EMA",
            "description": "breakout",
            "status": "completed",
            "outcome": "profit",
            "profitLoss": 447.5,
            "remarks": "clean",
            "createdAt": "2025-01-15T09:30:00Z",
            "__v": 0
        });

        let trade: Trade = serde_json::from_value(raw).unwrap();
        assert_eq!(trade.id, "65a1");
        assert_eq!(trade.user_id, "uid-1");
        assert_eq!(trade.quantity, 5);
        assert_eq!(trade.support_levels, vec![1490.0, 1475.0]);
        assert_eq!(trade.status, TradeStatus::Completed);
        assert_eq!(trade.outcome, Some(Outcome::Profit));
        assert_eq!(trade.profit_loss, Some(447.5));
        assert_eq!(trade.remarks.as_deref(), Some("clean"));
        assert!(trade.created_at.is_some());
    }

    #[test]
    fn missing_optional_fields_default() {
        let raw = json!({
            "_id": "t1",
            "userId": "uid-1",
            "script": "TCS",
            "quantity": 10,
            "avgPrice": 100.0,
            "stopLoss": 95.0,
            "status": "Active"
        });

        let trade: Trade = serde_json::from_value(raw).unwrap();
        assert!(trade.is_active());
        assert!(trade.support_levels.is_empty());
        assert!(trade.take_profit_targets.is_empty());
        assert_eq!(trade.buying_range, "");
        assert_eq!(trade.outcome, None);
        assert_eq!(trade.profit_loss, None);
        assert_eq!(trade.profit_loss_or_zero(), 0.0);
    }

    #[test]
    fn null_levels_and_stop_loss_from_legacy_records() {
        let raw = json!({
            "_id": "legacy",
            "userId": "uid-1",
            "script": "SBIN",
            "quantity": 3,
            "avgPrice": 600.0,
            "stopLoss": null,
            "supportLevels": [590.0, null, 580.0],
            "resistanceLevels": null,
            "takeProfitTargets": [null],
            "exitPlan": null,
            "status": "active"
        });

        let trade: Trade = serde_json::from_value(raw).unwrap();
        assert_eq!(trade.stop_loss, 0.0);
        assert_eq!(trade.support_levels, vec![590.0, 580.0]);
        assert!(trade.resistance_levels.is_empty());
        assert!(trade.take_profit_targets.is_empty());
        assert_eq!(trade.exit_plan, "");
    }

    #[test]
    fn missing_stop_loss_reads_as_zero() {
        let raw = json!({
            "_id": "t1",
            "userId": "uid-1",
            "script": "TCS",
            "quantity": 10,
            "avgPrice": 100.0,
            "status": "active"
        });
        let trade: Trade = serde_json::from_value(raw).unwrap();
        assert_eq!(trade.stop_loss, 0.0);
    }

    #[test]
    fn unknown_status_is_rejected() {
        let raw = json!({
            "_id": "t1",
            "userId": "uid-1",
            "script": "TCS",
            "quantity": 10,
            "avgPrice": 100.0,
            "stopLoss": 95.0,
            "status": "pending"
        });
        assert!(serde_json::from_value::<Trade>(raw).is_err());
    }

    #[test]
    fn serializes_with_id_key_and_skips_unset_close_fields() {
        let raw = json!({
            "_id": "t1",
            "userId": "uid-1",
            "script": "TCS",
            "quantity": 10,
            "avgPrice": 100.0,
            "stopLoss": 95.0,
            "status": "active"
        });
        let trade: Trade = serde_json::from_value(raw).unwrap();
        let value = serde_json::to_value(&trade).unwrap();

        assert_eq!(value["_id"], "t1");
        assert_eq!(value["status"], "active");
        assert!(value.get("profitLoss").is_none());
        assert!(value.get("outcome").is_none());
    }
}

// ═══════════════════════════════════════════════════════════════════
// Outcome & CloseTrade
// ═══════════════════════════════════════════════════════════════════

mod outcome {
    use super::*;

    #[test]
    fn parse_is_case_insensitive() {
        assert_eq!(Outcome::parse("Profit"), Some(Outcome::Profit));
        assert_eq!(Outcome::parse("  LOSS "), Some(Outcome::Loss));
        assert_eq!(Outcome::parse("breakeven"), None);
        assert_eq!(Outcome::parse(""), None);
    }

    #[test]
    fn signed_amount_uses_magnitude() {
        assert_eq!(Outcome::Profit.signed_amount(-75.0), 75.0);
        assert_eq!(Outcome::Loss.signed_amount(150.0), -150.0);
        assert_eq!(Outcome::Loss.signed_amount(-150.0), -150.0);
    }

    #[test]
    fn zero_is_positive_zero() {
        let zero = Outcome::Loss.signed_amount(-0.0);
        assert_eq!(zero, 0.0);
        assert!(zero.is_sign_positive());
    }

    #[test]
    fn close_payload_is_completed_and_signed() {
        let close = CloseTrade::new(Outcome::Loss, 42.0, None);
        assert_eq!(close.status, TradeStatus::Completed);
        assert_eq!(close.profit_loss, -42.0);

        let value = serde_json::to_value(&close).unwrap();
        assert_eq!(value["status"], "completed");
        assert_eq!(value["outcome"], "loss");
        assert_eq!(value["profitLoss"], -42.0);
    }

    #[test]
    fn display_is_lowercase() {
        assert_eq!(Outcome::Profit.to_string(), "profit");
        assert_eq!(TradeStatus::Completed.to_string(), "completed");
    }
}

// ═══════════════════════════════════════════════════════════════════
// Users & Sessions
// ═══════════════════════════════════════════════════════════════════

mod users {
    use super::*;

    #[test]
    fn user_from_identity_keys_on_subject_id() {
        let identity = Identity::new("uid-9", "Asha Rao", "asha@example.com", "https://p/a.png");
        let user = User::from(identity);
        assert_eq!(user.id, "uid-9");
        assert_eq!(user.name, "Asha Rao");
        assert_eq!(user.photo, "https://p/a.png");
        assert_eq!(user.created_at, None);
    }

    #[test]
    fn session_uses_backend_user_envelope() {
        let raw = json!({
            "user": { "_id": "uid-9", "name": "Asha", "email": "a@example.com" }
        });
        let session: Session = serde_json::from_value(raw).unwrap();
        assert_eq!(session.user_id(), "uid-9");
        assert_eq!(session.user.photo, "");
    }
}

// ═══════════════════════════════════════════════════════════════════
// Settings
// ═══════════════════════════════════════════════════════════════════

mod settings {
    use super::*;

    #[test]
    fn defaults() {
        let settings = Settings::default();
        assert_eq!(settings.api_base_url, DEFAULT_API_BASE_URL);
        assert_eq!(settings.timeout_secs, DEFAULT_TIMEOUT_SECS);
    }

    #[test]
    fn base_url_trailing_slash_is_trimmed() {
        let settings = Settings::default()
            .with_api_base_url("https://journal.example.com/api/")
            .unwrap();
        assert_eq!(settings.api_base_url, "https://journal.example.com/api");
    }

    #[test]
    fn base_url_must_be_http() {
        let mut settings = Settings::default();
        let err = settings.set_api_base_url("ftp://host/api").unwrap_err();
        assert!(err.is_validation());
        assert_eq!(settings.api_base_url, DEFAULT_API_BASE_URL);
    }

    #[test]
    fn zero_timeout_rejected() {
        let mut settings = Settings::default();
        assert!(settings.set_timeout_secs(0).is_err());
        settings.set_timeout_secs(5).unwrap();
        assert_eq!(settings.timeout_secs, 5);
    }
}
