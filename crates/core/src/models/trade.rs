use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

/// Lifecycle status of a trade.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TradeStatus {
    /// Position is open — not yet closed
    #[serde(alias = "Active", alias = "ACTIVE")]
    Active,
    /// Position was closed with a recorded outcome
    #[serde(alias = "Completed", alias = "COMPLETED")]
    Completed,
}

impl std::fmt::Display for TradeStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TradeStatus::Active => write!(f, "active"),
            TradeStatus::Completed => write!(f, "completed"),
        }
    }
}

/// Qualitative result of a completed trade.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Outcome {
    #[serde(alias = "Profit", alias = "PROFIT")]
    Profit,
    #[serde(alias = "Loss", alias = "LOSS")]
    Loss,
}

impl Outcome {
    /// Parse an outcome from user input (case-insensitive, surrounding whitespace ignored).
    pub fn parse(input: &str) -> Option<Self> {
        match input.trim().to_lowercase().as_str() {
            "profit" => Some(Outcome::Profit),
            "loss" => Some(Outcome::Loss),
            _ => None,
        }
    }

    /// Apply the outcome's sign to a caller-supplied amount.
    ///
    /// Only the magnitude of `amount` is used: profit ⇒ `+|amount|`,
    /// loss ⇒ `-|amount|`. Zero is always returned as `+0.0`.
    pub fn signed_amount(&self, amount: f64) -> f64 {
        let magnitude = amount.abs();
        if magnitude == 0.0 {
            return 0.0;
        }
        match self {
            Outcome::Profit => magnitude,
            Outcome::Loss => -magnitude,
        }
    }
}

impl std::fmt::Display for Outcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Outcome::Profit => write!(f, "profit"),
            Outcome::Loss => write!(f, "loss"),
        }
    }
}

/// A single journaled position.
///
/// Entry fields are fixed at creation. `outcome`, `profit_loss` and `remarks`
/// are only set when the trade is closed, all in the same store call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Trade {
    /// Store-assigned identifier
    #[serde(rename = "_id")]
    pub id: String,

    /// Owner — the user's external subject id
    pub user_id: String,

    /// Symbol / script name (e.g., "TCS", "INFY")
    pub script: String,

    /// Number of units (always > 0)
    pub quantity: u32,

    /// Free-text buying range (e.g., "98-102")
    #[serde(default, deserialize_with = "null_as_empty")]
    pub buying_range: String,

    /// Entry average price
    pub avg_price: f64,

    /// Stop-loss price; a stored `null` reads as 0
    #[serde(default, deserialize_with = "null_as_zero")]
    pub stop_loss: f64,

    #[serde(default, deserialize_with = "lenient_levels")]
    pub support_levels: Vec<f64>,

    #[serde(default, deserialize_with = "lenient_levels")]
    pub resistance_levels: Vec<f64>,

    #[serde(default, deserialize_with = "lenient_levels")]
    pub take_profit_targets: Vec<f64>,

    #[serde(default, deserialize_with = "null_as_empty")]
    pub exit_plan: String,

    #[serde(default, deserialize_with = "null_as_empty")]
    pub trailing_plan: String,

    #[serde(default, deserialize_with = "null_as_empty")]
    pub description: String,

    pub status: TradeStatus,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub outcome: Option<Outcome>,

    /// Signed result; only meaningful once completed
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub profit_loss: Option<f64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub remarks: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
}

impl Trade {
    pub fn is_active(&self) -> bool {
        self.status == TradeStatus::Active
    }

    pub fn is_completed(&self) -> bool {
        self.status == TradeStatus::Completed
    }

    /// Profit/loss with a missing value treated as zero.
    pub fn profit_loss_or_zero(&self) -> f64 {
        self.profit_loss.unwrap_or(0.0)
    }

    /// Build the stored form of a new trade (used by stores that mint ids themselves).
    pub fn from_new(id: impl Into<String>, new: NewTrade, created_at: DateTime<Utc>) -> Self {
        Self {
            id: id.into(),
            user_id: new.user_id,
            script: new.script,
            quantity: new.quantity,
            buying_range: new.buying_range,
            avg_price: new.avg_price,
            stop_loss: new.stop_loss,
            support_levels: new.support_levels,
            resistance_levels: new.resistance_levels,
            take_profit_targets: new.take_profit_targets,
            exit_plan: new.exit_plan,
            trailing_plan: new.trailing_plan,
            description: new.description,
            status: new.status,
            outcome: None,
            profit_loss: None,
            remarks: None,
            created_at: Some(created_at),
        }
    }

    /// Apply an edit of the mutable entry fields.
    pub fn apply_update(&mut self, update: &TradeUpdate) {
        self.script = update.script.clone();
        self.quantity = update.quantity;
        self.avg_price = update.avg_price;
        self.stop_loss = update.stop_loss;
    }

    /// Apply a close payload: status, outcome, profit/loss and remarks together.
    pub fn apply_close(&mut self, close: &CloseTrade) {
        self.status = close.status;
        self.outcome = Some(close.outcome);
        self.profit_loss = Some(close.profit_loss);
        self.remarks = close.remarks.clone();
    }
}

// ── Lenient decoding of stored documents ───────────────────────────
//
// Older clients stored unparsable level entries as `null`. One such record
// must not fail decoding of the whole collection.

/// Level list with `null` entries dropped; a `null` list reads as empty.
fn lenient_levels<'de, D>(deserializer: D) -> Result<Vec<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<Vec<Option<f64>>> = Option::deserialize(deserializer)?;
    Ok(raw.unwrap_or_default().into_iter().flatten().collect())
}

fn null_as_zero<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<f64>::deserialize(deserializer)?.unwrap_or(0.0))
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

/// Payload sent to the store to create a trade. Status is always `Active`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewTrade {
    pub user_id: String,
    pub script: String,
    pub quantity: u32,
    pub buying_range: String,
    pub avg_price: f64,
    pub stop_loss: f64,
    pub support_levels: Vec<f64>,
    pub resistance_levels: Vec<f64>,
    pub take_profit_targets: Vec<f64>,
    pub exit_plan: String,
    pub trailing_plan: String,
    pub description: String,
    pub status: TradeStatus,
}

/// Edit of an active trade's entry fields.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TradeUpdate {
    pub script: String,
    pub quantity: u32,
    pub avg_price: f64,
    pub stop_loss: f64,
}

/// Payload that closes a trade.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CloseTrade {
    /// Always `Completed`
    pub status: TradeStatus,
    pub outcome: Outcome,
    pub profit_loss: f64,
    #[serde(default)]
    pub remarks: Option<String>,
}

impl CloseTrade {
    /// Build a close payload; the sign of `amount` is replaced by the outcome's.
    pub fn new(outcome: Outcome, amount: f64, remarks: Option<String>) -> Self {
        Self {
            status: TradeStatus::Completed,
            outcome,
            profit_loss: outcome.signed_amount(amount),
            remarks,
        }
    }
}
