use serde::{Deserialize, Serialize};

/// Raw text input for a new trade, exactly as typed into the entry form.
///
/// Numeric fields are parsed by `LedgerService::parse_trade_form`.
/// Level lists are comma-separated (e.g. `"95, 92.5, 90"`).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TradeForm {
    pub script: String,
    pub quantity: String,
    pub buying_range: String,
    pub avg_price: String,
    pub stop_loss: String,
    pub support_levels: String,
    pub resistance_levels: String,
    pub take_profit_targets: String,
    pub exit_plan: String,
    pub trailing_plan: String,
    pub description: String,
}

/// Raw text input for editing an active trade.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TradeUpdateForm {
    pub script: String,
    pub quantity: String,
    pub avg_price: String,
    pub stop_loss: String,
}

/// Raw text input from the close-trade dialog.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CloseTradeForm {
    /// `"profit"` or `"loss"`
    pub outcome: String,
    /// Amount; only its magnitude is used
    pub amount: String,
    pub remarks: String,
}

impl CloseTradeForm {
    pub fn new(
        outcome: impl Into<String>,
        amount: impl Into<String>,
        remarks: impl Into<String>,
    ) -> Self {
        Self {
            outcome: outcome.into(),
            amount: amount.into(),
            remarks: remarks.into(),
        }
    }
}
