use serde::{Deserialize, Serialize};

/// Headline numbers for the dashboard view.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DashboardSummary {
    /// Every trade in the collection, regardless of status
    pub total_trades: usize,

    pub active_trades: usize,

    pub completed_trades: usize,

    /// Completed trades with profit/loss > 0
    pub winning_trades: usize,

    /// Completed trades with profit/loss < 0 (same predicate as the loss listing;
    /// a zero result is neither a win nor a loss here)
    pub losing_trades: usize,

    /// Sum of profit/loss over completed trades
    pub total_profit_loss: f64,

    /// Winning / completed × 100, 2 decimal places
    pub win_ratio: f64,
}

/// Breakdown behind the win-ratio view.
///
/// `winning + losing == completed`: a zero result counts as losing here.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WinRatioStats {
    pub completed: usize,

    /// profit/loss > 0
    pub winning: usize,

    /// profit/loss ≤ 0
    pub losing: usize,

    /// Percentage in [0, 100], rounded to 2 decimal places
    pub win_ratio: f64,
}

/// One row of the P&L report (completed trades only).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PnlRow {
    pub trade_id: String,
    pub script: String,
    pub quantity: u32,

    /// Entry average price
    pub buying_avg: f64,

    /// Derived exit price: buying_avg + profit_loss / quantity
    pub selling_avg: f64,

    pub profit_loss: f64,

    /// (selling_avg − buying_avg) / buying_avg × 100
    pub gain_pct: f64,
}

/// P&L report over the completed trades of a collection.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PnlReport {
    pub rows: Vec<PnlRow>,

    /// Sum of profit/loss across rows
    pub total_profit_loss: f64,

    /// Arithmetic mean of per-row gain % (0 when there are no rows)
    pub average_gain_pct: f64,
}
