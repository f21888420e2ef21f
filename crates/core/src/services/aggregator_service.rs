use crate::models::analytics::{DashboardSummary, PnlReport, PnlRow, WinRatioStats};
use crate::models::trade::{Trade, TradeStatus};

/// Filters and statistics over a user's trade collection.
///
/// Pure business logic — no I/O, no store calls. Every view that needs a
/// ratio or a P&L figure goes through here so each formula has one definition.
///
/// Two loss predicates coexist on purpose:
/// - the loss listing and `DashboardSummary::losing_trades` use profit/loss `< 0`;
/// - the win-ratio split (`WinRatioStats::losing`) uses profit/loss `<= 0`.
///
/// A completed trade that closed at exactly zero therefore lowers the win
/// ratio but is not listed as a losing trade.
pub struct AggregatorService;

impl AggregatorService {
    pub fn new() -> Self {
        Self
    }

    /// Trades with the given status, original order preserved.
    pub fn list_by_status<'a>(&self, trades: &'a [Trade], status: TradeStatus) -> Vec<&'a Trade> {
        trades.iter().filter(|t| t.status == status).collect()
    }

    /// Completed trades that made money (profit/loss > 0).
    pub fn list_wins<'a>(&self, trades: &'a [Trade]) -> Vec<&'a Trade> {
        trades
            .iter()
            .filter(|t| t.is_completed() && t.profit_loss_or_zero() > 0.0)
            .collect()
    }

    /// Completed trades that lost money (profit/loss strictly < 0).
    pub fn list_losses<'a>(&self, trades: &'a [Trade]) -> Vec<&'a Trade> {
        trades
            .iter()
            .filter(|t| t.is_completed() && t.profit_loss_or_zero() < 0.0)
            .collect()
    }

    /// Look up a trade in an already-fetched collection.
    pub fn find_trade<'a>(&self, trades: &'a [Trade], trade_id: &str) -> Option<&'a Trade> {
        trades.iter().find(|t| t.id == trade_id)
    }

    /// Win/loss split of the completed trades.
    pub fn win_ratio_stats(&self, trades: &[Trade]) -> WinRatioStats {
        let (winning, losing) = trades
            .iter()
            .filter(|t| t.is_completed())
            .fold((0usize, 0usize), |(w, l), t| {
                if t.profit_loss_or_zero() > 0.0 {
                    (w + 1, l)
                } else {
                    (w, l + 1)
                }
            });
        let completed = winning + losing;
        let win_ratio = if completed > 0 {
            round2(winning as f64 / completed as f64 * 100.0)
        } else {
            0.0
        };

        WinRatioStats {
            completed,
            winning,
            losing,
            win_ratio,
        }
    }

    /// Percentage of completed trades that are winners, rounded to 2 decimals.
    /// Returns 0 when nothing is completed.
    pub fn compute_win_ratio(&self, trades: &[Trade]) -> f64 {
        self.win_ratio_stats(trades).win_ratio
    }

    /// Sum of profit/loss over completed trades, rounded to 2 decimals.
    ///
    /// Active trades contribute 0 even if the store sent a stray value; a
    /// completed trade without a value also counts as 0. Both the dashboard
    /// and the P&L report take their total from here.
    pub fn compute_total_pnl(&self, trades: &[Trade]) -> f64 {
        round2(
            trades
                .iter()
                .filter(|t| t.is_completed())
                .map(Trade::profit_loss_or_zero)
                .sum(),
        )
    }

    /// Per-trade P&L rows for completed trades plus portfolio totals.
    pub fn compute_pnl_report(&self, trades: &[Trade]) -> PnlReport {
        let rows: Vec<PnlRow> = trades
            .iter()
            .filter(|t| t.is_completed())
            .map(Self::pnl_row)
            .collect();

        if rows.is_empty() {
            return PnlReport::default();
        }

        let total_profit_loss = self.compute_total_pnl(trades);
        let average_gain_pct =
            round2(rows.iter().map(|r| r.gain_pct).sum::<f64>() / rows.len() as f64);

        PnlReport {
            rows,
            total_profit_loss,
            average_gain_pct,
        }
    }

    /// Headline counts and totals for the dashboard.
    pub fn dashboard_summary(&self, trades: &[Trade]) -> DashboardSummary {
        let ratio = self.win_ratio_stats(trades);

        DashboardSummary {
            total_trades: trades.len(),
            active_trades: self.list_by_status(trades, TradeStatus::Active).len(),
            completed_trades: ratio.completed,
            winning_trades: ratio.winning,
            losing_trades: self.list_losses(trades).len(),
            total_profit_loss: self.compute_total_pnl(trades),
            win_ratio: ratio.win_ratio,
        }
    }

    fn pnl_row(trade: &Trade) -> PnlRow {
        let buying_avg = trade.avg_price;
        let profit_loss = trade.profit_loss_or_zero();
        let selling_avg = if trade.quantity > 0 {
            buying_avg + profit_loss / f64::from(trade.quantity)
        } else {
            buying_avg
        };
        let gain_pct = if buying_avg > 0.0 {
            (selling_avg - buying_avg) / buying_avg * 100.0
        } else {
            0.0
        };

        PnlRow {
            trade_id: trade.id.clone(),
            script: trade.script.clone(),
            quantity: trade.quantity,
            buying_avg: round2(buying_avg),
            selling_avg: round2(selling_avg),
            profit_loss: round2(profit_loss),
            gain_pct: round2(gain_pct),
        }
    }
}

impl Default for AggregatorService {
    fn default() -> Self {
        Self::new()
    }
}

/// Round to 2 decimal places (display precision for money and percentages).
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
