use crate::errors::CoreError;
use crate::models::form::{CloseTradeForm, TradeForm, TradeUpdateForm};
use crate::models::trade::{CloseTrade, NewTrade, Outcome, Trade, TradeStatus, TradeUpdate};
use crate::stores::traits::TradeStore;

/// Trade lifecycle: create → (edit while active) → close once → delete.
///
/// Parses and validates form input before touching the store, then performs
/// exactly one mutating store call per operation. Nothing is retried; on a
/// store failure the error is returned as-is and no local state changes.
pub struct LedgerService;

impl LedgerService {
    pub fn new() -> Self {
        Self
    }

    // ── Form parsing ────────────────────────────────────────────────

    /// Parse the entry form into a create payload for `user_id`.
    ///
    /// Rules:
    /// - script, quantity, buying range, avg price and stop loss are required
    /// - quantity is a whole number > 0
    /// - avg price is a finite decimal > 0; stop loss a finite decimal ≥ 0
    /// - level lists are comma-separated decimals; empty text means no levels
    pub fn parse_trade_form(&self, user_id: &str, form: &TradeForm) -> Result<NewTrade, CoreError> {
        let script = required("script", &form.script)?;
        let quantity = parse_quantity(required("quantity", &form.quantity)?)?;
        let buying_range = required("buying range", &form.buying_range)?;
        let avg_price = parse_avg_price(required("avg price", &form.avg_price)?)?;
        let stop_loss = parse_stop_loss(required("stop loss", &form.stop_loss)?)?;

        let new = NewTrade {
            user_id: user_id.trim().to_string(),
            script: script.to_string(),
            quantity,
            buying_range: buying_range.to_string(),
            avg_price,
            stop_loss,
            support_levels: parse_levels("support levels", &form.support_levels)?,
            resistance_levels: parse_levels("resistance levels", &form.resistance_levels)?,
            take_profit_targets: parse_levels("take-profit targets", &form.take_profit_targets)?,
            exit_plan: form.exit_plan.trim().to_string(),
            trailing_plan: form.trailing_plan.trim().to_string(),
            description: form.description.trim().to_string(),
            status: TradeStatus::Active,
        };
        self.validate_new_trade(&new)?;
        Ok(new)
    }

    /// Parse the edit form of an active trade.
    pub fn parse_update_form(&self, form: &TradeUpdateForm) -> Result<TradeUpdate, CoreError> {
        let update = TradeUpdate {
            script: required("script", &form.script)?.to_string(),
            quantity: parse_quantity(required("quantity", &form.quantity)?)?,
            avg_price: parse_avg_price(required("avg price", &form.avg_price)?)?,
            stop_loss: parse_stop_loss(required("stop loss", &form.stop_loss)?)?,
        };
        Ok(update)
    }

    /// Parse the close dialog. The sign of the amount is taken from the outcome.
    pub fn parse_close_form(&self, form: &CloseTradeForm) -> Result<CloseTrade, CoreError> {
        if form.outcome.trim().is_empty() {
            return Err(CoreError::ValidationError(
                "Outcome is required (profit or loss)".into(),
            ));
        }
        let outcome = Outcome::parse(&form.outcome).ok_or_else(|| {
            CoreError::ValidationError(format!(
                "Unknown outcome '{}': expected profit or loss",
                form.outcome.trim()
            ))
        })?;
        let amount = parse_decimal("amount", required("amount", &form.amount)?)?;
        let remarks = Some(form.remarks.trim())
            .filter(|r| !r.is_empty())
            .map(str::to_string);

        Ok(CloseTrade::new(outcome, amount, remarks))
    }

    // ── Lifecycle operations ────────────────────────────────────────

    /// Parse the entry form and create the trade in the store.
    pub async fn create_trade(
        &self,
        store: &dyn TradeStore,
        user_id: &str,
        form: &TradeForm,
    ) -> Result<Trade, CoreError> {
        let new = self.parse_trade_form(user_id, form)?;
        self.submit_trade(store, new).await
    }

    /// Create a trade from an already-typed payload. Status is forced to active.
    pub async fn submit_trade(
        &self,
        store: &dyn TradeStore,
        mut new: NewTrade,
    ) -> Result<Trade, CoreError> {
        new.status = TradeStatus::Active;
        self.validate_new_trade(&new)?;

        let created = store.create_trade(&new).await.inspect_err(|e| {
            log::warn!("{}: create trade {} failed: {e}", store.name(), new.script);
        })?;
        log::info!("Created trade {} ({} x {})", created.id, created.script, created.quantity);
        Ok(created)
    }

    /// Fetch a single trade.
    pub async fn get_trade(&self, store: &dyn TradeStore, trade_id: &str) -> Result<Trade, CoreError> {
        store.get_trade(trade_id).await
    }

    /// Edit script/quantity/avg price/stop loss of an active trade.
    /// Completed trades are rejected with `CoreError::InvalidTransition`.
    pub async fn update_trade(
        &self,
        store: &dyn TradeStore,
        trade_id: &str,
        update: &TradeUpdate,
    ) -> Result<Trade, CoreError> {
        self.validate_update(update)?;
        self.require_active(store, trade_id, "edit").await?;

        let updated = store.update_trade(trade_id, update).await.inspect_err(|e| {
            log::warn!("{}: update trade {trade_id} failed: {e}", store.name());
        })?;
        log::info!("Updated trade {trade_id}");
        Ok(updated)
    }

    /// Close an active trade with an outcome, amount and remarks.
    ///
    /// Profit stores `+|amount|`, loss stores `-|amount|`, whatever sign the
    /// caller typed. A trade can only be closed once.
    pub async fn close_trade(
        &self,
        store: &dyn TradeStore,
        trade_id: &str,
        form: &CloseTradeForm,
    ) -> Result<Trade, CoreError> {
        let close = self.parse_close_form(form)?;
        self.require_active(store, trade_id, "close").await?;

        let closed = store.close_trade(trade_id, &close).await.inspect_err(|e| {
            log::warn!("{}: close trade {trade_id} failed: {e}", store.name());
        })?;
        log::info!(
            "Closed trade {trade_id} as {} ({:+.2})",
            close.outcome,
            close.profit_loss
        );
        Ok(closed)
    }

    /// Delete a trade. Irreversible; allowed in any status.
    pub async fn delete_trade(&self, store: &dyn TradeStore, trade_id: &str) -> Result<(), CoreError> {
        store.delete_trade(trade_id).await.inspect_err(|e| {
            log::warn!("{}: delete trade {trade_id} failed: {e}", store.name());
        })?;
        log::info!("Deleted trade {trade_id}");
        Ok(())
    }

    // ── Validation ──────────────────────────────────────────────────

    fn validate_new_trade(&self, new: &NewTrade) -> Result<(), CoreError> {
        if new.user_id.trim().is_empty() {
            return Err(CoreError::ValidationError(
                "Trade must belong to a user (user id is empty)".into(),
            ));
        }
        if new.script.trim().is_empty() {
            return Err(CoreError::ValidationError("Script is required".into()));
        }
        if new.buying_range.trim().is_empty() {
            return Err(CoreError::ValidationError("Buying range is required".into()));
        }
        check_quantity(new.quantity)?;
        check_avg_price(new.avg_price)?;
        check_stop_loss(new.stop_loss)?;
        for level in new
            .support_levels
            .iter()
            .chain(&new.resistance_levels)
            .chain(&new.take_profit_targets)
        {
            if !level.is_finite() {
                return Err(CoreError::ValidationError(format!(
                    "Price level {level} is not a finite number"
                )));
            }
        }
        Ok(())
    }

    fn validate_update(&self, update: &TradeUpdate) -> Result<(), CoreError> {
        if update.script.trim().is_empty() {
            return Err(CoreError::ValidationError("Script is required".into()));
        }
        check_quantity(update.quantity)?;
        check_avg_price(update.avg_price)?;
        check_stop_loss(update.stop_loss)
    }

    async fn require_active(
        &self,
        store: &dyn TradeStore,
        trade_id: &str,
        action: &str,
    ) -> Result<Trade, CoreError> {
        let trade = store.get_trade(trade_id).await?;
        if trade.is_completed() {
            return Err(CoreError::InvalidTransition(format!(
                "Cannot {action} trade {trade_id}: it is already completed"
            )));
        }
        Ok(trade)
    }
}

impl Default for LedgerService {
    fn default() -> Self {
        Self::new()
    }
}

// ── Field parsers ───────────────────────────────────────────────────

fn required<'a>(field: &str, value: &'a str) -> Result<&'a str, CoreError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(CoreError::ValidationError(format!("{field} is required")));
    }
    Ok(trimmed)
}

fn parse_quantity(raw: &str) -> Result<u32, CoreError> {
    let quantity = raw.parse::<u32>().map_err(|_| {
        CoreError::ValidationError(format!("Quantity '{raw}' is not a whole number"))
    })?;
    check_quantity(quantity)?;
    Ok(quantity)
}

fn parse_decimal(field: &str, raw: &str) -> Result<f64, CoreError> {
    match raw.parse::<f64>() {
        Ok(v) if v.is_finite() => Ok(v),
        _ => Err(CoreError::ValidationError(format!(
            "{field} '{raw}' is not a valid number"
        ))),
    }
}

fn parse_avg_price(raw: &str) -> Result<f64, CoreError> {
    let price = parse_decimal("avg price", raw)?;
    check_avg_price(price)?;
    Ok(price)
}

fn parse_stop_loss(raw: &str) -> Result<f64, CoreError> {
    let price = parse_decimal("stop loss", raw)?;
    check_stop_loss(price)?;
    Ok(price)
}

/// Split a comma-separated list of prices. Blank input → empty list.
fn parse_levels(field: &str, raw: &str) -> Result<Vec<f64>, CoreError> {
    if raw.trim().is_empty() {
        return Ok(Vec::new());
    }
    raw.split(',')
        .map(|part| parse_decimal(field, part.trim()))
        .collect()
}

fn check_quantity(quantity: u32) -> Result<(), CoreError> {
    if quantity == 0 {
        return Err(CoreError::ValidationError(
            "Quantity must be greater than zero".into(),
        ));
    }
    Ok(())
}

fn check_avg_price(price: f64) -> Result<(), CoreError> {
    if !price.is_finite() || price <= 0.0 {
        return Err(CoreError::ValidationError(format!(
            "Avg price must be a positive number, got {price}"
        )));
    }
    Ok(())
}

fn check_stop_loss(price: f64) -> Result<(), CoreError> {
    if !price.is_finite() || price < 0.0 {
        return Err(CoreError::ValidationError(format!(
            "Stop loss must be a non-negative number, got {price}"
        )));
    }
    Ok(())
}
