//! Event-driven single-position simulator.
//!
//! State machine over a bar series: FLAT until an entry mark fires, then
//! IN_POSITION until stop, target, or the holding horizon closes the trade.
//! Exactly one position is open at any time within a run.
//!
//! The stop-before-target check order within a bar is a modeling assumption:
//! true intrabar sequencing is unknowable from OHLC alone, so the engine
//! resolves ambiguous bars against the position.

use serde::{Deserialize, Serialize};

use chrono::{DateTime, Utc};

use crate::config::{ConfigError, RunId, SimConfig};
use crate::domain::{Bar, EquityCurve, ExitReason, Side, Trade};
use crate::sim::costs::CostModel;
use crate::sim::metrics::PerformanceMetrics;
use crate::sizing::RiskSizer;

/// Per-bar entry signal, aligned 1:1 with the bar series.
///
/// A mark on bar `i` executes at bar `i+1`'s open (one-bar lag, preventing
/// lookahead). Long and short on the same bar cancel each other out.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct EntryMark {
    pub long: bool,
    pub short: bool,
}

impl EntryMark {
    pub fn long() -> Self {
        Self {
            long: true,
            short: false,
        }
    }

    pub fn short() -> Self {
        Self {
            long: false,
            short: true,
        }
    }

    pub fn none() -> Self {
        Self::default()
    }

    /// The effective entry direction after conflict suppression.
    fn direction(&self) -> Option<Side> {
        match (self.long, self.short) {
            (true, false) => Some(Side::Long),
            (false, true) => Some(Side::Short),
            _ => None, // nothing, or conflicting marks suppressed
        }
    }
}

/// Complete output of a simulation run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimResult {
    pub run_id: RunId,
    pub trades: Vec<Trade>,
    pub equity_curve: EquityCurve,
    pub metrics: PerformanceMetrics,
}

#[derive(Debug)]
struct OpenPosition {
    side: Side,
    entry_index: usize,
    entry_time: DateTime<Utc>,
    entry_price: f64,
    stop_price: f64,
    target_price: f64,
    notional: f64,
}

/// Replays a bar series plus entry marks into trades and an equity curve.
pub struct PositionSimulator {
    config: SimConfig,
    costs: CostModel,
    sizer: RiskSizer,
}

impl PositionSimulator {
    /// Build a simulator, validating the configuration up front.
    pub fn new(config: SimConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        let sizer = RiskSizer::new(config.risk_per_trade_fraction)
            .map_err(|_| ConfigError::InvalidRiskFraction(config.risk_per_trade_fraction))?;
        let costs = CostModel::new(config.slippage_pct, config.commission_pct);
        Ok(Self {
            config,
            costs,
            sizer,
        })
    }

    pub fn config(&self) -> &SimConfig {
        &self.config
    }

    /// Run the simulation.
    ///
    /// Empty bars, a signal series of mismatched length, or zero entry marks
    /// all yield a neutral result (no trades, flat equity, zero metrics) —
    /// never an error.
    pub fn run(&self, bars: &[Bar], signals: &[EntryMark]) -> SimResult {
        if bars.is_empty() || signals.len() != bars.len() {
            return self.neutral_result();
        }

        let mut equity = self.config.initial_capital;
        let mut curve = EquityCurve::with_initial(bars[0].timestamp, equity);
        let mut trades: Vec<Trade> = Vec::new();

        let mut position: Option<OpenPosition> = None;
        // Direction signaled on the previous bar, due for execution at this
        // bar's open.
        let mut pending: Option<Side> = None;

        for (i, bar) in bars.iter().enumerate() {
            // 1. Exit checks for the open position (subsequent bars only).
            if let Some(pos) = position.as_ref() {
                if i > pos.entry_index {
                    if let Some((exit_price, reason)) = self.check_exit(pos, bar, i) {
                        let trade = self.close_position(pos, bar, exit_price, reason, i);
                        equity += trade.pnl;
                        curve.push(bar.timestamp, equity);
                        trades.push(trade);
                        position = None;
                    }
                }
            }

            // 2. Entry due from the previous bar's mark.
            if position.is_none() {
                if let Some(side) = pending {
                    position = self.open_position(side, bar, i, equity);
                }
            }
            pending = signals[i].direction();
        }

        // An open position at the end of the series stays open: it produced
        // no realized trade and the equity curve does not mark it to market.

        let metrics = PerformanceMetrics::compute(
            &trades,
            &curve.capitals(),
            self.config.initial_capital,
            self.config.annualization_factor,
        );

        SimResult {
            run_id: self.config.run_id(),
            trades,
            equity_curve: curve,
            metrics,
        }
    }

    fn open_position(
        &self,
        side: Side,
        bar: &Bar,
        index: usize,
        equity: f64,
    ) -> Option<OpenPosition> {
        let raw_entry = bar.open;
        if !(raw_entry > 0.0) {
            return None;
        }

        // Stop distance is a fraction of entry, so the sizer yields a dollar
        // notional. No size ⇒ no trade.
        let notional = self
            .sizer
            .position_size(equity, self.config.stop_loss_pct)?;

        let (stop_price, target_price) = match side {
            Side::Long => (
                raw_entry * (1.0 - self.config.stop_loss_pct),
                raw_entry * (1.0 + self.config.take_profit_pct),
            ),
            Side::Short => (
                raw_entry * (1.0 + self.config.stop_loss_pct),
                raw_entry * (1.0 - self.config.take_profit_pct),
            ),
        };

        Some(OpenPosition {
            side,
            entry_index: index,
            entry_time: bar.timestamp,
            entry_price: self.costs.entry_price(raw_entry, side),
            stop_price,
            target_price,
            notional,
        })
    }

    /// Fixed intra-bar resolution order: stop first, then target, then the
    /// time exit once the holding horizon is reached.
    fn check_exit(&self, pos: &OpenPosition, bar: &Bar, index: usize) -> Option<(f64, ExitReason)> {
        match pos.side {
            Side::Long => {
                if bar.low <= pos.stop_price {
                    return Some((
                        self.costs.stop_exit_price(pos.stop_price, pos.side),
                        ExitReason::Stop,
                    ));
                }
                if bar.high >= pos.target_price {
                    return Some((pos.target_price, ExitReason::Target));
                }
            }
            Side::Short => {
                if bar.high >= pos.stop_price {
                    return Some((
                        self.costs.stop_exit_price(pos.stop_price, pos.side),
                        ExitReason::Stop,
                    ));
                }
                if bar.low <= pos.target_price {
                    return Some((pos.target_price, ExitReason::Target));
                }
            }
        }

        if index - pos.entry_index >= self.config.max_holding_bars {
            return Some((bar.close, ExitReason::Time));
        }
        None
    }

    fn close_position(
        &self,
        pos: &OpenPosition,
        bar: &Bar,
        exit_price: f64,
        reason: ExitReason,
        index: usize,
    ) -> Trade {
        let pnl_pct = match pos.side {
            Side::Long => (exit_price - pos.entry_price) / pos.entry_price,
            Side::Short => (pos.entry_price - exit_price) / pos.entry_price,
        };

        Trade {
            side: pos.side,
            entry_time: pos.entry_time,
            entry_price: pos.entry_price,
            exit_time: bar.timestamp,
            exit_price,
            exit_reason: reason,
            pnl_pct,
            pnl: pnl_pct * pos.notional,
            notional: pos.notional,
            bars_held: index - pos.entry_index,
        }
    }

    fn neutral_result(&self) -> SimResult {
        SimResult {
            run_id: self.config.run_id(),
            trades: Vec::new(),
            equity_curve: EquityCurve::new(),
            metrics: PerformanceMetrics::neutral(self.config.initial_capital),
        }
    }
}
