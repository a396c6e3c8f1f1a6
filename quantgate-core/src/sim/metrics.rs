//! Performance metrics — pure functions over trades and the equity curve.
//!
//! Every metric is a pure function: trade list and/or capital series in,
//! scalar out. Zero-trade input yields a well-defined neutral result.

use serde::{Deserialize, Serialize};

use crate::domain::Trade;

/// Aggregate performance summary for a single simulation run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PerformanceMetrics {
    /// Total return in percent of initial capital.
    pub total_return_pct: f64,
    /// Mean trade return / std of trade returns, scaled by the
    /// annualization factor for the bar frequency.
    pub sharpe_ratio: f64,
    /// Peak-to-trough decline on the equity curve, in percent (<= 0).
    pub max_drawdown_pct: f64,
    pub final_capital: f64,
    pub num_trades: usize,
    pub win_rate: f64,
}

impl PerformanceMetrics {
    /// Compute all metrics from a trade list and capital series.
    pub fn compute(
        trades: &[Trade],
        capitals: &[f64],
        initial_capital: f64,
        annualization_factor: f64,
    ) -> Self {
        if trades.is_empty() {
            return Self::neutral(initial_capital);
        }
        let returns: Vec<f64> = trades.iter().map(|t| t.pnl_pct).collect();
        Self {
            total_return_pct: total_return(capitals) * 100.0,
            sharpe_ratio: sharpe_ratio(&returns, annualization_factor),
            max_drawdown_pct: max_drawdown(capitals) * 100.0,
            final_capital: capitals.last().copied().unwrap_or(initial_capital),
            num_trades: trades.len(),
            win_rate: win_rate(trades),
        }
    }

    /// The zero-trade result: flat return, zero Sharpe, zero drawdown.
    pub fn neutral(initial_capital: f64) -> Self {
        Self {
            total_return_pct: 0.0,
            sharpe_ratio: 0.0,
            max_drawdown_pct: 0.0,
            final_capital: initial_capital,
            num_trades: 0,
            win_rate: 0.0,
        }
    }
}

// ─── Individual metric functions ────────────────────────────────────

/// Total return as a fraction: (final - initial) / initial.
pub fn total_return(capitals: &[f64]) -> f64 {
    if capitals.len() < 2 {
        return 0.0;
    }
    let initial = capitals[0];
    let final_cap = *capitals.last().unwrap();
    if initial <= 0.0 {
        return 0.0;
    }
    (final_cap - initial) / initial
}

/// Sharpe-like ratio over per-trade returns.
///
/// mean(returns) / std(returns) · annualization. Returns 0.0 for fewer than
/// two trades or zero variance — never a division error.
pub fn sharpe_ratio(trade_returns: &[f64], annualization_factor: f64) -> f64 {
    if trade_returns.len() < 2 {
        return 0.0;
    }
    let mean = mean_f64(trade_returns);
    let std = std_dev(trade_returns);
    if std < 1e-15 {
        return 0.0;
    }
    (mean / std) * annualization_factor
}

/// Maximum drawdown as a negative fraction (e.g. -0.15 = 15% drawdown).
pub fn max_drawdown(capitals: &[f64]) -> f64 {
    if capitals.len() < 2 {
        return 0.0;
    }
    let mut peak = capitals[0];
    let mut max_dd = 0.0_f64;

    for &cap in capitals {
        if cap > peak {
            peak = cap;
        }
        if peak > 0.0 {
            let dd = (cap - peak) / peak;
            if dd < max_dd {
                max_dd = dd;
            }
        }
    }
    max_dd
}

/// Fraction of trades that closed with positive P&L.
pub fn win_rate(trades: &[Trade]) -> f64 {
    if trades.is_empty() {
        return 0.0;
    }
    let winners = trades.iter().filter(|t| t.is_winner()).count();
    winners as f64 / trades.len() as f64
}

// ─── Helpers ────────────────────────────────────────────────────────

pub(crate) fn mean_f64(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

pub(crate) fn std_dev(values: &[f64]) -> f64 {
    if values.len() < 2 {
        return 0.0;
    }
    let mean = mean_f64(values);
    let variance =
        values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / (values.len() - 1) as f64;
    variance.sqrt()
}
