//! CSV artifact export: trade tape, equity curve, label series.

use std::path::Path;

use thiserror::Error;

use crate::domain::{EquityPoint, Label, Side, Trade};

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("csv write failed: {0}")]
    Csv(#[from] csv::Error),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// Write the trade tape to CSV, one row per closed trade.
pub fn write_trades_csv(path: &Path, trades: &[Trade]) -> Result<(), ExportError> {
    let mut writer = csv::Writer::from_path(path)?;
    writer.write_record([
        "entry_time",
        "exit_time",
        "side",
        "entry_price",
        "exit_price",
        "exit_reason",
        "pnl_pct",
        "pnl",
        "notional",
        "bars_held",
    ])?;

    for trade in trades {
        let side = match trade.side {
            Side::Long => "LONG",
            Side::Short => "SHORT",
        };
        writer.write_record([
            trade.entry_time.to_rfc3339(),
            trade.exit_time.to_rfc3339(),
            side.to_string(),
            format!("{:.6}", trade.entry_price),
            format!("{:.6}", trade.exit_price),
            format!("{:?}", trade.exit_reason).to_uppercase(),
            format!("{:.6}", trade.pnl_pct),
            format!("{:.2}", trade.pnl),
            format!("{:.2}", trade.notional),
            trade.bars_held.to_string(),
        ])?;
    }
    writer.flush()?;
    Ok(())
}

/// Write the equity curve to CSV.
pub fn write_equity_csv(path: &Path, points: &[EquityPoint]) -> Result<(), ExportError> {
    let mut writer = csv::Writer::from_path(path)?;
    writer.write_record(["timestamp", "capital"])?;
    for point in points {
        writer.write_record([point.timestamp.to_rfc3339(), format!("{:.2}", point.capital)])?;
    }
    writer.flush()?;
    Ok(())
}

/// Write a label series to CSV — the training-set artifact.
pub fn write_labels_csv(path: &Path, labels: &[Label]) -> Result<(), ExportError> {
    let mut writer = csv::Writer::from_path(path)?;
    writer.write_record(["timestamp", "label"])?;
    for label in labels {
        writer.write_record([label.timestamp.to_rfc3339(), label.value.to_string()])?;
    }
    writer.flush()?;
    Ok(())
}
