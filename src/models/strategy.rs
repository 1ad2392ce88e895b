use serde::{Deserialize, Serialize};

use super::config::{AppliedPrice, MaMethod, Timeframe};

/// File name stem used when the EA name is left empty.
pub const DEFAULT_EA_NAME: &str = "EA_Gerado";

// ── Strategy selector ──

/// Which of the three signal strategies is active.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum StrategyKind {
    #[default]
    MaCrossover,
    Rsi,
    Macd,
}

impl StrategyKind {
    pub const ALL: [StrategyKind; 3] = [StrategyKind::MaCrossover, StrategyKind::Rsi, StrategyKind::Macd];

    pub fn as_str(&self) -> &'static str {
        match self {
            StrategyKind::MaCrossover => "ma_crossover",
            StrategyKind::Rsi => "rsi",
            StrategyKind::Macd => "macd",
        }
    }

    /// Human-readable name shown in the selector.
    pub fn label(&self) -> &'static str {
        match self {
            StrategyKind::MaCrossover => "Moving average crossover",
            StrategyKind::Rsi => "RSI overbought/oversold",
            StrategyKind::Macd => "MACD main/signal crossover",
        }
    }
}

impl std::fmt::Display for StrategyKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for StrategyKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "ma_crossover" | "ma" => Ok(StrategyKind::MaCrossover),
            "rsi" => Ok(StrategyKind::Rsi),
            "macd" => Ok(StrategyKind::Macd),
            _ => Err(format!("Unknown strategy: {}", s)),
        }
    }
}

// ── Variant parameters ──

/// Two moving averages on the same price series.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MaParams {
    pub fast: i64,
    pub slow: i64,
    pub method: MaMethod,
    pub price: AppliedPrice,
}

impl Default for MaParams {
    fn default() -> Self {
        Self {
            fast: 9,
            slow: 21,
            method: MaMethod::Ema,
            price: AppliedPrice::Close,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RsiParams {
    pub period: i64,
    pub overbought: i64,
    pub oversold: i64,
}

impl Default for RsiParams {
    fn default() -> Self {
        Self { period: 14, overbought: 70, oversold: 30 }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MacdParams {
    pub fast: i64,
    pub slow: i64,
    pub signal: i64,
}

impl Default for MacdParams {
    fn default() -> Self {
        Self { fast: 12, slow: 26, signal: 9 }
    }
}

/// Parameters of the active strategy. The variant is the strategy tag.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "strategy", rename_all = "snake_case")]
pub enum StrategyParams {
    MaCrossover(MaParams),
    Rsi(RsiParams),
    Macd(MacdParams),
}

impl StrategyParams {
    pub fn kind(&self) -> StrategyKind {
        match self {
            StrategyParams::MaCrossover(_) => StrategyKind::MaCrossover,
            StrategyParams::Rsi(_) => StrategyKind::Rsi,
            StrategyParams::Macd(_) => StrategyKind::Macd,
        }
    }
}

// ── Common parameters ──

/// Instrument, sizing and order settings shared by every strategy.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CommonParams {
    pub symbol: String,
    pub timeframe: Timeframe,
    /// Size from a % of balance instead of a fixed lot.
    pub use_risk_percent: bool,
    pub lot_size: f64,
    /// % of balance risked per trade
    pub risk_percent: f64,
    pub stop_loss_points: i64,
    pub take_profit_points: i64,
    pub magic_number: i64,
    /// Output file stem; empty falls back to [`DEFAULT_EA_NAME`].
    pub ea_name: String,
    /// Embedded in the header and in every order comment.
    pub comment: String,
}

impl Default for CommonParams {
    fn default() -> Self {
        Self {
            symbol: "EURUSD".to_string(),
            timeframe: Timeframe::H1,
            use_risk_percent: false,
            lot_size: 0.10,
            risk_percent: 1.0,
            stop_loss_points: 300,
            take_profit_points: 600,
            magic_number: 123456,
            ea_name: DEFAULT_EA_NAME.to_string(),
            comment: "EA Gerado pelo MT5 EA Builder".to_string(),
        }
    }
}
