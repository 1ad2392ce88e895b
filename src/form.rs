//! Form session: the editable parameter set behind the preview.
//!
//! Holds the selector plus every variant's parameters so switching strategy
//! keeps earlier edits. The generated text is cached and only rebuilt when an
//! edit touched something the active template reads.

use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::errors::AppError;
use crate::models::config::{AppliedPrice, MaMethod, Timeframe};
use crate::models::strategy::*;
use crate::utils::codegen::{self, CodeFile};
use crate::utils::coerce::{coerce_bool, coerce_decimal, coerce_int};

/// Every editable input of the form, addressable by its dotted key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FormField {
    Strategy,
    Symbol,
    Timeframe,
    UseRiskPercent,
    LotSize,
    RiskPercent,
    StopLossPoints,
    TakeProfitPoints,
    MagicNumber,
    EaName,
    Comment,
    MaFast,
    MaSlow,
    MaMethod,
    MaPrice,
    RsiPeriod,
    RsiOverbought,
    RsiOversold,
    MacdFast,
    MacdSlow,
    MacdSignal,
}

impl FormField {
    pub const ALL: [FormField; 21] = [
        FormField::Strategy,
        FormField::Symbol,
        FormField::Timeframe,
        FormField::UseRiskPercent,
        FormField::LotSize,
        FormField::RiskPercent,
        FormField::StopLossPoints,
        FormField::TakeProfitPoints,
        FormField::MagicNumber,
        FormField::EaName,
        FormField::Comment,
        FormField::MaFast,
        FormField::MaSlow,
        FormField::MaMethod,
        FormField::MaPrice,
        FormField::RsiPeriod,
        FormField::RsiOverbought,
        FormField::RsiOversold,
        FormField::MacdFast,
        FormField::MacdSlow,
        FormField::MacdSignal,
    ];

    pub fn key(&self) -> &'static str {
        match self {
            FormField::Strategy => "strategy",
            FormField::Symbol => "symbol",
            FormField::Timeframe => "timeframe",
            FormField::UseRiskPercent => "use_risk_percent",
            FormField::LotSize => "lot_size",
            FormField::RiskPercent => "risk_percent",
            FormField::StopLossPoints => "stop_loss_points",
            FormField::TakeProfitPoints => "take_profit_points",
            FormField::MagicNumber => "magic_number",
            FormField::EaName => "ea_name",
            FormField::Comment => "comment",
            FormField::MaFast => "ma.fast",
            FormField::MaSlow => "ma.slow",
            FormField::MaMethod => "ma.method",
            FormField::MaPrice => "ma.price",
            FormField::RsiPeriod => "rsi.period",
            FormField::RsiOverbought => "rsi.overbought",
            FormField::RsiOversold => "rsi.oversold",
            FormField::MacdFast => "macd.fast",
            FormField::MacdSlow => "macd.slow",
            FormField::MacdSignal => "macd.signal",
        }
    }

    /// The strategy whose template reads this field; `None` for shared fields.
    pub fn strategy_scope(&self) -> Option<StrategyKind> {
        match self {
            FormField::MaFast | FormField::MaSlow | FormField::MaMethod | FormField::MaPrice => {
                Some(StrategyKind::MaCrossover)
            }
            FormField::RsiPeriod | FormField::RsiOverbought | FormField::RsiOversold => {
                Some(StrategyKind::Rsi)
            }
            FormField::MacdFast | FormField::MacdSlow | FormField::MacdSignal => {
                Some(StrategyKind::Macd)
            }
            _ => None,
        }
    }
}

impl FromStr for FormField {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key = s.trim().to_lowercase();
        FormField::ALL
            .into_iter()
            .find(|f| f.key() == key)
            .ok_or_else(|| AppError::UnknownField(s.to_string()))
    }
}

/// In-memory form state. Created with defaults, mutated per edit, never persisted.
///
/// Fields are only writable through the setters below so the cached preview
/// cannot drift from the parameters.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct EaForm {
    strategy: StrategyKind,
    common: CommonParams,
    ma: MaParams,
    rsi: RsiParams,
    macd: MacdParams,

    #[serde(skip)]
    preview: Option<String>,
    #[serde(skip)]
    recomputations: usize,
}

impl EaForm {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load a form from JSON; missing keys keep their defaults.
    pub fn from_json(json: &str) -> Result<Self, AppError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn to_json(&self) -> Result<String, AppError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn strategy(&self) -> StrategyKind {
        self.strategy
    }

    pub fn common(&self) -> &CommonParams {
        &self.common
    }

    pub fn ma(&self) -> &MaParams {
        &self.ma
    }

    pub fn rsi(&self) -> &RsiParams {
        &self.rsi
    }

    pub fn macd(&self) -> &MacdParams {
        &self.macd
    }

    /// Parameters of the selected strategy as a tagged variant.
    pub fn active_params(&self) -> StrategyParams {
        match self.strategy {
            StrategyKind::MaCrossover => StrategyParams::MaCrossover(self.ma),
            StrategyKind::Rsi => StrategyParams::Rsi(self.rsi),
            StrategyKind::Macd => StrategyParams::Macd(self.macd),
        }
    }

    pub fn select_strategy(&mut self, kind: StrategyKind) {
        if self.strategy != kind {
            self.strategy = kind;
            self.invalidate();
        }
    }

    /// Edit the common parameters in place.
    pub fn update_common(&mut self, edit: impl FnOnce(&mut CommonParams)) {
        edit(&mut self.common);
        self.invalidate();
    }

    /// Apply one text edit, coercing numbers the lenient way.
    ///
    /// Only enumerated fields can fail, on an unknown token.
    pub fn set_field(&mut self, field: FormField, value: &str) -> Result<(), AppError> {
        match field {
            FormField::Strategy => {
                let kind = value.parse::<StrategyKind>().map_err(AppError::InvalidParams)?;
                self.select_strategy(kind);
                return Ok(());
            }
            FormField::Symbol => self.common.symbol = value.to_string(),
            FormField::Timeframe => {
                self.common.timeframe = value.parse::<Timeframe>().map_err(AppError::InvalidParams)?
            }
            FormField::UseRiskPercent => self.common.use_risk_percent = coerce_bool(value),
            FormField::LotSize => self.common.lot_size = coerce_decimal(value),
            FormField::RiskPercent => self.common.risk_percent = coerce_decimal(value),
            FormField::StopLossPoints => self.common.stop_loss_points = coerce_int(value),
            FormField::TakeProfitPoints => self.common.take_profit_points = coerce_int(value),
            FormField::MagicNumber => self.common.magic_number = coerce_int(value),
            FormField::EaName => self.common.ea_name = value.to_string(),
            FormField::Comment => self.common.comment = value.to_string(),
            FormField::MaFast => self.ma.fast = coerce_int(value),
            FormField::MaSlow => self.ma.slow = coerce_int(value),
            FormField::MaMethod => self.ma.method = value.parse::<MaMethod>().map_err(AppError::InvalidParams)?,
            FormField::MaPrice => self.ma.price = value.parse::<AppliedPrice>().map_err(AppError::InvalidParams)?,
            FormField::RsiPeriod => self.rsi.period = coerce_int(value),
            FormField::RsiOverbought => self.rsi.overbought = coerce_int(value),
            FormField::RsiOversold => self.rsi.oversold = coerce_int(value),
            FormField::MacdFast => self.macd.fast = coerce_int(value),
            FormField::MacdSlow => self.macd.slow = coerce_int(value),
            FormField::MacdSignal => self.macd.signal = coerce_int(value),
        }

        match field.strategy_scope() {
            Some(kind) if kind != self.strategy => {
                debug!("{} edited while {} is active, preview kept", field.key(), self.strategy);
            }
            _ => self.invalidate(),
        }
        Ok(())
    }

    /// Apply a `key=value` assignment.
    pub fn apply_assignment(&mut self, assignment: &str) -> Result<(), AppError> {
        let (key, value) = assignment.split_once('=').ok_or_else(|| {
            AppError::InvalidParams(format!("Expected key=value, got '{}'", assignment))
        })?;
        let field: FormField = key.parse()?;
        self.set_field(field, value)
    }

    /// Current generated text, recomposed only if stale.
    pub fn preview(&mut self) -> &str {
        if self.preview.is_none() {
            self.recomputations += 1;
            debug!("Composing {} EA (recompute #{})", self.strategy, self.recomputations);
            let code = codegen::compose(&self.common, &self.active_params());
            self.preview = Some(code);
        }
        self.preview.as_deref().unwrap_or_default()
    }

    /// File name and text for download.
    pub fn code_file(&mut self) -> CodeFile {
        let code = self.preview().to_string();
        CodeFile {
            filename: codegen::output_filename(&self.common),
            code,
        }
    }

    /// How many times the preview has been composed.
    pub fn recomputations(&self) -> usize {
        self.recomputations
    }

    fn invalidate(&mut self) {
        self.preview = None;
    }
}
