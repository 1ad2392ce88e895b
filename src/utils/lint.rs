//! Advisory checks on a parameter set.
//!
//! Generation never rejects input; these warnings only point out values the
//! generated EA is unlikely to trade sensibly with. Output is unaffected.

use std::fmt;

use crate::form::EaForm;
use crate::models::strategy::{StrategyKind, DEFAULT_EA_NAME};

/// A single advisory finding.
#[derive(Debug, Clone, PartialEq)]
pub struct LintWarning {
    pub category: LintCategory,
    pub message: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LintCategory {
    Period,
    Crossover,
    Threshold,
    Sizing,
    Naming,
}

impl fmt::Display for LintCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LintCategory::Period => write!(f, "period"),
            LintCategory::Crossover => write!(f, "crossover"),
            LintCategory::Threshold => write!(f, "threshold"),
            LintCategory::Sizing => write!(f, "sizing"),
            LintCategory::Naming => write!(f, "naming"),
        }
    }
}

impl fmt::Display for LintWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.category, self.message)
    }
}

/// Run all checks against the active strategy and the common parameters.
pub fn check(form: &EaForm) -> Vec<LintWarning> {
    let mut warnings = Vec::new();
    check_strategy(form, &mut warnings);
    check_sizing(form, &mut warnings);
    check_naming(form, &mut warnings);
    warnings
}

fn warn(warnings: &mut Vec<LintWarning>, category: LintCategory, message: String) {
    warnings.push(LintWarning { category, message });
}

fn check_periods(periods: &[(&str, i64)], warnings: &mut Vec<LintWarning>) {
    for (name, value) in periods {
        if *value <= 0 {
            warn(warnings, LintCategory::Period, format!("{} period must be positive, got {}", name, value));
        }
    }
}

fn check_strategy(form: &EaForm, warnings: &mut Vec<LintWarning>) {
    match form.strategy() {
        StrategyKind::MaCrossover => {
            let ma = form.ma();
            check_periods(&[("MA fast", ma.fast), ("MA slow", ma.slow)], warnings);
            if ma.fast >= ma.slow {
                warn(
                    warnings,
                    LintCategory::Crossover,
                    format!("MA fast period ({}) is not below slow period ({})", ma.fast, ma.slow),
                );
            }
        }
        StrategyKind::Rsi => {
            let rsi = form.rsi();
            check_periods(&[("RSI", rsi.period)], warnings);
            for (name, value) in [("overbought", rsi.overbought), ("oversold", rsi.oversold)] {
                if !(0..=100).contains(&value) {
                    warn(
                        warnings,
                        LintCategory::Threshold,
                        format!("RSI {} level {} is outside 0-100", name, value),
                    );
                }
            }
            if rsi.oversold >= rsi.overbought {
                warn(
                    warnings,
                    LintCategory::Threshold,
                    format!(
                        "RSI oversold ({}) is not below overbought ({})",
                        rsi.oversold, rsi.overbought
                    ),
                );
            }
        }
        StrategyKind::Macd => {
            let macd = form.macd();
            check_periods(
                &[("MACD fast", macd.fast), ("MACD slow", macd.slow), ("MACD signal", macd.signal)],
                warnings,
            );
            if macd.fast >= macd.slow {
                warn(
                    warnings,
                    LintCategory::Crossover,
                    format!("MACD fast period ({}) is not below slow period ({})", macd.fast, macd.slow),
                );
            }
        }
    }
}

fn check_sizing(form: &EaForm, warnings: &mut Vec<LintWarning>) {
    let common = form.common();
    if common.use_risk_percent {
        if !(common.risk_percent > 0.0 && common.risk_percent <= 100.0) {
            warn(
                warnings,
                LintCategory::Sizing,
                format!("risk percent {} is outside (0, 100]", common.risk_percent),
            );
        }
        if common.stop_loss_points <= 0 {
            warn(
                warnings,
                LintCategory::Sizing,
                "risk sizing needs a positive stop loss; the EA falls back to 0.01 lots".to_string(),
            );
        }
    } else if !(common.lot_size > 0.0) {
        warn(
            warnings,
            LintCategory::Sizing,
            format!("fixed lot size {} is not positive", common.lot_size),
        );
    }
    if common.stop_loss_points < 0 || common.take_profit_points < 0 {
        warn(
            warnings,
            LintCategory::Sizing,
            "negative stop distances put SL/TP on the wrong side of entry".to_string(),
        );
    }
}

fn check_naming(form: &EaForm, warnings: &mut Vec<LintWarning>) {
    let common = form.common();
    if common.symbol.trim().is_empty() {
        warn(warnings, LintCategory::Naming, "symbol is empty".to_string());
    }
    if common.ea_name.is_empty() {
        warn(
            warnings,
            LintCategory::Naming,
            format!("EA name is empty; the file is saved as {}.mq5", DEFAULT_EA_NAME),
        );
    }
    if common.comment.contains('\n') || common.comment.contains('\\') {
        warn(
            warnings,
            LintCategory::Naming,
            "comment contains a newline or backslash, which is embedded unescaped".to_string(),
        );
    }
}
