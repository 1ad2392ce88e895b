use std::fmt::Write as FmtWrite;
use std::fs;
use std::path::{Path, PathBuf};

use tracing::{info, warn};

use crate::errors::AppError;
use crate::form::EaForm;
use crate::models::config::{AppliedPrice, MaMethod, Timeframe};
use crate::models::strategy::StrategyKind;
use crate::utils::clipboard::ClipboardSink;
use crate::utils::codegen::CodeFile;
use crate::utils::export;
use crate::utils::lint::{self, LintWarning};

// ── Form Commands ──

/// Build the form for one invocation: defaults, then the JSON file, then the
/// strategy override, then each `key=value` edit in order.
pub fn load_form(
    params_path: Option<&Path>,
    strategy: Option<StrategyKind>,
    assignments: &[String],
) -> Result<EaForm, AppError> {
    let mut form = match params_path {
        Some(path) => {
            let json = fs::read_to_string(path)
                .map_err(|e| AppError::FileRead(format!("{}: {}", path.display(), e)))?;
            let form = EaForm::from_json(&json)?;
            info!("Loaded parameters from {}", path.display());
            form
        }
        None => EaForm::new(),
    };

    if let Some(kind) = strategy {
        form.select_strategy(kind);
    }
    for assignment in assignments {
        form.apply_assignment(assignment)?;
    }
    Ok(form)
}

/// Default form as pretty JSON, usable as a `--params` template.
pub fn defaults() -> Result<String, AppError> {
    EaForm::new().to_json()
}

/// Every selectable token, grouped by selector.
pub fn options() -> String {
    let mut out = String::new();

    writeln!(out, "strategies:").ok();
    for kind in StrategyKind::ALL {
        writeln!(out, "  {:<14} {}", kind.as_str(), kind.label()).ok();
    }
    writeln!(out, "timeframes:").ok();
    for tf in Timeframe::ALL {
        writeln!(out, "  {:<14} {}", tf.as_mql5(), tf.label()).ok();
    }
    writeln!(out, "ma methods:").ok();
    for method in MaMethod::ALL {
        writeln!(out, "  {:<14} {}", method.as_mql5(), method.label()).ok();
    }
    writeln!(out, "applied prices:").ok();
    for price in AppliedPrice::ALL {
        writeln!(out, "  {:<14} {}", price.as_mql5(), price.label()).ok();
    }
    out
}

// ── Output Commands ──

/// The generated file (name + text) for the current form.
pub fn preview(form: &mut EaForm) -> CodeFile {
    let file = form.code_file();
    info!("Generated {} ({} bytes, strategy={})", file.filename, file.code.len(), form.strategy());
    file
}

/// Copy the generated text. One attempt, no retry.
pub fn copy(form: &mut EaForm, clipboard: &mut dyn ClipboardSink) -> Result<(), AppError> {
    let code = form.preview().to_string();
    clipboard.write_text(&code)
}

/// Save `<ea_name>.mq5` into `dir`.
pub fn download(form: &mut EaForm, dir: &Path) -> Result<PathBuf, AppError> {
    let file = form.code_file();
    export::write_code_file(&file, dir)
}

/// Advisory warnings for the current form; each is also logged.
pub fn lint(form: &EaForm) -> Vec<LintWarning> {
    let warnings = lint::check(form);
    for w in &warnings {
        warn!("{}", w);
    }
    warnings
}
