//! Clipboard writes through the platform's clipboard tool.

use std::io::Write;
use std::process::{Command, Stdio};

use tracing::{debug, info};

use crate::errors::AppError;

/// Destination for copied text.
pub trait ClipboardSink {
    fn write_text(&mut self, text: &str) -> Result<(), AppError>;
}

/// Pipes text into the first clipboard tool that accepts it.
#[derive(Debug, Clone)]
pub struct SystemClipboard {
    candidates: Vec<(String, Vec<String>)>,
}

impl SystemClipboard {
    pub fn new() -> Self {
        Self::with_candidates(default_candidates())
    }

    /// Use an explicit list of `(program, args)` to try in order.
    pub fn with_candidates(candidates: Vec<(String, Vec<String>)>) -> Self {
        Self { candidates }
    }
}

impl Default for SystemClipboard {
    fn default() -> Self {
        Self::new()
    }
}

impl ClipboardSink for SystemClipboard {
    fn write_text(&mut self, text: &str) -> Result<(), AppError> {
        let mut failures = Vec::new();

        for (program, args) in &self.candidates {
            match pipe_to(program, args, text) {
                Ok(()) => {
                    info!("Copied {} bytes via {}", text.len(), program);
                    return Ok(());
                }
                Err(e) => {
                    debug!("Clipboard tool {} failed: {}", program, e);
                    failures.push(format!("{}: {}", program, e));
                }
            }
        }

        if failures.is_empty() {
            return Err(AppError::Clipboard("no clipboard tool configured".to_string()));
        }
        Err(AppError::Clipboard(failures.join("; ")))
    }
}

fn pipe_to(program: &str, args: &[String], text: &str) -> Result<(), String> {
    let mut child = Command::new(program)
        .args(args)
        .stdin(Stdio::piped())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .spawn()
        .map_err(|e| e.to_string())?;

    if let Some(mut stdin) = child.stdin.take() {
        if let Err(e) = stdin.write_all(text.as_bytes()) {
            // reap before reporting
            child.kill().ok();
            child.wait().ok();
            return Err(e.to_string());
        }
    }

    let status = child.wait().map_err(|e| e.to_string())?;
    if status.success() {
        Ok(())
    } else {
        Err(format!("exited with {}", status))
    }
}

fn default_candidates() -> Vec<(String, Vec<String>)> {
    let list: Vec<(&str, Vec<&str>)> = if cfg!(target_os = "macos") {
        vec![("pbcopy", vec![])]
    } else if cfg!(windows) {
        vec![("clip", vec![])]
    } else {
        vec![
            ("wl-copy", vec![]),
            ("xclip", vec!["-selection", "clipboard"]),
            ("xsel", vec!["--clipboard", "--input"]),
        ]
    };

    list.into_iter()
        .map(|(program, args)| {
            (program.to_string(), args.into_iter().map(String::from).collect())
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_tool_reports_clipboard_error() {
        let mut clipboard = SystemClipboard::with_candidates(vec![(
            "definitely-not-a-clipboard-tool-xyz".to_string(),
            vec![],
        )]);
        let err = clipboard.write_text("hello").unwrap_err();
        match err {
            AppError::Clipboard(msg) => assert!(msg.contains("definitely-not-a-clipboard-tool-xyz")),
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn test_no_candidates_is_an_error() {
        let mut clipboard = SystemClipboard::with_candidates(Vec::new());
        assert!(matches!(clipboard.write_text("x"), Err(AppError::Clipboard(_))));
    }

    #[cfg(unix)]
    #[test]
    fn test_first_working_tool_wins() {
        let mut clipboard = SystemClipboard::with_candidates(vec![
            ("definitely-not-a-clipboard-tool-xyz".to_string(), vec![]),
            ("cat".to_string(), vec![]),
        ]);
        assert!(clipboard.write_text("generated code").is_ok());
    }

    #[cfg(unix)]
    #[test]
    fn test_tool_that_closes_stdin_is_reaped_and_skipped() {
        // larger than any pipe buffer, so the write fails once `true` exits
        let text = "x".repeat(4 * 1024 * 1024);

        let mut only_true = SystemClipboard::with_candidates(vec![("true".to_string(), vec![])]);
        match only_true.write_text(&text) {
            Err(AppError::Clipboard(msg)) => assert!(msg.starts_with("true: ")),
            other => panic!("unexpected result: {:?}", other),
        }

        let mut fallback = SystemClipboard::with_candidates(vec![
            ("true".to_string(), vec![]),
            ("cat".to_string(), vec![]),
        ]);
        assert!(fallback.write_text(&text).is_ok());
    }
}
