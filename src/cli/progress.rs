//! Progress feedback for long-running commands
//!
//! - TTY: an indicatif bar on stderr
//! - non-TTY: one line per update on stderr
//! - `--json`: JSON progress events on stderr, stdout stays parseable
//! - `--quiet`: nothing

use std::io::IsTerminal;

use chrono::Utc;
use indicatif::{ProgressBar, ProgressStyle};
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProgressMode {
    Tty,
    NonTty,
    Json,
    Quiet,
}

impl ProgressMode {
    #[must_use]
    pub fn detect(json: bool, quiet: bool) -> Self {
        if quiet {
            Self::Quiet
        } else if json {
            Self::Json
        } else if std::io::stderr().is_terminal() {
            Self::Tty
        } else {
            Self::NonTty
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ProgressEventType {
    Start,
    Update,
    Complete,
}

#[derive(Debug, Clone, Serialize)]
pub struct ProgressEvent<'a> {
    #[serde(rename = "type")]
    pub event_type: &'static str,
    pub event: ProgressEventType,
    pub operation: &'a str,
    pub current: u64,
    pub total: u64,
    pub timestamp: String,
}

impl<'a> ProgressEvent<'a> {
    fn new(event: ProgressEventType, operation: &'a str, current: u64, total: u64) -> Self {
        Self {
            event_type: "progress",
            event,
            operation,
            current,
            total,
            timestamp: Utc::now().to_rfc3339(),
        }
    }

    fn emit(&self) {
        if let Ok(line) = serde_json::to_string(self) {
            eprintln!("{line}");
        }
    }
}

/// A determinate progress indicator in whichever mode applies
pub enum ProgressHandle {
    Noop,
    Json { operation: String, total: u64 },
    Lines { operation: String, total: u64 },
    Tty(ProgressBar),
}

impl ProgressHandle {
    pub fn start(mode: ProgressMode, total: u64, operation: &str) -> Self {
        match mode {
            ProgressMode::Quiet => Self::Noop,
            ProgressMode::Json => {
                ProgressEvent::new(ProgressEventType::Start, operation, 0, total).emit();
                Self::Json {
                    operation: operation.to_string(),
                    total,
                }
            }
            ProgressMode::NonTty => {
                eprintln!("[skillmart] {operation} (0/{total})");
                Self::Lines {
                    operation: operation.to_string(),
                    total,
                }
            }
            ProgressMode::Tty => {
                let pb = ProgressBar::new(total);
                if let Ok(style) = ProgressStyle::default_bar()
                    .template("{spinner:.cyan} {msg} [{bar:40.cyan/blue}] {pos}/{len} ({eta})")
                {
                    pb.set_style(style.progress_chars("█▓▒░"));
                }
                pb.set_message(operation.to_string());
                Self::Tty(pb)
            }
        }
    }

    pub fn set_position(&self, pos: u64) {
        match self {
            Self::Noop => {}
            Self::Json { operation, total } => {
                ProgressEvent::new(ProgressEventType::Update, operation, pos, *total).emit();
            }
            Self::Lines { operation, total } => eprintln!("[skillmart] {operation} ({pos}/{total})"),
            Self::Tty(pb) => pb.set_position(pos),
        }
    }

    pub fn finish_with_message(&self, msg: &str) {
        match self {
            Self::Noop => {}
            Self::Json { operation, total } => {
                ProgressEvent::new(ProgressEventType::Complete, operation, *total, *total).emit();
            }
            Self::Lines { .. } => eprintln!("[skillmart] {msg}"),
            Self::Tty(pb) => pb.finish_with_message(msg.to_string()),
        }
    }
}
