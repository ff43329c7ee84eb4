use colored::Colorize;
use serde::Serialize;

use crate::error::{Result, SmError, StructuredError};

/// Envelope for every `--json` payload written to stdout
#[derive(Serialize)]
pub struct JsonResponse<T> {
    pub status: JsonStatus,
    pub version: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<StructuredError>,
}

#[derive(Serialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum JsonStatus {
    Ok,
    Error,
}

pub fn json_ok<T: Serialize>(data: T) -> JsonResponse<T> {
    JsonResponse {
        status: JsonStatus::Ok,
        version: env!("CARGO_PKG_VERSION"),
        data: Some(data),
        error: None,
    }
}

pub fn json_error(err: &SmError) -> JsonResponse<()> {
    JsonResponse {
        status: JsonStatus::Error,
        version: env!("CARGO_PKG_VERSION"),
        data: None,
        error: Some(err.to_structured()),
    }
}

pub fn emit_json<T: Serialize>(value: &T) -> Result<()> {
    let payload = serde_json::to_string_pretty(value)
        .map_err(|err| SmError::Serialization(format!("serialize output: {err}")))?;
    println!("{payload}");
    Ok(())
}

/// Write `data` wrapped in an ok envelope
pub fn emit_ok<T: Serialize>(data: T) -> Result<()> {
    emit_json(&json_ok(data))
}

/// Report a failed command on the channel the user asked for.
pub fn emit_error(err: &SmError, json: bool) {
    if json {
        match serde_json::to_string_pretty(&json_error(err)) {
            Ok(payload) => println!("{payload}"),
            Err(_) => eprintln!("Error: {err}"),
        }
    } else {
        let structured = err.to_structured();
        eprintln!("{} {err}", "Error:".red().bold());
        if !structured.suggestion.is_empty() {
            eprintln!("  {} {}", "hint:".dimmed(), structured.suggestion);
        }
    }
}

/// Aligned key/value block for human output
pub struct HumanLayout {
    lines: Vec<String>,
    key_width: usize,
}

impl Default for HumanLayout {
    fn default() -> Self {
        Self::new()
    }
}

impl HumanLayout {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            lines: Vec::new(),
            key_width: 14,
        }
    }

    pub fn title(&mut self, text: &str) -> &mut Self {
        self.lines.push(text.bold().to_string());
        self
    }

    pub fn kv(&mut self, key: &str, value: &str) -> &mut Self {
        self.lines
            .push(format!("  {:width$} {value}", key.dimmed(), width = self.key_width));
        self
    }

    pub fn push_line(&mut self, line: impl Into<String>) -> &mut Self {
        self.lines.push(line.into());
        self
    }

    #[must_use]
    pub fn build(self) -> String {
        self.lines.join("\n")
    }
}

pub fn emit_human(layout: HumanLayout) {
    println!("{}", layout.build());
}
