//! Terminal output formatting.
//!
//! Human-readable colored output by default, one JSON object per line with
//! `--json`, nothing but errors with `--quiet`. Logs go to stderr, so stdout
//! carries only what these functions print.

use std::fmt::Display;
use std::sync::{OnceLock, RwLock};

use owo_colors::{OwoColorize, Style};
use serde_json::json;

/// Runtime output configuration shared by CLI handlers.
#[derive(Debug, Clone, Copy, Default)]
pub struct OutputConfig {
    /// Emit machine-readable JSON output instead of human-readable text.
    pub json: bool,
    /// Suppress non-essential output.
    pub quiet: bool,
    /// Style human-readable output with ANSI colors.
    pub color: bool,
}

impl OutputConfig {
    #[must_use]
    pub const fn new(json: bool, quiet: bool) -> Self {
        Self {
            json,
            quiet,
            color: false,
        }
    }

    #[must_use]
    pub const fn with_color(mut self, color: bool) -> Self {
        self.color = color;
        self
    }
}

static OUTPUT_CONFIG: OnceLock<RwLock<OutputConfig>> = OnceLock::new();

fn config_cell() -> &'static RwLock<OutputConfig> {
    OUTPUT_CONFIG.get_or_init(|| RwLock::new(OutputConfig::default()))
}

fn read_config() -> OutputConfig {
    match config_cell().read() {
        Ok(config) => *config,
        Err(poisoned) => *poisoned.into_inner(),
    }
}

fn write_config(config: OutputConfig) {
    match config_cell().write() {
        Ok(mut current) => *current = config,
        Err(poisoned) => *poisoned.into_inner() = config,
    }
}

fn paint(text: &str, style: Style) -> String {
    let config = read_config();
    if config.color && !config.json {
        text.style(style).to_string()
    } else {
        text.to_string()
    }
}

fn regular_output_suppressed(config: OutputConfig) -> bool {
    !config.json && config.quiet
}

fn emit_json_line(kind: &str, payload: serde_json::Value) {
    println!(
        "{}",
        json!({
            "type": kind,
            "payload": payload,
        })
    );
}

/// Apply output settings from global CLI flags.
pub fn configure(config: OutputConfig) {
    write_config(config);
}

#[must_use]
pub fn is_json() -> bool {
    read_config().json
}

/// Print the application header with name and version.
pub fn header(version: &str) {
    let config = read_config();
    if config.json || regular_output_suppressed(config) {
        return;
    }

    println!(
        "{} {}",
        paint("fraudwatch", Style::new().bold()),
        paint(version, Style::new().dimmed())
    );
}

/// Print a labeled value.
pub fn field(label: &str, value: impl Display) {
    let config = read_config();
    let value = value.to_string();

    if config.json {
        emit_json_line("field", json!({ "label": label, "value": value }));
        return;
    }
    if regular_output_suppressed(config) {
        return;
    }

    let label = format!("{label:<20}");
    println!("  {} {}", paint(&label, Style::new().dimmed()), value);
}

pub fn success(message: &str) {
    let config = read_config();

    if config.json {
        emit_json_line("success", json!({ "message": message }));
        return;
    }
    if regular_output_suppressed(config) {
        return;
    }

    println!("  {} {}", paint("✓", Style::new().green()), message);
}

pub fn warning(message: &str) {
    let config = read_config();

    if config.json {
        emit_json_line("warning", json!({ "message": message }));
        return;
    }

    println!("  {} {}", paint("⚠", Style::new().yellow()), message);
}

/// Print an error line to stderr.
pub fn error(message: &str) {
    let config = read_config();

    if config.json {
        eprintln!(
            "{}",
            json!({
                "type": "error",
                "payload": { "message": message },
            })
        );
        return;
    }

    eprintln!("  {} {}", paint("×", Style::new().red()), message);
}

pub fn section(title: &str) {
    let config = read_config();

    if config.json {
        emit_json_line("section", json!({ "title": title }));
        return;
    }
    if regular_output_suppressed(config) {
        return;
    }

    println!();
    println!("{}", paint(title, Style::new().bold()));
}

/// Print one live feed line.
///
/// `payload` is what JSON mode emits; `message` is the human rendering.
pub fn feed(kind: &str, timestamp: &str, message: &str, payload: serde_json::Value) {
    let config = read_config();

    if config.json {
        emit_json_line(kind, payload);
        return;
    }
    if regular_output_suppressed(config) {
        return;
    }

    let style = match kind {
        "alert" => Style::new().yellow(),
        "anomaly" => Style::new().red(),
        _ => Style::new().cyan(),
    };
    let label = format!("{kind:<11}");
    println!(
        "  {} {} {}",
        paint(timestamp, Style::new().dimmed()),
        paint(&label, style),
        message
    );
}

/// Format a positive value in green.
pub fn positive(value: impl Display) -> String {
    paint(&value.to_string(), Style::new().green())
}

/// Format a negative value in red.
pub fn negative(value: impl Display) -> String {
    paint(&value.to_string(), Style::new().red())
}

/// Format a highlighted value in cyan.
pub fn highlight(value: impl Display) -> String {
    paint(&value.to_string(), Style::new().cyan())
}

pub fn muted(value: impl Display) -> String {
    paint(&value.to_string(), Style::new().dimmed())
}

pub fn note(message: &str) {
    let config = read_config();

    if config.json {
        emit_json_line("note", json!({ "message": message }));
        return;
    }
    if regular_output_suppressed(config) {
        return;
    }

    println!("  {}", paint(message, Style::new().dimmed()));
}

/// Print multi-line content (tables) indented.
pub fn lines(content: &str) {
    let config = read_config();
    if config.json || regular_output_suppressed(config) {
        return;
    }

    for line in content.lines() {
        println!("  {line}");
    }
}

/// Print a complete JSON document (command result in `--json` mode).
pub fn json_output(value: serde_json::Value) {
    println!("{value}");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_config_leaves_text_unstyled() {
        configure(OutputConfig::new(false, true));
        assert_eq!(positive(42), "42");
        assert_eq!(highlight("ws://host"), "ws://host");
    }

    #[test]
    fn quiet_only_suppresses_human_output() {
        assert!(regular_output_suppressed(OutputConfig::new(false, true)));
        assert!(!regular_output_suppressed(OutputConfig::new(true, true)));
        assert!(!regular_output_suppressed(OutputConfig::default()));
    }

    #[test]
    fn color_is_opt_in() {
        assert!(!OutputConfig::new(false, false).color);
        assert!(OutputConfig::new(false, false).with_color(true).color);
    }
}
