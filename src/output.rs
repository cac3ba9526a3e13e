// ABOUTME: Output formatting for CLI feedback and publishing of step outputs.
// ABOUTME: Supports normal, quiet (CI), and JSON output modes plus GitHub Actions commands.

use serde::Serialize;
use std::fs::OpenOptions;
use std::io::Write;
use std::path::PathBuf;
use std::time::Instant;

const MULTILINE_DELIMITER: &str = "PREVIEW_WAIT_EOF";

/// Output mode for CLI feedback.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputMode {
    /// Human-friendly output with progress messages
    Normal,
    /// Minimal output for CI (only final result)
    Quiet,
    /// JSON lines for scripting
    Json,
}

/// Handles CLI output based on the configured mode.
pub struct Output {
    mode: OutputMode,
    start_time: Option<Instant>,
    output_file: Option<PathBuf>,
    github_actions: bool,
}

impl Output {
    pub fn new(mode: OutputMode) -> Self {
        Self {
            mode,
            start_time: None,
            output_file: None,
            github_actions: false,
        }
    }

    /// Pick up `GITHUB_OUTPUT` and `GITHUB_ACTIONS` from the environment.
    pub fn with_github_env(mut self) -> Self {
        if let Some(path) = std::env::var_os("GITHUB_OUTPUT").filter(|p| !p.is_empty()) {
            self.output_file = Some(PathBuf::from(path));
        }
        self.github_actions = std::env::var("GITHUB_ACTIONS").is_ok_and(|v| v == "true");
        self
    }

    /// Append step outputs to `path` instead of printing them.
    pub fn with_output_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.output_file = Some(path.into());
        self
    }

    /// Start timing an operation.
    pub fn start_timer(&mut self) {
        self.start_time = Some(Instant::now());
    }

    /// Get elapsed time since timer started.
    pub fn elapsed_secs(&self) -> f64 {
        self.start_time
            .map(|t| t.elapsed().as_secs_f64())
            .unwrap_or(0.0)
    }

    /// Print a progress message (suppressed in quiet/json mode).
    pub fn progress(&self, message: &str) {
        if self.mode == OutputMode::Normal {
            println!("{message}");
        }
    }

    /// Publish a named step output.
    ///
    /// Appends `name=value` to the outputs file when one is configured,
    /// otherwise prints it.
    pub fn set_output(&self, name: &str, value: &str) -> std::io::Result<()> {
        let Some(path) = &self.output_file else {
            match self.mode {
                OutputMode::Normal | OutputMode::Quiet => println!("{name}={value}"),
                OutputMode::Json => self.emit(&JsonEvent {
                    event: "output",
                    message: value,
                    name: Some(name),
                    duration_secs: None,
                }),
            }
            return Ok(());
        };

        let mut file = OpenOptions::new().create(true).append(true).open(path)?;
        if value.contains('\n') {
            writeln!(file, "{name}<<{MULTILINE_DELIMITER}")?;
            writeln!(file, "{value}")?;
            writeln!(file, "{MULTILINE_DELIMITER}")
        } else {
            writeln!(file, "{name}={value}")
        }
    }

    /// Ask the Actions runner to redact `value` from the job log.
    ///
    /// In JSON mode the command goes to stderr so stdout stays JSON lines;
    /// the runner reads workflow commands from both streams.
    pub fn mask(&self, value: &str) {
        if let Some((stream, line)) = self.mask_line(value) {
            stream.write_line(&line);
        }
    }

    fn mask_line(&self, value: &str) -> Option<(Stream, String)> {
        if !self.github_actions || value.is_empty() {
            return None;
        }
        let stream = match self.mode {
            OutputMode::Json => Stream::Stderr,
            OutputMode::Normal | OutputMode::Quiet => Stream::Stdout,
        };
        Some((stream, format!("::add-mask::{value}")))
    }

    /// Print a success message with optional timing.
    pub fn success(&self, message: &str) {
        match self.mode {
            OutputMode::Normal => {
                let elapsed = self.elapsed_secs();
                if elapsed > 0.0 {
                    println!("{message} ({:.1}s)", elapsed);
                } else {
                    println!("{message}");
                }
            }
            OutputMode::Quiet => {
                println!("{message}");
            }
            OutputMode::Json => self.emit(&JsonEvent {
                event: "success",
                message,
                name: None,
                duration_secs: self.duration(),
            }),
        }
    }

    /// Print a warning message.
    pub fn warning(&self, message: &str) {
        if let Some((stream, line)) = self.warning_line(message) {
            stream.write_line(&line);
        }
    }

    fn warning_line(&self, message: &str) -> Option<(Stream, String)> {
        match self.mode {
            OutputMode::Normal | OutputMode::Quiet if self.github_actions => Some((
                Stream::Stdout,
                format!("::warning::{}", escape_command(message)),
            )),
            OutputMode::Normal => Some((Stream::Stderr, format!("Warning: {message}"))),
            OutputMode::Quiet => None,
            OutputMode::Json => serde_json::to_string(&JsonEvent {
                event: "warning",
                message,
                name: None,
                duration_secs: self.duration(),
            })
            .ok()
            .map(|json| (Stream::Stdout, json)),
        }
    }

    /// Print an error message.
    pub fn error(&self, message: &str) {
        match self.mode {
            OutputMode::Normal | OutputMode::Quiet if self.github_actions => {
                println!("::error::{}", escape_command(message));
            }
            OutputMode::Normal | OutputMode::Quiet => {
                eprintln!("Error: {message}");
            }
            OutputMode::Json => {
                let event = JsonEvent {
                    event: "error",
                    message,
                    name: None,
                    duration_secs: self.duration(),
                };
                if let Ok(json) = serde_json::to_string(&event) {
                    eprintln!("{json}");
                }
            }
        }
    }

    fn duration(&self) -> Option<f64> {
        self.start_time.map(|_| self.elapsed_secs())
    }

    fn emit(&self, event: &JsonEvent<'_>) {
        if let Ok(json) = serde_json::to_string(event) {
            println!("{json}");
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Stream {
    Stdout,
    Stderr,
}

impl Stream {
    fn write_line(self, line: &str) {
        match self {
            Stream::Stdout => println!("{line}"),
            Stream::Stderr => eprintln!("{line}"),
        }
    }
}

/// Escape a message for a workflow command (`%`, CR and LF are significant).
fn escape_command(message: &str) -> String {
    message
        .replace('%', "%25")
        .replace('\r', "%0D")
        .replace('\n', "%0A")
}

#[derive(Serialize)]
struct JsonEvent<'a> {
    event: &'a str,
    message: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    name: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    duration_secs: Option<f64>,
}
