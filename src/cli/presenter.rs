//! CLI presenter for output formatting

use std::io::{self, Write};

use colored::*;
use indicatif::{ProgressBar, ProgressStyle};

use crate::domain::capture::CaptureState;
use crate::domain::log::{LogLevel, LogLine};
use crate::domain::recording::human_readable_size;

use super::commands::UserCommand;

/// Presenter for CLI output formatting
pub struct Presenter {
    spinner: Option<ProgressBar>,
}

impl Presenter {
    pub fn new() -> Self {
        Self { spinner: None }
    }

    /// Start a spinner with message
    pub fn start_spinner(&mut self, message: &str) {
        let spinner = ProgressBar::new_spinner();
        if let Ok(style) = ProgressStyle::default_spinner()
            .tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏")
            .template("{spinner:.cyan} {msg}")
        {
            spinner.set_style(style);
        }
        spinner.set_message(message.to_string());
        spinner.enable_steady_tick(std::time::Duration::from_millis(80));
        self.spinner = Some(spinner);
    }

    /// Stop spinner without status
    pub fn stop_spinner(&mut self) {
        if let Some(spinner) = self.spinner.take() {
            spinner.finish_and_clear();
        }
    }

    /// Print info message to stderr
    pub fn info(&self, message: &str) {
        eprintln!("{} {}", "ℹ".cyan(), message);
    }

    /// Print success message to stderr
    pub fn success(&self, message: &str) {
        eprintln!("{} {}", "✓".green(), message);
    }

    /// Print warning message to stderr
    pub fn warn(&self, message: &str) {
        eprintln!("{} {}", "⚠".yellow(), message);
    }

    /// Print error message to stderr
    pub fn error(&self, message: &str) {
        eprintln!("{} {}", "✗".red(), message);
    }

    /// Output text to stdout
    pub fn output(&self, text: &str) {
        println!("{}", text);
    }

    /// Print the session prompt without newline
    pub fn prompt(&self) {
        print!("{} ", ">".bold());
        let _ = io::stdout().flush();
    }

    /// Print one capture log line to stdout
    pub fn log_line(&self, line: &LogLine) {
        match line.level() {
            LogLevel::Info => println!("{}", line),
            LogLevel::Error => println!("{}", line.to_string().red()),
        }
    }

    /// Print the capture status block
    pub fn status(
        &self,
        state: CaptureState,
        segments: usize,
        bytes: usize,
        live: Option<&str>,
    ) {
        let state_label = match state {
            CaptureState::Idle => state.to_string().normal(),
            CaptureState::Capturing => state.to_string().red().bold(),
        };
        eprintln!("{} State: {}", "●".cyan(), state_label);
        if let Some(live) = live {
            eprintln!("  Live: {}", live);
        }
        eprintln!(
            "  Recorded: {} segment(s), {}",
            segments,
            human_readable_size(bytes)
        );
    }

    /// Print the command list, marking the ones currently disabled
    pub fn help(&self, enabled: impl Fn(UserCommand) -> bool) {
        eprintln!("{}", "Commands:".bold());
        for command in UserCommand::ALL {
            let name = format!("{:<7}", command.as_str());
            if enabled(*command) {
                eprintln!("  {} {}", name.cyan(), command.description());
            } else {
                eprintln!(
                    "  {} {}",
                    name.dimmed(),
                    format!("{} (disabled)", command.description()).dimmed()
                );
            }
        }
    }

    /// Print a key-value pair (for config list)
    pub fn key_value(&self, key: &str, value: &str) {
        println!("{}: {}", key.cyan(), value);
    }
}

impl Default for Presenter {
    fn default() -> Self {
        Self::new()
    }
}
