//! CLI module for cindent
//!
//! ## Commands
//!
//! - `line <file> <lnum>` - Print the suggested indent of one line
//! - `fmt <file|dir>` - Reindent C-family source files
//! - `style <spec>` - Validate a style string and print the resolved options
//!
//! Command functions return `CliResult<T>` instead of calling `process::exit`.
//! Only the top-level `run()` function handles errors and exits.

// Enforce explicit error handling - no panicking in production code
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]

pub mod commands;

use std::fmt;
use std::path::PathBuf;
use std::process;

use clap::{Args, Parser, Subcommand};

use crate::indent::{DEFAULT_COMMENTS, IndentOptions};

// ============================================================================
// CLI Error handling
// ============================================================================

/// Exit code for CLI operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExitCode(pub i32);

impl ExitCode {
    pub const SUCCESS: ExitCode = ExitCode(0);
    pub const FAILURE: ExitCode = ExitCode(1);
}

/// Error type for CLI operations.
///
/// Contains a user-facing message and an exit code. The CLI entry point
/// prints the message and exits with the code.
#[derive(Debug)]
pub struct CliError {
    /// User-facing error message (already formatted for display)
    pub message: String,
    /// Exit code to return to the shell
    pub exit_code: ExitCode,
}

impl CliError {
    pub fn new(message: impl Into<String>, exit_code: ExitCode) -> Self {
        Self {
            message: message.into(),
            exit_code,
        }
    }

    /// Create a failure error (exit code 1).
    pub fn failure(message: impl Into<String>) -> Self {
        Self::new(message, ExitCode::FAILURE)
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for CliError {}

/// Result type for CLI operations.
pub type CliResult<T> = Result<T, CliError>;

const VERSION: &str = env!("CARGO_PKG_VERSION");

// ============================================================================
// Clap CLI definition
// ============================================================================

/// Heuristic auto-indentation for C-family source
#[derive(Parser, Debug)]
#[command(name = "cindent")]
#[command(version = VERSION)]
#[command(about = "Heuristic auto-indentation for C-family source", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

/// Indent settings shared by every command.
#[derive(Args, Debug, Clone)]
pub struct StyleArgs {
    /// Width of one indent level
    #[arg(long = "sw", value_name = "N", default_value_t = 4)]
    pub shiftwidth: i32,
    /// Width of a tab character
    #[arg(long = "ts", value_name = "N", default_value_t = 8)]
    pub tabstop: i32,
    /// Style string, e.g. ">4,:0,(0"
    #[arg(long = "cino", value_name = "SPEC", default_value = "", allow_hyphen_values = true)]
    pub cino: String,
    /// Comment markers, e.g. "s1:/*,mb:*,ex:*/,://"
    #[arg(long = "comments", value_name = "SPEC", default_value = DEFAULT_COMMENTS)]
    pub comments: String,
    /// Indent with tabs where possible instead of spaces
    #[arg(long)]
    pub tabs: bool,
}

impl StyleArgs {
    pub fn options(&self) -> IndentOptions {
        IndentOptions::new()
            .with_shiftwidth(self.shiftwidth)
            .with_tabstop(self.tabstop)
            .with_style(self.cino.clone())
            .with_comments(self.comments.clone())
            .with_expand_tab(!self.tabs)
    }
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Print the suggested indent of one line
    Line {
        /// Source file
        #[arg(value_name = "FILE")]
        file: PathBuf,
        /// Line number, starting at 1
        #[arg(value_name = "LNUM")]
        lnum: usize,
        #[command(flatten)]
        style: StyleArgs,
    },

    /// Reindent C-family source files
    Fmt {
        /// File or directory to reindent
        #[arg(value_name = "PATH", default_value = ".")]
        path: PathBuf,
        /// Check indentation without modifying files
        #[arg(long)]
        check: bool,
        /// Show diff of indentation changes
        #[arg(long)]
        diff: bool,
        #[command(flatten)]
        style: StyleArgs,
    },

    /// Validate a style string and print the resolved options
    Style {
        /// Style string to check
        #[arg(value_name = "SPEC", allow_hyphen_values = true)]
        spec: String,
        /// Width of one indent level
        #[arg(long = "sw", value_name = "N", default_value_t = 4)]
        shiftwidth: i32,
        /// Width of a tab character
        #[arg(long = "ts", value_name = "N", default_value_t = 8)]
        tabstop: i32,
    },
}

// ============================================================================
// CLI entry point
// ============================================================================

/// Main CLI entry point.
///
/// This is the only place where `process::exit` is called.
pub fn run() {
    let cli = Cli::parse();

    match execute(cli) {
        Ok(exit_code) => {
            if exit_code.0 != 0 {
                process::exit(exit_code.0);
            }
        }
        Err(e) => {
            if !e.message.is_empty() {
                eprintln!("{}", e.message);
            }
            process::exit(e.exit_code.0);
        }
    }
}

/// Execute the CLI command and return result.
fn execute(cli: Cli) -> CliResult<ExitCode> {
    match cli.command {
        Command::Line { file, lnum, style } => commands::print_line_indent(&file, lnum, &style.options()),
        Command::Fmt {
            path,
            check,
            diff,
            style,
        } => commands::reindent_files(&path, check, diff, &style.options()),
        Command::Style {
            spec,
            shiftwidth,
            tabstop,
        } => commands::show_style(&spec, shiftwidth, tabstop),
    }
}

// ============================================================================
// Tests
// ============================================================================
