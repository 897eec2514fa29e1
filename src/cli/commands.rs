//! CLI command implementations
//!
//! All command functions return `CliResult<ExitCode>` instead of calling
//! `process::exit`. Error handling and exits happen in the top-level `run()`.

use std::fs;
use std::path::{Path, PathBuf};

use crate::indent::{IndentOptions, LineSource, StyleConfig, TextBuffer, compute_indent, indent_diff, reindent_source};

use super::{CliError, CliResult, ExitCode};

/// Maximum source file size (100 MB)
const MAX_SOURCE_SIZE: u64 = 100 * 1024 * 1024;

/// File extensions `fmt` picks up when given a directory.
const SOURCE_EXTENSIONS: &[&str] = &["c", "h", "cc", "cpp", "cxx", "hh", "hpp", "hxx", "java", "js"];

/// Read a source file with a size check.
pub fn read_source(path: &Path) -> CliResult<String> {
    let metadata = fs::metadata(path)
        .map_err(|e| CliError::failure(format!("Cannot access file '{}': {}", path.display(), e)))?;

    if metadata.len() > MAX_SOURCE_SIZE {
        return Err(CliError::failure(format!(
            "Source file '{}' is too large ({} bytes, max {} bytes)",
            path.display(),
            metadata.len(),
            MAX_SOURCE_SIZE
        )));
    }

    fs::read_to_string(path).map_err(|e| CliError::failure(format!("Error reading file '{}': {}", path.display(), e)))
}

/// Print the suggested indent of line `lnum` of `path`.
pub fn print_line_indent(path: &Path, lnum: usize, opts: &IndentOptions) -> CliResult<ExitCode> {
    let source = read_source(path)?;
    let buf = TextBuffer::from_text(&source);
    if lnum == 0 || lnum > buf.line_count() {
        return Err(CliError::failure(format!(
            "Line {} is out of range: '{}' has {} line(s)",
            lnum,
            path.display(),
            buf.line_count()
        )));
    }

    let style = opts.style_config();
    let amount = compute_indent(&buf, &style, &opts.comment_leaders(), lnum);
    println!("{amount}");
    Ok(ExitCode::SUCCESS)
}

/// Reindent the C-family files under `path`.
pub fn reindent_files(path: &Path, check_mode: bool, diff_mode: bool, opts: &IndentOptions) -> CliResult<ExitCode> {
    let files = collect_source_files(path);

    if files.is_empty() {
        return Err(CliError::failure("No C-family source files found"));
    }

    let mut needs_reindent = false;
    let mut reindented_count = 0;
    let mut error_count = 0;

    for file_path in &files {
        let source = match read_source(file_path) {
            Ok(s) => s,
            Err(e) => {
                eprintln!("{}", e);
                error_count += 1;
                continue;
            }
        };

        let reindented = reindent_source(&source, opts);
        let changed = source != reindented;
        tracing::debug!(file = %file_path.display(), changed, "reindented");

        if diff_mode && changed {
            println!("--- {}", file_path.display());
            if let Some(diff) = indent_diff(&source, opts) {
                print!("{}", diff);
            }
            println!();
        }

        if check_mode {
            if changed {
                println!("Would reindent: {}", file_path.display());
                needs_reindent = true;
            }
        } else if diff_mode {
            if changed {
                needs_reindent = true;
            }
        } else if changed {
            if let Err(e) = fs::write(file_path, &reindented) {
                eprintln!("Error writing {}: {}", file_path.display(), e);
                error_count += 1;
            } else {
                println!("Reindented: {}", file_path.display());
                reindented_count += 1;
            }
        }
    }

    if check_mode || diff_mode {
        if needs_reindent {
            let msg = if diff_mode { "need reindenting" } else { "would be reindented" };
            return Err(CliError::failure(format!("\n{} file(s) {}", files.len(), msg)));
        } else {
            println!("✓ {} file(s) already indented", files.len());
        }
    } else {
        println!("\n✓ {} file(s) reindented, {} error(s)", reindented_count, error_count);
    }

    if error_count > 0 {
        return Err(CliError::new("", ExitCode::FAILURE));
    }

    Ok(ExitCode::SUCCESS)
}

/// Validate `spec` strictly and print every resolved option.
pub fn show_style(spec: &str, shiftwidth: i32, tabstop: i32) -> CliResult<ExitCode> {
    let config = StyleConfig::parse_strict(spec, shiftwidth, tabstop).map_err(|err| {
        let report = miette::Report::new(err).with_source_code(spec.to_string());
        CliError::failure(format!("{report:?}"))
    })?;

    for (letter, name, value) in config.entries() {
        println!("{letter}  {name:<20} {value}");
    }
    Ok(ExitCode::SUCCESS)
}

fn is_source_file(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| SOURCE_EXTENSIONS.contains(&ext))
}

fn collect_source_files(path: &Path) -> Vec<PathBuf> {
    let mut files = Vec::new();

    if path.is_file() {
        files.push(path.to_path_buf());
    } else if path.is_dir() {
        if let Ok(entries) = fs::read_dir(path) {
            let mut entries: Vec<_> = entries.flatten().map(|e| e.path()).collect();
            entries.sort();
            for entry_path in entries {
                if entry_path.is_dir() {
                    let name = entry_path.file_name().and_then(|n| n.to_str()).unwrap_or("");
                    if !name.starts_with('.') && name != "target" && name != "node_modules" && name != "build" {
                        files.extend(collect_source_files(&entry_path));
                    }
                } else if is_source_file(&entry_path) {
                    files.push(entry_path);
                }
            }
        }
    }

    files
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_source_extensions() {
        assert!(is_source_file(Path::new("main.c")));
        assert!(is_source_file(Path::new("lib/widget.hpp")));
        assert!(is_source_file(Path::new("App.java")));
        assert!(!is_source_file(Path::new("notes.txt")));
        assert!(!is_source_file(Path::new("Makefile")));
    }

    #[test]
    fn test_show_style_rejects_unknown_letter() {
        let err = show_style(">4,Q5", 4, 8).unwrap_err();
        assert_eq!(err.exit_code, ExitCode::FAILURE);
        assert!(err.message.contains("unknown style option"));
    }

    #[test]
    fn test_show_style_accepts_valid_spec() {
        assert_eq!(show_style(">2,:0,(0", 4, 8).unwrap(), ExitCode::SUCCESS);
    }

    #[test]
    fn test_missing_file() {
        let err = print_line_indent(Path::new("/nonexistent/cindent/input.c"), 1, &IndentOptions::default()).unwrap_err();
        assert!(err.message.contains("Cannot access file"));
    }

    #[test]
    fn test_reindent_files_round_trip() {
        let dir = std::env::temp_dir().join(format!("cindent_cli_{}", std::process::id()));
        fs::create_dir_all(&dir).unwrap();
        let file = dir.join("sample.c");
        fs::write(&file, "int f() {\nx;\n}\n").unwrap();

        let opts = IndentOptions::default();
        assert!(reindent_files(&dir, true, false, &opts).is_err());
        assert_eq!(reindent_files(&dir, false, false, &opts).unwrap(), ExitCode::SUCCESS);
        assert_eq!(fs::read_to_string(&file).unwrap(), "int f() {\n    x;\n}\n");
        assert_eq!(reindent_files(&dir, true, false, &opts).unwrap(), ExitCode::SUCCESS);

        fs::remove_dir_all(&dir).unwrap();
    }
}
