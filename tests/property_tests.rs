//! Property-based tests for the indent engine
//!
//! These tests use proptest to check invariants across many randomly
//! generated buffers, including ones that are not valid C at all.

use cindent::indent::{CommentLeaders, LineSource, StyleConfig, TextBuffer, compute_indent};
use cindent::{IndentOptions, reindent_source};
use proptest::prelude::*;

// =============================================================================
// Strategies
// =============================================================================

/// Text made of the bytes the engine reacts to: brackets, terminators, labels, comments, strings, escapes.
fn c_like_text() -> impl Strategy<Value = String> {
    r#"[a-z(){}\[\];:#/*=,'"\\ \t\n]{0,240}"#
}

/// Flush-left statements assembled into a small function.
fn statement() -> impl Strategy<Value = String> {
    prop_oneof![
        Just("x = 1;".to_string()),
        Just("if (a)".to_string()),
        Just("else".to_string()),
        Just("while (b)".to_string()),
        Just("do".to_string()),
        Just("{".to_string()),
        Just("}".to_string()),
        Just("case 1:".to_string()),
        Just("label:".to_string()),
        Just("foo(a,".to_string()),
        Just("b);".to_string()),
        Just("/* note".to_string()),
        Just(" */".to_string()),
        Just("// line".to_string()),
        Just("#define X".to_string()),
    ]
}

fn function_body() -> impl Strategy<Value = String> {
    prop::collection::vec(statement(), 0..24).prop_map(|lines| format!("void f()\n{{\n{}\n}}\n", lines.join("\n")))
}

fn style_spec() -> impl Strategy<Value = String> {
    prop_oneof![
        Just(String::new()),
        Just(":0".to_string()),
        Just("(0".to_string()),
        Just(">2,{2,}-1".to_string()),
        Just("N-s,g0,h2".to_string()),
        Just("j1,J1".to_string()),
        Just("(2s,m1,U1,w1".to_string()),
        "[>:=(){}^ntplbhgiucCwWmMjJNEkRs0-9,.-]{0,16}",
    ]
}

// =============================================================================
// Engine properties
// =============================================================================

proptest! {
    /// Property: every line of any buffer gets an indent, and asking twice gives the same answer
    #[test]
    fn compute_indent_is_repeatable(text in c_like_text(), spec in style_spec()) {
        let buf = TextBuffer::from_text(&text);
        let style = StyleConfig::parse(&spec, 4, 8);
        let comments = CommentLeaders::default();
        for lnum in 1..=buf.line_count() {
            let first = compute_indent(&buf, &style, &comments, lnum);
            let second = compute_indent(&buf, &style, &comments, lnum);
            prop_assert_eq!(first, second);
        }
    }

    /// Property: computing indents leaves the buffer untouched
    #[test]
    fn compute_indent_does_not_modify_buffer(text in c_like_text()) {
        let buf = TextBuffer::from_text(&text);
        let before = buf.clone();
        let style = StyleConfig::default();
        let comments = CommentLeaders::default();
        for lnum in 0..=buf.line_count() + 1 {
            let _ = compute_indent(&buf, &style, &comments, lnum);
        }
        prop_assert_eq!(buf, before);
    }

    /// Property: the first line and lines past the end always get 0
    #[test]
    fn first_and_missing_lines_are_zero(text in c_like_text()) {
        let buf = TextBuffer::from_text(&text);
        let style = StyleConfig::default();
        let comments = CommentLeaders::default();
        prop_assert_eq!(compute_indent(&buf, &style, &comments, 1), 0);
        prop_assert_eq!(compute_indent(&buf, &style, &comments, buf.line_count() + 1), 0);
    }

    /// Property: arbitrary style strings never make the engine panic
    #[test]
    fn arbitrary_styles_are_accepted(body in function_body(), spec in "[ -~]{0,24}") {
        let buf = TextBuffer::from_text(&body);
        let style = StyleConfig::parse(&spec, 4, 8);
        let comments = CommentLeaders::default();
        for lnum in 1..=buf.line_count() {
            let _ = compute_indent(&buf, &style, &comments, lnum);
        }
    }
}

// =============================================================================
// Reindent properties
// =============================================================================

proptest! {
    /// Property: reindenting only changes leading whitespace
    #[test]
    fn reindent_preserves_line_bodies(text in c_like_text(), spec in style_spec()) {
        let opts = IndentOptions::default().with_style(spec);
        let out = reindent_source(&text, &opts);

        let before: Vec<&str> = text.lines().collect();
        let after: Vec<&str> = out.lines().collect();
        prop_assert_eq!(before.len(), after.len());
        for (orig, new) in before.iter().zip(&after) {
            prop_assert_eq!(orig.trim_start_matches([' ', '\t']), new.trim_start_matches([' ', '\t']));
        }
    }

    /// Property: the trailing newline is kept or left out exactly as in the input
    #[test]
    fn reindent_keeps_final_newline(body in function_body()) {
        let opts = IndentOptions::default();
        let with_newline = reindent_source(&body, &opts);
        prop_assert!(with_newline.ends_with('\n'));

        let trimmed = body.trim_end_matches('\n');
        let without = reindent_source(trimmed, &opts);
        prop_assert!(!without.ends_with('\n'));
    }

    /// Property: reindented lines start with exactly the suggested indent
    #[test]
    fn reindented_lines_carry_suggested_indent(body in function_body()) {
        let opts = IndentOptions::default();
        let out = reindent_source(&body, &opts);
        let buf = TextBuffer::from_text(&out);
        let style = opts.style_config();
        let comments = opts.comment_leaders();
        for lnum in 1..=buf.line_count() {
            let line = buf.line(lnum);
            let body = line.trim_start_matches(' ');
            if body.is_empty() {
                continue;
            }
            let width = (line.len() - body.len()) as u32;
            prop_assert_eq!(width, compute_indent(&buf, &style, &comments, lnum));
        }
    }
}
