#![no_main]

use cindent::indent::{CommentLeaders, LineSource, StyleConfig, TextBuffer, compute_indent};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    // Invalid UTF-8 is not a buffer the engine can be handed
    if let Ok(s) = std::str::from_utf8(data) {
        // First line is the style string, the rest is the buffer
        let (spec, text) = s.split_once('\n').unwrap_or(("", s));
        let style = StyleConfig::parse(spec, 4, 8);
        let comments = CommentLeaders::default();
        let buf = TextBuffer::from_text(text);
        for lnum in 0..=buf.line_count() + 1 {
            let _ = compute_indent(&buf, &style, &comments, lnum);
        }
    }
});
