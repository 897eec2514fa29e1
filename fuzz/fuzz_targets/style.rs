#![no_main]

use cindent::indent::{CommentLeaders, StyleConfig};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if let Ok(s) = std::str::from_utf8(data) {
        let lenient = StyleConfig::parse(s, 4, 8);
        // A spec the strict parser accepts must resolve the same way
        if let Ok(strict) = StyleConfig::parse_strict(s, 4, 8) {
            assert_eq!(lenient, strict);
        }
        let _ = CommentLeaders::parse(s);
    }
});
