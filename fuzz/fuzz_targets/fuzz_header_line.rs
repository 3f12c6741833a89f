#![no_main]

use checkout_connector::HeaderParser;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let mut parser = HeaderParser::new();

    // Every line is consumed in full, valid or not
    assert_eq!(parser.process_header_bytes(data), data.len());

    // At most one header per line
    assert!(parser.headers().len() <= 1);

    if let Some((name, value)) = parser.headers().iter().next() {
        assert!(!name.is_empty());
        assert!(!name.contains(':'));
        assert_eq!(value, value.trim());
    }
});
