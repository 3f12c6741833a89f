#![no_main]

use checkout_connector::Headers;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|block: &str| {
    let headers = Headers::parse(block);

    // Never more headers than lines
    assert!(headers.len() <= block.lines().count());

    // Every parsed header is found again by a case-insensitive lookup
    for (name, value) in headers.iter() {
        assert_eq!(headers.get(&name.to_ascii_lowercase()), Some(value));
    }
});
