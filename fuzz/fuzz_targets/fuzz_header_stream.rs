#![no_main]

use arbitrary::Arbitrary;
use checkout_connector::HeaderParser;
use libfuzzer_sys::fuzz_target;

/// A header block delivered one line at a time, the way a transport sees it.
#[derive(Arbitrary, Debug)]
struct HeaderStream {
    lines: Vec<String>,
    reset_after: Option<u8>,
}

fuzz_target!(|input: HeaderStream| {
    let mut parser = HeaderParser::new();
    let mut fed = 0;

    for (idx, line) in input.lines.iter().enumerate() {
        assert_eq!(parser.process_header(line), line.len());
        fed += 1;

        if input.reset_after.map(usize::from) == Some(idx) {
            parser.reset();
            assert!(parser.headers().is_empty());
            fed = 0;
        }
    }

    // Repeated names replace each other, so never more headers than lines
    assert!(parser.headers().len() <= fed);
});
