//! Incremental header parser for streaming transports.
//!
//! Streaming HTTP clients hand response headers over one raw line at a time,
//! and expect to be told how many bytes were consumed. [`HeaderParser`]
//! accumulates those lines into a [`Headers`] mapping.
//!
//! Malformed lines are skipped rather than rejected: a status line, a line
//! without a `:` separator or a line with an invalid header name adds no
//! entry, but is still reported as fully consumed so the transport keeps
//! reading.

use super::headers::Headers;

/// Accumulates `Name: Value` header lines for a single response.
///
/// Create one parser per response, or call [`HeaderParser::reset`] between
/// responses.
///
/// # Example
///
/// ```
/// use checkout_connector::http::HeaderParser;
///
/// let mut parser = HeaderParser::new();
/// assert_eq!(parser.process_header("Accept: Anything\r\n"), 18);
/// assert_eq!(parser.process_header("Foo-Bar Test"), 12);
///
/// assert_eq!(parser.headers().len(), 1);
/// assert_eq!(parser.headers().get("accept"), Some("Anything"));
/// ```
#[derive(Debug, Clone, Default)]
pub struct HeaderParser {
    headers: Headers,
}

impl HeaderParser {
    /// Creates a parser with no accumulated headers.
    pub fn new() -> Self {
        Self::default()
    }

    /// Processes one raw header line and returns the number of bytes used.
    ///
    /// The return value is always `line.len()`.
    pub fn process_header(&mut self, line: &str) -> usize {
        if let Some((name, value)) = split_header(line) {
            self.headers.insert(name, value);
        }
        line.len()
    }

    /// Byte-oriented variant of [`HeaderParser::process_header`].
    ///
    /// Lines that are not valid UTF-8 are ignored. The return value is always
    /// `line.len()`.
    pub fn process_header_bytes(&mut self, line: &[u8]) -> usize {
        if let Ok(text) = std::str::from_utf8(line) {
            self.process_header(text);
        }
        line.len()
    }

    /// Headers accumulated so far.
    pub fn headers(&self) -> &Headers {
        &self.headers
    }

    /// Consumes the parser, returning the accumulated headers.
    pub fn into_headers(self) -> Headers {
        self.headers
    }

    /// Forgets every accumulated header.
    pub fn reset(&mut self) {
        self.headers.clear();
    }
}

/// Splits `Name: Value`, trimming the value.
fn split_header(line: &str) -> Option<(&str, &str)> {
    let (name, value) = line.split_once(':')?;
    if !is_token(name) {
        return None;
    }
    Some((name, value.trim()))
}

/// RFC 9110 `token`: one or more tchar.
fn is_token(name: &str) -> bool {
    !name.is_empty()
        && name.bytes().all(|b| {
            b.is_ascii_alphanumeric()
                || matches!(
                    b,
                    b'!' | b'#'
                        | b'$'
                        | b'%'
                        | b'&'
                        | b'\''
                        | b'*'
                        | b'+'
                        | b'-'
                        | b'.'
                        | b'^'
                        | b'_'
                        | b'`'
                        | b'|'
                        | b'~'
                )
        })
}
