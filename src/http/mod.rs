//! HTTP building blocks shared by the connector and transports.
//!
//! - [`Request`]: one outgoing exchange, as built by the connector
//! - [`HttpResponse`]: the raw result of one exchange, as returned by a transport
//! - [`Headers`]: ordered, case-insensitive header mapping
//! - [`HeaderParser`]: incremental header line accumulator
//! - [`Transport`]: the pluggable exchange mechanism

mod headers;
mod parser;
mod transport;

pub use headers::Headers;
pub use parser::HeaderParser;
pub use reqwest::{Method, StatusCode};
pub use transport::{ReqwestTransport, Transport, TransportError};

/// An outgoing HTTP request.
///
/// Requests are assembled by the [`Connector`](crate::Connector) and are
/// read-only from then on; one request is built per redirect hop.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Request {
    method: Method,
    url: String,
    headers: Headers,
    body: Option<String>,
}

impl Request {
    /// Creates a request without headers or body.
    pub fn new(method: Method, url: impl Into<String>) -> Self {
        Self {
            method,
            url: url.into(),
            headers: Headers::new(),
            body: None,
        }
    }

    /// Adds a header, replacing any existing header of the same name.
    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(name, value);
        self
    }

    /// Sets the request body.
    pub fn with_body(mut self, body: impl Into<String>) -> Self {
        self.body = Some(body.into());
        self
    }

    /// The HTTP method.
    pub fn method(&self) -> &Method {
        &self.method
    }

    /// The target URL.
    pub fn url(&self) -> &str {
        &self.url
    }

    /// Looks up a header, ignoring case.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name)
    }

    /// All request headers.
    pub fn headers(&self) -> &Headers {
        &self.headers
    }

    /// The request body, for methods that carry one.
    pub fn body(&self) -> Option<&str> {
        self.body.as_deref()
    }
}

/// The raw outcome of a single HTTP exchange.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    /// Status code.
    pub status: u16,
    /// Response headers.
    pub headers: Headers,
    /// Undecoded response body.
    pub payload: String,
}

impl HttpResponse {
    /// Creates a response with the given status and payload and no headers.
    pub fn new(status: u16, payload: impl Into<String>) -> Self {
        Self {
            status,
            headers: Headers::new(),
            payload: payload.into(),
        }
    }

    /// Adds a header.
    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(name, value);
        self
    }

    /// Looks up a header, ignoring case.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name)
    }
}
