//! Errors returned by [`Connector::apply`](crate::Connector::apply).

use core::fmt;

use reqwest::StatusCode;
use thiserror::Error;

use crate::http::{Request, TransportError};

/// Errors that may occur while applying a request.
///
/// Every variant aborts the whole `apply` call; no partial response is
/// returned. Only redirect statuses lead to a follow-up request, transport
/// failures are never retried.
#[derive(Debug, Error)]
pub enum ConnectorError {
    /// A 2xx response carried a payload that is not valid JSON.
    #[error("bad format on response content: {source}")]
    Format {
        /// The JSON decoding error.
        source: serde_json::Error,
        /// The request that produced the response.
        request: Box<Request>,
    },

    /// The API answered with a status that is neither success nor a
    /// followable redirect.
    #[error(transparent)]
    Status(#[from] StatusError),

    /// The transport failed to perform the exchange.
    #[error("transport error: {0}")]
    Transport(#[from] TransportError),

    /// A redirect pointed back at a URL already visited during this call.
    #[error("infinite redirect loop detected at {}", .request.url())]
    RedirectLoop {
        /// The request whose response redirected to a visited URL.
        request: Box<Request>,
    },

    /// More redirects than the connector allows.
    #[error("too many redirects (limit is {limit})")]
    TooManyRedirects {
        /// The configured redirect limit.
        limit: usize,
        /// The last request sent.
        request: Box<Request>,
    },

    /// Neither the options nor the resource provide a URL.
    #[error("no URL to send the request to")]
    MissingUrl,
}

impl ConnectorError {
    /// The last request attempted before the failure, when one was sent.
    pub fn request(&self) -> Option<&Request> {
        match self {
            ConnectorError::Format { request, .. }
            | ConnectorError::RedirectLoop { request }
            | ConnectorError::TooManyRedirects { request, .. } => Some(request.as_ref()),
            ConnectorError::Status(err) => Some(err.request()),
            ConnectorError::Transport(_) | ConnectorError::MissingUrl => None,
        }
    }

    /// The HTTP status code, for [`ConnectorError::Status`].
    pub fn status(&self) -> Option<u16> {
        match self {
            ConnectorError::Status(err) => Some(err.status()),
            _ => None,
        }
    }
}

/// A terminal HTTP status returned by the API.
///
/// Displays as `"<code> <reason>"`, e.g. `503 Service Unavailable`.
#[derive(Debug)]
pub struct StatusError {
    status: u16,
    payload: String,
    data: Option<serde_json::Value>,
    request: Box<Request>,
}

impl StatusError {
    pub(crate) fn new(status: u16, payload: String, request: Request) -> Self {
        let data = serde_json::from_str(&payload).ok();
        Self {
            status,
            payload,
            data,
            request: Box::new(request),
        }
    }

    /// The status code.
    pub fn status(&self) -> u16 {
        self.status
    }

    /// Human-readable reason phrase, e.g. `"Forbidden"`.
    pub fn reason(&self) -> &'static str {
        StatusCode::from_u16(self.status)
            .ok()
            .and_then(|status| status.canonical_reason())
            .unwrap_or("Unknown Status")
    }

    /// The raw response body.
    pub fn payload(&self) -> &str {
        &self.payload
    }

    /// The response body decoded as JSON, when it is JSON.
    ///
    /// API errors usually carry details such as `internal_message` here.
    pub fn data(&self) -> Option<&serde_json::Value> {
        self.data.as_ref()
    }

    /// The request that received this status.
    pub fn request(&self) -> &Request {
        &self.request
    }
}

impl fmt::Display for StatusError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.status, self.reason())
    }
}

impl std::error::Error for StatusError {}
