//! Connector for a checkout (payment-service) API.
//!
//! The [`Connector`] sends signed requests for API [resources](Resource),
//! follows redirects and maps unexpected statuses and malformed payloads to
//! typed [errors](ConnectorError). Everything it talks to is pluggable:
//!
//! - [`Transport`]: performs one HTTP exchange ([`ReqwestTransport`] by default)
//! - [`Digest`]: signs requests ([`Sha256Digest`] by default)
//! - [`Resource`]: what is being fetched or created ([`Order`])
//!
//! # Example
//!
//! ```no_run
//! use checkout_connector::{ApplyOptions, Connector, Environment, Method, Order};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
//! let connector = Connector::from_secret("sharedSecret")?;
//! let mut order = Order::new(Environment::Sandbox);
//!
//! let response = connector
//!     .apply(
//!         Method::GET,
//!         &mut order,
//!         ApplyOptions::new().url("https://checkout.testdrive.klarna.com/checkout/orders/ABC"),
//!     )
//!     .await?;
//!
//! println!("{}", response.data());
//! # Ok(())
//! # }
//! ```
//!
//! # Errors
//!
//! | Outcome | Error |
//! |---------|-------|
//! | `2xx` with a non-JSON body | [`ConnectorError::Format`] |
//! | `4xx`, `5xx`, `3xx` without `Location` | [`ConnectorError::Status`] |
//! | Redirect back to a visited URL | [`ConnectorError::RedirectLoop`] |
//! | More than [`DEFAULT_MAX_REDIRECTS`] hops | [`ConnectorError::TooManyRedirects`] |
//! | Network failure | [`ConnectorError::Transport`] |

use std::net::IpAddr;
use std::time::Duration;

mod connector;
mod digest;
mod error;
pub mod http;
pub mod resource;
mod user_agent;

pub use connector::{ApplyOptions, Connector, Response, DEFAULT_MAX_REDIRECTS};
pub use digest::{Digest, Sha256Digest};
pub use error::{ConnectorError, StatusError};
pub use http::{
    HeaderParser, Headers, HttpResponse, Method, ReqwestTransport, Request, Transport,
    TransportError,
};
pub use resource::{Environment, Order, Resource, ORDER_CONTENT_TYPE};
pub use user_agent::{DuplicateFieldError, UserAgent};

/// HTTP client configuration for the [`ReqwestTransport`].
///
/// # Example
///
/// ```
/// use checkout_connector::HttpClientConfig;
/// use std::time::Duration;
///
/// let config = HttpClientConfig::new()
///     .timeout(Duration::from_secs(10))
///     .local_address("127.0.0.1".parse().unwrap());
///
/// assert_eq!(config.timeout, Some(Duration::from_secs(10)));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HttpClientConfig {
    /// Local IP address to bind outgoing connections to.
    pub local_address: Option<IpAddr>,

    /// Network interface to bind to (Linux, macOS and a few other Unixes).
    pub interface: Option<String>,

    /// Total request timeout. Defaults to 30 seconds when unset.
    pub timeout: Option<Duration>,
}

impl HttpClientConfig {
    /// Creates an empty configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Binds outgoing connections to `addr`.
    pub fn local_address(mut self, addr: IpAddr) -> Self {
        self.local_address = Some(addr);
        self
    }

    /// Binds outgoing connections to the network interface `name`.
    pub fn interface(mut self, name: impl Into<String>) -> Self {
        self.interface = Some(name.into());
        self
    }

    /// Sets the total request timeout.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }
}
