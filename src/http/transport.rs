//! Pluggable HTTP transports.

use std::future::Future;
use std::sync::Arc;

use reqwest::header::{HeaderMap, HeaderName, HeaderValue, AUTHORIZATION};
use reqwest::redirect::Policy;
use thiserror::Error;

use super::{Headers, HttpResponse, Request};
use crate::HttpClientConfig;

/// Errors raised by a [`Transport`] while performing an exchange.
#[derive(Debug, Error)]
pub enum TransportError {
    /// An HTTP request error occurred.
    #[error("HTTP request error: {0}")]
    Request(#[from] reqwest::Error),

    /// A request header could not be encoded.
    #[error("invalid header: {0}")]
    InvalidHeader(String),

    /// Error raised by a custom transport implementation.
    #[error(transparent)]
    Custom(Box<dyn std::error::Error + Send + Sync>),
}

/// Performs a single HTTP exchange.
///
/// Transports must not follow redirects themselves: the
/// [`Connector`](crate::Connector) inspects every 3xx response and decides
/// where to go next. Timeouts and cancellation are the transport's concern.
pub trait Transport: Send + Sync {
    /// Sends `request` and returns the raw response.
    fn send(
        &self,
        request: &Request,
    ) -> impl Future<Output = Result<HttpResponse, TransportError>> + Send;
}

impl<T: Transport + ?Sized> Transport for &T {
    fn send(
        &self,
        request: &Request,
    ) -> impl Future<Output = Result<HttpResponse, TransportError>> + Send {
        (**self).send(request)
    }
}

impl<T: Transport + ?Sized> Transport for Arc<T> {
    fn send(
        &self,
        request: &Request,
    ) -> impl Future<Output = Result<HttpResponse, TransportError>> + Send {
        (**self).send(request)
    }
}

/// [`Transport`] backed by a `reqwest` client.
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    http_client: reqwest::Client,
}

impl ReqwestTransport {
    /// Creates a transport with the default HTTP configuration.
    pub fn new() -> Result<Self, TransportError> {
        Self::with_config(HttpClientConfig::default())
    }

    /// Creates a transport with custom HTTP configuration.
    ///
    /// # Arguments
    ///
    /// * `config` - HTTP client configuration for timeouts and network binding
    pub fn with_config(config: HttpClientConfig) -> Result<Self, TransportError> {
        let mut builder = reqwest::Client::builder()
            .redirect(Policy::none())
            .timeout(config.timeout.unwrap_or(std::time::Duration::from_secs(30)));

        if let Some(addr) = config.local_address {
            builder = builder.local_address(addr);
        }

        #[cfg(any(
            target_os = "android",
            target_os = "fuchsia",
            target_os = "linux",
            target_os = "macos",
            target_os = "ios",
            target_os = "tvos",
            target_os = "watchos",
            target_os = "illumos",
            target_os = "solaris",
        ))]
        if let Some(ref iface) = config.interface {
            builder = builder.interface(iface);
        }

        Ok(Self {
            http_client: builder.build()?,
        })
    }

    /// Wraps an existing client.
    ///
    /// The client must have redirects disabled (`Policy::none()`), otherwise
    /// the connector never sees 3xx responses.
    pub fn from_client(http_client: reqwest::Client) -> Self {
        Self { http_client }
    }

    fn header_map(request: &Request) -> Result<HeaderMap, TransportError> {
        let mut headers = HeaderMap::with_capacity(request.headers().len());
        for (name, value) in request.headers().iter() {
            let header_name = HeaderName::from_bytes(name.as_bytes())
                .map_err(|_| TransportError::InvalidHeader(name.to_string()))?;
            let mut header_value = HeaderValue::from_str(value)
                .map_err(|_| TransportError::InvalidHeader(name.to_string()))?;
            if header_name == AUTHORIZATION {
                header_value.set_sensitive(true);
            }
            headers.insert(header_name, header_value);
        }
        Ok(headers)
    }
}

impl Transport for ReqwestTransport {
    async fn send(&self, request: &Request) -> Result<HttpResponse, TransportError> {
        let mut builder = self
            .http_client
            .request(request.method().clone(), request.url())
            .headers(Self::header_map(request)?);

        if let Some(body) = request.body() {
            builder = builder.body(body.to_string());
        }

        let response = builder.send().await?;
        let status = response.status().as_u16();
        let mut headers = Headers::new();
        for (name, value) in response.headers() {
            if let Ok(value) = value.to_str() {
                headers.append(name.as_str(), value);
            }
        }
        let payload = response.text().await?;

        Ok(HttpResponse {
            status,
            headers,
            payload,
        })
    }
}
