//! The connector: signed requests, redirects and error mapping.
//!
//! [`Connector::apply`] turns a `(method, resource, options)` triple into a
//! finished HTTP exchange:
//!
//! 1. build a request for the target URL, signed with the digest of the body
//!    and the shared secret
//! 2. send it through the [`Transport`]
//! 3. follow `301`, `302`, `303`, `307` and `308` responses that carry a
//!    `Location` header, building a fresh request for every hop
//! 4. decode the payload of a `2xx` response as JSON, or fail with a
//!    [`ConnectorError`] for any other status

use core::fmt;

use serde::de::DeserializeOwned;
use serde_json::{Map, Value};
use tracing::{debug, warn};
use url::Url;

use crate::digest::{Digest, Sha256Digest};
use crate::error::{ConnectorError, StatusError};
use crate::http::{
    Headers, HttpResponse, Method, ReqwestTransport, Request, Transport, TransportError,
};
use crate::resource::Resource;
use crate::user_agent::UserAgent;
use crate::HttpClientConfig;

/// Redirects followed by a single `apply` call unless configured otherwise.
pub const DEFAULT_MAX_REDIRECTS: usize = 5;

/// Per-call overrides for [`Connector::apply`].
///
/// # Example
///
/// ```
/// use checkout_connector::ApplyOptions;
///
/// let options = ApplyOptions::new().url("https://example.com/orders/1");
/// assert_eq!(options.url.as_deref(), Some("https://example.com/orders/1"));
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ApplyOptions {
    /// URL of the first request, instead of the resource's location.
    ///
    /// Redirect hops always go to the `Location` they were given.
    pub url: Option<String>,

    /// Request body, instead of the marshalled resource.
    pub data: Option<Map<String, Value>>,
}

impl ApplyOptions {
    /// Creates empty options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Overrides the URL of the first request.
    pub fn url(mut self, url: impl Into<String>) -> Self {
        self.url = Some(url.into());
        self
    }

    /// Overrides the request body.
    pub fn data(mut self, data: Map<String, Value>) -> Self {
        self.data = Some(data);
        self
    }
}

/// The successful result of [`Connector::apply`].
#[derive(Debug, Clone, PartialEq)]
pub struct Response {
    status: u16,
    headers: Headers,
    payload: String,
    data: Value,
    request: Request,
}

impl Response {
    /// The status code of the final hop.
    pub fn status(&self) -> u16 {
        self.status
    }

    /// Looks up a response header, ignoring case.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name)
    }

    /// All response headers.
    pub fn headers(&self) -> &Headers {
        &self.headers
    }

    /// The undecoded response body.
    pub fn payload(&self) -> &str {
        &self.payload
    }

    /// The decoded response body.
    ///
    /// `Value::Null` for a `201` or `204` without body.
    pub fn data(&self) -> &Value {
        &self.data
    }

    /// Deserializes the response body into `T`.
    pub fn json<T: DeserializeOwned>(&self) -> Result<T, serde_json::Error> {
        T::deserialize(&self.data)
    }

    /// The request that produced this response, i.e. the last hop.
    pub fn request(&self) -> &Request {
        &self.request
    }
}

/// Sends signed requests to the checkout API.
///
/// The connector's configuration is read-only after construction, so one
/// connector can serve concurrent calls as long as its transport and digest
/// can.
///
/// # Example
///
/// ```no_run
/// use checkout_connector::{ApplyOptions, Connector, Method, Order};
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
/// let connector = Connector::from_secret("sharedSecret")?;
/// let mut order = Order::with_location("https://checkout.testdrive.klarna.com/checkout/orders/ABC");
///
/// let response = connector
///     .apply(Method::GET, &mut order, ApplyOptions::default())
///     .await?;
/// println!("{}", response.data());
/// # Ok(())
/// # }
/// ```
pub struct Connector<T, D = Sha256Digest> {
    transport: T,
    digest: D,
    secret: String,
    user_agent: UserAgent,
    max_redirects: usize,
}

impl Connector<ReqwestTransport, Sha256Digest> {
    /// Creates a connector using the `reqwest` transport and the production
    /// digest.
    ///
    /// # Arguments
    ///
    /// * `secret` - Shared secret used to sign requests
    pub fn from_secret(secret: impl Into<String>) -> Result<Self, TransportError> {
        Self::with_config(secret, HttpClientConfig::default())
    }

    /// Creates a connector using the `reqwest` transport with custom HTTP
    /// configuration.
    ///
    /// # Arguments
    ///
    /// * `secret` - Shared secret used to sign requests
    /// * `config` - HTTP client configuration for timeouts and network binding
    pub fn with_config(
        secret: impl Into<String>,
        config: HttpClientConfig,
    ) -> Result<Self, TransportError> {
        Ok(Self::new(
            ReqwestTransport::with_config(config)?,
            Sha256Digest,
            secret,
        ))
    }
}

impl<T: Transport, D: Digest> Connector<T, D> {
    /// Creates a connector from its parts.
    pub fn new(transport: T, digest: D, secret: impl Into<String>) -> Self {
        Self {
            transport,
            digest,
            secret: secret.into(),
            user_agent: UserAgent::default(),
            max_redirects: DEFAULT_MAX_REDIRECTS,
        }
    }

    /// Replaces the `User-Agent` sent with every request.
    pub fn with_user_agent(mut self, user_agent: UserAgent) -> Self {
        self.user_agent = user_agent;
        self
    }

    /// Sets how many redirects one `apply` call may follow.
    pub fn with_max_redirects(mut self, max_redirects: usize) -> Self {
        self.max_redirects = max_redirects;
        self
    }

    /// The underlying transport.
    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// The `User-Agent` sent with every request.
    pub fn user_agent(&self) -> &UserAgent {
        &self.user_agent
    }

    /// Applies `method` to `resource`.
    ///
    /// Redirects are followed until a final status arrives. A `2xx` payload
    /// is decoded as JSON and returned with the last request; every other
    /// outcome is an error.
    pub async fn apply<R: Resource + ?Sized>(
        &self,
        method: Method,
        resource: &mut R,
        options: ApplyOptions,
    ) -> Result<Response, ConnectorError> {
        let mut url = match options.url.as_deref().or_else(|| resource.location()) {
            Some(url) => url.to_string(),
            None => return Err(ConnectorError::MissingUrl),
        };
        let mut method = method;
        let mut visited = vec![(method.clone(), url.clone())];

        loop {
            let request = self.build_request(method.clone(), &url, &*resource, &options);
            debug!(method = %request.method(), url = request.url(), "sending request");

            let response = self.transport.send(&request).await?;
            debug!(status = response.status, url = request.url(), "received response");

            let location = match response.status {
                301 | 302 | 303 | 307 | 308 => response.header("Location"),
                200..=299 => return finish(response, request, resource),
                _ => None,
            };

            let Some(location) = location else {
                return Err(StatusError::new(response.status, response.payload, request).into());
            };

            let next = resolve_location(request.url(), location);
            let next_method = if response.status == 303 {
                Method::GET
            } else {
                method.clone()
            };

            if visited.iter().any(|(m, u)| *m == next_method && *u == next) {
                warn!(url = %next, "redirect loop detected");
                return Err(ConnectorError::RedirectLoop {
                    request: Box::new(request),
                });
            }
            if visited.len() > self.max_redirects {
                warn!(limit = self.max_redirects, "redirect limit reached");
                return Err(ConnectorError::TooManyRedirects {
                    limit: self.max_redirects,
                    request: Box::new(request),
                });
            }

            // Only a hop that is actually followed may move the resource.
            if matches!(response.status, 301 | 308) {
                resource.set_location(&next);
            }

            debug!(status = response.status, location = %next, "following redirect");
            visited.push((next_method.clone(), next.clone()));
            method = next_method;
            url = next;
        }
    }

    fn build_request<R: Resource + ?Sized>(
        &self,
        method: Method,
        url: &str,
        resource: &R,
        options: &ApplyOptions,
    ) -> Request {
        let body = carries_body(&method).then(|| {
            let data = options.data.clone().unwrap_or_else(|| resource.marshal());
            Value::Object(data).to_string()
        });

        let digest = self
            .digest
            .create(&format!("{}{}", body.as_deref().unwrap_or(""), self.secret));

        let mut request = Request::new(method, url)
            .with_header("User-Agent", self.user_agent.to_string())
            .with_header("Authorization", format!("Klarna {digest}"))
            .with_header("Accept", resource.content_type());

        if let Some(body) = body {
            request = request
                .with_header("Content-Type", resource.content_type())
                .with_body(body);
        }

        request
    }
}

impl<T, D> fmt::Debug for Connector<T, D> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Connector")
            .field("user_agent", &self.user_agent.to_string())
            .field("max_redirects", &self.max_redirects)
            .finish_non_exhaustive()
    }
}

/// Builds the response of a successful hop.
fn finish<R: Resource + ?Sized>(
    response: HttpResponse,
    request: Request,
    resource: &mut R,
) -> Result<Response, ConnectorError> {
    let HttpResponse {
        status,
        headers,
        payload,
    } = response;

    if status == 201 {
        if let Some(location) = headers.get("Location") {
            resource.set_location(&resolve_location(request.url(), location));
        }
    }

    let data = if matches!(status, 201 | 204) && payload.trim().is_empty() {
        Value::Null
    } else {
        match serde_json::from_str::<Value>(&payload) {
            Ok(data) => data,
            Err(source) => {
                return Err(ConnectorError::Format {
                    source,
                    request: Box::new(request),
                })
            }
        }
    };

    if status == 200 {
        if let Value::Object(map) = &data {
            resource.parse(map);
        }
    }

    Ok(Response {
        status,
        headers,
        payload,
        data,
        request,
    })
}

fn carries_body(method: &Method) -> bool {
    *method == Method::POST || *method == Method::PUT || *method == Method::PATCH
}

/// Resolves a `Location` header against the URL that returned it.
///
/// Non-absolute current URLs are not resolvable; the location is used as is.
fn resolve_location(current: &str, location: &str) -> String {
    match Url::parse(current) {
        Ok(base) => base
            .join(location)
            .map(String::from)
            .unwrap_or_else(|_| location.to_string()),
        Err(_) => location.to_string(),
    }
}
