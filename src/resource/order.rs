use core::fmt;

use serde_json::{Map, Value};

use super::Resource;
use crate::digest::Digest;
use crate::http::{Method, Transport};
use crate::{ApplyOptions, Connector, ConnectorError};

/// Media type of checkout orders.
pub const ORDER_CONTENT_TYPE: &str = "application/vnd.klarna.checkout.aggregated-order-v2+json";

const PRODUCTION_BASE_URI: &str = "https://checkout.klarna.com/checkout/orders";
const SANDBOX_BASE_URI: &str = "https://checkout.testdrive.klarna.com/checkout/orders";

/// API environment an order is created in.
///
/// # Example
///
/// ```
/// use checkout_connector::Environment;
///
/// let env = Environment::Sandbox;
/// assert!(!env.is_production());
/// assert!(env.base_uri().contains("testdrive"));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Environment {
    /// Production environment - real purchases.
    #[default]
    Production,
    /// Sandbox/testing environment - safe for development and testing.
    Sandbox,
}

impl Environment {
    /// Returns `true` if this is the production environment.
    pub fn is_production(&self) -> bool {
        matches!(self, Environment::Production)
    }

    /// Returns `true` if this is the sandbox environment.
    pub fn is_sandbox(&self) -> bool {
        matches!(self, Environment::Sandbox)
    }

    /// URI new orders are created under.
    pub fn base_uri(&self) -> &'static str {
        match self {
            Environment::Production => PRODUCTION_BASE_URI,
            Environment::Sandbox => SANDBOX_BASE_URI,
        }
    }
}

impl fmt::Display for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Environment::Production => write!(f, "production"),
            Environment::Sandbox => write!(f, "sandbox"),
        }
    }
}

/// A checkout order.
///
/// The order is a JSON object; its fields are read and written with
/// [`Order::get`] and [`Order::set`] and refreshed from every successful
/// response.
///
/// # Example
///
/// ```no_run
/// use checkout_connector::{Connector, Environment, Order};
/// use serde_json::json;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
/// let connector = Connector::from_secret("sharedSecret")?;
/// let mut order = Order::new(Environment::Sandbox);
///
/// let data = json!({ "purchase_country": "SE", "purchase_currency": "SEK" });
/// order.create(&connector, data.as_object().cloned().unwrap_or_default()).await?;
/// order.fetch(&connector).await?;
///
/// println!("order status: {:?}", order.get("status"));
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Order {
    base_uri: String,
    location: Option<String>,
    data: Map<String, Value>,
}

impl Order {
    /// Creates a new, not yet submitted order.
    pub fn new(environment: Environment) -> Self {
        Self::with_base_uri(environment.base_uri())
    }

    /// Creates a new order posted to a custom base URI.
    ///
    /// This is primarily useful for testing with mock servers.
    pub fn with_base_uri(base_uri: &str) -> Self {
        Self {
            base_uri: base_uri.to_string(),
            location: None,
            data: Map::new(),
        }
    }

    /// Refers to an existing order at `location`.
    pub fn with_location(location: &str) -> Self {
        Self {
            base_uri: PRODUCTION_BASE_URI.to_string(),
            location: Some(location.to_string()),
            data: Map::new(),
        }
    }

    /// URI the order is created under.
    pub fn base_uri(&self) -> &str {
        &self.base_uri
    }

    /// Reads an order field.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.data.get(key)
    }

    /// Writes an order field, returning the previous value.
    pub fn set(&mut self, key: impl Into<String>, value: Value) -> Option<Value> {
        self.data.insert(key.into(), value)
    }

    /// Submits a new order. On success the order's location points to the
    /// created resource.
    pub async fn create<T: Transport, D: Digest>(
        &mut self,
        connector: &Connector<T, D>,
        data: Map<String, Value>,
    ) -> Result<(), ConnectorError> {
        let options = ApplyOptions::new().url(self.base_uri.clone()).data(data);
        connector.apply(Method::POST, self, options).await?;
        Ok(())
    }

    /// Reloads the order from its location.
    pub async fn fetch<T: Transport, D: Digest>(
        &mut self,
        connector: &Connector<T, D>,
    ) -> Result<(), ConnectorError> {
        connector
            .apply(Method::GET, self, ApplyOptions::default())
            .await?;
        Ok(())
    }

    /// Sends changed fields to the order's location.
    pub async fn update<T: Transport, D: Digest>(
        &mut self,
        connector: &Connector<T, D>,
        data: Map<String, Value>,
    ) -> Result<(), ConnectorError> {
        connector
            .apply(Method::POST, self, ApplyOptions::new().data(data))
            .await?;
        Ok(())
    }
}

impl Resource for Order {
    fn content_type(&self) -> &str {
        ORDER_CONTENT_TYPE
    }

    fn location(&self) -> Option<&str> {
        self.location.as_deref()
    }

    fn set_location(&mut self, location: &str) {
        self.location = Some(location.to_string());
    }

    fn marshal(&self) -> Map<String, Value> {
        self.data.clone()
    }

    fn parse(&mut self, data: &Map<String, Value>) {
        self.data = data.clone();
    }
}
