//! API resources sent and received through the connector.

mod order;

pub use order::{Environment, Order, ORDER_CONTENT_TYPE};

use serde_json::{Map, Value};

/// An entity of the checkout API.
///
/// A resource knows its media type, where it lives and how to serialize
/// itself. The connector updates the location when the API moves or creates
/// the resource, and hands successful payloads back through
/// [`Resource::parse`].
pub trait Resource {
    /// Media type used for the `Accept` and `Content-Type` headers.
    fn content_type(&self) -> &str;

    /// URL of the resource, once known.
    fn location(&self) -> Option<&str>;

    /// Records a new URL for the resource.
    fn set_location(&mut self, location: &str);

    /// The JSON object sent as request body.
    fn marshal(&self) -> Map<String, Value>;

    /// Receives the decoded body of a `200 OK` response.
    fn parse(&mut self, _data: &Map<String, Value>) {}
}
