use crate::protocol::Protocol;
use serde_json::{Map, Value};

/// Outgoing request accumulated by parameter execution
///
/// The payload is handed to the transport by value once it is complete.
#[derive(Debug, Clone, PartialEq)]
pub enum RequestPayload {
    /// Ordered `key=value` fragments
    Params(Vec<String>),
    /// JSON request body
    Json(Map<String, Value>),
}

impl RequestPayload {
    /// Empty payload for a protocol
    pub fn new(protocol: Protocol) -> Self {
        match protocol {
            Protocol::Solr4 => RequestPayload::Params(Vec::new()),
            Protocol::Solr5 => RequestPayload::Json(Map::new()),
        }
    }

    pub fn protocol(&self) -> Protocol {
        match self {
            RequestPayload::Params(_) => Protocol::Solr4,
            RequestPayload::Json(_) => Protocol::Solr5,
        }
    }

    /// Fragments joined into a query string (`a=1&b=2`), or the JSON body
    pub fn to_wire_string(&self) -> String {
        match self {
            RequestPayload::Params(fragments) => fragments.join("&"),
            RequestPayload::Json(body) => Value::Object(body.clone()).to_string(),
        }
    }

    pub fn as_params(&self) -> Option<&[String]> {
        match self {
            RequestPayload::Params(fragments) => Some(fragments),
            RequestPayload::Json(_) => None,
        }
    }

    pub fn as_json(&self) -> Option<&Map<String, Value>> {
        match self {
            RequestPayload::Params(_) => None,
            RequestPayload::Json(body) => Some(body),
        }
    }
}
