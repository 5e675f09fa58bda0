//! Broker message and destination types.

use std::fmt;
use std::time::SystemTime;

/// A message as it travels through the broker.
#[derive(Clone, Debug)]
pub struct Message {
    /// Broker-assigned or producer-chosen message id
    pub id: String,
    /// Correlation id linking a reply to its request
    pub correlation_id: Option<String>,
    /// Serialized payload (text, JSON or binary)
    pub payload: Vec<u8>,
    /// Application properties (headers)
    pub properties: Vec<(String, String)>,
    /// Time the message was handed to the broker
    pub timestamp: Option<SystemTime>,
}

impl Message {
    /// Create a new message with the given payload.
    pub fn new(id: impl Into<String>, payload: Vec<u8>) -> Self {
        Self {
            id: id.into(),
            correlation_id: None,
            payload,
            properties: Vec::new(),
            timestamp: None,
        }
    }

    /// Create a message with a text payload.
    pub fn with_string_payload(id: impl Into<String>, payload: impl Into<String>) -> Self {
        Self::new(id, payload.into().into_bytes())
    }

    /// Create a message with a bitcode-serialized payload.
    pub fn encode<T: serde::Serialize>(
        id: impl Into<String>,
        payload: &T,
    ) -> Result<Self, bitcode::Error> {
        let bytes = bitcode::serialize(payload)?;
        Ok(Self::new(id, bytes))
    }

    /// Decode the payload from bitcode binary format.
    pub fn decode<T: serde::de::DeserializeOwned>(&self) -> Result<T, bitcode::Error> {
        bitcode::deserialize(&self.payload)
    }

    /// Set the correlation id.
    pub fn correlated(mut self, correlation_id: impl Into<String>) -> Self {
        self.correlation_id = Some(correlation_id.into());
        self
    }

    /// Add an application property.
    pub fn with_property(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.properties.push((key.into(), value.into()));
        self
    }

    /// Look up an application property by key.
    pub fn property(&self, key: &str) -> Option<&str> {
        self.properties
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// Get the payload as a string (if valid UTF-8).
    pub fn payload_str(&self) -> Option<&str> {
        std::str::from_utf8(&self.payload).ok()
    }
}

/// Kind of addressable destination.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum DestinationKind {
    /// Point-to-point: each message goes to one consumer.
    Queue,
    /// Fan-out: each subscriber sees each message.
    Topic,
}

/// A named, addressable queue or topic on the broker.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Destination {
    name: String,
    kind: DestinationKind,
}

impl Destination {
    pub fn queue(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind: DestinationKind::Queue,
        }
    }

    pub fn topic(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind: DestinationKind::Topic,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn kind(&self) -> DestinationKind {
        self.kind
    }
}

impl fmt::Display for Destination {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind {
            DestinationKind::Queue => write!(f, "queue://{}", self.name),
            DestinationKind::Topic => write!(f, "topic://{}", self.name),
        }
    }
}
