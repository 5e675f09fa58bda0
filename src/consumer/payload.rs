//! Delivered messages and typed payload extraction.

use std::time::SystemTime;

use serde::de::DeserializeOwned;

use crate::broker::Message;
use crate::MessageError;

/// A message handed to the caller by a retrieval call.
#[derive(Debug, Clone)]
pub struct ReceivedMessage {
    pub message_id: String,
    pub correlation_id: String,
    pub payload: Vec<u8>,
    pub properties: Vec<(String, String)>,
    /// When the producer handed the message to the broker, if known
    pub sent_at: Option<SystemTime>,
    /// When this call received it
    pub delivered_at: SystemTime,
}

impl ReceivedMessage {
    pub(crate) fn delivered(message: Message, correlation_id: &str) -> Self {
        Self {
            message_id: message.id,
            correlation_id: message
                .correlation_id
                .unwrap_or_else(|| correlation_id.to_string()),
            payload: message.payload,
            properties: message.properties,
            sent_at: message.timestamp,
            delivered_at: SystemTime::now(),
        }
    }

    /// Get the payload as text (if valid UTF-8).
    pub fn text(&self) -> Option<&str> {
        std::str::from_utf8(&self.payload).ok()
    }
}

/// Conversion from a delivered message into the type a caller asked for.
///
/// A payload of the wrong shape yields `MessageError::UnexpectedPayload`
/// instead of an unchecked cast.
pub trait FromMessage: Sized {
    fn from_message(message: ReceivedMessage) -> Result<Self, MessageError>;
}

impl FromMessage for ReceivedMessage {
    fn from_message(message: ReceivedMessage) -> Result<Self, MessageError> {
        Ok(message)
    }
}

/// Raw payload bytes.
impl FromMessage for Vec<u8> {
    fn from_message(message: ReceivedMessage) -> Result<Self, MessageError> {
        Ok(message.payload)
    }
}

/// Text payload; fails if the bytes are not UTF-8.
impl FromMessage for String {
    fn from_message(message: ReceivedMessage) -> Result<Self, MessageError> {
        String::from_utf8(message.payload).map_err(|e| MessageError::UnexpectedPayload {
            expected: "text",
            reason: e.to_string(),
        })
    }
}

/// JSON payload deserialized into `T`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Json<T>(pub T);

impl<T: DeserializeOwned> FromMessage for Json<T> {
    fn from_message(message: ReceivedMessage) -> Result<Self, MessageError> {
        serde_json::from_slice(&message.payload)
            .map(Json)
            .map_err(|e| MessageError::UnexpectedPayload {
                expected: "json",
                reason: e.to_string(),
            })
    }
}

/// Bitcode-encoded payload deserialized into `T`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Bitcode<T>(pub T);

impl<T: DeserializeOwned> FromMessage for Bitcode<T> {
    fn from_message(message: ReceivedMessage) -> Result<Self, MessageError> {
        bitcode::deserialize(&message.payload)
            .map(Bitcode)
            .map_err(|e| MessageError::UnexpectedPayload {
                expected: "bitcode",
                reason: e.to_string(),
            })
    }
}
