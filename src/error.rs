use std::time::Duration;

use thiserror::Error;

use crate::broker::BrokerError;
use crate::naming::NamingError;

/// Error returned from a correlated retrieval call.
///
/// Every call yields either the message or exactly one of these.
#[derive(Debug, Error)]
pub enum MessageError {
    /// The request was rejected before any resource was opened.
    #[error("invalid request: {0}")]
    Validation(String),
    /// The broker could not be looked up or connected to.
    #[error("connection failed: {0}")]
    Connection(#[source] ConnectError),
    /// Subscribing or waiting failed for a reason other than expiry.
    #[error("error when retrieving message: {0}")]
    Retrieval(#[source] BrokerError),
    /// No matching message arrived before the deadline.
    #[error("no message with correlation id {correlation_id} within {timeout:?}")]
    Timeout {
        correlation_id: String,
        timeout: Duration,
    },
    /// A message arrived but its payload is not of the requested shape.
    #[error("expected {expected} payload: {reason}")]
    UnexpectedPayload {
        expected: &'static str,
        reason: String,
    },
}

impl MessageError {
    pub fn is_timeout(&self) -> bool {
        matches!(self, MessageError::Timeout { .. })
    }
}

/// Why a connection could not be established.
#[derive(Debug, Error)]
pub enum ConnectError {
    #[error("lookup: {0}")]
    Lookup(#[from] NamingError),
    #[error("transport: {0}")]
    Transport(#[from] BrokerError),
}

impl From<NamingError> for MessageError {
    fn from(err: NamingError) -> Self {
        MessageError::Connection(ConnectError::Lookup(err))
    }
}

/// Failure while releasing resources after the outcome of a call is known.
///
/// Only ever logged; it never replaces the result of the call.
#[derive(Debug, Error)]
pub enum CleanupError {
    #[error("failed to close consumer: {0}")]
    Consumer(#[source] BrokerError),
    #[error("failed to stop connection: {0}")]
    Stop(#[source] BrokerError),
    #[error("failed to close connection: {0}")]
    Close(#[source] BrokerError),
}
