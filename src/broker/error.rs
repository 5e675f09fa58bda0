//! Transport-level error type.

use std::error::Error;

use thiserror::Error;

/// Error raised by a broker transport.
///
/// These are the failures a real client library reports (JMS `JMSException`,
/// AMQP channel errors, ...). The consumer maps them onto call-level
/// [`MessageError`](crate::MessageError) kinds depending on where they occur.
#[derive(Debug, Error)]
pub enum BrokerError {
    /// The broker could not be reached or refused the connection.
    #[error("connection failed: {0}")]
    ConnectionFailed(String),
    /// A session could not be created on an open connection.
    #[error("session failed: {0}")]
    SessionFailed(String),
    /// A consumer could not be created for the destination/selector.
    #[error("consumer failed: {0}")]
    ConsumerFailed(String),
    /// The connection, session or consumer has already been closed.
    #[error("{0} is closed")]
    Closed(&'static str),
    /// A broker-internal lock was poisoned by a panicking thread.
    #[error("broker lock poisoned during {0}")]
    LockPoisoned(&'static str),
    /// Other error
    #[error("broker error: {0}")]
    Other(Box<dyn Error + Send + Sync>),
}
