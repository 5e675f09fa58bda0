//! Blocking request/reply over message brokers.
//!
//! A caller sends a request elsewhere, then blocks on a [`CorrelatedConsumer`]
//! until the reply carrying the same correlation id arrives or a deadline
//! expires. Each call opens its own connection, subscribes with a
//! `JMSCorrelationID` selector, waits once, and releases everything before
//! returning.
//!
//! - [`broker`] - transport traits and an in-memory broker
//! - [`naming`] - directory lookup with namespace fallback
//! - [`consumer`] - the correlated receive itself

pub mod broker;
mod config;
pub mod consumer;
mod error;
pub mod naming;

pub use config::{ConsumerConfig, DEFAULT_CONNECTION_FACTORY, DEFAULT_TIMEOUT_MS};
pub use consumer::{
    Bitcode, CallState, CorrelatedConsumer, CorrelationRequest, DestinationName, FromMessage,
    Json, ReceivedMessage,
};
pub use error::{CleanupError, ConnectError, MessageError};
