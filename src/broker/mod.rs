//! Broker transport - connection, session and consumer abstractions
//!
//! This module provides the traits a message-broker client implements to be
//! driven by the correlated consumer, plus an in-memory implementation.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │          ConnectionFactory (shared, read-only)              │
//! │  - create_connection()                                      │
//! └─────────────────────────────────────────────────────────────┘
//!                            │ one per call
//!                            ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │   Connection → Session → MessageConsumer (single owner)     │
//! │  start() / stop() / close()                                 │
//! │  create_session(transacted, ack)                            │
//! │  create_consumer(destination, selector) / receive(timeout)  │
//! └─────────────────────────────────────────────────────────────┘
//!          │                  │                     │
//!          ▼                  ▼                     ▼
//! ┌──────────────┐    ┌─────────────┐    ┌─────────────────────┐
//! │InMemoryBroker│    │  Artemis    │    │   AMQP 1.0 client   │
//! │  (included)  │    │ (external)  │    │     (external)      │
//! └──────────────┘    └─────────────┘    └─────────────────────┘
//! ```

mod error;
mod in_memory;
mod message;
mod selector;
mod transport;

pub use error::BrokerError;
pub use in_memory::{
    BrokerStats, InMemoryBroker, InMemoryConnection, InMemoryConsumer, InMemorySession,
};
pub use message::{Destination, DestinationKind, Message};
pub use selector::{Selector, CORRELATION_HEADER};
pub use transport::{
    AcknowledgeMode, Connection, ConnectionFactory, MessageConsumer, Sender, Session,
};
