//! Core transport traits.
//!
//! The chain mirrors the JMS object model: a shared, thread-safe
//! [`ConnectionFactory`] hands out [`Connection`]s, a connection creates
//! [`Session`]s, and a session creates filtered [`MessageConsumer`]s. Every
//! object below the factory is single-owner.

use std::time::Duration;

use super::{BrokerError, Destination, Message, Selector};

/// How received messages are acknowledged within a session.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum AcknowledgeMode {
    /// The session acknowledges each message as it is delivered.
    #[default]
    Auto,
    /// The application acknowledges explicitly.
    Client,
    /// Lazy acknowledgement; duplicates are tolerated.
    DupsOk,
}

/// Creates connections to a broker.
///
/// Implementations might include:
/// - `InMemoryBroker` - For testing and single-process scenarios
/// - an ActiveMQ / Artemis client
/// - an AMQP 1.0 client
pub trait ConnectionFactory: Send + Sync {
    type Connection: Connection;

    /// Establish a new network-level connection.
    fn create_connection(&self) -> Result<Self::Connection, BrokerError>;
}

/// An open connection to the broker.
pub trait Connection: Send {
    type Session: Session;

    /// Create a session on this connection.
    fn create_session(
        &mut self,
        transacted: bool,
        mode: AcknowledgeMode,
    ) -> Result<Self::Session, BrokerError>;

    /// Start (or resume) delivery of incoming messages.
    fn start(&mut self) -> Result<(), BrokerError>;

    /// Pause delivery of incoming messages.
    fn stop(&mut self) -> Result<(), BrokerError>;

    /// Close the connection and everything created from it.
    fn close(&mut self) -> Result<(), BrokerError>;
}

/// A single-threaded context for producing and consuming messages.
pub trait Session: Send {
    type Consumer: MessageConsumer;

    /// Create a consumer that only receives messages matching `selector`.
    fn create_consumer(
        &self,
        destination: &Destination,
        selector: &Selector,
    ) -> Result<Self::Consumer, BrokerError>;
}

/// Pull-based receiver bound to one destination and selector.
pub trait MessageConsumer: Send {
    /// Block until a matching message is available or the timeout expires.
    ///
    /// Returns `Ok(None)` on expiry; that is not an error.
    fn receive(&mut self, timeout: Duration) -> Result<Option<Message>, BrokerError>;

    /// Release the consumer.
    fn close(&mut self) -> Result<(), BrokerError>;
}

/// Trait for sending messages to a destination (point-to-point).
pub trait Sender: Send + Sync {
    /// Send a message to a destination.
    fn send(&self, destination: &Destination, message: Message) -> Result<(), BrokerError>;
}
