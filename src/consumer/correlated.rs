//! The retrieval entry point.

use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, error, trace};

use super::state::{CallState, CallTracker, TransitionHook};
use super::{ConnectionManager, CorrelatedReceiver, CorrelationRequest, FromMessage};
use crate::broker::{ConnectionFactory, Destination};
use crate::naming::NamingContext;
use crate::{ConsumerConfig, MessageError};

/// Supplies the logical destination name a consumer listens on.
///
/// This is the one thing each concrete consumer has to provide.
pub trait DestinationName {
    fn destination_name(&self) -> &str;
}

impl DestinationName for str {
    fn destination_name(&self) -> &str {
        self
    }
}

impl DestinationName for String {
    fn destination_name(&self) -> &str {
        self
    }
}

/// Blocking request/reply receiver.
///
/// Holds only immutable state: the shared connection factory, the resolved
/// destination and the default timeout. Each call opens its own connection,
/// session and subscription and releases all of them before returning, so a
/// single consumer can serve any number of concurrent callers.
///
/// ## Example
///
/// ```
/// use std::sync::Arc;
/// use std::time::Duration;
/// use correlated_reply::broker::{Destination, InMemoryBroker, Message, Sender};
/// use correlated_reply::CorrelatedConsumer;
///
/// let broker = InMemoryBroker::new();
/// let replies = Destination::queue("UVMSExchangeEvent");
/// broker
///     .send(&replies, Message::with_string_payload("m1", "ack").correlated("req-42"))
///     .unwrap();
///
/// let consumer = CorrelatedConsumer::new(Arc::new(broker), replies);
/// let reply: String = consumer
///     .get_message("req-42", Duration::from_secs(2))
///     .unwrap();
/// assert_eq!(reply, "ack");
/// ```
pub struct CorrelatedConsumer<F> {
    connections: ConnectionManager<F>,
    destination: Destination,
    default_timeout: Duration,
    on_transition: Option<Arc<TransitionHook>>,
}

impl<F> Clone for CorrelatedConsumer<F> {
    fn clone(&self) -> Self {
        Self {
            connections: self.connections.clone(),
            destination: self.destination.clone(),
            default_timeout: self.default_timeout,
            on_transition: self.on_transition.clone(),
        }
    }
}

impl<F: ConnectionFactory> CorrelatedConsumer<F> {
    /// Create a consumer from an already-resolved factory and destination.
    pub fn new(factory: Arc<F>, destination: Destination) -> Self {
        Self {
            connections: ConnectionManager::new(factory),
            destination,
            default_timeout: ConsumerConfig::default().default_timeout(),
            on_transition: None,
        }
    }

    /// Look up the connection factory and destination in a directory.
    ///
    /// Both lookups use the configured fallback namespace. Failure of either
    /// is a `MessageError::Connection`.
    pub fn initialize<C, P>(
        context: &C,
        provider: &P,
        config: &ConsumerConfig,
    ) -> Result<Self, MessageError>
    where
        C: NamingContext<Factory = F>,
        P: DestinationName + ?Sized,
    {
        debug!("Open connection to broker");
        let resolver = config.resolver();

        let factory = resolver
            .resolve_factory(context, &config.connection_factory)
            .map_err(|err| {
                error!(
                    lookup = %config.connection_factory,
                    error = %err,
                    "Connection factory lookup failed"
                );
                MessageError::from(err)
            })?;

        let destination = resolver
            .resolve_destination(context, provider.destination_name())
            .map_err(|err| {
                error!(
                    lookup = provider.destination_name(),
                    error = %err,
                    "Destination lookup failed"
                );
                MessageError::from(err)
            })?;

        Ok(Self::new(factory, destination).with_default_timeout(config.default_timeout()))
    }

    pub fn with_default_timeout(mut self, timeout: Duration) -> Self {
        self.default_timeout = timeout;
        self
    }

    /// Register a callback that observes every state a call enters.
    pub fn on_transition<H>(mut self, hook: H) -> Self
    where
        H: Fn(CallState) + Send + Sync + 'static,
    {
        self.on_transition = Some(Arc::new(hook));
        self
    }

    pub fn destination(&self) -> &Destination {
        &self.destination
    }

    pub fn default_timeout(&self) -> Duration {
        self.default_timeout
    }

    /// Block until the message with `correlation_id` arrives, or `timeout`
    /// elapses, and convert its payload to `T`.
    ///
    /// The connection opened for the call is closed on every path before
    /// this returns.
    pub fn get_message<T: FromMessage>(
        &self,
        correlation_id: &str,
        timeout: Duration,
    ) -> Result<T, MessageError> {
        trace!(
            correlation_id,
            destination = %self.destination,
            timeout_ms = u64::try_from(timeout.as_millis()).unwrap_or(u64::MAX),
            "Trying to receive message"
        );
        let request = CorrelationRequest::new(correlation_id, timeout).map_err(|err| {
            error!(error = %err, "Error when retrieving message");
            err
        })?;

        let message = self.retrieve(&request).map_err(|err| {
            if err.is_timeout() {
                debug!(correlation_id, error = %err, "Timed out waiting for message");
            } else {
                error!(correlation_id, error = %err, "Error when retrieving message");
            }
            err
        })?;

        T::from_message(message)
    }

    /// [`get_message`](Self::get_message) with the default timeout.
    pub fn get_message_default<T: FromMessage>(
        &self,
        correlation_id: &str,
    ) -> Result<T, MessageError> {
        self.get_message(correlation_id, self.default_timeout)
    }

    fn retrieve(&self, request: &CorrelationRequest) -> Result<super::ReceivedMessage, MessageError> {
        let mut call = CallTracker::new(request.correlation_id(), self.on_transition.as_deref());

        call.enter(CallState::Connecting);
        let mut connection = match self.connections.open() {
            Ok(connection) => connection,
            Err(err) => {
                call.enter(CallState::Failed);
                call.enter(CallState::Closed);
                return Err(err);
            }
        };
        trace!(destination = %self.destination, "Connected");

        let receiver = CorrelatedReceiver::new(connection.session(), &self.destination);
        let outcome = receiver.receive(request.correlation_id(), request.timeout(), || {
            call.enter(CallState::Subscribed);
            call.enter(CallState::Waiting);
        });

        call.enter(match &outcome {
            Ok(_) => CallState::Delivered,
            Err(err) if err.is_timeout() => CallState::TimedOut,
            Err(_) => CallState::Failed,
        });

        self.connections.close(&mut connection);
        call.enter(CallState::Closed);
        outcome
    }
}

#[cfg(feature = "async")]
impl<F: ConnectionFactory + 'static> CorrelatedConsumer<F> {
    /// Run one retrieval as a blocking task on the tokio runtime.
    pub async fn get_message_async<T>(
        self: Arc<Self>,
        correlation_id: impl Into<String>,
        timeout: Duration,
    ) -> Result<T, MessageError>
    where
        T: FromMessage + Send + 'static,
    {
        let correlation_id = correlation_id.into();
        tokio::task::spawn_blocking(move || self.get_message::<T>(&correlation_id, timeout))
            .await
            .map_err(|err| MessageError::Retrieval(crate::broker::BrokerError::Other(Box::new(err))))?
    }
}
