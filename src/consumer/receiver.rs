//! Selector-filtered, deadline-bounded receive.

use std::time::Duration;

use tracing::{debug, trace, warn};

use super::ReceivedMessage;
use crate::broker::{Destination, MessageConsumer, Selector, Session};
use crate::error::CleanupError;
use crate::MessageError;

/// Waits on one destination for the message carrying a given correlation id.
///
/// Borrows the session of a call's connection; it owns nothing beyond the
/// subscriptions it creates.
pub struct CorrelatedReceiver<'a, S> {
    session: &'a S,
    destination: &'a Destination,
}

impl<'a, S: Session> CorrelatedReceiver<'a, S> {
    pub fn new(session: &'a S, destination: &'a Destination) -> Self {
        Self {
            session,
            destination,
        }
    }

    /// Create a consumer filtered on `JMSCorrelationID='<correlation_id>'`.
    pub fn subscribe(
        &self,
        correlation_id: &str,
    ) -> Result<Subscription<S::Consumer>, MessageError> {
        let selector = Selector::correlation(correlation_id);
        trace!(
            destination = %self.destination,
            selector = selector.expression(),
            "creating consumer"
        );
        let consumer = self
            .session
            .create_consumer(self.destination, &selector)
            .map_err(MessageError::Retrieval)?;

        Ok(Subscription {
            consumer,
            correlation_id: correlation_id.to_string(),
            closed: false,
        })
    }

    /// Subscribe, wait once for up to `timeout`, then release the subscription.
    ///
    /// `on_subscribed` runs after the consumer exists and before the wait
    /// starts. It is not called when subscribing fails.
    pub fn receive<W>(
        &self,
        correlation_id: &str,
        timeout: Duration,
        on_subscribed: W,
    ) -> Result<ReceivedMessage, MessageError>
    where
        W: FnOnce(),
    {
        let mut subscription = self.subscribe(correlation_id)?;
        on_subscribed();
        let result = subscription.wait(timeout);
        subscription.close();
        result
    }
}

/// A live filtered consumer; lives for the duration of one wait.
pub struct Subscription<C: MessageConsumer> {
    consumer: C,
    correlation_id: String,
    closed: bool,
}

impl<C: MessageConsumer> Subscription<C> {
    /// Block for at most `timeout` for the matching message.
    ///
    /// Delivery consumes the message from the destination. Expiry is
    /// `MessageError::Timeout`, a transport failure `MessageError::Retrieval`.
    pub fn wait(&mut self, timeout: Duration) -> Result<ReceivedMessage, MessageError> {
        match self.consumer.receive(timeout) {
            Ok(Some(message)) => {
                debug!(
                    correlation_id = %self.correlation_id,
                    "Message has been successfully received"
                );
                trace!(
                    message_id = %message.id,
                    content = message.payload_str().unwrap_or("<binary>"),
                    "message received"
                );
                Ok(ReceivedMessage::delivered(message, &self.correlation_id))
            }
            Ok(None) => Err(MessageError::Timeout {
                correlation_id: self.correlation_id.clone(),
                timeout,
            }),
            Err(err) => Err(MessageError::Retrieval(err)),
        }
    }

    /// Release the consumer. Idempotent; failures are logged.
    pub fn close(&mut self) {
        if self.closed {
            return;
        }
        self.closed = true;
        if let Err(err) = self.consumer.close() {
            warn!(error = %CleanupError::Consumer(err), "Error when closing consumer");
        }
    }
}

impl<C: MessageConsumer> Drop for Subscription<C> {
    fn drop(&mut self) {
        self.close();
    }
}
