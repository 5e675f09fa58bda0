//! In-memory broker for testing and single-process scenarios.
//!
//! This module provides a thread-safe broker that implements the full
//! transport chain (`ConnectionFactory` → `Connection` → `Session` →
//! `MessageConsumer`) plus `Sender`, useful for:
//! - Unit and integration testing without an external broker
//! - Single-process applications
//! - Development and prototyping

use std::collections::{HashMap, VecDeque};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Condvar, Mutex, MutexGuard, PoisonError};
use std::time::{Duration, Instant, SystemTime};

use super::{
    AcknowledgeMode, BrokerError, Connection, ConnectionFactory, Destination, Message,
    MessageConsumer, Selector, Sender, Session,
};

/// Counters describing what the broker has been asked to do.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct BrokerStats {
    pub connections_opened: usize,
    pub connections_closed: usize,
    pub sessions_created: usize,
    pub consumers_created: usize,
    pub consumers_closed: usize,
    pub messages_sent: usize,
    pub messages_delivered: usize,
}

struct Shared {
    /// Pending messages per destination name
    queues: Mutex<HashMap<String, VecDeque<Message>>>,
    /// Signalled whenever a message arrives or a connection closes
    arrived: Condvar,
    stats: Mutex<BrokerStats>,
}

impl Shared {
    fn stats(&self) -> MutexGuard<'_, BrokerStats> {
        self.stats.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// In-memory message broker.
///
/// Features:
/// - Thread-safe (handles can be cloned and shared across threads)
/// - Destinations are created on first use and hold messages in FIFO order
/// - Consumers see only messages matching their selector; a delivered message
///   is removed (auto-acknowledged), non-matching messages stay queued
/// - Blocking receive wakes on arrival, not by polling
///
/// Topics are stored the same way as queues: there are no durable
/// subscriptions and each message is delivered once.
///
/// ## Example
///
/// ```
/// use std::time::Duration;
/// use correlated_reply::broker::{
///     AcknowledgeMode, Connection, ConnectionFactory, Destination, InMemoryBroker, Message,
///     MessageConsumer, Selector, Sender, Session,
/// };
///
/// let broker = InMemoryBroker::new();
/// let replies = Destination::queue("replies");
/// broker
///     .send(&replies, Message::with_string_payload("m1", "pong").correlated("req-1"))
///     .unwrap();
///
/// let mut connection = broker.create_connection().unwrap();
/// let session = connection.create_session(false, AcknowledgeMode::Auto).unwrap();
/// connection.start().unwrap();
///
/// let mut consumer = session
///     .create_consumer(&replies, &Selector::correlation("req-1"))
///     .unwrap();
/// let message = consumer.receive(Duration::from_millis(10)).unwrap().unwrap();
/// assert_eq!(message.payload_str(), Some("pong"));
/// ```
#[derive(Clone)]
pub struct InMemoryBroker {
    shared: Arc<Shared>,
}

impl Default for InMemoryBroker {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryBroker {
    /// Create a new, empty broker.
    pub fn new() -> Self {
        Self {
            shared: Arc::new(Shared {
                queues: Mutex::new(HashMap::new()),
                arrived: Condvar::new(),
                stats: Mutex::new(BrokerStats::default()),
            }),
        }
    }

    /// Snapshot of the broker counters.
    pub fn stats(&self) -> BrokerStats {
        self.shared.stats().clone()
    }

    /// Number of messages waiting on a destination.
    pub fn pending(&self, destination: &Destination) -> usize {
        self.shared
            .queues
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(destination.name())
            .map_or(0, VecDeque::len)
    }

    /// Drop all queued messages and reset the counters (useful for test cleanup).
    pub fn clear(&self) {
        self.shared
            .queues
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
        *self.shared.stats() = BrokerStats::default();
    }
}

impl Sender for InMemoryBroker {
    fn send(&self, destination: &Destination, mut message: Message) -> Result<(), BrokerError> {
        message.timestamp.get_or_insert_with(SystemTime::now);
        {
            let mut queues = self
                .shared
                .queues
                .lock()
                .map_err(|_| BrokerError::LockPoisoned("send"))?;
            queues
                .entry(destination.name().to_string())
                .or_default()
                .push_back(message);
        }
        self.shared.stats().messages_sent += 1;
        self.shared.arrived.notify_all();
        Ok(())
    }
}

impl ConnectionFactory for InMemoryBroker {
    type Connection = InMemoryConnection;

    fn create_connection(&self) -> Result<InMemoryConnection, BrokerError> {
        self.shared.stats().connections_opened += 1;
        Ok(InMemoryConnection {
            shared: Arc::clone(&self.shared),
            flags: Arc::new(ConnectionFlags::default()),
        })
    }
}

#[derive(Default)]
struct ConnectionFlags {
    started: AtomicBool,
    closed: AtomicBool,
}

impl ConnectionFlags {
    fn ensure_open(&self) -> Result<(), BrokerError> {
        if self.closed.load(Ordering::SeqCst) {
            Err(BrokerError::Closed("connection"))
        } else {
            Ok(())
        }
    }
}

/// A connection to an [`InMemoryBroker`].
pub struct InMemoryConnection {
    shared: Arc<Shared>,
    flags: Arc<ConnectionFlags>,
}

impl InMemoryConnection {
    /// Whether message delivery is currently running.
    pub fn is_started(&self) -> bool {
        self.flags.started.load(Ordering::SeqCst)
    }

    pub fn is_closed(&self) -> bool {
        self.flags.closed.load(Ordering::SeqCst)
    }
}

impl Connection for InMemoryConnection {
    type Session = InMemorySession;

    fn create_session(
        &mut self,
        transacted: bool,
        mode: AcknowledgeMode,
    ) -> Result<InMemorySession, BrokerError> {
        self.flags.ensure_open()?;
        if transacted {
            return Err(BrokerError::SessionFailed(
                "transacted sessions are not supported".into(),
            ));
        }
        self.shared.stats().sessions_created += 1;
        Ok(InMemorySession {
            shared: Arc::clone(&self.shared),
            flags: Arc::clone(&self.flags),
            mode,
        })
    }

    fn start(&mut self) -> Result<(), BrokerError> {
        self.flags.ensure_open()?;
        self.flags.started.store(true, Ordering::SeqCst);
        self.shared.arrived.notify_all();
        Ok(())
    }

    fn stop(&mut self) -> Result<(), BrokerError> {
        self.flags.ensure_open()?;
        self.flags.started.store(false, Ordering::SeqCst);
        Ok(())
    }

    fn close(&mut self) -> Result<(), BrokerError> {
        if self.flags.closed.swap(true, Ordering::SeqCst) {
            return Ok(());
        }
        self.flags.started.store(false, Ordering::SeqCst);
        self.shared.stats().connections_closed += 1;
        // Wake consumers blocked on this connection so they observe the close.
        self.shared.arrived.notify_all();
        Ok(())
    }
}

/// A session on an [`InMemoryConnection`].
pub struct InMemorySession {
    shared: Arc<Shared>,
    flags: Arc<ConnectionFlags>,
    mode: AcknowledgeMode,
}

impl InMemorySession {
    pub fn acknowledge_mode(&self) -> AcknowledgeMode {
        self.mode
    }
}

impl Session for InMemorySession {
    type Consumer = InMemoryConsumer;

    fn create_consumer(
        &self,
        destination: &Destination,
        selector: &Selector,
    ) -> Result<InMemoryConsumer, BrokerError> {
        self.flags.ensure_open()?;
        self.shared.stats().consumers_created += 1;
        Ok(InMemoryConsumer {
            shared: Arc::clone(&self.shared),
            flags: Arc::clone(&self.flags),
            destination: destination.name().to_string(),
            selector: selector.clone(),
            closed: false,
        })
    }
}

/// A selector-filtered consumer on an [`InMemoryBroker`] destination.
pub struct InMemoryConsumer {
    shared: Arc<Shared>,
    flags: Arc<ConnectionFlags>,
    destination: String,
    selector: Selector,
    closed: bool,
}

impl InMemoryConsumer {
    fn take_match(&self, queues: &mut HashMap<String, VecDeque<Message>>) -> Option<Message> {
        let queue = queues.get_mut(&self.destination)?;
        let position = queue.iter().position(|m| self.selector.matches(m))?;
        queue.remove(position)
    }
}

impl MessageConsumer for InMemoryConsumer {
    fn receive(&mut self, timeout: Duration) -> Result<Option<Message>, BrokerError> {
        if self.closed {
            return Err(BrokerError::Closed("consumer"));
        }
        // A timeout too large to represent as an instant waits indefinitely.
        let deadline = Instant::now().checked_add(timeout);
        let mut queues = self
            .shared
            .queues
            .lock()
            .map_err(|_| BrokerError::LockPoisoned("receive"))?;

        loop {
            self.flags.ensure_open()?;

            // A stopped connection holds delivery back until started.
            if self.flags.started.load(Ordering::SeqCst) {
                if let Some(message) = self.take_match(&mut queues) {
                    drop(queues);
                    self.shared.stats().messages_delivered += 1;
                    return Ok(Some(message));
                }
            }

            queues = match deadline {
                Some(deadline) => {
                    let now = Instant::now();
                    if now >= deadline {
                        return Ok(None);
                    }
                    self.shared
                        .arrived
                        .wait_timeout(queues, deadline - now)
                        .map_err(|_| BrokerError::LockPoisoned("receive"))?
                        .0
                }
                None => self
                    .shared
                    .arrived
                    .wait(queues)
                    .map_err(|_| BrokerError::LockPoisoned("receive"))?,
            };
        }
    }

    fn close(&mut self) -> Result<(), BrokerError> {
        if !self.closed {
            self.closed = true;
            self.shared.stats().consumers_closed += 1;
        }
        Ok(())
    }
}
