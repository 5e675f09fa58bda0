//! Fault-injecting transport and directory doubles.
//!
//! `FlakyBroker` wraps the in-memory broker, counts every lifecycle call the
//! consumer makes, and fails whichever step a test asks it to.

#![allow(dead_code)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Once};
use std::time::Duration;

use correlated_reply::broker::{
    AcknowledgeMode, BrokerError, Connection, ConnectionFactory, Destination, InMemoryBroker,
    InMemoryConnection, InMemoryConsumer, InMemorySession, Message, MessageConsumer, Selector,
    Session,
};
use correlated_reply::naming::{NamingContext, NamingError};

static TRACING: Once = Once::new();

/// Route `tracing` output through the test harness (`RUST_LOG` to filter).
pub fn init_tracing() {
    TRACING.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .with_test_writer()
            .try_init();
    });
}

/// Which step of the transport lifecycle should fail.
#[derive(Debug, Default, Clone, Copy)]
pub struct Faults {
    pub connect: bool,
    pub session: bool,
    pub start: bool,
    pub consumer: bool,
    pub receive: bool,
    pub stop: bool,
    pub close: bool,
}

/// Lifecycle call counters.
#[derive(Debug, Default)]
pub struct Counts {
    pub connects: AtomicUsize,
    pub stops: AtomicUsize,
    pub closes: AtomicUsize,
    pub consumers: AtomicUsize,
}

impl Counts {
    pub fn connects(&self) -> usize {
        self.connects.load(Ordering::SeqCst)
    }

    pub fn stops(&self) -> usize {
        self.stops.load(Ordering::SeqCst)
    }

    pub fn closes(&self) -> usize {
        self.closes.load(Ordering::SeqCst)
    }

    pub fn consumers(&self) -> usize {
        self.consumers.load(Ordering::SeqCst)
    }
}

pub struct FlakyBroker {
    pub inner: InMemoryBroker,
    pub faults: Faults,
    pub counts: Arc<Counts>,
}

impl FlakyBroker {
    pub fn new(inner: InMemoryBroker, faults: Faults) -> Self {
        Self {
            inner,
            faults,
            counts: Arc::new(Counts::default()),
        }
    }
}

impl ConnectionFactory for FlakyBroker {
    type Connection = FlakyConnection;

    fn create_connection(&self) -> Result<FlakyConnection, BrokerError> {
        self.counts.connects.fetch_add(1, Ordering::SeqCst);
        if self.faults.connect {
            return Err(BrokerError::ConnectionFailed("broker unreachable".into()));
        }
        Ok(FlakyConnection {
            inner: self.inner.create_connection()?,
            faults: self.faults,
            counts: Arc::clone(&self.counts),
        })
    }
}

pub struct FlakyConnection {
    inner: InMemoryConnection,
    faults: Faults,
    counts: Arc<Counts>,
}

impl Connection for FlakyConnection {
    type Session = FlakySession;

    fn create_session(
        &mut self,
        transacted: bool,
        mode: AcknowledgeMode,
    ) -> Result<FlakySession, BrokerError> {
        if self.faults.session {
            return Err(BrokerError::SessionFailed("session limit reached".into()));
        }
        Ok(FlakySession {
            inner: self.inner.create_session(transacted, mode)?,
            faults: self.faults,
            counts: Arc::clone(&self.counts),
        })
    }

    fn start(&mut self) -> Result<(), BrokerError> {
        if self.faults.start {
            return Err(BrokerError::ConnectionFailed("start refused".into()));
        }
        self.inner.start()
    }

    fn stop(&mut self) -> Result<(), BrokerError> {
        self.counts.stops.fetch_add(1, Ordering::SeqCst);
        self.inner.stop()?;
        if self.faults.stop {
            return Err(BrokerError::ConnectionFailed("stop failed".into()));
        }
        Ok(())
    }

    fn close(&mut self) -> Result<(), BrokerError> {
        self.counts.closes.fetch_add(1, Ordering::SeqCst);
        self.inner.close()?;
        if self.faults.close {
            return Err(BrokerError::ConnectionFailed("close failed".into()));
        }
        Ok(())
    }
}

pub struct FlakySession {
    inner: InMemorySession,
    faults: Faults,
    counts: Arc<Counts>,
}

impl Session for FlakySession {
    type Consumer = FlakyConsumer;

    fn create_consumer(
        &self,
        destination: &Destination,
        selector: &Selector,
    ) -> Result<FlakyConsumer, BrokerError> {
        if self.faults.consumer {
            return Err(BrokerError::ConsumerFailed("selector rejected".into()));
        }
        self.counts.consumers.fetch_add(1, Ordering::SeqCst);
        Ok(FlakyConsumer {
            inner: self.inner.create_consumer(destination, selector)?,
            faults: self.faults,
        })
    }
}

pub struct FlakyConsumer {
    inner: InMemoryConsumer,
    faults: Faults,
}

impl MessageConsumer for FlakyConsumer {
    fn receive(&mut self, timeout: Duration) -> Result<Option<Message>, BrokerError> {
        if self.faults.receive {
            return Err(BrokerError::Other("connection reset by peer".into()));
        }
        self.inner.receive(timeout)
    }

    fn close(&mut self) -> Result<(), BrokerError> {
        self.inner.close()
    }
}

/// A directory that is down.
pub struct DownContext;

impl NamingContext for DownContext {
    type Factory = InMemoryBroker;

    fn lookup_factory(&self, _name: &str) -> Result<Arc<InMemoryBroker>, NamingError> {
        Err(NamingError::Unavailable("naming service outage".into()))
    }

    fn lookup_destination(&self, _name: &str) -> Result<Destination, NamingError> {
        Err(NamingError::Unavailable("naming service outage".into()))
    }
}

/// A directory that hands out `factory` but is down for destination lookups.
pub struct DestinationOutage {
    pub factory: Arc<FlakyBroker>,
}

impl NamingContext for DestinationOutage {
    type Factory = FlakyBroker;

    fn lookup_factory(&self, _name: &str) -> Result<Arc<FlakyBroker>, NamingError> {
        Ok(Arc::clone(&self.factory))
    }

    fn lookup_destination(&self, _name: &str) -> Result<Destination, NamingError> {
        Err(NamingError::Unavailable("naming service outage".into()))
    }
}

/// A text reply carrying `correlation_id`.
pub fn reply(id: &str, correlation_id: &str, body: &str) -> Message {
    Message::with_string_payload(id, body).correlated(correlation_id)
}
