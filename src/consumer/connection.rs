//! Call-scoped connection lifecycle.

use std::sync::Arc;

use tracing::{trace, warn};

use crate::broker::{AcknowledgeMode, Connection, ConnectionFactory};
use crate::error::{CleanupError, ConnectError};
use crate::MessageError;

/// Whether a [`TransportConnection`] still holds broker resources.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionState {
    Open,
    Closed,
}

/// A started connection plus its single session, owned by one call.
///
/// Dropping an open `TransportConnection` closes it, so resources are
/// released even if the owning call unwinds.
pub struct TransportConnection<C: Connection> {
    connection: C,
    session: C::Session,
    state: ConnectionState,
}

impl<C: Connection> TransportConnection<C> {
    pub fn session(&self) -> &C::Session {
        &self.session
    }

    pub fn state(&self) -> ConnectionState {
        self.state
    }

    pub fn is_open(&self) -> bool {
        self.state == ConnectionState::Open
    }

    /// Stop and close the connection. A no-op once closed.
    ///
    /// Failures are logged and swallowed.
    pub fn close(&mut self) {
        if let Err(err) = self.shutdown() {
            warn!(error = %err, "Error when stopping or closing connection");
        }
    }

    /// Stop then close, attempting the close even if the stop fails.
    /// Reports the first failure.
    fn shutdown(&mut self) -> Result<(), CleanupError> {
        if self.state == ConnectionState::Closed {
            return Ok(());
        }
        self.state = ConnectionState::Closed;

        let stopped = self.connection.stop().map_err(CleanupError::Stop);
        let closed = self.connection.close().map_err(CleanupError::Close);
        trace!("connection closed");
        stopped.and(closed)
    }
}

impl<C: Connection> Drop for TransportConnection<C> {
    fn drop(&mut self) {
        self.close();
    }
}

/// Opens one fresh connection per call from a shared factory.
///
/// There is no pooling: every `open` pays full connection setup.
pub struct ConnectionManager<F> {
    factory: Arc<F>,
}

impl<F> Clone for ConnectionManager<F> {
    fn clone(&self) -> Self {
        Self {
            factory: Arc::clone(&self.factory),
        }
    }
}

impl<F: ConnectionFactory> ConnectionManager<F> {
    pub fn new(factory: Arc<F>) -> Self {
        Self { factory }
    }

    pub fn factory(&self) -> &Arc<F> {
        &self.factory
    }

    /// Connect, create a non-transacted auto-acknowledging session and start
    /// delivery.
    ///
    /// If the session cannot be created or the connection cannot be started,
    /// the half-open connection is closed before the error is returned.
    pub fn open(&self) -> Result<TransportConnection<F::Connection>, MessageError> {
        let mut connection = self
            .factory
            .create_connection()
            .map_err(|e| MessageError::Connection(ConnectError::Transport(e)))?;

        let session = match connection.create_session(false, AcknowledgeMode::Auto) {
            Ok(session) => session,
            Err(err) => {
                release_partial(&mut connection);
                return Err(MessageError::Connection(ConnectError::Transport(err)));
            }
        };

        if let Err(err) = connection.start() {
            release_partial(&mut connection);
            return Err(MessageError::Connection(ConnectError::Transport(err)));
        }

        trace!("connection started");
        Ok(TransportConnection {
            connection,
            session,
            state: ConnectionState::Open,
        })
    }

    /// Release a connection. Idempotent and never fails.
    pub fn close(&self, connection: &mut TransportConnection<F::Connection>) {
        connection.close();
    }
}

fn release_partial<C: Connection>(connection: &mut C) {
    if let Err(err) = connection.close() {
        warn!(error = %CleanupError::Close(err), "Error when closing half-open connection");
    }
}
