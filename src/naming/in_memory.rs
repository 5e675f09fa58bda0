//! Hash-map backed directory.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};

use super::{NamingContext, NamingError};
use crate::broker::{ConnectionFactory, Destination};

/// In-memory naming context.
///
/// Binds connection factories and destinations under exact names and keeps a
/// journal of every key looked up, so fallback behavior can be asserted.
pub struct InMemoryContext<F> {
    factories: HashMap<String, Arc<F>>,
    destinations: HashMap<String, Destination>,
    journal: Mutex<Vec<String>>,
}

impl<F> Default for InMemoryContext<F> {
    fn default() -> Self {
        Self {
            factories: HashMap::new(),
            destinations: HashMap::new(),
            journal: Mutex::new(Vec::new()),
        }
    }
}

impl<F> InMemoryContext<F> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind a connection factory under `name`.
    pub fn bind_factory(mut self, name: impl Into<String>, factory: Arc<F>) -> Self {
        self.factories.insert(name.into(), factory);
        self
    }

    /// Bind a destination under `name`.
    pub fn bind_destination(mut self, name: impl Into<String>, destination: Destination) -> Self {
        self.destinations.insert(name.into(), destination);
        self
    }

    /// Every key looked up so far, in order.
    pub fn lookups(&self) -> Vec<String> {
        self.journal
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    fn record(&self, key: &str) {
        self.journal
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(key.to_string());
    }
}

impl<F: ConnectionFactory> NamingContext for InMemoryContext<F> {
    type Factory = F;

    fn lookup_factory(&self, name: &str) -> Result<Arc<F>, NamingError> {
        self.record(name);
        self.factories
            .get(name)
            .cloned()
            .ok_or_else(|| NamingError::NotFound(name.to_string()))
    }

    fn lookup_destination(&self, name: &str) -> Result<Destination, NamingError> {
        self.record(name);
        self.destinations
            .get(name)
            .cloned()
            .ok_or_else(|| NamingError::NotFound(name.to_string()))
    }
}
