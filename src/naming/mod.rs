//! Naming - directory lookup of connection factories and destinations
//!
//! Application servers publish broker resources under names in a directory
//! (JNDI and friends). Depending on the container a resource may be bound
//! under its plain name or under an alternate namespace such as `java:/`,
//! so lookups go through a [`Resolver`] that tries each form in order.

mod error;
mod in_memory;
mod resolver;

use std::sync::Arc;

pub use error::NamingError;
pub use in_memory::InMemoryContext;
pub use resolver::{LookupStrategy, Resolver, DEFAULT_FALLBACK_PREFIX};

use crate::broker::{ConnectionFactory, Destination};

/// A directory that broker resources can be looked up in.
pub trait NamingContext: Send + Sync {
    type Factory: ConnectionFactory;

    /// Look up a connection factory bound under exactly `name`.
    fn lookup_factory(&self, name: &str) -> Result<Arc<Self::Factory>, NamingError>;

    /// Look up a destination bound under exactly `name`.
    fn lookup_destination(&self, name: &str) -> Result<Destination, NamingError>;
}
