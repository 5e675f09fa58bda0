//! Ordered lookup with namespace fallback.

use std::sync::Arc;

use tracing::debug;

use super::{NamingContext, NamingError};
use crate::broker::Destination;

/// Default alternate namespace tried when a primary lookup misses.
pub const DEFAULT_FALLBACK_PREFIX: &str = "java:/";

/// One way of turning a logical name into a directory key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LookupStrategy {
    /// Look the name up as given.
    Primary,
    /// Look the name up under an alternate namespace prefix.
    Prefixed(String),
}

impl LookupStrategy {
    /// The key this strategy would look up, or `None` if it adds nothing
    /// (the name already carries the prefix).
    fn candidate(&self, name: &str) -> Option<String> {
        match self {
            LookupStrategy::Primary => Some(name.to_string()),
            LookupStrategy::Prefixed(prefix) if name.starts_with(prefix.as_str()) => None,
            LookupStrategy::Prefixed(prefix) => Some(format!("{}{}", prefix, name)),
        }
    }
}

/// Resolves names against a directory, trying each strategy in order.
///
/// Used for both connection-factory and destination lookup so the two share
/// the same fallback convention.
///
/// ## Example
///
/// ```
/// use correlated_reply::naming::{NamingError, Resolver};
///
/// let resolver = Resolver::with_fallback_prefix("java:/");
/// let found = resolver.resolve("ConnectionFactory", |key| {
///     if key == "java:/ConnectionFactory" {
///         Ok(key.to_string())
///     } else {
///         Err(NamingError::NotFound(key.to_string()))
///     }
/// });
/// assert_eq!(found.unwrap(), "java:/ConnectionFactory");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolver {
    strategies: Vec<LookupStrategy>,
}

impl Default for Resolver {
    fn default() -> Self {
        Self::with_fallback_prefix(DEFAULT_FALLBACK_PREFIX)
    }
}

impl Resolver {
    pub fn new(strategies: Vec<LookupStrategy>) -> Self {
        Self { strategies }
    }

    /// Primary lookup first, then the name under `prefix`.
    pub fn with_fallback_prefix(prefix: impl Into<String>) -> Self {
        Self::new(vec![
            LookupStrategy::Primary,
            LookupStrategy::Prefixed(prefix.into()),
        ])
    }

    pub fn strategies(&self) -> &[LookupStrategy] {
        &self.strategies
    }

    /// Try each strategy in order and return the first hit.
    ///
    /// Only `NotFound` moves on to the next strategy; any other error means the
    /// directory is unusable and is returned immediately.
    pub fn resolve<T, L>(&self, name: &str, lookup: L) -> Result<T, NamingError>
    where
        L: Fn(&str) -> Result<T, NamingError>,
    {
        let mut tried = Vec::with_capacity(self.strategies.len());

        for strategy in &self.strategies {
            let Some(key) = strategy.candidate(name) else {
                continue;
            };
            match lookup(&key) {
                Ok(found) => return Ok(found),
                Err(NamingError::NotFound(_)) => {
                    debug!(lookup = %name, key = %key, "lookup missed, trying next strategy");
                    tried.push(key);
                }
                Err(err) => return Err(err),
            }
        }

        Err(NamingError::Exhausted {
            name: name.to_string(),
            tried,
        })
    }

    /// Resolve a connection factory by name.
    pub fn resolve_factory<C: NamingContext>(
        &self,
        context: &C,
        name: &str,
    ) -> Result<Arc<C::Factory>, NamingError> {
        self.resolve(name, |key| context.lookup_factory(key))
    }

    /// Resolve a destination by name.
    pub fn resolve_destination<C: NamingContext>(
        &self,
        context: &C,
        name: &str,
    ) -> Result<Destination, NamingError> {
        self.resolve(name, |key| context.lookup_destination(key))
    }
}
