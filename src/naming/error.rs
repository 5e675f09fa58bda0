use thiserror::Error;

/// Error returned by a naming/directory lookup.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NamingError {
    /// Nothing is bound under this exact name.
    #[error("name not bound: {0}")]
    NotFound(String),
    /// Every lookup strategy was tried without a hit.
    #[error("lookup failed for {name} (tried {tried:?})")]
    Exhausted { name: String, tried: Vec<String> },
    /// The directory itself could not be reached.
    #[error("naming service unavailable: {0}")]
    Unavailable(String),
}
