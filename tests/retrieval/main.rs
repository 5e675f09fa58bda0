//! Correlated retrieval integration tests.

mod support;
mod cleanup;
mod lookup;
