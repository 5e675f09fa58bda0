//! Correlated consumer - blocking request/reply on top of a broker
//!
//! A caller publishes a request elsewhere, then asks the consumer for the
//! one reply carrying the same correlation id:
//!
//! ```text
//! get_message(correlation_id, timeout)
//!   │ validate (CorrelationRequest)          → Validation
//!   │ ConnectionManager::open                → Connection
//!   │ CorrelatedReceiver::subscribe          → Retrieval
//!   │ Subscription::wait(timeout)            → Timeout / Retrieval
//!   │ ConnectionManager::close (always)
//!   ▼ T::from_message                        → UnexpectedPayload
//! ```

mod connection;
mod correlated;
mod payload;
mod receiver;
mod request;
mod state;

pub use connection::{ConnectionManager, ConnectionState, TransportConnection};
pub use correlated::{CorrelatedConsumer, DestinationName};
pub use payload::{Bitcode, FromMessage, Json, ReceivedMessage};
pub use receiver::{CorrelatedReceiver, Subscription};
pub use request::CorrelationRequest;
pub use state::{CallState, TransitionHook};
