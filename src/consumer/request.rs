use std::time::Duration;

use crate::MessageError;

/// A validated retrieval request.
///
/// Construction is the only validation step of a call; nothing touches the
/// broker until a `CorrelationRequest` exists.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CorrelationRequest {
    correlation_id: String,
    timeout: Duration,
}

impl CorrelationRequest {
    pub fn new(correlation_id: impl Into<String>, timeout: Duration) -> Result<Self, MessageError> {
        let correlation_id = correlation_id.into();

        if correlation_id.is_empty() {
            return Err(MessageError::Validation("no correlation id provided".into()));
        }
        // Control characters can't appear in a selector string literal.
        if correlation_id.chars().any(char::is_control) {
            return Err(MessageError::Validation(format!(
                "correlation id {:?} contains control characters",
                correlation_id
            )));
        }
        if timeout.is_zero() {
            return Err(MessageError::Validation("timeout must be greater than zero".into()));
        }

        Ok(Self {
            correlation_id,
            timeout,
        })
    }

    pub fn correlation_id(&self) -> &str {
        &self.correlation_id
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }
}
