//! Message selectors.

use super::Message;

/// Header name the broker matches correlation ids against.
pub const CORRELATION_HEADER: &str = "JMSCorrelationID";

/// A broker-side filter expression restricting which messages a consumer receives.
///
/// Only correlation-id equality is supported. The expression is rendered as an
/// SQL-92 string comparison, `JMSCorrelationID='<id>'`, with embedded single
/// quotes doubled so a hostile id cannot widen the filter.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Selector {
    correlation_id: String,
    expression: String,
}

impl Selector {
    /// Build a correlation-equality selector.
    ///
    /// The id is assumed to be validated already (non-empty, no control characters).
    pub fn correlation(correlation_id: &str) -> Self {
        Self {
            correlation_id: correlation_id.to_string(),
            expression: format!(
                "{}='{}'",
                CORRELATION_HEADER,
                correlation_id.replace('\'', "''")
            ),
        }
    }

    /// The expression to pass to the broker's consumer-creation call.
    pub fn expression(&self) -> &str {
        &self.expression
    }

    /// The correlation id this selector matches.
    pub fn correlation_id(&self) -> &str {
        &self.correlation_id
    }

    /// Evaluate the selector against a message.
    pub fn matches(&self, message: &Message) -> bool {
        message.correlation_id.as_deref() == Some(self.correlation_id.as_str())
    }
}
