//! Per-call lifecycle.

use std::fmt;

use tracing::trace;

/// Where a retrieval call is in its lifecycle.
///
/// ```text
/// Idle → Connecting → Subscribed → Waiting → Delivered ┐
///            │             │           ├───→ TimedOut  ├→ Closed
///            └─────────────┴───────────┴───→ Failed    ┘
/// ```
///
/// `Closed` is the only terminal state and every call that got past
/// validation reaches it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CallState {
    Idle,
    Connecting,
    Subscribed,
    Waiting,
    Delivered,
    TimedOut,
    Failed,
    Closed,
}

impl CallState {
    /// Whether `next` is a legal successor of `self`.
    pub fn can_enter(self, next: CallState) -> bool {
        use CallState::*;
        matches!(
            (self, next),
            (Idle, Connecting)
                | (Connecting, Subscribed)
                | (Connecting, Failed)
                | (Subscribed, Waiting)
                | (Subscribed, Failed)
                | (Waiting, Delivered)
                | (Waiting, TimedOut)
                | (Waiting, Failed)
                | (Delivered, Closed)
                | (TimedOut, Closed)
                | (Failed, Closed)
        )
    }

    pub fn is_terminal(self) -> bool {
        self == CallState::Closed
    }
}

impl fmt::Display for CallState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            CallState::Idle => "idle",
            CallState::Connecting => "connecting",
            CallState::Subscribed => "subscribed",
            CallState::Waiting => "waiting",
            CallState::Delivered => "delivered",
            CallState::TimedOut => "timed-out",
            CallState::Failed => "failed",
            CallState::Closed => "closed",
        };
        f.write_str(name)
    }
}

/// Callback invoked on every state a call enters.
pub type TransitionHook = dyn Fn(CallState) + Send + Sync;

/// Drives one call through its states, logging and notifying the hook.
pub(crate) struct CallTracker<'a> {
    state: CallState,
    correlation_id: &'a str,
    hook: Option<&'a TransitionHook>,
}

impl<'a> CallTracker<'a> {
    pub(crate) fn new(correlation_id: &'a str, hook: Option<&'a TransitionHook>) -> Self {
        Self {
            state: CallState::Idle,
            correlation_id,
            hook,
        }
    }

    pub(crate) fn enter(&mut self, next: CallState) {
        debug_assert!(
            self.state.can_enter(next),
            "illegal transition {} -> {}",
            self.state,
            next
        );
        trace!(correlation_id = self.correlation_id, from = %self.state, to = %next, "call state");
        self.state = next;
        if let Some(hook) = self.hook {
            hook(next);
        }
    }
}
