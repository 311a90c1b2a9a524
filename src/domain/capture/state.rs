//! Capture lifecycle state machine

use std::fmt;
use thiserror::Error;

/// Capture states
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum CaptureState {
    #[default]
    Idle,
    Capturing,
}

impl CaptureState {
    /// Get the string representation
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Capturing => "capturing",
        }
    }
}

impl fmt::Display for CaptureState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Error when an invalid state transition is attempted
#[derive(Debug, Clone, Error)]
#[error("Invalid state transition: cannot {action} while in {current_state} state")]
pub struct InvalidStateTransition {
    pub current_state: CaptureState,
    pub action: String,
}

/// Capture lifecycle.
///
/// State machine:
///   IDLE -> CAPTURING (begin)
///   CAPTURING -> IDLE (end)
///   IDLE -> IDLE (end, no-op)
#[derive(Debug, Default)]
pub struct CaptureLifecycle {
    state: CaptureState,
    sessions_started: u64,
}

impl CaptureLifecycle {
    /// Create a new lifecycle in idle state
    pub fn new() -> Self {
        Self::default()
    }

    /// Get the current state
    pub fn state(&self) -> CaptureState {
        self.state
    }

    pub fn is_idle(&self) -> bool {
        self.state == CaptureState::Idle
    }

    pub fn is_capturing(&self) -> bool {
        self.state == CaptureState::Capturing
    }

    /// Number of sessions that have been started so far
    pub fn sessions_started(&self) -> u64 {
        self.sessions_started
    }

    /// Check that a new capture may begin without transitioning
    pub fn ensure_can_begin(&self) -> Result<(), InvalidStateTransition> {
        if self.state != CaptureState::Idle {
            return Err(InvalidStateTransition {
                current_state: self.state,
                action: "start capture".to_string(),
            });
        }
        Ok(())
    }

    /// Transition from IDLE to CAPTURING
    pub fn begin(&mut self) -> Result<(), InvalidStateTransition> {
        self.ensure_can_begin()?;
        self.state = CaptureState::Capturing;
        self.sessions_started += 1;
        Ok(())
    }

    /// Transition to IDLE from any state
    pub fn end(&mut self) {
        self.state = CaptureState::Idle;
    }

    /// Check that saving is allowed in the current state
    pub fn ensure_can_save(&self) -> Result<(), InvalidStateTransition> {
        if self.state != CaptureState::Idle {
            return Err(InvalidStateTransition {
                current_state: self.state,
                action: "save recording".to_string(),
            });
        }
        Ok(())
    }
}
