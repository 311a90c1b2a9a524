//! Application layer - Use cases and port interfaces
//!
//! Contains the capture controller and trait definitions
//! for external system interactions.

pub mod controller;
pub mod ports;

// Re-export use cases
pub use controller::{
    CaptureController, ControllerError, SaveOutcome, StartOutcome, MSG_NO_DATA, MSG_SAVED,
    SAVE_FILENAME,
};
