//! Input error types.
//!
//! Missing devices are never errors; these cover misuse and host backends
//! that fail to start.

/// Errors surfaced by the tracker and its host adapters.
#[derive(Debug, thiserror::Error)]
pub enum InputError {
    /// [`InputTracker::try_update`](crate::InputTracker::try_update) was called before `init`.
    #[error("input tracker updated before init")]
    NotInitialized,

    /// The native gamepad backend could not be started.
    #[error("failed to initialise gamepad backend: {0}")]
    GamepadBackend(String),

    /// Browser listener registration failed.
    #[error("browser input binding failed: {0}")]
    Web(String),
}
