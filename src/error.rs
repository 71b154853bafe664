use thiserror::Error;

/// Framework-level errors using thiserror for structured error handling.
///
/// Navigation signals (Back/Resume/Cancel) are not errors; they travel as
/// ordinary values through `Outcome` and `StepOutcome`. The enums here cover
/// the failures that abort a wizard sequence or a progress scope.

#[derive(Error, Debug)]
pub enum SurfaceError {
    #[error("interactive surface disconnected before producing a result")]
    Disconnected,

    #[error("failed to create interactive surface: {0}")]
    CreationFailed(String),
}

#[derive(Error, Debug)]
pub enum ProgressError {
    #[error("progress init() called more than once")]
    AlreadyInitialized,

    #[error("failed to acquire host progress display")]
    InitFailed(#[source] Box<dyn std::error::Error + Send + Sync>),

    #[error("operation cancelled by user")]
    Cancelled,
}

impl ProgressError {
    /// Whether an error chain bottoms out in a user cancellation.
    ///
    /// Callers use this to suppress re-reporting an abort that the reporter
    /// has already surfaced to the user.
    pub fn is_cancelled(err: &anyhow::Error) -> bool {
        matches!(
            err.downcast_ref::<ProgressError>(),
            Some(ProgressError::Cancelled)
        )
    }
}

/// Type alias for framework Results using anyhow for context chaining
pub type WizardResult<T> = anyhow::Result<T>;
