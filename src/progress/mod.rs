/// Progress reporting module
///
/// A `ProgressReporter` is a scoped, cancellable resource representing
/// one visible progress indicator. It owns a cumulative percentage and
/// status message, exposes cooperative cancellation polling, and
/// guarantees a single teardown no matter how the owning operation exits.

pub mod reporter;

// Re-export commonly used types
pub use reporter::{ProgressReporter, ReporterState};
