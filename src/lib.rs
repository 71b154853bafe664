//! stepflow — host-agnostic multi-step wizard runner with cancellable
//! progress reporting.
//!
//! Two independent, composable components:
//!
//! - [`StepRunner`] orchestrates an ordered sequence of interactive steps
//!   (pickers and input boxes) with Back/Resume/Cancel navigation over a
//!   history stack.
//! - [`ProgressReporter`] is a scoped, cancellable resource bound to one
//!   visible progress indicator, with cooperative cancellation polling
//!   and teardown guaranteed on every exit path.
//!
//! Neither depends on the other; calling code composes them by driving a
//! runner inside a reporter's scope and polling
//! [`ProgressReporter::assert_continue`] between stages. Concrete UI
//! bindings live behind the [`host`] capability traits;
//! [`host::scripted::ScriptedHost`] is an in-memory implementation for
//! tests.

pub mod dispatch;
pub mod error;
pub mod host;
pub mod progress;
pub mod runner;
pub mod surface;

// Re-export the commonly used types
pub use dispatch::CommandGate;
pub use error::{ProgressError, SurfaceError, WizardResult};
pub use progress::{ProgressReporter, ReporterState};
pub use runner::{step, NavSignal, Outcome, Step, StepOutcome, StepRunner};
pub use surface::{
    InputParams, InputResponse, PickEntry, PickParams, PickResponse, ResumePredicate, Validator,
};
