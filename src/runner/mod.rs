/// Step runner module
///
/// Drives a multi-stage interactive flow.
///
/// ## Architecture
///
/// ```text
/// StepRunner
///   ├── Step (re-runnable closure, returns the next step or nothing)
///   ├── history (stack of executed steps, enables Back)
///   ├── NavSignal (Back, Resume, Cancel)
///   └── active surface (0 or 1 at any instant, disposed before replaced)
/// ```
///
/// ## Usage
///
/// ```rust,ignore
/// use stepflow::runner::{step, Outcome, StepOutcome, StepRunner};
///
/// let choose = step(move |runner| {
///     match runner.pick(params.clone())? {
///         Outcome::Accepted(response) => {
///             // record the choice, hand over the next step
///             Ok(StepOutcome::Next(next_step.clone()))
///         }
///         Outcome::Signal(signal) => Ok(StepOutcome::Signal(signal)),
///     }
/// });
///
/// StepRunner::new(host).run(choose)?;
/// ```
///
/// Steps share wizard state through caller-owned structures captured by
/// their closures; the runner itself never reads or writes it.

pub mod flow;
pub mod step;
pub mod validate;

// Re-export commonly used types
pub use flow::StepRunner;
pub use step::{step, NavSignal, Outcome, Step, StepOutcome};
pub use validate::ValidationTracker;
