/// Step and navigation types
///
/// A step is one stage of a wizard: it consumes the runner, shows one
/// surface, and says what happens next. Navigation signals are plain
/// values returned from the surface primitives — never panics or error
/// types — so the runner pattern-matches on them directly.
use std::sync::Arc;

use crate::error::WizardResult;

use super::flow::StepRunner;

/// How a surface closed when it did not close by normal acceptance
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavSignal {
    /// Re-run the previously completed step
    Back,
    /// Re-run the same step (surface hid for a resumable reason)
    Resume,
    /// Terminate the whole sequence
    Cancel,
}

/// Result of one surface interaction
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome<T> {
    /// The user accepted normally
    Accepted(T),
    /// The surface closed with a navigation signal
    Signal(NavSignal),
}

impl<T> Outcome<T> {
    /// The signal, if the interaction ended with one
    pub fn signal(&self) -> Option<NavSignal> {
        match self {
            Outcome::Accepted(_) => None,
            Outcome::Signal(signal) => Some(*signal),
        }
    }
}

/// What a step tells the runner to do after it returns
pub enum StepOutcome {
    /// Run the given step next
    Next(Step),
    /// The sequence is complete
    Finished,
    /// Navigate per the signal (steps forward these from their surfaces)
    Signal(NavSignal),
}

/// One stage of a wizard. Re-runnable: back navigation executes the body
/// again from the top. Shared wizard state lives in caller-owned
/// structures captured by the closure.
pub type Step = Arc<dyn Fn(&mut StepRunner) -> WizardResult<StepOutcome> + Send + Sync>;

/// Wrap a closure as a [`Step`]
pub fn step<F>(f: F) -> Step
where
    F: Fn(&mut StepRunner) -> WizardResult<StepOutcome> + Send + Sync + 'static,
{
    Arc::new(f)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_outcome_signal_accessor() {
        let accepted: Outcome<u32> = Outcome::Accepted(7);
        assert_eq!(accepted.signal(), None);

        let back: Outcome<u32> = Outcome::Signal(NavSignal::Back);
        assert_eq!(back.signal(), Some(NavSignal::Back));
    }
}
