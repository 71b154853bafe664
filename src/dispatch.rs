/// Single-flight command gate
///
/// User-triggered commands run one at a time. The gate holds a single
/// in-progress slot; re-entrant invocations are rejected immediately with
/// a user-visible message instead of queueing.
use std::sync::atomic::{AtomicBool, Ordering};

use tracing::warn;

use crate::error::WizardResult;
use crate::host::ProgressHost;

/// Message shown when a command is rejected because another is running
pub const BUSY_MESSAGE: &str = "Please wait for the previous command to finish.";

/// Single-slot "operation in progress" gate
pub struct CommandGate {
    in_flight: AtomicBool,
}

/// Claim on the gate's slot; releasing is dropping
pub struct GateGuard<'a> {
    gate: &'a CommandGate,
}

impl CommandGate {
    pub const fn new() -> Self {
        Self {
            in_flight: AtomicBool::new(false),
        }
    }

    /// Claim the slot, or `None` if a command is already running
    pub fn try_acquire(&self) -> Option<GateGuard<'_>> {
        self.in_flight
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_ok()
            .then_some(GateGuard { gate: self })
    }

    pub fn is_busy(&self) -> bool {
        self.in_flight.load(Ordering::Acquire)
    }

    /// Run `command` with the slot held. A re-entrant invocation is
    /// rejected with [`BUSY_MESSAGE`] and yields `Ok(None)`; the command's
    /// own result is passed through otherwise.
    pub fn run<T>(
        &self,
        name: &str,
        host: &dyn ProgressHost,
        command: impl FnOnce() -> WizardResult<T>,
    ) -> WizardResult<Option<T>> {
        match self.try_acquire() {
            Some(_guard) => command().map(Some),
            None => {
                warn!(command = name, "rejected re-entrant command");
                host.notify_error(BUSY_MESSAGE);
                Ok(None)
            }
        }
    }
}

impl Default for CommandGate {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for GateGuard<'_> {
    fn drop(&mut self) {
        self.gate.in_flight.store(false, Ordering::Release);
    }
}
