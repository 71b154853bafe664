/// Host capability traits
///
/// The framework never talks to a concrete UI. It consumes a capability
/// set: construct a picker, construct an input box, construct a progress
/// display, and notify the user. Hosts implement these traits and deliver
/// user interactions over channels; the runner blocks on the receivers at
/// its suspension points.
///
/// Surface handles are owned exclusively by the `StepRunner`; dropping a
/// handle disposes the on-screen element.

pub mod scripted;

use std::sync::atomic::AtomicBool;
use std::sync::Arc;

use crossbeam_channel::Receiver;

use crate::error::WizardResult;
use crate::surface::{InputEvent, InputParams, PickEvent, PickParams};

/// Handle to one visible interactive surface. Dropping it disposes the
/// surface.
pub trait SurfaceHandle: Send {
    /// Disable interaction and show a busy indicator
    fn set_busy(&mut self, busy: bool);

    /// Set or clear the live validation error message (input boxes only;
    /// pickers may ignore this)
    fn set_validation_message(&mut self, message: Option<&str>);
}

/// Constructs interactive surfaces on behalf of the runner
pub trait SurfaceHost: Send + Sync {
    /// Show a picker. `back_enabled` controls whether a Back button is
    /// offered; the host must emit `PickEvent::Back` when it fires.
    fn create_pick(
        &self,
        params: &PickParams,
        back_enabled: bool,
    ) -> WizardResult<(Box<dyn SurfaceHandle>, Receiver<PickEvent>)>;

    /// Show a text-input box. Same Back contract as `create_pick`.
    fn create_input(
        &self,
        params: &InputParams,
        back_enabled: bool,
    ) -> WizardResult<(Box<dyn SurfaceHandle>, Receiver<InputEvent>)>;
}

/// Handle to one visible progress display bound to a long-running
/// operation.
pub trait ProgressHandle: Send {
    /// Apply a progress increment plus an optional status message
    fn report(&mut self, increment: f64, message: Option<&str>);

    /// Flag the host sets once when the user cancels; never unset
    fn cancel_flag(&self) -> Arc<AtomicBool>;

    /// Register the observer invoked when the host signals cancellation
    fn on_cancel(&mut self, observer: Box<dyn FnMut() + Send>);

    /// Release the display. The reporter calls this at most once.
    fn finish(&mut self);
}

/// Constructs progress displays and carries user notifications
pub trait ProgressHost: Send + Sync {
    fn begin(&self, title: &str, cancellable: bool) -> WizardResult<Box<dyn ProgressHandle>>;

    fn notify_info(&self, message: &str);

    fn notify_error(&self, message: &str);
}
