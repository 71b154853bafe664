/// Step runner
///
/// Drives an ordered, mutable sequence of steps. Each step shows one
/// interactive surface and returns the next step to run (or nothing).
/// A history stack enables Back navigation and Resume retries; exactly
/// zero or one surface is visible at any instant, and the previous one
/// is disposed strictly before the next is created.
use std::sync::Arc;
use std::thread;

use crossbeam_channel::{unbounded, Sender};
use tracing::debug;

use crate::error::{SurfaceError, WizardResult};
use crate::host::{SurfaceHandle, SurfaceHost};
use crate::surface::{
    InputEvent, InputParams, InputResponse, PickEvent, PickParams, PickResponse, ResumePredicate,
    Validator,
};

use super::step::{NavSignal, Outcome, Step, StepOutcome};
use super::validate::ValidationTracker;

/// Orchestrates a wizard: runs steps, owns the active surface, and
/// navigates on the signals their surfaces produce.
pub struct StepRunner {
    host: Arc<dyn SurfaceHost>,
    history: Vec<Step>,
    active: Option<Box<dyn SurfaceHandle>>,
}

impl StepRunner {
    pub fn new(host: Arc<dyn SurfaceHost>) -> Self {
        Self {
            host,
            history: Vec::new(),
            active: None,
        }
    }

    /// Execute steps starting from `start` until a step yields no
    /// successor or a Cancel signal propagates out. The active surface is
    /// disposed on every exit path; unexpected step failures propagate
    /// after that disposal and are fatal to the sequence.
    pub fn run(&mut self, start: Step) -> WizardResult<()> {
        self.history.clear();
        let result = self.step_through(start);
        self.active = None;
        result
    }

    fn step_through(&mut self, start: Step) -> WizardResult<()> {
        let mut step = Some(start);
        while let Some(current) = step {
            self.history.push(current.clone());
            // The outgoing surface stays visible but inert while the next
            // step prepares its replacement.
            if let Some(active) = self.active.as_mut() {
                active.set_busy(true);
            }
            match current(self)? {
                StepOutcome::Next(next) => {
                    step = Some(next);
                }
                StepOutcome::Finished => {
                    debug!("step sequence finished");
                    step = None;
                }
                StepOutcome::Signal(NavSignal::Back) => {
                    debug!("back signal, re-running previous step");
                    self.history.pop();
                    step = self.history.pop();
                }
                StepOutcome::Signal(NavSignal::Resume) => {
                    debug!("resume signal, re-running current step");
                    step = self.history.pop();
                }
                StepOutcome::Signal(NavSignal::Cancel) => {
                    debug!("cancel signal, terminating sequence");
                    step = None;
                }
            }
        }
        Ok(())
    }

    /// Number of steps executed so far (history the Back button walks)
    pub fn depth(&self) -> usize {
        self.history.len()
    }

    /// Show a picker and wait for the interaction to settle.
    ///
    /// Single-select pickers resolve on the first selection change;
    /// multi-select pickers resolve on explicit confirmation with the
    /// current selection. Named action buttons resolve as
    /// [`PickResponse::Action`].
    pub fn pick(&mut self, params: PickParams) -> WizardResult<Outcome<PickResponse>> {
        let back_enabled = self.history.len() > 1;
        self.active = None; // dispose the previous surface first
        let (handle, events) = self.host.create_pick(&params, back_enabled)?;
        self.active = Some(handle);
        debug!(title = %params.title, step = params.step, "picker shown");

        let mut selection = params.preselected.clone();
        loop {
            let event = events.recv().map_err(|_| SurfaceError::Disconnected)?;
            match event {
                PickEvent::SelectionChanged(indices) => {
                    if params.multi_select {
                        selection = indices;
                    } else {
                        return Ok(Outcome::Accepted(PickResponse::Picked(entries_at(
                            &params.items,
                            &indices,
                        ))));
                    }
                }
                PickEvent::Confirmed => {
                    if params.multi_select {
                        return Ok(Outcome::Accepted(PickResponse::Picked(entries_at(
                            &params.items,
                            &selection,
                        ))));
                    }
                    // Single-select surfaces resolve on selection change; a
                    // bare confirm carries no information.
                }
                PickEvent::Action(name) => {
                    return Ok(Outcome::Accepted(PickResponse::Action(name)));
                }
                PickEvent::Back => return Ok(Outcome::Signal(NavSignal::Back)),
                PickEvent::Hidden => {
                    return Ok(Outcome::Signal(signal_on_hide(
                        params.should_resume.as_ref(),
                    )));
                }
            }
        }
    }

    /// Show a text-input box and wait for the interaction to settle.
    ///
    /// Validation runs once immediately on display and again on every
    /// text change, off-thread; only the most recently initiated
    /// validation's result reaches the visible error message. Acceptance
    /// re-validates synchronously with the surface busy and is rejected
    /// while the value is invalid.
    pub fn input(&mut self, params: InputParams) -> WizardResult<Outcome<InputResponse>> {
        let back_enabled = self.history.len() > 1;
        self.active = None; // dispose the previous surface first
        let (handle, events) = self.host.create_input(&params, back_enabled)?;
        self.active = Some(handle);
        debug!(title = %params.title, step = params.step, "input box shown");

        let (done_tx, done_rx) = unbounded();
        let mut tracker = ValidationTracker::new();
        let mut value = params.value.clone();

        // Initial validation on the value the box opens with
        spawn_validation(&params.validate, &value, tracker.begin(), &done_tx);

        loop {
            crossbeam_channel::select! {
                recv(events) -> event => {
                    let event = event.map_err(|_| SurfaceError::Disconnected)?;
                    match event {
                        InputEvent::ValueChanged(text) => {
                            value = text;
                            spawn_validation(&params.validate, &value, tracker.begin(), &done_tx);
                        }
                        InputEvent::Accepted => {
                            if let Some(active) = self.active.as_mut() {
                                active.set_busy(true);
                            }
                            let message = (params.validate)(&value);
                            if message.is_none() {
                                return Ok(Outcome::Accepted(InputResponse::Value(value)));
                            }
                            if let Some(active) = self.active.as_mut() {
                                active.set_validation_message(message.as_deref());
                                active.set_busy(false);
                            }
                        }
                        InputEvent::Action(name) => {
                            return Ok(Outcome::Accepted(InputResponse::Action(name)));
                        }
                        InputEvent::Back => return Ok(Outcome::Signal(NavSignal::Back)),
                        InputEvent::Hidden => {
                            return Ok(Outcome::Signal(signal_on_hide(
                                params.should_resume.as_ref(),
                            )));
                        }
                    }
                }
                recv(done_rx) -> done => {
                    // done_tx lives in this scope, so the channel cannot
                    // disconnect while we are looping
                    if let Ok((generation, message)) = done {
                        if tracker.complete(generation, message) {
                            if let Some(active) = self.active.as_mut() {
                                active.set_validation_message(tracker.message());
                            }
                        } else {
                            debug!(generation, "stale validation result discarded");
                        }
                    }
                }
            }
        }
    }
}

fn entries_at(
    items: &[crate::surface::PickEntry],
    indices: &[usize],
) -> Vec<crate::surface::PickEntry> {
    indices
        .iter()
        .filter_map(|&index| items.get(index).cloned())
        .collect()
}

fn signal_on_hide(should_resume: Option<&ResumePredicate>) -> NavSignal {
    match should_resume {
        Some(predicate) if predicate() => NavSignal::Resume,
        _ => NavSignal::Cancel,
    }
}

fn spawn_validation(
    validate: &Validator,
    value: &str,
    generation: u64,
    done: &Sender<(u64, Option<String>)>,
) {
    let validate = Arc::clone(validate);
    let value = value.to_string();
    let done = done.clone();
    thread::spawn(move || {
        let message = validate(&value);
        // The interaction may have ended while validating
        let _ = done.send((generation, message));
    });
}
