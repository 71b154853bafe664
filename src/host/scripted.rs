/// Scripted in-memory host
///
/// Implements `SurfaceHost` and `ProgressHost` without a screen: each
/// created surface replays a pre-loaded event script (optionally with
/// real delays, fed from a background thread), and every observable
/// effect — surfaces shown and disposed, busy toggles, validation
/// messages, progress increments, notifications — is recorded for
/// assertions. This is the host used by this crate's own tests and is
/// exported so downstream wizards can test their flows the same way.
use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use crossbeam_channel::unbounded;
use parking_lot::Mutex;
use tracing::warn;

use crate::error::{SurfaceError, WizardResult};
use crate::host::{ProgressHandle, ProgressHost, SurfaceHandle, SurfaceHost};
use crate::surface::{InputEvent, InputParams, PickEvent, PickParams};

/// One scripted occurrence on a surface's timeline
#[derive(Debug, Clone)]
pub enum Feed {
    Pick(PickEvent),
    Input(InputEvent),
    /// Pause the feeder thread before delivering the next event
    Wait(Duration),
    /// Cancel the active progress display (sets the flag and fires the
    /// registered observers)
    CancelProgress,
}

/// Which kind of surface a record describes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SurfaceKind {
    Pick,
    Input,
}

/// Everything observed about one created surface
#[derive(Debug)]
pub struct SurfaceRecord {
    pub title: String,
    pub kind: SurfaceKind,
    pub step: usize,
    pub back_enabled: bool,
    pub busy_toggles: Vec<bool>,
    pub validation_messages: Vec<Option<String>>,
    pub disposed: bool,
}

/// A user notification the host displayed
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notification {
    Info(String),
    Error(String),
}

struct HostInner {
    scripts: Mutex<VecDeque<Vec<Feed>>>,
    surfaces: Mutex<Vec<Arc<Mutex<SurfaceRecord>>>>,
    live_surfaces: AtomicUsize,
    max_live_surfaces: AtomicUsize,
    reports: Mutex<Vec<(f64, Option<String>)>>,
    notifications: Mutex<Vec<Notification>>,
    cancel_flag: Arc<AtomicBool>,
    cancel_observers: Mutex<Vec<Box<dyn FnMut() + Send>>>,
    begin_count: AtomicUsize,
    finish_count: AtomicUsize,
    fail_next_begin: AtomicBool,
}

/// Scripted host. Cheap to clone; clones share all state.
pub struct ScriptedHost {
    inner: Arc<HostInner>,
}

impl ScriptedHost {
    pub fn new() -> Self {
        Self {
            inner: Arc::new(HostInner {
                scripts: Mutex::new(VecDeque::new()),
                surfaces: Mutex::new(Vec::new()),
                live_surfaces: AtomicUsize::new(0),
                max_live_surfaces: AtomicUsize::new(0),
                reports: Mutex::new(Vec::new()),
                notifications: Mutex::new(Vec::new()),
                cancel_flag: Arc::new(AtomicBool::new(false)),
                cancel_observers: Mutex::new(Vec::new()),
                begin_count: AtomicUsize::new(0),
                finish_count: AtomicUsize::new(0),
                fail_next_begin: AtomicBool::new(false),
            }),
        }
    }

    /// Queue the event script for the next surface to be created
    pub fn push_script(&self, feeds: Vec<Feed>) {
        self.inner.scripts.lock().push_back(feeds);
    }

    /// Make the next `begin()` call fail (for init-failure paths)
    pub fn fail_next_begin(&self) {
        self.inner.fail_next_begin.store(true, Ordering::SeqCst);
    }

    /// Simulate the user cancelling the progress display
    pub fn request_cancel(&self) {
        self.inner.request_cancel();
    }

    /// Records of every surface created so far
    pub fn surfaces(&self) -> Vec<Arc<Mutex<SurfaceRecord>>> {
        self.inner.surfaces.lock().clone()
    }

    /// Progress increments in the order they were applied
    pub fn reports(&self) -> Vec<(f64, Option<String>)> {
        self.inner.reports.lock().clone()
    }

    /// Notifications in display order
    pub fn notifications(&self) -> Vec<Notification> {
        self.inner.notifications.lock().clone()
    }

    /// Highest number of surfaces visible at once
    pub fn max_live_surfaces(&self) -> usize {
        self.inner.max_live_surfaces.load(Ordering::SeqCst)
    }

    /// How many progress displays were released
    pub fn finish_count(&self) -> usize {
        self.inner.finish_count.load(Ordering::SeqCst)
    }

    fn open_surface(
        &self,
        title: &str,
        kind: SurfaceKind,
        step: usize,
        back_enabled: bool,
    ) -> WizardResult<(Arc<Mutex<SurfaceRecord>>, Vec<Feed>)> {
        let script = self
            .inner
            .scripts
            .lock()
            .pop_front()
            .ok_or_else(|| SurfaceError::CreationFailed("no scripted responses left".into()))?;

        let record = Arc::new(Mutex::new(SurfaceRecord {
            title: title.to_string(),
            kind,
            step,
            back_enabled,
            busy_toggles: Vec::new(),
            validation_messages: Vec::new(),
            disposed: false,
        }));
        self.inner.surfaces.lock().push(Arc::clone(&record));

        let live = self.inner.live_surfaces.fetch_add(1, Ordering::SeqCst) + 1;
        self.inner
            .max_live_surfaces
            .fetch_max(live, Ordering::SeqCst);

        Ok((record, script))
    }
}

impl Default for ScriptedHost {
    fn default() -> Self {
        Self::new()
    }
}

impl Clone for ScriptedHost {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl HostInner {
    fn request_cancel(&self) {
        if self.cancel_flag.swap(true, Ordering::SeqCst) {
            return; // already cancelled
        }
        for observer in self.cancel_observers.lock().iter_mut() {
            observer();
        }
    }
}

struct ScriptedSurface {
    record: Arc<Mutex<SurfaceRecord>>,
    inner: Arc<HostInner>,
}

impl SurfaceHandle for ScriptedSurface {
    fn set_busy(&mut self, busy: bool) {
        self.record.lock().busy_toggles.push(busy);
    }

    fn set_validation_message(&mut self, message: Option<&str>) {
        self.record
            .lock()
            .validation_messages
            .push(message.map(String::from));
    }
}

impl Drop for ScriptedSurface {
    fn drop(&mut self) {
        self.record.lock().disposed = true;
        self.inner.live_surfaces.fetch_sub(1, Ordering::SeqCst);
    }
}

impl SurfaceHost for ScriptedHost {
    fn create_pick(
        &self,
        params: &PickParams,
        back_enabled: bool,
    ) -> WizardResult<(Box<dyn SurfaceHandle>, crossbeam_channel::Receiver<PickEvent>)> {
        let (record, script) =
            self.open_surface(&params.title, SurfaceKind::Pick, params.step, back_enabled)?;
        let (tx, rx) = unbounded();

        let inner = Arc::clone(&self.inner);
        thread::spawn(move || {
            for feed in script {
                match feed {
                    Feed::Pick(event) => {
                        if tx.send(event).is_err() {
                            break; // surface disposed, nobody listening
                        }
                    }
                    Feed::Wait(duration) => thread::sleep(duration),
                    Feed::CancelProgress => inner.request_cancel(),
                    Feed::Input(event) => {
                        warn!(?event, "input event scripted for a picker, skipped");
                    }
                }
            }
        });

        let surface = ScriptedSurface {
            record,
            inner: Arc::clone(&self.inner),
        };
        Ok((Box::new(surface), rx))
    }

    fn create_input(
        &self,
        params: &InputParams,
        back_enabled: bool,
    ) -> WizardResult<(Box<dyn SurfaceHandle>, crossbeam_channel::Receiver<InputEvent>)> {
        let (record, script) = self.open_surface(
            &params.title,
            SurfaceKind::Input,
            params.step,
            back_enabled,
        )?;
        let (tx, rx) = unbounded();

        let inner = Arc::clone(&self.inner);
        thread::spawn(move || {
            for feed in script {
                match feed {
                    Feed::Input(event) => {
                        if tx.send(event).is_err() {
                            break; // surface disposed, nobody listening
                        }
                    }
                    Feed::Wait(duration) => thread::sleep(duration),
                    Feed::CancelProgress => inner.request_cancel(),
                    Feed::Pick(event) => {
                        warn!(?event, "pick event scripted for an input box, skipped");
                    }
                }
            }
        });

        let surface = ScriptedSurface {
            record,
            inner: Arc::clone(&self.inner),
        };
        Ok((Box::new(surface), rx))
    }
}

struct ScriptedProgress {
    inner: Arc<HostInner>,
}

impl ProgressHandle for ScriptedProgress {
    fn report(&mut self, increment: f64, message: Option<&str>) {
        self.inner
            .reports
            .lock()
            .push((increment, message.map(String::from)));
    }

    fn cancel_flag(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.inner.cancel_flag)
    }

    fn on_cancel(&mut self, observer: Box<dyn FnMut() + Send>) {
        self.inner.cancel_observers.lock().push(observer);
    }

    fn finish(&mut self) {
        self.inner.finish_count.fetch_add(1, Ordering::SeqCst);
    }
}

impl ProgressHost for ScriptedHost {
    fn begin(&self, _title: &str, _cancellable: bool) -> WizardResult<Box<dyn ProgressHandle>> {
        if self.inner.fail_next_begin.swap(false, Ordering::SeqCst) {
            anyhow::bail!("scripted begin failure");
        }
        self.inner.begin_count.fetch_add(1, Ordering::SeqCst);
        Ok(Box::new(ScriptedProgress {
            inner: Arc::clone(&self.inner),
        }))
    }

    fn notify_info(&self, message: &str) {
        self.inner
            .notifications
            .lock()
            .push(Notification::Info(message.to_string()));
    }

    fn notify_error(&self, message: &str) {
        self.inner
            .notifications
            .lock()
            .push(Notification::Error(message.to_string()));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scripted_pick_events_replay_in_order() {
        let host = ScriptedHost::new();
        host.push_script(vec![
            Feed::Pick(PickEvent::SelectionChanged(vec![1])),
            Feed::Pick(PickEvent::Hidden),
        ]);

        let params = PickParams::new("Choose", 1, 1, vec![]);
        let (_surface, rx) = host.create_pick(&params, false).unwrap();

        assert_eq!(rx.recv().unwrap(), PickEvent::SelectionChanged(vec![1]));
        assert_eq!(rx.recv().unwrap(), PickEvent::Hidden);
    }

    #[test]
    fn test_create_without_script_fails() {
        let host = ScriptedHost::new();
        let params = PickParams::new("Choose", 1, 1, vec![]);
        assert!(host.create_pick(&params, false).is_err());
    }

    #[test]
    fn test_surface_disposed_on_drop() {
        let host = ScriptedHost::new();
        host.push_script(vec![]);

        let params = PickParams::new("Choose", 1, 1, vec![]);
        let (surface, _rx) = host.create_pick(&params, false).unwrap();
        assert!(!host.surfaces()[0].lock().disposed);

        drop(surface);
        assert!(host.surfaces()[0].lock().disposed);
        assert_eq!(host.max_live_surfaces(), 1);
    }

    #[test]
    fn test_request_cancel_fires_observers_once() {
        let host = ScriptedHost::new();
        let mut handle = host.begin("Flow", true).unwrap();

        let fired = Arc::new(AtomicUsize::new(0));
        let observed = Arc::clone(&fired);
        handle.on_cancel(Box::new(move || {
            observed.fetch_add(1, Ordering::SeqCst);
        }));

        host.request_cancel();
        host.request_cancel();

        assert!(handle.cancel_flag().load(Ordering::SeqCst));
        assert_eq!(fired.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_clone_shares_state() {
        let host = ScriptedHost::new();
        let other = host.clone();

        other.notify_info("done");
        assert_eq!(
            host.notifications(),
            vec![Notification::Info("done".to_string())]
        );
    }
}
