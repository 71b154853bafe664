/// Cancellable progress reporter
///
/// Lifecycle: `Constructed → Initializing → Running → Resolved`, strictly
/// forward, with `Resolved` terminal and idempotent to re-enter. The
/// reporter is a scoped resource: `resolve()` also runs on `Drop`, so the
/// host display is released exactly once on every exit path.
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use parking_lot::Mutex;
use tracing::{debug, warn};

use crate::error::ProgressError;
use crate::host::{ProgressHandle, ProgressHost};

/// Reporter lifecycle state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReporterState {
    Constructed,
    Initializing,
    Running,
    Resolved,
}

/// Hook invoked and cleared immediately before the next report, on
/// cancellation, or on resolution
pub type PendingCallback = Box<dyn FnOnce() + Send>;

type SharedPending = Arc<Mutex<Option<PendingCallback>>>;

/// One visible progress indicator bound to one logical operation
pub struct ProgressReporter {
    title: String,
    cancellable: bool,
    state: ReporterState,
    percent: f64,
    handle: Option<Box<dyn ProgressHandle>>,
    host: Option<Arc<dyn ProgressHost>>,
    pending: SharedPending,
    cancel_flag: Option<Arc<AtomicBool>>,
    cancel_reported: bool,
}

impl ProgressReporter {
    pub fn new(title: impl Into<String>, cancellable: bool) -> Self {
        Self {
            title: title.into(),
            cancellable,
            state: ReporterState::Constructed,
            percent: 0.0,
            handle: None,
            host: None,
            pending: Arc::new(Mutex::new(None)),
            cancel_flag: None,
            cancel_reported: false,
        }
    }

    /// Acquire the host progress display. Must be called exactly once,
    /// before any other method.
    pub fn init(&mut self, host: Arc<dyn ProgressHost>) -> Result<(), ProgressError> {
        if self.state != ReporterState::Constructed {
            return Err(ProgressError::AlreadyInitialized);
        }
        self.state = ReporterState::Initializing;

        let mut handle = host
            .begin(&self.title, self.cancellable)
            .map_err(|e| ProgressError::InitFailed(e.into()))?;

        // When the host signals cancellation, the pending callback fires
        // immediately rather than waiting for the next report
        let pending = Arc::clone(&self.pending);
        handle.on_cancel(Box::new(move || {
            if let Some(callback) = pending.lock().take() {
                callback();
            }
        }));

        self.cancel_flag = Some(handle.cancel_flag());
        self.handle = Some(handle);
        self.host = Some(host);
        self.state = ReporterState::Running;
        debug!(title = %self.title, "progress display acquired");
        Ok(())
    }

    /// Report cumulative progress. `percent` of `None` keeps the current
    /// value (a message-only report). The previous pending callback is
    /// invoked and cleared before the report; `pending` replaces it.
    ///
    /// No-op unless the reporter is running. Polls for cancellation first
    /// and returns [`ProgressError::Cancelled`] once the user has
    /// cancelled.
    pub fn set(
        &mut self,
        percent: Option<f64>,
        message: Option<&str>,
        pending: Option<PendingCallback>,
    ) -> Result<(), ProgressError> {
        if self.state != ReporterState::Running {
            return Ok(());
        }
        self.assert_continue()?;

        if let Some(callback) = self.pending.lock().take() {
            callback();
        }

        let percent = percent.unwrap_or(self.percent);
        if let Some(handle) = self.handle.as_mut() {
            handle.report(percent - self.percent, message);
        }
        self.percent = percent;
        *self.pending.lock() = pending;
        Ok(())
    }

    /// Cooperative cancellation poll. Returns
    /// [`ProgressError::Cancelled`] — and notifies the user, once — if
    /// cancellation was requested or the reporter is no longer running.
    /// In-flight work is never interrupted; this is the only place the
    /// abort is observed.
    pub fn assert_continue(&mut self) -> Result<(), ProgressError> {
        if self.is_cancelled() || self.state != ReporterState::Running {
            if !self.cancel_reported {
                self.cancel_reported = true;
                if let Some(host) = self.host.as_ref() {
                    host.notify_error("Operation cancelled by user");
                }
                warn!(title = %self.title, "operation cancelled by user");
            }
            return Err(ProgressError::Cancelled);
        }
        Ok(())
    }

    /// Whether the host has signalled user cancellation
    pub fn is_cancelled(&self) -> bool {
        self.cancel_flag
            .as_ref()
            .is_some_and(|flag| flag.load(Ordering::SeqCst))
    }

    /// Release the host display. Safe to call any number of times from
    /// any state; the resource is released exactly once. Also runs on
    /// `Drop`.
    pub fn resolve(&mut self) {
        if self.state != ReporterState::Running {
            return;
        }
        if let Some(callback) = self.pending.lock().take() {
            callback();
        }
        if let Some(mut handle) = self.handle.take() {
            handle.finish();
        }
        self.state = ReporterState::Resolved;
        debug!(title = %self.title, "progress display released");
    }

    pub fn state(&self) -> ReporterState {
        self.state
    }

    /// Last reported cumulative percentage
    pub fn percent(&self) -> f64 {
        self.percent
    }
}

impl Drop for ProgressReporter {
    fn drop(&mut self) {
        self.resolve();
    }
}
