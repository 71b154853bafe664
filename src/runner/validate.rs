/// Debounced validation bookkeeping for input boxes
///
/// Every text change starts a new validation generation. Results may
/// arrive in any order; only the result stamped with the most recently
/// issued generation is rendered. Stale results are dropped by stamp
/// comparison — the work that produced them is never interrupted.

/// Tracks the latest validation generation and its rendered message
#[derive(Debug)]
pub struct ValidationTracker {
    latest: u64,
    message: Option<String>,
    settled: bool,
}

impl ValidationTracker {
    pub fn new() -> Self {
        Self {
            latest: 0,
            message: None,
            settled: true,
        }
    }

    /// Start a new generation; returns its stamp
    pub fn begin(&mut self) -> u64 {
        self.latest += 1;
        self.settled = false;
        self.latest
    }

    /// Apply a completed validation. Returns `true` when the result is
    /// current and its message should be rendered; `false` when the
    /// result lost the race to a newer generation.
    pub fn complete(&mut self, generation: u64, message: Option<String>) -> bool {
        if generation != self.latest {
            return false;
        }
        self.message = message;
        self.settled = true;
        true
    }

    /// Message of the most recently settled current generation
    pub fn message(&self) -> Option<&str> {
        self.message.as_deref()
    }

    /// Stamp of the most recently issued generation
    pub fn latest(&self) -> u64 {
        self.latest
    }

    /// Whether the latest generation has completed
    pub fn is_settled(&self) -> bool {
        self.settled
    }
}

impl Default for ValidationTracker {
    fn default() -> Self {
        Self::new()
    }
}
