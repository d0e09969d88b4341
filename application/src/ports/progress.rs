//! Progress notification port
//!
//! A minimal start/stop surface for the in-progress indicator. The
//! recommendation sub-loop stops the indicator before prompting so the
//! spinner never fights the prompt for the terminal.

/// Callback surface for the in-progress indicator
pub trait ProgressPort: Send + Sync {
    /// Show the indicator with a label (replaces any current label)
    fn start(&self, label: &str);

    /// Hide the indicator. Idempotent.
    fn stop(&self);
}

/// No-op progress for quiet or scripted runs
pub struct NoProgress;

impl ProgressPort for NoProgress {
    fn start(&self, _label: &str) {}
    fn stop(&self) {}
}
