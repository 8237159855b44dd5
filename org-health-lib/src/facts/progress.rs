/// A trait for reporting progress of long-running operations.
pub trait Progress: Send + Sync {
    /// Set the phase label for the current operation (e.g., "Fetching", "Scoring").
    fn set_phase(&self, phase: &str);

    /// Replace the message shown next to the phase label.
    fn set_message(&self, message: String);

    /// Finish and clear the progress indicator.
    fn done(&self);
}

/// Progress sink that discards everything, for servers and tests.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoProgress;

impl Progress for NoProgress {
    fn set_phase(&self, _phase: &str) {}
    fn set_message(&self, _message: String) {}
    fn done(&self) {}
}
