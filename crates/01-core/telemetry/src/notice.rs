use parking_lot::Mutex;
use std::io::Write;
use std::sync::Arc;

/// Destination for operator-visible lines.
pub trait NoticeSink: Send + Sync {
    /// Emits one line of output.
    fn notice(&self, line: &str);
}

/// Shared notice sink handle.
pub type Notices = Arc<dyn NoticeSink>;

/// Writes notices to standard output.
#[derive(Clone, Copy, Default, Debug)]
pub struct StdoutNotices;

impl NoticeSink for StdoutNotices {
    fn notice(&self, line: &str) {
        let stdout = std::io::stdout();
        let mut out = stdout.lock();
        // A closed stdout leaves nothing useful to report to.
        let _ = writeln!(out, "{line}");
    }
}

/// Keeps every notice in memory; used by tests and headless runs.
#[derive(Default, Debug)]
pub struct CapturedNotices {
    lines: Mutex<Vec<String>>,
}

impl CapturedNotices {
    /// Creates an empty capture.
    pub fn new() -> Self {
        Self::default()
    }

    /// Copies the captured lines.
    pub fn lines(&self) -> Vec<String> {
        self.lines.lock().clone()
    }

    /// Removes and returns the captured lines.
    pub fn take(&self) -> Vec<String> {
        std::mem::take(&mut *self.lines.lock())
    }

    /// True when any captured line contains `fragment`.
    pub fn contains(&self, fragment: &str) -> bool {
        self.lines.lock().iter().any(|line| line.contains(fragment))
    }
}

impl NoticeSink for CapturedNotices {
    fn notice(&self, line: &str) {
        self.lines.lock().push(line.to_owned());
    }
}
