use std::io;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};

/// Cooperative stop flag shared by every loop and the frame loop.
///
/// Loops check it at the top of each iteration; raising it never interrupts
/// a blocking read already in progress.
#[derive(Clone, Debug, Default)]
pub struct Shutdown(Arc<AtomicBool>);

impl Shutdown {
    /// A lowered flag.
    pub fn new() -> Self {
        Self::default()
    }

    /// Asks every loop sharing this flag to stop.
    pub fn request(&self) {
        if !self.0.swap(true, Ordering::AcqRel) {
            tracing::info!("shutdown requested");
        }
    }

    /// True once [`request`](Self::request) was called.
    pub fn is_requested(&self) -> bool {
        self.0.load(Ordering::Acquire)
    }
}

/// Outcome of one loop iteration.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LoopStep {
    /// Keep iterating.
    Continue,
    /// Leave the loop.
    Stop,
}

/// A running producer thread.
///
/// Dropping the handle detaches the thread: a loop parked in a blocking read
/// only notices the shutdown flag once that read returns.
pub struct LoopHandle {
    name: &'static str,
    thread: Option<JoinHandle<()>>,
}

impl LoopHandle {
    /// Thread name.
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// True once the loop has returned.
    pub fn is_finished(&self) -> bool {
        self.thread.as_ref().map_or(true, JoinHandle::is_finished)
    }

    /// Waits for the loop; false if it panicked.
    pub fn join(mut self) -> bool {
        match self.thread.take() {
            Some(thread) => match thread.join() {
                Ok(()) => true,
                Err(_) => {
                    tracing::warn!(thread = self.name, "loop panicked");
                    false
                }
            },
            None => true,
        }
    }
}

/// Runs `body` on a named thread with start and stop logged.
pub fn spawn_loop(
    name: &'static str,
    body: impl FnOnce() + Send + 'static,
) -> io::Result<LoopHandle> {
    let thread = thread::Builder::new().name(name.into()).spawn(move || {
        tracing::info!(thread = name, "loop started");
        body();
        tracing::info!(thread = name, "loop stopped");
    })?;
    Ok(LoopHandle {
        name,
        thread: Some(thread),
    })
}
