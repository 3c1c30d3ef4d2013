use crate::record::{RecordTiming, Recorder};
use event::{Event, EventQueue};
use state::StateMachine;
use telemetry::Telemetry;

/// Consumer side of the event queue.
pub struct Dispatcher {
    queue: EventQueue,
    telemetry: Telemetry,
    recorder: Option<Recorder>,
}

impl Dispatcher {
    /// Drains `queue`.
    pub fn new(queue: EventQueue, telemetry: Telemetry) -> Self {
        Self {
            queue,
            telemetry,
            recorder: None,
        }
    }

    /// Records dispatched console lines and aborts with `recorder`.
    pub fn with_recorder(mut self, recorder: Recorder) -> Self {
        self.recorder = Some(recorder);
        self
    }

    /// Queue being drained.
    pub fn queue(&self) -> &EventQueue {
        &self.queue
    }

    /// Offers every event queued at the time of the call to `machine`, oldest first.
    ///
    /// Pending stack edits are flushed after each event so the next one sees
    /// the resulting stack. Returns how many events were dispatched.
    pub fn drain(&mut self, machine: &mut StateMachine) -> usize {
        let pending = self.queue.len();
        let mut dispatched = 0;
        while dispatched < pending {
            let Some(mut event) = self.queue.pop() else {
                break;
            };
            self.record(&event, RecordTiming::BeforeDispatch);
            machine.dispatch(&mut event);
            machine.flush_edits();
            self.record(&event, RecordTiming::AfterDispatch);
            dispatched += 1;
        }
        dispatched
    }

    fn record(&mut self, event: &Event, when: RecordTiming) {
        if let Some(recorder) = self.recorder.as_mut().filter(|r| r.timing() == when) {
            recorder.record(event, &self.telemetry);
        }
    }
}
