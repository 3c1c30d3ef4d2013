use crossbeam_channel::{unbounded, Receiver, Sender};
use render_abi::{NativeEvent, WindowSource};

/// Window whose events come from a [`WindowFeed`].
///
/// `wait_for_event` blocks until the feed sends or every feed is dropped,
/// which reads as the window closing.
pub struct ChannelWindow {
    events: Receiver<NativeEvent>,
}

/// Sending half paired with a [`ChannelWindow`].
#[derive(Clone)]
pub struct WindowFeed {
    events: Sender<NativeEvent>,
}

impl ChannelWindow {
    pub fn new() -> (Self, WindowFeed) {
        let (tx, rx) = unbounded();
        (Self { events: rx }, WindowFeed { events: tx })
    }
}

impl WindowFeed {
    /// Queues one native event; false once the window side is gone.
    pub fn send(&self, event: NativeEvent) -> bool {
        self.events.send(event).is_ok()
    }
}

impl WindowSource for ChannelWindow {
    fn wait_for_event(&self) -> Option<NativeEvent> {
        self.events.recv().ok()
    }
}
