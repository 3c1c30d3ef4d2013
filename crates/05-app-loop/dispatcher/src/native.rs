use crate::producer::Producer;
use crate::shutdown::{spawn_loop, LoopHandle, LoopStep, Shutdown};
use event::{Category, EventHandle, Key, MouseButton};
use render_abi::{NativeEvent, NativeKind, WindowSource};
use std::io;
use std::sync::Arc;

/// Event category a native record becomes; `None` for records nobody routes.
pub fn category_of(kind: NativeKind) -> Option<Category> {
    Some(match kind {
        NativeKind::Motion => Category::Motion,
        NativeKind::ButtonPress => Category::MousePress,
        NativeKind::ButtonRelease => Category::MouseRelease,
        NativeKind::KeyPress => Category::KeyPress,
        NativeKind::KeyRelease => Category::KeyRelease,
        NativeKind::Enter => Category::EnterWindow,
        NativeKind::Leave => Category::LeaveWindow,
        NativeKind::Other(_) => return None,
    })
}

/// Translates window-system input into events.
pub struct NativeLoop {
    window: Arc<dyn WindowSource>,
    producer: Producer,
    shutdown: Shutdown,
}

impl NativeLoop {
    /// Loop over `window`.
    pub fn new(window: Arc<dyn WindowSource>, producer: Producer, shutdown: Shutdown) -> Self {
        Self {
            window,
            producer,
            shutdown,
        }
    }

    /// Waits for and publishes one native record.
    ///
    /// Stops when the window closes, and after publishing an Escape press.
    pub fn step(&mut self) -> LoopStep {
        let Some(native) = self.window.wait_for_event() else {
            tracing::debug!("window closed");
            return LoopStep::Stop;
        };
        let Some(category) = category_of(native.kind) else {
            return LoopStep::Continue;
        };
        self.producer.emit(self.allocate(category, native), category);
        if native.kind == NativeKind::KeyPress && Key(native.detail) == Key::ESCAPE {
            tracing::debug!("escape pressed; native input ends");
            return LoopStep::Stop;
        }
        LoopStep::Continue
    }

    fn allocate(&self, category: Category, native: NativeEvent) -> Option<EventHandle> {
        let pools = &self.producer.pools;
        let NativeEvent { x, y, detail, .. } = native;
        match category {
            Category::Motion => pools.pointer(category, x, y, None),
            Category::MousePress | Category::MouseRelease => {
                pools.pointer(category, x, y, Some(MouseButton::from_code(detail)))
            }
            Category::KeyPress | Category::KeyRelease => pools.key(category, x, y, Key(detail)),
            _ => pools.empty(category),
        }
    }

    /// Steps until the window closes, Escape is pressed or shutdown is requested.
    pub fn run(mut self) {
        while !self.shutdown.is_requested() {
            if self.step() == LoopStep::Stop {
                break;
            }
        }
    }

    /// Runs the loop on the `native-input` thread.
    pub fn spawn(self) -> io::Result<LoopHandle> {
        spawn_loop("native-input", move || self.run())
    }
}
