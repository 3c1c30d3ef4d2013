/// Native event tag as reported by the window system.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NativeKind {
    Motion,
    ButtonPress,
    ButtonRelease,
    KeyPress,
    KeyRelease,
    Enter,
    Leave,
    /// Anything the control plane does not route (expose, configure, ...).
    Other(u8),
}

/// One record from the window system.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct NativeEvent {
    pub kind: NativeKind,
    pub x: i16,
    pub y: i16,
    /// Button code for press/release, key code for key events.
    pub detail: u8,
}

impl NativeEvent {
    pub fn new(kind: NativeKind, x: i16, y: i16, detail: u8) -> Self {
        Self { kind, x, y, detail }
    }
}

/// Blocking source of native input.
pub trait WindowSource: Send + Sync {
    /// Blocks until the next event; `None` once the window is gone.
    fn wait_for_event(&self) -> Option<NativeEvent>;
}
