use pool::Recycle;
use smallvec::SmallVec;
use std::fmt;
use std::path::{Path, PathBuf};

/// Kind of input occurrence. The byte value is the event-log tag.
#[repr(u8)]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Category {
    /// One line typed at the console.
    CommandLine = 0,
    /// Pointer moved inside the window.
    Motion = 1,
    /// Pointer button pressed.
    MousePress = 2,
    /// Pointer button released.
    MouseRelease = 3,
    /// Key pressed.
    KeyPress = 4,
    /// Key released.
    KeyRelease = 5,
    /// Pointer entered the window.
    EnterWindow = 6,
    /// Pointer left the window.
    LeaveWindow = 7,
    /// Operator asked to abandon the current operation.
    Abort = 8,
    /// A watched file changed on disk.
    FileChanged = 9,
}

impl Category {
    /// Every category, in tag order.
    pub const ALL: [Category; 10] = [
        Category::CommandLine,
        Category::Motion,
        Category::MousePress,
        Category::MouseRelease,
        Category::KeyPress,
        Category::KeyRelease,
        Category::EnterWindow,
        Category::LeaveWindow,
        Category::Abort,
        Category::FileChanged,
    ];

    /// Decodes an event-log tag.
    pub fn from_byte(byte: u8) -> Option<Self> {
        Self::ALL.get(usize::from(byte)).copied()
    }

    /// Event-log tag.
    pub fn as_byte(self) -> u8 {
        self as u8
    }

    /// Categories persisted by the event log.
    pub fn is_recordable(self) -> bool {
        matches!(self, Category::CommandLine | Category::Abort)
    }

    /// Short name used for pool labels and logging.
    pub fn label(self) -> &'static str {
        match self {
            Category::CommandLine => "command_line",
            Category::Motion => "motion",
            Category::MousePress => "mouse_press",
            Category::MouseRelease => "mouse_release",
            Category::KeyPress => "key_press",
            Category::KeyRelease => "key_release",
            Category::EnterWindow => "enter_window",
            Category::LeaveWindow => "leave_window",
            Category::Abort => "abort",
            Category::FileChanged => "file_changed",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Native key code.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Key(pub u8);

impl Key {
    /// Escape; ends the native input loop.
    pub const ESCAPE: Key = Key(9);
}

/// Pointer button from a native press/release record.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum MouseButton {
    /// Primary button.
    Left,
    /// Wheel click.
    Middle,
    /// Secondary button.
    Right,
    /// Wheel scrolled away from the user.
    WheelUp,
    /// Wheel scrolled toward the user.
    WheelDown,
    /// Any other native button code.
    Other(u8),
}

impl MouseButton {
    /// Maps a native button code.
    pub fn from_code(code: u8) -> Self {
        match code {
            1 => MouseButton::Left,
            2 => MouseButton::Middle,
            3 => MouseButton::Right,
            4 => MouseButton::WheelUp,
            5 => MouseButton::WheelDown,
            other => MouseButton::Other(other),
        }
    }
}

/// Category-specific event data.
#[derive(Clone, Debug, Default, PartialEq)]
pub enum Payload {
    /// Abort, enter and leave carry nothing.
    #[default]
    Empty,
    /// Raw console text with cached whitespace token spans.
    Text {
        /// The line as typed.
        text: String,
        /// Byte ranges of each token in `text`.
        spans: SmallVec<[(u32, u32); 8]>,
    },
    /// Pointer position, with the button for press/release.
    Pointer {
        /// Window x coordinate.
        x: i16,
        /// Window y coordinate.
        y: i16,
        /// Button, absent for motion.
        button: Option<MouseButton>,
    },
    /// Key code and pointer position at the time of the key event.
    Key {
        /// Window x coordinate.
        x: i16,
        /// Window y coordinate.
        y: i16,
        /// Native key code.
        key: Key,
    },
    /// Path of a changed file.
    Path(PathBuf),
}

/// One input occurrence.
///
/// Usually lives in a [`pool::Pooled`] slot; plain values are built for
/// synthesized input and tests.
#[derive(Clone, Debug, PartialEq)]
pub struct Event {
    category: Category,
    handled: bool,
    payload: Payload,
}

impl Default for Event {
    fn default() -> Self {
        Self {
            category: Category::Abort,
            handled: false,
            payload: Payload::Empty,
        }
    }
}

impl Recycle for Event {
    fn reset(&mut self) {
        self.handled = false;
        match &mut self.payload {
            Payload::Text { text, spans } => {
                text.clear();
                spans.clear();
            }
            Payload::Path(path) => path.as_mut_os_string().clear(),
            Payload::Pointer { x, y, button } => {
                *x = 0;
                *y = 0;
                *button = None;
            }
            Payload::Key { x, y, .. } => {
                *x = 0;
                *y = 0;
            }
            Payload::Empty => {}
        }
    }
}

impl Event {
    /// A console line.
    pub fn command_line(text: &str) -> Self {
        let mut event = Self::default();
        event.set_command_line(text);
        event
    }

    /// An abort request.
    pub fn abort() -> Self {
        let mut event = Self::default();
        event.set_empty(Category::Abort);
        event
    }

    /// A file-changed notification.
    pub fn file_changed(path: &Path) -> Self {
        let mut event = Self::default();
        event.set_file_changed(path);
        event
    }

    /// A motion, press or release event.
    pub fn pointer(category: Category, x: i16, y: i16, button: Option<MouseButton>) -> Self {
        let mut event = Self::default();
        event.set_pointer(category, x, y, button);
        event
    }

    /// Rewrites this event as a console line, reusing the text buffer.
    pub fn set_command_line(&mut self, line: &str) {
        self.category = Category::CommandLine;
        self.handled = false;
        match &mut self.payload {
            Payload::Text { text, spans } => {
                text.clear();
                text.push_str(line);
                token_spans(text, spans);
            }
            payload => {
                let mut spans = SmallVec::new();
                token_spans(line, &mut spans);
                *payload = Payload::Text {
                    text: line.to_owned(),
                    spans,
                };
            }
        }
    }

    /// Rewrites this event as a payload-free event of `category`.
    pub fn set_empty(&mut self, category: Category) {
        self.category = category;
        self.handled = false;
        self.payload = Payload::Empty;
    }

    /// Rewrites this event as a pointer event.
    pub fn set_pointer(&mut self, category: Category, x: i16, y: i16, button: Option<MouseButton>) {
        self.category = category;
        self.handled = false;
        self.payload = Payload::Pointer { x, y, button };
    }

    /// Rewrites this event as a key event.
    pub fn set_key(&mut self, category: Category, x: i16, y: i16, key: Key) {
        self.category = category;
        self.handled = false;
        self.payload = Payload::Key { x, y, key };
    }

    /// Rewrites this event as a file-changed notification, reusing the path buffer.
    pub fn set_file_changed(&mut self, changed: &Path) {
        self.category = Category::FileChanged;
        self.handled = false;
        match &mut self.payload {
            Payload::Path(path) => {
                path.as_mut_os_string().clear();
                path.push(changed);
            }
            payload => *payload = Payload::Path(changed.to_path_buf()),
        }
    }

    /// Event category.
    pub fn category(&self) -> Category {
        self.category
    }

    /// Payload.
    pub fn payload(&self) -> &Payload {
        &self.payload
    }

    /// Whether some state has claimed the event.
    pub fn is_handled(&self) -> bool {
        self.handled
    }

    /// Claims the event; dispatch stops at the claiming state.
    pub fn set_handled(&mut self) {
        self.handled = true;
    }

    /// Console text, for command-line events.
    pub fn text(&self) -> Option<&str> {
        match &self.payload {
            Payload::Text { text, .. } if self.category == Category::CommandLine => {
                Some(text.as_str())
            }
            _ => None,
        }
    }

    /// Whitespace-separated tokens of a console line; empty otherwise.
    pub fn tokens(&self) -> impl Iterator<Item = &str> + '_ {
        let (text, spans): (&str, &[(u32, u32)]) = match &self.payload {
            Payload::Text { text, spans } => (text.as_str(), spans.as_slice()),
            _ => ("", &[][..]),
        };
        spans
            .iter()
            .map(move |&(start, end)| &text[start as usize..end as usize])
    }

    /// First token of a console line.
    pub fn first_token(&self) -> Option<&str> {
        self.tokens().next()
    }

    /// Text following the first token, trimmed; empty when there is none.
    pub fn remainder(&self) -> &str {
        match &self.payload {
            Payload::Text { text, spans } if spans.len() > 1 => {
                text[spans[1].0 as usize..].trim_end()
            }
            _ => "",
        }
    }

    /// Pointer coordinates for pointer and key events.
    pub fn position(&self) -> Option<(i16, i16)> {
        match self.payload {
            Payload::Pointer { x, y, .. } | Payload::Key { x, y, .. } => Some((x, y)),
            _ => None,
        }
    }

    /// Button for press/release events.
    pub fn button(&self) -> Option<MouseButton> {
        match self.payload {
            Payload::Pointer { button, .. } => button,
            _ => None,
        }
    }

    /// Key code for key events.
    pub fn key(&self) -> Option<Key> {
        match self.payload {
            Payload::Key { key, .. } => Some(key),
            _ => None,
        }
    }

    /// Changed path for file-changed events.
    pub fn path(&self) -> Option<&Path> {
        match &self.payload {
            Payload::Path(path) => Some(path),
            _ => None,
        }
    }
}

fn token_spans(text: &str, spans: &mut SmallVec<[(u32, u32); 8]>) {
    spans.clear();
    let mut start = None;
    for (index, ch) in text.char_indices() {
        if ch.is_whitespace() {
            if let Some(begin) = start.take() {
                spans.push((begin as u32, index as u32));
            }
        } else if start.is_none() {
            start = Some(index);
        }
    }
    if let Some(begin) = start {
        spans.push((begin as u32, text.len() as u32));
    }
}
