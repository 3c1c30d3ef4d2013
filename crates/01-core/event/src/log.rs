//! Append-only binary event log.
//!
//! Each record is one tag byte (the [`Category`] value) followed by the
//! category payload. Only console lines and aborts are persisted:
//!
//! | category      | payload                                   |
//! |---------------|-------------------------------------------|
//! | `CommandLine` | `u32` little-endian byte length, UTF-8     |
//! | `Abort`       | none                                      |

use crate::event::{Category, Event};
use crate::pools::{EventHandle, EventPools};
use std::fs::{File, OpenOptions};
use std::io::{self, BufReader, BufWriter, ErrorKind, Read, Write};
use std::path::Path;
use std::string::FromUtf8Error;
use thiserror::Error;

/// Errors raised while reading or writing the event log.
#[derive(Debug, Error)]
pub enum LogError {
    /// Underlying file access failed.
    #[error("event log i/o failed")]
    Io(#[from] io::Error),
    /// A tag byte does not name a category.
    #[error("unknown event category tag {0:#04x}")]
    UnknownCategory(u8),
    /// A tag names a category the log never stores.
    #[error("category `{0}` is not recordable")]
    NotRecordable(Category),
    /// The log ended inside a record.
    #[error("event log ends inside a record")]
    Truncated,
    /// A console line is not valid UTF-8.
    #[error("recorded command line is not valid UTF-8")]
    Utf8(#[from] FromUtf8Error),
}

/// Convenience alias for log results.
pub type LogResult<T> = Result<T, LogError>;

/// One persisted event.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum LoggedEvent {
    /// A console line.
    CommandLine(String),
    /// An abort request.
    Abort,
}

impl LoggedEvent {
    /// Captures a recordable event; `None` for categories the log skips.
    pub fn from_event(event: &Event) -> Option<Self> {
        match event.category() {
            Category::CommandLine => event.text().map(|t| Self::CommandLine(t.to_owned())),
            Category::Abort => Some(Self::Abort),
            _ => None,
        }
    }

    /// Category tag written for this record.
    pub fn category(&self) -> Category {
        match self {
            Self::CommandLine(_) => Category::CommandLine,
            Self::Abort => Category::Abort,
        }
    }

    /// Allocates the equivalent live event; `None` when its pool is exhausted.
    pub fn materialize(&self, pools: &EventPools) -> Option<EventHandle> {
        match self {
            Self::CommandLine(text) => pools.command_line(text),
            Self::Abort => pools.empty(Category::Abort),
        }
    }
}

/// Writes records to an append-only sink.
pub struct EventLogWriter<W: Write> {
    out: W,
}

impl EventLogWriter<BufWriter<File>> {
    /// Opens `path` for appending, creating it if needed.
    pub fn append(path: &Path) -> LogResult<Self> {
        let file = OpenOptions::new().create(true).append(true).open(path)?;
        Ok(Self::new(BufWriter::new(file)))
    }
}

impl<W: Write> EventLogWriter<W> {
    /// Wraps an arbitrary sink.
    pub fn new(out: W) -> Self {
        Self { out }
    }

    /// Appends one record and flushes it.
    pub fn write(&mut self, event: &LoggedEvent) -> LogResult<()> {
        self.out.write_all(&[event.category().as_byte()])?;
        if let LoggedEvent::CommandLine(text) = event {
            let len = u32::try_from(text.len()).map_err(|_| {
                io::Error::new(ErrorKind::InvalidInput, "command line exceeds u32 length")
            })?;
            self.out.write_all(&len.to_le_bytes())?;
            self.out.write_all(text.as_bytes())?;
        }
        self.out.flush()?;
        Ok(())
    }

    /// Appends `event` if its category is recordable; returns whether it was written.
    pub fn record(&mut self, event: &Event) -> LogResult<bool> {
        match LoggedEvent::from_event(event) {
            Some(logged) => self.write(&logged).map(|()| true),
            None => Ok(false),
        }
    }

    /// Returns the underlying sink.
    pub fn into_inner(self) -> W {
        self.out
    }
}

/// Reads records sequentially.
pub struct EventLogReader<R: Read> {
    input: R,
}

impl EventLogReader<BufReader<File>> {
    /// Opens `path` for reading.
    pub fn open(path: &Path) -> LogResult<Self> {
        Ok(Self::new(BufReader::new(File::open(path)?)))
    }
}

impl<R: Read> EventLogReader<R> {
    /// Wraps an arbitrary source.
    pub fn new(input: R) -> Self {
        Self { input }
    }

    /// Reads the next record; `None` at a clean end of log.
    pub fn next_event(&mut self) -> LogResult<Option<LoggedEvent>> {
        let mut tag = [0u8; 1];
        loop {
            match self.input.read(&mut tag) {
                Ok(0) => return Ok(None),
                Ok(_) => break,
                Err(err) if err.kind() == ErrorKind::Interrupted => continue,
                Err(err) => return Err(err.into()),
            }
        }
        let category = Category::from_byte(tag[0]).ok_or(LogError::UnknownCategory(tag[0]))?;
        match category {
            Category::CommandLine => {
                let mut len = [0u8; 4];
                self.read_exact(&mut len)?;
                let len = u32::from_le_bytes(len);
                let mut bytes = Vec::new();
                let read = self
                    .input
                    .by_ref()
                    .take(u64::from(len))
                    .read_to_end(&mut bytes)?;
                if read != len as usize {
                    return Err(LogError::Truncated);
                }
                Ok(Some(LoggedEvent::CommandLine(String::from_utf8(bytes)?)))
            }
            Category::Abort => Ok(Some(LoggedEvent::Abort)),
            other => Err(LogError::NotRecordable(other)),
        }
    }

    /// Discards up to `count` records, returning how many were skipped.
    pub fn skip(&mut self, count: usize) -> LogResult<usize> {
        let mut skipped = 0;
        while skipped < count && self.next_event()?.is_some() {
            skipped += 1;
        }
        Ok(skipped)
    }

    /// Reads every remaining record.
    pub fn read_all(&mut self) -> LogResult<Vec<LoggedEvent>> {
        let mut out = Vec::new();
        while let Some(event) = self.next_event()? {
            out.push(event);
        }
        Ok(out)
    }

    fn read_exact(&mut self, buf: &mut [u8]) -> LogResult<()> {
        self.input.read_exact(buf).map_err(|err| match err.kind() {
            ErrorKind::UnexpectedEof => LogError::Truncated,
            _ => LogError::Io(err),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn encode(events: &[LoggedEvent]) -> Vec<u8> {
        let mut writer = EventLogWriter::new(Vec::new());
        for event in events {
            writer.write(event).unwrap();
        }
        writer.into_inner()
    }

    #[test]
    fn command_line_layout_is_tag_length_text() {
        let bytes = encode(&[LoggedEvent::CommandLine("hi".into())]);
        assert_eq!(bytes, [0, 2, 0, 0, 0, b'h', b'i']);
    }

    #[test]
    fn abort_is_a_bare_tag() {
        assert_eq!(encode(&[LoggedEvent::Abort]), [8]);
    }

    #[test]
    fn skip_drops_leading_records() {
        let bytes = encode(&[
            LoggedEvent::CommandLine("render_manager".into()),
            LoggedEvent::Abort,
            LoggedEvent::CommandLine("open_window".into()),
        ]);
        let mut reader = EventLogReader::new(Cursor::new(bytes));
        assert_eq!(reader.skip(2).unwrap(), 2);
        assert_eq!(
            reader.read_all().unwrap(),
            [LoggedEvent::CommandLine("open_window".into())]
        );
    }

    #[test]
    fn unknown_tag_is_an_error() {
        let mut reader = EventLogReader::new(Cursor::new(vec![0x7f]));
        assert!(matches!(
            reader.next_event(),
            Err(LogError::UnknownCategory(0x7f))
        ));
    }

    #[test]
    fn pointer_tag_is_not_recordable() {
        let mut reader = EventLogReader::new(Cursor::new(vec![Category::Motion.as_byte()]));
        assert!(matches!(
            reader.next_event(),
            Err(LogError::NotRecordable(Category::Motion))
        ));
    }

    #[test]
    fn short_payload_is_truncated() {
        let mut reader = EventLogReader::new(Cursor::new(vec![0, 9, 0, 0, 0, b'x']));
        assert!(matches!(reader.next_event(), Err(LogError::Truncated)));
    }

    #[test]
    fn oversized_length_prefix_reads_only_what_exists() {
        let mut reader =
            EventLogReader::new(Cursor::new(vec![0, 0xff, 0xff, 0xff, 0xff, b'x', b'y']));
        assert!(matches!(reader.next_event(), Err(LogError::Truncated)));
    }

    #[test]
    fn record_skips_pointer_events() {
        let mut writer = EventLogWriter::new(Vec::new());
        let motion = Event::pointer(Category::Motion, 1, 2, None);
        assert!(!writer.record(&motion).unwrap());
        assert!(writer.record(&Event::abort()).unwrap());
        assert_eq!(writer.into_inner(), [8]);
    }
}
