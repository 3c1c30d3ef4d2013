use crate::producer::Producer;
use crate::shutdown::{spawn_loop, LoopHandle, LoopStep, Shutdown};
use event::Category;
use std::collections::VecDeque;
use std::io;
use thiserror::Error;

/// Failures of a console line source.
#[derive(Debug, Error)]
pub enum ConsoleError {
    /// Reading the terminal failed.
    #[error("console i/o failed")]
    Io(#[from] io::Error),
    /// The line editor reported an error of its own.
    #[error("line editor failed: {0}")]
    Editor(String),
}

/// Convenience alias for console results.
pub type ConsoleResult<T> = Result<T, ConsoleError>;

/// One read from a line source.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ReadLine {
    /// A completed line without its terminator.
    Line(String),
    /// The operator interrupted the read (Ctrl-C).
    Interrupted,
    /// Input is closed (Ctrl-D or end of script).
    Eof,
}

/// Blocking source of operator lines.
pub trait LineSource: Send {
    /// Shows `prompt` and blocks for the next line.
    fn read_line(&mut self, prompt: &str) -> ConsoleResult<ReadLine>;
}

impl<S: LineSource + ?Sized> LineSource for Box<S> {
    fn read_line(&mut self, prompt: &str) -> ConsoleResult<ReadLine> {
        (**self).read_line(prompt)
    }
}

/// Line source replaying a fixed script, then reporting end of input.
#[derive(Clone, Debug, Default)]
pub struct ScriptedLines {
    lines: VecDeque<String>,
}

impl ScriptedLines {
    /// Script of `lines`, read in order.
    pub fn new<I, S>(lines: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            lines: lines.into_iter().map(Into::into).collect(),
        }
    }
}

impl LineSource for ScriptedLines {
    fn read_line(&mut self, _prompt: &str) -> ConsoleResult<ReadLine> {
        Ok(self.lines.pop_front().map_or(ReadLine::Eof, ReadLine::Line))
    }
}

/// What a console line asks for.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ConsoleInput {
    /// Blank line.
    Ignore,
    /// A `q` token: abort the current operation.
    Abort,
    /// `quit`: abort, then stop the application.
    Quit,
    /// Anything else, forwarded verbatim.
    Line(String),
}

/// Classifies one raw console line.
pub fn classify(line: &str) -> ConsoleInput {
    let trimmed = line.trim();
    if trimmed.is_empty() {
        ConsoleInput::Ignore
    } else if trimmed == "quit" {
        ConsoleInput::Quit
    } else if trimmed.split_whitespace().any(|token| token == "q") {
        ConsoleInput::Abort
    } else {
        ConsoleInput::Line(line.to_owned())
    }
}

/// Reads operator lines and turns them into events.
pub struct ConsoleLoop<S> {
    source: S,
    producer: Producer,
    shutdown: Shutdown,
    prompt: String,
}

impl<S: LineSource> ConsoleLoop<S> {
    /// Console over `source`, stopping when `shutdown` is raised.
    pub fn new(source: S, producer: Producer, shutdown: Shutdown) -> Self {
        Self {
            source,
            producer,
            shutdown,
            prompt: "> ".into(),
        }
    }

    /// Replaces the default `"> "` prompt.
    pub fn with_prompt(mut self, prompt: impl Into<String>) -> Self {
        self.prompt = prompt.into();
        self
    }

    /// Reads and publishes one line.
    pub fn step(&mut self) -> ConsoleResult<LoopStep> {
        match self.source.read_line(&self.prompt)? {
            ReadLine::Eof => {
                tracing::debug!("console input closed");
                self.quit();
                Ok(LoopStep::Stop)
            }
            ReadLine::Interrupted => {
                self.producer.abort();
                Ok(LoopStep::Continue)
            }
            ReadLine::Line(line) => match classify(&line) {
                ConsoleInput::Ignore => Ok(LoopStep::Continue),
                ConsoleInput::Abort => {
                    self.producer.abort();
                    Ok(LoopStep::Continue)
                }
                ConsoleInput::Quit => {
                    self.quit();
                    Ok(LoopStep::Stop)
                }
                ConsoleInput::Line(text) => {
                    let pools = &self.producer.pools;
                    self.producer
                        .emit(pools.command_line(&text), Category::CommandLine);
                    Ok(LoopStep::Continue)
                }
            },
        }
    }

    fn quit(&self) {
        self.producer.abort();
        self.shutdown.request();
    }

    /// Steps until `quit`, end of input, a read error or shutdown.
    ///
    /// A read error also requests shutdown: the operator has no other way in.
    pub fn run(mut self) {
        while !self.shutdown.is_requested() {
            match self.step() {
                Ok(LoopStep::Continue) => {}
                Ok(LoopStep::Stop) => break,
                Err(err) => {
                    tracing::warn!(error = %err, "console read failed");
                    self.shutdown.request();
                    break;
                }
            }
        }
    }

    /// Runs the loop on the `console` thread.
    pub fn spawn(self) -> io::Result<LoopHandle>
    where
        S: 'static,
    {
        spawn_loop("console", move || self.run())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classify_lines() {
        assert_eq!(classify("   "), ConsoleInput::Ignore);
        assert_eq!(classify(" quit "), ConsoleInput::Quit);
        assert_eq!(classify("render q"), ConsoleInput::Abort);
        assert_eq!(classify("quit now"), ConsoleInput::Line("quit now".into()));
        assert_eq!(
            classify("render_manager queue"),
            ConsoleInput::Line("render_manager queue".into())
        );
    }
}
