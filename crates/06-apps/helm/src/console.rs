//! Terminal line source with completion over the shared vocabulary.

use dispatcher::{ConsoleError, ConsoleResult, LineSource, ReadLine, SharedVocabulary};
use rustyline::completion::Completer;
use rustyline::error::ReadlineError;
use rustyline::highlight::Highlighter;
use rustyline::hint::Hinter;
use rustyline::history::DefaultHistory;
use rustyline::validate::Validator;
use rustyline::{Context, Editor, Helper};

/// Completes the word under the cursor from the current vocabulary.
pub struct VocabHelper {
    vocabulary: SharedVocabulary,
}

impl Completer for VocabHelper {
    type Candidate = String;

    fn complete(
        &self,
        line: &str,
        pos: usize,
        _ctx: &Context<'_>,
    ) -> rustyline::Result<(usize, Vec<String>)> {
        Ok(self.vocabulary.complete(line, pos))
    }
}

impl Hinter for VocabHelper {
    type Hint = String;
}

impl Highlighter for VocabHelper {}

impl Validator for VocabHelper {}

impl Helper for VocabHelper {}

/// Operator console backed by rustyline.
pub struct EditorConsole {
    editor: Editor<VocabHelper, DefaultHistory>,
}

impl EditorConsole {
    pub fn new(vocabulary: SharedVocabulary) -> ConsoleResult<Self> {
        let mut editor = Editor::new().map_err(editor_error)?;
        editor.set_helper(Some(VocabHelper { vocabulary }));
        Ok(Self { editor })
    }
}

impl LineSource for EditorConsole {
    fn read_line(&mut self, prompt: &str) -> ConsoleResult<ReadLine> {
        match self.editor.readline(prompt) {
            Ok(line) => {
                if !line.trim().is_empty() {
                    if let Err(err) = self.editor.add_history_entry(line.as_str()) {
                        tracing::debug!(error = %err, "history entry not kept");
                    }
                }
                Ok(ReadLine::Line(line))
            }
            Err(ReadlineError::Interrupted) => Ok(ReadLine::Interrupted),
            Err(ReadlineError::Eof) => Ok(ReadLine::Eof),
            Err(err) => Err(editor_error(err)),
        }
    }
}

fn editor_error(err: ReadlineError) -> ConsoleError {
    match err {
        ReadlineError::Io(err) => ConsoleError::Io(err),
        other => ConsoleError::Editor(other.to_string()),
    }
}
