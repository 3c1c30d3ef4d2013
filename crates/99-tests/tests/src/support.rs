use dispatcher::{ConsoleResult, LineSource, ReadLine, SharedVocabulary};
use std::collections::VecDeque;
use std::thread;
use std::time::{Duration, Instant};

const PATIENCE: Duration = Duration::from_secs(5);

/// Polls `cond` until it holds, failing the test after a few seconds.
pub fn wait_until(what: &str, mut cond: impl FnMut() -> bool) {
    let deadline = Instant::now() + PATIENCE;
    while !cond() {
        assert!(Instant::now() < deadline, "timed out waiting for {what}");
        thread::sleep(Duration::from_millis(2));
    }
}

/// True when `word` is offered for completion right now.
pub fn offers(vocabulary: &SharedVocabulary, word: &str) -> bool {
    vocabulary.snapshot().iter().any(|w| w == word)
}

/// Console that types each line once the word it starts with is offered,
/// the way an operator reads the completion list before typing.
pub struct Operator {
    script: VecDeque<&'static str>,
    vocabulary: SharedVocabulary,
}

impl Operator {
    pub fn new(script: &[&'static str], vocabulary: SharedVocabulary) -> Self {
        Self {
            script: script.iter().copied().collect(),
            vocabulary,
        }
    }
}

impl LineSource for Operator {
    fn read_line(&mut self, _prompt: &str) -> ConsoleResult<ReadLine> {
        let Some(line) = self.script.pop_front() else {
            return Ok(ReadLine::Eof);
        };
        let word = line.split_whitespace().next().unwrap_or_default();
        if word != "q" {
            wait_until(word, || offers(&self.vocabulary, word));
        }
        Ok(ReadLine::Line(line.to_owned()))
    }
}

/// Operator lines taking an empty renderer to a frame being drawn.
pub const SESSION: &[&str] = &[
    "render_manager",
    "open_window",
    "prepare_render_frames",
    "shader_manager",
    "load_vert_shaders tri_vert",
    "load_frag_shaders tri_frag",
    "q",
    "render_pass_manager create_swapchain_render_pass main",
    "q",
    "descriptor_manager create_descriptor_set_layout dsl0 ubo:vert",
    "q",
    "pipeline_manager",
    "create_pipeline_layout pl",
    "create_graphics_pipeline tri pl tri_vert tri_frag main 800 600",
    "q",
    "create_render_layer swap main tri",
    "record_render_command 0 0",
    "render 0",
];
