use arc_swap::ArcSwap;
use std::sync::Arc;

/// Words the console offers for completion.
///
/// The frame loop publishes a fresh snapshot whenever the entered states
/// change; the console thread reads it without locking. Completion only
/// suggests, input is never checked against it.
#[derive(Clone)]
pub struct SharedVocabulary(Arc<ArcSwap<Vec<String>>>);

impl Default for SharedVocabulary {
    fn default() -> Self {
        Self(Arc::new(ArcSwap::from_pointee(Vec::new())))
    }
}

impl SharedVocabulary {
    /// An empty vocabulary.
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the snapshot.
    pub fn publish(&self, words: Vec<String>) {
        tracing::debug!(words = words.len(), "vocabulary published");
        self.0.store(Arc::new(words));
    }

    /// Current snapshot.
    pub fn snapshot(&self) -> Arc<Vec<String>> {
        self.0.load_full()
    }

    /// Words starting with `prefix`, in vocabulary order.
    pub fn matches(&self, prefix: &str) -> Vec<String> {
        self.0
            .load()
            .iter()
            .filter(|word| word.starts_with(prefix))
            .cloned()
            .collect()
    }

    /// Completes the word ending at byte `pos` of `line`.
    ///
    /// Returns where that word starts and the candidates replacing it.
    pub fn complete(&self, line: &str, pos: usize) -> (usize, Vec<String>) {
        let head = line.get(..pos).unwrap_or(line);
        let start = head
            .char_indices()
            .rev()
            .find(|(_, c)| c.is_whitespace())
            .map_or(0, |(i, c)| i + c.len_utf8());
        (start, self.matches(&head[start..]))
    }
}
