use std::fmt::Debug;

use tracing::info;
use unicode_segmentation::UnicodeSegmentation;

use super::NetObserver;
use crate::net::Token;

/// Logs every event at `info` level. Token colors are rendered with `Debug` and cut to
/// `max_len` graphemes.
#[derive(Clone, Debug)]
pub struct TracingObserver {
    max_len: usize,
}

impl Default for TracingObserver {
    fn default() -> Self {
        TracingObserver { max_len: 100 }
    }
}

impl TracingObserver {
    pub fn new(max_len: usize) -> Self {
        // need room for the trailing "..."
        TracingObserver { max_len: max_len.max(4) }
    }
}

fn truncated(s: &str, max_len: usize) -> String {
    if s.len() <= max_len {
        // Note: length in bytes, but each grapheme must have one byte at least.
        return s.into();
    }
    let mut graphemes = s.graphemes(true).take(max_len + 1).collect::<Vec<_>>();
    if graphemes.len() > max_len {
        graphemes.remove(max_len);
        graphemes[max_len - 1] = ".";
        graphemes[max_len - 2] = ".";
        graphemes[max_len - 3] = ".";
    }

    graphemes.concat()
}

pub(crate) fn tokens_as_string<C: Debug>(tokens: &[Token<C>], max_len: usize) -> String {
    let rendered: Vec<String> = tokens.iter().map(|to| to.to_string()).collect();
    truncated(&format!("[{}]", rendered.join(", ")), max_len)
}

impl<C, B> NetObserver<C, B> for TracingObserver
where
    C: Debug,
    B: Debug,
{
    fn on_transition_fired(
        &self,
        transition_id: &str,
        binding: &B,
        time: i64,
        consumed: &[Token<C>],
        produced: &[Token<C>],
    ) {
        let binding = truncated(&format!("{binding:?}"), self.max_len);
        let consumed = tokens_as_string(consumed, self.max_len);
        let produced = tokens_as_string(produced, self.max_len);
        info!(
            transition = transition_id,
            time,
            binding = %binding,
            consumed = %consumed,
            produced = %produced,
            "Transition fired."
        );
    }

    fn on_time_advanced(&self, time: i64) {
        info!(time, "Time advanced.");
    }
}
