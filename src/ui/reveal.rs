//! Cosmetic word-by-word reveal of a submitted message.
//!
//! Purely presentational: the reveal is advanced by render ticks while the
//! backend call is in flight and never delays it. When the reply arrives the
//! reveal is dropped whether it finished or not.

use std::time::Duration;

#[derive(Debug, Clone, PartialEq)]
pub struct Reveal {
    tokens: Vec<String>,
    shown: usize,
    delay: Duration,
}

impl Reveal {
    pub fn new(text: &str, delay: Duration) -> Self {
        let tokens: Vec<String> = text.split_whitespace().map(str::to_string).collect();
        let shown = revealed_count(tokens.len(), Duration::ZERO, delay);
        Self {
            tokens,
            shown,
            delay,
        }
    }

    /// Shows every token whose slot has started by `elapsed`.
    pub fn advance_to(&mut self, elapsed: Duration) {
        self.shown = revealed_count(self.tokens.len(), elapsed, self.delay);
    }

    pub fn text(&self) -> String {
        self.tokens[..self.shown].join(" ")
    }

    #[cfg(test)]
    fn is_complete(&self) -> bool {
        self.shown >= self.tokens.len()
    }
}

/// Number of tokens visible `elapsed` after the reveal started; the first
/// token appears immediately.
pub fn revealed_count(total: usize, elapsed: Duration, delay: Duration) -> usize {
    if delay.is_zero() {
        return total;
    }
    let steps = (elapsed.as_millis() / delay.as_millis().max(1)) as usize;
    steps.saturating_add(1).min(total)
}
