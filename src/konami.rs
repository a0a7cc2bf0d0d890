//! Key-sequence easter egg detection.
//!
//! A `SequenceMatcher` consumes `KeyboardEvent.code` tokens one at a time and
//! reports when the most recent tokens spell out a fixed target sequence as a
//! contiguous run. The matcher itself is pure and host-testable; what happens
//! on a completed match (rainbow sweep, lives, fanfare) lives in `page`.

/// The classic 10-step code, as `KeyboardEvent.code` values.
pub const KONAMI_CODE: [&str; 10] = [
    "ArrowUp",
    "ArrowUp",
    "ArrowDown",
    "ArrowDown",
    "ArrowLeft",
    "ArrowRight",
    "ArrowLeft",
    "ArrowRight",
    "KeyB",
    "KeyA",
];

/// Outcome of feeding one token to the matcher.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MatchResult {
    /// Token did not extend or restart the sequence; progress is zero.
    NoMatch,
    /// Token extended (or restarted) a partial run.
    Partial,
    /// Token completed the full sequence. Progress resets so an immediate
    /// back-to-back repeat can match again.
    Complete,
}

/// Tracks how much of `target` has been matched by the most recent tokens.
pub struct SequenceMatcher {
    target: &'static [&'static str],
    cursor: usize, // count of matched prefix, always <= target.len()
}

impl SequenceMatcher {
    pub fn new(target: &'static [&'static str]) -> Self {
        Self { target, cursor: 0 }
    }

    /// Current contiguous-prefix length, exposed for tests and diagnostics.
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// Feed the next input token.
    ///
    /// Exact token identity is required (no case folding). A token that breaks
    /// a partial run is re-checked against the first target element: it may
    /// itself be a valid restart of the sequence, so e.g. a target starting
    /// `[Up, Up, Down, ..]` fed `Up, Up, Up` keeps one step of progress
    /// rather than dropping to zero.
    pub fn observe(&mut self, token: &str) -> MatchResult {
        if self.target.is_empty() {
            return MatchResult::NoMatch;
        }
        if token == self.target[self.cursor] {
            self.cursor += 1;
            if self.cursor == self.target.len() {
                self.cursor = 0;
                return MatchResult::Complete;
            }
            return MatchResult::Partial;
        }
        self.cursor = if token == self.target[0] { 1 } else { 0 };
        if self.cursor > 0 {
            MatchResult::Partial
        } else {
            MatchResult::NoMatch
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TARGET: &[&str] = &["A", "A", "B", "B", "L", "R", "L", "R", "X", "Y"];

    #[test]
    fn full_sequence_completes_on_last_token() {
        let mut m = SequenceMatcher::new(&KONAMI_CODE);
        for (i, token) in KONAMI_CODE.iter().enumerate() {
            let r = m.observe(token);
            if i + 1 == KONAMI_CODE.len() {
                assert_eq!(r, MatchResult::Complete);
            } else {
                assert_eq!(r, MatchResult::Partial, "token {} ({})", i, token);
            }
        }
        assert_eq!(m.cursor(), 0);
    }

    #[test]
    fn repeated_first_token_restarts_instead_of_zeroing() {
        let mut m = SequenceMatcher::new(TARGET);
        assert_eq!(m.observe("A"), MatchResult::Partial);
        assert_eq!(m.cursor(), 1);
        assert_eq!(m.observe("A"), MatchResult::Partial);
        assert_eq!(m.cursor(), 2);
        // Third A breaks the run at position 2 but matches TARGET[0] again.
        assert_eq!(m.observe("A"), MatchResult::Partial);
        assert_eq!(m.cursor(), 1);
    }

    #[test]
    fn unrelated_token_resets_to_zero() {
        let mut m = SequenceMatcher::new(TARGET);
        m.observe("A");
        m.observe("A");
        assert_eq!(m.observe("Q"), MatchResult::NoMatch);
        assert_eq!(m.cursor(), 0);
    }

    #[test]
    fn back_to_back_runs_both_complete() {
        let mut m = SequenceMatcher::new(TARGET);
        for _ in 0..2 {
            let mut last = MatchResult::NoMatch;
            for token in TARGET {
                last = m.observe(token);
            }
            assert_eq!(last, MatchResult::Complete);
        }
    }

    #[test]
    fn completes_once_per_contiguous_occurrence() {
        // Noise / partial prefixes around one real occurrence.
        let stream = ["A", "B", "A", "A", "B", "B", "L", "R", "L", "R", "X", "Y", "Y"];
        let mut m = SequenceMatcher::new(TARGET);
        let completions = stream
            .iter()
            .filter(|t| m.observe(t) == MatchResult::Complete)
            .count();
        assert_eq!(completions, 1);
    }
}
