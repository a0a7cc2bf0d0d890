// Integration tests (native) for the easter-egg sequence matcher.
// These avoid wasm-specific functionality and exercise pure Rust logic so
// they can run under `cargo test` on the host.

use warp_zone::konami::{KONAMI_CODE, MatchResult, SequenceMatcher};

#[test]
fn konami_code_completes_on_tenth_token() {
    let mut matcher = SequenceMatcher::new(&KONAMI_CODE);
    let results: Vec<MatchResult> = KONAMI_CODE.iter().map(|t| matcher.observe(t)).collect();
    assert_eq!(results.len(), 10);
    assert!(
        results[..9].iter().all(|r| *r == MatchResult::Partial),
        "prefix tokens should report partial progress"
    );
    assert_eq!(results[9], MatchResult::Complete);
}

#[test]
fn unrelated_break_token_drops_progress_to_zero() {
    let mut matcher = SequenceMatcher::new(&KONAMI_CODE);
    matcher.observe("ArrowUp");
    matcher.observe("ArrowUp");
    // ArrowLeft neither continues (ArrowDown expected) nor restarts (ArrowUp).
    assert_eq!(matcher.observe("ArrowLeft"), MatchResult::NoMatch);
    assert_eq!(matcher.cursor(), 0);
}

#[test]
fn break_token_equal_to_first_element_restarts_run() {
    let mut matcher = SequenceMatcher::new(&KONAMI_CODE);
    assert_eq!(matcher.observe("ArrowUp"), MatchResult::Partial);
    assert_eq!(matcher.cursor(), 1);
    assert_eq!(matcher.observe("ArrowUp"), MatchResult::Partial);
    assert_eq!(matcher.cursor(), 2);
    // A third ArrowUp breaks the run but is itself a fresh start.
    assert_eq!(matcher.observe("ArrowUp"), MatchResult::Partial);
    assert_eq!(matcher.cursor(), 1);
    // The remaining nine tokens finish the code from there.
    let rest = &KONAMI_CODE[1..];
    let mut last = MatchResult::NoMatch;
    for token in rest {
        last = matcher.observe(token);
    }
    assert_eq!(last, MatchResult::Complete);
}

#[test]
fn code_matches_after_leading_noise() {
    let mut matcher = SequenceMatcher::new(&KONAMI_CODE);
    for token in ["KeyA", "Space", "ArrowDown", "Enter"] {
        matcher.observe(token);
    }
    let mut completions = 0;
    for token in KONAMI_CODE {
        if matcher.observe(token) == MatchResult::Complete {
            completions += 1;
        }
    }
    assert_eq!(completions, 1);
}

#[test]
fn back_to_back_codes_both_complete() {
    let mut matcher = SequenceMatcher::new(&KONAMI_CODE);
    for round in 0..2 {
        let mut last = MatchResult::NoMatch;
        for token in KONAMI_CODE {
            last = matcher.observe(token);
        }
        assert_eq!(last, MatchResult::Complete, "round {}", round);
    }
}

#[test]
fn tokens_are_case_sensitive() {
    let mut matcher = SequenceMatcher::new(&KONAMI_CODE);
    assert_eq!(matcher.observe("arrowup"), MatchResult::NoMatch);
    assert_eq!(matcher.cursor(), 0);
}
