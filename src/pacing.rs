use itertools::Itertools;

// Delay multipliers applied on top of the base per-word delay.
pub const SENTENCE_END_DELAY: f64 = 2.5;
pub const CLAUSE_END_DELAY: f64 = 1.5;
pub const LONG_WORD_DELAY: f64 = 1.3;
pub const VERY_LONG_WORD_DELAY: f64 = 1.5;
pub const SHORT_WORD_DELAY: f64 = 0.8;

// Word length thresholds (in chars) for the delay tiers.
pub const LONG_WORD_THRESHOLD: usize = 8;
pub const VERY_LONG_WORD_THRESHOLD: usize = 12;
pub const SHORT_WORD_THRESHOLD: usize = 3;

/// One display unit of the RSVP stream: a token and how long it stays
/// on screen. Immutable once segmented.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimedWord {
    pub text: String,
    pub delay_ms: u64,
}

/// Per-word base delay for a words-per-minute setting.
pub fn base_delay_ms(wpm: u32) -> f64 {
    debug_assert!(wpm > 0, "wpm must be positive");
    60_000.0 / wpm as f64
}

fn word_delay_ms(word: &str, base_delay_ms: f64, punctuation_pacing: bool) -> u64 {
    let mut delay = base_delay_ms;

    if punctuation_pacing {
        if word.ends_with(['.', '!', '?']) {
            delay *= SENTENCE_END_DELAY;
        } else if word.ends_with([',', ';', ':']) {
            delay *= CLAUSE_END_DELAY;
        }

        // Length tiers are strict: a very long word gets only the
        // very-long multiplier, never the long one as well.
        let len = word.chars().count();
        if len > VERY_LONG_WORD_THRESHOLD {
            delay *= VERY_LONG_WORD_DELAY;
        } else if len > LONG_WORD_THRESHOLD {
            delay *= LONG_WORD_DELAY;
        }

        if len <= SHORT_WORD_THRESHOLD {
            delay *= SHORT_WORD_DELAY;
        }
    }

    delay.round() as u64
}

/// Split normalized text into timed words. Tokens are whitespace runs'
/// complements; empty tokens never appear. With punctuation pacing off
/// every word gets exactly the base delay.
pub fn segment(text: &str, base_delay_ms: f64, punctuation_pacing: bool) -> Vec<TimedWord> {
    text.split_whitespace()
        .map(|word| TimedWord {
            text: word.to_string(),
            delay_ms: word_delay_ms(word, base_delay_ms, punctuation_pacing),
        })
        .collect()
}

/// Re-derive the token stream's text for re-segmentation after a
/// pacing-settings change. Word boundaries already established must
/// not move, so pacing is reapplied to the joined tokens rather than
/// the original raw source.
pub fn rejoin(words: &[TimedWord]) -> String {
    words.iter().map(|w| w.text.as_str()).join(" ")
}

/// Total on-screen time of the whole sequence.
pub fn total_ms(words: &[TimedWord]) -> u64 {
    words.iter().map(|w| w.delay_ms).sum()
}

/// On-screen time of all words strictly before `index`.
pub fn elapsed_before_ms(words: &[TimedWord], index: usize) -> u64 {
    words.iter().take(index).map(|w| w.delay_ms).sum()
}
