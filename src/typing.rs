use chrono::prelude::*;
use directories::ProjectDirs;
use std::collections::HashSet;
use std::fs::OpenOptions;
use std::io::{self, Write};
use std::time::SystemTime;

/// Rendering class of one reference character.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CharState {
    Correct,
    Incorrect,
    /// The character the user will type next.
    Cursor,
    Pending,
}

/// Aggregate metrics, recomputed from the session on every keystroke.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TypingStats {
    pub wpm: u64,
    pub accuracy: f64,
    /// Positions that were ever mistyped this session. Monotonic:
    /// corrections never lower it.
    pub errors: usize,
    pub correct_chars: usize,
    pub total_chars: usize,
}

impl TypingStats {
    fn empty() -> Self {
        Self {
            wpm: 0,
            accuracy: 100.0,
            errors: 0,
            correct_chars: 0,
            total_chars: 0,
        }
    }
}

/// One run of typing a reference text.
///
/// Input arrives as whole candidate strings (the current content of
/// the input buffer), scored against the reference prefix of the same
/// length. Candidates longer than the reference are rejected outright,
/// never truncated.
#[derive(Debug)]
pub struct TypingSession {
    reference: Vec<char>,
    typed: Vec<char>,
    started_at: Option<SystemTime>,
    error_positions: HashSet<usize>,
}

impl TypingSession {
    pub fn new(reference: &str) -> Self {
        Self {
            reference: reference.chars().collect(),
            typed: Vec::new(),
            started_at: None,
            error_positions: HashSet::new(),
        }
    }

    pub fn reference(&self) -> String {
        self.reference.iter().collect()
    }

    pub fn reference_len(&self) -> usize {
        self.reference.len()
    }

    pub fn typed(&self) -> String {
        self.typed.iter().collect()
    }

    pub fn typed_len(&self) -> usize {
        self.typed.len()
    }

    /// Index of the next expected character.
    pub fn cursor_pos(&self) -> usize {
        self.typed.len()
    }

    pub fn started_at(&self) -> Option<SystemTime> {
        self.started_at
    }

    pub fn has_started(&self) -> bool {
        self.started_at.is_some()
    }

    pub fn is_finished(&self) -> bool {
        !self.reference.is_empty() && self.typed.len() == self.reference.len()
    }

    /// Replace the typed buffer with `candidate`. Returns false (and
    /// changes nothing) when the candidate is longer than the
    /// reference. The session clock starts on the first accepted
    /// non-empty input and only an explicit [`reset`] stops it.
    ///
    /// [`reset`]: TypingSession::reset
    pub fn apply_input(&mut self, candidate: &str, now: SystemTime) -> bool {
        let chars: Vec<char> = candidate.chars().collect();
        if chars.len() > self.reference.len() {
            return false;
        }

        if self.started_at.is_none() && !chars.is_empty() {
            self.started_at = Some(now);
        }

        for (i, c) in chars.iter().enumerate() {
            if *c != self.reference[i] {
                self.error_positions.insert(i);
            }
        }
        self.typed = chars;
        true
    }

    pub fn classify(&self, index: usize) -> CharState {
        if index < self.typed.len() {
            // direct comparison; the ever-wrong set only feeds the
            // error count, never the paint colour
            if self.typed[index] == self.reference[index] {
                CharState::Correct
            } else {
                CharState::Incorrect
            }
        } else if index == self.typed.len() {
            CharState::Cursor
        } else {
            CharState::Pending
        }
    }

    /// Character the user typed at `index`, if any.
    pub fn typed_char(&self, index: usize) -> Option<char> {
        self.typed.get(index).copied()
    }

    pub fn stats(&self, now: SystemTime) -> TypingStats {
        if self.typed.is_empty() {
            return TypingStats {
                errors: self.error_positions.len(),
                ..TypingStats::empty()
            };
        }

        let total_chars = self.typed.len();
        let correct_chars = self
            .typed
            .iter()
            .zip(&self.reference)
            .filter(|(t, r)| t == r)
            .count();

        let accuracy = 100.0 * correct_chars as f64 / total_chars as f64;

        let wpm = match self.started_at {
            Some(start) => {
                let minutes = now
                    .duration_since(start)
                    .map_or(0.0, |d| d.as_secs_f64() / 60.0);
                if minutes > 0.0 {
                    ((correct_chars as f64 / 5.0) / minutes).round() as u64
                } else {
                    0
                }
            }
            None => 0,
        };

        TypingStats {
            wpm,
            accuracy,
            errors: self.error_positions.len(),
            correct_chars,
            total_chars,
        }
    }

    /// Back to a fresh session over the same reference.
    pub fn reset(&mut self) {
        self.typed.clear();
        self.error_positions.clear();
        self.started_at = None;
    }

    /// Append the finished session to the result log under the
    /// project config dir.
    pub fn save_results(&self, now: SystemTime) -> io::Result<()> {
        if let Some(proj_dirs) = ProjectDirs::from("", "", "lexio") {
            let config_dir = proj_dirs.config_dir();
            let log_path = config_dir.join("log.csv");

            std::fs::create_dir_all(config_dir)?;

            let needs_header = !log_path.exists();

            let mut log_file = OpenOptions::new().append(true).create(true).open(log_path)?;

            if needs_header {
                writeln!(log_file, "date,chars,elapsed_secs,wpm,accuracy,errors")?;
            }

            let elapsed_secs = self
                .started_at
                .and_then(|start| now.duration_since(start).ok())
                .map_or(0.0, |d| d.as_secs_f64());
            let stats = self.stats(now);

            writeln!(
                log_file,
                "{},{},{:.2},{},{:.1},{}",
                Local::now().format("%c"),
                stats.total_chars,
                elapsed_secs,
                stats.wpm,
                stats.accuracy,
                stats.errors,
            )?;
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn minute_ago() -> SystemTime {
        SystemTime::now() - Duration::from_secs(60)
    }

    #[test]
    fn new_session_is_pristine() {
        let session = TypingSession::new("hello world");
        assert_eq!(session.reference(), "hello world");
        assert_eq!(session.typed_len(), 0);
        assert_eq!(session.cursor_pos(), 0);
        assert!(!session.has_started());
        assert!(!session.is_finished());
    }

    #[test]
    fn classification_follows_direct_comparison() {
        let mut session = TypingSession::new("cat");
        assert!(session.apply_input("cb", SystemTime::now()));

        assert_eq!(session.classify(0), CharState::Correct);
        assert_eq!(session.classify(1), CharState::Incorrect);
        assert_eq!(session.classify(2), CharState::Cursor);
    }

    #[test]
    fn untyped_tail_is_pending() {
        let mut session = TypingSession::new("catnip");
        session.apply_input("c", SystemTime::now());
        assert_eq!(session.classify(1), CharState::Cursor);
        assert_eq!(session.classify(2), CharState::Pending);
        assert_eq!(session.classify(5), CharState::Pending);
    }

    #[test]
    fn errors_accumulate_across_corrections() {
        let now = SystemTime::now();
        let mut session = TypingSession::new("cat");

        session.apply_input("x", now);
        assert_eq!(session.stats(now).errors, 1);

        // backspace and fix it
        session.apply_input("", now);
        session.apply_input("cat", now);

        // paint is green again but the mistake still counts
        assert_eq!(session.classify(0), CharState::Correct);
        assert_eq!(session.stats(now).errors, 1);
    }

    #[test]
    fn repeated_mistakes_at_one_position_count_once() {
        let now = SystemTime::now();
        let mut session = TypingSession::new("cat");
        session.apply_input("x", now);
        session.apply_input("", now);
        session.apply_input("y", now);
        assert_eq!(session.stats(now).errors, 1);
    }

    #[test]
    fn over_length_input_is_rejected_not_truncated() {
        let now = SystemTime::now();
        let mut session = TypingSession::new("abcde");
        assert!(session.apply_input("abcde", now));
        assert!(!session.apply_input("abcdef", now));
        assert_eq!(session.typed(), "abcde");
    }

    #[test]
    fn clock_starts_on_first_character_only() {
        let now = SystemTime::now();
        let mut session = TypingSession::new("hi");

        assert!(session.apply_input("", now));
        assert!(!session.has_started());

        session.apply_input("h", now);
        let started = session.started_at();
        assert!(started.is_some());

        // backspacing to empty does not restart the clock
        session.apply_input("", now + Duration::from_secs(5));
        session.apply_input("h", now + Duration::from_secs(9));
        assert_eq!(session.started_at(), started);
    }

    #[test]
    fn wpm_is_zero_without_a_started_clock_or_typed_text() {
        let session = TypingSession::new("some reference");
        assert_eq!(session.stats(SystemTime::now()).wpm, 0);

        let mut session = TypingSession::new("some reference");
        session.apply_input("s", SystemTime::now());
        session.apply_input("", SystemTime::now());
        assert_eq!(session.stats(SystemTime::now()).wpm, 0);
    }

    #[test]
    fn wpm_counts_correct_chars_in_five_char_words() {
        let mut session = TypingSession::new("hello");
        let start = minute_ago();
        session.apply_input("hello", start);
        // 5 correct chars in one minute = 1 wpm
        assert_eq!(session.stats(SystemTime::now()).wpm, 1);
    }

    #[test]
    fn incorrect_chars_do_not_earn_wpm() {
        let mut session = TypingSession::new("aaaaaaaaaa");
        session.apply_input("aaaaabbbbb", minute_ago());
        let stats = session.stats(SystemTime::now());
        assert_eq!(stats.correct_chars, 5);
        assert_eq!(stats.wpm, 1);
    }

    #[test]
    fn accuracy_reflects_the_current_comparison() {
        let now = SystemTime::now();
        let mut session = TypingSession::new("test");
        session.apply_input("txst", now);
        assert_eq!(session.stats(now).accuracy, 75.0);

        session.apply_input("te", now);
        session.apply_input("test", now);
        let stats = session.stats(now);
        assert_eq!(stats.accuracy, 100.0);
        assert_eq!(stats.errors, 1);
    }

    #[test]
    fn empty_session_reports_degenerate_stats() {
        let session = TypingSession::new("");
        let stats = session.stats(SystemTime::now());
        assert_eq!(stats.wpm, 0);
        assert_eq!(stats.accuracy, 100.0);
        assert_eq!(stats.errors, 0);
        assert_eq!(stats.total_chars, 0);
        assert!(!session.is_finished());
    }

    #[test]
    fn reset_restores_the_initial_state() {
        let now = SystemTime::now();
        let mut session = TypingSession::new("cat");
        session.apply_input("xa", now);
        session.reset();

        assert_eq!(session.typed(), "");
        assert!(!session.has_started());
        let stats = session.stats(now);
        assert_eq!(stats.errors, 0);
        assert_eq!(stats.wpm, 0);
        assert_eq!(stats.accuracy, 100.0);
    }

    #[test]
    fn finishing_requires_the_full_reference() {
        let now = SystemTime::now();
        let mut session = TypingSession::new("hi");
        session.apply_input("h", now);
        assert!(!session.is_finished());
        session.apply_input("hi", now);
        assert!(session.is_finished());
    }

    #[test]
    fn multibyte_references_are_scored_by_char() {
        let now = SystemTime::now();
        let mut session = TypingSession::new("naïve");
        session.apply_input("naïve", now);
        assert!(session.is_finished());
        assert_eq!(session.stats(now).accuracy, 100.0);
    }
}
