use std::time::{Duration, Instant};

use crate::pacing::{self, TimedWord};

/// Cadence of the continuous rewind while it is held.
pub const REWIND_INTERVAL_MS: u64 = 100;

/// Source of monotonic time, injected so the state machine owns
/// deadlines rather than timers. Production uses [`SystemClock`];
/// tests drive a fake.
pub trait Clock {
    fn now(&self) -> Instant;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Instant {
        Instant::now()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlaybackState {
    Idle,
    Playing,
    Paused,
    Finished,
}

/// Pausable cursor over a timed word sequence.
///
/// Advancing is deadline-driven: while playing, `word_due` holds the
/// instant the current word expires, and the owning event loop calls
/// [`Playback::on_tick`] often enough (the 50ms app tick) to observe
/// it. Clearing `word_due` on stop is what cancels the pending
/// advance; a stale tick after a pause can therefore never move the
/// cursor.
#[derive(Debug)]
pub struct Playback {
    words: Vec<TimedWord>,
    index: usize,
    state: PlaybackState,
    word_shown_at: Option<Instant>,
    word_due: Option<Instant>,
    rewind_due: Option<Instant>,
}

impl Playback {
    pub fn new(words: Vec<TimedWord>) -> Self {
        Self {
            words,
            index: 0,
            state: PlaybackState::Idle,
            word_shown_at: None,
            word_due: None,
            rewind_due: None,
        }
    }

    pub fn state(&self) -> PlaybackState {
        self.state
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    pub fn words(&self) -> &[TimedWord] {
        &self.words
    }

    /// Text of the word under the cursor, empty when there is none.
    pub fn current_word(&self) -> &str {
        self.words.get(self.index).map_or("", |w| w.text.as_str())
    }

    /// Begin (or resume) playback. No-op once finished or when there
    /// is nothing left to show. Holding rewind and playing are
    /// mutually exclusive; starting wins.
    pub fn start(&mut self, now: Instant) {
        if self.state == PlaybackState::Finished
            || self.state == PlaybackState::Playing
            || self.index >= self.words.len()
        {
            return;
        }
        // resuming on the very last word would only re-show it; the
        // sequence is effectively over
        if self.state == PlaybackState::Paused && self.index + 1 >= self.words.len() {
            return;
        }
        self.rewind_due = None;
        self.state = PlaybackState::Playing;
        self.arm(now);
    }

    /// Pause. The cursor stays put and the pending advance is
    /// cancelled.
    pub fn stop(&mut self) {
        if self.state == PlaybackState::Playing {
            self.state = PlaybackState::Paused;
        }
        self.word_shown_at = None;
        self.word_due = None;
    }

    /// Back to the first word, idle.
    pub fn restart(&mut self) {
        self.index = 0;
        self.state = PlaybackState::Idle;
        self.word_shown_at = None;
        self.word_due = None;
        self.rewind_due = None;
    }

    /// Single-word skip. Refused while playing.
    pub fn step_forward(&mut self) {
        if self.state == PlaybackState::Playing || self.words.is_empty() {
            return;
        }
        self.index = (self.index + 1).min(self.words.len() - 1);
    }

    pub fn step_back(&mut self) {
        if self.state == PlaybackState::Playing {
            return;
        }
        if self.index > 0 {
            self.index -= 1;
            self.unfinish();
        }
    }

    /// Begin continuous rewind: one word immediately, then one per
    /// [`REWIND_INTERVAL_MS`] until released or the cursor hits 0.
    pub fn begin_rewind(&mut self, now: Instant) {
        self.stop();
        if self.index > 0 {
            self.index -= 1;
            self.unfinish();
        }
        // nothing left to rewind through once the cursor is at 0
        self.rewind_due = if self.index > 0 {
            Some(now + Duration::from_millis(REWIND_INTERVAL_MS))
        } else {
            None
        };
    }

    pub fn end_rewind(&mut self) {
        self.rewind_due = None;
    }

    pub fn is_rewinding(&self) -> bool {
        self.rewind_due.is_some()
    }

    /// Swap in a new sequence (new text, or re-segmentation after a
    /// pacing change). The cursor always resets.
    pub fn replace_words(&mut self, words: Vec<TimedWord>) {
        self.words = words;
        self.restart();
    }

    /// Re-apply pacing to the existing tokens. Boundaries never move;
    /// only delays (and cursor position, which resets) change.
    pub fn reapply_pacing(&mut self, base_delay_ms: f64, punctuation_pacing: bool) {
        let text = pacing::rejoin(&self.words);
        self.replace_words(pacing::segment(&text, base_delay_ms, punctuation_pacing));
    }

    /// Observe elapsed deadlines. Drives both the word advance and the
    /// held rewind; harmless to call in any state.
    pub fn on_tick(&mut self, now: Instant) {
        while self.state == PlaybackState::Playing {
            let due = match self.word_due {
                Some(due) if due <= now => due,
                _ => break,
            };
            if self.index + 1 >= self.words.len() {
                self.state = PlaybackState::Finished;
                self.word_shown_at = None;
                self.word_due = None;
            } else {
                self.index += 1;
                // re-arm from the deadline, not from `now`, so slow
                // ticks do not stretch the word cadence
                self.word_shown_at = Some(due);
                self.word_due =
                    Some(due + Duration::from_millis(self.words[self.index].delay_ms));
            }
        }

        while let Some(due) = self.rewind_due {
            if due > now {
                break;
            }
            if self.index > 0 {
                self.index -= 1;
                self.unfinish();
            }
            self.rewind_due = if self.index > 0 {
                Some(due + Duration::from_millis(REWIND_INTERVAL_MS))
            } else {
                None
            };
        }
    }

    /// Time already spent in the sequence. While paused the current
    /// word counts in full, reflecting "word just shown"; while
    /// playing the current word counts partially by wall time.
    pub fn elapsed_ms(&self, now: Instant) -> u64 {
        let before = pacing::elapsed_before_ms(&self.words, self.index);
        match self.state {
            PlaybackState::Idle => {
                if self.index == 0 {
                    0
                } else {
                    before + self.current_delay_ms()
                }
            }
            PlaybackState::Paused | PlaybackState::Finished => before + self.current_delay_ms(),
            PlaybackState::Playing => {
                let into_word = self
                    .word_shown_at
                    .map_or(0, |shown| now.duration_since(shown).as_millis() as u64);
                before + into_word.min(self.current_delay_ms())
            }
        }
    }

    pub fn total_ms(&self) -> u64 {
        pacing::total_ms(&self.words)
    }

    /// Progress through the sequence as a percentage, capped at 100.
    pub fn progress_percent(&self, now: Instant) -> f64 {
        let total = self.total_ms();
        if total == 0 {
            return 0.0;
        }
        (100.0 * self.elapsed_ms(now) as f64 / total as f64).min(100.0)
    }

    fn current_delay_ms(&self) -> u64 {
        self.words.get(self.index).map_or(0, |w| w.delay_ms)
    }

    fn arm(&mut self, now: Instant) {
        self.word_shown_at = Some(now);
        self.word_due = Some(now + Duration::from_millis(self.current_delay_ms()));
    }

    // Stepping away from the last word makes the sequence resumable
    // again.
    fn unfinish(&mut self) {
        if self.state == PlaybackState::Finished {
            self.state = PlaybackState::Paused;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pacing::segment;
    use std::time::Duration;

    fn uniform(n: usize, delay: u64) -> Vec<TimedWord> {
        (0..n)
            .map(|i| TimedWord {
                text: format!("w{i}"),
                delay_ms: delay,
            })
            .collect()
    }

    fn at(base: Instant, ms: u64) -> Instant {
        base + Duration::from_millis(ms)
    }

    #[test]
    fn starts_idle_at_word_zero() {
        let p = Playback::new(uniform(3, 100));
        assert_eq!(p.state(), PlaybackState::Idle);
        assert_eq!(p.index(), 0);
        assert_eq!(p.current_word(), "w0");
    }

    #[test]
    fn playing_advances_when_word_delay_expires() {
        let base = Instant::now();
        let mut p = Playback::new(uniform(3, 100));
        p.start(base);
        assert_eq!(p.state(), PlaybackState::Playing);

        p.on_tick(at(base, 50));
        assert_eq!(p.index(), 0);

        p.on_tick(at(base, 100));
        assert_eq!(p.index(), 1);

        // a late tick catches up over several words
        p.on_tick(at(base, 250));
        assert_eq!(p.index(), 2);
    }

    #[test]
    fn last_word_expiry_finishes() {
        let base = Instant::now();
        let mut p = Playback::new(uniform(2, 100));
        p.start(base);
        p.on_tick(at(base, 100));
        assert_eq!(p.index(), 1);
        p.on_tick(at(base, 200));
        assert_eq!(p.state(), PlaybackState::Finished);
        assert_eq!(p.index(), 1);
    }

    #[test]
    fn stop_cancels_pending_advance() {
        let base = Instant::now();
        let mut p = Playback::new(uniform(3, 100));
        p.start(base);
        p.stop();
        assert_eq!(p.state(), PlaybackState::Paused);

        // a tick long past the old deadline must not move the cursor
        p.on_tick(at(base, 500));
        assert_eq!(p.index(), 0);
    }

    #[test]
    fn resume_continues_from_paused_index() {
        let base = Instant::now();
        let mut p = Playback::new(uniform(3, 100));
        p.start(base);
        p.on_tick(at(base, 100));
        p.stop();
        assert_eq!(p.index(), 1);

        p.start(at(base, 1000));
        p.on_tick(at(base, 1100));
        assert_eq!(p.index(), 2);
    }

    #[test]
    fn start_is_refused_once_finished() {
        let base = Instant::now();
        let mut p = Playback::new(uniform(1, 100));
        p.start(base);
        p.on_tick(at(base, 100));
        assert_eq!(p.state(), PlaybackState::Finished);

        p.start(at(base, 200));
        assert_eq!(p.state(), PlaybackState::Finished);
    }

    #[test]
    fn resume_is_refused_while_paused_on_the_last_word() {
        let base = Instant::now();
        let mut p = Playback::new(uniform(2, 100));
        p.start(base);
        p.on_tick(at(base, 100));
        p.stop();
        assert_eq!(p.index(), 1);

        p.start(at(base, 200));
        assert_eq!(p.state(), PlaybackState::Paused);
    }

    #[test]
    fn start_on_empty_sequence_is_a_no_op() {
        let mut p = Playback::new(vec![]);
        p.start(Instant::now());
        assert_eq!(p.state(), PlaybackState::Idle);
    }

    #[test]
    fn restart_rewinds_to_idle() {
        let base = Instant::now();
        let mut p = Playback::new(uniform(3, 100));
        p.start(base);
        p.on_tick(at(base, 100));
        p.restart();
        assert_eq!(p.state(), PlaybackState::Idle);
        assert_eq!(p.index(), 0);
        // no leftover deadline fires
        p.on_tick(at(base, 1000));
        assert_eq!(p.index(), 0);
    }

    #[test]
    fn steps_clamp_at_both_ends() {
        let mut p = Playback::new(uniform(2, 100));
        p.step_back();
        assert_eq!(p.index(), 0);
        p.step_forward();
        p.step_forward();
        p.step_forward();
        assert_eq!(p.index(), 1);
    }

    #[test]
    fn steps_are_refused_while_playing() {
        let base = Instant::now();
        let mut p = Playback::new(uniform(3, 100));
        p.start(base);
        p.step_forward();
        p.step_back();
        assert_eq!(p.index(), 0);
    }

    #[test]
    fn stepping_back_out_of_finished_allows_resume() {
        let base = Instant::now();
        let mut p = Playback::new(uniform(2, 100));
        p.start(base);
        p.on_tick(at(base, 200));
        assert_eq!(p.state(), PlaybackState::Finished);

        p.step_back();
        assert_eq!(p.state(), PlaybackState::Paused);
        p.start(at(base, 300));
        assert_eq!(p.state(), PlaybackState::Playing);
    }

    #[test]
    fn rewind_decrements_immediately_then_on_cadence() {
        let base = Instant::now();
        let mut p = Playback::new(uniform(5, 100));
        p.index = 4;
        p.begin_rewind(base);
        assert_eq!(p.index(), 3);

        p.on_tick(at(base, 99));
        assert_eq!(p.index(), 3);
        p.on_tick(at(base, 100));
        assert_eq!(p.index(), 2);
        p.on_tick(at(base, 300));
        assert_eq!(p.index(), 0);
        assert!(!p.is_rewinding());
    }

    #[test]
    fn rewind_release_stops_the_cadence() {
        let base = Instant::now();
        let mut p = Playback::new(uniform(5, 100));
        p.index = 4;
        p.begin_rewind(base);
        p.end_rewind();
        p.on_tick(at(base, 1000));
        assert_eq!(p.index(), 3);
    }

    #[test]
    fn rewind_and_playback_never_coexist() {
        let base = Instant::now();
        let mut p = Playback::new(uniform(5, 100));
        p.index = 3;
        p.start(base);
        p.begin_rewind(at(base, 10));
        assert_eq!(p.state(), PlaybackState::Paused);
        assert!(p.is_rewinding());

        // and starting again cancels the rewind
        p.start(at(base, 20));
        assert!(!p.is_rewinding());
        assert_eq!(p.state(), PlaybackState::Playing);
    }

    #[test]
    fn replace_words_resets_the_cursor() {
        let base = Instant::now();
        let mut p = Playback::new(uniform(3, 100));
        p.start(base);
        p.on_tick(at(base, 100));
        p.replace_words(uniform(2, 50));
        assert_eq!(p.index(), 0);
        assert_eq!(p.state(), PlaybackState::Idle);
        assert_eq!(p.len(), 2);
    }

    #[test]
    fn reapply_pacing_keeps_boundaries() {
        let mut p = Playback::new(segment("Hello, world.", 200.0, false));
        assert_eq!(p.words()[0].delay_ms, 200);
        p.reapply_pacing(200.0, true);
        assert_eq!(p.len(), 2);
        assert_eq!(p.words()[0].text, "Hello,");
        assert_eq!(p.words()[0].delay_ms, 300);
        assert_eq!(p.words()[1].delay_ms, 500);
        assert_eq!(p.index(), 0);
    }

    #[test]
    fn progress_counts_the_shown_word_while_paused() {
        let base = Instant::now();
        let mut p = Playback::new(uniform(4, 100));
        assert_eq!(p.progress_percent(base), 0.0);

        p.start(base);
        p.on_tick(at(base, 100));
        p.stop();
        // two words' worth of the 400ms total have been shown
        assert_eq!(p.elapsed_ms(at(base, 100)), 200);
        assert!((p.progress_percent(at(base, 100)) - 50.0).abs() < 1e-9);
    }

    #[test]
    fn progress_moves_with_wall_time_while_playing() {
        let base = Instant::now();
        let mut p = Playback::new(uniform(4, 100));
        p.start(base);
        assert_eq!(p.elapsed_ms(at(base, 50)), 50);
        p.on_tick(at(base, 100));
        assert_eq!(p.elapsed_ms(at(base, 150)), 150);
    }

    #[test]
    fn progress_caps_at_hundred() {
        let base = Instant::now();
        let mut p = Playback::new(uniform(2, 100));
        p.start(base);
        p.on_tick(at(base, 200));
        assert_eq!(p.state(), PlaybackState::Finished);
        assert!((p.progress_percent(at(base, 9999)) - 100.0).abs() < 1e-9);
    }

    #[test]
    fn empty_sequence_reports_zero_progress() {
        let p = Playback::new(vec![]);
        assert_eq!(p.progress_percent(Instant::now()), 0.0);
        assert_eq!(p.total_ms(), 0);
    }
}
