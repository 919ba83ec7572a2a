use std::time::SystemTime;

use clap::ValueEnum;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::config::{clamp_wpm, ReadingSettings, TypingSettings, WPM_STEP};
use crate::normalizer::{normalize, NormalizeOptions};
use crate::pacing::{base_delay_ms, segment};
use crate::playback::{Clock, Playback, PlaybackState, SystemClock};
use crate::typing::TypingSession;

#[derive(Debug, Copy, Clone, PartialEq, Eq, ValueEnum, strum_macros::Display)]
pub enum Mode {
    /// RSVP word stream
    Read,
    /// Character-by-character typing practice
    Type,
}

/// Whole-program state: one loaded text, two engines over it.
pub struct App {
    pub mode: Mode,
    pub reading: ReadingSettings,
    pub typing_prefs: TypingSettings,
    pub playback: Playback,
    pub session: TypingSession,
    raw_text: String,
    typed: String,
    clock: Box<dyn Clock>,
    session_logged: bool,
}

impl App {
    pub fn new(
        raw_text: String,
        mode: Mode,
        reading: ReadingSettings,
        typing_prefs: TypingSettings,
    ) -> Self {
        let mut app = Self {
            mode,
            reading,
            typing_prefs,
            playback: Playback::new(vec![]),
            session: TypingSession::new(""),
            raw_text: String::new(),
            typed: String::new(),
            clock: Box::new(SystemClock),
            session_logged: false,
        };
        app.load_text(raw_text);
        app
    }

    #[cfg(test)]
    fn with_clock(mut self, clock: Box<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// Swap in a new source text. Both engines restart from scratch.
    pub fn load_text(&mut self, raw_text: String) {
        self.raw_text = raw_text;
        self.rebuild_playback();
        self.rebuild_session();
    }

    pub fn raw_text(&self) -> &str {
        &self.raw_text
    }

    pub fn typed(&self) -> &str {
        &self.typed
    }

    /// The word stream always reads against newline-flattened text,
    /// untouched by typing-mode stripping.
    fn read_text(&self) -> String {
        normalize(&self.raw_text, NormalizeOptions::default())
    }

    fn rebuild_playback(&mut self) {
        let words = segment(
            &self.read_text(),
            base_delay_ms(self.reading.wpm),
            self.reading.use_punctuation,
        );
        self.playback.replace_words(words);
    }

    /// Typing always starts over when the reference text changes.
    fn rebuild_session(&mut self) {
        let opts = NormalizeOptions::from_typing_prefs(
            self.typing_prefs.include_periods,
            self.typing_prefs.include_punctuation,
            self.typing_prefs.include_capitalization,
        );
        self.session = TypingSession::new(&normalize(&self.raw_text, opts));
        self.typed.clear();
        self.session_logged = false;
    }

    pub fn set_wpm(&mut self, wpm: u32) {
        let wpm = clamp_wpm(wpm);
        if wpm != self.reading.wpm {
            self.reading.wpm = wpm;
            self.playback
                .reapply_pacing(base_delay_ms(wpm), self.reading.use_punctuation);
        }
    }

    pub fn toggle_punctuation_pacing(&mut self) {
        self.reading.use_punctuation = !self.reading.use_punctuation;
        self.playback.reapply_pacing(
            base_delay_ms(self.reading.wpm),
            self.reading.use_punctuation,
        );
    }

    pub fn set_typing_prefs(&mut self, prefs: TypingSettings) {
        if prefs != self.typing_prefs {
            self.typing_prefs = prefs;
            self.rebuild_session();
        }
    }

    /// One typed character. Rejected silently past the end of the
    /// reference.
    pub fn type_char(&mut self, c: char) {
        let mut candidate = self.typed.clone();
        candidate.push(c);
        if self.session.apply_input(&candidate, SystemTime::now()) {
            self.typed = candidate;
        }
    }

    pub fn backspace(&mut self) {
        if self.typed.pop().is_some() {
            let candidate = self.typed.clone();
            self.session.apply_input(&candidate, SystemTime::now());
        }
    }

    pub fn restart_typing(&mut self) {
        self.typed.clear();
        self.session.reset();
        self.session_logged = false;
    }

    pub fn switch_mode(&mut self) {
        self.playback.stop();
        self.playback.end_rewind();
        self.mode = match self.mode {
            Mode::Read => Mode::Type,
            Mode::Type => Mode::Read,
        };
    }

    /// Anything time-driven: playback deadlines, rewind cadence, and
    /// the one-shot result log when a typing run completes.
    pub fn on_tick(&mut self) {
        let now = self.clock.now();
        self.playback.on_tick(now);

        if self.mode == Mode::Type && self.session.is_finished() && !self.session_logged {
            self.session_logged = true;
            let _ = self.session.save_results(SystemTime::now());
        }
    }

    /// Whether the screen needs repainting between input events.
    pub fn is_animating(&self) -> bool {
        self.playback.state() == PlaybackState::Playing || self.playback.is_rewinding()
    }

    pub fn handle_key(&mut self, key: KeyEvent) {
        match self.mode {
            Mode::Read => self.handle_read_key(key),
            Mode::Type => self.handle_type_key(key),
        }
    }

    fn handle_read_key(&mut self, key: KeyEvent) {
        let now = self.clock.now();
        match key.code {
            KeyCode::Char(' ') => {
                if self.playback.state() == PlaybackState::Playing {
                    self.playback.stop();
                } else {
                    self.playback.start(now);
                }
            }
            KeyCode::Left => self.playback.step_back(),
            KeyCode::Right => self.playback.step_forward(),
            KeyCode::Char('r') => self.playback.restart(),
            KeyCode::Char('b') => {
                if self.playback.is_rewinding() {
                    self.playback.end_rewind();
                } else {
                    self.playback.begin_rewind(now);
                }
            }
            KeyCode::Char('p') => self.toggle_punctuation_pacing(),
            KeyCode::Char('o') => self.reading.show_orp = !self.reading.show_orp,
            KeyCode::Char('g') => self.reading.show_progress = !self.reading.show_progress,
            KeyCode::Char('+') | KeyCode::Char('=') => {
                self.set_wpm(self.reading.wpm.saturating_add(WPM_STEP))
            }
            KeyCode::Char('-') => self.set_wpm(self.reading.wpm.saturating_sub(WPM_STEP)),
            _ => {}
        }
    }

    fn handle_type_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Backspace => self.backspace(),
            KeyCode::Left => self.restart_typing(),
            KeyCode::Char(c) => {
                if key.modifiers.contains(KeyModifiers::CONTROL) {
                    return;
                }
                self.type_char(c);
            }
            _ => {}
        }
    }
}
