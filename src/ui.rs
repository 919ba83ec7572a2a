use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Gauge, Paragraph, Widget, Wrap},
};
use std::time::SystemTime;
use unicode_width::UnicodeWidthStr;

use crate::app::{App, Mode};
use crate::orp::orp_index;
use crate::playback::PlaybackState;
use crate::typing::CharState;

const HORIZONTAL_MARGIN: u16 = 5;

impl Widget for &App {
    fn render(self, area: Rect, buf: &mut Buffer) {
        match self.mode {
            Mode::Read => render_read(self, area, buf),
            Mode::Type => render_type(self, area, buf),
        }
    }
}

fn render_read(app: &App, area: Rect, buf: &mut Buffer) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .horizontal_margin(HORIZONTAL_MARGIN)
        .constraints(
            [
                Constraint::Min(0),
                Constraint::Length(1), // word
                Constraint::Length(1),
                Constraint::Length(1), // status / hint
                Constraint::Length(1), // progress text
                Constraint::Length(1), // progress gauge
                Constraint::Min(0),
            ]
            .as_ref(),
        )
        .split(area);

    let word = app.playback.current_word();
    let word_line = if app.reading.show_orp && !word.is_empty() {
        orp_line(word, chunks[1].width)
    } else {
        Line::from(Span::styled(
            word.to_string(),
            Style::default().add_modifier(Modifier::BOLD),
        ))
        .alignment(Alignment::Center)
    };
    Paragraph::new(word_line).render(chunks[1], buf);

    let status = match app.playback.state() {
        PlaybackState::Playing => String::new(),
        PlaybackState::Finished => "Finished!".to_string(),
        _ if app.playback.is_empty() => "No text loaded".to_string(),
        _ => format!(
            "space reads at {} wpm · arrows step · r restarts",
            app.reading.wpm
        ),
    };
    Paragraph::new(Span::styled(
        status,
        Style::default().add_modifier(Modifier::DIM | Modifier::ITALIC),
    ))
    .alignment(Alignment::Center)
    .render(chunks[3], buf);

    if app.reading.show_progress && !app.playback.is_empty() {
        let now = std::time::Instant::now();
        let percent = app.playback.progress_percent(now);
        let counter = format!(
            "{} / {} ({:.0}%)",
            app.playback.index() + 1,
            app.playback.len(),
            percent
        );
        Paragraph::new(Span::styled(counter, Style::default().add_modifier(Modifier::DIM)))
            .alignment(Alignment::Center)
            .render(chunks[4], buf);

        let gauge_area = centered_gauge_area(chunks[5]);
        Gauge::default()
            .gauge_style(Style::default().fg(Color::Magenta))
            .ratio((percent / 100.0).clamp(0.0, 1.0))
            .label("")
            .render(gauge_area, buf);
    }
}

/// The word line with its optimal recognition point highlighted and
/// pinned to the horizontal centre of the screen, so consecutive
/// words share a fixation point.
fn orp_line(word: &str, width: u16) -> Line<'static> {
    let orp = orp_index(word);
    let chars: Vec<char> = word.chars().collect();
    let prefix: String = chars[..orp].iter().collect();
    let focal: String = chars[orp..=orp].iter().collect();
    let suffix: String = chars[orp + 1..].iter().collect();

    let pad = (width as usize / 2).saturating_sub(prefix.width() + 1);

    let bold = Style::default().add_modifier(Modifier::BOLD);
    Line::from(vec![
        Span::raw(" ".repeat(pad)),
        Span::styled(prefix, bold.add_modifier(Modifier::DIM)),
        Span::styled(focal, bold.fg(Color::Red)),
        Span::styled(suffix, bold),
    ])
}

fn centered_gauge_area(area: Rect) -> Rect {
    let max = 48.min(area.width);
    Rect {
        x: area.x + (area.width - max) / 2,
        width: max,
        ..area
    }
}

fn render_type(app: &App, area: Rect, buf: &mut Buffer) {
    let bold = Style::default().add_modifier(Modifier::BOLD);
    let green_bold = bold.fg(Color::Green);
    let red_bold = bold.fg(Color::Red);
    let dim_bold = bold.add_modifier(Modifier::DIM);
    let underlined_dim_bold = dim_bold.add_modifier(Modifier::UNDERLINED);

    let reference = app.session.reference();
    let max_chars_per_line = area.width.saturating_sub(HORIZONTAL_MARGIN * 2).max(1);
    let mut prompt_occupied_lines =
        ((reference.width() as f64 / max_chars_per_line as f64).ceil() + 1.0) as u16;
    if reference.width() <= max_chars_per_line as usize {
        prompt_occupied_lines = 1;
    }

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .horizontal_margin(HORIZONTAL_MARGIN)
        .constraints(
            [
                Constraint::Length(
                    ((area.height.saturating_sub(prompt_occupied_lines)) / 2).saturating_sub(2),
                ),
                Constraint::Length(1), // counter
                Constraint::Length(1),
                Constraint::Length(prompt_occupied_lines),
                Constraint::Length(1),
                Constraint::Length(1), // stats
                Constraint::Min(0),
            ]
            .as_ref(),
        )
        .split(area);

    let counter = format!("{}/{}", app.session.typed_len(), app.session.reference_len());
    Paragraph::new(Span::styled(counter, Style::default().fg(Color::Magenta)))
        .alignment(Alignment::Center)
        .render(chunks[1], buf);

    let ref_chars: Vec<char> = reference.chars().collect();
    let spans: Vec<Span> = ref_chars
        .iter()
        .enumerate()
        .map(|(idx, &expected)| match app.session.classify(idx) {
            CharState::Correct => Span::styled(expected.to_string(), green_bold),
            CharState::Incorrect => Span::styled(
                match app.session.typed_char(idx) {
                    Some(' ') | None => "·".to_owned(),
                    Some(c) => c.to_string(),
                },
                red_bold,
            ),
            CharState::Cursor => Span::styled(expected.to_string(), underlined_dim_bold),
            CharState::Pending => Span::styled(expected.to_string(), dim_bold),
        })
        .collect();

    Paragraph::new(Line::from(spans))
        .alignment(if prompt_occupied_lines == 1 {
            Alignment::Center
        } else {
            Alignment::Left
        })
        .wrap(Wrap { trim: true })
        .render(chunks[3], buf);

    let stats = app.session.stats(SystemTime::now());
    let stats_line = if app.session.is_finished() {
        format!(
            "wpm {}   acc {:.0}%   errors {}",
            stats.wpm, stats.accuracy, stats.errors
        )
    } else if app.session.has_started() {
        format!("wpm {}   acc {:.0}%", stats.wpm, stats.accuracy)
    } else {
        "start typing · left arrow restarts".to_string()
    };
    Paragraph::new(Span::styled(
        stats_line,
        Style::default().add_modifier(Modifier::DIM | Modifier::ITALIC),
    ))
    .alignment(Alignment::Center)
    .render(chunks[5], buf);
}
