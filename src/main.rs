use clap::{error::ErrorKind, CommandFactory, Parser};
use crossterm::{
    event::{KeyCode, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
    tty::IsTty,
};
use ratatui::{backend::CrosstermBackend, Terminal};
use std::{
    error::Error,
    io::{self, stdin},
    path::PathBuf,
};

use lexio::{
    app::{App, Mode},
    config::{clamp_wpm, FileSettingsStore, SettingsStore},
    runtime::{AppEvent, CrosstermEventSource, Runner},
    samples,
    source::{is_valid_source, read_text_file},
};

/// terminal reading trainer with RSVP pacing and live typing feedback
#[derive(Parser, Debug, Clone)]
#[clap(
    version,
    about,
    long_about = "Load a text and either flash it one word at a time at a controllable pace (with optimal-recognition-point highlighting), or type it out with live per-character feedback and WPM/accuracy stats."
)]
struct Cli {
    /// text file to load
    file: Option<PathBuf>,

    /// text to load, passed directly on the command line
    #[clap(short = 'p', long)]
    paste: Option<String>,

    /// bundled sample text to load (see --list-samples)
    #[clap(long)]
    sample: Option<usize>,

    /// list the bundled sample texts and exit
    #[clap(long)]
    list_samples: bool,

    /// starting mode
    #[clap(short, long, value_enum, default_value_t = Mode::Read)]
    mode: Mode,

    /// reading speed in words per minute (clamped to 100..=1000)
    #[clap(long)]
    wpm: Option<u32>,

    /// strip punctuation from the typing reference
    #[clap(long)]
    no_punctuation: bool,

    /// strip periods from the typing reference
    #[clap(long)]
    no_periods: bool,

    /// lowercase the typing reference
    #[clap(long)]
    no_caps: bool,
}

fn resolve_text(cli: &Cli) -> Result<String, String> {
    if let Some(text) = &cli.paste {
        return if is_valid_source(text) {
            Ok(text.clone())
        } else {
            Err("pasted text is empty".to_string())
        };
    }
    if let Some(path) = &cli.file {
        return read_text_file(path).map_err(|e| e.to_string());
    }
    if let Some(index) = cli.sample {
        return samples::sample_by_index(index)
            .map(|s| s.text.to_string())
            .ok_or_else(|| format!("no sample {index}; try --list-samples"));
    }
    Ok(samples::WELCOME_TEXT.to_string())
}

fn main() -> Result<(), Box<dyn Error>> {
    let cli = Cli::parse();

    if cli.list_samples {
        for (i, sample) in samples::SAMPLE_TEXTS.iter().enumerate() {
            println!("{i}: {}", sample.title);
        }
        return Ok(());
    }

    let text = match resolve_text(&cli) {
        Ok(text) => text,
        Err(msg) => Cli::command().error(ErrorKind::Io, msg).exit(),
    };

    if !stdin().is_tty() {
        let mut cmd = Cli::command();
        cmd.error(ErrorKind::Io, "stdin must be a tty").exit();
    }

    let store = FileSettingsStore::new();
    let mut reading = store.load_reading();
    if let Some(wpm) = cli.wpm {
        reading.wpm = clamp_wpm(wpm);
    }
    let mut typing_prefs = store.load_typing();
    if cli.no_punctuation {
        typing_prefs.include_punctuation = false;
    }
    if cli.no_periods {
        typing_prefs.include_periods = false;
    }
    if cli.no_caps {
        typing_prefs.include_capitalization = false;
    }

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let mut app = App::new(text, cli.mode, reading, typing_prefs);
    let result = run(&mut terminal, &mut app);

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    let _ = store.save_reading(&app.reading);
    let _ = store.save_typing(&app.typing_prefs);

    result
}

fn run(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
) -> Result<(), Box<dyn Error>> {
    let runner = Runner::new(CrosstermEventSource::new());

    terminal.draw(|f| f.render_widget(&*app, f.area()))?;

    loop {
        match runner.step() {
            AppEvent::Tick => {
                app.on_tick();
                // repaint only while something on screen moves
                if app.is_animating() || (app.session.has_started() && !app.session.is_finished())
                {
                    terminal.draw(|f| f.render_widget(&*app, f.area()))?;
                }
            }
            AppEvent::Resize => {
                terminal.draw(|f| f.render_widget(&*app, f.area()))?;
            }
            AppEvent::Key(key) => {
                match key.code {
                    KeyCode::Esc => break,
                    KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => break,
                    KeyCode::Tab => app.switch_mode(),
                    _ => app.handle_key(key),
                }
                terminal.draw(|f| f.render_widget(&*app, f.area()))?;
            }
        }
    }

    Ok(())
}
