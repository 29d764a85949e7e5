//! earwig - A terminal ear trainer for musical intervals.
//!
//! Plays a two-note interval through a SoundFont and asks which interval
//! it was, tracking accuracy over a session.
//!
//! # Usage
//!
//! ```bash
//! earwig -f piano.sf2                       # m2 vs M2, 20 rounds
//! earwig -f piano.sf2 --level 3             # built-in level preset
//! earwig -f piano.sf2 -i m3,M3,P5 --descending
//! ```
//!
//! Press `?` during a session for keyboard shortcuts.

use earwig::app::{App, AppAction};
use earwig::audio::AudioEngine;
use earwig::config::{self, Overrides, Settings};
use earwig::theory::IntervalCode;
use earwig::trainer;
use earwig::ui;

use anyhow::{Context, Result};
use clap::Parser;
use crossterm::event::{self, Event, KeyEventKind};
use crossterm::execute;
use crossterm::terminal::{
    disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen,
};
use rand::rngs::StdRng;
use rand::SeedableRng;
use ratatui::backend::CrosstermBackend;
use ratatui::Terminal;
use std::io::{self, Stdout};
use std::path::PathBuf;
use std::time::Duration;
use tracing::info;

/// Command-line arguments.
#[derive(Parser, Debug)]
#[command(name = "earwig")]
#[command(about = "Interval ear trainer for the terminal")]
#[command(version)]
#[command(after_help = "Interval codes: P1 d2 m2 A1 M2 d3 m3 A2 M3 d4 P4 A3 d5 A4 P5 d6 m6 A5 M6 d7 m7 A6 M7 d8 P8 A7")]
struct Args {
    /// SoundFont (.sf2) used for playback
    #[arg(
        short = 'f',
        long,
        env = "EARWIG_SOUNDFONT",
        required_unless_present = "list_intervals"
    )]
    soundfont: Option<PathBuf>,

    /// Audio driver to use [default: alsa]
    #[arg(short = 'd', long)]
    audio_driver: Option<String>,

    /// How many rounds in a row [default: 20]
    #[arg(short, long)]
    rounds: Option<u32>,

    /// Interval codes separated by commas [default: m2,M2]
    #[arg(short, long)]
    intervals: Option<String>,

    /// Built-in level number or path to a YAML/JSON level file
    #[arg(short, long)]
    level: Option<String>,

    /// Allow ascending intervals [default: true]
    #[arg(long, num_args = 0..=1, default_missing_value = "true", require_equals = true)]
    ascending: Option<bool>,

    /// Allow descending intervals [default: false]
    #[arg(long, num_args = 0..=1, default_missing_value = "true", require_equals = true)]
    descending: Option<bool>,

    /// Allow melodic intervals (one note after the other) [default: true]
    #[arg(long, num_args = 0..=1, default_missing_value = "true", require_equals = true)]
    melodic: Option<bool>,

    /// Allow harmonic intervals (both notes together) [default: false]
    #[arg(long, num_args = 0..=1, default_missing_value = "true", require_equals = true)]
    harmonic: Option<bool>,

    /// Playback tempo in beats per minute [default: 80]
    #[arg(long)]
    tempo: Option<u32>,

    /// General MIDI program for the notes [default: 0]
    #[arg(long, value_parser = clap::value_parser!(u8).range(0..=127))]
    program: Option<u8>,

    /// Random seed, for a reproducible session
    #[arg(long)]
    seed: Option<u64>,

    /// Print every interval code with its name and exit
    #[arg(long)]
    list_intervals: bool,
}

impl From<Args> for Overrides {
    fn from(args: Args) -> Self {
        Self {
            soundfont: args.soundfont,
            audio_driver: args.audio_driver,
            level: args.level,
            intervals: args.intervals,
            rounds: args.rounds,
            ascending: args.ascending,
            descending: args.descending,
            melodic: args.melodic,
            harmonic: args.harmonic,
            tempo: args.tempo,
            program: args.program,
            seed: args.seed,
        }
    }
}

fn print_intervals() {
    for code in IntervalCode::all() {
        println!(
            "{:<4}{:>3} semitones  {}",
            code.as_str(),
            code.semitones(),
            code.display_name()
        );
    }
    println!();
    println!("Built-in levels: 0-{}", config::builtin_level_count() - 1);
}

/// Main entry point.
fn main() -> Result<()> {
    let args = Args::parse();

    // Logging goes to stderr and stays silent unless RUST_LOG is set
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    if args.list_intervals {
        print_intervals();
        return Ok(());
    }

    // All configuration errors surface before the terminal is touched
    let overrides = Overrides::from(args);
    let settings = Settings::load(&overrides).context("Invalid configuration")?;

    let rounds = match settings.seed {
        Some(seed) => trainer::generate_with_seed(&settings.session, seed),
        None => trainer::generate(&settings.session, &mut StdRng::from_entropy()),
    }
    .context("Failed to generate interval sequence")?;

    let engine = AudioEngine::new(&settings.soundfont, &settings.audio_driver)
        .context("Failed to initialize audio")?;
    engine.set_instrument(settings.program);

    info!(
        rounds = rounds.len(),
        intervals = settings.session.interval_codes().len(),
        "Starting session"
    );

    let mut app = App::new(settings, rounds);
    let mut terminal = setup_terminal().context("Failed to setup terminal")?;

    let result = run_app(&mut terminal, &mut app, &engine);

    restore_terminal(&mut terminal).context("Failed to restore terminal")?;
    // Dropping the engine silences any ringing notes
    drop(engine);

    result?;

    if app.session().answered() > 0 {
        println!("your accuracy is {}", app.session().accuracy_label());
    }
    Ok(())
}

/// Sets up the terminal for TUI rendering.
fn setup_terminal() -> Result<Terminal<CrosstermBackend<Stdout>>> {
    enable_raw_mode().context("Failed to enable raw mode")?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen).context("Failed to enter alternate screen")?;
    let backend = CrosstermBackend::new(stdout);
    let terminal = Terminal::new(backend).context("Failed to create terminal")?;
    Ok(terminal)
}

/// Restores the terminal to its original state.
fn restore_terminal(terminal: &mut Terminal<CrosstermBackend<Stdout>>) -> Result<()> {
    disable_raw_mode().context("Failed to disable raw mode")?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)
        .context("Failed to leave alternate screen")?;
    terminal.show_cursor().context("Failed to show cursor")?;
    Ok(())
}

/// Discards key presses queued while audio was playing.
fn drain_pending_events() -> Result<()> {
    while event::poll(Duration::ZERO)? {
        event::read()?;
    }
    Ok(())
}

/// Main application loop.
fn run_app(
    terminal: &mut Terminal<CrosstermBackend<Stdout>>,
    app: &mut App,
    engine: &AudioEngine,
) -> Result<()> {
    loop {
        terminal.draw(|frame| ui::render(frame, app))?;

        if !event::poll(Duration::from_millis(100))? {
            continue;
        }

        let Event::Key(key) = event::read()? else {
            continue;
        };
        // Only handle key press events (not release)
        if key.kind != KeyEventKind::Press {
            continue;
        }

        match app.handle_key(key.code, key.modifiers) {
            AppAction::None => {}
            AppAction::Quit => return Ok(()),
            AppAction::Play(index) => {
                // Show the listening screen before blocking on playback
                terminal.draw(|frame| ui::render(frame, app))?;

                let round = &app.rounds()[index];
                let option = round.correct_option();
                engine.play_interval(option.pitch_pair, round.style, app.settings().tempo);

                drain_pending_events()?;
                app.playback_finished();
            }
        }
    }
}
