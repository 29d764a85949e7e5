//! Application state and event handling.
//!
//! This module defines the quiz state machine that sits between the
//! generated rounds, the audio engine, and the TUI. It never touches audio
//! itself: key handling returns an [`AppAction`] and the event loop decides
//! what to play.

use crate::config::Settings;
use crate::trainer::{Round, Session};
use crossterm::event::{KeyCode, KeyModifiers};
use tracing::{debug, info};

/// Answer keys in option order: 1-9, then a-q. `r` is kept free for replay.
///
/// Every interval code has a key, so a session over the full table stays answerable.
pub const ANSWER_KEYS: [char; 26] = [
    '1', '2', '3', '4', '5', '6', '7', '8', '9', 'a', 'b', 'c', 'd', 'e', 'f', 'g', 'h', 'i',
    'j', 'k', 'l', 'm', 'n', 'o', 'p', 'q',
];

/// Returns the key that selects the option at `position`.
pub fn answer_key(position: usize) -> Option<char> {
    ANSWER_KEYS.get(position).copied()
}

/// Maps a pressed key back to an option position, if it names one of `option_count` options.
pub fn answer_position(key: char, option_count: usize) -> Option<usize> {
    ANSWER_KEYS
        .iter()
        .take(option_count)
        .position(|&k| k == key.to_ascii_lowercase())
}

/// Footer label for the keys that answer `option_count` options, e.g. "1-2" or "1-9/a-c".
pub fn answer_key_range(option_count: usize) -> String {
    let last = option_count.min(ANSWER_KEYS.len());
    match last {
        0 => String::new(),
        1 => "1".to_string(),
        2..=9 => format!("1-{}", ANSWER_KEYS[last - 1]),
        10 => "1-9/a".to_string(),
        _ => format!("1-9/a-{}", ANSWER_KEYS[last - 1]),
    }
}

/// Where the quiz currently is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// Waiting for the user to start.
    Intro,
    /// The current round's interval is sounding.
    Listening,
    /// Waiting for an answer to the current round.
    Answering,
    /// Showing whether the answer was right.
    Feedback {
        /// Position the user chose.
        chosen: usize,
    },
    /// All rounds answered.
    Summary,
}

/// What the event loop should do after a key press.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppAction {
    /// Nothing to do beyond redrawing.
    None,
    /// Play the interval of the round at this index.
    Play(usize),
    /// Leave the application.
    Quit,
}

/// Main application state.
pub struct App {
    settings: Settings,
    rounds: Vec<Round>,
    /// Index of the round being played or answered.
    current: usize,
    phase: Phase,
    session: Session,
    /// Whether the help overlay is visible.
    pub show_help: bool,
    /// Status line shown in the footer.
    status: Option<String>,
}

impl App {
    /// Creates the application for a pre-generated list of rounds.
    pub fn new(settings: Settings, rounds: Vec<Round>) -> Self {
        let session = Session::new(rounds.len());
        Self {
            settings,
            rounds,
            current: 0,
            phase: Phase::Intro,
            session,
            show_help: false,
            status: None,
        }
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn rounds(&self) -> &[Round] {
        &self.rounds
    }

    /// Zero-based index of the current round.
    pub fn current_index(&self) -> usize {
        self.current
    }

    /// The round being played or answered, if the quiz has not finished.
    pub fn current_round(&self) -> Option<&Round> {
        self.rounds.get(self.current)
    }

    pub fn status(&self) -> Option<&str> {
        self.status.as_deref()
    }

    /// Handles a key press.
    pub fn handle_key(&mut self, code: KeyCode, modifiers: KeyModifiers) -> AppAction {
        if code == KeyCode::Char('c') && modifiers.contains(KeyModifiers::CONTROL) {
            return AppAction::Quit;
        }

        if self.show_help {
            if matches!(code, KeyCode::Char('?') | KeyCode::Esc) {
                self.show_help = false;
            }
            return AppAction::None;
        }

        match code {
            KeyCode::Esc => return AppAction::Quit,
            KeyCode::Char('?') if self.phase != Phase::Listening => {
                self.show_help = true;
                return AppAction::None;
            }
            _ => {}
        }

        match self.phase {
            Phase::Intro => match code {
                KeyCode::Char(' ') | KeyCode::Enter => self.start_round(0),
                _ => AppAction::None,
            },
            // Keys pressed while the interval sounds are dropped
            Phase::Listening => AppAction::None,
            Phase::Answering => match code {
                KeyCode::Char('r') | KeyCode::Char('R') => {
                    self.status = Some("Replaying".to_string());
                    self.start_round(self.current)
                }
                KeyCode::Char(c) => self.answer_with_key(c),
                _ => AppAction::None,
            },
            Phase::Feedback { .. } => match code {
                KeyCode::Char(' ') | KeyCode::Enter => self.advance(),
                _ => AppAction::None,
            },
            Phase::Summary => AppAction::Quit,
        }
    }

    /// Called by the event loop once the current interval has finished sounding.
    pub fn playback_finished(&mut self) {
        if self.phase == Phase::Listening {
            self.phase = Phase::Answering;
        }
    }

    /// Records an answer for the current round by option position.
    ///
    /// Ignored unless the app is waiting for an answer and `position` is a valid option.
    pub fn answer(&mut self, position: usize) -> AppAction {
        if self.phase != Phase::Answering {
            return AppAction::None;
        }
        let Some(round) = self.rounds.get(self.current) else {
            return AppAction::None;
        };
        if position >= round.options.len() {
            return AppAction::None;
        }

        let correct = round.is_correct(position);
        self.session.record(correct);
        self.status = None;
        debug!(
            round = self.current,
            chosen = position,
            expected = round.correct_answer_index,
            correct,
            "Answer recorded"
        );
        self.phase = Phase::Feedback { chosen: position };
        AppAction::None
    }

    fn answer_with_key(&mut self, key: char) -> AppAction {
        let option_count = self.current_round().map_or(0, |r| r.options.len());
        match answer_position(key, option_count) {
            Some(position) => self.answer(position),
            None => AppAction::None,
        }
    }

    fn start_round(&mut self, index: usize) -> AppAction {
        if index >= self.rounds.len() {
            return self.finish();
        }
        self.current = index;
        self.phase = Phase::Listening;
        AppAction::Play(index)
    }

    fn advance(&mut self) -> AppAction {
        self.status = None;
        self.start_round(self.current + 1)
    }

    fn finish(&mut self) -> AppAction {
        self.phase = Phase::Summary;
        self.current = self.rounds.len();
        info!(
            correct = self.session.correct(),
            answered = self.session.answered(),
            accuracy = %self.session.accuracy_label(),
            "Session finished"
        );
        AppAction::None
    }

    /// Whether the most recent answer was correct (only meaningful in Feedback).
    pub fn last_answer_correct(&self) -> Option<bool> {
        match self.phase {
            Phase::Feedback { chosen } => self.current_round().map(|r| r.is_correct(chosen)),
            _ => None,
        }
    }
}
