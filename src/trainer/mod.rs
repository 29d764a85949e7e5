//! Interval quiz core.
//!
//! This module defines the session configuration, the rounds a session is
//! made of, and the generator that draws them. Everything here is pure:
//! randomness comes from a caller-supplied [`rand::Rng`].

mod generator;
mod pick;
mod session;

pub use generator::{generate, generate_with_seed};
pub use pick::{pick, pick_indexed};
pub use session::Session;

use std::collections::HashSet;

use crate::error::{Result, TrainerError};
use crate::theory::{IntervalCode, Pitch};

/// Order in which the two notes of an interval sound.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    /// Lower note first.
    Ascending,
    /// Higher note first.
    Descending,
}

impl Direction {
    /// Directions a round may take given the two allow flags.
    ///
    /// Descending-only yields descending; ascending-only or neither yields ascending.
    pub fn allowed(ascending: bool, descending: bool) -> &'static [Direction] {
        match (ascending, descending) {
            (true, true) => &[Direction::Ascending, Direction::Descending],
            (false, true) => &[Direction::Descending],
            _ => &[Direction::Ascending],
        }
    }

    /// Orders a (lower, upper) pair for playback.
    pub fn order(self, lower: Pitch, upper: Pitch) -> (Pitch, Pitch) {
        match self {
            Direction::Ascending => (lower, upper),
            Direction::Descending => (upper, lower),
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Direction::Ascending => "ascending",
            Direction::Descending => "descending",
        }
    }
}

/// Whether the two notes are played one after the other or together.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlaybackStyle {
    Melodic,
    Harmonic,
}

impl PlaybackStyle {
    /// Styles a round may take given the two allow flags.
    pub fn allowed(melodic: bool, harmonic: bool) -> &'static [PlaybackStyle] {
        match (melodic, harmonic) {
            (true, true) => &[PlaybackStyle::Melodic, PlaybackStyle::Harmonic],
            (false, true) => &[PlaybackStyle::Harmonic],
            _ => &[PlaybackStyle::Melodic],
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            PlaybackStyle::Melodic => "melodic",
            PlaybackStyle::Harmonic => "harmonic",
        }
    }
}

/// One answer choice within a round.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnswerOption {
    /// Index of this option, equal to its slot in the configured interval list.
    pub position: usize,
    /// The interval this option represents.
    pub code: IntervalCode,
    /// The two pitches in the order they sound.
    pub pitch_pair: (Pitch, Pitch),
}

impl AnswerOption {
    /// Absolute distance between the two pitches in semitones.
    pub fn span(&self) -> u8 {
        self.pitch_pair.0.semitones_to(self.pitch_pair.1).unsigned_abs() as u8
    }
}

/// One quiz question.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Round {
    /// Zero-based position within the session.
    pub index: usize,
    /// Index into `options` of the interval that is played.
    pub correct_answer_index: usize,
    pub direction: Direction,
    pub style: PlaybackStyle,
    /// One option per configured interval code, in configured order.
    pub options: Vec<AnswerOption>,
}

impl Round {
    /// The option whose pitch pair is played for this round.
    pub fn correct_option(&self) -> &AnswerOption {
        &self.options[self.correct_answer_index]
    }

    /// Returns true if `position` is the correct answer.
    pub fn is_correct(&self, position: usize) -> bool {
        position == self.correct_answer_index
    }
}

/// Validated, immutable parameters for one quiz session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionConfig {
    interval_codes: Vec<IntervalCode>,
    round_count: u32,
    allow_ascending: bool,
    allow_descending: bool,
    allow_melodic: bool,
    allow_harmonic: bool,
}

impl SessionConfig {
    /// Creates a melodic-only session config.
    ///
    /// # Errors
    ///
    /// Returns [`TrainerError::InvalidInput`] if `interval_codes` is empty,
    /// contains the same code twice, or `round_count` is zero.
    pub fn new(
        interval_codes: Vec<IntervalCode>,
        round_count: u32,
        allow_ascending: bool,
        allow_descending: bool,
    ) -> Result<Self> {
        if interval_codes.is_empty() {
            return Err(TrainerError::invalid("at least one interval code is required"));
        }
        let mut seen = HashSet::with_capacity(interval_codes.len());
        for code in &interval_codes {
            if !seen.insert(*code) {
                return Err(TrainerError::invalid(format!(
                    "interval code '{}' is listed more than once",
                    code
                )));
            }
        }
        if round_count == 0 {
            return Err(TrainerError::invalid("round count must be at least 1"));
        }

        Ok(Self {
            interval_codes,
            round_count,
            allow_ascending,
            allow_descending,
            allow_melodic: true,
            allow_harmonic: false,
        })
    }

    /// Sets which playback styles rounds may use.
    pub fn with_styles(mut self, melodic: bool, harmonic: bool) -> Self {
        self.allow_melodic = melodic;
        self.allow_harmonic = harmonic;
        self
    }

    pub fn interval_codes(&self) -> &[IntervalCode] {
        &self.interval_codes
    }

    pub fn round_count(&self) -> u32 {
        self.round_count
    }

    pub fn allow_ascending(&self) -> bool {
        self.allow_ascending
    }

    pub fn allow_descending(&self) -> bool {
        self.allow_descending
    }

    pub fn allow_melodic(&self) -> bool {
        self.allow_melodic
    }

    pub fn allow_harmonic(&self) -> bool {
        self.allow_harmonic
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::theory::parse_interval_list;

    #[test]
    fn test_direction_policy() {
        assert_eq!(
            Direction::allowed(true, true),
            &[Direction::Ascending, Direction::Descending]
        );
        assert_eq!(Direction::allowed(true, false), &[Direction::Ascending]);
        assert_eq!(Direction::allowed(false, true), &[Direction::Descending]);
        assert_eq!(Direction::allowed(false, false), &[Direction::Ascending]);
    }

    #[test]
    fn test_style_policy() {
        assert_eq!(PlaybackStyle::allowed(false, false), &[PlaybackStyle::Melodic]);
        assert_eq!(PlaybackStyle::allowed(false, true), &[PlaybackStyle::Harmonic]);
        assert_eq!(PlaybackStyle::allowed(true, true).len(), 2);
    }

    #[test]
    fn test_direction_order() {
        let low = Pitch::from_midi(60).unwrap();
        let high = Pitch::from_midi(64).unwrap();
        assert_eq!(Direction::Ascending.order(low, high), (low, high));
        assert_eq!(Direction::Descending.order(low, high), (high, low));
    }

    #[test]
    fn test_session_config_validation() {
        let codes = parse_interval_list("m2,M2").unwrap();
        assert!(SessionConfig::new(codes.clone(), 20, true, false).is_ok());
        assert!(matches!(
            SessionConfig::new(Vec::new(), 20, true, false),
            Err(TrainerError::InvalidInput(_))
        ));
        assert!(matches!(
            SessionConfig::new(codes, 0, true, false),
            Err(TrainerError::InvalidInput(_))
        ));
    }

    #[test]
    fn test_session_config_rejects_duplicates() {
        let codes = parse_interval_list("m2,M2,m2").unwrap();
        let err = SessionConfig::new(codes, 5, true, true).unwrap_err();
        assert!(err.to_string().contains("'m2'"));

        // Enharmonic spellings are distinct codes
        let codes = parse_interval_list("M3,d4").unwrap();
        assert!(SessionConfig::new(codes, 5, true, true).is_ok());
    }

    #[test]
    fn test_session_config_defaults_to_melodic() {
        let codes = parse_interval_list("P5").unwrap();
        let config = SessionConfig::new(codes, 1, true, false).unwrap();
        assert!(config.allow_melodic());
        assert!(!config.allow_harmonic());

        let config = config.with_styles(false, true);
        assert!(!config.allow_melodic());
        assert!(config.allow_harmonic());
    }
}
