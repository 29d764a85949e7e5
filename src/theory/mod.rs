//! Music theory primitives: pitches and intervals.
//!
//! This module provides the pitch arithmetic and the interval table the
//! trainer is built on.

mod interval;
mod pitch;

pub use interval::{display_name, number_word, parse_interval_list, IntervalCode, Quality};
pub use pitch::{Pitch, MAX_MIDI, NOTE_NAMES};

/// Octave used for the starting pitch of every quiz round.
pub const START_OCTAVE: i8 = 4;

/// The twelve chromatic pitches of the starting octave (C4 through B4).
pub fn chromatic_octave(octave: i8) -> Vec<Pitch> {
    (0..12u8).filter_map(|pc| Pitch::new(pc, octave)).collect()
}
