//! Pitch representation.
//!
//! A pitch is a MIDI note number with a chromatic name and an octave,
//! using the MIDI octave convention (middle C = C4 = 60).

use std::fmt;
use std::str::FromStr;

use crate::error::{Result, TrainerError};

/// Chromatic pitch names within an octave, indexed by pitch class.
pub const NOTE_NAMES: [&str; 12] = [
    "C", "C#", "D", "D#", "E", "F", "F#", "G", "G#", "A", "A#", "B",
];

/// Highest valid MIDI note number.
pub const MAX_MIDI: u8 = 127;

/// A single pitch, stored as a MIDI note number (0-127).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Pitch(u8);

impl Pitch {
    /// Creates a pitch from a MIDI note number.
    ///
    /// Returns `None` if `midi` is above 127.
    pub fn from_midi(midi: u8) -> Option<Self> {
        (midi <= MAX_MIDI).then_some(Self(midi))
    }

    /// Creates a pitch from a pitch class (0 = C, 11 = B) and an octave.
    ///
    /// # Examples
    ///
    /// ```
    /// use earwig::theory::Pitch;
    ///
    /// let a4 = Pitch::new(9, 4).unwrap();
    /// assert_eq!(a4.midi(), 69);
    /// ```
    pub fn new(pitch_class: u8, octave: i8) -> Option<Self> {
        if pitch_class >= 12 {
            return None;
        }
        // MIDI note = (octave + 1) * 12 + pitch class
        let midi = (octave as i16 + 1) * 12 + pitch_class as i16;
        u8::try_from(midi).ok().and_then(Self::from_midi)
    }

    /// Returns the MIDI note number.
    pub fn midi(self) -> u8 {
        self.0
    }

    /// Returns the pitch class (0 = C, 11 = B).
    pub fn pitch_class(self) -> u8 {
        self.0 % 12
    }

    /// Returns the octave in MIDI convention (C4 = 60).
    pub fn octave(self) -> i8 {
        (self.0 / 12) as i8 - 1
    }

    /// Returns the chromatic name without octave, e.g. "F#".
    pub fn name(self) -> &'static str {
        NOTE_NAMES[self.pitch_class() as usize]
    }

    /// Returns the pitch `semitones` away from this one.
    ///
    /// Returns `None` when the result falls outside the MIDI range.
    pub fn transpose(self, semitones: i16) -> Option<Self> {
        (self.0 as i16)
            .checked_add(semitones)
            .and_then(|midi| u8::try_from(midi).ok())
            .and_then(Self::from_midi)
    }

    /// Signed distance in semitones from `self` to `other`.
    pub fn semitones_to(self, other: Pitch) -> i16 {
        other.0 as i16 - self.0 as i16
    }
}

impl fmt::Display for Pitch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.name(), self.octave())
    }
}

impl FromStr for Pitch {
    type Err = TrainerError;

    /// Parses names like "C4", "F#5" or "C-1".
    fn from_str(s: &str) -> Result<Self> {
        let name = s.trim();
        let invalid = || TrainerError::invalid(format!("invalid pitch name '{}'", s));

        let octave_start = name
            .char_indices()
            .find(|(_, c)| c.is_ascii_digit() || *c == '-')
            .map(|(i, _)| i)
            .ok_or_else(invalid)?;
        let (note_part, octave_part) = name.split_at(octave_start);

        let pitch_class = NOTE_NAMES
            .iter()
            .position(|&n| n == note_part)
            .ok_or_else(invalid)?;
        let octave: i8 = octave_part.parse().map_err(|_| invalid())?;

        Pitch::new(pitch_class as u8, octave).ok_or_else(invalid)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pitch_display() {
        assert_eq!(Pitch::from_midi(60).unwrap().to_string(), "C4");
        assert_eq!(Pitch::from_midi(69).unwrap().to_string(), "A4");
        assert_eq!(Pitch::from_midi(0).unwrap().to_string(), "C-1");
        assert_eq!(Pitch::from_midi(127).unwrap().to_string(), "G9");
    }

    #[test]
    fn test_pitch_parse() {
        assert_eq!("C4".parse::<Pitch>().unwrap().midi(), 60);
        assert_eq!("F#5".parse::<Pitch>().unwrap().midi(), 78);
        assert_eq!("C-1".parse::<Pitch>().unwrap().midi(), 0);
        assert!("H4".parse::<Pitch>().is_err());
        assert!("C".parse::<Pitch>().is_err());
        assert!("A9".parse::<Pitch>().is_err());
    }

    #[test]
    fn test_transpose() {
        let c4 = Pitch::new(0, 4).unwrap();
        assert_eq!(c4.transpose(7).unwrap().to_string(), "G4");
        assert_eq!(c4.transpose(12).unwrap().to_string(), "C5");
        assert_eq!(c4.transpose(-1).unwrap().to_string(), "B3");
        assert_eq!(c4.transpose(0), Some(c4));
        assert_eq!(c4.semitones_to(c4.transpose(5).unwrap()), 5);
    }

    #[test]
    fn test_transpose_out_of_range() {
        let top = Pitch::from_midi(MAX_MIDI).unwrap();
        assert_eq!(top.transpose(1), None);
        assert_eq!(Pitch::from_midi(0).unwrap().transpose(-1), None);
        assert_eq!(Pitch::from_midi(128), None);
    }

    #[test]
    fn test_transpose_extreme_offsets() {
        let c4 = Pitch::new(0, 4).unwrap();
        assert_eq!(c4.transpose(i16::MAX), None);
        assert_eq!(c4.transpose(i16::MIN), None);
        assert_eq!(Pitch::from_midi(MAX_MIDI).unwrap().transpose(i16::MAX), None);
    }
}
