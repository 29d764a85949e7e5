//! Interval codes and their names.
//!
//! Codes are two characters: a quality letter (`P`, `m`, `M`, `d`, `A`)
//! followed by a scale-degree number (1-8). Each semitone distance from a
//! unison to an octave has two enharmonic spellings, e.g. `M3` and `d4`
//! are both four semitones.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{Result, TrainerError};

/// Interval quality.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Quality {
    Perfect,
    Minor,
    Major,
    Diminished,
    Augmented,
}

impl Quality {
    /// Parses the single-letter quality used in interval codes.
    pub fn from_letter(letter: char) -> Option<Self> {
        match letter {
            'P' => Some(Quality::Perfect),
            'm' => Some(Quality::Minor),
            'M' => Some(Quality::Major),
            'd' => Some(Quality::Diminished),
            'A' => Some(Quality::Augmented),
            _ => None,
        }
    }

    /// The lowercase English word for this quality.
    pub fn word(self) -> &'static str {
        match self {
            Quality::Perfect => "perfect",
            Quality::Minor => "minor",
            Quality::Major => "major",
            Quality::Diminished => "diminished",
            Quality::Augmented => "augmented",
        }
    }
}

/// The English word for an interval number (1 = unison, 8 = octave).
pub fn number_word(number: u8) -> Option<&'static str> {
    match number {
        1 => Some("unison"),
        2 => Some("second"),
        3 => Some("third"),
        4 => Some("fourth"),
        5 => Some("fifth"),
        6 => Some("sixth"),
        7 => Some("seventh"),
        8 => Some("octave"),
        _ => None,
    }
}

/// One row of the interval table.
struct IntervalEntry {
    code: &'static str,
    quality: Quality,
    number: u8,
    semitones: u8,
}

const fn entry(code: &'static str, quality: Quality, number: u8, semitones: u8) -> IntervalEntry {
    IntervalEntry {
        code,
        quality,
        number,
        semitones,
    }
}

use Quality::{Augmented as A, Diminished as D, Major as Maj, Minor as Min, Perfect as P};

/// Every recognized code, in ascending semitone order, enharmonic pairs adjacent.
static INTERVAL_TABLE: [IntervalEntry; 26] = [
    entry("P1", P, 1, 0),
    entry("d2", D, 2, 0),
    entry("m2", Min, 2, 1),
    entry("A1", A, 1, 1),
    entry("M2", Maj, 2, 2),
    entry("d3", D, 3, 2),
    entry("m3", Min, 3, 3),
    entry("A2", A, 2, 3),
    entry("M3", Maj, 3, 4),
    entry("d4", D, 4, 4),
    entry("P4", P, 4, 5),
    entry("A3", A, 3, 5),
    entry("d5", D, 5, 6),
    entry("A4", A, 4, 6),
    entry("P5", P, 5, 7),
    entry("d6", D, 6, 7),
    entry("m6", Min, 6, 8),
    entry("A5", A, 5, 8),
    entry("M6", Maj, 6, 9),
    entry("d7", D, 7, 9),
    entry("m7", Min, 7, 10),
    entry("A6", A, 6, 10),
    entry("M7", Maj, 7, 11),
    entry("d8", D, 8, 11),
    entry("P8", P, 8, 12),
    entry("A7", A, 7, 12),
];

/// A recognized interval code such as `m2` or `A4`.
///
/// Only constructible through parsing, so every value maps to a table row.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct IntervalCode(usize);

impl IntervalCode {
    fn entry(self) -> &'static IntervalEntry {
        &INTERVAL_TABLE[self.0]
    }

    /// Iterates over every recognized code in table order.
    pub fn all() -> impl Iterator<Item = IntervalCode> {
        (0..INTERVAL_TABLE.len()).map(IntervalCode)
    }

    /// The short code, e.g. "m2".
    pub fn as_str(self) -> &'static str {
        self.entry().code
    }

    pub fn quality(self) -> Quality {
        self.entry().quality
    }

    pub fn number(self) -> u8 {
        self.entry().number
    }

    /// Width of the interval in semitones, 0 through 12.
    pub fn semitones(self) -> u8 {
        self.entry().semitones
    }

    /// Human-readable name, e.g. "minor second".
    pub fn display_name(self) -> String {
        let entry = self.entry();
        // Table rows only hold numbers 1-8
        let number = number_word(entry.number).unwrap_or("interval");
        format!("{} {}", entry.quality.word(), number)
    }

    /// Returns true if both codes span the same number of semitones.
    pub fn is_enharmonic_with(self, other: IntervalCode) -> bool {
        self.semitones() == other.semitones()
    }
}

impl FromStr for IntervalCode {
    type Err = TrainerError;

    fn from_str(s: &str) -> Result<Self> {
        INTERVAL_TABLE
            .iter()
            .position(|e| e.code == s)
            .map(IntervalCode)
            .ok_or_else(|| TrainerError::invalid(format!("unknown interval code '{}'", s)))
    }
}

impl TryFrom<String> for IntervalCode {
    type Error = TrainerError;

    fn try_from(value: String) -> Result<Self> {
        value.parse()
    }
}

impl From<IntervalCode> for String {
    fn from(code: IntervalCode) -> Self {
        code.as_str().to_string()
    }
}

impl fmt::Display for IntervalCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Debug for IntervalCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "IntervalCode({})", self.as_str())
    }
}

/// Looks up the display name for a raw code string.
///
/// # Examples
///
/// ```
/// use earwig::theory::display_name;
///
/// assert_eq!(display_name("m2").unwrap(), "minor second");
/// assert!(display_name("z9").is_err());
/// ```
pub fn display_name(code: &str) -> Result<String> {
    code.parse::<IntervalCode>().map(IntervalCode::display_name)
}

/// Parses a comma-separated list of codes such as `"m2, M2,P5"`.
///
/// Whitespace around each item is ignored. Empty items are rejected.
pub fn parse_interval_list(list: &str) -> Result<Vec<IntervalCode>> {
    list.split(',')
        .map(|item| {
            let item = item.trim();
            if item.is_empty() {
                Err(TrainerError::invalid(format!(
                    "empty interval code in list '{}'",
                    list
                )))
            } else {
                item.parse()
            }
        })
        .collect()
}
