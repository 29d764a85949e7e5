//! Interval sequence generation.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::debug;

use super::pick::{pick, pick_indexed};
use super::{AnswerOption, Direction, PlaybackStyle, Round, SessionConfig};
use crate::error::{Result, TrainerError};
use crate::theory::{chromatic_octave, Pitch, START_OCTAVE};

/// Generates every round of a session up front.
///
/// For each round this draws, in order: the target interval, the starting
/// pitch (one of the twelve pitches of octave 4), the direction, and the
/// playback style. Every configured interval is then built on that starting
/// pitch, so the options differ only in their upper note.
///
/// The fixed draw order means a seeded `rng` always reproduces the same
/// sequence for the same config.
///
/// # Errors
///
/// Returns [`TrainerError::InvalidInput`] only if the config has no interval
/// codes, which a validated [`SessionConfig`] rules out.
///
/// # Examples
///
/// ```
/// use earwig::theory::parse_interval_list;
/// use earwig::trainer::{generate_with_seed, SessionConfig};
///
/// let config = SessionConfig::new(parse_interval_list("m2,M2").unwrap(), 3, true, false).unwrap();
/// let rounds = generate_with_seed(&config, 7).unwrap();
/// assert_eq!(rounds.len(), 3);
/// ```
pub fn generate<R: Rng + ?Sized>(config: &SessionConfig, rng: &mut R) -> Result<Vec<Round>> {
    let codes = config.interval_codes();
    let start_pitches = chromatic_octave(START_OCTAVE);
    let directions = Direction::allowed(config.allow_ascending(), config.allow_descending());
    let styles = PlaybackStyle::allowed(config.allow_melodic(), config.allow_harmonic());

    let rounds = (0..config.round_count() as usize)
        .map(|index| -> Result<Round> {
            let (correct_answer_index, _) = pick_indexed(codes, &mut *rng)?;
            let start = *pick(&start_pitches, &mut *rng)?;
            let direction = *pick(directions, &mut *rng)?;
            let style = *pick(styles, &mut *rng)?;

            let options = codes
                .iter()
                .enumerate()
                .map(|(position, &code)| -> Result<AnswerOption> {
                    let upper = transpose(start, code.semitones())?;
                    Ok(AnswerOption {
                        position,
                        code,
                        pitch_pair: direction.order(start, upper),
                    })
                })
                .collect::<Result<Vec<_>>>()?;

            Ok(Round {
                index,
                correct_answer_index,
                direction,
                style,
                options,
            })
        })
        .collect::<Result<Vec<_>>>()?;

    debug!(
        rounds = rounds.len(),
        intervals = codes.len(),
        "Generated interval sequence"
    );
    Ok(rounds)
}

/// Generates a session from a fixed seed.
pub fn generate_with_seed(config: &SessionConfig, seed: u64) -> Result<Vec<Round>> {
    let mut rng = StdRng::seed_from_u64(seed);
    generate(config, &mut rng)
}

fn transpose(start: Pitch, semitones: u8) -> Result<Pitch> {
    start.transpose(semitones as i16).ok_or_else(|| {
        TrainerError::invalid(format!(
            "{} transposed by {} semitones is out of range",
            start, semitones
        ))
    })
}
