//! Session settings and level presets.
//!
//! Settings come from three places, highest precedence first:
//!
//! 1. Values given explicitly on the command line ([`Overrides`])
//! 2. A level preset ([`LevelConfig`]), either built in or loaded from a file
//! 3. Built-in defaults
//!
//! [`Settings::resolve`] performs the merge and validates the result. The
//! resolved [`Settings`] is immutable and passed by reference to whatever
//! needs it.

use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use tracing::{debug, info};

use crate::error::{Result, TrainerError};
use crate::theory::{parse_interval_list, IntervalCode};
use crate::trainer::SessionConfig;

/// Default audio driver name.
pub const DEFAULT_AUDIO_DRIVER: &str = "alsa";

/// Default interval list.
pub const DEFAULT_INTERVALS: &str = "m2,M2";

/// Default number of rounds per session.
pub const DEFAULT_ROUNDS: u32 = 20;

/// Default playback tempo in beats per minute.
pub const DEFAULT_TEMPO: u32 = 80;

/// Default General MIDI program (Acoustic Grand Piano).
pub const DEFAULT_PROGRAM: u8 = 0;

/// Level presets compiled into the binary, indexed by level number.
const BUILTIN_LEVELS: [&str; 5] = [
    include_str!("../levels/level0.yml"),
    include_str!("../levels/level1.yml"),
    include_str!("../levels/level2.yml"),
    include_str!("../levels/level3.yml"),
    include_str!("../levels/level4.yml"),
];

/// Interval list as written in a level document: either `"m2,M2"` or `[m2, M2]`.
///
/// Codes stay raw strings until [`Settings::resolve`] so that a bad code is
/// reported by name rather than as an untagged-enum mismatch.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum IntervalList {
    Text(String),
    Codes(Vec<String>),
}

impl IntervalList {
    fn to_codes(&self) -> Result<Vec<IntervalCode>> {
        match self {
            IntervalList::Text(text) => parse_interval_list(text),
            IntervalList::Codes(codes) => codes.iter().map(|code| code.trim().parse()).collect(),
        }
    }
}

/// A level preset document. Every field is optional.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LevelConfig {
    /// Display name shown on the intro screen.
    pub name: Option<String>,
    pub intervals: Option<IntervalList>,
    pub rounds: Option<u32>,
    pub ascending: Option<bool>,
    pub descending: Option<bool>,
    pub melodic: Option<bool>,
    pub harmonic: Option<bool>,
    pub tempo: Option<u32>,
    pub program: Option<u8>,
}

/// Where a level preset comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LevelSource {
    /// A preset compiled into the binary.
    Builtin(usize),
    /// A YAML or JSON file on disk.
    File(PathBuf),
}

impl LevelSource {
    /// Interprets a `--level` argument: all digits selects a built-in preset,
    /// anything else is a file path.
    pub fn parse(arg: &str) -> Result<Self> {
        let arg = arg.trim();
        if arg.is_empty() {
            return Err(TrainerError::invalid("level must not be empty"));
        }
        if arg.chars().all(|c| c.is_ascii_digit()) {
            let number = arg
                .parse()
                .map_err(|_| TrainerError::invalid(format!("invalid level number '{}'", arg)))?;
            Ok(LevelSource::Builtin(number))
        } else {
            Ok(LevelSource::File(PathBuf::from(arg)))
        }
    }

    /// Reads and parses the preset.
    pub fn load(&self) -> Result<LevelConfig> {
        match self {
            LevelSource::Builtin(number) => {
                let text = BUILTIN_LEVELS.get(*number).ok_or_else(|| {
                    TrainerError::invalid(format!(
                        "unknown level {} (built-in levels are 0-{})",
                        number,
                        BUILTIN_LEVELS.len() - 1
                    ))
                })?;
                parse_level(text, LevelFormat::Yaml)
                    .map_err(|e| TrainerError::invalid(format!("built-in level {}: {}", number, e)))
            }
            LevelSource::File(path) => load_level_file(path),
        }
    }
}

/// Number of built-in level presets.
pub fn builtin_level_count() -> usize {
    BUILTIN_LEVELS.len()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum LevelFormat {
    Yaml,
    Json,
}

impl LevelFormat {
    fn for_path(path: &Path) -> Self {
        match path.extension().and_then(|e| e.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("json") => LevelFormat::Json,
            _ => LevelFormat::Yaml,
        }
    }
}

fn parse_level(text: &str, format: LevelFormat) -> Result<LevelConfig> {
    // An empty document leaves every setting to the other sources
    if text.lines().all(|l| {
        let l = l.trim();
        l.is_empty() || l.starts_with('#')
    }) {
        return Ok(LevelConfig::default());
    }

    match format {
        LevelFormat::Yaml => serde_yml::from_str(text)
            .map_err(|e| TrainerError::invalid(format!("malformed level document: {}", e))),
        LevelFormat::Json => serde_json::from_str(text)
            .map_err(|e| TrainerError::invalid(format!("malformed level document: {}", e))),
    }
}

/// Loads a level preset from a YAML file, or JSON when the extension is `.json`.
pub fn load_level_file(path: &Path) -> Result<LevelConfig> {
    let text = fs::read_to_string(path).map_err(|e| {
        TrainerError::invalid(format!("cannot read level file {}: {}", path.display(), e))
    })?;
    parse_level(&text, LevelFormat::for_path(path))
        .map_err(|e| TrainerError::invalid(format!("{}: {}", path.display(), e)))
}

/// Values given explicitly on the command line. `None` means "not given".
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub soundfont: Option<PathBuf>,
    pub audio_driver: Option<String>,
    pub level: Option<String>,
    pub intervals: Option<String>,
    pub rounds: Option<u32>,
    pub ascending: Option<bool>,
    pub descending: Option<bool>,
    pub melodic: Option<bool>,
    pub harmonic: Option<bool>,
    pub tempo: Option<u32>,
    pub program: Option<u8>,
    pub seed: Option<u64>,
}

/// Fully resolved, validated settings for one run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    /// SoundFont (.sf2) used for synthesis.
    pub soundfont: PathBuf,
    /// Audio host name, e.g. "alsa" or "jack".
    pub audio_driver: String,
    /// Playback tempo in beats per minute.
    pub tempo: u32,
    /// General MIDI program used for the notes.
    pub program: u8,
    /// Fixed random seed, for reproducible sessions.
    pub seed: Option<u64>,
    /// Name of the level preset in use, if any.
    pub level_name: Option<String>,
    pub session: SessionConfig,
}

impl Settings {
    /// Loads the level preset named in `overrides` (if any) and resolves.
    pub fn load(overrides: &Overrides) -> Result<Self> {
        let level = match &overrides.level {
            Some(arg) => {
                let source = LevelSource::parse(arg)?;
                let level = source.load()?;
                info!(?source, name = ?level.name, "Loaded level preset");
                Some(level)
            }
            None => None,
        };
        Self::resolve(overrides, level.as_ref())
    }

    /// Merges command-line values, a level preset, and defaults.
    ///
    /// # Errors
    ///
    /// - [`TrainerError::ConfigurationMissing`] if no SoundFont path was given
    /// - [`TrainerError::InvalidInput`] for bad intervals, zero rounds, or zero tempo
    pub fn resolve(overrides: &Overrides, level: Option<&LevelConfig>) -> Result<Self> {
        let soundfont = overrides
            .soundfont
            .clone()
            .ok_or_else(|| TrainerError::ConfigurationMissing("sound font path".into()))?;

        let audio_driver = overrides
            .audio_driver
            .clone()
            .unwrap_or_else(|| DEFAULT_AUDIO_DRIVER.to_string());

        let interval_codes = match (&overrides.intervals, level.and_then(|l| l.intervals.as_ref())) {
            (Some(text), _) => parse_interval_list(text)?,
            (None, Some(list)) => list.to_codes()?,
            (None, None) => parse_interval_list(DEFAULT_INTERVALS)?,
        };

        // Picks the command-line value, then the level's, then the default
        macro_rules! layered {
            ($field:ident, $default:expr) => {
                overrides
                    .$field
                    .or_else(|| level.and_then(|l| l.$field))
                    .unwrap_or($default)
            };
        }

        let rounds = layered!(rounds, DEFAULT_ROUNDS);
        let ascending = layered!(ascending, true);
        let descending = layered!(descending, false);
        let melodic = layered!(melodic, true);
        let harmonic = layered!(harmonic, false);
        let tempo = layered!(tempo, DEFAULT_TEMPO);
        let program = layered!(program, DEFAULT_PROGRAM);

        if tempo == 0 {
            return Err(TrainerError::invalid("tempo must be at least 1 BPM"));
        }
        if program > 127 {
            return Err(TrainerError::invalid(format!(
                "program {} is outside 0-127",
                program
            )));
        }

        let session = SessionConfig::new(interval_codes, rounds, ascending, descending)?
            .with_styles(melodic, harmonic);

        let settings = Self {
            soundfont,
            audio_driver,
            tempo,
            program,
            seed: overrides.seed,
            level_name: level.and_then(|l| l.name.clone()),
            session,
        };
        debug!(?settings, "Resolved settings");
        Ok(settings)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::io::Write;

    fn with_soundfont() -> Overrides {
        Overrides {
            soundfont: Some(PathBuf::from("/tmp/test.sf2")),
            ..Default::default()
        }
    }

    fn code_names(settings: &Settings) -> Vec<&'static str> {
        settings
            .session
            .interval_codes()
            .iter()
            .map(|c| c.as_str())
            .collect()
    }

    #[test]
    fn test_defaults() {
        let settings = Settings::resolve(&with_soundfont(), None).unwrap();
        assert_eq!(settings.audio_driver, "alsa");
        assert_eq!(code_names(&settings), ["m2", "M2"]);
        assert_eq!(settings.session.round_count(), 20);
        assert!(settings.session.allow_ascending());
        assert!(!settings.session.allow_descending());
        assert!(settings.session.allow_melodic());
        assert!(!settings.session.allow_harmonic());
        assert_eq!(settings.tempo, DEFAULT_TEMPO);
        assert_eq!(settings.level_name, None);
    }

    #[test]
    fn test_missing_soundfont() {
        let err = Settings::resolve(&Overrides::default(), None).unwrap_err();
        assert!(matches!(err, TrainerError::ConfigurationMissing(_)));
    }

    #[test]
    fn test_precedence() {
        let level = LevelConfig {
            name: Some("Custom".into()),
            intervals: Some(IntervalList::Text("P4,P5".into())),
            rounds: Some(10),
            descending: Some(true),
            tempo: Some(100),
            ..Default::default()
        };
        let overrides = Overrides {
            rounds: Some(5),
            ..with_soundfont()
        };

        let settings = Settings::resolve(&overrides, Some(&level)).unwrap();
        // Command line beats the level
        assert_eq!(settings.session.round_count(), 5);
        // Level beats defaults
        assert_eq!(code_names(&settings), ["P4", "P5"]);
        assert!(settings.session.allow_descending());
        assert_eq!(settings.tempo, 100);
        // Defaults fill the rest
        assert!(settings.session.allow_ascending());
        assert_eq!(settings.level_name.as_deref(), Some("Custom"));
    }

    #[test]
    fn test_command_line_can_turn_level_flag_off() {
        let level = LevelConfig {
            descending: Some(true),
            ..Default::default()
        };
        let overrides = Overrides {
            descending: Some(false),
            ..with_soundfont()
        };
        let settings = Settings::resolve(&overrides, Some(&level)).unwrap();
        assert!(!settings.session.allow_descending());
    }

    #[test]
    fn test_invalid_values() {
        let bad_intervals = Overrides {
            intervals: Some("m2,q9".into()),
            ..with_soundfont()
        };
        assert!(matches!(
            Settings::resolve(&bad_intervals, None),
            Err(TrainerError::InvalidInput(_))
        ));

        let zero_rounds = Overrides {
            rounds: Some(0),
            ..with_soundfont()
        };
        assert!(Settings::resolve(&zero_rounds, None).is_err());

        let zero_tempo = Overrides {
            tempo: Some(0),
            ..with_soundfont()
        };
        assert!(Settings::resolve(&zero_tempo, None).is_err());

        let duplicates = Overrides {
            intervals: Some("M2,M2".into()),
            ..with_soundfont()
        };
        assert!(Settings::resolve(&duplicates, None).is_err());
    }

    #[test]
    fn test_level_source_parse() {
        assert_eq!(LevelSource::parse("0").unwrap(), LevelSource::Builtin(0));
        assert_eq!(LevelSource::parse(" 3 ").unwrap(), LevelSource::Builtin(3));
        assert_eq!(
            LevelSource::parse("levels/custom.yml").unwrap(),
            LevelSource::File(PathBuf::from("levels/custom.yml"))
        );
        assert!(LevelSource::parse("").is_err());
    }

    #[test]
    fn test_builtin_levels_resolve() {
        for number in 0..builtin_level_count() {
            let level = LevelSource::Builtin(number).load().unwrap();
            assert!(level.name.is_some(), "level {} has no name", number);
            Settings::resolve(&with_soundfont(), Some(&level)).unwrap();
        }
        assert!(matches!(
            LevelSource::Builtin(99).load(),
            Err(TrainerError::InvalidInput(_))
        ));
    }

    #[test]
    fn test_builtin_level_list_syntax() {
        let level = LevelSource::Builtin(2).load().unwrap();
        let settings = Settings::resolve(&with_soundfont(), Some(&level)).unwrap();
        assert_eq!(code_names(&settings), ["m2", "M2", "m3", "M3"]);
        assert!(settings.session.allow_descending());
    }

    #[test]
    fn test_load_yaml_file() {
        let mut file = tempfile::Builder::new().suffix(".yml").tempfile().unwrap();
        writeln!(file, "intervals: P5,P8\nrounds: 3\nharmonic: true").unwrap();

        let level = load_level_file(file.path()).unwrap();
        assert_eq!(level.rounds, Some(3));
        assert_eq!(level.harmonic, Some(true));
        assert_eq!(level.intervals, Some(IntervalList::Text("P5,P8".into())));
    }

    #[test]
    fn test_load_json_file() {
        let mut file = tempfile::Builder::new().suffix(".json").tempfile().unwrap();
        writeln!(file, r#"{{"intervals": ["m3", "M3"], "ascending": false}}"#).unwrap();

        let level = load_level_file(file.path()).unwrap();
        assert_eq!(level.ascending, Some(false));
        let codes = level.intervals.unwrap().to_codes().unwrap();
        assert_eq!(codes.len(), 2);
    }

    #[test]
    fn test_unknown_code_in_level_list() {
        let mut file = tempfile::Builder::new().suffix(".yml").tempfile().unwrap();
        writeln!(file, "intervals: [m2, z9]").unwrap();

        let level = load_level_file(file.path()).unwrap();
        let err = Settings::resolve(&with_soundfont(), Some(&level)).unwrap_err();
        assert!(matches!(err, TrainerError::InvalidInput(_)));
        assert!(err.to_string().contains("unknown interval code 'z9'"));
    }

    #[test]
    fn test_malformed_level_file() {
        let mut file = tempfile::Builder::new().suffix(".yml").tempfile().unwrap();
        writeln!(file, "intervals: m2\nspeed: 11").unwrap();
        assert!(matches!(
            load_level_file(file.path()),
            Err(TrainerError::InvalidInput(_))
        ));

        let mut file = tempfile::Builder::new().suffix(".json").tempfile().unwrap();
        writeln!(file, "{{ not json").unwrap();
        assert!(load_level_file(file.path()).is_err());

        assert!(load_level_file(Path::new("/nonexistent/level.yml")).is_err());
    }

    #[test]
    fn test_empty_level_file() {
        let mut file = tempfile::Builder::new().suffix(".yml").tempfile().unwrap();
        writeln!(file, "# nothing here").unwrap();
        assert_eq!(load_level_file(file.path()).unwrap(), LevelConfig::default());
    }

    #[test]
    fn test_load_with_level_override() {
        let overrides = Overrides {
            level: Some("1".into()),
            ..with_soundfont()
        };
        let settings = Settings::load(&overrides).unwrap();
        assert_eq!(code_names(&settings), ["m3", "M3"]);
        assert_eq!(settings.level_name.as_deref(), Some("Thirds"));
    }
}
