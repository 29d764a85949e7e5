//! earwig - A terminal ear trainer for musical intervals.
//!
//! This library provides the interval quiz core, configuration, audio
//! playback, and terminal UI used by the `earwig` binary.

pub mod app;
pub mod audio;
pub mod config;
pub mod error;
pub mod theory;
pub mod trainer;
pub mod ui;

// Re-export commonly used types
pub use app::{App, AppAction, Phase};
pub use audio::AudioEngine;
pub use config::{Overrides, Settings};
pub use error::{Result, TrainerError};
pub use theory::{display_name, IntervalCode, Pitch};
pub use trainer::{generate, AnswerOption, Round, Session, SessionConfig};
