//! Audio output for interval playback.
//!
//! This module provides real-time synthesis using rustysynth and audio
//! output via rodio. It supports:
//! - Loading SoundFont files for instrument sounds
//! - Choosing the audio host by driver name
//! - Melodic and harmonic interval playback

pub mod engine;

pub use engine::AudioEngine;
