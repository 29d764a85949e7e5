//! Audio engine for interval playback.
//!
//! Provides a small interface for sounding pitch pairs using rustysynth
//! for synthesis and rodio for audio output.

use crate::error::{Result, TrainerError};
use crate::theory::Pitch;
use crate::trainer::PlaybackStyle;
use rodio::cpal::traits::HostTrait;
use rodio::{cpal, OutputStream, OutputStreamHandle, Source};
use rustysynth::{SoundFont, Synthesizer, SynthesizerSettings};
use std::fs::File;
use std::io::BufReader;
use std::path::Path;
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::Duration;
use tracing::{debug, info, warn};

/// Sample rate for audio synthesis (44.1 kHz standard).
pub const SAMPLE_RATE: u32 = 44100;

/// Audio buffer size for low-latency playback.
/// Smaller = lower latency but higher CPU usage.
const BUFFER_SIZE: usize = 256;

/// MIDI channel used for all interval notes.
const CHANNEL: u8 = 0;

/// Velocity used for all interval notes.
const VELOCITY: u8 = 100;

/// Short gap after the last note so the release tail is heard before the prompt.
const RELEASE_TAIL: Duration = Duration::from_millis(150);

/// Endless stereo stream pulled from the shared synthesizer in blocks.
///
/// Samples come out interleaved, so each block of `BUFFER_SIZE` frames
/// yields twice as many items.
struct SynthSource {
    synth: Arc<Mutex<Synthesizer>>,
    left: Vec<f32>,
    right: Vec<f32>,
    /// Next interleaved sample index; `2 * BUFFER_SIZE` means the block is spent.
    cursor: usize,
}

impl SynthSource {
    fn new(synth: Arc<Mutex<Synthesizer>>) -> Self {
        Self {
            synth,
            left: vec![0.0; BUFFER_SIZE],
            right: vec![0.0; BUFFER_SIZE],
            cursor: 2 * BUFFER_SIZE,
        }
    }

    fn refill(&mut self) {
        match self.synth.lock() {
            Ok(mut synth) => synth.render(&mut self.left, &mut self.right),
            Err(_) => {
                self.left.fill(0.0);
                self.right.fill(0.0);
            }
        }
        self.cursor = 0;
    }
}

impl Iterator for SynthSource {
    type Item = f32;

    fn next(&mut self) -> Option<f32> {
        if self.cursor >= 2 * BUFFER_SIZE {
            self.refill();
        }
        let frame = self.cursor / 2;
        let sample = if self.cursor % 2 == 0 {
            self.left[frame]
        } else {
            self.right[frame]
        };
        self.cursor += 1;
        Some(sample)
    }
}

impl Source for SynthSource {
    fn current_frame_len(&self) -> Option<usize> {
        None
    }

    fn channels(&self) -> u16 {
        2
    }

    fn sample_rate(&self) -> u32 {
        SAMPLE_RATE
    }

    fn total_duration(&self) -> Option<Duration> {
        None
    }
}

/// Length of one beat at the given tempo.
pub fn beat_duration(tempo: u32) -> Duration {
    Duration::from_secs_f64(60.0 / tempo.max(1) as f64)
}

/// Opens an output stream on the audio host named `driver`.
///
/// Falls back to the system default host when no host has that name.
fn open_output(driver: &str) -> Result<(OutputStream, OutputStreamHandle)> {
    let host_id = cpal::available_hosts()
        .into_iter()
        .find(|id| id.name().eq_ignore_ascii_case(driver));

    let Some(host_id) = host_id else {
        warn!(
            driver,
            available = ?cpal::available_hosts().iter().map(|id| id.name()).collect::<Vec<_>>(),
            "Audio driver not available, using default output"
        );
        return OutputStream::try_default().map_err(|e| {
            TrainerError::ResourceUnavailable(format!("Failed to open audio output: {}", e))
        });
    };

    let host = cpal::host_from_id(host_id).map_err(|e| {
        TrainerError::ResourceUnavailable(format!("Audio driver '{}' unavailable: {}", driver, e))
    })?;
    let device = host.default_output_device().ok_or_else(|| {
        TrainerError::ResourceUnavailable(format!("No output device for audio driver '{}'", driver))
    })?;

    OutputStream::try_from_device(&device).map_err(|e| {
        TrainerError::ResourceUnavailable(format!("Failed to open audio output: {}", e))
    })
}

/// The audio engine that sounds quiz intervals.
///
/// Owns the synthesizer and the audio output. The output stream renders
/// continuously; playback is driven by note on/off messages.
pub struct AudioEngine {
    /// The synthesizer (wrapped for sharing with audio thread).
    synth: Arc<Mutex<Synthesizer>>,
    /// Audio output stream (must be kept alive).
    _stream: OutputStream,
    /// Audio output handle for playback.
    _stream_handle: OutputStreamHandle,
}

impl AudioEngine {
    /// Creates a new audio engine with the specified SoundFont and driver.
    ///
    /// # Arguments
    ///
    /// * `soundfont_path` - Path to the SoundFont file (.sf2)
    /// * `driver` - Audio host name, e.g. "alsa"
    ///
    /// # Errors
    ///
    /// Returns [`TrainerError::ResourceUnavailable`] if:
    /// - The SoundFont file cannot be read
    /// - The SoundFont is invalid
    /// - Audio output cannot be initialized
    pub fn new<P: AsRef<Path>>(soundfont_path: P, driver: &str) -> Result<Self> {
        let soundfont_path = soundfont_path.as_ref();
        let mut file = BufReader::new(File::open(soundfont_path).map_err(|e| {
            TrainerError::ResourceUnavailable(format!(
                "Failed to open SoundFont {}: {}",
                soundfont_path.display(),
                e
            ))
        })?);
        let soundfont = Arc::new(SoundFont::new(&mut file).map_err(|e| {
            TrainerError::ResourceUnavailable(format!("Failed to load SoundFont: {:?}", e))
        })?);

        let settings = SynthesizerSettings::new(SAMPLE_RATE as i32);
        let synth = Synthesizer::new(&soundfont, &settings).map_err(|e| {
            TrainerError::ResourceUnavailable(format!("Failed to create synthesizer: {:?}", e))
        })?;
        let synth = Arc::new(Mutex::new(synth));

        let (stream, stream_handle) = open_output(driver)?;

        let source = SynthSource::new(Arc::clone(&synth));
        stream_handle.play_raw(source).map_err(|e| {
            TrainerError::ResourceUnavailable(format!("Failed to start audio playback: {}", e))
        })?;

        info!(
            soundfont = %soundfont_path.display(),
            driver,
            "Audio engine ready"
        );

        Ok(Self {
            synth,
            _stream: stream,
            _stream_handle: stream_handle,
        })
    }

    /// Plays a single note immediately.
    pub fn note_on(&self, channel: u8, note: u8, velocity: u8) {
        if let Ok(mut synth) = self.synth.lock() {
            synth.note_on(channel as i32, note as i32, velocity as i32);
        }
    }

    /// Stops a playing note.
    pub fn note_off(&self, channel: u8, note: u8) {
        if let Ok(mut synth) = self.synth.lock() {
            synth.note_off(channel as i32, note as i32);
        }
    }

    /// Stops all playing notes.
    ///
    /// # Arguments
    ///
    /// * `immediate` - If true, notes stop immediately without release
    pub fn all_notes_off(&self, immediate: bool) {
        if let Ok(mut synth) = self.synth.lock() {
            synth.note_off_all(immediate);
        }
    }

    /// Sets the instrument (program) for a channel.
    pub fn set_program(&self, channel: u8, program: u8) {
        if let Ok(mut synth) = self.synth.lock() {
            // Program change is MIDI command 0xC0 (192)
            synth.process_midi_message(channel as i32, 0xC0, program as i32, 0);
        }
    }

    /// Selects the instrument used for interval playback.
    pub fn set_instrument(&self, program: u8) {
        self.set_program(CHANNEL, program);
    }

    /// Sounds a pitch pair and blocks until it has finished.
    ///
    /// Melodic pairs play one beat per note, first then second, like two
    /// quarter notes in a 2/4 bar. Harmonic pairs sound both notes together
    /// for two beats.
    pub fn play_interval(&self, pair: (Pitch, Pitch), style: PlaybackStyle, tempo: u32) {
        let beat = beat_duration(tempo);
        let (first, second) = (pair.0.midi(), pair.1.midi());
        debug!(first = %pair.0, second = %pair.1, style = style.label(), "Playing interval");

        match style {
            PlaybackStyle::Melodic => {
                self.note_on(CHANNEL, first, VELOCITY);
                thread::sleep(beat);
                self.note_off(CHANNEL, first);
                self.note_on(CHANNEL, second, VELOCITY);
                thread::sleep(beat);
                self.note_off(CHANNEL, second);
            }
            PlaybackStyle::Harmonic => {
                self.note_on(CHANNEL, first, VELOCITY);
                // A unison is a single key; one note-on is enough
                if second != first {
                    self.note_on(CHANNEL, second, VELOCITY);
                }
                thread::sleep(beat * 2);
                self.note_off(CHANNEL, first);
                self.note_off(CHANNEL, second);
            }
        }

        thread::sleep(RELEASE_TAIL);
    }
}

impl Drop for AudioEngine {
    fn drop(&mut self) {
        self.all_notes_off(true);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_beat_duration() {
        assert_eq!(beat_duration(60), Duration::from_secs(1));
        assert_eq!(beat_duration(120), Duration::from_millis(500));
        assert_eq!(beat_duration(80), Duration::from_millis(750));
        // Zero tempo is clamped rather than dividing by zero
        assert_eq!(beat_duration(0), Duration::from_secs(60));
    }

    #[test]
    fn test_missing_soundfont_is_resource_error() {
        let result = AudioEngine::new("/nonexistent/sound.sf2", "alsa");
        assert!(matches!(
            result,
            Err(TrainerError::ResourceUnavailable(_))
        ));
    }
}
