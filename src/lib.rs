//! RONDO - a circular step sequencer library
//!
//! This library provides the core components for building a circular
//! sequencer:
//! - Symmetric, run-constrained pattern generation on a ring
//! - Ring state with resize memory and rotation
//! - Audio click preview for auditioning
//! - MIDI output for production use
//! - Playback engine for timing and coordination

pub mod audio;
pub mod error;
pub mod generator;
pub mod midi;
pub mod sequencer;

// Re-export commonly used types
pub use audio::AudioOutput;
pub use error::PatternError;
pub use generator::{generate, select_axis, Axis, CoinSource, GenParams, MAX_STEPS, MIN_STEPS};
pub use midi::{midi_note_name, MidiError, MidiOutputDevice};
pub use sequencer::playback::{PlaybackEngine, PlaybackEvent};
pub use sequencer::{Ring, Sequencer};
