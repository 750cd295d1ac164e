//! Audio preview using cpal: a short sine click per triggered step, so a
//! pattern can be auditioned without any MIDI device connected.
use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use std::sync::{Arc, Mutex};

// Click envelope time constant in seconds.
const CLICK_DECAY: f32 = 0.06;
const CLICK_GAIN: f32 = 0.25;

#[derive(Default)]
struct Voice {
    phase: f32,
    frequency: f32,
    amplitude: f32,
}

pub struct AudioOutput {
    _stream: Option<cpal::Stream>,
    voice: Arc<Mutex<Voice>>,
}

impl AudioOutput {
    pub fn new() -> Option<Self> {
        let voice = Arc::new(Mutex::new(Voice::default()));
        let stream = Self::setup_audio_stream(Arc::clone(&voice))?;

        Some(Self {
            _stream: Some(stream),
            voice,
        })
    }

    fn setup_audio_stream(voice: Arc<Mutex<Voice>>) -> Option<cpal::Stream> {
        let host = cpal::default_host();
        let device = host.default_output_device()?;
        let config = device.default_output_config().ok()?;

        let sample_rate = config.sample_rate().0 as f32;
        let decay = (-1.0 / (CLICK_DECAY * sample_rate)).exp();

        let stream = match config.sample_format() {
            cpal::SampleFormat::F32 => device.build_output_stream(
                &config.into(),
                move |data: &mut [f32], _: &cpal::OutputCallbackInfo| {
                    let mut voice = voice.lock().unwrap();

                    for sample in data.iter_mut() {
                        if voice.amplitude > 1e-4 {
                            *sample = (voice.phase * 2.0 * std::f32::consts::PI).sin()
                                * voice.amplitude
                                * CLICK_GAIN;
                            let phase_increment = voice.frequency / sample_rate;
                            voice.phase += phase_increment;
                            if voice.phase >= 1.0 {
                                voice.phase -= 1.0;
                            }
                            voice.amplitude *= decay;
                        } else {
                            *sample = 0.0;
                        }
                    }
                },
                |err| eprintln!("Audio stream error: {}", err),
                None,
            ),
            _ => return None,
        };

        if let Ok(stream) = stream {
            let _ = stream.play();
            Some(stream)
        } else {
            None
        }
    }

    /// Restart the click at the pitch of a MIDI note; it decays on its own.
    pub fn trigger_note(&mut self, note: u8) {
        let mut voice = self.voice.lock().unwrap();
        voice.frequency = midi_note_to_frequency(note);
        voice.amplitude = 1.0;
        voice.phase = 0.0;
    }

    /// Cut whatever is still ringing, used when the transport stops.
    pub fn silence(&mut self) {
        self.voice.lock().unwrap().amplitude = 0.0;
    }
}

impl Default for AudioOutput {
    fn default() -> Self {
        Self::new().unwrap_or_else(|| Self {
            _stream: None,
            voice: Arc::new(Mutex::new(Voice::default())),
        })
    }
}

fn midi_note_to_frequency(note: u8) -> f32 {
    440.0 * 2.0_f32.powf((note as f32 - 69.0) / 12.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn concert_pitch_and_octaves() {
        assert!((midi_note_to_frequency(69) - 440.0).abs() < 1e-3);
        assert!((midi_note_to_frequency(57) - 220.0).abs() < 1e-3);
    }
}
