//! MIDI output using midir: notes plus real-time transport messages.
use midir::{MidiOutput, MidiOutputConnection};
use thiserror::Error;

const NOTE_ON: u8 = 0x90;
const NOTE_OFF: u8 = 0x80;
const CLOCK: u8 = 0xF8;
const START: u8 = 0xFA;
const STOP: u8 = 0xFC;

#[derive(Debug, Error)]
pub enum MidiError {
    #[error("failed to open MIDI output: {0}")]
    Init(#[from] midir::InitError),
    #[error("no MIDI port at index {0}")]
    UnknownPort(usize),
    #[error("failed to connect to MIDI port: {0}")]
    Connect(String),
    #[error("failed to send MIDI message: {0}")]
    Send(#[from] midir::SendError),
}

pub struct MidiOutputDevice {
    connection: Option<MidiOutputConnection>,
}

impl MidiOutputDevice {
    pub fn new() -> Self {
        Self { connection: None }
    }

    pub fn available_ports() -> Vec<String> {
        if let Ok(midi_out) = MidiOutput::new("RONDO MIDI Output") {
            midi_out
                .ports()
                .iter()
                .filter_map(|p| midi_out.port_name(p).ok())
                .collect()
        } else {
            vec![]
        }
    }

    pub fn connect(&mut self, port_index: usize) -> Result<(), MidiError> {
        let midi_out = MidiOutput::new("RONDO MIDI Output")?;

        let ports = midi_out.ports();
        let port = ports
            .get(port_index)
            .ok_or(MidiError::UnknownPort(port_index))?;

        let connection = midi_out
            .connect(port, "rondo")
            .map_err(|e| MidiError::Connect(e.to_string()))?;

        self.connection = Some(connection);
        Ok(())
    }

    pub fn is_connected(&self) -> bool {
        self.connection.is_some()
    }

    pub fn send_note_on(&mut self, note: u8, velocity: u8) -> Result<(), MidiError> {
        self.send(&[NOTE_ON, note, velocity])
    }

    pub fn send_note_off(&mut self, note: u8) -> Result<(), MidiError> {
        self.send(&[NOTE_OFF, note, 0])
    }

    /// Real-time clock tick; the engine emits one per step.
    pub fn send_clock(&mut self) -> Result<(), MidiError> {
        self.send(&[CLOCK])
    }

    pub fn send_start(&mut self) -> Result<(), MidiError> {
        self.send(&[START])
    }

    pub fn send_stop(&mut self) -> Result<(), MidiError> {
        self.send(&[STOP])
    }

    fn send(&mut self, message: &[u8]) -> Result<(), MidiError> {
        if let Some(ref mut conn) = self.connection {
            conn.send(message)?;
        }
        Ok(())
    }

    pub fn disconnect(&mut self) {
        self.connection = None;
    }
}

impl Default for MidiOutputDevice {
    fn default() -> Self {
        Self::new()
    }
}

pub fn midi_note_name(note: u8) -> String {
    let note_names = ["C", "C#", "D", "D#", "E", "F", "F#", "G", "G#", "A", "A#", "B"];
    let octave = (note / 12) as i32 - 1;
    let note_index = (note % 12) as usize;
    format!("{}{}", note_names[note_index], octave)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn note_names_cover_octave_boundaries() {
        assert_eq!(midi_note_name(60), "C4");
        assert_eq!(midi_note_name(0), "C-1");
        assert_eq!(midi_note_name(127), "G9");
        assert_eq!(midi_note_name(69), "A4");
    }

    #[test]
    fn sending_without_a_connection_is_a_quiet_no_op() {
        let mut device = MidiOutputDevice::new();
        assert!(!device.is_connected());
        assert!(device.send_note_on(60, 100).is_ok());
        assert!(device.send_clock().is_ok());
        assert!(device.send_stop().is_ok());
    }
}
