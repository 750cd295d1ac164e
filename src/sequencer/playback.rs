//! Playback engine - walks the ring at a fixed tempo and emits events.
use std::sync::mpsc::{channel, Receiver, Sender};
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::{Duration, Instant};

#[derive(Debug, Clone)]
pub enum PlaybackEvent {
    /// The transport moved onto a new slot of the cycle.
    StepAdvanced(usize),
    /// One timing tick per step, forwarded as a MIDI real-time clock.
    Clock,
    NoteOn(u8, u8), // note, velocity
    NoteOff(u8),    // note
}

pub struct PlaybackEngine {
    sender: Sender<PlaybackEvent>,
    receiver: Receiver<PlaybackEvent>,
    is_running: Arc<Mutex<bool>>,
}

impl PlaybackEngine {
    pub fn new() -> Self {
        let (sender, receiver) = channel();

        Self {
            sender,
            receiver,
            is_running: Arc::new(Mutex::new(false)),
        }
    }

    /// Spawn the transport thread over the published snapshot.
    ///
    /// The snapshot length is re-read every step so a live resize or a
    /// wholesale pattern replacement is picked up on the next tick.
    pub fn start(&mut self, bpm: f32, steps: Arc<Mutex<Vec<bool>>>, note: u8) {
        if *self.is_running.lock().unwrap() {
            return;
        }

        *self.is_running.lock().unwrap() = true;

        let is_running = Arc::clone(&self.is_running);
        let sender = self.sender.clone();

        thread::spawn(move || {
            let step_duration = Duration::from_secs_f32(60.0 / bpm / 4.0);
            let note_duration = step_duration / 2;
            let mut current_step = 0;
            let mut last_step_time = Instant::now();

            while *is_running.lock().unwrap() {
                let now = Instant::now();

                if now.duration_since(last_step_time) >= step_duration {
                    let (total_steps, should_trigger) = {
                        let snapshot = steps.lock().unwrap();
                        let triggered =
                            current_step < snapshot.len() && snapshot[current_step];
                        (snapshot.len(), triggered)
                    };

                    if total_steps == 0 {
                        last_step_time = now;
                        thread::sleep(Duration::from_millis(1));
                        continue;
                    }

                    let _ = sender.send(PlaybackEvent::Clock);
                    let _ = sender.send(PlaybackEvent::StepAdvanced(current_step));

                    if should_trigger {
                        let _ = sender.send(PlaybackEvent::NoteOn(note, 100));

                        // Schedule note off
                        let sender_clone = sender.clone();
                        thread::spawn(move || {
                            thread::sleep(note_duration);
                            let _ = sender_clone.send(PlaybackEvent::NoteOff(note));
                        });
                    }

                    current_step = (current_step + 1) % total_steps;
                    last_step_time = now;
                }

                thread::sleep(Duration::from_millis(1));
            }
        });
    }

    pub fn stop(&mut self) {
        *self.is_running.lock().unwrap() = false;
    }

    pub fn is_running(&self) -> bool {
        *self.is_running.lock().unwrap()
    }

    pub fn poll_events(&self) -> Vec<PlaybackEvent> {
        let mut events = Vec::new();
        while let Ok(event) = self.receiver.try_recv() {
            events.push(event);
        }
        events
    }
}

impl Default for PlaybackEngine {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn engine_starts_idle_with_no_events() {
        let engine = PlaybackEngine::new();
        assert!(!engine.is_running());
        assert!(engine.poll_events().is_empty());
    }

    #[test]
    fn stop_clears_the_run_flag() {
        let mut engine = PlaybackEngine::new();
        let steps = Arc::new(Mutex::new(vec![true, false]));
        engine.start(120.0, steps, 60);
        assert!(engine.is_running());
        engine.stop();
        assert!(!engine.is_running());
    }
}
