//! Ring state and step management.
//!
//! The `Ring` owns the circular step sequence plus a spare list that lets a
//! shrink-then-regrow round trip restore what the user had, instead of
//! refilling with defaults.
use std::sync::{Arc, Mutex};
pub mod playback;

use crate::error::{PatternError, Result};
use crate::generator::{MAX_STEPS, MIN_STEPS};

#[derive(Debug, Clone, Default)]
pub struct Ring {
    steps: Vec<bool>,
    // displaced steps, most recent first
    spare: Vec<bool>,
}

impl Ring {
    pub fn new(count: usize) -> Self {
        Self {
            steps: vec![false; count],
            spare: Vec::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    pub fn get(&self, index: usize) -> bool {
        self.steps.get(index).copied().unwrap_or(false)
    }

    pub fn steps(&self) -> &[bool] {
        &self.steps
    }

    /// Flip one step. Out-of-range indices are ignored; stale UI callbacks
    /// may still point at steps a resize removed.
    pub fn toggle(&mut self, index: usize) {
        if let Some(step) = self.steps.get_mut(index) {
            *step = !*step;
        }
    }

    /// Replace the whole sequence with a freshly generated one. The spare
    /// list is untouched; only `resize` moves steps in or out of it.
    pub fn install(&mut self, steps: Vec<bool>) {
        self.steps = steps;
    }

    /// Drop the sequence and the spare list.
    pub fn clear(&mut self) {
        self.steps.clear();
        self.spare.clear();
    }

    /// Change the ring length, remembering what gets cut.
    ///
    /// Shrinking parks the trailing steps at the front of the spare list;
    /// growing takes them back first (in the order they were displaced) and
    /// only then pads with rests. Returns whether the structure changed so
    /// callers know to re-layout.
    pub fn resize(&mut self, count: usize) -> Result<bool> {
        if !(MIN_STEPS..=MAX_STEPS).contains(&count) {
            return Err(PatternError::InvalidCount(count));
        }
        if count == self.steps.len() {
            return Ok(false);
        }
        if count < self.steps.len() {
            let displaced = self.steps.split_off(count);
            self.spare.splice(0..0, displaced);
        } else {
            let reclaimed = (count - self.steps.len()).min(self.spare.len());
            self.steps.extend(self.spare.drain(..reclaimed));
            self.steps.resize(count, false);
        }
        Ok(true)
    }
}

/// Editor state around the ring: tempo, note, rotation and the snapshot the
/// playback thread reads.
pub struct Sequencer {
    ring: Ring,
    shared: Arc<Mutex<Vec<bool>>>,
    first_step: usize,
    current_step: usize,
    bpm: f32,
    note: u8,
}

impl Sequencer {
    pub fn new(count: usize) -> Self {
        let ring = Ring::new(count);
        let shared = Arc::new(Mutex::new(ring.steps().to_vec()));

        Self {
            ring,
            shared,
            first_step: 0,
            current_step: 0,
            bpm: 120.0,
            note: 60, // Middle C
        }
    }

    pub fn ring(&self) -> &Ring {
        &self.ring
    }

    pub fn shared(&self) -> &Arc<Mutex<Vec<bool>>> {
        &self.shared
    }

    /// Which ring step is treated as the start of the cycle.
    pub fn first_step(&self) -> usize {
        self.first_step
    }

    /// Reassign the start of the cycle by a signed offset, wrapping around
    /// the ring.
    pub fn rotate(&mut self, delta: isize) {
        let len = self.ring.len() as isize;
        if len == 0 {
            return;
        }
        self.first_step = (self.first_step as isize + delta).rem_euclid(len) as usize;
        self.publish();
    }

    /// Map a slot in the rotated cycle back to its ring index.
    pub fn ring_index(&self, slot: usize) -> usize {
        match self.ring.len() {
            0 => 0,
            len => (self.first_step + slot) % len,
        }
    }

    pub fn current_step(&self) -> usize {
        self.current_step
    }

    pub fn set_current_step(&mut self, step: usize) {
        self.current_step = step;
    }

    pub fn advance_step(&mut self) -> usize {
        if !self.ring.is_empty() {
            self.current_step = (self.current_step + 1) % self.ring.len();
        }
        self.current_step
    }

    pub fn bpm(&self) -> f32 {
        self.bpm
    }

    pub fn set_bpm(&mut self, bpm: f32) {
        self.bpm = bpm.clamp(40.0, 240.0);
    }

    pub fn note(&self) -> u8 {
        self.note
    }

    pub fn set_note(&mut self, note: u8) {
        self.note = note.clamp(0, 127);
    }

    /// Length of one step in milliseconds at the current tempo (16th notes).
    pub fn step_duration_ms(&self) -> u64 {
        let steps_per_beat = 4.0;
        let beats_per_second = self.bpm / 60.0;
        (1000.0 / (beats_per_second * steps_per_beat)) as u64
    }

    /// Flip the step under a rotated slot and republish.
    pub fn toggle(&mut self, slot: usize) {
        let index = self.ring_index(slot);
        self.ring.toggle(index);
        self.publish();
    }

    /// Adopt a generated pattern wholesale.
    pub fn install(&mut self, steps: Vec<bool>) {
        self.ring.install(steps);
        self.normalize_positions();
        self.publish();
    }

    pub fn resize(&mut self, count: usize) -> Result<bool> {
        let changed = self.ring.resize(count)?;
        if changed {
            self.normalize_positions();
            self.publish();
        }
        Ok(changed)
    }

    pub fn clear(&mut self) {
        self.ring.clear();
        self.first_step = 0;
        self.current_step = 0;
        self.publish();
    }

    /// Copy the rotated cycle into the snapshot the playback thread walks.
    pub fn publish(&mut self) {
        let len = self.ring.len();
        let mut snapshot = Vec::with_capacity(len);
        for slot in 0..len {
            snapshot.push(self.ring.get(self.ring_index(slot)));
        }
        *self.shared.lock().unwrap() = snapshot;
    }

    fn normalize_positions(&mut self) {
        match self.ring.len() {
            0 => {
                self.first_step = 0;
                self.current_step = 0;
            }
            len => {
                self.first_step %= len;
                self.current_step %= len;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn toggle_flips_and_ignores_out_of_range() {
        let mut ring = Ring::new(4);
        assert!(!ring.get(2));
        ring.toggle(2);
        assert!(ring.get(2));
        ring.toggle(9);
        assert_eq!(ring.steps(), &[false, false, true, false]);
    }

    #[test]
    fn resize_round_trip_restores_prior_steps() {
        let mut ring = Ring::new(6);
        ring.install(vec![true, false, true, true, false, true]);
        assert_eq!(ring.resize(3), Ok(true));
        assert_eq!(ring.steps(), &[true, false, true]);
        assert_eq!(ring.resize(6), Ok(true));
        assert_eq!(ring.steps(), &[true, false, true, true, false, true]);
    }

    #[test]
    fn regrowing_past_the_spare_list_pads_with_rests() {
        let mut ring = Ring::new(4);
        ring.install(vec![true, true, true, true]);
        ring.resize(2).unwrap();
        ring.resize(5).unwrap();
        assert_eq!(ring.steps(), &[true, true, true, true, false]);
    }

    #[test]
    fn repeated_shrinks_stack_most_recent_first() {
        let mut ring = Ring::new(6);
        ring.install(vec![false, true, false, true, true, false]);
        ring.resize(4).unwrap(); // parks [true, false]
        ring.resize(2).unwrap(); // parks [false, true] ahead of them
        ring.resize(6).unwrap();
        assert_eq!(
            ring.steps(),
            &[false, true, false, true, true, false],
            "steps must come back in displacement order"
        );
    }

    #[test]
    fn resize_to_current_length_reports_no_change() {
        let mut ring = Ring::new(8);
        assert_eq!(ring.resize(8), Ok(false));
    }

    #[test]
    fn out_of_range_resize_leaves_the_ring_alone() {
        let mut ring = Ring::new(3);
        ring.toggle(1);
        assert_eq!(ring.resize(300), Err(PatternError::InvalidCount(300)));
        assert_eq!(ring.resize(1), Err(PatternError::InvalidCount(1)));
        assert_eq!(ring.steps(), &[false, true, false]);
    }

    #[test]
    fn clear_empties_steps_and_spare() {
        let mut ring = Ring::new(4);
        ring.install(vec![true; 4]);
        ring.resize(2).unwrap();
        ring.clear();
        assert!(ring.is_empty());
        ring.resize(3).unwrap();
        // Nothing left to reclaim after a clear.
        assert_eq!(ring.steps(), &[false, false, false]);
    }

    #[test]
    fn install_does_not_touch_the_spare_list() {
        let mut ring = Ring::new(4);
        ring.install(vec![true, true, false, false]);
        ring.resize(2).unwrap();
        ring.install(vec![false, true]);
        ring.resize(4).unwrap();
        assert_eq!(ring.steps(), &[false, true, false, false]);
    }

    #[test]
    fn rotation_wraps_and_maps_slots() {
        let mut seq = Sequencer::new(4);
        seq.rotate(-1);
        assert_eq!(seq.first_step(), 3);
        assert_eq!(seq.ring_index(0), 3);
        assert_eq!(seq.ring_index(2), 1);
        seq.rotate(5);
        assert_eq!(seq.first_step(), 0);
    }

    #[test]
    fn publish_rotates_the_snapshot() {
        let mut seq = Sequencer::new(4);
        seq.install(vec![true, false, false, true]);
        seq.rotate(1);
        let snapshot = seq.shared().lock().unwrap().clone();
        assert_eq!(snapshot, vec![false, false, true, true]);
    }

    #[test]
    fn toggling_a_slot_respects_rotation() {
        let mut seq = Sequencer::new(4);
        seq.rotate(1);
        seq.toggle(0);
        assert!(seq.ring().get(1));
        assert!(!seq.ring().get(0));
    }

    #[test]
    fn sequencer_advances_circularly() {
        let mut seq = Sequencer::new(3);
        assert_eq!(seq.current_step(), 0);
        seq.advance_step();
        seq.advance_step();
        seq.advance_step();
        assert_eq!(seq.current_step(), 0);
    }

    #[test]
    fn bpm_and_note_are_clamped() {
        let mut seq = Sequencer::new(4);
        seq.set_bpm(1000.0);
        assert_eq!(seq.bpm(), 240.0);
        seq.set_note(200);
        assert_eq!(seq.note(), 127);
    }
}
