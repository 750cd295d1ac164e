//! Symmetric run-constrained pattern generation.
//!
//! `generate` builds a circular rhythm that mirrors across an axis while
//! keeping every circular run of actives and rests inside caller-supplied
//! bounds. Half the steps are committed directly, the other half derived by
//! reflection; the seams where the halves meet are handled in [`half`].

mod half;

use crate::error::{PatternError, Result};

/// Smallest ring the editor supports.
pub const MIN_STEPS: usize = 2;
/// Largest ring the editor supports.
pub const MAX_STEPS: usize = 256;

/// Source of fair coin flips driving every random choice in generation.
///
/// Injected rather than ambient so tests can replay exact flip sequences.
/// Any [`rand::Rng`] works out of the box.
pub trait CoinSource {
    fn flip(&mut self) -> bool;
}

impl<R: rand::Rng> CoinSource for R {
    fn flip(&mut self) -> bool {
        self.random()
    }
}

/// Where the mirror axis of the ring falls.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    /// Through a step (and, for even counts, the step opposite it).
    OnStep,
    /// Through the midpoint of two adjacent steps.
    InGap,
}

/// Parameters for one generation request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GenParams {
    /// Ring length, [`MIN_STEPS`]..=[`MAX_STEPS`].
    pub steps: usize,
    /// Longest allowed circular run of rests.
    pub max_rest_run: usize,
    /// Longest allowed circular run of active steps.
    pub max_active_run: usize,
    /// Permit an in-gap axis for even rings.
    pub allow_gap_axis: bool,
}

impl Default for GenParams {
    fn default() -> Self {
        Self {
            steps: 16,
            max_rest_run: 3,
            max_active_run: 3,
            allow_gap_axis: true,
        }
    }
}

/// Pick the axis placement for a ring of `count` steps.
///
/// An in-gap axis is eligible only for even rings whose bounds leave it
/// solvable (`max_rest_run != 1`, `max_active_run != 0`) and when the caller
/// allows it; eligible calls flip a fair coin, everything else mirrors on a
/// step. Ineligible calls burn no randomness, keeping replays aligned.
pub fn select_axis(
    count: usize,
    max_rest_run: usize,
    max_active_run: usize,
    allow_gap_axis: bool,
    coin: &mut impl CoinSource,
) -> Axis {
    let eligible =
        allow_gap_axis && count % 2 == 0 && max_rest_run != 1 && max_active_run != 0;
    if eligible && coin.flip() {
        Axis::InGap
    } else {
        Axis::OnStep
    }
}

/// Generate a full ring satisfying `params`, or fail without a partial
/// result.
///
/// The selected half builder commits steps `0..=half` (on-step axes) or
/// `0..half` (in-gap), and the remainder is their reflection.
pub fn generate(params: &GenParams, coin: &mut impl CoinSource) -> Result<Vec<bool>> {
    let GenParams {
        steps: count,
        max_rest_run,
        max_active_run,
        allow_gap_axis,
    } = *params;
    if !(MIN_STEPS..=MAX_STEPS).contains(&count) {
        return Err(PatternError::InvalidCount(count));
    }

    let axis = select_axis(count, max_rest_run, max_active_run, allow_gap_axis, coin);
    let half = count / 2;
    let odd = count % 2;
    let committed = if odd == 1 {
        half::build_odd(count, max_rest_run, max_active_run, coin)?
    } else {
        match axis {
            Axis::OnStep => half::build_even_on_step(count, max_rest_run, max_active_run, coin)?,
            Axis::InGap => half::build_even_in_gap(count, max_rest_run, max_active_run, coin)?,
        }
    };

    let mut full = vec![false; count];
    full[..committed.len()].copy_from_slice(&committed);
    let gap = usize::from(axis == Axis::InGap);
    for i in 0..half {
        full[half + i + odd] = full[half - i - gap];
    }
    Ok(full)
}
