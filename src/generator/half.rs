//! Half-sequence builders and the seam rules they share.
//!
//! Each builder commits one canonical half of the ring; the assembler derives
//! the rest by reflection. Positions next to an axis or the wrap point have no
//! committed neighbor on one side, so their run context is projected through
//! the mirror instead of read directly.

use crate::error::{PatternError, Result};
use crate::generator::CoinSource;

/// How a run scan continues once it has consumed the whole committed prefix
/// and falls off into the unwritten seam.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum SeamMirror {
    /// The axis sits in the gap before the prefix: the reflection repeats the
    /// prefix's first step as a twin.
    Gap,
    /// The axis sits on the prefix's first step: the reflection pivots around
    /// that step without repeating it.
    Step,
}

/// Run length of `value` that would exist if `value` were committed as the
/// next step.
///
/// `prefix` is ordered from the seam-side start of the half toward the step
/// being decided, so `prefix.last()` is the immediate neighbor. While the
/// trailing run stops inside the prefix the projection is simply that run
/// plus the new step; once the scan reaches the seam, the half's own
/// reflection supplies the far side and the run folds back on itself.
pub(crate) fn projected_run(prefix: &[bool], value: bool, seam: SeamMirror) -> usize {
    let run = prefix.iter().rev().take_while(|&&s| s == value).count();
    if run < prefix.len() {
        return run + 1;
    }
    match seam {
        SeamMirror::Gap => 2 * (run + 1),
        SeamMirror::Step => 2 * run + 1,
    }
}

/// Shared resolution for every per-step decision: compare both projected runs
/// against their bounds, force the only legal polarity, flip a coin when both
/// are legal, and fail when neither is.
fn resolve(
    rest_run: usize,
    active_run: usize,
    max_rest_run: usize,
    max_active_run: usize,
    coin: &mut impl CoinSource,
) -> Result<bool> {
    match (active_run > max_active_run, rest_run > max_rest_run) {
        (true, true) => Err(PatternError::UnsatisfiableConstraints {
            rest_run,
            max_rest_run,
            active_run,
            max_active_run,
        }),
        (true, false) => Ok(false),
        (false, true) => Ok(true),
        (false, false) => Ok(coin.flip()),
    }
}

/// The uniform per-step law. On an empty prefix this is the seed-seam rule:
/// a `Gap` seam projects a doubled pair either way, a `Step` seam projects a
/// lone step.
fn fill_step(
    prefix: &[bool],
    max_rest_run: usize,
    max_active_run: usize,
    seam: SeamMirror,
    coin: &mut impl CoinSource,
) -> Result<bool> {
    resolve(
        projected_run(prefix, false, seam),
        projected_run(prefix, true, seam),
        max_rest_run,
        max_active_run,
        coin,
    )
}

/// Rule for the last step of the in-gap half, where both eventual neighbors
/// are reflections of the committed side. Extending the trailing run doubles
/// it across the seam; breaking it leaves a mirrored pair of the opposite
/// polarity.
fn wrap_step(
    prefix: &[bool],
    max_rest_run: usize,
    max_active_run: usize,
    coin: &mut impl CoinSource,
) -> Result<bool> {
    let active_run = 2 * (prefix.iter().rev().take_while(|&&s| s).count() + 1);
    let rest_run = 2 * (prefix.iter().rev().take_while(|&&s| !s).count() + 1);
    resolve(rest_run, active_run, max_rest_run, max_active_run, coin)
}

/// Does committing `value` on the axis step saturate its bound once the run
/// doubles across the axis? True when the `ceil(max_run / 2)` nearest
/// neighbors all carry `value` (vacuously true for a zero bound).
fn axis_saturated(neighbors: &[bool], value: bool, max_run: usize) -> bool {
    let window = max_run.div_ceil(2);
    neighbors.len() >= window && neighbors.iter().take(window).all(|&s| s == value)
}

/// Rule for a step the axis passes through, decided after its half is built.
/// `neighbors` holds the committed steps ordered nearest-first.
fn axis_step(
    neighbors: &[bool],
    max_rest_run: usize,
    max_active_run: usize,
    coin: &mut impl CoinSource,
) -> Result<bool> {
    let force_rest = axis_saturated(neighbors, true, max_active_run);
    let force_active = axis_saturated(neighbors, false, max_rest_run);
    match (force_rest, force_active) {
        (true, true) => Err(PatternError::UnsatisfiableConstraints {
            rest_run: 2 * neighbors.iter().take_while(|&&s| !s).count() + 1,
            max_rest_run,
            active_run: 2 * neighbors.iter().take_while(|&&s| s).count() + 1,
            max_active_run,
        }),
        (true, false) => Ok(false),
        (false, true) => Ok(true),
        (false, false) => Ok(coin.flip()),
    }
}

/// Odd count: the axis passes through step 0 and the far gap. Steps are
/// committed from the far end (step `half`, next to that gap) inward, then
/// step 0 is settled against its nearest neighbors. Returns steps 0..=half.
pub(crate) fn build_odd(
    count: usize,
    max_rest_run: usize,
    max_active_run: usize,
    coin: &mut impl CoinSource,
) -> Result<Vec<bool>> {
    let half = count / 2;
    // outward[k] holds step half - k
    let mut outward = Vec::with_capacity(half);
    for _ in 0..half {
        let step = fill_step(&outward, max_rest_run, max_active_run, SeamMirror::Gap, coin)?;
        outward.push(step);
    }
    let nearest: Vec<bool> = outward.iter().rev().copied().collect();
    let mut steps = Vec::with_capacity(half + 1);
    steps.push(axis_step(&nearest, max_rest_run, max_active_run, coin)?);
    steps.extend(outward.iter().rev());
    Ok(steps)
}

/// Even count with the axis on steps 0 and `half`: steps 0..half-1 are built
/// forward from the axis step, then the midpoint is settled against the tail.
/// Returns steps 0..=half.
pub(crate) fn build_even_on_step(
    count: usize,
    max_rest_run: usize,
    max_active_run: usize,
    coin: &mut impl CoinSource,
) -> Result<Vec<bool>> {
    let half = count / 2;
    let mut steps = Vec::with_capacity(half + 1);
    while steps.len() < half {
        let step = fill_step(&steps, max_rest_run, max_active_run, SeamMirror::Step, coin)?;
        steps.push(step);
    }
    let nearest: Vec<bool> = steps.iter().rev().copied().collect();
    let midpoint = axis_step(&nearest, max_rest_run, max_active_run, coin)?;
    steps.push(midpoint);
    Ok(steps)
}

/// Even count with the axis in the gaps after step `half - 1` and before
/// step 0: interior steps reflect through the leading gap, the final step
/// through the trailing one. Returns steps 0..half.
pub(crate) fn build_even_in_gap(
    count: usize,
    max_rest_run: usize,
    max_active_run: usize,
    coin: &mut impl CoinSource,
) -> Result<Vec<bool>> {
    let half = count / 2;
    let mut steps = Vec::with_capacity(half);
    while steps.len() + 1 < half {
        let step = fill_step(&steps, max_rest_run, max_active_run, SeamMirror::Gap, coin)?;
        steps.push(step);
    }
    let last = wrap_step(&steps, max_rest_run, max_active_run, coin)?;
    steps.push(last);
    Ok(steps)
}
