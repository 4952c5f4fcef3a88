//! Cycle and Time Arithmetic.
//!
//! Pure conversions between cycle counts and picoseconds used by the cycle interface
//! and the frequency interface. Time is held as `i128` picoseconds so that a full
//! `u64` cycle count at any frequency fits without overflow.
//!
//! Rounding rules:
//! 1. **Cycles to time:** floor.
//! 2. **Time to cycles (queries):** floor.
//! 3. **Time to cycles (posting):** nearest, with halves rounding up so the result does
//!    not depend on the parity of the current cycle.

use crate::common::constants::ONE_SECOND_AS_PS;
use crate::common::error::PostError;
use crate::core::events::EventFlags;

/// Converts a cycle count to picoseconds at `freq` Hz, rounding down.
///
/// A zero frequency yields zero; callers guard that case with [`get_time_in_big_ps`].
pub fn cc_as_ps(cycles: u64, freq: u64) -> i128 {
    if freq == 0 {
        return 0;
    }
    (i128::from(cycles) * ONE_SECOND_AS_PS).div_euclid(i128::from(freq))
}

/// Converts picoseconds to cycles at `freq` Hz, rounding down.
///
/// # Returns
///
/// `None` if the result does not fit in a signed 64-bit cycle count.
pub fn ps_as_cc_floor(time: i128, freq: u64) -> Option<i64> {
    let scaled = time.checked_mul(i128::from(freq))?;
    i64::try_from(scaled.div_euclid(ONE_SECOND_AS_PS)).ok()
}

/// Converts picoseconds to cycles at `freq` Hz, rounding to nearest (halves round up).
///
/// # Returns
///
/// `None` if the result does not fit in a signed 64-bit cycle count.
pub fn ps_as_cc_nearest(time: i128, freq: u64) -> Option<i64> {
    let scaled = time
        .checked_mul(i128::from(freq))?
        .checked_add(ONE_SECOND_AS_PS / 2)?;
    i64::try_from(scaled.div_euclid(ONE_SECOND_AS_PS)).ok()
}

/// Returns the absolute time of cycle `cc` given the clock's time offset.
///
/// # Returns
///
/// `PostError::NoFrequency` if cycles have elapsed on a clock without frequency.
pub fn get_time_in_big_ps(time_offset: i128, cc: u64, freq: u64) -> Result<i128, PostError> {
    if cc != 0 && freq == 0 {
        return Err(PostError::NoFrequency);
    }
    Ok(time_offset + cc_as_ps(cc, freq))
}

/// Computes the time offset that keeps the current time unchanged across a frequency change.
///
/// # Arguments
///
/// * `current_offset` - Offset in effect at `old_freq`.
/// * `cycle_count` - Cycles elapsed so far.
/// * `old_freq` - Frequency before the change.
/// * `new_freq` - Frequency after the change.
pub fn adjusted_time_offset(
    current_offset: i128,
    cycle_count: u64,
    old_freq: u64,
    new_freq: u64,
) -> Result<i128, PostError> {
    let current_time = get_time_in_big_ps(current_offset, cycle_count, old_freq)?;
    let raw_cc_time = get_time_in_big_ps(0, cycle_count, new_freq)?;
    Ok(current_time - raw_cc_time)
}

/// Converts a posting delay in picoseconds to a cycle delta, never less than one cycle.
///
/// # Returns
///
/// `None` if the delay cannot be represented in cycles.
pub fn posting_cycle_delta(ps: i128, freq: u64) -> Option<u64> {
    let cycles = ps_as_cc_nearest(ps, freq)?;
    Some(u64::try_from(cycles).ok().filter(|&c| c > 0).unwrap_or(1))
}

/// Validates the arguments of a cycle posting.
pub const fn check_post_cycle_params(cycles: i64, flags: EventFlags) -> Result<(), PostError> {
    if cycles < 0 {
        Err(PostError::NegativeTime)
    } else if flags.contains(EventFlags::MACHINE_SYNC) {
        Err(PostError::MachineSync)
    } else {
        Ok(())
    }
}

/// Converts seconds to picoseconds, rounding to nearest.
///
/// # Returns
///
/// `None` for non-finite input or values beyond the simulation time range.
pub fn seconds_as_ps(seconds: f64) -> Option<i128> {
    if !seconds.is_finite() {
        return None;
    }
    let ps = (seconds * 1e12).round();
    // i64 picoseconds cover roughly +/-106 days, the same range as a local time stamp.
    if ps.abs() >= 9.2e18 {
        return None;
    }
    Some(ps as i128)
}

/// Converts picoseconds to seconds.
pub fn ps_as_seconds(ps: i128) -> f64 {
    ps as f64 / 1e12
}
