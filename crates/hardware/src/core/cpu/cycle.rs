//! Cycle and Frequency Interfaces.
//!
//! Time on the CPU's clock is `time_offset + cycles / freq`. This module provides:
//! 1. **Queries:** Cycle count, frequency, current time, and cycle deltas to a point in time.
//! 2. **Posting:** Events after a number of cycles, seconds, or picoseconds.
//! 3. **Lookup:** Cancelling and finding pending cycle events.
//! 4. **Frequency:** Changing the clock without moving the current time.

use std::sync::Arc;

use tracing::{error, info};

use super::RiscvCpu;
use crate::common::error::PostError;
use crate::core::events::{EventClass, EventFilter, EventInfo};
use crate::core::time;

impl RiscvCpu {
    /// Returns the number of cycles elapsed since reset.
    pub fn get_cycle_count(&self) -> u64 {
        self.current_cycle
    }

    /// Returns the clock frequency in Hz.
    pub fn get_frequency(&self) -> u64 {
        self.freq_hz
    }

    /// Returns the current time in picoseconds.
    pub fn get_time_in_ps(&self) -> Result<i128, PostError> {
        time::get_time_in_big_ps(self.time_offset, self.current_cycle, self.freq_hz)
    }

    /// Returns the current time in seconds.
    pub fn get_time(&self) -> Result<f64, PostError> {
        self.get_time_in_ps().map(time::ps_as_seconds)
    }

    /// Returns the number of cycles from now until `when` seconds (negative if in the past).
    pub fn cycles_delta(&self, when: f64) -> Result<i64, PostError> {
        let ps = time::seconds_as_ps(when).ok_or(PostError::Unrepresentable)?;
        self.cycles_delta_from_ps(ps)
    }

    /// Returns the number of cycles from now until `when` picoseconds, rounding down.
    pub fn cycles_delta_from_ps(&self, when: i128) -> Result<i64, PostError> {
        let cycles = time::ps_as_cc_floor(when - self.time_offset, self.freq_hz)
            .and_then(|c| c.checked_sub(i64::try_from(self.current_cycle).ok()?));
        cycles.ok_or_else(|| {
            error!(
                cpu = %self.name,
                "cycles_delta_from_ps: time delta to {when} ps is too big to be represented in cycles"
            );
            PostError::TooFarAhead
        })
    }

    /// Posts an event `cycles` cycles from now.
    ///
    /// # Arguments
    ///
    /// * `class` - Event class; machine-sync classes are rejected.
    /// * `obj` - Name of the object the event operates on.
    /// * `cycles` - Delay; negative delays are rejected.
    /// * `param` - User data passed to the callback.
    pub fn post_cycle(
        &mut self,
        class: &Arc<EventClass>,
        obj: Option<&str>,
        cycles: i64,
        param: u64,
    ) -> Result<(), PostError> {
        if let Err(e) = time::check_post_cycle_params(cycles, class.flags) {
            error!(cpu = %self.name, class = %class.name, "{e}");
            return Err(e);
        }
        self.cycle_queue.post(
            cycles as u64,
            0,
            Arc::clone(class),
            obj.map(str::to_owned),
            param,
        );
        Ok(())
    }

    /// Posts an event `seconds` from now, rounded to the nearest cycle (at least one).
    pub fn post_time(
        &mut self,
        class: &Arc<EventClass>,
        obj: Option<&str>,
        seconds: f64,
        param: u64,
    ) -> Result<(), PostError> {
        let Some(ps) = time::seconds_as_ps(seconds) else {
            let e = PostError::Unrepresentable;
            error!(cpu = %self.name, class = %class.name, "{e}");
            return Err(e);
        };
        self.post_time_in_big_ps(class, obj, ps, param)
    }

    /// Posts an event `ps` picoseconds from now, rounded to the nearest cycle (at least one).
    pub fn post_time_in_ps(
        &mut self,
        class: &Arc<EventClass>,
        obj: Option<&str>,
        ps: i64,
        param: u64,
    ) -> Result<(), PostError> {
        self.post_time_in_big_ps(class, obj, i128::from(ps), param)
    }

    fn post_time_in_big_ps(
        &mut self,
        class: &Arc<EventClass>,
        obj: Option<&str>,
        ps: i128,
        param: u64,
    ) -> Result<(), PostError> {
        let delta = if ps < 0 {
            Err(PostError::NegativeTime)
        } else {
            time::posting_cycle_delta(ps, self.freq_hz).ok_or(PostError::TooFarAhead)
        };
        let delta = delta.inspect_err(|e| error!(cpu = %self.name, class = %class.name, "{e}"))?;
        let cycles = i64::try_from(delta).map_err(|_| PostError::TooFarAhead)?;
        self.post_cycle(class, obj, cycles, param)
    }

    /// Removes every pending cycle event matching `filter`.
    pub fn cancel(&mut self, filter: &EventFilter<'_>) -> usize {
        self.cycle_queue.remove(filter)
    }

    /// Returns the number of cycles until the next event matching `filter`, or -1.
    pub fn find_next_cycle(&self, filter: &EventFilter<'_>) -> i64 {
        self.cycle_queue
            .next(filter)
            .and_then(|d| i64::try_from(d).ok())
            .unwrap_or(-1)
    }

    /// Returns the time in seconds until the next event matching `filter`, or -1.0.
    pub fn find_next_time(&self, filter: &EventFilter<'_>) -> f64 {
        self.cycle_queue
            .next(filter)
            .map_or(-1.0, |d| time::ps_as_seconds(time::cc_as_ps(d, self.freq_hz)))
    }

    /// Returns the time in picoseconds until the next event matching `filter`.
    ///
    /// `None` if there is no such event or the time does not fit in 64 bits.
    pub fn find_next_time_in_ps(&self, filter: &EventFilter<'_>) -> Option<i64> {
        let cycles = self.cycle_queue.next(filter)?;
        i64::try_from(time::cc_as_ps(cycles, self.freq_hz)).ok()
    }

    /// Lists the pending cycle events in firing order.
    ///
    /// Each entry reports the absolute number of cycles left until the event fires.
    pub fn events(&self) -> Vec<EventInfo> {
        self.cycle_queue.events()
    }

    /// Changes the clock frequency to `numerator / denominator` Hz, rounded, at least 1 Hz.
    ///
    /// The time offset is adjusted so the current time does not move. Pending cycle
    /// deltas are scaled by `old / new`. A zero argument is reported and treated as 1 Hz.
    pub fn set_frequency(&mut self, numerator: u64, denominator: u64) {
        let old_freq = self.freq_hz;
        let new_freq = if numerator == 0 || denominator == 0 {
            error!(cpu = %self.name, "Got invalid frequency from bus, setting to 1 Hz");
            1
        } else {
            let rounded =
                (u128::from(numerator) + u128::from(denominator / 2)) / u128::from(denominator);
            u64::try_from(rounded).unwrap_or(u64::MAX).max(1)
        };

        if old_freq != 0 {
            match time::adjusted_time_offset(self.time_offset, self.current_cycle, old_freq, new_freq)
            {
                Ok(offset) => self.time_offset = offset,
                Err(e) => error!(cpu = %self.name, "{e}"),
            }
            self.cycle_queue.rescale_time(old_freq, new_freq);
        }
        self.freq_hz = new_freq;
        info!(cpu = %self.name, old_freq, new_freq, "frequency changed");
    }
}
