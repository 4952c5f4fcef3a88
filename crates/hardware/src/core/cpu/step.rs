//! Step Interface.
//!
//! A step is one executed instruction. Step events fire after a number of steps
//! rather than cycles; `advance` consumes steps without executing anything.

use std::sync::Arc;

use tracing::{error, info};

use super::RiscvCpu;
use crate::common::error::PostError;
use crate::core::events::{EventClass, EventFilter, EventInfo};

impl RiscvCpu {
    /// Returns the number of steps taken since reset.
    pub fn get_step_count(&self) -> u64 {
        self.current_step
    }

    /// Posts an event `steps` steps from now.
    pub fn post_step(
        &mut self,
        class: &Arc<EventClass>,
        obj: Option<&str>,
        steps: i64,
        param: u64,
    ) -> Result<(), PostError> {
        if steps < 0 {
            let e = PostError::NegativeTime;
            error!(cpu = %self.name, class = %class.name, "{e}");
            return Err(e);
        }
        self.step_queue.post(
            steps as u64,
            0,
            Arc::clone(class),
            obj.map(str::to_owned),
            param,
        );
        Ok(())
    }

    /// Removes every pending step event matching `filter`.
    pub fn cancel_step(&mut self, filter: &EventFilter<'_>) -> usize {
        self.step_queue.remove(filter)
    }

    /// Returns the number of steps until the next event matching `filter`, or -1.
    pub fn find_next_step(&self, filter: &EventFilter<'_>) -> i64 {
        self.step_queue
            .next(filter)
            .and_then(|d| i64::try_from(d).ok())
            .unwrap_or(-1)
    }

    /// Lists the pending step events in firing order.
    pub fn step_events(&self) -> Vec<EventInfo> {
        self.step_queue.events()
    }

    /// Consumes `steps` steps without executing instructions.
    ///
    /// Step events that become due fire if the CPU is running.
    ///
    /// # Returns
    ///
    /// The number of steps consumed.
    pub fn advance(&mut self, steps: u64) -> u64 {
        info!(cpu = %self.name, steps, "Advancing CPU");
        self.inc_steps(steps);
        self.handle_events();
        steps
    }
}
