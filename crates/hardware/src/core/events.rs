//! Event Queues.
//!
//! This module implements the per-CPU event queues behind the cycle and step interfaces. It provides:
//! 1. **Event Classes:** Named kinds of events with flags, a callback, and an optional describer.
//! 2. **Queue:** Events ordered by remaining delta, then slot, stable for equal keys.
//! 3. **Dispatch:** `decrement` as time advances and `handle_next` to fire the front event.
//!
//! Deltas are absolute: each event stores the number of cycles (or steps) left until it fires,
//! measured from the current point of the owning clock.

use std::fmt;
use std::sync::Arc;

use tracing::trace;

/// Callback invoked with the event's parameter when it fires.
pub type EventCallback = Arc<dyn Fn(u64) + Send + Sync>;

/// Produces a human-readable description of a pending event from its parameter.
pub type EventDescriber = Arc<dyn Fn(u64) -> String + Send + Sync>;

/// Flags carried by an event class.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct EventFlags(u32);

impl EventFlags {
    /// No flags set.
    pub const NONE: Self = Self(0);
    /// The event synchronises machines and may only go through a global clock.
    pub const MACHINE_SYNC: Self = Self(1 << 0);

    /// Returns `true` if every flag in `other` is also set in `self`.
    pub const fn contains(self, other: Self) -> bool {
        self.0 & other.0 == other.0
    }
}

/// A kind of event that can be posted on a queue.
#[derive(Clone)]
pub struct EventClass {
    /// Class name, reported by `events()`.
    pub name: String,
    /// Posting constraints.
    pub flags: EventFlags,
    /// Fired when an event of this class expires.
    pub callback: Option<EventCallback>,
    /// Optional description for pending events.
    pub describe: Option<EventDescriber>,
}

impl EventClass {
    /// Creates an event class without a callback.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            flags: EventFlags::NONE,
            callback: None,
            describe: None,
        }
    }

    /// Sets the class flags.
    #[must_use]
    pub const fn with_flags(mut self, flags: EventFlags) -> Self {
        self.flags = flags;
        self
    }

    /// Sets the callback fired on expiry.
    #[must_use]
    pub fn with_callback(mut self, callback: impl Fn(u64) + Send + Sync + 'static) -> Self {
        self.callback = Some(Arc::new(callback));
        self
    }

    /// Sets the describer used when listing pending events.
    #[must_use]
    pub fn with_describe(mut self, describe: impl Fn(u64) -> String + Send + Sync + 'static) -> Self {
        self.describe = Some(Arc::new(describe));
        self
    }

    /// Returns `true` if the class carries the machine-sync flag.
    pub const fn is_machine_sync(&self) -> bool {
        self.flags.contains(EventFlags::MACHINE_SYNC)
    }
}

impl fmt::Debug for EventClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventClass")
            .field("name", &self.name)
            .field("flags", &self.flags)
            .field("callback", &self.callback.is_some())
            .field("describe", &self.describe.is_some())
            .finish()
    }
}

/// A pending event.
#[derive(Clone, Debug)]
pub struct Event {
    /// Cycles (or steps) left until the event fires.
    pub delta: u64,
    /// Tie-breaker for events expiring together; lower slots fire first.
    pub slot: i32,
    /// Class the event belongs to.
    pub class: Arc<EventClass>,
    /// Name of the object the event operates on.
    pub obj: Option<String>,
    /// User data handed to the callback.
    pub param: u64,
}

/// Snapshot of a pending event as reported by `events()`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EventInfo {
    /// Object the event operates on.
    pub object: Option<String>,
    /// Event class name.
    pub class: String,
    /// Cycles (or steps) left until the event fires.
    pub delta: u64,
    /// Description from the class describer, or empty.
    pub description: String,
}

/// Selects events by class, object, and parameter.
///
/// A `None` field matches any event.
#[derive(Clone, Copy, Default)]
pub struct EventFilter<'a> {
    /// Class to match (by identity).
    pub class: Option<&'a Arc<EventClass>>,
    /// Object name to match.
    pub obj: Option<&'a str>,
    /// Predicate over the event parameter.
    pub pred: Option<&'a dyn Fn(u64) -> bool>,
}

impl<'a> EventFilter<'a> {
    /// Matches every event of `class`.
    pub fn class(class: &'a Arc<EventClass>) -> Self {
        Self {
            class: Some(class),
            ..Self::default()
        }
    }

    fn matches(&self, e: &Event) -> bool {
        self.class.is_none_or(|c| Arc::ptr_eq(c, &e.class))
            && self.obj.is_none_or(|o| e.obj.as_deref() == Some(o))
            && self.pred.is_none_or(|p| p(e.param))
    }
}

/// An ordered event queue.
#[derive(Debug)]
pub struct EventQueue {
    name: String,
    events: Vec<Event>,
}

impl EventQueue {
    /// Creates an empty queue.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            events: Vec::new(),
        }
    }

    /// Returns the queue name (e.g., `"cycle-queue"`).
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Posts an event `when` units from now.
    ///
    /// The event is placed after every queued event with the same `(delta, slot)` key.
    pub fn post(
        &mut self,
        when: u64,
        slot: i32,
        class: Arc<EventClass>,
        obj: Option<String>,
        param: u64,
    ) {
        let pos = self
            .events
            .partition_point(|e| (e.delta, e.slot) <= (when, slot));
        trace!(queue = %self.name, class = %class.name, when, slot, "post");
        self.events.insert(
            pos,
            Event {
                delta: when,
                slot,
                class,
                obj,
                param,
            },
        );
    }

    /// Advances the queue by `delta` units. Deltas saturate at zero.
    pub fn decrement(&mut self, delta: u64) {
        for e in &mut self.events {
            e.delta = e.delta.saturating_sub(delta);
        }
    }

    /// Returns the delta of the front event, or `None` if the queue is empty.
    pub fn delta(&self) -> Option<u64> {
        self.events.first().map(|e| e.delta)
    }

    /// Removes the front event and fires its class callback.
    ///
    /// # Returns
    ///
    /// The fired event, or `None` if the queue was empty.
    pub fn handle_next(&mut self) -> Option<Event> {
        if self.events.is_empty() {
            return None;
        }
        let e = self.events.remove(0);
        trace!(queue = %self.name, class = %e.class.name, param = e.param, "handle");
        if let Some(cb) = &e.class.callback {
            cb(e.param);
        }
        Some(e)
    }

    /// Returns the delta of the first event matching `filter`.
    pub fn next(&self, filter: &EventFilter<'_>) -> Option<u64> {
        self.events
            .iter()
            .find(|e| filter.matches(e))
            .map(|e| e.delta)
    }

    /// Removes every event matching `filter` and returns how many were removed.
    pub fn remove(&mut self, filter: &EventFilter<'_>) -> usize {
        let before = self.events.len();
        self.events.retain(|e| !filter.matches(e));
        before - self.events.len()
    }

    /// Rescales every delta after a clock frequency change (`delta * old / new`).
    ///
    /// The mapping is monotonic, so queue order is preserved.
    pub fn rescale_time(&mut self, old_freq: u64, new_freq: u64) {
        if new_freq == 0 {
            return;
        }
        for e in &mut self.events {
            let scaled = u128::from(e.delta) * u128::from(old_freq) / u128::from(new_freq);
            e.delta = u64::try_from(scaled).unwrap_or(u64::MAX);
        }
    }

    /// Removes every event without firing it.
    pub fn clear(&mut self) {
        self.events.clear();
    }

    /// Lists the pending events in firing order.
    pub fn events(&self) -> Vec<EventInfo> {
        self.events
            .iter()
            .map(|e| EventInfo {
                object: e.obj.clone(),
                class: e.class.name.clone(),
                delta: e.delta,
                description: e
                    .class
                    .describe
                    .as_ref()
                    .map(|d| d(e.param))
                    .unwrap_or_default(),
            })
            .collect()
    }

    /// Returns `true` if no event is pending.
    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Returns the number of pending events.
    pub fn len(&self) -> usize {
        self.events.len()
    }
}
