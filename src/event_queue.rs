//! Component C: the global event queue and simulated clock.
//!
//! Adapts the host library's `EventQueue`/`EventHolder` min-heap pattern (a [`BinaryHeap`] of
//! [`std::cmp::Reverse`]-wrapped holders, tie-broken by insertion order) to a concrete nanosecond clock
//! and a plain `(kind, client_id)` event payload, since this kernel's events are opaque tags dispatched
//! entirely by host code rather than a generic, user-implemented `Event` trait.

use std::cmp::{Ordering, Reverse};
use std::collections::BinaryHeap;

/// Simulated time, in nanoseconds. Monotone non-decreasing once wrapped in an [`EventQueue`]; only
/// [`EventQueue::extract`] ever advances it.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Default)]
pub struct SimTime(i64);

impl SimTime {
    /// The simulated time as whole nanoseconds.
    pub fn as_nanos(self) -> i64 {
        self.0
    }

    /// The simulated time in fractional milliseconds.
    pub fn as_millis_f64(self) -> f64 {
        self.0 as f64 / 1_000_000.0
    }
}

impl std::fmt::Display for SimTime {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "{:.4}ms", self.as_millis_f64())
    }
}

#[derive(Debug)]
struct EventHolder {
    execution_time: i64,
    kind: i32,
    client_id: i64,
    insertion_sequence: u64,
}

impl PartialEq for EventHolder {
    fn eq(&self, other: &Self) -> bool {
        self.execution_time == other.execution_time && self.insertion_sequence == other.insertion_sequence
    }
}

impl Eq for EventHolder {}

impl PartialOrd for EventHolder {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for EventHolder {
    fn cmp(&self, other: &Self) -> Ordering {
        match self.execution_time.cmp(&other.execution_time) {
            Ordering::Equal => self.insertion_sequence.cmp(&other.insertion_sequence),
            ordering => ordering,
        }
    }
}

/// The global priority queue of scheduled events, min-heap ordered by execution time.
///
/// Events execute in ascending order of execution time, with ties broken by the order in which they
/// were scheduled, mirroring the host library's own `EventQueue` tie-break discipline.
#[derive(Debug, Default)]
pub struct EventQueue {
    events: BinaryHeap<Reverse<EventHolder>>,
    current_time: i64,
    events_added: u64,
    current_event: i32,
}

impl EventQueue {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// The kernel's current simulated time.
    pub fn current_time(&self) -> SimTime {
        SimTime(self.current_time)
    }

    /// The `kind` of the most recently extracted event, or `0` before the first `extract`.
    ///
    /// Used by the station model to tag newly enqueued clients with the event that caused them to
    /// request a station.
    pub(crate) fn current_event_kind(&self) -> i32 {
        self.current_event
    }

    /// Schedule `kind`/`client_id` at `current_time + round(delay_ms * 1e6)` nanoseconds.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::BackInTime`] if the computed deadline is strictly earlier than
    /// `current_time`, leaving the queue unmodified.
    pub fn schedule(&mut self, kind: i32, client_id: i64, delay_ms: f64) -> crate::Result {
        let delay_ns = (delay_ms * 1_000_000.0).round() as i64;
        self.schedule_ns(kind, client_id, delay_ns)
    }

    /// Schedule `kind`/`client_id` at `current_time + delay_ns` nanoseconds. `delay_ns == 0` is
    /// permitted and is exactly the mechanism the station model uses for dispatch handoff.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::BackInTime`] if the computed deadline is strictly earlier than
    /// `current_time`, leaving the queue unmodified.
    pub fn schedule_ns(&mut self, kind: i32, client_id: i64, delay_ns: i64) -> crate::Result {
        let execution_time = self.current_time + delay_ns;
        if execution_time < self.current_time {
            return Err(crate::Error::BackInTime);
        }

        let insertion_sequence = self.events_added;
        self.events_added += 1;
        self.events.push(Reverse(EventHolder {
            execution_time,
            kind,
            client_id,
            insertion_sequence,
        }));
        Ok(())
    }

    /// Pop the minimum-deadline event, advance `current_time` to its deadline, and return its
    /// `(kind, client_id)` payload. Returns `None` on an empty queue rather than panicking, since
    /// draining the queue is an ordinary host-visible termination condition.
    pub fn extract(&mut self) -> Option<(i32, i64)> {
        let Reverse(holder) = self.events.pop()?;
        self.current_time = holder.execution_time;
        self.current_event = holder.kind;
        Some((holder.kind, holder.client_id))
    }

    /// Number of events currently pending.
    pub fn len(&self) -> usize {
        self.events.len()
    }

    /// Whether the queue currently holds no pending events.
    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }
}

impl std::fmt::Display for EventQueue {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(
            f,
            "EventQueue with {} scheduled events at current time {}",
            self.events.len(),
            self.current_time()
        )
    }
}
