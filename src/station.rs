//! Component D: named FIFO, single-server stations.

use std::collections::VecDeque;

/// Outcome of a registry or request/leave operation, mirroring the reference's integer status codes
/// (`UNKNOWN_STATION = 0`, `SUCCESS = 1`, `WAITING_STATION = 2`, `USING_STATION = 3`) as a proper enum
/// instead, so that misuse is caught at compile time rather than by comparing against a bare integer.
#[non_exhaustive]
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum StationStatus {
    /// No station is registered under the requested name. Corresponds to the reference's
    /// `UNKNOWN_STATION`.
    UnknownStation,
    /// The operation completed normally. Corresponds to the reference's `SUCCESS`.
    Success,
    /// The requesting client was appended to a busy station's queue and must wait for dispatch.
    /// Corresponds to the reference's `WAITING_STATION`.
    Waiting,
    /// The requesting client is now (or still) in service. Corresponds to the reference's
    /// `USING_STATION`.
    Using,
}

/// The derived state of a station, computed on demand from `reschedule_flag` and queue length.
/// Exposed for introspection and tests; the kernel itself never branches on this enum directly.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum StationState {
    /// No clients present.
    Empty,
    /// Exactly one client in service, none waiting.
    Serving,
    /// One client in service, at least one more waiting in the queue.
    ServingWithQueue,
    /// A zero-delay self-event has been scheduled for the new head of the queue and not yet consumed.
    DispatchPending,
}

/// A single client occupying a slot in a station's queue.
///
/// Owned exclusively by its station's queue; created on `request`, destroyed on `leave`.
#[derive(Debug, Clone, Copy)]
pub struct StationClient {
    pub(crate) id: i64,
    pub(crate) station_entry_time: i64,
    pub(crate) server_entry_time: i64,
    pub(crate) event_kind_at_enqueue: i32,
}

impl StationClient {
    /// The client id this record was created for.
    pub fn id(&self) -> i64 {
        self.id
    }

    /// Simulated time at which this client joined the station's queue.
    pub fn station_entry_time(&self) -> i64 {
        self.station_entry_time
    }

    /// Simulated time at which this client entered the server. `0` while still waiting behind a busy
    /// server; stamped when the client is dispatched.
    pub fn server_entry_time(&self) -> i64 {
        self.server_entry_time
    }
}

/// A named, single-server FIFO queue.
///
/// The head of `queue` is always the in-service client; any remaining entries are waiting their turn.
#[derive(Debug, Clone)]
pub struct Station {
    name: String,
    pub(crate) queue: VecDeque<StationClient>,
    pub(crate) reschedule_flag: bool,
    total_service_time: i64,
    total_response_time: i64,
    total_clients: i64,
}

impl Station {
    pub(crate) fn new(name: String) -> Self {
        Self {
            name,
            queue: VecDeque::new(),
            reschedule_flag: false,
            total_service_time: 0,
            total_response_time: 0,
            total_clients: 0,
        }
    }

    /// This station's unique, case-sensitive name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Number of clients currently queued at this station, including the one in service.
    pub fn queue_length(&self) -> usize {
        self.queue.len()
    }

    /// The station's current state, derived from `reschedule_flag` and queue length.
    pub fn state(&self) -> StationState {
        if self.reschedule_flag {
            StationState::DispatchPending
        } else {
            match self.queue.len() {
                0 => StationState::Empty,
                1 => StationState::Serving,
                _ => StationState::ServingWithQueue,
            }
        }
    }

    /// Total number of clients that have departed this station since the last reset.
    pub fn total_clients(&self) -> i64 {
        self.total_clients
    }

    /// Sum, in nanoseconds, of service time (`server_entry_time` to departure) across clients that
    /// have departed since the last reset.
    pub fn total_service_time(&self) -> i64 {
        self.total_service_time
    }

    /// Sum, in nanoseconds, of response time (`station_entry_time` to departure) across clients that
    /// have departed since the last reset.
    pub fn total_response_time(&self) -> i64 {
        self.total_response_time
    }

    /// Zero this station's accounting counters.
    ///
    /// Queue contents and any in-progress clients' `station_entry_time`/`server_entry_time` are left
    /// untouched. This reproduces a known bias in the reference implementation: a client already
    /// waiting or in service when a reset occurs will, on its eventual departure, contribute time
    /// accrued *before* the reset to the freshly-zeroed counters. See `DESIGN.md` for the rationale
    /// for keeping this rather than fixing it.
    pub(crate) fn reset_statistics(&mut self) {
        self.total_service_time = 0;
        self.total_response_time = 0;
        self.total_clients = 0;
    }

    pub(crate) fn record_departure(&mut self, client: &StationClient, current_time: i64) {
        self.total_clients += 1;
        self.total_response_time += current_time - client.station_entry_time;
        self.total_service_time += current_time - client.server_entry_time;
    }
}
