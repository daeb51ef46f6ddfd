//! The top-level [`Kernel`] value: one owned context tying the event queue, station registry, PRNG,
//! and batch-means analyzer together, analogous to the host library's own `Simulation` struct but
//! specialized for a concrete queueing-network domain instead of generic over `SimState`/`Event`.

use crate::batch_means::{BatchMeans, BatchMeansResult};
use crate::event_queue::{EventQueue, SimTime};
use crate::rng::Prng;
use crate::registry::{StationId, StationRegistry};
use crate::station::{Station, StationStatus};

/// Trace level reserved for the kernel's own diagnostics (dispatch handoffs, station creation and
/// deletion). Host code should use higher levels via [`Kernel::trace_msg`].
const KERNEL_TRACE_LEVEL: i32 = 1;

/// The single value a host constructs to run a simulation: an event queue, a station registry, 101
/// PRNG streams, and a batch-means output analyzer, all owned directly rather than reached through
/// process-wide mutable state.
///
/// `Kernel` imposes no event-dispatch loop of its own. A host drives it with its own
/// `while let Some((kind, client)) = kernel.extract() { ... }` loop, dispatching on `kind` however its
/// model requires.
#[derive(Debug, Default)]
pub struct Kernel {
    event_queue: EventQueue,
    stations: StationRegistry,
    prng: Prng,
    batch_means: BatchMeans,
    trace_level: i32,
    /// Simulated time at which statistics were last reset, shared across every station the way the
    /// reference's single process-wide `last_reset_time` is, rather than tracked per station.
    last_reset_time: i64,
}

impl Kernel {
    /// Construct a fresh kernel: an empty event queue at time zero, no registered stations, a new set
    /// of 101 PRNG streams, an unconfigured batch-means analyzer, and tracing disabled.
    pub fn new() -> Self {
        Self::default()
    }

    // -- clock --------------------------------------------------------------------------------

    /// Current simulated time, in nanoseconds.
    pub fn time_ns(&self) -> i64 {
        self.event_queue.current_time().as_nanos()
    }

    /// Current simulated time, in fractional milliseconds.
    pub fn time_ms(&self) -> f64 {
        self.event_queue.current_time().as_millis_f64()
    }

    // -- event queue ----------------------------------------------------------------------------

    /// Schedule `kind`/`client_id` at `current_time + delay_ms` milliseconds.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::BackInTime`] if the resulting deadline would precede the current time.
    pub fn schedule(&mut self, kind: i32, client_id: i64, delay_ms: f64) -> crate::Result {
        self.event_queue.schedule(kind, client_id, delay_ms)
    }

    /// Schedule `kind`/`client_id` at `current_time + delay_ns` nanoseconds.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::BackInTime`] if the resulting deadline would precede the current time.
    pub fn schedule_ns(&mut self, kind: i32, client_id: i64, delay_ns: i64) -> crate::Result {
        self.event_queue.schedule_ns(kind, client_id, delay_ns)
    }

    /// Pop the minimum-deadline event, advance the clock to its deadline, and return its
    /// `(kind, client_id)` payload. Returns `None` once the queue is drained.
    pub fn extract(&mut self) -> Option<(i32, i64)> {
        self.event_queue.extract()
    }

    /// Number of events currently pending.
    pub fn pending_events(&self) -> usize {
        self.event_queue.len()
    }

    // -- stations: registry ----------------------------------------------------------------------

    /// Register a new station named `name`. Returns `None` if that name is already taken.
    pub fn station_create(&mut self, name: &str) -> Option<StationId> {
        let id = self.stations.create(name)?;
        self.trace_msg(KERNEL_TRACE_LEVEL, &format!("station '{name}' created"));
        Some(id)
    }

    /// Unregister the station named `name`. Returns `UnknownStation` if no such station exists,
    /// otherwise `Success`. Invalidates any [`StationId`] previously obtained for that station.
    pub fn station_delete(&mut self, name: &str) -> StationStatus {
        let status = self.stations.delete(name);
        if status == StationStatus::Success {
            self.trace_msg(KERNEL_TRACE_LEVEL, &format!("station '{name}' deleted"));
        }
        status
    }

    /// Look up a registered station's handle by name.
    pub fn station_get(&self, name: &str) -> Option<StationId> {
        self.stations.get(name)
    }

    /// Number of currently registered stations.
    pub fn num_stations(&self) -> usize {
        self.stations.len()
    }

    /// Queue length (including any client in service) of the station `id` refers to.
    ///
    /// # Panics
    ///
    /// Panics if `id` refers to a station that has since been deleted.
    pub fn station_queue_length(&self, id: StationId) -> usize {
        self.stations.resolve(id).queue_length()
    }

    /// Name of the station `id` refers to.
    ///
    /// # Panics
    ///
    /// Panics if `id` refers to a station that has since been deleted.
    pub fn station_name(&self, id: StationId) -> &str {
        self.stations.resolve(id).name()
    }

    /// Iterate over every registered station by name, in unspecified order.
    pub fn stations(&self) -> impl Iterator<Item = (&str, &Station)> {
        self.stations.iter()
    }

    // -- stations: request/leave -----------------------------------------------------------------

    /// Request service at the station `station` refers to, for `client_id`.
    ///
    /// Three cases, checked in order:
    /// 1. **Dispatch handoff** — if a reschedule is pending and `client_id` matches the current head
    ///    of the queue, stamps `server_entry_time` on that client, clears the pending reschedule, and
    ///    returns [`StationStatus::Using`] without otherwise touching the queue.
    /// 2. **Empty station** — enqueues a new client that immediately becomes the sole occupant and
    ///    returns `Using`.
    /// 3. **Busy station** — enqueues a new client behind the one in service and returns
    ///    [`StationStatus::Waiting`]; its `server_entry_time` is stamped later, on dispatch.
    ///
    /// # Panics
    ///
    /// Panics if `station` refers to a station that has since been deleted.
    pub fn station_request(&mut self, station: StationId, client_id: i64) -> StationStatus {
        let now = self.time_ns();
        let event_kind = self.event_queue.current_event_kind();
        let st = self.stations.resolve_mut(station);
        request_on(st, now, event_kind, client_id)
    }

    /// Same as [`Kernel::station_request`], but looks `name` up first.
    ///
    /// # Panics
    ///
    /// Panics if no station is registered under `name`, or if `client_id` already has an entry in
    /// that station's queue (a duplicate request for the same client is always a host bug).
    pub fn station_request_by_name(&mut self, name: &str, client_id: i64) -> StationStatus {
        let id = self
            .stations
            .get(name)
            .unwrap_or_else(|| panic!("kernel: unknown station '{name}'"));
        let now = self.time_ns();
        let event_kind = self.event_queue.current_event_kind();
        let st = self.stations.resolve_mut(id);
        assert!(
            !st.queue.iter().any(|c| c.id() == client_id),
            "kernel: client {client_id} already queued at station '{name}'"
        );
        request_on(st, now, event_kind, client_id)
    }

    /// Remove the client currently in service at the station `station` refers to.
    ///
    /// Updates that station's running totals, and if another client is now waiting, schedules a
    /// zero-delay event carrying the departed client's event kind and the new head's id, so the host's
    /// own handler for that kind dispatches the next client by calling `station_request` again.
    ///
    /// # Panics
    ///
    /// Panics if `station` refers to a deleted station, if the station's queue is empty, or if
    /// `client_id` doesn't match the client currently in service.
    pub fn station_leave(&mut self, station: StationId, client_id: i64) {
        let now = self.time_ns();
        let next_dispatch = {
            let st = self.stations.resolve_mut(station);
            leave_on(st, now, client_id)
        };
        if let Some((kind, next_id)) = next_dispatch {
            self.event_queue
                .schedule_ns(kind, next_id, 0)
                .expect("kernel: zero-delay dispatch handoff cannot be scheduled into the past");
        }
    }

    /// Same as [`Kernel::station_leave`], but looks `name` up first.
    ///
    /// # Panics
    ///
    /// Panics if no station is registered under `name`, in addition to the panics documented on
    /// [`Kernel::station_leave`].
    pub fn station_leave_by_name(&mut self, name: &str, client_id: i64) {
        let id = self
            .stations
            .get(name)
            .unwrap_or_else(|| panic!("kernel: unknown station '{name}'"));
        self.station_leave(id, client_id);
    }

    // -- stations: statistics --------------------------------------------------------------------

    /// Zero accounting counters across every registered station and record the reset time.
    ///
    /// Queue contents and any in-progress clients' timestamps are left untouched; see
    /// [`crate::station::Station::reset_statistics`] for the known bias this preserves.
    pub fn reset_statistics(&mut self) {
        self.last_reset_time = self.time_ns();
        self.stations.reset_all_statistics();
    }

    /// The simulated time at which statistics were last reset (or `0` if never).
    pub fn last_reset_time(&self) -> i64 {
        self.last_reset_time
    }

    /// Format a per-station report of mean service time, mean response time, mean queue wait, total
    /// clients, throughput, and utilization, print it to stdout, and return it as an owned `String`.
    pub fn report(&self) -> String {
        use std::fmt::Write as _;

        let now = self.time_ns();
        let elapsed_ms = (now - self.last_reset_time) as f64 / 1_000_000.0;
        let mut out = String::new();
        let _ = writeln!(out, "RESULTADOS DE LA SIMULACIÓN");

        for (name, station) in self.stations.iter() {
            let total_clients = station.total_clients();

            let mean_service_ms = if total_clients > 0 {
                station.total_service_time() as f64 / total_clients as f64 / 1_000_000.0
            } else {
                0.0
            };
            let mean_response_ms = if total_clients > 0 {
                station.total_response_time() as f64 / total_clients as f64 / 1_000_000.0
            } else {
                0.0
            };
            let mean_wait_ms = mean_response_ms - mean_service_ms;
            let throughput_per_ms = if elapsed_ms > 0.0 {
                total_clients as f64 / elapsed_ms
            } else {
                0.0
            };
            let utilization = throughput_per_ms * mean_service_ms;

            let _ = writeln!(out);
            let _ = writeln!(out, "ESTACION: {name}");
            let _ = writeln!(
                out,
                "{:<20}  {:<20}  {:<20}  {:<20}  {:<20}  {:<20}",
                "SERVICIO", "RESPUESTA", "ESPERA", "CLIENTES", "RENDIMIENTO", "UTILIZACION"
            );
            let _ = writeln!(
                out,
                "{mean_service_ms:<20.4}  {mean_response_ms:<20.4}  {mean_wait_ms:<20.4}  {total_clients:<20}  \
                 {throughput_per_ms:<20.4}  {utilization:<20.4}"
            );
        }

        print!("{out}");
        out
    }

    // -- PRNG -------------------------------------------------------------------------------------

    /// Mutable access to the kernel's 101 PRNG streams and the distribution primitives built on them.
    pub fn prng_mut(&mut self) -> &mut Prng {
        &mut self.prng
    }

    // -- batch-means --------------------------------------------------------------------------------

    /// Reset and (re)configure the batch-means analyzer. See
    /// [`crate::batch_means::BatchMeans::configure`] for parameter semantics.
    pub fn configure_batch_means(&mut self, transient_obs: u64, batch_size: u64, precision: f64, confidence_level: f64) {
        self.batch_means.configure(transient_obs, batch_size, precision, confidence_level);
    }

    /// Feed one scalar observation to the batch-means analyzer. Returns `true` once the confidence
    /// half-width relative to the grand mean has fallen at or below the configured precision.
    pub fn observe(&mut self, value: f64) -> bool {
        self.batch_means.observe(value)
    }

    /// The most recent batch-means estimate, or `None` until at least 10 batches have completed.
    pub fn batch_means_result(&self) -> Option<BatchMeansResult> {
        self.batch_means.result()
    }

    // -- tracing ------------------------------------------------------------------------------------

    /// Set the trace threshold. `0` disables tracing entirely; level 1 is reserved for the kernel's
    /// own diagnostics, higher levels are free for host code via [`Kernel::trace_msg`].
    pub fn trace(&mut self, level: i32) {
        self.trace_level = level;
    }

    /// Emit a diagnostic event at `level`, gated by the configured trace threshold. A message is
    /// emitted only when tracing is enabled and `level` is at or above the configured threshold.
    pub fn trace_msg(&self, level: i32, msg: &str) {
        if self.trace_level > 0 && level >= self.trace_level {
            tracing::event!(tracing::Level::TRACE, time_ms = self.time_ms(), trace_level = level, "{msg}");
        }
    }
}

fn request_on(st: &mut Station, now: i64, event_kind: i32, client_id: i64) -> StationStatus {
    if st.reschedule_flag {
        if let Some(head) = st.queue.front_mut() {
            if head.id() == client_id {
                head.server_entry_time = now;
                st.reschedule_flag = false;
                return StationStatus::Using;
            }
        }
    }

    let was_empty = st.queue.is_empty();
    st.queue.push_back(crate::station::StationClient {
        id: client_id,
        station_entry_time: now,
        server_entry_time: if was_empty { now } else { 0 },
        event_kind_at_enqueue: event_kind,
    });

    if was_empty {
        StationStatus::Using
    } else {
        StationStatus::Waiting
    }
}

fn leave_on(st: &mut Station, now: i64, client_id: i64) -> Option<(i32, i64)> {
    let departed = st
        .queue
        .pop_front()
        .unwrap_or_else(|| panic!("kernel: leave called on an empty station"));
    assert_eq!(
        departed.id(),
        client_id,
        "kernel: leave called with client {client_id}, but the client in service is {}",
        departed.id()
    );

    st.record_departure(&departed, now);

    st.queue.front().map(|next| {
        st.reschedule_flag = true;
        (departed.event_kind_at_enqueue, next.id())
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn create_then_request_returns_using_on_empty_station() {
        let mut k = Kernel::new();
        let s = k.station_create("cpu").unwrap();
        assert_eq!(StationStatus::Using, k.station_request(s, 1));
        assert_eq!(1, k.station_queue_length(s));
    }

    #[test]
    fn second_request_on_busy_station_waits() {
        let mut k = Kernel::new();
        let s = k.station_create("cpu").unwrap();
        k.station_request(s, 1);
        assert_eq!(StationStatus::Waiting, k.station_request(s, 2));
        assert_eq!(2, k.station_queue_length(s));
    }

    #[test]
    fn leave_schedules_zero_delay_dispatch_for_new_head() {
        let mut k = Kernel::new();
        let s = k.station_create("cpu").unwrap();
        k.schedule(1, 1, 0.0).unwrap();
        k.extract();
        k.station_request(s, 1);
        k.schedule(1, 2, 0.0).unwrap();
        k.extract();
        k.station_request(s, 2);

        let now = k.time_ns();
        k.station_leave(s, 1);
        assert_eq!(1, k.pending_events(), "a zero-delay handoff event should now be pending");

        let (kind, client) = k.extract().unwrap();
        assert_eq!(1, kind);
        assert_eq!(2, client);
        assert_eq!(now, k.time_ns(), "zero-delay handoff should not advance the clock");

        assert_eq!(StationStatus::Using, k.station_request(s, 2));
    }

    #[test]
    #[should_panic(expected = "leave called on an empty station")]
    fn leave_on_empty_station_panics() {
        let mut k = Kernel::new();
        let s = k.station_create("cpu").unwrap();
        k.station_leave(s, 1);
    }

    #[test]
    #[should_panic(expected = "client in service is")]
    fn leave_with_mismatched_client_id_panics() {
        let mut k = Kernel::new();
        let s = k.station_create("cpu").unwrap();
        k.station_request(s, 1);
        k.station_leave(s, 99);
    }

    #[test]
    fn station_create_rejects_duplicate_names() {
        let mut k = Kernel::new();
        assert!(k.station_create("X").is_some());
        assert!(k.station_create("X").is_none());
    }

    #[test]
    fn station_delete_then_get_reports_unknown() {
        let mut k = Kernel::new();
        k.station_create("X").unwrap();
        assert_eq!(StationStatus::Success, k.station_delete("X"));
        assert_eq!(StationStatus::UnknownStation, k.station_delete("X"));
        assert!(k.station_get("X").is_none());
    }

    #[test]
    #[should_panic(expected = "already queued")]
    fn request_by_name_rejects_duplicate_client_id() {
        let mut k = Kernel::new();
        k.station_create("cpu").unwrap();
        k.station_request_by_name("cpu", 1);
        k.station_request_by_name("cpu", 1);
    }

    #[test]
    fn dispatch_ordering_scenario_matches_expected_totals() {
        let mut k = Kernel::new();
        let s = k.station_create("S").unwrap();

        k.schedule_ns(1, 10, 0).unwrap();
        k.schedule_ns(1, 20, 1).unwrap();

        let (_, a) = k.extract().unwrap();
        k.station_request(s, a);
        k.schedule_ns(2, a, 10).unwrap();

        let (_, b) = k.extract().unwrap();
        k.station_request(s, b);
        k.schedule_ns(2, b, 10).unwrap();

        let (_, client) = k.extract().unwrap();
        assert_eq!(10, client);
        assert_eq!(10, k.time_ns());
        k.station_leave(s, client);

        k.extract();
        assert_eq!(StationStatus::Using, k.station_request(s, 20));

        let (_, client) = k.extract().unwrap();
        assert_eq!(20, client);
        assert_eq!(11, k.time_ns());
        k.station_leave(s, client);

        let station = k.stations.resolve(s);
        assert_eq!(2, station.total_clients());
        assert_eq!(10 + 10, station.total_response_time());
    }
}
