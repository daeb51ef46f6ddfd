//! # Overview
//!
//! macsim is a discrete-event simulation kernel for queueing networks of named, single-server FIFO
//! stations. A [`Kernel`] owns an event queue, a station registry, 101 independent PRNG streams, and a
//! batch-means output analyzer; host code drives it with its own event-dispatch loop, scheduling and
//! extracting `(kind, client_id)` events and calling station operations as its model requires.
//!
//! * [`Kernel::schedule`] / [`Kernel::extract`] form the event queue: a min-heap over simulated time,
//!   tie-broken by scheduling order.
//! * [`Kernel::station_create`] and the `station_*` family model named, single-server FIFO queues with
//!   automatic dispatch handoff to the next waiting client on `leave`.
//! * [`Kernel::prng_mut`] exposes 101 independent pseudo-random streams and the exponential/uniform
//!   distribution primitives built on them.
//! * [`Kernel::configure_batch_means`] / [`Kernel::observe`] run an online batch-means estimator that
//!   signals when a confidence half-width has fallen under a target relative precision.
//!
//! Every mutating operation takes `&mut Kernel`; nothing in this crate touches process-wide mutable
//! state, so a host may run any number of independent `Kernel`s, including concurrently on separate
//! threads.

mod batch_means;
mod distributions;
mod error;
mod event_queue;
mod kernel;
mod registry;
mod rng;
mod station;

pub use batch_means::BatchMeansResult;
pub use error::{Error, Result};
pub use event_queue::SimTime;
pub use kernel::Kernel;
pub use registry::StationId;
pub use rng::{Prng, STREAM_COUNT};
pub use station::{Station, StationClient, StationState, StationStatus};
