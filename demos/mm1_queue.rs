//! An M/M/1 queue, run to a batch-means-determined stopping point rather than a fixed clock cutoff.
//!
//! Arrivals are exponential with mean spacing 2.0 ms, services exponential with mean 1.0 ms (so
//! ρ = 0.5). Response time of each departing customer is fed to the batch-means analyzer; the
//! simulation stops once the analyzer reports a half-width within 2% of the grand mean, then prints
//! the station report.
//!
//! Arrival and queue-join are modeled as two distinct event kinds rather than one, because a station's
//! dispatch handoff re-fires whatever kind a client originally joined its queue under: if "join" and
//! "generate the next arrival" were the same kind, a dispatched client's re-entry would incorrectly
//! trigger another external arrival.

use macsim::{Kernel, StationStatus};
use std::collections::HashMap;

const ARRIVAL: i32 = 1;
const JOIN: i32 = 2;
const DEPARTURE: i32 = 3;

fn main() {
    let mut kernel = Kernel::new();
    let server = kernel.station_create("server").unwrap();
    kernel.configure_batch_means(100, 200, 0.02, 0.95);

    let mut arrival_times: HashMap<i64, f64> = HashMap::new();

    kernel.schedule(ARRIVAL, 1, 0.0).unwrap();
    let mut next_client = 2;

    loop {
        let Some((kind, client)) = kernel.extract() else {
            break;
        };

        match kind {
            ARRIVAL => {
                arrival_times.insert(client, kernel.time_ms());
                kernel.schedule(JOIN, client, 0.0).unwrap();

                let interarrival = kernel.prng_mut().exponential(2.0);
                kernel.schedule(ARRIVAL, next_client, interarrival).unwrap();
                next_client += 1;
            }
            JOIN => {
                if kernel.station_request(server, client) == StationStatus::Using {
                    let service = kernel.prng_mut().exponential(1.0);
                    kernel.schedule(DEPARTURE, client, service).unwrap();
                }
            }
            DEPARTURE => {
                let arrived = arrival_times.remove(&client).expect("departure without a recorded arrival");
                let response_ms = kernel.time_ms() - arrived;
                kernel.station_leave(server, client);
                if kernel.observe(response_ms) {
                    break;
                }
            }
            _ => unreachable!(),
        }
    }

    let result = kernel.batch_means_result();
    println!(
        "stopped at t={:.1}ms after {} batches",
        kernel.time_ms(),
        result.map(|r| r.num_batches).unwrap_or(0)
    );
    println!("{}", kernel.report());
}
