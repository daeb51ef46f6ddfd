//! Compares two M/M/1 configurations — mean service time 1.0 ms vs. 1.8 ms, same mean arrival spacing
//! of 2.0 ms — using the common random numbers (CRN) variance-reduction technique: both runs are fed
//! the same sequence of customers by seeding stream 0 identically and drawing each customer's service
//! time as a uniform draw on arrival (rather than waiting until the customer reaches the server),
//! so the same random number is used for the same purpose in both runs regardless of queueing delay.
//!
//! Each run owns its `Kernel` outright, so the two configurations can run on separate threads without
//! any shared mutable state.

use macsim::Kernel;
use std::collections::HashMap;
use std::thread;

const ARRIVAL: i32 = 1;
const JOIN: i32 = 2;
const DEPARTURE: i32 = 3;

struct Customer {
    arrival_ms: f64,
    service_draw: f64,
}

fn run(seed: i64, mean_service_ms: f64, end_ms: f64) -> (i64, f64) {
    let mut kernel = Kernel::new();
    let server = kernel.station_create("server").unwrap();
    kernel.prng_mut().seed(0, seed);

    let mut customers: HashMap<i64, Customer> = HashMap::new();
    let mut total_clients = 0i64;
    let mut total_response_ms = 0.0;

    kernel.schedule(ARRIVAL, 1, 0.0).unwrap();
    let mut next_client = 2;

    loop {
        let Some((kind, client)) = kernel.extract() else {
            break;
        };
        if kernel.time_ms() > end_ms {
            break;
        }

        match kind {
            ARRIVAL => {
                let service_draw = kernel.prng_mut().random(0);
                customers.insert(
                    client,
                    Customer {
                        arrival_ms: kernel.time_ms(),
                        service_draw,
                    },
                );
                kernel.schedule(JOIN, client, 0.0).unwrap();

                let interarrival = kernel.prng_mut().exponential(2.0);
                kernel.schedule(ARRIVAL, next_client, interarrival).unwrap();
                next_client += 1;
            }
            JOIN => {
                let service_ms = -mean_service_ms * customers[&client].service_draw.ln();
                if kernel.station_request(server, client) == macsim::StationStatus::Using {
                    kernel.schedule(DEPARTURE, client, service_ms).unwrap();
                }
            }
            DEPARTURE => {
                let customer = customers.remove(&client).expect("departure without a recorded arrival");
                total_clients += 1;
                total_response_ms += kernel.time_ms() - customer.arrival_ms;
                kernel.station_leave(server, client);
            }
            _ => unreachable!(),
        }
    }

    (total_clients, total_response_ms)
}

fn main() {
    let seed = 1_973_272_912;

    let low = thread::spawn(move || run(seed, 1.0, 540.0));
    let high = thread::spawn(move || run(seed, 1.8, 540.0));

    let (low_clients, low_total) = low.join().expect("thread should complete normally");
    let (high_clients, high_total) = high.join().expect("thread should complete normally");

    println!("CRN comparison using seed {seed}, both runs fed the same arrival stream:");
    println!(
        "mean service 1.0ms: {low_clients} customers, mean response {:.3}ms",
        low_total / low_clients as f64
    );
    println!(
        "mean service 1.8ms: {high_clients} customers, mean response {:.3}ms",
        high_total / high_clients as f64
    );
}
