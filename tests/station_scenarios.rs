mod util;

use macsim::{Kernel, StationStatus};

#[test]
fn dispatch_ordering_scenario() {
    let mut kernel = Kernel::new();
    let server = kernel.station_create("S").unwrap();

    kernel.schedule_ns(1, 10, 0).unwrap();
    kernel.schedule_ns(1, 20, 1).unwrap();

    let (_, a) = kernel.extract().unwrap();
    kernel.station_request(server, a);
    kernel.schedule_ns(2, a, 10).unwrap();

    let (_, b) = kernel.extract().unwrap();
    kernel.station_request(server, b);
    kernel.schedule_ns(2, b, 10).unwrap();

    let (_, departing) = kernel.extract().unwrap();
    assert_eq!(10, departing);
    assert_eq!(10, kernel.time_ns());
    kernel.station_leave(server, departing);

    let (kind, re_entry) = kernel.extract().unwrap();
    assert_eq!(1, kind, "dispatch handoff should re-fire the kind the client originally joined under");
    assert_eq!(20, re_entry);
    assert_eq!(StationStatus::Using, kernel.station_request(server, re_entry));

    let (_, departing) = kernel.extract().unwrap();
    assert_eq!(20, departing);
    assert_eq!(11, kernel.time_ns());
    kernel.station_leave(server, departing);

    assert_eq!(0, kernel.station_queue_length(server));
}

#[test]
fn name_collision_scenario() {
    let mut kernel = Kernel::new();
    assert!(kernel.station_create("X").is_some());
    assert!(kernel.station_create("X").is_none());
    assert_eq!(StationStatus::Success, kernel.station_delete("X"));
    assert_eq!(StationStatus::UnknownStation, kernel.station_delete("X"));
}

#[test]
fn prng_determinism_scenario() {
    let mut a = Kernel::new();
    let mut b = Kernel::new();
    a.prng_mut().seed(1, 1973272912);
    b.prng_mut().seed(1, 1973272912);
    assert_eq!(a.prng_mut().random(1), b.prng_mut().random(1));
}

#[test]
fn reset_statistics_preserves_in_flight_client_timestamps() {
    let mut kernel = Kernel::new();
    let server = kernel.station_create("S").unwrap();

    kernel.station_request(server, 1);
    kernel.schedule_ns(1, 1, 1_000_000).unwrap();
    kernel.extract();

    kernel.reset_statistics();
    assert_eq!(kernel.time_ns(), kernel.last_reset_time());

    kernel.station_leave(server, 1);
    let station = kernel.stations().find(|(name, _)| *name == "S").unwrap().1;
    assert_eq!(1, station.total_clients());
    assert_floats_near_equal!(
        1.0,
        station.total_response_time() as f64 / 1_000_000.0,
        "response time should still include the pre-reset wait"
    );
}
