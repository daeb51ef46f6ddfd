/// The only error condition this crate's safe API can hand back to a caller rather than panicking.
///
/// Every other contract violation described in the crate documentation (unknown stations, mismatched
/// client ids on `leave`, out-of-range PRNG stream indices, ...) is treated as a programmer error and
/// panics instead, following the fatal-on-contract-violation discipline of the reference implementation
/// this crate ports.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum Error {
    /// Returned when a caller asks the event queue to schedule something at a time strictly earlier
    /// than the kernel's current simulated time. Rewinding the clock in a discrete-event simulation
    /// should never happen in correct client code, but unlike the other contract violations in this
    /// crate, a host may plausibly want to catch this one and log it rather than crash outright (for
    /// example, while fuzzing a new event handler), so it is modeled as a recoverable error.
    BackInTime,
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            Self::BackInTime => write!(f, "event scheduled for a time earlier than the current simulation clock"),
        }
    }
}

impl std::error::Error for Error {}

/// Convenience alias matching the rest of the crate's fallible signatures.
pub type Result<T = ()> = std::result::Result<T, Error>;
