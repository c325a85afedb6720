//! Wall-clock instrumentation.  The numbers are reported, never acted
//! upon.

use std::fmt;
use std::time::{Duration, Instant};

/// A running wall-clock timer.
#[derive(Copy, Clone, Debug)]
pub struct Stopwatch(Instant);

impl Stopwatch {
    /// Start timing now.
    pub fn start() -> Self {
        Stopwatch(Instant::now())
    }

    /// Time since `start`.
    pub fn elapsed(&self) -> Duration {
        self.0.elapsed()
    }
}

/// What the coordinator reports at the end of a run.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct Timings {
    /// How long the coordinator spent rendering its own band.
    pub runtime: Duration,
    /// From the pre-gather barrier to the assembled image.
    pub communication: Duration,
}

impl fmt::Display for Timings {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        writeln!(f, "Runtime: {:.6} seconds", self.runtime.as_secs_f64())?;
        write!(f, "Communication Time: {:.6} seconds", self.communication.as_secs_f64())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stopwatch_moves_forward() {
        let watch = Stopwatch::start();
        let first = watch.elapsed();
        assert!(watch.elapsed() >= first);
    }

    #[test]
    fn report_has_both_lines() {
        let timings = Timings {
            runtime: Duration::from_millis(1500),
            communication: Duration::from_micros(250),
        };
        assert_eq!(
            timings.to_string(),
            "Runtime: 1.500000 seconds\nCommunication Time: 0.000250 seconds"
        );
    }
}
