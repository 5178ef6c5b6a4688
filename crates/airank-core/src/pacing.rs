//! Randomized request pacing
//!
//! Every pause in the pipeline is a uniform random draw from a closed
//! range, so consecutive requests never land on a fixed cadence.

use std::time::Duration;

use rand::Rng;

/// Uniform random delay in `[min, max]`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Jitter {
    min: Duration,
    max: Duration,
}

impl Jitter {
    /// Range in seconds. Bounds are swapped if given in the wrong order;
    /// negative or non-finite bounds collapse to zero.
    pub fn from_secs(min: f64, max: f64) -> Self {
        let min = non_negative(min);
        let max = non_negative(max);
        let (min, max) = if min <= max { (min, max) } else { (max, min) };
        Self {
            min: Duration::from_secs_f64(min),
            max: Duration::from_secs_f64(max),
        }
    }

    /// No delay at all (tests, dry runs)
    pub const fn none() -> Self {
        Self {
            min: Duration::ZERO,
            max: Duration::ZERO,
        }
    }

    pub fn min(&self) -> Duration {
        self.min
    }

    pub fn max(&self) -> Duration {
        self.max
    }

    /// Draw one delay from the range
    pub fn sample(&self) -> Duration {
        if self.min == self.max {
            return self.min;
        }
        let secs = rand::rng().random_range(self.min.as_secs_f64()..=self.max.as_secs_f64());
        Duration::from_secs_f64(secs)
    }

    /// Sleep for a sampled delay and return it
    pub fn pause(&self) -> Duration {
        let delay = self.sample();
        if !delay.is_zero() {
            std::thread::sleep(delay);
        }
        delay
    }
}

fn non_negative(secs: f64) -> f64 {
    if secs.is_finite() && secs > 0.0 {
        secs
    } else {
        0.0
    }
}
