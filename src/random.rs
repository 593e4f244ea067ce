//! Sampling primitives
//!
//! Every function takes the generator explicitly so callers (and tests) decide
//! how it is seeded.

use rand::Rng;

use crate::error::{Error, Result};

/// Rejections allowed before the polar method gives up.
///
/// A single draw is rejected with probability 1 - pi/4, so this is never hit
/// by a working generator.
const MAX_GAUSSIAN_REJECTIONS: usize = 1000;

/// Linear scaling of a `[0, 1)` draw onto `[min, max)`
///
/// Reversed bounds are allowed and scale the same way.
pub fn uniform<R: Rng + ?Sized>(rng: &mut R, min: f64, max: f64) -> f64 {
    min + (max - min) * rng.gen::<f64>()
}

/// `true` with probability `p`
pub fn chance<R: Rng + ?Sized>(rng: &mut R, p: f64) -> bool {
    rng.gen::<f64>() < p
}

/// Normal deviate via the polar Box-Muller method
pub fn gaussian<R: Rng + ?Sized>(rng: &mut R, mean: f64, stddev: f64) -> Result<f64> {
    for _ in 0..MAX_GAUSSIAN_REJECTIONS {
        let u = uniform(rng, -1.0, 1.0);
        let v = uniform(rng, -1.0, 1.0);
        let s = u * u + v * v;
        if s >= 1.0 || s == 0.0 {
            continue;
        }
        let factor = (-2.0 * s.ln() / s).sqrt();
        return Ok(mean + stddev * u * factor);
    }
    Err(Error::SamplerExhausted)
}

/// Uniform draw rounded to whole milliseconds
pub fn uniform_ms<R: Rng + ?Sized>(rng: &mut R, min: f64, max: f64) -> u64 {
    uniform(rng, min, max).round().max(0.0) as u64
}
