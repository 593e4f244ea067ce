//! Keystroke cadence
//!
//! Inter-key delays are Gaussian around a base delay with a hard floor,
//! occasionally interrupted by a longer "thinking" pause, and stretched after
//! punctuation.

use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::Result;
use crate::random::{chance, gaussian, uniform_ms};
use crate::schedule::{Schedule, Step};
use crate::sink::InputSink;

/// Shortest gap ever left after a keystroke
pub const MIN_KEY_DELAY_MS: f64 = 20.0;

const THINKING_PAUSE_PROBABILITY: f64 = 0.08;

/// Characters followed by a short extra pause. The space is included: a
/// word boundary slows the next keystroke the same way punctuation does.
const PAUSE_AFTER: [char; 7] = [',', '.', ' ', ';', ':', '!', '?'];

/// Typing tuning
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TypingConfig {
    /// Mean delay after each keystroke in milliseconds
    pub base_delay: f64,
    /// Standard deviation of that delay in milliseconds
    pub variance: f64,
}

impl Default for TypingConfig {
    fn default() -> Self {
        Self {
            base_delay: 65.0,
            variance: 35.0,
        }
    }
}

/// Plan the keystrokes and pauses for `text`
pub fn plan_typing<R: Rng + ?Sized>(
    rng: &mut R,
    text: &str,
    config: &TypingConfig,
) -> Result<Schedule> {
    let mut schedule = Schedule::new();
    let mut previous = None;

    for (i, ch) in text.chars().enumerate() {
        if i > 0 && chance(rng, THINKING_PAUSE_PROBABILITY) {
            schedule.wait(uniform_ms(rng, 200.0, 600.0));
        }
        if previous.is_some_and(|p| PAUSE_AFTER.contains(&p)) {
            schedule.wait(uniform_ms(rng, 80.0, 200.0));
        }

        schedule.push(Step::Key { ch });

        let delay = gaussian(rng, config.base_delay, config.variance)?;
        schedule.wait(delay.max(MIN_KEY_DELAY_MS).round() as u64);

        previous = Some(ch);
    }

    Ok(schedule)
}

/// Type `text` through `sink` one character at a time
pub fn type_text<S, R>(sink: &mut S, rng: &mut R, text: &str, config: &TypingConfig) -> Result<()>
where
    S: InputSink + ?Sized,
    R: Rng + ?Sized,
{
    let schedule = plan_typing(rng, text, config)?;
    debug!(
        chars = text.chars().count(),
        duration_ms = schedule.total_wait_ms(),
        "typing"
    );
    schedule.replay(sink)
}
