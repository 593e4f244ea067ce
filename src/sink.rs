//! The consumer side of synthesized input

use crate::error::{Error, Result};
use crate::mouse::MouseButton;
use crate::schedule::Step;

/// Anything that can receive pointer, keyboard and timing commands
///
/// Errors are passed straight back to the caller; nothing in this crate
/// retries a failed call.
pub trait InputSink {
    /// Move the pointer to an absolute position
    fn move_to(&mut self, x: i32, y: i32) -> Result<()>;
    fn press_button(&mut self, button: MouseButton) -> Result<()>;
    fn release_button(&mut self, button: MouseButton) -> Result<()>;
    /// Scroll by a pixel delta (positive `dy` scrolls down)
    fn scroll_by(&mut self, dx: f64, dy: f64) -> Result<()>;
    /// Press and release the key that produces `ch`
    fn press_key(&mut self, ch: char) -> Result<()>;
    /// Suspend for `ms` milliseconds
    fn delay(&mut self, ms: u64) -> Result<()>;
}

impl<S: InputSink + ?Sized> InputSink for &mut S {
    fn move_to(&mut self, x: i32, y: i32) -> Result<()> {
        (**self).move_to(x, y)
    }

    fn press_button(&mut self, button: MouseButton) -> Result<()> {
        (**self).press_button(button)
    }

    fn release_button(&mut self, button: MouseButton) -> Result<()> {
        (**self).release_button(button)
    }

    fn scroll_by(&mut self, dx: f64, dy: f64) -> Result<()> {
        (**self).scroll_by(dx, dy)
    }

    fn press_key(&mut self, ch: char) -> Result<()> {
        (**self).press_key(ch)
    }

    fn delay(&mut self, ms: u64) -> Result<()> {
        (**self).delay(ms)
    }
}

/// Sink that records every call instead of acting on it
///
/// Delays are summed, not slept, so whole sessions replay instantly. Used by
/// the test suite and by `humanctl --dry-run`.
#[derive(Debug, Default)]
pub struct RecordingSink {
    steps: Vec<Step>,
    elapsed_ms: u64,
    fail_after: Option<usize>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Accept `calls` calls, then fail every one after that
    pub fn fail_after(mut self, calls: usize) -> Self {
        self.fail_after = Some(calls);
        self
    }

    pub fn steps(&self) -> &[Step] {
        &self.steps
    }

    pub fn into_steps(self) -> Vec<Step> {
        self.steps
    }

    /// Sum of all recorded delays
    pub fn elapsed_ms(&self) -> u64 {
        self.elapsed_ms
    }

    /// Waits in the order they were requested
    pub fn waits(&self) -> Vec<u64> {
        self.steps
            .iter()
            .filter_map(|step| match step {
                Step::Wait { ms } => Some(*ms),
                _ => None,
            })
            .collect()
    }

    /// Last pointer position issued, if any
    pub fn pointer(&self) -> Option<(i32, i32)> {
        self.steps.iter().rev().find_map(|step| match step {
            Step::Move { x, y } => Some((*x, *y)),
            _ => None,
        })
    }

    fn record(&mut self, step: Step) -> Result<()> {
        if let Some(limit) = self.fail_after {
            if self.steps.len() >= limit {
                return Err(Error::Sink(format!(
                    "recording sink closed after {} calls",
                    limit
                )));
            }
        }
        if let Step::Wait { ms } = step {
            self.elapsed_ms += ms;
        }
        self.steps.push(step);
        Ok(())
    }
}

impl InputSink for RecordingSink {
    fn move_to(&mut self, x: i32, y: i32) -> Result<()> {
        self.record(Step::Move { x, y })
    }

    fn press_button(&mut self, button: MouseButton) -> Result<()> {
        self.record(Step::Press { button })
    }

    fn release_button(&mut self, button: MouseButton) -> Result<()> {
        self.record(Step::Release { button })
    }

    fn scroll_by(&mut self, dx: f64, dy: f64) -> Result<()> {
        self.record(Step::Scroll { dx, dy })
    }

    fn press_key(&mut self, ch: char) -> Result<()> {
        self.record(Step::Key { ch })
    }

    fn delay(&mut self, ms: u64) -> Result<()> {
        self.record(Step::Wait { ms })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn records_in_order() {
        let mut sink = RecordingSink::new();
        sink.move_to(1, 2).unwrap();
        sink.delay(30).unwrap();
        sink.press_key('a').unwrap();
        sink.delay(12).unwrap();
        assert_eq!(sink.elapsed_ms(), 42);
        assert_eq!(sink.waits(), vec![30, 12]);
        assert_eq!(sink.pointer(), Some((1, 2)));
        assert_eq!(sink.steps().len(), 4);
    }

    #[test]
    fn failure_is_reported_and_not_recorded() {
        let mut sink = RecordingSink::new().fail_after(1);
        sink.move_to(0, 0).unwrap();
        let err = sink.move_to(5, 5).unwrap_err();
        assert!(matches!(err, Error::Sink(_)));
        assert_eq!(sink.pointer(), Some((0, 0)));
    }

    #[test]
    fn works_through_trait_objects() {
        let mut sink = RecordingSink::new();
        {
            let dyn_sink: &mut dyn InputSink = &mut sink;
            dyn_sink.press_button(MouseButton::Middle).unwrap();
        }
        assert_eq!(sink.steps(), &[Step::Press { button: MouseButton::Middle }]);
    }
}
