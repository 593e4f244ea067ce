//! Discrete input steps
//!
//! Every behavior is planned as a flat list of steps before anything reaches a
//! sink. The plan can be inspected, serialized, or replayed.

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::mouse::MouseButton;
use crate::path::Path;
use crate::sink::InputSink;

/// A single command for an input sink
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Step {
    /// Absolute pointer position in pixels
    Move { x: i32, y: i32 },
    Press { button: MouseButton },
    Release { button: MouseButton },
    /// Scroll by a pixel delta (positive `dy` scrolls down)
    Scroll { dx: f64, dy: f64 },
    Key { ch: char },
    /// Suspend for this many milliseconds
    Wait { ms: u64 },
}

impl Step {
    /// Issue this step through `sink`
    pub fn apply<S: InputSink + ?Sized>(&self, sink: &mut S) -> Result<()> {
        match *self {
            Step::Move { x, y } => sink.move_to(x, y),
            Step::Press { button } => sink.press_button(button),
            Step::Release { button } => sink.release_button(button),
            Step::Scroll { dx, dy } => sink.scroll_by(dx, dy),
            Step::Key { ch } => sink.press_key(ch),
            Step::Wait { ms } => sink.delay(ms),
        }
    }
}

/// Ordered list of steps
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Schedule(Vec<Step>);

impl Schedule {
    pub fn new() -> Self {
        Self::default()
    }

    /// One move per path point, each followed by its delay
    pub fn from_path(path: &Path) -> Self {
        let mut schedule = Schedule(Vec::with_capacity(path.len() * 2));
        for point in path {
            schedule.push(Step::Move {
                x: point.x,
                y: point.y,
            });
            schedule.wait(point.dt);
        }
        schedule
    }

    pub fn push(&mut self, step: Step) {
        self.0.push(step);
    }

    /// Append a wait; zero-length waits are dropped
    pub fn wait(&mut self, ms: u64) {
        if ms > 0 {
            self.0.push(Step::Wait { ms });
        }
    }

    pub fn steps(&self) -> &[Step] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Total suspension time in milliseconds
    pub fn total_wait_ms(&self) -> u64 {
        self.0
            .iter()
            .map(|step| match step {
                Step::Wait { ms } => *ms,
                _ => 0,
            })
            .sum()
    }

    /// Pointer positions in the order they are visited
    pub fn moves(&self) -> Vec<(i32, i32)> {
        self.0
            .iter()
            .filter_map(|step| match step {
                Step::Move { x, y } => Some((*x, *y)),
                _ => None,
            })
            .collect()
    }

    /// Drive every step through `sink`, stopping at the first failure
    pub fn replay<S: InputSink + ?Sized>(&self, sink: &mut S) -> Result<()> {
        for step in &self.0 {
            step.apply(sink)?;
        }
        Ok(())
    }
}

impl<'a> IntoIterator for &'a Schedule {
    type Item = &'a Step;
    type IntoIter = std::slice::Iter<'a, Step>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}
