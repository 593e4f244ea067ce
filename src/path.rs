//! Time-stamped pointer paths
//!
//! A path is a list of integer pixel positions, each paired with the number of
//! milliseconds to wait after the pointer reaches it. Point count follows
//! Fitts's Law, positions follow a single-arc cubic Bezier with smootherstep
//! easing, and a little Gaussian tremor is layered on top that dies out as the
//! pointer reaches its target.

use rand::Rng;
use serde::{Deserialize, Serialize};
use std::f64::consts::PI;

use crate::bezier::{bezier_control_points, cubic_bezier, smootherstep};
use crate::error::{Error, Result};
use crate::random::{chance, gaussian, uniform, uniform_ms};
use crate::vector::Point2D;

pub const DEFAULT_TREMOR: f64 = 1.2;
pub const DEFAULT_TARGET_WIDTH: f64 = 50.0;
pub const DEFAULT_OVERSHOOT_THRESHOLD: f64 = 300.0;

/// Fewest points a planned (non-degenerate) path gets
const MIN_STEPS: usize = 15;
/// Slope applied to the Fitts index of difficulty
const FITTS_SCALE: f64 = 18.0;

/// Probability of overshooting once a move is long enough
const OVERSHOOT_PROBABILITY: f64 = 0.7;
/// Tremor multiplier on the fast outbound leg
const OUTBOUND_TREMOR_SCALE: f64 = 1.3;
/// Tremor multiplier on the slow correction leg
const CORRECTION_TREMOR_SCALE: f64 = 0.6;

/// Motion tuning. Unset fields take their documented default.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MotionConfig {
    /// Tremor standard deviation in pixels at the start of a move (default 1.2)
    pub tremor: Option<f64>,
    /// Maximum sideways bulge of the curve in pixels (default 30% of distance)
    pub spread: Option<f64>,
    /// Fixed point count, bypassing Fitts's Law
    pub steps: Option<usize>,
    /// Width of the thing being aimed at in pixels (default 50)
    pub target_width: Option<f64>,
    /// Moves longer than this may overshoot (default 300)
    pub overshoot_threshold: Option<f64>,
}

impl MotionConfig {
    pub fn tremor(&self) -> f64 {
        self.tremor.unwrap_or(DEFAULT_TREMOR)
    }

    /// Never below one pixel, so the Fitts index stays finite
    pub fn target_width(&self) -> f64 {
        self.target_width.unwrap_or(DEFAULT_TARGET_WIDTH).max(1.0)
    }

    pub fn overshoot_threshold(&self) -> f64 {
        self.overshoot_threshold
            .unwrap_or(DEFAULT_OVERSHOOT_THRESHOLD)
    }

    pub fn with_target_width(mut self, width: f64) -> Self {
        self.target_width = Some(width);
        self
    }

    pub fn with_tremor(mut self, tremor: f64) -> Self {
        self.tremor = Some(tremor);
        self
    }

    pub fn with_steps(mut self, steps: usize) -> Self {
        self.steps = Some(steps);
        self
    }
}

/// One sample of a path
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PathPoint {
    pub x: i32,
    pub y: i32,
    /// Milliseconds to wait after reaching this point
    pub dt: u64,
}

/// Non-empty, time-ordered list of path points ending exactly on the target
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Path(Vec<PathPoint>);

impl Path {
    fn single(x: i32, y: i32) -> Self {
        Path(vec![PathPoint { x, y, dt: 0 }])
    }

    pub fn points(&self) -> &[PathPoint] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Always false; kept for clippy's `len_without_is_empty`
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn first(&self) -> PathPoint {
        self.0[0]
    }

    pub fn last(&self) -> PathPoint {
        self.0[self.0.len() - 1]
    }

    fn last_mut(&mut self) -> &mut PathPoint {
        let idx = self.0.len() - 1;
        &mut self.0[idx]
    }

    pub fn iter(&self) -> std::slice::Iter<'_, PathPoint> {
        self.0.iter()
    }

    /// Sum of every point's delay
    pub fn duration_ms(&self) -> u64 {
        self.0.iter().map(|p| p.dt).sum()
    }

    fn append(&mut self, other: Path) {
        self.0.extend(other.0);
    }
}

impl<'a> IntoIterator for &'a Path {
    type Item = &'a PathPoint;
    type IntoIter = std::slice::Iter<'a, PathPoint>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

/// Number of points for a move of `distance` pixels
///
/// `max(15, round(log2(distance / target_width + 1) * 18 + uniform(5, 15)))`,
/// unless the config pins a count.
pub fn step_count<R: Rng + ?Sized>(rng: &mut R, distance: f64, config: &MotionConfig) -> usize {
    if let Some(steps) = config.steps {
        return steps.max(1);
    }
    let difficulty = (distance / config.target_width() + 1.0).log2();
    let steps = (difficulty * FITTS_SCALE + uniform(rng, 5.0, 15.0)).round();
    (steps as usize).max(MIN_STEPS)
}

fn check_endpoints(from: Point2D, to: Point2D) -> Result<()> {
    if from.is_finite() && to.is_finite() {
        Ok(())
    } else {
        Err(Error::Config(format!(
            "cannot plan a move from ({}, {}) to ({}, {})",
            from.x, from.y, to.x, to.y
        )))
    }
}

/// Plan a direct move from `from` to `to`
///
/// The pointer is assumed to already sit on `from`, so the path starts one
/// sample in. Moves shorter than a pixel collapse to a single point with no
/// delay. Non-finite endpoints are rejected.
pub fn generate_path<R: Rng + ?Sized>(
    rng: &mut R,
    from: Point2D,
    to: Point2D,
    config: &MotionConfig,
) -> Result<Path> {
    check_endpoints(from, to)?;
    let (target_x, target_y) = to.rounded();
    let distance = from.distance(to);
    if distance < 1.0 {
        return Ok(Path::single(target_x, target_y));
    }

    let steps = step_count(rng, distance, config);
    let (c1, c2) = bezier_control_points(rng, from, to, config.spread);
    let tremor = config.tremor();

    let mut points = Vec::with_capacity(steps);
    for i in 1..=steps {
        let t = i as f64 / steps as f64;
        let base = cubic_bezier(from, c1, c2, to, smootherstep(t));

        let sigma = tremor * (1.0 - t * t);
        let x = base.x + gaussian(rng, 0.0, sigma)?;
        let y = base.y + gaussian(rng, 0.0, sigma)?;

        // Slow at both ends, fastest mid-path
        let speed = 0.3 + 0.7 * (PI * t).sin();
        let dt = (uniform(rng, 4.0, 12.0) / speed.max(0.3)).round() as u64;

        points.push(PathPoint {
            x: x.round() as i32,
            y: y.round() as i32,
            dt,
        });
    }

    let mut path = Path(points);
    *path.last_mut() = PathPoint {
        x: target_x,
        y: target_y,
        dt: uniform_ms(rng, 2.0, 6.0),
    };
    Ok(path)
}

/// Plan a move that sails past `to`, hesitates, then corrects back onto it
pub fn generate_overshoot_path<R: Rng + ?Sized>(
    rng: &mut R,
    from: Point2D,
    to: Point2D,
    config: &MotionConfig,
) -> Result<Path> {
    check_endpoints(from, to)?;
    let delta = to - from;
    let direction = delta.unit();
    let overshoot = uniform(rng, 8.0, (0.08 * delta.magnitude()).min(35.0));
    let sideways = gaussian(rng, 0.0, 0.4 * overshoot)?;
    let apex = to + direction * overshoot + direction.perpendicular() * sideways;

    let tremor = config.tremor();
    let outbound = MotionConfig {
        tremor: Some(tremor * OUTBOUND_TREMOR_SCALE),
        ..*config
    };
    let mut path = generate_path(rng, from, apex, &outbound)?;
    // Hesitation at the apex before the correction starts
    path.last_mut().dt = uniform_ms(rng, 40.0, 120.0);

    let correction = MotionConfig {
        tremor: Some(tremor * CORRECTION_TREMOR_SCALE),
        steps: Some(uniform(rng, 8.0, 18.0).round() as usize),
        ..*config
    };
    path.append(generate_path(rng, apex, to, &correction)?);
    Ok(path)
}

/// Whether a move of `distance` pixels should use the overshoot variant
pub fn should_overshoot<R: Rng + ?Sized>(rng: &mut R, distance: f64, config: &MotionConfig) -> bool {
    distance > config.overshoot_threshold() && chance(rng, OVERSHOOT_PROBABILITY)
}
