//! Stateful pointer driver
//!
//! [`MotionController`] owns its belief of where the pointer is and drives
//! planned paths, clicks, scrolls and idle drift through an [`InputSink`].
//! One controller per pointer: every operation takes `&mut self`, and if
//! something else moves the pointer the caller resynchronizes with
//! [`MotionController::set_position`].

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{debug, info, trace};

use crate::error::Result;
use crate::mouse::MouseButton;
use crate::path::{generate_overshoot_path, generate_path, should_overshoot, MotionConfig, Path};
use crate::random::{gaussian, uniform, uniform_ms};
use crate::schedule::{Schedule, Step};
use crate::sink::InputSink;
use crate::typing::{self, TypingConfig};
use crate::vector::Point2D;

/// Region a controller starts in when no position is given
const DEFAULT_START_X: (f64, f64) = (100.0, 400.0);
const DEFAULT_START_Y: (f64, f64) = (100.0, 300.0);

/// Fraction of an element's size kept clear on each side when aiming
const ELEMENT_PADDING: f64 = 0.15;

pub const DEFAULT_IDLE_DRIFT_MS: u64 = 2000;

/// Caller-supplied element geometry in screen pixels
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl BoundingBox {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Uniform point inside the inner 70% of the box on each axis
    pub fn aim_point<R: Rng + ?Sized>(&self, rng: &mut R) -> Point2D {
        let pad_x = self.width * ELEMENT_PADDING;
        let pad_y = self.height * ELEMENT_PADDING;
        Point2D::new(
            self.x + uniform(rng, pad_x, self.width - pad_x),
            self.y + uniform(rng, pad_y, self.height - pad_y),
        )
    }
}

/// Hook notified after each completed move-and-click
pub trait ClickObserver: Send + Sync {
    fn on_click(&self, label: &str, point: Point2D);
}

/// Observer that does nothing
pub struct NoopObserver;

impl ClickObserver for NoopObserver {
    fn on_click(&self, _label: &str, _point: Point2D) {}
}

/// Observer that reports clicks as `info` events
pub struct TracingObserver;

impl ClickObserver for TracingObserver {
    fn on_click(&self, label: &str, point: Point2D) {
        info!(label, x = point.x, y = point.y, "clicked");
    }
}

/// Drives one pointer with human-looking motion
pub struct MotionController<R = StdRng> {
    position: Point2D,
    rng: R,
    observer: Arc<dyn ClickObserver>,
}

impl MotionController<StdRng> {
    /// Controller seeded from OS entropy
    pub fn new(start: Option<Point2D>) -> Self {
        Self::with_rng(StdRng::from_entropy(), start)
    }

    /// Controller with a reproducible random stream
    pub fn seeded(seed: u64, start: Option<Point2D>) -> Self {
        Self::with_rng(StdRng::seed_from_u64(seed), start)
    }
}

impl<R: Rng> MotionController<R> {
    pub fn with_rng(mut rng: R, start: Option<Point2D>) -> Self {
        let position = start.unwrap_or_else(|| {
            Point2D::new(
                uniform(&mut rng, DEFAULT_START_X.0, DEFAULT_START_X.1),
                uniform(&mut rng, DEFAULT_START_Y.0, DEFAULT_START_Y.1),
            )
        });
        Self {
            position,
            rng,
            observer: Arc::new(NoopObserver),
        }
    }

    pub fn with_observer(mut self, observer: Arc<dyn ClickObserver>) -> Self {
        self.observer = observer;
        self
    }

    /// Where the controller believes the pointer is
    pub fn position(&self) -> Point2D {
        self.position
    }

    /// Resynchronize after the pointer was moved behind the controller's back
    pub fn set_position(&mut self, position: Point2D) {
        debug!(x = position.x, y = position.y, "position resynchronized");
        self.position = position;
    }

    pub fn rng_mut(&mut self) -> &mut R {
        &mut self.rng
    }

    /// Plan a move from the current position, overshooting on long moves
    pub fn plan_path(&mut self, target: Point2D, config: &MotionConfig) -> Result<Path> {
        let distance = self.position.distance(target);
        if should_overshoot(&mut self.rng, distance, config) {
            trace!(distance, "overshooting");
            generate_overshoot_path(&mut self.rng, self.position, target, config)
        } else {
            generate_path(&mut self.rng, self.position, target, config)
        }
    }

    /// Move the pointer to `target` along a planned path
    ///
    /// Afterwards the controller sits exactly on `target`, not on the rounded
    /// last sample.
    pub fn move_to<S: InputSink + ?Sized>(
        &mut self,
        sink: &mut S,
        target: Point2D,
        config: &MotionConfig,
    ) -> Result<()> {
        let path = self.plan_path(target, config)?;
        debug!(
            from_x = self.position.x,
            from_y = self.position.y,
            to_x = target.x,
            to_y = target.y,
            points = path.len(),
            duration_ms = path.duration_ms(),
            "moving"
        );
        self.run(sink, &Schedule::from_path(&path))?;
        self.position = target;
        Ok(())
    }

    /// Move to a random point well inside `element` and return it
    pub fn move_to_element<S: InputSink + ?Sized>(
        &mut self,
        sink: &mut S,
        element: &BoundingBox,
        config: &MotionConfig,
    ) -> Result<Point2D> {
        let target = element.aim_point(&mut self.rng);
        let config = config.with_target_width(element.width);
        self.move_to(sink, target, &config)?;
        Ok(target)
    }

    /// Dwell, press, hold, release, settle
    pub fn plan_click(&mut self, button: MouseButton) -> Schedule {
        let mut schedule = Schedule::new();
        schedule.wait(uniform_ms(&mut self.rng, 60.0, 180.0));
        schedule.push(Step::Press { button });
        schedule.wait(uniform_ms(&mut self.rng, 50.0, 120.0));
        schedule.push(Step::Release { button });
        schedule.wait(uniform_ms(&mut self.rng, 80.0, 200.0));
        schedule
    }

    pub fn click<S: InputSink + ?Sized>(&mut self, sink: &mut S, button: MouseButton) -> Result<()> {
        let schedule = self.plan_click(button);
        self.run(sink, &schedule)
    }

    /// Move onto `element`, hover briefly, left-click, and report the point
    pub fn move_and_click<S: InputSink + ?Sized>(
        &mut self,
        sink: &mut S,
        element: &BoundingBox,
        label: &str,
        config: &MotionConfig,
    ) -> Result<Point2D> {
        let point = self.move_to_element(sink, element, config)?;
        let hover = uniform_ms(&mut self.rng, 100.0, 400.0);
        sink.delay(hover)?;
        self.click(sink, MouseButton::Left)?;
        self.observer.on_click(label, point);
        Ok(point)
    }

    /// Small random pointer wander lasting `duration_ms` in total
    pub fn idle_drift<S: InputSink + ?Sized>(&mut self, sink: &mut S, duration_ms: u64) -> Result<()> {
        let (schedule, end) = self.plan_idle_drift(duration_ms)?;
        debug!(duration_ms, moves = schedule.moves().len(), "idle drift");
        self.run(sink, &schedule)?;
        self.position = end;
        Ok(())
    }

    /// Drift steps plus the unrounded position they end on
    ///
    /// The last pause is cut short so the pauses add up to exactly
    /// `duration_ms`.
    pub fn plan_idle_drift(&mut self, duration_ms: u64) -> Result<(Schedule, Point2D)> {
        let mut schedule = Schedule::new();
        let mut position = self.position;
        let mut elapsed = 0;

        while elapsed < duration_ms {
            position = position
                + Point2D::new(
                    gaussian(&mut self.rng, 0.0, 3.0)?,
                    gaussian(&mut self.rng, 0.0, 3.0)?,
                );
            let (x, y) = position.rounded();
            schedule.push(Step::Move { x, y });

            let pause = uniform_ms(&mut self.rng, 150.0, 400.0).min(duration_ms - elapsed);
            schedule.wait(pause);
            elapsed += pause;
        }

        Ok((schedule, position))
    }

    /// Scroll vertically by roughly `delta_y` pixels in a few uneven flicks
    pub fn plan_scroll(&mut self, delta_y: f64) -> Result<Schedule> {
        let steps = uniform(&mut self.rng, 3.0, 6.0).round() as usize;
        let share = delta_y / steps as f64;

        let mut schedule = Schedule::new();
        for i in 0..steps {
            let amount = share + gaussian(&mut self.rng, 0.0, 0.15 * share.abs())?;
            schedule.push(Step::Scroll { dx: 0.0, dy: amount });
            if i + 1 < steps {
                schedule.wait(uniform_ms(&mut self.rng, 60.0, 150.0));
            } else {
                schedule.wait(uniform_ms(&mut self.rng, 200.0, 500.0));
            }
        }
        Ok(schedule)
    }

    pub fn human_scroll<S: InputSink + ?Sized>(&mut self, sink: &mut S, delta_y: f64) -> Result<()> {
        let schedule = self.plan_scroll(delta_y)?;
        debug!(delta_y, flicks = schedule.len() / 2, "scrolling");
        self.run(sink, &schedule)
    }

    /// Type `text` using this controller's random stream
    pub fn type_text<S: InputSink + ?Sized>(
        &mut self,
        sink: &mut S,
        text: &str,
        config: &TypingConfig,
    ) -> Result<()> {
        typing::type_text(sink, &mut self.rng, text, config)
    }

    /// Replay `schedule`, tracking every pointer move as it is issued
    fn run<S: InputSink + ?Sized>(&mut self, sink: &mut S, schedule: &Schedule) -> Result<()> {
        for step in schedule {
            trace!(?step, "step");
            step.apply(sink)?;
            if let Step::Move { x, y } = *step {
                self.position = Point2D::new(x as f64, y as f64);
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sink::RecordingSink;
    use std::sync::Mutex;

    fn controller(seed: u64) -> MotionController {
        MotionController::seeded(seed, Some(Point2D::new(0.0, 0.0)))
    }

    #[test]
    fn default_start_is_upper_left() {
        for seed in 0..100 {
            let p = MotionController::seeded(seed, None).position();
            assert!((100.0..400.0).contains(&p.x) && (100.0..300.0).contains(&p.y));
        }
    }

    #[test]
    fn move_lands_exactly_on_target() {
        let mut ctl = controller(1);
        let mut sink = RecordingSink::new();
        let target = Point2D::new(812.4, 377.6);
        ctl.move_to(&mut sink, target, &MotionConfig::default()).unwrap();
        assert_eq!(ctl.position(), target);
        assert_eq!(sink.pointer(), Some((812, 378)));
    }

    #[test]
    fn aim_point_stays_inside_padding() {
        let mut ctl = controller(2);
        let element = BoundingBox::new(100.0, 100.0, 40.0, 20.0);
        for _ in 0..500 {
            let p = element.aim_point(ctl.rng_mut());
            assert!((106.0..=134.0).contains(&p.x), "x {}", p.x);
            assert!((103.0..=117.0).contains(&p.y), "y {}", p.y);
        }
    }

    #[test]
    fn click_sequence() {
        let mut ctl = controller(3);
        let mut sink = RecordingSink::new();
        ctl.click(&mut sink, MouseButton::Right).unwrap();
        let steps = sink.steps();
        assert_eq!(steps.len(), 5);
        assert!(matches!(steps[0], Step::Wait { ms } if (60..=180).contains(&ms)));
        assert_eq!(steps[1], Step::Press { button: MouseButton::Right });
        assert!(matches!(steps[2], Step::Wait { ms } if (50..=120).contains(&ms)));
        assert_eq!(steps[3], Step::Release { button: MouseButton::Right });
        assert!(matches!(steps[4], Step::Wait { ms } if (80..=200).contains(&ms)));
    }

    #[derive(Default)]
    struct Collect(Mutex<Vec<(String, Point2D)>>);

    impl ClickObserver for Collect {
        fn on_click(&self, label: &str, point: Point2D) {
            self.0.lock().unwrap().push((label.to_string(), point));
        }
    }

    #[test]
    fn move_and_click_reports_to_observer() {
        let observer = Arc::new(Collect::default());
        let mut ctl = controller(4).with_observer(observer.clone());
        let mut sink = RecordingSink::new();
        let element = BoundingBox::new(500.0, 300.0, 120.0, 40.0);
        let point = ctl
            .move_and_click(&mut sink, &element, "submit", &MotionConfig::default())
            .unwrap();

        let seen = observer.0.lock().unwrap();
        assert_eq!(seen.as_slice(), &[("submit".to_string(), point)]);
        assert_eq!(ctl.position(), point);

        // Pointer reaches the point before the button goes down
        let press = sink
            .steps()
            .iter()
            .position(|s| matches!(s, Step::Press { .. }))
            .unwrap();
        let last_move = sink
            .steps()
            .iter()
            .rposition(|s| matches!(s, Step::Move { .. }))
            .unwrap();
        assert!(last_move < press);
        assert_eq!(sink.pointer(), Some(point.rounded()));
    }

    #[test]
    fn idle_drift_totals_requested_duration() {
        for duration in [0, 1, 150, 2000, 7777] {
            let mut ctl = controller(5);
            let mut sink = RecordingSink::new();
            ctl.idle_drift(&mut sink, duration).unwrap();
            assert_eq!(sink.elapsed_ms(), duration);
        }
    }

    #[test]
    fn idle_drift_stays_close() {
        let mut ctl = controller(6);
        let mut sink = RecordingSink::new();
        ctl.idle_drift(&mut sink, DEFAULT_IDLE_DRIFT_MS).unwrap();
        let moves = sink.steps().iter().filter(|s| matches!(s, Step::Move { .. })).count();
        // Pauses of 150..400ms over two seconds
        assert!((5..=14).contains(&moves), "moves {}", moves);
        assert!(ctl.position().magnitude() < 60.0);
    }

    #[test]
    fn scroll_flicks_add_up() {
        for seed in 0..200 {
            let mut ctl = controller(seed);
            let schedule = ctl.plan_scroll(600.0).unwrap();
            let flicks: Vec<f64> = schedule
                .steps()
                .iter()
                .filter_map(|s| match s {
                    Step::Scroll { dx, dy } => {
                        assert_eq!(*dx, 0.0);
                        Some(*dy)
                    }
                    _ => None,
                })
                .collect();
            assert!((3..=6).contains(&flicks.len()));
            let total: f64 = flicks.iter().sum();
            // Each flick has sd 15% of its share; sum sd is at most 0.15 * 600 / sqrt(3)
            assert!((total - 600.0).abs() < 250.0, "total {}", total);

            let waits = schedule.steps().iter().filter(|s| matches!(s, Step::Wait { .. })).count();
            assert_eq!(waits, flicks.len());
            assert!(matches!(schedule.steps().last(), Some(Step::Wait { ms }) if (200..=500).contains(ms)));
        }
    }

    #[test]
    fn zero_scroll_is_quiet() {
        let mut ctl = controller(7);
        let schedule = ctl.plan_scroll(0.0).unwrap();
        assert!(schedule
            .steps()
            .iter()
            .all(|s| !matches!(s, Step::Scroll { dy, .. } if *dy != 0.0)));
    }

    #[test]
    fn failed_move_keeps_last_issued_position() {
        let mut ctl = controller(8);
        let mut sink = RecordingSink::new().fail_after(6);
        let result = ctl.move_to(&mut sink, Point2D::new(400.0, 0.0), &MotionConfig::default());
        assert!(result.is_err());
        let (x, y) = sink.pointer().unwrap();
        assert_eq!(ctl.position(), Point2D::new(x as f64, y as f64));
    }

    #[test]
    fn set_position_resynchronizes() {
        let mut ctl = controller(9);
        ctl.set_position(Point2D::new(50.0, 60.0));
        let mut sink = RecordingSink::new();
        ctl.move_to(&mut sink, Point2D::new(50.4, 60.2), &MotionConfig::default())
            .unwrap();
        // Sub-pixel move from the new position: a single point, no delay
        assert_eq!(sink.steps(), &[Step::Move { x: 50, y: 60 }]);
    }
}
