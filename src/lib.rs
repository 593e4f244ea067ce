//! Human-looking pointer motion and keystroke timing
//!
//! Moves follow a single-arc cubic Bezier sampled by Fitts's Law, eased with
//! smootherstep, shaken by tremor that fades toward the target, and sometimes
//! overshoot and correct. Clicks, scrolls, idle drift and typing get
//! randomized human-scale pauses. Everything is planned as a [`Schedule`] of
//! discrete steps and replayed through an [`InputSink`].
//!
//! # Example
//! ```
//! use humanctl::{BoundingBox, MotionConfig, MotionController, Point2D, RecordingSink};
//!
//! let mut ctl = MotionController::seeded(7, Some(Point2D::new(0.0, 0.0)));
//! let mut sink = RecordingSink::new();
//! let button = BoundingBox::new(300.0, 200.0, 80.0, 24.0);
//! let point = ctl
//!     .move_and_click(&mut sink, &button, "ok", &MotionConfig::default())
//!     .unwrap();
//! assert_eq!(ctl.position(), point);
//! ```

pub mod bezier;
pub mod config;
pub mod error;
pub mod motion;
pub mod mouse;
pub mod path;
pub mod random;
pub mod schedule;
pub mod sink;
pub mod typing;
pub mod vector;

#[cfg(feature = "uinput")]
mod device;
#[cfg(feature = "uinput")]
pub mod keyboard;
#[cfg(feature = "uinput")]
pub mod uinput;

pub use config::{Config, DeviceSettings};
pub use error::{Error, Result};
pub use motion::{BoundingBox, ClickObserver, MotionController, NoopObserver, TracingObserver};
pub use mouse::MouseButton;
pub use path::{generate_overshoot_path, generate_path, MotionConfig, Path, PathPoint};
pub use schedule::{Schedule, Step};
pub use sink::{InputSink, RecordingSink};
pub use typing::{type_text, TypingConfig};
#[cfg(feature = "uinput")]
pub use uinput::UinputSink;
pub use vector::Point2D;
