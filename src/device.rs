use evdev::uinput::{VirtualDevice, VirtualDeviceBuilder};
use evdev::{AttributeSet, Key, RelativeAxisType};
use std::thread;
use std::time::Duration;

use crate::error::Result;
use crate::keyboard::{DIGITS, LETTERS, SYMBOLS};

/// Time the kernel needs before a fresh device reliably delivers events
const DEVICE_SETTLE: Duration = Duration::from_secs(1);

/// Create a virtual pointer-and-keyboard device able to emit everything the
/// uinput sink produces
pub fn create_device(name: &str) -> Result<VirtualDevice> {
    let mut keys = AttributeSet::<Key>::new();
    for key in LETTERS.iter().chain(&DIGITS).chain(&SYMBOLS) {
        keys.insert(*key);
    }
    keys.insert(Key::KEY_LEFTSHIFT);
    for key in [
        Key::BTN_LEFT,
        Key::BTN_RIGHT,
        Key::BTN_MIDDLE,
        Key::BTN_SIDE,
        Key::BTN_EXTRA,
    ] {
        keys.insert(key);
    }

    let mut rel_axes = AttributeSet::<RelativeAxisType>::new();
    rel_axes.insert(RelativeAxisType::REL_X);
    rel_axes.insert(RelativeAxisType::REL_Y);
    rel_axes.insert(RelativeAxisType::REL_WHEEL);
    rel_axes.insert(RelativeAxisType::REL_HWHEEL);

    let device = VirtualDeviceBuilder::new()?
        .name(name)
        .with_keys(&keys)?
        .with_relative_axes(&rel_axes)?
        .build()?;

    // Events sent before this are dropped
    thread::sleep(DEVICE_SETTLE);

    Ok(device)
}
