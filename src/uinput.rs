//! [`InputSink`] backed by a Linux virtual input device
//!
//! uinput pointers are relative, so the sink keeps its own idea of where the
//! pointer is and turns every absolute move into a delta. That only matches
//! the screen when pointer acceleration is off and the tracked origin agrees
//! with the real cursor; use [`UinputSink::set_pointer`] to resynchronize.
//!
//! Requires access to /dev/uinput (typically root or input group membership).

use evdev::uinput::VirtualDevice;
use evdev::{EventType, InputEvent, Key, RelativeAxisType};
use std::collections::HashSet;
use std::thread;
use std::time::Duration;
use tracing::{debug, trace};

use crate::config::DeviceSettings;
use crate::device;
use crate::error::{Error, Result};
use crate::keyboard::char_to_key;
use crate::mouse::MouseButton;
use crate::sink::InputSink;

pub struct UinputSink {
    device: VirtualDevice,
    pointer: (i32, i32),
    pixels_per_notch: f64,
    pending_scroll: (f64, f64),
    held_keys: HashSet<Key>,
    held_buttons: HashSet<MouseButton>,
}

impl UinputSink {
    /// Create the virtual device
    ///
    /// Note: This takes ~1 second as the kernel needs time to recognize the device.
    pub fn new(settings: &DeviceSettings) -> Result<Self> {
        let device = device::create_device(&settings.name)?;
        debug!(name = %settings.name, "virtual device ready");
        Ok(Self {
            device,
            pointer: (settings.origin_x, settings.origin_y),
            pixels_per_notch: settings.pixels_per_notch.max(1.0),
            pending_scroll: (0.0, 0.0),
            held_keys: HashSet::new(),
            held_buttons: HashSet::new(),
        })
    }

    /// Where the sink believes the pointer is
    pub fn pointer(&self) -> (i32, i32) {
        self.pointer
    }

    pub fn set_pointer(&mut self, x: i32, y: i32) {
        self.pointer = (x, y);
    }

    /// Release all currently held keys and mouse buttons
    ///
    /// Called automatically on drop.
    pub fn release_all(&mut self) -> Result<()> {
        let keys: Vec<Key> = self.held_keys.iter().copied().collect();
        let buttons: Vec<MouseButton> = self.held_buttons.iter().copied().collect();
        for key in keys {
            self.key_up(key)?;
        }
        for button in buttons {
            self.release_button(button)?;
        }
        Ok(())
    }

    fn key_down(&mut self, key: Key) -> Result<()> {
        self.held_keys.insert(key);
        self.emit(EventType::KEY, key.code(), 1)
    }

    fn key_up(&mut self, key: Key) -> Result<()> {
        self.held_keys.remove(&key);
        self.emit(EventType::KEY, key.code(), 0)
    }

    fn emit(&mut self, kind: EventType, code: u16, value: i32) -> Result<()> {
        let events = [
            InputEvent::new_now(kind, code, value),
            InputEvent::new_now(EventType::SYNCHRONIZATION, 0, 0), // SYN_REPORT
        ];
        self.device.emit(&events)?;
        Ok(())
    }
}

/// Whole wheel notches contained in `pending`, leaving the remainder behind
fn take_notches(pending: &mut f64, pixels_per_notch: f64) -> i32 {
    let notches = (*pending / pixels_per_notch).trunc();
    *pending -= notches * pixels_per_notch;
    notches as i32
}

impl InputSink for UinputSink {
    fn move_to(&mut self, x: i32, y: i32) -> Result<()> {
        let dx = x - self.pointer.0;
        let dy = y - self.pointer.1;
        self.pointer = (x, y);
        if dx == 0 && dy == 0 {
            return Ok(());
        }
        trace!(dx, dy, "relative move");
        let events = [
            InputEvent::new_now(EventType::RELATIVE, RelativeAxisType::REL_X.0, dx),
            InputEvent::new_now(EventType::RELATIVE, RelativeAxisType::REL_Y.0, dy),
            InputEvent::new_now(EventType::SYNCHRONIZATION, 0, 0), // SYN_REPORT
        ];
        self.device.emit(&events)?;
        Ok(())
    }

    fn press_button(&mut self, button: MouseButton) -> Result<()> {
        self.held_buttons.insert(button);
        self.emit(EventType::KEY, button.to_key().code(), 1)
    }

    fn release_button(&mut self, button: MouseButton) -> Result<()> {
        self.held_buttons.remove(&button);
        self.emit(EventType::KEY, button.to_key().code(), 0)
    }

    fn scroll_by(&mut self, dx: f64, dy: f64) -> Result<()> {
        self.pending_scroll.0 += dx;
        self.pending_scroll.1 += dy;
        let horizontal = take_notches(&mut self.pending_scroll.0, self.pixels_per_notch);
        let vertical = take_notches(&mut self.pending_scroll.1, self.pixels_per_notch);
        if horizontal != 0 {
            self.emit(EventType::RELATIVE, RelativeAxisType::REL_HWHEEL.0, horizontal)?;
        }
        if vertical != 0 {
            // Positive wheel values scroll up
            self.emit(EventType::RELATIVE, RelativeAxisType::REL_WHEEL.0, -vertical)?;
        }
        Ok(())
    }

    fn press_key(&mut self, ch: char) -> Result<()> {
        let (key, needs_shift) = char_to_key(ch).ok_or(Error::UntypableCharacter(ch))?;
        if needs_shift {
            self.key_down(Key::KEY_LEFTSHIFT)?;
        }
        self.key_down(key)?;
        self.key_up(key)?;
        if needs_shift {
            self.key_up(Key::KEY_LEFTSHIFT)?;
        }
        Ok(())
    }

    fn delay(&mut self, ms: u64) -> Result<()> {
        thread::sleep(Duration::from_millis(ms));
        Ok(())
    }
}

impl Drop for UinputSink {
    fn drop(&mut self) {
        // Best-effort cleanup - swallow errors since Drop can't return Result
        let _ = self.release_all();
    }
}
