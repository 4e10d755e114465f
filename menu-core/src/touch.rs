/// Resistive touch mapping and debouncing
/// Pure functions and small state machines, testable without the panel
use log::debug;

/// Raw 12-bit controller sample.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RawTouch {
    pub x: u16,
    pub y: u16,
    pub z: u16,
}

/// Touch position in screen pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TouchEvent {
    pub x: i32,
    pub y: i32,
}

/// Source of raw samples. `None` when the panel is not pressed.
pub trait TouchPanel {
    fn sample(&mut self) -> Option<RawTouch>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TouchCalibration {
    pub min_x: u16,
    pub max_x: u16,
    pub min_y: u16,
    pub max_y: u16,
    pub width: u16,
    pub height: u16,
    /// Raw x drives screen y (portrait panel in a landscape frame).
    pub swap_xy: bool,
    pub invert_x: bool,
    pub invert_y: bool,
}

impl Default for TouchCalibration {
    fn default() -> Self {
        Self {
            min_x: 200,
            max_x: 3800,
            min_y: 200,
            max_y: 3800,
            width: 320,
            height: 240,
            swap_xy: false,
            invert_x: false,
            invert_y: false,
        }
    }
}

/// Linear range mapping with integer arithmetic, input clamped to range.
fn map_range(value: u16, in_min: u16, in_max: u16, out_max: u16) -> i32 {
    let (lo, hi) = (i32::from(in_min.min(in_max)), i32::from(in_min.max(in_max)));
    if hi == lo {
        return 0;
    }
    let v = i32::from(value).clamp(lo, hi);
    let (in_min, in_max, out_max) = (i32::from(in_min), i32::from(in_max), i32::from(out_max));
    let mapped = (v - in_min) * out_max / (in_max - in_min);
    mapped.clamp(0, out_max)
}

impl TouchCalibration {
    pub fn map(&self, raw: RawTouch) -> TouchEvent {
        let (rx, ry) = if self.swap_xy { (raw.y, raw.x) } else { (raw.x, raw.y) };

        let mut x = map_range(rx, self.min_x, self.max_x, self.width);
        let mut y = map_range(ry, self.min_y, self.max_y, self.height);

        if self.invert_x {
            x = i32::from(self.width) - x;
        }
        if self.invert_y {
            y = i32::from(self.height) - y;
        }

        TouchEvent { x, y }
    }
}

/// Minimum spacing between accepted touches. Samples inside the window are
/// dropped, not queued.
#[derive(Debug, Clone)]
pub struct Debouncer {
    window_ms: u64,
    last_accepted: Option<u64>,
}

impl Debouncer {
    pub fn new(window_ms: u64) -> Self {
        Self {
            window_ms,
            last_accepted: None,
        }
    }

    pub fn accept(&mut self, now_ms: u64) -> bool {
        if let Some(last) = self.last_accepted {
            if now_ms.saturating_sub(last) < self.window_ms {
                return false;
            }
        }
        self.last_accepted = Some(now_ms);
        true
    }
}

/// Calibration plus debounce: raw sample in, at most one logical touch out.
pub struct TouchInput {
    calibration: TouchCalibration,
    debouncer: Debouncer,
}

impl TouchInput {
    pub fn new(calibration: TouchCalibration, debounce_ms: u64) -> Self {
        Self {
            calibration,
            debouncer: Debouncer::new(debounce_ms),
        }
    }

    pub fn process(&mut self, raw: RawTouch, now_ms: u64) -> Option<TouchEvent> {
        if !self.debouncer.accept(now_ms) {
            return None;
        }
        let event = self.calibration.map(raw);
        debug!("Touch at x={}, y={} (raw {},{} z={})", event.x, event.y, raw.x, raw.y, raw.z);
        Some(event)
    }
}
