//! Per-token animation: exponential approach toward a target point, and opacity fade.

/// Distance (per axis, in layout units) under which a token counts as arrived.
pub const ARRIVAL_EPSILON: f32 = 1.0;

/// Fully opaque token.
pub const OPAQUE: u8 = 255;

/// Point in board-local layout units; (0, 0) is the top-left corner of cell (0, 0).
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

/// Current and target position of a token.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Motion {
    pub current: Point,
    pub target: Point,
}

impl Motion {
    /// Resting motion: already at `at`.
    pub const fn at(at: Point) -> Self {
        Self {
            current: at,
            target: at,
        }
    }

    /// Start at `from` and head for `to`.
    pub const fn from_to(from: Point, to: Point) -> Self {
        Self {
            current: from,
            target: to,
        }
    }

    pub fn retarget(&mut self, to: Point) {
        self.target = to;
    }

    /// Both axes within [`ARRIVAL_EPSILON`] of the target.
    pub fn arrived(&self) -> bool {
        (self.target.x - self.current.x).abs() < ARRIVAL_EPSILON
            && (self.target.y - self.current.y).abs() < ARRIVAL_EPSILON
    }

    /// One step of exponential approach. `rate` is in (0, 1]; the remaining
    /// distance shrinks by a factor of `1 - rate` per call, and the position
    /// snaps onto the target once it is within the arrival epsilon.
    pub fn advance(&mut self, rate: f32) {
        self.current.x += (self.target.x - self.current.x) * rate;
        self.current.y += (self.target.y - self.current.y) * rate;
        if self.arrived() {
            self.current = self.target;
        }
    }
}

/// Opacity after one fade step, floored at 0.
#[inline]
pub fn fade(opacity: u8, step: u8) -> u8 {
    opacity.saturating_sub(step)
}
