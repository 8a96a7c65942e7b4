//! Screen-space geometry used by the freeze state machine.
//!
//! All coordinates are in Windows virtual-screen pixels: the origin is the
//! top-left corner of the primary monitor and secondary monitors may have
//! negative coordinates.

use std::fmt;

use serde::{Deserialize, Serialize};

/// An absolute cursor position in virtual-screen pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

impl Point {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

impl From<(i32, i32)> for Point {
    fn from((x, y): (i32, i32)) -> Self {
        Self { x, y }
    }
}

impl fmt::Display for Point {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// A cursor confinement rectangle.
///
/// Mirrors the Win32 `RECT` layout: `right` and `bottom` are exclusive, so a
/// rectangle covering a 1920×1080 monitor is `{0, 0, 1920, 1080}`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ClipRect {
    pub left: i32,
    pub top: i32,
    pub right: i32,
    pub bottom: i32,
}

impl ClipRect {
    pub const fn new(left: i32, top: i32, right: i32, bottom: i32) -> Self {
        Self {
            left,
            top,
            right,
            bottom,
        }
    }

    /// Builds a rectangle from an origin and a size.
    pub const fn from_origin_size(x: i32, y: i32, width: i32, height: i32) -> Self {
        Self::new(x, y, x + width, y + height)
    }

    pub const fn width(&self) -> i32 {
        self.right - self.left
    }

    pub const fn height(&self) -> i32 {
        self.bottom - self.top
    }

    /// Returns `true` if `self` covers all of `other`.
    ///
    /// Used to decide whether an OS clip rectangle is an actual confinement or
    /// just the whole virtual screen (which Windows reports when nothing is
    /// clipping the cursor).
    pub const fn covers(&self, other: &ClipRect) -> bool {
        self.left <= other.left
            && self.top <= other.top
            && self.right >= other.right
            && self.bottom >= other.bottom
    }
}

impl fmt::Display for ClipRect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[{}, {}] - [{}, {}]",
            self.left, self.top, self.right, self.bottom
        )
    }
}
