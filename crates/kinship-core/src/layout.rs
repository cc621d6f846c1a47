//! Canvas placement of individuals.
//!
//! Positions carry no relationship meaning; they only tell a renderer where
//! to draw each card.

use rand::Rng;
use serde::{Deserialize, Serialize};

/// A point on the canvas, in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Position {
    /// Horizontal coordinate.
    pub x: f64,
    /// Vertical coordinate, growing downwards.
    pub y: f64,
}

impl Position {
    /// Point at (x, y).
    #[must_use]
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Point moved by `(dx, dy)`.
    #[must_use]
    pub fn offset(self, dx: f64, dy: f64) -> Self {
        Self::new(self.x + dx, self.y + dy)
    }

    /// Both coordinates are finite. Snapshots cannot carry NaN or infinity.
    #[must_use]
    pub fn is_finite(self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

/// Rectangle new individuals are scattered into.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CanvasRegion {
    /// Left edge.
    pub origin_x: f64,
    /// Top edge.
    pub origin_y: f64,
    /// Horizontal extent.
    pub width: f64,
    /// Vertical extent.
    pub height: f64,
}

impl Default for CanvasRegion {
    fn default() -> Self {
        Self {
            origin_x: 100.0,
            origin_y: 100.0,
            width: 400.0,
            height: 300.0,
        }
    }
}

impl CanvasRegion {
    /// Uniform point in `[origin, origin + extent)` on both axes.
    ///
    /// A degenerate (zero or negative) extent pins that axis to the origin.
    pub fn random_point<R: Rng + ?Sized>(&self, rng: &mut R) -> Position {
        let x = self.origin_x + scaled(rng, self.width);
        let y = self.origin_y + scaled(rng, self.height);
        Position::new(x, y)
    }

    /// Inside the region, edges included.
    pub fn contains(&self, position: Position) -> bool {
        position.x >= self.origin_x
            && position.x <= self.origin_x + self.width.max(0.0)
            && position.y >= self.origin_y
            && position.y <= self.origin_y + self.height.max(0.0)
    }
}

fn scaled<R: Rng + ?Sized>(rng: &mut R, extent: f64) -> f64 {
    if extent > 0.0 {
        rng.gen::<f64>() * extent
    } else {
        0.0
    }
}
