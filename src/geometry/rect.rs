//! Axis-aligned working window

use glam::DVec2;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Axis-aligned rectangle given by its minimum corner and its size
///
/// The rectangle is the working area of a scene: every cell is clipped to it
/// and unbounded cells are closed along its border.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    /// Minimum corner (smallest x and y)
    pub origin: DVec2,
    /// Width and height, both expected to be positive
    pub size: DVec2,
}

impl Rect {
    /// Create a rectangle from its minimum corner and size
    pub fn new(origin: DVec2, size: DVec2) -> Self {
        Self { origin, size }
    }

    /// Create the smallest rectangle spanning two corners
    pub fn from_corners(a: DVec2, b: DVec2) -> Self {
        let min = a.min(b);
        let max = a.max(b);
        Self::new(min, max - min)
    }

    #[inline]
    pub fn x_min(&self) -> f64 {
        self.origin.x
    }

    #[inline]
    pub fn y_min(&self) -> f64 {
        self.origin.y
    }

    #[inline]
    pub fn x_max(&self) -> f64 {
        self.origin.x + self.size.x
    }

    #[inline]
    pub fn y_max(&self) -> f64 {
        self.origin.y + self.size.y
    }

    #[inline]
    pub fn min(&self) -> DVec2 {
        self.origin
    }

    #[inline]
    pub fn max(&self) -> DVec2 {
        self.origin + self.size
    }

    #[inline]
    pub fn center(&self) -> DVec2 {
        self.origin + 0.5 * self.size
    }

    #[inline]
    pub fn area(&self) -> f64 {
        self.size.x * self.size.y
    }

    /// Length of the diagonal
    #[inline]
    pub fn diagonal(&self) -> f64 {
        self.size.length()
    }

    /// Check that both dimensions are finite and strictly positive
    pub fn is_valid(&self) -> bool {
        self.origin.is_finite() && self.size.is_finite() && self.size.x > 0.0 && self.size.y > 0.0
    }

    /// Check whether a point lies inside or on the border
    #[inline]
    pub fn contains(&self, p: DVec2) -> bool {
        p.x >= self.x_min() && p.x <= self.x_max() && p.y >= self.y_min() && p.y <= self.y_max()
    }

    /// Grow the rectangle to include `p`
    pub fn include(&mut self, p: DVec2) {
        let min = self.min().min(p);
        let max = self.max().max(p);
        self.origin = min;
        self.size = max - min;
    }

    /// Rectangle grown by `margin` on every side
    pub fn inflated(&self, margin: f64) -> Self {
        Self::new(
            self.origin - DVec2::splat(margin),
            self.size + DVec2::splat(2.0 * margin),
        )
    }

    /// Corner `i` (taken modulo 4) in counter-clockwise order starting at the minimum corner
    pub fn corner(&self, i: usize) -> DVec2 {
        match i % 4 {
            0 => DVec2::new(self.x_min(), self.y_min()),
            1 => DVec2::new(self.x_max(), self.y_min()),
            2 => DVec2::new(self.x_max(), self.y_max()),
            _ => DVec2::new(self.x_min(), self.y_max()),
        }
    }

    /// The four corners in counter-clockwise order
    pub fn corners(&self) -> [DVec2; 4] {
        [self.corner(0), self.corner(1), self.corner(2), self.corner(3)]
    }

    /// Point where the ray `origin + k * dir` (k >= 0) leaves the rectangle
    ///
    /// For each axis the side facing the ray is chosen from the sign of the
    /// direction component and the smaller of the two ray parameters wins. A
    /// negative parameter (origin already past the facing side) is clamped to
    /// zero, so the origin itself is returned. Returns `None` for a zero
    /// direction.
    pub fn project_ray(&self, origin: DVec2, dir: DVec2) -> Option<DVec2> {
        let kx = if dir.x > 0.0 {
            (self.x_max() - origin.x) / dir.x
        } else if dir.x < 0.0 {
            (self.x_min() - origin.x) / dir.x
        } else {
            f64::INFINITY
        };
        let ky = if dir.y > 0.0 {
            (self.y_max() - origin.y) / dir.y
        } else if dir.y < 0.0 {
            (self.y_min() - origin.y) / dir.y
        } else {
            f64::INFINITY
        };

        let k = kx.min(ky);
        if !k.is_finite() {
            return None;
        }
        Some(origin + k.max(0.0) * dir)
    }

    /// Position of a border point along the perimeter, in `[0, 4)`
    ///
    /// Integer values are the corners in [`Rect::corner`] order and the
    /// parameter grows counter-clockwise. Points off the border are attributed
    /// to the closest side.
    pub fn perimeter_param(&self, p: DVec2) -> f64 {
        let w = self.size.x;
        let h = self.size.y;
        let sides = [
            (p.y - self.y_min()).abs(),
            (p.x - self.x_max()).abs(),
            (p.y - self.y_max()).abs(),
            (p.x - self.x_min()).abs(),
        ];
        let side = (0..4)
            .min_by(|&a, &b| sides[a].total_cmp(&sides[b]))
            .unwrap_or(0);

        let t = match side {
            0 => (p.x - self.x_min()) / w,
            1 => (p.y - self.y_min()) / h,
            2 => (self.x_max() - p.x) / w,
            _ => (self.y_max() - p.y) / h,
        };
        (side as f64 + t.clamp(0.0, 1.0)) % 4.0
    }

    /// Corners met when walking the border counter-clockwise from `from` to `to`
    ///
    /// Both points are expected to lie on the border.
    pub fn corners_between(&self, from: DVec2, to: DVec2) -> Vec<DVec2> {
        let start = self.perimeter_param(from);
        let mut end = self.perimeter_param(to);
        if end <= start {
            end += 4.0;
        }

        let mut corners = Vec::new();
        let mut k = start.floor() as usize + 1;
        while (k as f64) < end {
            corners.push(self.corner(k));
            k += 1;
        }
        corners
    }
}
