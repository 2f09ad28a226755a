// SPDX-License-Identifier: LGPL-3.0-or-later OR MPL-2.0
// This file is a part of `vgpath-hardware`.
//
// `vgpath-hardware` is free software: you can redistribute it and/or modify it under the
// terms of either:
//
// * GNU Lesser General Public License as published by the Free Software Foundation, either
//   version 3 of the License, or (at your option) any later version.
// * Mozilla Public License as published by the Mozilla Foundation, version 2.
//
// `vgpath-hardware` is distributed in the hope that it will be useful, but WITHOUT ANY
// WARRANTY; without even the implied warranty of MERCHANTABILITY or FITNESS FOR A PARTICULAR
// PURPOSE. See the GNU Lesser General Public License or the Mozilla Public License for more
// details.
//
// You should have received a copy of the GNU Lesser General Public License and the Mozilla
// Public License along with `vgpath-hardware`. If not, see <https://www.gnu.org/licenses/>.

//! Running bounds of the fill geometry.

use kurbo::{Affine, Rect};

/// The sentinel stored in the maximum fields while no vertex has been seen.
const EMPTY_MAX: f32 = -1.0;

/// Running minimum and maximum of the vertices emitted while flattening fill contours.
///
/// The maximum fields hold coordinates, not a width or height. Subtract the minimum to get
/// the span.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    min_x: f32,
    min_y: f32,
    max_x: f32,
    max_y: f32,
}

impl Default for Bounds {
    fn default() -> Self {
        Self::new()
    }
}

impl Bounds {
    /// Bounds that contain nothing.
    pub const fn new() -> Self {
        Self {
            min_x: f32::INFINITY,
            min_y: f32::INFINITY,
            max_x: EMPTY_MAX,
            max_y: EMPTY_MAX,
        }
    }

    /// Forget every vertex seen so far.
    pub fn reset(&mut self) {
        *self = Self::new();
    }

    /// Has no vertex been recorded yet?
    pub fn is_empty(&self) -> bool {
        self.min_x == f32::INFINITY
    }

    /// Grow the bounds to include `(x, y)`.
    pub fn update(&mut self, x: f32, y: f32) {
        // The sentinel must not win over vertices at negative coordinates.
        if self.is_empty() {
            self.max_x = x;
            self.max_y = y;
        } else {
            self.max_x = self.max_x.max(x);
            self.max_y = self.max_y.max(y);
        }

        self.min_x = self.min_x.min(x);
        self.min_y = self.min_y.min(y);
    }

    /// The smallest x coordinate, or `+inf` when empty.
    pub fn min_x(&self) -> f32 {
        self.min_x
    }

    /// The smallest y coordinate, or `+inf` when empty.
    pub fn min_y(&self) -> f32 {
        self.min_y
    }

    /// The largest x coordinate, or `-1` when empty.
    pub fn max_x(&self) -> f32 {
        self.max_x
    }

    /// The largest y coordinate, or `-1` when empty.
    pub fn max_y(&self) -> f32 {
        self.max_y
    }

    /// The bounds as a rectangle, if anything has been recorded.
    pub fn rect(&self) -> Option<Rect> {
        if self.is_empty() {
            return None;
        }

        Some(Rect::new(
            self.min_x as f64,
            self.min_y as f64,
            self.max_x as f64,
            self.max_y as f64,
        ))
    }

    /// The axis-aligned box around these bounds after applying `transform`.
    pub fn transformed(&self, transform: Affine) -> Option<Rect> {
        self.rect().map(|rect| transform.transform_rect_bbox(rect))
    }

    /// Map a point into the unit square spanned by these bounds.
    ///
    /// Degenerate axes map to zero.
    pub(crate) fn normalize(&self, x: f32, y: f32) -> [f32; 2] {
        if self.is_empty() {
            return [0.0, 0.0];
        }

        let axis = |v: f32, min: f32, max: f32| {
            let span = max - min;
            if span > 0.0 {
                (v - min) / span
            } else {
                0.0
            }
        };

        [
            axis(x, self.min_x, self.max_x),
            axis(y, self.min_y, self.max_y),
        ]
    }
}
