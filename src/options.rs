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

//! Parameters controlling how a path is turned into geometry.

use crate::Error;

pub use lyon_tessellation::FillRule;

/// How consecutive stroke segments are joined.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[non_exhaustive]
pub enum LineJoin {
    /// Every segment is an independent quad.
    ///
    /// Corners show a notch on the outside and an overlap on the inside.
    #[default]
    None,

    /// The outer notch at each corner is filled with a triangle.
    Bevel,

    /// The outer notch at each corner is filled with a circular fan.
    Round,
}

/// Options for building fill and stroke meshes.
#[derive(Debug, Clone, Copy, PartialEq)]
#[non_exhaustive]
pub struct PathOptions {
    /// Maximum distance between a curve and its flattened polyline.
    ///
    /// Default value: `PathOptions::DEFAULT_TOLERANCE`.
    pub tolerance: f32,

    /// Width of the stroke outline.
    ///
    /// Default value: `PathOptions::DEFAULT_STROKE_WIDTH`.
    pub stroke_width: f32,

    /// Rule deciding which regions of overlapping contours are inside.
    ///
    /// Default value: `FillRule::EvenOdd`.
    pub fill_rule: FillRule,

    /// How stroke segments meet at corners.
    ///
    /// Default value: `LineJoin::None`.
    pub line_join: LineJoin,
}

impl Default for PathOptions {
    fn default() -> Self {
        Self::DEFAULT
    }
}

impl PathOptions {
    /// Default flattening tolerance, in user-space units.
    pub const DEFAULT_TOLERANCE: f32 = 0.25;

    /// Default stroke width.
    pub const DEFAULT_STROKE_WIDTH: f32 = 1.0;

    /// The default options.
    pub const DEFAULT: Self = PathOptions {
        tolerance: Self::DEFAULT_TOLERANCE,
        stroke_width: Self::DEFAULT_STROKE_WIDTH,
        fill_rule: FillRule::EvenOdd,
        line_join: LineJoin::None,
    };

    #[inline]
    pub fn tolerance(tolerance: f32) -> Self {
        Self::DEFAULT.with_tolerance(tolerance)
    }

    #[inline]
    pub const fn with_tolerance(mut self, tolerance: f32) -> Self {
        self.tolerance = tolerance;
        self
    }

    #[inline]
    pub const fn with_stroke_width(mut self, width: f32) -> Self {
        self.stroke_width = width;
        self
    }

    #[inline]
    pub const fn with_fill_rule(mut self, rule: FillRule) -> Self {
        self.fill_rule = rule;
        self
    }

    #[inline]
    pub const fn with_line_join(mut self, join: LineJoin) -> Self {
        self.line_join = join;
        self
    }

    /// Check that the options describe buildable geometry.
    pub(crate) fn validate(&self) -> Result<(), Error> {
        if !self.tolerance.is_finite() || self.tolerance <= 0.0 {
            return Err(Error::InvalidOptions("tolerance must be finite and positive"));
        }

        if !self.stroke_width.is_finite() {
            return Err(Error::InvalidOptions("stroke width must be finite"));
        }

        Ok(())
    }

    /// Would switching from `self` to `other` invalidate the fill mesh?
    pub(crate) fn changes_fill(&self, other: &Self) -> bool {
        self.tolerance != other.tolerance || self.fill_rule != other.fill_rule
    }

    /// Would switching from `self` to `other` invalidate the stroke mesh?
    pub(crate) fn changes_stroke(&self, other: &Self) -> bool {
        self.tolerance != other.tolerance
            || self.stroke_width != other.stroke_width
            || self.line_join != other.line_join
    }
}
