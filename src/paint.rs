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

//! The paints a path is drawn with.

use crate::gpu_backend::PaintMode;

use piet::{Color, FixedGradient, FixedLinearGradient, FixedRadialGradient};

/// The paint type read by the draw dispatcher.
///
/// Paints are owned by the caller. A path only borrows them for the duration of a draw.
#[derive(Debug, Clone)]
pub enum Paint {
    /// A solid color.
    Solid(Color),

    /// A linear gradient.
    LinearGradient(FixedLinearGradient),

    /// A radial gradient.
    RadialGradient(FixedRadialGradient),
}

impl Default for Paint {
    fn default() -> Self {
        Paint::Solid(Color::BLACK)
    }
}

impl Paint {
    /// Create a new solid paint.
    pub fn solid(color: Color) -> Self {
        Paint::Solid(color)
    }

    /// The color of a solid paint.
    pub fn color(&self) -> Option<Color> {
        match self {
            Paint::Solid(color) => Some(*color),
            _ => None,
        }
    }

    /// Will every pixel covered by this paint be fully opaque?
    pub fn is_opaque(&self) -> bool {
        let opaque = |color: &Color| color.as_rgba8().3 == 0xFF;

        match self {
            Paint::Solid(color) => opaque(color),
            Paint::LinearGradient(gradient) => gradient.stops.iter().all(|s| opaque(&s.color)),
            Paint::RadialGradient(gradient) => gradient.stops.iter().all(|s| opaque(&s.color)),
        }
    }
}

impl From<Color> for Paint {
    fn from(color: Color) -> Self {
        Paint::Solid(color)
    }
}

impl From<FixedGradient> for Paint {
    fn from(gradient: FixedGradient) -> Self {
        match gradient {
            FixedGradient::Linear(linear) => Paint::LinearGradient(linear),
            FixedGradient::Radial(radial) => Paint::RadialGradient(radial),
        }
    }
}

/// The fill and stroke paints bound for one draw call.
#[derive(Debug, Clone, Copy)]
pub struct PaintBindings<'p> {
    /// The paint used for the interior.
    pub fill: &'p Paint,

    /// The paint used for the outline.
    pub stroke: &'p Paint,
}

impl<'p> PaintBindings<'p> {
    /// Bind a fill and a stroke paint.
    pub fn new(fill: &'p Paint, stroke: &'p Paint) -> Self {
        Self { fill, stroke }
    }

    /// Use the same paint for both modes.
    pub fn uniform(paint: &'p Paint) -> Self {
        Self::new(paint, paint)
    }

    /// The paint bound for `mode`.
    pub fn get(&self, mode: PaintMode) -> &'p Paint {
        match mode {
            PaintMode::Fill => self.fill,
            PaintMode::Stroke => self.stroke,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use piet::kurbo::Point;
    use piet::{GradientStop, GradientStops};

    #[test]
    fn bindings_select_by_mode() {
        let fill = Paint::solid(Color::RED);
        let stroke = Paint::solid(Color::BLUE);
        let bindings = PaintBindings::new(&fill, &stroke);

        assert_eq!(
            bindings.get(PaintMode::Fill).color().map(|c| c.as_rgba8()),
            Some(Color::RED.as_rgba8())
        );
        assert_eq!(
            bindings.get(PaintMode::Stroke).color().map(|c| c.as_rgba8()),
            Some(Color::BLUE.as_rgba8())
        );
    }

    #[test]
    fn opacity() {
        assert!(Paint::solid(Color::WHITE).is_opaque());
        assert!(!Paint::solid(Color::TRANSPARENT).is_opaque());

        let stops: Vec<GradientStop> = (Color::WHITE, Color::rgba8(0, 0, 0, 0x80)).to_vec();
        let gradient = Paint::LinearGradient(FixedLinearGradient {
            start: Point::new(0.0, 0.0),
            end: Point::new(1.0, 0.0),
            stops,
        });
        assert!(!gradient.is_opaque());
        assert_eq!(gradient.color().map(|c| c.as_rgba8()), None);
    }
}
