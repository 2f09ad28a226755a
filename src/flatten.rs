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

//! Turns the segment stream into `kurbo` paths and flattened contours.

use crate::segment::{Command, Segment};

use kurbo::{Arc, BezPath, PathEl, Point, SvgArc, Vec2};
use lyon_tessellation::math::{point, Point as LyonPoint};
use tinyvec::TinyVec;

use std::ops::Range;

/// Interpret a segment stream as an absolute `kurbo` path.
///
/// The result only contains `MoveTo`, `LineTo`, `QuadTo`, `CurveTo` and `ClosePath`, and
/// every drawing element is preceded by a `MoveTo`. Arcs are approximated with cubics
/// within `tolerance`.
pub(crate) fn to_bez_path(segments: &[Segment], coords: &[f32], tolerance: f64) -> BezPath {
    let mut walker = Walker::default();
    let mut out = BezPath::new();
    let mut cursor = 0;

    for &segment in segments {
        let end = cursor + segment.arity();
        let args = match coords.get(cursor..end) {
            Some(args) => args,
            None => {
                tracing::error!(
                    "coordinate buffer ended after {} of {} coordinates",
                    coords.len(),
                    end
                );
                break;
            }
        };
        cursor = end;

        walker.segment(segment, args, tolerance, &mut out);
    }

    out
}

/// Tracks the pen while walking segments.
struct Walker {
    /// Start of the current subpath.
    start: Point,

    /// The current point.
    current: Point,

    /// The last control point, used to reflect smooth curves.
    control: Point,

    /// Whether a `MoveTo` has been emitted for the current subpath.
    open: bool,
}

impl Default for Walker {
    fn default() -> Self {
        Self {
            start: Point::ORIGIN,
            current: Point::ORIGIN,
            control: Point::ORIGIN,
            open: false,
        }
    }
}

impl Walker {
    fn segment(&mut self, segment: Segment, args: &[f32], tolerance: f64, out: &mut BezPath) {
        let origin = if segment.is_relative() {
            self.current.to_vec2()
        } else {
            Vec2::ZERO
        };
        let pt = |i: usize| Point::new(args[i] as f64, args[i + 1] as f64) + origin;

        match segment.command {
            Command::Close => {
                if self.open {
                    out.push(PathEl::ClosePath);
                    self.open = false;
                }
                self.current = self.start;
                self.control = self.start;
            }

            Command::MoveTo => {
                let p = pt(0);
                out.push(PathEl::MoveTo(p));
                self.start = p;
                self.current = p;
                self.control = p;
                self.open = true;
            }

            Command::LineTo => self.line_to(pt(0), out),

            Command::HLineTo => {
                let x = args[0] as f64 + origin.x;
                self.line_to(Point::new(x, self.current.y), out);
            }

            Command::VLineTo => {
                let y = args[0] as f64 + origin.y;
                self.line_to(Point::new(self.current.x, y), out);
            }

            Command::QuadTo => self.quad_to(pt(0), pt(2), out),

            Command::SQuadTo => {
                let ctrl = self.reflected_control();
                self.quad_to(ctrl, pt(0), out);
            }

            Command::CubicTo => self.cubic_to(pt(0), pt(2), pt(4), out),

            Command::SCubicTo => {
                let ctrl1 = self.reflected_control();
                self.cubic_to(ctrl1, pt(0), pt(2), out);
            }

            Command::SccwArcTo | Command::ScwArcTo | Command::LccwArcTo | Command::LcwArcTo => {
                let to = Point::new(args[3] as f64, args[4] as f64) + origin;
                let arc = SvgArc {
                    from: self.current,
                    to,
                    radii: Vec2::new((args[0] as f64).abs(), (args[1] as f64).abs()),
                    x_rotation: (args[2] as f64).to_radians(),
                    large_arc: matches!(segment.command, Command::LccwArcTo | Command::LcwArcTo),
                    sweep: matches!(segment.command, Command::SccwArcTo | Command::LccwArcTo),
                };

                self.ensure_open(out);
                match Arc::from_svg_arc(&arc) {
                    Some(arc) => arc.append_iter(tolerance).for_each(|el| out.push(el)),
                    None => out.push(PathEl::LineTo(to)),
                }
                self.current = to;
                self.control = to;
            }
        }
    }

    fn line_to(&mut self, p: Point, out: &mut BezPath) {
        self.ensure_open(out);
        out.push(PathEl::LineTo(p));
        self.current = p;
        self.control = p;
    }

    fn quad_to(&mut self, ctrl: Point, p: Point, out: &mut BezPath) {
        self.ensure_open(out);
        out.push(PathEl::QuadTo(ctrl, p));
        self.current = p;
        self.control = ctrl;
    }

    fn cubic_to(&mut self, ctrl1: Point, ctrl2: Point, p: Point, out: &mut BezPath) {
        self.ensure_open(out);
        out.push(PathEl::CurveTo(ctrl1, ctrl2, p));
        self.current = p;
        self.control = ctrl2;
    }

    fn reflected_control(&self) -> Point {
        self.current + (self.current - self.control)
    }

    /// Drawing without a subpath starts one at the last subpath start.
    fn ensure_open(&mut self, out: &mut BezPath) {
        if !self.open {
            out.push(PathEl::MoveTo(self.start));
            self.current = self.start;
            self.open = true;
        }
    }
}

/// One flattened subpath.
#[derive(Debug, Clone, Default, PartialEq)]
pub(crate) struct Contour {
    /// The range of this contour's points.
    pub(crate) range: Range<usize>,

    /// Whether the subpath ended with a close segment.
    pub(crate) closed: bool,
}

/// Flattened polylines, one contour per subpath.
#[derive(Debug, Default)]
pub(crate) struct Contours {
    points: Vec<LyonPoint>,
    contours: TinyVec<[Contour; 4]>,
    open_start: Option<usize>,
}

impl Contours {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Replace the contents with the flattened form of `path`.
    pub(crate) fn flatten(&mut self, path: &BezPath, tolerance: f64) {
        self.points.clear();
        self.contours.clear();
        self.open_start = None;

        kurbo::flatten(path.elements().iter().copied(), tolerance, |el| match el {
            PathEl::MoveTo(p) => {
                self.finish(false);
                self.open_start = Some(self.points.len());
                self.points.push(convert_point(p));
            }
            PathEl::LineTo(p) => {
                if self.open_start.is_none() {
                    self.open_start = Some(self.points.len());
                }
                self.points.push(convert_point(p));
            }
            PathEl::ClosePath => self.finish(true),
            PathEl::QuadTo(..) | PathEl::CurveTo(..) => {}
        });

        self.finish(false);
    }

    fn finish(&mut self, closed: bool) {
        if let Some(start) = self.open_start.take() {
            self.contours.push(Contour {
                range: start..self.points.len(),
                closed,
            });
        }
    }

    /// Iterate over each contour's points and whether it was closed.
    pub(crate) fn iter(&self) -> impl Iterator<Item = (&[LyonPoint], bool)> + '_ {
        self.contours
            .iter()
            .map(move |contour| (&self.points[contour.range.clone()], contour.closed))
    }

    /// Every flattened point, across all contours.
    pub(crate) fn points(&self) -> &[LyonPoint] {
        &self.points
    }

    pub(crate) fn len(&self) -> usize {
        self.contours.len()
    }
}

fn convert_point(p: Point) -> LyonPoint {
    point(p.x as f32, p.y as f32)
}
