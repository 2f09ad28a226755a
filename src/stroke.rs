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

//! Stroke expansion into "fat line" quads.
//!
//! Every segment of the flattened centerline becomes a rectangle as wide as the stroke.
//! Corners are optionally patched with a bevel or round join; caps are never added.

use crate::bounds::Bounds;
use crate::flatten::Contours;
use crate::gpu_backend::Vertex;
use crate::options::{LineJoin, PathOptions};
use crate::rasterizer::{make_vertex, Mesh};
use crate::Error;

use arrayvec::ArrayVec;
use lyon_tessellation::math::{vector, Point, Vector};
use lyon_tessellation::VertexBuffers;

/// Upper bound on the triangles in one round join.
const MAX_ROUND_STEPS: u32 = 64;

/// Builds stroke meshes out of flattened contours.
pub(crate) struct StrokeBuffer {
    /// The buffers being built.
    scratch: VertexBuffers<Vertex, u32>,

    /// Bounds of the centerline, used for texture coordinates.
    uv_bounds: Bounds,

    /// Quads emitted by the current build.
    quads: usize,
}

impl Default for StrokeBuffer {
    fn default() -> Self {
        Self::new()
    }
}

/// A quad that has been emitted, remembered so the next one can be joined to it.
#[derive(Debug, Clone, Copy)]
struct Emitted {
    /// Direction from start to end.
    direction: Vector,

    /// Offset from the centerline to the left edge.
    normal: Vector,
}

impl StrokeBuffer {
    /// Create a new stroke buffer.
    pub(crate) fn new() -> Self {
        Self {
            scratch: VertexBuffers::new(),
            uv_bounds: Bounds::new(),
            quads: 0,
        }
    }

    /// Expand `contours` into `mesh`, returning the number of segment quads.
    ///
    /// On failure `mesh` is left empty.
    pub(crate) fn build(
        &mut self,
        contours: &Contours,
        options: &PathOptions,
        mesh: &mut Mesh,
    ) -> Result<usize, Error> {
        mesh.clear();
        self.scratch.vertices.clear();
        self.scratch.indices.clear();
        self.quads = 0;

        let half_width = options.stroke_width * 0.5;
        if !(half_width > 0.0) {
            return Ok(0);
        }

        self.uv_bounds.reset();
        for p in contours.points() {
            self.uv_bounds.update(p.x, p.y);
        }

        // Every segment, including closing ones, needs at most one quad. Round joins
        // reserve the rest of their fan as they go.
        let segment_count: usize = contours
            .iter()
            .map(|(points, closed)| {
                let closing = closed && points.len() > 1;
                points.len().saturating_sub(1) + closing as usize
            })
            .sum();
        let join_vertices = match options.line_join {
            LineJoin::None => 0,
            _ => 3,
        };
        self.scratch
            .vertices
            .try_reserve(segment_count * (4 + join_vertices))?;
        self.scratch
            .indices
            .try_reserve(segment_count * (6 + join_vertices))?;

        for (points, closed) in contours.iter() {
            if let Err(err) = self.stroke_contour(points, closed, half_width, options) {
                self.scratch.vertices.clear();
                self.scratch.indices.clear();
                return Err(err);
            }
        }

        if self.scratch.indices.is_empty() {
            return Ok(0);
        }

        mesh.replace(&mut self.scratch);
        Ok(self.quads)
    }

    fn stroke_contour(
        &mut self,
        points: &[Point],
        closed: bool,
        half_width: f32,
        options: &PathOptions,
    ) -> Result<(), Error> {
        if points.len() < 2 {
            return Ok(());
        }

        let closing = if closed {
            Some((points[points.len() - 1], points[0]))
        } else {
            None
        };
        let segments = points
            .windows(2)
            .map(|pair| (pair[0], pair[1]))
            .chain(closing);

        let mut first: Option<Emitted> = None;
        let mut previous: Option<Emitted> = None;

        for (p0, p1) in segments {
            let current = match self.fat_line(p0, p1, half_width) {
                Some(current) => current,
                None => continue,
            };

            if let Some(previous) = previous {
                self.join(p0, previous, current, half_width, options)?;
            }

            first.get_or_insert(current);
            previous = Some(current);
        }

        // Closed contours also join their last segment back onto the first one.
        if closed {
            if let (Some(first), Some(last)) = (first, previous) {
                self.join(points[0], last, first, half_width, options)?;
            }
        }

        Ok(())
    }

    /// Push the quad for the segment `p0 -> p1`.
    ///
    /// Returns `None` for zero-length segments, which produce no geometry.
    fn fat_line(&mut self, p0: Point, p1: Point, half_width: f32) -> Option<Emitted> {
        let direction = p1 - p0;
        let length = direction.length();
        if !(length > 0.0) {
            return None;
        }

        let normal = vector(-direction.y, direction.x) * (half_width / length);

        let base = self.scratch.vertices.len() as u32;
        let uv_bounds = &self.uv_bounds;
        self.scratch.vertices.extend(
            [p0 + normal, p1 + normal, p1 - normal, p0 - normal]
                .into_iter()
                .map(|pos| make_vertex(pos, uv_bounds)),
        );
        self.scratch
            .indices
            .extend([base, base + 1, base + 2, base, base + 2, base + 3]);
        self.quads += 1;

        Some(Emitted { direction, normal })
    }

    /// Patch the outer corner at `at` between two quads.
    fn join(
        &mut self,
        at: Point,
        incoming: Emitted,
        outgoing: Emitted,
        half_width: f32,
        options: &PathOptions,
    ) -> Result<(), Error> {
        let turn = incoming.direction.cross(outgoing.direction);
        if turn == 0.0 {
            // Straight continuation or a full reversal; there is no gap to patch.
            return Ok(());
        }

        // The gap opens on the side away from the turn.
        let (from, to) = if turn > 0.0 {
            (-incoming.normal, -outgoing.normal)
        } else {
            (incoming.normal, outgoing.normal)
        };

        match options.line_join {
            LineJoin::None => Ok(()),
            LineJoin::Bevel => self.fan(at, &[from, to]),
            LineJoin::Round => {
                let angle = from.angle_to(to).radians;
                let steps = round_steps(angle.abs(), half_width, options.tolerance);
                let offsets: ArrayVec<Vector, { MAX_ROUND_STEPS as usize + 1 }> = (0..=steps)
                    .map(|i| {
                        let (sin, cos) = (angle * i as f32 / steps as f32).sin_cos();
                        vector(from.x * cos - from.y * sin, from.x * sin + from.y * cos)
                    })
                    .collect();
                self.fan(at, &offsets)
            }
        }
    }

    /// Push a triangle fan around `center` through each of `offsets`.
    fn fan(&mut self, center: Point, offsets: &[Vector]) -> Result<(), Error> {
        self.scratch.vertices.try_reserve(offsets.len() + 1)?;
        self.scratch
            .indices
            .try_reserve(offsets.len().saturating_sub(1) * 3)?;

        let base = self.scratch.vertices.len() as u32;
        let uv_bounds = &self.uv_bounds;

        self.scratch.vertices.push(make_vertex(center, uv_bounds));
        self.scratch.vertices.extend(
            offsets
                .iter()
                .map(|offset| make_vertex(center + *offset, uv_bounds)),
        );
        self.scratch.indices.extend(
            (1..offsets.len() as u32).flat_map(|i| [base, base + i, base + i + 1]),
        );

        Ok(())
    }
}

/// The number of fan triangles needed for an arc of `angle` radians to stay within
/// `tolerance` of a circle of `radius`.
fn round_steps(angle: f32, radius: f32, tolerance: f32) -> u32 {
    let cos = (1.0 - tolerance / radius).clamp(-1.0, 1.0);
    let max_step = 2.0 * cos.acos();
    if !(max_step > 0.0) {
        return MAX_ROUND_STEPS;
    }

    ((angle / max_step).ceil() as u32).clamp(1, MAX_ROUND_STEPS)
}

#[cfg(test)]
mod tests {
    use super::*;
    use kurbo::BezPath;

    fn contours(build: impl FnOnce(&mut BezPath)) -> Contours {
        let mut path = BezPath::new();
        build(&mut path);
        let mut contours = Contours::new();
        contours.flatten(&path, 0.1);
        contours
    }

    fn stroke(contours: &Contours, options: PathOptions) -> Mesh {
        let mut buffer = StrokeBuffer::new();
        let mut mesh = Mesh::new();
        buffer.build(contours, &options, &mut mesh).unwrap();
        mesh
    }

    fn area(mesh: &Mesh) -> f32 {
        mesh.indices()
            .chunks(3)
            .map(|tri| {
                let [a, b, c] = [0, 1, 2].map(|i| mesh.vertices()[tri[i] as usize].pos);
                ((b[0] - a[0]) * (c[1] - a[1]) - (c[0] - a[0]) * (b[1] - a[1])).abs() / 2.0
            })
            .sum()
    }

    #[test]
    fn single_segment_is_one_quad() {
        let contours = contours(|path| {
            path.move_to((1.0, 2.0));
            path.line_to((4.0, 6.0));
        });
        let mesh = stroke(&contours, PathOptions::default().with_stroke_width(2.0));

        assert_eq!(mesh.vertices().len(), 4);
        assert_eq!(mesh.triangle_count(), 2);
        // Length 5, width 2.
        assert!((area(&mesh) - 10.0).abs() < 1e-4);
    }

    #[test]
    fn quad_edges_are_offset_by_half_the_width() {
        let contours = contours(|path| {
            path.move_to((0.0, 0.0));
            path.line_to((10.0, 0.0));
        });
        let mesh = stroke(&contours, PathOptions::default().with_stroke_width(4.0));

        let positions: Vec<_> = mesh.vertices().iter().map(|v| v.pos).collect();
        assert_eq!(
            positions,
            [[0.0, 2.0], [10.0, 2.0], [10.0, -2.0], [0.0, -2.0]]
        );
    }

    #[test]
    fn zero_length_produces_nothing() {
        let contours = contours(|path| {
            path.move_to((3.0, 3.0));
            path.line_to((3.0, 3.0));
        });
        let mesh = stroke(&contours, PathOptions::default());
        assert!(mesh.is_empty());
    }

    #[test]
    fn zero_width_produces_nothing() {
        let contours = contours(|path| {
            path.move_to((0.0, 0.0));
            path.line_to((5.0, 0.0));
        });
        let mesh = stroke(&contours, PathOptions::default().with_stroke_width(0.0));
        assert!(mesh.is_empty());
    }

    #[test]
    fn closed_square_has_four_quads() {
        let contours = contours(|path| {
            path.move_to((0.0, 0.0));
            path.line_to((10.0, 0.0));
            path.line_to((10.0, 10.0));
            path.line_to((0.0, 10.0));
            path.close_path();
        });
        let mesh = stroke(&contours, PathOptions::default());

        assert_eq!(mesh.vertices().len(), 16);
        assert_eq!(mesh.triangle_count(), 8);

        // The closing quad runs from (0, 10) back to (0, 0).
        let closing: Vec<_> = mesh.vertices()[12..].iter().map(|v| v.pos).collect();
        assert_eq!(
            closing,
            [[0.5, 10.0], [0.5, 0.0], [-0.5, 0.0], [-0.5, 10.0]]
        );
    }

    #[test]
    fn open_path_is_not_closed() {
        let contours = contours(|path| {
            path.move_to((0.0, 0.0));
            path.line_to((10.0, 0.0));
            path.line_to((10.0, 10.0));
        });
        let mesh = stroke(&contours, PathOptions::default());
        assert_eq!(mesh.triangle_count(), 4);
    }

    #[test]
    fn bevel_fills_each_corner() {
        let contours = contours(|path| {
            path.move_to((0.0, 0.0));
            path.line_to((10.0, 0.0));
            path.line_to((10.0, 10.0));
            path.line_to((0.0, 10.0));
            path.close_path();
        });
        let mesh = stroke(
            &contours,
            PathOptions::default().with_line_join(LineJoin::Bevel),
        );

        // Four quads and four corner triangles.
        assert_eq!(mesh.triangle_count(), 12);
        // Each bevel is a right triangle with legs of half the width.
        assert!((area(&mesh) - (4.0 * 10.0 + 4.0 * 0.125)).abs() < 1e-3);
    }

    #[test]
    fn round_join_covers_the_corner() {
        let contours = contours(|path| {
            path.move_to((0.0, 0.0));
            path.line_to((10.0, 0.0));
            path.line_to((10.0, 10.0));
        });
        let mesh = stroke(
            &contours,
            PathOptions::default()
                .with_stroke_width(4.0)
                .with_tolerance(0.01)
                .with_line_join(LineJoin::Round),
        );

        // The fan approximates a quarter circle of radius 2.
        let quads = 2.0 * 10.0 * 4.0;
        let quarter = std::f32::consts::PI * 4.0 / 4.0;
        let fan = area(&mesh) - quads;
        assert!(fan < quarter);
        assert!(fan > quarter * 0.95);

        // The fan points all sit on the circle around the corner.
        for vertex in &mesh.vertices()[9..] {
            let d = vector(vertex.pos[0] - 10.0, vertex.pos[1]);
            assert!((d.length() - 2.0).abs() < 1e-4);
        }
    }

    #[test]
    fn wide_round_join_is_capped() {
        let contours = contours(|path| {
            path.move_to((0.0, 0.0));
            path.line_to((10.0, 0.0));
            path.line_to((10.0, 10.0));
        });
        let mut buffer = StrokeBuffer::new();
        let mut mesh = Mesh::new();
        let quads = buffer
            .build(
                &contours,
                &PathOptions::default()
                    .with_stroke_width(1000.0)
                    .with_tolerance(1e-6)
                    .with_line_join(LineJoin::Round),
                &mut mesh,
            )
            .unwrap();

        assert_eq!(quads, 2);
        let fan = MAX_ROUND_STEPS as usize;
        assert_eq!(mesh.vertices().len(), 8 + 1 + fan + 1);
        assert_eq!(mesh.indices().len(), 12 + fan * 3);
        assert!(mesh
            .indices()
            .iter()
            .all(|&i| (i as usize) < mesh.vertices().len()));
    }

    #[test]
    fn no_join_leaves_corners_alone() {
        let contours = contours(|path| {
            path.move_to((0.0, 0.0));
            path.line_to((10.0, 0.0));
            path.line_to((10.0, 10.0));
        });
        let mesh = stroke(&contours, PathOptions::default());
        assert_eq!(mesh.vertices().len(), 8);
    }

    #[test]
    fn round_steps_respect_tolerance() {
        assert_eq!(round_steps(0.1, 1.0, 10.0), 1);
        assert!(round_steps(std::f32::consts::PI, 10.0, 0.01) > round_steps(1.0, 10.0, 0.01));
        assert_eq!(round_steps(std::f32::consts::PI, 1000.0, 1e-9), 64);
    }
}
