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

//! The path object: segment storage, cached geometry and draw dispatch.

use crate::bounds::Bounds;
use crate::error::ResultExt;
use crate::flatten::{self, Contours};
use crate::gpu_backend::{BufferPush, GpuContext, PaintMode, PaintModes, Vertex};
use crate::options::PathOptions;
use crate::paint::PaintBindings;
use crate::rasterizer::{Mesh, Rasterizer};
use crate::segment::{self, Command, Segment};
use crate::stroke::StrokeBuffer;
use crate::Error;

use arrayvec::ArrayVec;
use kurbo::{Affine, BezPath, PathEl, Rect};

use std::fmt;
use std::mem;

bitflags::bitflags! {
    /// What a call to [`Path::clear`] resets.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct ClearFlags: u32 {
        /// Segments and coordinates. Implies every other flag.
        const PATH_DATA = 1 << 0;

        /// The bounds, which are recomputed by the next fill build.
        const BOUNDS = 1 << 1;

        /// The cached fill mesh.
        const FILL_MESH = 1 << 2;

        /// The cached stroke mesh.
        const STROKE_MESH = 1 << 3;

        /// Both cached meshes, keeping the path data.
        const GEOMETRY = Self::FILL_MESH.bits() | Self::STROKE_MESH.bits();

        /// Everything.
        const ALL = Self::PATH_DATA.bits() | Self::BOUNDS.bits() | Self::GEOMETRY.bits();
    }
}

/// What a call to [`Path::draw`] did.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DrawReport {
    rebuilt: ArrayVec<PaintMode, 2>,
    submitted: ArrayVec<PaintMode, 2>,
}

impl DrawReport {
    /// Was the mesh for `mode` rebuilt by this draw?
    pub fn rebuilt(&self, mode: PaintMode) -> bool {
        self.rebuilt.contains(&mode)
    }

    /// Was the mesh for `mode` pushed to the backend?
    pub fn submitted(&self, mode: PaintMode) -> bool {
        self.submitted.contains(&mode)
    }

    /// The modes pushed to the backend, in submission order.
    pub fn submissions(&self) -> &[PaintMode] {
        &self.submitted
    }
}

/// A vector path and the geometry derived from it.
///
/// Segments are accumulated with [`append`](Self::append). The fill and stroke meshes are
/// built lazily by [`draw`](Self::draw) and cached until the path or its options change.
pub struct Path {
    /// The segment stream.
    segments: Vec<Segment>,

    /// The coordinates consumed by `segments`, in order.
    coords: Vec<f32>,

    /// Parameters for building geometry.
    options: PathOptions,

    /// Bounds of the flattened fill contours.
    bounds: Bounds,

    /// The flattened segments, shared by both builders.
    contours: Contours,

    /// Whether `contours` reflects the current segments and tolerance.
    contours_valid: bool,

    /// The fill tessellator and its scratch space.
    rasterizer: Rasterizer,

    /// The stroke expander and its scratch space.
    stroke_buffer: StrokeBuffer,

    /// The cached fill mesh.
    fill: Mesh,

    /// The cached stroke mesh.
    stroke: Mesh,

    /// Does `fill` need to be rebuilt?
    fill_dirty: bool,

    /// Does `stroke` need to be rebuilt?
    stroke_dirty: bool,

    /// Segment quads in `stroke`.
    stroke_quads: usize,

    /// The last recoverable error, or `Ok(())` if none have occurred.
    status: Result<(), Error>,
}

impl fmt::Debug for Path {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Path")
            .field("segments", &self.segments.len())
            .field("coords", &self.coords.len())
            .field("options", &self.options)
            .field("bounds", &self.bounds)
            .field("fill", &self.fill)
            .field("stroke", &self.stroke)
            .field("fill_dirty", &self.fill_dirty)
            .field("stroke_dirty", &self.stroke_dirty)
            .finish_non_exhaustive()
    }
}

impl Default for Path {
    fn default() -> Self {
        Self::new()
    }
}

impl Path {
    /// Create an empty path with the default options.
    pub fn new() -> Self {
        Self {
            segments: Vec::new(),
            coords: Vec::new(),
            options: PathOptions::default(),
            bounds: Bounds::new(),
            contours: Contours::new(),
            contours_valid: false,
            rasterizer: Rasterizer::new(),
            stroke_buffer: StrokeBuffer::new(),
            fill: Mesh::new(),
            stroke: Mesh::new(),
            fill_dirty: true,
            stroke_dirty: true,
            stroke_quads: 0,
            status: Ok(()),
        }
    }

    /// Create an empty path with the given options.
    pub fn with_options(options: PathOptions) -> Result<Self, Error> {
        options.validate()?;

        Ok(Self {
            options,
            ..Self::new()
        })
    }

    /// Get the options used to build geometry.
    pub fn options(&self) -> &PathOptions {
        &self.options
    }

    /// Replace the options, invalidating only the meshes they affect.
    pub fn set_options(&mut self, options: PathOptions) -> Result<(), Error> {
        if let Err(err) = options.validate() {
            tracing::error!("rejecting path options: {}", err);
            return Err(err);
        }

        if self.options.tolerance != options.tolerance {
            self.contours_valid = false;
        }
        self.fill_dirty |= self.options.changes_fill(&options);
        self.stroke_dirty |= self.options.changes_stroke(&options);
        self.options = options;
        Ok(())
    }

    /// Append raw OpenVG segment bytes and their coordinates.
    ///
    /// `coords` must hold exactly as many finite values as the segments consume. On error
    /// the path is left unchanged.
    pub fn append(&mut self, segments: &[u8], coords: &[f32]) -> Result<(), Error> {
        let mut decoded = Vec::with_capacity(segments.len());
        for &raw in segments {
            match Segment::from_raw(raw) {
                Some(segment) => decoded.push(segment),
                None => {
                    tracing::error!("rejecting unknown path segment {:#04x}", raw);
                    return Err(Error::InvalidSegment(raw));
                }
            }
        }

        self.append_segments(&decoded, coords)
    }

    /// Append segments and their coordinates.
    ///
    /// `coords` must hold exactly as many finite values as the segments consume. On error
    /// the path is left unchanged.
    pub fn append_segments(&mut self, segments: &[Segment], coords: &[f32]) -> Result<(), Error> {
        let expected = segment::coordinate_count(segments);
        if expected != coords.len() {
            tracing::error!(
                "rejecting {} segments: expected {} coordinates, found {}",
                segments.len(),
                expected,
                coords.len()
            );
            return Err(Error::CoordinateMismatch {
                expected,
                found: coords.len(),
            });
        }

        if let Some(index) = coords.iter().position(|c| !c.is_finite()) {
            tracing::error!(
                "rejecting {} segments: coordinate {} is {}",
                segments.len(),
                index,
                coords[index]
            );
            return Err(Error::InvalidCoordinate { index });
        }

        if segments.is_empty() {
            return Ok(());
        }

        self.segments.try_reserve(segments.len())?;
        self.coords.try_reserve(coords.len())?;
        self.segments.extend_from_slice(segments);
        self.coords.extend_from_slice(coords);
        self.invalidate();

        Ok(())
    }

    /// Append the segments of `src`, mapped through `transform`.
    ///
    /// The appended segments are absolute moves, lines, curves and closes: axis-aligned
    /// lines become plain lines, smooth curves get explicit control points, and arcs are
    /// approximated with cubics within this path's tolerance.
    pub fn append_transformed(&mut self, src: &Path, transform: Affine) -> Result<(), Error> {
        let path = transform * src.to_bez_path_with_tolerance(self.options.tolerance as f64);

        let mut segments = Vec::with_capacity(path.elements().len());
        let mut coords = Vec::new();
        let mut push = |command: Command, points: &[kurbo::Point]| {
            segments.push(Segment::absolute(command));
            coords.extend(points.iter().flat_map(|p| [p.x as f32, p.y as f32]));
        };

        for el in path.elements() {
            match *el {
                PathEl::MoveTo(p) => push(Command::MoveTo, &[p]),
                PathEl::LineTo(p) => push(Command::LineTo, &[p]),
                PathEl::QuadTo(p1, p2) => push(Command::QuadTo, &[p1, p2]),
                PathEl::CurveTo(p1, p2, p3) => push(Command::CubicTo, &[p1, p2, p3]),
                PathEl::ClosePath => push(Command::Close, &[]),
            }
        }

        self.append_segments(&segments, &coords)
    }

    /// Reset the parts of the path named by `flags`.
    ///
    /// Bits outside of [`ClearFlags::ALL`] are rejected and nothing is cleared.
    pub fn clear(&mut self, flags: ClearFlags) -> Result<(), Error> {
        let unknown = flags.bits() & !ClearFlags::ALL.bits();
        if unknown != 0 {
            tracing::error!("rejecting clear with unknown flags {:#x}", unknown);
            return Err(Error::InvalidClearFlags(flags.bits()));
        }

        if flags.contains(ClearFlags::PATH_DATA) {
            self.segments.clear();
            self.coords.clear();
            self.invalidate();
        }

        if flags.intersects(ClearFlags::PATH_DATA | ClearFlags::BOUNDS) {
            self.bounds.reset();
            self.fill_dirty = true;
        }

        if flags.intersects(ClearFlags::PATH_DATA | ClearFlags::FILL_MESH) {
            self.fill.clear();
            self.fill_dirty = true;
        }

        if flags.intersects(ClearFlags::PATH_DATA | ClearFlags::STROKE_MESH) {
            self.stroke.clear();
            self.stroke_quads = 0;
            self.stroke_dirty = true;
        }

        Ok(())
    }

    /// Rebuild the fill mesh and bounds if the path changed since the last build.
    ///
    /// Returns whether a rebuild happened. A tessellation failure leaves the fill mesh
    /// empty and is reported through [`status`](Self::status) rather than returned.
    pub fn build_fill_if_dirty(&mut self) -> Result<bool, Error> {
        if !self.fill_dirty {
            return Ok(false);
        }

        self.flatten_if_needed();
        let result = self.rasterizer.fill_contours(
            &self.contours,
            &self.options,
            &mut self.bounds,
            &mut self.fill,
        );
        self.fill_dirty = false;

        match result {
            Ok(()) => {
                tracing::debug!(
                    segments = self.segments.len(),
                    contours = self.contours.len(),
                    vertices = self.fill.vertices().len(),
                    triangles = self.fill.triangle_count(),
                    "rebuilt fill mesh"
                );
            }
            Err(Error::Tessellation(err)) => {
                tracing::warn!("fill tessellation failed, drawing no fill: {:?}", err);
                self.status = Err(Error::Tessellation(err));
            }
            Err(err) => {
                // Try again on the next draw.
                self.fill_dirty = true;
                return Err(err);
            }
        }

        Ok(true)
    }

    /// Rebuild the stroke mesh if the path changed since the last build.
    ///
    /// Returns whether a rebuild happened.
    pub fn build_stroke_if_dirty(&mut self) -> Result<bool, Error> {
        if !self.stroke_dirty {
            return Ok(false);
        }

        self.flatten_if_needed();
        self.stroke_quads = 0;
        self.stroke_quads = self
            .stroke_buffer
            .build(&self.contours, &self.options, &mut self.stroke)?;
        self.stroke_dirty = false;

        tracing::debug!(
            segments = self.segments.len(),
            quads = self.stroke_quads,
            "rebuilt stroke mesh"
        );

        Ok(true)
    }

    /// Draw the requested parts of the path.
    ///
    /// Stale meshes are rebuilt first. The fill is always pushed before the stroke, and
    /// empty meshes are not pushed at all. The paints in `paints` only need to live for
    /// the duration of this call.
    pub fn draw<C: GpuContext + ?Sized>(
        &mut self,
        modes: PaintModes,
        paints: &PaintBindings<'_>,
        transform: &Affine,
        context: &mut C,
    ) -> Result<DrawReport, Error> {
        let mut report = DrawReport::default();

        for mode in [PaintMode::Fill, PaintMode::Stroke] {
            if !modes.requests(mode) {
                continue;
            }

            let rebuilt = match mode {
                PaintMode::Fill => self.build_fill_if_dirty()?,
                PaintMode::Stroke => self.build_stroke_if_dirty()?,
            };
            if rebuilt {
                report.rebuilt.push(mode);
            }

            let mesh = match mode {
                PaintMode::Fill => &self.fill,
                PaintMode::Stroke => &self.stroke,
            };
            if mesh.is_empty() {
                tracing::trace!(?mode, "nothing to draw");
                continue;
            }

            tracing::trace!(?mode, triangles = mesh.triangle_count(), "pushing buffers");
            context
                .push_buffers(BufferPush {
                    mode,
                    vertices: mesh.vertices(),
                    indices: mesh.indices(),
                    paint: paints.get(mode),
                    transform,
                })
                .backend_err()?;
            report.submitted.push(mode);
        }

        Ok(report)
    }

    /// Take the last recoverable error, resetting it to `Ok(())`.
    pub fn status(&mut self) -> Result<(), Error> {
        mem::replace(&mut self.status, Ok(()))
    }

    /// The stored segments.
    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    /// The stored coordinates.
    pub fn coords(&self) -> &[f32] {
        &self.coords
    }

    /// The number of stored segments.
    pub fn num_segments(&self) -> usize {
        self.segments.len()
    }

    /// The number of stored coordinates.
    pub fn num_coords(&self) -> usize {
        self.coords.len()
    }

    /// The bounds computed by the last fill build.
    ///
    /// Call [`build_fill_if_dirty`](Self::build_fill_if_dirty) first for bounds that
    /// reflect the current segments.
    pub fn bounds(&self) -> &Bounds {
        &self.bounds
    }

    /// The smallest x coordinate of the fill.
    pub fn min_x(&self) -> f32 {
        self.bounds.min_x()
    }

    /// The smallest y coordinate of the fill.
    pub fn min_y(&self) -> f32 {
        self.bounds.min_y()
    }

    /// The largest x coordinate of the fill, not its width.
    pub fn max_x(&self) -> f32 {
        self.bounds.max_x()
    }

    /// The largest y coordinate of the fill, not its height.
    pub fn max_y(&self) -> f32 {
        self.bounds.max_y()
    }

    /// The axis-aligned box around the bounds after applying `transform`.
    pub fn transformed_bounds(&self, transform: Affine) -> Option<Rect> {
        self.bounds.transformed(transform)
    }

    /// Will the next fill draw rebuild the fill mesh?
    pub fn is_fill_dirty(&self) -> bool {
        self.fill_dirty
    }

    /// Will the next stroke draw rebuild the stroke mesh?
    pub fn is_stroke_dirty(&self) -> bool {
        self.stroke_dirty
    }

    /// Triangles in the cached fill mesh.
    pub fn fill_triangle_count(&self) -> usize {
        self.fill.triangle_count()
    }

    /// Vertices of the cached fill mesh.
    pub fn fill_vertices(&self) -> &[Vertex] {
        self.fill.vertices()
    }

    /// Triangle indices of the cached fill mesh.
    pub fn fill_indices(&self) -> &[u32] {
        self.fill.indices()
    }

    /// Quads in the cached stroke mesh, not counting join geometry.
    pub fn stroke_quad_count(&self) -> usize {
        self.stroke_quads
    }

    /// Vertices of the cached stroke mesh.
    pub fn stroke_vertices(&self) -> &[Vertex] {
        self.stroke.vertices()
    }

    /// Triangle indices of the cached stroke mesh, joins included.
    pub fn stroke_indices(&self) -> &[u32] {
        self.stroke.indices()
    }

    /// The path as absolute `kurbo` elements.
    pub fn to_bez_path(&self) -> BezPath {
        self.to_bez_path_with_tolerance(self.options.tolerance as f64)
    }

    fn to_bez_path_with_tolerance(&self, tolerance: f64) -> BezPath {
        flatten::to_bez_path(&self.segments, &self.coords, tolerance)
    }

    fn flatten_if_needed(&mut self) {
        if self.contours_valid {
            return;
        }

        let path = self.to_bez_path();
        self.contours.flatten(&path, self.options.tolerance as f64);
        self.contours_valid = true;
    }

    /// Mark everything derived from the segments as stale.
    fn invalidate(&mut self) {
        self.contours_valid = false;
        self.fill_dirty = true;
        self.stroke_dirty = true;
    }
}
