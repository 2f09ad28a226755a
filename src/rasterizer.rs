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

//! The fill rasterizer, powered by `lyon_tessellation`.

use crate::bounds::Bounds;
use crate::flatten::Contours;
use crate::gpu_backend::Vertex;
use crate::options::PathOptions;
use crate::Error;

use lyon_tessellation::math::Point;
use lyon_tessellation::path::{Event, PathEvent};
use lyon_tessellation::{BuffersBuilder, FillOptions, FillTessellator, FillVertex, VertexBuffers};

use std::fmt;
use std::iter;
use std::mem;

/// A cached indexed triangle list.
pub(crate) struct Mesh {
    buffers: VertexBuffers<Vertex, u32>,
}

impl fmt::Debug for Mesh {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Mesh")
            .field("vertices", &self.buffers.vertices.len())
            .field("indices", &self.buffers.indices.len())
            .finish()
    }
}

impl Mesh {
    pub(crate) fn new() -> Self {
        Self {
            buffers: VertexBuffers::new(),
        }
    }

    /// Get a reference to the vertex buffer.
    pub(crate) fn vertices(&self) -> &[Vertex] {
        &self.buffers.vertices
    }

    /// Get a reference to the index buffer.
    pub(crate) fn indices(&self) -> &[u32] {
        &self.buffers.indices
    }

    pub(crate) fn triangle_count(&self) -> usize {
        self.buffers.indices.len() / 3
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.buffers.indices.is_empty()
    }

    /// Drop the contents, keeping the allocations.
    pub(crate) fn clear(&mut self) {
        self.buffers.vertices.clear();
        self.buffers.indices.clear();
    }

    /// Swap the contents with a freshly built set of buffers.
    pub(crate) fn replace(&mut self, buffers: &mut VertexBuffers<Vertex, u32>) {
        mem::swap(&mut self.buffers, buffers);
    }
}

/// Builds fill meshes out of flattened contours.
pub(crate) struct Rasterizer {
    /// The fill tessellator.
    fill_tessellator: FillTessellator,

    /// Buffers the tessellator writes into before they are committed to a mesh.
    scratch: VertexBuffers<Vertex, u32>,

    /// Make the next tessellation fail.
    #[cfg(test)]
    pub(crate) fail_next: bool,
}

impl Rasterizer {
    /// Create a new rasterizer.
    pub(crate) fn new() -> Self {
        Self {
            fill_tessellator: FillTessellator::new(),
            scratch: VertexBuffers::new(),
            #[cfg(test)]
            fail_next: false,
        }
    }

    /// Tessellate the interior of `contours` into `mesh`.
    ///
    /// `bounds` is reset and then grown by every vertex handed to the tessellator. On
    /// failure `mesh` is left empty.
    pub(crate) fn fill_contours(
        &mut self,
        contours: &Contours,
        options: &PathOptions,
        bounds: &mut Bounds,
        mesh: &mut Mesh,
    ) -> Result<(), Error> {
        mesh.clear();
        self.scratch.vertices.clear();
        self.scratch.indices.clear();

        bounds.reset();
        for (points, _) in fill_contours(contours) {
            for p in points {
                bounds.update(p.x, p.y);
            }
        }

        if bounds.is_empty() {
            return Ok(());
        }

        // A simple polygon with n vertices has n - 2 triangles.
        let point_count = contours.points().len();
        self.scratch.vertices.try_reserve(point_count)?;
        self.scratch
            .indices
            .try_reserve(point_count.saturating_sub(2) * 3)?;

        // Create fill options.
        let mut fill_options = FillOptions::default();
        fill_options.fill_rule = options.fill_rule;
        fill_options.tolerance = options.tolerance;

        #[cfg(test)]
        if mem::take(&mut self.fail_next) {
            use lyon_tessellation::{InternalError, TessellationError};
            return Err(TessellationError::Internal(InternalError::ErrorCode(0)).into());
        }

        let result = {
            let uv_bounds = *bounds;
            let mut builder =
                BuffersBuilder::new(&mut self.scratch, move |vertex: FillVertex<'_>| {
                    make_vertex(vertex.position(), &uv_bounds)
                });

            self.fill_tessellator
                .tessellate(contour_events(contours), &fill_options, &mut builder)
        };

        match result {
            Ok(()) => {
                mesh.replace(&mut self.scratch);
                Ok(())
            }
            Err(err) => {
                // Never let a half-written buffer reach the mesh.
                self.scratch.vertices.clear();
                self.scratch.indices.clear();
                Err(err.into())
            }
        }
    }
}

/// Build a vertex, mapping its texture coordinate into `bounds`.
pub(crate) fn make_vertex(pos: Point, bounds: &Bounds) -> Vertex {
    Vertex {
        pos: [pos.x, pos.y],
        uv: bounds.normalize(pos.x, pos.y),
    }
}

/// The contours that contribute to the fill.
fn fill_contours(contours: &Contours) -> impl Iterator<Item = (&[Point], bool)> + '_ {
    contours.iter().filter(|(points, _)| points.len() >= 2)
}

/// Every fill contour as a closed polygon, in `lyon` events.
fn contour_events(contours: &Contours) -> impl Iterator<Item = PathEvent> + '_ {
    fill_contours(contours).flat_map(|(points, _)| {
        let first = points[0];
        let last = points[points.len() - 1];

        iter::once(Event::Begin { at: first })
            .chain(points.windows(2).map(|pair| Event::Line {
                from: pair[0],
                to: pair[1],
            }))
            .chain(iter::once(Event::End {
                last,
                first,
                close: true,
            }))
    })
}
