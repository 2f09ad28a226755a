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

//! Defines the GPU backend that paths are submitted to.

use crate::paint::Paint;

use kurbo::Affine;

use std::error::Error;

/// The backend that receives tessellated geometry.
///
/// Binding the paint, uploading the buffers and issuing the draw call are left entirely to
/// the implementor.
pub trait GpuContext {
    /// The error type associated with this GPU context.
    type Error: Error + 'static;

    /// Push buffer data to the GPU.
    ///
    /// `vertices` and `indices` describe an indexed triangle list. The backend is expected to
    /// shade the triangles with `paint` after applying `transform` to every position.
    fn push_buffers(&mut self, buffer_push: BufferPush<'_>) -> Result<(), Self::Error>;
}

/// The data necessary to push buffer data to the GPU.
#[derive(Debug, Clone, Copy)]
pub struct BufferPush<'a> {
    /// Whether this is the fill or the stroke of the path.
    pub mode: PaintMode,

    /// The vertices to draw.
    pub vertices: &'a [Vertex],

    /// Indices into `vertices`, three per triangle.
    pub indices: &'a [u32],

    /// The paint bound for this mode.
    pub paint: &'a Paint,

    /// The user-to-surface transformation to apply to the vertices.
    pub transform: &'a Affine,
}

impl BufferPush<'_> {
    /// The number of triangles in this push.
    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }
}

impl<C: GpuContext + ?Sized> GpuContext for &mut C {
    type Error = C::Error;

    fn push_buffers(&mut self, buffer_push: BufferPush<'_>) -> Result<(), Self::Error> {
        (**self).push_buffers(buffer_push)
    }
}

/// The vertex type used by the GPU renderer.
#[derive(Debug, Copy, Clone, PartialEq, PartialOrd, Default, bytemuck::Pod, bytemuck::Zeroable)]
#[repr(C)]
pub struct Vertex {
    /// The position of the vertex, in path user space.
    pub pos: [f32; 2],

    /// The position normalized against the bounding box of the geometry it belongs to.
    ///
    /// Gradient paints use this as their texture coordinate.
    pub uv: [f32; 2],
}

/// Which part of a path is being drawn.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum PaintMode {
    /// The interior of the path.
    Fill,

    /// The outline of the path.
    Stroke,
}

bitflags::bitflags! {
    /// The set of paint modes requested from a draw call.
    ///
    /// The bit values match `VG_STROKE_PATH` and `VG_FILL_PATH`.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct PaintModes: u32 {
        /// Draw the outline.
        const STROKE = 1 << 0;

        /// Draw the interior.
        const FILL = 1 << 1;
    }
}

impl PaintModes {
    /// Does this set request `mode`?
    pub fn requests(self, mode: PaintMode) -> bool {
        self.contains(PaintModes::from(mode))
    }
}

impl From<PaintMode> for PaintModes {
    fn from(mode: PaintMode) -> Self {
        match mode {
            PaintMode::Fill => PaintModes::FILL,
            PaintMode::Stroke => PaintModes::STROKE,
        }
    }
}
