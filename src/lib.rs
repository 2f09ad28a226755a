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

//! OpenVG-style vector paths, turned into triangles for GPU backends.
//!
//! A [`Path`] accumulates segments in the OpenVG encoding: a command byte per segment and a
//! flat run of coordinates. When drawn, the path is flattened and converted into two cached
//! triangle meshes:
//!
//! - The fill mesh, tessellated with [`lyon_tessellation`] under the path's fill rule.
//! - The stroke mesh, built from one quad per flattened segment with optional corner joins.
//!
//! The meshes are only rebuilt after the path or its [`PathOptions`] change. Drawing hands
//! them to a backend through the [`GpuContext`] trait, fill first and then stroke.
//!
//! ## Example
//!
//! ```
//! use vgpath_hardware::{BufferPush, Command, GpuContext, Paint, PaintBindings, PaintModes, Path};
//! use vgpath_hardware::kurbo::Affine;
//!
//! struct Counter(usize);
//!
//! impl GpuContext for Counter {
//!     type Error = std::convert::Infallible;
//!
//!     fn push_buffers(&mut self, push: BufferPush<'_>) -> Result<(), Self::Error> {
//!         self.0 += push.triangle_count();
//!         Ok(())
//!     }
//! }
//!
//! let mut path = Path::new();
//! path.append(
//!     &[Command::MoveTo as u8, Command::LineTo as u8, Command::LineTo as u8, Command::Close as u8],
//!     &[0.0, 0.0, 10.0, 0.0, 10.0, 10.0],
//! )
//! .unwrap();
//!
//! let paint = Paint::default();
//! let mut counter = Counter(0);
//! path.draw(PaintModes::FILL, &PaintBindings::uniform(&paint), &Affine::IDENTITY, &mut counter)
//!     .unwrap();
//! assert_eq!(counter.0, 1);
//! ```

#![forbid(unsafe_code, rust_2018_idioms)]

mod bounds;
mod error;
mod flatten;
mod gpu_backend;
mod options;
mod paint;
mod path;
mod rasterizer;
mod segment;
mod stroke;

pub use kurbo;
pub use piet;

pub use self::bounds::Bounds;
pub use self::error::Error;
pub use self::gpu_backend::{BufferPush, GpuContext, PaintMode, PaintModes, Vertex};
pub use self::options::{FillRule, LineJoin, PathOptions};
pub use self::paint::{Paint, PaintBindings};
pub use self::path::{ClearFlags, DrawReport, Path};
pub use self::segment::{coordinate_count, Command, Coordinates, Segment};
