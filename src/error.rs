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

//! Errors reported by paths.

use lyon_tessellation::TessellationError;

use std::collections::TryReserveError;
use std::error::Error as StdError;
use std::fmt;

/// An error produced while building or drawing a path.
#[derive(Debug)]
#[non_exhaustive]
pub enum Error {
    /// A segment byte did not name a known command.
    InvalidSegment(u8),

    /// The coordinates supplied did not match the arities of the segments.
    CoordinateMismatch {
        /// The number of coordinates the segments require.
        expected: usize,

        /// The number of coordinates supplied.
        found: usize,
    },

    /// A coordinate was NaN or infinite.
    InvalidCoordinate {
        /// The position of the coordinate in the supplied slice.
        index: usize,
    },

    /// A clear was requested with bits that name no clear operation.
    InvalidClearFlags(u32),

    /// The path options cannot produce geometry.
    InvalidOptions(&'static str),

    /// The fill tessellator rejected the path.
    Tessellation(TessellationError),

    /// A geometry buffer could not be allocated.
    OutOfMemory,

    /// The GPU backend failed.
    Backend(Box<dyn StdError + 'static>),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::InvalidSegment(raw) => write!(f, "invalid path segment {:#04x}", raw),
            Error::CoordinateMismatch { expected, found } => write!(
                f,
                "segments require {} coordinates but {} were supplied",
                expected, found
            ),
            Error::InvalidCoordinate { index } => {
                write!(f, "coordinate {} is not finite", index)
            }
            Error::InvalidClearFlags(bits) => write!(f, "invalid clear flags {:#x}", bits),
            Error::InvalidOptions(reason) => write!(f, "invalid path options: {}", reason),
            Error::Tessellation(err) => write!(f, "fill tessellation failed: {:?}", err),
            Error::OutOfMemory => f.write_str("out of memory while building geometry"),
            Error::Backend(err) => write!(f, "backend error: {}", err),
        }
    }
}

impl StdError for Error {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        match self {
            Error::Backend(err) => Some(&**err),
            _ => None,
        }
    }
}

impl From<TessellationError> for Error {
    fn from(err: TessellationError) -> Self {
        Error::Tessellation(err)
    }
}

impl From<TryReserveError> for Error {
    fn from(_: TryReserveError) -> Self {
        Error::OutOfMemory
    }
}

pub(crate) trait ResultExt<T, E: StdError + 'static> {
    fn backend_err(self) -> Result<T, Error>;
}

impl<T, E: StdError + 'static> ResultExt<T, E> for Result<T, E> {
    fn backend_err(self) -> Result<T, Error> {
        self.map_err(|e| Error::Backend(Box::new(LibraryError(e))))
    }
}

struct LibraryError<E>(E);

impl<E: fmt::Debug> fmt::Debug for LibraryError<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(&self.0, f)
    }
}

impl<E: fmt::Display> fmt::Display for LibraryError<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

impl<E: StdError> StdError for LibraryError<E> {}
