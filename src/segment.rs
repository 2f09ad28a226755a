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

//! The path segment vocabulary.
//!
//! Segments use the OpenVG encoding: the command lives in the upper bits of a byte and the
//! lowest bit selects relative coordinates. Every command consumes a fixed number of
//! coordinates from the path's coordinate buffer.

/// A drawing command.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum Command {
    /// Close the current subpath.
    Close = 0 << 1,

    /// Start a new subpath at `(x, y)`.
    MoveTo = 1 << 1,

    /// Straight line to `(x, y)`.
    LineTo = 2 << 1,

    /// Horizontal line to `x`.
    HLineTo = 3 << 1,

    /// Vertical line to `y`.
    VLineTo = 4 << 1,

    /// Quadratic curve with control `(x0, y0)` ending at `(x1, y1)`.
    QuadTo = 5 << 1,

    /// Cubic curve with controls `(x0, y0)`, `(x1, y1)` ending at `(x2, y2)`.
    CubicTo = 6 << 1,

    /// Quadratic curve whose control point is the reflection of the previous one.
    SQuadTo = 7 << 1,

    /// Cubic curve whose first control point is the reflection of the previous one.
    SCubicTo = 8 << 1,

    /// Small counter-clockwise elliptical arc: `rh, rv, rotation, x, y`.
    SccwArcTo = 9 << 1,

    /// Small clockwise elliptical arc.
    ScwArcTo = 10 << 1,

    /// Large counter-clockwise elliptical arc.
    LccwArcTo = 11 << 1,

    /// Large clockwise elliptical arc.
    LcwArcTo = 12 << 1,
}

impl Command {
    /// Every command, in opcode order.
    pub const ALL: [Command; 13] = [
        Command::Close,
        Command::MoveTo,
        Command::LineTo,
        Command::HLineTo,
        Command::VLineTo,
        Command::QuadTo,
        Command::CubicTo,
        Command::SQuadTo,
        Command::SCubicTo,
        Command::SccwArcTo,
        Command::ScwArcTo,
        Command::LccwArcTo,
        Command::LcwArcTo,
    ];

    /// The number of coordinates this command consumes.
    pub const fn arity(self) -> usize {
        match self {
            Command::Close => 0,
            Command::HLineTo | Command::VLineTo => 1,
            Command::MoveTo | Command::LineTo | Command::SQuadTo => 2,
            Command::QuadTo | Command::SCubicTo => 4,
            Command::SccwArcTo | Command::ScwArcTo | Command::LccwArcTo | Command::LcwArcTo => 5,
            Command::CubicTo => 6,
        }
    }

    /// Is this one of the four arc commands?
    pub const fn is_arc(self) -> bool {
        matches!(
            self,
            Command::SccwArcTo | Command::ScwArcTo | Command::LccwArcTo | Command::LcwArcTo
        )
    }

    fn from_bits(bits: u8) -> Option<Self> {
        Self::ALL.iter().copied().find(|cmd| *cmd as u8 == bits)
    }
}

/// Whether a segment's coordinates are absolute or relative to the current point.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Coordinates {
    /// Coordinates are in user space.
    #[default]
    Absolute,

    /// Coordinates are offsets from the current point.
    Relative,
}

/// One segment of a path: a command and how to read its coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Segment {
    /// The drawing command.
    pub command: Command,

    /// How the command's coordinates are interpreted.
    pub coordinates: Coordinates,
}

impl Segment {
    /// Create an absolute segment.
    pub const fn absolute(command: Command) -> Self {
        Self {
            command,
            coordinates: Coordinates::Absolute,
        }
    }

    /// Create a relative segment.
    pub const fn relative(command: Command) -> Self {
        Self {
            command,
            coordinates: Coordinates::Relative,
        }
    }

    /// Decode a raw OpenVG segment byte.
    ///
    /// Returns `None` if the command bits do not name a known command.
    pub fn from_raw(raw: u8) -> Option<Self> {
        let coordinates = if raw & 1 == 0 {
            Coordinates::Absolute
        } else {
            Coordinates::Relative
        };

        Command::from_bits(raw & !1).map(|command| Self {
            command,
            coordinates,
        })
    }

    /// Encode this segment as a raw OpenVG segment byte.
    pub fn to_raw(self) -> u8 {
        self.command as u8 | matches!(self.coordinates, Coordinates::Relative) as u8
    }

    /// The number of coordinates this segment consumes.
    pub const fn arity(self) -> usize {
        self.command.arity()
    }

    /// Is this segment relative to the current point?
    pub fn is_relative(self) -> bool {
        self.coordinates == Coordinates::Relative
    }
}

impl From<Command> for Segment {
    fn from(command: Command) -> Self {
        Self::absolute(command)
    }
}

/// Total number of coordinates required by a run of segments.
pub fn coordinate_count<'a>(segments: impl IntoIterator<Item = &'a Segment>) -> usize {
    segments.into_iter().map(|seg| seg.arity()).sum()
}
