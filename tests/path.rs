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

//! Drawing paths into a recording backend.

use vgpath_hardware::kurbo::Affine;
use vgpath_hardware::piet::Color;
use vgpath_hardware::{
    BufferPush, ClearFlags, Command, Error, GpuContext, Paint, PaintBindings, PaintMode,
    PaintModes, Path, PathOptions, Vertex,
};

use std::fmt;

const M: u8 = Command::MoveTo as u8;
const L: u8 = Command::LineTo as u8;
const Z: u8 = Command::Close as u8;

const SQUARE: [u8; 5] = [M, L, L, L, Z];
const SQUARE_COORDS: [f32; 8] = [0.0, 0.0, 10.0, 0.0, 10.0, 10.0, 0.0, 10.0];

#[derive(Debug, Clone, PartialEq)]
struct Recorded {
    mode: PaintMode,
    vertices: Vec<Vertex>,
    indices: Vec<u32>,
    color: Option<Color>,
    transform: Affine,
}

impl Recorded {
    fn area(&self) -> f32 {
        self.indices
            .chunks(3)
            .map(|tri| {
                let [a, b, c] = [0, 1, 2].map(|i| self.vertices[tri[i] as usize].pos);
                ((b[0] - a[0]) * (c[1] - a[1]) - (c[0] - a[0]) * (b[1] - a[1])).abs() / 2.0
            })
            .sum()
    }
}

#[derive(Default)]
struct Recorder {
    pushes: Vec<Recorded>,
}

impl GpuContext for Recorder {
    type Error = std::convert::Infallible;

    fn push_buffers(&mut self, push: BufferPush<'_>) -> Result<(), Self::Error> {
        self.pushes.push(Recorded {
            mode: push.mode,
            vertices: push.vertices.to_vec(),
            indices: push.indices.to_vec(),
            color: push.paint.color(),
            transform: *push.transform,
        });
        Ok(())
    }
}

#[derive(Debug)]
struct ContextLost;

impl fmt::Display for ContextLost {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("context lost")
    }
}

impl std::error::Error for ContextLost {}

struct Failing;

impl GpuContext for Failing {
    type Error = ContextLost;

    fn push_buffers(&mut self, _: BufferPush<'_>) -> Result<(), Self::Error> {
        Err(ContextLost)
    }
}

fn init() {
    let _ = tracing_subscriber::fmt().with_test_writer().try_init();
}

fn square() -> Path {
    let mut path = Path::new();
    path.append(&SQUARE, &SQUARE_COORDS).unwrap();
    path
}

fn draw_all(path: &mut Path, recorder: &mut Recorder) -> vgpath_hardware::DrawReport {
    let paint = Paint::default();
    path.draw(
        PaintModes::all(),
        &PaintBindings::uniform(&paint),
        &Affine::IDENTITY,
        recorder,
    )
    .unwrap()
}

#[test]
fn square_fill_and_stroke() {
    init();

    let mut path = square();
    let mut recorder = Recorder::default();
    let report = draw_all(&mut path, &mut recorder);

    assert_eq!(report.submissions(), &[PaintMode::Fill, PaintMode::Stroke]);
    assert!(report.rebuilt(PaintMode::Fill));
    assert!(report.rebuilt(PaintMode::Stroke));

    let fill = &recorder.pushes[0];
    assert_eq!(fill.indices.len(), 6);
    assert!((fill.area() - 100.0).abs() < 1e-3);
    for vertex in &fill.vertices {
        assert!(vertex.uv.iter().all(|c| (0.0..=1.0).contains(c)));
    }

    let stroke = &recorder.pushes[1];
    assert_eq!(path.stroke_quad_count(), 4);
    assert_eq!(stroke.vertices.len(), 16);
    assert_eq!(stroke.indices.len(), 24);

    assert_eq!(path.min_x(), 0.0);
    assert_eq!(path.min_y(), 0.0);
    assert_eq!(path.max_x(), 10.0);
    assert_eq!(path.max_y(), 10.0);
}

#[test]
fn split_appends_match_a_single_append() {
    let whole = {
        let mut path = square();
        path.build_fill_if_dirty().unwrap();
        path.build_stroke_if_dirty().unwrap();
        (path.fill_vertices().to_vec(), path.stroke_vertices().to_vec())
    };

    let split = {
        let mut path = Path::new();
        path.append(&SQUARE[..2], &SQUARE_COORDS[..4]).unwrap();
        path.append(&SQUARE[2..], &SQUARE_COORDS[4..]).unwrap();
        path.build_fill_if_dirty().unwrap();
        path.build_stroke_if_dirty().unwrap();
        (path.fill_vertices().to_vec(), path.stroke_vertices().to_vec())
    };

    assert_eq!(whole, split);
}

#[test]
fn redraw_reuses_cached_meshes() {
    let mut path = square();
    let mut recorder = Recorder::default();

    draw_all(&mut path, &mut recorder);
    let report = draw_all(&mut path, &mut recorder);

    assert!(!report.rebuilt(PaintMode::Fill));
    assert!(!report.rebuilt(PaintMode::Stroke));
    assert_eq!(recorder.pushes.len(), 4);
    assert_eq!(recorder.pushes[0], recorder.pushes[2]);
    assert_eq!(recorder.pushes[1], recorder.pushes[3]);
}

#[test]
fn appending_rebuilds_both_meshes() {
    let mut path = square();
    let mut recorder = Recorder::default();
    draw_all(&mut path, &mut recorder);

    path.append(&[M, L, L, Z], &[20.0, 20.0, 30.0, 20.0, 30.0, 30.0])
        .unwrap();
    let report = draw_all(&mut path, &mut recorder);

    assert!(report.rebuilt(PaintMode::Fill));
    assert!(report.rebuilt(PaintMode::Stroke));
    assert_eq!(path.max_x(), 30.0);
    assert_eq!(path.fill_triangle_count(), 3);
}

#[test]
fn cleared_path_draws_nothing() {
    let mut path = square();
    let mut recorder = Recorder::default();
    draw_all(&mut path, &mut recorder);

    path.clear(ClearFlags::ALL).unwrap();
    recorder.pushes.clear();
    let report = draw_all(&mut path, &mut recorder);

    assert!(report.submissions().is_empty());
    assert!(recorder.pushes.is_empty());
    assert!(path.bounds().is_empty());
}

#[test]
fn two_point_stroke_is_one_quad() {
    let mut path = Path::with_options(PathOptions::default().with_stroke_width(2.0)).unwrap();
    path.append(&[M, L], &[0.0, 0.0, 10.0, 0.0]).unwrap();

    let mut recorder = Recorder::default();
    let report = draw_all(&mut path, &mut recorder);

    // Two points enclose no area, so only the stroke is drawn.
    assert_eq!(report.submissions(), &[PaintMode::Stroke]);
    let stroke = &recorder.pushes[0];
    assert_eq!(stroke.vertices.len(), 4);
    assert_eq!(stroke.indices, vec![0, 1, 2, 0, 2, 3]);
    assert!((stroke.area() - 20.0).abs() < 1e-4);
}

#[test]
fn zero_length_path_draws_nothing() {
    let mut path = Path::new();
    path.append(&[M, L], &[5.0, 5.0, 5.0, 5.0]).unwrap();

    let mut recorder = Recorder::default();
    let report = draw_all(&mut path, &mut recorder);

    assert!(report.submissions().is_empty());
    assert!(path.status().is_ok());
}

#[test]
fn modes_select_what_is_drawn() {
    let mut path = square();
    let mut recorder = Recorder::default();
    let paint = Paint::default();

    let report = path
        .draw(
            PaintModes::STROKE,
            &PaintBindings::uniform(&paint),
            &Affine::IDENTITY,
            &mut recorder,
        )
        .unwrap();

    assert_eq!(report.submissions(), &[PaintMode::Stroke]);
    assert!(path.is_fill_dirty());
    assert!(!path.is_stroke_dirty());
}

#[test]
fn paints_and_transform_reach_the_backend() {
    let mut path = square();
    let mut recorder = Recorder::default();
    let fill = Paint::solid(Color::rgb8(0xff, 0, 0));
    let stroke = Paint::solid(Color::rgb8(0, 0, 0xff));
    let transform = Affine::scale(2.0);

    path.draw(
        PaintModes::all(),
        &PaintBindings::new(&fill, &stroke),
        &transform,
        &mut recorder,
    )
    .unwrap();

    assert_eq!(recorder.pushes[0].color, fill.color());
    assert_eq!(recorder.pushes[1].color, stroke.color());
    assert!(recorder.pushes.iter().all(|p| p.transform == transform));
}

#[test]
fn backend_errors_are_returned() {
    init();

    let mut path = square();
    let paint = Paint::default();
    let err = path
        .draw(
            PaintModes::all(),
            &PaintBindings::uniform(&paint),
            &Affine::IDENTITY,
            &mut Failing,
        )
        .unwrap_err();

    assert!(matches!(err, Error::Backend(_)));
    assert_eq!(err.to_string(), "backend error: context lost");

    // The fill mesh was built before the push failed and stays cached.
    let mut recorder = Recorder::default();
    let report = draw_all(&mut path, &mut recorder);
    assert!(!report.rebuilt(PaintMode::Fill));
    assert_eq!(report.submissions(), &[PaintMode::Fill, PaintMode::Stroke]);
}

#[test]
fn rejected_input_leaves_drawing_unchanged() {
    let mut path = square();
    let mut recorder = Recorder::default();
    draw_all(&mut path, &mut recorder);

    assert!(path.append(&[0x1b], &[]).is_err());
    assert!(path.append(&[L], &[1.0]).is_err());
    assert!(path.clear(ClearFlags::from_bits_retain(0x100)).is_err());

    let report = draw_all(&mut path, &mut recorder);
    assert!(!report.rebuilt(PaintMode::Fill));
    assert_eq!(recorder.pushes[0], recorder.pushes[2]);
    assert_eq!(recorder.pushes[1], recorder.pushes[3]);
}

#[test]
fn curves_are_flattened_within_tolerance() {
    let q = Command::QuadTo as u8;
    let mut path = Path::with_options(PathOptions::tolerance(0.01)).unwrap();
    path.append(&[M, q, Z], &[0.0, 0.0, 50.0, 100.0, 100.0, 0.0])
        .unwrap();
    path.build_fill_if_dirty().unwrap();

    // The curve peaks at half the control point's height.
    assert!((path.max_y() - 50.0).abs() < 0.05);
    assert!(path.fill_triangle_count() > 8);

    let coarse = path.fill_triangle_count();
    path.set_options(PathOptions::tolerance(1.0)).unwrap();
    path.build_fill_if_dirty().unwrap();
    assert!(path.fill_triangle_count() < coarse);
}

#[test]
fn transformed_append_draws_like_the_source() {
    let src = square();
    let mut dst = Path::new();
    dst.append_transformed(&src, Affine::translate((5.0, 5.0)))
        .unwrap();
    dst.build_fill_if_dirty().unwrap();

    assert_eq!(dst.min_x(), 5.0);
    assert_eq!(dst.max_y(), 15.0);
    assert_eq!(dst.fill_triangle_count(), 2);
}
