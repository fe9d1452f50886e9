use super::*;
use crate::{
    assets::color::ColorDef,
    compile::plan::{PosterPlan, RunRole},
    foundation::core::Point,
    render::backend::execute_plan,
    text::face::BlockFace,
    text::measure::layout_glyphs,
};

fn assets(bg: [u8; 4]) -> PreparedAssets {
    PreparedAssets::from_parts(
        PreparedImage::solid(4, 2, bg),
        Arc::new(BlockFace::default()),
    )
    .unwrap()
}

fn canvas(width: u32, height: u32) -> Canvas {
    Canvas { width, height }
}

#[test]
fn fill_covers_the_surface() {
    let plan = PosterPlan {
        canvas: canvas(20, 10),
        ops: vec![DrawOp::Fill {
            rect: Rect::new(0.0, 0.0, 20.0, 10.0),
            color: ColorDef::rgb(10, 20, 30),
        }],
        rows: vec![],
    };
    let mut be = CpuBackend::new();
    let frame = execute_plan(&mut be, &plan, &assets([0, 0, 0, 255]), 1.0).unwrap();
    assert_eq!((frame.width, frame.height), (20, 10));
    assert!(frame.premultiplied);
    assert_eq!(frame.pixel(0, 0), Some([10, 20, 30, 255]));
    assert_eq!(frame.pixel(19, 9), Some([10, 20, 30, 255]));
}

#[test]
fn background_is_stretched_into_dest() {
    let plan = PosterPlan {
        canvas: canvas(20, 10),
        ops: vec![DrawOp::Background {
            dest: Rect::new(0.0, 0.0, 20.0, 10.0),
        }],
        rows: vec![],
    };
    let mut be = CpuBackend::new();
    let frame = execute_plan(&mut be, &plan, &assets([0x33, 0x66, 0x99, 255]), 1.0).unwrap();
    assert_eq!(frame.pixel(10, 5), Some([0x33, 0x66, 0x99, 0xff]));
    assert_eq!(frame.pixel(3, 2), Some([0x33, 0x66, 0x99, 0xff]));
}

fn glyph_plan() -> PosterPlan {
    let face = BlockFace::default();
    let line = layout_glyphs(&face, "A", 20.0, 0.0, None);
    PosterPlan {
        canvas: canvas(100, 50),
        ops: vec![
            DrawOp::Fill {
                rect: Rect::new(0.0, 0.0, 100.0, 50.0),
                color: ColorDef::rgb(255, 255, 255),
            },
            DrawOp::GlyphRun(GlyphRun {
                role: RunRole::Signature,
                origin: Point::new(10.0, 40.0),
                size_px: 20,
                color: ColorDef::rgb(0x11, 0x11, 0x11),
                width: line.width,
                glyphs: line.glyphs,
            }),
        ],
        rows: vec![],
    }
}

#[test]
fn glyphs_sit_on_the_baseline() {
    let mut be = CpuBackend::new();
    let frame = execute_plan(&mut be, &glyph_plan(), &assets([0, 0, 0, 255]), 1.0).unwrap();
    // 20px block glyph: 10x14 mask, 1px left bearing, bottom row on the baseline.
    let ink = Some([0x11, 0x11, 0x11, 0xff]);
    let paper = Some([0xff, 0xff, 0xff, 0xff]);
    assert_eq!(frame.pixel(15, 30), ink);
    assert_eq!(frame.pixel(11, 26), ink);
    assert_eq!(frame.pixel(20, 39), ink);
    assert_eq!(frame.pixel(5, 30), paper);
    assert_eq!(frame.pixel(15, 45), paper);
    assert_eq!(frame.pixel(15, 20), paper);
}

#[test]
fn scale_multiplies_positions_and_sizes() {
    let mut be = CpuBackend::new();
    let frame = execute_plan(&mut be, &glyph_plan(), &assets([0, 0, 0, 255]), 2.0).unwrap();
    assert_eq!((frame.width, frame.height), (200, 100));
    // 40px glyph: 19x28 mask at x 22, top 52.
    assert_eq!(frame.pixel(30, 60), Some([0x11, 0x11, 0x11, 0xff]));
    assert_eq!(frame.pixel(30, 45), Some([0xff, 0xff, 0xff, 0xff]));

    let half = execute_plan(&mut be, &glyph_plan(), &assets([0, 0, 0, 255]), 0.5).unwrap();
    assert_eq!((half.width, half.height), (50, 25));
}

#[test]
fn ops_require_begin() {
    let mut be = CpuBackend::new();
    let op = DrawOp::Fill {
        rect: Rect::new(0.0, 0.0, 1.0, 1.0),
        color: ColorDef::rgb(0, 0, 0),
    };
    let err = be.exec_op(&op, &assets([0, 0, 0, 255])).unwrap_err();
    assert!(matches!(err, PosterError::Render(_)));
    assert!(be.finish().is_err());
}

#[test]
fn oversized_surfaces_are_rejected() {
    let mut be = CpuBackend::new();
    assert!(be.begin(canvas(40_000, 10), 2.0).is_err());
}
