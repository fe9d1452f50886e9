use crate::foundation::error::{PosterError, PosterResult};

pub use kurbo::{Affine, Point, Rect};

/// Poster canvas size in layout units (px at scale 1).
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Canvas {
    /// Width in canvas units.
    pub width: u32,
    /// Height in canvas units.
    pub height: u32,
}

impl Canvas {
    /// Vertical story format used by the poster.
    pub const STORY: Canvas = Canvas {
        width: 1080,
        height: 1920,
    };

    /// Full canvas rectangle.
    pub fn rect(self) -> Rect {
        Rect::new(0.0, 0.0, f64::from(self.width), f64::from(self.height))
    }

    /// Pixel size of this canvas rendered at `scale`.
    pub fn scaled_size(self, scale: f64) -> PosterResult<(u32, u32)> {
        if !scale.is_finite() || scale <= 0.0 {
            return Err(PosterError::validation("render scale must be finite and > 0"));
        }
        let w = (f64::from(self.width) * scale).round();
        let h = (f64::from(self.height) * scale).round();
        if w < 1.0 || h < 1.0 {
            return Err(PosterError::validation(format!(
                "render scale {scale} collapses the canvas to zero pixels"
            )));
        }
        Ok((w as u32, h as u32))
    }
}

impl Default for Canvas {
    fn default() -> Self {
        Self::STORY
    }
}

/// Premultiplied RGBA8 (r,g,b already multiplied by a).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub struct Rgba8Premul {
    /// Red, premultiplied.
    pub r: u8,
    /// Green, premultiplied.
    pub g: u8,
    /// Blue, premultiplied.
    pub b: u8,
    /// Alpha.
    pub a: u8,
}

impl Rgba8Premul {
    /// Fully transparent black.
    pub fn transparent() -> Self {
        Self {
            r: 0,
            g: 0,
            b: 0,
            a: 0,
        }
    }

    /// Premultiply straight RGBA.
    pub fn from_straight_rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        fn premul(c: u8, a: u8) -> u8 {
            let c = u16::from(c);
            let a = u16::from(a);
            (((c * a) + 127) / 255) as u8
        }

        Self {
            r: premul(r, a),
            g: premul(g, a),
            b: premul(b, a),
            a,
        }
    }

    /// Scale all channels by a coverage value (0..=255), as used for glyph masks.
    pub fn with_coverage(self, coverage: u8) -> Self {
        use crate::foundation::math::mul_div255_u8;

        let c = u16::from(coverage);
        Self {
            r: mul_div255_u8(u16::from(self.r), c),
            g: mul_div255_u8(u16::from(self.g), c),
            b: mul_div255_u8(u16::from(self.b), c),
            a: mul_div255_u8(u16::from(self.a), c),
        }
    }
}
