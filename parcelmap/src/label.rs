//! Procedural label tiles: a thin border and the parcel address.
//!
//! Text is drawn from a small built-in stroke font so label tiles are
//! byte-for-byte reproducible without any system fonts. Each glyph lives on a
//! 4×6 unit grid with y pointing down.

use image::{Rgba, RgbaImage};
use tiny_skia::{Color, LineCap, LineJoin, Paint, PathBuilder, Pixmap, Shader, Stroke, Transform};

/// Border colour, semi-transparent green.
pub const BORDER_COLOR: (u8, u8, u8, u8) = (19, 211, 61, 128);

/// Text colour, opaque red.
pub const TEXT_COLOR: (u8, u8, u8, u8) = (255, 0, 0, 255);

const GLYPH_WIDTH: f32 = 4.0;
const GLYPH_HEIGHT: f32 = 6.0;
const GLYPH_ADVANCE: f32 = 5.0;

/// Fraction of the tile height taken by the text.
const TEXT_HEIGHT_RATIO: f32 = 0.5;
/// Fraction of the tile width the text may span.
const TEXT_WIDTH_RATIO: f32 = 0.9;

type Glyph = &'static [&'static [(f32, f32)]];

/// Renders label tiles of a fixed size.
#[derive(Debug, Clone, Copy)]
pub struct LabelRenderer {
    tile_size: u32,
}

impl LabelRenderer {
    pub fn new(tile_size: u32) -> Self {
        Self { tile_size }
    }

    /// Draws `text` centred on a transparent tile with a 1 px border.
    ///
    /// Characters other than `A-Z`, `a-z` and `0-9` leave a gap. Returns
    /// `None` only if the canvas cannot be allocated.
    pub fn render(&self, text: &str) -> Option<RgbaImage> {
        let size = self.tile_size;
        let mut pixmap = Pixmap::new(size, size)?;
        self.draw_text(&mut pixmap, text);

        let pixels = pixmap
            .pixels()
            .iter()
            .flat_map(|p| {
                let c = p.demultiply();
                [c.red(), c.green(), c.blue(), c.alpha()]
            })
            .collect();
        let mut image = RgbaImage::from_raw(size, size, pixels)?;

        // Written after demultiplying so the border colour is exact.
        let border = border_pixel();
        for i in 0..size {
            image.put_pixel(i, 0, border);
            image.put_pixel(i, size - 1, border);
            image.put_pixel(0, i, border);
            image.put_pixel(size - 1, i, border);
        }
        Some(image)
    }

    fn draw_text(&self, pixmap: &mut Pixmap, text: &str) {
        let chars: Vec<char> = text.chars().map(|c| c.to_ascii_uppercase()).collect();
        if chars.is_empty() {
            return;
        }

        let size = self.tile_size as f32;
        let width_units = GLYPH_ADVANCE * chars.len() as f32 - (GLYPH_ADVANCE - GLYPH_WIDTH);
        let unit = (size * TEXT_HEIGHT_RATIO / GLYPH_HEIGHT).min(size * TEXT_WIDTH_RATIO / width_units);
        let origin_x = (size - width_units * unit) / 2.0;
        let origin_y = (size - GLYPH_HEIGHT * unit) / 2.0;

        let mut builder = PathBuilder::new();
        for (i, c) in chars.iter().enumerate() {
            let Some(glyph) = glyph(*c) else {
                continue;
            };
            let left = origin_x + i as f32 * GLYPH_ADVANCE * unit;
            for stroke in glyph.iter() {
                let mut points = stroke.iter();
                if let Some((x, y)) = points.next() {
                    builder.move_to(left + x * unit, origin_y + y * unit);
                }
                for (x, y) in points {
                    builder.line_to(left + x * unit, origin_y + y * unit);
                }
            }
        }

        let Some(path) = builder.finish() else {
            return;
        };
        let stroke = Stroke {
            width: (unit * 0.8).max(1.0),
            line_cap: LineCap::Round,
            line_join: LineJoin::Round,
            ..Default::default()
        };
        pixmap.stroke_path(
            &path,
            &solid_paint(TEXT_COLOR),
            &stroke,
            Transform::identity(),
            None,
        );
    }
}

fn solid_paint(rgba: (u8, u8, u8, u8)) -> Paint<'static> {
    Paint {
        shader: Shader::SolidColor(Color::from_rgba8(rgba.0, rgba.1, rgba.2, rgba.3)),
        anti_alias: true,
        ..Default::default()
    }
}

/// Border pixel as stored in a rendered tile.
pub fn border_pixel() -> Rgba<u8> {
    Rgba([BORDER_COLOR.0, BORDER_COLOR.1, BORDER_COLOR.2, BORDER_COLOR.3])
}

const O_RING: &[(f32, f32)] = &[
    (1.0, 0.0), (3.0, 0.0), (4.0, 1.0), (4.0, 5.0), (3.0, 6.0), (1.0, 6.0), (0.0, 5.0), (0.0, 1.0), (1.0, 0.0),
];
const P_BOWL: &[(f32, f32)] = &[
    (0.0, 6.0), (0.0, 0.0), (3.0, 0.0), (4.0, 1.0), (4.0, 2.0), (3.0, 3.0), (0.0, 3.0),
];

#[rustfmt::skip]
fn glyph(c: char) -> Option<Glyph> {
    let strokes: Glyph = match c {
        'A' => &[&[(0.0, 6.0), (0.0, 2.0), (2.0, 0.0), (4.0, 2.0), (4.0, 6.0)], &[(0.0, 3.5), (4.0, 3.5)]],
        'B' => &[&[(0.0, 0.0), (0.0, 6.0), (3.0, 6.0), (4.0, 5.0), (4.0, 4.0), (3.0, 3.0), (0.0, 3.0)],
                 &[(0.0, 0.0), (3.0, 0.0), (4.0, 1.0), (4.0, 2.0), (3.0, 3.0)]],
        'C' => &[&[(4.0, 1.0), (3.0, 0.0), (1.0, 0.0), (0.0, 1.0), (0.0, 5.0), (1.0, 6.0), (3.0, 6.0), (4.0, 5.0)]],
        'D' => &[&[(0.0, 0.0), (0.0, 6.0), (2.5, 6.0), (4.0, 4.5), (4.0, 1.5), (2.5, 0.0), (0.0, 0.0)]],
        'E' => &[&[(4.0, 0.0), (0.0, 0.0), (0.0, 6.0), (4.0, 6.0)], &[(0.0, 3.0), (3.0, 3.0)]],
        'F' => &[&[(4.0, 0.0), (0.0, 0.0), (0.0, 6.0)], &[(0.0, 3.0), (3.0, 3.0)]],
        'G' => &[&[(4.0, 1.0), (3.0, 0.0), (1.0, 0.0), (0.0, 1.0), (0.0, 5.0), (1.0, 6.0), (3.0, 6.0), (4.0, 5.0), (4.0, 3.0), (2.0, 3.0)]],
        'H' => &[&[(0.0, 0.0), (0.0, 6.0)], &[(4.0, 0.0), (4.0, 6.0)], &[(0.0, 3.0), (4.0, 3.0)]],
        'I' => &[&[(1.0, 0.0), (3.0, 0.0)], &[(2.0, 0.0), (2.0, 6.0)], &[(1.0, 6.0), (3.0, 6.0)]],
        'J' => &[&[(1.0, 0.0), (4.0, 0.0)], &[(3.0, 0.0), (3.0, 5.0), (2.0, 6.0), (1.0, 6.0), (0.0, 5.0)]],
        'K' => &[&[(0.0, 0.0), (0.0, 6.0)], &[(4.0, 0.0), (0.0, 4.0)], &[(1.5, 2.5), (4.0, 6.0)]],
        'L' => &[&[(0.0, 0.0), (0.0, 6.0), (4.0, 6.0)]],
        'M' => &[&[(0.0, 6.0), (0.0, 0.0), (2.0, 3.0), (4.0, 0.0), (4.0, 6.0)]],
        'N' => &[&[(0.0, 6.0), (0.0, 0.0), (4.0, 6.0), (4.0, 0.0)]],
        'O' => &[O_RING],
        'P' => &[P_BOWL],
        'Q' => &[O_RING, &[(2.5, 4.5), (4.0, 6.0)]],
        'R' => &[P_BOWL, &[(2.0, 3.0), (4.0, 6.0)]],
        'S' => &[&[(4.0, 1.0), (3.0, 0.0), (1.0, 0.0), (0.0, 1.0), (0.0, 2.0), (1.0, 3.0), (3.0, 3.0), (4.0, 4.0), (4.0, 5.0), (3.0, 6.0), (1.0, 6.0), (0.0, 5.0)]],
        'T' => &[&[(0.0, 0.0), (4.0, 0.0)], &[(2.0, 0.0), (2.0, 6.0)]],
        'U' => &[&[(0.0, 0.0), (0.0, 5.0), (1.0, 6.0), (3.0, 6.0), (4.0, 5.0), (4.0, 0.0)]],
        'V' => &[&[(0.0, 0.0), (2.0, 6.0), (4.0, 0.0)]],
        'W' => &[&[(0.0, 0.0), (1.0, 6.0), (2.0, 3.0), (3.0, 6.0), (4.0, 0.0)]],
        'X' => &[&[(0.0, 0.0), (4.0, 6.0)], &[(4.0, 0.0), (0.0, 6.0)]],
        'Y' => &[&[(0.0, 0.0), (2.0, 3.0), (4.0, 0.0)], &[(2.0, 3.0), (2.0, 6.0)]],
        'Z' => &[&[(0.0, 0.0), (4.0, 0.0), (0.0, 6.0), (4.0, 6.0)]],
        '0' => &[O_RING, &[(4.0, 1.0), (0.0, 5.0)]],
        '1' => &[&[(1.0, 1.0), (2.0, 0.0), (2.0, 6.0)], &[(1.0, 6.0), (3.0, 6.0)]],
        '2' => &[&[(0.0, 1.0), (1.0, 0.0), (3.0, 0.0), (4.0, 1.0), (4.0, 2.0), (0.0, 6.0), (4.0, 6.0)]],
        '3' => &[&[(0.0, 1.0), (1.0, 0.0), (3.0, 0.0), (4.0, 1.0), (4.0, 2.0), (3.0, 3.0), (4.0, 4.0), (4.0, 5.0), (3.0, 6.0), (1.0, 6.0), (0.0, 5.0)],
                 &[(1.5, 3.0), (3.0, 3.0)]],
        '4' => &[&[(3.0, 6.0), (3.0, 0.0), (0.0, 4.0), (4.0, 4.0)]],
        '5' => &[&[(4.0, 0.0), (0.0, 0.0), (0.0, 3.0), (3.0, 3.0), (4.0, 4.0), (4.0, 5.0), (3.0, 6.0), (0.0, 6.0)]],
        '6' => &[&[(3.0, 0.0), (1.0, 0.0), (0.0, 1.0), (0.0, 5.0), (1.0, 6.0), (3.0, 6.0), (4.0, 5.0), (4.0, 4.0), (3.0, 3.0), (0.0, 3.0)]],
        '7' => &[&[(0.0, 0.0), (4.0, 0.0), (1.5, 6.0)]],
        '8' => &[&[(1.0, 0.0), (3.0, 0.0), (4.0, 1.0), (4.0, 2.0), (3.0, 3.0), (1.0, 3.0), (0.0, 2.0), (0.0, 1.0), (1.0, 0.0)],
                 &[(1.0, 3.0), (0.0, 4.0), (0.0, 5.0), (1.0, 6.0), (3.0, 6.0), (4.0, 5.0), (4.0, 4.0), (3.0, 3.0)]],
        '9' => &[&[(4.0, 3.0), (1.0, 3.0), (0.0, 2.0), (0.0, 1.0), (1.0, 0.0), (3.0, 0.0), (4.0, 1.0), (4.0, 5.0), (3.0, 6.0), (1.0, 6.0)]],
        _ => return None,
    };
    Some(strokes)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SIZE: u32 = 100;

    fn red_bounds(image: &RgbaImage) -> Option<(u32, u32, u32, u32)> {
        let mut bounds: Option<(u32, u32, u32, u32)> = None;
        for (x, y, p) in image.enumerate_pixels() {
            if p[0] > 200 && p[1] < 50 && p[3] > 200 {
                bounds = Some(match bounds {
                    None => (x, y, x, y),
                    Some((x0, y0, x1, y1)) => (x0.min(x), y0.min(y), x1.max(x), y1.max(y)),
                });
            }
        }
        bounds
    }

    #[test]
    fn test_border_is_one_pixel_green() {
        let image = LabelRenderer::new(SIZE).render("A1").unwrap();

        for i in 0..SIZE {
            assert_eq!(*image.get_pixel(i, 0), border_pixel());
            assert_eq!(*image.get_pixel(i, SIZE - 1), border_pixel());
            assert_eq!(*image.get_pixel(0, i), border_pixel());
            assert_eq!(*image.get_pixel(SIZE - 1, i), border_pixel());
        }
        assert_eq!(image.get_pixel(1, 1)[3], 0);
        assert_eq!(image.get_pixel(SIZE - 2, SIZE - 2)[3], 0);
    }

    #[test]
    fn test_text_is_centred_red() {
        let image = LabelRenderer::new(SIZE).render("H4").unwrap();
        let (x0, y0, x1, y1) = red_bounds(&image).expect("text drawn");

        // Roughly half the tile tall, centred in both directions
        let height = y1 - y0;
        assert!((40..=60).contains(&height), "text height {height}");
        let (cx, cy) = ((x0 + x1) / 2, (y0 + y1) / 2);
        assert!((45..=55).contains(&cx), "centre x {cx}");
        assert!((45..=55).contains(&cy), "centre y {cy}");
    }

    #[test]
    fn test_long_text_fits_tile_width() {
        let image = LabelRenderer::new(SIZE).render("AL38").unwrap();
        let (x0, _, x1, _) = red_bounds(&image).expect("text drawn");
        assert!(x0 >= 2 && x1 <= SIZE - 3, "text spans {x0}..{x1}");
    }

    #[test]
    fn test_rendering_is_deterministic() {
        let renderer = LabelRenderer::new(SIZE);
        assert_eq!(renderer.render("Q17"), renderer.render("q17"));
    }

    #[test]
    fn test_every_address_character_has_a_glyph() {
        for c in ('A'..='Z').chain('0'..='9') {
            assert!(glyph(c).is_some(), "missing glyph for {c}");
        }
        assert!(glyph('-').is_none());
    }

    #[test]
    fn test_glyphs_stay_in_cell() {
        for c in ('A'..='Z').chain('0'..='9') {
            for stroke in glyph(c).unwrap() {
                for (x, y) in stroke.iter() {
                    assert!((0.0..=GLYPH_WIDTH).contains(x), "{c} x {x}");
                    assert!((0.0..=GLYPH_HEIGHT).contains(y), "{c} y {y}");
                }
            }
        }
    }
}
