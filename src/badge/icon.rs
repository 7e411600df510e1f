//! Procedural overlay badge icons.
//!
//! A red disc with the count drawn in a small bitmap font. Bucket 10 renders
//! as "9+", the unknown-count bucket as a white dot.

use image::{Rgba, RgbaImage};

/// Overlay icons are 32x32 like the tray icon.
pub const ICON_SIZE: u32 = 32;

const BADGE_RED: Rgba<u8> = Rgba([237, 66, 69, 255]);
const GLYPH_WHITE: Rgba<u8> = Rgba([255, 255, 255, 255]);

/// Each glyph is 3x5 cells, drawn at this many pixels per cell.
const GLYPH_SCALE: u32 = 3;
const GLYPH_COLUMNS: u32 = 3;
const GLYPH_ROWS: u32 = 5;

/// 3x5 glyph rows, most significant bit is the left column.
const DIGITS: [[u8; 5]; 10] = [
    [0b111, 0b101, 0b101, 0b101, 0b111],
    [0b010, 0b110, 0b010, 0b010, 0b111],
    [0b111, 0b001, 0b111, 0b100, 0b111],
    [0b111, 0b001, 0b111, 0b001, 0b111],
    [0b101, 0b101, 0b111, 0b001, 0b001],
    [0b111, 0b100, 0b111, 0b001, 0b111],
    [0b111, 0b100, 0b111, 0b101, 0b111],
    [0b111, 0b001, 0b010, 0b010, 0b010],
    [0b111, 0b101, 0b111, 0b101, 0b111],
    [0b111, 0b101, 0b111, 0b001, 0b111],
];
const PLUS: [u8; 5] = [0b000, 0b010, 0b111, 0b010, 0b000];

/// Rendered RGBA icon, ready to hand to the OS.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BadgeIcon {
    pub width: u32,
    pub height: u32,
    pub rgba: Vec<u8>,
}

impl BadgeIcon {
    /// Render the icon for a bucket (`-1` or `1..=10`).
    pub fn render(bucket: i64) -> Self {
        let mut image = RgbaImage::new(ICON_SIZE, ICON_SIZE);
        let center = ICON_SIZE as f64 / 2.0;

        fill_disc(&mut image, center, center, center, BADGE_RED);

        match bucket {
            b if b < 0 => fill_disc(&mut image, center, center, 5.0, GLYPH_WHITE),
            b if b >= 10 => draw_glyphs(&mut image, &[DIGITS[9], PLUS]),
            b => draw_glyphs(&mut image, &[DIGITS[b as usize]]),
        }

        Self {
            width: image.width(),
            height: image.height(),
            rgba: image.into_raw(),
        }
    }
}

/// Anti-aliased filled circle, blended over what is already there.
fn fill_disc(image: &mut RgbaImage, cx: f64, cy: f64, radius: f64, color: Rgba<u8>) {
    for (x, y, pixel) in image.enumerate_pixels_mut() {
        let dx = x as f64 + 0.5 - cx;
        let dy = y as f64 + 0.5 - cy;
        let dist = (dx * dx + dy * dy).sqrt();

        let coverage = if dist > radius {
            0.0
        } else if dist > radius - 1.0 {
            radius - dist
        } else {
            1.0
        };
        if coverage <= 0.0 {
            continue;
        }

        let alpha = coverage * color[3] as f64 / 255.0;
        for channel in 0..3 {
            let blended = color[channel] as f64 * alpha + pixel[channel] as f64 * (1.0 - alpha);
            pixel[channel] = blended.round() as u8;
        }
        let dst_alpha = pixel[3] as f64 / 255.0;
        pixel[3] = ((alpha + dst_alpha * (1.0 - alpha)) * 255.0).round() as u8;
    }
}

/// Draw glyphs centred, one cell of spacing between them.
fn draw_glyphs(image: &mut RgbaImage, glyphs: &[[u8; 5]]) {
    let glyph_width = GLYPH_COLUMNS * GLYPH_SCALE;
    let count = glyphs.len() as u32;
    let total_width = count * glyph_width + count.saturating_sub(1) * GLYPH_SCALE;
    let total_height = GLYPH_ROWS * GLYPH_SCALE;

    let origin_x = (image.width() - total_width) / 2;
    let origin_y = (image.height() - total_height) / 2;

    for (index, glyph) in glyphs.iter().enumerate() {
        let glyph_x = origin_x + index as u32 * (glyph_width + GLYPH_SCALE);
        for (row, bits) in glyph.iter().enumerate() {
            for column in 0..GLYPH_COLUMNS {
                if bits & (0b100 >> column) == 0 {
                    continue;
                }
                let x0 = glyph_x + column * GLYPH_SCALE;
                let y0 = origin_y + row as u32 * GLYPH_SCALE;
                for y in y0..y0 + GLYPH_SCALE {
                    for x in x0..x0 + GLYPH_SCALE {
                        image.put_pixel(x, y, GLYPH_WHITE);
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pixel(icon: &BadgeIcon, x: u32, y: u32) -> [u8; 4] {
        let offset = ((y * icon.width + x) * 4) as usize;
        [
            icon.rgba[offset],
            icon.rgba[offset + 1],
            icon.rgba[offset + 2],
            icon.rgba[offset + 3],
        ]
    }

    #[test]
    fn test_icon_dimensions() {
        let icon = BadgeIcon::render(3);
        assert_eq!((icon.width, icon.height), (ICON_SIZE, ICON_SIZE));
        assert_eq!(icon.rgba.len(), (ICON_SIZE * ICON_SIZE * 4) as usize);
    }

    #[test]
    fn test_corners_are_transparent() {
        let icon = BadgeIcon::render(1);
        assert_eq!(pixel(&icon, 0, 0)[3], 0);
        assert_eq!(pixel(&icon, ICON_SIZE - 1, ICON_SIZE - 1)[3], 0);
    }

    #[test]
    fn test_unknown_count_draws_center_dot() {
        let icon = BadgeIcon::render(-1);
        assert_eq!(pixel(&icon, 16, 16), [255, 255, 255, 255]);
        // Between the dot and the edge the disc is red.
        assert_eq!(pixel(&icon, 16, 26), BADGE_RED.0);
    }

    #[test]
    fn test_buckets_render_differently() {
        let one = BadgeIcon::render(1);
        let nine = BadgeIcon::render(9);
        let overflow = BadgeIcon::render(10);
        assert_ne!(one, nine);
        assert_ne!(nine, overflow);
        assert_eq!(BadgeIcon::render(10), BadgeIcon::render(10));
    }
}
