//! Software rasterizer: paint commands → RGBA canvas → PNG bytes.

use crate::rendering::glyphs::{self, GLYPH_WIDTH, ICON_SIZE};
use crate::rendering::node::Color;
use crate::rendering::paint::{Mask, PaintCommand};
use crate::rendering::Screenshot;
use crate::{Error, Result};
use image::imageops::{self, FilterType};
use image::{DynamicImage, ImageFormat, Rgba, RgbaImage};
use std::io::Cursor;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RasterOptions {
    /// Device pixels per CSS pixel
    pub scale: u32,
    /// Fill behind the card; never transparent
    pub background: Color,
    /// Background margin around the card, in CSS pixels
    pub padding: u32,
}

/// Largest canvas (in device pixels) a software export will allocate
pub const MAX_CANVAS_PIXELS: u64 = 64 * 1024 * 1024;

/// `(css + 2 * padding) * scale`, or `None` past `u32`
fn device_extent(css: u32, options: &RasterOptions) -> Option<u64> {
    let padded = u64::from(css).checked_add(u64::from(options.padding) * 2)?;
    let device = padded.checked_mul(u64::from(options.scale))?;
    (device <= u64::from(u32::MAX)).then_some(device)
}

/// Opaque "draw these commands into a bitmap" capability
pub trait Rasterizer: Send + Sync {
    fn rasterize(&self, commands: &[PaintCommand], size: (u32, u32), options: &RasterOptions) -> Result<Screenshot>;
}

/// CPU rasterizer backed by `image`
#[derive(Debug, Default, Clone, Copy)]
pub struct SoftwareRasterizer;

impl Rasterizer for SoftwareRasterizer {
    fn rasterize(&self, commands: &[PaintCommand], size: (u32, u32), options: &RasterOptions) -> Result<Screenshot> {
        if options.scale == 0 {
            return Err(Error::ExportError("scale must be at least 1".into()));
        }
        let (width, height) = match (device_extent(size.0, options), device_extent(size.1, options)) {
            (Some(w), Some(h)) => (w, h),
            _ => return Err(Error::ExportError(format!("canvas size overflows for a {}x{} card", size.0, size.1))),
        };
        if width == 0 || height == 0 {
            return Err(Error::ExportError("nothing to rasterize".into()));
        }
        if width.saturating_mul(height) > MAX_CANVAS_PIXELS {
            return Err(Error::ExportError(format!(
                "{}x{} canvas exceeds the {} pixel limit",
                width, height, MAX_CANVAS_PIXELS
            )));
        }
        let (width, height) = (width as u32, height as u32);

        let mut canvas = Canvas::new(width, height, options);
        for cmd in commands {
            canvas.draw(cmd)?;
        }

        let mut png_data = Vec::new();
        DynamicImage::ImageRgba8(canvas.img)
            .write_to(&mut Cursor::new(&mut png_data), ImageFormat::Png)
            .map_err(|e| Error::ExportError(format!("PNG encoding failed: {}", e)))?;

        Ok(Screenshot { width, height, png_data })
    }
}

struct Canvas {
    img: RgbaImage,
    scale: i64,
    offset: i64,
}

impl Canvas {
    fn new(width: u32, height: u32, options: &RasterOptions) -> Self {
        Self {
            img: RgbaImage::from_pixel(width, height, Rgba(options.background.to_rgba())),
            scale: options.scale as i64,
            offset: i64::from(options.padding) * i64::from(options.scale),
        }
    }

    fn dev(&self, v: i32) -> i64 {
        self.offset + v as i64 * self.scale
    }

    fn len(&self, v: u32) -> i64 {
        v as i64 * self.scale
    }

    fn draw(&mut self, cmd: &PaintCommand) -> Result<()> {
        match cmd {
            PaintCommand::SolidRect { x, y, width, height, radius, rgba } => {
                let r = DevRect::new(self.dev(*x), self.dev(*y), self.len(*width), self.len(*height));
                let radius = self.len(*radius);
                self.fill(r, |px, py| r.contains_rounded(px, py, radius).then_some(*rgba));
            }
            PaintCommand::Border { x, y, width, height, radius, top_only, rgba } => {
                let outer = DevRect::new(self.dev(*x), self.dev(*y), self.len(*width), self.len(*height));
                let s = self.scale;
                if *top_only {
                    let edge = DevRect::new(outer.x, outer.y, outer.w, s);
                    self.fill(edge, |_, _| Some(*rgba));
                } else {
                    let r = self.len(*radius);
                    let inner = DevRect::new(outer.x + s, outer.y + s, outer.w - 2 * s, outer.h - 2 * s);
                    let inner_r = (r - s).max(0);
                    self.fill(outer, |px, py| {
                        (outer.contains_rounded(px, py, r) && !inner.contains_rounded(px, py, inner_r)).then_some(*rgba)
                    });
                }
            }
            PaintCommand::Circle { x, y, diameter, rgba } => {
                let d = self.len(*diameter);
                let r = DevRect::new(self.dev(*x), self.dev(*y), d, d);
                self.fill(r, |px, py| r.contains_rounded(px, py, d / 2).then_some(*rgba));
            }
            PaintCommand::GradientCircle { x, y, diameter, from, to } => {
                let d = self.len(*diameter);
                let r = DevRect::new(self.dev(*x), self.dev(*y), d, d);
                self.fill(r, |px, py| {
                    let t = (px - r.x) as f32 / d.max(1) as f32;
                    r.contains_rounded(px, py, d / 2).then(|| from.mix(*to, t))
                });
            }
            PaintCommand::Text { x, y, text, scale, tracking, bold, rgba } => {
                let advance = ((GLYPH_WIDTH + tracking) * scale) as i32;
                for (i, ch) in text.chars().enumerate() {
                    let gx = *x + i as i32 * advance;
                    self.bitmap(glyphs::glyph(ch), GLYPH_WIDTH, gx, *y, *scale, *bold, *rgba);
                }
            }
            PaintCommand::Icon { x, y, icon, scale, rgba } => {
                self.bitmap(glyphs::icon(*icon), ICON_SIZE, *x, *y, *scale, false, *rgba);
            }
            PaintCommand::Image { x, y, width, height, image, cover, mask } => {
                let target = DevRect::new(self.dev(*x), self.dev(*y), self.len(*width), self.len(*height));
                if target.w <= 0 || target.h <= 0 || image.width() == 0 || image.height() == 0 {
                    return Ok(());
                }
                let src = if *cover {
                    crop_to_aspect(image.pixels(), target.w as u32, target.h as u32)
                } else {
                    image.pixels().clone()
                };
                let scaled = imageops::resize(&src, target.w as u32, target.h as u32, FilterType::Triangle);
                let radius = match mask {
                    Mask::Rounded(r) => self.len(*r),
                    Mask::Circle => target.w.min(target.h) / 2,
                };
                self.fill(target, |px, py| {
                    if !target.contains_rounded(px, py, radius) {
                        return None;
                    }
                    let p = scaled.get_pixel((px - target.x) as u32, (py - target.y) as u32);
                    Some(Color { r: p[0], g: p[1], b: p[2], a: p[3] })
                });
            }
        }
        Ok(())
    }

    #[allow(clippy::too_many_arguments)]
    fn bitmap(&mut self, rows: [u8; 7], cols: u32, x: i32, y: i32, scale: u32, bold: bool, rgba: Color) {
        let cell = scale as i32;
        let extra = if bold { (scale as i32 + 1) / 2 } else { 0 };
        for (cx, cy) in glyphs::lit_pixels(rows, cols) {
            let px = x + cx as i32 * cell;
            let py = y + cy as i32 * cell;
            let r = DevRect::new(self.dev(px), self.dev(py), self.len((cell + extra) as u32), self.len(cell as u32));
            self.fill(r, |_, _| Some(rgba));
        }
    }

    /// Blend `shade(px, py)` into every device pixel of `r` that it returns a color for
    fn fill(&mut self, r: DevRect, shade: impl Fn(i64, i64) -> Option<Color>) {
        let (w, h) = (self.img.width() as i64, self.img.height() as i64);
        for py in r.y.max(0)..(r.y + r.h).min(h) {
            for px in r.x.max(0)..(r.x + r.w).min(w) {
                if let Some(c) = shade(px, py) {
                    let dst = self.img.get_pixel_mut(px as u32, py as u32);
                    blend(dst, c);
                }
            }
        }
    }
}

#[derive(Debug, Clone, Copy)]
struct DevRect {
    x: i64,
    y: i64,
    w: i64,
    h: i64,
}

impl DevRect {
    fn new(x: i64, y: i64, w: i64, h: i64) -> Self {
        Self { x, y, w, h }
    }

    /// Pixel-center test against a rectangle with rounded corners
    fn contains_rounded(&self, px: i64, py: i64, radius: i64) -> bool {
        if px < self.x || py < self.y || px >= self.x + self.w || py >= self.y + self.h {
            return false;
        }
        let r = radius.min(self.w / 2).min(self.h / 2).max(0);
        if r == 0 {
            return true;
        }
        let fx = px as f64 + 0.5;
        let fy = py as f64 + 0.5;
        let left = (self.x + r) as f64;
        let right = (self.x + self.w - r) as f64;
        let top = (self.y + r) as f64;
        let bottom = (self.y + self.h - r) as f64;
        let (dx, dy) = (fx - fx.clamp(left, right), fy - fy.clamp(top, bottom));
        dx * dx + dy * dy <= (r * r) as f64
    }
}

fn crop_to_aspect(src: &RgbaImage, w: u32, h: u32) -> RgbaImage {
    let (sw, sh) = (src.width() as u64, src.height() as u64);
    // compare sw/sh with w/h without floats
    let (cw, ch) = if sw * h as u64 > sh * w as u64 {
        ((sh * w as u64 / h as u64).max(1), sh)
    } else {
        (sw, (sw * h as u64 / w as u64).max(1))
    };
    let x = (sw - cw) / 2;
    let y = (sh - ch) / 2;
    imageops::crop_imm(src, x as u32, y as u32, cw as u32, ch as u32).to_image()
}

fn blend(dst: &mut Rgba<u8>, src: Color) {
    let a = src.a as u32;
    if a == 255 {
        *dst = Rgba(src.to_rgba());
        return;
    }
    if a == 0 {
        return;
    }
    let inv = 255 - a;
    let mix = |s: u8, d: u8| ((s as u32 * a + d as u32 * inv + 127) / 255) as u8;
    let out_a = a + (dst[3] as u32 * inv + 127) / 255;
    *dst = Rgba([mix(src.r, dst[0]), mix(src.g, dst[1]), mix(src.b, dst[2]), out_a.min(255) as u8]);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rendering::node::palette;

    fn decode(shot: &Screenshot) -> RgbaImage {
        image::load_from_memory(&shot.png_data).unwrap().to_rgba8()
    }

    #[test]
    fn background_fills_canvas_at_scale() {
        let opts = RasterOptions { scale: 2, background: palette::BLACK, padding: 4 };
        let shot = SoftwareRasterizer.rasterize(&[], (10, 5), &opts).unwrap();
        assert_eq!((shot.width, shot.height), (36, 26));
        assert_eq!(&shot.png_data[0..8], b"\x89PNG\r\n\x1a\n");
        let img = decode(&shot);
        assert_eq!(img.get_pixel(0, 0).0, [0, 0, 0, 255]);
    }

    #[test]
    fn solid_rect_is_drawn_in_device_pixels() {
        let opts = RasterOptions { scale: 2, background: palette::WHITE, padding: 0 };
        let cmds = [PaintCommand::SolidRect { x: 1, y: 1, width: 2, height: 2, radius: 0, rgba: palette::RED_500 }];
        let img = decode(&SoftwareRasterizer.rasterize(&cmds, (4, 4), &opts).unwrap());
        assert_eq!(img.get_pixel(1, 1).0, [255, 255, 255, 255]);
        assert_eq!(img.get_pixel(2, 2).0, palette::RED_500.to_rgba());
        assert_eq!(img.get_pixel(5, 5).0, palette::RED_500.to_rgba());
        assert_eq!(img.get_pixel(6, 6).0, [255, 255, 255, 255]);
    }

    #[test]
    fn rounded_corners_leave_background() {
        let opts = RasterOptions { scale: 1, background: palette::WHITE, padding: 0 };
        let cmds = [PaintCommand::Circle { x: 0, y: 0, diameter: 20, rgba: palette::BLACK }];
        let img = decode(&SoftwareRasterizer.rasterize(&cmds, (20, 20), &opts).unwrap());
        assert_eq!(img.get_pixel(0, 0).0, [255, 255, 255, 255]);
        assert_eq!(img.get_pixel(10, 10).0, [0, 0, 0, 255]);
    }

    #[test]
    fn oversized_canvas_is_rejected_before_allocating() {
        let opts = RasterOptions { scale: 2, background: palette::WHITE, padding: 16 };
        assert!(matches!(
            SoftwareRasterizer.rasterize(&[], (448, u32::MAX), &opts),
            Err(Error::ExportError(_))
        ));
        assert!(matches!(
            SoftwareRasterizer.rasterize(&[], (448, 200_000), &opts),
            Err(Error::ExportError(msg)) if msg.contains("pixel limit")
        ));
    }

    #[test]
    fn zero_scale_is_an_error() {
        let opts = RasterOptions { scale: 0, background: palette::WHITE, padding: 0 };
        assert!(matches!(
            SoftwareRasterizer.rasterize(&[], (4, 4), &opts),
            Err(Error::ExportError(_))
        ));
    }
}
