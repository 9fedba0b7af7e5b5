//! Raster image drawn with upper-half blocks: each cell shows two vertically
//! stacked pixels, the top one as foreground and the bottom one as background.

use image::imageops::{self, FilterType};
use image::RgbImage;
use ratatui::{buffer::Buffer, layout::Rect, style::Color, widgets::Widget};

pub struct HalfBlockImage<'a> {
    image: &'a RgbImage,
}

impl<'a> HalfBlockImage<'a> {
    pub fn new(image: &'a RgbImage) -> Self {
        Self { image }
    }

    /// Pixel size that fits `area` (two pixels per row) keeping aspect ratio
    pub fn fitted_size(&self, area: Rect) -> (u32, u32) {
        let (src_w, src_h) = self.image.dimensions();
        if src_w == 0 || src_h == 0 || area.width == 0 || area.height == 0 {
            return (0, 0);
        }
        let max_w = area.width as f64;
        let max_h = area.height as f64 * 2.0;
        let scale = (max_w / src_w as f64).min(max_h / src_h as f64);
        let w = ((src_w as f64 * scale).floor() as u32).clamp(1, area.width as u32);
        let h = ((src_h as f64 * scale).floor() as u32).clamp(1, area.height as u32 * 2);
        (w, h)
    }
}

impl<'a> Widget for HalfBlockImage<'a> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let (w, h) = self.fitted_size(area);
        if w == 0 || h == 0 {
            return;
        }
        let scaled = imageops::resize(self.image, w, h, FilterType::Triangle);

        let x_offset = (area.width as u32 - w) / 2;
        let rows = h.div_ceil(2);
        let y_offset = (area.height as u32).saturating_sub(rows) / 2;

        for row in 0..rows {
            for col in 0..w {
                let top = scaled.get_pixel(col, row * 2);
                let bottom = if row * 2 + 1 < h {
                    let px = scaled.get_pixel(col, row * 2 + 1);
                    Color::Rgb(px[0], px[1], px[2])
                } else {
                    Color::Reset
                };
                let x = area.x + (x_offset + col) as u16;
                let y = area.y + (y_offset + row) as u16;
                buf.get_mut(x, y)
                    .set_symbol("▀")
                    .set_fg(Color::Rgb(top[0], top[1], top[2]))
                    .set_bg(bottom);
            }
        }
    }
}
