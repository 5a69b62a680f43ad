use image::{DynamicImage, imageops::FilterType};
use ratatui::{
  buffer::Buffer,
  layout::Rect,
  style::{Color, Style},
  widgets::Widget,
};

use crate::display::DisplayMode;

// --- Preview Widget ---

/// Draws an already-resized preview centered in its area.
pub struct PreviewWidget<'a> {
  pub image: &'a DynamicImage,
  pub display_mode: DisplayMode,
}

const ASCII_CHARS: [&str; 10] = [" ", ".", ":", "-", "=", "+", "*", "#", "%", "@"];

impl Widget for PreviewWidget<'_> {
  fn render(self, area: Rect, buf: &mut Buffer) {
    if area.is_empty() {
      return;
    }
    match self.display_mode {
      DisplayMode::Direct => render_direct(self.image, area, buf),
      DisplayMode::Ascii => render_ascii(self.image, area, buf),
    }
  }
}

/// Resize `image` to cover a `cols` x `rows` cell area for the given mode.
pub fn fit_to_cells(image: &DynamicImage, cols: u16, rows: u16, mode: DisplayMode) -> DynamicImage {
  let w = u32::from(cols).max(1);
  let h = (u32::from(rows) * mode.pixels_per_row()).max(1);
  image.resize_to_fill(w, h, FilterType::Lanczos3)
}

fn cell(area: Rect, offset: u32, pos: u32) -> u16 {
  let v = offset.saturating_add(pos).min(u32::from(u16::MAX)) as u16;
  area.x.saturating_add(v)
}

fn row(area: Rect, offset: u32, pos: u32) -> u16 {
  let v = offset.saturating_add(pos).min(u32::from(u16::MAX)) as u16;
  area.y.saturating_add(v)
}

fn render_direct(image: &DynamicImage, area: Rect, buf: &mut Buffer) {
  let rgb = image.to_rgb8();
  let img_w = rgb.width().min(u32::from(area.width));
  let img_h = rgb.height();
  let cell_h = img_h.div_ceil(2).min(u32::from(area.height));
  let offset_x = u32::from(area.width).saturating_sub(img_w) / 2;
  let offset_y = u32::from(area.height).saturating_sub(cell_h) / 2;

  for y in 0..cell_h {
    for x in 0..img_w {
      let upper = rgb.get_pixel(x, y * 2);
      let fg = Color::Rgb(upper[0], upper[1], upper[2]);
      let bg = if y * 2 + 1 < img_h {
        let lower = rgb.get_pixel(x, y * 2 + 1);
        Color::Rgb(lower[0], lower[1], lower[2])
      } else {
        Color::Reset
      };
      buf.set_string(cell(area, offset_x, x), row(area, offset_y, y), "▀", Style::default().fg(fg).bg(bg));
    }
  }
}

fn render_ascii(image: &DynamicImage, area: Rect, buf: &mut Buffer) {
  let luma = image.to_luma8();
  let img_w = luma.width().min(u32::from(area.width));
  let img_h = luma.height().min(u32::from(area.height));
  let offset_x = u32::from(area.width).saturating_sub(img_w) / 2;
  let offset_y = u32::from(area.height).saturating_sub(img_h) / 2;

  for y in 0..img_h {
    for x in 0..img_w {
      let idx = ascii_index(luma.get_pixel(x, y)[0]);
      buf.set_string(cell(area, offset_x, x), row(area, offset_y, y), ASCII_CHARS[idx], Style::default());
    }
  }
}

fn ascii_index(luma: u8) -> usize {
  let idx = ((f32::from(luma) / 255.0) * (ASCII_CHARS.len() - 1) as f32).round() as usize;
  idx.min(ASCII_CHARS.len() - 1)
}
