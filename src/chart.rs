// src/chart.rs
//! Line chart of the time gap per bulletin month, written as PNG.
//!
//! x = calendar month (every N-th label, drawn vertically), y = gap in months.
//! All text (title, captions, tick labels) uses a built-in 5×7 bitmap font.

use std::io::Cursor;

use image::{ImageFormat, Rgb, RgbImage};
use tracing::debug;

use crate::config::options::ChartOptions;
use crate::data::Dataset;
use crate::error::Error;
use crate::file::{ensure_parent, write_atomic};

const BACKGROUND: Rgb<u8> = Rgb([255, 255, 255]);
const GRID: Rgb<u8> = Rgb([225, 225, 225]);
const AXIS: Rgb<u8> = Rgb([0, 0, 0]);
pub const TEXT: Rgb<u8> = Rgb([40, 40, 40]);
pub const SERIES: Rgb<u8> = Rgb([31, 119, 180]);

pub const TITLE: &str = "Time Gap vs Calendar Date";
pub const X_CAPTION: &str = "Calendar Date";
pub const Y_CAPTION: &str = "Time Gap (months)";

const MARGIN_LEFT: u32 = 72;
const MARGIN_RIGHT: u32 = 24;
const MARGIN_TOP: u32 = 40;
const MARGIN_BOTTOM: u32 = 72;
const TITLE_Y: u32 = 10;
const TITLE_SCALE: u32 = 2;
const Y_CAPTION_X: u32 = 8;
/// Tallest x tick label (`YYYY-MM`, drawn vertically).
const X_LABEL_CHARS: u32 = 7;
/// Narrowest x spacing before the canvas starts growing.
const MIN_STEP_X: u32 = 8;
const TARGET_Y_TICKS: i32 = 8;
const MARKER_RADIUS: i64 = 2;

const GLYPH_W: i64 = 5;
const GLYPH_H: i64 = 7;
const GLYPH_ADVANCE: i64 = GLYPH_W + 1;

/// Pixel extent of a line of `chars` glyphs at `scale`.
fn text_len(chars: usize, scale: u32) -> u32 {
    (chars as u32 * GLYPH_ADVANCE as u32 - 1) * scale
}

/// Axis-aligned pixel box.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Rect {
    pub x: u32,
    pub y: u32,
    pub w: u32,
    pub h: u32,
}

/// Where everything goes, computed once from the series.
#[derive(Clone, Debug, PartialEq)]
pub struct ChartLayout {
    pub width: u32,
    pub height: u32,
    left: f64,
    right: f64,
    top: f64,
    bottom: f64,
    len: usize,
    y_lo: i32,
    y_hi: i32,
    y_step: i32,
    label_every: usize,
}

impl ChartLayout {
    pub fn new(values: &[i32], opts: &ChartOptions) -> Self {
        let len = values.len();
        let needed = MARGIN_LEFT + MARGIN_RIGHT + MIN_STEP_X * (len as u32).saturating_sub(1);
        let title_fit = text_len(TITLE.len(), TITLE_SCALE) + 2 * MARGIN_RIGHT;
        let caption_fit = text_len(Y_CAPTION.len(), 1) + 2 * Y_CAPTION_X;
        let width = opts.width.max(needed).max(title_fit);
        let height = opts.height.max(MARGIN_TOP + MARGIN_BOTTOM + 100).max(caption_fit);

        let lo = values.iter().copied().min().unwrap_or(0);
        let hi = values.iter().copied().max().unwrap_or(0);
        let y_step = nice_step(hi - lo);
        let mut y_lo = lo.div_euclid(y_step) * y_step;
        let mut y_hi = -((-hi).div_euclid(y_step)) * y_step;
        if y_lo == y_hi {
            y_lo -= y_step;
            y_hi += y_step;
        }

        Self {
            width,
            height,
            left: MARGIN_LEFT as f64,
            right: (width - MARGIN_RIGHT) as f64,
            top: MARGIN_TOP as f64,
            bottom: (height - MARGIN_BOTTOM) as f64,
            len,
            y_lo,
            y_hi,
            y_step,
            label_every: opts.label_every.max(1),
        }
    }

    fn x_at(&self, i: usize) -> f64 {
        if self.len <= 1 {
            return (self.left + self.right) / 2.0;
        }
        self.left + (self.right - self.left) * i as f64 / (self.len - 1) as f64
    }

    fn y_at(&self, v: i32) -> f64 {
        let span = (self.y_hi - self.y_lo) as f64;
        self.bottom - (self.bottom - self.top) * (v - self.y_lo) as f64 / span
    }

    /// Pixel centre of the `i`-th point with value `v`.
    pub fn point(&self, i: usize, v: i32) -> (u32, u32) {
        (self.x_at(i).round() as u32, self.y_at(v).round() as u32)
    }

    /// Indices whose x label is drawn.
    pub fn x_label_indices(&self) -> impl Iterator<Item = usize> {
        (0..self.len).step_by(self.label_every)
    }

    pub fn y_ticks(&self) -> impl Iterator<Item = i32> {
        let step = self.y_step;
        (self.y_lo..=self.y_hi).step_by(step as usize)
    }

    /// Title, centred above the plot.
    pub fn title_rect(&self) -> Rect {
        let w = text_len(TITLE.len(), TITLE_SCALE);
        Rect { x: (self.width - w) / 2, y: TITLE_Y, w, h: GLYPH_H as u32 * TITLE_SCALE }
    }

    /// x caption, centred under the tick labels.
    pub fn x_caption_rect(&self) -> Rect {
        let w = text_len(X_CAPTION.len(), 1);
        let mid = ((self.left + self.right) / 2.0) as u32;
        let y = self.bottom as u32 + 16 + text_len(X_LABEL_CHARS as usize, 1);
        Rect { x: mid.saturating_sub(w / 2), y, w, h: GLYPH_H as u32 }
    }

    /// y caption, reading bottom to top along the left edge.
    pub fn y_caption_rect(&self) -> Rect {
        let h = text_len(Y_CAPTION.len(), 1);
        let mid = ((self.top + self.bottom) / 2.0) as u32;
        Rect { x: Y_CAPTION_X, y: mid.saturating_sub(h / 2), w: GLYPH_H as u32, h }
    }
}

/// 1, 2 or 5 × 10^k, large enough for about `TARGET_Y_TICKS` intervals.
fn nice_step(span: i32) -> i32 {
    let raw = ((span + TARGET_Y_TICKS - 1) / TARGET_Y_TICKS).max(1);
    let mut mag = 1;
    while mag * 10 <= raw {
        mag *= 10;
    }
    [1, 2, 5, 10].into_iter().map(|m| m * mag).find(|s| *s >= raw).unwrap_or(10 * mag)
}

/// Draw the dataset into an in-memory image.
pub fn draw(ds: &Dataset, opts: &ChartOptions) -> (RgbImage, ChartLayout) {
    let labels: Vec<String> = ds.iter().map(|r| r.calendar().to_string()).collect();
    let values: Vec<i32> = ds.iter().map(|r| r.elapsed_months()).collect();
    let layout = ChartLayout::new(&values, opts);
    let mut img = RgbImage::from_pixel(layout.width, layout.height, BACKGROUND);

    let (left, right) = (layout.left as i64, layout.right as i64);
    let (top, bottom) = (layout.top as i64, layout.bottom as i64);

    // Grid + y labels
    for v in layout.y_ticks() {
        let y = layout.y_at(v).round() as i64;
        line(&mut img, left, y, right, y, GRID);
        line(&mut img, left - 4, y, left, y, AXIS);
        let text = v.to_string();
        let w = text_len(text.len(), 1) as i64;
        text_horizontal(&mut img, &text, left - 8 - w, y - GLYPH_H / 2, 1, TEXT);
    }
    for i in layout.x_label_indices() {
        let x = layout.x_at(i).round() as i64;
        line(&mut img, x, top, x, bottom, GRID);
        line(&mut img, x, bottom, x, bottom + 4, AXIS);
        let text = &labels[i];
        let h = text_len(text.len(), 1) as i64;
        text_vertical(&mut img, text, x - GLYPH_H / 2, bottom + 8 + h, TEXT);
    }

    // Title + captions
    let r = layout.title_rect();
    text_horizontal(&mut img, TITLE, r.x as i64, r.y as i64, TITLE_SCALE as i64, TEXT);
    let r = layout.x_caption_rect();
    text_horizontal(&mut img, X_CAPTION, r.x as i64, r.y as i64, 1, TEXT);
    let r = layout.y_caption_rect();
    text_vertical(&mut img, Y_CAPTION, r.x as i64, (r.y + r.h - 1) as i64, TEXT);

    // Axes
    line(&mut img, left, top, left, bottom, AXIS);
    line(&mut img, left, bottom, right, bottom, AXIS);

    // Series: lines first, markers on top
    let points: Vec<(i64, i64)> = values
        .iter()
        .enumerate()
        .map(|(i, v)| {
            let (x, y) = layout.point(i, *v);
            (x as i64, y as i64)
        })
        .collect();
    for pair in points.windows(2) {
        let ((x0, y0), (x1, y1)) = (pair[0], pair[1]);
        line(&mut img, x0, y0, x1, y1, SERIES);
        line(&mut img, x0, y0 + 1, x1, y1 + 1, SERIES);
    }
    for &(x, y) in &points {
        for dy in -MARKER_RADIUS..=MARKER_RADIUS {
            for dx in -MARKER_RADIUS..=MARKER_RADIUS {
                set(&mut img, x + dx, y + dy, SERIES);
            }
        }
    }

    (img, layout)
}

/// Render and atomically write the PNG to `opts.path`.
pub fn render(ds: &Dataset, opts: &ChartOptions) -> Result<(), Error> {
    let chart_err = |reason: String| Error::Chart { path: opts.path.clone(), reason };

    let (img, layout) = draw(ds, opts);
    let mut buf = Cursor::new(Vec::new());
    img.write_to(&mut buf, ImageFormat::Png).map_err(|e| chart_err(e.to_string()))?;

    ensure_parent(&opts.path).map_err(|e| chart_err(e.to_string()))?;
    write_atomic(&opts.path, buf.get_ref()).map_err(|e| chart_err(e.to_string()))?;
    debug!(path = %opts.path.display(), width = layout.width, height = layout.height, "chart written");
    Ok(())
}

/* ---------- raster helpers ---------- */

fn set(img: &mut RgbImage, x: i64, y: i64, c: Rgb<u8>) {
    if x >= 0 && y >= 0 && (x as u32) < img.width() && (y as u32) < img.height() {
        img.put_pixel(x as u32, y as u32, c);
    }
}

/// Bresenham.
fn line(img: &mut RgbImage, mut x0: i64, mut y0: i64, x1: i64, y1: i64, c: Rgb<u8>) {
    let dx = (x1 - x0).abs();
    let dy = -(y1 - y0).abs();
    let sx = if x0 < x1 { 1 } else { -1 };
    let sy = if y0 < y1 { 1 } else { -1 };
    let mut err = dx + dy;
    loop {
        set(img, x0, y0, c);
        if x0 == x1 && y0 == y1 { break; }
        let e2 = 2 * err;
        if e2 >= dy { err += dy; x0 += sx; }
        if e2 <= dx { err += dx; y0 += sy; }
    }
}

/// 5×7 rows, bit 4 = leftmost column.
fn glyph(ch: char) -> Option<[u8; 7]> {
    Some(match ch {
        ' ' => [0x00; 7],
        '-' => [0x00, 0x00, 0x00, 0x1F, 0x00, 0x00, 0x00],
        '(' => [0x02, 0x04, 0x08, 0x08, 0x08, 0x04, 0x02],
        ')' => [0x08, 0x04, 0x02, 0x02, 0x02, 0x04, 0x08],
        '0' => [0x0E, 0x11, 0x13, 0x15, 0x19, 0x11, 0x0E],
        '1' => [0x04, 0x0C, 0x04, 0x04, 0x04, 0x04, 0x0E],
        '2' => [0x0E, 0x11, 0x01, 0x02, 0x04, 0x08, 0x1F],
        '3' => [0x1F, 0x02, 0x04, 0x02, 0x01, 0x11, 0x0E],
        '4' => [0x02, 0x06, 0x0A, 0x12, 0x1F, 0x02, 0x02],
        '5' => [0x1F, 0x10, 0x1E, 0x01, 0x01, 0x11, 0x0E],
        '6' => [0x06, 0x08, 0x10, 0x1E, 0x11, 0x11, 0x0E],
        '7' => [0x1F, 0x01, 0x02, 0x04, 0x08, 0x08, 0x08],
        '8' => [0x0E, 0x11, 0x11, 0x0E, 0x11, 0x11, 0x0E],
        '9' => [0x0E, 0x11, 0x11, 0x0F, 0x01, 0x02, 0x0C],
        'A' => [0x0E, 0x11, 0x11, 0x1F, 0x11, 0x11, 0x11],
        'B' => [0x1E, 0x11, 0x11, 0x1E, 0x11, 0x11, 0x1E],
        'C' => [0x0E, 0x11, 0x10, 0x10, 0x10, 0x11, 0x0E],
        'D' => [0x1C, 0x12, 0x11, 0x11, 0x11, 0x12, 0x1C],
        'E' => [0x1F, 0x10, 0x10, 0x1E, 0x10, 0x10, 0x1F],
        'F' => [0x1F, 0x10, 0x10, 0x1E, 0x10, 0x10, 0x10],
        'G' => [0x0E, 0x11, 0x10, 0x17, 0x11, 0x11, 0x0F],
        'H' => [0x11, 0x11, 0x11, 0x1F, 0x11, 0x11, 0x11],
        'I' => [0x0E, 0x04, 0x04, 0x04, 0x04, 0x04, 0x0E],
        'J' => [0x07, 0x02, 0x02, 0x02, 0x02, 0x12, 0x0C],
        'K' => [0x11, 0x12, 0x14, 0x18, 0x14, 0x12, 0x11],
        'L' => [0x10, 0x10, 0x10, 0x10, 0x10, 0x10, 0x1F],
        'M' => [0x11, 0x1B, 0x15, 0x15, 0x11, 0x11, 0x11],
        'N' => [0x11, 0x11, 0x19, 0x15, 0x13, 0x11, 0x11],
        'O' => [0x0E, 0x11, 0x11, 0x11, 0x11, 0x11, 0x0E],
        'P' => [0x1E, 0x11, 0x11, 0x1E, 0x10, 0x10, 0x10],
        'Q' => [0x0E, 0x11, 0x11, 0x11, 0x15, 0x12, 0x0D],
        'R' => [0x1E, 0x11, 0x11, 0x1E, 0x14, 0x12, 0x11],
        'S' => [0x0F, 0x10, 0x10, 0x0E, 0x01, 0x01, 0x1E],
        'T' => [0x1F, 0x04, 0x04, 0x04, 0x04, 0x04, 0x04],
        'U' => [0x11, 0x11, 0x11, 0x11, 0x11, 0x11, 0x0E],
        'V' => [0x11, 0x11, 0x11, 0x11, 0x11, 0x0A, 0x04],
        'W' => [0x11, 0x11, 0x11, 0x15, 0x15, 0x15, 0x0A],
        'X' => [0x11, 0x11, 0x0A, 0x04, 0x0A, 0x11, 0x11],
        'Y' => [0x11, 0x11, 0x11, 0x0A, 0x04, 0x04, 0x04],
        'Z' => [0x1F, 0x01, 0x02, 0x04, 0x08, 0x10, 0x1F],
        'a' => [0x00, 0x00, 0x0E, 0x01, 0x0F, 0x11, 0x0F],
        'b' => [0x10, 0x10, 0x16, 0x19, 0x11, 0x11, 0x1E],
        'c' => [0x00, 0x00, 0x0E, 0x10, 0x10, 0x11, 0x0E],
        'd' => [0x01, 0x01, 0x0D, 0x13, 0x11, 0x11, 0x0F],
        'e' => [0x00, 0x00, 0x0E, 0x11, 0x1F, 0x10, 0x0E],
        'f' => [0x06, 0x09, 0x08, 0x1C, 0x08, 0x08, 0x08],
        'g' => [0x00, 0x0F, 0x11, 0x11, 0x0F, 0x01, 0x0E],
        'h' => [0x10, 0x10, 0x16, 0x19, 0x11, 0x11, 0x11],
        'i' => [0x04, 0x00, 0x0C, 0x04, 0x04, 0x04, 0x0E],
        'j' => [0x02, 0x00, 0x06, 0x02, 0x02, 0x12, 0x0C],
        'k' => [0x10, 0x10, 0x12, 0x14, 0x18, 0x14, 0x12],
        'l' => [0x0C, 0x04, 0x04, 0x04, 0x04, 0x04, 0x0E],
        'm' => [0x00, 0x00, 0x1A, 0x15, 0x15, 0x11, 0x11],
        'n' => [0x00, 0x00, 0x16, 0x19, 0x11, 0x11, 0x11],
        'o' => [0x00, 0x00, 0x0E, 0x11, 0x11, 0x11, 0x0E],
        'p' => [0x00, 0x00, 0x1E, 0x11, 0x1E, 0x10, 0x10],
        'q' => [0x00, 0x00, 0x0D, 0x13, 0x0F, 0x01, 0x01],
        'r' => [0x00, 0x00, 0x16, 0x19, 0x10, 0x10, 0x10],
        's' => [0x00, 0x00, 0x0E, 0x10, 0x0E, 0x01, 0x1E],
        't' => [0x08, 0x08, 0x1C, 0x08, 0x08, 0x09, 0x06],
        'u' => [0x00, 0x00, 0x11, 0x11, 0x11, 0x13, 0x0D],
        'v' => [0x00, 0x00, 0x11, 0x11, 0x11, 0x0A, 0x04],
        'w' => [0x00, 0x00, 0x11, 0x11, 0x15, 0x15, 0x0A],
        'x' => [0x00, 0x00, 0x11, 0x0A, 0x04, 0x0A, 0x11],
        'y' => [0x00, 0x00, 0x11, 0x11, 0x0F, 0x01, 0x0E],
        'z' => [0x00, 0x00, 0x1F, 0x02, 0x04, 0x08, 0x1F],
        _ => return None,
    })
}

/// Left-to-right text, (x, y) = top-left, each glyph pixel `scale`×`scale`.
fn text_horizontal(img: &mut RgbImage, text: &str, x: i64, y: i64, scale: i64, c: Rgb<u8>) {
    for (k, ch) in text.chars().enumerate() {
        let Some(rows) = glyph(ch) else { continue };
        for (r, bits) in rows.iter().enumerate() {
            for col in 0..GLYPH_W {
                if bits & (0x10 >> col) == 0 { continue; }
                let px = x + (k as i64 * GLYPH_ADVANCE + col) * scale;
                let py = y + r as i64 * scale;
                for dy in 0..scale {
                    for dx in 0..scale {
                        set(img, px + dx, py + dy, c);
                    }
                }
            }
        }
    }
}

/// Bottom-to-top text (rotated 90° counter-clockwise), (x, y) = bottom-left.
fn text_vertical(img: &mut RgbImage, text: &str, x: i64, y: i64, c: Rgb<u8>) {
    for (k, ch) in text.chars().enumerate() {
        let Some(rows) = glyph(ch) else { continue };
        for (r, bits) in rows.iter().enumerate() {
            for col in 0..GLYPH_W {
                if bits & (0x10 >> col) != 0 {
                    set(img, x + r as i64, y - (k as i64 * GLYPH_ADVANCE + col), c);
                }
            }
        }
    }
}
