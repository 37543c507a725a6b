//! Software compositing of the canvas frame.
//!
//! Immediate-mode: every redraw clears the frame, blits the base image at
//! the canvas's intrinsic resolution, strokes each persisted mark in
//! load order, adds comment-indicator dots, and finally strokes the live
//! preview shape if a drag is in progress. Raster loops are clamped to the
//! frame, so per-shape work is bounded by the frame area even when a drag
//! runs far off the canvas, and redrawing on every pointer move stays cheap.
//!
//! If no base image is loaded the render is a no-op; the caller shows a
//! placeholder instead.

use image::RgbaImage;

use crate::mark::{Mark, MarkColor, MarkShape};

/// Default outline thickness, in intrinsic pixels. Configurable via
/// `[drawing] stroke_width`.
pub const DEFAULT_STROKE_WIDTH: f32 = 3.0;

/// Rendered radius of a point mark's dot.
pub const POINT_RADIUS: f32 = 5.0;

/// Radius of the comment-indicator dot.
const INDICATOR_RADIUS: f32 = 4.0;

/// Amber, fixed regardless of the mark's own color.
const INDICATOR_COLOR: [u8; 4] = [0xff, 0xc1, 0x07, 0xff];

/// An RGBA8 pixel buffer at the image's intrinsic resolution.
#[derive(Debug, Clone, PartialEq)]
pub struct Frame {
    pub width: u32,
    pub height: u32,
    pub pixels: Vec<u8>,
}

impl Frame {
    fn from_base(base: &RgbaImage) -> Self {
        Self {
            width: base.width(),
            height: base.height(),
            pixels: base.as_raw().clone(),
        }
    }

    pub fn pixel(&self, x: u32, y: u32) -> [u8; 4] {
        let i = ((y * self.width + x) * 4) as usize;
        [
            self.pixels[i],
            self.pixels[i + 1],
            self.pixels[i + 2],
            self.pixels[i + 3],
        ]
    }

    fn set_pixel(&mut self, x: i64, y: i64, color: [u8; 4]) {
        if x < 0 || y < 0 || x >= self.width as i64 || y >= self.height as i64 {
            return;
        }
        let i = ((y as u32 * self.width + x as u32) * 4) as usize;
        self.pixels[i..i + 4].copy_from_slice(&color);
    }
}

/// Composite one frame. Returns `None` while no base image is loaded; all
/// drawing is gated on image-load completion.
pub fn render_frame(
    base: Option<&RgbaImage>,
    marks: &[Mark],
    preview: Option<(MarkShape, MarkColor)>,
    stroke_width: f32,
) -> Option<Frame> {
    let base = base?;
    let mut frame = Frame::from_base(base);

    // Persisted marks in load order; no z-index reordering.
    for mark in marks {
        stroke_shape(&mut frame, &mark.shape, mark.color.rgba(), stroke_width);
        if mark.has_comment() {
            if let MarkShape::Circle { .. } | MarkShape::Rect { .. } = mark.shape {
                let corner = mark.shape.indicator_corner();
                fill_disc(&mut frame, corner.x, corner.y, INDICATOR_RADIUS, INDICATOR_COLOR);
            }
        }
    }

    if let Some((shape, color)) = preview {
        stroke_shape(&mut frame, &shape, color.rgba(), stroke_width);
    }

    Some(frame)
}

fn stroke_shape(frame: &mut Frame, shape: &MarkShape, color: [u8; 4], stroke_width: f32) {
    match *shape {
        MarkShape::Point { x, y } => fill_disc(frame, x, y, POINT_RADIUS, color),
        MarkShape::Circle { x, y, radius } => {
            stroke_circle(frame, x, y, radius, color, stroke_width)
        }
        MarkShape::Rect {
            x,
            y,
            width,
            height,
        } => stroke_rect(frame, x, y, width, height, color, stroke_width),
    }
}

fn stroke_rect(frame: &mut Frame, x: f32, y: f32, w: f32, h: f32, color: [u8; 4], stroke: f32) {
    let t = stroke.round().max(1.0) as i64;
    // Bands are centered on the edges so the corners come out symmetric.
    let o = t / 2;
    let x0 = x.round() as i64;
    let y0 = y.round() as i64;
    let x1 = (x + w).round() as i64;
    let y1 = (y + h).round() as i64;

    // Top and bottom bands, then left and right bands.
    fill_rect(frame, x0 - o, y0 - o, x1 - x0 + t, t, color);
    fill_rect(frame, x0 - o, y1 - o, x1 - x0 + t, t, color);
    fill_rect(frame, x0 - o, y0 - o, t, y1 - y0 + t, color);
    fill_rect(frame, x1 - o, y0 - o, t, y1 - y0 + t, color);
}

fn fill_rect(frame: &mut Frame, x: i64, y: i64, w: i64, h: i64, color: [u8; 4]) {
    let py0 = y.max(0);
    let py1 = (y + h).min(frame.height as i64);
    let px0 = x.max(0);
    let px1 = (x + w).min(frame.width as i64);
    for py in py0..py1 {
        for px in px0..px1 {
            frame.set_pixel(px, py, color);
        }
    }
}

/// Scan bounds for a disc of `reach` around `(cx, cy)`, intersected with
/// the frame. Keeps the per-shape work bounded by the frame area no matter
/// how far a drag ran off the canvas.
fn clamped_bounds(frame: &Frame, cx: f32, cy: f32, reach: i64) -> (i64, i64, i64, i64) {
    let x0 = (cx.floor() as i64 - reach).max(0);
    let y0 = (cy.floor() as i64 - reach).max(0);
    let x1 = (cx.floor() as i64 + reach).min(frame.width as i64 - 1);
    let y1 = (cy.floor() as i64 + reach).min(frame.height as i64 - 1);
    (x0, y0, x1, y1)
}

fn stroke_circle(frame: &mut Frame, cx: f32, cy: f32, radius: f32, color: [u8; 4], stroke: f32) {
    let half = stroke.max(1.0) / 2.0;
    let reach = (radius + half).ceil() as i64 + 1;
    let (x0, y0, x1, y1) = clamped_bounds(frame, cx, cy, reach);
    for py in y0..=y1 {
        for px in x0..=x1 {
            let dx = px as f32 + 0.5 - cx;
            let dy = py as f32 + 0.5 - cy;
            let dist = (dx * dx + dy * dy).sqrt();
            if (dist - radius).abs() <= half {
                frame.set_pixel(px, py, color);
            }
        }
    }
}

fn fill_disc(frame: &mut Frame, cx: f32, cy: f32, radius: f32, color: [u8; 4]) {
    let reach = radius.ceil() as i64 + 1;
    let (x0, y0, x1, y1) = clamped_bounds(frame, cx, cy, reach);
    for py in y0..=y1 {
        for px in x0..=x1 {
            let dx = px as f32 + 0.5 - cx;
            let dy = py as f32 + 0.5 - cy;
            if (dx * dx + dy * dy).sqrt() <= radius {
                frame.set_pixel(px, py, color);
            }
        }
    }
}
