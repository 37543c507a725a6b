//! Utility functions for the markboard application.

use slint::{Rgba8Pixel, SharedPixelBuffer};

use crate::mark::MarkColor;
use crate::render::Frame;

/// Checkerboard shown while no image is loaded. RGBA like the rest of
/// the render pipeline.
pub fn placeholder_image() -> slint::Image {
    let (width, height) = (64u32, 64u32);
    let mut buffer = SharedPixelBuffer::<Rgba8Pixel>::new(width, height);
    let data = buffer.make_mut_bytes();
    for y in 0..height {
        for x in 0..width {
            let v = if (x / 8 + y / 8) % 2 == 0 { 52 } else { 96 };
            let i = ((y * width + x) * 4) as usize;
            data[i..i + 3].fill(v);
            data[i + 3] = 0xff;
        }
    }
    slint::Image::from_rgba8(buffer)
}

/// Wrap a rendered frame into a displayable image
pub fn frame_to_image(frame: &Frame) -> slint::Image {
    let buffer =
        SharedPixelBuffer::<Rgba8Pixel>::clone_from_slice(&frame.pixels, frame.width, frame.height);
    slint::Image::from_rgba8(buffer)
}

/// Palette color as a Slint color, for the sidebar swatches
pub fn mark_tint(color: MarkColor) -> slint::Color {
    let [r, g, b, _] = color.rgba();
    slint::Color::from_rgb_u8(r, g, b)
}
