//! Coordinate mapping and hit testing.
//!
//! All mark geometry lives in image-intrinsic pixel coordinates (the source
//! image's native resolution). Pointer events arrive in display coordinates
//! local to the rendered canvas element and are mapped here on every event,
//! so viewport resizes can never leave marks visually drifted.

use crate::mark::{Mark, MarkShape};

/// Hit radius (intrinsic pixels) for point marks, independent of the
/// rendered dot size so small points stay clickable.
pub const POINT_HIT_RADIUS: f32 = 10.0;

/// A position in image-intrinsic pixel coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ImagePoint {
    pub x: f32,
    pub y: f32,
}

impl ImagePoint {
    pub fn distance_to(self, other: ImagePoint) -> f32 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        (dx * dx + dy * dy).sqrt()
    }
}

/// On-screen size of the rendered canvas element, in display pixels.
/// Re-read from the UI on every pointer event; never cached.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DisplaySize {
    pub width: f32,
    pub height: f32,
}

/// Map a pointer position local to the canvas element into image-intrinsic
/// coordinates. Positions outside the element map to coordinates outside
/// `[0, w] x [0, h]`; downstream logic accepts those without clamping.
pub fn map_to_image(
    local_x: f32,
    local_y: f32,
    display: DisplaySize,
    intrinsic: (u32, u32),
) -> ImagePoint {
    if display.width <= 0.0 || display.height <= 0.0 {
        return ImagePoint { x: 0.0, y: 0.0 };
    }
    let scale_x = intrinsic.0 as f32 / display.width;
    let scale_y = intrinsic.1 as f32 / display.height;
    ImagePoint {
        x: local_x * scale_x,
        y: local_y * scale_y,
    }
}

/// Shape-specific containment test, in intrinsic coordinates.
pub fn hit_test(shape: &MarkShape, p: ImagePoint) -> bool {
    match *shape {
        MarkShape::Point { x, y } => p.distance_to(ImagePoint { x, y }) <= POINT_HIT_RADIUS,
        MarkShape::Circle { x, y, radius } => p.distance_to(ImagePoint { x, y }) <= radius,
        MarkShape::Rect {
            x,
            y,
            width,
            height,
        } => p.x >= x && p.x <= x + width && p.y >= y && p.y <= y + height,
    }
}

/// First mark in iteration order whose containment region covers the click.
/// Overlap tie-break is deliberately list order, not z-order or
/// nearest-center.
pub fn hit_test_marks(marks: &[Mark], p: ImagePoint) -> Option<&Mark> {
    marks.iter().find(|m| hit_test(&m.shape, p))
}
