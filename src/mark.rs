//! Mark data structures.
//!
//! A mark is a single geometric annotation (point, circle, or rectangle)
//! placed on an image, optionally carrying a reviewer comment. Coordinates
//! are always image-intrinsic pixels relative to the source image's native
//! resolution, never display pixels.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::geometry::ImagePoint;

/// Minimum extent (pixels) a dragged circle radius or rectangle side must
/// exceed for the gesture to produce a mark. Sub-threshold drags are
/// discarded without an error.
pub const MIN_EXTENT: f32 = 5.0;

/// Shape variants, tagged so an unhandled variant cannot fall through a
/// match silently.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum MarkShape {
    Point { x: f32, y: f32 },
    Circle { x: f32, y: f32, radius: f32 },
    #[serde(rename = "rectangle")]
    Rect { x: f32, y: f32, width: f32, height: f32 },
}

impl MarkShape {
    /// Anchor point: the point itself, the circle center, or the
    /// rectangle's top-left corner.
    pub fn anchor(&self) -> ImagePoint {
        match *self {
            MarkShape::Point { x, y } => ImagePoint { x, y },
            MarkShape::Circle { x, y, .. } => ImagePoint { x, y },
            MarkShape::Rect { x, y, .. } => ImagePoint { x, y },
        }
    }

    /// Top-right corner of the shape's bounding box, where the
    /// comment-indicator dot is rendered.
    pub fn indicator_corner(&self) -> ImagePoint {
        match *self {
            MarkShape::Point { x, y } => ImagePoint { x, y },
            MarkShape::Circle { x, y, radius } => ImagePoint {
                x: x + radius,
                y: y - radius,
            },
            MarkShape::Rect { x, y, width, .. } => ImagePoint { x: x + width, y },
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            MarkShape::Point { .. } => "Point",
            MarkShape::Circle { .. } => "Circle",
            MarkShape::Rect { .. } => "Rectangle",
        }
    }
}

/// The shape tool currently armed for drawing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MarkKind {
    Point,
    Circle,
    Rect,
}

impl MarkKind {
    pub fn parse(name: &str) -> Option<Self> {
        match name {
            "point" => Some(Self::Point),
            "circle" => Some(Self::Circle),
            "rectangle" => Some(Self::Rect),
            _ => None,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::Point => "point",
            Self::Circle => "circle",
            Self::Rect => "rectangle",
        }
    }
}

/// Fixed mark color palette.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MarkColor {
    Blue,
    Green,
    Red,
    Yellow,
    Purple,
}

impl MarkColor {
    pub fn parse(name: &str) -> Option<Self> {
        match name {
            "blue" => Some(Self::Blue),
            "green" => Some(Self::Green),
            "red" => Some(Self::Red),
            "yellow" => Some(Self::Yellow),
            "purple" => Some(Self::Purple),
            _ => None,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::Blue => "blue",
            Self::Green => "green",
            Self::Red => "red",
            Self::Yellow => "yellow",
            Self::Purple => "purple",
        }
    }

    pub fn rgba(self) -> [u8; 4] {
        match self {
            Self::Blue => [0x21, 0x96, 0xf3, 0xff],
            Self::Green => [0x4c, 0xaf, 0x50, 0xff],
            Self::Red => [0xf4, 0x43, 0x36, 0xff],
            Self::Yellow => [0xff, 0xeb, 0x3b, 0xff],
            Self::Purple => [0x9c, 0x27, 0xb0, 0xff],
        }
    }
}

/// A persisted mark. The id and timestamp are assigned by the repository on
/// creation; geometry is immutable afterwards, only the comment may change.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Mark {
    pub id: Uuid,
    #[serde(flatten)]
    pub shape: MarkShape,
    pub color: MarkColor,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
    pub author: String,
    pub created_at: DateTime<Utc>,
}

impl Mark {
    pub fn has_comment(&self) -> bool {
        self.comment.as_deref().is_some_and(|c| !c.is_empty())
    }
}

/// A mark awaiting persistence; the repository fills in id and timestamp.
#[derive(Debug, Clone, PartialEq)]
pub struct NewMark {
    pub shape: MarkShape,
    pub color: MarkColor,
    pub comment: Option<String>,
    pub author: String,
}

/// Point marks are always valid; there is no minimum-size rejection.
pub fn point_at(p: ImagePoint) -> MarkShape {
    MarkShape::Point { x: p.x, y: p.y }
}

/// Circle dragged from its center. Returns `None` when the radius does not
/// exceed the minimum extent.
pub fn circle_from_drag(anchor: ImagePoint, end: ImagePoint) -> Option<MarkShape> {
    let radius = anchor.distance_to(end);
    (radius > MIN_EXTENT).then_some(MarkShape::Circle {
        x: anchor.x,
        y: anchor.y,
        radius,
    })
}

/// Rectangle dragged between two corners, normalized so the anchor is the
/// top-left corner and the extents are positive regardless of drag
/// direction. Returns `None` when either side does not exceed the minimum
/// extent.
pub fn rect_from_drag(anchor: ImagePoint, end: ImagePoint) -> Option<MarkShape> {
    let width = (end.x - anchor.x).abs();
    let height = (end.y - anchor.y).abs();
    (width > MIN_EXTENT && height > MIN_EXTENT).then_some(MarkShape::Rect {
        x: anchor.x.min(end.x),
        y: anchor.y.min(end.y),
        width,
        height,
    })
}

/// Validated shape for a completed drag with the given tool, or `None` when
/// the gesture is below the minimum-size threshold.
pub fn shape_from_drag(kind: MarkKind, anchor: ImagePoint, end: ImagePoint) -> Option<MarkShape> {
    match kind {
        MarkKind::Point => Some(point_at(end)),
        MarkKind::Circle => circle_from_drag(anchor, end),
        MarkKind::Rect => rect_from_drag(anchor, end),
    }
}

/// Unvalidated shape for the live preview while a drag is in progress.
/// Sub-threshold geometry is still previewed; the threshold only applies
/// when the drag completes.
pub fn preview_shape(kind: MarkKind, anchor: ImagePoint, current: ImagePoint) -> MarkShape {
    match kind {
        MarkKind::Point => point_at(current),
        MarkKind::Circle => MarkShape::Circle {
            x: anchor.x,
            y: anchor.y,
            radius: anchor.distance_to(current),
        },
        MarkKind::Rect => MarkShape::Rect {
            x: anchor.x.min(current.x),
            y: anchor.y.min(current.y),
            width: (current.x - anchor.x).abs(),
            height: (current.y - anchor.y).abs(),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pt(x: f32, y: f32) -> ImagePoint {
        ImagePoint { x, y }
    }

    #[test]
    fn rect_drag_normalizes_to_top_left() {
        let shape = rect_from_drag(pt(100.0, 100.0), pt(40.0, 30.0)).unwrap();
        assert_eq!(
            shape,
            MarkShape::Rect {
                x: 40.0,
                y: 30.0,
                width: 60.0,
                height: 70.0
            }
        );
    }

    #[test]
    fn rect_drag_same_result_for_all_directions() {
        let a = rect_from_drag(pt(10.0, 10.0), pt(50.0, 40.0)).unwrap();
        let b = rect_from_drag(pt(50.0, 40.0), pt(10.0, 10.0)).unwrap();
        let c = rect_from_drag(pt(50.0, 10.0), pt(10.0, 40.0)).unwrap();
        assert_eq!(a, b);
        assert_eq!(a, c);
    }

    #[test]
    fn sub_threshold_circle_is_rejected() {
        assert!(circle_from_drag(pt(0.0, 0.0), pt(4.0, 0.0)).is_none());
        let shape = circle_from_drag(pt(0.0, 0.0), pt(6.0, 0.0)).unwrap();
        assert_eq!(
            shape,
            MarkShape::Circle {
                x: 0.0,
                y: 0.0,
                radius: 6.0
            }
        );
    }

    #[test]
    fn sub_threshold_rect_is_rejected() {
        // One valid side is not enough; both must exceed the threshold.
        assert!(rect_from_drag(pt(0.0, 0.0), pt(100.0, 4.0)).is_none());
        assert!(rect_from_drag(pt(0.0, 0.0), pt(4.0, 100.0)).is_none());
        assert!(rect_from_drag(pt(0.0, 0.0), pt(6.0, 6.0)).is_some());
    }

    #[test]
    fn points_have_no_minimum_size() {
        assert_eq!(
            shape_from_drag(MarkKind::Point, pt(5.0, 5.0), pt(5.0, 5.0)),
            Some(MarkShape::Point { x: 5.0, y: 5.0 })
        );
    }

    #[test]
    fn preview_is_not_size_gated() {
        let shape = preview_shape(MarkKind::Circle, pt(0.0, 0.0), pt(2.0, 0.0));
        assert_eq!(
            shape,
            MarkShape::Circle {
                x: 0.0,
                y: 0.0,
                radius: 2.0
            }
        );
    }

    #[test]
    fn shape_serializes_with_type_tag() {
        let json = serde_json::to_value(MarkShape::Circle {
            x: 1.0,
            y: 2.0,
            radius: 10.0,
        })
        .unwrap();
        assert_eq!(json["type"], "circle");
        assert_eq!(json["radius"], 10.0);

        let rect: MarkShape = serde_json::from_str(
            r#"{"type":"rectangle","x":1.0,"y":2.0,"width":3.0,"height":4.0}"#,
        )
        .unwrap();
        assert_eq!(
            rect,
            MarkShape::Rect {
                x: 1.0,
                y: 2.0,
                width: 3.0,
                height: 4.0
            }
        );
    }
}
