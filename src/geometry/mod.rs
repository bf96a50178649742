//! Pure shape math for the drawing tools.
//!
//! Nothing in here touches pixels: every function takes the gesture anchor and the current
//! pointer position (both in surface pixel coordinates) and describes what should be painted.
//! The raster surface decides how to turn a [`ShapePath`] into pixels.

use egui::{Pos2, Rect, Vec2};

mod shapes;

pub use shapes::{
    STAR_POINTS, StarShape, brush_segment, circle, line, rectangle, shape_for_tool, star,
    triangle, triangle_vertices,
};

/// A renderable path description produced by the geometry functions
#[derive(Debug, Clone, PartialEq)]
pub enum ShapePath {
    /// Straight segment. Always stroked, even when fill is enabled.
    Segment { from: Pos2, to: Pos2 },
    /// Axis-aligned box starting at `corner`. The extent may be negative on either axis.
    Rect { corner: Pos2, extent: Vec2 },
    /// Full circle around `center`
    Circle { center: Pos2, radius: f32 },
    /// Closed polygon; the last vertex connects back to the first
    Polygon(Vec<Pos2>),
}

impl ShapePath {
    /// Returns true if the shape has no area (zero-length drag and friends)
    pub fn is_degenerate(&self) -> bool {
        match self {
            Self::Segment { from, to } => from == to,
            Self::Rect { extent, .. } => extent.x == 0.0 || extent.y == 0.0,
            Self::Circle { radius, .. } => *radius == 0.0,
            Self::Polygon(vertices) => polygon_area(vertices) == 0.0,
        }
    }

    /// Bounding box of the path, grown by `padding` on every side
    pub fn bounds(&self, padding: f32) -> Rect {
        match self {
            Self::Segment { from, to } => calculate_bounds(&[*from, *to], padding),
            Self::Rect { corner, extent } => {
                calculate_bounds(&[*corner, *corner + *extent], padding)
            }
            Self::Circle { center, radius } => {
                Rect::from_center_size(*center, Vec2::splat(2.0 * radius)).expand(padding)
            }
            Self::Polygon(vertices) => calculate_bounds(vertices, padding),
        }
    }

    /// Returns true if every coordinate of the path is finite
    pub fn is_finite(&self) -> bool {
        match self {
            Self::Segment { from, to } => from.is_finite() && to.is_finite(),
            Self::Rect { corner, extent } => corner.is_finite() && extent.is_finite(),
            Self::Circle { center, radius } => center.is_finite() && radius.is_finite(),
            Self::Polygon(vertices) => vertices.iter().all(|v| v.is_finite()),
        }
    }
}

/// Calculate distance from a point to a line segment
pub(crate) fn distance_to_line_segment(point: Pos2, line_start: Pos2, line_end: Pos2) -> f32 {
    let line_vec = line_end - line_start;
    let point_vec = point - line_start;

    let line_len = line_vec.length();
    if line_len == 0.0 {
        return point_vec.length();
    }

    let t = ((point_vec.x * line_vec.x + point_vec.y * line_vec.y) / line_len).clamp(0.0, line_len);
    let projection = line_start + (line_vec * t / line_len);
    (point - projection).length()
}

/// Calculate the bounding box for a set of points
pub(crate) fn calculate_bounds(points: &[Pos2], padding: f32) -> Rect {
    if points.is_empty() {
        return Rect::NOTHING;
    }

    let mut min_x = f32::INFINITY;
    let mut min_y = f32::INFINITY;
    let mut max_x = f32::NEG_INFINITY;
    let mut max_y = f32::NEG_INFINITY;

    for point in points {
        min_x = min_x.min(point.x);
        min_y = min_y.min(point.y);
        max_x = max_x.max(point.x);
        max_y = max_y.max(point.y);
    }

    Rect::from_min_max(
        Pos2::new(min_x - padding, min_y - padding),
        Pos2::new(max_x + padding, max_y + padding),
    )
}

/// Shoelace area (unsigned) of a closed polygon
fn polygon_area(vertices: &[Pos2]) -> f32 {
    if vertices.len() < 3 {
        return 0.0;
    }
    let twice_area: f32 = vertices
        .iter()
        .zip(vertices.iter().cycle().skip(1))
        .map(|(a, b)| a.x * b.y - b.x * a.y)
        .sum();
    (twice_area * 0.5).abs()
}

#[cfg(test)]
mod tests {
    use super::*;
    use egui::pos2;

    #[test]
    fn distance_to_segment_clamps_to_endpoints() {
        let a = pos2(0.0, 0.0);
        let b = pos2(10.0, 0.0);
        assert_eq!(distance_to_line_segment(pos2(5.0, 3.0), a, b), 3.0);
        assert_eq!(distance_to_line_segment(pos2(-4.0, 3.0), a, b), 5.0);
        assert_eq!(distance_to_line_segment(pos2(2.0, 2.0), a, a), (8.0f32).sqrt());
    }

    #[test]
    fn bounds_handle_negative_rect_extent() {
        let path = ShapePath::Rect {
            corner: pos2(10.0, 10.0),
            extent: Vec2::new(-4.0, -6.0),
        };
        let bounds = path.bounds(0.0);
        assert_eq!(bounds.min, pos2(6.0, 4.0));
        assert_eq!(bounds.max, pos2(10.0, 10.0));
    }

    #[test]
    fn degenerate_detection() {
        assert!(ShapePath::Circle { center: pos2(1.0, 1.0), radius: 0.0 }.is_degenerate());
        assert!(ShapePath::Polygon(vec![pos2(1.0, 1.0); 3]).is_degenerate());
        assert!(!ShapePath::Polygon(vec![pos2(0.0, 0.0), pos2(4.0, 0.0), pos2(0.0, 4.0)]).is_degenerate());
    }
}
