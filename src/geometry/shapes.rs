use std::f32::consts::{FRAC_PI_2, TAU};

use egui::{Pos2, pos2};

use super::ShapePath;
use crate::tools::Tool;

/// Number of outer points on the star tool
pub const STAR_POINTS: usize = 7;

/// Geometry of a star drawn from its center
#[derive(Debug, Clone, PartialEq)]
pub struct StarShape {
    pub center: Pos2,
    pub outer_radius: f32,
    pub inner_radius: f32,
    /// Vertices alternating outer, inner, outer, ... starting at the top
    pub vertices: Vec<Pos2>,
}

impl StarShape {
    /// The tips of the star (every other vertex, starting with the first)
    pub fn outer_vertices(&self) -> impl Iterator<Item = Pos2> + '_ {
        self.vertices.iter().step_by(2).copied()
    }

    /// The notches between the tips
    pub fn inner_vertices(&self) -> impl Iterator<Item = Pos2> + '_ {
        self.vertices.iter().skip(1).step_by(2).copied()
    }
}

/// Build the path a shape tool paints for a drag from `anchor` to `current`.
///
/// Returns `None` for the freehand tools: they paint incremental segments
/// between consecutive move events instead (see [`brush_segment`]).
pub fn shape_for_tool(tool: Tool, anchor: Pos2, current: Pos2) -> Option<ShapePath> {
    match tool {
        Tool::Brush | Tool::Eraser => None,
        Tool::Line => Some(line(anchor, current)),
        Tool::Rectangle => Some(rectangle(anchor, current)),
        Tool::Circle => Some(circle(anchor, current)),
        Tool::Triangle => Some(triangle(anchor, current)),
        Tool::Star => Some(ShapePath::Polygon(star(anchor, current).vertices)),
    }
}

/// Segment between two consecutive pointer positions of a freehand stroke
pub fn brush_segment(previous: Pos2, current: Pos2) -> ShapePath {
    ShapePath::Segment {
        from: previous,
        to: current,
    }
}

pub fn line(anchor: Pos2, current: Pos2) -> ShapePath {
    ShapePath::Segment {
        from: anchor,
        to: current,
    }
}

/// Box with one corner at the anchor and the opposite corner under the pointer
pub fn rectangle(anchor: Pos2, current: Pos2) -> ShapePath {
    ShapePath::Rect {
        corner: anchor,
        extent: current - anchor,
    }
}

/// Circle centered on the anchor, passing through the pointer
pub fn circle(anchor: Pos2, current: Pos2) -> ShapePath {
    ShapePath::Circle {
        center: anchor,
        radius: anchor.distance(current),
    }
}

pub fn triangle(anchor: Pos2, current: Pos2) -> ShapePath {
    ShapePath::Polygon(triangle_vertices(anchor, current).to_vec())
}

/// Isosceles triangle: anchor, pointer, and the pointer mirrored horizontally across the anchor
pub fn triangle_vertices(anchor: Pos2, current: Pos2) -> [Pos2; 3] {
    [anchor, current, pos2(2.0 * anchor.x - current.x, current.y)]
}

/// Seven-pointed star around the anchor. The outer radius reaches the pointer,
/// the inner radius is half of it.
pub fn star(anchor: Pos2, current: Pos2) -> StarShape {
    let outer_radius = anchor.distance(current);
    let inner_radius = outer_radius / 2.0;
    let step = TAU / STAR_POINTS as f32;

    let mut vertices = Vec::with_capacity(STAR_POINTS * 2);
    for i in 0..STAR_POINTS {
        let angle = i as f32 * step - FRAC_PI_2;
        vertices.push(pos2(
            anchor.x + angle.cos() * outer_radius,
            anchor.y + angle.sin() * outer_radius,
        ));

        let inner_angle = (i as f32 + 0.5) * step - FRAC_PI_2;
        vertices.push(pos2(
            anchor.x + inner_angle.cos() * inner_radius,
            anchor.y + inner_angle.sin() * inner_radius,
        ));
    }

    StarShape {
        center: anchor,
        outer_radius,
        inner_radius,
        vertices,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx(a: f32, b: f32) -> bool {
        (a - b).abs() < 1e-4
    }

    #[test]
    fn circle_radius_is_anchor_distance() {
        let ShapePath::Circle { center, radius } = circle(pos2(0.0, 0.0), pos2(3.0, 4.0)) else {
            panic!("expected a circle");
        };
        assert_eq!(center, pos2(0.0, 0.0));
        assert!(approx(radius, 5.0));
    }

    #[test]
    fn triangle_third_vertex_mirrors_pointer() {
        let vertices = triangle_vertices(pos2(10.0, 10.0), pos2(14.0, 2.0));
        assert_eq!(vertices[0], pos2(10.0, 10.0));
        assert_eq!(vertices[1], pos2(14.0, 2.0));
        assert_eq!(vertices[2], pos2(6.0, 2.0));
    }

    #[test]
    fn star_radii_and_vertex_count() {
        let shape = star(pos2(0.0, 0.0), pos2(0.0, 10.0));
        assert!(approx(shape.outer_radius, 10.0));
        assert!(approx(shape.inner_radius, 5.0));
        assert_eq!(shape.vertices.len(), 14);
        assert_eq!(shape.outer_vertices().count(), 7);

        for tip in shape.outer_vertices() {
            assert!(approx(tip.distance(shape.center), 10.0));
        }
        for notch in shape.inner_vertices() {
            assert!(approx(notch.distance(shape.center), 5.0));
        }
    }

    #[test]
    fn star_first_tip_points_up() {
        let shape = star(pos2(50.0, 50.0), pos2(60.0, 50.0));
        let top = shape.vertices[0];
        assert!(approx(top.x, 50.0));
        assert!(approx(top.y, 40.0));
    }

    #[test]
    fn rectangle_keeps_signed_extent() {
        let path = rectangle(pos2(20.0, 20.0), pos2(5.0, 30.0));
        assert_eq!(
            path,
            ShapePath::Rect {
                corner: pos2(20.0, 20.0),
                extent: egui::vec2(-15.0, 10.0),
            }
        );
    }

    #[test]
    fn zero_length_drag_yields_degenerate_shapes() {
        let p = pos2(7.0, 7.0);
        for tool in [Tool::Rectangle, Tool::Circle, Tool::Triangle, Tool::Star, Tool::Line] {
            let path = shape_for_tool(tool, p, p).expect("shape tool");
            assert!(path.is_degenerate(), "{tool:?} should be degenerate");
        }
    }

    #[test]
    fn freehand_tools_have_no_anchor_shape() {
        assert!(shape_for_tool(Tool::Brush, pos2(0.0, 0.0), pos2(1.0, 1.0)).is_none());
        assert!(shape_for_tool(Tool::Eraser, pos2(0.0, 0.0), pos2(1.0, 1.0)).is_none());
    }
}
