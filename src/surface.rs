//! The pixel buffer the user paints on.
//!
//! Rasterization samples pixel centers and writes colors without blending, so painting the
//! same path twice with different colors always covers exactly the same pixels. The buffer is
//! kept fully opaque at all times.

use std::io::Cursor;

use base64::{Engine as _, engine::general_purpose::STANDARD};
use egui::{Color32, Pos2, Rect, pos2};
use image::{ImageFormat, Rgba, RgbaImage};
use thiserror::Error;

use crate::geometry::{ShapePath, distance_to_line_segment};
use crate::tools::{BACKGROUND_COLOR, Ink};

/// Errors that can occur when exporting the surface
#[derive(Error, Debug)]
pub enum SurfaceError {
    #[error("Surface has no pixels to encode")]
    Empty,
    #[error("Failed to encode surface: {0}")]
    Encode(#[from] image::ImageError),
}

/// Immutable capture of the full pixel buffer
#[derive(Clone)]
pub struct Snapshot {
    pixels: RgbaImage,
}

impl Snapshot {
    pub fn width(&self) -> u32 {
        self.pixels.width()
    }

    pub fn height(&self) -> u32 {
        self.pixels.height()
    }

    /// Raw RGBA bytes, row major
    pub fn as_raw(&self) -> &[u8] {
        self.pixels.as_raw()
    }
}

impl PartialEq for Snapshot {
    fn eq(&self, other: &Self) -> bool {
        self.pixels.dimensions() == other.pixels.dimensions()
            && self.pixels.as_raw() == other.pixels.as_raw()
    }
}

impl Eq for Snapshot {}

// Custom Debug implementation so test failures don't dump megabytes of pixels
impl std::fmt::Debug for Snapshot {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Snapshot")
            .field("width", &self.width())
            .field("height", &self.height())
            .finish()
    }
}

/// The canvas bitmap
pub struct Surface {
    pixels: RgbaImage,
    revision: u64,
}

impl std::fmt::Debug for Surface {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Surface")
            .field("width", &self.width())
            .field("height", &self.height())
            .field("revision", &self.revision)
            .finish()
    }
}

impl Surface {
    /// Create a surface of the given size, filled with the background color
    pub fn new(width: u32, height: u32) -> Self {
        let mut surface = Self {
            pixels: RgbaImage::new(width, height),
            revision: 0,
        };
        surface.set_background();
        surface
    }

    pub fn width(&self) -> u32 {
        self.pixels.width()
    }

    pub fn height(&self) -> u32 {
        self.pixels.height()
    }

    pub fn size(&self) -> [u32; 2] {
        [self.width(), self.height()]
    }

    /// A surface with a zero dimension accepts no paint
    pub fn is_ready(&self) -> bool {
        self.width() > 0 && self.height() > 0
    }

    /// Bumped by every mutation; lets the host skip texture uploads for unchanged frames
    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// Color of the pixel at `(x, y)`, if inside the buffer
    pub fn pixel(&self, x: u32, y: u32) -> Option<Color32> {
        if x < self.width() && y < self.height() {
            let [r, g, b, a] = self.pixels.get_pixel(x, y).0;
            Some(Color32::from_rgba_premultiplied(r, g, b, a))
        } else {
            None
        }
    }

    /// Raw RGBA bytes, row major
    pub fn as_raw(&self) -> &[u8] {
        self.pixels.as_raw()
    }

    /// Paint the whole buffer with the opaque background color
    pub fn set_background(&mut self) {
        let background = to_rgba(BACKGROUND_COLOR);
        for pixel in self.pixels.pixels_mut() {
            *pixel = background;
        }
        self.touch();
    }

    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            pixels: self.pixels.clone(),
        }
    }

    /// Overwrite the whole buffer with a snapshot.
    ///
    /// Snapshots of a different size are rejected and leave the buffer untouched.
    pub fn restore(&mut self, snapshot: &Snapshot) -> bool {
        if snapshot.pixels.dimensions() != self.pixels.dimensions() {
            log::warn!(
                "Refusing to restore {}x{} snapshot onto {}x{} surface",
                snapshot.width(),
                snapshot.height(),
                self.width(),
                self.height()
            );
            return false;
        }
        self.pixels.copy_from_slice(snapshot.pixels.as_raw());
        self.touch();
        true
    }

    /// Stroke or fill `path` with `ink`. Segments are always stroked.
    pub fn stroke_or_fill(&mut self, path: &ShapePath, ink: &Ink) {
        if !self.is_ready() || !path.is_finite() || !ink.width.is_finite() {
            return;
        }
        // Entirely off the buffer: nothing to paint, keep the revision
        let buffer = Rect::from_min_size(Pos2::ZERO, egui::vec2(self.width() as f32, self.height() as f32));
        if !path.bounds(half_width(ink.width)).intersects(buffer) {
            return;
        }

        let color = to_rgba(ink.color);
        match path {
            ShapePath::Segment { from, to } => self.stroke_segment(*from, *to, ink.width, color),
            ShapePath::Rect { corner, extent } => {
                let rect = Rect::from_two_pos(*corner, *corner + *extent);
                if ink.fill {
                    self.fill_rect(rect, color);
                } else {
                    self.stroke_polygon(
                        &[rect.left_top(), rect.right_top(), rect.right_bottom(), rect.left_bottom()],
                        ink.width,
                        color,
                    );
                }
            }
            ShapePath::Circle { center, radius } => {
                if ink.fill {
                    self.fill_circle(*center, *radius, color);
                } else {
                    self.stroke_circle(*center, *radius, ink.width, color);
                }
            }
            ShapePath::Polygon(vertices) => {
                if ink.fill {
                    self.fill_polygon(vertices, color);
                } else {
                    self.stroke_polygon(vertices, ink.width, color);
                }
            }
        }
        self.touch();
    }

    /// Encode the buffer as PNG bytes
    pub fn encode_png(&self) -> Result<Vec<u8>, SurfaceError> {
        if !self.is_ready() {
            return Err(SurfaceError::Empty);
        }
        let mut bytes = Vec::new();
        self.pixels
            .write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)?;
        Ok(bytes)
    }

    /// Encode the buffer as a `data:image/png;base64,...` URI
    pub fn to_data_uri(&self) -> Result<String, SurfaceError> {
        let png = self.encode_png()?;
        Ok(format!("data:image/png;base64,{}", STANDARD.encode(png)))
    }

    fn touch(&mut self) {
        self.revision = self.revision.wrapping_add(1);
    }

    /// Pixel ranges whose centers may fall inside `bounds`, clipped to the buffer
    fn clip(&self, bounds: Rect) -> Option<(std::ops::Range<u32>, std::ops::Range<u32>)> {
        let clamp = |v: f32, max: u32| v.clamp(0.0, max as f32) as u32;
        let x0 = clamp(bounds.min.x.floor(), self.width());
        let x1 = clamp(bounds.max.x.ceil() + 1.0, self.width());
        let y0 = clamp(bounds.min.y.floor(), self.height());
        let y1 = clamp(bounds.max.y.ceil() + 1.0, self.height());
        (x0 < x1 && y0 < y1).then_some((x0..x1, y0..y1))
    }

    fn stroke_segment(&mut self, from: Pos2, to: Pos2, width: f32, color: Rgba<u8>) {
        let half = half_width(width);
        let bounds = Rect::from_two_pos(from, to).expand(half);
        let Some((xs, ys)) = self.clip(bounds) else {
            return;
        };
        for y in ys {
            for x in xs.clone() {
                if distance_to_line_segment(center(x, y), from, to) <= half {
                    self.pixels.put_pixel(x, y, color);
                }
            }
        }
    }

    fn stroke_polygon(&mut self, vertices: &[Pos2], width: f32, color: Rgba<u8>) {
        match vertices {
            [] => {}
            [single] => self.stroke_segment(*single, *single, width, color),
            _ => {
                let next = vertices.iter().cycle().skip(1);
                for (a, b) in vertices.iter().zip(next) {
                    self.stroke_segment(*a, *b, width, color);
                }
            }
        }
    }

    fn fill_rect(&mut self, rect: Rect, color: Rgba<u8>) {
        let Some((xs, ys)) = self.clip(rect) else {
            return;
        };
        for y in ys {
            for x in xs.clone() {
                let c = center(x, y);
                if c.x >= rect.min.x && c.x < rect.max.x && c.y >= rect.min.y && c.y < rect.max.y {
                    self.pixels.put_pixel(x, y, color);
                }
            }
        }
    }

    fn stroke_circle(&mut self, middle: Pos2, radius: f32, width: f32, color: Rgba<u8>) {
        let half = half_width(width);
        let bounds = Rect::from_center_size(middle, egui::Vec2::splat(2.0 * (radius + half)));
        let Some((xs, ys)) = self.clip(bounds) else {
            return;
        };
        for y in ys {
            for x in xs.clone() {
                if (center(x, y).distance(middle) - radius).abs() <= half {
                    self.pixels.put_pixel(x, y, color);
                }
            }
        }
    }

    fn fill_circle(&mut self, middle: Pos2, radius: f32, color: Rgba<u8>) {
        let bounds = Rect::from_center_size(middle, egui::Vec2::splat(2.0 * radius));
        let Some((xs, ys)) = self.clip(bounds) else {
            return;
        };
        for y in ys {
            for x in xs.clone() {
                if center(x, y).distance(middle) <= radius {
                    self.pixels.put_pixel(x, y, color);
                }
            }
        }
    }

    /// Even-odd scanline fill sampled at pixel centers
    fn fill_polygon(&mut self, vertices: &[Pos2], color: Rgba<u8>) {
        if vertices.len() < 3 {
            return;
        }
        let bounds = crate::geometry::calculate_bounds(vertices, 0.0);
        let Some((xs, ys)) = self.clip(bounds) else {
            return;
        };

        let mut crossings = Vec::with_capacity(vertices.len());
        for y in ys {
            let cy = y as f32 + 0.5;
            crossings.clear();
            let next = vertices.iter().cycle().skip(1);
            for (a, b) in vertices.iter().zip(next) {
                if (a.y <= cy) != (b.y <= cy) {
                    crossings.push(a.x + (cy - a.y) * (b.x - a.x) / (b.y - a.y));
                }
            }
            crossings.sort_by(f32::total_cmp);

            for span in crossings.chunks_exact(2) {
                for x in xs.clone() {
                    let cx = x as f32 + 0.5;
                    if cx >= span[0] && cx < span[1] {
                        self.pixels.put_pixel(x, y, color);
                    }
                }
            }
        }
    }
}

fn center(x: u32, y: u32) -> Pos2 {
    pos2(x as f32 + 0.5, y as f32 + 0.5)
}

/// Half the stroke width, never thinner than a single pixel row
fn half_width(width: f32) -> f32 {
    (width * 0.5).max(0.5)
}

fn to_rgba(color: Color32) -> Rgba<u8> {
    Rgba([color.r(), color.g(), color.b(), 255])
}
