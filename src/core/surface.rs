//=========================================================================
// Surfaces
//=========================================================================
//
// Display-ready pixel buffers and the small geometry/color types used to
// place them on the backbuffer.
//
// A `Surface` is a cheap, clonable handle to an immutable RGBA image.
// Cloning shares the pixels; the scene registry and animations hand the
// same surface around without copying.
//
//=========================================================================

//=== External Dependencies ===============================================

use std::fmt;
use std::rc::Rc;

use image::{Rgba, RgbaImage};

//=== Color ===============================================================

/// Opaque RGB color used for text rendering and solid fills.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub const BLACK: Color = Color::new(0x00, 0x00, 0x00);
    pub const WHITE: Color = Color::new(0xFF, 0xFF, 0xFF);

    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Converts to a fully opaque RGBA pixel.
    pub fn to_rgba(self) -> Rgba<u8> {
        Rgba([self.r, self.g, self.b, 0xFF])
    }
}

//=== Rect ================================================================

/// Axis-aligned rectangle in display pixels (top-left origin).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Rect {
    pub x: i32,
    pub y: i32,
    pub width: u32,
    pub height: u32,
}

impl Rect {
    pub const fn new(x: i32, y: i32, width: u32, height: u32) -> Self {
        Self { x, y, width, height }
    }

    /// Returns `true` if the rectangle covers no pixels.
    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    /// Intersects with a `width × height` area anchored at the origin.
    ///
    /// Returns `(x0, y0, x1, y1)` in unsigned pixel coordinates, or `None`
    /// when nothing of the rectangle lies inside the area.
    pub(crate) fn clip_to(&self, width: u32, height: u32) -> Option<(u32, u32, u32, u32)> {
        let x0 = i64::from(self.x).max(0);
        let y0 = i64::from(self.y).max(0);
        let x1 = (i64::from(self.x) + i64::from(self.width)).min(i64::from(width));
        let y1 = (i64::from(self.y) + i64::from(self.height)).min(i64::from(height));

        if x0 >= x1 || y0 >= y1 {
            return None;
        }

        Some((x0 as u32, y0 as u32, x1 as u32, y1 as u32))
    }
}

//=== Surface =============================================================

/// Decoded, display-ready pixel buffer.
///
/// Surfaces are immutable once created. Clones share the same pixel
/// storage, so identity can be checked with [`Surface::ptr_eq`].
#[derive(Clone)]
pub struct Surface {
    pixels: Rc<RgbaImage>,
}

impl Surface {
    /// Wraps an already-converted RGBA image.
    pub fn from_image(image: RgbaImage) -> Self {
        Self {
            pixels: Rc::new(image),
        }
    }

    /// Creates a surface filled with a single opaque color.
    pub fn solid(width: u32, height: u32, color: Color) -> Self {
        Self::from_image(RgbaImage::from_pixel(width, height, color.to_rgba()))
    }

    pub fn width(&self) -> u32 {
        self.pixels.width()
    }

    pub fn height(&self) -> u32 {
        self.pixels.height()
    }

    /// Returns `(width, height)`.
    pub fn size(&self) -> (u32, u32) {
        self.pixels.dimensions()
    }

    pub fn pixels(&self) -> &RgbaImage {
        &self.pixels
    }

    /// Returns `true` if both handles share the same pixel storage.
    pub fn ptr_eq(a: &Surface, b: &Surface) -> bool {
        Rc::ptr_eq(&a.pixels, &b.pixels)
    }
}

impl fmt::Debug for Surface {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Surface")
            .field("width", &self.width())
            .field("height", &self.height())
            .finish()
    }
}

//=========================================================================
// Unit Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn solid_surface_has_requested_size_and_color() {
        let surface = Surface::solid(4, 3, Color::new(10, 20, 30));
        assert_eq!(surface.size(), (4, 3));
        assert_eq!(*surface.pixels().get_pixel(3, 2), Rgba([10, 20, 30, 255]));
    }

    #[test]
    fn clones_share_pixels() {
        let a = Surface::solid(1, 1, Color::WHITE);
        let b = a.clone();
        let c = Surface::solid(1, 1, Color::WHITE);

        assert!(Surface::ptr_eq(&a, &b));
        assert!(!Surface::ptr_eq(&a, &c), "Equal pixels are not the same surface");
    }

    #[test]
    fn debug_prints_dimensions_only() {
        let surface = Surface::solid(7, 9, Color::BLACK);
        assert_eq!(format!("{:?}", surface), "Surface { width: 7, height: 9 }");
    }

    #[test]
    fn clip_inside_area_is_unchanged() {
        let rect = Rect::new(2, 3, 4, 5);
        assert_eq!(rect.clip_to(100, 100), Some((2, 3, 6, 8)));
    }

    #[test]
    fn clip_trims_negative_origin_and_overflow() {
        let rect = Rect::new(-5, -5, 10, 20);
        assert_eq!(rect.clip_to(8, 8), Some((0, 0, 5, 8)));
    }

    #[test]
    fn clip_outside_area_is_none() {
        assert_eq!(Rect::new(50, 0, 10, 10).clip_to(40, 40), None);
        assert_eq!(Rect::new(0, 0, 0, 10).clip_to(40, 40), None);
    }

    #[test]
    fn empty_rect_detection() {
        assert!(Rect::new(0, 0, 0, 4).is_empty());
        assert!(!Rect::new(0, 0, 1, 1).is_empty());
    }
}
