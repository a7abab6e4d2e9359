//=========================================================================
// Text Rasterizer
//
// Single-font text rendering for the software backend. One font is open
// at a time, at a fixed pixel size; each call lays out one line and
// rasterizes it into a tight RGBA image with coverage in the alpha channel.
//
//=========================================================================

//=== External Dependencies ===============================================

use std::fmt;
use std::path::Path;

use fontdue::layout::{CoordinateSystem, Layout, LayoutSettings, TextStyle};
use image::{Rgba, RgbaImage};

//=== Internal Dependencies ===============================================

use crate::core::surface::Color;

//=== FontLoadError =======================================================

/// Error returned by [`FontFace::load`] and [`FontFace::from_bytes`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FontLoadError(pub String);

impl fmt::Display for FontLoadError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "font load error: {}", self.0)
    }
}

impl std::error::Error for FontLoadError {}

//=== FontFace ============================================================

/// A parsed font bound to one pixel size.
pub struct FontFace {
    font: fontdue::Font,
    px: f32,
}

impl FontFace {
    /// Reads and parses a TrueType or OpenType file.
    pub fn load(path: &Path, px: f32) -> Result<Self, FontLoadError> {
        let bytes = std::fs::read(path).map_err(|e| FontLoadError(e.to_string()))?;
        Self::from_bytes(&bytes, px)
    }

    pub fn from_bytes(bytes: &[u8], px: f32) -> Result<Self, FontLoadError> {
        if !(px > 0.0) {
            return Err(FontLoadError(format!("invalid pixel size {}", px)));
        }
        let font = fontdue::Font::from_bytes(bytes, fontdue::FontSettings::default())
            .map_err(|e| FontLoadError(e.to_string()))?;
        Ok(Self { font, px })
    }

    pub fn px(&self) -> f32 {
        self.px
    }

    /// Renders `text` in `color` on a transparent background.
    ///
    /// Returns `None` when the laid-out text covers no area
    /// (empty string).
    pub fn render(&self, text: &str, color: Color) -> Option<RgbaImage> {
        let mut layout: Layout<()> = Layout::new(CoordinateSystem::PositiveYDown);
        layout.reset(&LayoutSettings::default());
        layout.append(&[&self.font], &TextStyle::new(text, self.px, 0));

        let glyphs = layout.glyphs();
        let width = glyphs
            .iter()
            .map(|g| g.x + g.width as f32)
            .fold(0.0f32, f32::max)
            .ceil() as u32;
        let height = glyphs
            .iter()
            .map(|g| g.y + g.height as f32)
            .fold(0.0f32, f32::max)
            .max(layout.height())
            .ceil() as u32;

        if width == 0 || height == 0 {
            return None;
        }

        let mut image = RgbaImage::new(width, height);

        for glyph in glyphs {
            if glyph.width == 0 || glyph.height == 0 {
                continue;
            }
            let (_, coverage) = self.font.rasterize_config(glyph.key);

            for row in 0..glyph.height {
                for col in 0..glyph.width {
                    let alpha = coverage[row * glyph.width + col];
                    if alpha == 0 {
                        continue;
                    }
                    let x = glyph.x as i64 + col as i64;
                    let y = glyph.y as i64 + row as i64;
                    if x < 0 || y < 0 || x >= width as i64 || y >= height as i64 {
                        continue;
                    }
                    image.put_pixel(x as u32, y as u32, Rgba([color.r, color.g, color.b, alpha]));
                }
            }
        }

        Some(image)
    }
}

impl fmt::Debug for FontFace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FontFace").field("px", &self.px).finish()
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
