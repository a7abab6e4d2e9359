//=========================================================================
// Background
//=========================================================================
//
// Full-screen background image anchored at the origin, plus the margin
// regions left uncovered when the image is smaller than the display.
//
// Layout for a background smaller on both axes:
// ```text
//   +-----------+-----+
//   |           |side |   side:   x = bg.w, width  = display.w - bg.w,
//   |    bg     |     |           height = bg.h
//   +-----------+-----+
//   |     bottom      |   bottom: y = bg.h, height = display.h - bg.h,
//   +-----------------+           width  = display.w
// ```
//
//=========================================================================

//=== Internal Dependencies ===============================================

use crate::core::surface::{Rect, Surface};

//=== MarginFill ==========================================================

/// Display regions the background image does not cover.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MarginFill {
    side: Option<Rect>,
    bottom: Option<Rect>,
}

impl MarginFill {
    /// Computes the uncovered regions for a background of `background`
    /// size on a display of `display` size, both `(width, height)`.
    pub fn compute(display: (u32, u32), background: (u32, u32)) -> Self {
        let (display_w, display_h) = display;
        let (bg_w, bg_h) = background;

        let side = (display_w > bg_w)
            .then(|| Rect::new(bg_w as i32, 0, display_w - bg_w, bg_h.min(display_h)));
        let bottom = (display_h > bg_h)
            .then(|| Rect::new(0, bg_h as i32, display_w, display_h - bg_h));

        Self { side, bottom }
    }

    pub fn side(&self) -> Option<Rect> {
        self.side
    }

    pub fn bottom(&self) -> Option<Rect> {
        self.bottom
    }

    /// Non-empty regions to fill, side first.
    pub fn regions(&self) -> impl Iterator<Item = Rect> {
        self.side
            .into_iter()
            .chain(self.bottom)
            .filter(|rect| !rect.is_empty())
    }

    /// Returns `true` if the background covers the whole display.
    pub fn is_empty(&self) -> bool {
        self.regions().next().is_none()
    }
}

//=== Background ==========================================================

/// Loaded background image and its precomputed margins.
#[derive(Debug, Clone)]
pub struct Background {
    surface: Surface,
    margins: MarginFill,
}

impl Background {
    pub fn new(surface: Surface, display: (u32, u32)) -> Self {
        let margins = MarginFill::compute(display, surface.size());
        Self { surface, margins }
    }

    pub fn surface(&self) -> &Surface {
        &self.surface
    }

    pub fn margins(&self) -> &MarginFill {
        &self.margins
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
