//=========================================================================
// Compositor
//=========================================================================
//
// Draws one frame onto the platform's back buffer in a fixed order:
//
//   1. background at the origin
//   2. margin fill where the background does not reach
//   3. scene objects, in registry order
//   4. widgets, in registry order (always on top)
//
// No z-index and no dirty rectangles: every frame repaints everything.
//
//=========================================================================

//=== Module Declarations =================================================

mod background;

//=== External Dependencies ===============================================

use log::debug;

//=== Internal Dependencies ===============================================

use crate::core::platform_bridge::Platform;
use crate::core::scene::{SceneRegistry, WidgetRegistry};
use crate::core::surface::Color;

//=== Public API ==========================================================

pub use background::{Background, MarginFill};

//=== CompositeStatus =====================================================

/// Outcome of the object pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompositeStatus {
    /// At least one scene object was registered.
    Drawn,

    /// The registry was empty. Background, margins and widgets were still
    /// drawn; callers decide whether that is an error.
    NothingToDraw,
}

//=== CompositeReport =====================================================

/// Counters from one composite pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CompositeReport {
    pub status: CompositeStatus,
    pub objects_drawn: usize,
    /// Registered objects whose current frame had no surface.
    pub objects_skipped: usize,
    pub margins_filled: usize,
    pub widgets_drawn: usize,
}

impl CompositeReport {
    pub fn is_drawn(&self) -> bool {
        self.status == CompositeStatus::Drawn
    }
}

//=== Compositor ==========================================================

/// Background state plus the frame drawing routine.
#[derive(Debug, Clone)]
pub struct Compositor {
    background: Option<Background>,
    clear_margins: bool,
    margin_color: Color,
}

impl Compositor {
    //--- Construction -----------------------------------------------------

    pub fn new(clear_margins: bool, margin_color: Color) -> Self {
        Self {
            background: None,
            clear_margins,
            margin_color,
        }
    }

    //--- Configuration ----------------------------------------------------

    pub fn set_background(&mut self, background: Option<Background>) {
        self.background = background;
    }

    pub fn background(&self) -> Option<&Background> {
        self.background.as_ref()
    }

    /// Enables or disables filling the margins around a small background.
    pub fn set_clear_margins(&mut self, enabled: bool) {
        self.clear_margins = enabled;
    }

    pub fn clear_margins(&self) -> bool {
        self.clear_margins
    }

    pub fn set_margin_color(&mut self, color: Color) {
        self.margin_color = color;
    }

    pub fn margin_color(&self) -> Color {
        self.margin_color
    }

    //--- Drawing ----------------------------------------------------------

    /// Draws background, margins, objects and widgets. Does not present.
    pub fn composite<P>(
        &self,
        platform: &mut P,
        scene: &SceneRegistry,
        widgets: &WidgetRegistry,
    ) -> CompositeReport
    where
        P: Platform + ?Sized,
    {
        let mut margins_filled = 0;

        //--- 1. Background -------------------------------------------------
        if let Some(background) = &self.background {
            platform.blit(background.surface(), None, 0, 0);

            //--- 2. Margin fill ---------------------------------------------
            if self.clear_margins {
                for rect in background.margins().regions() {
                    platform.fill_rect(rect, self.margin_color);
                    margins_filled += 1;
                }
            }
        }

        //--- 3. Scene objects ----------------------------------------------
        let mut objects_drawn = 0;
        let mut objects_skipped = 0;

        for (handle, entry) in scene.iter() {
            let position = entry.object().borrow().position();
            match entry.resolve() {
                Some(surface) => {
                    platform.blit(&surface, None, position.x, position.y);
                    objects_drawn += 1;
                }
                None => {
                    debug!(target: "render", "Object {:?} has no surface for its current frame", handle);
                    objects_skipped += 1;
                }
            }
        }

        //--- 4. Widgets ---------------------------------------------------
        let mut widgets_drawn = 0;

        for (_, widget) in widgets.iter() {
            let widget = widget.borrow();
            if let Some(surface) = widget.surface() {
                let position = widget.position();
                platform.blit(surface, None, position.x, position.y);
                widgets_drawn += 1;
            }
        }

        let status = if scene.is_empty() {
            CompositeStatus::NothingToDraw
        } else {
            CompositeStatus::Drawn
        };

        CompositeReport {
            status,
            objects_drawn,
            objects_skipped,
            margins_filled,
            widgets_drawn,
        }
    }
}

impl Default for Compositor {
    fn default() -> Self {
        Self::new(true, Color::BLACK)
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
