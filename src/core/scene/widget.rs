//=========================================================================
// Widgets
//=========================================================================
//
// Self-updating overlays (score counters, labels, HUD icons).
//
// Each frame the engine asks every widget to recompute its surface during
// the update phase, then draws all widgets after the scene objects so
// they always end up on top.
//
//=========================================================================

//=== External Dependencies ===============================================

use std::cell::RefCell;
use std::rc::Rc;

use log::debug;

//=== Internal Dependencies ===============================================

use super::arena::{Arena, Handle};
use super::Position;
use crate::core::platform_bridge::Platform;
use crate::core::surface::{Color, Surface};

/// Widget shared between game code and the engine.
pub type SharedWidget = Rc<RefCell<dyn Widget>>;

/// Handle to a registered widget.
pub type WidgetHandle = Handle<dyn Widget>;

//=== Widget Trait ========================================================

/// An overlay that knows how to produce its own surface.
pub trait Widget {
    /// Top-left corner on the display.
    fn position(&self) -> Position;

    /// Recomputes the surface for this frame.
    ///
    /// The platform is available for rendering text or decoding images.
    fn update_surface(&mut self, platform: &mut dyn Platform);

    /// Surface to draw, or `None` to skip the widget this frame.
    fn surface(&self) -> Option<&Surface>;
}

//=== TextWidget ==========================================================

/// Label widget that re-renders only when its text or color changes.
#[derive(Debug)]
pub struct TextWidget {
    position: Position,
    text: String,
    color: Color,
    surface: Option<Surface>,
    dirty: bool,
}

impl TextWidget {
    pub fn new(x: i32, y: i32, text: impl Into<String>, color: Color) -> Self {
        Self {
            position: Position::new(x, y),
            text: text.into(),
            color,
            surface: None,
            dirty: true,
        }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn set_text(&mut self, text: impl Into<String>) {
        let text = text.into();
        if text != self.text {
            self.text = text;
            self.dirty = true;
        }
    }

    pub fn set_color(&mut self, color: Color) {
        if color != self.color {
            self.color = color;
            self.dirty = true;
        }
    }

    pub fn into_shared(self) -> SharedWidget {
        Rc::new(RefCell::new(self))
    }
}

impl Widget for TextWidget {
    fn position(&self) -> Position {
        self.position
    }

    fn update_surface(&mut self, platform: &mut dyn Platform) {
        if !self.dirty {
            return;
        }
        self.surface = platform.render_text(&self.text, self.color);
        // Retry next frame if no font was available yet.
        self.dirty = self.surface.is_none();
    }

    fn surface(&self) -> Option<&Surface> {
        self.surface.as_ref()
    }
}

//=== WidgetRegistry ======================================================

/// Ordered set of widgets, drawn in insertion order.
pub struct WidgetRegistry {
    widgets: Arena<SharedWidget, dyn Widget>,
}

impl WidgetRegistry {
    pub fn new() -> Self {
        Self {
            widgets: Arena::new(),
        }
    }

    pub fn add(&mut self, widget: SharedWidget) -> WidgetHandle {
        let handle = self.widgets.insert(widget);
        debug!(target: "scene", "Registered widget {:?}", handle);
        handle
    }

    /// Returns `false` for stale handles.
    pub fn remove(&mut self, handle: WidgetHandle) -> bool {
        self.widgets.remove(handle).is_some()
    }

    /// Removes the widget at draw-order `position`.
    pub fn remove_at(&mut self, position: usize) -> bool {
        self.widgets.remove_at(position).is_some()
    }

    /// Removes every registration of `widget`. Returns how many were removed.
    pub fn remove_widget(&mut self, widget: &SharedWidget) -> usize {
        self.widgets
            .remove_where(|registered| Rc::ptr_eq(registered, widget))
    }

    pub fn clear(&mut self) {
        self.widgets.clear();
    }

    pub fn get(&self, handle: WidgetHandle) -> Option<&SharedWidget> {
        self.widgets.get(handle)
    }

    /// Widgets in draw order.
    pub fn iter(&self) -> impl Iterator<Item = (WidgetHandle, &SharedWidget)> + '_ {
        self.widgets.iter()
    }

    pub fn len(&self) -> usize {
        self.widgets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.widgets.is_empty()
    }
}

impl Default for WidgetRegistry {
    fn default() -> Self {
        Self::new()
    }
}

//=========================================================================
// Unit Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::RecordingPlatform;
    use std::path::Path;

    fn platform_with_font() -> RecordingPlatform {
        let mut platform = RecordingPlatform::new(64, 64);
        assert!(platform.load_font(Path::new("mono.ttf"), 12.0));
        platform
    }

    //=====================================================================
    // TextWidget
    //=====================================================================

    #[test]
    fn text_widget_renders_on_first_update() {
        let mut platform = platform_with_font();
        let mut widget = TextWidget::new(1, 2, "HP 10", Color::WHITE);

        assert!(widget.surface().is_none());
        widget.update_surface(&mut platform);

        assert!(widget.surface().is_some());
        assert_eq!(platform.rendered_text, vec![("HP 10".to_string(), Color::WHITE)]);
    }

    #[test]
    fn text_widget_skips_render_when_unchanged() {
        let mut platform = platform_with_font();
        let mut widget = TextWidget::new(0, 0, "HP 10", Color::WHITE);

        widget.update_surface(&mut platform);
        widget.update_surface(&mut platform);
        widget.set_text("HP 10");
        widget.update_surface(&mut platform);

        assert_eq!(platform.rendered_text.len(), 1);
    }

    #[test]
    fn text_widget_rerenders_after_change() {
        let mut platform = platform_with_font();
        let mut widget = TextWidget::new(0, 0, "HP 10", Color::WHITE);

        widget.update_surface(&mut platform);
        widget.set_text("HP 9");
        widget.update_surface(&mut platform);
        widget.set_color(Color::BLACK);
        widget.update_surface(&mut platform);

        assert_eq!(platform.rendered_text.len(), 3);
        assert_eq!(widget.text(), "HP 9");
    }

    #[test]
    fn text_widget_retries_until_font_loaded() {
        let mut platform = RecordingPlatform::new(64, 64);
        let mut widget = TextWidget::new(0, 0, "Ready", Color::WHITE);

        widget.update_surface(&mut platform);
        assert!(widget.surface().is_none());

        platform.load_font(Path::new("mono.ttf"), 12.0);
        widget.update_surface(&mut platform);
        assert!(widget.surface().is_some());
    }

    //=====================================================================
    // WidgetRegistry
    //=====================================================================

    #[test]
    fn registry_keeps_insertion_order() {
        let mut registry = WidgetRegistry::new();
        let a = registry.add(TextWidget::new(0, 0, "a", Color::WHITE).into_shared());
        let b = registry.add(TextWidget::new(0, 0, "b", Color::WHITE).into_shared());

        let order: Vec<WidgetHandle> = registry.iter().map(|(h, _)| h).collect();
        assert_eq!(order, vec![a, b]);
    }

    #[test]
    fn registry_remove_by_handle_and_position() {
        let mut registry = WidgetRegistry::new();
        let a = registry.add(TextWidget::new(0, 0, "a", Color::WHITE).into_shared());
        registry.add(TextWidget::new(0, 0, "b", Color::WHITE).into_shared());

        assert!(registry.remove(a));
        assert!(!registry.remove(a));
        assert!(!registry.remove_at(1));
        assert!(registry.remove_at(0));
        assert!(registry.is_empty());
    }

    #[test]
    fn registry_remove_widget_removes_every_registration() {
        let mut registry = WidgetRegistry::new();
        let label = TextWidget::new(0, 0, "x", Color::WHITE).into_shared();
        registry.add(Rc::clone(&label));
        registry.add(TextWidget::new(0, 0, "y", Color::WHITE).into_shared());
        registry.add(Rc::clone(&label));

        assert_eq!(registry.remove_widget(&label), 2);
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn registry_clear() {
        let mut registry = WidgetRegistry::new();
        let a = registry.add(TextWidget::new(0, 0, "a", Color::WHITE).into_shared());
        registry.clear();
        assert!(registry.is_empty());
        assert!(registry.get(a).is_none());
    }
}
