//=========================================================================
// Platform Bridge Interface
//=========================================================================
//
// The contract between the engine and a platform backend: surface
// output, image/font decoding, event polling and the clock.
//
// The engine never talks to a window system directly. Anything that can
// blit RGBA surfaces and hand back events implements `Platform`.
//
//=========================================================================

//=== External Dependencies ===============================================

use std::fmt;
use std::path::Path;
use std::time::Duration;

use winit::keyboard::Key;

//=== Internal Dependencies ===============================================

use crate::core::surface::{Color, Rect, Surface};

//=== PlatformEvent =======================================================

/// Events produced by the platform's event queue.
///
/// Keys are logical keys (the symbol the key produces), which is what the
/// input mapper translates into [`KeyboardEvent`](crate::core::input::KeyboardEvent)s.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlatformEvent {
    /// Key pressed.
    KeyDown(Key),

    /// Key released.
    KeyUp(Key),

    /// Window close / application quit requested.
    Quit,

    /// Anything the engine does not consume (mouse motion, focus, resize...).
    Other,
}

//=== PlatformError =======================================================

/// Platform runtime errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlatformError {
    /// The backend has been shut down and can no longer present frames.
    Closed,

    /// Swapping the back buffer to the display failed.
    PresentFailed(String),
}

impl fmt::Display for PlatformError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Closed => write!(f, "Platform has been shut down"),
            Self::PresentFailed(e) => write!(f, "Buffer swap failed: {}", e),
        }
    }
}

impl std::error::Error for PlatformError {}

//=== Platform ============================================================

/// Display, decode, input and clock services the engine runs on.
///
/// All calls block the caller; the engine is single-threaded and invokes
/// these from its own control thread only.
pub trait Platform {
    /// Display size in pixels as `(width, height)`.
    fn display_size(&self) -> (u32, u32);

    /// Color depth in bits per pixel the display was created with.
    fn color_depth(&self) -> u8;

    /// Decodes an image file into a display-format surface.
    ///
    /// Returns `None` if the file is missing or cannot be decoded.
    fn load_image(&mut self, path: &Path) -> Option<Surface>;

    /// Loads a font for subsequent [`Platform::render_text`] calls.
    ///
    /// Returns `false` if the font could not be opened; the previous font
    /// (if any) is discarded either way.
    fn load_font(&mut self, path: &Path, size: f32) -> bool;

    /// Renders one line of text with the current font.
    ///
    /// Returns `None` if no font is loaded or nothing could be rendered.
    fn render_text(&mut self, text: &str, color: Color) -> Option<Surface>;

    /// Draws `source` onto the back buffer with its top-left at `(x, y)`.
    ///
    /// When `region` is given only that part of the source is copied.
    fn blit(&mut self, source: &Surface, region: Option<Rect>, x: i32, y: i32);

    /// Fills a rectangle of the back buffer with a solid color.
    fn fill_rect(&mut self, rect: Rect, color: Color);

    /// Pops the next pending event, if any.
    fn poll_event(&mut self) -> Option<PlatformEvent>;

    /// Monotonic time since the platform was created.
    fn ticks(&self) -> Duration;

    /// Blocks the calling thread.
    fn delay(&mut self, duration: Duration);

    /// Swaps the back buffer to the display.
    fn present(&mut self) -> Result<(), PlatformError>;

    /// Sets the window caption.
    fn set_title(&mut self, title: &str);

    /// Releases all platform resources. Further presents fail.
    fn shutdown(&mut self);
}

//=========================================================================
// Unit Tests
//=========================================================================
