//=========================================================================
// Platform Subsystem
//
// Software rendering backend for the engine's `Platform` contract.
//
// Architecture:
// ```text
//  Window / test thread:             Engine thread:
//  ┌──────────────────────────┐     ┌─────────────────────────────┐
//  │  Winit event loop        │     │  GraphicsEngine             │
//  │   ↓                      │     │   │                         │
//  │  EventForwarder          │     │   ├─ poll_event ← channel   │
//  │   ↓                      │     │   ├─ blit / fill_rect       │
//  │  crossbeam Sender ───────┼────>│   │     ↓                   │
//  └──────────────────────────┘     │   │   back buffer (RGBA)    │
//                                   │   └─ present                │
//                                   │         ↓                   │
//                                   │       front buffer          │
//                                   └─────────────────────────────┘
// ```
//
// Responsibilities:
// - Decode images (PNG, JPEG, BMP, GIF) into surfaces
// - Rasterize text with the loaded font
// - Composite surfaces into an RGBA back buffer with alpha
// - Copy the back buffer to the front buffer on present
// - Serve events from a channel and time from a monotonic clock
//
//=========================================================================

//=== Submodules ==========================================================

mod text;
mod winit_bridge;

//=== External Crates =====================================================

use std::path::Path;
use std::time::{Duration, Instant};

use crossbeam_channel::{unbounded, Receiver, Sender};
use image::{imageops, Rgba, RgbaImage};
use log::*;

//=== Internal Imports ====================================================

use crate::core::platform_bridge::{Platform, PlatformError, PlatformEvent};
use crate::core::surface::{Color, Rect, Surface};

//=== Public API ==========================================================

pub use text::{FontFace, FontLoadError};
pub use winit_bridge::{translate_window_event, EventForwarder};

//=== SoftwarePlatform ====================================================

/// CPU-side display backed by two RGBA buffers.
///
/// Drawing goes to the back buffer; [`Platform::present`] copies it to the
/// front buffer, which is what a window (or a test) reads.
///
/// # Lifecycle
///
/// 1. **Construction**: `SoftwarePlatform::new(w, h, bpp)` returns the
///    platform and the sender its events arrive on
/// 2. **Frames**: the engine draws, then presents
/// 3. **Shutdown**: after `shutdown()` presenting fails with
///    [`PlatformError::Closed`]
pub struct SoftwarePlatform {
    backbuffer: RgbaImage,
    front: RgbaImage,
    color_depth: u8,
    events: Receiver<PlatformEvent>,
    font: Option<FontFace>,
    title: String,
    clock: Instant,
    presented_frames: u64,
    closed: bool,
}

impl SoftwarePlatform {
    //--- Construction -----------------------------------------------------

    /// Creates a `width × height` display and its event channel.
    pub fn new(width: u32, height: u32, color_depth: u8) -> (Self, Sender<PlatformEvent>) {
        let (sender, receiver) = unbounded();
        (Self::with_receiver(width, height, color_depth, receiver), sender)
    }

    /// Creates a display that polls events from an existing channel.
    pub fn with_receiver(
        width: u32,
        height: u32,
        color_depth: u8,
        events: Receiver<PlatformEvent>,
    ) -> Self {
        info!(
            target: "platform",
            "Software display created: {}x{} @ {} bpp",
            width,
            height,
            color_depth
        );
        Self {
            backbuffer: RgbaImage::from_pixel(width, height, Color::BLACK.to_rgba()),
            front: RgbaImage::from_pixel(width, height, Color::BLACK.to_rgba()),
            color_depth,
            events,
            font: None,
            title: String::new(),
            clock: Instant::now(),
            presented_frames: 0,
            closed: false,
        }
    }

    //--- Accessors --------------------------------------------------------

    /// The last presented frame.
    pub fn front_buffer(&self) -> &RgbaImage {
        &self.front
    }

    /// The frame currently being drawn.
    pub fn backbuffer(&self) -> &RgbaImage {
        &self.backbuffer
    }

    pub fn presented_frames(&self) -> u64 {
        self.presented_frames
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn is_closed(&self) -> bool {
        self.closed
    }
}

//=== Platform Implementation =============================================

impl Platform for SoftwarePlatform {
    fn display_size(&self) -> (u32, u32) {
        self.backbuffer.dimensions()
    }

    fn color_depth(&self) -> u8 {
        self.color_depth
    }

    fn load_image(&mut self, path: &Path) -> Option<Surface> {
        match image::open(path) {
            Ok(decoded) => {
                let rgba = decoded.to_rgba8();
                debug!(
                    target: "platform",
                    "Decoded {:?} ({}x{})",
                    path,
                    rgba.width(),
                    rgba.height()
                );
                Some(Surface::from_image(rgba))
            }
            Err(e) => {
                warn!(target: "platform", "Could not decode {:?}: {}", path, e);
                None
            }
        }
    }

    fn load_font(&mut self, path: &Path, size: f32) -> bool {
        match FontFace::load(path, size) {
            Ok(face) => {
                debug!(target: "platform", "Font {:?} opened at {}px", path, size);
                self.font = Some(face);
                true
            }
            Err(e) => {
                warn!(target: "platform", "Could not open font {:?}: {}", path, e);
                self.font = None;
                false
            }
        }
    }

    fn render_text(&mut self, text: &str, color: Color) -> Option<Surface> {
        let face = self.font.as_ref()?;
        face.render(text, color).map(Surface::from_image)
    }

    fn blit(&mut self, source: &Surface, region: Option<Rect>, x: i32, y: i32) {
        let pixels = source.pixels();

        match region {
            None => imageops::overlay(&mut self.backbuffer, pixels, i64::from(x), i64::from(y)),
            Some(rect) => {
                let Some((x0, y0, x1, y1)) = rect.clip_to(pixels.width(), pixels.height()) else {
                    return;
                };
                let cropped = imageops::crop_imm(pixels, x0, y0, x1 - x0, y1 - y0).to_image();
                imageops::overlay(&mut self.backbuffer, &cropped, i64::from(x), i64::from(y));
            }
        }
    }

    fn fill_rect(&mut self, rect: Rect, color: Color) {
        let (width, height) = self.backbuffer.dimensions();
        let Some((x0, y0, x1, y1)) = rect.clip_to(width, height) else {
            return;
        };

        let pixel: Rgba<u8> = color.to_rgba();
        for y in y0..y1 {
            for x in x0..x1 {
                self.backbuffer.put_pixel(x, y, pixel);
            }
        }
    }

    fn poll_event(&mut self) -> Option<PlatformEvent> {
        self.events.try_recv().ok()
    }

    fn ticks(&self) -> Duration {
        self.clock.elapsed()
    }

    fn delay(&mut self, duration: Duration) {
        std::thread::sleep(duration);
    }

    fn present(&mut self) -> Result<(), PlatformError> {
        if self.closed {
            return Err(PlatformError::Closed);
        }
        self.front.clone_from(&self.backbuffer);
        self.presented_frames += 1;
        trace!(target: "platform", "Presented frame {}", self.presented_frames);
        Ok(())
    }

    fn set_title(&mut self, title: &str) {
        self.title = title.to_string();
    }

    fn shutdown(&mut self) {
        if !self.closed {
            info!(target: "platform", "Software display closed");
        }
        self.closed = true;
        self.font = None;
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
