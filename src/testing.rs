//=========================================================================
// Test Support
//=========================================================================
//
// Scripted `Platform` double shared by the unit tests.
//
// - Images are served from a path → surface table (unknown paths fail)
// - Events are popped from a preset queue
// - Every `ticks()` call advances a manual clock by `tick_step`
// - Every blit/fill is recorded in call order
//
//=========================================================================

use std::cell::Cell;
use std::collections::{HashMap, VecDeque};
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::core::platform_bridge::{Platform, PlatformError, PlatformEvent};
use crate::core::surface::{Color, Rect, Surface};

//=== DrawOp ==============================================================

/// One recorded drawing call.
#[derive(Debug, Clone)]
pub(crate) enum DrawOp {
    Blit {
        surface: Surface,
        region: Option<Rect>,
        x: i32,
        y: i32,
    },
    Fill {
        rect: Rect,
        color: Color,
    },
}

impl DrawOp {
    pub(crate) fn is_blit_of(&self, expected: &Surface) -> bool {
        matches!(self, DrawOp::Blit { surface, .. } if Surface::ptr_eq(surface, expected))
    }
}

//=== RecordingPlatform ===================================================

pub(crate) struct RecordingPlatform {
    pub(crate) size: (u32, u32),
    pub(crate) images: HashMap<PathBuf, Surface>,
    pub(crate) events: VecDeque<PlatformEvent>,
    pub(crate) ops: Vec<DrawOp>,
    pub(crate) presents: usize,
    pub(crate) fail_present: bool,
    pub(crate) font_loaded: bool,
    pub(crate) rendered_text: Vec<(String, Color)>,
    pub(crate) title: String,
    pub(crate) delays: Vec<Duration>,
    pub(crate) shutdowns: usize,
    pub(crate) tick_step: Duration,
    clock: Cell<Duration>,
}

impl RecordingPlatform {
    pub(crate) fn new(width: u32, height: u32) -> Self {
        Self {
            size: (width, height),
            images: HashMap::new(),
            events: VecDeque::new(),
            ops: Vec::new(),
            presents: 0,
            fail_present: false,
            font_loaded: false,
            rendered_text: Vec::new(),
            title: String::new(),
            delays: Vec::new(),
            shutdowns: 0,
            tick_step: Duration::from_millis(1),
            clock: Cell::new(Duration::ZERO),
        }
    }

    pub(crate) fn add_image(&mut self, path: &str, surface: Surface) {
        self.images.insert(PathBuf::from(path), surface);
    }

    pub(crate) fn push_event(&mut self, event: PlatformEvent) {
        self.events.push_back(event);
    }

    pub(crate) fn blits(&self) -> Vec<&DrawOp> {
        self.ops
            .iter()
            .filter(|op| matches!(op, DrawOp::Blit { .. }))
            .collect()
    }

    pub(crate) fn fills(&self) -> Vec<Rect> {
        self.ops
            .iter()
            .filter_map(|op| match op {
                DrawOp::Fill { rect, .. } => Some(*rect),
                _ => None,
            })
            .collect()
    }
}

impl Platform for RecordingPlatform {
    fn display_size(&self) -> (u32, u32) {
        self.size
    }

    fn color_depth(&self) -> u8 {
        32
    }

    fn load_image(&mut self, path: &Path) -> Option<Surface> {
        self.images.get(path).cloned()
    }

    fn load_font(&mut self, path: &Path, _size: f32) -> bool {
        self.font_loaded = path.extension().is_some_and(|ext| ext == "ttf");
        self.font_loaded
    }

    fn render_text(&mut self, text: &str, color: Color) -> Option<Surface> {
        if !self.font_loaded || text.is_empty() {
            return None;
        }
        self.rendered_text.push((text.to_string(), color));
        Some(Surface::solid(text.len() as u32 * 6, 10, color))
    }

    fn blit(&mut self, source: &Surface, region: Option<Rect>, x: i32, y: i32) {
        self.ops.push(DrawOp::Blit {
            surface: source.clone(),
            region,
            x,
            y,
        });
    }

    fn fill_rect(&mut self, rect: Rect, color: Color) {
        self.ops.push(DrawOp::Fill { rect, color });
    }

    fn poll_event(&mut self) -> Option<PlatformEvent> {
        self.events.pop_front()
    }

    fn ticks(&self) -> Duration {
        let now = self.clock.get();
        self.clock.set(now + self.tick_step);
        now
    }

    fn delay(&mut self, duration: Duration) {
        self.delays.push(duration);
    }

    fn present(&mut self) -> Result<(), PlatformError> {
        if self.fail_present {
            return Err(PlatformError::PresentFailed("scripted failure".into()));
        }
        self.presents += 1;
        Ok(())
    }

    fn set_title(&mut self, title: &str) {
        self.title = title.to_string();
    }

    fn shutdown(&mut self) {
        self.shutdowns += 1;
    }
}
