//=========================================================================
// Animation
//=========================================================================
//
// Ordered, cyclically-advancing sequence of frames bound to one animated
// scene object.
//
// Frames are decoded once at construction and never change afterwards.
// A path that fails to decode keeps its slot as `None` so the frame
// count always equals the number of source paths and frame indices keep
// lining up with the artist's numbering.
//
// State:
//   frames:  Rc<[Option<Surface>]>   (shared with the scene registry)
//   current: index in [0, frame_count)
//   running: start/stop/toggle flag
//
//=========================================================================

//=== External Dependencies ===============================================

use std::fmt;
use std::path::Path;
use std::rc::Rc;

use log::warn;

//=== Internal Dependencies ===============================================

use crate::core::platform_bridge::Platform;
use crate::core::surface::Surface;

//=== AnimationError ======================================================

/// Errors reported by frame-index operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnimationError {
    /// The animation was built from an empty path list.
    NoFrames,

    /// Requested frame index is outside `[0, frame_count)`.
    FrameOutOfRange { index: usize, frame_count: usize },
}

impl fmt::Display for AnimationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NoFrames => write!(f, "Animation has no frames"),
            Self::FrameOutOfRange { index, frame_count } => write!(
                f,
                "Frame {} out of range (animation has {} frames)",
                index, frame_count
            ),
        }
    }
}

impl std::error::Error for AnimationError {}

//=== Animation ===========================================================

/// Frame sequence plus playback state for one animated object.
///
/// # Examples
///
/// ```
/// use spritestage::core::animation::Animation;
/// use spritestage::core::surface::{Color, Surface};
///
/// let frame = Surface::solid(8, 8, Color::WHITE);
/// let mut walk = Animation::from_frames(vec![Some(frame.clone()), Some(frame)]);
///
/// walk.advance().unwrap();
/// assert_eq!(walk.current_frame(), 1);
/// walk.advance().unwrap();
/// assert_eq!(walk.current_frame(), 0);
/// ```
#[derive(Debug, Clone)]
pub struct Animation {
    frames: Rc<[Option<Surface>]>,
    current: usize,
    running: bool,
}

impl Animation {
    //--- Construction -----------------------------------------------------

    /// Decodes every path in order through the platform.
    ///
    /// Paths that fail to decode leave an empty slot; see
    /// [`Animation::loaded_count`]. The animation starts stopped on frame 0.
    pub fn load<P, S>(platform: &mut P, paths: &[S]) -> Self
    where
        P: Platform + ?Sized,
        S: AsRef<Path>,
    {
        let frames = paths
            .iter()
            .map(|path| {
                let path = path.as_ref();
                let surface = platform.load_image(path);
                if surface.is_none() {
                    warn!(target: "scene", "Animation frame {:?} could not be decoded", path);
                }
                surface
            })
            .collect::<Vec<_>>();

        Self::from_frames(frames)
    }

    /// Builds an animation from already decoded frames.
    pub fn from_frames(frames: Vec<Option<Surface>>) -> Self {
        Self {
            frames: frames.into(),
            current: 0,
            running: false,
        }
    }

    //--- Frame Control ----------------------------------------------------

    /// Moves to the next frame, wrapping to 0 after the last one.
    ///
    /// Returns the new frame index.
    pub fn advance(&mut self) -> Result<usize, AnimationError> {
        if self.frames.is_empty() {
            return Err(AnimationError::NoFrames);
        }
        self.current = (self.current + 1) % self.frames.len();
        Ok(self.current)
    }

    /// Jumps to `index`. Leaves the current frame untouched on error.
    pub fn set_frame(&mut self, index: usize) -> Result<(), AnimationError> {
        if index >= self.frames.len() {
            return Err(AnimationError::FrameOutOfRange {
                index,
                frame_count: self.frames.len(),
            });
        }
        self.current = index;
        Ok(())
    }

    //--- Playback Flag ----------------------------------------------------

    pub fn start(&mut self) {
        self.running = true;
    }

    pub fn stop(&mut self) {
        self.running = false;
    }

    pub fn toggle(&mut self) {
        self.running = !self.running;
    }

    //--- Queries ----------------------------------------------------------

    /// Number of frame slots (decoded or not).
    pub fn frame_count(&self) -> usize {
        self.frames.len()
    }

    /// Number of slots that hold a decoded surface.
    pub fn loaded_count(&self) -> usize {
        self.frames.iter().filter(|frame| frame.is_some()).count()
    }

    pub fn current_frame(&self) -> usize {
        self.current
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Surface of the current frame, or `None` if that slot failed to decode.
    pub fn current_surface(&self) -> Option<&Surface> {
        self.frames.get(self.current).and_then(Option::as_ref)
    }

    /// Shared frame sequence. Clones of an animation share it.
    pub fn frames(&self) -> &Rc<[Option<Surface>]> {
        &self.frames
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
