//=========================================================================
// Scene System
//=========================================================================
//
// Positioned game objects and the registries that decide what is drawn.
//
// Architecture:
//   SceneObject (shared, owned by game code)
//     ├─ position: Position
//     ├─ kind: Static | Animated(Animation) | Text
//     └─ movement: Option<Box<dyn Movement>>
//
//   SceneRegistry   → object + surface binding, in draw order
//   WidgetRegistry  → overlays drawn after every scene object
//
// Game code keeps its own `SharedObject` clones; the registries hold
// additional references and never decide an object's lifetime.
//
//=========================================================================

//=== External Dependencies ===============================================

use std::cell::RefCell;
use std::fmt;
use std::path::{Path, PathBuf};
use std::rc::Rc;

//=== Internal Dependencies ===============================================

use crate::core::animation::Animation;

//=== Module Declarations =================================================

mod arena;
mod registry;
mod widget;

//=== Public API ==========================================================

pub use arena::Handle;
pub use registry::{ObjectHandle, SceneEntry, SceneRegistry, SurfaceBinding};
pub use widget::{SharedWidget, TextWidget, Widget, WidgetHandle, WidgetRegistry};

/// Game object shared between game code and the engine.
pub type SharedObject = Rc<RefCell<SceneObject>>;

//=== Position ============================================================

/// Integer display position of an object's top-left corner.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Position {
    pub x: i32,
    pub y: i32,
}

impl Position {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

//=== Movement ============================================================

/// Per-frame movement logic attached to a scene object.
///
/// Any `FnMut(&mut Position)` closure is a movement:
///
/// ```
/// use spritestage::core::scene::{Position, SceneObject};
///
/// let mut ship = SceneObject::new_static(0, 0, "ship.png")
///     .with_movement(|pos: &mut Position| pos.x += 2);
///
/// ship.update_movement();
/// assert_eq!(ship.position(), Position::new(2, 0));
/// ```
pub trait Movement {
    fn update(&mut self, position: &mut Position);
}

impl<F> Movement for F
where
    F: FnMut(&mut Position),
{
    fn update(&mut self, position: &mut Position) {
        self(position)
    }
}

//=== ObjectKind ==========================================================

/// What an object draws.
#[derive(Debug, Clone)]
pub enum ObjectKind {
    /// A single image decoded from `image` when the object is registered.
    Static { image: PathBuf },

    /// A frame sequence advanced once per update.
    Animated(Animation),

    /// A line of text rendered with the engine's current font and color.
    Text { text: String },
}

//=== SceneObject =========================================================

/// A positioned entity eligible for per-frame drawing.
pub struct SceneObject {
    position: Position,
    kind: ObjectKind,
    movement: Option<Box<dyn Movement>>,
}

impl SceneObject {
    //--- Construction -----------------------------------------------------

    pub fn new(x: i32, y: i32, kind: ObjectKind) -> Self {
        Self {
            position: Position::new(x, y),
            kind,
            movement: None,
        }
    }

    pub fn new_static(x: i32, y: i32, image: impl Into<PathBuf>) -> Self {
        Self::new(x, y, ObjectKind::Static { image: image.into() })
    }

    pub fn new_animated(x: i32, y: i32, animation: Animation) -> Self {
        Self::new(x, y, ObjectKind::Animated(animation))
    }

    pub fn new_text(x: i32, y: i32, text: impl Into<String>) -> Self {
        Self::new(x, y, ObjectKind::Text { text: text.into() })
    }

    /// Attaches movement logic run at the start of every update.
    pub fn with_movement<M>(mut self, movement: M) -> Self
    where
        M: Movement + 'static,
    {
        self.movement = Some(Box::new(movement));
        self
    }

    /// Wraps the object for sharing with the engine.
    pub fn into_shared(self) -> SharedObject {
        Rc::new(RefCell::new(self))
    }

    //--- Update -----------------------------------------------------------

    /// Runs the attached movement, if any.
    pub fn update_movement(&mut self) {
        if let Some(movement) = self.movement.as_mut() {
            movement.update(&mut self.position);
        }
    }

    //--- Accessors --------------------------------------------------------

    pub fn position(&self) -> Position {
        self.position
    }

    pub fn set_position(&mut self, x: i32, y: i32) {
        self.position = Position::new(x, y);
    }

    pub fn kind(&self) -> &ObjectKind {
        &self.kind
    }

    pub fn is_animating(&self) -> bool {
        matches!(self.kind, ObjectKind::Animated(_))
    }

    pub fn animation(&self) -> Option<&Animation> {
        match &self.kind {
            ObjectKind::Animated(animation) => Some(animation),
            _ => None,
        }
    }

    pub fn animation_mut(&mut self) -> Option<&mut Animation> {
        match &mut self.kind {
            ObjectKind::Animated(animation) => Some(animation),
            _ => None,
        }
    }

    /// Image path of a static object.
    pub fn image_path(&self) -> Option<&Path> {
        match &self.kind {
            ObjectKind::Static { image } => Some(image),
            _ => None,
        }
    }
}

impl fmt::Debug for SceneObject {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SceneObject")
            .field("position", &self.position)
            .field("kind", &self.kind)
            .field("has_movement", &self.movement.is_some())
            .finish()
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
