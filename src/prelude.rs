//=========================================================================
// Prelude
//=========================================================================
//
// Convenience module that re-exports commonly used types and traits.
//
// Usage:
//   use spritestage::prelude::*;
//
//=========================================================================

//=== Public API ==========================================================

// Engine
pub use crate::engine::{EngineBuilder, EngineError, GraphicsEngine, QuitPolicy};

// Platform contract and backend
pub use crate::core::platform_bridge::{Platform, PlatformEvent};
pub use crate::platform::SoftwarePlatform;

// Scene system
pub use crate::core::animation::Animation;
pub use crate::core::scene::{
    ObjectHandle, Position, SceneObject, SharedObject, SharedWidget, TextWidget, Widget,
};

// Input system
pub use crate::core::input::{KeyboardEvent, KeyboardListener, MouseEvent, MouseListener};

// Drawing primitives
pub use crate::core::surface::{Color, Rect, Surface};
pub use crate::core::timing::TickControl;
