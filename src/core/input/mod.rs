//=========================================================================
// Input Dispatch
//
// Routes mapped keyboard events to the game's listener callbacks.
//
// Responsibilities:
// - Hold the keyboard and mouse listeners registered by the game
// - Translate platform key events and call the matching callback
//
// Notes:
// Dispatch is fire-and-forget: the engine never reads anything back from
// a listener. The mouse listener is stored so games can register one,
// but no platform event is routed to it yet.
//
//=========================================================================

//=== Submodules ==========================================================

pub mod event;

//=== External Crates =====================================================

use log::debug;
use winit::keyboard::Key;

//=== Public API ==========================================================

pub use event::KeyboardEvent;

//=== Listener Traits =====================================================

/// Receives key presses and releases.
pub trait KeyboardListener {
    fn on_key_pressed(&mut self, event: KeyboardEvent);
    fn on_key_released(&mut self, event: KeyboardEvent);
}

/// Physical mouse button.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MouseButton {
    Left,
    Right,
    Middle,
    Other,
}

/// Mouse event delivered to a [`MouseListener`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MouseEvent {
    Pressed { button: MouseButton, x: i32, y: i32 },
    Released { button: MouseButton, x: i32, y: i32 },
    Moved { x: i32, y: i32 },
}

/// Receives mouse events. Registered but not yet fed by the frame pipeline.
pub trait MouseListener {
    fn on_mouse_event(&mut self, event: MouseEvent);
}

//=== KeyPhase ============================================================

/// Whether a key went down or up.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyPhase {
    Pressed,
    Released,
}

//=== InputDispatcher =====================================================

/// Owns the registered listeners and forwards key events to them.
#[derive(Default)]
pub struct InputDispatcher {
    keyboard: Option<Box<dyn KeyboardListener>>,
    mouse: Option<Box<dyn MouseListener>>,
}

impl InputDispatcher {
    //--- Construction -----------------------------------------------------

    pub fn new() -> Self {
        Self::default()
    }

    //--- Registration -----------------------------------------------------

    /// Replaces the keyboard listener. Returns the previous one.
    pub fn set_keyboard_listener(
        &mut self,
        listener: Box<dyn KeyboardListener>,
    ) -> Option<Box<dyn KeyboardListener>> {
        self.keyboard.replace(listener)
    }

    pub fn take_keyboard_listener(&mut self) -> Option<Box<dyn KeyboardListener>> {
        self.keyboard.take()
    }

    /// Replaces the mouse listener. Returns the previous one.
    pub fn set_mouse_listener(
        &mut self,
        listener: Box<dyn MouseListener>,
    ) -> Option<Box<dyn MouseListener>> {
        self.mouse.replace(listener)
    }

    pub fn take_mouse_listener(&mut self) -> Option<Box<dyn MouseListener>> {
        self.mouse.take()
    }

    pub fn has_keyboard_listener(&self) -> bool {
        self.keyboard.is_some()
    }

    pub fn has_mouse_listener(&self) -> bool {
        self.mouse.is_some()
    }

    //--- Dispatch ---------------------------------------------------------

    /// Maps `key` and calls the keyboard listener.
    ///
    /// Returns `false` when no keyboard listener is registered; the event
    /// is dropped in that case.
    pub fn dispatch_key(&mut self, key: &Key, phase: KeyPhase) -> bool {
        let Some(listener) = self.keyboard.as_mut() else {
            debug!(target: "input", "No keyboard listener, dropping {:?} {:?}", phase, key);
            return false;
        };

        let event = KeyboardEvent::from(key);
        match phase {
            KeyPhase::Pressed => listener.on_key_pressed(event),
            KeyPhase::Released => listener.on_key_released(event),
        }
        true
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
