//=========================================================================
// Winit Bridge
//=========================================================================
//
// Converts Winit window events into `PlatformEvent`s and forwards them
// to a backend's event queue.
//
// Architecture:
//   Winit WindowEvent → translate_window_event → EventForwarder → channel
//                                                                    ↓
//                                              SoftwarePlatform::poll_event
//
// Key events carry the *logical* key (what the key types), so a keypad
// '*' and a shifted '8' both arrive as "*".
//
//=========================================================================

//=== External Dependencies ===============================================

use crossbeam_channel::Sender;
use log::{trace, warn};
use winit::event::{ElementState, WindowEvent};

//=== Internal Dependencies ===============================================

use crate::core::platform_bridge::PlatformEvent;

//=== Event Translation ===================================================

/// Maps one Winit window event onto the engine's event vocabulary.
///
/// - `KeyboardInput` → `KeyDown` / `KeyUp` with the logical key
/// - `CloseRequested` / `Destroyed` → `Quit`
/// - everything else → `Other`
pub fn translate_window_event(event: &WindowEvent) -> PlatformEvent {
    match event {
        WindowEvent::KeyboardInput { event: key_event, .. } => {
            let key = key_event.logical_key.clone();
            match key_event.state {
                ElementState::Pressed => PlatformEvent::KeyDown(key),
                ElementState::Released => PlatformEvent::KeyUp(key),
            }
        }
        WindowEvent::CloseRequested | WindowEvent::Destroyed => PlatformEvent::Quit,
        _ => PlatformEvent::Other,
    }
}

//=== EventForwarder ======================================================

/// Pushes translated window events into a backend's event channel.
///
/// Intended to live inside a Winit `ApplicationHandler` on the main
/// thread while the engine polls the receiving end.
#[derive(Debug, Clone)]
pub struct EventForwarder {
    sender: Sender<PlatformEvent>,
    forward_other: bool,
}

impl EventForwarder {
    pub fn new(sender: Sender<PlatformEvent>) -> Self {
        Self {
            sender,
            forward_other: false,
        }
    }

    /// Also forward events the engine does not consume.
    pub fn with_other_events(mut self, enabled: bool) -> Self {
        self.forward_other = enabled;
        self
    }

    /// Translates and sends `event`. Returns `true` if it was queued.
    ///
    /// A disconnected channel is logged and the event dropped; the window
    /// keeps running so it can still be closed.
    pub fn forward(&self, event: &WindowEvent) -> bool {
        let translated = translate_window_event(event);
        if translated == PlatformEvent::Other && !self.forward_other {
            return false;
        }

        trace!(target: "platform::input", "Forwarding {:?}", translated);

        if self.sender.send(translated).is_err() {
            warn!(target: "platform::input", "Event channel disconnected, dropping event");
            return false;
        }
        true
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
