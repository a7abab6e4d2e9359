//=========================================================================
// Platform Bridge
//=========================================================================
//
// Bridges platform backends (the bundled software renderer, a winit or
// SDL host, a test double) with the engine core.
//
// The engine is written against the `Platform` trait only, so backends
// can be swapped without touching scene, animation or pipeline code.
//
//=========================================================================

//=== Module Declarations =================================================

mod interface;

//=== Public API ==========================================================

pub use interface::{Platform, PlatformError, PlatformEvent};
