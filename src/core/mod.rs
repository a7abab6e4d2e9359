//=========================================================================
// Engine Core
//
// Platform-independent building blocks of the sprite engine.
//
// Responsibilities:
// - Surfaces and geometry (`surface`)
// - Frame sequences for animated objects (`animation`)
// - Object/widget registries with generation-checked handles (`scene`)
// - Key mapping and listener dispatch (`input`)
// - Frame compositing and background margins (`render`)
// - Phase timings and loop control (`timing`)
// - The platform contract every backend implements (`platform_bridge`)
//
// Notes:
// Nothing in here opens a window or decodes a file by itself. All I/O goes
// through the `Platform` trait, which keeps the core testable with a
// scripted backend.
//
//=========================================================================

pub mod animation;
pub mod input;
pub mod platform_bridge;
pub mod render;
pub mod scene;
pub mod surface;
pub mod timing;
