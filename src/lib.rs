//=========================================================================
// Spritestage Library Root
//
// This crate defines the public API surface of the sprite engine.
//
// Responsibilities:
// - Expose the engine facade (`GraphicsEngine`, `EngineBuilder`)
// - Expose the building blocks games register with it (objects,
//   animations, widgets, listeners)
// - Ship a software backend (`platform`) behind the `Platform` contract
//
// Typical usage:
// ```no_run
// use spritestage::prelude::*;
//
// let (mut engine, _events) = EngineBuilder::new()
//     .with_size(640, 480)
//     .with_title("Demo")
//     .build_software();
//
// let ship = SceneObject::new_static(100, 200, "assets/ship.png")
//     .with_movement(|pos: &mut Position| pos.x += 1)
//     .into_shared();
// engine.add_game_object(ship).unwrap();
// engine.run().unwrap();
// ```
//
//=========================================================================

//--- Public Modules ------------------------------------------------------
//
// `core` holds the platform-independent pieces: surfaces, animations,
// the scene and widget registries, input mapping and the compositor.
//
pub mod core;

// `platform` holds the software backend and the Winit event bridge.
//
pub mod platform;

pub mod prelude;

//--- Internal Modules ----------------------------------------------------
//
// `engine` defines the frame pipeline and its builder.
//
mod engine;

#[cfg(test)]
mod testing;

//--- Public Exports ------------------------------------------------------

pub use engine::{
    EngineBuilder, EngineConfig, EngineError, EventReport, FrameReport, GraphicsEngine,
    QuitPolicy, RefreshReport, UpdateReport,
};
