//! kinetic2d library.
//!
//! A real-time 2D entity simulation core: oriented-box collision with
//! impulse response, simplified rigid-body integration, sprite-sheet
//! animation driven by a priority-guarded state machine, and a deterministic
//! frame scheduler that raises per-entity draw and contact events.
//!
//! Rendering is delegated to a [`render::Renderer`] implementation; the core
//! itself only produces [`render::DrawCommand`]s.

pub mod components;
pub mod entities;
pub mod events;
pub mod render;
pub mod resources;
pub mod systems;
