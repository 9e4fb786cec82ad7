//! Per-frame algorithms.
//!
//! Submodules overview
//! - [`animation`] – advance the animation an entity currently shows
//! - [`collision`] – collision boxes, pairwise detection and impulse response
//! - [`debug`] – diagnostic overlay draw commands
//! - [`physics`] – force accumulation, gravity and integration
//! - [`scheduler`] – the ordered frame pass and run loop
//! - [`time`] – frame clocks feeding [`crate::resources::worldtime::WorldTime`]

pub mod animation;
pub mod collision;
pub mod debug;
pub mod physics;
pub mod scheduler;
pub mod time;
