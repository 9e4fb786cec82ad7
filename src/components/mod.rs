//! Data attached to entities.
//!
//! This module groups the plain data types entities are built from and the
//! per-type logic that only touches that data. Systems in
//! [`crate::systems`] combine them once per frame.
//!
//! Submodules overview:
//! - [`animation`] – sprite-sheet animation and its four playback modes
//! - [`boundingbox`] – oriented bounding boxes and the separating-axis test
//! - [`hooks`] – per-entity listener lists and the context listeners receive
//! - [`physicalproperties`] – mass, velocity, forces and collision settings
//! - [`state`] – priority-guarded state machine mapping states to animations
//! - [`transform`] – position, rotation, scale and origin

pub mod animation;
pub mod boundingbox;
pub mod hooks;
pub mod physicalproperties;
pub mod state;
pub mod transform;
