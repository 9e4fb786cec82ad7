//! Long-lived data shared by the systems.
//!
//! This module groups the data a scene carries between frames: the keyed
//! stores, asset metadata, timing and configuration. Each submodule
//! documents the semantics and intended usage of its resource(s).
//!
//! Overview
//! - `drawingoptions` – switches for the diagnostic overlay
//! - `engineconfig` – INI-backed engine settings
//! - `scene` – the simulation context passed to the scheduler
//! - `store` – id- and tag-indexed container for textures, animations and entities
//! - `texture` – texture metadata (size, source hint)
//! - `worldtime` – simulation time and delta
pub mod drawingoptions;
pub mod engineconfig;
pub mod scene;
pub mod store;
pub mod texture;
pub mod worldtime;
