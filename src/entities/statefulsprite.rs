//! Sprite driven by a priority-guarded state machine.
//!
//! The current state decides which animation is shown. Predicates registered
//! with the state table are evaluated at the start of every pre-draw step.

use std::any::Any;

use glam::Vec2;

use crate::components::animation::Animation;
use crate::components::physicalproperties::PhysicalProperties;
use crate::components::state::{StateBinding, StateKey, StateMachine, Transition};
use crate::entities::sprite::{textured_draw, textured_size};
use crate::entities::{Entity, EntityCore};
use crate::render::{Color, DrawCommand};
use crate::resources::scene::Assets;
use crate::resources::store::ResourceStore;

pub struct StatefulSprite<S> {
    pub core: EntityCore,
    machine: StateMachine<S>,
    pub tint: Color,
}

impl<S: StateKey> StatefulSprite<S> {
    /// Build from the state table. `initial` becomes current when it is one
    /// of the registered states.
    pub fn new(
        id: impl Into<String>,
        tag: impl Into<String>,
        bindings: Vec<StateBinding<S>>,
        initial: Option<S>,
    ) -> Self {
        let mut machine = StateMachine::new(bindings);
        if let Some(initial) = initial {
            machine = machine.with_initial(initial);
        }
        Self {
            core: EntityCore::new(id, tag),
            machine,
            tint: Color::WHITE,
        }
    }

    pub fn with_position(mut self, position: Vec2) -> Self {
        self.core.transform.position = position;
        self
    }

    pub fn with_physics(mut self, physics: PhysicalProperties) -> Self {
        self.core.physics = Some(physics);
        self
    }

    pub fn with_draw_index(mut self, draw_index: i32) -> Self {
        self.core.draw_index = draw_index;
        self
    }

    pub fn current_state(&self) -> Option<S> {
        self.machine.current()
    }

    pub fn current_state_name(&self) -> Option<String> {
        self.machine.current_state_name()
    }

    pub fn state_names(&self) -> Vec<String> {
        self.machine.state_names()
    }

    pub fn machine(&self) -> &StateMachine<S> {
        &self.machine
    }

    pub fn add_state(&mut self, binding: StateBinding<S>) {
        self.machine.add_state(binding);
    }

    pub fn remove_state(&mut self, state: S) {
        self.machine.remove_state(state);
    }

    pub fn clear_states(&mut self) {
        self.machine.clear_states();
    }

    /// Request a transition; see [`StateMachine::set_state`].
    pub fn set_state(
        &mut self,
        next: S,
        enforce_hierarchy: bool,
        animations: &mut ResourceStore<Animation>,
    ) -> Transition {
        let transition = self.machine.set_state(next, enforce_hierarchy, animations);
        if transition == Transition::Adopted {
            self.center_origin(animations);
        }
        transition
    }

    /// Keep the origin on the current frame's center.
    fn center_origin(&mut self, animations: &ResourceStore<Animation>) {
        if let Some(animation) = self
            .machine
            .current_animation_id()
            .and_then(|id| animations.get(id))
        {
            self.core.transform.origin = animation.frame_size().as_vec2() / 2.0;
        }
    }
}

impl<S: StateKey> Entity for StatefulSprite<S> {
    fn core(&self) -> &EntityCore {
        &self.core
    }

    fn core_mut(&mut self) -> &mut EntityCore {
        &mut self.core
    }

    fn local_size(&self, assets: &Assets) -> Vec2 {
        textured_size(None, self.machine.current_animation_id(), assets)
    }

    fn draw_command(&self, assets: &Assets) -> Option<DrawCommand> {
        let animation_id = self.machine.current_animation_id()?;
        textured_draw(&self.core, None, Some(animation_id), self.tint, assets)
    }

    fn animation_id(&self) -> Option<&str> {
        self.machine.current_animation_id()
    }

    fn state_name(&self) -> Option<String> {
        self.machine.current_state_name()
    }

    fn update_state(&mut self, animations: &mut ResourceStore<Animation>) {
        self.machine.apply_predicates(&self.core, animations);
        self.center_origin(animations);
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}
