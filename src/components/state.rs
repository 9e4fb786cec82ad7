//! Priority-guarded state machine for animated entities.
//!
//! A [`StateMachine`] maps application-defined state values to animation
//! ids. The table is supplied at construction as a list of
//! [`StateBinding`]s, each optionally carrying a predicate that is evaluated
//! every frame before the entity's pre-draw listeners.
//!
//! # Transition rule
//!
//! [`StateMachine::set_state`] with `enforce_hierarchy`:
//! 1. same state as current: nothing happens
//! 2. unknown state: logged and ignored, even when there is no current
//!    state yet (a machine never adopts a state it has no animation for)
//! 3. no current state: adopted
//! 4. current animation done: adopted
//! 5. hierarchy enforced: adopted only if the new animation's priority is at
//!    least the current one's
//! 6. hierarchy not enforced: adopted
//!
//! Adopting a state rewinds its animation so that it plays from the start.
//!
//! Predicates run in registration order and each one that holds requests its
//! state with the hierarchy enforced, so when several hold in one frame the
//! last accepted request wins.

use std::fmt::Debug;
use std::hash::Hash;

use log::{debug, warn};

use crate::components::animation::{Animation, priority_of};
use crate::entities::EntityCore;
use crate::resources::store::ResourceStore;

/// Types usable as state values.
pub trait StateKey: Copy + Eq + Hash + Debug + 'static {}

impl<T: Copy + Eq + Hash + Debug + 'static> StateKey for T {}

/// Condition deciding whether a state should be requested this frame.
pub type StatePredicate = Box<dyn Fn(&EntityCore) -> bool>;

/// One row of the state table.
pub struct StateBinding<S> {
    pub state: S,
    pub animation_id: String,
    pub predicate: Option<StatePredicate>,
}

impl<S: StateKey> StateBinding<S> {
    pub fn new(state: S, animation_id: impl Into<String>) -> Self {
        Self {
            state,
            animation_id: animation_id.into(),
            predicate: None,
        }
    }

    pub fn when(mut self, predicate: impl Fn(&EntityCore) -> bool + 'static) -> Self {
        self.predicate = Some(Box::new(predicate));
        self
    }
}

/// Outcome of a transition request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    Unchanged,
    Adopted,
    UnknownState,
    Blocked,
}

pub struct StateMachine<S> {
    bindings: Vec<StateBinding<S>>,
    current: Option<S>,
}

impl<S: StateKey> Default for StateMachine<S> {
    fn default() -> Self {
        Self {
            bindings: Vec::new(),
            current: None,
        }
    }
}

impl<S: StateKey> StateMachine<S> {
    pub fn new(bindings: Vec<StateBinding<S>>) -> Self {
        let mut machine = Self::default();
        for binding in bindings {
            machine.add_state(binding);
        }
        machine
    }

    /// Start in `state` without going through the transition rule.
    pub fn with_initial(mut self, state: S) -> Self {
        if self.binding(state).is_some() {
            self.current = Some(state);
        } else {
            warn!("Initial state {:?} has no binding", state);
        }
        self
    }

    pub fn current(&self) -> Option<S> {
        self.current
    }

    pub fn current_state_name(&self) -> Option<String> {
        self.current.map(|s| format!("{:?}", s))
    }

    /// Names of every registered state, in registration order.
    pub fn state_names(&self) -> Vec<String> {
        self.bindings.iter().map(|b| format!("{:?}", b.state)).collect()
    }

    pub fn states(&self) -> impl Iterator<Item = S> + '_ {
        self.bindings.iter().map(|b| b.state)
    }

    pub fn contains(&self, state: S) -> bool {
        self.binding(state).is_some()
    }

    pub fn animation_id(&self, state: S) -> Option<&str> {
        self.binding(state).map(|b| b.animation_id.as_str())
    }

    /// Animation id of the current state.
    pub fn current_animation_id(&self) -> Option<&str> {
        self.current.and_then(|s| self.animation_id(s))
    }

    /// Add a binding, replacing an existing one for the same state in place.
    pub fn add_state(&mut self, binding: StateBinding<S>) {
        match self.bindings.iter_mut().find(|b| b.state == binding.state) {
            Some(existing) => *existing = binding,
            None => self.bindings.push(binding),
        }
    }

    /// Remove a state. Removing the current state leaves no current state.
    pub fn remove_state(&mut self, state: S) {
        self.bindings.retain(|b| b.state != state);
        if self.current == Some(state) {
            self.current = None;
        }
    }

    pub fn clear_states(&mut self) {
        self.bindings.clear();
        self.current = None;
    }

    fn binding(&self, state: S) -> Option<&StateBinding<S>> {
        self.bindings.iter().find(|b| b.state == state)
    }

    /// Request a transition to `next`. See the module docs for the rule.
    pub fn set_state(
        &mut self,
        next: S,
        enforce_hierarchy: bool,
        animations: &mut ResourceStore<Animation>,
    ) -> Transition {
        if self.current == Some(next) {
            return Transition::Unchanged;
        }
        let Some(next_binding) = self.binding(next) else {
            warn!("State {:?} is not registered; keeping {:?}", next, self.current);
            return Transition::UnknownState;
        };
        let next_animation_id = next_binding.animation_id.clone();

        let Some(current) = self.current else {
            return self.adopt(next, &next_animation_id, animations);
        };

        let current_animation = self
            .animation_id(current)
            .and_then(|id| animations.get(id));
        if current_animation.is_some_and(Animation::is_done) || !enforce_hierarchy {
            return self.adopt(next, &next_animation_id, animations);
        }

        let current_priority = priority_of(current_animation);
        let next_priority = priority_of(animations.get(&next_animation_id));
        if next_priority >= current_priority {
            self.adopt(next, &next_animation_id, animations)
        } else {
            debug!(
                "State {:?} (priority {}) blocked by {:?} (priority {})",
                next, next_priority, current, current_priority
            );
            Transition::Blocked
        }
    }

    fn adopt(
        &mut self,
        next: S,
        animation_id: &str,
        animations: &mut ResourceStore<Animation>,
    ) -> Transition {
        self.current = Some(next);
        match animations.get_mut(animation_id) {
            Some(animation) => animation.reset(),
            None => warn!("State {:?}: animation '{}' not found", next, animation_id),
        }
        Transition::Adopted
    }

    /// Evaluate every predicate against `core` in registration order.
    ///
    /// Returns the state current after all requests.
    pub fn apply_predicates(
        &mut self,
        core: &EntityCore,
        animations: &mut ResourceStore<Animation>,
    ) -> Option<S> {
        let requested: Vec<S> = self
            .bindings
            .iter()
            .filter(|b| b.predicate.as_ref().is_some_and(|p| p(core)))
            .map(|b| b.state)
            .collect();
        for state in requested {
            self.set_state(state, true, animations);
        }
        self.current
    }
}
