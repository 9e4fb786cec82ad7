//! Collision pair bookkeeping and begin/end events.
//!
//! During the entity pass every detected contact is recorded under its
//! [`PairId`]. After the pass the frame's [`CollisionSet`] is diffed against
//! the previous frame's:
//!
//! - pairs that are new fire `collision begin` on both participants
//! - pairs that disappeared fire `collision end` on both participants that
//!   are still in the scene
//!
//! The new set then becomes the baseline for the next frame.

use glam::Vec2;
use rustc_hash::FxHashMap;
use serde::Serialize;

use crate::entities::EntityCore;

/// Order-independent key of two entity ids.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct PairId {
    low: String,
    high: String,
}

impl PairId {
    pub fn new(a: &str, b: &str) -> Self {
        let (low, high) = if a <= b { (a, b) } else { (b, a) };
        Self {
            low: low.to_string(),
            high: high.to_string(),
        }
    }

    pub fn contains(&self, id: &str) -> bool {
        self.low == id || self.high == id
    }

    /// The participant that is not `id`.
    pub fn other(&self, id: &str) -> Option<&str> {
        if self.low == id {
            Some(&self.high)
        } else if self.high == id {
            Some(&self.low)
        } else {
            None
        }
    }

    pub fn ids(&self) -> (&str, &str) {
        (&self.low, &self.high)
    }
}

/// Snapshot of a participant handed to collision listeners.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CollisionPeer {
    pub id: String,
    pub tag: String,
    pub position: Vec2,
    pub velocity: Vec2,
    pub is_static: bool,
    pub is_ghost: bool,
}

impl CollisionPeer {
    pub fn of(core: &EntityCore) -> Self {
        let (is_static, is_ghost) = core
            .physics
            .as_ref()
            .map_or((false, false), |p| (p.is_static, p.is_ghost));
        Self {
            id: core.id().to_string(),
            tag: core.tag().to_string(),
            position: core.position(),
            velocity: core.velocity(),
            is_static,
            is_ghost,
        }
    }
}

/// Both participants of a detected contact, as seen when it was detected.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CollisionRecord {
    pub a: CollisionPeer,
    pub b: CollisionPeer,
}

impl CollisionRecord {
    pub fn new(a: &EntityCore, b: &EntityCore) -> Self {
        Self {
            a: CollisionPeer::of(a),
            b: CollisionPeer::of(b),
        }
    }

    /// Snapshot of the participant opposite to `id`.
    pub fn peer_of(&self, id: &str) -> Option<&CollisionPeer> {
        if self.a.id == id {
            Some(&self.b)
        } else if self.b.id == id {
            Some(&self.a)
        } else {
            None
        }
    }
}

/// Contacts detected during one frame.
#[derive(Debug, Clone, Default)]
pub struct CollisionSet {
    pairs: FxHashMap<PairId, CollisionRecord>,
}

impl CollisionSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a contact. A pair already present keeps its first record.
    pub fn record(&mut self, a: &EntityCore, b: &EntityCore) {
        self.pairs
            .entry(PairId::new(a.id(), b.id()))
            .or_insert_with(|| CollisionRecord::new(a, b));
    }

    pub fn contains(&self, pair: &PairId) -> bool {
        self.pairs.contains_key(pair)
    }

    pub fn get(&self, pair: &PairId) -> Option<&CollisionRecord> {
        self.pairs.get(pair)
    }

    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&PairId, &CollisionRecord)> {
        self.pairs.iter()
    }

    /// Ids of every entity in contact with `id`, sorted.
    pub fn peers_of(&self, id: &str) -> Vec<&str> {
        let mut peers: Vec<&str> = self.pairs.keys().filter_map(|p| p.other(id)).collect();
        peers.sort_unstable();
        peers
    }

    pub fn has_collision(&self, id: &str) -> bool {
        self.pairs.keys().any(|p| p.contains(id))
    }
}

/// A begin or end notification for one pair.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum CollisionEvent {
    Begin(CollisionRecord),
    End(CollisionRecord),
}

/// Compare this frame's contacts with the previous frame's.
///
/// Begin events carry this frame's snapshots, end events the previous
/// frame's. Events are ordered by pair id so that listeners fire
/// deterministically.
pub fn diff(previous: &CollisionSet, current: &CollisionSet) -> Vec<CollisionEvent> {
    let mut began: Vec<(&PairId, &CollisionRecord)> = current
        .iter()
        .filter(|(pair, _)| !previous.contains(pair))
        .collect();
    let mut ended: Vec<(&PairId, &CollisionRecord)> = previous
        .iter()
        .filter(|(pair, _)| !current.contains(pair))
        .collect();
    began.sort_by(|x, y| x.0.cmp(y.0));
    ended.sort_by(|x, y| x.0.cmp(y.0));

    began
        .into_iter()
        .map(|(_, r)| CollisionEvent::Begin(r.clone()))
        .chain(ended.into_iter().map(|(_, r)| CollisionEvent::End(r.clone())))
        .collect()
}
