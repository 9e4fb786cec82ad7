//! Keyed resource store.
//!
//! [`ResourceStore`] is the generic container the scene uses for textures,
//! animations and live entities. Items are indexed by their unique id and by
//! their (non-unique) tag. Insertion order is remembered so that enumeration
//! is deterministic.
//!
//! Guarantees:
//! - ids are unique; inserting an existing id replaces the item in place
//! - the tag index only ever references ids that are present
//! - removing an id that is not present is a no-op
//! - an item's tag only changes through [`ResourceStore::retag`], which moves
//!   it in the tag index

use rustc_hash::{FxHashMap, FxHashSet};

/// Anything that can be stored in a [`ResourceStore`].
pub trait Identifiable {
    fn id(&self) -> &str;
    fn tag(&self) -> &str;
    /// Replace the tag. Only callable by the store, which holds the token.
    fn set_tag(&mut self, tag: String, token: RetagToken);
}

/// Handed to [`Identifiable::set_tag`]; only this module can create one.
pub struct RetagToken(());

struct Slot<T> {
    seq: u64,
    item: T,
}

/// An item temporarily taken out of a store by [`ResourceStore::detach_all`].
///
/// Keeps the insertion sequence so that [`ResourceStore::reattach`] restores
/// the original enumeration order.
pub struct Detached<T> {
    seq: u64,
    pub item: T,
}

impl<T> Detached<T> {
    /// Insertion sequence number the item had in its store.
    pub fn seq(&self) -> u64 {
        self.seq
    }
}

/// Id- and tag-indexed container.
pub struct ResourceStore<T> {
    items: FxHashMap<String, Slot<T>>,
    tags: FxHashMap<String, FxHashSet<String>>,
    next_seq: u64,
}

impl<T> Default for ResourceStore<T> {
    fn default() -> Self {
        Self {
            items: FxHashMap::default(),
            tags: FxHashMap::default(),
            next_seq: 0,
        }
    }
}

impl<T: Identifiable> ResourceStore<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert an item, replacing any item that has the same id.
    ///
    /// A replaced item keeps its enumeration position. Returns the previous
    /// item, if any.
    pub fn upsert(&mut self, item: T) -> Option<T> {
        let id = item.id().to_string();
        let tag = item.tag().to_string();

        let previous = match self.items.get_mut(&id) {
            Some(slot) => {
                let old = std::mem::replace(&mut slot.item, item);
                self.unindex_tag(old.tag(), &id);
                Some(old)
            }
            None => {
                let seq = self.next_seq;
                self.next_seq += 1;
                self.items.insert(id.clone(), Slot { seq, item });
                None
            }
        };
        self.tags.entry(tag).or_default().insert(id);
        previous
    }

    pub fn get(&self, id: &str) -> Option<&T> {
        self.items.get(id).map(|slot| &slot.item)
    }

    pub fn get_mut(&mut self, id: &str) -> Option<&mut T> {
        self.items.get_mut(id).map(|slot| &mut slot.item)
    }

    /// Move an item to a new tag. Returns false when `id` is not present.
    pub fn retag(&mut self, id: &str, tag: impl Into<String>) -> bool {
        let tag = tag.into();
        let Some(slot) = self.items.get_mut(id) else {
            return false;
        };
        let old = slot.item.tag().to_string();
        slot.item.set_tag(tag.clone(), RetagToken(()));
        self.unindex_tag(&old, id);
        self.tags.entry(tag).or_default().insert(id.to_string());
        true
    }

    pub fn contains(&self, id: &str) -> bool {
        self.items.contains_key(id)
    }

    pub fn contains_tag(&self, tag: &str) -> bool {
        self.tags.contains_key(tag)
    }

    /// Remove an item by id, also dropping it from the tag index.
    pub fn remove(&mut self, id: &str) -> Option<T> {
        let slot = self.items.remove(id)?;
        self.unindex_tag(slot.item.tag(), id);
        Some(slot.item)
    }

    /// Remove every item matching `predicate`. Returns how many were removed.
    pub fn remove_where(&mut self, mut predicate: impl FnMut(&T) -> bool) -> usize {
        let ids: Vec<String> = self
            .items
            .iter()
            .filter(|(_, slot)| predicate(&slot.item))
            .map(|(id, _)| id.clone())
            .collect();
        for id in &ids {
            self.remove(id);
        }
        ids.len()
    }

    /// Remove every item carrying `tag`. Returns how many were removed.
    pub fn remove_tag(&mut self, tag: &str) -> usize {
        let Some(ids) = self.tags.get(tag) else {
            return 0;
        };
        let ids: Vec<String> = ids.iter().cloned().collect();
        for id in &ids {
            self.remove(id);
        }
        ids.len()
    }

    /// All items in insertion order.
    pub fn all(&self) -> Vec<&T> {
        let mut slots: Vec<&Slot<T>> = self.items.values().collect();
        slots.sort_by_key(|slot| slot.seq);
        slots.into_iter().map(|slot| &slot.item).collect()
    }

    /// Items carrying `tag`, in insertion order.
    pub fn by_tag(&self, tag: &str) -> Vec<&T> {
        let Some(ids) = self.tags.get(tag) else {
            return Vec::new();
        };
        let mut slots: Vec<&Slot<T>> = ids.iter().filter_map(|id| self.items.get(id)).collect();
        slots.sort_by_key(|slot| slot.seq);
        slots.into_iter().map(|slot| &slot.item).collect()
    }

    /// Unordered iteration.
    pub fn iter(&self) -> impl Iterator<Item = &T> {
        self.items.values().map(|slot| &slot.item)
    }

    /// Unordered mutable iteration.
    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut T> {
        self.items.values_mut().map(|slot| &mut slot.item)
    }

    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.items.keys().map(String::as_str)
    }

    pub fn tags(&self) -> impl Iterator<Item = &str> {
        self.tags.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn tag_count(&self) -> usize {
        self.tags.len()
    }

    pub fn clear(&mut self) {
        self.items.clear();
        self.tags.clear();
    }

    /// Take every item out of the store, in insertion order.
    ///
    /// The store is left empty; hand the items back with [`Self::reattach`].
    pub fn detach_all(&mut self) -> Vec<Detached<T>> {
        self.tags.clear();
        let mut detached: Vec<Detached<T>> = self
            .items
            .drain()
            .map(|(_, slot)| Detached {
                seq: slot.seq,
                item: slot.item,
            })
            .collect();
        detached.sort_by_key(|d| d.seq);
        detached
    }

    /// Put a detached item back at its original enumeration position.
    pub fn reattach(&mut self, detached: Detached<T>) {
        let id = detached.item.id().to_string();
        let tag = detached.item.tag().to_string();
        if let Some(old) = self.items.insert(
            id.clone(),
            Slot {
                seq: detached.seq,
                item: detached.item,
            },
        ) {
            self.unindex_tag(old.item.tag(), &id);
        }
        self.tags.entry(tag).or_default().insert(id);
    }

    fn unindex_tag(&mut self, tag: &str, id: &str) {
        if let Some(ids) = self.tags.get_mut(tag) {
            ids.remove(id);
            if ids.is_empty() {
                self.tags.remove(tag);
            }
        }
    }
}
