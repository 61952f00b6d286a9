//! Keyed Arena for Index Groups
//!
//! The index view accumulates books into groups (one per saga, one per
//! author). Groups live contiguously in a `Vec` and are addressed by a
//! dense [`GroupId`]; a hash map from the group's key to its id makes
//! lookups during the building pass O(1).
//!
//! ## Memory Layout
//!
//! ```text
//! keys:   "el señor de los anillos" -> 0, "dune" -> 1, ...
//!                                      |          |
//! groups: [group 0][group 1][group 2]...
//! ```
//!
//! Groups are stored in first-insertion order, so iterating the arena
//! yields them in the order their keys were first seen. That order is the
//! only one callers may rely on; section ordering is applied afterwards
//! with an explicit stable sort.

use rustc_hash::FxHashMap;

/// Dense group handle - 4 bytes.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct GroupId(u32);

impl GroupId {
    /// Returns the position of the group in the arena.
    #[inline(always)]
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

/// Arena of groups keyed by string.
#[derive(Debug)]
pub struct GroupArena<G> {
    /// Contiguous group storage
    groups: Vec<G>,
    /// Key to position
    keys: FxHashMap<String, GroupId>,
}

impl<G> Default for GroupArena<G> {
    fn default() -> Self {
        Self::new()
    }
}

impl<G> GroupArena<G> {
    /// Creates a new empty arena.
    pub fn new() -> Self {
        Self {
            groups: Vec::new(),
            keys: FxHashMap::default(),
        }
    }

    /// Creates a new arena with room for `cap` groups.
    pub fn with_capacity(cap: usize) -> Self {
        Self {
            groups: Vec::with_capacity(cap),
            keys: FxHashMap::with_capacity_and_hasher(cap, Default::default()),
        }
    }

    /// Returns the number of groups stored.
    #[inline(always)]
    pub fn len(&self) -> usize {
        self.groups.len()
    }

    /// Returns true if no groups are stored.
    #[inline(always)]
    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    /// Clears all groups (keeps capacity).
    pub fn clear(&mut self) {
        self.groups.clear();
        self.keys.clear();
    }

    /// Returns the id stored under `key`, if any.
    #[inline]
    pub fn find(&self, key: &str) -> Option<GroupId> {
        self.keys.get(key).copied()
    }

    /// Returns the group under `key`, creating it with `init` on first use.
    ///
    /// `init` only runs when the key is new.
    pub fn get_or_insert_with(&mut self, key: &str, init: impl FnOnce() -> G) -> &mut G {
        let id = match self.keys.get(key) {
            Some(&id) => id,
            None => {
                let id = GroupId(self.groups.len() as u32);
                self.groups.push(init());
                self.keys.insert(key.to_owned(), id);
                id
            }
        };
        &mut self.groups[id.index()]
    }

    /// Gets a group by id.
    #[inline(always)]
    pub fn get(&self, id: GroupId) -> Option<&G> {
        self.groups.get(id.index())
    }

    /// Iterates groups in first-insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &G> + '_ {
        self.groups.iter()
    }

    /// Consumes the arena, returning groups in first-insertion order.
    pub fn into_groups(self) -> Vec<G> {
        self.groups
    }
}
