//! Entity handles and their allocation.
//!
//! This module provides the entity handle type and the [`Manager`] that allocates and recycles
//! them. Entities are lightweight handles; their components live in external storage keyed by
//! the entity.
//!
//! # Architecture
//!
//! - **[`Entity`]**: A handle combining an [`Id`] and a [`Generation`]. The id identifies the
//!   slot, while the generation tracks how many times that slot has been freed. Id `0` is
//!   reserved as [`Id::NULL`] and is never issued.
//!
//! - **[`Manager`]**: Issues entity handles and recycles freed ids in FIFO order. It owns the
//!   current generation for every id ever issued.
//!
//! # Generation Tracking
//!
//! When an entity is destroyed its generation is incremented before the id is queued for reuse.
//! Any outstanding handle still carries the old generation and is rejected by
//! [`Manager::is_valid`]:
//!
//! ```rust
//! use rusty_ecs::ecs::entity::Manager;
//!
//! let mut entities = Manager::new();
//! let entity = entities.create();
//! entities.destroy(entity);
//! let reused = entities.create();
//!
//! assert_eq!(entity.id(), reused.id());
//! assert!(!entities.is_valid(entity));
//! assert!(entities.is_valid(reused));
//! ```
//!
//! # Generation Wraparound
//!
//! Generations are `u32` and wrap on overflow. After 2^32 destroy/create cycles of a single id a
//! very old handle would be considered valid again. This is an accepted limitation.

use std::collections::VecDeque;

use log::trace;

/// The generation of an entity, used to track whether an entity is the active entity for its id.
/// The generation starts at `FIRST` and is incremented each time the entity's id is freed.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Generation(u32);

impl Generation {
    /// The first generation of an entity.
    pub const FIRST: Self = Self(0);

    /// Get the next generation from the current. Wraps at `u32::MAX`.
    #[inline]
    pub fn next(&self) -> Self {
        Self(self.0.wrapping_add(1))
    }

    /// Get the raw generation value.
    #[inline]
    pub fn value(&self) -> u32 {
        self.0
    }
}

impl From<u32> for Generation {
    #[inline]
    fn from(value: u32) -> Self {
        Self(value)
    }
}

/// An entity identifier. Issued ids start at 1; `0` is reserved for [`Id::NULL`].
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Id(u32);

impl Id {
    /// The reserved id representing "no entity".
    pub const NULL: Self = Self(0);

    /// Construct an id from a raw value.
    #[inline]
    pub const fn new(id: u32) -> Self {
        Self(id)
    }

    /// Get the raw id value.
    #[inline]
    pub fn value(&self) -> u32 {
        self.0
    }

    /// Check whether this is the reserved null id.
    #[inline]
    pub fn is_null(&self) -> bool {
        self.0 == 0
    }

    /// Get the id's position in a generation table (id 1 is slot 0).
    #[inline]
    fn slot(&self) -> usize {
        debug_assert!(!self.is_null(), "the null entity id has no slot");
        self.0 as usize - 1
    }
}

impl From<u32> for Id {
    /// Get an id from a raw value.
    fn from(value: u32) -> Self {
        Self(value)
    }
}

/// A handle to an entity: an [`Id`] plus the [`Generation`] it was issued under.
///
/// A manager holds at most one live entity per id; the generation tells whether this handle is
/// that entity. Handles order by id first, then generation.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Entity {
    id: Id,
    generation: Generation,
}

impl Entity {
    /// The "no entity" handle.
    pub const NULL: Self = Self::new_with_generation(Id::NULL, Generation::FIRST);

    /// A handle for `id` in its first generation.
    #[inline]
    pub fn new(id: impl Into<Id>) -> Self {
        Self::new_with_generation(id.into(), Generation::FIRST)
    }

    #[inline]
    pub const fn new_with_generation(id: Id, generation: Generation) -> Self {
        Self { id, generation }
    }

    #[inline]
    pub fn id(&self) -> Id {
        self.id
    }

    #[inline]
    pub fn generation(&self) -> Generation {
        self.generation
    }

    /// Position of this handle in id-indexed storage. Equal for every generation of an id.
    #[inline]
    pub fn index(&self) -> usize {
        self.id.0 as usize
    }

    /// Check whether this is the null entity.
    #[inline]
    pub fn is_null(&self) -> bool {
        self.id.is_null()
    }

    /// The handle the same id gets once this one is destroyed.
    #[inline]
    pub fn genned(&self) -> Self {
        Self {
            generation: self.generation.next(),
            ..*self
        }
    }
}

/// Allocates entity handles and recycles freed ids.
///
/// Every id ever issued has exactly one entry in `generations`. An id is in `free` iff it is not
/// currently allocated, so the live count is the number of generations minus the free queue.
///
/// # Design Note
///
/// This manager requires `&mut self` for all mutation and performs no internal locking. Callers
/// sharing it across threads must synchronize externally.
#[derive(Debug, Default)]
pub struct Manager {
    /// Current generation per id. Slot 0 holds id 1.
    generations: Vec<Generation>,

    /// Freed ids awaiting reuse, oldest first.
    free: VecDeque<Id>,
}

impl Manager {
    /// Construct a new, empty entity manager.
    #[inline]
    pub const fn new() -> Self {
        Self {
            generations: Vec::new(),
            free: VecDeque::new(),
        }
    }

    /// Construct a manager with room for `capacity` ids before reallocating.
    #[inline]
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            generations: Vec::with_capacity(capacity),
            free: VecDeque::new(),
        }
    }

    /// Create a new entity, reusing the oldest freed id if there is one.
    pub fn create(&mut self) -> Entity {
        // Try to reuse from the free queue first
        if let Some(id) = self.free.pop_front() {
            let entity = Entity::new_with_generation(id, self.generations[id.slot()]);
            trace!("reusing entity {entity:?}");
            return entity;
        }

        // Allocate a fresh id
        let id = Self::fresh_id(self.generations.len(), 1);
        self.generations.push(Generation::FIRST);
        trace!("allocated entity id {}", id.0);
        Entity::new(id)
    }

    /// Create many entities at once.
    ///
    /// Reuses freed ids first, then allocates new ids as needed.
    pub fn create_many(&mut self, count: usize) -> Vec<Entity> {
        let mut created = Vec::with_capacity(count);
        // Allocate as many as we can from the free queue.
        while created.len() < count
            && let Some(id) = self.free.pop_front()
        {
            created.push(Entity::new_with_generation(id, self.generations[id.slot()]));
        }

        // Allocate remaining as new sequential ids
        let remaining = count - created.len();
        if remaining > 0 {
            let Id(start) = Self::fresh_id(self.generations.len(), remaining);
            self.generations
                .resize(self.generations.len() + remaining, Generation::FIRST);
            created.extend((0..remaining as u32).map(|offset| Entity::new(Id(start + offset))));
        }

        created
    }

    /// The first of `count` new ids after `issued` ids.
    ///
    /// # Panics
    /// Panics if the last of them would not fit in a `u32`.
    fn fresh_id(issued: usize, count: usize) -> Id {
        match issued
            .checked_add(count)
            .and_then(|last| u32::try_from(last).ok())
        {
            Some(_) => Id(issued as u32 + 1),
            None => panic!("entity ids exhausted: cannot issue {count} more after {issued}"),
        }
    }

    /// Destroy an entity, invalidating every outstanding handle to it and queueing its id for
    /// reuse.
    ///
    /// # Panics
    ///
    /// Panics if `entity` is null, was never issued by this manager, or is stale. Destroying an
    /// invalid handle is a caller bug.
    pub fn destroy(&mut self, entity: Entity) {
        assert!(
            self.is_valid(entity),
            "cannot destroy {entity:?}: handle is not a live entity of this manager"
        );

        let generation = &mut self.generations[entity.id.slot()];
        *generation = generation.next();
        self.free.push_back(entity.id);
        trace!("destroyed entity {entity:?}");
    }

    /// Check whether `entity` is the live entity for its id.
    #[inline]
    pub fn is_valid(&self, entity: Entity) -> bool {
        self.current_generation(entity.id) == Some(entity.generation)
    }

    /// Get the current generation for `id`, or `None` if the id was never issued.
    #[inline]
    pub fn current_generation(&self, id: Id) -> Option<Generation> {
        if id.is_null() {
            return None;
        }
        self.generations.get(id.slot()).copied()
    }

    /// Get the number of live entities.
    #[inline]
    pub fn size(&self) -> usize {
        self.generations.len() - self.free.len()
    }

    /// Check whether there are no live entities.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.size() == 0
    }

    /// Get the number of ids the manager can track without reallocating.
    #[inline]
    pub fn capacity(&self) -> usize {
        self.generations.capacity()
    }
}

#[test]
fn manager_issues_distinct_handles() {
    // Given
    let mut manager = Manager::default();

    // When
    let issued: std::collections::HashSet<Entity> = (0..200).map(|_| manager.create()).collect();

    // Then
    assert_eq!(issued.len(), 200);
    assert_eq!(manager.size(), 200);
}

#[test]
fn manager_ids_start_at_one() {
    // Given
    let mut manager = Manager::new();

    // When
    let first = manager.create();
    let second = manager.create();

    // Then
    assert_eq!((first.id(), second.id()), (Id(1), Id(2)));
    assert_eq!(first.generation(), Generation::FIRST);
    assert!(!first.is_null());
}

#[test]
fn manager_live_until_destroyed() {
    // Given
    let mut manager = Manager::new();
    let entities = manager.create_many(10);
    assert!(entities.iter().all(|e| manager.is_valid(*e)));

    // When
    manager.destroy(entities[3]);

    // Then - only the destroyed handle is invalid
    let valid: Vec<bool> = entities.iter().map(|e| manager.is_valid(*e)).collect();
    assert_eq!(valid.iter().filter(|v| !**v).count(), 1);
    assert!(!valid[3]);
    assert_eq!(manager.size(), 9);
}

#[test]
fn manager_recycles_every_freed_id() {
    // Given
    let mut manager = Manager::default();
    let originals = manager.create_many(10);
    originals.iter().for_each(|e| manager.destroy(*e));

    // When
    let recycled = manager.create_many(10);

    // Then - same ids in the same order, one generation later
    let expected: Vec<Entity> = originals.iter().map(Entity::genned).collect();
    assert_eq!(recycled, expected);
}

#[test]
fn manager_reuse_is_fifo() {
    // Given
    let mut manager = Manager::new();
    let entities = manager.create_many(3);

    // When
    manager.destroy(entities[2]);
    manager.destroy(entities[0]);

    // Then - the oldest freed id comes back first
    assert_eq!(manager.create().id(), entities[2].id());
    assert_eq!(manager.create().id(), entities[0].id());
}

#[test]
fn manager_reuses_before_growing() {
    // Given
    let mut manager = Manager::new();
    let [a, b] = [manager.create(), manager.create()];

    // When
    manager.destroy(a);

    // Then
    assert_eq!(manager.current_generation(a.id()), Some(Generation(1)));
    assert_eq!(manager.size(), 1);

    // When - the free queue holds one id
    let recycled = manager.create();
    let fresh = manager.create();

    // Then
    assert_eq!(recycled, a.genned());
    assert!(manager.is_valid(b));
    assert_eq!(fresh, Entity::new(3u32));
}

#[test]
fn manager_generation_counts_destroys() {
    // Given
    let mut manager = Manager::default();
    let mut handle = manager.create();

    for expected in 1..=3 {
        // When
        manager.destroy(handle);
        handle = manager.create();

        // Then
        assert_eq!(handle.id(), Id(1));
        assert_eq!(handle.generation().value(), expected);
    }
}

#[test]
fn manager_create_many_drains_queue_then_grows() {
    // Given
    let mut manager = Manager::default();
    for e in manager.create_many(3) {
        manager.destroy(e);
    }
    assert!(manager.is_empty());

    // When - ask for more than the free queue holds
    let entities = manager.create_many(5);

    // Then - ids 1..=3 come back in generation 1, ids 4 and 5 are new
    let summary: Vec<(u32, u32)> = entities
        .iter()
        .map(|e| (e.id().value(), e.generation().value()))
        .collect();
    assert_eq!(summary, vec![(1, 1), (2, 1), (3, 1), (4, 0), (5, 0)]);
    assert_eq!(manager.size(), 5);
}

#[test]
fn manager_rejects_null_and_unknown() {
    // Given
    let mut manager = Manager::new();
    manager.create();

    // Then
    assert!(!manager.is_valid(Entity::NULL));
    assert!(!manager.is_valid(Entity::new(Id(42))));
    assert_eq!(manager.current_generation(Id::NULL), None);
}

#[test]
#[should_panic(expected = "handle is not a live entity of this manager")]
fn manager_destroy_stale_panics() {
    // Given
    let mut manager = Manager::new();
    let entity = manager.create();
    manager.destroy(entity);

    // When - destroy the stale handle again
    manager.destroy(entity);
}

#[test]
fn manager_capacity() {
    let manager = Manager::with_capacity(64);
    assert!(manager.capacity() >= 64);
    assert!(manager.is_empty());
}

#[test]
fn entity_order_and_equality() {
    // Given
    let low = Entity::new(7u32);
    let high = Entity::new(8u32);
    let low_next = low.genned();

    // Then - id decides first, generation breaks ties
    let mut sorted = vec![high, low_next, low];
    sorted.sort();
    assert_eq!(sorted, vec![low, low_next, high]);

    assert_eq!(low, Entity::new(Id(7)));
    assert_ne!(low, low_next);
    assert_eq!(low.index(), low_next.index());
}

#[test]
fn fresh_ids_follow_issued_count() {
    assert_eq!(Manager::fresh_id(0, 1), Id(1));
    assert_eq!(Manager::fresh_id(9, 3), Id(10));
    assert_eq!(Manager::fresh_id(u32::MAX as usize - 1, 1), Id(u32::MAX));
}

#[test]
#[should_panic(expected = "entity ids exhausted")]
fn fresh_id_past_u32_panics() {
    Manager::fresh_id(u32::MAX as usize, 1);
}

#[test]
fn generation_wraps() {
    assert_eq!(Generation(u32::MAX).next(), Generation::FIRST);
    assert_eq!(Generation::FIRST.next().value(), 1);
}
