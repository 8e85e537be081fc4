use std::{
    any::{self, TypeId},
    mem,
};

use log::trace;

use crate::ecs::{
    component::{self, Component, TypedId},
    entity::Entity,
    storage::{Erased, SparseStorage},
};

/// Type-erased per-component storage: one [`Erased`] value for each entity holding the component.
///
/// A `ComponentStorage` is bound to a single component id at construction and remembers the
/// component's concrete type, so a collection of storages for different components can share one
/// type. Typed accessors check the requested type against the bound one and panic on mismatch.
///
/// Lookups compare the full entity handle, so a handle from a destroyed generation never sees the
/// value of whoever reuses its id.
#[derive(Debug)]
pub struct ComponentStorage {
    id: component::Id,
    type_id: TypeId,
    type_name: &'static str,
    values: SparseStorage<Entity, Erased>,
}

impl ComponentStorage {
    /// Create an empty storage for the component identified by `id`.
    pub fn new<C: Component>(id: TypedId<C>) -> Self {
        Self {
            id: id.untyped(),
            type_id: TypeId::of::<C>(),
            type_name: any::type_name::<C>(),
            values: SparseStorage::new(),
        }
    }

    /// Get the id of the component this storage holds.
    #[inline]
    pub fn id(&self) -> component::Id {
        self.id
    }

    /// Get the type name of the component this storage holds.
    #[inline]
    pub fn type_name(&self) -> &'static str {
        self.type_name
    }

    /// Store `value` for `entity`, returning the value it replaces.
    ///
    /// A value stored for an older generation of the same entity id is replaced (and dropped)
    /// rather than returned.
    pub fn insert<C: Component>(&mut self, entity: Entity, value: C) -> Option<C> {
        self.check::<C>();
        trace!("storing {} for {entity:?} in component {:?}", self.type_name, self.id);
        match self.values.get_mut(entity) {
            Some(stored) => mem::replace(stored, Erased::new(value)).take_as::<C>(),
            None => {
                self.values.push_back(entity, Erased::new(value));
                None
            }
        }
    }

    /// Get the component value of `entity`.
    #[inline]
    pub fn get<C: Component>(&self, entity: Entity) -> Option<&C> {
        self.check::<C>();
        self.values.get(entity).map(Erased::get::<C>)
    }

    /// Get the component value of `entity` mutably.
    #[inline]
    pub fn get_mut<C: Component>(&mut self, entity: Entity) -> Option<&mut C> {
        self.check::<C>();
        self.values.get_mut(entity).map(Erased::get_mut::<C>)
    }

    /// Check whether `entity` holds a value in this storage.
    #[inline]
    pub fn contains(&self, entity: Entity) -> bool {
        self.values.has_value(entity)
    }

    /// Remove and return the component value of `entity`, keeping the order of the others.
    pub fn remove<C: Component>(&mut self, entity: Entity) -> Option<C> {
        self.check::<C>();
        self.values.erase(entity).and_then(|mut value| value.take_as::<C>())
    }

    /// Remove and return the component value of `entity`, moving the last value into its slot.
    pub fn swap_remove<C: Component>(&mut self, entity: Entity) -> Option<C> {
        self.check::<C>();
        self.values.swap_and_pop(entity).and_then(|mut value| value.take_as::<C>())
    }

    /// Destroy the component value of `entity` without naming its type.
    ///
    /// Returns whether a value was removed.
    pub fn erase(&mut self, entity: Entity) -> bool {
        self.values.swap_and_pop(entity).is_some()
    }

    /// Iterate `(entity, &value)` pairs in storage order.
    pub fn iter<C: Component>(&self) -> impl Iterator<Item = (Entity, &C)> {
        self.check::<C>();
        self.values.iter().map(|(entity, value)| (entity, value.get::<C>()))
    }

    /// Iterate `(entity, &mut value)` pairs in storage order.
    pub fn iter_mut<C: Component>(&mut self) -> impl Iterator<Item = (Entity, &mut C)> {
        self.check::<C>();
        self.values
            .iter_mut()
            .map(|(entity, value)| (entity, value.get_mut::<C>()))
    }

    /// Get the entities holding a value, in storage order.
    #[inline]
    pub fn entities(&self) -> &[Entity] {
        self.values.keys()
    }

    /// Get the number of stored values.
    #[inline]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Check whether no values are stored.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Destroy every stored value.
    pub fn clear(&mut self) {
        self.values.clear();
    }

    #[inline]
    #[track_caller]
    fn check<C: Component>(&self) {
        assert!(
            self.type_id == TypeId::of::<C>(),
            "storage for component '{}' cannot hold '{}'",
            self.type_name,
            any::type_name::<C>()
        );
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{
        Arc,
        atomic::{AtomicU32, Ordering},
    };

    use super::*;
    use crate::ecs::{component::Identifier, entity};

    #[derive(Debug, PartialEq)]
    struct Position(f32, f32);
    impl Component for Position {}

    #[derive(Debug, PartialEq)]
    struct Velocity(f32);
    impl Component for Velocity {}

    struct Droppy(Arc<AtomicU32>);
    impl Component for Droppy {}
    impl Drop for Droppy {
        fn drop(&mut self) {
            self.0.fetch_add(1, Ordering::Relaxed);
        }
    }

    fn position_storage() -> ComponentStorage {
        let mut identifier = Identifier::<()>::new();
        ComponentStorage::new(identifier.register::<Position>())
    }

    #[test]
    fn insert_and_get() {
        // Given
        let mut entities = entity::Manager::new();
        let mut storage = position_storage();
        let a = entities.create();
        let b = entities.create();

        // When
        storage.insert(a, Position(1.0, 2.0));
        storage.insert(b, Position(3.0, 4.0));

        // Then
        assert_eq!(storage.get::<Position>(a), Some(&Position(1.0, 2.0)));
        assert_eq!(storage.get::<Position>(b), Some(&Position(3.0, 4.0)));
        assert_eq!(storage.len(), 2);
        assert_eq!(storage.entities(), &[a, b]);
    }

    #[test]
    fn insert_replaces_and_returns_previous() {
        // Given
        let mut storage = position_storage();
        let entity = Entity::new(1u32);
        storage.insert(entity, Position(0.0, 0.0));

        // When
        let old = storage.insert(entity, Position(5.0, 5.0));

        // Then
        assert_eq!(old, Some(Position(0.0, 0.0)));
        assert_eq!(storage.get::<Position>(entity), Some(&Position(5.0, 5.0)));
        assert_eq!(storage.len(), 1);
    }

    #[test]
    fn stale_handle_misses_and_is_replaced() {
        // Given
        let mut entities = entity::Manager::new();
        let mut storage = position_storage();
        let old = entities.create();
        storage.insert(old, Position(1.0, 1.0));
        entities.destroy(old);
        let reused = entities.create();
        assert_eq!(reused.id(), old.id());

        // Then
        assert!(!storage.contains(reused));

        // When
        let replaced = storage.insert(reused, Position(2.0, 2.0));

        // Then
        assert_eq!(replaced, None);
        assert!(!storage.contains(old));
        assert_eq!(storage.get::<Position>(reused), Some(&Position(2.0, 2.0)));
    }

    #[test]
    fn remove_and_erase() {
        // Given
        let counter = Arc::new(AtomicU32::new(0));
        let mut identifier = Identifier::<()>::new();
        let mut storage = ComponentStorage::new(identifier.register::<Droppy>());
        let a = Entity::new(1u32);
        let b = Entity::new(2u32);
        storage.insert(a, Droppy(Arc::clone(&counter)));
        storage.insert(b, Droppy(Arc::clone(&counter)));

        // When
        let removed = storage.remove::<Droppy>(a);
        let erased = storage.erase(b);

        // Then
        assert!(removed.is_some());
        assert!(erased);
        assert_eq!(counter.load(Ordering::Relaxed), 1);
        drop(removed);
        assert_eq!(counter.load(Ordering::Relaxed), 2);
        assert!(storage.is_empty());
    }

    #[test]
    fn removal_policies_order() {
        // Given
        let mut storage = position_storage();
        let entities: Vec<_> = (1..=4u32).map(Entity::new).collect();
        for (i, entity) in entities.iter().enumerate() {
            storage.insert(*entity, Position(i as f32, 0.0));
        }

        // When
        storage.remove::<Position>(entities[0]);

        // Then
        assert_eq!(storage.entities(), &entities[1..]);

        // When
        let removed = storage.swap_remove::<Position>(entities[1]);

        // Then
        assert_eq!(removed, Some(Position(1.0, 0.0)));
        assert_eq!(storage.entities(), &[entities[3], entities[2]]);
    }

    #[test]
    fn iter_mut_updates_in_place() {
        // Given
        let mut storage = position_storage();
        for id in 1..=3u32 {
            storage.insert(Entity::new(id), Position(id as f32, 0.0));
        }

        // When
        for (_, position) in storage.iter_mut::<Position>() {
            position.1 = position.0 * 2.0;
        }

        // Then
        let ys: Vec<f32> = storage.iter::<Position>().map(|(_, p)| p.1).collect();
        assert_eq!(ys, vec![2.0, 4.0, 6.0]);
    }

    #[test]
    #[should_panic(expected = "cannot hold")]
    fn mismatched_type_panics() {
        let mut storage = position_storage();
        storage.insert(Entity::new(1u32), Velocity(1.0));
    }
}
