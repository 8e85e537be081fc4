use std::{any, fmt, marker::PhantomData};

use fixedbitset::FixedBitSet;

use crate::ecs::component::{Component, ComponentSet, Error, Id, Identify, Spec, TypedId};

/// The ids of a fixed set of components, resolved once.
///
/// An `IdCache<S>` looks every member of `S` up in an identifier at construction, then answers
/// [`component_id`](IdCache::component_id) for members from its own storage. It never registers
/// anything and never touches the identifier again.
///
/// A cache built with [`sorted`](IdCache::sorted) also presents its id set in ascending order,
/// giving a canonical order for comparing or hashing sets of components.
pub struct IdCache<S: ComponentSet> {
    /// Ids in declaration order of `S`.
    ids: Box<[Id]>,

    /// Ascending view of `ids`, kept only by sorted caches.
    sorted: Option<Box<[Id]>>,

    _set: PhantomData<fn() -> S>,
}

impl<S: ComponentSet> IdCache<S> {
    /// Resolve every member of `S` through `identify`.
    ///
    /// Fails with the first member that doesn't resolve.
    pub fn new<I: Identify + ?Sized>(identify: &I) -> Result<Self, Error> {
        Ok(Self::from_ids(S::resolve(identify)?, false))
    }

    /// Resolve every member of `S` through `identify`, presenting the ids in ascending order.
    pub fn sorted<I: Identify + ?Sized>(identify: &I) -> Result<Self, Error> {
        Ok(Self::from_ids(S::resolve(identify)?, true))
    }

    /// Build a cache from already resolved typed ids.
    pub fn from_typed(ids: S::TypedIds) -> Self {
        Self::from_ids(S::untyped(ids), false)
    }

    fn from_ids(ids: Vec<Id>, sorted: bool) -> Self {
        let sorted = sorted.then(|| {
            let mut ascending = ids.clone();
            ascending.sort_unstable();
            ascending.into_boxed_slice()
        });
        Self {
            ids: ids.into_boxed_slice(),
            sorted,
            _set: PhantomData,
        }
    }

    /// Get the cached id of `C`.
    ///
    /// # Panics
    /// Panics if `C` is not a member of `S`.
    #[inline]
    #[track_caller]
    pub fn component_id<C: Component>(&self) -> TypedId<C> {
        match S::position::<C>() {
            Some(position) => TypedId::new(self.ids[position]),
            None => panic!(
                "component '{}' is not part of this id cache",
                C::NAME.unwrap_or_else(any::type_name::<C>)
            ),
        }
    }

    /// Check whether `C` is a member of `S`. Decided by type alone.
    #[inline]
    pub fn contains_component<C: Component>() -> bool {
        S::position::<C>().is_some()
    }

    /// Get the cached ids, ascending for a sorted cache and in declaration order otherwise.
    #[inline]
    pub fn ids(&self) -> &[Id] {
        self.sorted.as_deref().unwrap_or(&*self.ids)
    }

    /// Check whether this cache presents its ids in ascending order.
    #[inline]
    pub fn is_sorted(&self) -> bool {
        self.sorted.is_some()
    }

    /// Get the cached ids as a [`Spec`].
    #[inline]
    pub fn spec(&self) -> Spec {
        Spec::new(self.ids.to_vec())
    }

    /// Get the cached ids as a bit set indexed by id.
    pub fn to_bitset(&self) -> FixedBitSet {
        let len = self.ids.iter().map(|id| id.index() + 1).max().unwrap_or(0);
        let mut bits = FixedBitSet::with_capacity(len);
        for id in self.ids.iter() {
            bits.insert(id.index());
        }
        bits
    }

    /// Get the number of cached ids.
    #[inline]
    pub fn len(&self) -> usize {
        self.ids.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }
}

impl<S: ComponentSet> Identify for IdCache<S> {
    #[inline]
    fn component_id<C: Component>(&self) -> Result<TypedId<C>, Error> {
        S::position::<C>()
            .map(|position| TypedId::new(self.ids[position]))
            .ok_or(Error::Unregistered { name: C::NAME })
    }

    #[inline]
    fn contains_component<C: Component>(&self) -> bool {
        Self::contains_component::<C>()
    }
}

impl<S: ComponentSet> Clone for IdCache<S> {
    fn clone(&self) -> Self {
        Self {
            ids: self.ids.clone(),
            sorted: self.sorted.clone(),
            _set: PhantomData,
        }
    }
}

impl<S: ComponentSet> fmt::Debug for IdCache<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("IdCache")
            .field("ids", &self.ids())
            .field("sorted", &self.is_sorted())
            .finish()
    }
}
