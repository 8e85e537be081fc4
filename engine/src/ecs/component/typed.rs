use std::{any, cmp, fmt, hash, marker::PhantomData};

use crate::ecs::component::{Component, Id};

/// A component [`Id`] tagged with the component type it identifies.
///
/// Typed ids are handed out by an [`Identifier`](super::Identifier) or an
/// [`IdCache`](super::IdCache) and can't be conjured for an arbitrary type, so holding a
/// `TypedId<C>` means some identifier resolved `C` to this id. They compare, order and hash by the
/// underlying id.
pub struct TypedId<C: Component> {
    id: Id,
    _component: PhantomData<fn() -> C>,
}

impl<C: Component> TypedId<C> {
    #[inline]
    pub(crate) const fn new(id: Id) -> Self {
        Self {
            id,
            _component: PhantomData,
        }
    }

    /// Drop the type tag.
    #[inline]
    pub fn untyped(&self) -> Id {
        self.id
    }

    /// Get the index of this component if it were to live in indexable storage (e.g. Vec)
    #[inline]
    pub fn index(&self) -> usize {
        self.id.index()
    }
}

impl<C: Component> From<TypedId<C>> for Id {
    #[inline]
    fn from(value: TypedId<C>) -> Self {
        value.id
    }
}

// Manual impls: derives would require `C` itself to implement each trait.

impl<C: Component> Clone for TypedId<C> {
    #[inline]
    fn clone(&self) -> Self {
        *self
    }
}

impl<C: Component> Copy for TypedId<C> {}

impl<C: Component> PartialEq for TypedId<C> {
    #[inline]
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl<C: Component> Eq for TypedId<C> {}

impl<C: Component> PartialOrd for TypedId<C> {
    #[inline]
    fn partial_cmp(&self, other: &Self) -> Option<cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl<C: Component> Ord for TypedId<C> {
    #[inline]
    fn cmp(&self, other: &Self) -> cmp::Ordering {
        self.id.cmp(&other.id)
    }
}

impl<C: Component> hash::Hash for TypedId<C> {
    #[inline]
    fn hash<H: hash::Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl<C: Component> fmt::Debug for TypedId<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = C::NAME.unwrap_or_else(any::type_name::<C>);
        write!(f, "TypedId<{name}>({})", self.id.index())
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;

    #[derive(Component)]
    struct Marker;

    #[test]
    fn compares_by_value() {
        // Given
        let a = TypedId::<Marker>::new(Id::new(2));
        let b = TypedId::<Marker>::new(Id::new(2));
        let c = TypedId::<Marker>::new(Id::new(5));

        // Then
        assert_eq!(a, b);
        assert!(a < c);
        assert_eq!(a.untyped(), Id::new(2));
        assert_eq!(Id::from(c).index(), 5);
        assert_eq!(HashSet::from([a, b, c]).len(), 2);
    }

    #[test]
    fn debug_names_the_component() {
        let id = TypedId::<Marker>::new(Id::new(7));
        assert_eq!(format!("{id:?}"), "TypedId<Marker>(7)");
    }
}
