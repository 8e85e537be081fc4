use std::any::TypeId;

use crate::{
    all_tuples,
    ecs::component::{Component, Error, Id, Identify, Metadata, TypedId},
};

/// A fixed list of component types, known when the program is built.
///
/// Implemented for `()` and for tuples of up to 26 [`Component`]s. The position of a component
/// in the tuple is its static id in an [`Identifier`](super::Identifier) built over the set, and
/// its slot in an [`IdCache`](super::IdCache) resolved for the set.
pub trait ComponentSet: 'static {
    /// The number of components in the set.
    const LEN: usize;

    /// A tuple holding one [`TypedId`] per component of the set.
    type TypedIds;

    /// Get the position of `Wanted` in the set, or `None` if it isn't a member.
    ///
    /// Only type ids are compared, so each instantiation folds to a constant.
    fn position<Wanted: Component>() -> Option<usize>;

    /// Describe every member, numbered by position.
    fn metadata() -> Vec<Metadata>;

    /// Resolve every member through `identify`, in declaration order.
    fn resolve<I: Identify + ?Sized>(identify: &I) -> Result<Vec<Id>, Error>;

    /// Drop the type tags of a tuple of typed ids, in declaration order.
    fn untyped(ids: Self::TypedIds) -> Vec<Id>;
}

impl ComponentSet for () {
    const LEN: usize = 0;

    type TypedIds = ();

    #[inline]
    fn position<Wanted: Component>() -> Option<usize> {
        None
    }

    #[inline]
    fn metadata() -> Vec<Metadata> {
        Vec::new()
    }

    #[inline]
    fn resolve<I: Identify + ?Sized>(_identify: &I) -> Result<Vec<Id>, Error> {
        Ok(Vec::new())
    }

    #[inline]
    fn untyped(_ids: ()) -> Vec<Id> {
        Vec::new()
    }
}

/// Implement ComponentSet for tuples of component types.
macro_rules! tuple_component_set {
    ($($name: ident),*) => {
        impl<$($name: Component),*> ComponentSet for ($($name,)*) {
            const LEN: usize = $crate::count_idents!($($name),*);

            type TypedIds = ($(TypedId<$name>,)*);

            #[inline]
            fn position<Wanted: Component>() -> Option<usize> {
                let wanted = TypeId::of::<Wanted>();
                [$(TypeId::of::<$name>()),*].iter().position(|member| *member == wanted)
            }

            fn metadata() -> Vec<Metadata> {
                let mut metadata = Vec::with_capacity(Self::LEN);
                $(metadata.push(Metadata::of::<$name>(Id::from(metadata.len())));)*
                metadata
            }

            fn resolve<Ident: Identify + ?Sized>(identify: &Ident) -> Result<Vec<Id>, Error> {
                Ok(vec![$(identify.component_id::<$name>()?.untyped()),*])
            }

            #[allow(non_snake_case)]
            fn untyped(ids: Self::TypedIds) -> Vec<Id> {
                let ($($name,)*) = ids;
                vec![$($name.untyped()),*]
            }
        }
    }
}

// Implement the tuple ComponentSet for all tuples up to 26 elements.
all_tuples!(tuple_component_set);
