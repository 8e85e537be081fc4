use std::{
    alloc::Layout,
    any::{self, TypeId},
};

use crate::ecs::component::{Component, Id};

/// What an identifier records about each component it numbers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Metadata {
    id: Id,
    name: Option<&'static str>,
    type_name: &'static str,
    type_id: TypeId,
    layout: Layout,
}

impl Metadata {
    /// Describe component `C` as numbered `id`.
    #[inline]
    pub fn of<C: Component>(id: Id) -> Self {
        Self {
            id,
            name: C::NAME,
            type_name: any::type_name::<C>(),
            type_id: TypeId::of::<C>(),
            layout: Layout::new::<C>(),
        }
    }

    /// The component's id in the identifier that recorded it.
    #[inline]
    pub fn id(&self) -> Id {
        self.id
    }

    /// The component's diagnostic name, if it has one.
    #[inline]
    pub fn name(&self) -> Option<&'static str> {
        self.name
    }

    #[inline]
    pub fn type_name(&self) -> &'static str {
        self.type_name
    }

    #[inline]
    pub fn type_id(&self) -> TypeId {
        self.type_id
    }

    #[inline]
    pub fn layout(&self) -> Layout {
        self.layout
    }
}
