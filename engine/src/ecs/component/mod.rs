//! Component identification for the ECS.
//!
//! Components are the data attached to entities. Storage for each component type is addressed by
//! a compact, per-identifier [`Id`], so ids double as indices into `Vec`s of per-component
//! storages. This module assigns and resolves those ids.
//!
//! ## Architecture
//!
//! - [`Component`]: The trait all component types implement (usually derived)
//! - [`Id`] / [`TypedId`]: A component id, untyped or tagged with its component type
//! - [`Identifier`]: Resolves component types to ids, statically or after registration
//! - [`ComponentSet`]: A fixed list of component types, expressed as a tuple
//! - [`IdCache`]: The ids of a fixed list of component types, resolved once
//! - [`Metadata`]: What an identifier knows about each component it numbers
//! - [`Spec`]: A sorted set of component ids, usable as a hash key
//!
//! ## Static and Dynamic Ids
//!
//! An [`Identifier<S>`] is parameterised by a [`ComponentSet`] of components known when the
//! program is built. Those get ids `0..S::LEN` by position, resolved without touching any
//! runtime table. Any other component must be [registered](Identifier::register) first and is
//! numbered from `S::LEN` upwards, in registration order, without gaps.
//!
//! Registration maps the component's process-wide [`GlobalId`](crate::ecs::GlobalId) to its
//! local id, so independent identifiers in one process never disturb each other's numbering.
//!
//! ## Usage
//!
//! ```rust
//! use rusty_ecs::ecs::component::{Component, Identifier, IdCache};
//!
//! #[derive(Component)]
//! struct Position { x: f32, y: f32 }
//!
//! #[derive(Component)]
//! struct Velocity { dx: f32, dy: f32 }
//!
//! #[derive(Component)]
//! #[component(name = "script_tag")]
//! struct ScriptTag;
//!
//! let mut identifier = Identifier::<(Position, Velocity)>::new();
//! assert_eq!(identifier.component_id::<Velocity>().unwrap().index(), 1);
//!
//! assert!(identifier.component_id::<ScriptTag>().is_err());
//! let tag = identifier.register::<ScriptTag>();
//! assert_eq!(tag.index(), 2);
//!
//! let cache = IdCache::<(ScriptTag, Position)>::new(&identifier).unwrap();
//! assert_eq!(cache.component_id::<ScriptTag>(), tag);
//! ```

mod cache;
mod error;
mod identifier;
mod info;
mod set;
mod spec;
mod typed;

pub use cache::IdCache;
pub use error::Error;
pub use identifier::{Identifier, Identify};
pub use info::Metadata;
pub use set::ComponentSet;
pub use spec::Spec;
pub use typed::TypedId;

pub use rusty_ecs_macros::Component;

/// A component identifier, local to the [`Identifier`] that issued it.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Id(u32);

impl Id {
    /// Construct a new component Id from a raw u32 value.
    #[inline]
    pub const fn new(id: u32) -> Self {
        Self(id)
    }

    /// Get the index of this component if it were to live in indexable storage (e.g. Vec)
    #[inline]
    pub fn index(&self) -> usize {
        self.0 as usize
    }
}

impl From<u32> for Id {
    #[inline]
    fn from(value: u32) -> Self {
        Self::new(value)
    }
}

impl From<usize> for Id {
    #[inline]
    fn from(value: usize) -> Self {
        Self::new(value as u32)
    }
}

/// A trait representing a component in the ECS (Entity Component System).
///
/// Implement it with `#[derive(Component)]`. The derive sets [`NAME`](Component::NAME) to the
/// type's identifier, or to the value of a `#[component(name = "...")]` attribute.
pub trait Component: 'static + Sized + Send + Sync {
    /// Human readable name used in diagnostics. `None` reports the component as "unknown".
    const NAME: Option<&'static str> = None;
}
