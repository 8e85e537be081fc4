//! Process-wide type numbering.
//!
//! [`GlobalId`] hands out a unique, increasing `u32` for every distinct type queried within a
//! scope. The scope is selected by a tag type, so unrelated subsystems can number their types
//! independently without leaving gaps in each other's id space.
//!
//! # Ordering
//!
//! Ids are assigned in **first-use order**, not declaration order. If the order in which types
//! are first queried varies between runs, so do their ids. Callers needing reproducible ids
//! should query (or register) all types during a deterministic setup phase.
//!
//! # Lifecycle
//!
//! Each scope starts counting at zero the first time it is used and lives for the remainder of
//! the process. Scopes are never reset.
//!
//! # Example
//!
//! ```rust
//! use rusty_ecs::ecs::GlobalId;
//!
//! struct Scope;
//!
//! let a = GlobalId::<Scope>::of::<u8>();
//! let b = GlobalId::<Scope>::of::<u16>();
//! assert_ne!(a, b);
//! assert_eq!(GlobalId::<Scope>::of::<u8>(), a);
//! ```

use std::{any::TypeId, collections::HashMap, marker::PhantomData, sync::OnceLock};

use dashmap::DashMap;
use log::trace;

/// All ids issued within a single tag scope.
#[derive(Debug, Default)]
struct Scope {
    ids: HashMap<TypeId, u32>,
}

/// Get the process-wide map from scope tag to issued ids.
fn scopes() -> &'static DashMap<TypeId, Scope> {
    static SCOPES: OnceLock<DashMap<TypeId, Scope>> = OnceLock::new();
    SCOPES.get_or_init(DashMap::new)
}

/// Handle to the global type numbering of the scope `Tag`.
///
/// This is never constructed; all functionality is exposed through associated functions.
pub struct GlobalId<Tag: ?Sized + 'static>(PhantomData<fn() -> Tag>);

impl<Tag: ?Sized + 'static> GlobalId<Tag> {
    /// Get the id of `T` within this scope, assigning the next free id on first query.
    ///
    /// Registration of a previously unseen type holds the scope's map shard for the duration of
    /// the insert, so concurrent first queries for the same type agree on its id.
    pub fn of<T: ?Sized + 'static>() -> u32 {
        if let Some(id) = Self::peek::<T>() {
            return id;
        }

        let mut scope = scopes().entry(TypeId::of::<Tag>()).or_default();
        let next = scope.ids.len() as u32;
        *scope.ids.entry(TypeId::of::<T>()).or_insert_with(|| {
            trace!(
                "assigned global id {next} to '{}' in scope '{}'",
                std::any::type_name::<T>(),
                std::any::type_name::<Tag>()
            );
            next
        })
    }

    /// Get the id of `T` within this scope if one was already assigned.
    #[inline]
    pub fn peek<T: ?Sized + 'static>() -> Option<u32> {
        scopes()
            .get(&TypeId::of::<Tag>())
            .and_then(|scope| scope.ids.get(&TypeId::of::<T>()).copied())
    }

    /// Get the number of ids issued in this scope so far.
    #[inline]
    pub fn len() -> usize {
        scopes()
            .get(&TypeId::of::<Tag>())
            .map_or(0, |scope| scope.ids.len())
    }

    /// Check whether this scope has issued any ids yet.
    #[inline]
    pub fn is_empty() -> bool {
        Self::len() == 0
    }
}
