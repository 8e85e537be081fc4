//! Entity-keyed storage for the ECS.
//!
//! This module provides the storage layer that component data lives in. It is built from three
//! layers, each usable on its own:
//!
//! ```text
//! ┌──────────────────────────────────────────────────────┐
//! │  ComponentStorage                                    │
//! │  - Bound to one component id                         │
//! │  - Typed access, checked against the bound type      │
//! └───────────────────────────┬──────────────────────────┘
//!                             │
//! ┌───────────────────────────▼──────────────────────────┐
//! │  SparseStorage<K, T, I>                              │
//! │  - Dense values, dense keys                          │
//! │  - Ordered erase or swap-and-pop                     │
//! └──────────────┬─────────────────────────┬─────────────┘
//!                │                         │
//! ┌──────────────▼──────────────┐ ┌────────▼─────────────┐
//! │  Index                      │ │  Erased              │
//! │  - Sparse position → Slot   │ │  - One heap value of │
//! │  - DynamicIndex, HashIndex  │ │    any type          │
//! └─────────────────────────────┘ └──────────────────────┘
//! ```
//!
//! # Sparse Sets
//!
//! A [`SparseStorage`] is a sparse set: values are packed into a `Vec` so iteration touches only
//! live data, while lookups go through an [`Index`] from the key's sparse position to its dense
//! [`Slot`]. Keys implement [`SparseId`]; entity ids, component ids and plain integers all do.
//!
//! The index is pluggable. [`DynamicIndex`] allocates fixed-size blocks on demand and suits the
//! mostly sequential ids an [`entity::Manager`](crate::ecs::entity::Manager) hands out.
//! [`HashIndex`] suits very sparse or unbounded keys.
//!
//! # Type Erasure
//!
//! [`Erased`] owns a single value whose type is only known at runtime. It keeps enough type
//! information to drop the value correctly and to check typed access. [`ComponentStorage`] stores
//! one `Erased` per entity so storages for different component types can live side by side.
//!
//! # Thread Safety
//!
//! Nothing here synchronizes internally. Mutation requires `&mut`, and sharing across threads is
//! left to external synchronization.

mod component;
mod erased;
pub mod index;
mod slot;
mod sparse;

pub use component::ComponentStorage;
pub use erased::{AllocError, Erased};
pub use index::{DynamicIndex, HashIndex, Index, SparseId};
pub use slot::Slot;
pub use sparse::{Iter, IterMut, SparseStorage};
