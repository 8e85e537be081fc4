//! Entity identity and component storage core.
//!
//! This crate provides the building blocks a world/query layer sits on top of:
//!
//! - [`ecs::entity`]: generational entity handles and their allocation/recycling.
//! - [`ecs::component`]: compact component ids, resolved statically for a fixed component list
//!   or assigned at runtime on registration, plus a cache of pre-resolved ids.
//! - [`ecs::storage`]: a type-erased value container and a sparse-to-dense storage container.

// Allow the derive macros to refer to `::rusty_ecs` from inside this crate.
extern crate self as rusty_ecs;

pub mod ecs;
