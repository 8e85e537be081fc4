pub mod component;
pub mod entity;
pub mod storage;
pub(crate) mod util;

pub use component::{Component, Identifier, IdCache, TypedId};
pub use entity::Entity;
pub use storage::{ComponentStorage, Erased, SparseStorage};
pub use util::global_id::GlobalId;
