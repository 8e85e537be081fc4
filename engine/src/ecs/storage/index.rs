//! Sparse key to dense slot indices.
//!
//! A [`SparseStorage`](super::SparseStorage) keeps values packed, and needs a side table telling
//! it where each key's value currently sits. That table is an [`Index`]. Two are provided:
//!
//! | Index | Lookup | Memory | Suits |
//! |-------|--------|--------|-------|
//! | [`DynamicIndex`] | Two array reads | One page per touched range of keys | Dense or clustered keys |
//! | [`HashIndex`] | One hash lookup | Proportional to entries | Huge or random keys |

use std::{collections::HashMap, mem};

use log::debug;

use crate::ecs::{component, entity, storage::Slot};

/// A key that can address a sparse index.
///
/// Implementors map themselves onto a sparse `usize` position. Distinct live keys stored in the
/// same index must map to distinct positions.
pub trait SparseId: Copy {
    /// Get the sparse position of this key.
    fn index(&self) -> usize;
}

impl SparseId for usize {
    #[inline]
    fn index(&self) -> usize {
        *self
    }
}

impl SparseId for u32 {
    #[inline]
    fn index(&self) -> usize {
        *self as usize
    }
}

impl SparseId for entity::Id {
    #[inline]
    fn index(&self) -> usize {
        self.value() as usize
    }
}

/// Entities address the index by id only. Storage holding entities compares the stored handle to
/// tell generations apart.
impl SparseId for entity::Entity {
    #[inline]
    fn index(&self) -> usize {
        entity::Entity::index(self)
    }
}

impl SparseId for component::Id {
    #[inline]
    fn index(&self) -> usize {
        component::Id::index(self)
    }
}

/// A map from sparse positions to dense [`Slot`]s.
///
/// Implementations only store and forget mappings; keeping them consistent with the dense side is
/// the owning storage's job. The trait is object safe.
pub trait Index {
    /// Point `sparse` at `slot`, replacing any previous mapping.
    fn insert(&mut self, sparse: usize, slot: Slot);

    /// Get the slot `sparse` points at.
    fn get(&self, sparse: usize) -> Option<Slot>;

    /// Forget the mapping for `sparse`, returning the slot it pointed at.
    fn remove(&mut self, sparse: usize) -> Option<Slot>;

    /// Forget every mapping.
    fn clear(&mut self);

    /// Check whether `sparse` is mapped.
    #[inline]
    fn contains(&self, sparse: usize) -> bool {
        self.get(sparse).is_some()
    }
}

/// A paged sparse index.
///
/// The key space is cut into pages of `page_size` positions. A page is allocated the first time
/// any of its positions is mapped, and stays allocated until [`clear`](Index::clear). Unmapped
/// positions within a page hold `None`.
///
/// An [`entity::Manager`] issues ids sequentially and reuses freed ones first, so the ids live in a
/// store cluster in a few pages and lookups stay two array reads.
///
/// The page table holds at most [`MAX_BLOCKS`](Self::MAX_BLOCKS) pages, which bounds the largest
/// mappable position at [`max_key`](Self::max_key). With the default page size every `u32` key
/// fits. Keys beyond that (hashes, raw `usize` handles) belong in a [`HashIndex`].
///
/// ```rust
/// use rusty_ecs::ecs::storage::{DynamicIndex, Index, Slot};
///
/// let mut index = DynamicIndex::new_with_block_size(64);
/// index.insert(3, Slot::new(0));
/// index.insert(1_000, Slot::new(1));
///
/// assert_eq!(index.get(1_000), Some(Slot::new(1)));
/// assert_eq!(index.get(4), None);
/// assert_eq!(index.allocated_block_count(), 2);
/// ```
#[derive(Debug)]
pub struct DynamicIndex {
    page_size: usize,

    /// `pages[p][o]` maps position `p * page_size + o`.
    pages: Vec<Option<Box<[Option<Slot>]>>>,
}

impl DynamicIndex {
    /// Page size used by [`new`](Self::new).
    pub const DEFAULT_BLOCK_SIZE: usize = 256;

    /// Largest number of pages the page table may span.
    pub const MAX_BLOCKS: usize = 1 << 24;

    /// Create an empty index with the default page size.
    #[inline]
    pub const fn new() -> Self {
        Self::new_with_block_size(Self::DEFAULT_BLOCK_SIZE)
    }

    /// Create an empty index with `page_size` positions per page.
    ///
    /// # Panics
    /// Panics if `page_size` is 0.
    #[inline]
    pub const fn new_with_block_size(page_size: usize) -> Self {
        assert!(page_size > 0, "block size must be greater than 0");
        Self {
            page_size,
            pages: Vec::new(),
        }
    }

    /// Get the number of positions per page.
    #[inline]
    pub fn block_size(&self) -> usize {
        self.page_size
    }

    /// Get the largest position this index can map.
    #[inline]
    pub fn max_key(&self) -> usize {
        Self::MAX_BLOCKS.saturating_mul(self.page_size).saturating_sub(1)
    }

    /// Get the number of pages the index spans, allocated or not.
    #[inline]
    pub fn block_count(&self) -> usize {
        self.pages.len()
    }

    /// Get the number of allocated pages.
    pub fn allocated_block_count(&self) -> usize {
        self.pages.iter().flatten().count()
    }

    /// Approximate heap bytes held by the index.
    pub fn memory_usage(&self) -> usize {
        let table = self.pages.capacity() * mem::size_of::<Option<Box<[Option<Slot>]>>>();
        let pages = self.allocated_block_count() * self.page_size * mem::size_of::<Option<Slot>>();
        table + pages
    }

    #[inline]
    fn locate(&self, sparse: usize) -> (usize, usize) {
        (sparse / self.page_size, sparse % self.page_size)
    }

    fn page_mut(&mut self, page: usize) -> &mut [Option<Slot>] {
        assert!(
            page < Self::MAX_BLOCKS,
            "sparse key in page {page} is beyond the largest key {} of this index; use HashIndex for keys this sparse",
            self.max_key()
        );
        if page >= self.pages.len() {
            self.pages.resize_with(page + 1, || None);
        }
        let page_size = self.page_size;
        self.pages[page].get_or_insert_with(|| {
            debug!("allocating sparse index page {page} ({page_size} positions)");
            vec![None; page_size].into_boxed_slice()
        })
    }
}

impl Default for DynamicIndex {
    #[inline]
    fn default() -> Self {
        Self::new()
    }
}

impl Index for DynamicIndex {
    #[inline]
    fn insert(&mut self, sparse: usize, slot: Slot) {
        let (page, offset) = self.locate(sparse);
        self.page_mut(page)[offset] = Some(slot);
    }

    #[inline]
    fn get(&self, sparse: usize) -> Option<Slot> {
        let (page, offset) = self.locate(sparse);
        self.pages.get(page)?.as_ref()?[offset]
    }

    #[inline]
    fn remove(&mut self, sparse: usize) -> Option<Slot> {
        let (page, offset) = self.locate(sparse);
        self.pages.get_mut(page)?.as_mut()?[offset].take()
    }

    fn clear(&mut self) {
        self.pages.clear();
    }
}

/// A hashed sparse index.
///
/// Costs a hash per lookup, but memory follows the number of mappings rather than the largest key,
/// so it suits keys like hashes or handles from a foreign system.
#[derive(Debug, Default)]
pub struct HashIndex {
    slots: HashMap<usize, Slot>,
}

impl HashIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty index with room for `capacity` mappings.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            slots: HashMap::with_capacity(capacity),
        }
    }

    /// Get the number of mappings.
    #[inline]
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }
}

impl Index for HashIndex {
    #[inline]
    fn insert(&mut self, sparse: usize, slot: Slot) {
        self.slots.insert(sparse, slot);
    }

    #[inline]
    fn get(&self, sparse: usize) -> Option<Slot> {
        self.slots.get(&sparse).copied()
    }

    #[inline]
    fn remove(&mut self, sparse: usize) -> Option<Slot> {
        self.slots.remove(&sparse)
    }

    fn clear(&mut self) {
        self.slots.clear();
    }
}
