/// A dense storage slot. A simple index into a sparse storage's dense value and key vecs.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Slot(usize);

impl From<usize> for Slot {
    /// Get a slot From a usize index.
    fn from(value: usize) -> Self {
        Self::new(value)
    }
}

impl Slot {
    /// Construct a new slot from an index.
    #[inline]
    pub const fn new(index: usize) -> Self {
        Self(index)
    }

    /// Get the index used in the dense vecs.
    #[inline]
    pub fn index(&self) -> usize {
        self.0
    }
}
