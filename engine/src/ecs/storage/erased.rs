//! Type-erased ownership of a single value.
//!
//! [`Erased`] owns exactly one heap allocated value of a type known when it is constructed, and
//! remembers how to destroy it. It is the building block for containers that hold values whose
//! type is not known statically (e.g. one [`ComponentStorage`](super::ComponentStorage) per
//! component id).
//!
//! # Type Tag
//!
//! Alongside the drop function an `Erased` records the value's `TypeId` and type name. Safe
//! accessors check the tag and panic on a mismatch; the `unsafe` `*_unchecked` accessors skip
//! the check (asserting it in debug builds) for callers who track the type externally, typically
//! through a component id.
//!
//! # Example
//!
//! ```rust
//! use rusty_ecs::ecs::Erased;
//!
//! let mut value = Erased::new(String::from("hello"));
//! value.get_mut::<String>().push_str(" world");
//! assert_eq!(value.get::<String>(), "hello world");
//!
//! let moved = value.take();
//! assert!(value.is_empty());
//! assert!(!moved.is_empty());
//! ```

use std::{
    alloc::{self, Layout},
    any::{self, TypeId},
    fmt,
    ptr::{self, NonNull},
};

/// Returned when the allocator cannot provide memory for an erased value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AllocError {
    /// The layout that could not be allocated.
    layout: Layout,

    /// The name of the type being allocated.
    type_name: &'static str,
}

impl AllocError {
    /// Constructs a new `AllocError` for a failed allocation of `layout`.
    #[inline]
    pub const fn new(layout: Layout, type_name: &'static str) -> Self {
        Self { layout, type_name }
    }

    /// Get the layout that failed to allocate.
    #[inline]
    pub fn layout(&self) -> Layout {
        self.layout
    }
}

impl fmt::Display for AllocError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "failed to allocate {} bytes (align {}) for '{}'",
            self.layout.size(),
            self.layout.align(),
            self.type_name
        )
    }
}

impl std::error::Error for AllocError {}

/// What an `Erased` knows about the value it owns.
#[derive(Clone, Copy)]
struct Tag {
    type_id: TypeId,
    type_name: &'static str,

    /// Drops the value in place and releases its allocation.
    drop_fn: unsafe fn(NonNull<u8>),
}

/// Owns one value of an erased type. Move-only.
///
/// An `Erased` is either empty or holds exactly one value. Dropping or [`clear`](Self::clear)ing
/// it runs the value's destructor exactly once.
pub struct Erased {
    /// Pointer to the owned value. Dangling while empty or for zero-sized types.
    ptr: NonNull<u8>,

    /// Present iff a value is owned.
    tag: Option<Tag>,
}

impl Erased {
    /// Construct an empty `Erased`.
    #[inline]
    pub const fn empty() -> Self {
        Self {
            ptr: NonNull::dangling(),
            tag: None,
        }
    }

    /// Move `value` onto the heap behind an erased handle.
    ///
    /// Aborts through [`alloc::handle_alloc_error`] if memory cannot be allocated; use
    /// [`try_new`](Self::try_new) to handle that case.
    pub fn new<T: 'static>(value: T) -> Self {
        match Self::try_new(value) {
            Ok(erased) => erased,
            Err(err) => alloc::handle_alloc_error(err.layout()),
        }
    }

    /// Move `value` onto the heap behind an erased handle, reporting allocation failure.
    ///
    /// `value` is dropped if the allocation fails.
    pub fn try_new<T: 'static>(value: T) -> Result<Self, AllocError> {
        let layout = Layout::new::<T>();
        let ptr = if layout.size() == 0 {
            NonNull::<T>::dangling().cast::<u8>()
        } else {
            // SAFETY: The layout has a non-zero size.
            let raw = unsafe { alloc::alloc(layout) };
            NonNull::new(raw).ok_or(AllocError::new(layout, any::type_name::<T>()))?
        };

        // SAFETY: `ptr` is valid for writes and aligned for `T`, either freshly allocated with
        // `T`'s layout or dangling for a zero-sized `T`.
        unsafe { ptr.cast::<T>().as_ptr().write(value) };

        Ok(Self {
            ptr,
            tag: Some(Tag {
                type_id: TypeId::of::<T>(),
                type_name: any::type_name::<T>(),
                drop_fn: Self::drop_impl::<T>,
            }),
        })
    }

    /// Replace the current value (if any) with `value` and return a reference to it.
    pub fn emplace<T: 'static>(&mut self, value: T) -> &mut T {
        self.clear();
        *self = Self::new(value);
        // SAFETY: A `T` was just stored.
        unsafe { self.get_unchecked_mut::<T>() }
    }

    /// Check whether no value is owned.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.tag.is_none()
    }

    /// Check whether the owned value is a `T`.
    #[inline]
    pub fn is<T: 'static>(&self) -> bool {
        self.tag.is_some_and(|tag| tag.type_id == TypeId::of::<T>())
    }

    /// Get the type name of the owned value, or `None` if empty.
    #[inline]
    pub fn type_name(&self) -> Option<&'static str> {
        self.tag.map(|tag| tag.type_name)
    }

    /// Get a pointer to the owned value, or `None` if empty.
    #[inline]
    pub fn as_ptr(&self) -> Option<NonNull<u8>> {
        self.tag.map(|_| self.ptr)
    }

    /// Get a reference to the owned value as a `T`.
    ///
    /// # Panics
    /// Panics if empty or if the owned value is not a `T`.
    #[inline]
    pub fn get<T: 'static>(&self) -> &T {
        match self.try_get::<T>() {
            Some(value) => value,
            None => self.mismatch::<T>(),
        }
    }

    /// Get a mutable reference to the owned value as a `T`.
    ///
    /// # Panics
    /// Panics if empty or if the owned value is not a `T`.
    #[inline]
    pub fn get_mut<T: 'static>(&mut self) -> &mut T {
        if !self.is::<T>() {
            self.mismatch::<T>()
        }
        // SAFETY: The type tag matches `T`.
        unsafe { self.get_unchecked_mut::<T>() }
    }

    /// Get a reference to the owned value if it is a `T`.
    #[inline]
    pub fn try_get<T: 'static>(&self) -> Option<&T> {
        // SAFETY: The type tag matches `T`.
        self.is::<T>().then(|| unsafe { self.get_unchecked::<T>() })
    }

    /// Get a mutable reference to the owned value if it is a `T`.
    #[inline]
    pub fn try_get_mut<T: 'static>(&mut self) -> Option<&mut T> {
        if self.is::<T>() {
            // SAFETY: The type tag matches `T`.
            Some(unsafe { self.get_unchecked_mut::<T>() })
        } else {
            None
        }
    }

    /// Get a reference to the owned value without checking its type.
    ///
    /// # Safety
    /// The `Erased` must be non-empty and hold a `T`. Debug builds assert this.
    #[inline]
    pub unsafe fn get_unchecked<T: 'static>(&self) -> &T {
        debug_assert!(self.is::<T>(), "{}", self.mismatch_message::<T>());
        // SAFETY: Caller guarantees the value is a live `T`.
        unsafe { &*self.ptr.cast::<T>().as_ptr() }
    }

    /// Get a mutable reference to the owned value without checking its type.
    ///
    /// # Safety
    /// The `Erased` must be non-empty and hold a `T`. Debug builds assert this.
    #[inline]
    pub unsafe fn get_unchecked_mut<T: 'static>(&mut self) -> &mut T {
        debug_assert!(self.is::<T>(), "{}", self.mismatch_message::<T>());
        // SAFETY: Caller guarantees the value is a live `T`; `&mut self` guarantees uniqueness.
        unsafe { &mut *self.ptr.cast::<T>().as_ptr() }
    }

    /// Move the owned value (if any) out into a new `Erased`, leaving this one empty.
    #[inline]
    pub fn take(&mut self) -> Self {
        std::mem::take(self)
    }

    /// Move the owned value out as a `T`, leaving this one empty.
    ///
    /// Returns `None` (and keeps the value) if empty or not a `T`.
    pub fn take_as<T: 'static>(&mut self) -> Option<T> {
        if !self.is::<T>() {
            return None;
        }
        // Forget the value so it is not dropped again; its memory is released below.
        self.tag = None;
        // SAFETY: The tag matched `T`, so `ptr` holds a live `T` we now own.
        let value = unsafe { ptr::read(self.ptr.cast::<T>().as_ptr()) };
        let layout = Layout::new::<T>();
        if layout.size() != 0 {
            // SAFETY: `ptr` was allocated with `T`'s layout in `try_new`.
            unsafe { alloc::dealloc(self.ptr.as_ptr(), layout) };
        }
        self.ptr = NonNull::dangling();
        Some(value)
    }

    /// Destroy the owned value, if any. Idempotent.
    #[inline]
    pub fn clear(&mut self) {
        if let Some(tag) = self.tag.take() {
            // SAFETY: The tag was present so `ptr` holds a live value of the tagged type, and
            // taking the tag ensures it is dropped only once.
            unsafe { (tag.drop_fn)(self.ptr) };
            self.ptr = NonNull::dangling();
        }
    }

    /// Drop implementation specialised for `T`: drops in place then frees the allocation.
    unsafe fn drop_impl<T>(ptr: NonNull<u8>) {
        // SAFETY: Caller ensures ptr points to a valid initialized T allocated by `try_new`.
        unsafe {
            ptr::drop_in_place(ptr.cast::<T>().as_ptr());
            let layout = Layout::new::<T>();
            if layout.size() != 0 {
                alloc::dealloc(ptr.as_ptr(), layout);
            }
        }
    }

    fn mismatch_message<T>(&self) -> String {
        format!(
            "erased value holds '{}', not '{}'",
            self.type_name().unwrap_or("nothing"),
            any::type_name::<T>()
        )
    }

    #[cold]
    #[track_caller]
    fn mismatch<T>(&self) -> ! {
        panic!("{}", self.mismatch_message::<T>())
    }
}

impl Default for Erased {
    #[inline]
    fn default() -> Self {
        Self::empty()
    }
}

impl Drop for Erased {
    fn drop(&mut self) {
        self.clear();
    }
}

/// A non-empty handle is equal only to itself. Each handle owns a distinct value, zero-sized ones
/// included, even though those share a dangling pointer. Empty handles are all equal.
impl PartialEq for Erased {
    fn eq(&self, other: &Self) -> bool {
        match (self.tag, other.tag) {
            (None, None) => true,
            (Some(_), Some(_)) => ptr::eq(self, other),
            _ => false,
        }
    }
}

impl Eq for Erased {}

impl fmt::Debug for Erased {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.type_name() {
            Some(name) => f
                .debug_struct("Erased")
                .field("type", &name)
                .field("ptr", &self.ptr)
                .finish(),
            None => f.write_str("Erased(empty)"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::{cell::Cell, rc::Rc};

    /// Adds 2 to the counter when constructed and 5 when dropped.
    struct Tracked {
        counter: Rc<Cell<i32>>,
        // just to make this struct a bit bigger
        _padding: [u8; 16],
    }

    impl Tracked {
        fn new(counter: &Rc<Cell<i32>>) -> Self {
            counter.set(counter.get() + 2);
            Self {
                counter: Rc::clone(counter),
                _padding: [0; 16],
            }
        }
    }

    impl Drop for Tracked {
        fn drop(&mut self) {
            self.counter.set(self.counter.get() + 5);
        }
    }

    #[test]
    fn construct_runs_constructor_once() {
        // Given
        let counter = Rc::new(Cell::new(10));

        // When
        let erased = Erased::new(Tracked::new(&counter));

        // Then
        assert_eq!(counter.get(), 12);
        assert!(!erased.is_empty());
    }

    #[test]
    fn drop_runs_destructor_once() {
        // Given
        let counter = Rc::new(Cell::new(10));

        // When
        {
            let _erased = Erased::new(Tracked::new(&counter));
            counter.set(10);
        }

        // Then
        assert_eq!(counter.get(), 15);
    }

    #[test]
    fn move_does_not_destroy_twice() {
        // Given
        let counter = Rc::new(Cell::new(0));
        let mut erased = Erased::new(Tracked::new(&counter));

        // When - move out, then move back through a plain Rust move
        let moved = erased.take();
        let moved_again = moved;
        erased.clear();

        // Then - the emptied source runs nothing
        assert_eq!(counter.get(), 2);
        assert!(erased.is_empty());

        // When
        drop(moved_again);

        // Then
        assert_eq!(counter.get(), 7);
    }

    #[test]
    fn get_reads_the_value() {
        // Given
        let counter = Rc::new(Cell::new(0));
        let erased = Erased::new(Tracked::new(&counter));

        // When
        let tracked = erased.get::<Tracked>();

        // Then
        assert_eq!(tracked.counter.get(), 2);
        assert!(Rc::ptr_eq(&tracked.counter, &counter));
    }

    #[test]
    fn clear_is_idempotent() {
        // Given
        let counter = Rc::new(Cell::new(0));
        let mut erased = Erased::new(Tracked::new(&counter));

        // When
        erased.clear();
        erased.clear();

        // Then
        assert!(erased.is_empty());
        assert_eq!(counter.get(), 7);
        assert_eq!(erased.type_name(), None);
        assert_eq!(erased.as_ptr(), None);
    }

    #[test]
    fn move_round_trip_keeps_value() {
        // Given
        let mut erased = Erased::new(String::from("hello world"));

        // When
        let mut moved = erased.take();

        // Then
        assert!(erased.is_empty());
        assert!(!moved.is_empty());

        // When
        erased = moved.take();

        // Then
        assert!(moved.is_empty());
        assert_eq!(erased.get::<String>(), "hello world");
    }

    #[test]
    fn emplace_replaces_value() {
        // Given
        let counter = Rc::new(Cell::new(0));
        let mut erased = Erased::new(Tracked::new(&counter));

        // When
        let value = erased.emplace(41u64);
        *value += 1;

        // Then - the old value was destroyed
        assert_eq!(counter.get(), 7);
        assert_eq!(*erased.get::<u64>(), 42);
    }

    #[test]
    fn take_as_moves_value_out() {
        // Given
        let counter = Rc::new(Cell::new(0));
        let mut erased = Erased::new(Tracked::new(&counter));

        // When - wrong type leaves the value in place
        assert!(erased.take_as::<String>().is_none());
        let tracked = erased.take_as::<Tracked>();

        // Then
        assert!(tracked.is_some());
        assert!(erased.is_empty());
        assert_eq!(counter.get(), 2);

        // When
        drop(tracked);

        // Then
        assert_eq!(counter.get(), 7);
    }

    #[test]
    fn zero_sized_values() {
        // Given
        #[derive(Debug, PartialEq)]
        struct Marker;

        // When
        let erased = Erased::new(Marker);

        // Then
        assert!(erased.is::<Marker>());
        assert_eq!(erased.get::<Marker>(), &Marker);
    }

    #[test]
    fn try_get_checks_type() {
        // Given
        let mut erased = Erased::new(7i32);

        // Then
        assert_eq!(erased.try_get::<i32>(), Some(&7));
        assert_eq!(erased.try_get::<u32>(), None);
        assert!(erased.try_get_mut::<u32>().is_none());
        assert!(Erased::empty().try_get::<i32>().is_none());
    }

    #[test]
    #[should_panic(expected = "erased value holds 'i32', not 'u32'")]
    fn get_wrong_type_panics() {
        let erased = Erased::new(7i32);
        erased.get::<u32>();
    }

    #[test]
    #[should_panic(expected = "erased value holds 'nothing'")]
    fn get_empty_panics() {
        let mut erased = Erased::empty();
        erased.get_mut::<u32>();
    }

    #[test]
    fn equality_is_identity() {
        // Given
        let a = Erased::new(1u8);
        let b = Erased::new(1u8);

        // Then
        assert_eq!(a, a);
        assert_ne!(a, b);
        assert_eq!(Erased::empty(), Erased::default());
    }

    #[test]
    fn zero_sized_values_are_distinct() {
        // Given
        struct Marker;
        let first = Erased::new(Marker);
        let second = Erased::new(Marker);

        // Then - both point at the same dangling address, but own separate values
        assert_eq!(first.as_ptr(), second.as_ptr());
        assert_ne!(first, second);
        assert_eq!(first, first);
        assert_ne!(first, Erased::empty());
    }

    #[test]
    fn alloc_error_display() {
        // Given
        let layout = Layout::from_size_align(8, 8).unwrap();
        let err = AllocError::new(layout, "u64");

        // Then
        assert_eq!(err.to_string(), "failed to allocate 8 bytes (align 8) for 'u64'");
        assert_eq!(err.layout(), layout);
    }
}
