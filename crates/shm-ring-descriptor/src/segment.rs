//! Segment table seam.
//!
//! A segment is one mapped shared-memory area. Descriptors never hold
//! addresses; they name segments by index and are resolved against whatever
//! table the local process has mapped.

use core::ptr::NonNull;

/// A mapped segment: base address and length in bytes.
///
/// This does not own the mapping.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Segment {
    base: NonNull<u8>,
    len: usize,
}

impl Segment {
    /// Create a segment view from a raw pointer and length.
    ///
    /// # Safety
    ///
    /// - `base` must be valid for `len` bytes
    /// - the memory must remain mapped for as long as addresses resolved
    ///   against this segment are in use
    pub unsafe fn from_raw(base: *mut u8, len: usize) -> Self {
        let base = NonNull::new(base).expect("segment base must be non-null");
        Self { base, len }
    }

    #[inline]
    pub fn as_ptr(&self) -> *mut u8 {
        self.base.as_ptr()
    }

    /// Length of the segment in bytes.
    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }
}

unsafe impl Send for Segment {}
unsafe impl Sync for Segment {}

/// Lookup from segment index to a mapped segment.
pub trait SegmentTable {
    /// Returns the segment at `index`, or `None` if there is none.
    fn segment(&self, index: i32) -> Option<Segment>;
}

impl SegmentTable for [Segment] {
    fn segment(&self, index: i32) -> Option<Segment> {
        let index = usize::try_from(index).ok()?;
        self.get(index).copied()
    }
}

impl SegmentTable for Vec<Segment> {
    #[inline]
    fn segment(&self, index: i32) -> Option<Segment> {
        self.as_slice().segment(index)
    }
}

impl<const N: usize> SegmentTable for [Segment; N] {
    #[inline]
    fn segment(&self, index: i32) -> Option<Segment> {
        self.as_slice().segment(index)
    }
}

impl<T: SegmentTable + ?Sized> SegmentTable for &T {
    #[inline]
    fn segment(&self, index: i32) -> Option<Segment> {
        (**self).segment(index)
    }
}

mod heap {
    use super::Segment;
    use std::alloc::{Layout, alloc_zeroed, dealloc};
    use core::ptr::NonNull;

    /// Heap-backed segment for tests or in-process rings.
    pub struct HeapSegment {
        base: NonNull<u8>,
        len: usize,
        layout: Layout,
    }

    impl HeapSegment {
        /// Allocate a zeroed heap segment aligned to 64 bytes.
        pub fn new_zeroed(size: usize) -> Self {
            let layout =
                Layout::from_size_align(size.max(1), 64).expect("invalid heap segment layout");
            // SAFETY: layout has non-zero size.
            let ptr = unsafe { alloc_zeroed(layout) };
            let base = NonNull::new(ptr).expect("heap segment allocation failed");
            Self {
                base,
                len: size,
                layout,
            }
        }

        /// Returns a [`Segment`] view of this allocation.
        #[inline]
        pub fn segment(&self) -> Segment {
            // SAFETY: the allocation is valid for `len` bytes until drop.
            unsafe { Segment::from_raw(self.base.as_ptr(), self.len) }
        }

        #[inline]
        pub fn len(&self) -> usize {
            self.len
        }

        #[inline]
        pub fn is_empty(&self) -> bool {
            self.len == 0
        }
    }

    impl Drop for HeapSegment {
        fn drop(&mut self) {
            // SAFETY: allocated in `new_zeroed` with this exact layout.
            unsafe { dealloc(self.base.as_ptr(), self.layout) };
        }
    }

    unsafe impl Send for HeapSegment {}
    unsafe impl Sync for HeapSegment {}
}

pub use heap::HeapSegment;
