//! Segment index translation between two segment-table orderings.

use std::collections::{BTreeMap, HashMap};
use std::hash::BuildHasher;

/// Maps a segment index in the sender's table to the index the same segment
/// has in the receiver's table.
pub trait SegmentIndexMap {
    fn translate(&self, index: i32) -> Option<i32>;
}

impl<S: BuildHasher> SegmentIndexMap for HashMap<i32, i32, S> {
    #[inline]
    fn translate(&self, index: i32) -> Option<i32> {
        self.get(&index).copied()
    }
}

impl SegmentIndexMap for BTreeMap<i32, i32> {
    #[inline]
    fn translate(&self, index: i32) -> Option<i32> {
        self.get(&index).copied()
    }
}

impl<M: SegmentIndexMap + ?Sized> SegmentIndexMap for &M {
    #[inline]
    fn translate(&self, index: i32) -> Option<i32> {
        (**self).translate(index)
    }
}
