//! Index-based references into the segment table.

use core::ptr;

use crate::error::DescriptorError;
use crate::rebind::SegmentIndexMap;
use crate::segment::SegmentTable;
use crate::wire::RegionWire;

/// Segment index used by regions that do not reference any segment.
pub const SEGMENT_INDEX_NONE: i32 = -1;

/// A byte range inside one segment of the segment table.
///
/// A region with `size_bytes == 0` is unused: it resolves to a null address
/// whatever its segment index says.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MemoryRegionRef {
    pub segment_index: i32,
    pub offset_bytes: i32,
    pub size_bytes: i32,
}

impl MemoryRegionRef {
    #[inline]
    pub const fn new(segment_index: i32, offset_bytes: i32, size_bytes: i32) -> Self {
        Self {
            segment_index,
            offset_bytes,
            size_bytes,
        }
    }

    /// An unused region attached to `segment_index`.
    #[inline]
    pub const fn unused(segment_index: i32) -> Self {
        Self::new(segment_index, 0, 0)
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.size_bytes == 0
    }

    /// One past the last byte of the region, computed without overflow.
    #[inline]
    pub fn end_offset(&self) -> i64 {
        i64::from(self.offset_bytes) + i64::from(self.size_bytes)
    }

    /// Resolve this region to an address inside its segment.
    ///
    /// Unused regions resolve to null. Otherwise the segment must exist and
    /// `offset_bytes..offset_bytes + size_bytes` must lie inside it.
    pub fn resolve<T: SegmentTable + ?Sized>(&self, table: &T) -> Result<*mut u8, DescriptorError> {
        if self.is_empty() {
            return Ok(ptr::null_mut());
        }

        let segment = table
            .segment(self.segment_index)
            .ok_or(DescriptorError::SegmentNotFound {
                index: self.segment_index,
            })?;

        let out_of_bounds = DescriptorError::OutOfBounds {
            index: self.segment_index,
            offset: self.offset_bytes,
            size: self.size_bytes,
            segment_len: segment.len(),
        };

        if self.offset_bytes < 0 || self.size_bytes < 0 {
            return Err(out_of_bounds);
        }
        // Segment lengths beyond i64::MAX cannot be exceeded by an i32 sum.
        let segment_len = i64::try_from(segment.len()).unwrap_or(i64::MAX);
        if self.end_offset() > segment_len {
            return Err(out_of_bounds);
        }

        // SAFETY: offset_bytes + size_bytes <= segment.len(), and the segment
        // is valid for its full length per `Segment::from_raw`.
        Ok(unsafe { segment.as_ptr().add(self.offset_bytes as usize) })
    }

    /// The same region with its segment index translated through `map`.
    ///
    /// Unused regions whose index has no translation are detached to
    /// [`SEGMENT_INDEX_NONE`]; any other missing index is an error.
    pub fn translate<M: SegmentIndexMap + ?Sized>(
        &self,
        map: &M,
    ) -> Result<MemoryRegionRef, DescriptorError> {
        let segment_index = match map.translate(self.segment_index) {
            Some(index) => index,
            None if self.is_empty() => SEGMENT_INDEX_NONE,
            None => {
                return Err(DescriptorError::SegmentNotFound {
                    index: self.segment_index,
                });
            }
        };
        Ok(MemoryRegionRef {
            segment_index,
            ..*self
        })
    }
}

impl From<RegionWire> for MemoryRegionRef {
    fn from(wire: RegionWire) -> Self {
        Self::new(wire.segment_index, wire.offset_bytes, wire.size_bytes)
    }
}

impl From<MemoryRegionRef> for RegionWire {
    fn from(region: MemoryRegionRef) -> Self {
        RegionWire {
            segment_index: region.segment_index,
            offset_bytes: region.offset_bytes,
            size_bytes: region.size_bytes,
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;
    use crate::segment::HeapSegment;

    #[test]
    fn test_unused_region_resolves_to_null() {
        let table: Vec<crate::Segment> = Vec::new();
        for index in [-1, 0, 7, i32::MAX] {
            let region = MemoryRegionRef::new(index, 123, 0);
            assert_eq!(region.resolve(&table), Ok(ptr::null_mut()));
        }
    }

    #[test]
    fn test_resolve_in_bounds() {
        let seg = HeapSegment::new_zeroed(64);
        let table = [seg.segment()];

        let addr = MemoryRegionRef::new(0, 16, 48).resolve(&table).unwrap();
        assert_eq!(addr as usize, seg.segment().as_ptr() as usize + 16);
    }

    #[test]
    fn test_resolve_exactly_at_end() {
        let seg = HeapSegment::new_zeroed(64);
        let table = [seg.segment()];
        assert!(MemoryRegionRef::new(0, 0, 64).resolve(&table).is_ok());
        assert!(matches!(
            MemoryRegionRef::new(0, 1, 64).resolve(&table),
            Err(DescriptorError::OutOfBounds { .. })
        ));
    }

    #[test]
    fn test_resolve_missing_segment() {
        let seg = HeapSegment::new_zeroed(64);
        let table = [seg.segment()];
        assert_eq!(
            MemoryRegionRef::new(3, 0, 8).resolve(&table),
            Err(DescriptorError::SegmentNotFound { index: 3 })
        );
    }

    #[test]
    fn test_resolve_rejects_overflowing_sum() {
        let seg = HeapSegment::new_zeroed(64);
        let table = [seg.segment()];
        // i32 addition would wrap negative; the widened sum must not.
        let region = MemoryRegionRef::new(0, i32::MAX, i32::MAX);
        assert!(matches!(
            region.resolve(&table),
            Err(DescriptorError::OutOfBounds { .. })
        ));
    }

    #[test]
    fn test_resolve_rejects_negative_fields() {
        let seg = HeapSegment::new_zeroed(64);
        let table = [seg.segment()];
        for (offset, size) in [(-8, 8), (8, -4), (-1, -1)] {
            let region = MemoryRegionRef::new(0, offset, size);
            assert_eq!(
                region.resolve(&table),
                Err(DescriptorError::OutOfBounds {
                    index: 0,
                    offset,
                    size,
                    segment_len: 64,
                })
            );
        }
    }

    #[test]
    fn test_translate() {
        let map: HashMap<i32, i32> = [(2, 5)].into_iter().collect();

        let region = MemoryRegionRef::new(2, 16, 32);
        assert_eq!(region.translate(&map), Ok(MemoryRegionRef::new(5, 16, 32)));

        let stale = MemoryRegionRef::new(4, 16, 32);
        assert_eq!(
            stale.translate(&map),
            Err(DescriptorError::SegmentNotFound { index: 4 })
        );

        let unused = MemoryRegionRef::unused(4);
        assert_eq!(
            unused.translate(&map),
            Ok(MemoryRegionRef::unused(SEGMENT_INDEX_NONE))
        );
    }
}
