//! Ring buffer descriptor: layout, geometry, validation and resolution.
//!
//! # Layout conventions
//!
//! ```text
//! explicit sub-offsets (one segment)      embedded counters (one segment)
//! ┌──────────────────────────────┐        ┌──────────────────────────────┐
//! │ data                         │        │ data (counters inside, at    │
//! ├──────────────────────────────┤        │ positions fixed by the ring  │
//! │ read counter                 │        │ implementation)              │
//! ├──────────────────────────────┤        │                              │
//! │ write counter                │        │                              │
//! └──────────────────────────────┘        └──────────────────────────────┘
//! ```
//!
//! The fully general form places each of the three regions in any segment.

use tracing::{debug, warn};

use crate::error::{DescriptorError, GeometryField};
use crate::flags::{CounterWidth, RingBufferFlags};
use crate::limits::GeometryLimits;
use crate::rebind::SegmentIndexMap;
use crate::region::{MemoryRegionRef, SEGMENT_INDEX_NONE};
use crate::segment::SegmentTable;
use crate::wire::RingBufferWire;

/// Offset and size of a region within an already chosen segment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ByteRange {
    pub offset_bytes: i32,
    pub size_bytes: i32,
}

impl ByteRange {
    #[inline]
    pub const fn new(offset_bytes: i32, size_bytes: i32) -> Self {
        Self {
            offset_bytes,
            size_bytes,
        }
    }

    #[inline]
    fn in_segment(self, segment_index: i32) -> MemoryRegionRef {
        MemoryRegionRef::new(segment_index, self.offset_bytes, self.size_bytes)
    }
}

/// Describes a shared-memory SPSC ring buffer by segment index and offset.
///
/// A descriptor never stores addresses: each side of the process boundary
/// resolves it against its own segment table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RingBufferDescriptor {
    read_counter: MemoryRegionRef,
    write_counter: MemoryRegionRef,
    data: MemoryRegionRef,
    bytes_per_frame: i32,
    frames_per_burst: i32,
    capacity_in_frames: i32,
    flags: RingBufferFlags,
}

impl RingBufferDescriptor {
    /// Create a descriptor with the given geometry and no memory attached.
    pub fn new(
        bytes_per_frame: i32,
        frames_per_burst: i32,
        capacity_in_frames: i32,
        flags: RingBufferFlags,
    ) -> Self {
        Self {
            read_counter: MemoryRegionRef::unused(SEGMENT_INDEX_NONE),
            write_counter: MemoryRegionRef::unused(SEGMENT_INDEX_NONE),
            data: MemoryRegionRef::unused(SEGMENT_INDEX_NONE),
            bytes_per_frame,
            frames_per_burst,
            capacity_in_frames,
            flags,
        }
    }

    /// Reconstruct a descriptor from its wire value.
    ///
    /// Nothing is checked here; call [`validate`](Self::validate) before use.
    pub fn from_wire(wire: RingBufferWire) -> Self {
        Self {
            read_counter: wire.read_counter.into(),
            write_counter: wire.write_counter.into(),
            data: wire.data.into(),
            bytes_per_frame: wire.bytes_per_frame,
            frames_per_burst: wire.frames_per_burst,
            capacity_in_frames: wire.capacity_in_frames,
            flags: RingBufferFlags::from_wire(wire.flags),
        }
    }

    pub fn to_wire(&self) -> RingBufferWire {
        RingBufferWire {
            read_counter: self.read_counter.into(),
            write_counter: self.write_counter.into(),
            data: self.data.into(),
            bytes_per_frame: self.bytes_per_frame,
            frames_per_burst: self.frames_per_burst,
            capacity_in_frames: self.capacity_in_frames,
            flags: self.flags.to_wire(),
        }
    }

    // =========================================================================
    // Memory layout
    // =========================================================================

    /// Place data and both counters at explicit offsets in one segment.
    ///
    /// All three regions must live in `segment_index`; use
    /// [`with_regions`](Self::with_regions) when they do not.
    pub fn with_counters_at(
        mut self,
        segment_index: i32,
        data: ByteRange,
        read_counter: ByteRange,
        write_counter: ByteRange,
    ) -> Self {
        self.read_counter = read_counter.in_segment(segment_index);
        self.write_counter = write_counter.in_segment(segment_index);
        self.data = data.in_segment(segment_index);
        self
    }

    /// Place data in one segment with the counters embedded inside it.
    ///
    /// Both counter regions are left empty; the ring implementation finds the
    /// counters at fixed positions within the data region.
    pub fn with_embedded_counters(mut self, segment_index: i32, data: ByteRange) -> Self {
        self.read_counter = MemoryRegionRef::unused(segment_index);
        self.write_counter = MemoryRegionRef::unused(segment_index);
        self.data = data.in_segment(segment_index);
        self
    }

    /// Place each region independently, possibly in different segments.
    pub fn with_regions(
        mut self,
        data: MemoryRegionRef,
        read_counter: MemoryRegionRef,
        write_counter: MemoryRegionRef,
    ) -> Self {
        self.read_counter = read_counter;
        self.write_counter = write_counter;
        self.data = data;
        self
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    #[inline]
    pub fn read_counter(&self) -> MemoryRegionRef {
        self.read_counter
    }

    #[inline]
    pub fn write_counter(&self) -> MemoryRegionRef {
        self.write_counter
    }

    #[inline]
    pub fn data(&self) -> MemoryRegionRef {
        self.data
    }

    #[inline]
    pub fn bytes_per_frame(&self) -> i32 {
        self.bytes_per_frame
    }

    pub fn set_bytes_per_frame(&mut self, bytes_per_frame: i32) {
        self.bytes_per_frame = bytes_per_frame;
    }

    #[inline]
    pub fn frames_per_burst(&self) -> i32 {
        self.frames_per_burst
    }

    pub fn set_frames_per_burst(&mut self, frames_per_burst: i32) {
        self.frames_per_burst = frames_per_burst;
    }

    #[inline]
    pub fn capacity_in_frames(&self) -> i32 {
        self.capacity_in_frames
    }

    pub fn set_capacity_in_frames(&mut self, capacity_in_frames: i32) {
        self.capacity_in_frames = capacity_in_frames;
    }

    #[inline]
    pub fn flags(&self) -> RingBufferFlags {
        self.flags
    }

    pub fn set_flags(&mut self, flags: RingBufferFlags) {
        self.flags = flags;
    }

    // =========================================================================
    // Validation
    // =========================================================================

    /// Check the geometry against the default [`GeometryLimits`].
    ///
    /// Must be called on every descriptor received from another process;
    /// [`resolve`](Self::resolve) only checks region bounds.
    pub fn validate(&self) -> Result<(), DescriptorError> {
        self.validate_with(&GeometryLimits::default())
    }

    /// Check the geometry against `limits`, reporting the first bad field.
    pub fn validate_with(&self, limits: &GeometryLimits) -> Result<(), DescriptorError> {
        let checks = [
            (
                GeometryField::CapacityInFrames,
                self.capacity_in_frames,
                limits.max_capacity_in_frames,
            ),
            (
                GeometryField::BytesPerFrame,
                self.bytes_per_frame,
                limits.max_bytes_per_frame,
            ),
            (
                GeometryField::FramesPerBurst,
                self.frames_per_burst,
                limits.max_frames_per_burst,
            ),
        ];

        for (field, value, bound) in checks {
            if !(0..bound).contains(&value) {
                warn!(%field, value, bound, "invalid ring buffer geometry");
                return Err(DescriptorError::Geometry { field, value });
            }
        }
        Ok(())
    }

    // =========================================================================
    // Rebinding and resolution
    // =========================================================================

    /// Translate segment indices into another segment-table ordering.
    ///
    /// Offsets, sizes, geometry and flags are copied unchanged.
    pub fn rebind<M: SegmentIndexMap + ?Sized>(&self, map: &M) -> Result<Self, DescriptorError> {
        let translate = |region: MemoryRegionRef| {
            region.translate(map).inspect_err(|e| {
                debug!(?region, error = %e, "ring buffer rebind failed");
            })
        };

        Ok(Self {
            read_counter: translate(self.read_counter)?,
            write_counter: translate(self.write_counter)?,
            data: translate(self.data)?,
            ..*self
        })
    }

    /// Resolve the read counter, write counter and data regions, in that
    /// order, against `table`.
    ///
    /// Stops at the first region that fails; no partial result is returned.
    pub fn resolve<T: SegmentTable + ?Sized>(
        &self,
        table: &T,
    ) -> Result<ResolvedRingBuffer, DescriptorError> {
        let resolve = |region: MemoryRegionRef| {
            region.resolve(table).inspect_err(|e| {
                debug!(?region, error = %e, "ring buffer region did not resolve");
            })
        };

        let read_counter_address = resolve(self.read_counter)?;
        let write_counter_address = resolve(self.write_counter)?;
        let data_address = resolve(self.data)?;

        Ok(ResolvedRingBuffer {
            read_counter_address,
            write_counter_address,
            data_address,
            bytes_per_frame: self.bytes_per_frame,
            frames_per_burst: self.frames_per_burst,
            capacity_in_frames: self.capacity_in_frames,
            flags: self.flags,
        })
    }

    // =========================================================================
    // Diagnostics
    // =========================================================================

    pub fn describe(&self) -> RingBufferSnapshot {
        RingBufferSnapshot {
            capacity_in_frames: self.capacity_in_frames,
            bytes_per_frame: self.bytes_per_frame,
            frames_per_burst: self.frames_per_burst,
            flags: self.flags,
            read_counter: self.read_counter,
            write_counter: self.write_counter,
            data: self.data,
        }
    }

    /// Log the descriptor at debug level.
    pub fn dump(&self) {
        if self.capacity_in_frames <= 0 {
            debug!(capacity_in_frames = self.capacity_in_frames, "ring buffer (empty)");
            return;
        }
        debug!(snapshot = %self.describe(), "ring buffer");
    }
}

impl From<RingBufferWire> for RingBufferDescriptor {
    fn from(wire: RingBufferWire) -> Self {
        Self::from_wire(wire)
    }
}

impl From<RingBufferDescriptor> for RingBufferWire {
    fn from(descriptor: RingBufferDescriptor) -> Self {
        descriptor.to_wire()
    }
}

/// A descriptor resolved against a local segment table.
///
/// Addresses are null for unused regions. They stay valid only while the
/// segments they were resolved against stay mapped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResolvedRingBuffer {
    pub read_counter_address: *mut u8,
    pub write_counter_address: *mut u8,
    pub data_address: *mut u8,
    pub bytes_per_frame: i32,
    pub frames_per_burst: i32,
    pub capacity_in_frames: i32,
    pub flags: RingBufferFlags,
}

// SAFETY: the addresses are plain values; dereferencing them is up to the
// ring reader/writer, which synchronizes through the counters.
unsafe impl Send for ResolvedRingBuffer {}
unsafe impl Sync for ResolvedRingBuffer {}

impl ResolvedRingBuffer {
    /// True when the counters live inside the data region.
    #[inline]
    pub fn has_embedded_counters(&self) -> bool {
        self.read_counter_address.is_null() && self.write_counter_address.is_null()
    }

    #[inline]
    pub fn counter_width(&self) -> CounterWidth {
        self.flags.counter_width()
    }

    /// Bytes needed for `capacity_in_frames` frames, or `None` if the
    /// geometry is negative.
    pub fn data_size_bytes(&self) -> Option<usize> {
        let bytes = i64::from(self.capacity_in_frames) * i64::from(self.bytes_per_frame);
        usize::try_from(bytes).ok()
    }
}

/// Point-in-time copy of every descriptor field, for logging.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RingBufferSnapshot {
    pub capacity_in_frames: i32,
    pub bytes_per_frame: i32,
    pub frames_per_burst: i32,
    pub flags: RingBufferFlags,
    pub read_counter: MemoryRegionRef,
    pub write_counter: MemoryRegionRef,
    pub data: MemoryRegionRef,
}

impl std::fmt::Display for RingBufferSnapshot {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        fn region(
            f: &mut std::fmt::Formatter<'_>,
            name: &str,
            r: &MemoryRegionRef,
        ) -> std::fmt::Result {
            write!(
                f,
                " {}=[seg {} @{} +{}]",
                name, r.segment_index, r.offset_bytes, r.size_bytes
            )
        }

        write!(
            f,
            "capacity={} bytes_per_frame={} frames_per_burst={} flags={:#x}",
            self.capacity_in_frames,
            self.bytes_per_frame,
            self.frames_per_burst,
            self.flags.bits()
        )?;
        region(f, "read", &self.read_counter)?;
        region(f, "write", &self.write_counter)?;
        region(f, "data", &self.data)
    }
}
