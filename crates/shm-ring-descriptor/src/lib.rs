//! Cross-process descriptors for shared-memory SPSC ring buffers.
//!
//! A producer describes where a ring buffer's read counter, write counter and
//! data live as `(segment index, offset, size)` triples plus the ring
//! geometry. The description crosses the process boundary as a plain
//! [`RingBufferWire`] value. The consumer rebuilds a [`RingBufferDescriptor`],
//! optionally [rebinds](RingBufferDescriptor::rebind) it to its own segment
//! numbering, [validates](RingBufferDescriptor::validate) it, and
//! [resolves](RingBufferDescriptor::resolve) it against its local
//! [`SegmentTable`] into a [`ResolvedRingBuffer`] of live addresses.
//!
//! ```text
//!  producer                               consumer
//!  RingBufferDescriptor ──to_wire──▶ RingBufferWire ──from_wire──▶ RingBufferDescriptor
//!                                                                     │ rebind (optional)
//!                                                                     │ validate
//!                                                                     ▼ resolve(table)
//!                                                               ResolvedRingBuffer
//! ```
//!
//! Everything arriving over the wire is untrusted. Validation checks the
//! geometry and resolution checks every region against its segment using
//! widened arithmetic; both must pass before the ring is used.

#![forbid(unsafe_op_in_unsafe_fn)]

pub mod descriptor;
pub mod error;
pub mod flags;
pub mod limits;
pub mod rebind;
pub mod region;
pub mod segment;
pub mod wire;

pub use descriptor::{ByteRange, ResolvedRingBuffer, RingBufferDescriptor, RingBufferSnapshot};
pub use error::{DescriptorError, GeometryField};
pub use flags::{CounterWidth, RingBufferFlags};
pub use limits::GeometryLimits;
pub use rebind::SegmentIndexMap;
pub use region::{MemoryRegionRef, SEGMENT_INDEX_NONE};
pub use segment::{HeapSegment, Segment, SegmentTable};
pub use wire::{RegionWire, RingBufferWire};
