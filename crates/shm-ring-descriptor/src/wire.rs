//! Plain values exchanged between processes.
//!
//! These carry no invariants: everything in them is untrusted until it has
//! gone through [`RingBufferDescriptor::validate`](crate::RingBufferDescriptor::validate)
//! and [`RingBufferDescriptor::resolve`](crate::RingBufferDescriptor::resolve).

use facet::Facet;

/// One memory region as sent over the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Facet)]
pub struct RegionWire {
    pub segment_index: i32,
    pub offset_bytes: i32,
    pub size_bytes: i32,
}

/// A ring buffer descriptor as sent over the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Facet)]
pub struct RingBufferWire {
    pub read_counter: RegionWire,
    pub write_counter: RegionWire,
    pub data: RegionWire,
    pub bytes_per_frame: i32,
    pub frames_per_burst: i32,
    pub capacity_in_frames: i32,
    pub flags: i32,
}
