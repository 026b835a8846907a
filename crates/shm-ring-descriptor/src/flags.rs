//! Ring buffer flags carried alongside the geometry.

use bitflags::bitflags;
use static_assertions::const_assert_eq;

bitflags! {
    /// Flags describing how the ring buffer counters are laid out and used.
    ///
    /// The representation is exactly the wire `flags` field; unknown bits are
    /// kept as-is so a descriptor survives a round trip unchanged.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct RingBufferFlags: i32 {
        /// Read and write counters are 64 bits wide (32 bits when clear).
        const COUNTER_64   = 0b0001;
        /// Consumer paces itself against the producer's burst rate.
        const RATE_LIMITED = 0b0010;
        /// Read counter is shared with another stream.
        const READ_SHARED  = 0b0100;
        /// Write counter is shared with another stream.
        const WRITE_SHARED = 0b1000;
    }
}

const_assert_eq!(
    core::mem::size_of::<RingBufferFlags>(),
    core::mem::size_of::<i32>()
);

/// Width of the read and write counters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CounterWidth {
    Bits32,
    Bits64,
}

impl CounterWidth {
    /// Size of one counter in bytes.
    #[inline]
    pub fn size_bytes(self) -> usize {
        match self {
            Self::Bits32 => 4,
            Self::Bits64 => 8,
        }
    }
}

impl RingBufferFlags {
    /// Reinterpret a wire flags value. Every bit pattern is accepted.
    #[inline]
    pub fn from_wire(raw: i32) -> Self {
        Self::from_bits_retain(raw)
    }

    /// The wire flags value, bit for bit.
    #[inline]
    pub fn to_wire(self) -> i32 {
        self.bits()
    }

    #[inline]
    pub fn counter_width(self) -> CounterWidth {
        if self.contains(Self::COUNTER_64) {
            CounterWidth::Bits64
        } else {
            CounterWidth::Bits32
        }
    }
}
