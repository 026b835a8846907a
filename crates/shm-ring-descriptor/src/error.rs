//! Errors produced while validating, rebinding, or resolving a descriptor.

/// Geometry field named by a [`DescriptorError::Geometry`] failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GeometryField {
    CapacityInFrames,
    BytesPerFrame,
    FramesPerBurst,
}

impl GeometryField {
    /// Field name as it appears in the wire value.
    pub fn name(self) -> &'static str {
        match self {
            Self::CapacityInFrames => "capacity_in_frames",
            Self::BytesPerFrame => "bytes_per_frame",
            Self::FramesPerBurst => "frames_per_burst",
        }
    }
}

impl std::fmt::Display for GeometryField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Errors from descriptor validation, rebinding and resolution.
///
/// Any of these means the descriptor must not be used to build a ring buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DescriptorError {
    /// A geometry value is outside its allowed range.
    Geometry { field: GeometryField, value: i32 },
    /// A region references a segment index that has no entry.
    SegmentNotFound { index: i32 },
    /// A region does not fit inside its segment.
    OutOfBounds {
        index: i32,
        offset: i32,
        size: i32,
        segment_len: usize,
    },
}

impl std::fmt::Display for DescriptorError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Geometry { field, value } => write!(f, "invalid {} = {}", field, value),
            Self::SegmentNotFound { index } => write!(f, "segment {} not found", index),
            Self::OutOfBounds {
                index,
                offset,
                size,
                segment_len,
            } => {
                write!(
                    f,
                    "region out of bounds: segment {} offset {} size {} exceeds length {}",
                    index, offset, size, segment_len
                )
            }
        }
    }
}

impl std::error::Error for DescriptorError {}
