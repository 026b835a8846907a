//! Geometry limits for descriptor validation.

/// Exclusive upper bounds for ring buffer geometry.
///
/// All geometry values must also be non-negative.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GeometryLimits {
    /// Capacity bound in frames (default: 32768).
    pub max_capacity_in_frames: i32,
    /// Frame size bound in bytes (default: 256).
    pub max_bytes_per_frame: i32,
    /// Burst size bound in frames (default: 16384).
    pub max_frames_per_burst: i32,
}

impl Default for GeometryLimits {
    fn default() -> Self {
        Self {
            max_capacity_in_frames: 32 * 1024,
            max_bytes_per_frame: 256,
            max_frames_per_burst: 16 * 1024,
        }
    }
}
