//! Shading target trait

use glam::Vec3;

/// Something whose shading parameters are driven by the frame clock.
///
/// Implementors must only touch their uniform set; geometry is never
/// modified from the update loop.
pub trait ShadingTarget {
    /// Push the global clock value for this frame
    fn set_time(&mut self, time: f32);

    /// Push the tracked pointer world point
    fn set_pointer(&mut self, point: Vec3);

    /// Whether this target reacts to the pointer at all
    fn receives_pointer(&self) -> bool {
        true
    }
}
