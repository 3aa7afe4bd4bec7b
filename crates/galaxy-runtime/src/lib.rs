//! Galaxy Runtime - Per-frame loop infrastructure
//!
//! Provides the building blocks the update loop is made of:
//! - `FrameClock`: fixed-step clock that fans time out to every field
//! - `PointerTracker`: pointer-to-world mapping via a reference plane
//! - `HostEvent` / `HostEventQueue`: injected resize and pointer input
//! - `Viewport`: drawable size and pixel ratio
//! - `ShadingTarget`: trait for anything that receives per-frame uniforms

mod clock;
mod event_bus;
mod pointer;
mod system;
mod viewport;

pub use clock::{advance, ClockPhase, FrameClock, FrameState, DEFAULT_TIME_STEP};
pub use event_bus::{EventSource, HostEvent, HostEventQueue};
pub use pointer::{
    ndc_from_pixels, on_pointer_move, ray_plane_intersect, screen_ray, PointerState,
    PointerTrack, PointerTracker, ReferencePlane, ViewProjection,
};
pub use system::ShadingTarget;
pub use viewport::{Viewport, MAX_PIXEL_RATIO};
