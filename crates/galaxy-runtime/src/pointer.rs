//! Pointer-to-world tracking: screen ray unprojection and reference plane
//! intersection.

use glam::{Mat4, Vec2, Vec3};

/// Anything that can provide a view-projection transform for unprojecting
/// pointer coordinates (the scene camera, or a bare matrix in tests).
pub trait ViewProjection {
    fn view_projection(&self) -> Mat4;

    fn inverse_view_projection(&self) -> Mat4 {
        self.view_projection().inverse()
    }
}

impl ViewProjection for Mat4 {
    fn view_projection(&self) -> Mat4 {
        *self
    }
}

/// Infinite plane `dot(normal, p) == distance`, never drawn
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ReferencePlane {
    pub normal: Vec3,
    pub distance: f32,
}

impl ReferencePlane {
    /// Horizontal plane at the given height (y-up)
    pub fn horizontal(height: f32) -> Self {
        Self {
            normal: Vec3::Y,
            distance: height,
        }
    }
}

impl Default for ReferencePlane {
    fn default() -> Self {
        Self::horizontal(0.0)
    }
}

/// Where the pointer landed in world space.
///
/// Only ever moves from `NotYetTracked` to `Tracking`, or from one tracked
/// point to another. A miss never clears it.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum PointerTrack {
    #[default]
    NotYetTracked,
    Tracking(Vec3),
}

impl PointerTrack {
    pub fn point(&self) -> Option<Vec3> {
        match self {
            PointerTrack::Tracking(p) => Some(*p),
            PointerTrack::NotYetTracked => None,
        }
    }
}

/// Pointer position in NDC plus the last known world point
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct PointerState {
    /// Normalized device coordinates, both axes in [-1, 1], y up
    pub ndc: Vec2,
    pub world: PointerTrack,
}

/// Convert window pixel coordinates (origin top-left, y down) to NDC
pub fn ndc_from_pixels(x: f64, y: f64, width: u32, height: u32) -> Vec2 {
    let w = width.max(1) as f64;
    let h = height.max(1) as f64;
    Vec2::new(
        ((x / w) * 2.0 - 1.0) as f32,
        (1.0 - (y / h) * 2.0) as f32,
    )
}

/// Compute a world-space ray through an NDC coordinate.
/// Returns (origin on the near plane, normalized direction).
///
/// Depth is in wgpu's [0, 1] clip convention.
pub fn screen_ray(camera: &impl ViewProjection, ndc: Vec2) -> (Vec3, Vec3) {
    let inv_vp = camera.inverse_view_projection();

    let near = inv_vp.project_point3(Vec3::new(ndc.x, ndc.y, 0.0));
    let far = inv_vp.project_point3(Vec3::new(ndc.x, ndc.y, 1.0));

    let dir = (far - near).try_normalize().unwrap_or(Vec3::NEG_Z);
    (near, dir)
}

/// Intersect a ray with a plane.
/// Returns None if the ray is parallel to the plane or points away from it.
pub fn ray_plane_intersect(ray_o: Vec3, ray_d: Vec3, plane: &ReferencePlane) -> Option<Vec3> {
    let denom = plane.normal.dot(ray_d);
    if denom.abs() < 1e-6 {
        return None;
    }
    let t = (plane.distance - plane.normal.dot(ray_o)) / denom;
    if t < 0.0 || !t.is_finite() {
        return None;
    }
    Some(ray_o + ray_d * t)
}

/// Update pointer state for a move to `ndc`.
///
/// The NDC position always updates; the world point only updates on a hit.
pub fn on_pointer_move(
    state: PointerState,
    ndc: Vec2,
    camera: &impl ViewProjection,
    plane: &ReferencePlane,
) -> PointerState {
    let (origin, dir) = screen_ray(camera, ndc);
    let world = match ray_plane_intersect(origin, dir, plane) {
        Some(hit) => PointerTrack::Tracking(hit),
        None => state.world,
    };
    PointerState { ndc, world }
}

/// Best-effort continuous pointer tracker against one reference plane
#[derive(Debug, Clone, Default)]
pub struct PointerTracker {
    plane: ReferencePlane,
    state: PointerState,
}

impl PointerTracker {
    pub fn new(plane: ReferencePlane) -> Self {
        Self {
            plane,
            state: PointerState::default(),
        }
    }

    pub fn plane(&self) -> &ReferencePlane {
        &self.plane
    }

    pub fn state(&self) -> &PointerState {
        &self.state
    }

    pub fn on_pointer_move(
        &mut self,
        ndc_x: f32,
        ndc_y: f32,
        camera: &impl ViewProjection,
    ) -> &PointerState {
        self.state = on_pointer_move(self.state, Vec2::new(ndc_x, ndc_y), camera, &self.plane);
        &self.state
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn camera(eye: Vec3, target: Vec3) -> Mat4 {
        let proj = Mat4::perspective_rh(75f32.to_radians(), 16.0 / 9.0, 0.1, 100.0);
        let view = Mat4::look_at_rh(eye, target, Vec3::Y);
        proj * view
    }

    #[test]
    fn ndc_from_pixel_corners() {
        let tl = ndc_from_pixels(0.0, 0.0, 800, 600);
        assert!((tl.x + 1.0).abs() < 1e-6);
        assert!((tl.y - 1.0).abs() < 1e-6);

        let center = ndc_from_pixels(400.0, 300.0, 800, 600);
        assert!(center.x.abs() < 1e-6);
        assert!(center.y.abs() < 1e-6);
    }

    #[test]
    fn center_ray_hits_ground_plane() {
        let cam = camera(Vec3::new(0.0, 2.0, 2.0), Vec3::ZERO);
        let mut tracker = PointerTracker::new(ReferencePlane::horizontal(0.0));
        let state = tracker.on_pointer_move(0.0, 0.0, &cam);

        let hit = state.world.point().expect("center ray should hit the plane");
        assert!(hit.y.abs() < 1e-4);
        // Camera looks straight at the origin
        assert!(hit.x.abs() < 1e-3);
        assert!(hit.z.abs() < 1e-3);
    }

    #[test]
    fn diverging_ray_keeps_last_point() {
        let plane = ReferencePlane::horizontal(0.0);
        let down = camera(Vec3::new(0.0, 2.0, 2.0), Vec3::ZERO);
        let up = camera(Vec3::new(0.0, 2.0, 2.0), Vec3::new(0.0, 5.0, 0.0));

        let tracked = on_pointer_move(PointerState::default(), Vec2::ZERO, &down, &plane);
        let before = tracked.world;
        assert!(matches!(before, PointerTrack::Tracking(_)));

        let after = on_pointer_move(tracked, Vec2::new(0.1, 0.2), &up, &plane);
        assert_eq!(after.world, before);
        assert_eq!(after.ndc, Vec2::new(0.1, 0.2));
    }

    #[test]
    fn miss_before_any_hit_stays_untracked() {
        let plane = ReferencePlane::horizontal(0.0);
        let up = camera(Vec3::new(0.0, 1.0, 0.0), Vec3::new(0.0, 3.0, -1.0));
        let state = on_pointer_move(PointerState::default(), Vec2::ZERO, &up, &plane);
        assert_eq!(state.world, PointerTrack::NotYetTracked);
    }

    #[test]
    fn parallel_ray_misses() {
        let plane = ReferencePlane::horizontal(0.0);
        let hit = ray_plane_intersect(Vec3::new(0.0, 1.0, 0.0), Vec3::X, &plane);
        assert!(hit.is_none());
    }

    #[test]
    fn raised_plane_intersection() {
        let plane = ReferencePlane::horizontal(0.5);
        let hit = ray_plane_intersect(Vec3::new(1.0, 3.0, 1.0), Vec3::NEG_Y, &plane).unwrap();
        assert!((hit - Vec3::new(1.0, 0.5, 1.0)).length() < 1e-6);
    }
}
