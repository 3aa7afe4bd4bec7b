//! Perspective camera with damped orbit controls

use galaxy_runtime::ViewProjection;
use glam::{Mat4, Vec3};

/// Fraction of the pending orbit motion applied per frame
pub const DEFAULT_DAMPING: f32 = 0.05;

/// A perspective camera orbiting a target point
#[derive(Debug, Clone)]
pub struct Camera {
    /// Target point the camera looks at
    pub target: Vec3,
    /// Field of view in degrees
    pub fov: f32,
    /// Near clipping plane
    pub near: f32,
    /// Far clipping plane
    pub far: f32,
    /// Aspect ratio (width / height)
    pub aspect: f32,

    /// Distance from target
    pub distance: f32,
    /// Horizontal angle in radians
    pub yaw: f32,
    /// Vertical angle in radians
    pub pitch: f32,
    pub min_distance: f32,
    pub max_distance: f32,

    /// Orbit motion still to be applied: (yaw, pitch, zoom)
    pending: Vec3,
    damping: f32,
}

impl Default for Camera {
    fn default() -> Self {
        Self::looking_at(Vec3::new(0.0, 2.0, 2.0), Vec3::ZERO, 75.0)
    }
}

impl Camera {
    /// Place the camera at `position` looking at `target`
    pub fn looking_at(position: Vec3, target: Vec3, fov: f32) -> Self {
        let offset = position - target;
        let distance = offset.length().max(1e-3);
        let pitch = (offset.y / distance).clamp(-1.0, 1.0).asin();
        let yaw = offset.x.atan2(offset.z);

        Self {
            target,
            fov,
            near: 0.1,
            far: 100.0,
            aspect: 16.0 / 9.0,
            distance,
            yaw,
            pitch,
            min_distance: 0.5,
            max_distance: 20.0,
            pending: Vec3::ZERO,
            damping: DEFAULT_DAMPING,
        }
    }

    /// Damping factor in (0, 1]; 1.0 applies input immediately
    pub fn set_damping(&mut self, damping: f32) {
        self.damping = damping.clamp(1e-3, 1.0);
    }

    /// Camera position derived from the orbit parameters
    pub fn position(&self) -> Vec3 {
        let x = self.distance * self.pitch.cos() * self.yaw.sin();
        let y = self.distance * self.pitch.sin();
        let z = self.distance * self.pitch.cos() * self.yaw.cos();
        self.target + Vec3::new(x, y, z)
    }

    /// Queue an orbit rotation (radians)
    pub fn orbit(&mut self, d_yaw: f32, d_pitch: f32) {
        self.pending.x += d_yaw;
        self.pending.y += d_pitch;
    }

    /// Queue a zoom; positive moves closer
    pub fn zoom(&mut self, delta: f32) {
        self.pending.z += delta;
    }

    /// Apply a damped share of the pending motion. Call once per frame.
    pub fn update(&mut self) {
        let step = self.pending * self.damping;
        self.pending -= step;

        self.yaw += step.x;
        // Clamp pitch short of the poles so the up vector stays valid
        self.pitch = (self.pitch + step.y).clamp(-1.56, 1.56);
        self.distance = (self.distance - step.z).clamp(self.min_distance, self.max_distance);
    }

    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_at_rh(self.position(), self.target, Vec3::Y)
    }

    pub fn projection_matrix(&self) -> Mat4 {
        Mat4::perspective_rh(self.fov.to_radians(), self.aspect, self.near, self.far)
    }

    pub fn view_projection_matrix(&self) -> Mat4 {
        self.projection_matrix() * self.view_matrix()
    }

    /// Camera right vector (world space)
    pub fn right_vector(&self) -> Vec3 {
        let forward = (self.target - self.position()).normalize_or(Vec3::NEG_Z);
        forward.cross(Vec3::Y).normalize_or(Vec3::X)
    }

    /// Camera up vector (world space, perpendicular to forward and right)
    pub fn up_vector(&self) -> Vec3 {
        let forward = (self.target - self.position()).normalize_or(Vec3::NEG_Z);
        self.right_vector().cross(forward)
    }
}

impl ViewProjection for Camera {
    fn view_projection(&self) -> Mat4 {
        self.view_projection_matrix()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use galaxy_runtime::{PointerTracker, ReferencePlane};

    #[test]
    fn looking_at_round_trips_position() {
        let cam = Camera::looking_at(Vec3::new(0.0, 2.0, 2.0), Vec3::ZERO, 75.0);
        assert!((cam.position() - Vec3::new(0.0, 2.0, 2.0)).length() < 1e-5);
    }

    #[test]
    fn damped_orbit_converges() {
        let mut cam = Camera::default();
        let start_yaw = cam.yaw;
        cam.orbit(0.5, 0.0);
        cam.update();
        let partial = cam.yaw - start_yaw;
        assert!(partial > 0.0 && partial < 0.5);

        for _ in 0..2000 {
            cam.update();
        }
        assert!((cam.yaw - start_yaw - 0.5).abs() < 1e-3);
    }

    #[test]
    fn zoom_respects_limits() {
        let mut cam = Camera::default();
        cam.set_damping(1.0);
        cam.zoom(100.0);
        cam.update();
        assert_eq!(cam.distance, cam.min_distance);
    }

    #[test]
    fn basis_is_orthonormal() {
        let cam = Camera::default();
        let r = cam.right_vector();
        let u = cam.up_vector();
        assert!((r.length() - 1.0).abs() < 1e-5);
        assert!((u.length() - 1.0).abs() < 1e-5);
        assert!(r.dot(u).abs() < 1e-5);
    }

    #[test]
    fn tracker_hits_origin_from_default_pose() {
        let cam = Camera::default();
        let mut tracker = PointerTracker::new(ReferencePlane::horizontal(0.0));
        let hit = tracker.on_pointer_move(0.0, 0.0, &cam).world.point().unwrap();
        assert!(hit.length() < 1e-2);
    }
}
