//! The per-frame driver, independent of any window or GPU
//!
//! Host callbacks only enqueue `HostEvent`s; `Experience::frame` drains
//! them, advances the clock, and pushes the new uniforms into every field.

use crate::config::ExperienceSettings;
use galaxy_particles::Galaxy;
use galaxy_render::Camera;
use galaxy_runtime::{
    ndc_from_pixels, EventSource, FrameClock, FrameState, HostEvent, PointerState,
    PointerTracker, ReferencePlane, Viewport,
};
use glam::{Vec2, Vec3};

/// Orbit radians per physical pixel of drag
const ORBIT_SPEED: f32 = 0.005;
/// Distance units per wheel line
const ZOOM_SPEED: f32 = 0.25;

pub struct Experience {
    pub galaxy: Galaxy,
    camera: Camera,
    clock: FrameClock,
    pointer: PointerTracker,
    viewport: Viewport,
    dragging: bool,
    last_cursor: Option<Vec2>,
    running: bool,
}

impl Experience {
    pub fn new(settings: &ExperienceSettings, mut galaxy: Galaxy, viewport: Viewport) -> Self {
        let mut camera = Camera::looking_at(
            Vec3::from_array(settings.camera_position),
            Vec3::from_array(settings.camera_target),
            settings.fov,
        );
        camera.set_damping(settings.damping);
        camera.aspect = viewport.aspect();

        for field in &mut galaxy.fields {
            field.set_resolution(&viewport);
        }

        Self {
            galaxy,
            camera,
            clock: FrameClock::with_step(settings.time_step),
            pointer: PointerTracker::new(ReferencePlane::horizontal(
                settings.pointer_plane_height,
            )),
            viewport,
            dragging: false,
            last_cursor: None,
            running: true,
        }
    }

    pub fn camera(&self) -> &Camera {
        &self.camera
    }

    pub fn viewport(&self) -> &Viewport {
        &self.viewport
    }

    pub fn pointer(&self) -> &PointerState {
        self.pointer.state()
    }

    pub fn clock(&self) -> &FrameClock {
        &self.clock
    }

    /// False once a `Teardown` event has been seen
    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn handle_event(&mut self, event: HostEvent) {
        match event {
            HostEvent::Resized {
                width,
                height,
                pixel_ratio,
            } => {
                self.viewport = Viewport::new(width, height, pixel_ratio);
                self.camera.aspect = self.viewport.aspect();
                for field in &mut self.galaxy.fields {
                    field.set_resolution(&self.viewport);
                }
            }
            HostEvent::PointerMoved { x, y } => {
                let cursor = Vec2::new(x as f32, y as f32);
                if self.dragging {
                    if let Some(last) = self.last_cursor {
                        let delta = cursor - last;
                        self.camera
                            .orbit(-delta.x * ORBIT_SPEED, delta.y * ORBIT_SPEED);
                    }
                }
                self.last_cursor = Some(cursor);

                let ndc = ndc_from_pixels(x, y, self.viewport.width, self.viewport.height);
                self.pointer.on_pointer_move(ndc.x, ndc.y, &self.camera);
            }
            HostEvent::PointerButton { pressed } => {
                self.dragging = pressed;
            }
            HostEvent::Wheel { delta } => {
                self.camera.zoom(delta * ZOOM_SPEED);
            }
            HostEvent::Teardown => {
                if self.running {
                    log::info!("Experience torn down after {} frames", self.clock.state().frame);
                }
                self.running = false;
            }
        }
    }

    /// Run one frame: drain pending host events, then tick.
    /// Returns `None` once torn down; the host must stop scheduling frames.
    pub fn frame(&mut self, events: &mut impl EventSource) -> Option<FrameState> {
        for event in events.drain() {
            self.handle_event(event);
        }
        if !self.running {
            return None;
        }
        Some(self.tick())
    }

    /// Advance the clock and push time and pointer into every field
    pub fn tick(&mut self) -> FrameState {
        self.camera.update();
        self.clock
            .tick(self.galaxy.fields.iter_mut(), self.pointer.state())
    }
}
