//! Particle fields: one generated layer plus its shading parameters

use crate::buffer::PositionBuffer;
use crate::distribution::generate;
use crate::layer::LayerDescriptor;
use crate::random::RandomSource;
use galaxy_core::{Result, Rgb, TextureHandle};
use galaxy_runtime::{ShadingTarget, Viewport};
use glam::Vec3;

/// Per-layer uniform set consumed by the shading program
#[derive(Debug, Clone, PartialEq)]
pub struct ShadingParams {
    pub time: f32,
    pub size: f32,
    pub color: Rgb,
    pub texture: TextureHandle,
    /// Last tracked pointer world point; `None` until the first hit
    pub pointer: Option<Vec3>,
    pub amplitude: Option<f32>,
    /// `vec4(width, height, pixel_ratio, aspect)`
    pub resolution: [f32; 4],
}

/// One layer of the galaxy.
///
/// The position buffer is fixed at construction; per-frame updates only
/// touch `ShadingParams`.
#[derive(Debug)]
pub struct ParticleField {
    name: String,
    positions: PositionBuffer,
    shading: ShadingParams,
    interactive: bool,
}

impl ParticleField {
    /// Generate the layer's positions and bind its shading parameters
    pub fn build<R: RandomSource + ?Sized>(
        descriptor: &LayerDescriptor,
        rng: &mut R,
        texture: TextureHandle,
    ) -> Result<Self> {
        let positions = generate(descriptor, rng)?;
        Ok(Self {
            name: descriptor.name.clone(),
            positions,
            shading: ShadingParams {
                time: 0.0,
                size: descriptor.size,
                color: descriptor.color,
                texture,
                pointer: None,
                amplitude: descriptor.amplitude,
                resolution: Viewport::default().resolution(),
            },
            interactive: descriptor.interactive,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn positions(&self) -> &PositionBuffer {
        &self.positions
    }

    pub fn shading(&self) -> &ShadingParams {
        &self.shading
    }

    pub fn is_interactive(&self) -> bool {
        self.interactive
    }

    /// Number of instances the renderer draws for this field
    pub fn instance_count(&self) -> u32 {
        // Validation caps the count well below u32::MAX
        u32::try_from(self.positions.count()).unwrap_or(u32::MAX)
    }

    pub fn set_resolution(&mut self, viewport: &Viewport) {
        self.shading.resolution = viewport.resolution();
    }
}

impl ShadingTarget for ParticleField {
    fn set_time(&mut self, time: f32) {
        self.shading.time = time;
    }

    fn set_pointer(&mut self, point: Vec3) {
        self.shading.pointer = Some(point);
    }

    fn receives_pointer(&self) -> bool {
        self.interactive
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::random::galaxy_rng;

    fn field(interactive: bool) -> ParticleField {
        let desc = LayerDescriptor {
            count: 64,
            interactive,
            amplitude: Some(0.3),
            ..Default::default()
        };
        ParticleField::build(&desc, &mut galaxy_rng(Some(11)), TextureHandle(0)).unwrap()
    }

    #[test]
    fn build_binds_descriptor_values() {
        let f = field(true);
        assert_eq!(f.instance_count(), 64);
        assert_eq!(f.shading().texture, TextureHandle(0));
        assert_eq!(f.shading().amplitude, Some(0.3));
        assert_eq!(f.shading().pointer, None);
    }

    #[test]
    fn uniform_updates_leave_positions_alone() {
        let mut f = field(true);
        let before = f.positions().clone();

        f.set_time(4.2);
        f.set_pointer(Vec3::new(0.5, 0.0, 0.5));
        f.set_resolution(&Viewport::new(640, 480, 1.0));

        assert_eq!(f.positions(), &before);
        assert!((f.shading().time - 4.2).abs() < 1e-6);
        assert_eq!(f.shading().pointer, Some(Vec3::new(0.5, 0.0, 0.5)));
        assert_eq!(f.shading().resolution[0], 640.0);
    }

    #[test]
    fn non_interactive_field_declines_pointer() {
        assert!(!field(false).receives_pointer());
        assert!(field(true).receives_pointer());
    }
}
