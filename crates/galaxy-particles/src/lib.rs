//! Galaxy Particles - procedural particle layers
//!
//! Provides the CPU side of the galaxy:
//! - Layer descriptors parsed from TOML, with spiral and disc shapes
//! - A deterministic distribution generator driven by any `RandomSource`
//! - Particle fields that own generated positions and per-frame uniforms

pub mod buffer;
pub mod distribution;
pub mod field;
pub mod layer;
pub mod random;

use galaxy_core::TextureHandle;

pub use buffer::PositionBuffer;
pub use distribution::{branch_fraction, generate, lerp};
pub use field::{ParticleField, ShadingParams};
pub use layer::{DistributionShape, LayerDescriptor, SpiralParams, MAX_PARTICLES};
pub use random::{galaxy_rng, RandomSource};

/// Every layer of the galaxy, built once at setup
#[derive(Debug, Default)]
pub struct Galaxy {
    pub fields: Vec<ParticleField>,
}

impl Galaxy {
    /// Build one field per descriptor.
    ///
    /// A malformed descriptor only costs its own layer: it is logged and
    /// skipped, the remaining layers are still built.
    pub fn build<R: RandomSource + ?Sized>(
        descriptors: &[LayerDescriptor],
        rng: &mut R,
        texture: TextureHandle,
    ) -> Self {
        let mut fields = Vec::with_capacity(descriptors.len());
        for descriptor in descriptors {
            match ParticleField::build(descriptor, rng, texture) {
                Ok(field) => {
                    log::info!(
                        "Layer '{}': {} particles",
                        field.name(),
                        field.instance_count()
                    );
                    fields.push(field);
                }
                Err(e) => log::warn!("Skipping layer: {e}"),
            }
        }
        Self { fields }
    }

    pub fn total_particles(&self) -> usize {
        self.fields.iter().map(|f| f.positions().count()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use galaxy_runtime::{FrameClock, PointerState, PointerTrack};
    use glam::{Vec2, Vec3};

    fn layers() -> Vec<LayerDescriptor> {
        vec![
            LayerDescriptor {
                name: "arms".into(),
                count: 300,
                ..Default::default()
            },
            LayerDescriptor {
                name: "broken".into(),
                shape: DistributionShape::Spiral(SpiralParams {
                    branches: 0,
                    ..Default::default()
                }),
                ..Default::default()
            },
            LayerDescriptor {
                name: "dust".into(),
                count: 100,
                shape: DistributionShape::Disc { thickness: 0.2 },
                interactive: false,
                ..Default::default()
            },
        ]
    }

    #[test]
    fn invalid_layer_does_not_block_others() {
        let galaxy = Galaxy::build(&layers(), &mut galaxy_rng(Some(1)), TextureHandle(0));
        let names: Vec<&str> = galaxy.fields.iter().map(|f| f.name()).collect();
        assert_eq!(names, ["arms", "dust"]);
        assert_eq!(galaxy.total_particles(), 400);
    }

    #[test]
    fn oversized_layer_is_skipped() {
        let mut descriptors = layers();
        descriptors.push(LayerDescriptor {
            name: "huge".into(),
            count: usize::MAX / 2,
            ..Default::default()
        });
        let galaxy = Galaxy::build(&descriptors, &mut galaxy_rng(Some(1)), TextureHandle(0));
        let names: Vec<&str> = galaxy.fields.iter().map(|f| f.name()).collect();
        assert_eq!(names, ["arms", "dust"]);
    }

    #[test]
    fn clock_fans_out_to_every_field() {
        let mut galaxy = Galaxy::build(&layers(), &mut galaxy_rng(Some(1)), TextureHandle(0));
        let mut clock = FrameClock::with_step(0.25);
        let pointer = PointerState {
            ndc: Vec2::ZERO,
            world: PointerTrack::Tracking(Vec3::new(0.3, 0.0, 0.1)),
        };

        for _ in 0..4 {
            clock.tick(&mut galaxy.fields, &pointer);
        }

        for field in &galaxy.fields {
            assert_eq!(field.shading().time, 1.0);
        }
        assert_eq!(galaxy.fields[0].shading().pointer, Some(Vec3::new(0.3, 0.0, 0.1)));
        assert_eq!(galaxy.fields[1].shading().pointer, None);
    }
}
