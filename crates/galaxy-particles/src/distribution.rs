//! Procedural placement of particles into spiral arms or a flat disc

use crate::buffer::PositionBuffer;
use crate::layer::{DistributionShape, LayerDescriptor, SpiralParams};
use crate::random::RandomSource;
use galaxy_core::{GalaxyError, Result};
use std::f32::consts::TAU;

/// Linear interpolation between two floats
pub fn lerp(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t
}

/// Fraction in [0, 1) selecting which arm particle `i` belongs to.
///
/// Uses `|branches|` so negative branch counts still yield exactly
/// `|branches|` distinct values.
pub fn branch_fraction(i: usize, branches: i32) -> f32 {
    let arms = branches.unsigned_abs() as usize;
    if arms == 0 {
        return 0.0;
    }
    (i % arms) as f32 / arms as f32
}

/// Generate the position buffer for one layer.
///
/// Deterministic for a given random source state. Fails with
/// `InvalidDescriptor` before drawing any numbers if the descriptor is
/// malformed.
pub fn generate<R: RandomSource + ?Sized>(
    descriptor: &LayerDescriptor,
    rng: &mut R,
) -> Result<PositionBuffer> {
    descriptor.validate()?;

    let len = descriptor.count.checked_mul(3).ok_or_else(|| {
        GalaxyError::invalid_descriptor(&descriptor.name, "count overflows the position buffer")
    })?;
    let mut data = Vec::with_capacity(len);
    for i in 0..descriptor.count {
        let radius = lerp(descriptor.min_radius, descriptor.max_radius, rng.next_unit());
        let theta = rng.next_unit() * TAU;

        let p = match descriptor.shape {
            DistributionShape::Spiral(spiral) => spiral_point(i, radius, theta, &spiral, rng),
            DistributionShape::Disc { thickness } => {
                let y = (rng.next_unit() - 0.5) * thickness;
                [radius * theta.sin(), y, radius * theta.cos()]
            }
        };
        data.extend_from_slice(&p);
    }

    log::debug!(
        "Generated {} particles for layer '{}'",
        descriptor.count,
        descriptor.name
    );
    Ok(PositionBuffer::from_vec(data))
}

fn spiral_point<R: RandomSource + ?Sized>(
    i: usize,
    radius: f32,
    theta: f32,
    spiral: &SpiralParams,
    rng: &mut R,
) -> [f32; 3] {
    let direction = spiral.branches.signum() as f32;
    let branch_angle = direction * branch_fraction(i, spiral.branches) * theta;
    let spin_angle = radius * spiral.spin;

    let jx = jitter(rng, spiral, radius);
    let jy = jitter(rng, spiral, radius);
    let jz = jitter(rng, spiral, radius);

    let angle = branch_angle + spin_angle;
    [radius * angle.sin() + jx, jy, radius * angle.cos() + jz]
}

/// `±s^power · randomness · radius`
fn jitter<R: RandomSource + ?Sized>(rng: &mut R, spiral: &SpiralParams, radius: f32) -> f32 {
    let s = rng.next_unit();
    let sign = rng.sign();
    sign * s.powf(spiral.randomness_power) * spiral.randomness * radius
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::random::galaxy_rng;
    use galaxy_core::GalaxyError;
    use std::collections::BTreeSet;

    /// Always returns the same draw
    struct Fixed(f32);

    impl RandomSource for Fixed {
        fn next_unit(&mut self) -> f32 {
            self.0
        }
    }

    fn spiral(count: usize, branches: i32, randomness: f32, power: f32) -> LayerDescriptor {
        LayerDescriptor {
            name: "test".into(),
            min_radius: 0.3,
            max_radius: 1.5,
            count,
            shape: DistributionShape::Spiral(SpiralParams {
                spin: 3.0,
                branches,
                randomness,
                randomness_power: power,
            }),
            ..Default::default()
        }
    }

    #[test]
    fn lerp_endpoints() {
        assert!((lerp(0.0, 10.0, 0.0) - 0.0).abs() < 1e-6);
        assert!((lerp(0.0, 10.0, 1.0) - 10.0).abs() < 1e-6);
        assert!((lerp(0.0, 10.0, 0.5) - 5.0).abs() < 1e-6);
    }

    #[test]
    fn buffer_length_is_three_per_particle() {
        let mut rng = galaxy_rng(Some(1));
        for count in [1, 7, 300] {
            let buf = generate(&spiral(count, 3, 0.2, 3.0), &mut rng).unwrap();
            assert_eq!(buf.len(), 3 * count);
            assert_eq!(buf.count(), count);
        }
    }

    #[test]
    fn zero_count_is_empty() {
        let mut rng = galaxy_rng(Some(1));
        let buf = generate(&spiral(0, 3, 0.2, 3.0), &mut rng).unwrap();
        assert!(buf.is_empty());
    }

    #[test]
    fn zero_branches_is_invalid() {
        let mut rng = galaxy_rng(Some(1));
        let err = generate(&spiral(10, 0, 0.2, 3.0), &mut rng).unwrap_err();
        assert!(matches!(err, GalaxyError::InvalidDescriptor { .. }));
    }

    #[test]
    fn radii_stay_within_jittered_band() {
        let randomness = 0.2;
        let desc = spiral(5_000, 3, randomness, 3.0);
        let mut rng = galaxy_rng(Some(2024));
        let buf = generate(&desc, &mut rng).unwrap();

        // Each horizontal axis is off by at most randomness * radius
        let slack = randomness * std::f32::consts::SQRT_2;
        let eps = 1e-4;
        let lo = (desc.min_radius * (1.0 - slack) - eps).max(0.0);
        let hi = desc.max_radius * (1.0 + slack) + eps;
        for [x, _, z] in buf.triples() {
            let r = (x * x + z * z).sqrt();
            assert!(r >= lo && r <= hi, "radius {r} outside [{lo}, {hi}]");
        }
    }

    #[test]
    fn seeded_generation_is_bit_identical() {
        let desc = spiral(2_000, 5, 0.3, 2.0);
        let a = generate(&desc, &mut galaxy_rng(Some(77))).unwrap();
        let b = generate(&desc, &mut galaxy_rng(Some(77))).unwrap();
        let a_bits: Vec<u32> = a.as_slice().iter().map(|f| f.to_bits()).collect();
        let b_bits: Vec<u32> = b.as_slice().iter().map(|f| f.to_bits()).collect();
        assert_eq!(a_bits, b_bits);
    }

    #[test]
    fn branch_fractions_take_k_values() {
        for k in [1, 2, 3, 5, 8] {
            let count = 12 * k as usize;
            let distinct: BTreeSet<u32> = (0..count)
                .map(|i| branch_fraction(i, k).to_bits())
                .collect();
            assert_eq!(distinct.len(), k as usize);
        }
    }

    #[test]
    fn negative_branches_use_magnitude() {
        for i in 0..20 {
            assert_eq!(branch_fraction(i, -4), branch_fraction(i, 4));
        }
    }

    #[test]
    fn negative_branches_mirror_rotation() {
        // No spin and no jitter: x flips sign, z is unchanged
        let mut pos = spiral(8, 4, 0.0, 1.0);
        let mut neg = spiral(8, -4, 0.0, 1.0);
        for d in [&mut pos, &mut neg] {
            if let DistributionShape::Spiral(s) = &mut d.shape {
                s.spin = 0.0;
            }
        }
        let a = generate(&pos, &mut Fixed(0.4)).unwrap();
        let b = generate(&neg, &mut Fixed(0.4)).unwrap();
        for ([ax, ay, az], [bx, by, bz]) in a.triples().zip(b.triples()) {
            assert!((ax + bx).abs() < 1e-6);
            assert!((ay - by).abs() < 1e-6);
            assert!((az - bz).abs() < 1e-6);
        }
    }

    #[test]
    fn zero_power_jitter_is_full_magnitude() {
        // s^0 == 1, so every axis is displaced by exactly randomness * radius
        let desc = spiral(3, 1, 0.5, 0.0);
        let buf = generate(&desc, &mut Fixed(0.25)).unwrap();
        let radius = lerp(desc.min_radius, desc.max_radius, 0.25);
        for [_, y, _] in buf.triples() {
            // Fixed(0.25) < 0.5, so the sign draw is negative
            assert!((y + 0.5 * radius).abs() < 1e-6);
        }
    }

    #[test]
    fn disc_layout_is_flat_within_thickness() {
        let desc = LayerDescriptor {
            min_radius: 0.0,
            max_radius: 2.0,
            count: 1_000,
            shape: DistributionShape::Disc { thickness: 0.1 },
            ..Default::default()
        };
        let buf = generate(&desc, &mut galaxy_rng(Some(5))).unwrap();
        for [x, y, z] in buf.triples() {
            assert!(y.abs() <= 0.05 + 1e-6);
            assert!((x * x + z * z).sqrt() <= 2.0 + 1e-4);
        }
    }

    #[test]
    fn reference_galaxy_end_to_end() {
        let desc = spiral(10_000, 3, 0.2, 3.0);
        let buf = generate(&desc, &mut galaxy_rng(Some(0xC0FFEE))).unwrap();
        assert_eq!(buf.len(), 30_000);
        assert!(buf.as_slice().iter().all(|v| v.is_finite()));

        let slack = 0.2 * std::f32::consts::SQRT_2;
        let hi = 1.5 * (1.0 + slack) + 1e-4;
        let lo = 0.3 * (1.0 - slack) - 1e-4;
        assert!(buf.triples().all(|[x, _, z]| {
            let r = (x * x + z * z).sqrt();
            r >= lo && r <= hi
        }));
    }

    #[test]
    fn oversized_count_is_invalid_not_a_panic() {
        let desc = LayerDescriptor {
            count: usize::MAX / 2,
            ..Default::default()
        };
        let err = generate(&desc, &mut galaxy_rng(Some(1))).unwrap_err();
        assert!(matches!(err, GalaxyError::InvalidDescriptor { .. }));
    }
}
