//! Layer descriptors (parsed from TOML) and their validation

use galaxy_core::{GalaxyError, Result, Rgb};

/// How particles are placed within the radius band
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DistributionShape {
    /// Spiral arms twisted proportionally to radius
    Spiral(SpiralParams),
    /// Flat disc; angle alone defines position, vertical axis gets a small
    /// uniform jitter bounded by `thickness`
    Disc { thickness: f32 },
}

/// Parameters of the spiral distribution
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpiralParams {
    /// Radians of twist per unit of radius
    pub spin: f32,
    /// Number of arms; negative reverses the rotation sense
    pub branches: i32,
    /// Per-axis jitter magnitude as a fraction of radius
    pub randomness: f32,
    /// Falloff exponent applied to the jitter draw
    pub randomness_power: f32,
}

impl Default for SpiralParams {
    fn default() -> Self {
        Self {
            spin: 3.0,
            branches: 3,
            randomness: 0.2,
            randomness_power: 3.0,
        }
    }
}

pub const DEFAULT_DISC_THICKNESS: f32 = 0.1;

/// Largest particle count a single layer may ask for
pub const MAX_PARTICLES: usize = 1 << 24;

/// Configuration of one particle layer
#[derive(Debug, Clone, PartialEq)]
pub struct LayerDescriptor {
    pub name: String,
    pub min_radius: f32,
    pub max_radius: f32,
    pub count: usize,
    pub color: Rgb,
    /// Sprite edge length in world units
    pub size: f32,
    pub shape: DistributionShape,
    /// Vertical displacement scale for the shading program
    pub amplitude: Option<f32>,
    /// Whether the layer receives the tracked pointer point
    pub interactive: bool,
}

impl Default for LayerDescriptor {
    fn default() -> Self {
        Self {
            name: "layer".to_string(),
            min_radius: 0.3,
            max_radius: 1.5,
            count: 10_000,
            color: Rgb::WHITE,
            size: 0.02,
            shape: DistributionShape::Spiral(SpiralParams::default()),
            amplitude: None,
            interactive: true,
        }
    }
}

impl LayerDescriptor {
    /// Parse a descriptor from a `[[layers]]` TOML table.
    ///
    /// A table that names any of `spin`, `branches`, `randomness` or
    /// `randomness_power` describes a spiral; otherwise it is a disc.
    pub fn from_toml(table: &toml::value::Table) -> Result<Self> {
        let mut desc = Self::default();

        if let Some(v) = table.get("name") {
            desc.name = v
                .as_str()
                .ok_or_else(|| GalaxyError::invalid_descriptor(&desc.name, "name must be a string"))?
                .to_string();
        }
        let name = desc.name.clone();

        if let Some(v) = table.get("min_radius") {
            desc.min_radius = toml_f32(v, &name, "min_radius")?;
        }
        if let Some(v) = table.get("max_radius") {
            desc.max_radius = toml_f32(v, &name, "max_radius")?;
        }
        if let Some(v) = table.get("count") {
            let n = v.as_integer().ok_or_else(|| {
                GalaxyError::invalid_descriptor(&name, "count must be an integer")
            })?;
            desc.count = usize::try_from(n).map_err(|_| {
                GalaxyError::invalid_descriptor(&name, format!("count must be >= 0, got {n}"))
            })?;
        }
        if let Some(v) = table.get("color") {
            desc.color = toml_color(v).ok_or_else(|| {
                GalaxyError::invalid_descriptor(&name, "color must be \"#rrggbb\" or [r, g, b]")
            })?;
        }
        if let Some(v) = table.get("size") {
            desc.size = toml_f32(v, &name, "size")?;
        }
        if let Some(v) = table.get("amplitude") {
            desc.amplitude = Some(toml_f32(v, &name, "amplitude")?);
        }
        if let Some(v) = table.get("interactive") {
            desc.interactive = v.as_bool().ok_or_else(|| {
                GalaxyError::invalid_descriptor(&name, "interactive must be true or false")
            })?;
        }

        let spiral_keys = ["spin", "branches", "randomness", "randomness_power"];
        if spiral_keys.iter().any(|k| table.contains_key(*k)) {
            let mut spiral = SpiralParams::default();
            if let Some(v) = table.get("spin") {
                spiral.spin = toml_f32(v, &name, "spin")?;
            }
            if let Some(v) = table.get("branches") {
                let n = v.as_integer().ok_or_else(|| {
                    GalaxyError::invalid_descriptor(&name, "branches must be an integer")
                })?;
                spiral.branches = i32::try_from(n).map_err(|_| {
                    GalaxyError::invalid_descriptor(&name, "branches out of range")
                })?;
            }
            if let Some(v) = table.get("randomness") {
                spiral.randomness = toml_f32(v, &name, "randomness")?;
            }
            if let Some(v) = table.get("randomness_power") {
                spiral.randomness_power = toml_f32(v, &name, "randomness_power")?;
            }
            desc.shape = DistributionShape::Spiral(spiral);
        } else {
            let thickness = match table.get("thickness") {
                Some(v) => toml_f32(v, &name, "thickness")?,
                None => DEFAULT_DISC_THICKNESS,
            };
            desc.shape = DistributionShape::Disc { thickness };
        }

        Ok(desc)
    }

    /// Check the descriptor is something the generator can place
    pub fn validate(&self) -> Result<()> {
        let fail = |reason: String| Err(GalaxyError::invalid_descriptor(&self.name, reason));

        if !self.min_radius.is_finite() || !self.max_radius.is_finite() {
            return fail("radii must be finite".into());
        }
        if self.min_radius < 0.0 {
            return fail(format!("min_radius must be >= 0, got {}", self.min_radius));
        }
        if self.min_radius > self.max_radius {
            return fail(format!(
                "min_radius ({}) exceeds max_radius ({})",
                self.min_radius, self.max_radius
            ));
        }
        if self.count > MAX_PARTICLES {
            return fail(format!(
                "count must be <= {MAX_PARTICLES}, got {}",
                self.count
            ));
        }
        if !(self.size > 0.0) {
            return fail(format!("size must be positive, got {}", self.size));
        }

        match self.shape {
            DistributionShape::Spiral(spiral) => {
                if spiral.branches == 0 {
                    return fail("branches must be non-zero".into());
                }
                if !spiral.spin.is_finite() {
                    return fail("spin must be finite".into());
                }
                if !(spiral.randomness >= 0.0) || !spiral.randomness.is_finite() {
                    return fail(format!("randomness must be >= 0, got {}", spiral.randomness));
                }
                if !(spiral.randomness_power >= 0.0) || !spiral.randomness_power.is_finite() {
                    return fail(format!(
                        "randomness_power must be >= 0, got {}",
                        spiral.randomness_power
                    ));
                }
            }
            DistributionShape::Disc { thickness } => {
                if !(thickness >= 0.0) || !thickness.is_finite() {
                    return fail(format!("thickness must be >= 0, got {thickness}"));
                }
            }
        }

        Ok(())
    }
}

// ── TOML helpers (handle integer/float coercion) ──

fn as_f32(v: &toml::Value) -> Option<f32> {
    v.as_float()
        .map(|f| f as f32)
        .or_else(|| v.as_integer().map(|i| i as f32))
}

fn toml_f32(v: &toml::Value, layer: &str, key: &str) -> Result<f32> {
    as_f32(v).ok_or_else(|| GalaxyError::invalid_descriptor(layer, format!("{key} must be a number")))
}

fn toml_color(v: &toml::Value) -> Option<Rgb> {
    if let Some(s) = v.as_str() {
        return Rgb::parse_hex(s);
    }
    let arr = v.as_array()?;
    if arr.len() != 3 {
        return None;
    }
    Some(Rgb::new(as_f32(&arr[0])?, as_f32(&arr[1])?, as_f32(&arr[2])?))
}
