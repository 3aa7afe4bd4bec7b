//! GPU texture cache: sprite textures keyed by handle, with a built-in glow fallback

use galaxy_core::{GalaxyError, Result, TextureHandle};
use std::collections::HashMap;
use wgpu::util::DeviceExt;

/// Edge length of the procedural glow sprite
pub const GLOW_SPRITE_SIZE: u32 = 64;

/// A GPU-resident texture with its view and sampler
pub struct GpuTexture {
    pub texture: wgpu::Texture,
    pub view: wgpu::TextureView,
    pub sampler: wgpu::Sampler,
}

/// Decoded RGBA8 pixels ready for upload
#[derive(Debug, Clone, PartialEq)]
pub struct SpriteImage {
    pub width: u32,
    pub height: u32,
    pub rgba: Vec<u8>,
}

impl SpriteImage {
    /// Decode a PNG/JPEG byte stream. `source` only labels the error.
    pub fn decode(source: &str, bytes: &[u8]) -> Result<Self> {
        let img = image::load_from_memory(bytes)
            .map_err(|e| GalaxyError::texture_load(source, e))?;
        let rgba = img.to_rgba8();
        let (width, height) = rgba.dimensions();
        if width == 0 || height == 0 {
            return Err(GalaxyError::texture_load(source, "image has no pixels"));
        }
        Ok(Self {
            width,
            height,
            rgba: rgba.into_raw(),
        })
    }

    /// Soft radial falloff, white with alpha fading to zero at the edge
    pub fn radial_glow(size: u32) -> Self {
        let size = size.max(1);
        let half = size as f32 / 2.0;
        let mut rgba = Vec::with_capacity((size * size * 4) as usize);
        for y in 0..size {
            for x in 0..size {
                let dx = (x as f32 + 0.5 - half) / half;
                let dy = (y as f32 + 0.5 - half) / half;
                let d = (dx * dx + dy * dy).sqrt();
                let falloff = (1.0 - d).clamp(0.0, 1.0).powi(2);
                let a = (falloff * 255.0).round() as u8;
                rgba.extend_from_slice(&[255, 255, 255, a]);
            }
        }
        Self {
            width: size,
            height: size,
            rgba,
        }
    }
}

/// Cache of sprite textures. Handle 0 is always the built-in glow.
pub struct TextureCache {
    textures: Vec<GpuTexture>,
    by_name: HashMap<String, TextureHandle>,
}

impl TextureCache {
    /// Handle of the built-in glow sprite
    pub const DEFAULT: TextureHandle = TextureHandle(0);

    pub fn new(device: &wgpu::Device, queue: &wgpu::Queue) -> Self {
        let glow = Self::create_texture(
            device,
            queue,
            "Default Glow",
            &SpriteImage::radial_glow(GLOW_SPRITE_SIZE),
        );
        let mut by_name = HashMap::new();
        by_name.insert("glow".to_string(), Self::DEFAULT);
        Self {
            textures: vec![glow],
            by_name,
        }
    }

    fn create_texture(
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        label: &str,
        image: &SpriteImage,
    ) -> GpuTexture {
        let texture = device.create_texture_with_data(
            queue,
            &wgpu::TextureDescriptor {
                label: Some(label),
                size: wgpu::Extent3d {
                    width: image.width,
                    height: image.height,
                    depth_or_array_layers: 1,
                },
                mip_level_count: 1,
                sample_count: 1,
                dimension: wgpu::TextureDimension::D2,
                // Sampled as a mask, not a color
                format: wgpu::TextureFormat::Rgba8Unorm,
                usage: wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST,
                view_formats: &[],
            },
            wgpu::util::TextureDataOrder::LayerMajor,
            &image.rgba,
        );

        let view = texture.create_view(&wgpu::TextureViewDescriptor::default());
        let sampler = device.create_sampler(&wgpu::SamplerDescriptor {
            label: Some(&format!("{} Sampler", label)),
            mag_filter: wgpu::FilterMode::Linear,
            min_filter: wgpu::FilterMode::Linear,
            mipmap_filter: wgpu::FilterMode::Nearest,
            address_mode_u: wgpu::AddressMode::ClampToEdge,
            address_mode_v: wgpu::AddressMode::ClampToEdge,
            ..Default::default()
        });

        GpuTexture {
            texture,
            view,
            sampler,
        }
    }

    /// Upload decoded pixels under `name`. Re-uploading a name returns the cached handle.
    pub fn upload(
        &mut self,
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        name: &str,
        image: &SpriteImage,
    ) -> TextureHandle {
        if let Some(handle) = self.by_name.get(name) {
            return *handle;
        }
        let handle = TextureHandle(self.textures.len() as u32);
        self.textures
            .push(Self::create_texture(device, queue, name, image));
        self.by_name.insert(name.to_string(), handle);
        log::debug!(
            "Uploaded texture '{}' ({}x{}) as {:?}",
            name,
            image.width,
            image.height,
            handle
        );
        handle
    }

    /// Fetch, decode and upload a sprite. Any failure is a `TextureLoad` error.
    pub async fn load(
        &mut self,
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        path: &str,
    ) -> Result<TextureHandle> {
        if let Some(handle) = self.by_name.get(path) {
            return Ok(*handle);
        }
        let bytes = crate::loader::fetch_bytes(path).await?;
        let image = SpriteImage::decode(path, &bytes)?;
        Ok(self.upload(device, queue, path, &image))
    }

    /// Texture for `handle`, falling back to the glow sprite
    pub fn get_or_default(&self, handle: TextureHandle) -> &GpuTexture {
        self.textures
            .get(handle.0 as usize)
            .unwrap_or(&self.textures[0])
    }
}
