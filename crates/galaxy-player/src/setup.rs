//! Asynchronous setup: render context, sprite texture, then the layers

use crate::config::GalaxyConfig;
use crate::experience::Experience;
use galaxy_core::{Result, TextureHandle};
use galaxy_particles::{galaxy_rng, Galaxy};
use galaxy_render::{GalaxyRenderer, RenderContext, TextureCache};
use galaxy_runtime::Viewport;
use std::future::Future;
use std::sync::Arc;
use winit::window::Window;

/// Everything the frame loop needs, produced once by `setup`
pub struct Ready {
    pub context: RenderContext,
    pub renderer: GalaxyRenderer,
    pub experience: Experience,
}

/// Current drawable size of a window
pub fn window_viewport(window: &Window) -> Viewport {
    let size = window.inner_size();
    Viewport::new(size.width, size.height, window.scale_factor())
}

/// Resolve the sprite texture, then generate every layer against it.
///
/// `load_texture` runs only when the config names a texture. Its failure
/// aborts before any layer is generated.
pub async fn build_galaxy<F, Fut>(config: &GalaxyConfig, load_texture: F) -> Result<Galaxy>
where
    F: FnOnce(String) -> Fut,
    Fut: Future<Output = Result<TextureHandle>>,
{
    let texture = match &config.experience.texture {
        Some(path) => load_texture(path.clone()).await?,
        None => TextureCache::DEFAULT,
    };

    let mut rng = galaxy_rng(config.experience.seed);
    let galaxy = Galaxy::build(&config.layers, &mut rng, texture);
    if galaxy.is_empty() {
        log::warn!("No drawable layers; the galaxy will be empty");
    }
    Ok(galaxy)
}

/// Build the whole experience for `window`.
///
/// A texture failure aborts setup. Invalid layers are skipped.
pub async fn setup(window: Arc<Window>, config: GalaxyConfig) -> Result<Ready> {
    let viewport = window_viewport(&window);
    let context = RenderContext::new(window).await?;

    let mut renderer = GalaxyRenderer::new(&context.device, &context.queue, context.format());
    renderer.set_clear_color(config.experience.clear_color);

    let galaxy = {
        let textures = renderer.textures_mut();
        let (device, queue) = (&context.device, &context.queue);
        build_galaxy(&config, |path| async move {
            textures.load(device, queue, &path).await
        })
        .await?
    };

    let experience = Experience::new(&config.experience, galaxy, viewport);
    renderer.prepare(&context.device, &experience.galaxy);

    log::info!(
        "Galaxy ready: {} layers, {} particles",
        experience.galaxy.fields.len(),
        experience.galaxy.total_particles()
    );

    Ok(Ready {
        context,
        renderer,
        experience,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use galaxy_core::GalaxyError;
    use galaxy_particles::LayerDescriptor;
    use std::cell::RefCell;

    fn config(texture: Option<&str>) -> GalaxyConfig {
        let mut config = GalaxyConfig {
            layers: vec![LayerDescriptor {
                count: 32,
                ..Default::default()
            }],
            ..Default::default()
        };
        config.experience.texture = texture.map(str::to_string);
        config.experience.seed = Some(9);
        config
    }

    #[test]
    fn texture_failure_builds_no_galaxy() {
        let requested = RefCell::new(None);
        let result = pollster::block_on(build_galaxy(&config(Some("missing.png")), |path| {
            *requested.borrow_mut() = Some(path.clone());
            async move { Err::<TextureHandle, _>(GalaxyError::texture_load(path, "not found")) }
        }));

        assert!(matches!(result, Err(GalaxyError::TextureLoad { .. })));
        assert_eq!(requested.borrow().as_deref(), Some("missing.png"));
    }

    #[test]
    fn loaded_handle_reaches_every_field() {
        let galaxy = pollster::block_on(build_galaxy(&config(Some("star.png")), |_| async {
            Ok::<_, GalaxyError>(TextureHandle(3))
        }))
        .unwrap();
        assert_eq!(galaxy.fields.len(), 1);
        assert_eq!(galaxy.fields[0].shading().texture, TextureHandle(3));
    }

    #[test]
    fn no_texture_skips_loader_and_uses_glow() {
        // A loader call would fail the build
        let galaxy = pollster::block_on(build_galaxy(&config(None), |path| async move {
            Err::<TextureHandle, _>(GalaxyError::texture_load(path, "unexpected load"))
        }))
        .unwrap();
        assert_eq!(galaxy.fields[0].shading().texture, TextureCache::DEFAULT);
    }
}
