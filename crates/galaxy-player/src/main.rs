//! Galaxy - native player for the particle galaxy
//!
//! Usage:
//!   galaxy [--config <galaxy.toml>] [--texture <sprite.png>] [--seed <n>]
//!          [--width <px>] [--height <px>] [--fullscreen]

#[cfg(not(target_arch = "wasm32"))]
fn main() -> anyhow::Result<()> {
    native::run()
}

#[cfg(target_arch = "wasm32")]
fn main() {}

#[cfg(not(target_arch = "wasm32"))]
mod native {
    use anyhow::{Context, Result};
    use clap::Parser;
    use galaxy_player::{AppEvent, ExperienceSettings, GalaxyApp, GalaxyConfig};
    use std::path::PathBuf;
    use winit::event_loop::{ControlFlow, EventLoop};

    #[derive(Parser)]
    #[command(name = "galaxy")]
    #[command(about = "Interactive particle galaxy - drag to orbit, scroll to zoom")]
    struct Args {
        /// Galaxy config file; the built-in galaxy when omitted
        #[arg(long)]
        config: Option<PathBuf>,

        /// Sprite texture (PNG or JPEG)
        #[arg(long)]
        texture: Option<String>,

        /// Seed for a reproducible layout
        #[arg(long)]
        seed: Option<u64>,

        /// Window width in pixels
        #[arg(long)]
        width: Option<u32>,

        /// Window height in pixels
        #[arg(long)]
        height: Option<u32>,

        /// Launch in fullscreen mode
        #[arg(long)]
        fullscreen: bool,
    }

    impl Args {
        fn apply(&self, settings: &mut ExperienceSettings) {
            if let Some(texture) = &self.texture {
                settings.texture = Some(texture.clone());
            }
            if let Some(seed) = self.seed {
                settings.seed = Some(seed);
            }
            if let Some(width) = self.width {
                settings.width = width;
            }
            if let Some(height) = self.height {
                settings.height = height;
            }
        }
    }

    pub fn run() -> Result<()> {
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

        let args = Args::parse();

        let mut config = match &args.config {
            Some(path) => GalaxyConfig::load(path)
                .with_context(|| format!("Failed to load galaxy config '{}'", path.display()))?,
            None => GalaxyConfig::builtin().context("Built-in galaxy config is invalid")?,
        };
        args.apply(&mut config.experience);

        println!("Controls:");
        println!("  Drag     - Orbit");
        println!("  Scroll   - Zoom");
        println!("  Pointer  - Push nearby stars");

        let event_loop = EventLoop::<AppEvent>::with_user_event().build()?;
        event_loop.set_control_flow(ControlFlow::Poll);

        let mut app = GalaxyApp::new(config, event_loop.create_proxy()).fullscreen(args.fullscreen);
        event_loop.run_app(&mut app)?;

        if let Some(error) = app.take_error() {
            return Err(error).context("Galaxy experience failed");
        }
        Ok(())
    }
}
