//! Browser entry point
//!
//! `createExperience(containerId)` mounts a canvas inside the element with
//! that id and starts the frame loop. The returned handle tears it down.

use crate::app::{AppEvent, GalaxyApp};
use crate::config::GalaxyConfig;
use galaxy_core::GalaxyError;
use galaxy_runtime::MAX_PIXEL_RATIO;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{HtmlCanvasElement, HtmlElement};
use winit::dpi::LogicalSize;
use winit::event_loop::{EventLoop, EventLoopProxy};
use winit::platform::web::{EventLoopExtWebSys, WindowAttributesExtWebSys};

fn to_js(error: GalaxyError) -> JsValue {
    JsValue::from_str(&error.to_string())
}

#[wasm_bindgen(start)]
pub fn start() {
    console_error_panic_hook::set_once();
    // A second init only fails because a logger is already installed
    let _ = console_log::init_with_level(log::Level::Info);
}

/// Handle to a running experience
#[wasm_bindgen]
pub struct ExperienceHandle {
    proxy: EventLoopProxy<AppEvent>,
    canvas: HtmlCanvasElement,
    disposed: bool,
}

#[wasm_bindgen]
impl ExperienceHandle {
    /// Stop the frame loop and remove the canvas. Safe to call twice.
    pub fn dispose(&mut self) {
        if self.disposed {
            return;
        }
        self.disposed = true;
        if self.proxy.send_event(AppEvent::Teardown).is_err() {
            log::debug!("Event loop already stopped");
        }
        self.canvas.remove();
    }
}

/// Mount the built-in galaxy into `container_id`
#[wasm_bindgen(js_name = createExperience)]
pub fn create_experience(container_id: &str) -> Result<ExperienceHandle, JsValue> {
    let config = GalaxyConfig::builtin().map_err(to_js)?;
    mount(container_id, config).map_err(to_js)
}

/// Mount a galaxy described by TOML source into `container_id`
#[wasm_bindgen(js_name = createExperienceWithConfig)]
pub fn create_experience_with_config(
    container_id: &str,
    config_toml: &str,
) -> Result<ExperienceHandle, JsValue> {
    let config = GalaxyConfig::parse(config_toml).map_err(to_js)?;
    mount(container_id, config).map_err(to_js)
}

fn mount(container_id: &str, config: GalaxyConfig) -> galaxy_core::Result<ExperienceHandle> {
    let missing = || GalaxyError::MissingContainer(container_id.to_string());

    let window = web_sys::window().ok_or_else(missing)?;
    let document = window.document().ok_or_else(missing)?;
    let container: HtmlElement = document
        .get_element_by_id(container_id)
        .ok_or_else(missing)?
        .dyn_into()
        .map_err(|_| missing())?;

    let canvas: HtmlCanvasElement = document
        .create_element("canvas")
        .and_then(|e| e.dyn_into().map_err(JsValue::from))
        .map_err(|e| GalaxyError::Render(format!("failed to create canvas: {:?}", e)))?;
    container
        .append_child(&canvas)
        .map_err(|e| GalaxyError::Render(format!("failed to mount canvas: {:?}", e)))?;

    // Containers without an explicit height take the window's
    let width = container.offset_width().max(1) as f64;
    let height = match container.offset_height() {
        0 => window
            .inner_height()
            .ok()
            .and_then(|h| h.as_f64())
            .unwrap_or(720.0),
        h => h as f64,
    };
    log::debug!(
        "Mounting into '{}' at {}x{} (pixel ratio {})",
        container_id,
        width,
        height,
        window.device_pixel_ratio().min(MAX_PIXEL_RATIO)
    );

    let event_loop = EventLoop::<AppEvent>::with_user_event()
        .build()
        .map_err(|e| GalaxyError::Render(format!("failed to start event loop: {e}")))?;
    let proxy = event_loop.create_proxy();

    let app = GalaxyApp::new(config, proxy.clone()).with_attributes({
        let canvas = canvas.clone();
        move |attributes| {
            attributes
                .with_canvas(Some(canvas))
                .with_inner_size(LogicalSize::new(width, height))
        }
    });
    event_loop.spawn_app(app);

    Ok(ExperienceHandle {
        proxy,
        canvas,
        disposed: false,
    })
}
