//! winit application handler driving the experience
//!
//! Window callbacks are translated into `HostEvent`s and queued; each
//! redraw drains the queue, ticks, uploads uniforms, and draws.

use crate::config::GalaxyConfig;
use crate::setup::{setup, window_viewport, Ready};
use galaxy_core::{GalaxyError, Result};
use galaxy_runtime::{HostEvent, HostEventQueue};
use std::sync::Arc;
use winit::application::ApplicationHandler;
use winit::dpi::PhysicalSize;
use winit::event::{ElementState, MouseButton, MouseScrollDelta, WindowEvent};
use winit::event_loop::{ActiveEventLoop, EventLoopProxy};
use winit::window::{Fullscreen, Window, WindowAttributes, WindowId};

/// Pixels per wheel line for touchpads reporting pixel deltas
const PIXELS_PER_LINE: f64 = 40.0;

/// Events delivered to the loop from outside winit
pub enum AppEvent {
    /// The setup pipeline finished
    Ready(Box<Result<Ready>>),
    /// The host asked for teardown
    Teardown,
}

pub struct GalaxyApp {
    config: Option<GalaxyConfig>,
    attributes: WindowAttributes,
    proxy: EventLoopProxy<AppEvent>,

    window: Option<Arc<Window>>,
    ready: Option<Ready>,
    events: HostEventQueue,
    error: Option<GalaxyError>,
}

impl GalaxyApp {
    pub fn new(config: GalaxyConfig, proxy: EventLoopProxy<AppEvent>) -> Self {
        let settings = &config.experience;
        let attributes = Window::default_attributes()
            .with_title(settings.title.clone())
            .with_inner_size(PhysicalSize::new(settings.width.max(1), settings.height.max(1)));

        Self {
            config: Some(config),
            attributes,
            proxy,
            window: None,
            ready: None,
            events: HostEventQueue::new(),
            error: None,
        }
    }

    /// Replace the attributes used when the window is created
    pub fn with_attributes(mut self, f: impl FnOnce(WindowAttributes) -> WindowAttributes) -> Self {
        self.attributes = f(self.attributes);
        self
    }

    pub fn fullscreen(self, fullscreen: bool) -> Self {
        if !fullscreen {
            return self;
        }
        self.with_attributes(|a| a.with_fullscreen(Some(Fullscreen::Borderless(None))))
    }

    /// The error that stopped the loop, if any
    pub fn take_error(&mut self) -> Option<GalaxyError> {
        self.error.take()
    }

    fn fail(&mut self, event_loop: &ActiveEventLoop, error: GalaxyError) {
        log::error!("{error}");
        self.error = Some(error);
        event_loop.exit();
    }

    fn initialize(&mut self, event_loop: &ActiveEventLoop) {
        let Some(config) = self.config.take() else {
            return;
        };

        let window = match event_loop.create_window(self.attributes.clone()) {
            Ok(window) => Arc::new(window),
            Err(e) => {
                self.fail(event_loop, GalaxyError::Render(format!("failed to create window: {e}")));
                return;
            }
        };
        self.window = Some(window.clone());

        self.launch_setup(window, config);
    }

    #[cfg(not(target_arch = "wasm32"))]
    fn launch_setup(&self, window: Arc<Window>, config: GalaxyConfig) {
        let result = pollster::block_on(setup(window, config));
        if self.proxy.send_event(AppEvent::Ready(Box::new(result))).is_err() {
            log::warn!("Event loop closed before setup finished");
        }
    }

    #[cfg(target_arch = "wasm32")]
    fn launch_setup(&self, window: Arc<Window>, config: GalaxyConfig) {
        let proxy = self.proxy.clone();
        wasm_bindgen_futures::spawn_local(async move {
            let result = setup(window, config).await;
            if proxy.send_event(AppEvent::Ready(Box::new(result))).is_err() {
                log::warn!("Event loop closed before setup finished");
            }
        });
    }

    fn on_ready(&mut self, event_loop: &ActiveEventLoop, ready: Result<Ready>) {
        match ready {
            Ok(mut ready) => {
                if let Some(window) = &self.window {
                    ready.context.resize(&window_viewport(window));
                    window.request_redraw();
                }
                self.ready = Some(ready);
            }
            Err(e) => self.fail(event_loop, e),
        }
    }

    fn redraw(&mut self, event_loop: &ActiveEventLoop) {
        let Some(ready) = &mut self.ready else {
            return;
        };

        if ready.experience.frame(&mut self.events).is_none() {
            event_loop.exit();
            return;
        }

        ready.renderer.update(
            &ready.context.queue,
            ready.experience.camera(),
            &ready.experience.galaxy,
        );

        match ready.renderer.render(&ready.context) {
            Ok(()) => {}
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                ready.context.reconfigure();
            }
            Err(wgpu::SurfaceError::OutOfMemory) => {
                log::error!("Surface out of memory");
                event_loop.exit();
            }
            Err(e) => log::warn!("Surface error: {:?}", e),
        }
    }

    fn resize(&mut self, width: u32, height: u32, pixel_ratio: f64) {
        if let Some(ready) = &mut self.ready {
            ready
                .context
                .resize(&galaxy_runtime::Viewport::new(width, height, pixel_ratio));
        }
        self.events.push(HostEvent::Resized {
            width,
            height,
            pixel_ratio,
        });
    }
}

impl ApplicationHandler<AppEvent> for GalaxyApp {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_none() {
            self.initialize(event_loop);
        }
    }

    fn user_event(&mut self, event_loop: &ActiveEventLoop, event: AppEvent) {
        match event {
            AppEvent::Ready(result) => self.on_ready(event_loop, *result),
            AppEvent::Teardown => {
                if self.ready.is_none() {
                    event_loop.exit();
                    return;
                }
                self.events.push(HostEvent::Teardown);
                if let Some(window) = &self.window {
                    window.request_redraw();
                }
            }
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        match event {
            WindowEvent::CloseRequested => {
                if let Some(ready) = &mut self.ready {
                    ready.experience.handle_event(HostEvent::Teardown);
                }
                event_loop.exit();
            }

            WindowEvent::Resized(size) => {
                let scale = self.window.as_ref().map_or(1.0, |w| w.scale_factor());
                self.resize(size.width, size.height, scale);
            }

            WindowEvent::ScaleFactorChanged { scale_factor, .. } => {
                if let Some(size) = self.window.as_ref().map(|w| w.inner_size()) {
                    self.resize(size.width, size.height, scale_factor);
                }
            }

            WindowEvent::CursorMoved { position, .. } => {
                self.events.push(HostEvent::PointerMoved {
                    x: position.x,
                    y: position.y,
                });
            }

            WindowEvent::MouseInput {
                state,
                button: MouseButton::Left,
                ..
            } => {
                self.events.push(HostEvent::PointerButton {
                    pressed: state == ElementState::Pressed,
                });
            }

            WindowEvent::MouseWheel { delta, .. } => {
                let lines = match delta {
                    MouseScrollDelta::LineDelta(_, y) => y,
                    MouseScrollDelta::PixelDelta(p) => (p.y / PIXELS_PER_LINE) as f32,
                };
                self.events.push(HostEvent::Wheel { delta: lines });
            }

            WindowEvent::RedrawRequested => {
                self.redraw(event_loop);
            }

            _ => {}
        }
    }

    fn about_to_wait(&mut self, _event_loop: &ActiveEventLoop) {
        if self.ready.is_none() {
            return;
        }
        if let Some(window) = &self.window {
            window.request_redraw();
        }
    }
}
