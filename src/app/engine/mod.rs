use crate::app::config::{AppConfig, WindowConfig};
use anyhow::Result;
use renderer::Renderer;
use std::sync::Arc;
use winit::{
    event::WindowEvent,
    event_loop::ActiveEventLoop,
    window::{Window, WindowId},
};

mod renderer;

pub use renderer::ContextError;

pub struct Engine {
    // Field order is drop order: the instance goes before the window.
    renderer: Renderer,
    window: Arc<Window>,
}

impl Engine {
    /// Opens the window hidden. Dropping the returned handle closes it.
    pub fn create_window(
        event_loop: &ActiveEventLoop,
        config: &WindowConfig,
    ) -> Result<Arc<Window>> {
        let window = Arc::new(event_loop.create_window(config.attributes())?);
        let (width, height) = config.size();
        tracing::info!("Created {}x{} window ({:?}).", width, height, window.id());
        Ok(window)
    }

    pub fn new(window: Arc<Window>, config: &AppConfig) -> Result<Self> {
        let renderer = Renderer::new(&window, config)?;
        Ok(Self { renderer, window })
    }

    pub fn show(&self) {
        tracing::info!(
            "Showing window (validation {}).",
            if self.renderer.validation_enabled() { "on" } else { "off" }
        );
        self.window.set_visible(true);
    }

    pub fn window_id(&self) -> WindowId {
        self.window.id()
    }

    /// Returns `true` when the event asks the engine's window to close.
    pub fn window_event(&self, window_id: WindowId, event: &WindowEvent) -> bool {
        is_close_request(self.window.id(), window_id, event)
    }
}

fn is_close_request(own: WindowId, window_id: WindowId, event: &WindowEvent) -> bool {
    if window_id != own {
        return false;
    }
    match event {
        WindowEvent::CloseRequested => true,
        // No frame work: resize, input and redraw are ignored.
        _ => false,
    }
}
