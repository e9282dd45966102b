use crate::app::config::AppConfig;
use anyhow::Result;
use context::Context;
use winit::window::Window;

mod context;

pub use context::ContextError;

/// Graphics state for one window. Currently only the instance; no
/// device, swapchain or frame work.
pub struct Renderer {
    context: Context,
}

impl Renderer {
    pub fn new(window: &Window, config: &AppConfig) -> Result<Self> {
        // SAFETY: the window outlives the context; `Engine` drops the
        // renderer before its window.
        let context = unsafe { Context::create(window, config)? };

        Ok(Self { context })
    }

    pub fn validation_enabled(&self) -> bool {
        self.context.validation_enabled()
    }
}
