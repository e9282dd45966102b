pub mod config;
mod engine;
mod lifecycle;

use crate::app::config::AppConfig;
use crate::app::engine::{ContextError, Engine};
use crate::app::lifecycle::Lifecycle;
use anyhow::Result;
use winit::{
    application::ApplicationHandler,
    event::WindowEvent,
    event_loop::ActiveEventLoop,
    window::WindowId,
};

pub struct App {
    config: AppConfig,
    engine: Option<Engine>,
    lifecycle: Lifecycle,
    error: Option<anyhow::Error>,
}

impl App {
    pub fn new(config: AppConfig) -> Self {
        Self {
            config,
            engine: None,
            lifecycle: Lifecycle::Uninitialized,
            error: None,
        }
    }

    /// Consumes the app after the event loop returns, surfacing a startup failure.
    pub fn finish(self) -> Result<()> {
        match self.error {
            Some(error) => Err(error),
            None => Ok(()),
        }
    }

    fn start(&mut self, event_loop: &ActiveEventLoop) -> Result<()> {
        let window = Engine::create_window(event_loop, &self.config.window)?;
        self.lifecycle.advance(Lifecycle::WindowCreated)?;

        // On failure `window` is dropped here, before the error propagates.
        let engine = Engine::new(window, &self.config)?;
        self.lifecycle.advance(Lifecycle::InstanceCreated)?;

        engine.show();
        self.engine = Some(engine);
        self.lifecycle.advance(Lifecycle::Running)?;
        Ok(())
    }

    fn fail(&mut self, event_loop: &ActiveEventLoop, error: anyhow::Error) {
        if let Err(lifecycle_error) = self.lifecycle.advance(Lifecycle::Failed) {
            tracing::warn!("{}", lifecycle_error);
        }
        if let Some(ContextError::MissingLayers(_)) = error.downcast_ref::<ContextError>() {
            tracing::warn!(
                "Install the Vulkan SDK layers or set {}=0 to run without validation.",
                config::VALIDATION_ENV
            );
        }
        self.engine = None;
        self.error = Some(error);
        event_loop.exit();
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.lifecycle != Lifecycle::Uninitialized {
            return;
        }
        if let Err(error) = self.start(event_loop) {
            self.fail(event_loop, error);
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        window_id: WindowId,
        event: WindowEvent,
    ) {
        let Some(engine) = self.engine.as_ref() else {
            return;
        };

        if engine.window_event(window_id, &event) {
            tracing::info!("Close requested for {:?}.", engine.window_id());
            if let Err(error) = self.lifecycle.advance(Lifecycle::Terminating) {
                tracing::warn!("{}", error);
            }
            // tell the event loop to exit cleanly
            event_loop.exit();
        }
    }

    fn exiting(&mut self, _event_loop: &ActiveEventLoop) {
        // Instance first, then window; the event loop itself goes last in `main`.
        self.engine = None;
        if self.lifecycle == Lifecycle::Terminating {
            if let Err(error) = self.lifecycle.advance(Lifecycle::Destroyed) {
                tracing::warn!("{}", error);
            }
        }
        if !self.lifecycle.is_terminal() {
            tracing::warn!("Event loop exited in state {:?}.", self.lifecycle);
        }
    }
}
