use crate::app::App;
use crate::app::config::AppConfig;
use anyhow::Result;
use winit::event_loop::{ControlFlow, EventLoop};

mod app;

fn main() -> Result<()> {
    tracing_subscriber::fmt::init();
    let config = AppConfig::from_env()?;
    let mut app = App::new(config);

    let event_loop = EventLoop::new()?;
    event_loop.set_control_flow(ControlFlow::Poll);
    event_loop.run_app(&mut app)?;

    // `run_app` consumed the event loop, so the windowing layer is already shut down.
    app.finish()
}
