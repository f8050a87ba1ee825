mod app;

use anyhow::{Context, Result};
use winit::event_loop::EventLoop;

use halo_renderer::logging::{init_logging, LoggingConfig};

fn main() -> Result<()> {
    init_logging(LoggingConfig::default());

    log::info!("halo demo: S start · X stop · Space step · C cycle colour · Esc quit");

    let event_loop = EventLoop::new().context("failed to create winit EventLoop")?;
    let mut demo = app::Demo::new(app::DemoConfig::default());

    event_loop
        .run_app(&mut demo)
        .context("winit event loop terminated with error")?;

    Ok(())
}
