mod app;
mod ball;
mod raster;
mod sync;

use anyhow::Result;

use pulse_engine::logging::{init_logging, LoggingConfig};
use pulse_engine::window::{Runtime, RuntimeConfig};

use crate::app::{DemoApp, ARENA_H, ARENA_W};

fn main() -> Result<()> {
    init_logging(LoggingConfig::default());

    let app = DemoApp::new()?;
    let config = RuntimeConfig::default()
        .title("pulse")
        .size(f64::from(ARENA_W) * 1.5, f64::from(ARENA_H) * 1.5);

    Runtime::run(config, app)
}
