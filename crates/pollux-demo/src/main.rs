//! Demo host that opens a window and logs per-tick input transitions.
//!
//! Configuration is loaded from `config.ron` and can be overridden via CLI flags.
//! Run with `cargo run -p pollux-demo`, press keys, click, plug in a gamepad.
//! Escape quits.

mod app;
mod input_config;

use app::DemoApp;
use clap::Parser;
use pollux_config::{CliArgs, Config};
use winit::event_loop::{ControlFlow, EventLoop};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = CliArgs::parse();

    let config_dir = match args.config.clone() {
        Some(dir) => dir,
        None => Config::default_dir()?,
    };

    // Load or create config, then apply CLI overrides
    let on_disk = Config::load_or_create(&config_dir).unwrap_or_else(|e| {
        eprintln!("Failed to load config: {e}, using defaults");
        Config::default()
    });
    let mut config = on_disk.clone();
    config.apply_cli_overrides(&args);

    let log_dir = config_dir.join("logs");
    pollux_log::init_logging(Some(&log_dir), cfg!(debug_assertions), Some(&config));

    let event_loop = EventLoop::new()?;
    event_loop.set_control_flow(ControlFlow::Poll);
    let mut app = DemoApp::new(config, config_dir, on_disk);
    event_loop.run_app(&mut app)?;
    Ok(())
}
