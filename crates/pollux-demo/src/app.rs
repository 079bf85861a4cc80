//! winit application handler driving one [`InputTracker`] tick per frame.

use crate::input_config::{apply_input_config, reload_input_config};
use pollux_config::Config;
use pollux_input::gilrs_source::GilrsSource;
use pollux_input::winit_events::event_from_window_event;
use pollux_input::{EventQueue, InputTracker};
use std::path::PathBuf;
use std::time::{Duration, Instant};
use tracing::{error, info, warn};
use winit::application::ApplicationHandler;
use winit::dpi::LogicalSize;
use winit::event::WindowEvent;
use winit::event_loop::ActiveEventLoop;
use winit::window::{Window, WindowId};

/// How often `config.ron` is checked for edits.
const RELOAD_INTERVAL: Duration = Duration::from_secs(1);

/// Window, tracker, and the queue window events are forwarded into.
pub struct DemoApp {
    window: Option<Window>,
    input: InputTracker,
    queue: EventQueue,
    config: Config,
    config_dir: PathBuf,
    on_disk: Config,
    last_reload_check: Instant,
    reload_failed: bool,
}

impl DemoApp {
    /// `on_disk` is the config as read from `config_dir`, before CLI overrides.
    pub fn new(config: Config, config_dir: PathBuf, on_disk: Config) -> Self {
        let mut input = match GilrsSource::new() {
            Ok(source) => InputTracker::new(source),
            Err(e) => {
                warn!("{e}; continuing without gamepad support");
                InputTracker::default()
            }
        };
        apply_input_config(&mut input, &config.input);
        // The window's client area is the coordinate space, no extra viewport.
        let queue = input.init(None);
        Self {
            window: None,
            input,
            queue,
            config,
            config_dir,
            on_disk,
            last_reload_check: Instant::now(),
            reload_failed: false,
        }
    }

    /// Pick up edits to `config.ron` without restarting.
    ///
    /// CLI overrides are not re-applied; the file wins after an edit.
    fn check_config_reload(&mut self) {
        if self.last_reload_check.elapsed() < RELOAD_INTERVAL {
            return;
        }
        self.last_reload_check = Instant::now();
        match reload_input_config(&mut self.input, &mut self.on_disk, &self.config_dir) {
            Ok(changed) => {
                if changed {
                    info!(
                        deadzone = self.input.settings().gamepad_deadzone,
                        "input config reloaded"
                    );
                    self.config = self.on_disk.clone();
                }
                self.reload_failed = false;
            }
            Err(e) => {
                if !self.reload_failed {
                    warn!("config reload failed: {e}");
                }
                self.reload_failed = true;
            }
        }
    }

    fn tick(&mut self) {
        self.input.update();
        if self.config.debug.log_state_changes
            && let Some(summary) = tick_summary(&self.input)
        {
            info!(tick = self.input.tick(), "{summary}");
        }
    }
}

impl ApplicationHandler for DemoApp {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }
        let attributes = Window::default_attributes()
            .with_title(self.config.window.title.clone())
            .with_inner_size(LogicalSize::new(
                f64::from(self.config.window.width),
                f64::from(self.config.window.height),
            ));
        match event_loop.create_window(attributes) {
            Ok(window) => {
                info!(
                    width = self.config.window.width,
                    height = self.config.window.height,
                    "window created"
                );
                self.window = Some(window);
            }
            Err(e) => {
                error!("failed to create window: {e}");
                event_loop.exit();
            }
        }
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, _id: WindowId, event: WindowEvent) {
        if let Some(input) = event_from_window_event(&event) {
            self.queue.push(input);
        }
        match event {
            WindowEvent::CloseRequested => {
                info!("Close requested, shutting down");
                event_loop.exit();
            }
            WindowEvent::RedrawRequested => {
                self.tick();
                if self.input.keyboard().is_just_pressed("Escape") {
                    info!("Escape pressed, shutting down");
                    event_loop.exit();
                }
            }
            _ => {}
        }
    }

    fn about_to_wait(&mut self, _event_loop: &ActiveEventLoop) {
        self.check_config_reload();
        if let Some(window) = &self.window {
            window.request_redraw();
        }
    }
}

/// One-line description of the transitions in the last tick, if any.
pub fn tick_summary(input: &InputTracker) -> Option<String> {
    let mut parts = Vec::new();

    let mut keys: Vec<_> = input.keyboard().just_pressed().iter().collect();
    keys.sort();
    if !keys.is_empty() {
        parts.push(format!("keys down {keys:?}"));
    }

    let mut buttons: Vec<_> = input.mouse().just_pressed().iter().map(|b| b.0).collect();
    buttons.sort_unstable();
    if !buttons.is_empty() {
        parts.push(format!(
            "mouse {buttons:?} at ({}, {})",
            input.mouse().x(),
            input.mouse().y()
        ));
    }

    let gamepad = input.gamepad();
    if gamepad.just_connected() {
        parts.push("gamepad connected".to_string());
    }
    if gamepad.just_disconnected() {
        parts.push("gamepad disconnected".to_string());
    }
    let mut pad_buttons: Vec<_> = gamepad.just_pressed().iter().collect();
    pad_buttons.sort();
    if !pad_buttons.is_empty() {
        parts.push(format!("pad {pad_buttons:?}"));
    }

    if parts.is_empty() {
        None
    } else {
        Some(format!(
            "{} (active: {:?})",
            parts.join(", "),
            input.last_active_device()
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pollux_input::{GamepadSnapshot, MouseButton, ScriptedGamepad};

    #[test]
    fn test_quiet_tick_has_no_summary() {
        let mut input = InputTracker::default();
        let _queue = input.init(None);
        input.update();
        assert_eq!(tick_summary(&input), None);
    }

    #[test]
    fn test_summary_lists_transitions() {
        let pad = ScriptedGamepad::new();
        let mut input = InputTracker::new(pad.clone());
        let queue = input.init(None);
        queue.key_down("KeyB");
        queue.key_down("KeyA");
        queue.mouse_move(10.0, 20.0);
        queue.mouse_down(MouseButton::RIGHT);
        input.update();
        assert_eq!(
            tick_summary(&input).as_deref(),
            Some(r#"keys down ["KeyA", "KeyB"], mouse [2] at (10, 20) (active: Mouse)"#)
        );

        pad.set(Some(GamepadSnapshot::with_pressed(&[0])));
        input.update();
        assert_eq!(
            tick_summary(&input).as_deref(),
            Some(r#"gamepad connected, pad ["A"] (active: Gamepad)"#)
        );
    }
}
