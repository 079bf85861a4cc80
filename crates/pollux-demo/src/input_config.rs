//! Applying the `input` section of `config.ron` to an [`InputTracker`].

use std::path::Path;

use pollux_config::{Config, ConfigError, InputConfig};
use pollux_input::{ButtonMap, InputTracker, TrackerSettings};
use tracing::warn;

/// Tracker settings described by the config, clamped into range.
pub fn tracker_settings(config: &InputConfig) -> TrackerSettings {
    TrackerSettings {
        gamepad_deadzone: config.gamepad_deadzone,
        activity_threshold: config.activity_threshold,
    }
    .sanitized()
}

/// Apply settings and button map.
///
/// An empty button map selects the standard layout. A map with the wrong
/// number of entries is rejected with a warning and the current map is kept.
pub fn apply_input_config(input: &mut InputTracker, config: &InputConfig) {
    input.set_settings(tracker_settings(config));
    if config.button_map.is_empty() {
        input.gamepad_mut().set_button_map(ButtonMap::default());
        return;
    }
    match ButtonMap::try_from(config.button_map.clone()) {
        Ok(map) => input.gamepad_mut().set_button_map(map),
        Err(e) => warn!("ignoring configured button map: {e}"),
    }
}

/// Re-read `config.ron` and apply its input section if the file changed.
///
/// `on_disk` is the last config read from `config_dir` and is replaced on
/// change. Returns whether anything was applied.
pub fn reload_input_config(
    input: &mut InputTracker,
    on_disk: &mut Config,
    config_dir: &Path,
) -> Result<bool, ConfigError> {
    let Some(config) = on_disk.reload(config_dir)? else {
        return Ok(false);
    };
    apply_input_config(input, &config.input);
    *on_disk = config;
    Ok(true)
}
