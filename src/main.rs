#![cfg_attr(all(windows, not(debug_assertions)), windows_subsystem = "windows")]

use blockout::settings::{resolve_settings_path, Settings};

fn main() -> anyhow::Result<()> {
    let settings_path = resolve_settings_path()?;
    let settings = Settings::load(&settings_path)?.with_target_override(std::env::args().nth(1));

    blockout::logging::init(settings.debug_logging, settings.log_file.clone());
    tracing::debug!(path = %settings_path.display(), target_process = ?settings.target(), "settings loaded");

    blockout::overlay::run(&settings)
}
