use anyhow::{anyhow, Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub const SETTINGS_FILE_NAME: &str = "settings.json";

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Settings {
    /// When enabled the application initialises the logger at debug level.
    /// Defaults to `false` when the field is missing in the settings file.
    #[serde(default)]
    pub debug_logging: bool,
    /// Optional file receiving log output in addition to stdout.
    #[serde(default)]
    pub log_file: Option<PathBuf>,
    /// Executable name of the application to track, e.g. `notepad.exe`.
    /// The first command line argument takes precedence.
    #[serde(default)]
    pub target_process: Option<String>,
    /// Overlay opacity in percent. Defaults to `92`.
    #[serde(default = "default_alpha_percent")]
    pub overlay_alpha_percent: u8,
    /// Overlay fill colour as `[r, g, b]`. Defaults to black.
    #[serde(default)]
    pub overlay_color: [u8; 3],
}

fn default_alpha_percent() -> u8 {
    92
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            debug_logging: false,
            log_file: None,
            target_process: None,
            overlay_alpha_percent: default_alpha_percent(),
            overlay_color: [0, 0, 0],
        }
    }
}

pub fn settings_path_from_exe_path(exe_path: &Path) -> Result<PathBuf> {
    let parent = exe_path
        .parent()
        .ok_or_else(|| anyhow!("executable path has no parent: {}", exe_path.display()))?;
    Ok(parent.join(SETTINGS_FILE_NAME))
}

pub fn resolve_settings_path() -> Result<PathBuf> {
    let exe_path = std::env::current_exe().context("resolve current executable")?;
    settings_path_from_exe_path(&exe_path)
}

impl Settings {
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).unwrap_or_default();
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_json::from_str(&content)
            .with_context(|| format!("parse settings from {}", path.display()))
    }

    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)?;
        Ok(())
    }

    /// Let a command line target override the configured one. Blank values
    /// are ignored.
    pub fn with_target_override(mut self, target: Option<String>) -> Self {
        if let Some(target) = target.filter(|t| !t.trim().is_empty()) {
            self.target_process = Some(target);
        }
        self
    }

    /// Target process to track, if any.
    pub fn target(&self) -> Option<&str> {
        self.target_process
            .as_deref()
            .map(str::trim)
            .filter(|t| !t.is_empty())
    }

    /// Opacity as the 0..=255 byte expected by layered windows.
    pub fn overlay_alpha(&self) -> u8 {
        let percent = u32::from(self.overlay_alpha_percent.min(100));
        (255 * percent / 100) as u8
    }
}
