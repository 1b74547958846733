use blockout::settings::{settings_path_from_exe_path, Settings, SETTINGS_FILE_NAME};
use std::path::Path;
use tempfile::tempdir;

#[test]
fn missing_file_yields_defaults() {
    let dir = tempdir().unwrap();
    let settings = Settings::load(dir.path().join(SETTINGS_FILE_NAME)).unwrap();
    assert_eq!(settings, Settings::default());
    assert_eq!(settings.overlay_alpha_percent, 92);
    assert_eq!(settings.target(), None);
}

#[test]
fn empty_file_yields_defaults() {
    let dir = tempdir().unwrap();
    let path = dir.path().join(SETTINGS_FILE_NAME);
    std::fs::write(&path, "  \n").unwrap();
    assert_eq!(Settings::load(&path).unwrap(), Settings::default());
}

#[test]
fn partial_file_fills_in_defaults() {
    let dir = tempdir().unwrap();
    let path = dir.path().join(SETTINGS_FILE_NAME);
    std::fs::write(&path, r#"{ "target_process": "mspaint.exe" }"#).unwrap();

    let settings = Settings::load(&path).unwrap();
    assert_eq!(settings.target(), Some("mspaint.exe"));
    assert!(!settings.debug_logging);
    assert_eq!(settings.overlay_alpha_percent, 92);
    assert_eq!(settings.overlay_color, [0, 0, 0]);
}

#[test]
fn save_then_load_preserves_values() {
    let dir = tempdir().unwrap();
    let path = dir.path().join(SETTINGS_FILE_NAME);
    let settings = Settings {
        debug_logging: true,
        log_file: Some(dir.path().join("blockout.log")),
        target_process: Some("notepad.exe".into()),
        overlay_alpha_percent: 75,
        overlay_color: [16, 32, 48],
    };
    settings.save(&path).unwrap();
    assert_eq!(Settings::load(&path).unwrap(), settings);
}

#[test]
fn invalid_json_is_reported() {
    let dir = tempdir().unwrap();
    let path = dir.path().join(SETTINGS_FILE_NAME);
    std::fs::write(&path, "{ not json").unwrap();

    let err = Settings::load(&path).unwrap_err();
    assert!(format!("{err:#}").contains("parse settings"));
}

#[test]
fn command_line_target_overrides_file() {
    let settings = Settings {
        target_process: Some("notepad.exe".into()),
        ..Default::default()
    };
    let overridden = settings.clone().with_target_override(Some("calc.exe".into()));
    assert_eq!(overridden.target(), Some("calc.exe"));

    let blank = settings.clone().with_target_override(Some("   ".into()));
    assert_eq!(blank.target(), Some("notepad.exe"));

    let absent = settings.with_target_override(None);
    assert_eq!(absent.target(), Some("notepad.exe"));
}

#[test]
fn blank_target_counts_as_none() {
    let settings = Settings {
        target_process: Some("  ".into()),
        ..Default::default()
    };
    assert_eq!(settings.target(), None);
}

#[test]
fn alpha_percent_maps_to_byte_and_clamps() {
    let mut settings = Settings::default();
    assert_eq!(settings.overlay_alpha(), 234);
    settings.overlay_alpha_percent = 100;
    assert_eq!(settings.overlay_alpha(), 255);
    settings.overlay_alpha_percent = 0;
    assert_eq!(settings.overlay_alpha(), 0);
    settings.overlay_alpha_percent = 250;
    assert_eq!(settings.overlay_alpha(), 255);
}

#[test]
fn settings_live_next_to_the_executable() {
    let path = settings_path_from_exe_path(Path::new("/opt/blockout/blockout.exe")).unwrap();
    assert_eq!(path, Path::new("/opt/blockout").join(SETTINGS_FILE_NAME));
}
