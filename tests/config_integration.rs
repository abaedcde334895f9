use std::path::PathBuf;

use mosaic::config::{ColumnsMode, ConfigFlags, load_config_flags, parse_flag_tokens};

#[test]
fn test_config_file_parsing_ignores_comments_and_blank_lines() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join(".mosaicrc");
    let content = r"
# comment
--perf

--columns compact

--render-debug-log=render.log
";
    std::fs::write(&path, content).unwrap();

    let flags = load_config_flags(&path).unwrap();
    assert!(flags.perf);
    assert_eq!(flags.columns, Some(ColumnsMode::Compact));
    assert_eq!(flags.render_debug_log, Some(PathBuf::from("render.log")));
}

#[test]
fn test_missing_config_file_yields_defaults() {
    let dir = tempfile::tempdir().unwrap();
    let flags = load_config_flags(&dir.path().join("absent")).unwrap();
    assert_eq!(flags, ConfigFlags::default());
}

#[test]
fn test_cli_flags_override_file_flags() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join(".mosaicrc");
    let content = "--perf\n--per-page 50\n--render-debug-log file.log\n";
    std::fs::write(&path, content).unwrap();

    let file_flags = load_config_flags(&path).unwrap();
    let cli_args = vec![
        "mosaic".to_string(),
        "--per-page".to_string(),
        "12".to_string(),
        "--breakpoint".to_string(),
        "100".to_string(),
    ];
    let cli_flags = parse_flag_tokens(&cli_args);

    let effective = file_flags.union(&cli_flags);
    assert!(effective.perf, "file flags should remain enabled");
    assert_eq!(effective.per_page, Some(12), "cli should override per-page");
    assert_eq!(effective.breakpoint, Some(100), "cli flags should be applied");
    assert_eq!(
        effective.render_debug_log,
        Some(PathBuf::from("file.log")),
        "file config should be preserved when CLI does not override"
    );
}

#[test]
fn test_parse_flag_tokens_handles_equals_syntax() {
    let args = vec![
        "mosaic".to_string(),
        "--columns=desktop".to_string(),
        "--endpoint=http://localhost:9000/v1".to_string(),
    ];
    let flags = parse_flag_tokens(&args);
    assert_eq!(flags.columns, Some(ColumnsMode::Desktop));
    assert_eq!(flags.endpoint.as_deref(), Some("http://localhost:9000/v1"));
}

#[test]
fn test_local_override_wins_over_global() {
    let dir = tempfile::tempdir().unwrap();
    let global = dir.path().join("config");
    let local = dir.path().join(".mosaicrc");
    std::fs::write(&global, "--per-page 20\n--columns desktop\n").unwrap();
    std::fs::write(&local, "--columns compact\n").unwrap();

    let merged = load_config_flags(&global)
        .unwrap()
        .union(&load_config_flags(&local).unwrap());
    assert_eq!(merged.per_page, Some(20));
    assert_eq!(merged.columns, Some(ColumnsMode::Compact));
}
