use std::path::PathBuf;

use paperset::config::{
    ConfigFlags, ThemeMode, load_config_flags, parse_flag_tokens, save_config_flags,
};

#[test]
fn test_config_file_parsing_ignores_comments_and_blank_lines() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join(".papersetrc");
    let content = r#"
# comment
--watch

--theme light

--output=paper.html
"#;
    std::fs::write(&path, content).unwrap();

    let flags = load_config_flags(&path).unwrap();
    assert!(flags.watch);
    assert_eq!(flags.theme, Some(ThemeMode::Light));
    assert_eq!(flags.output, Some(PathBuf::from("paper.html")));
}

#[test]
fn test_cli_flags_override_file_flags() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join(".papersetrc");
    std::fs::write(&path, "--watch\n--theme light\n--heading-offset 0\n").unwrap();

    let file_flags = load_config_flags(&path).unwrap();
    let cli_args = vec![
        "paperset".to_string(),
        "--theme".to_string(),
        "dark".to_string(),
        "--json".to_string(),
        "paper.md".to_string(),
    ];
    let cli_flags = parse_flag_tokens(&cli_args);

    let effective = file_flags.union(&cli_flags);
    assert!(effective.watch, "file flags should remain enabled");
    assert!(effective.json, "cli flags should be applied");
    assert_eq!(effective.theme, Some(ThemeMode::Dark), "cli should override theme");
    assert_eq!(
        effective.heading_offset,
        Some(0),
        "file config should be preserved when CLI does not override"
    );
}

#[test]
fn test_parse_flag_tokens_handles_equals_syntax() {
    let args = vec![
        "paperset".to_string(),
        "--theme=dark".to_string(),
        "--output=out.html".to_string(),
        "--heading-offset=2".to_string(),
    ];
    let flags = parse_flag_tokens(&args);
    assert_eq!(flags.theme, Some(ThemeMode::Dark));
    assert_eq!(flags.output, Some(PathBuf::from("out.html")));
    assert_eq!(flags.heading_offset, Some(2));
}

#[test]
fn test_saved_flags_round_trip_through_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("nested").join("config");
    let flags = parse_flag_tokens(&[
        "--perf".to_string(),
        "--no-highlight".to_string(),
        "-w".to_string(),
    ]);

    save_config_flags(&path, &flags).unwrap();
    let loaded = load_config_flags(&path).unwrap();
    assert_eq!(loaded, flags);
    assert!(loaded.watch && loaded.perf && loaded.no_highlight);
}

#[test]
fn test_config_union_merges_booleans() {
    let file = ConfigFlags {
        watch: true,
        no_highlight: true,
        ..ConfigFlags::default()
    };
    let cli = ConfigFlags {
        json: true,
        perf: true,
        ..ConfigFlags::default()
    };
    let merged = file.union(&cli);
    assert!(merged.watch);
    assert!(merged.no_highlight);
    assert!(merged.json);
    assert!(merged.perf);
}
