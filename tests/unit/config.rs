use std::collections::HashMap;

use super::*;

fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
    let map: HashMap<String, String> = pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
    move |key: &str| map.get(key).cloned()
}

#[test]
fn defaults_match_published_durations() {
    let cfg = PipelineConfig::default();
    assert_eq!(cfg.timing, Timing { intro_secs: 5.0, photo_secs: 4.0, outro_secs: 5.0 });
    assert_eq!(cfg.timing.total_secs(3), 22.0);
    assert_eq!(cfg.stream_chunk_bytes, 1024 * 1024);
    cfg.validate().unwrap();
}

#[test]
fn json_file_overrides_only_given_fields() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("reels.json");
    std::fs::write(
        &path,
        r#"{"timing": {"intro_secs": 2.0}, "company_website": "www.lakeside.example"}"#,
    )
    .unwrap();
    let cfg = PipelineConfig::from_json_file(&path).unwrap();
    assert_eq!(cfg.timing.intro_secs, 2.0);
    assert_eq!(cfg.timing.photo_secs, 4.0);
    assert_eq!(cfg.company_website, "www.lakeside.example");
    assert_eq!(cfg.encoder, EncoderConfig::default());
}

#[test]
fn env_overrides_win_over_file_values() {
    let mut cfg = PipelineConfig::default();
    cfg.apply_env(env(&[
        ("REELS_PHOTO_SECS", "3.5"),
        ("REELS_WORKERS", "2"),
        ("REELS_X264_PRESET", "veryfast"),
        ("REELS_FFMPEG", "/opt/ffmpeg/bin/ffmpeg"),
        ("REELS_SCRATCH_DIR", "/var/tmp/reels"),
        ("REELS_INTRO_SECS", "  "),
    ]))
    .unwrap();
    assert_eq!(cfg.timing.photo_secs, 3.5);
    assert_eq!(cfg.timing.intro_secs, 5.0);
    assert_eq!(cfg.workers, Some(2));
    assert_eq!(cfg.encoder.ffmpeg_settings().preset, "veryfast");
    assert_eq!(cfg.encoder.ffmpeg, PathBuf::from("/opt/ffmpeg/bin/ffmpeg"));
    assert_eq!(cfg.scratch_dir, Some(PathBuf::from("/var/tmp/reels")));
}

#[test]
fn malformed_env_values_are_validation_errors() {
    let mut cfg = PipelineConfig::default();
    let err = cfg.apply_env(env(&[("REELS_OUTRO_SECS", "five")])).unwrap_err();
    assert!(matches!(err, RenderError::Validation(_)));
}

#[test]
fn validate_rejects_degenerate_values() {
    let mut cfg = PipelineConfig::default();
    cfg.timing.photo_secs = 0.0;
    assert!(cfg.validate().is_err());

    let mut cfg = PipelineConfig::default();
    cfg.stream_chunk_bytes = 0;
    assert!(cfg.validate().is_err());

    let mut cfg = PipelineConfig::default();
    cfg.workers = Some(0);
    assert!(cfg.validate().is_err());
}

#[test]
fn bad_config_file_is_a_validation_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("reels.json");
    std::fs::write(&path, "{not json").unwrap();
    assert!(matches!(
        PipelineConfig::from_json_file(&path).unwrap_err(),
        RenderError::Validation(_)
    ));
}
