use super::*;

fn cfg() -> SinkConfig {
    SinkConfig {
        width: 2,
        height: 2,
        fps: Fps::whole(24),
        bitrate_kbps: 1_000,
    }
}

fn frame(width: u32, height: u32) -> FrameRGBA {
    FrameRGBA {
        width,
        height,
        data: vec![255; (width * height * 4) as usize],
    }
}

#[test]
fn in_memory_sink_captures_frames_in_order() {
    let mut sink = InMemorySink::new();
    sink.begin(cfg()).unwrap();
    sink.push_frame(FrameIndex(0), &frame(2, 2)).unwrap();
    sink.push_frame(FrameIndex(1), &frame(2, 2)).unwrap();
    sink.end().unwrap();
    assert!(sink.is_finished());
    assert_eq!(sink.config(), Some(cfg()));
    let idx: Vec<u64> = sink.frames().iter().map(|(i, _)| i.0).collect();
    assert_eq!(idx, [0, 1]);
}

#[test]
fn summary_encoder_writes_frame_count() {
    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("out.mp4");
    let mut sink = SummaryEncoder.open(&out).unwrap();
    sink.begin(cfg()).unwrap();
    for i in 0..5 {
        sink.push_frame(FrameIndex(i), &frame(2, 2)).unwrap();
    }
    sink.end().unwrap();

    let summary: FrameSummary = serde_json::from_slice(&std::fs::read(&out).unwrap()).unwrap();
    assert_eq!(summary.frames, 5);
    assert_eq!(summary.config, cfg());
}

#[test]
fn summary_sink_rejects_bad_frames() {
    let dir = tempfile::tempdir().unwrap();
    let mut sink = SummaryEncoder.open(&dir.path().join("out.mp4")).unwrap();
    assert!(sink.push_frame(FrameIndex(0), &frame(2, 2)).is_err());

    sink.begin(cfg()).unwrap();
    let err = sink.push_frame(FrameIndex(0), &frame(4, 2)).unwrap_err();
    assert!(matches!(err, RenderError::Encoding(_)));

    sink.push_frame(FrameIndex(3), &frame(2, 2)).unwrap();
    assert!(sink.push_frame(FrameIndex(3), &frame(2, 2)).is_err());
}
