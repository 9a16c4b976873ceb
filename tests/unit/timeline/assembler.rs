use base64::Engine as _;
use chrono::Utc;

use super::*;
use crate::{
    encode::sink::InMemorySink,
    model::domain::{OutputFormat, Photo},
    plan::gate::QualityTier,
};

fn gradient_png(w: u32, h: u32) -> Vec<u8> {
    let img = image::RgbaImage::from_fn(w, h, |x, y| {
        image::Rgba([((x * 7) % 256) as u8, ((y * 5) % 256) as u8, 90, 255])
    });
    let mut out = std::io::Cursor::new(Vec::new());
    img.write_to(&mut out, image::ImageFormat::Png).unwrap();
    out.into_inner()
}

fn inline(bytes: &[u8]) -> ImageRef {
    ImageRef::Base64(base64::engine::general_purpose::STANDARD.encode(bytes))
}

fn photo(id: &str, image: ImageRef, position: u32) -> Photo {
    Photo {
        id: id.to_string(),
        project_id: "p1".to_string(),
        original: image,
        enhanced: None,
        caption: format!("Room {id}"),
        position,
    }
}

fn project(photos: Vec<Photo>) -> Project {
    Project {
        id: "p1".to_string(),
        owner_id: "u1".to_string(),
        title: "Lakeside Villa".to_string(),
        photos,
        banner_text: Some("Just listed".to_string()),
        price_text: Some("450,000".to_string()),
        currency_symbol: None,
        agent_id: None,
        music: None,
        format: OutputFormat::Landscape,
        created_at: Utc::now(),
        updated_at: Utc::now(),
    }
}

fn tiny_profile() -> EncodeProfile {
    EncodeProfile {
        tier: QualityTier::Sd,
        format: OutputFormat::Landscape,
        canvas: Canvas::new(64, 36),
        fps: Fps::whole(10),
        bitrate_kbps: 100,
    }
}

fn timing() -> Timing {
    Timing {
        intro_secs: 0.5,
        photo_secs: 0.4,
        outro_secs: 0.5,
    }
}

fn assemble(project: &Project) -> RenderResult<Timeline> {
    let branding = BrandingProfile::neutral("u1");
    let input = AssemblyInput {
        project,
        branding: &branding,
        agent: None,
        website: "www.example.com",
    };
    ClipAssembler::new(&tiny_profile(), timing()).assemble(
        &mut TextKit::without_fonts(),
        &input,
        &CancelToken::new(),
    )
}

fn three_photo_project() -> Project {
    let png = gradient_png(40, 30);
    project(vec![
        photo("a", inline(&png), 0),
        photo("b", inline(&png), 1),
        photo("c", inline(&png), 2),
    ])
}

#[test]
fn bookends_wrap_one_segment_per_photo() {
    let timeline = assemble(&three_photo_project()).unwrap();
    assert_eq!(timeline.segments.len(), 5);
    assert!(matches!(timeline.segments[0], Segment::Still { frames: 5, .. }));
    assert!(matches!(timeline.segments[4], Segment::Still { frames: 5, .. }));
    assert_eq!(timeline.photo_count(), 3);
    assert_eq!(timeline.total_frames(), 5 + 3 * 4 + 5);
    assert!((timeline.duration_secs() - timing().total_secs(3)).abs() < 1e-9);

    let Segment::Still { frame, .. } = &timeline.segments[0] else {
        unreachable!()
    };
    assert_eq!(frame.canvas(), Canvas::new(64, 36));
    assert_eq!(frame.pixel(0, 0), Some([255, 255, 255, 255]));
}

#[test]
fn photos_follow_position_order() {
    let png = gradient_png(40, 30);
    let project = project(vec![
        photo("late", inline(&png), 7),
        photo("first", inline(&png), 0),
        photo("mid", inline(&png), 3),
    ]);
    let timeline = assemble(&project).unwrap();
    let ids: Vec<&str> = timeline
        .segments
        .iter()
        .filter_map(|s| match s {
            Segment::Motion { photo_id, .. } => Some(photo_id.as_str()),
            Segment::Still { .. } => None,
        })
        .collect();
    assert_eq!(ids, ["first", "mid", "late"]);
}

#[test]
fn undecodable_photos_are_skipped() {
    let png = gradient_png(40, 30);
    let project = project(vec![
        photo("ok1", inline(&png), 0),
        photo("garbage", inline(b"definitely not an image"), 1),
        photo("bad-b64", ImageRef::Base64("%%%".to_string()), 2),
        photo("ok2", inline(&png), 3),
    ]);
    let timeline = assemble(&project).unwrap();
    assert_eq!(timeline.photo_count(), 2);
    assert_eq!(timeline.total_frames(), 5 + 2 * 4 + 5);
}

#[test]
fn zero_usable_photos_is_not_found() {
    let err = assemble(&project(Vec::new())).unwrap_err();
    assert!(matches!(err, RenderError::NotFound(_)), "{err}");

    let all_bad = project(vec![photo("x", inline(b"nope"), 0)]);
    let err = assemble(&all_bad).unwrap_err();
    assert!(matches!(err, RenderError::NotFound(_)), "{err}");
}

#[test]
fn motion_changes_the_frame_over_time() {
    let timeline = assemble(&three_photo_project()).unwrap();
    let first = timeline.render_frame(FrameIndex(5)).unwrap();
    let last = timeline.render_frame(FrameIndex(8)).unwrap();
    assert_eq!(first.canvas(), timeline.canvas);
    assert_ne!(first.data, last.data);
}

#[test]
fn frame_lookup_is_bounded() {
    let timeline = assemble(&three_photo_project()).unwrap();
    let total = timeline.total_frames();
    assert!(timeline.render_frame(FrameIndex(total - 1)).is_ok());
    assert!(matches!(
        timeline.render_frame(FrameIndex(total)),
        Err(RenderError::Validation(_))
    ));
    assert_eq!(timeline.frame_at_secs(1000.0), FrameIndex(total - 1));
    assert_eq!(timeline.frame_at_secs(-3.0), FrameIndex(0));
}

fn sink_config(timeline: &Timeline) -> SinkConfig {
    SinkConfig {
        width: timeline.canvas.width,
        height: timeline.canvas.height,
        fps: timeline.fps,
        bitrate_kbps: 100,
    }
}

#[test]
fn stream_pushes_every_frame_in_order() {
    let timeline = assemble(&three_photo_project()).unwrap();
    let mut sink = InMemorySink::new();
    let written = timeline
        .stream_into(&mut sink, sink_config(&timeline), &CancelToken::new())
        .unwrap();
    assert_eq!(written, timeline.total_frames());
    assert!(sink.is_finished());
    for (i, (idx, frame)) in sink.frames().iter().enumerate() {
        assert_eq!(idx.0, i as u64);
        assert_eq!(frame.canvas(), timeline.canvas);
    }
}

#[test]
fn cancelled_stream_never_finishes_the_sink() {
    let timeline = assemble(&three_photo_project()).unwrap();
    let cancel = CancelToken::new();
    cancel.cancel();
    let mut sink = InMemorySink::new();
    let err = timeline
        .stream_into(&mut sink, sink_config(&timeline), &cancel)
        .unwrap_err();
    assert!(matches!(err, RenderError::Cancelled));
    assert!(!sink.is_finished());
    assert!(sink.frames().is_empty());
}

#[test]
fn mismatched_sink_is_rejected() {
    let timeline = assemble(&three_photo_project()).unwrap();
    let mut cfg = sink_config(&timeline);
    cfg.width += 2;
    let err = timeline
        .stream_into(&mut InMemorySink::new(), cfg, &CancelToken::new())
        .unwrap_err();
    assert!(matches!(err, RenderError::Validation(_)));
}

#[test]
fn cancellation_during_assembly_stops_early() {
    let project = three_photo_project();
    let branding = BrandingProfile::neutral("u1");
    let cancel = CancelToken::new();
    cancel.cancel();
    let err = ClipAssembler::new(&tiny_profile(), timing())
        .assemble(
            &mut TextKit::without_fonts(),
            &AssemblyInput {
                project: &project,
                branding: &branding,
                agent: None,
                website: "",
            },
            &cancel,
        )
        .unwrap_err();
    assert!(matches!(err, RenderError::Cancelled));
}

#[test]
fn photo_segments_keep_encoded_bytes_until_rendered() {
    let png = gradient_png(40, 30);
    let timeline = assemble(&project(vec![photo("a", inline(&png), 0)])).unwrap();
    let Segment::Motion { plate, .. } = &timeline.segments[1] else {
        panic!("expected a photo segment");
    };
    assert_eq!(plate.encoded_len(), png.len());
    assert_eq!(plate.canvas(), EffectEngine::plate_for(timeline.canvas));

    let built = plate.build().unwrap();
    assert_eq!(built.canvas(), plate.canvas());
}

#[test]
fn streamed_photo_frames_match_random_access_frames() {
    let timeline = assemble(&three_photo_project()).unwrap();
    let mut sink = InMemorySink::new();
    timeline
        .stream_into(&mut sink, sink_config(&timeline), &CancelToken::new())
        .unwrap();
    for idx in [5u64, 7, 12, 16] {
        let direct = timeline.render_frame(FrameIndex(idx)).unwrap();
        assert_eq!(sink.frames()[idx as usize].1.data, direct.data, "frame {idx}");
    }
}
