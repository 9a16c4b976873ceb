use super::*;

const FRAMES: [Canvas; 3] = [
    Canvas::new(1280, 720),
    Canvas::new(720, 1280),
    Canvas::new(480, 480),
];

#[test]
fn every_variant_stays_within_bounds() {
    for frame in FRAMES {
        for effect in KenBurns::ALL {
            let motion = Motion::new(effect, 4.0, frame);
            for i in 0..=100 {
                let t = 4.0 * f64::from(i) / 100.0;
                let s = motion.sample(t);
                assert!(
                    (1.0 - 1e-12..=MAX_ZOOM + 1e-12).contains(&s.scale),
                    "{effect:?} scale {} at t={t}",
                    s.scale
                );
                assert!(s.dx.abs() <= 0.05 * f64::from(frame.width) + 1e-9, "{effect:?} dx");
                assert!(s.dy.abs() <= 0.05 * f64::from(frame.height) + 1e-9, "{effect:?} dy");
            }
        }
    }
}

#[test]
fn selection_cycles_through_all_twelve() {
    for (i, effect) in KenBurns::ALL.iter().enumerate() {
        assert_eq!(effect.index(), i);
        assert_eq!(KenBurns::for_position(i), *effect);
        assert_eq!(KenBurns::for_position(i + 12), *effect);
    }
}

#[test]
fn zoom_variants_hit_their_endpoints() {
    let frame = Canvas::new(1280, 720);
    let zoom_in = Motion::new(KenBurns::ZoomIn, 4.0, frame);
    assert_eq!(zoom_in.sample(0.0).scale, 1.0);
    assert!((zoom_in.sample(4.0).scale - 1.06).abs() < 1e-12);
    assert_eq!(zoom_in.sample(2.0).dx, 0.0);

    let zoom_out = Motion::new(KenBurns::ZoomOut, 4.0, frame);
    assert!((zoom_out.sample(0.0).scale - 1.06).abs() < 1e-12);
    assert_eq!(zoom_out.sample(4.0).scale, 1.0);
}

#[test]
fn pans_sweep_the_full_bound_without_zoom() {
    let frame = Canvas::new(1000, 500);
    let m = Motion::new(KenBurns::PanLeftToRight, 2.0, frame);
    assert_eq!(m.sample(0.0).dx, 50.0);
    assert_eq!(m.sample(2.0).dx, -50.0);
    assert_eq!(m.sample(1.0).dx, 0.0);
    assert_eq!(m.sample(1.0).scale, 1.0);

    let m = Motion::new(KenBurns::PanBottomToTop, 2.0, frame);
    assert_eq!(m.sample(0.0).dy, -25.0);
    assert_eq!(m.sample(2.0).dy, 25.0);
}

#[test]
fn combined_moves_use_half_amplitude_and_gentle_zoom() {
    let frame = Canvas::new(1000, 1000);
    let m = Motion::new(KenBurns::ZoomInPanRight, 4.0, frame);
    assert_eq!(m.sample(0.0).dx, 25.0);
    assert_eq!(m.sample(4.0).dx, -25.0);
    assert!((m.sample(4.0).scale - 1.03).abs() < 1e-12);

    let d = Motion::new(KenBurns::DiagonalTopLeftToBottomRight, 4.0, frame);
    let end = d.sample(4.0);
    assert!((end.scale - 1.02).abs() < 1e-12);
    assert_eq!((end.dx, end.dy), (-50.0, -50.0));
}

#[test]
fn sampling_is_deterministic_and_clamped() {
    let m = EffectEngine::motion_for(7, 4.0, Canvas::new(854, 480));
    assert_eq!(m.sample(1.3), m.sample(1.3));
    assert_eq!(m.sample(-1.0), m.sample(0.0));
    assert_eq!(m.sample(99.0), m.sample(4.0));
}

#[test]
fn transform_keeps_frame_covered() {
    let frame = Canvas::new(1280, 720);
    let plate = EffectEngine::plate_for(frame);
    assert_eq!(plate, Canvas::new(1536, 864));
    for effect in KenBurns::ALL {
        let m = Motion::new(effect, 4.0, frame);
        for t in [0.0, 1.0, 2.5, 4.0] {
            let a = m.transform(t, plate);
            let tl = a * kurbo::Point::new(0.0, 0.0);
            let br = a * kurbo::Point::new(f64::from(plate.width), f64::from(plate.height));
            assert!(tl.x <= 0.0 && tl.y <= 0.0, "{effect:?} at {t}");
            assert!(br.x >= 1280.0 && br.y >= 720.0, "{effect:?} at {t}");
        }
    }
}
