use super::*;

#[test]
fn fps_rejects_zero_parts() {
    assert!(Fps::new(0, 1).is_err());
    assert!(Fps::new(30, 0).is_err());
    assert_eq!(Fps::new(24, 1).unwrap(), Fps::whole(24));
}

#[test]
fn secs_to_frames_rounds_to_nearest() {
    let fps = Fps::whole(30);
    assert_eq!(fps.secs_to_frames_round(4.0), 120);
    assert_eq!(fps.secs_to_frames_round(0.0), 0);
    assert_eq!(Fps::whole(24).secs_to_frames_round(0.51), 12);
    assert!((fps.frames_to_secs(660) - 22.0).abs() < 1e-9);
}

#[test]
fn scaled_canvas_is_even_and_covers_factor() {
    let c = Canvas::new(854, 480).scaled(1.2);
    assert_eq!(c.width % 2, 0);
    assert_eq!(c.height % 2, 0);
    assert!(f64::from(c.width) >= 854.0 * 1.2);
    assert!(f64::from(c.height) >= 480.0 * 1.2);
}

#[test]
fn canvas_orientation_and_label() {
    assert!(!Canvas::new(480, 480).is_vertical());
    assert!(Canvas::new(480, 854).is_vertical());
    assert_eq!(Canvas::new(1280, 720).resolution_label(), "1280x720");
}
