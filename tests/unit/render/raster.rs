use super::*;

fn solid(width: u32, height: u32, px: [u8; 4]) -> ImagePaint {
    let bytes: Vec<u8> = std::iter::repeat_n(px, (width * height) as usize)
        .flatten()
        .collect();
    ImagePaint::from_premul(&bytes, width, height).unwrap()
}

fn assert_close(actual: Option<[u8; 4]>, expected: [u8; 4]) {
    let actual = actual.expect("pixel in bounds");
    for (a, e) in actual.iter().zip(expected) {
        assert!(a.abs_diff(e) <= 2, "{actual:?} != {expected:?}");
    }
}

#[test]
fn clear_fills_the_whole_frame() {
    let mut p = Painter::new(Canvas::new(16, 8)).unwrap();
    p.clear(Rgba8::WHITE);
    let frame = p.finish();
    assert_eq!((frame.width, frame.height), (16, 8));
    assert_eq!(frame.data.len(), 16 * 8 * 4);
    assert!(frame.data.chunks_exact(4).all(|px| px == [255, 255, 255, 255]));
}

#[test]
fn fill_rect_only_touches_its_area() {
    let mut p = Painter::new(Canvas::new(20, 20)).unwrap();
    p.clear(Rgba8::BLACK);
    p.fill_rect(Rect::new(0.0, 0.0, 10.0, 20.0), Rgba8::opaque(255, 0, 0));
    let frame = p.finish();
    assert_eq!(frame.pixel(2, 10), Some([255, 0, 0, 255]));
    assert_eq!(frame.pixel(15, 10), Some([0, 0, 0, 255]));
    assert_eq!(frame.pixel(20, 0), None);
}

#[test]
fn painter_is_reusable_across_frames() {
    let mut p = Painter::new(Canvas::new(8, 8)).unwrap();
    p.clear(Rgba8::BLACK);
    p.fill_rect(Rect::new(0.0, 0.0, 8.0, 8.0), Rgba8::WHITE);
    let _ = p.finish();
    p.clear(Rgba8::BLACK);
    let second = p.finish();
    assert_eq!(second.pixel(4, 4), Some([0, 0, 0, 255]));
}

#[test]
fn draw_image_applies_transform() {
    let img = solid(4, 4, [0, 0, 255, 255]);
    let mut p = Painter::new(Canvas::new(16, 16)).unwrap();
    p.clear(Rgba8::WHITE);
    p.draw_image(&img, Affine::translate((8.0, 8.0)) * Affine::scale(2.0), 1.0);
    let frame = p.finish();
    assert_close(frame.pixel(12, 12), [0, 0, 255, 255]);
    assert_eq!(frame.pixel(3, 3), Some([255, 255, 255, 255]));
}

#[test]
fn circle_mask_leaves_corners_untouched() {
    let img = solid(10, 10, [0, 128, 0, 255]);
    let mut p = Painter::new(Canvas::new(40, 40)).unwrap();
    p.clear(Rgba8::WHITE);
    p.draw_image_in_circle(&img, Point::new(20.0, 20.0), 15.0);
    let frame = p.finish();
    assert_close(frame.pixel(20, 20), [0, 128, 0, 255]);
    assert_eq!(frame.pixel(7, 7), Some([255, 255, 255, 255]));
    assert_eq!(frame.pixel(1, 20), Some([255, 255, 255, 255]));
}

#[test]
fn fit_transform_preserves_aspect_and_centers() {
    let a = fit_transform(Canvas::new(200, 100), Rect::new(0.0, 0.0, 100.0, 100.0));
    let tl = a * Point::new(0.0, 0.0);
    let br = a * Point::new(200.0, 100.0);
    assert_eq!((tl.x, tl.y), (0.0, 25.0));
    assert_eq!((br.x, br.y), (100.0, 75.0));
}

#[test]
fn oversized_or_empty_canvas_is_rejected() {
    assert!(Painter::new(Canvas::new(70_000, 10)).is_err());
    assert!(Painter::new(Canvas::new(0, 10)).is_err());
    assert!(ImagePaint::from_premul(&[0; 7], 1, 2).is_err());
}
