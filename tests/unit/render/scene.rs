use super::*;
use crate::assets::fonts::FontBook;

fn solid(width: u32, height: u32, px: [u8; 4]) -> ImagePaint {
    let bytes: Vec<u8> = std::iter::repeat_n(px, (width * height) as usize)
        .flatten()
        .collect();
    ImagePaint::from_premul(&bytes, width, height).unwrap()
}

fn near(actual: Option<[u8; 4]>, expected: [u8; 4]) -> bool {
    actual.is_some_and(|a| a.iter().zip(expected).all(|(x, y)| x.abs_diff(y) <= 2))
}

#[test]
fn intro_layout_is_resolution_independent() {
    let a = IntroLayout::compute(Canvas::new(854, 480), Orientation::Horizontal);
    let b = IntroLayout::compute(Canvas::new(1708, 960), Orientation::Horizontal);
    assert!((b.title_size_px - 2.0 * a.title_size_px).abs() < 1e-9);
    assert!((b.logo_box.y0 - 2.0 * a.logo_box.y0).abs() < 1e-9);
    assert!(a.title_size_px > 2.0 * a.presents_size_px);
    assert!(a.logo_box.y1 < a.presents_center_y);
}

#[test]
fn outro_layout_puts_details_beside_or_below() {
    let wide = OutroLayout::compute(Canvas::new(1280, 720), Orientation::Horizontal);
    assert!(wide.details_x.unwrap() > wide.portrait_center.x + wide.portrait_radius);

    let tall = OutroLayout::compute(Canvas::new(720, 1280), Orientation::Vertical);
    assert!(tall.details_x.is_none());
    assert!(tall.details_y > tall.portrait_center.y + tall.portrait_radius);
    assert!(tall.website_center_y > tall.logo_box.y1);
}

#[test]
fn intro_is_white_with_centered_logo() {
    let canvas = Canvas::new(160, 90);
    let logo = solid(20, 10, [255, 0, 0, 255]);
    let mut kit = TextKit::without_fonts();
    let mut composer = SceneComposer::new(&mut kit, canvas, Orientation::Horizontal).unwrap();
    let intro = composer
        .intro(
            &IntroCard {
                title: "Lakeside Villa",
                logo: Some(&logo),
            },
            5.0,
        )
        .unwrap();
    assert_eq!(intro.duration_secs, 5.0);
    assert_eq!(intro.frame.canvas(), canvas);

    let layout = IntroLayout::compute(canvas, Orientation::Horizontal);
    let c = layout.logo_box.center();
    assert!(near(intro.frame.pixel(c.x as u32, c.y as u32), [255, 0, 0, 255]));
    assert_eq!(intro.frame.pixel(2, 88), Some([255, 255, 255, 255]));
}

#[test]
fn outro_masks_agent_photo_to_a_ringed_circle() {
    let canvas = Canvas::new(640, 360);
    let photo = solid(30, 40, [0, 0, 255, 255]);
    let accent = Rgba8::opaque(0, 160, 0);
    let mut kit = TextKit::without_fonts();
    let mut composer = SceneComposer::new(&mut kit, canvas, Orientation::Horizontal).unwrap();
    let outro = composer
        .outro(
            &OutroCard {
                agent: Some(AgentCard {
                    name: "Jane Doe",
                    phone: "+31 6 1234 5678",
                    email: "jane@example.com",
                    photo: Some(&photo),
                }),
                website: "www.example.com",
                logo: None,
                accent,
            },
            5.0,
        )
        .unwrap();

    let layout = OutroLayout::compute(canvas, Orientation::Horizontal);
    let c = layout.portrait_center;
    assert!(near(outro.frame.pixel(c.x as u32, c.y as u32), [0, 0, 255, 255]));
    let ring_x = (c.x + layout.portrait_radius * 1.02) as u32;
    assert!(near(outro.frame.pixel(ring_x, c.y as u32), accent.to_array()));
    let corner_x = (c.x + layout.portrait_radius * 0.8) as u32;
    let corner_y = (c.y - layout.portrait_radius * 0.8) as u32;
    assert_eq!(outro.frame.pixel(corner_x, corner_y), Some([255, 255, 255, 255]));
}

#[test]
fn outro_without_agent_is_plain() {
    let canvas = Canvas::new(90, 160);
    let mut kit = TextKit::without_fonts();
    let mut composer = SceneComposer::new(&mut kit, canvas, Orientation::Vertical).unwrap();
    let outro = composer
        .outro(
            &OutroCard {
                agent: None,
                website: "",
                logo: None,
                accent: Rgba8::NEUTRAL_ACCENT,
            },
            2.0,
        )
        .unwrap();
    assert!(outro.frame.data.chunks_exact(4).all(|px| px == [255, 255, 255, 255]));
}

#[test]
fn intro_text_darkens_the_card_when_fonts_exist() {
    let mut kit = TextKit::load(&FontBook::discover(&[]), "");
    if !kit.has_fonts() {
        return;
    }
    let canvas = Canvas::new(640, 360);
    let mut composer = SceneComposer::new(&mut kit, canvas, Orientation::Horizontal).unwrap();
    let intro = composer
        .intro(&IntroCard { title: "Lakeside Villa", logo: None }, 5.0)
        .unwrap();
    let layout = IntroLayout::compute(canvas, Orientation::Horizontal);
    let title_band = (layout.presents_center_y as u32)..(canvas.height - 1);
    let dark = title_band
        .flat_map(|y| (0..canvas.width).map(move |x| (x, y)))
        .filter(|&(x, y)| intro.frame.pixel(x, y).is_some_and(|p| p[0] < 100))
        .count();
    assert!(dark > 100, "expected title ink, found {dark} dark pixels");
}
