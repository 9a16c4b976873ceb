use super::*;

fn touch(dir: &Path, rel: &str) {
    let path = dir.join(rel);
    std::fs::create_dir_all(path.parent().unwrap()).unwrap();
    std::fs::write(path, b"not really a font").unwrap();
}

fn names(paths: Vec<&Path>) -> Vec<String> {
    paths
        .into_iter()
        .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
        .collect()
}

#[test]
fn scan_is_recursive_and_filters_extensions() {
    let dir = tempfile::tempdir().unwrap();
    touch(dir.path(), "truetype/open/OpenSans-Regular.ttf");
    touch(dir.path(), "Roboto.otf");
    touch(dir.path(), "readme.txt");
    let book = FontBook::scan(&[dir.path().to_path_buf()]);
    assert_eq!(book.len(), 2);
}

#[test]
fn requested_family_and_weight_rank_first() {
    let dir = tempfile::tempdir().unwrap();
    touch(dir.path(), "DejaVuSans.ttf");
    touch(dir.path(), "OpenSans-Bold.ttf");
    touch(dir.path(), "OpenSans-Italic.ttf");
    touch(dir.path(), "OpenSans-Regular.ttf");
    touch(dir.path(), "Zapfino.ttf");
    let book = FontBook::scan(&[dir.path().to_path_buf()]);

    let regular = names(book.candidates("Open Sans", FontWeight::Regular));
    assert_eq!(regular[0], "OpenSans-Regular.ttf");
    assert_eq!(*regular.last().unwrap(), "Zapfino.ttf");

    let bold = names(book.candidates("open sans", FontWeight::Bold));
    assert_eq!(bold[0], "OpenSans-Bold.ttf");
}

#[test]
fn unknown_family_uses_fallback_order() {
    let dir = tempfile::tempdir().unwrap();
    touch(dir.path(), "Zapfino.ttf");
    touch(dir.path(), "LiberationSans-Regular.ttf");
    touch(dir.path(), "DejaVuSans.ttf");
    let book = FontBook::scan(&[dir.path().to_path_buf()]);
    let ranked = names(book.candidates("Comic Neue", FontWeight::Regular));
    assert_eq!(ranked, ["DejaVuSans.ttf", "LiberationSans-Regular.ttf", "Zapfino.ttf"]);

    let (path, bytes) = book.load("", FontWeight::Regular).unwrap();
    assert!(path.ends_with("DejaVuSans.ttf"));
    assert_eq!(bytes, b"not really a font");
}

#[test]
fn kit_without_fonts_omits_text() {
    let mut kit = TextKit::without_fonts();
    assert!(!kit.has_fonts());
    let block = kit
        .layout("Lakeside Villa", TextStyle::new(32.0, Rgba8::WHITE))
        .unwrap();
    assert!(block.is_none());
}

#[test]
fn kit_with_unusable_font_files_degrades_to_no_text() {
    let dir = tempfile::tempdir().unwrap();
    touch(dir.path(), "Broken.ttf");
    let book = FontBook::scan(&[dir.path().to_path_buf()]);
    let kit = TextKit::load(&book, "Broken");
    assert!(!kit.has_fonts());
}

#[test]
fn register_rejects_non_font_bytes() {
    let mut engine = TextLayoutEngine::new();
    let err = engine.register(b"garbage".to_vec()).unwrap_err();
    assert!(matches!(err, RenderError::Resource(_)));
}

#[test]
fn real_system_font_shapes_and_wraps_when_available() {
    let book = FontBook::discover(&[]);
    let mut kit = TextKit::load(&book, "DejaVu Sans");
    if !kit.has_fonts() {
        return;
    }
    let single = kit
        .layout("Contact", TextStyle::new(40.0, Rgba8::INK))
        .unwrap()
        .unwrap();
    assert!(single.width() > 0.0);
    assert!(single.height() > 0.0);

    let wrapped = kit
        .layout(
            "A bright family home with garden and lake views",
            TextStyle::new(40.0, Rgba8::INK).bold().wrap_at(200.0),
        )
        .unwrap()
        .unwrap();
    assert!(wrapped.height() > single.height());
    assert!(wrapped.width() <= 200.0 + 1.0);

    assert!(kit.layout("   ", TextStyle::new(40.0, Rgba8::INK)).unwrap().is_none());
}

#[test]
fn each_weight_is_shaped_and_drawn_with_the_same_font_file() {
    let book = FontBook::discover(&[]);
    let (Some((_, regular)), Some((_, bold))) = (
        book.load("DejaVu Sans", FontWeight::Regular),
        book.load("DejaVu Sans", FontWeight::Bold),
    ) else {
        return;
    };
    if regular == bold {
        return;
    }
    let mut kit = TextKit::load(&book, "DejaVu Sans");
    if !kit.has_fonts() {
        return;
    }

    for (style, file) in [
        (TextStyle::new(36.0, Rgba8::WHITE), &regular),
        (TextStyle::new(36.0, Rgba8::WHITE).bold(), &bold),
    ] {
        let block = kit.layout("Just listed", style).unwrap().unwrap();
        assert_eq!(block.font.data.len(), file.len());
        let mut runs = 0;
        for line in block.layout.lines() {
            for item in line.items() {
                if let parley::layout::PositionedLayoutItem::GlyphRun(run) = item {
                    assert_eq!(run.run().font().data.len(), block.font.data.len());
                    runs += 1;
                }
            }
        }
        assert!(runs > 0);
    }
}
