use inkframe_core::SceneError;
use inkframe_scene::text::MonospaceMeasure;
use inkframe_scene::{LayerBuilder, Scene, TextAlign, TextStyle};

fn scene() -> Scene {
    let mut scene = Scene::default();
    scene.set_measure(MonospaceMeasure::default());
    scene
}

#[test]
fn truncated_text_ends_with_ellipsis() {
    let mut scene = scene();
    // 6px per character, so two characters fit in 13px
    let style = TextStyle::default()
        .with_font_size(10.0)
        .with_max_width(13.0)
        .with_max_lines(2)
        .truncate(true);
    let text = scene
        .insert(LayerBuilder::text(0.0, 0.0, "abcdef", style))
        .unwrap();

    let layout = scene.measure_text(text).unwrap();
    let lines: Vec<&str> = layout.lines.iter().map(|l| l.text.as_str()).collect();
    assert_eq!(lines, vec!["ab", "c\u{2026}"]);
    assert_eq!(scene.height(text).unwrap(), 24.0);
    assert_eq!(scene.width(text).unwrap(), 13.0);
}

#[test]
fn newlines_always_break() {
    let mut scene = scene();
    let text = scene
        .insert(LayerBuilder::text(0.0, 0.0, "a\nbc", TextStyle::default()))
        .unwrap();
    let layout = scene.measure_text(text).unwrap();
    assert_eq!(layout.lines.len(), 2);
    assert_eq!(layout.lines[1].text, "bc");
}

#[test]
fn setting_width_rewraps() {
    let mut scene = scene();
    let style = TextStyle::default().with_font_size(10.0);
    let text = scene
        .insert(LayerBuilder::text(0.0, 0.0, "abcd", style))
        .unwrap();
    assert_eq!(scene.measure_text(text).unwrap().lines.len(), 1);
    scene.set_width(text, 13.0).unwrap();
    assert_eq!(scene.measure_text(text).unwrap().lines.len(), 2);
}

#[test]
fn right_alignment_needs_a_max_width() {
    let mut scene = scene();
    let text = scene
        .insert(LayerBuilder::text(0.0, 0.0, "x", TextStyle::default()))
        .unwrap();
    let right = TextStyle::default().with_align(TextAlign::Right);
    assert!(matches!(
        scene.set_text_style(text, right.clone()),
        Err(SceneError::RightAlignWithoutMaxWidth)
    ));
    scene
        .set_text_style(text, right.with_max_width(100.0))
        .unwrap();
}

#[test]
fn alignment_parses_from_strings() {
    assert_eq!("center".parse::<TextAlign>().unwrap(), TextAlign::Center);
    assert!(matches!(
        "diagonal".parse::<TextAlign>(),
        Err(SceneError::UnknownMode(_))
    ));
}
