use inkframe_core::{Point, Rgba, StageConfig};
use inkframe_scene::image_cache::ImageCache;
use inkframe_scene::text::MonospaceMeasure;
use inkframe_scene::{LayerBuilder, LayerId, Stage, TextStyle};

/// Six non-overlapping shapes plus the position each one covers.
fn populate(stage: &mut Stage) -> Vec<(LayerId, Point)> {
    ImageCache::global()
        .insert_rgba("hit-testing-swatch", 2, 2, &[0, 0, 255, 255].repeat(4))
        .unwrap();
    stage.scene_mut().set_measure(MonospaceMeasure::default());

    let shapes = vec![
        (
            LayerBuilder::rect(10.0, 10.0, 30.0, 30.0).fill(Rgba::RED),
            Point::new(25.0, 25.0),
        ),
        (
            LayerBuilder::ellipse(60.0, 10.0, 30.0, 30.0).fill(Rgba::RED),
            Point::new(75.0, 25.0),
        ),
        (
            LayerBuilder::polygon(110.0, 10.0, 30.0, 30.0, 5).fill(Rgba::RED),
            Point::new(125.0, 26.0),
        ),
        (
            LayerBuilder::line(Point::new(160.0, 25.0), Point::new(190.0, 25.0))
                .stroke(Rgba::BLACK, 6.0),
            Point::new(175.0, 25.0),
        ),
        (
            LayerBuilder::text(210.0, 10.0, "abc", TextStyle::default().with_font_size(20.0)),
            Point::new(228.0, 22.0),
        ),
        (
            LayerBuilder::image(260.0, 10.0, 30.0, 30.0, "hit-testing-swatch"),
            Point::new(275.0, 25.0),
        ),
    ];
    shapes
        .into_iter()
        .map(|(builder, probe)| (stage.add(builder).unwrap(), probe))
        .collect()
}

#[test]
fn every_shape_is_found_under_its_own_pixels() {
    let mut stage = Stage::new(StageConfig::new(300, 60)).unwrap();
    let shapes = populate(&mut stage);
    stage.render();
    for (id, probe) in &shapes {
        assert_eq!(stage.hit_test(probe.x, probe.y), Some(*id), "probe {:?}", probe);
    }
}

#[test]
fn debug_codec_round_trips_too() {
    let mut stage = Stage::new(StageConfig::new(300, 60).debug(true)).unwrap();
    let shapes = populate(&mut stage);
    stage.render();
    for (id, probe) in &shapes {
        assert_eq!(stage.hit_test(probe.x, probe.y), Some(*id));
    }
}

#[test]
fn empty_stage_area_resolves_to_root() {
    let mut stage = Stage::new(StageConfig::new(300, 60)).unwrap();
    populate(&mut stage);
    stage.render();
    assert_eq!(stage.hit_test(5.0, 55.0), Some(stage.root()));
    assert_eq!(stage.hit_test(-1.0, 5.0), None);
    assert_eq!(stage.hit_test(300.0, 5.0), None);
}

#[test]
fn destroyed_layer_is_no_longer_hit() {
    let mut stage = Stage::new(StageConfig::new(300, 60)).unwrap();
    let shapes = populate(&mut stage);
    stage.render();
    let (rect, probe) = shapes[0];
    stage.scene_mut().destroy(rect).unwrap();
    stage.render();
    assert_eq!(stage.hit_test(probe.x, probe.y), Some(stage.root()));
}

#[test]
fn top_most_sibling_wins() {
    let mut stage = Stage::new(StageConfig::new(100, 100)).unwrap();
    let below = stage.add(LayerBuilder::rect(10.0, 10.0, 50.0, 50.0)).unwrap();
    let above = stage.add(LayerBuilder::rect(30.0, 30.0, 50.0, 50.0)).unwrap();
    stage.render();
    assert_eq!(stage.hit_test(40.0, 40.0), Some(above));

    stage.scene_mut().bring_to_front(below).unwrap();
    stage.render();
    assert_eq!(stage.hit_test(40.0, 40.0), Some(below));
}

#[test]
fn hidden_layers_are_not_hit() {
    let mut stage = Stage::new(StageConfig::new(100, 100)).unwrap();
    let rect = stage
        .add(LayerBuilder::rect(10.0, 10.0, 50.0, 50.0).visible(false))
        .unwrap();
    stage.render();
    assert_ne!(stage.hit_test(30.0, 30.0), Some(rect));
}

#[test]
fn transparent_layers_stay_interactive() {
    let mut stage = Stage::new(StageConfig::new(100, 100)).unwrap();
    let rect = stage
        .add(LayerBuilder::rect(10.0, 10.0, 50.0, 50.0).opacity(0.0))
        .unwrap();
    stage.render();
    assert_eq!(stage.hit_test(30.0, 30.0), Some(rect));
}

#[test]
fn opacity_does_not_leak_into_siblings() {
    let blue = Rgba::rgb(0, 0, 255);
    let mut stage = Stage::new(StageConfig::new(100, 50)).unwrap();
    stage
        .add(
            LayerBuilder::rect(0.0, 0.0, 40.0, 40.0)
                .fill(Rgba::RED)
                .stroke(Rgba::BLACK, 0.0)
                .opacity(0.5),
        )
        .unwrap();
    stage
        .add(
            LayerBuilder::rect(50.0, 0.0, 40.0, 40.0)
                .fill(blue)
                .stroke(Rgba::BLACK, 0.0),
        )
        .unwrap();
    stage.render();

    let faded = stage.surface().pixel(20, 20).unwrap();
    assert_eq!(faded.red(), 255);
    assert!((120..=135).contains(&faded.green()));

    let solid = stage.surface().pixel(70, 20).unwrap();
    assert_eq!(
        (solid.red(), solid.green(), solid.blue(), solid.alpha()),
        (0, 0, 255, 255)
    );
}

#[test]
fn nested_opacity_multiplies() {
    let blue = Rgba::rgb(0, 0, 255);
    let mut stage = Stage::new(StageConfig::new(60, 60)).unwrap();
    let frame = stage
        .add(LayerBuilder::frame(0.0, 0.0, 60.0, 60.0).opacity(0.5))
        .unwrap();
    let rect = stage
        .scene_mut()
        .insert(
            LayerBuilder::rect(10.0, 10.0, 40.0, 40.0)
                .fill(blue)
                .stroke(Rgba::BLACK, 0.0)
                .opacity(0.5),
        )
        .unwrap();
    stage.scene_mut().add_child(frame, rect).unwrap();
    stage.render();

    // 0.5 * 0.5 of blue over the white background
    let pixel = stage.surface().pixel(30, 30).unwrap();
    assert_eq!(pixel.blue(), 255);
    assert!((185..=197).contains(&pixel.red()), "red = {}", pixel.red());
    assert_eq!(stage.hit_test(30.0, 30.0), Some(rect));
}

#[test]
fn empty_clipping_frame_hides_its_children() {
    let mut stage = Stage::new(StageConfig::new(60, 60)).unwrap();
    let outer = stage
        .add(LayerBuilder::frame(0.0, 0.0, 60.0, 60.0).clip(true))
        .unwrap();
    let empty = stage
        .scene_mut()
        .insert(LayerBuilder::frame(10.0, 10.0, 0.0, 0.0).clip(true))
        .unwrap();
    let rect = stage
        .scene_mut()
        .insert(LayerBuilder::rect(0.0, 0.0, 30.0, 30.0).fill(Rgba::RED))
        .unwrap();
    stage.scene_mut().add_child(outer, empty).unwrap();
    stage.scene_mut().add_child(empty, rect).unwrap();
    stage.render();

    let pixel = stage.surface().pixel(20, 20).unwrap();
    assert_eq!(
        (pixel.red(), pixel.green(), pixel.blue()),
        (255, 255, 255)
    );
    assert_eq!(stage.hit_test(20.0, 20.0), Some(outer));
}

#[test]
fn non_interactive_stage_has_no_identity_surface() {
    let mut stage = Stage::new(StageConfig::new(50, 50).interactive(false)).unwrap();
    stage.add(LayerBuilder::rect(0.0, 0.0, 50.0, 50.0)).unwrap();
    stage.render();
    assert!(stage.identity_surface().is_none());
    assert_eq!(stage.hit_test(25.0, 25.0), None);
}
