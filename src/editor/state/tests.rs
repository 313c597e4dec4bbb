use super::*;
use crate::draw::{AnnotationKind, Bitmap, Point, BLUE, RED};
use crate::editor::{EditorEvent, MouseButton, PressOutcome, Tool};
use crate::history::Originator;

fn create_test_editor() -> Editor {
    let mut editor = Editor::new(EditorSettings::default());
    editor.load_image(gradient(100, 100));
    editor.take_events();
    editor
}

fn gradient(width: u32, height: u32) -> Bitmap {
    let mut bitmap = Bitmap::new(width, height);
    for y in 0..height {
        for x in 0..width {
            bitmap.put_pixel(x, y, [x as u8, y as u8, 200, 255]);
        }
    }
    bitmap
}

fn drag(editor: &mut Editor, from: (f64, f64), to: (f64, f64)) -> bool {
    editor.on_mouse_press(MouseButton::Left, Point::new(from.0, from.1));
    editor.on_mouse_motion(Point::new(to.0, to.1));
    editor.on_mouse_release(MouseButton::Left, Point::new(to.0, to.1))
}

#[test]
fn test_drawing_rectangle_adds_and_selects() {
    let mut editor = create_test_editor();
    editor.set_active_tool(Tool::Rectangle);

    assert!(drag(&mut editor, (10.0, 10.0), (40.0, 30.0)));
    assert_eq!(editor.annotations().len(), 1);
    let rect = &editor.annotations()[0];
    assert_eq!(rect.tool_kind(), Tool::Rectangle);
    assert!(rect.is_selected);
    assert_eq!(editor.selected_id(), Some(rect.id));
    assert!(editor.is_idle());
}

#[test]
fn test_freehand_is_not_selected_after_drawing() {
    let mut editor = create_test_editor();
    editor.set_active_tool(Tool::Freehand);
    editor.on_mouse_press(MouseButton::Left, Point::new(1.0, 1.0));
    editor.on_mouse_motion(Point::new(5.0, 5.0));
    editor.on_mouse_motion(Point::new(9.0, 2.0));
    assert!(editor.on_mouse_release(MouseButton::Left, Point::new(9.0, 2.0)));

    assert_eq!(editor.annotations().len(), 1);
    assert_eq!(editor.selected_id(), None);
    match &editor.annotations()[0].kind {
        AnnotationKind::Freehand { points } => assert_eq!(points.len(), 3),
        other => panic!("unexpected {other:?}"),
    }
}

#[test]
fn test_click_without_drag_discards_shape() {
    let mut editor = create_test_editor();
    editor.set_active_tool(Tool::Ellipse);
    editor.on_mouse_press(MouseButton::Left, Point::new(10.0, 10.0));
    assert!(!editor.on_mouse_release(MouseButton::Left, Point::new(11.0, 11.0)));
    assert!(editor.annotations().is_empty());
}

#[test]
fn test_click_with_text_tool_gets_default_box() {
    let mut editor = create_test_editor();
    editor.set_active_tool(Tool::Text);
    editor.on_mouse_press(MouseButton::Left, Point::new(10.0, 10.0));
    assert!(editor.on_mouse_release(MouseButton::Left, Point::new(10.0, 10.0)));
    let bounds = editor.annotations()[0].bounds();
    assert!(bounds.width > 2.0 && bounds.height > 2.0);
}

#[test]
fn test_step_numbers_increment() {
    let mut editor = create_test_editor();
    editor.set_active_tool(Tool::Step);
    for x in [10.0, 40.0, 70.0] {
        editor.on_mouse_press(MouseButton::Left, Point::new(x, 50.0));
        editor.on_mouse_release(MouseButton::Left, Point::new(x, 50.0));
    }
    let numbers: Vec<u32> = editor
        .annotations()
        .iter()
        .filter_map(|a| match a.kind {
            AnnotationKind::Step { number, .. } => Some(number),
            _ => None,
        })
        .collect();
    assert_eq!(numbers, vec![1, 2, 3]);
    assert_eq!(editor.next_step_number(), 4);
}

#[test]
fn test_select_tool_picks_topmost() {
    let mut editor = create_test_editor();
    editor.set_active_tool(Tool::Rectangle);
    drag(&mut editor, (10.0, 10.0), (50.0, 50.0));
    // Pressing inside the selection would drag it instead of drawing.
    editor.deselect();
    drag(&mut editor, (30.0, 30.0), (70.0, 70.0));
    let top = editor.annotations()[1].id;

    editor.set_active_tool(Tool::Select);
    editor.deselect();
    assert_eq!(
        editor.on_mouse_press(MouseButton::Left, Point::new(40.0, 40.0)),
        PressOutcome::Began
    );
    assert_eq!(editor.selected_id(), Some(top));
    editor.on_mouse_release(MouseButton::Left, Point::new(40.0, 40.0));

    // Empty canvas clears the selection.
    assert_eq!(
        editor.on_mouse_press(MouseButton::Left, Point::new(95.0, 5.0)),
        PressOutcome::Ignored
    );
    assert_eq!(editor.selected_id(), None);
}

#[test]
fn test_drag_selection_with_drawing_tool_moves_it() {
    let mut editor = create_test_editor();
    editor.set_active_tool(Tool::Rectangle);
    drag(&mut editor, (10.0, 10.0), (30.0, 30.0));

    // Still on the rectangle tool: pressing the selected body drags it.
    assert!(drag(&mut editor, (20.0, 20.0), (25.0, 40.0)));
    assert_eq!(editor.annotations().len(), 1);
    let bounds = editor.annotations()[0].bounds();
    assert_eq!((bounds.x, bounds.y), (15.0, 30.0));
}

#[test]
fn test_resize_corner_handle() {
    let mut editor = create_test_editor();
    editor.set_active_tool(Tool::Rectangle);
    drag(&mut editor, (10.0, 10.0), (30.0, 30.0));

    assert!(drag(&mut editor, (30.0, 30.0), (60.0, 45.0)));
    let bounds = editor.annotations()[0].bounds();
    assert_eq!((bounds.x, bounds.y, bounds.width, bounds.height), (10.0, 10.0, 50.0, 35.0));
}

#[test]
fn test_right_click_deletes_and_cancels() {
    let mut editor = create_test_editor();
    editor.set_active_tool(Tool::Rectangle);
    drag(&mut editor, (10.0, 10.0), (30.0, 30.0));

    assert_eq!(
        editor.on_mouse_press(MouseButton::Right, Point::new(10.0, 20.0)),
        PressOutcome::Deleted
    );
    assert!(editor.annotations().is_empty());
    assert_eq!(editor.selected_id(), None);

    editor.on_mouse_press(MouseButton::Left, Point::new(50.0, 50.0));
    editor.on_mouse_motion(Point::new(70.0, 70.0));
    assert_eq!(
        editor.on_mouse_press(MouseButton::Right, Point::new(70.0, 70.0)),
        PressOutcome::Cancelled
    );
    assert!(editor.annotations().is_empty());
    assert!(editor.is_idle());
}

#[test]
fn test_blur_cache_follows_motion() {
    let mut editor = create_test_editor();
    editor.set_active_tool(Tool::Blur);
    editor.on_mouse_press(MouseButton::Left, Point::new(10.0, 10.0));
    editor.on_mouse_motion(Point::new(30.0, 30.0));
    {
        let blur = &editor.annotations()[0];
        assert!(blur.effect().unwrap().is_fresh(&blur.bounds()));
    }
    editor.on_mouse_release(MouseButton::Left, Point::new(30.0, 30.0));

    // Dragging the finished region keeps its cache current.
    drag(&mut editor, (20.0, 20.0), (35.0, 25.0));
    let blur = &editor.annotations()[0];
    let cache = blur.effect().unwrap().fresh_cache(&blur.bounds()).unwrap();
    assert_eq!(cache.rect.x, 25);
}

#[test]
fn test_crop_tool_crops_source_and_shifts_annotations() {
    let mut editor = create_test_editor();
    editor.set_active_tool(Tool::Rectangle);
    drag(&mut editor, (50.0, 50.0), (60.0, 60.0));

    editor.set_active_tool(Tool::Crop);
    assert!(drag(&mut editor, (20.0, 30.0), (80.0, 90.0)));
    assert_eq!(editor.canvas_size(), (60, 60));
    assert_eq!(editor.annotations().len(), 1);
    let bounds = editor.annotations()[0].bounds();
    assert_eq!((bounds.x, bounds.y), (30.0, 20.0));
    assert_eq!(editor.source().unwrap().pixel(0, 0), Some([20, 30, 200, 255]));
}

#[test]
fn test_crop_covering_whole_source_is_no_change() {
    let mut editor = Editor::new(EditorSettings::default());
    editor.load_image(Bitmap::filled(50, 50, [1, 2, 3, 255]));
    editor.set_active_tool(Tool::Crop);
    assert!(!drag(&mut editor, (-10.0, -10.0), (60.0, 60.0)));
    assert_eq!(editor.canvas_size(), (50, 50));
    assert!(editor.annotations().is_empty());
}

#[test]
fn test_vertical_cut_out_shifts_later_annotations() {
    let mut editor = create_test_editor();
    editor.set_active_tool(Tool::Rectangle);
    drag(&mut editor, (70.0, 10.0), (90.0, 20.0));
    drag(&mut editor, (5.0, 10.0), (20.0, 20.0));

    editor.set_active_tool(Tool::CutOut);
    assert!(drag(&mut editor, (40.0, 50.0), (60.0, 52.0)));
    assert_eq!(editor.canvas_size(), (80, 100));
    assert_eq!(editor.source().unwrap().pixel(50, 0), Some([70, 0, 200, 255]));
    assert_eq!(editor.annotations()[0].bounds().x, 50.0);
    assert_eq!(editor.annotations()[1].bounds().x, 5.0);
}

#[test]
fn test_cut_out_rebuilds_effects_that_straddle_the_band() {
    let mut editor = create_test_editor();
    editor.set_active_tool(Tool::Pixelate);
    drag(&mut editor, (30.0, 0.0), (70.0, 10.0));
    assert!(editor.set_effect_amount(1.0));

    assert!(editor.cut_out(true, 40, 60));
    let pixelate = &editor.annotations()[0];
    assert_eq!(pixelate.bounds().x, 30.0);

    let mut expected = pixelate.clone();
    expected.update_effect(editor.source());
    let cache = pixelate.effect().unwrap().cache.as_ref().unwrap();
    assert_eq!(Some(cache), expected.effect().unwrap().cache.as_ref());
    // Offset 15 now shows what used to be column 65.
    assert_eq!(cache.bitmap.pixel(15, 0), Some([65, 0, 200, 255]));
}

#[test]
fn test_crop_rebuilds_effects_crossing_the_new_edge() {
    let mut editor = create_test_editor();
    editor.set_active_tool(Tool::Pixelate);
    drag(&mut editor, (10.0, 10.0), (30.0, 20.0));
    assert!(editor.set_effect_amount(1.0));

    assert!(editor.crop(&crate::draw::Bounds {
        x: 0.0,
        y: 0.0,
        width: 20.0,
        height: 50.0,
    }));
    let pixelate = &editor.annotations()[0];
    let cache = pixelate.effect().unwrap().cache.as_ref().unwrap();
    // Columns past the new right edge have no source pixels left.
    assert_eq!(cache.bitmap.pixel(15, 0).map(|px| px[3]), Some(0));
    assert_eq!(cache.bitmap.pixel(5, 0), Some([15, 10, 200, 255]));
}

#[test]
fn test_reselecting_active_tool_keeps_drawing() {
    let mut editor = create_test_editor();
    editor.set_active_tool(Tool::Rectangle);
    editor.on_mouse_press(MouseButton::Left, Point::new(10.0, 10.0));
    editor.on_mouse_motion(Point::new(40.0, 40.0));

    assert!(!editor.set_active_tool(Tool::Rectangle));
    assert!(matches!(editor.pointer_state(), PointerState::Drawing { .. }));

    assert!(editor.set_active_tool(Tool::Ellipse));
    assert!(editor.is_idle());
    assert!(editor.annotations().is_empty());
}

#[test]
fn test_smart_eraser_samples_source_color() {
    let mut editor = create_test_editor();
    editor.set_active_tool(Tool::SmartEraser);
    drag(&mut editor, (12.0, 34.0), (20.0, 34.0));
    let eraser = &editor.annotations()[0];
    assert_eq!(eraser.style.stroke_color.to_rgba8(), [12, 34, 200, 255]);
}

#[test]
fn test_restyle_selection() {
    let mut editor = create_test_editor();
    editor.set_active_tool(Tool::Line);
    drag(&mut editor, (10.0, 10.0), (50.0, 10.0));
    assert!(editor.set_stroke_color(BLUE));
    assert!(!editor.set_stroke_color(BLUE));
    assert!(editor.set_stroke_width(9.0));
    let line = &editor.annotations()[0];
    assert_eq!(line.style.stroke_color, BLUE);
    assert_eq!(line.style.stroke_width, 9.0);

    editor.deselect();
    assert!(!editor.set_stroke_color(RED));
    assert_eq!(editor.annotations()[0].style.stroke_color, BLUE);
}

#[test]
fn test_bring_to_front_reorders() {
    let mut editor = create_test_editor();
    editor.set_active_tool(Tool::Rectangle);
    drag(&mut editor, (10.0, 10.0), (50.0, 50.0));
    let first = editor.annotations()[0].id;
    drag(&mut editor, (60.0, 60.0), (90.0, 90.0));

    assert!(editor.select(first));
    assert!(editor.bring_to_front());
    assert_eq!(editor.annotations()[1].id, first);
    assert!(!editor.bring_to_front());
}

#[test]
fn test_events_are_queued_and_drained() {
    let mut editor = create_test_editor();
    editor.set_active_tool(Tool::Arrow);
    let events = editor.take_events();
    assert!(events.contains(&EditorEvent::StatusChanged("Tool: Arrow".to_string())));
    assert!(events.contains(&EditorEvent::RedrawRequested));
    assert!(editor.take_events().is_empty());
}

#[test]
fn test_capture_restore_round_trip() {
    let mut editor = create_test_editor();
    editor.set_active_tool(Tool::Rectangle);
    drag(&mut editor, (10.0, 10.0), (30.0, 30.0));
    let memento = editor.capture(true);

    editor.clear_all();
    editor.set_active_tool(Tool::Crop);
    drag(&mut editor, (0.0, 0.0), (40.0, 40.0));
    assert_eq!(editor.canvas_size(), (40, 40));

    editor.restore(memento.clone());
    assert_eq!(editor.canvas_size(), (100, 100));
    assert_eq!(editor.annotations(), &memento.annotations[..]);
    assert_eq!(editor.selected_id(), memento.selected_id);
}

#[test]
fn test_snapshot_flattens_annotations() {
    let mut editor = Editor::new(EditorSettings::default());
    editor.load_image(Bitmap::filled(40, 40, [255, 255, 255, 255]));
    editor.set_active_tool(Tool::Rectangle);
    drag(&mut editor, (10.0, 10.0), (30.0, 30.0));

    let snapshot = editor.get_snapshot().unwrap();
    assert_eq!(snapshot.size(), (40, 40));
    assert_eq!(snapshot.pixel(10, 20), Some(RED.to_rgba8()));
    assert_eq!(snapshot.pixel(20, 20), Some([255, 255, 255, 255]));
    // The source is untouched.
    assert_eq!(editor.source().unwrap().pixel(10, 20), Some([255, 255, 255, 255]));
}

#[test]
fn test_dirty_regions_drain() {
    let mut editor = create_test_editor();
    editor.take_dirty_regions();
    editor.set_active_tool(Tool::Rectangle);
    drag(&mut editor, (10.0, 10.0), (30.0, 30.0));
    let regions = editor.take_dirty_regions();
    assert!(!regions.is_empty());
    assert!(!editor.needs_redraw);
    assert!(editor.take_dirty_regions().is_empty());
}
