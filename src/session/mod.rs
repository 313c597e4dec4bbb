//! Host-facing editing session.
//!
//! [`Session`] wraps an [`Editor`] and a [`HistoryManager`] and decides what
//! gets recorded for undo: it captures the state before each gesture or
//! mutator and pushes it only when the editor reports a change. Gestures
//! that start a crop or cut-out capture the source bitmap as well.

mod options;
mod scene;

pub use options::{SessionOptions, options_from_config};
pub use scene::{load_scene, parse_scene, save_scene};

use crate::config::Config;
use crate::draw::{Annotation, AnnotationId, Bitmap, Color, Point};
use crate::editor::{Editor, EditorEvent, MouseButton, PointerState, PressOutcome, Tool};
use crate::error::Result;
use crate::history::{EditorMemento, HistoryManager, Originator};
use crate::util::Rect;

/// One annotation session over a source image.
pub struct Session {
    editor: Editor,
    history: HistoryManager,
    /// State captured at press time, pushed on release if the gesture changed anything
    pending: Option<EditorMemento>,
    options: SessionOptions,
}

impl Session {
    pub fn new(options: SessionOptions) -> Self {
        Self {
            editor: Editor::new(options.editor.clone()),
            history: HistoryManager::new(options.history),
            pending: None,
            options,
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(options_from_config(config))
    }

    pub fn editor(&self) -> &Editor {
        &self.editor
    }

    pub fn options(&self) -> &SessionOptions {
        &self.options
    }

    /// Starts a new document. History from the previous image is dropped.
    pub fn load_image(&mut self, bitmap: Bitmap) {
        self.pending = None;
        self.history.clear();
        self.editor.load_image(bitmap);
    }

    /// Decodes and loads an encoded image (PNG).
    ///
    /// # Errors
    /// Returns [`crate::MarkupError::Decode`] when the bytes are not a supported image.
    pub fn load_image_bytes(&mut self, bytes: &[u8]) -> Result<()> {
        let bitmap = Bitmap::decode(bytes)?;
        self.load_image(bitmap);
        Ok(())
    }

    /// Source plus every annotation, flattened. Selection chrome is not included.
    pub fn get_snapshot(&self) -> Result<Bitmap> {
        self.editor.get_snapshot()
    }

    /// Renders the live view, including selection handles.
    pub fn render(&self, ctx: &cairo::Context) {
        self.editor.render(ctx, true);
    }

    pub fn on_pointer_pressed(&mut self, point: Point, is_right_button: bool) {
        let button = if is_right_button {
            MouseButton::Right
        } else {
            MouseButton::Left
        };
        let mut before = self.editor.capture(false);

        match self.editor.on_mouse_press(button, point) {
            PressOutcome::Began => {
                let destructive = matches!(self.editor.pointer_state(), PointerState::Drawing { .. })
                    && self.editor.active_tool().is_destructive();
                if destructive {
                    before.canvas_bitmap = self.editor.source().cloned();
                }
                self.pending = Some(before);
            }
            PressOutcome::Deleted => {
                if self.options.undoable_right_click_delete {
                    self.history.push(before);
                }
            }
            PressOutcome::Cancelled => self.pending = None,
            PressOutcome::Ignored => {}
        }
    }

    pub fn on_pointer_moved(&mut self, point: Point) {
        self.editor.on_mouse_motion(point);
    }

    pub fn on_pointer_released(&mut self, point: Point) {
        let changed = self.editor.on_mouse_release(MouseButton::Left, point);
        if let Some(before) = self.pending.take() {
            if changed {
                self.history.push(before);
            }
        }
    }

    /// Runs a mutator and records the prior state if it reports a change.
    fn record(&mut self, edit: impl FnOnce(&mut Editor) -> bool) -> bool {
        let before = self.editor.capture(false);
        let changed = edit(&mut self.editor);
        if changed {
            self.history.push(before);
        }
        changed
    }

    /// Switches tools. Only a drawing the editor actually discarded drops its pending entry.
    pub fn set_active_tool(&mut self, tool: Tool) {
        if self.editor.set_active_tool(tool) {
            self.pending = None;
        }
    }

    pub fn set_stroke_color(&mut self, color: Color) -> bool {
        self.record(|editor| editor.set_stroke_color(color))
    }

    pub fn set_stroke_width(&mut self, width: f64) -> bool {
        self.record(|editor| editor.set_stroke_width(width))
    }

    pub fn set_fill_color(&mut self, fill: Option<Color>) -> bool {
        self.record(|editor| editor.set_fill_color(fill))
    }

    pub fn set_shadow(&mut self, shadow: bool) -> bool {
        self.record(|editor| editor.set_shadow(shadow))
    }

    pub fn set_effect_amount(&mut self, amount: f64) -> bool {
        self.record(|editor| editor.set_effect_amount(amount))
    }

    pub fn set_text(&mut self, text: &str) -> bool {
        self.record(|editor| editor.set_text(text))
    }

    pub fn bring_to_front(&mut self) -> bool {
        self.record(|editor| editor.bring_to_front())
    }

    pub fn select(&mut self, id: AnnotationId) -> bool {
        self.editor.select(id)
    }

    pub fn deselect(&mut self) {
        self.editor.deselect();
    }

    pub fn delete_selected(&mut self) -> bool {
        self.record(|editor| editor.delete_selected())
    }

    pub fn clear_all(&mut self) -> bool {
        self.record(|editor| editor.clear_all())
    }

    /// Embeds an image annotation; undoable like any other edit.
    pub fn insert_image(&mut self, bitmap: Bitmap, at: Point) -> AnnotationId {
        let before = self.editor.capture(false);
        let id = self.editor.insert_image(bitmap, at);
        self.history.push(before);
        id
    }

    /// Adds a prebuilt annotation (e.g. from a scene file). Not recorded for undo.
    pub fn insert_annotation(&mut self, annotation: Annotation) -> AnnotationId {
        self.editor.insert_annotation(annotation)
    }

    /// Reverts the last recorded edit. Ignored mid-gesture.
    pub fn undo(&mut self) -> bool {
        if !self.editor.is_idle() {
            return false;
        }
        let undone = self.history.undo(&mut self.editor);
        if undone {
            self.editor.set_status("Undo");
        }
        undone
    }

    pub fn redo(&mut self) -> bool {
        if !self.editor.is_idle() {
            return false;
        }
        let redone = self.history.redo(&mut self.editor);
        if redone {
            self.editor.set_status("Redo");
        }
        redone
    }

    pub fn annotations(&self) -> &[Annotation] {
        self.editor.annotations()
    }

    pub fn selected_annotation(&self) -> Option<&Annotation> {
        self.editor.selected_annotation()
    }

    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    pub fn take_events(&mut self) -> Vec<EditorEvent> {
        self.editor.take_events()
    }

    pub fn take_dirty_regions(&mut self) -> Vec<Rect> {
        self.editor.take_dirty_regions()
    }
}
