//! Editor state and the pointer state machine's states.

use crate::draw::{
    Annotation, AnnotationDefaults, AnnotationId, Bitmap, DirtyTracker, Handle, Point,
};
use crate::editor::{EditorEvent, Tool};
use crate::util::Rect;

/// Pointer state machine.
///
/// Tracks whether the user is idle, drawing a new annotation, or moving or
/// resizing the current selection. Transitions happen on pointer events.
#[derive(Debug, Clone, PartialEq)]
pub enum PointerState {
    /// Not in a gesture - waiting for a press
    Idle,
    /// Drawing a new annotation (button held down)
    Drawing {
        /// The in-progress annotation, always the last list entry
        id: AnnotationId,
    },
    /// Moving the selection with the pointer
    DraggingSelection {
        /// Pointer position of the previous event
        last: Point,
        /// Whether any non-zero movement happened
        moved: bool,
    },
    /// Dragging one of the selection's handles
    ResizingSelection {
        handle: Handle,
        /// Corners of the selection when the drag began
        initial_start: Point,
        initial_end: Point,
        moved: bool,
    },
}

/// Interaction settings and defaults for new annotations.
#[derive(Debug, Clone)]
pub struct EditorSettings {
    pub defaults: AnnotationDefaults,
    /// Slack, in pixels, when hit-testing annotations
    pub hit_tolerance: f64,
    /// Side length of the square handle hit area
    pub handle_size: f64,
}

impl Default for EditorSettings {
    fn default() -> Self {
        Self {
            defaults: AnnotationDefaults::default(),
            hit_tolerance: 5.0,
            handle_size: 10.0,
        }
    }
}

/// Editing engine for one source image and its annotations.
///
/// Holds the annotation list in z-order (first = bottom), the selection,
/// the active tool, and the source bitmap. It processes pointer events and
/// mutator calls and queues [`EditorEvent`]s for the host. It does not record
/// history itself; see [`crate::session::Session`].
pub struct Editor {
    /// Annotations in z-order
    pub(crate) annotations: Vec<Annotation>,
    /// Currently selected annotation, mirrored by its `is_selected` flag
    pub(crate) selected: Option<AnnotationId>,
    pub(crate) active_tool: Tool,
    /// Image being annotated; `None` until the host loads one
    pub(crate) source: Option<Bitmap>,
    /// Logical canvas size (matches the source when one is loaded)
    pub(crate) canvas_size: (u32, u32),
    pub(crate) pointer: PointerState,
    pub(crate) settings: EditorSettings,
    /// Whether the display needs to be redrawn
    pub needs_redraw: bool,
    /// Tracks dirty regions between renders
    pub(crate) dirty_tracker: DirtyTracker,
    next_id: u64,
    events: Vec<EditorEvent>,
}

impl Editor {
    /// Creates an empty editor with no source image.
    pub fn new(settings: EditorSettings) -> Self {
        Self {
            annotations: Vec::new(),
            selected: None,
            active_tool: Tool::default(),
            source: None,
            canvas_size: (0, 0),
            pointer: PointerState::Idle,
            settings,
            needs_redraw: true,
            dirty_tracker: DirtyTracker::new(),
            next_id: 1,
            events: Vec::new(),
        }
    }

    /// Starts a new document on `source`: annotations and selection are dropped.
    pub fn load_image(&mut self, source: Bitmap) {
        log::info!(
            "Loaded source image {}x{}",
            source.width(),
            source.height()
        );
        self.canvas_size = source.size();
        self.source = Some(source);
        self.annotations.clear();
        self.selected = None;
        self.pointer = PointerState::Idle;
        self.dirty_tracker.mark_full();
        self.request_redraw();
    }

    pub fn annotations(&self) -> &[Annotation] {
        &self.annotations
    }

    pub fn annotation(&self, id: AnnotationId) -> Option<&Annotation> {
        self.annotations.iter().find(|a| a.id == id)
    }

    pub(crate) fn annotation_mut(&mut self, id: AnnotationId) -> Option<&mut Annotation> {
        self.annotations.iter_mut().find(|a| a.id == id)
    }

    pub fn selected_id(&self) -> Option<AnnotationId> {
        self.selected
    }

    pub fn selected_annotation(&self) -> Option<&Annotation> {
        self.selected.and_then(|id| self.annotation(id))
    }

    pub fn active_tool(&self) -> Tool {
        self.active_tool
    }

    pub fn source(&self) -> Option<&Bitmap> {
        self.source.as_ref()
    }

    pub fn canvas_size(&self) -> (u32, u32) {
        self.canvas_size
    }

    pub fn pointer_state(&self) -> &PointerState {
        &self.pointer
    }

    pub fn settings(&self) -> &EditorSettings {
        &self.settings
    }

    pub fn is_idle(&self) -> bool {
        self.pointer == PointerState::Idle
    }

    /// Topmost annotation under `p`.
    pub fn hit_test(&self, p: Point) -> Option<AnnotationId> {
        let tolerance = self.settings.hit_tolerance;
        self.annotations
            .iter()
            .rev()
            .find(|a| a.hit_test(p, tolerance))
            .map(|a| a.id)
    }

    /// Number the next step marker gets: one past the highest existing number.
    pub fn next_step_number(&self) -> u32 {
        self.annotations
            .iter()
            .filter_map(|a| match a.kind {
                crate::draw::AnnotationKind::Step { number, .. } => Some(number),
                _ => None,
            })
            .max()
            .map_or(1, |n| n + 1)
    }

    pub(crate) fn allocate_id(&mut self) -> AnnotationId {
        let id = AnnotationId(self.next_id);
        self.next_id += 1;
        id
    }

    /// Keeps future ids clear of an externally supplied one.
    pub(crate) fn reserve_id(&mut self, id: AnnotationId) {
        if id.0 >= self.next_id {
            self.next_id = id.0 + 1;
        }
    }

    /// Regenerates every effect cache that no longer matches its bounds.
    pub(crate) fn refresh_effects(&mut self) {
        let source = self.source.as_ref();
        for annotation in &mut self.annotations {
            let stale = annotation
                .effect()
                .is_some_and(|region| !region.is_fresh(&annotation.bounds()));
            if stale {
                annotation.update_effect(source);
            }
        }
    }

    /// Rebuilds every effect cache against the current source.
    ///
    /// Needed whenever the source pixels change, since a cache can match its
    /// bounds and still hold pixels from the old image.
    pub(crate) fn regenerate_effects(&mut self) {
        let source = self.source.as_ref();
        for annotation in &mut self.annotations {
            annotation.update_effect(source);
        }
    }

    /// Marks the display for repaint and queues a single redraw event.
    pub(crate) fn request_redraw(&mut self) {
        self.needs_redraw = true;
        if self.events.last() != Some(&EditorEvent::RedrawRequested) {
            self.events.push(EditorEvent::RedrawRequested);
        }
    }

    pub(crate) fn set_status(&mut self, text: impl Into<String>) {
        let text = text.into();
        log::debug!("Status: {}", text);
        self.events.push(EditorEvent::StatusChanged(text));
    }

    pub(crate) fn mark_annotation_dirty(&mut self, id: AnnotationId) {
        if let Some(annotation) = self.annotations.iter().find(|a| a.id == id) {
            self.dirty_tracker.mark_annotation(annotation);
        }
    }

    /// Drains queued host notifications.
    pub fn take_events(&mut self) -> Vec<EditorEvent> {
        std::mem::take(&mut self.events)
    }

    /// Drains dirty regions accumulated since the last call.
    pub fn take_dirty_regions(&mut self) -> Vec<Rect> {
        let (width, height) = self.canvas_size;
        self.needs_redraw = false;
        self.dirty_tracker
            .take_regions(width as i32, height as i32)
    }
}
