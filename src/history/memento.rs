use crate::draw::{Annotation, AnnotationId, Bitmap};

/// Restorable editor state.
///
/// `canvas_bitmap` is `None` for lightweight mementos (annotation edits) and
/// `Some` for heavy ones taken before a crop or cut-out. Dropping a memento
/// frees everything it owns.
#[derive(Debug, Clone, PartialEq)]
pub struct EditorMemento {
    pub annotations: Vec<Annotation>,
    pub canvas_size: (u32, u32),
    pub canvas_bitmap: Option<Bitmap>,
    pub selected_id: Option<AnnotationId>,
}

impl EditorMemento {
    pub fn is_heavy(&self) -> bool {
        self.canvas_bitmap.is_some()
    }
}

/// State that can be captured into and restored from an [`EditorMemento`].
pub trait Originator {
    /// Deep-copies the current state. `heavy` also copies the source bitmap.
    fn capture(&self, heavy: bool) -> EditorMemento;

    /// Replaces the current state. Light mementos leave the bitmap untouched.
    fn restore(&mut self, memento: EditorMemento);
}
