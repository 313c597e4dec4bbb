//! Input and notification types exchanged with the host.

/// Mouse button identification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MouseButton {
    /// Left mouse button (draw, select, drag)
    Left,
    /// Right mouse button (delete under pointer, cancel drawing)
    Right,
    /// Middle mouse button (currently unused)
    Middle,
}

/// Notifications queued for the host, drained with `take_events`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EditorEvent {
    /// Visible output changed; the host should repaint.
    RedrawRequested,
    /// Human-readable status line (tool switched, selection changed, ...).
    StatusChanged(String),
}

/// What a pointer press did, so the host can decide what to record for undo.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PressOutcome {
    /// Nothing that can change the document started.
    Ignored,
    /// A draw, drag, or resize gesture began.
    Began,
    /// Right-click removed the annotation under the pointer.
    Deleted,
    /// Right-click discarded the in-progress drawing.
    Cancelled,
}
