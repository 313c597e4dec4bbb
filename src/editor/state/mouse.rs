use crate::draw::{Annotation, AnnotationId, AnnotationKind, Bitmap, Bounds, Color, Point};
use crate::editor::{MouseButton, PressOutcome, Tool};

use super::{Editor, PointerState};

impl Editor {
    /// Processes a pointer button press.
    ///
    /// # Behavior
    /// - Left press on a handle of the selection: starts resizing
    /// - Left press on the selection: starts dragging it, whatever the tool
    /// - Left press with the select tool: selects the topmost hit and drags it,
    ///   or clears the selection on empty canvas
    /// - Left press with a drawing tool: starts a new annotation
    /// - Right press: cancels an in-progress drawing, otherwise deletes the
    ///   annotation under the pointer
    pub fn on_mouse_press(&mut self, button: MouseButton, p: Point) -> PressOutcome {
        match button {
            MouseButton::Left => self.begin_gesture(p),
            MouseButton::Right => self.right_press(p),
            MouseButton::Middle => PressOutcome::Ignored,
        }
    }

    fn begin_gesture(&mut self, p: Point) -> PressOutcome {
        if !self.is_idle() {
            return PressOutcome::Ignored;
        }

        let (handle_size, tolerance) = (self.settings.handle_size, self.settings.hit_tolerance);
        let grab = self.selected_annotation().map(|selected| {
            (
                selected.handle_at(p, handle_size),
                selected.hit_test(p, tolerance),
                selected.start,
                selected.end,
            )
        });
        if let Some((handle, body_hit, start, end)) = grab {
            if let Some(handle) = handle {
                self.pointer = PointerState::ResizingSelection {
                    handle,
                    initial_start: start,
                    initial_end: end,
                    moved: false,
                };
                return PressOutcome::Began;
            }
            if body_hit {
                self.pointer = PointerState::DraggingSelection {
                    last: p,
                    moved: false,
                };
                return PressOutcome::Began;
            }
        }

        if self.active_tool == Tool::Select {
            return match self.hit_test(p) {
                Some(id) => {
                    self.select(id);
                    self.pointer = PointerState::DraggingSelection {
                        last: p,
                        moved: false,
                    };
                    PressOutcome::Began
                }
                None => {
                    self.deselect();
                    PressOutcome::Ignored
                }
            };
        }

        self.begin_drawing(p)
    }

    fn begin_drawing(&mut self, p: Point) -> PressOutcome {
        let id = self.allocate_id();
        let Some(mut annotation) =
            Annotation::for_tool(id, self.active_tool, p, &self.settings.defaults)
        else {
            return PressOutcome::Ignored;
        };

        match &mut annotation.kind {
            AnnotationKind::SmartEraser { .. } => {
                let sampled = self
                    .source
                    .as_ref()
                    .and_then(|source| sample_pixel(source, p));
                match sampled {
                    Some(rgba) => annotation.style.stroke_color = Color::from_rgba8(rgba),
                    None => log::debug!("Smart eraser outside source; keeping stroke color"),
                }
            }
            AnnotationKind::Step { number, .. } => *number = self.next_step_number(),
            _ => {}
        }

        self.deselect();
        annotation.update_effect(self.source.as_ref());
        log::debug!("Drawing {} at ({:.0}, {:.0})", self.active_tool.label(), p.x, p.y);
        self.annotations.push(annotation);
        self.pointer = PointerState::Drawing { id };
        self.mark_annotation_dirty(id);
        self.request_redraw();
        PressOutcome::Began
    }

    fn right_press(&mut self, p: Point) -> PressOutcome {
        match self.pointer {
            PointerState::Drawing { id } => {
                self.mark_annotation_dirty(id);
                self.annotations.retain(|a| a.id != id);
                self.pointer = PointerState::Idle;
                self.set_status("Drawing cancelled");
                self.request_redraw();
                PressOutcome::Cancelled
            }
            PointerState::Idle => match self.hit_test(p) {
                Some(id) => {
                    self.delete(id);
                    PressOutcome::Deleted
                }
                None => PressOutcome::Ignored,
            },
            PointerState::DraggingSelection { .. } | PointerState::ResizingSelection { .. } => {
                PressOutcome::Ignored
            }
        }
    }

    /// Processes pointer motion.
    ///
    /// Extends an in-progress drawing, or moves / resizes the selection.
    /// Effect caches are regenerated on every step.
    pub fn on_mouse_motion(&mut self, p: Point) {
        let target = match self.pointer {
            PointerState::Idle => return,
            PointerState::Drawing { id } => id,
            PointerState::DraggingSelection { .. } | PointerState::ResizingSelection { .. } => {
                match self.selected {
                    Some(id) => id,
                    None => {
                        self.pointer = PointerState::Idle;
                        return;
                    }
                }
            }
        };

        self.mark_annotation_dirty(target);
        let source = self.source.as_ref();
        let Some(annotation) = self.annotations.iter_mut().find(|a| a.id == target) else {
            self.pointer = PointerState::Idle;
            return;
        };

        match &mut self.pointer {
            PointerState::Idle => {}
            PointerState::Drawing { .. } => annotation.extend_to(p),
            PointerState::DraggingSelection { last, moved } => {
                let (dx, dy) = (p.x - last.x, p.y - last.y);
                if dx != 0.0 || dy != 0.0 {
                    annotation.translate(dx, dy);
                    *moved = true;
                }
                *last = p;
            }
            PointerState::ResizingSelection {
                handle,
                initial_start,
                initial_end,
                moved,
            } => {
                annotation.resize(*handle, *initial_start, *initial_end, p);
                *moved = true;
            }
        }
        if annotation.is_effect() {
            annotation.update_effect(source);
        }

        self.mark_annotation_dirty(target);
        self.request_redraw();
    }

    /// Processes a pointer button release.
    ///
    /// Finalizes the current gesture and returns whether the document changed.
    /// Crop and cut-out drawings are applied to the source here and leave no
    /// annotation behind.
    pub fn on_mouse_release(&mut self, button: MouseButton, p: Point) -> bool {
        if button != MouseButton::Left {
            return false;
        }

        match std::mem::replace(&mut self.pointer, PointerState::Idle) {
            PointerState::Idle => false,
            PointerState::Drawing { id } => {
                self.extend_drawing(id, p);
                self.finish_drawing(id)
            }
            PointerState::DraggingSelection { moved, .. } => {
                if moved {
                    self.set_status("Moved annotation");
                }
                moved
            }
            PointerState::ResizingSelection { moved, .. } => {
                if moved {
                    self.set_status("Resized annotation");
                }
                moved
            }
        }
    }

    /// Applies a final extension when the release point differs from the last motion.
    fn extend_drawing(&mut self, id: AnnotationId, p: Point) {
        if let Some(annotation) = self.annotation_mut(id) {
            if annotation.end != p {
                annotation.extend_to(p);
            }
        }
    }

    fn finish_drawing(&mut self, id: AnnotationId) -> bool {
        let Some(index) = self.annotations.iter().position(|a| a.id == id) else {
            return false;
        };
        self.dirty_tracker.mark_annotation(&self.annotations[index]);

        let keep = self.annotations[index].finish_drawing();
        let destructive = match self.annotations[index].kind {
            AnnotationKind::Crop => Some(None),
            AnnotationKind::CutOut { vertical } => Some(Some(vertical)),
            _ => None,
        };

        if let Some(cut) = destructive {
            let bounds = self.annotations.remove(index).bounds();
            self.request_redraw();
            return match cut {
                None => self.crop(&bounds),
                Some(vertical) => {
                    let (from, to) = band(&bounds, vertical);
                    self.cut_out(vertical, from, to)
                }
            };
        }

        if !keep {
            log::debug!("Discarding degenerate {:?}", self.annotations[index].tool_kind());
            self.annotations.remove(index);
            self.request_redraw();
            return false;
        }

        let source = self.source.as_ref();
        let annotation = &mut self.annotations[index];
        if annotation.is_effect() {
            annotation.update_effect(source);
        }
        let selectable = !matches!(
            annotation.kind,
            AnnotationKind::Freehand { .. } | AnnotationKind::SmartEraser { .. }
        );
        let label = annotation.tool_kind().label();

        if selectable {
            self.select(id);
        }
        self.mark_annotation_dirty(id);
        self.set_status(format!("Added {}", label));
        self.request_redraw();
        true
    }
}

/// Integer band covered by a cut-out's bounds along its axis.
fn band(bounds: &Bounds, vertical: bool) -> (i32, i32) {
    if vertical {
        (bounds.x.round() as i32, bounds.right().round() as i32)
    } else {
        (bounds.y.round() as i32, bounds.bottom().round() as i32)
    }
}

fn sample_pixel(source: &Bitmap, p: Point) -> Option<[u8; 4]> {
    if p.x < 0.0 || p.y < 0.0 {
        return None;
    }
    source.pixel(p.x.floor() as u32, p.y.floor() as u32)
}
