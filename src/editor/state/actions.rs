use crate::draw::{Annotation, AnnotationId, Bitmap, Bounds, Color, Point};
use crate::editor::Tool;
use crate::history::{EditorMemento, Originator};
use crate::util;

use super::{Editor, PointerState};

impl Editor {
    /// Switches the active tool. An in-progress drawing is discarded.
    ///
    /// Returns `true` when a drawing was discarded. Re-selecting the active
    /// tool changes nothing.
    pub fn set_active_tool(&mut self, tool: Tool) -> bool {
        if self.active_tool == tool {
            return false;
        }
        let mut discarded = false;
        if let PointerState::Drawing { id } = self.pointer {
            self.mark_annotation_dirty(id);
            self.annotations.retain(|a| a.id != id);
            self.pointer = PointerState::Idle;
            discarded = true;
        }
        self.active_tool = tool;
        self.set_status(format!("Tool: {}", tool.label()));
        self.request_redraw();
        discarded
    }

    /// Selects `id`, clearing any previous selection. Returns `false` if absent.
    pub fn select(&mut self, id: AnnotationId) -> bool {
        if self.annotation(id).is_none() {
            return false;
        }
        if self.selected == Some(id) {
            return true;
        }
        self.deselect();
        self.selected = Some(id);
        if let Some(annotation) = self.annotation_mut(id) {
            annotation.is_selected = true;
        }
        self.mark_annotation_dirty(id);
        let label = self
            .annotation(id)
            .map(|a| a.tool_kind().label())
            .unwrap_or_default();
        self.set_status(format!("Selected {}", label));
        self.request_redraw();
        true
    }

    pub fn deselect(&mut self) {
        let Some(id) = self.selected.take() else {
            return;
        };
        if let Some(annotation) = self.annotation_mut(id) {
            annotation.is_selected = false;
        }
        self.mark_annotation_dirty(id);
        self.request_redraw();
    }

    /// Removes one annotation. Returns `false` if absent.
    pub fn delete(&mut self, id: AnnotationId) -> bool {
        let Some(index) = self.annotations.iter().position(|a| a.id == id) else {
            return false;
        };
        let removed = self.annotations.remove(index);
        self.dirty_tracker.mark_annotation(&removed);
        if self.selected == Some(id) {
            self.selected = None;
        }
        self.set_status(format!("Deleted {}", removed.tool_kind().label()));
        self.request_redraw();
        true
    }

    pub fn delete_selected(&mut self) -> bool {
        match self.selected {
            Some(id) => self.delete(id),
            None => false,
        }
    }

    /// Removes every annotation. Returns `false` when there was nothing to clear.
    pub fn clear_all(&mut self) -> bool {
        if self.annotations.is_empty() {
            return false;
        }
        self.annotations.clear();
        self.selected = None;
        self.pointer = PointerState::Idle;
        self.dirty_tracker.mark_full();
        self.set_status("Cleared all annotations");
        self.request_redraw();
        true
    }

    /// Moves the selection to the top of the z-order.
    pub fn bring_to_front(&mut self) -> bool {
        let Some(id) = self.selected else {
            return false;
        };
        let Some(index) = self.annotations.iter().position(|a| a.id == id) else {
            return false;
        };
        if index + 1 == self.annotations.len() {
            return false;
        }
        let annotation = self.annotations.remove(index);
        self.annotations.push(annotation);
        self.mark_annotation_dirty(id);
        self.request_redraw();
        true
    }

    /// Applies `f` to the selection and refreshes it. Returns whether `f` changed it.
    fn restyle_selected(&mut self, f: impl FnOnce(&mut Annotation) -> bool) -> bool {
        let Some(id) = self.selected else {
            return false;
        };
        self.mark_annotation_dirty(id);
        let source = self.source.as_ref();
        let Some(annotation) = self.annotations.iter_mut().find(|a| a.id == id) else {
            return false;
        };
        if !f(annotation) {
            return false;
        }
        if annotation.is_effect() {
            annotation.update_effect(source);
        }
        self.mark_annotation_dirty(id);
        self.request_redraw();
        true
    }

    /// Sets the default stroke color and recolors the selection.
    ///
    /// Returns `true` when the selection was changed.
    pub fn set_stroke_color(&mut self, color: Color) -> bool {
        self.settings.defaults.style.stroke_color = color;
        self.set_status(format!("Color: {}", util::color_to_name(&color)));
        self.restyle_selected(|a| {
            let changed = a.style.stroke_color != color;
            a.style.stroke_color = color;
            changed
        })
    }

    /// Sets the default stroke width and applies it to the selection.
    pub fn set_stroke_width(&mut self, width: f64) -> bool {
        let width = width.max(0.5);
        self.settings.defaults.style.stroke_width = width;
        self.set_status(format!("Width: {:.0}px", width));
        self.restyle_selected(|a| {
            let changed = a.style.stroke_width != width;
            a.style.stroke_width = width;
            changed
        })
    }

    pub fn set_fill_color(&mut self, fill: Option<Color>) -> bool {
        self.settings.defaults.style.fill_color = fill;
        self.restyle_selected(|a| {
            let changed = a.style.fill_color != fill;
            a.style.fill_color = fill;
            changed
        })
    }

    pub fn set_shadow(&mut self, shadow: bool) -> bool {
        self.settings.defaults.style.shadow = shadow;
        self.restyle_selected(|a| {
            let changed = a.style.shadow != shadow;
            a.style.shadow = shadow;
            changed
        })
    }

    /// Changes the strength of the selected effect and regenerates its cache.
    pub fn set_effect_amount(&mut self, amount: f64) -> bool {
        self.restyle_selected(|a| {
            let changed = a.effect().is_some_and(|region| region.amount != amount);
            changed && a.set_effect_amount(amount)
        })
    }

    /// Replaces the text of the selected text or speech balloon.
    pub fn set_text(&mut self, text: &str) -> bool {
        self.restyle_selected(|a| a.text().is_some_and(|current| current != text) && a.set_text(text))
    }

    /// Embeds `bitmap` as a new, selected image annotation at `at`.
    pub fn insert_image(&mut self, bitmap: Bitmap, at: Point) -> AnnotationId {
        let id = self.allocate_id();
        self.annotations.push(Annotation::image(id, bitmap, at));
        self.select(id);
        self.set_status("Inserted image");
        id
    }

    /// Adds a prebuilt annotation on top.
    ///
    /// The annotation keeps its id unless another annotation already uses it.
    /// Selection flags from the input are ignored and effects are regenerated.
    pub fn insert_annotation(&mut self, mut annotation: Annotation) -> AnnotationId {
        if self.annotation(annotation.id).is_some() {
            annotation.id = self.allocate_id();
        } else {
            self.reserve_id(annotation.id);
        }
        annotation.is_selected = false;
        annotation.update_effect(self.source.as_ref());
        let id = annotation.id;
        self.dirty_tracker.mark_annotation(&annotation);
        self.annotations.push(annotation);
        self.request_redraw();
        id
    }

    /// Crops the source to `bounds ∩ source`.
    ///
    /// Remaining annotations move with the image content so they keep their
    /// place relative to it. Returns `false` (and changes nothing) when there
    /// is no source or the crop would not change it.
    pub fn crop(&mut self, bounds: &Bounds) -> bool {
        let Some(source) = self.source.as_ref() else {
            log::debug!("Crop ignored: no source image");
            return false;
        };
        let Some(region) = bounds
            .to_pixel_rect()
            .zip(source.rect())
            .and_then(|(wanted, full)| wanted.intersection(&full))
        else {
            log::debug!("Crop ignored: region misses the source");
            return false;
        };
        if Some(region) == source.rect() {
            return false;
        }
        let Some(cropped) = source.crop(&region) else {
            return false;
        };

        log::info!(
            "Cropped source to {}x{} at ({}, {})",
            region.width,
            region.height,
            region.x,
            region.y
        );
        let (dx, dy) = (-region.x as f64, -region.y as f64);
        for annotation in &mut self.annotations {
            annotation.translate(dx, dy);
        }
        self.replace_source(cropped);
        self.set_status(format!("Cropped to {}x{}", region.width, region.height));
        true
    }

    /// Removes the band `[from, to)` (columns if `vertical`, rows otherwise)
    /// and joins the remaining pieces.
    ///
    /// Annotations entirely past the band shift back by its width.
    pub fn cut_out(&mut self, vertical: bool, from: i32, to: i32) -> bool {
        let Some(source) = self.source.as_ref() else {
            log::debug!("Cut-out ignored: no source image");
            return false;
        };
        let Some(result) = source.cut_out(vertical, from, to) else {
            log::debug!("Cut-out ignored: empty or full band {}..{}", from, to);
            return false;
        };

        let removed = if vertical {
            source.width() - result.width()
        } else {
            source.height() - result.height()
        } as f64;
        let band_end = from.max(to) as f64;

        for annotation in &mut self.annotations {
            let b = annotation.bounds();
            if vertical && b.x >= band_end {
                annotation.translate(-removed, 0.0);
            } else if !vertical && b.y >= band_end {
                annotation.translate(0.0, -removed);
            }
        }

        log::info!(
            "Cut out {} band of {}px",
            if vertical { "vertical" } else { "horizontal" },
            removed
        );
        self.replace_source(result);
        self.set_status(format!("Cut out {:.0}px", removed));
        true
    }

    /// Swaps in a new source bitmap, keeping annotations, and regenerates effects.
    fn replace_source(&mut self, source: Bitmap) {
        self.canvas_size = source.size();
        self.source = Some(source);
        self.regenerate_effects();
        self.dirty_tracker.mark_full();
        self.request_redraw();
    }
}

impl Originator for Editor {
    fn capture(&self, heavy: bool) -> EditorMemento {
        EditorMemento {
            annotations: self.annotations.clone(),
            canvas_size: self.canvas_size,
            canvas_bitmap: if heavy { self.source.clone() } else { None },
            selected_id: self.selected,
        }
    }

    fn restore(&mut self, memento: EditorMemento) {
        let EditorMemento {
            annotations,
            canvas_size,
            canvas_bitmap,
            selected_id,
        } = memento;

        self.annotations = annotations;
        let source_changed = canvas_bitmap.is_some();
        if let Some(bitmap) = canvas_bitmap {
            self.canvas_size = canvas_size;
            self.source = Some(bitmap);
        }
        self.pointer = PointerState::Idle;

        self.selected = selected_id.filter(|id| self.annotations.iter().any(|a| a.id == *id));
        let selected = self.selected;
        for annotation in &mut self.annotations {
            annotation.is_selected = Some(annotation.id) == selected;
        }
        if let Some(highest) = self.annotations.iter().map(|a| a.id).max() {
            self.reserve_id(highest);
        }
        if source_changed {
            self.regenerate_effects();
        } else {
            self.refresh_effects();
        }
        self.dirty_tracker.mark_full();
        self.request_redraw();
    }
}
