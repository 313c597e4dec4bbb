use crate::draw::{Bitmap, render_annotations, render_selection, render_source};
use crate::error::Result;

use super::Editor;

impl Editor {
    /// Renders the source, every annotation, and optionally the selection chrome.
    ///
    /// The host calls this with `with_selection = true` for on-screen display;
    /// exported snapshots never include handles.
    pub fn render(&self, ctx: &cairo::Context, with_selection: bool) {
        let (width, height) = self.canvas_size;
        if let Some(source) = &self.source {
            render_source(ctx, source);
        }
        render_annotations(ctx, &self.annotations, (width as f64, height as f64));

        if with_selection {
            if let Some(selected) = self.selected_annotation() {
                render_selection(ctx, selected, self.settings.handle_size);
            }
        }
    }

    /// Flattens the source and all annotations into a new bitmap.
    ///
    /// An editor without a source yields an empty bitmap.
    pub fn get_snapshot(&self) -> Result<Bitmap> {
        let (width, height) = self.canvas_size;
        if width == 0 || height == 0 {
            return Ok(Bitmap::new(width, height));
        }

        let mut surface =
            cairo::ImageSurface::create(cairo::Format::ARgb32, width as i32, height as i32)?;
        {
            let ctx = cairo::Context::new(&surface)?;
            self.render(&ctx, false);
        }
        let snapshot = Bitmap::from_surface(&mut surface)?;
        log::debug!("Snapshot rendered at {}x{}", width, height);
        Ok(snapshot)
    }
}
