use crate::config::Config;
use crate::editor::EditorSettings;
use crate::history::HistoryLimits;

/// Runtime options for a [`super::Session`], derived from configuration.
#[derive(Debug, Clone)]
pub struct SessionOptions {
    pub editor: EditorSettings,
    pub history: HistoryLimits,
    /// Whether a right-click delete is recorded for undo
    pub undoable_right_click_delete: bool,
}

impl SessionOptions {
    /// Creates options with default editor settings and the given history bounds.
    pub fn new(history: HistoryLimits) -> Self {
        Self {
            editor: EditorSettings::default(),
            history,
            undoable_right_click_delete: true,
        }
    }
}

impl Default for SessionOptions {
    fn default() -> Self {
        Self::new(HistoryLimits::default())
    }
}

/// Build runtime session options from configuration values.
pub fn options_from_config(config: &Config) -> SessionOptions {
    SessionOptions {
        editor: config.editor_settings(),
        history: config.history_limits(),
        undoable_right_click_delete: config.history.undoable_right_click_delete,
    }
}
