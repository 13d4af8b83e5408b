//! Selection set state.

use std::path::PathBuf;
use std::sync::Mutex;

use crate::extract;

/// The user-chosen image paths, in pick order.
///
/// Replaced wholesale on every confirmed pick; a cancelled dialog leaves it
/// untouched. No deduplication and no existence checks beyond the dialog's
/// own extension filter.
pub struct SelectionState {
    files: Mutex<Vec<PathBuf>>,
}

impl SelectionState {
    pub fn new() -> Self {
        Self {
            files: Mutex::new(Vec::new()),
        }
    }

    /// Replace the whole selection with a fresh pick.
    pub fn replace(&self, files: Vec<PathBuf>) {
        *self.files.lock().unwrap() = files;
    }

    /// Copy of the current selection, in order.
    pub fn snapshot(&self) -> Vec<PathBuf> {
        self.files.lock().unwrap().clone()
    }

    /// Basenames for the list widget, in selection order.
    pub fn display_names(&self) -> Vec<String> {
        self.files
            .lock()
            .unwrap()
            .iter()
            .map(|p| extract::display_name(p))
            .collect()
    }
}

impl Default for SelectionState {
    fn default() -> Self {
        Self::new()
    }
}
