//! The extraction wrapper: one image path in, display text out.
//!
//! Failures never leave this module as errors. The result pane shows
//! whatever happened, which is the entire error story this tool needs.

use std::path::Path;

use crate::engine::OcrEngine;

/// Shown when recognition succeeds but finds nothing.
pub const NO_TEXT_FOUND: &str = "No text found.";

/// Run the engine over one image and join every recognized span with
/// newlines. Empty recognition and engine failures both come back as
/// display strings, never as `Err`.
pub fn extract_text(engine: &dyn OcrEngine, path: &Path) -> String {
    match engine.recognize(path) {
        Ok(spans) => {
            let text = spans
                .iter()
                .map(|s| s.text.as_str())
                .filter(|t| !t.trim().is_empty())
                .collect::<Vec<_>>()
                .join("\n");
            if text.is_empty() {
                NO_TEXT_FOUND.to_string()
            } else {
                text
            }
        }
        Err(e) => format!("Error processing image {}: {}", path.display(), e),
    }
}

/// Render one file's block for the result pane.
pub fn format_result_block(filename: &str, text: &str) -> String {
    format!("--- Results for {} ---\n{}\n\n", filename, text)
}

/// Basename shown in the file list; falls back to the full path string when
/// the path has no final component.
pub fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.to_string_lossy().into_owned())
}
