//! The extraction run: guards, per-file progress, result blocks.
//!
//! Decoupled from Tauri so the whole flow is drivable from tests — the
//! commands layer wires the update sink to webview events.

use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};

use crate::engine::OcrEngine;
use crate::extract;

/// Guard message when Process is clicked with nothing selected.
pub const SELECT_FILES_FIRST: &str = "Please select image files first.";

/// Guard message when the engine failed to initialize at startup.
pub const ENGINE_UNAVAILABLE: &str =
    "OCR engine could not be initialized. Cannot process images.";

/// Notice appended when Process is clicked while a run is in flight.
pub const RUN_IN_FLIGHT: &str = "A run is already in progress.\n";

/// One instruction to the result pane: replace its content or append to it.
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct DisplayUpdate {
    pub text: String,
    pub clear: bool,
}

impl DisplayUpdate {
    pub fn replace(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            clear: true,
        }
    }

    pub fn append(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            clear: false,
        }
    }
}

/// Marks a run in flight so a second Process click cannot start another.
///
/// The loop runs on a worker, so the button stays clickable mid-run and
/// the guard has to be explicit.
pub struct RunState {
    busy: AtomicBool,
}

impl RunState {
    pub fn new() -> Self {
        Self {
            busy: AtomicBool::new(false),
        }
    }

    /// Try to claim the run slot; `false` means a run is already going.
    pub fn try_begin(&self) -> bool {
        !self.busy.swap(true, Ordering::SeqCst)
    }

    pub fn finish(&self) {
        self.busy.store(false, Ordering::SeqCst);
    }
}

impl Default for RunState {
    fn default() -> Self {
        Self::new()
    }
}

/// Run extraction over `files` in selection order, feeding pane updates to
/// `emit`.
///
/// Per-file engine failures surface as text inside that file's block; the
/// loop never stops early. Pane protocol: a "Processing:" line per file as
/// it starts, then every result block at once, then the completion marker.
pub fn run_extraction<F>(engine: Option<&dyn OcrEngine>, files: &[PathBuf], mut emit: F)
where
    F: FnMut(DisplayUpdate),
{
    if files.is_empty() {
        emit(DisplayUpdate::replace(SELECT_FILES_FIRST));
        return;
    }
    let Some(engine) = engine else {
        emit(DisplayUpdate::replace(ENGINE_UNAVAILABLE));
        return;
    };

    let run_start = std::time::Instant::now();
    emit(DisplayUpdate::replace("Processing...\n"));

    let mut all_results = String::new();
    for path in files {
        let filename = extract::display_name(path);
        emit(DisplayUpdate::append(format!("Processing: {}\n", filename)));

        let file_start = std::time::Instant::now();
        let text = extract::extract_text(engine, path);
        log::info!(
            "[PIPELINE] {}: {} chars in {}ms",
            filename,
            text.len(),
            file_start.elapsed().as_millis()
        );

        all_results.push_str(&extract::format_result_block(&filename, &text));
    }

    emit(DisplayUpdate::append(all_results));
    emit(DisplayUpdate::append("\nDone."));
    log::info!(
        "[PIPELINE] {} file(s) processed in {}ms",
        files.len(),
        run_start.elapsed().as_millis()
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::{EngineError, OcrSpan, Region};
    use std::path::Path;
    use std::sync::atomic::AtomicUsize;

    /// Engine that echoes an uppercased basename and counts invocations.
    struct EchoEngine {
        calls: AtomicUsize,
    }

    impl EchoEngine {
        fn new() -> Self {
            Self {
                calls: AtomicUsize::new(0),
            }
        }
    }

    impl OcrEngine for EchoEngine {
        fn name(&self) -> &'static str {
            "echo"
        }
        fn recognize(&self, path: &Path) -> Result<Vec<OcrSpan>, EngineError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            let text = extract::display_name(path).to_uppercase();
            Ok(vec![OcrSpan {
                region: Region {
                    left: 0,
                    top: 0,
                    width: 1,
                    height: 1,
                },
                text,
                confidence: 99.0,
            }])
        }
    }

    fn pane_text(updates: &[DisplayUpdate]) -> String {
        let mut pane = String::new();
        for u in updates {
            if u.clear {
                pane.clear();
            }
            pane.push_str(&u.text);
        }
        pane
    }

    #[test]
    fn empty_selection_emits_only_the_guard_message() {
        let engine = EchoEngine::new();
        let mut updates = Vec::new();
        run_extraction(Some(&engine), &[], |u| updates.push(u));

        assert_eq!(updates, vec![DisplayUpdate::replace(SELECT_FILES_FIRST)]);
        assert_eq!(engine.calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn missing_engine_short_circuits_regardless_of_selection() {
        let files = vec![PathBuf::from("a.png"), PathBuf::from("b.png")];
        let mut updates = Vec::new();
        run_extraction(None, &files, |u| updates.push(u));

        assert_eq!(updates, vec![DisplayUpdate::replace(ENGINE_UNAVAILABLE)]);
    }

    #[test]
    fn three_files_produce_three_blocks_in_selection_order() {
        let engine = EchoEngine::new();
        let files = vec![
            PathBuf::from("/x/charlie.png"),
            PathBuf::from("/x/alpha.png"),
            PathBuf::from("/x/bravo.png"),
        ];
        let mut updates = Vec::new();
        run_extraction(Some(&engine), &files, |u| updates.push(u));
        let pane = pane_text(&updates);

        assert_eq!(engine.calls.load(Ordering::SeqCst), 3);

        let c = pane.find("--- Results for charlie.png ---").unwrap();
        let a = pane.find("--- Results for alpha.png ---").unwrap();
        let b = pane.find("--- Results for bravo.png ---").unwrap();
        assert!(c < a && a < b, "blocks out of selection order:\n{pane}");

        assert!(pane.contains("CHARLIE.PNG"));
        assert!(pane.ends_with("\nDone."));
    }

    #[test]
    fn progress_lines_precede_every_result_block() {
        let engine = EchoEngine::new();
        let files = vec![PathBuf::from("one.png"), PathBuf::from("two.png")];
        let mut updates = Vec::new();
        run_extraction(Some(&engine), &files, |u| updates.push(u));
        let pane = pane_text(&updates);

        let progress_two = pane.find("Processing: two.png").unwrap();
        let block_one = pane.find("--- Results for one.png ---").unwrap();
        assert!(
            progress_two < block_one,
            "blocks should arrive after all progress lines:\n{pane}"
        );
        assert!(pane.starts_with("Processing...\n"));
    }

    #[test]
    fn display_update_serializes_to_the_event_payload_shape() {
        // The frontend listener destructures { text, clear } — keep the
        // wire shape pinned.
        let update = DisplayUpdate::replace("Processing...\n");
        let json = serde_json::to_value(&update).unwrap();
        assert_eq!(
            json,
            serde_json::json!({ "text": "Processing...\n", "clear": true })
        );
    }

    #[test]
    fn run_state_admits_one_run_at_a_time() {
        let run = RunState::new();
        assert!(run.try_begin());
        assert!(!run.try_begin());
        run.finish();
        assert!(run.try_begin());
    }
}
