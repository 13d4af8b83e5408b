//! Tauri command handlers.
//!
//! Thin bridges between frontend invoke() calls and the selection/pipeline
//! modules. Each command does one thing; the extraction flow itself lives
//! in pipeline.rs.

use std::path::PathBuf;

use tauri::{Emitter, Manager};
use tauri_plugin_dialog::DialogExt;

use crate::engine::EngineState;
use crate::pipeline::{self, DisplayUpdate, RunState};
use crate::selection::SelectionState;

/// Event the frontend result pane listens on.
pub const DISPLAY_EVENT: &str = "display-update";

fn emit_update(app: &tauri::AppHandle, update: DisplayUpdate) {
    if let Err(e) = app.emit(DISPLAY_EVENT, &update) {
        log::error!("[PIPELINE] Failed to emit display update: {}", e);
    }
}

/// Tauri command: open the native image picker and replace the selection.
///
/// The dialog runs on the blocking pool so the main thread keeps pumping
/// window events. Returns the basenames for the list widget; a cancelled
/// dialog leaves the selection untouched and returns the current ones.
#[tauri::command]
pub async fn select_images(app: tauri::AppHandle) -> Result<Vec<String>, String> {
    let dialog = app
        .dialog()
        .file()
        .set_title("Select Images")
        .add_filter("Image files", &["png", "jpg", "jpeg", "bmp", "gif"])
        .add_filter("All files", &["*"]);

    let picked = tauri::async_runtime::spawn_blocking(move || dialog.blocking_pick_files())
        .await
        .map_err(|e| e.to_string())?;

    let state = app.state::<SelectionState>();
    match picked {
        Some(files) if !files.is_empty() => {
            let paths: Vec<PathBuf> = files
                .into_iter()
                .filter_map(|f| f.into_path().ok())
                .collect();
            log::info!("[SELECT] {} file(s) picked", paths.len());
            state.replace(paths);
        }
        _ => {
            log::info!("[SELECT] Dialog cancelled — selection unchanged");
        }
    }
    Ok(state.display_names())
}

/// Tauri command: run extraction over the current selection.
///
/// Guards (empty selection, missing engine) short-circuit with a single
/// pane message and no engine calls. Otherwise the loop runs on the
/// blocking pool and streams pane updates back as events, so the window
/// stays live while the engine grinds. A second click mid-run only appends
/// a notice.
#[tauri::command]
pub async fn process_images(app: tauri::AppHandle) -> Result<(), String> {
    let files = app.state::<SelectionState>().snapshot();
    if files.is_empty() {
        emit_update(&app, DisplayUpdate::replace(pipeline::SELECT_FILES_FIRST));
        return Ok(());
    }

    let Some(engine) = app.state::<EngineState>().get() else {
        emit_update(&app, DisplayUpdate::replace(pipeline::ENGINE_UNAVAILABLE));
        return Ok(());
    };

    if !app.state::<RunState>().try_begin() {
        log::warn!("[PIPELINE] Process clicked while a run is in flight");
        emit_update(&app, DisplayUpdate::append(pipeline::RUN_IN_FLIGHT));
        return Ok(());
    }

    log::info!(
        "[PIPELINE] Starting run: {} file(s), engine={}",
        files.len(),
        engine.name()
    );

    let handle = app.clone();
    tauri::async_runtime::spawn_blocking(move || {
        pipeline::run_extraction(Some(&*engine), &files, |update| {
            emit_update(&handle, update);
        });
        handle.state::<RunState>().finish();
    });

    Ok(())
}

/// Tauri command: copy text to the system clipboard.
///
/// Uses arboard for native clipboard access — works reliably unlike
/// navigator.clipboard in webview windows.
#[tauri::command]
pub fn copy_to_clipboard(text: String) -> Result<(), String> {
    let mut clipboard = arboard::Clipboard::new().map_err(|e| e.to_string())?;
    clipboard.set_text(&text).map_err(|e| e.to_string())?;
    log::info!("[CLIPBOARD] Copied {} chars", text.len());
    Ok(())
}
