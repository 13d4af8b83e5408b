//! textlift — Tauri application shell.
//!
//! Only module declarations, plugin registration, state management, and the
//! command registry live here. Behavior is in the modules:
//!   - commands.rs  — invoke() bridges (select, process, clipboard)
//!   - pipeline.rs  — the extraction run
//!   - engine/      — the OCR engine seam and the Tesseract backend

pub mod commands;
pub mod engine;
pub mod extract;
pub mod pipeline;
pub mod selection;

use engine::EngineState;
use pipeline::RunState;
use selection::SelectionState;
use tauri::Manager;

/// Entry point — called by the Tauri runtime.
#[cfg_attr(mobile, tauri::mobile_entry_point)]
pub fn run() {
    env_logger::init();

    tauri::Builder::default()
        .plugin(tauri_plugin_dialog::init())
        .manage(SelectionState::new())
        .manage(RunState::new())
        .invoke_handler(tauri::generate_handler![
            commands::select_images,
            commands::process_images,
            commands::copy_to_clipboard,
        ])
        .setup(|app| {
            log::info!("textlift starting up");

            // Probe the OCR engine once. A failed probe still starts the
            // window; every Process click then reports the static message.
            let init_start = std::time::Instant::now();
            app.manage(EngineState::initialize());
            log::info!(
                "[OCR] Engine probe finished in {}ms",
                init_start.elapsed().as_millis()
            );

            Ok(())
        })
        .run(tauri::generate_context!())
        .expect("Error running textlift");
}
