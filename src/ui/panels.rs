use eframe::egui::{Color32, RichText, Ui};

use crate::state::{AppState, Page};

// ---------------------------------------------------------------------------
// Sidebar – navigation and file upload
// ---------------------------------------------------------------------------

/// Render the sidebar: page navigation, file open, load status.
pub fn side_panel(ui: &mut Ui, state: &mut AppState) {
    ui.heading("Navigation");
    ui.separator();
    for page in Page::ALL {
        if ui.radio(state.page == page, page.title()).clicked() {
            state.page = page;
        }
    }

    ui.add_space(16.0);
    ui.heading("Upload Your File");
    ui.separator();
    if ui.button("Open…").clicked() {
        open_file_dialog(state);
    }

    ui.add_space(6.0);
    match &state.dataset {
        Some(ds) => {
            ui.colored_label(
                Color32::from_rgb(60, 160, 60),
                "File is uploaded successfully.",
            );
            ui.label(format!("{} rows · {} columns", ds.len(), ds.columns.len()));
        }
        None => {
            ui.label("Please upload a CSV, JSON or Parquet file to proceed.");
        }
    }

    if let Some(msg) = &state.status_message {
        ui.add_space(6.0);
        ui.label(RichText::new(msg).color(Color32::RED));
    }
}

// ---------------------------------------------------------------------------
// File dialog
// ---------------------------------------------------------------------------

pub fn open_file_dialog(state: &mut AppState) {
    let file = rfd::FileDialog::new()
        .set_title("Open tabular data")
        .add_filter("Supported files", &["csv", "json", "parquet", "pq"])
        .add_filter("CSV", &["csv"])
        .add_filter("JSON", &["json"])
        .add_filter("Parquet", &["parquet", "pq"])
        .pick_file();

    if let Some(path) = file {
        state.loading = true;
        match crate::data::loader::load_file(&path) {
            Ok(dataset) => {
                state.set_dataset(dataset);
                log::info!(
                    "Loaded {} rows; numeric {:?}, categorical {:?}, ignored {:?}",
                    state.dataset.as_ref().map_or(0, |ds| ds.len()),
                    state.catalog.numeric,
                    state.catalog.categorical,
                    state.catalog.ignored,
                );
            }
            Err(e) => {
                log::error!("Failed to load file: {e:#}");
                state.status_message = Some(format!("Error: {e:#}"));
                state.loading = false;
            }
        }
    }
}
