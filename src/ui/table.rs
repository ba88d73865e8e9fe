use eframe::egui::Ui;
use egui_extras::{Column, TableBuilder};

use crate::state::AppState;

// ---------------------------------------------------------------------------
// Filtered data table
// ---------------------------------------------------------------------------

/// Render the filtered view as a scrollable table, capped at the configured
/// preview length (the CSV export always carries the full set).
pub fn filtered_table(ui: &mut Ui, state: &AppState) {
    let Some(view) = state.filtered_view() else {
        return;
    };
    let columns = view.columns().to_vec();
    if columns.is_empty() {
        return;
    }

    let total = view.len();
    let shown = total.min(state.table_preview_rows);

    TableBuilder::new(ui)
        .striped(true)
        .resizable(true)
        .columns(Column::auto().at_least(70.0), columns.len())
        .header(20.0, |mut header| {
            for col in &columns {
                header.col(|ui| {
                    ui.strong(col);
                });
            }
        })
        .body(|body| {
            body.rows(18.0, shown, |mut row| {
                let idx = row.index();
                for col in &columns {
                    row.col(|ui| {
                        let text = view
                            .value(idx, col)
                            .map(|v| v.to_string())
                            .unwrap_or_default();
                        ui.label(text);
                    });
                }
            });
        });

    if shown < total {
        ui.label(format!(
            "Showing the first {shown} of {total} rows; export for the full set."
        ));
    }
}
