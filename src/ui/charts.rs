use eframe::egui::{self, Align2, Color32, FontId, RichText, ScrollArea, Ui};
use egui_plot::{Bar, BarChart, Legend, Line, Plot, PlotPoints, Points};

use crate::color::ColorMap;
use crate::data::insights::{CorrelationMatrix, GroupedCounts, InsightSummary, TrendPoint};
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Central dashboard
// ---------------------------------------------------------------------------

/// Render the whole central panel from the pipeline output. Any terminal
/// condition (no dataset, empty source, empty view) suppresses every chart.
pub fn dashboard(ui: &mut Ui, state: &AppState) {
    let Some(table) = &state.table else {
        ui.centered_and_justified(|ui: &mut Ui| {
            match &state.status_message {
                Some(msg) => ui.heading(RichText::new(msg).color(Color32::RED)),
                None => ui.heading("Open a dataset to explore dropouts  (File → Open…)"),
            }
        });
        return;
    };

    if let Some(err) = &state.pipeline_error {
        ui.centered_and_justified(|ui: &mut Ui| {
            ui.heading(RichText::new(format!("⚠ {err}")).color(ui.visuals().warn_fg_color));
        });
        return;
    }

    let Some(insights) = &state.insights else {
        return;
    };

    ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| {
            ui.heading("Student Dropout Analysis");
            ui.separator();
            kpi_row(ui, insights);
            ui.separator();

            // ---- Dropout breakdowns, two charts per row ----
            let groups: Vec<&GroupedCounts> = insights.dropouts_by_dimension.iter().collect();
            for pair in groups.chunks(2) {
                ui.columns(2, |cols: &mut [Ui]| {
                    for (i, group) in pair.iter().copied().enumerate() {
                        let colors = table
                            .unique_values
                            .get(&group.column)
                            .map(|vals| ColorMap::new(vals, state.theme));
                        dimension_bar_chart(&mut cols[i], group, colors.as_ref());
                    }
                });
            }

            if !insights.grade_trend.is_empty() {
                ui.add_space(8.0);
                trend_chart(ui, &insights.grade_trend, state.theme.accent());
            }

            if let Some(matrix) = &insights.correlation {
                ui.add_space(8.0);
                correlation_heatmap(ui, matrix);
            }

            ui.add_space(8.0);
            key_insights(ui, insights);

            ui.separator();
            ui.heading("Filtered Student Data");
            super::table::filtered_table(ui, state);
        });
}

// ---------------------------------------------------------------------------
// KPI row
// ---------------------------------------------------------------------------

fn kpi_row(ui: &mut Ui, insights: &InsightSummary) {
    ui.columns(3, |cols: &mut [Ui]| {
        metric(&mut cols[0], "Total Students", insights.total_students.to_string());
        metric(&mut cols[1], "Total Dropouts", insights.dropouts.to_string());
        metric(
            &mut cols[2],
            "Dropout Rate (%)",
            format!("{:.2}", insights.dropout_rate),
        );
    });
}

fn metric(ui: &mut Ui, label: &str, value: String) {
    ui.vertical(|ui: &mut Ui| {
        ui.label(RichText::new(label).weak());
        ui.label(RichText::new(value).size(26.0).strong());
    });
}

// ---------------------------------------------------------------------------
// Charts
// ---------------------------------------------------------------------------

/// One bar per distinct value, coloured and named so the legend doubles as
/// the category axis.
fn dimension_bar_chart(ui: &mut Ui, group: &GroupedCounts, colors: Option<&ColorMap>) {
    ui.strong(format!("{}-wise Dropouts", group.column));
    Plot::new(format!("dropouts_{}", group.column))
        .legend(Legend::default())
        .height(200.0)
        .allow_drag(false)
        .allow_scroll(false)
        .show(ui, |plot_ui| {
            for (i, (value, count)) in group.counts.iter().enumerate() {
                let mut bar = Bar::new(i as f64, *count as f64).width(0.6);
                if let Some(colors) = colors {
                    bar = bar.fill(colors.color_for(value));
                }
                plot_ui.bar_chart(BarChart::new(vec![bar]).name(value.to_string()));
            }
        });
}

fn trend_chart(ui: &mut Ui, trend: &[TrendPoint], accent: Color32) {
    ui.strong("Average Dropout Score by Grade");
    let coords: Vec<[f64; 2]> = trend
        .iter()
        .enumerate()
        .map(|(i, p)| [p.grade.as_f64().unwrap_or(i as f64), p.mean_score])
        .collect();

    Plot::new("grade_trend")
        .height(200.0)
        .x_axis_label("Grade")
        .y_axis_label("Dropout score")
        .allow_scroll(false)
        .show(ui, |plot_ui| {
            plot_ui.line(
                Line::new(PlotPoints::from(coords.clone()))
                    .color(accent)
                    .width(2.0),
            );
            plot_ui.points(Points::new(PlotPoints::from(coords)).color(accent).radius(4.0));
        });
}

/// Painted correlation grid: positive cells warm, negative cells cool,
/// intensity by |coefficient|.
fn correlation_heatmap(ui: &mut Ui, matrix: &CorrelationMatrix) {
    ui.strong("Correlation Heatmap (Numeric Attributes)");
    ui.label(
        RichText::new("How the numeric columns relate to each other (-1.0 to 1.0).")
            .weak()
            .size(12.0),
    );

    let n = matrix.columns.len();
    let cell_size = 42.0;
    let label_width = 140.0;
    let header_height = 76.0;

    let (rect, _response) = ui.allocate_exact_size(
        egui::vec2(
            label_width + n as f32 * cell_size + 16.0,
            header_height + n as f32 * cell_size + 16.0,
        ),
        egui::Sense::hover(),
    );

    let painter = ui.painter();
    let text_color = ui.visuals().text_color();

    for (j, name) in matrix.columns.iter().enumerate() {
        let pos = rect.min
            + egui::vec2(
                label_width + j as f32 * cell_size + cell_size / 2.0,
                header_height - 8.0,
            );
        painter.text(
            pos,
            Align2::CENTER_BOTTOM,
            name.chars().take(18).collect::<String>(),
            FontId::proportional(10.0),
            text_color,
        );
    }

    for (i, row_name) in matrix.columns.iter().enumerate() {
        painter.text(
            rect.min
                + egui::vec2(
                    label_width - 8.0,
                    header_height + i as f32 * cell_size + cell_size / 2.0,
                ),
            Align2::RIGHT_CENTER,
            row_name.chars().take(18).collect::<String>(),
            FontId::proportional(11.0),
            text_color,
        );

        for (j, &val) in matrix.values[i].iter().enumerate() {
            let cell_rect = egui::Rect::from_min_size(
                rect.min
                    + egui::vec2(
                        label_width + j as f32 * cell_size,
                        header_height + i as f32 * cell_size,
                    ),
                egui::vec2(cell_size, cell_size),
            );

            let base = if val >= 0.0 {
                Color32::from_rgb(214, 84, 84)
            } else {
                Color32::from_rgb(65, 121, 225)
            };
            let color = base.linear_multiply(val.abs() as f32);

            painter.rect_filled(cell_rect.shrink(1.0), 3.0, ui.visuals().extreme_bg_color);
            painter.rect_filled(cell_rect.shrink(1.0), 3.0, color);

            if val.abs() > 0.05 {
                painter.text(
                    cell_rect.center(),
                    Align2::CENTER_CENTER,
                    format!("{val:.2}"),
                    FontId::proportional(10.0),
                    text_color,
                );
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Key insights
// ---------------------------------------------------------------------------

fn key_insights(ui: &mut Ui, insights: &InsightSummary) {
    ui.strong("Key Insights Summary");
    for (dim, value) in &insights.modal_categories {
        ui.horizontal(|ui: &mut Ui| {
            ui.label(format!("Most dropouts by {dim}:"));
            ui.label(RichText::new(value.as_str()).strong());
        });
    }
}
