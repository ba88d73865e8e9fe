use eframe::egui;

use crate::color::Theme;
use crate::config::DashboardConfig;
use crate::state::AppState;
use crate::ui::{charts, panels};

// ---------------------------------------------------------------------------
// eframe App implementation
// ---------------------------------------------------------------------------

pub struct DropscopeApp {
    pub state: AppState,
    applied_theme: Option<Theme>,
}

impl DropscopeApp {
    pub fn new(config: DashboardConfig) -> Self {
        Self {
            state: AppState::from_config(config),
            applied_theme: None,
        }
    }
}

impl eframe::App for DropscopeApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        if self.applied_theme != Some(self.state.theme) {
            ctx.set_visuals(self.state.theme.visuals());
            self.applied_theme = Some(self.state.theme);
        }

        // ---- Top panel: menu bar ----
        egui::TopBottomPanel::top("top_bar").show(ctx, |ui| {
            panels::top_bar(ui, &mut self.state);
        });

        // ---- Left side panel: filters and theme ----
        egui::SidePanel::left("filter_panel")
            .default_width(230.0)
            .resizable(true)
            .show(ctx, |ui| {
                panels::side_panel(ui, &mut self.state);
            });

        // ---- Central panel: KPIs, charts, insights, table ----
        egui::CentralPanel::default().show(ctx, |ui| {
            charts::dashboard(ui, &self.state);
        });
    }
}
