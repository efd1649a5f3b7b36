use eframe::egui;

use crate::state::{AppState, Tab};
use crate::ui::{panels, plot, table};

// ---------------------------------------------------------------------------
// eframe App implementation
// ---------------------------------------------------------------------------

pub struct IdealFitApp {
    pub state: AppState,
}

impl IdealFitApp {
    pub fn new(state: AppState) -> Self {
        Self { state }
    }
}

impl eframe::App for IdealFitApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // ---- Top panel: menu bar and tabs ----
        egui::TopBottomPanel::top("top_bar").show(ctx, |ui| {
            panels::top_bar(ui, &mut self.state);
        });

        // ---- Left side panel: threshold and filters ----
        egui::SidePanel::left("control_panel")
            .default_width(240.0)
            .resizable(true)
            .show(ctx, |ui| {
                panels::side_panel(ui, &mut self.state);
            });

        // ---- Bottom panel: per-point results ----
        if self.state.tab == Tab::Classification && self.state.analysis.is_some() {
            egui::TopBottomPanel::bottom("results_table")
                .resizable(true)
                .default_height(220.0)
                .show(ctx, |ui| {
                    table::results_table(ui, &self.state);
                });
        }

        // ---- Central panel: plot ----
        egui::CentralPanel::default().show(ctx, |ui| match self.state.tab {
            Tab::Ideal => plot::ideal_plot(ui, &self.state),
            Tab::Training => plot::training_plot(ui, &self.state),
            Tab::BestFit => plot::best_fit_plot(ui, &self.state),
            Tab::Classification => plot::classification_plot(ui, &self.state),
            Tab::Nanofluid => plot::nanofluid_plot(ui, &self.state),
        });
    }
}
