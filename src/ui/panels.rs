use eframe::egui::{self, Color32, RichText, ScrollArea, Ui};

use crate::data::model::Table;
use crate::fit::{OutOfDomainPolicy, DEFAULT_THRESHOLD_FACTOR};
use crate::sink::{CsvSink, JsonSink, PresentationSink};
use crate::state::{AppState, DatasetKind, NanofluidView, Tab};

// ---------------------------------------------------------------------------
// Left side panel – fit summary and controls
// ---------------------------------------------------------------------------

/// Render the left control panel.
pub fn side_panel(ui: &mut Ui, state: &mut AppState) {
    ui.heading("Ideal functions");
    ui.separator();

    ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| {
            inputs_summary(ui, state);
            ui.separator();

            if state.tab == Tab::Nanofluid {
                nanofluid_controls(ui, state);
                return;
            }

            // ---- Threshold ----
            ui.strong("Threshold factor");
            let mut factor = state.config.threshold_factor;
            let slider = ui.add(egui::Slider::new(&mut factor, 0.0..=5.0).step_by(0.01));
            if slider.changed() {
                state.set_threshold_factor(factor);
            }
            if ui.small_button("Reset to √2").clicked() {
                state.set_threshold_factor(DEFAULT_THRESHOLD_FACTOR);
            }

            let mut skip = state.config.out_of_domain == OutOfDomainPolicy::Skip;
            if ui
                .checkbox(&mut skip, "Skip points outside the ideal x-grid")
                .changed()
            {
                state.set_out_of_domain(if skip {
                    OutOfDomainPolicy::Skip
                } else {
                    OutOfDomainPolicy::Fail
                });
            }
            ui.separator();

            // ---- Selected fits, doubling as the point filter ----
            let Some(analysis) = &state.analysis else {
                ui.label("No fit yet.");
                return;
            };
            ui.strong("Best fits");

            let rows: Vec<(String, String, f64, f64)> = analysis
                .fits
                .iter()
                .map(|f| {
                    (
                        f.training.label.clone(),
                        f.candidate.label.clone(),
                        f.error,
                        f.allowed_deviation(analysis.threshold_factor),
                    )
                })
                .collect();
            let assigned = analysis.assigned_count();
            let total = analysis.classifications.len();

            let mut changed = false;
            for (training, candidate, error, allowed) in rows {
                let mut text = RichText::new(format!("{training} → {candidate}"));
                if let Some(cm) = &state.color_map {
                    text = text.color(cm.color_for(&candidate));
                }
                let visible = state.filters.candidates.entry(candidate).or_insert(true);
                changed |= ui.checkbox(visible, text).changed();
                ui.label(format!("    sse {error:.4}, band ±{allowed:.4}"));
            }
            changed |= ui
                .checkbox(&mut state.filters.show_unassigned, "unassigned")
                .changed();
            if changed {
                state.refilter();
            }

            ui.separator();
            ui.label(format!("{assigned} of {total} test points assigned"));

            if !state.issues.is_empty() {
                ui.separator();
                ui.strong("Integrity");
                for issue in &state.issues {
                    ui.label(RichText::new(issue.to_string()).color(Color32::YELLOW));
                }
            }
        });
}

fn inputs_summary(ui: &mut Ui, state: &AppState) {
    let rows = |t: &Option<Table>| match t {
        Some(t) => format!("{} rows × {} columns", t.len(), t.width()),
        None => "not loaded".to_string(),
    };
    ui.label(format!("Training: {}", rows(&state.training)));
    ui.label(format!("Ideal: {}", rows(&state.ideal)));
    ui.label(format!("Test: {} points", state.test_points.len()));
    if let Some(ds) = &state.nanofluid {
        ui.label(format!("Nanofluid: {} records", ds.len()));
    }
}

fn nanofluid_controls(ui: &mut Ui, state: &mut AppState) {
    ui.strong("View");
    for (view, label) in [
        (NanofluidView::Heatmap, "Correlation heatmap"),
        (NanofluidView::Scatter, "Velocity vs heat transfer"),
        (NanofluidView::Histogram, "Thermal conductivity"),
        (NanofluidView::Bar, "Heat transfer by type"),
        (NanofluidView::BoxPlot, "Viscosity by type"),
    ] {
        ui.radio_value(&mut state.nanofluid_view, view, label);
    }
}

// ---------------------------------------------------------------------------
// Top bar
// ---------------------------------------------------------------------------

/// Render the top menu / toolbar.
pub fn top_bar(ui: &mut Ui, state: &mut AppState) {
    egui::menu::bar(ui, |ui: &mut Ui| {
        ui.menu_button("File", |ui: &mut Ui| {
            for kind in [
                DatasetKind::Training,
                DatasetKind::Ideal,
                DatasetKind::Test,
                DatasetKind::Nanofluid,
            ] {
                if ui.button(format!("Open {}…", kind.label())).clicked() {
                    open_file_dialog(state, kind);
                    ui.close_menu();
                }
            }
            ui.separator();
            let ready = state.analysis.is_some();
            if ui
                .add_enabled(ready, egui::Button::new("Export results as CSV…"))
                .clicked()
            {
                export_dialog(state, "csv");
                ui.close_menu();
            }
            if ui
                .add_enabled(ready, egui::Button::new("Export results as JSON…"))
                .clicked()
            {
                export_dialog(state, "json");
                ui.close_menu();
            }
        });

        ui.separator();

        for (tab, label) in [
            (Tab::Ideal, "Ideal functions"),
            (Tab::Training, "Training data"),
            (Tab::BestFit, "Best fit"),
            (Tab::Classification, "Test classification"),
            (Tab::Nanofluid, "Nanofluid"),
        ] {
            ui.selectable_value(&mut state.tab, tab, label);
        }

        if let Some(msg) = &state.status_message {
            ui.separator();
            ui.label(RichText::new(msg).color(Color32::RED));
        }
    });
}

// ---------------------------------------------------------------------------
// File dialogs
// ---------------------------------------------------------------------------

pub fn open_file_dialog(state: &mut AppState, kind: DatasetKind) {
    let dialog = rfd::FileDialog::new().set_title(format!("Open {}", kind.label()));
    let dialog = match kind {
        DatasetKind::Training | DatasetKind::Ideal => dialog
            .add_filter("Supported files", &["csv", "json", "parquet", "pq"])
            .add_filter("CSV", &["csv"])
            .add_filter("JSON", &["json"])
            .add_filter("Parquet", &["parquet", "pq"]),
        DatasetKind::Test | DatasetKind::Nanofluid => dialog.add_filter("CSV", &["csv"]),
    };

    if let Some(path) = dialog.pick_file() {
        if let Err(e) = state.load(kind, &path) {
            state.report_error(&e);
        }
    }
}

fn export_dialog(state: &mut AppState, extension: &str) {
    let Some(analysis) = &state.analysis else {
        return;
    };
    let Some(path) = rfd::FileDialog::new()
        .set_title("Export results")
        .set_file_name(format!("results.{extension}"))
        .add_filter(extension.to_uppercase(), &[extension])
        .save_file()
    else {
        return;
    };

    let series = analysis.plotted_series();
    let result = if extension == "json" {
        JsonSink::new(path).render(&series, &analysis.classifications)
    } else {
        CsvSink::new(path).render(&series, &analysis.classifications)
    };
    if let Err(e) = result {
        state.report_error(&e);
    }
}
