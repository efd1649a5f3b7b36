use eframe::egui::{self, Color32, RichText, Ui, WidgetText};
use egui_plot::{
    Bar, BarChart, BoxElem, BoxPlot, BoxSpread, Legend, Line, LineStyle, MarkerShape, Plot,
    PlotPoints, Points,
};

use crate::color::{correlation_color, generate_palette};
use crate::data::model::Series;
use crate::nanofluid::stats::{by_type, mean, BoxStats, CorrelationMatrix, Histogram};
use crate::state::{AppState, NanofluidView};

/// Number of ideal functions shown on the overview tab.
const IDEAL_PREVIEW: usize = 4;

const HISTOGRAM_BINS: usize = 20;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn placeholder(ui: &mut Ui, text: &str) {
    ui.centered_and_justified(|ui: &mut Ui| {
        ui.heading(text);
    });
}

fn xy_plot<'a>(
    id: &str,
    x_label: impl Into<WidgetText>,
    y_label: impl Into<WidgetText>,
) -> Plot<'a> {
    Plot::new(id)
        .legend(Legend::default())
        .x_axis_label(x_label)
        .y_axis_label(y_label)
        .allow_boxed_zoom(true)
        .allow_drag(true)
        .allow_scroll(true)
        .allow_zoom(true)
}

fn series_points<'a>(series: &Series) -> PlotPoints<'a> {
    series.points().map(|(x, y)| [x, y]).collect()
}

fn series_line<'a>(series: &Series, name: &str, color: Color32) -> Line<'a> {
    Line::new(series_points(series))
        .name(name)
        .color(color)
        .width(1.5)
}

// ---------------------------------------------------------------------------
// Ideal functions / training data
// ---------------------------------------------------------------------------

/// The first few ideal functions.
pub fn ideal_plot(ui: &mut Ui, state: &AppState) {
    let Some(analysis) = &state.analysis else {
        placeholder(ui, "Load training and ideal data  (File → Open…)");
        return;
    };

    let shown = &analysis.ideal[..analysis.ideal.len().min(IDEAL_PREVIEW)];
    let palette = generate_palette(shown.len());
    xy_plot("ideal_plot", "x", "y").show(ui, |plot_ui| {
        for (series, color) in shown.iter().zip(palette) {
            plot_ui.line(series_line(series, &series.label, color));
        }
    });
}

/// Every training series as a line.
pub fn training_plot(ui: &mut Ui, state: &AppState) {
    let Some(analysis) = &state.analysis else {
        placeholder(ui, "Load training and ideal data  (File → Open…)");
        return;
    };

    let palette = generate_palette(analysis.training.len());
    xy_plot("training_plot", "x", "y").show(ui, |plot_ui| {
        for (series, color) in analysis.training.iter().zip(palette) {
            plot_ui.line(series_line(series, &series.label, color));
        }
    });
}

// ---------------------------------------------------------------------------
// Best fit
// ---------------------------------------------------------------------------

/// Training points against the ideal function chosen for each of them.
pub fn best_fit_plot(ui: &mut Ui, state: &AppState) {
    let (Some(analysis), Some(color_map)) = (&state.analysis, &state.color_map) else {
        placeholder(ui, "Load training and ideal data  (File → Open…)");
        return;
    };

    xy_plot("best_fit_plot", "x", "y").show(ui, |plot_ui| {
        for fit in &analysis.fits {
            let color = color_map.color_for(&fit.candidate.label);
            plot_ui.points(
                Points::new(series_points(&fit.training))
                    .name(format!("Train: {}", fit.training.label))
                    .color(color.gamma_multiply(0.5))
                    .radius(2.0),
            );
            plot_ui.line(
                series_line(
                    &fit.candidate,
                    &format!("Ideal: {}", fit.candidate.label),
                    color,
                )
                .width(2.0),
            );
        }
    });
}

// ---------------------------------------------------------------------------
// Test classification
// ---------------------------------------------------------------------------

/// Selected ideal functions with their acceptance bands, and the visible
/// test points coloured by assignment.
pub fn classification_plot(ui: &mut Ui, state: &AppState) {
    let (Some(analysis), Some(color_map)) = (&state.analysis, &state.color_map) else {
        placeholder(ui, "Load training and ideal data  (File → Open…)");
        return;
    };

    xy_plot("classification_plot", "x", "y").show(ui, |plot_ui| {
        for fit in &analysis.fits {
            if !state
                .filters
                .candidates
                .get(&fit.candidate.label)
                .copied()
                .unwrap_or(true)
            {
                continue;
            }
            let color = color_map.color_for(&fit.candidate.label);
            let allowed = fit.allowed_deviation(analysis.threshold_factor);
            plot_ui.line(series_line(&fit.candidate, &fit.candidate.label, color));

            for offset in [-allowed, allowed] {
                let band: PlotPoints = fit
                    .candidate
                    .points()
                    .map(|(x, y)| [x, y + offset])
                    .collect();
                plot_ui.line(
                    Line::new(band)
                        .name(&fit.candidate.label)
                        .color(color.gamma_multiply(0.4))
                        .style(LineStyle::dashed_loose()),
                );
            }
        }

        for &idx in &state.visible_indices {
            let c = &analysis.classifications[idx];
            let point = Points::new(vec![[c.point.x, c.point.y]]).radius(3.5);
            let point = match c.candidate() {
                Some(label) => point.name(label).color(color_map.color_for(label)),
                None => point
                    .name("unassigned")
                    .color(color_map.unassigned())
                    .shape(MarkerShape::Cross),
            };
            plot_ui.points(point);
        }
    });
}

// ---------------------------------------------------------------------------
// Nanofluid views
// ---------------------------------------------------------------------------

pub fn nanofluid_plot(ui: &mut Ui, state: &AppState) {
    let Some(ds) = &state.nanofluid else {
        placeholder(ui, "Load a nanofluid dataset  (File → Open nanofluid dataset…)");
        return;
    };

    match state.nanofluid_view {
        NanofluidView::Heatmap => {
            if let Some(matrix) = &state.correlations {
                correlation_heatmap(ui, matrix);
            }
        }
        NanofluidView::Scatter => {
            let points: PlotPoints = ds
                .records
                .iter()
                .map(|r| [r.flow_velocity, r.heat_transfer_coefficient])
                .collect();
            xy_plot(
                "nanofluid_scatter",
                "Flow Velocity (m/s)",
                "Heat Transfer Coefficient (W/m²K)",
            )
            .show(ui, |plot_ui| {
                plot_ui.points(
                    Points::new(points)
                        .name("records")
                        .color(Color32::from_rgb(0, 0, 128))
                        .radius(3.0),
                );
            });
        }
        NanofluidView::Histogram => {
            let values: Vec<f64> = ds.records.iter().map(|r| r.thermal_conductivity).collect();
            let Some(hist) = Histogram::new(&values, HISTOGRAM_BINS) else {
                placeholder(ui, "No records");
                return;
            };
            let bars: Vec<Bar> = hist
                .centres()
                .zip(&hist.counts)
                .map(|(centre, &count)| Bar::new(centre, count as f64).width(hist.bin_width()))
                .collect();
            xy_plot(
                "nanofluid_histogram",
                "Thermal Conductivity (W/mK)",
                "Frequency",
            )
            .show(ui, |plot_ui| {
                plot_ui.bar_chart(
                    BarChart::new(bars)
                        .name("Thermal conductivity")
                        .color(Color32::from_rgb(70, 110, 220)),
                );
            });
        }
        NanofluidView::Bar => {
            let groups = by_type(&ds.records, |r| r.heat_transfer_coefficient);
            let palette = generate_palette(groups.len());
            xy_plot(
                "nanofluid_bar",
                "Nanoparticle Type",
                "Heat Transfer Coefficient (W/m²K)",
            )
            .show(ui, |plot_ui| {
                for (i, ((kind, values), color)) in groups.iter().zip(palette).enumerate() {
                    let Some(avg) = mean(values) else { continue };
                    plot_ui.bar_chart(
                        BarChart::new(vec![Bar::new(i as f64, avg).width(0.6).name(kind)])
                            .name(kind)
                            .color(color),
                    );
                }
            });
        }
        NanofluidView::BoxPlot => {
            let groups = by_type(&ds.records, |r| r.viscosity);
            let palette = generate_palette(groups.len());
            xy_plot(
                "nanofluid_box",
                "Nanoparticle Type",
                "Viscosity (Pa·s)",
            )
            .show(ui, |plot_ui| {
                for (i, ((kind, values), color)) in groups.iter().zip(palette).enumerate() {
                    let Some(b) = BoxStats::new(values) else { continue };
                    let spread = BoxSpread::new(
                        b.lower_whisker,
                        b.q1,
                        b.median,
                        b.q3,
                        b.upper_whisker,
                    );
                    let elem = BoxElem::new(i as f64, spread).name(kind).box_width(0.5);
                    plot_ui.box_plot(BoxPlot::new(vec![elem]).name(kind).color(color));
                }
            });
        }
    }
}

/// Correlation matrix as a coloured grid of coefficients.
fn correlation_heatmap(ui: &mut Ui, matrix: &CorrelationMatrix) {
    egui::ScrollArea::both()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| {
            egui::Grid::new("correlation_grid")
                .spacing([4.0, 4.0])
                .show(ui, |ui: &mut Ui| {
                    ui.label("");
                    for label in &matrix.labels {
                        ui.strong(label);
                    }
                    ui.end_row();

                    for (row, label) in matrix.labels.iter().enumerate() {
                        ui.strong(label);
                        for col in 0..matrix.labels.len() {
                            let text = match matrix.get(row, col) {
                                Some(r) => RichText::new(format!(" {r:+.2} "))
                                    .monospace()
                                    .color(Color32::BLACK)
                                    .background_color(correlation_color(r)),
                                None => RichText::new("  —  ").monospace(),
                            };
                            ui.label(text);
                        }
                        ui.end_row();
                    }
                });
        });
}
