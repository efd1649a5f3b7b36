use eframe::egui::{RichText, Ui};
use egui_extras::{Column, TableBuilder};

use crate::state::AppState;

const ROW_HEIGHT: f32 = 18.0;

/// Classification results for the visible test points.
pub fn results_table(ui: &mut Ui, state: &AppState) {
    let Some(analysis) = &state.analysis else {
        return;
    };

    TableBuilder::new(ui)
        .striped(true)
        .resizable(true)
        .column(Column::auto().at_least(70.0))
        .column(Column::auto().at_least(70.0))
        .column(Column::auto().at_least(80.0))
        .column(Column::auto().at_least(80.0))
        .column(Column::auto().at_least(80.0))
        .column(Column::auto().at_least(80.0))
        .column(Column::remainder())
        .header(ROW_HEIGHT + 2.0, |mut header| {
            for title in ["x", "y", "ideal", "training", "Δy", "allowed", "nearest Δy"] {
                header.col(|ui| {
                    ui.strong(title);
                });
            }
        })
        .body(|body| {
            body.rows(ROW_HEIGHT, state.visible_indices.len(), |mut row| {
                let c = &analysis.classifications[state.visible_indices[row.index()]];
                let m = c.assigned.as_ref();
                let cells = [
                    format!("{:.3}", c.point.x),
                    format!("{:.4}", c.point.y),
                    m.map_or_else(|| "—".to_string(), |m| m.candidate.clone()),
                    m.map_or_else(|| "—".to_string(), |m| m.training.clone()),
                    m.map_or_else(|| "—".to_string(), |m| format!("{:.4}", m.deviation)),
                    m.map_or_else(|| "—".to_string(), |m| format!("{:.4}", m.allowed)),
                    format!("{:.4}", c.nearest_deviation),
                ];
                let color = match (c.candidate(), &state.color_map) {
                    (Some(label), Some(cm)) => Some(cm.color_for(label)),
                    _ => None,
                };
                for (i, text) in cells.into_iter().enumerate() {
                    row.col(|ui| {
                        let mut text = RichText::new(text).monospace();
                        if i == 2 {
                            if let Some(color) = color {
                                text = text.color(color);
                            }
                        }
                        ui.label(text);
                    });
                }
            });
        });
}
