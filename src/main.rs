use anyhow::{anyhow, Context, Result};
use clap::Parser;
use eframe::egui;

use ideal_fit::app::IdealFitApp;
use ideal_fit::cli::Cli;
use ideal_fit::sink::{CsvSink, JsonSink, PresentationSink};
use ideal_fit::state::{AppState, DatasetKind};

fn main() -> Result<()> {
    env_logger::init();

    let cli = Cli::parse();
    let mut state = AppState::new(cli.pipeline_config());

    let inputs = [
        (DatasetKind::Test, &cli.test),
        (DatasetKind::Training, &cli.train),
        (DatasetKind::Ideal, &cli.ideal),
        (DatasetKind::Nanofluid, &cli.nanofluid),
    ];
    for (kind, path) in inputs {
        let Some(path) = path else { continue };
        if let Err(e) = state.load(kind, path) {
            if cli.headless {
                return Err(e);
            }
            state.report_error(&e);
        }
    }

    export(&cli, &state)?;

    if cli.headless {
        let analysis = state
            .analysis
            .as_ref()
            .context("headless mode needs both --train and --ideal")?;
        for issue in &state.issues {
            println!("warning: {issue}");
        }
        print!("{}", analysis.summary());
        return Ok(());
    }

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1280.0, 820.0])
            .with_min_inner_size([640.0, 420.0]),
        ..Default::default()
    };

    eframe::run_native(
        "Ideal Fit",
        options,
        Box::new(|_cc| Ok(Box::new(IdealFitApp::new(state)))),
    )
    .map_err(|e| anyhow!("{e}"))
}

/// Write the requested result files.
fn export(cli: &Cli, state: &AppState) -> Result<()> {
    if cli.export_csv.is_none() && cli.export_json.is_none() {
        return Ok(());
    }
    let analysis = state
        .analysis
        .as_ref()
        .context("nothing to export: load both training and ideal data")?;
    let series = analysis.plotted_series();

    if let Some(path) = &cli.export_csv {
        CsvSink::new(path).render(&series, &analysis.classifications)?;
    }
    if let Some(path) = &cli.export_json {
        JsonSink::new(path).render(&series, &analysis.classifications)?;
    }
    Ok(())
}
