use crate::{
    args::{GenerateCli, LoggingOpt, PlotOpt, RefreshCli},
    classify::CopyTable,
    constants::{AUDIO_CATEGORIES, COPY_RULES},
    generate::{self, SpectrogramParams},
    layout::Layout,
    refresh,
};
use anyhow::Context;
use log::error;
use std::process::ExitCode;

fn init_logging(opt: &LoggingOpt) -> anyhow::Result<()> {
    simple_logger::init_with_level(opt.log_level).context("Initializing logger")
}

fn params(opt: PlotOpt) -> SpectrogramParams {
    SpectrogramParams {
        font: opt.font,
        require_labels: opt.require_labels,
        ..Default::default()
    }
}

/// Print a top level failure with its causes and turn it into the failing exit code.
fn report_failure(err: &anyhow::Error) -> ExitCode {
    error!("{err:#}");
    ExitCode::FAILURE
}

/// Refresh main logic.
pub fn run_refresh(opt: RefreshCli) -> ExitCode {
    if let Err(err) = init_logging(&opt.log_opt) {
        eprintln!("{err:#}");
        return ExitCode::FAILURE;
    }
    let layout = Layout::from_root(&opt.root_opt.root);
    let table = match CopyTable::from_patterns(COPY_RULES).context("Invalid copy rule") {
        Ok(table) => table,
        Err(err) => return report_failure(&err),
    };

    match refresh::refresh(&layout, &table, &AUDIO_CATEGORIES, &params(opt.plot_opt)) {
        Ok(_) => ExitCode::SUCCESS,
        Err(err) => report_failure(&err.into()),
    }
}

/// Spectrogram generation main logic.
/// Individual files failing is not a failure of the run.
pub fn run_generate(opt: GenerateCli) -> ExitCode {
    if let Err(err) = init_logging(&opt.log_opt) {
        eprintln!("{err:#}");
        return ExitCode::FAILURE;
    }
    let layout = Layout::from_root(&opt.root_opt.root);

    match generate::generate_all(&layout, &AUDIO_CATEGORIES, &params(opt.plot_opt)) {
        Ok(_) => ExitCode::SUCCESS,
        Err(err) => report_failure(&err),
    }
}
