//! Copies the raw recordings into their category folders, clearing stale audio and spectrograms first,
//! then regenerates every spectrogram.

use clap::Parser as _;
use spectrogram_assets::{args::RefreshCli, binary_logic};
use std::process::ExitCode;

fn main() -> ExitCode {
    // Handle commandline arguments.
    let opt = RefreshCli::parse();
    binary_logic::run_refresh(opt)
}
