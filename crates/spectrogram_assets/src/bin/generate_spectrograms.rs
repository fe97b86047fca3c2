//! Renders a spectrogram image for every audio file of every category.

use clap::Parser as _;
use spectrogram_assets::{args::GenerateCli, binary_logic};
use std::process::ExitCode;

fn main() -> ExitCode {
    // Handle commandline arguments.
    let opt = GenerateCli::parse();
    binary_logic::run_generate(opt)
}
