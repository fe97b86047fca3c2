use clap::{
    builder::{PossibleValuesParser, TypedValueParser as _},
    Args, Parser, ValueHint,
};
use log::Level;
use std::path::PathBuf;

/// Logging options.
#[derive(Args, Clone, Debug)]
pub struct LoggingOpt {
    /// The logging level to use.
    #[arg(
        short, long, default_value_t = Level::Info,
        // Needed because enum is foreign so can't use ValueEnum derive.
        value_parser = PossibleValuesParser::new(["trace", "debug", "info", "warn", "error"]).map(|s| s.parse::<Level>().unwrap()),
        ignore_case = true
    )]
    pub log_level: Level,
}

/// Dataset location.
#[derive(Args, Clone, Debug)]
pub struct RootOpt {
    /// Folder containing `raw_audios/` and `assets/`.
    #[arg(short, long, default_value = ".", value_hint = ValueHint::DirPath)]
    pub root: PathBuf,
}

/// Spectrogram drawing options.
#[derive(Args, Clone, Debug)]
pub struct PlotOpt {
    /// Font file for axis labels. Common system fonts are tried if not given.
    #[arg(short, long, value_hint = ValueHint::FilePath)]
    pub font: Option<PathBuf>,

    /// Fail files that can't get axis labels instead of drawing them without.
    #[arg(long)]
    pub require_labels: bool,
}

/// Copy raw recordings into their category folders and regenerate all spectrograms.
#[derive(Parser, Clone, Debug)]
#[command(version)]
pub struct RefreshCli {
    #[command(flatten)]
    pub log_opt: LoggingOpt,

    #[command(flatten)]
    pub root_opt: RootOpt,

    #[command(flatten)]
    pub plot_opt: PlotOpt,
}

/// Render a spectrogram image for every categorized audio file.
#[derive(Parser, Clone, Debug)]
#[command(version)]
pub struct GenerateCli {
    #[command(flatten)]
    pub log_opt: LoggingOpt,

    #[command(flatten)]
    pub root_opt: RootOpt,

    #[command(flatten)]
    pub plot_opt: PlotOpt,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn no_arguments_use_defaults() {
        let opt = RefreshCli::try_parse_from(["refresh_assets"]).unwrap();
        assert_eq!(opt.log_opt.log_level, Level::Info);
        assert_eq!(opt.root_opt.root, PathBuf::from("."));
        assert!(opt.plot_opt.font.is_none());
        assert!(!opt.plot_opt.require_labels);
    }

    #[test]
    fn flags() {
        let opt = GenerateCli::try_parse_from([
            "generate_spectrograms",
            "--log-level",
            "DEBUG",
            "-r",
            "data",
            "--font",
            "a.ttf",
            "--require-labels",
        ])
        .unwrap();
        assert_eq!(opt.log_opt.log_level, Level::Debug);
        assert_eq!(opt.root_opt.root, PathBuf::from("data"));
        assert_eq!(opt.plot_opt.font, Some(PathBuf::from("a.ttf")));
        assert!(opt.plot_opt.require_labels);
        assert!(GenerateCli::try_parse_from(["x", "--log-level", "loud"]).is_err());
    }

    #[test]
    fn cli_definitions_are_valid() {
        RefreshCli::command().debug_assert();
        GenerateCli::command().debug_assert();
    }
}
