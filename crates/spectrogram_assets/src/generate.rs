use crate::{
    constants::{AUDIO_EXTENSION, CROP_PADDING, FIGURE_SIZE, HOP_LENGTH, N_FFT, TOP_DB},
    file_io,
    layout::Layout,
    plotting::{self, SpectrogramPlot},
};
use anyhow::{bail, ensure, Context};
use log::{error, info, warn};
use std::{
    fs,
    path::{Path, PathBuf},
};
use stft::{
    db::{DbScale, Reference},
    fft::window_fn,
    SpecCompute, WindowLength,
};

/// How spectrograms are computed and drawn.
#[derive(Clone, Debug, PartialEq)]
pub struct SpectrogramParams {
    /// Samples per fft window.
    pub n_fft: usize,
    /// Samples between successive windows.
    pub hop_length: usize,
    /// Values further than this below the loudest point of a file are drawn at the floor.
    pub top_db: f64,
    /// Image size in pixels before the surrounding whitespace is cropped.
    pub figure_size: (u32, u32),
    /// Whitespace in pixels kept around the cropped content.
    pub crop_padding: u32,
    /// Font for axis labels. Common system fonts are tried if unset.
    pub font: Option<PathBuf>,
    /// Fail a file instead of drawing it without axis labels when no font is available.
    pub require_labels: bool,
}

impl Default for SpectrogramParams {
    fn default() -> Self {
        SpectrogramParams {
            n_fft: N_FFT,
            hop_length: HOP_LENGTH,
            top_db: TOP_DB,
            figure_size: FIGURE_SIZE,
            crop_padding: CROP_PADDING,
            font: None,
            require_labels: false,
        }
    }
}

impl SpectrogramParams {
    /// Check the settings can produce a spectrogram at all.
    pub fn validate(&self) -> anyhow::Result<()> {
        ensure!(self.n_fft > 0, "n_fft must be positive");
        ensure!(self.hop_length > 0, "hop_length must be positive");
        ensure!(
            self.top_db >= 0.0,
            "top_db must be non-negative, got {}",
            self.top_db
        );
        ensure!(
            self.figure_size.0 > 0 && self.figure_size.1 > 0,
            "figure_size must be non-empty, got {:?}",
            self.figure_size
        );
        Ok(())
    }
}

/// Decide whether `image` gets axis labels given the font that was found, if any.
fn use_labels(font: Option<&Path>, require_labels: bool, image: &Path) -> anyhow::Result<bool> {
    match font {
        Some(_) => Ok(true),
        None if require_labels => bail!("No font for the axis labels of {}", image.display()),
        None => {
            warn!("Drawing {} without axis labels", image.display());
            Ok(false)
        }
    }
}

/// Result of every audio file a generation run attempted, in processing order.
#[derive(Debug, Default)]
pub struct GenerationReport {
    pub outcomes: Vec<(PathBuf, anyhow::Result<PathBuf>)>,
}

impl GenerationReport {
    /// Images written.
    pub fn succeeded(&self) -> impl Iterator<Item = &Path> + '_ {
        self.outcomes
            .iter()
            .filter_map(|(_, outcome)| outcome.as_deref().ok())
    }

    /// Audio files that produced no image and why.
    pub fn failed(&self) -> impl Iterator<Item = (&Path, &anyhow::Error)> + '_ {
        self.outcomes
            .iter()
            .filter_map(|(audio, outcome)| outcome.as_ref().err().map(|err| (audio.as_path(), err)))
    }

    #[must_use]
    pub fn is_complete_success(&self) -> bool {
        self.failed().next().is_none()
    }
}

/// Compute the spectrogram of one audio file and save it as an image at `image`.
pub fn generate_spectrogram(
    audio: &Path,
    image: &Path,
    params: &SpectrogramParams,
) -> anyhow::Result<()> {
    params.validate()?;
    let (spec, data) = file_io::read_wav(audio)?;

    let window_len = WindowLength::from_samples(params.n_fft);
    let window_step = WindowLength::from_samples(params.hop_length);
    let magnitudes = SpecCompute::new(data, window_len, window_step, window_fn::hann_periodic)
        .centered(true)
        .stft()
        .with_context(|| format!("Computing stft of {}", audio.display()))?;
    let db = magnitudes.to_db(DbScale {
        reference: Reference::Max,
        top_db: Some(params.top_db),
        ..Default::default()
    })?;

    if let Some(dir) = image.parent() {
        fs::create_dir_all(dir).with_context(|| format!("Creating {}", dir.display()))?;
    }
    let labels = use_labels(
        plotting::label_font(params.font.as_deref()),
        params.require_labels,
        image,
    )?;
    plotting::plot_spectrogram(
        SpectrogramPlot {
            db: &db,
            sample_rate: spec.sample_rate as f32,
            window_len: window_len.samples(),
            window_step: window_step.samples(),
        },
        params.figure_size,
        params.crop_padding,
        labels,
        image,
    )
}

/// Generate a spectrogram for every audio file of every category.
/// A file that fails is logged and recorded in the report without stopping the run.
/// Every existing category folder gets its mirrored image folder before its files are processed.
/// Only invalid `params` or failing to list a category folder or create its image folder is returned as an error.
pub fn generate_all(
    layout: &Layout,
    categories: &[&str],
    params: &SpectrogramParams,
) -> anyhow::Result<GenerationReport> {
    params.validate()?;
    let mut report = GenerationReport::default();

    for &category in categories {
        info!("Processing category: {category}");
        let audio_dir = layout.audio_dir(category);

        if !audio_dir.is_dir() {
            warn!("Category folder not found: {}", audio_dir.display());
            continue;
        }

        let image_dir = layout.image_dir(category);
        fs::create_dir_all(&image_dir)
            .with_context(|| format!("Creating {}", image_dir.display()))?;

        let audio_files = file_io::files_with_extension(&audio_dir, AUDIO_EXTENSION)
            .with_context(|| format!("Listing audio files in {}", audio_dir.display()))?;
        if audio_files.is_empty() {
            warn!("No audio files found in: {}", audio_dir.display());
            continue;
        }

        for audio in audio_files {
            let image = layout.image_for(category, &audio);
            let outcome = match generate_spectrogram(&audio, &image, params) {
                Ok(()) => {
                    info!("Generated: {}", image.display());
                    Ok(image)
                }
                Err(err) => {
                    error!("Error processing {}: {err:#}", audio.display());
                    Err(err)
                }
            };
            report.outcomes.push((audio, outcome));
        }
    }

    let failed = report.failed().count();
    if failed == 0 {
        info!("✓ All spectrograms generated successfully!");
    } else {
        warn!(
            "Generated {} spectrograms. {failed} audio files failed.",
            report.succeeded().count()
        );
    }
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_params_are_valid() {
        assert!(SpectrogramParams::default().validate().is_ok());
        // Hops longer than the window are allowed.
        let sparse = SpectrogramParams {
            hop_length: 2 * N_FFT,
            ..Default::default()
        };
        assert!(sparse.validate().is_ok());
    }

    #[test]
    fn unusable_params_are_rejected() {
        let invalid = [
            SpectrogramParams {
                n_fft: 0,
                ..Default::default()
            },
            SpectrogramParams {
                hop_length: 0,
                ..Default::default()
            },
            SpectrogramParams {
                top_db: -1.0,
                ..Default::default()
            },
            SpectrogramParams {
                top_db: f64::NAN,
                ..Default::default()
            },
            SpectrogramParams {
                figure_size: (0, 350),
                ..Default::default()
            },
        ];
        for params in invalid {
            assert!(params.validate().is_err(), "{params:?}");
        }
    }

    #[test]
    fn missing_font_only_fails_when_labels_are_required() {
        let image = Path::new("spectrogram.png");
        let font = Path::new("font.ttf");
        assert!(use_labels(Some(font), true, image).unwrap());
        assert!(use_labels(Some(font), false, image).unwrap());
        assert!(!use_labels(None, false, image).unwrap());
        let err = use_labels(None, true, image).unwrap_err();
        assert!(err.to_string().contains("spectrogram.png"), "{err}");
    }
}
