use crate::{
    classify::CopyTable,
    constants::{AUDIO_EXTENSION, IMAGE_EXTENSION},
    file_io,
    generate::{self, GenerationReport, SpectrogramParams},
    layout::Layout,
};
use log::{debug, info};
use std::{collections::BTreeMap, fs, io, path::PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum RefreshError {
    #[error("Raw audio folder not found: {}", .0.display())]
    SourceNotFound(PathBuf),
    #[error("Failed to prepare {}", .path.display())]
    Prepare {
        path: PathBuf,
        #[source]
        source: anyhow::Error,
    },
    #[error("Failed to copy {}", .path.display())]
    Copy {
        path: PathBuf,
        #[source]
        source: anyhow::Error,
    },
    #[error("Failed to generate spectrograms")]
    Generation(#[source] anyhow::Error),
}

/// What a refresh did.
#[derive(Debug, Default)]
pub struct RefreshReport {
    /// Copied files per category.
    pub copied: BTreeMap<String, Vec<PathBuf>>,
    /// Raw files no rule claimed.
    pub unmatched: Vec<PathBuf>,
    pub generation: GenerationReport,
}

/// Re-sort the raw recordings into their category folders and regenerate every spectrogram.
///
/// 1. Fail without touching anything if the raw folder is missing.
/// 2. For every category of `table` create the audio and image folders and empty them of audio and images.
/// 3. Copy each raw file into the folder of the first rule it matches.
/// 4. Generate spectrograms for every category in `categories`.
///
/// Nothing is rolled back if a later step fails. Rerunning is safe.
pub fn refresh(
    layout: &Layout,
    table: &CopyTable,
    categories: &[&str],
    params: &SpectrogramParams,
) -> Result<RefreshReport, RefreshError> {
    if !layout.raw_dir.is_dir() {
        return Err(RefreshError::SourceNotFound(layout.raw_dir.clone()));
    }

    // Clear existing audio and spectrogram files for refreshed categories.
    for category in table.categories() {
        let audio_dir = layout.audio_dir(category);
        let image_dir = layout.image_dir(category);
        for (dir, extension) in [(&audio_dir, AUDIO_EXTENSION), (&image_dir, IMAGE_EXTENSION)] {
            let prepare = || -> anyhow::Result<usize> {
                fs::create_dir_all(dir)?;
                file_io::clear_folder(dir, extension)
            };
            let removed = prepare().map_err(|source| RefreshError::Prepare {
                path: dir.clone(),
                source,
            })?;
            debug!("Removed {removed} .{extension} files from {}", dir.display());
        }
    }

    let raw_files = file_io::regular_files(&layout.raw_dir).map_err(|err: io::Error| {
        RefreshError::Prepare {
            path: layout.raw_dir.clone(),
            source: err.into(),
        }
    })?;

    let mut report = RefreshReport::default();
    for src in raw_files {
        let rule = src
            .file_name()
            .and_then(|name| name.to_str())
            .and_then(|name| table.classify(name).map(|rule| (name.to_owned(), rule)));
        let Some((name, rule)) = rule else {
            debug!("No copy rule for {}", src.display());
            report.unmatched.push(src);
            continue;
        };
        let dest = layout.audio_destination(rule.category(), &name);
        file_io::copy_preserving_times(&src, &dest).map_err(|source| RefreshError::Copy {
            path: src.clone(),
            source,
        })?;
        debug!("Copied {} to {}", src.display(), dest.display());
        report
            .copied
            .entry(rule.category().to_owned())
            .or_default()
            .push(dest);
    }
    for (category, files) in &report.copied {
        info!("Copied {} files into {category}", files.len());
    }

    report.generation =
        generate::generate_all(layout, categories, params).map_err(RefreshError::Generation)?;

    info!("✓ Audio copied and spectrograms regenerated.");
    Ok(report)
}
