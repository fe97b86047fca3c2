use anyhow::{bail, Context};
use hound::{SampleFormat, WavReader, WavSpec};
use std::{
    fs::{self, File, FileTimes},
    io,
    path::{Path, PathBuf},
};

/// Read data from a wav file.
/// Samples are scaled to `[-1, 1]` and multichannel audio is averaged to mono. The sample rate is untouched.
pub fn read_wav(file: &Path) -> anyhow::Result<(WavSpec, Vec<f64>)> {
    // The WAV file to decode.
    let reader =
        WavReader::open(file).with_context(|| format!("Invalid wav file {}", file.display()))?;
    let spec = reader.spec();
    log::trace!("Spec: {:?}", spec);
    // Select correct format representation.
    let interleaved = match spec.sample_format {
        SampleFormat::Float => reader
            .into_samples::<f32>()
            .map(|x| x.map(f64::from))
            .collect::<Result<Vec<_>, _>>(),
        SampleFormat::Int => {
            let full_scale = f64::from(1u32 << (spec.bits_per_sample.clamp(1, 32) - 1));
            reader
                .into_samples::<i32>()
                .map(|x| x.map(|x| f64::from(x) / full_scale))
                .collect::<Result<Vec<_>, _>>()
        }
    }
    .with_context(|| format!("Error reading samples of {}", file.display()))?;

    if interleaved.is_empty() {
        bail!("{} contains no samples", file.display());
    }

    let channels = usize::from(spec.channels.max(1));
    let data = interleaved
        .chunks(channels)
        .map(|frame| frame.iter().sum::<f64>() / frame.len() as f64)
        .collect();
    Ok((spec, data))
}

/// Files directly inside `dir` with the given extension, sorted by path. Symlinks to files are included.
pub fn files_with_extension(dir: &Path, extension: &str) -> io::Result<Vec<PathBuf>> {
    let mut files = regular_files(dir)?;
    files.retain(|path| path.extension().is_some_and(|ext| ext == extension));
    Ok(files)
}

/// Regular files directly inside `dir`, sorted by path.
/// Symlinks are followed. Links that don't resolve to a file are skipped with a warning.
pub fn regular_files(dir: &Path) -> io::Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for entry in fs::read_dir(dir)? {
        let entry = entry?;
        let file_type = entry.file_type()?;
        let path = entry.path();
        if file_type.is_file() || (file_type.is_symlink() && path.is_file()) {
            files.push(path);
        } else if file_type.is_symlink() && !path.exists() {
            log::warn!("Skipping broken link {}", path.display());
        }
    }
    files.sort();
    Ok(files)
}

/// Delete every file with the given extension directly inside `dir`. Returns how many were removed.
pub fn clear_folder(dir: &Path, extension: &str) -> anyhow::Result<usize> {
    let files = files_with_extension(dir, extension)
        .with_context(|| format!("Listing {}", dir.display()))?;
    for file in &files {
        fs::remove_file(file).with_context(|| format!("Removing {}", file.display()))?;
    }
    Ok(files.len())
}

/// Copy `from` to `to` keeping permissions and access/modification times.
/// Failing to carry over the timestamps is logged, not returned. The contents are what matter.
pub fn copy_preserving_times(from: &Path, to: &Path) -> anyhow::Result<()> {
    fs::copy(from, to)
        .with_context(|| format!("Copying {} to {}", from.display(), to.display()))?;
    if let Err(err) = copy_times(from, to) {
        log::warn!("Kept contents but not timestamps of {}: {err}", to.display());
    }
    Ok(())
}

fn copy_times(from: &Path, to: &Path) -> io::Result<()> {
    let metadata = fs::metadata(from)?;
    let mut times = FileTimes::new().set_modified(metadata.modified()?);
    if let Ok(accessed) = metadata.accessed() {
        times = times.set_accessed(accessed);
    }
    // Read only copies can't be opened for writing.
    File::options().write(true).open(to)?.set_times(times)
}

#[cfg(test)]
mod tests {
    use super::*;
    use hound::WavWriter;
    use std::time::{Duration, SystemTime};
    use tempfile::tempdir;

    fn write_int_wav(path: &Path, channels: u16, samples: &[i16]) {
        let spec = WavSpec {
            channels,
            sample_rate: 8000,
            bits_per_sample: 16,
            sample_format: SampleFormat::Int,
        };
        let mut writer = WavWriter::create(path, spec).unwrap();
        for &sample in samples {
            writer.write_sample(sample).unwrap();
        }
        writer.finalize().unwrap();
    }

    #[test]
    fn int_samples_are_normalized_and_downmixed() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("stereo.wav");
        write_int_wav(&path, 2, &[16384, 0, -32768, -32768, 0, 16384]);

        let (spec, data) = read_wav(&path).unwrap();
        assert_eq!(spec.sample_rate, 8000);
        assert_eq!(spec.channels, 2);
        assert_eq!(data, vec![0.25, -1.0, 0.25]);
    }

    #[test]
    fn float_samples_are_read_as_is() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("float.wav");
        let spec = WavSpec {
            channels: 1,
            sample_rate: 22050,
            bits_per_sample: 32,
            sample_format: SampleFormat::Float,
        };
        let mut writer = WavWriter::create(&path, spec).unwrap();
        for sample in [0.5f32, -0.25, 1.0] {
            writer.write_sample(sample).unwrap();
        }
        writer.finalize().unwrap();

        let (spec, data) = read_wav(&path).unwrap();
        assert_eq!(spec.sample_rate, 22050);
        assert_eq!(data, vec![0.5, -0.25, 1.0]);
    }

    #[test]
    fn empty_and_corrupt_files_are_errors() {
        let dir = tempdir().unwrap();
        let empty = dir.path().join("empty.wav");
        write_int_wav(&empty, 1, &[]);
        assert!(read_wav(&empty).is_err());

        let corrupt = dir.path().join("corrupt.wav");
        fs::write(&corrupt, b"definitely not a riff header").unwrap();
        let err = read_wav(&corrupt).unwrap_err();
        assert!(format!("{err}").contains("corrupt.wav"), "{err}");

        assert!(read_wav(&dir.path().join("missing.wav")).is_err());
    }

    #[test]
    fn listing_is_sorted_and_filtered() {
        let dir = tempdir().unwrap();
        for name in ["b.wav", "a.wav", "c.png", "d.WAV"] {
            fs::write(dir.path().join(name), b"").unwrap();
        }
        fs::create_dir(dir.path().join("e.wav")).unwrap();

        let wavs = files_with_extension(dir.path(), "wav").unwrap();
        assert_eq!(
            wavs,
            vec![dir.path().join("a.wav"), dir.path().join("b.wav")]
        );
        assert_eq!(regular_files(dir.path()).unwrap().len(), 4);

        assert_eq!(clear_folder(dir.path(), "wav").unwrap(), 2);
        assert!(files_with_extension(dir.path(), "wav").unwrap().is_empty());
        assert!(dir.path().join("c.png").exists());
        assert!(dir.path().join("e.wav").is_dir());
    }

    #[cfg(unix)]
    #[test]
    fn listing_follows_links_to_files() {
        use std::os::unix::fs::symlink;

        let dir = tempdir().unwrap();
        let target = dir.path().join("target.wav");
        fs::write(&target, b"RIFF").unwrap();
        fs::create_dir(dir.path().join("folder")).unwrap();
        symlink(&target, dir.path().join("linked.wav")).unwrap();
        symlink(dir.path().join("folder"), dir.path().join("folder_link.wav")).unwrap();
        symlink(dir.path().join("gone.wav"), dir.path().join("broken.wav")).unwrap();

        assert_eq!(
            files_with_extension(dir.path(), "wav").unwrap(),
            vec![dir.path().join("linked.wav"), target.clone()]
        );
        assert_eq!(regular_files(dir.path()).unwrap().len(), 2);

        // Clearing removes the link and leaves what it pointed to.
        let linked_dir = tempdir().unwrap();
        symlink(&target, linked_dir.path().join("linked.wav")).unwrap();
        assert_eq!(clear_folder(linked_dir.path(), "wav").unwrap(), 1);
        assert!(target.exists());
    }

    #[test]
    fn copy_keeps_contents_and_modification_time() {
        let dir = tempdir().unwrap();
        let from = dir.path().join("from.wav");
        let to = dir.path().join("to.wav");
        fs::write(&from, b"RIFF....").unwrap();
        let old = SystemTime::UNIX_EPOCH + Duration::from_secs(1_000_000_000);
        File::options()
            .write(true)
            .open(&from)
            .unwrap()
            .set_modified(old)
            .unwrap();

        copy_preserving_times(&from, &to).unwrap();
        assert_eq!(fs::read(&to).unwrap(), b"RIFF....");
        assert_eq!(fs::metadata(&to).unwrap().modified().unwrap(), old);
    }
}
