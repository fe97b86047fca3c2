use crate::constants::{AUDIO_DIR, IMAGE_EXTENSION, RAW_AUDIO_DIR, SPECTROGRAM_DIR};
use std::path::{Path, PathBuf};

/// Where the raw recordings, the categorized audio and the spectrograms live.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Layout {
    pub raw_dir: PathBuf,
    pub audio_root: PathBuf,
    pub image_root: PathBuf,
}

impl Layout {
    /// The standard dataset layout below `root`:
    /// `raw_audios/`, `assets/audio/<category>/` and `assets/img/spectrograms/<category>/`.
    #[must_use]
    pub fn from_root(root: &Path) -> Self {
        Layout {
            raw_dir: root.join(RAW_AUDIO_DIR),
            audio_root: AUDIO_DIR.iter().fold(root.to_path_buf(), |p, d| p.join(d)),
            image_root: SPECTROGRAM_DIR
                .iter()
                .fold(root.to_path_buf(), |p, d| p.join(d)),
        }
    }

    #[must_use]
    pub fn audio_dir(&self, category: &str) -> PathBuf {
        self.audio_root.join(category)
    }

    #[must_use]
    pub fn image_dir(&self, category: &str) -> PathBuf {
        self.image_root.join(category)
    }

    /// The spectrogram path mirroring an audio file of `category`.
    #[must_use]
    pub fn image_for(&self, category: &str, audio: &Path) -> PathBuf {
        let mut name = PathBuf::from(audio.file_name().unwrap_or_default());
        name.set_extension(IMAGE_EXTENSION);
        self.image_dir(category).join(name)
    }

    /// Where a raw recording named `file_name` is copied for `category`.
    #[must_use]
    pub fn audio_destination(&self, category: &str, file_name: &str) -> PathBuf {
        self.audio_dir(category).join(file_name)
    }
}
