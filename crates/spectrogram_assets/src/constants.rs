// Analysis settings shared by every spectrogram of the dataset.
pub const N_FFT: usize = 512;
pub const HOP_LENGTH: usize = 128;
pub const TOP_DB: f64 = 80.0;

// Figure is 6 x 3.5 inches saved at 100 dots per inch.
pub const DPI: u32 = 100;
pub const FIGURE_SIZE: (u32, u32) = (6 * DPI, 7 * DPI / 2);
/// Whitespace kept around the drawn content after cropping. 0.1 inch.
pub const CROP_PADDING: u32 = DPI / 10;

// Directory layout relative to the dataset root.
pub const RAW_AUDIO_DIR: &str = "raw_audios";
pub const AUDIO_DIR: [&str; 2] = ["assets", "audio"];
pub const SPECTROGRAM_DIR: [&str; 3] = ["assets", "img", "spectrograms"];

pub const AUDIO_EXTENSION: &str = "wav";
pub const IMAGE_EXTENSION: &str = "png";

/// Every category folder spectrograms are generated for, in processing order.
pub const AUDIO_CATEGORIES: [&str; 6] = [
    "noisy",
    "reverb",
    "bandlimit",
    "noisy_reverb",
    "noisy_reverb_bandlimit",
    "noisy_bandlimit",
];

/// Filename patterns of raw recordings and the category each is sorted into, in priority order.
/// `noise_reverb_limit_*` must come before `noise_reverb_*` which also matches it.
/// Single degradation recordings are not refreshed from the raw folder.
pub const COPY_RULES: [(&str, &str); 3] = [
    ("noise_reverb_limit_*.wav", "noisy_reverb_bandlimit"),
    ("noise_reverb_*.wav", "noisy_reverb"),
    ("noise_limit_*.wav", "noisy_bandlimit"),
];

/// Fonts tried for axis labels when none is given on the command line.
pub const LABEL_FONT_CANDIDATES: &[&str] = &[
    "/usr/share/fonts/truetype/dejavu/DejaVuSans.ttf",
    "/usr/share/fonts/dejavu/DejaVuSans.ttf",
    "/usr/share/fonts/TTF/DejaVuSans.ttf",
    "/usr/share/fonts/dejavu-sans-fonts/DejaVuSans.ttf",
    "/usr/share/fonts/truetype/liberation/LiberationSans-Regular.ttf",
    "/usr/share/fonts/liberation-sans/LiberationSans-Regular.ttf",
    "/usr/share/fonts/noto/NotoSans-Regular.ttf",
    "/usr/share/fonts/truetype/noto/NotoSans-Regular.ttf",
    "/System/Library/Fonts/Supplemental/Arial.ttf",
    "/Library/Fonts/Arial.ttf",
    "C:\\Windows\\Fonts\\arial.ttf",
];
