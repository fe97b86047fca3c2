/// Arguments for the binaries.
/// This is compartmentalized to a module because the binaries all have almost the exact same argument requirements.
pub mod args;

/// Main logic of each binary.
pub mod binary_logic;

/// Sorting raw recordings into categories by file name.
pub mod classify;

/// Fixed settings of the dataset.
pub mod constants;

/// Simple helper functions for reading, listing and copying files.
pub mod file_io;

/// Spectrogram generation for every categorized audio file.
pub mod generate;

/// Paths of the dataset's folders.
pub mod layout;

/// Plotting functionality.
pub mod plotting;

/// Re-sorting raw recordings and regenerating their spectrograms.
pub mod refresh;
