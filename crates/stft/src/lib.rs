//! Crate for finding the Short Time Fourier Transform of a real signal.

use derive_more::{Add, Div, Mul, Sub};
use fft::{window_fn::WindowFn, RealFft};
use std::{borrow::Cow, time::Duration};

/// Relating to frequency analysis ex. dtft and fft.
pub mod fft;

/// Conversion of magnitudes to a decibel scale.
pub mod db;

/// A window length. Wraps the number of samples with methods for converting to/from time.
#[derive(Copy, Clone, Default, Debug, PartialEq, Eq, PartialOrd, Ord, Add, Div, Mul, Sub)]
pub struct WindowLength {
    sample_num: usize,
}

impl WindowLength {
    /// [`WindowLength`] constructor.
    #[must_use]
    pub fn from_samples(sample_num: usize) -> Self {
        WindowLength { sample_num }
    }

    /// Getter for samples
    #[must_use]
    pub fn samples(&self) -> usize {
        self.sample_num
    }

    /// Converts samples to duration. Samples / (samples/sec)= secs
    /// # Arguments
    /// - `sample_rate`: the samples per second.
    #[must_use]
    pub fn duration(&self, sample_rate: f32) -> Duration {
        Duration::from_secs_f32(self.sample_num as f32 / sample_rate)
    }
}

/// `window*(time_samples/window)*(1/(time_sample/sec)) = sec`
#[must_use]
pub fn window_to_time(window_step: usize, window_idx: usize, sample_rate: f32) -> f32 {
    window_idx as f32 * window_step as f32 * (1.0 / sample_rate)
}

/// Calculates bin width of a dtft from the number of time samples.
/// Bin width is `Fs/N` where `Fs` is sampling frequency and `N` is samples.
#[must_use]
pub fn bin_width_from_time(sample_rate: f32, sample_cnt: usize) -> f32 {
    sample_rate / sample_cnt as f32
}

/// Converts a number of time samples to frequency samples.
/// N samples to (N/2)+1 samples.
#[must_use]
pub const fn time_samples_to_frequency(time_samples: usize) -> usize {
    (time_samples / 2) + 1
}

/// The information required to calculate a spectrograph.
#[derive(Debug)]
pub struct SpecCompute {
    data: Vec<f64>,            // Time domain data.
    window_len: WindowLength,  // The length of a window.
    window_step: WindowLength, // The step length (hop) between successive windows.
    window_fn: WindowFn,       // The window function to use.
    centered: bool,            // Whether window `i` is centered on sample `i * step` instead of starting there.
}

/// The calculated spectrograph.
#[derive(Debug, Clone, PartialEq)]
pub struct Stft {
    data: Vec<Vec<f64>>, // Vector of each frequency's individual time varying amplitude.
}

impl Stft {
    /// Get the transient analysis for the frequency bin that contains the indicated frequency if it exists.
    /// `window_len` is the number of time samples each window was computed from.
    #[must_use]
    pub fn get_bin(&self, frequency: f32, sample_rate: f32, window_len: usize) -> Option<&Vec<f64>> {
        let bin_width = bin_width_from_time(sample_rate, window_len);
        self.data
            .get((frequency / bin_width + 0.5).trunc() as usize)
    }

    /// Number of frequency bins.
    #[must_use]
    pub fn bin_cnt(&self) -> usize {
        self.data.len()
    }

    /// Number of windows of time.
    #[must_use]
    pub fn window_cnt(&self) -> usize {
        self.data.first().map_or(0, Vec::len)
    }

    /// Largest value over all bins and windows. `None` if there are no windows.
    #[must_use]
    pub fn max(&self) -> Option<f64> {
        self.data
            .iter()
            .flatten()
            .copied()
            .reduce(f64::max)
    }

    /// Calculates the power of the signal per time.
    #[must_use]
    pub fn power(&self) -> Vec<f64> {
        (0..self.window_cnt())
            .map(|time| {
                self.data
                    .iter()
                    .enumerate()
                    .map(|(f, transient)| {
                        // Spectral density is |X(w)|^2 by Parseval's theorem.
                        let power = transient[time] * transient[time];
                        // All powers of a real valued signal are split between the positive and negative except 0 and max frequency.
                        // Double these values to preserve the power since negative frequencies are ignored.
                        if f != 0 && f != self.data.len() - 1 {
                            power * 2.0
                        } else {
                            power
                        }
                    })
                    .sum()
            })
            .collect()
    }

    /// Getter for frequency analysis data.
    /// Outer vec is each frequency from 0 hz to Nyquist. Inner vec is each value per window step.
    #[must_use]
    pub fn data(&self) -> &Vec<Vec<f64>> {
        &self.data
    }
}

impl SpecCompute {
    /// Basic constructor. Windows start at sample `i * window_step` until set otherwise by [`SpecCompute::centered`].
    /// A step longer than the window skips the samples in between.
    /// # Panics
    /// If either length is zero.
    pub fn new(
        data: Vec<f64>,
        window_len: WindowLength,
        window_step: WindowLength,
        window_fn: WindowFn,
    ) -> Self {
        assert!(window_len.samples() > 0, "Window must contain samples.");
        assert!(window_step.samples() > 0, "Step length must be positive.");
        SpecCompute {
            data,
            window_len,
            window_step,
            window_fn,
            centered: false,
        }
    }

    /// Pad the signal with `window_len / 2` zeros on both sides so window `i` is centered on sample `i * window_step`.
    #[must_use]
    pub fn centered(mut self, centered: bool) -> Self {
        self.centered = centered;
        self
    }

    /// The signal the windows are taken from, including padding.
    fn framed_data(&self) -> Cow<'_, [f64]> {
        if self.centered {
            let pad = self.window_len.samples() / 2;
            let mut padded = Vec::with_capacity(self.data.len() + 2 * pad);
            padded.resize(pad, 0.0);
            padded.extend_from_slice(&self.data);
            padded.resize(padded.len() + pad, 0.0);
            Cow::Owned(padded)
        } else {
            Cow::Borrowed(&self.data)
        }
    }

    /// Number of windows [`SpecCompute::stft`] will produce.
    #[must_use]
    pub fn window_cnt(&self) -> usize {
        let pad = if self.centered {
            2 * (self.window_len.samples() / 2)
        } else {
            0
        };
        let framed_len = self.data.len() + pad;
        framed_len
            .checked_sub(self.window_len.samples())
            .map_or(0, |extra| extra / self.window_step.samples() + 1)
    }

    /// Calculates the power of the signal per time.
    #[must_use]
    pub fn power(&self) -> Vec<f64> {
        self.data.iter().map(|x| x * x).collect()
    }

    /// Returns the time varying frequency analysis of frequencies.
    /// Outer vec is each frequency. Inner vec is each value per window step.
    pub fn stft(&self) -> anyhow::Result<Stft> {
        let window_cnt = self.window_cnt();
        // Given 2n time samples get n+1 frequency samples.
        let mut result =
            vec![Vec::with_capacity(window_cnt); time_samples_to_frequency(self.window_len.samples())];
        let mut fft = RealFft::new(self.window_len.samples());
        let mut window_of_data = vec![0.0; self.window_len.samples()];
        let framed = self.framed_data();

        // For the shifting window.
        for window in framed
            // Take a window of samples at a time.
            .windows(self.window_len.samples())
            // Step by the window step.
            .step_by(self.window_step.samples())
        {
            // Apply windowing function.
            window_of_data.copy_from_slice(window);
            fft::window_fn::apply_window(&mut window_of_data, self.window_fn);

            // Take the fourier transform of the window.
            let freq_data = fft.magnitudes(&mut window_of_data)?;

            // Add the analysis to the results.
            for (bin_idx, bin_value) in freq_data.into_iter().enumerate() {
                result[bin_idx].push(bin_value);
            }
        }
        log::trace!(
            "Computed {window_cnt} windows of {} samples from {} samples",
            self.window_len.samples(),
            self.data.len()
        );

        Ok(Stft { data: result })
    }

    /// Getter for time data
    #[must_use]
    pub fn data(&self) -> &Vec<f64> {
        &self.data
    }
}
