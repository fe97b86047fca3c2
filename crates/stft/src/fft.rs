use realfft::{num_complex::Complex, RealFftPlanner, RealToComplex};
use std::{fmt, sync::Arc};

/// A forward real fft planned once for a fixed length and reused for every window of a signal.
pub struct RealFft {
    r2c: Arc<dyn RealToComplex<f64>>,
    spectrum: Vec<Complex<f64>>,
    scratch: Vec<Complex<f64>>,
}

impl fmt::Debug for RealFft {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RealFft")
            .field("len", &self.len())
            .finish_non_exhaustive()
    }
}

impl RealFft {
    /// Plan a transform of `len` time samples.
    #[must_use]
    pub fn new(len: usize) -> Self {
        let mut real_planner = RealFftPlanner::<f64>::new();
        let r2c = real_planner.plan_fft_forward(len);
        // `spectrum.len() == length / 2 + 1`
        let spectrum = r2c.make_output_vec();
        let scratch = r2c.make_scratch_vec();
        RealFft {
            r2c,
            spectrum,
            scratch,
        }
    }

    /// Number of time samples the transform was planned for.
    #[must_use]
    pub fn len(&self) -> usize {
        self.r2c.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Take the unnormalized fft of `input` and return the magnitude of each bin from 0 hz to Nyquist.
    /// `input` is used as scratch space by the transform and holds garbage afterwards.
    pub fn magnitudes(&mut self, input: &mut [f64]) -> anyhow::Result<Vec<f64>> {
        self.r2c
            .process_with_scratch(input, &mut self.spectrum, &mut self.scratch)?;
        Ok(self.spectrum.iter().map(|v| v.norm()).collect())
    }
}

/// Take unnormalized fft and return magnitudes.
/// Plans a new transform on every call. Use [`RealFft`] when transforming many windows of the same length.
pub fn fft(mut data: Vec<f64>) -> anyhow::Result<Vec<f64>> {
    RealFft::new(data.len()).magnitudes(&mut data)
}

/// Windowing functions useful for dtft analysis. See <https://en.wikipedia.org/wiki/Window_function> for details.
pub mod window_fn {
    pub type WindowFloat = f64;
    pub type WindowFn = fn(usize, usize) -> WindowFloat;
    use std::f64::consts::PI;

    /// Applies the given window function to the input data.
    pub fn apply_window(data: &mut [WindowFloat], window: WindowFn) {
        let data_len = data.len();
        for (i, elem) in data.iter_mut().enumerate() {
            *elem *= window(i, data_len);
        }
    }

    pub const fn rectangular(_n: usize, _samples: usize) -> WindowFloat {
        1.0
    }

    /// Symmetric hann window. Both endpoints are zero.
    pub fn hann(n: usize, samples: usize) -> WindowFloat {
        const A0: WindowFloat = 0.5;
        A0 * (1.0
            - WindowFloat::cos((2.0 * PI * n as WindowFloat) / (samples as WindowFloat - 1.0)))
    }

    /// Periodic hann window. Only the first sample is zero so overlapping windows at a quarter step sum to a constant.
    /// This is the variant used for spectral analysis.
    pub fn hann_periodic(n: usize, samples: usize) -> WindowFloat {
        const A0: WindowFloat = 0.5;
        A0 * (1.0 - WindowFloat::cos((2.0 * PI * n as WindowFloat) / samples as WindowFloat))
    }
}
