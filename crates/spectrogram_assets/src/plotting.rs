use crate::constants::LABEL_FONT_CANDIDATES;
use anyhow::Context;
use image::{imageops, ImageFormat, RgbImage};
use log::{debug, warn};
use plotters::{
    prelude::*,
    style::{register_font, FontStyle},
};
use std::{
    fs,
    path::{Path, PathBuf},
    sync::OnceLock,
};
use stft::{bin_width_from_time, window_to_time, Stft};

/// Font family the axis labels are drawn with.
const LABEL_FAMILY: &str = "sans-serif";

static LABEL_FONT: OnceLock<Option<PathBuf>> = OnceLock::new();

/// Register the font used for axis labels. Only the first call per process does any work.
/// `explicit` is tried before the usual system font locations.
/// Returns the registered font file, or `None` if labels can't be drawn.
pub fn label_font(explicit: Option<&Path>) -> Option<&'static Path> {
    LABEL_FONT
        .get_or_init(|| {
            let candidates = explicit
                .into_iter()
                .map(Path::to_path_buf)
                .chain(LABEL_FONT_CANDIDATES.iter().map(PathBuf::from));
            for candidate in candidates {
                let Ok(bytes) = fs::read(&candidate) else {
                    continue;
                };
                // Fonts are registered for the life of the process.
                let bytes: &'static [u8] = Box::leak(bytes.into_boxed_slice());
                match register_font(LABEL_FAMILY, FontStyle::Normal, bytes) {
                    Ok(()) => {
                        debug!("Drawing axis labels with {}", candidate.display());
                        return Some(candidate);
                    }
                    Err(_) => warn!("{} is not a usable font", candidate.display()),
                }
            }
            warn!("No font found for axis labels.");
            None
        })
        .as_deref()
}

/// What a spectrogram is drawn from.
#[derive(Debug, Clone, Copy)]
pub struct SpectrogramPlot<'a> {
    /// Decibel values. Outer vec is each frequency bin from 0 hz to Nyquist.
    pub db: &'a Stft,
    pub sample_rate: f32,
    /// Time samples per analysis window.
    pub window_len: usize,
    /// Time samples between the start of successive windows.
    pub window_step: usize,
}

/// Magma-like perceptual colormap from dark (quiet) to light (loud).
const COLORMAP: [(u8, u8, u8); 9] = [
    (0, 0, 4),
    (28, 16, 68),
    (79, 18, 123),
    (129, 37, 129),
    (181, 54, 122),
    (229, 80, 100),
    (251, 135, 97),
    (254, 194, 135),
    (252, 253, 191),
];

/// Map `value` in `min..=max` onto [`COLORMAP`].
fn colormap(value: f64, min: f64, max: f64) -> RGBColor {
    let normalized = if max > min {
        ((value - min) / (max - min)).clamp(0.0, 1.0)
    } else {
        1.0
    };
    let position = normalized * (COLORMAP.len() - 1) as f64;
    let lower = (position.floor() as usize).min(COLORMAP.len() - 2);
    let fraction = position - lower as f64;
    let lerp = |a: u8, b: u8| (f64::from(a) + (f64::from(b) - f64::from(a)) * fraction).round() as u8;
    let (a, b) = (COLORMAP[lower], COLORMAP[lower + 1]);
    RGBColor(lerp(a.0, b.0), lerp(a.1, b.1), lerp(a.2, b.2))
}

/// Draw a spectrogram with time on the x axis and linear frequency on the y axis.
/// Axis labels are only drawn when `labels` is set. See [`label_font`].
pub fn render_spectrogram(
    plot: SpectrogramPlot<'_>,
    size: (u32, u32),
    labels: bool,
) -> anyhow::Result<RgbImage> {
    let data = plot.db.data();
    let window_cnt = plot.db.window_cnt();
    anyhow::ensure!(window_cnt > 0, "Nothing to plot");

    // Find max and min of data
    let mut max = f64::NEG_INFINITY;
    let mut min = f64::INFINITY;
    for datapoint in data.iter().flatten() {
        max = datapoint.max(max);
        min = datapoint.min(min);
    }
    debug!("Max of plot is {max}");
    debug!("Min of plot is {min}");

    let nyquist = f64::from(plot.sample_rate) / 2.0;
    let bin_width = f64::from(bin_width_from_time(plot.sample_rate, plot.window_len));
    let step_time = f64::from(plot.window_step as f32 / plot.sample_rate);
    let duration = f64::from(window_to_time(
        plot.window_step,
        window_cnt,
        plot.sample_rate,
    ));

    let (width, height) = size;
    let mut buffer = vec![0u8; width as usize * height as usize * 3];
    {
        // setup graph
        let root = BitMapBackend::with_buffer(&mut buffer, size).into_drawing_area();
        root.fill(&WHITE)?;
        let mut chart = ChartBuilder::on(&root)
            .margin(5)
            .x_label_area_size(if labels { 40 } else { 0 })
            .y_label_area_size(if labels { 60 } else { 0 })
            .build_cartesian_2d(0f64..duration, 0f64..nyquist)?;

        // draw the tickmarks and axis descriptions
        if labels {
            chart
                .configure_mesh()
                .disable_mesh()
                .y_label_style((LABEL_FAMILY, 12).into_font())
                .x_label_style((LABEL_FAMILY, 12).into_font())
                .axis_desc_style((LABEL_FAMILY, 14).into_font())
                .x_label_formatter(&|t: &f64| format!("{t:.1}"))
                .y_label_formatter(&|f: &f64| format!("{f:.0}"))
                .x_desc("Time (s)")
                .y_desc("Frequency (Hz)")
                .draw()?;
        }

        // One cell per window and frequency bin. Bins are centered on their frequency.
        chart.draw_series(data.iter().enumerate().flat_map(|(bin, transient)| {
            let low = ((bin as f64 - 0.5) * bin_width).max(0.0);
            let high = ((bin as f64 + 0.5) * bin_width).min(nyquist);
            transient.iter().enumerate().map(move |(window, &value)| {
                let start = window as f64 * step_time;
                Rectangle::new(
                    [(start, low), (start + step_time, high)],
                    colormap(value, min, max).filled(),
                )
            })
        }))?;

        root.present()?;
    }

    RgbImage::from_raw(width, height, buffer).context("Plot buffer does not match image size")
}

/// Crop the white border around everything drawn, keeping `padding` pixels of it on each side.
#[must_use]
pub fn crop_to_content(image: &RgbImage, padding: u32) -> RgbImage {
    let mut bounds: Option<(u32, u32, u32, u32)> = None;
    for (x, y, pixel) in image.enumerate_pixels() {
        if pixel.0 == [255, 255, 255] {
            continue;
        }
        bounds = Some(match bounds {
            None => (x, y, x, y),
            Some((x0, y0, x1, y1)) => (x0.min(x), y0.min(y), x1.max(x), y1.max(y)),
        });
    }

    match bounds {
        None => image.clone(),
        Some((x0, y0, x1, y1)) => {
            let x0 = x0.saturating_sub(padding);
            let y0 = y0.saturating_sub(padding);
            let x1 = x1.saturating_add(padding).min(image.width() - 1);
            let y1 = y1.saturating_add(padding).min(image.height() - 1);
            imageops::crop_imm(image, x0, y0, x1 - x0 + 1, y1 - y0 + 1).to_image()
        }
    }
}

/// Plot a spectrogram, trim the whitespace around it and save it as a png, overwriting `file_out`.
pub fn plot_spectrogram(
    plot: SpectrogramPlot<'_>,
    size: (u32, u32),
    padding: u32,
    labels: bool,
    file_out: &Path,
) -> anyhow::Result<()> {
    let image = render_spectrogram(plot, size, labels)?;
    let image = crop_to_content(&image, padding);
    image
        .save_with_format(file_out, ImageFormat::Png)
        .with_context(|| format!("Saving {}", file_out.display()))
}
