//! Time to sample-window to screen mapping.
//!
//! Everything here is pure: the same elapsed time, dataset and geometry always
//! produce the same polyline. The dataset is treated as cyclic, so the window
//! wraps modulo the buffer length and playback loops forever without a seam.

use crate::config::Band;
use crate::dataset::WaveformDataset;

/// Channels advanced per sample-pair step.
///
/// Baked into the asset format rather than derived from the dataset.
pub const CHANNELS_PER_PAIR: f64 = 2.0;

/// Vertical headroom added above and below the value range, as a fraction
/// of that range.
pub const VALUE_PADDING: f64 = 0.05;

/// Sample indices per millisecond of recording.
pub fn points_per_ms(ms_per_sample_pair: f64) -> f64 {
    CHANNELS_PER_PAIR / ms_per_sample_pair
}

/// Upper bound on points stroked per channel per frame.
pub const MAX_WINDOW_POINTS: usize = 1 << 18;

/// Number of sample indices visible at once, at most [`MAX_WINDOW_POINTS`].
/// Zero for unusable inputs.
pub fn window_points(window_seconds: f64, points_per_ms: f64) -> usize {
    let v = (window_seconds * 1000.0 * points_per_ms).floor();
    if v.is_finite() && v > 0.0 {
        v.min(MAX_WINDOW_POINTS as f64) as usize
    } else {
        0
    }
}

/// Starting sample index for a frame, always in `[0, total_len)`.
///
/// Returns 0 for an empty buffer.
pub fn scroll_points(
    elapsed_seconds: f64,
    playback_speed: f64,
    points_per_ms: f64,
    total_len: usize,
) -> usize {
    if total_len == 0 {
        return 0;
    }
    let advanced = (elapsed_seconds * 1000.0 * playback_speed * points_per_ms).floor();
    if !advanced.is_finite() || advanced <= 0.0 {
        return 0;
    }
    // Wrap before the cast; usize is 32 bits on wasm32.
    (advanced % total_len as f64) as usize
}

/// The visible, circularly wrapped slice of the recording for one frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SampleWindow {
    pub start: usize,
    pub len: usize,
    pub total_len: usize,
}

impl SampleWindow {
    pub fn at(
        elapsed_seconds: f64,
        dataset: &WaveformDataset,
        playback_speed: f64,
        window_seconds: f64,
    ) -> Self {
        let ppm = points_per_ms(dataset.ms_per_sample_pair);
        let total_len = dataset.total_len();
        let len = if total_len == 0 { 0 } else { window_points(window_seconds, ppm) };
        Self {
            start: scroll_points(elapsed_seconds, playback_speed, ppm, total_len),
            len,
            total_len,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0 || self.total_len == 0
    }

    /// Dataset indices from oldest to newest, wrapping at the buffer end.
    pub fn indices(&self) -> impl Iterator<Item = usize> + '_ {
        let len = if self.total_len == 0 { 0 } else { self.len };
        (0..len).map(move |i| (self.start + i) % self.total_len)
    }
}

/// Linear map from the padded value range onto `[y_top, y_bottom]`, with
/// larger values landing higher on screen.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ValueScale {
    lo: f64,
    hi: f64,
    y_top: f64,
    y_bottom: f64,
}

impl ValueScale {
    pub fn new(value_min: f64, value_max: f64, y_top: f64, y_bottom: f64) -> Self {
        let pad = (value_max - value_min) * VALUE_PADDING;
        Self {
            lo: value_min - pad,
            hi: value_max + pad,
            y_top,
            y_bottom,
        }
    }

    pub fn map(&self, value: f64) -> f64 {
        self.y_top + (self.y_bottom - self.y_top) * (1.0 - (value - self.lo) / (self.hi - self.lo))
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

/// Screen-space points for one channel over `window`, oldest first.
///
/// Points are spaced uniformly across `width` starting at x = 0. Yields
/// nothing when the window is empty or `samples` does not match it.
pub fn trace_points<'a>(
    samples: &'a [f64],
    window: &'a SampleWindow,
    width: f64,
    scale: ValueScale,
) -> impl Iterator<Item = Point> + 'a {
    let usable = !window.is_empty() && samples.len() == window.total_len;
    let n = window.len as f64;
    window
        .indices()
        .take(if usable { window.len } else { 0 })
        .enumerate()
        .map(move |(i, idx)| Point {
            x: (i as f64 / n) * width,
            y: scale.map(samples[idx]),
        })
}

/// [`trace_points`] collected into a polyline.
pub fn trace(
    samples: &[f64],
    window: &SampleWindow,
    width: f64,
    scale: &ValueScale,
) -> Vec<Point> {
    trace_points(samples, window, width, *scale).collect()
}

/// Convenience wrapper resolving `band` against `height` and the dataset's
/// value range.
pub fn channel_trace(
    samples: &[f64],
    dataset: &WaveformDataset,
    window: &SampleWindow,
    band: Band,
    width: f64,
    height: f64,
) -> Vec<Point> {
    let (y_top, y_bottom) = band.resolve(height);
    let scale = ValueScale::new(dataset.value_min, dataset.value_max, y_top, y_bottom);
    trace(samples, window, width, &scale)
}
