//! The precomputed paired recording the scope plays back.

use serde::Deserialize;

use crate::error::{Error, Result};

/// Which of the two recorded traces.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Channel {
    A,
    B,
}

impl Channel {
    pub const ALL: [Channel; 2] = [Channel::A, Channel::B];
}

/// Paired waveform loaded once per page view and never mutated afterwards.
///
/// Sample `i` of both channels was recorded at the same instant; one index
/// step covers `ms_per_pair` milliseconds.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct WaveformDataset {
    #[serde(rename = "v1")]
    pub channel_a: Vec<f64>,
    #[serde(rename = "v2")]
    pub channel_b: Vec<f64>,
    #[serde(rename = "y_min")]
    pub value_min: f64,
    #[serde(rename = "y_max")]
    pub value_max: f64,
    #[serde(rename = "ms_per_pair")]
    pub ms_per_sample_pair: f64,
}

impl WaveformDataset {
    /// Parses the `{ v1, v2, y_min, y_max, ms_per_pair }` asset and checks
    /// that it can be played back.
    pub fn from_json(text: &str) -> Result<Self> {
        let dataset: Self = serde_json::from_str(text)?;
        dataset.validate()?;
        Ok(dataset)
    }

    /// Empty channels pass; they simply draw nothing.
    pub fn validate(&self) -> Result<()> {
        if self.channel_a.len() != self.channel_b.len() {
            return Err(Error::ChannelLengthMismatch {
                a: self.channel_a.len(),
                b: self.channel_b.len(),
            });
        }
        if !(self.value_min.is_finite() && self.value_max.is_finite())
            || self.value_max <= self.value_min
        {
            return Err(Error::InvalidRange {
                min: self.value_min,
                max: self.value_max,
            });
        }
        if !self.ms_per_sample_pair.is_finite() || self.ms_per_sample_pair <= 0.0 {
            return Err(Error::InvalidPairInterval(self.ms_per_sample_pair));
        }
        Ok(())
    }

    /// Number of aligned sample indices.
    pub fn total_len(&self) -> usize {
        self.channel_a.len()
    }

    pub fn samples(&self, channel: Channel) -> &[f64] {
        match channel {
            Channel::A => &self.channel_a,
            Channel::B => &self.channel_b,
        }
    }
}
