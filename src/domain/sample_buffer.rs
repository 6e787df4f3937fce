/// Sample rate every engine in this service consumes.
pub const TARGET_SAMPLE_RATE: u32 = 16_000;

/// Decoded mono PCM in `[-1.0, 1.0]`.
#[derive(Debug, Clone, PartialEq)]
pub struct SampleBuffer {
    pub samples: Vec<f32>,
    pub sample_rate: u32,
}

impl SampleBuffer {
    pub fn new(samples: Vec<f32>, sample_rate: u32) -> Self {
        Self {
            samples,
            sample_rate,
        }
    }

    pub fn duration_secs(&self) -> f64 {
        if self.sample_rate == 0 {
            return 0.0;
        }
        self.samples.len() as f64 / self.sample_rate as f64
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Samples between two timestamps, clamped to the buffer.
    pub fn slice_secs(&self, start: f64, end: f64) -> &[f32] {
        let rate = self.sample_rate as f64;
        let len = self.samples.len();
        let from = ((start.max(0.0) * rate) as usize).min(len);
        let to = ((end.max(0.0) * rate).ceil() as usize).clamp(from, len);
        &self.samples[from..to]
    }
}
