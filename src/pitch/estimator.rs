// Frequency estimator boundary
// The actual pitch detection algorithm lives outside this crate; the core
// only consumes one estimate per analysis window

/// Analysis window size in samples, fixed for a whole session.
///
/// Power of two so FFT-based estimators can consume the window directly.
pub const ANALYSIS_WINDOW_SIZE: usize = 2048;

/// A fundamental-frequency estimator over fixed-size sample windows.
///
/// Implementations are handed one window per analysis frame and return the
/// estimated fundamental in Hz, or `None` for an unvoiced window. Estimators
/// may keep internal state (smoothing, octave correction), hence `&mut self`.
pub trait PitchEstimator {
    fn estimate(&mut self, samples: &[f32], sample_rate_hz: u32) -> Option<f64>;
}

/// Blanket impl so closures can stand in for an estimator in tests and demos
impl<F> PitchEstimator for F
where
    F: FnMut(&[f32], u32) -> Option<f64>,
{
    fn estimate(&mut self, samples: &[f32], sample_rate_hz: u32) -> Option<f64> {
        self(samples, sample_rate_hz)
    }
}
