use num_complex::Complex;
use std::f64::consts::PI;

/// Numerically controlled oscillator.
///
/// Emits one unit-magnitude complex phasor per call, advancing the phase
/// by `2π f / fs` each sample. The accumulator is kept in `[0, 2π)` so
/// long captures don't lose phase resolution.
#[derive(Debug, Clone)]
pub struct Nco {
    phase: f64,
    phase_inc: f64,
}

impl Nco {
    pub fn new(freq_hz: f64, sample_rate: f64) -> Self {
        Self {
            phase: 0.0,
            phase_inc: 2.0 * PI * freq_hz / sample_rate,
        }
    }

    pub fn next(&mut self) -> Complex<f32> {
        let (sin, cos) = self.phase.sin_cos();
        self.phase += self.phase_inc;
        if self.phase >= 2.0 * PI {
            self.phase -= 2.0 * PI;
        }
        Complex::new(cos as f32, sin as f32)
    }

    pub fn reset(&mut self) {
        self.phase = 0.0;
    }
}
