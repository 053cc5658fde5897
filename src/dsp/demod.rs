use num_complex::Complex;

/// Differential demodulator with a lag-aligned output stage.
///
/// Each narrow-band sample is multiplied by the conjugate of its
/// predecessor, which cancels the constant carrier phase, and held in a
/// ring the same length as the energy window. The phase that reaches the
/// output therefore belongs to the sample the detection statistic was
/// integrated over.
pub struct DifferentialDemod {
    prev: Complex<f32>,
    lag: Vec<Complex<f32>>,
    cursor: usize,
}

impl DifferentialDemod {
    pub fn new(len: usize) -> Self {
        Self {
            prev: Complex::new(0.0, 0.0),
            lag: vec![Complex::new(0.0, 0.0); len],
            cursor: 0,
        }
    }

    /// Store this sample's phase difference and compose the output
    /// sample from the entry written `len` samples ago: `1 + i·phase`
    /// while the detector reports valid data, `0` otherwise.
    pub fn compose(&mut self, demod: Complex<f32>, valid: bool) -> Complex<f32> {
        self.lag[self.cursor] = demod * self.prev.conj();
        self.prev = demod;

        self.cursor += 1;
        if self.cursor == self.lag.len() {
            self.cursor = 0;
        }

        // After the advance the cursor designates the oldest slot.
        if valid {
            Complex::new(1.0, self.lag[self.cursor].arg())
        } else {
            Complex::new(0.0, 0.0)
        }
    }
}
