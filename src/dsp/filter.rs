use anyhow::{anyhow, Result};
use biquad::{Biquad, Coefficients, DirectForm1, ToHertz, Type};
use num_complex::Complex;
use std::f32::consts::PI;

pub fn make_coefficients(
    f_type: Type<f32>,
    fs: f32,
    freq: f32,
    q: f32,
) -> Result<Coefficients<f32>> {
    Coefficients::<f32>::from_params(f_type, fs.hz(), freq.hz(), q)
        .map_err(|_| anyhow!("Failed to create filter coefficients"))
}

/// One second-order section applied to I and Q independently.
struct Section {
    re: DirectForm1<f32>,
    im: DirectForm1<f32>,
}

impl Section {
    fn new(coeffs: Coefficients<f32>) -> Self {
        Self {
            re: DirectForm1::<f32>::new(coeffs),
            im: DirectForm1::<f32>::new(coeffs),
        }
    }

    fn run(&mut self, x: Complex<f32>) -> Complex<f32> {
        Complex::new(self.re.run(x.re), self.im.run(x.im))
    }

    fn reset_state(&mut self) {
        self.re.reset_state();
        self.im.reset_state();
    }
}

/// Causal low-pass filter for complex baseband samples: a Butterworth
/// cascade of biquad sections, one sample in, one sample out.
///
/// Odd orders get a single-pole section; each conjugate pole pair becomes
/// a biquad with Q = 1 / (2 cos(π(2k+1)/2N)).
pub struct CascadedLowPass {
    sections: Vec<Section>,
}

impl CascadedLowPass {
    pub fn new(order: u32, sample_rate: f32, cutoff: f32) -> Result<Self> {
        if order == 0 {
            return Err(anyhow!("Filter order must be at least 1"));
        }

        let mut sections = Vec::with_capacity((order as usize + 1) / 2);

        if order % 2 == 1 {
            let coeffs = make_coefficients(Type::SinglePoleLowPass, sample_rate, cutoff, 0.5)?;
            sections.push(Section::new(coeffs));
        }

        for k in 0..order / 2 {
            let q = 1.0 / (2.0 * (PI * (2 * k + 1) as f32 / (2 * order) as f32).cos());
            let coeffs = make_coefficients(Type::LowPass, sample_rate, cutoff, q)?;
            sections.push(Section::new(coeffs));
        }

        Ok(Self { sections })
    }

    pub fn run(&mut self, x: Complex<f32>) -> Complex<f32> {
        self.sections.iter_mut().fold(x, |y, s| s.run(y))
    }

    pub fn reset(&mut self) {
        for s in &mut self.sections {
            s.reset_state();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dc_passes() {
        let mut lpf = CascadedLowPass::new(5, 8000.0, 300.0).unwrap();
        let x = Complex::new(1.0, 0.5);
        let mut y = Complex::new(0.0, 0.0);
        for _ in 0..4000 {
            y = lpf.run(x);
        }
        assert!((y - x).norm() < 1e-2, "DC output: {}", y);
    }

    #[test]
    fn test_nyquist_rejected() {
        let mut lpf = CascadedLowPass::new(4, 8000.0, 50.0).unwrap();
        let mut y = Complex::new(0.0, 0.0);
        for n in 0..4000 {
            let x = if n % 2 == 0 { 1.0 } else { -1.0 };
            y = lpf.run(Complex::new(x, 0.0));
        }
        assert!(y.norm() < 1e-3, "Nyquist output: {}", y);
    }

    #[test]
    fn test_even_and_odd_orders() {
        for order in 1..=6 {
            assert!(CascadedLowPass::new(order, 8000.0, 300.0).is_ok());
        }
        assert!(CascadedLowPass::new(0, 8000.0, 300.0).is_err());
    }

    #[test]
    fn test_cutoff_beyond_nyquist_rejected() {
        assert!(CascadedLowPass::new(5, 8000.0, 5000.0).is_err());
    }

    #[test]
    fn test_reset_clears_state() {
        let mut lpf = CascadedLowPass::new(4, 8000.0, 300.0).unwrap();
        let first = lpf.run(Complex::new(1.0, -1.0));
        for _ in 0..100 {
            lpf.run(Complex::new(1.0, -1.0));
        }
        lpf.reset();
        assert_eq!(lpf.run(Complex::new(1.0, -1.0)), first);
    }
}
