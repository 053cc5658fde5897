use num_complex::Complex;

use super::filter::CascadedLowPass;
use super::nco::Nco;

/// Dual-bandwidth power tracker.
///
/// Down-converts each sample by the local oscillator, then runs it
/// through the wide filter (noise estimate) and the narrow filter
/// (signal estimate). Both powers are first-order exponential moving
/// averages with the same smoothing factor.
pub struct PowerEstimator {
    lo: Nco,
    wide: CascadedLowPass,
    narrow: CascadedLowPass,
    alpha: f32,
    noise_power: f32,
    signal_power: f32,
}

impl PowerEstimator {
    pub fn new(lo: Nco, wide: CascadedLowPass, narrow: CascadedLowPass, alpha: f32) -> Self {
        Self {
            lo,
            wide,
            narrow,
            alpha,
            noise_power: 0.0,
            signal_power: 0.0,
        }
    }

    /// Feed one raw sample; returns the instantaneous narrow/wide power
    /// ratio and the narrow-band sample for the demodulator.
    ///
    /// The ratio is 0 until the noise tracker has seen any energy.
    pub fn estimate(&mut self, x: Complex<f32>) -> (f32, Complex<f32>) {
        let y1 = self.wide.run(x * self.lo.next().conj());
        self.noise_power += self.alpha * (y1.norm_sqr() - self.noise_power);

        let y2 = self.narrow.run(y1);
        self.signal_power += self.alpha * (y2.norm_sqr() - self.signal_power);

        let ratio = if self.noise_power == 0.0 {
            0.0
        } else {
            self.signal_power / self.noise_power
        };
        (ratio, y2)
    }
}
