use anyhow::Result;
use log::debug;
use num_complex::Complex;
use std::fmt;

use crate::config::DetectorParams;
use crate::dsp::{
    CascadedLowPass, ChirpGate, DifferentialDemod, EnergyWindow, Nco, PowerEstimator,
};
use crate::util::format_hms;

/// A detected chirp, reported when the energy integral falls back below
/// threshold.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChirpEvent {
    /// Duration in samples, counted from the estimated onset.
    pub length: u64,
    /// Onset time, floored to whole seconds from the start of the capture.
    pub onset_seconds: u64,
}

impl fmt::Display for ChirpEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Chirp of length {:5} detected (at {})",
            self.length,
            format_hms(self.onset_seconds)
        )
    }
}

/// The full detection pipeline for one channel.
///
/// Feed samples one at a time; every call yields exactly one output
/// sample, plus an event when a chirp just ended.
pub struct ChirpDetector {
    sample_rate: f64,
    sample_count: u64,
    power: PowerEstimator,
    window: EnergyWindow,
    gate: ChirpGate,
    demod: DifferentialDemod,
}

impl ChirpDetector {
    pub fn new(params: &DetectorParams) -> Result<Self> {
        params.validate()?;

        let len = params.window_len();
        let alpha = params.smoothing_factor();
        let threshold = params.energy_threshold();
        debug!(
            "Energy window {} samples, threshold {:.3}, alpha {:.6}",
            len, threshold, alpha
        );

        let lo = Nco::new(params.center_freq, params.sample_rate);
        let wide = CascadedLowPass::new(
            params.wide_order,
            params.sample_rate as f32,
            params.wide_cutoff as f32,
        )?;
        let narrow = CascadedLowPass::new(
            params.narrow_order,
            params.sample_rate as f32,
            params.narrow_cutoff as f32,
        )?;

        Ok(Self {
            sample_rate: params.sample_rate,
            sample_count: 0,
            power: PowerEstimator::new(lo, wide, narrow, alpha),
            window: EnergyWindow::new(len),
            gate: ChirpGate::new(threshold, len),
            demod: DifferentialDemod::new(len),
        })
    }

    /// Process one raw sample.
    pub fn feed(&mut self, x: Complex<f32>) -> (Complex<f32>, Option<ChirpEvent>) {
        let (ratio, demod) = self.power.estimate(x);
        let integral = self.window.push(ratio);
        let gate = self.gate.update(integral);

        let event = gate.ended.map(|length| ChirpEvent {
            length,
            // The onset can predate sample zero when a chirp is already
            // in progress at the start of the capture.
            onset_seconds: (self.sample_count.saturating_sub(length) as f64 / self.sample_rate)
                as u64,
        });

        let out = self.demod.compose(demod, gate.valid);
        self.sample_count += 1;
        (out, event)
    }

    pub fn samples_processed(&self) -> u64 {
        self.sample_count
    }

    pub fn window_len(&self) -> usize {
        self.window.len()
    }
}
