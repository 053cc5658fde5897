use anyhow::{bail, Context, Result};
use knuffel::Decode;
use std::path::Path;

use crate::args::Cli;

/// Optional KDL config file, overridden field-by-field by CLI options.
#[derive(Decode, Debug, Clone, Default)]
pub struct FileConfig {
    #[knuffel(child)]
    pub radio: Option<RadioSection>,
    #[knuffel(child)]
    pub filters: Option<FilterSection>,
    #[knuffel(child)]
    pub detection: Option<DetectionSection>,
}

#[derive(Decode, Debug, Clone)]
pub struct RadioSection {
    #[knuffel(property)]
    pub sample_rate: Option<f64>,
    #[knuffel(property)]
    pub center_freq: Option<f64>,
}

#[derive(Decode, Debug, Clone)]
pub struct FilterSection {
    #[knuffel(property)]
    pub wide_order: Option<u32>,
    #[knuffel(property)]
    pub wide_cutoff: Option<f64>,
    #[knuffel(property)]
    pub narrow_order: Option<u32>,
    #[knuffel(property)]
    pub narrow_cutoff: Option<f64>,
}

#[derive(Decode, Debug, Clone)]
pub struct DetectionSection {
    #[knuffel(property)]
    pub min_chirp_duration: Option<f64>,
    #[knuffel(property)]
    pub threshold_factor: Option<f64>,
    #[knuffel(property)]
    pub output: Option<String>,
}

impl FileConfig {
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        let config = knuffel::parse(&path.display().to_string(), &content)?;
        Ok(config)
    }
}

/// Fully resolved detector parameters.
///
/// Defaults match the hardware setup this tool was written for: 8 kHz IQ
/// captures with the reflected carrier at 1 kHz.
#[derive(Debug, Clone)]
pub struct DetectorParams {
    pub sample_rate: f64,
    pub center_freq: f64,
    pub wide_order: u32,
    pub wide_cutoff: f64,
    pub narrow_order: u32,
    pub narrow_cutoff: f64,
    pub min_chirp_duration: f64,
    pub threshold_factor: f64,
    pub output: String,
}

impl Default for DetectorParams {
    fn default() -> Self {
        Self {
            sample_rate: 8000.0,
            center_freq: 1000.0,
            wide_order: 5,
            wide_cutoff: 300.0,
            narrow_order: 4,
            narrow_cutoff: 50.0,
            min_chirp_duration: 0.07,
            threshold_factor: 2.0,
            output: "detect.raw".to_string(),
        }
    }
}

impl DetectorParams {
    /// Defaults, then the config file (explicit `--config` path, or
    /// `default_config` if it exists), then CLI options on top.
    pub fn resolve(cli: &Cli, default_config: &Path) -> Result<Self> {
        let mut params = Self::default();

        let file = match &cli.config {
            Some(path) => Some(FileConfig::load(path)?),
            None if default_config.exists() => Some(FileConfig::load(default_config)?),
            None => None,
        };
        if let Some(file) = file {
            params.apply_file(&file);
        }

        if let Some(v) = cli.sample_rate {
            params.sample_rate = v;
        }
        if let Some(v) = cli.center_freq {
            params.center_freq = v;
        }
        if let Some(v) = &cli.output {
            params.output = v.clone();
        }

        params.validate()?;
        Ok(params)
    }

    fn apply_file(&mut self, file: &FileConfig) {
        if let Some(radio) = &file.radio {
            if let Some(v) = radio.sample_rate {
                self.sample_rate = v;
            }
            if let Some(v) = radio.center_freq {
                self.center_freq = v;
            }
        }
        if let Some(filters) = &file.filters {
            if let Some(v) = filters.wide_order {
                self.wide_order = v;
            }
            if let Some(v) = filters.wide_cutoff {
                self.wide_cutoff = v;
            }
            if let Some(v) = filters.narrow_order {
                self.narrow_order = v;
            }
            if let Some(v) = filters.narrow_cutoff {
                self.narrow_cutoff = v;
            }
        }
        if let Some(detection) = &file.detection {
            if let Some(v) = detection.min_chirp_duration {
                self.min_chirp_duration = v;
            }
            if let Some(v) = detection.threshold_factor {
                self.threshold_factor = v;
            }
            if let Some(v) = &detection.output {
                self.output = v.clone();
            }
        }
    }

    pub fn validate(&self) -> Result<()> {
        if !(self.sample_rate > 0.0) {
            bail!("Sample rate must be positive, got {}", self.sample_rate);
        }
        if !(self.center_freq > 0.0) {
            bail!("Center frequency must be positive, got {}", self.center_freq);
        }
        if self.wide_order == 0 || self.narrow_order == 0 {
            bail!("Filter orders must be at least 1");
        }
        let nyquist = self.sample_rate / 2.0;
        if !(self.wide_cutoff > 0.0) || self.wide_cutoff >= nyquist {
            bail!(
                "Wide cutoff must lie in (0, {}), got {}",
                nyquist,
                self.wide_cutoff
            );
        }
        if !(self.narrow_cutoff > 0.0) || self.narrow_cutoff >= self.wide_cutoff {
            // The energy threshold scales with narrow/wide, which only
            // makes sense when the narrow band nests inside the wide one.
            bail!(
                "Narrow cutoff must lie in (0, {}), got {}",
                self.wide_cutoff,
                self.narrow_cutoff
            );
        }
        if !(self.min_chirp_duration > 0.0) {
            bail!(
                "Minimum chirp duration must be positive, got {}",
                self.min_chirp_duration
            );
        }
        if !(self.threshold_factor > 0.0) {
            bail!(
                "Threshold factor must be positive, got {}",
                self.threshold_factor
            );
        }
        Ok(())
    }

    /// Energy window and lag buffer length, in samples.
    pub fn window_len(&self) -> usize {
        (self.sample_rate * self.min_chirp_duration).ceil() as usize
    }

    /// EMA coefficient matching the minimum chirp duration.
    pub fn smoothing_factor(&self) -> f32 {
        (1.0 - (-1.0 / (self.sample_rate * self.min_chirp_duration)).exp()) as f32
    }

    pub fn energy_threshold(&self) -> f32 {
        (self.threshold_factor * (self.narrow_cutoff / self.wide_cutoff) * self.window_len() as f64)
            as f32
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_derived_values() {
        let params = DetectorParams::default();
        assert!(params.validate().is_ok());
        assert_eq!(params.window_len(), 560);
        let threshold = params.energy_threshold();
        assert!((threshold - 186.6667).abs() < 1e-3, "threshold: {}", threshold);
        let alpha = params.smoothing_factor();
        assert!((alpha - 0.0017841).abs() < 1e-6, "alpha: {}", alpha);
    }

    #[test]
    fn test_parse_kdl() {
        let text = r#"
radio sample-rate=48000 center-freq=10700
filters wide-order=6 wide-cutoff=500.0
detection min-chirp-duration=0.05 output="events.raw"
"#;
        let file: FileConfig = knuffel::parse("test.kdl", text).unwrap();
        let mut params = DetectorParams::default();
        params.apply_file(&file);
        assert_eq!(params.sample_rate, 48000.0);
        assert_eq!(params.center_freq, 10700.0);
        assert_eq!(params.wide_order, 6);
        assert_eq!(params.wide_cutoff, 500.0);
        // Untouched fields keep their defaults.
        assert_eq!(params.narrow_order, 4);
        assert_eq!(params.narrow_cutoff, 50.0);
        assert_eq!(params.min_chirp_duration, 0.05);
        assert_eq!(params.output, "events.raw");
        assert!(params.validate().is_ok());
    }

    #[test]
    fn test_validation_rejects_bad_params() {
        let mut params = DetectorParams::default();
        params.wide_cutoff = 4000.0;
        assert!(params.validate().is_err());

        let mut params = DetectorParams::default();
        params.narrow_cutoff = 300.0;
        assert!(params.validate().is_err());

        let mut params = DetectorParams::default();
        params.min_chirp_duration = 0.0;
        assert!(params.validate().is_err());

        let mut params = DetectorParams::default();
        params.wide_order = 0;
        assert!(params.validate().is_err());
    }
}
