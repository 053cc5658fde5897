use crate::util::positive_rate_parser;
use clap::Parser;

#[derive(Parser)]
#[command(name = env!("CARGO_PKG_NAME"))]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Meteor-scatter chirp detector for raw IQ captures.")]
pub struct Cli {
    /// Raw capture to scan: interleaved little-endian f32 I/Q pairs
    #[arg(index = 1)]
    pub input: String,

    /// Where to write the masked, phase-encoded output stream
    #[arg(short, long)]
    pub output: Option<String>,

    /// Capture sample rate in Hz
    #[arg(long, value_parser = positive_rate_parser)]
    pub sample_rate: Option<f64>,

    /// Local oscillator frequency in Hz
    #[arg(long, value_parser = positive_rate_parser)]
    pub center_freq: Option<f64>,

    /// Config file to use instead of the per-user one
    #[arg(long)]
    pub config: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_input_is_required() {
        assert!(Cli::try_parse_from(["bolide"]).is_err());
        assert!(Cli::try_parse_from(["bolide", "capture.raw", "extra"]).is_err());
    }

    #[test]
    fn test_options_override() {
        let cli = Cli::try_parse_from([
            "bolide",
            "capture.raw",
            "-o",
            "out.raw",
            "--sample-rate",
            "48000",
            "--center-freq",
            "10700",
        ])
        .unwrap();
        assert_eq!(cli.input, "capture.raw");
        assert_eq!(cli.output.as_deref(), Some("out.raw"));
        assert_eq!(cli.sample_rate, Some(48000.0));
        assert_eq!(cli.center_freq, Some(10700.0));
    }

    #[test]
    fn test_rejects_nonpositive_rate() {
        assert!(Cli::try_parse_from(["bolide", "capture.raw", "--sample-rate", "0"]).is_err());
    }
}
