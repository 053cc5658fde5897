use anyhow::{Context, Result};
use bolide::args::Cli;
use bolide::config::DetectorParams;
use bolide::detector::ChirpDetector;
use bolide::iq;
use clap::Parser;
use directories::ProjectDirs;
use log::info;
use std::process;

fn main() {
    env_logger::init();
    if let Err(e) = run() {
        log::error!("Error: {:#}", e);
        process::exit(1);
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse();

    let proj_dirs = ProjectDirs::from("com", "bolide", "bolide")
        .context("Could not determine project directories")?;
    let default_config = proj_dirs.config_dir().join("config.kdl");

    let params = DetectorParams::resolve(&cli, &default_config)?;

    let mut reader = iq::open_input(&cli.input)?;
    let mut writer = iq::create_output(&params.output)?;
    let mut detector = ChirpDetector::new(&params)?;

    info!(
        "Scanning {} at {} Hz (LO {} Hz), window {} samples",
        cli.input,
        params.sample_rate,
        params.center_freq,
        detector.window_len()
    );

    let mut chirps = 0u64;
    while let Some(sample) = reader.read_sample()? {
        let (out, event) = detector.feed(sample);
        writer.write_sample(out)?;
        if let Some(event) = event {
            println!("{}", event);
            chirps += 1;
        }
    }
    writer.finish()?;

    info!(
        "Processed {} samples, {} chirps detected",
        detector.samples_processed(),
        chirps
    );
    Ok(())
}
