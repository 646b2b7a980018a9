use std::{path::PathBuf, process::ExitCode, time::Duration};

use anyhow::{Context, Result};
use clap::{error::ErrorKind, Parser};
use tracing_subscriber::EnvFilter;

use adf4351_bridge::{
    command::{JsonCommands, LineCommands},
    config::SynthesizerConfig,
    delay::StdDelay,
    device::Adf4351,
    handshake::HandshakeLoop,
    serial,
};

#[derive(Debug, Parser)]
#[command(name = "adf4351-bridge")]
#[command(about = "Configure an ADF4351 through a serial bridge, then track its status")]
struct Cli {
    /// Serial device of the bridge, e.g. /dev/ttyUSB0
    device: String,

    /// Serial speed
    baud: u32,

    /// JSON synthesizer configuration, missing fields take reference values.
    #[arg(long)]
    config: Option<PathBuf>,

    /// REFin frequency, Hz. Logs the resulting output frequency.
    #[arg(long)]
    ref_in_hz: Option<u32>,

    /// Give up when no status byte arrives for this long.
    #[arg(long)]
    status_timeout_ms: Option<u64>,
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn load_config(cli: &Cli) -> Result<SynthesizerConfig> {
    let config = match &cli.config {
        Some(path) => SynthesizerConfig::from_json_file(path)
            .with_context(|| format!("load configuration {}", path.display()))?,
        None => SynthesizerConfig::default(),
    };
    config.validate().context("validate configuration")?;

    if let Some(ref_in_hz) = cli.ref_in_hz {
        let f_out = config.f_out_hz(ref_in_hz)?;
        tracing::info!("REFin {} Hz -> RF out {} Hz", ref_in_hz, f_out);
        if !config.vco_in_range(ref_in_hz)? {
            tracing::warn!("VCO {} Hz is outside of its range", config.f_vco_hz(ref_in_hz)?);
        }
    }
    Ok(config)
}

fn main() -> ExitCode {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => {
            let _ = e.print();
            return match e.kind() {
                ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => ExitCode::SUCCESS,
                _ => ExitCode::from(1),
            };
        }
    };
    init_tracing();

    let config = match load_config(&cli) {
        Ok(config) => config,
        Err(e) => {
            tracing::error!("{:#}", e);
            return ExitCode::from(1);
        }
    };

    let status_timeout = cli.status_timeout_ms.map(Duration::from_millis);
    let link = match serial::open(&cli.device, cli.baud, status_timeout) {
        Ok(link) => link,
        Err(e) => {
            tracing::error!("open {}: {}", cli.device, e);
            return ExitCode::from(2);
        }
    };

    let mut dev = Adf4351::new(link);
    let mut delay = StdDelay;
    if let Err(e) = dev.init(&mut delay, &config) {
        tracing::error!("bring-up failed: {}", e);
        return ExitCode::from(3);
    }

    let commands = match LineCommands::stdin() {
        Ok(commands) => commands,
        Err(e) => {
            tracing::error!("start command reader: {}", e);
            return ExitCode::from(1);
        }
    };

    let mut handshake = HandshakeLoop::new(dev, config, commands, JsonCommands, delay);
    match handshake.run() {
        Ok(never) => match never {},
        Err(e) => tracing::error!("{}", e),
    }
    ExitCode::SUCCESS
}
