//! Run command - play a track log and print each position update.

use std::io::{self, Write};
use std::path::PathBuf;

use clap::ValueEnum;
use gpxsim::config::{ConfigFile, SimulatorSettings};
use gpxsim::simulator::{PositionUpdate, SimulatorConfig, SimulatorService, TrackSimulator};
use tokio::sync::broadcast::error::RecvError;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

use crate::error::CliError;
use crate::runner::CliRunner;

/// How updates are written to stdout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// One human-readable line per update
    Text,
    /// One JSON object per line
    Json,
}

/// Arguments for the run command.
pub struct RunArgs {
    pub source: Option<PathBuf>,
    pub tick_ms: Option<u64>,
    pub multiplier: Option<u32>,
    pub format: OutputFormat,
    pub limit: Option<u64>,
    pub config: Option<PathBuf>,
    pub debug: bool,
}

/// Run the run command.
pub fn run(args: RunArgs) -> Result<(), CliError> {
    let runner = CliRunner::new(args.config.as_deref(), args.debug)?;
    runner.log_startup("run");

    let settings = resolve_settings(runner.config(), &args);
    let source = settings.source.clone().ok_or(CliError::NoSource)?;
    let simulator_config = settings.to_simulator_config()?;

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .map_err(CliError::Runtime)?;

    let cancellation = CancellationToken::new();
    let signal_token = cancellation.clone();
    ctrlc::set_handler(move || signal_token.cancel())
        .map_err(|e| CliError::Config(format!("Failed to set signal handler: {}", e)))?;

    runtime.block_on(simulate(
        source,
        simulator_config,
        args.format,
        args.limit,
        cancellation,
    ))
}

/// Merge CLI arguments over config file values.
fn resolve_settings(config: &ConfigFile, args: &RunArgs) -> SimulatorSettings {
    let mut settings = config.simulator.clone();
    if let Some(source) = &args.source {
        settings.source = Some(source.clone());
    }
    if let Some(tick_ms) = args.tick_ms {
        settings.tick_interval_ms = tick_ms;
    }
    if let Some(multiplier) = args.multiplier {
        settings.playback_multiplier = multiplier;
    }
    settings
}

async fn simulate(
    source: PathBuf,
    config: SimulatorConfig,
    format: OutputFormat,
    limit: Option<u64>,
    cancellation: CancellationToken,
) -> Result<(), CliError> {
    let (handle, task) =
        SimulatorService::spawn(TrackSimulator::new(config), cancellation.clone());
    let mut updates = handle.subscribe();

    handle.set_source(&source).await?;
    handle.start().await?;
    info!(source = %source.display(), "Simulating track log (Ctrl+C to stop)");

    let mut emitted: u64 = 0;
    let result = loop {
        tokio::select! {
            _ = cancellation.cancelled() => break Ok(()),
            received = updates.recv() => match received {
                Ok(update) => {
                    if let Err(e) = write_update(&mut io::stdout().lock(), &update, format) {
                        break Err(e);
                    }
                    emitted += 1;
                    if limit.is_some_and(|limit| emitted >= limit) {
                        break Ok(());
                    }
                }
                Err(RecvError::Lagged(skipped)) => {
                    warn!(skipped, "Output fell behind, updates dropped");
                }
                Err(RecvError::Closed) => break Ok(()),
            }
        }
    };

    if let Ok(status) = handle.status().await {
        info!(
            updates = emitted,
            loops = status.loops_completed,
            "Simulation finished"
        );
    }

    cancellation.cancel();
    if let Err(e) = task.await {
        warn!(error = %e, "Simulator task ended abnormally");
    }
    result
}

fn write_update(
    out: &mut impl Write,
    update: &PositionUpdate,
    format: OutputFormat,
) -> Result<(), CliError> {
    let line = match format {
        OutputFormat::Text => update.to_string(),
        OutputFormat::Json => {
            serde_json::to_string(update).map_err(|e| CliError::Output(e.to_string()))?
        }
    };
    writeln!(out, "{}", line).map_err(|e| CliError::Output(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use gpxsim::geo::GeoPoint;
    use gpxsim::simulator::SegmentPhase;

    fn args() -> RunArgs {
        RunArgs {
            source: None,
            tick_ms: None,
            multiplier: None,
            format: OutputFormat::Text,
            limit: None,
            config: None,
            debug: false,
        }
    }

    fn update() -> PositionUpdate {
        PositionUpdate {
            position: GeoPoint::new(-117.0, 34.01),
            heading: 90.0,
            sim_time_ms: 3_723_000,
            normalized_time: 0.25,
            phase: SegmentPhase::Cruising,
        }
    }

    #[test]
    fn test_cli_overrides_config() {
        let mut config = ConfigFile::default();
        config.simulator.source = Some(PathBuf::from("/config/ride.gpx"));
        config.simulator.playback_multiplier = 5;

        let mut run_args = args();
        run_args.source = Some(PathBuf::from("cli.gpx"));
        run_args.tick_ms = Some(200);

        let settings = resolve_settings(&config, &run_args);

        assert_eq!(settings.source, Some(PathBuf::from("cli.gpx")));
        assert_eq!(settings.tick_interval_ms, 200);
        assert_eq!(settings.playback_multiplier, 5);
    }

    #[test]
    fn test_config_source_used_when_no_argument() {
        let mut config = ConfigFile::default();
        config.simulator.source = Some(PathBuf::from("/config/ride.gpx"));

        let settings = resolve_settings(&config, &args());

        assert_eq!(settings.source, Some(PathBuf::from("/config/ride.gpx")));
    }

    #[test]
    fn test_text_output() {
        let mut out = Vec::new();
        write_update(&mut out, &update(), OutputFormat::Text).unwrap();

        assert_eq!(
            String::from_utf8(out).unwrap(),
            "01:02:03 lon=-117.000000 lat=34.010000 hdg=90.0\n"
        );
    }

    #[test]
    fn test_json_output() {
        let mut out = Vec::new();
        write_update(&mut out, &update(), OutputFormat::Json).unwrap();

        let value: serde_json::Value = serde_json::from_slice(&out).unwrap();
        assert_eq!(value["position"]["latitude"], 34.01);
        assert_eq!(value["heading"], 90.0);
        assert_eq!(value["sim_time_ms"], 3_723_000);
        assert_eq!(value["phase"], "cruising");
    }
}
