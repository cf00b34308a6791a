//! Async driver for [`TrackSimulator`].
//!
//! The service owns the simulator inside a single Tokio task. Callers talk to
//! it through a cloneable [`SimulatorHandle`]: configuration calls travel over
//! a command channel and are answered on a oneshot, while position updates are
//! broadcast to every subscriber. Ticks and commands are handled by the same
//! task, one at a time, so they never overlap.
//!
//! # Example
//!
//! ```ignore
//! use gpxsim::simulator::{SimulatorService, TrackSimulator};
//! use tokio_util::sync::CancellationToken;
//!
//! let cancellation = CancellationToken::new();
//! let (handle, task) = SimulatorService::spawn(TrackSimulator::default(), cancellation.clone());
//!
//! let mut updates = handle.subscribe();
//! handle.set_source("ride.gpx").await?;
//! handle.start().await?;
//!
//! while let Ok(update) = updates.recv().await {
//!     println!("{}", update);
//! }
//! ```

use std::path::PathBuf;
use std::time::Duration;

use tokio::sync::{broadcast, mpsc, oneshot};
use tokio::task::JoinHandle;
use tokio::time::{self, Instant, Interval, MissedTickBehavior};
use tokio_util::sync::CancellationToken;

use super::engine::{SimulatorStatus, TrackSimulator};
use super::error::{SimulatorError, SimulatorResult};
use super::update::PositionUpdate;

/// Default capacity of the position update broadcast channel.
pub const DEFAULT_UPDATE_CHANNEL_CAPACITY: usize = 64;

const COMMAND_CHANNEL_CAPACITY: usize = 16;

type Reply<T> = oneshot::Sender<T>;

enum Command {
    SetSource {
        path: PathBuf,
        reply: Reply<SimulatorResult<()>>,
    },
    Start {
        reply: Reply<SimulatorResult<()>>,
    },
    Pause {
        reply: Reply<()>,
    },
    Resume {
        reply: Reply<()>,
    },
    SetTickInterval {
        interval: Duration,
        reply: Reply<SimulatorResult<()>>,
    },
    SetPlaybackMultiplier {
        multiplier: u32,
        reply: Reply<SimulatorResult<()>>,
    },
    Status {
        reply: Reply<SimulatorStatus>,
    },
}

/// Handle to a running [`SimulatorService`].
///
/// Every method fails with [`SimulatorError::ServiceStopped`] once the
/// service task has exited.
#[derive(Debug, Clone)]
pub struct SimulatorHandle {
    commands: mpsc::Sender<Command>,
    updates: broadcast::Sender<PositionUpdate>,
}

impl std::fmt::Debug for Command {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Command::SetSource { .. } => "SetSource",
            Command::Start { .. } => "Start",
            Command::Pause { .. } => "Pause",
            Command::Resume { .. } => "Resume",
            Command::SetTickInterval { .. } => "SetTickInterval",
            Command::SetPlaybackMultiplier { .. } => "SetPlaybackMultiplier",
            Command::Status { .. } => "Status",
        };
        f.write_str(name)
    }
}

impl SimulatorHandle {
    async fn request<T>(&self, command: impl FnOnce(Reply<T>) -> Command) -> SimulatorResult<T> {
        let (reply, response) = oneshot::channel();
        self.commands
            .send(command(reply))
            .await
            .map_err(|_| SimulatorError::ServiceStopped)?;
        response.await.map_err(|_| SimulatorError::ServiceStopped)
    }

    /// Load a new track log. See [`TrackSimulator::set_source`].
    pub async fn set_source(&self, path: impl Into<PathBuf>) -> SimulatorResult<()> {
        let path = path.into();
        self.request(|reply| Command::SetSource { path, reply })
            .await?
    }

    /// Start playback from the first point. See [`TrackSimulator::start`].
    pub async fn start(&self) -> SimulatorResult<()> {
        self.request(|reply| Command::Start { reply }).await?
    }

    pub async fn pause(&self) -> SimulatorResult<()> {
        self.request(|reply| Command::Pause { reply }).await
    }

    pub async fn resume(&self) -> SimulatorResult<()> {
        self.request(|reply| Command::Resume { reply }).await
    }

    /// Takes effect at the next `start()`.
    pub async fn set_tick_interval(&self, interval: Duration) -> SimulatorResult<()> {
        self.request(|reply| Command::SetTickInterval { interval, reply })
            .await?
    }

    /// Takes effect at the next `start()`.
    pub async fn set_playback_multiplier(&self, multiplier: u32) -> SimulatorResult<()> {
        self.request(|reply| Command::SetPlaybackMultiplier { multiplier, reply })
            .await?
    }

    pub async fn status(&self) -> SimulatorResult<SimulatorStatus> {
        self.request(|reply| Command::Status { reply }).await
    }

    /// Receive every position update produced from now on.
    pub fn subscribe(&self) -> broadcast::Receiver<PositionUpdate> {
        self.updates.subscribe()
    }
}

/// Runs a [`TrackSimulator`] on a Tokio task.
pub struct SimulatorService;

impl SimulatorService {
    /// Spawn the service with the default update channel capacity.
    ///
    /// The task exits when `cancellation` fires or every handle is dropped.
    pub fn spawn(
        simulator: TrackSimulator,
        cancellation: CancellationToken,
    ) -> (SimulatorHandle, JoinHandle<()>) {
        Self::spawn_with_capacity(simulator, cancellation, DEFAULT_UPDATE_CHANNEL_CAPACITY)
    }

    /// Spawn the service with a custom update channel capacity.
    ///
    /// Subscribers that fall more than `capacity` updates behind see
    /// [`broadcast::error::RecvError::Lagged`].
    pub fn spawn_with_capacity(
        simulator: TrackSimulator,
        cancellation: CancellationToken,
        capacity: usize,
    ) -> (SimulatorHandle, JoinHandle<()>) {
        let (command_tx, command_rx) = mpsc::channel(COMMAND_CHANNEL_CAPACITY);
        let (update_tx, _) = broadcast::channel(capacity);

        let handle = SimulatorHandle {
            commands: command_tx,
            updates: update_tx.clone(),
        };
        let task = tokio::spawn(run(simulator, command_rx, update_tx, cancellation));

        (handle, task)
    }
}

async fn run(
    mut simulator: TrackSimulator,
    mut commands: mpsc::Receiver<Command>,
    updates: broadcast::Sender<PositionUpdate>,
    cancellation: CancellationToken,
) {
    let mut ticker: Option<Interval> = None;
    sync_ticker(&simulator, &mut ticker);

    tracing::debug!("Simulator service started");

    loop {
        tokio::select! {
            biased;

            _ = cancellation.cancelled() => {
                tracing::debug!("Simulator service cancelled");
                break;
            }

            command = commands.recv() => {
                let Some(command) = command else {
                    tracing::debug!("All simulator handles dropped");
                    break;
                };
                if handle_command(&mut simulator, command) {
                    ticker = None;
                }
                sync_ticker(&simulator, &mut ticker);
            }

            _ = next_tick(&mut ticker) => {
                if let Some(update) = simulator.tick() {
                    tracing::trace!(%update, "Position update");
                    // No subscribers is fine
                    let _ = updates.send(update);
                }
                sync_ticker(&simulator, &mut ticker);
            }
        }
    }

    tracing::debug!("Simulator service stopped");
}

/// Apply a command. Returns true when the ticker must restart its phase.
fn handle_command(simulator: &mut TrackSimulator, command: Command) -> bool {
    tracing::trace!(?command, "Simulator command");

    match command {
        Command::SetSource { path, reply } => {
            let _ = reply.send(simulator.set_source(path));
            false
        }
        Command::Start { reply } => {
            let _ = reply.send(simulator.start());
            true
        }
        Command::Pause { reply } => {
            simulator.pause();
            let _ = reply.send(());
            false
        }
        Command::Resume { reply } => {
            simulator.resume();
            let _ = reply.send(());
            false
        }
        Command::SetTickInterval { interval, reply } => {
            let _ = reply.send(simulator.set_tick_interval(interval));
            false
        }
        Command::SetPlaybackMultiplier { multiplier, reply } => {
            let _ = reply.send(simulator.set_playback_multiplier(multiplier));
            false
        }
        Command::Status { reply } => {
            let _ = reply.send(simulator.status());
            false
        }
    }
}

/// Match the ticker to the simulator's timer state.
fn sync_ticker(simulator: &TrackSimulator, ticker: &mut Option<Interval>) {
    if !simulator.is_active() {
        *ticker = None;
        return;
    }

    let period = simulator.timer_interval();
    if ticker.as_ref().map(Interval::period) != Some(period) {
        // First tick one period from now, like a freshly started timer
        let mut interval = time::interval_at(Instant::now() + period, period);
        interval.set_missed_tick_behavior(MissedTickBehavior::Skip);
        *ticker = Some(interval);
    }
}

async fn next_tick(ticker: &mut Option<Interval>) {
    match ticker {
        Some(interval) => {
            interval.tick().await;
        }
        None => std::future::pending().await,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geo::GeoPoint;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn abc_file() -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        write!(
            file,
            "<gpx><trk><trkseg>\
             <trkpt lat=\"34.0\" lon=\"-117.0\"><time>2017-05-01T00:00:00Z</time></trkpt>\
             <trkpt lat=\"34.01\" lon=\"-117.0\"><time>2017-05-01T00:00:10Z</time></trkpt>\
             <trkpt lat=\"34.01\" lon=\"-116.99\"><time>2017-05-01T00:00:20Z</time></trkpt>\
             </trkseg></trk></gpx>"
        )
        .unwrap();
        file
    }

    fn spawn() -> (SimulatorHandle, JoinHandle<()>, CancellationToken) {
        let cancellation = CancellationToken::new();
        let (handle, task) = SimulatorService::spawn(TrackSimulator::default(), cancellation.clone());
        (handle, task, cancellation)
    }

    #[tokio::test(start_paused = true)]
    async fn test_broadcasts_updates() {
        let file = abc_file();
        let (handle, _task, cancellation) = spawn();
        let mut updates = handle.subscribe();

        handle.set_source(file.path()).await.unwrap();
        handle.start().await.unwrap();

        for tick in 1..=10 {
            let update = updates.recv().await.unwrap();
            let expected = if tick <= 5 {
                GeoPoint::new(-117.0, 34.0)
            } else {
                GeoPoint::new(-117.0, 34.01)
            };
            assert_eq!(update.position, expected);
            assert_eq!(update.sim_time_ms, tick * 1000);
        }

        // Tick 11 loops silently; tick 12 is back at the first point
        let update = updates.recv().await.unwrap();
        assert_eq!(update.position, GeoPoint::new(-117.0, 34.0));
        assert_eq!(update.sim_time_ms, 1000);

        cancellation.cancel();
    }

    #[tokio::test(start_paused = true)]
    async fn test_pause_stops_updates() {
        let file = abc_file();
        let (handle, _task, cancellation) = spawn();
        let mut updates = handle.subscribe();

        handle.set_source(file.path()).await.unwrap();
        handle.start().await.unwrap();
        updates.recv().await.unwrap();

        handle.pause().await.unwrap();
        let waited = time::timeout(Duration::from_secs(5), updates.recv()).await;
        assert!(waited.is_err());

        handle.resume().await.unwrap();
        let update = updates.recv().await.unwrap();
        assert_eq!(update.sim_time_ms, 2000);

        cancellation.cancel();
    }

    #[tokio::test(start_paused = true)]
    async fn test_errors_returned_to_caller() {
        let (handle, _task, cancellation) = spawn();

        assert!(matches!(
            handle.start().await,
            Err(SimulatorError::NoSource)
        ));
        assert!(matches!(
            handle.set_source("/nonexistent/track.gpx").await,
            Err(SimulatorError::SourceNotFound(_))
        ));
        assert!(matches!(
            handle.set_playback_multiplier(0).await,
            Err(SimulatorError::InvalidConfig(_))
        ));

        cancellation.cancel();
    }

    #[tokio::test(start_paused = true)]
    async fn test_status_reflects_commands() {
        let file = abc_file();
        let (handle, _task, cancellation) = spawn();

        handle.set_tick_interval(Duration::from_millis(200)).await.unwrap();
        handle.set_source(file.path()).await.unwrap();
        handle.start().await.unwrap();

        let status = handle.status().await.unwrap();
        assert!(status.started);
        assert!(status.active);
        assert_eq!(status.tick_interval, Duration::from_millis(200));
        assert_eq!(status.source.as_deref(), Some(file.path()));

        cancellation.cancel();
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancellation_stops_service() {
        let (handle, task, cancellation) = spawn();

        cancellation.cancel();
        task.await.unwrap();

        assert!(matches!(
            handle.status().await,
            Err(SimulatorError::ServiceStopped)
        ));
    }
}
