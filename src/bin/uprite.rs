//! Uprite CLI - Command-line interface for the posture monitoring engine
//!
//! Commands:
//! - score: Score a single (tilt, distance) observation against a baseline
//! - simulate: Run the monitoring loop against synthetic sensors
//! - check-config: Validate a monitor configuration file

use std::fs;
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;

use clap::{Parser, Subcommand, ValueEnum};
use tokio::sync::{mpsc, oneshot};

use uprite::scheduler::{Collaborators, MonitorScheduler};
use uprite::sensors::{
    AccelerometerSource, ActivitySignal, DistanceDetector, EventLogger, NotificationSink,
};
use uprite::{
    feedback_message, AccelSample, Baseline, MonitorConfig, MonitorError, PostureEvent,
    ReminderLevel, Rotation, ScoreEngine, SensorSample, StaticCalibration, UPRITE_VERSION,
};

/// Uprite - On-device adaptive posture-monitoring engine
#[derive(Parser)]
#[command(name = "uprite")]
#[command(author = "Uprite Labs")]
#[command(version = UPRITE_VERSION)]
#[command(about = "Monitor sitting posture from tilt and face distance", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Score a single observation against a baseline
    Score {
        /// Tilt angle in degrees (omit if unavailable)
        #[arg(long)]
        tilt: Option<f64>,

        /// Face distance ratio (omit if no face was detected)
        #[arg(long)]
        distance: Option<f64>,

        /// Baseline JSON file (defaults to the uncalibrated baseline)
        #[arg(long)]
        baseline: Option<PathBuf>,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Run the monitoring loop against synthetic sensors
    Simulate {
        /// Synthetic posture profile
        #[arg(long, default_value = "good")]
        profile: Profile,

        /// Number of sampling cycles to run
        #[arg(long, default_value = "5")]
        cycles: u32,

        /// Monitor configuration JSON file (defaults to a fast
        /// simulation-friendly cadence)
        #[arg(long)]
        config: Option<PathBuf>,

        /// Baseline JSON file
        #[arg(long)]
        baseline: Option<PathBuf>,
    },

    /// Validate a monitor configuration file
    CheckConfig {
        /// Configuration JSON file
        config: PathBuf,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum Profile {
    /// Upright device, face at the calibrated distance
    Good,
    /// Device nearly flat, face out of the camera's view
    Slouch,
    /// Moderate tilt with the face much too close to the screen
    TooClose,
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<(), MonitorError> {
    match cli.command {
        Commands::Score {
            tilt,
            distance,
            baseline,
            json,
        } => cmd_score(tilt, distance, baseline.as_deref(), json),

        Commands::Simulate {
            profile,
            cycles,
            config,
            baseline,
        } => cmd_simulate(profile, cycles, config.as_deref(), baseline.as_deref()),

        Commands::CheckConfig { config } => cmd_check_config(&config),
    }
}

fn load_baseline(path: Option<&std::path::Path>) -> Result<Baseline, MonitorError> {
    match path {
        Some(path) => {
            let json = fs::read_to_string(path)
                .map_err(|e| MonitorError::InvalidConfig(format!("{}: {}", path.display(), e)))?;
            Ok(serde_json::from_str(&json)?)
        }
        None => Ok(Baseline::default()),
    }
}

fn cmd_score(
    tilt: Option<f64>,
    distance: Option<f64>,
    baseline_path: Option<&std::path::Path>,
    json: bool,
) -> Result<(), MonitorError> {
    let baseline = load_baseline(baseline_path)?;
    let engine = ScoreEngine::default();

    let sample = SensorSample { tilt, distance };
    let result = engine.score(&sample, &baseline);
    let message = feedback_message(tilt, distance, result.score, &baseline);

    if json {
        println!(
            "{}",
            serde_json::to_string(&serde_json::json!({
                "score": result.score,
                "level": result.level.as_str(),
                "message": message,
            }))?
        );
    } else {
        println!("Score:   {}/100", result.score);
        println!("Level:   {}", result.level.as_str());
        println!("Message: {}", message);
    }

    Ok(())
}

fn cmd_check_config(path: &std::path::Path) -> Result<(), MonitorError> {
    let json = fs::read_to_string(path)
        .map_err(|e| MonitorError::InvalidConfig(format!("{}: {}", path.display(), e)))?;
    let config = MonitorConfig::from_json(&json)?;
    println!(
        "Configuration OK (initial delay {}ms, cap {}ms, {} distance attempts)",
        config.initial_delay_ms, config.max_delay_ms, config.max_distance_attempts
    );
    Ok(())
}

/// Cadence suited to an interactive simulation run.
fn simulation_config() -> MonitorConfig {
    MonitorConfig {
        initial_delay_ms: 500,
        max_delay_ms: 6_000,
        distance_attempt_timeout_ms: 300,
        distance_retry_delay_ms: 100,
        tilt_read_timeout_ms: 200,
        shutdown_grace_ms: 500,
        ..MonitorConfig::default()
    }
}

fn cmd_simulate(
    profile: Profile,
    cycles: u32,
    config_path: Option<&std::path::Path>,
    baseline_path: Option<&std::path::Path>,
) -> Result<(), MonitorError> {
    let config = match config_path {
        Some(path) => {
            let json = fs::read_to_string(path)
                .map_err(|e| MonitorError::InvalidConfig(format!("{}: {}", path.display(), e)))?;
            MonitorConfig::from_json(&json)?
        }
        None => simulation_config(),
    };
    let baseline = load_baseline(baseline_path)?;

    let (gravity, distance) = match profile {
        Profile::Good => (AccelSample::new(0.0, 9.81, 0.0), Some(0.8)),
        Profile::Slouch => (AccelSample::new(0.0, 2.0, 9.6), None),
        Profile::TooClose => (AccelSample::new(0.0, 6.0, 8.0), Some(1.5)),
    };

    let (done_tx, done_rx) = mpsc::channel(1);
    let logger = Arc::new(ConsoleLogger {
        baseline,
        pretty: atty::is(atty::Stream::Stdout),
        remaining: AtomicU32::new(cycles),
        done: done_tx,
    });

    let collaborators = Collaborators {
        calibration: Arc::new(match baseline_path {
            Some(_) => StaticCalibration::with_baseline(baseline),
            None => StaticCalibration::uncalibrated(),
        }),
        detector: Arc::new(SimulatedDetector { distance }),
        accelerometer: Arc::new(SimulatedAccel { gravity }),
        activity: Arc::new(AlwaysActive),
        notifications: Arc::new(ConsoleSink),
        logger,
    };

    let scheduler = MonitorScheduler::new(config, Rotation::Deg0, collaborators)?;

    let runtime = tokio::runtime::Runtime::new()
        .map_err(|e| MonitorError::CycleError(format!("failed to start runtime: {}", e)))?;
    runtime.block_on(scheduler.run(done_rx));

    Ok(())
}

struct SimulatedAccel {
    gravity: AccelSample,
}

impl AccelerometerSource for SimulatedAccel {
    fn subscribe(&self) -> mpsc::Receiver<AccelSample> {
        let (tx, rx) = mpsc::channel(1);
        let _ = tx.try_send(self.gravity);
        rx
    }
}

struct SimulatedDetector {
    distance: Option<f64>,
}

impl DistanceDetector for SimulatedDetector {
    fn detect_once(&self) -> oneshot::Receiver<f64> {
        let (tx, rx) = oneshot::channel();
        if let Some(distance) = self.distance {
            let _ = tx.send(distance);
        }
        rx
    }
}

struct AlwaysActive;

impl ActivitySignal for AlwaysActive {
    fn is_device_active(&self) -> bool {
        true
    }
}

struct ConsoleSink;

impl NotificationSink for ConsoleSink {
    fn present(&self, level: ReminderLevel) {
        if level > ReminderLevel::None {
            tracing::warn!(level = level.as_str(), "reminder presented");
        }
    }

    fn is_blocking_overlay_visible(&self) -> bool {
        false
    }
}

/// Prints each cycle's event and stops the loop after the requested number
/// of cycles.
struct ConsoleLogger {
    baseline: Baseline,
    pretty: bool,
    remaining: AtomicU32,
    done: mpsc::Sender<()>,
}

impl EventLogger for ConsoleLogger {
    fn record(&self, event: &PostureEvent) -> Result<(), MonitorError> {
        if self.pretty {
            let message =
                feedback_message(event.tilt, event.distance, event.score, &self.baseline);
            println!(
                "{} score={:<3} level={:<8} {}",
                event.timestamp.format("%H:%M:%S"),
                event.score,
                event.level.as_str(),
                message
            );
        } else {
            println!("{}", serde_json::to_string(event)?);
        }

        let before = self.remaining.fetch_sub(1, Ordering::SeqCst);
        if before <= 1 {
            let _ = self.done.try_send(());
        }
        Ok(())
    }
}
