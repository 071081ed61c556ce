//! mesoscaled — the mesoscale autoscaler daemon.
//!
//! Reads its parameters from the command line or `AS_*` environment
//! variables, connects to a Marathon-style orchestrator, and runs one
//! control loop for the configured application until interrupted.
//!
//! # Usage
//!
//! ```text
//! mesoscaled --master https://dcos.example --app web --trigger-mode cpu \
//!     --multiplier 1.5 --min-instances 2 --max-instances 20 \
//!     --scale-up-factor 3 --cool-down-factor 4 --interval 30 \
//!     --min-range 20 --max-range 80
//! ```

use std::sync::Arc;

use clap::Parser;
use tokio::sync::watch;
use tracing::info;

use mesoscale_controller::ControlLoop;
use mesoscale_core::{AutoscalerConfig, TriggerMode};

mod marathon;

use marathon::MarathonClient;

#[derive(Parser)]
#[command(name = "mesoscaled", about = "Hysteresis-based application autoscaler")]
struct Cli {
    /// Base URL of the orchestrator master.
    #[arg(long, env = "AS_DCOS_MASTER")]
    master: String,

    /// Application to scale.
    #[arg(long, env = "AS_MARATHON_APP")]
    app: String,

    /// Metric(s) that trigger scaling: cpu, mem, sqs, and, or.
    #[arg(long, env = "AS_TRIGGER_MODE")]
    trigger_mode: TriggerMode,

    /// Multiplier applied to the instance count on each scale action.
    #[arg(long, env = "AS_AUTOSCALE_MULTIPLIER")]
    multiplier: f64,

    /// Minimum number of instances to maintain.
    #[arg(long, env = "AS_MIN_INSTANCES")]
    min_instances: u32,

    /// Maximum number of instances that should ever exist.
    #[arg(long, env = "AS_MAX_INSTANCES")]
    max_instances: u32,

    /// Consecutive above-range cycles before scaling up.
    #[arg(long, env = "AS_SCALE_UP_FACTOR")]
    scale_up_factor: u32,

    /// Consecutive below-range cycles before scaling down.
    #[arg(long, env = "AS_COOL_DOWN_FACTOR")]
    cool_down_factor: u32,

    /// Seconds to wait between evaluation cycles.
    #[arg(long, env = "AS_INTERVAL")]
    interval: u64,

    /// Comma-separated lower range bound per tracked dimension.
    #[arg(long, env = "AS_MIN_RANGE", value_delimiter = ',')]
    min_range: Vec<f64>,

    /// Comma-separated upper range bound per tracked dimension.
    #[arg(long, env = "AS_MAX_RANGE", value_delimiter = ',')]
    max_range: Vec<f64>,

    /// Queue metrics endpoint for the sqs trigger mode.
    #[arg(long, env = "AS_QUEUE_URL")]
    queue_url: Option<String>,

    /// Bearer token for orchestrator requests.
    #[arg(long, env = "AS_AUTH_TOKEN")]
    token: Option<String>,

    /// Display debug messages.
    #[arg(short, long, env = "AS_VERBOSE")]
    verbose: bool,
}

impl Cli {
    fn into_config(self) -> (AutoscalerConfig, String, Option<String>) {
        let config = AutoscalerConfig {
            app: AutoscalerConfig::normalize_app(&self.app),
            trigger: self.trigger_mode,
            multiplier: self.multiplier,
            min_instances: self.min_instances,
            max_instances: self.max_instances,
            scale_up_factor: self.scale_up_factor,
            cool_down_factor: self.cool_down_factor,
            interval_secs: self.interval,
            min_range: self.min_range,
            max_range: self.max_range,
            queue: self.queue_url,
        };
        (config, self.master, self.token)
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let default_filter = if cli.verbose {
        "info,mesoscaled=debug,mesoscale_core=debug,mesoscale_modes=debug,mesoscale_controller=debug"
    } else {
        "info"
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter.parse().unwrap()),
        )
        .init();

    let (config, master, token) = cli.into_config();
    config.validate()?;

    let client = Arc::new(MarathonClient::new(&master, token)?);
    let mode = mesoscale_modes::build_mode(&config, client.clone())?;

    info!(
        app = %config.app,
        trigger = config.trigger.as_str(),
        master = %master,
        "mesoscaled starting"
    );

    let control = ControlLoop::new(config, mode, client.clone(), client);

    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            info!("interrupt received, shutting down");
            let _ = shutdown_tx.send(true);
        }
    });

    control.run(shutdown_rx).await;
    Ok(())
}
