use std::time::Duration;

use clap::{Parser, Subcommand};
use tracing::{error, info};
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

use pulse_sim::api::run_http_server;
use pulse_sim::config::{DEFAULT_ALLOWED_ORIGINS, DEFAULT_HOST, DEFAULT_PORT, ServerConfig};
use pulse_sim::core::{
    DEFAULT_QUBITS, DEFAULT_STRENGTH, DEFAULT_WORK_DELAY, ModelKind, SimulationInputs, WorkDelay,
    run_simulation, simulation_rng,
};

#[derive(Parser, Debug)]
#[command(
    name = "pulse-sim",
    version,
    about = "Mock pulse optimisation backend (synthetic pulse, Bloch trajectory, training metrics)"
)]
struct Cli {
    #[arg(
        long,
        global = true,
        env = "PULSE_SIM_LOG",
        default_value = "info",
        help = "Log level when RUST_LOG is unset (trace, debug, info, warn, error)"
    )]
    log_level: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Serve the landing page and the /simulate endpoint
    Serve {
        #[arg(long, default_value = DEFAULT_HOST)]
        host: String,
        #[arg(long, env = "PULSE_SIM_PORT", default_value_t = DEFAULT_PORT)]
        port: u16,
        #[arg(
            long = "allow-origin",
            help = "Origin allowed to call /simulate cross-origin; repeat for several. Defaults to the local dev servers on ports 5500/5501"
        )]
        allowed_origins: Vec<String>,
        #[arg(
            long,
            default_value_t = DEFAULT_WORK_DELAY.as_millis() as u64,
            help = "Artificial processing delay per simulation in milliseconds"
        )]
        work_delay_ms: u64,
        #[arg(long, help = "Seed used for every request that does not send its own")]
        seed: Option<u64>,
    },
    /// Run one simulation offline and print the result as JSON
    Simulate {
        #[arg(long, default_value_t = DEFAULT_QUBITS, allow_negative_numbers = true)]
        qubits: i32,
        #[arg(long, default_value_t = DEFAULT_STRENGTH, allow_negative_numbers = true)]
        strength: f64,
        #[arg(long, default_value = "GCN", help = "MLP, \"MLP (Set)\", GCN or GAT")]
        model: String,
        #[arg(long)]
        seed: Option<u64>,
    },
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    init_logging(&cli.log_level);

    match cli.command {
        Command::Serve {
            host,
            port,
            allowed_origins,
            work_delay_ms,
            seed,
        } => {
            let allowed_origins = if allowed_origins.is_empty() {
                DEFAULT_ALLOWED_ORIGINS
                    .iter()
                    .map(|origin| origin.to_string())
                    .collect()
            } else {
                allowed_origins
            };
            let config = ServerConfig {
                host,
                port,
                allowed_origins,
                work_delay: WorkDelay::new(Duration::from_millis(work_delay_ms)),
                seed,
            };
            info!("Local access: http://127.0.0.1:{port}/");
            if let Err(e) = run_http_server(config).await {
                error!(error = %e, "Server error");
                std::process::exit(1);
            }
        }
        Command::Simulate {
            qubits,
            strength,
            model,
            seed,
        } => {
            let inputs = SimulationInputs {
                qubits,
                strength,
                model: ModelKind::from_label(&model),
            };
            let result = run_simulation(&inputs, &mut simulation_rng(seed));
            if !result.is_finite() {
                error!(qubits, strength, "Inputs produce non-finite results");
                std::process::exit(1);
            }
            match serde_json::to_string_pretty(&result) {
                Ok(json) => println!("{json}"),
                Err(e) => {
                    error!(error = %e, "Failed to serialize result");
                    std::process::exit(1);
                }
            }
        }
    }
}

fn init_logging(level: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(true).with_writer(std::io::stderr))
        .init();
}
