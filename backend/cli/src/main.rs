mod api;
mod capture;
mod display;
mod doctor_cmd;
mod progress;
mod runtime;
mod shell;
mod state;

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{bail, Result};
use clap::{Parser, Subcommand};
use tokio::net::TcpListener;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::info;

use medguard_config::{config_dir, config_file_path, load_and_prepare, validate, MedGuardConfig};
use medguard_core::EvidenceBundle;

use api::AppState;
use shell::{EvidenceSource, VerifyOptions};

#[derive(Parser)]
#[command(name = "medguard")]
#[command(about = "MedGuard: AI-assisted medicine authenticity reports")]
#[command(version)]
struct Cli {
    /// Path to config.yaml (defaults to ~/.medguard/config.yaml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Verify a medicine from a packaging photo and a pill photo
    Verify {
        /// Photo of the packaging
        #[arg(long)]
        packaging: PathBuf,
        /// Photo of the pill
        #[arg(long)]
        pill: PathBuf,
        /// Evidence JSON to use instead of the built-in placeholder
        #[arg(long)]
        evidence: Option<PathBuf>,
        /// Save the report to the default file name in the current directory
        #[arg(long)]
        download: bool,
        /// Save the report to this path (implies --download)
        #[arg(short, long)]
        output: Option<PathBuf>,
        /// Skip the progress display
        #[arg(long)]
        no_progress: bool,
        /// Skip the pause before the request
        #[arg(long)]
        no_delay: bool,
        /// Offer download / new verification after each result
        #[arg(short, long)]
        interactive: bool,
    },
    /// Start the HTTP API
    Serve {
        /// Port to bind the HTTP server to
        #[arg(short, long)]
        port: Option<u16>,
        /// Address to bind to
        #[arg(long)]
        bind: Option<String>,
    },
    /// Print the placeholder evidence bundle as JSON
    Evidence,
    /// Check configuration and provider credentials
    Doctor,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let config_path = cli
        .config
        .unwrap_or_else(|| config_file_path(&config_dir()));
    let config = {
        let _bootstrap = medguard_logging::bootstrap_logger();
        load_and_prepare(&config_path).await?
    };

    medguard_logging::init_logger(config.log_dir(), config.log_level());

    match cli.command {
        Commands::Verify {
            packaging,
            pill,
            evidence,
            download,
            output,
            no_progress,
            no_delay,
            interactive,
        } => {
            ensure_valid(&config)?;
            let color = display::supports_color();
            let download = (download || output.is_some()).then(|| {
                display::download_target(output.as_deref(), config.download_file_name())
            });
            let options = VerifyOptions {
                evidence: EvidenceSource::load(evidence.as_deref()).await?,
                show_progress: config.show_progress() && !no_progress,
                color,
                download,
                download_file_name: config.download_file_name().to_string(),
                interactive,
            };

            let mut orchestrator = runtime::build_orchestrator(&config)?;
            if no_delay {
                orchestrator = orchestrator.with_delay(Duration::ZERO);
            }

            let mut stdin = std::io::stdin().lock();
            let ok = shell::run(&orchestrator, packaging, pill, options, &mut stdin).await?;
            if !ok {
                std::process::exit(1);
            }
        }
        Commands::Serve { port, bind } => {
            ensure_valid(&config)?;
            run_server(&config, bind, port).await?;
        }
        Commands::Evidence => {
            println!(
                "{}",
                serde_json::to_string_pretty(&EvidenceBundle::placeholder())?
            );
        }
        Commands::Doctor => {
            if !doctor_cmd::run(&config, &config_path).await? {
                std::process::exit(1);
            }
        }
    }

    Ok(())
}

/// Config problems were already logged while loading; refuse to go on with errors.
fn ensure_valid(config: &MedGuardConfig) -> Result<()> {
    let report = validate(config);
    if !report.is_valid() {
        bail!(
            "configuration has {} error(s); run `medguard doctor` for details",
            report.errors.len()
        );
    }
    Ok(())
}

async fn run_server(
    config: &MedGuardConfig,
    bind: Option<String>,
    port: Option<u16>,
) -> Result<()> {
    let bind = bind.unwrap_or_else(|| config.bind_address().to_string());
    let port = port.unwrap_or(config.port());

    info!(port, bind = %bind, provider = %config.provider_kind(), "Starting MedGuard API");

    let app_state = Arc::new(AppState {
        orchestrator: Arc::new(runtime::build_orchestrator(config)?),
    });

    let app = api::build_router(app_state)
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http());
    let addr = format!("{bind}:{port}");

    let listener = TcpListener::bind(&addr).await?;
    info!(addr = %addr, "HTTP API listening");

    axum::serve(listener, app).await?;

    Ok(())
}
