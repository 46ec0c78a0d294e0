use clap::Parser;
use miette::{IntoDiagnostic, Result};
use securecard::application::checkout::CheckoutService;
use securecard::config::ProcessorConfig;
use securecard::infrastructure::verifone::VerifoneClient;
use securecard::interfaces::http::views::Views;
use securecard::interfaces::http::{AppState, router};
use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Processor config file (TOML)
    #[arg(long, short)]
    config: PathBuf,

    /// Address to listen on
    #[arg(long, default_value = "0.0.0.0")]
    bind: IpAddr,

    /// Port to listen on
    #[arg(long, env = "PORT", default_value_t = 8080)]
    port: u16,

    /// Directory served under /public/static
    #[arg(long, default_value = "static")]
    static_dir: PathBuf,

    /// Log filter used when RUST_LOG is not set
    #[arg(long, default_value = "info")]
    log_level: String,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&cli.log_level));
    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(filter)
        .init();

    let config = Arc::new(ProcessorConfig::from_file(&cli.config).into_diagnostic()?);
    let processor = VerifoneClient::new(Arc::clone(&config)).into_diagnostic()?;
    let checkout = CheckoutService::new(Box::new(processor), config);
    let views = Views::new().into_diagnostic()?;
    let app = router(AppState::new(checkout, views), &cli.static_dir);

    let listener = tokio::net::TcpListener::bind(SocketAddr::new(cli.bind, cli.port))
        .await
        .into_diagnostic()?;
    info!(
        "Server running at http://{}",
        listener.local_addr().into_diagnostic()?
    );

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .into_diagnostic()?;

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!(error = %e, "listening for shutdown signal failed");
        std::future::pending::<()>().await;
    }
    info!("Shutting down");
}
