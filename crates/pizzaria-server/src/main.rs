use std::net::SocketAddr;
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Context;
use clap::Parser;
use pizzaria_server::telemetry::init_tracing;
use pizzaria_server::{AppState, Config, router};

#[derive(Parser)]
#[command(name = "pizzaria-server")]
#[command(about = "Pizzaria menu back-office", long_about = None)]
struct Cli {
    /// Config file (default: ./pizzaria.toml when present)
    #[arg(long, short = 'c')]
    config: Option<PathBuf>,

    /// Address to listen on, overriding `[server] bind`
    #[arg(long)]
    bind: Option<SocketAddr>,
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let mut config = match Config::load(cli.config.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            print_error(&e);
            return ExitCode::FAILURE;
        }
    };
    if let Some(bind) = cli.bind {
        config.server.bind = bind;
    }

    init_tracing(&config.log);

    if let Err(e) = serve(config).await {
        tracing::error!(error = ?e, "server stopped");
        print_error(e.as_ref());
        return ExitCode::FAILURE;
    }
    ExitCode::SUCCESS
}

async fn serve(config: Config) -> anyhow::Result<()> {
    if config.admin.secret.is_empty() {
        tracing::warn!("no admin password configured; login is disabled");
    }

    let app = router(AppState::in_memory(&config.admin));
    let listener = tokio::net::TcpListener::bind(config.server.bind)
        .await
        .with_context(|| format!("failed to bind to address {}", config.server.bind))?;

    tracing::info!(bind = %config.server.bind, "pizzaria back-office is listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("error running axum server")
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    tracing::info!("shutting down");
}

fn print_error(error: &(dyn std::error::Error + 'static)) {
    eprintln!("error: {error}");

    let mut source = error.source();
    while let Some(cause) = source {
        eprintln!("caused by: {cause}");
        source = cause.source();
    }
}
