//! Threadline CLI and REST API entry point.
//!
//! Binary name: `threadline`
//!
//! Parses CLI arguments, initializes tracing, database and services, then
//! dispatches to the appropriate command handler or starts the REST API
//! server.

mod cli;
mod http;
mod state;

use clap::Parser;
use clap_complete::generate;
use threadline_observe::tracing_setup::{
    DEFAULT_FILTER, LogFormat, TracingOptions, init_tracing, shutdown_tracing,
};

use cli::{ChatCommand, Cli, Commands, UserCommand};
use state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Shell completions don't need tracing or app state
    if let Commands::Completions { shell } = &cli.command {
        let mut cmd = <Cli as clap::CommandFactory>::command();
        generate(*shell, &mut cmd, "threadline", &mut std::io::stdout());
        return Ok(());
    }

    let serving = matches!(cli.command, Commands::Serve { .. });
    let (otel, format) = match &cli.command {
        Commands::Serve { otel, log_json, .. } => (
            *otel,
            if *log_json { LogFormat::Json } else { LogFormat::Pretty },
        ),
        _ => (false, LogFormat::Pretty),
    };
    let default_filter = match cli.verbose {
        0 if cli.quiet => "error",
        0 if serving => DEFAULT_FILTER,
        0 => "warn",
        1 => "debug,sqlx=warn",
        _ => "trace",
    };
    init_tracing(TracingOptions {
        format,
        otel,
        default_filter,
    })
    .map_err(|e| anyhow::anyhow!("failed to initialize tracing: {e}"))?;

    let state = AppState::init().await?;

    let result = run(cli, state).await;
    shutdown_tracing();
    result
}

async fn run(cli: Cli, state: AppState) -> anyhow::Result<()> {
    match cli.command {
        Commands::Serve { port, host, .. } => {
            let host = host.unwrap_or_else(|| state.config.host.clone());
            let port = port.unwrap_or(state.config.port);
            let addr = format!("{host}:{port}");
            let listener = tokio::net::TcpListener::bind(&addr).await?;

            tracing::info!(
                %addr,
                data_dir = %state.data_dir.display(),
                default_model = %state.config.default_model,
                models = ?state.orchestrator.router().available_models(),
                "Threadline API listening"
            );
            if !cli.quiet && !cli.json {
                println!(
                    "  {} Threadline API listening on {}",
                    console::style("⚡").bold(),
                    console::style(format!("http://{addr}")).cyan()
                );
                println!("  {}", console::style("Press Ctrl+C to stop").dim());
            }

            let shutdown = state.shutdown.clone();
            let router = http::router::build_router(state);

            axum::serve(listener, router)
                .with_graceful_shutdown(async move {
                    shutdown_signal().await;
                    // Abort in-flight provider calls
                    shutdown.cancel();
                })
                .await?;

            tracing::info!("Server stopped");
        }

        Commands::User { action } => match action {
            UserCommand::Create { email } => {
                cli::user::create_user(&state, &email, cli.json).await?;
            }
            UserCommand::Show { email } => {
                cli::user::show_user(&state, &email, cli.json).await?;
            }
        },

        Commands::Chat { action } => match action {
            ChatCommand::Send {
                email,
                message,
                model,
            } => {
                cli::chat::send(&state, &email, message, model, cli.json).await?;
            }
            ChatCommand::List { email } => {
                cli::chat::list(&state, &email, cli.json).await?;
            }
            ChatCommand::History { email, id } => {
                cli::chat::history(&state, &email, &id, cli.json).await?;
            }
            ChatCommand::Delete { email, id, force } => {
                cli::chat::delete(&state, &email, &id, force, cli.json).await?;
            }
        },

        Commands::Completions { .. } => {}
    }

    Ok(())
}

/// Wait for Ctrl+C or SIGTERM for graceful shutdown.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
