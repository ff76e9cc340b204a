//! chatrelayd - real-time chat relay over WebSocket.
//!
//! Clients register a display name and exchange chat lines, presence and
//! typing signals, which the relay fans out to every other connection.

mod config;
mod error;
mod handlers;
mod http;
mod metrics;
mod network;
mod state;
mod telemetry;

use crate::config::Config;
use crate::handlers::{CommandInterpreter, TextTransformer};
use crate::network::Gateway;
use crate::state::ChatActor;
use rand::SeedableRng;
use rand::rngs::StdRng;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(true)
        .init();

    // Load configuration; with no path every setting takes its default.
    let mut config = match std::env::args().nth(1) {
        Some(path) => Config::load(&path).map_err(|e| {
            error!(path = %path, error = %e, "Failed to load config");
            e
        })?,
        None => Config::default(),
    };
    config.apply_port_override(std::env::var("PORT").ok().as_deref())?;

    if let Err(errors) = config::validate(&config) {
        for e in &errors {
            error!(error = %e, "Invalid configuration");
        }
        anyhow::bail!("{} configuration error(s)", errors.len());
    }

    info!(server = %config.server.name, "Starting chatrelayd");

    // Prometheus metrics are optional.
    // Convention: metrics_port = 0 disables the HTTP endpoint.
    match config.server.metrics_port {
        Some(port) if port != 0 => {
            metrics::init();
            info!("Metrics initialized");

            tokio::spawn(async move {
                http::run_http_server(port).await;
            });
            info!(port, "Prometheus HTTP server started");
        }
        _ => info!("Metrics disabled"),
    }

    let interpreter = CommandInterpreter::new(TextTransformer::new(
        config.chat.misspell_aggressiveness,
    ));
    let chat = ChatActor::new(interpreter, StdRng::from_entropy())
        .spawn(config.limits.chat_mailbox_capacity);

    let gateway = Gateway::bind(&config.listen, config.limits.clone(), chat).await?;
    info!(port = gateway.local_addr()?.port(), "Server listening at port");

    gateway.run().await?;

    Ok(())
}
