//! navproxy: a forwarding gateway that keeps navigation inside itself.
//!
//! # Architecture Overview
//!
//! ```text
//!                  ┌──────────────────────────────────────────────────────┐
//!                  │                      NAVPROXY                        │
//!   Client         │  ┌──────────┐   ┌──────────┐   ┌───────────────┐     │
//!   ───────────────┼─▶│ security │──▶│  proxy   │──▶│   upstream    │─────┼──▶ Origin
//!                  │  │ key gate │   │ target + │   │ client        │     │
//!                  │  └──────────┘   │ classify │◀──│ (redirects)   │◀────┼───
//!                  │                 └────┬─────┘   └───────────────┘     │
//!                  │           html       │      other                     │
//!                  │        ┌─────────────┴──────────┐                     │
//!                  │        ▼                        ▼                     │
//!                  │  ┌──────────┐            ┌────────────┐               │
//!   ◀──────────────┼──│ rewrite  │            │ byte stream│───────────────┼──▶ Client
//!                  │  │ + banner │            │ + headers  │               │
//!                  │  └──────────┘            └────────────┘               │
//!                  └──────────────────────────────────────────────────────┘
//! ```

use std::net::SocketAddr;
use std::path::PathBuf;

use clap::Parser;
use tokio::net::TcpListener;

use navproxy::config::{read_config, validate_config, ConfigError, GatewayConfig};
use navproxy::http::GatewayServer;
use navproxy::lifecycle::{signals::shutdown_signal, Shutdown};
use navproxy::observability::{logging, metrics};

#[derive(Parser, Debug)]
#[command(name = "navproxy")]
#[command(about = "Forwarding HTTP gateway with HTML link rewriting", long_about = None)]
struct Cli {
    /// TOML configuration file.
    #[arg(short, long, env = "NAVPROXY_CONFIG")]
    config: Option<PathBuf>,

    /// Bind address, e.g. 0.0.0.0:3000.
    #[arg(long)]
    bind: Option<String>,

    /// Port to listen on; replaces the port of the bind address.
    #[arg(short, long, env = "PORT")]
    port: Option<u16>,

    /// Shared secret required as `key` or `x-api-key`.
    #[arg(short, long, env = "PROXY_KEY", hide_env_values = true)]
    key: Option<String>,
}

impl Cli {
    fn into_config(self) -> Result<GatewayConfig, ConfigError> {
        let mut config = read_config(self.config.as_deref())?;

        if let Some(bind) = self.bind {
            config.listener.bind_address = bind;
        }
        if let Some(port) = self.port {
            if let Ok(mut addr) = config.listener.bind_address.parse::<SocketAddr>() {
                addr.set_port(port);
                config.listener.bind_address = addr.to_string();
            }
        }
        if let Some(key) = self.key {
            config.access.key = Some(key);
        }

        validate_config(&config).map_err(ConfigError::Validation)?;
        Ok(config)
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = Cli::parse().into_config()?;

    logging::init_logging(&config.observability);
    tracing::info!("navproxy v{} starting", env!("CARGO_PKG_VERSION"));

    tracing::info!(
        bind_address = %config.listener.bind_address,
        access_key_required = config.access.secret().is_some(),
        upstream_timeout_secs = config.timeouts.upstream_secs,
        max_html_bytes = config.upstream.max_html_bytes,
        "Configuration loaded"
    );

    if config.observability.metrics_enabled {
        let addr: SocketAddr = config.observability.metrics_address.parse()?;
        metrics::init_metrics(addr)?;
    }

    let listener = TcpListener::bind(&config.listener.bind_address).await?;
    tracing::info!(address = %listener.local_addr()?, "Listening for connections");

    let shutdown = Shutdown::new();
    let server = GatewayServer::new(config)?;
    let server_shutdown = shutdown.subscribe();

    tokio::spawn(async move {
        shutdown_signal().await;
        shutdown.trigger();
    });

    server.run(listener, server_shutdown).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
