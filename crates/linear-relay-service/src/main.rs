//! # Linear-Relay Service
//!
//! Binary entry point for the Linear-Relay HTTP service.
//!
//! This executable:
//! - Loads configuration from environment and files
//! - Initializes logging
//! - Builds the target registry from `WEBHOOK_*` environment entries
//! - Starts the HTTP server from linear-relay-api

use linear_relay_api::{
    start_server, HttpNotificationSender, ServiceConfig, ServiceError, TargetRegistry,
};
use std::sync::Arc;
use tracing::{error, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                "linear_relay_service=info,linear_relay_api=info,tower_http=debug".into()
            }),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Linear-Relay Service");

    // -------------------------------------------------------------------------
    // Load configuration
    //
    // Sources (applied in order — later sources override earlier ones):
    //  1. /etc/linear-relay/service.yaml     — system-wide defaults
    //  2. ./config/service.yaml              — deployment-local override
    //  3. Path given by RELAY_CONFIG_FILE env — operator-specified file
    //  4. Environment variables prefixed RELAY__ (double-underscore separator)
    //     e.g. RELAY__SERVER__PORT=9090 sets server.port = 9090
    //  5. The flat PORT variable, kept as the final override so
    //     platform-injected ports keep working.
    //
    // All service configuration fields carry serde defaults, so absent files
    // or an entirely unconfigured environment produces a valid service config
    // with built-in defaults.  A malformed file or a variable that cannot be
    // coerced to the correct type IS a hard error because it indicates
    // deliberate-but-broken operator configuration.
    // -------------------------------------------------------------------------
    let mut config_builder = config::Config::builder()
        .add_source(
            config::File::with_name("/etc/linear-relay/service")
                .required(false)
                .format(config::FileFormat::Yaml),
        )
        .add_source(
            config::File::with_name("config/service")
                .required(false)
                .format(config::FileFormat::Yaml),
        );

    // Optional explicit path supplied by the operator.
    if let Ok(explicit_path) = std::env::var("RELAY_CONFIG_FILE") {
        if !explicit_path.is_empty() {
            config_builder = config_builder.add_source(
                config::File::with_name(&explicit_path)
                    .required(true)
                    .format(config::FileFormat::Yaml),
            );
            info!(path = %explicit_path, "Loading configuration from explicit path");
        }
    }

    let config = match config_builder
        .add_source(config::Environment::with_prefix("RELAY").separator("__"))
        .build()
    {
        Ok(cfg) => cfg,
        Err(e) => {
            error!(error = %e, "Failed to build configuration; aborting");
            std::process::exit(3);
        }
    };

    let mut service_config: ServiceConfig = match config.try_deserialize() {
        Ok(sc) => sc,
        Err(e) => {
            error!(
                error = %e,
                "Could not deserialize service configuration; aborting. \
                 Fix the configuration and restart."
            );
            std::process::exit(3);
        }
    };

    if let Ok(port) = std::env::var("PORT") {
        match port.parse::<u16>() {
            Ok(port) => service_config.server.port = port,
            Err(_) => {
                error!(value = %port, "PORT is not a valid port number; aborting");
                std::process::exit(3);
            }
        }
    }

    if let Err(e) = service_config.validate() {
        error!(error = %e, "Service configuration is invalid; aborting");
        std::process::exit(3);
    }

    // -------------------------------------------------------------------------
    // Build the target registry
    //
    // Every WEBHOOK_<NAME>=<url> environment entry becomes a routing target
    // reachable at POST /linear/<name>.  The registry is immutable after this
    // point; changing targets means restarting the process.
    // -------------------------------------------------------------------------
    let targets = TargetRegistry::from_env();

    if targets.is_empty() {
        warn!(
            "No WEBHOOK_* targets configured; every relay request will be \
             rejected with an unknown-target error"
        );
    } else {
        // Names only; the destination URLs embed webhook secrets.
        info!(targets = ?targets.names(), "Registered webhook targets from environment");
    }

    let sender = match HttpNotificationSender::new(&service_config.delivery) {
        Ok(sender) => Arc::new(sender),
        Err(e) => {
            error!(error = %e, "Failed to construct outbound HTTP client; aborting");
            std::process::exit(2);
        }
    };

    info!(
        host = %service_config.server.host,
        port = service_config.server.port,
        "Starting HTTP server"
    );

    // Start the server
    if let Err(e) = start_server(service_config, targets, sender).await {
        error!("Failed to start server: {}", e);

        let exit_code = match e {
            ServiceError::BindFailed { .. } => 1,
            ServiceError::ServerFailed { .. } => 2,
            ServiceError::Configuration(_) => 3,
        };

        std::process::exit(exit_code);
    }

    Ok(())
}
