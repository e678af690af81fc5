//! Example catalog CLI.
//!
//! Builds a request from the command line and dispatches it to a named
//! handler. Attribute values are passed as strings, the way they would arrive
//! from a query string, and are coerced to the parameter types.
//!
//! # Usage
//!
//! ```bash
//! catalog <handler> [name=value ...]
//! ```
//!
//! # Example
//!
//! ```bash
//! catalog show product_id=2
//! catalog list max_price=10 limit=2
//! INVOKABLE_CONFIG=demo.json catalog greet name=ada
//! ```

use example::{DemoConfig, DemoError, LogConfig, LogFormat, build_registry, build_request, parse_attributes};
use std::io::Write;
use std::process::ExitCode;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

fn main() -> ExitCode {
    let _ = dotenvy::dotenv();

    let config = match DemoConfig::from_env() {
        Ok(config) => config,
        Err(err) => {
            init_tracing(&LogConfig::default());
            tracing::error!(error = %err, "invalid configuration");
            return ExitCode::FAILURE;
        }
    };
    init_tracing(&config.log);

    match run(&config) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            tracing::error!(error = %err, "request failed");
            ExitCode::FAILURE
        }
    }
}

fn run(config: &DemoConfig) -> Result<(), DemoError> {
    let registry = build_registry(config);

    let mut args = std::env::args().skip(1);
    let Some(name) = args.next() else {
        return Err(DemoError::Usage {
            handlers: registry.names().join(", "),
        });
    };
    let attributes = parse_attributes(args)?;
    let request = Arc::new(build_request(&name, attributes));

    let response = registry.handle(&name, request)?;
    tracing::info!(handler = %name, status = response.status(), "request handled");

    let mut out = std::io::stdout().lock();
    writeln!(out, "{}", response.body())?;
    Ok(())
}

fn init_tracing(config: &LogConfig) {
    let directives = config
        .filter
        .clone()
        .or_else(|| std::env::var("RUST_LOG").ok());
    let env_filter = match directives {
        Some(filter) => {
            EnvFilter::try_new(filter).unwrap_or_else(|_| EnvFilter::new(config.level.as_str()))
        }
        None => EnvFilter::new(config.level.as_str()),
    };

    // try_init().ok() ignores errors if already initialized
    match config.format {
        LogFormat::Pretty => {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(tracing_subscriber::fmt::layer().pretty().with_writer(std::io::stderr))
                .try_init()
                .ok();
        }
        LogFormat::Compact => {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(tracing_subscriber::fmt::layer().compact().with_writer(std::io::stderr))
                .try_init()
                .ok();
        }
        LogFormat::Json => {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr))
                .try_init()
                .ok();
        }
    }
}
