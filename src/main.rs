use std::{net::Ipv4Addr, path::PathBuf};

use clap::{Parser, ValueEnum};
use log::{info, warn};
use poem::listener::TcpListener;

mod api;
mod database;
mod ip;
mod lookup;
mod record;
mod shaper;

use crate::{
    database::{DatabaseAccessor, MaxmindOpener},
    lookup::LookupService,
};

#[derive(Debug, Parser)]
struct Cli {
    #[clap(long, env, default_value = "3000", help = "Port to listen on")]
    port: u16,
    #[clap(
        long,
        env,
        default_value = "./app/bin/GeoLite2-City.mmdb",
        help = "Path to the MaxMind GeoIP2/GeoLite2 City database"
    )]
    geoip_db_path: PathBuf,
    #[clap(
        long,
        env,
        value_enum,
        default_value = "development",
        help = "Environment the service runs in"
    )]
    app_env: AppEnv,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum AppEnv {
    Development,
    Production,
    Test,
}

impl AppEnv {
    /// Log filter used when `RUST_LOG` isn't set.
    fn default_log_filter(&self) -> &'static str {
        match self {
            Self::Development => "geoipd=debug,poem=debug",
            Self::Production => "geoipd=info,poem=info",
            Self::Test => "geoipd=warn,poem=warn",
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // A missing .env file is fine
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();

    env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or(cli.app_env.default_log_filter()),
    )
    .init();

    if !cli.geoip_db_path.exists() {
        warn!(
            "GeoIP database not found at {}; lookups will fail until it is in place",
            cli.geoip_db_path.display()
        );
    }

    let accessor = DatabaseAccessor::new(Some(cli.geoip_db_path), MaxmindOpener);
    let app = api::build_app(LookupService::new(accessor));

    let server = poem::Server::new(TcpListener::bind((Ipv4Addr::new(0, 0, 0, 0), cli.port)));
    info!("Listening on 0.0.0.0:{} ({:?})", cli.port, cli.app_env);

    server
        .run_with_graceful_shutdown(app, shutdown_signal(), None)
        .await?;

    Ok(())
}

#[cfg(unix)]
async fn shutdown_signal() {
    match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
        Ok(mut signal) => {
            let _ = signal.recv().await;
        }
        Err(err) => {
            warn!("Unable to listen for SIGTERM, waiting for ctrl-c: {}", err);
            let _ = tokio::signal::ctrl_c().await;
        }
    }
}

#[cfg(not(unix))]
async fn shutdown_signal() {
    let _ = tokio::signal::ctrl_c().await;
}
