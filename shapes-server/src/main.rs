use std::net::IpAddr;
use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use shapes_server::{app, listen_addr, port_from_env, AssetConfig};
use tracing_subscriber::EnvFilter;

/// Serve the browser viewer and its vendored scripts. The port comes from `PORT`.
#[derive(Debug, Parser)]
#[command(name = "shapes-server")]
struct Args {
    #[arg(long, default_value = "127.0.0.1")]
    host: IpAddr,

    /// Page, stylesheet and glue script
    #[arg(long, default_value = "client")]
    client_dir: PathBuf,

    /// wasm-pack output for the web crate
    #[arg(long, default_value = "shapes-web/pkg")]
    pkg_dir: PathBuf,

    /// stats.module.js and dat.gui.module.js
    #[arg(long, default_value = "vendor")]
    vendor_dir: PathBuf,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info,tower_http=debug")),
        )
        .init();

    let args = Args::parse();
    let config = AssetConfig {
        client_dir: args.client_dir,
        pkg_dir: args.pkg_dir,
        vendor_dir: args.vendor_dir,
    };
    let address = listen_addr(args.host, port_from_env());

    let listener = tokio::net::TcpListener::bind(address)
        .await
        .with_context(|| format!("failed to bind {address}"))?;
    tracing::info!(%address, client_dir = %config.client_dir.display(), "listening");

    axum::serve(listener, app(&config))
        .await
        .context("server stopped unexpectedly")?;
    Ok(())
}
