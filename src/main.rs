use anyhow::Context;
use clap::Parser;

use xcom_api_validator::{AppConfig, logging, run_server};

#[derive(Debug, Parser)]
#[command(version, about = "Reference server for the signed exchange API contract")]
struct Args {
    /// Config environment, loads config/<env>.yaml
    #[arg(short, long, default_value = "dev")]
    env: String,

    /// Override server.port
    #[arg(short, long)]
    port: Option<u16>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let mut config = AppConfig::load(&args.env)
        .with_context(|| format!("loading config for env {:?}", args.env))?;
    if let Some(port) = args.port {
        config.server.port = port;
    }

    let _guard = logging::init_logging(&config.logging).context("initialising logging")?;
    tracing::info!(env = %args.env, "Starting xcom_api_validator");

    run_server(&config).await.context("gateway failed")?;
    Ok(())
}
