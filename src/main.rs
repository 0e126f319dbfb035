use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::sync::Arc;

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use storefront::connector::api::serve;
use storefront::{Commands, Container, ContainerConfig, Router};

#[derive(Parser)]
#[command(name = "storefront")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[arg(short, long, global = true)]
    verbose: bool,

    #[arg(short, long, global = true, default_value = "~/.storefront")]
    data_dir: String,

    /// Keep products and users in memory instead of DuckDB
    #[arg(long, global = true)]
    memory_storage: bool,

    /// Answer searches with an offline scripted model
    #[arg(long, global = true)]
    mock_llm: bool,

    /// JSON file overriding the built-in catalog schema
    #[arg(long, global = true)]
    schema: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(filter)
        .with_target(false)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let data_dir = expand_tilde(&cli.data_dir);
    if !cli.memory_storage {
        std::fs::create_dir_all(&data_dir)?;
    }

    let container = Container::new(ContainerConfig {
        data_dir,
        memory_storage: cli.memory_storage,
        mock_llm: cli.mock_llm,
        schema_path: cli.schema.as_deref().map(expand_tilde),
    })
    .await?;

    match cli.command {
        Commands::Serve { port, public } => {
            let host = if public {
                IpAddr::V4(Ipv4Addr::UNSPECIFIED)
            } else {
                IpAddr::V4(Ipv4Addr::LOCALHOST)
            };
            serve(Arc::new(container), SocketAddr::new(host, port)).await
        }
        command => {
            let output = Router::new(&container).route(command).await?;
            println!("{}", output);
            Ok(())
        }
    }
}

fn expand_tilde(path: &str) -> String {
    if path == "~" || path.starts_with("~/") {
        if let Some(home) = std::env::var_os("HOME") {
            if path == "~" {
                return home.to_string_lossy().to_string();
            }
            return path.replacen("~", &home.to_string_lossy(), 1);
        }
    }
    path.to_string()
}
