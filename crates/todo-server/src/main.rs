use std::net::SocketAddr;

use anyhow::{Context, Result};
use clap::Parser;
use tokio::net::TcpListener;
use tracing::info;

#[derive(Debug, Parser)]
#[command(name = "todo-server", about = "In-memory TODO API server")]
struct Cli {
    /// Address to bind
    #[arg(long, env = "TODO_BIND", default_value = "127.0.0.1")]
    bind: String,

    /// Port to listen on
    #[arg(long, env = "TODO_PORT", default_value = "8000")]
    port: u16,

    /// Tasks per page when the client does not ask for a size
    #[arg(long, env = "TODO_PAGE_SIZE", default_value_t = todo_server::DEFAULT_PAGE_SIZE)]
    page_size: u64,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    if cli.page_size == 0 {
        anyhow::bail!("--page-size must be at least 1");
    }

    let ip = cli
        .bind
        .parse()
        .with_context(|| format!("invalid bind address {:?}", cli.bind))?;
    let addr = SocketAddr::new(ip, cli.port);

    let listener = TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;
    info!("todo-server listening on http://{addr} (page size {})", cli.page_size);

    todo_server::serve(listener, cli.page_size).await
}
