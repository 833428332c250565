use rmcp::{ServiceExt, transport::stdio};
use rollpoint_desk::{config::Config, router::Router, server::RollPointServer};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // stdout carries the protocol, so logs go to stderr without colour
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("warn".parse()?))
        .with_writer(std::io::stderr)
        .with_ansi(false)
        .init();

    let cfg = Config::load()?;
    let server = RollPointServer::new(cfg).await?;
    let router = Router(server);

    let svc = router.serve(stdio()).await?;
    svc.waiting().await?;
    Ok(())
}
