use std::net::SocketAddr;

use anyhow::Context;

use quickex_api::config::ApiConfig;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    quickex_observability::init();

    let config = ApiConfig::from_env().context("invalid configuration")?;
    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));

    let app = quickex_api::app::build_app(config);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;

    let port = listener.local_addr()?.port();
    tracing::info!(port, "Backend listening on http://localhost:{port}");

    axum::serve(listener, app).await.context("server error")?;
    Ok(())
}
