use pricegate_infra::AppConfig;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    pricegate_observability::init();

    let config = AppConfig::from_env()?;
    tracing::info!(
        review_threshold = %config.policy.review_threshold(),
        creation_cap = %config.policy.creation_cap(),
        max_increase_ratio = %config.policy.max_increase_ratio(),
        "price policy loaded"
    );

    let app = pricegate_api::app::build_app(&config);

    let listener = tokio::net::TcpListener::bind(config.bind_addr).await?;
    tracing::info!("listening on {}", listener.local_addr()?);

    axum::serve(listener, app).await?;
    Ok(())
}
