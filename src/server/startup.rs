//! Process startup: client construction, state wiring and serving.

use std::sync::Arc;

use dioxus_logger::tracing;
use tokio::net::TcpListener;

use crate::server::{
    client::{esi::EsiClient, zkill::ZkillClient},
    config::Config,
    error::Error,
    model::app::AppState,
    router,
    service::cache::Cache,
};

/// Build and configure the ESI client with the configured user agent and base URL
pub fn build_esi_client(config: &Config) -> Result<EsiClient, Error> {
    let esi_client = EsiClient::builder()
        .esi_url(&config.esi_url)
        .datasource(&config.esi_datasource)
        .user_agent(&config.user_agent)
        .timeout(config.lookup.request_timeout)
        .build()?;

    Ok(esi_client)
}

/// Build and configure the zKillboard client with the configured user agent and base URL
pub fn build_zkill_client(config: &Config) -> Result<ZkillClient, Error> {
    let zkill_client = ZkillClient::builder()
        .zkill_url(&config.zkill_url)
        .user_agent(&config.user_agent)
        .timeout(config.lookup.request_timeout)
        .build()?;

    Ok(zkill_client)
}

/// Construct the shared application state with an empty cache
pub fn build_state(config: &Config) -> Result<AppState, Error> {
    Ok(AppState {
        directory: Arc::new(build_esi_client(config)?),
        statistics: Arc::new(build_zkill_client(config)?),
        cache: Cache::new(),
        lookup: Arc::new(config.lookup.clone()),
    })
}

/// Bind the configured address and serve the API until the process exits
pub async fn serve(config: &Config) -> Result<(), Error> {
    let state = build_state(config)?;
    let app = router::routes().with_state(state);

    let address = format!("{}:{}", config.host, config.port);
    let listener = TcpListener::bind(&address).await?;

    tracing::info!("Listening on {}", address);

    axum::serve(listener, app).await?;

    Ok(())
}
