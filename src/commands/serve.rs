use anyhow::{Context, Result};
use tower_http::trace::TraceLayer;

use csvcal_core::Settings;

use crate::routes;
use crate::state::AppState;

pub async fn run(settings: Settings) -> Result<()> {
    let addr = settings.bind_address();
    let state = AppState::new(settings)?;

    let app = routes::router(state).layer(TraceLayer::new_for_http());

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Could not bind {addr}"))?;
    tracing::info!("csvcal listening on http://{}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
