//! Liveness endpoint. Answers from the clock alone and never touches the store.

use std::{net::SocketAddr, sync::Arc};

use axum::{extract::State, routing::get, Json, Router};
use chrono::SecondsFormat;
use serde::Serialize;

use notibot_core::{clock::Clock, Result};

#[derive(Debug, Serialize)]
struct Health {
    status: &'static str,
    timestamp: String,
}

pub fn router(clock: Arc<dyn Clock>) -> Router {
    Router::new().route("/", get(health)).with_state(clock)
}

async fn health(State(clock): State<Arc<dyn Clock>>) -> Json<Health> {
    Json(Health {
        status: "Bot is running!",
        timestamp: clock.now().to_rfc3339_opts(SecondsFormat::Millis, true),
    })
}

pub async fn serve(port: u16, clock: Arc<dyn Clock>) -> Result<()> {
    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!(%addr, "health endpoint listening");
    axum::serve(listener, router(clock)).await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use axum::{
        body::Body,
        http::{Request, StatusCode},
    };
    use chrono::{TimeZone, Utc};
    use notibot_core::clock::MockClock;
    use serde_json::json;
    use tower::ServiceExt;

    use super::*;

    #[tokio::test]
    async fn reports_running_with_current_time() {
        let clock = Arc::new(MockClock::new(Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap()));

        let resp = router(clock)
            .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::OK);

        let body = axum::body::to_bytes(resp.into_body(), usize::MAX)
            .await
            .unwrap();
        let v: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(
            v,
            json!({"status": "Bot is running!", "timestamp": "2024-01-01T00:00:00.000Z"})
        );
    }

    #[tokio::test]
    async fn unknown_path_is_404() {
        let clock = Arc::new(MockClock::new(Utc::now()));
        let resp = router(clock)
            .oneshot(Request::builder().uri("/nope").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    }
}
