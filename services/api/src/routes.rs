use crate::infra::AppState;
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::Extension;
use axum::Json;
use foodbridge::donations::{
    donation_router, ActorDirectory, DonationEngine, DonationStore, TransitionJournal,
};
use serde_json::json;
use std::sync::Arc;

pub(crate) fn with_donation_routes<S, D, J>(
    engine: Arc<DonationEngine<S, D, J>>,
) -> axum::Router
where
    S: DonationStore + 'static,
    D: ActorDirectory + 'static,
    J: TransitionJournal + 'static,
{
    donation_router(engine)
        .route("/health", axum::routing::get(healthcheck))
        .route("/ready", axum::routing::get(readiness_endpoint))
        .route("/metrics", axum::routing::get(metrics_endpoint))
}

pub(crate) async fn healthcheck() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

pub(crate) async fn readiness_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    let ready = state.readiness.load(std::sync::atomic::Ordering::Relaxed);
    let status = if ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    let payload = if ready {
        json!({ "status": "ready" })
    } else {
        json!({ "status": "initializing" })
    };

    (status, Json(payload))
}

pub(crate) async fn metrics_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        state.metrics.render(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infra::{seeded_directory, InMemoryDonationStore, InMemoryTransitionJournal};
    use axum::body::Body;
    use axum::http::Request;
    use tower::ServiceExt;

    fn router() -> axum::Router {
        let engine = Arc::new(DonationEngine::new(
            Arc::new(InMemoryDonationStore::default()),
            Arc::new(seeded_directory()),
            Arc::new(InMemoryTransitionJournal::default()),
        ));
        with_donation_routes(engine)
    }

    #[tokio::test]
    async fn healthcheck_reports_ok() {
        let response = router()
            .oneshot(
                Request::get("/health")
                    .body(Body::empty())
                    .expect("build request"),
            )
            .await
            .expect("route executes");

        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn donation_routes_require_an_actor() {
        let response = router()
            .oneshot(
                Request::get("/api/v1/donations")
                    .body(Body::empty())
                    .expect("build request"),
            )
            .await
            .expect("route executes");

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }
}
