use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Router,
};
use chrono::Utc;
use serde::Deserialize;
use serde_json::json;

use super::domain::{ActorId, DonationDraft, DonationId};
use super::engine::{DonationEngine, DonationError};
use super::store::{ActorDirectory, DonationStore, TransitionJournal};

/// Header carrying the authenticated actor id. Authentication itself lives in
/// an upstream collaborator; this router only resolves the id to an actor.
pub const ACTOR_HEADER: &str = "x-actor-id";

const HISTORY_LIMIT: usize = 50;

/// Router builder exposing the donation lifecycle over HTTP.
pub fn donation_router<S, D, J>(engine: Arc<DonationEngine<S, D, J>>) -> Router
where
    S: DonationStore + 'static,
    D: ActorDirectory + 'static,
    J: TransitionJournal + 'static,
{
    Router::new()
        .route(
            "/api/v1/donations",
            post(create_handler::<S, D, J>).get(feed_handler::<S, D, J>),
        )
        .route(
            "/api/v1/donations/:donation_id/accept",
            post(claim_handler::<S, D, J>),
        )
        .route(
            "/api/v1/donations/:donation_id/assign",
            post(assign_handler::<S, D, J>),
        )
        .route("/api/v1/dishes", post(dish_handler::<S, D, J>))
        .route("/api/v1/dashboard/stats", get(stats_handler::<S, D, J>))
        .route(
            "/api/v1/dashboard/history",
            get(history_handler::<S, D, J>),
        )
        .with_state(engine)
}

#[derive(Debug, Deserialize)]
pub(crate) struct AssignRequest {
    pub(crate) cook_id: ActorId,
}

/// Body for the dish-shaped assign alias: a delivery pairs one donation with
/// one cook.
#[derive(Debug, Deserialize)]
pub(crate) struct DishRequest {
    pub(crate) donation_id: DonationId,
    pub(crate) cook_id: ActorId,
}

pub(crate) async fn create_handler<S, D, J>(
    State(engine): State<Arc<DonationEngine<S, D, J>>>,
    headers: HeaderMap,
    axum::Json(draft): axum::Json<DonationDraft>,
) -> Response
where
    S: DonationStore + 'static,
    D: ActorDirectory + 'static,
    J: TransitionJournal + 'static,
{
    let actor = match current_actor(&engine, &headers) {
        Ok(actor) => actor,
        Err(response) => return response,
    };

    match engine.create(&actor, draft) {
        Ok(record) => {
            let view = record.feed_view(Utc::now().date_naive());
            (StatusCode::CREATED, axum::Json(view)).into_response()
        }
        Err(err) => error_response(err),
    }
}

pub(crate) async fn feed_handler<S, D, J>(
    State(engine): State<Arc<DonationEngine<S, D, J>>>,
    headers: HeaderMap,
) -> Response
where
    S: DonationStore + 'static,
    D: ActorDirectory + 'static,
    J: TransitionJournal + 'static,
{
    let actor = match current_actor(&engine, &headers) {
        Ok(actor) => actor,
        Err(response) => return response,
    };

    match engine.feed(&actor) {
        Ok(records) => {
            let today = Utc::now().date_naive();
            let views: Vec<_> = records.iter().map(|record| record.feed_view(today)).collect();
            (StatusCode::OK, axum::Json(views)).into_response()
        }
        Err(err) => error_response(err),
    }
}

pub(crate) async fn claim_handler<S, D, J>(
    State(engine): State<Arc<DonationEngine<S, D, J>>>,
    headers: HeaderMap,
    Path(donation_id): Path<String>,
) -> Response
where
    S: DonationStore + 'static,
    D: ActorDirectory + 'static,
    J: TransitionJournal + 'static,
{
    let actor = match current_actor(&engine, &headers) {
        Ok(actor) => actor,
        Err(response) => return response,
    };

    match engine.claim(&actor, &DonationId(donation_id)) {
        Ok(record) => {
            let view = record.feed_view(Utc::now().date_naive());
            (StatusCode::OK, axum::Json(view)).into_response()
        }
        Err(err) => error_response(err),
    }
}

pub(crate) async fn assign_handler<S, D, J>(
    State(engine): State<Arc<DonationEngine<S, D, J>>>,
    headers: HeaderMap,
    Path(donation_id): Path<String>,
    axum::Json(request): axum::Json<AssignRequest>,
) -> Response
where
    S: DonationStore + 'static,
    D: ActorDirectory + 'static,
    J: TransitionJournal + 'static,
{
    let actor = match current_actor(&engine, &headers) {
        Ok(actor) => actor,
        Err(response) => return response,
    };

    match engine.assign(&actor, &DonationId(donation_id), &request.cook_id) {
        Ok(record) => {
            let view = record.feed_view(Utc::now().date_naive());
            (StatusCode::OK, axum::Json(view)).into_response()
        }
        Err(err) => error_response(err),
    }
}

pub(crate) async fn dish_handler<S, D, J>(
    State(engine): State<Arc<DonationEngine<S, D, J>>>,
    headers: HeaderMap,
    axum::Json(request): axum::Json<DishRequest>,
) -> Response
where
    S: DonationStore + 'static,
    D: ActorDirectory + 'static,
    J: TransitionJournal + 'static,
{
    let actor = match current_actor(&engine, &headers) {
        Ok(actor) => actor,
        Err(response) => return response,
    };

    match engine.assign(&actor, &request.donation_id, &request.cook_id) {
        Ok(record) => {
            let view = record.feed_view(Utc::now().date_naive());
            (StatusCode::CREATED, axum::Json(view)).into_response()
        }
        Err(err) => error_response(err),
    }
}

pub(crate) async fn stats_handler<S, D, J>(
    State(engine): State<Arc<DonationEngine<S, D, J>>>,
    headers: HeaderMap,
) -> Response
where
    S: DonationStore + 'static,
    D: ActorDirectory + 'static,
    J: TransitionJournal + 'static,
{
    let actor = match current_actor(&engine, &headers) {
        Ok(actor) => actor,
        Err(response) => return response,
    };

    match engine.stats(&actor) {
        Ok(counters) => (StatusCode::OK, axum::Json(counters)).into_response(),
        Err(err) => error_response(err),
    }
}

pub(crate) async fn history_handler<S, D, J>(
    State(engine): State<Arc<DonationEngine<S, D, J>>>,
    headers: HeaderMap,
) -> Response
where
    S: DonationStore + 'static,
    D: ActorDirectory + 'static,
    J: TransitionJournal + 'static,
{
    let actor = match current_actor(&engine, &headers) {
        Ok(actor) => actor,
        Err(response) => return response,
    };

    match engine.history(&actor, HISTORY_LIMIT) {
        Ok(entries) => (StatusCode::OK, axum::Json(entries)).into_response(),
        Err(err) => error_response(err),
    }
}

fn current_actor<S, D, J>(
    engine: &DonationEngine<S, D, J>,
    headers: &HeaderMap,
) -> Result<super::domain::Actor, Response>
where
    S: DonationStore + 'static,
    D: ActorDirectory + 'static,
    J: TransitionJournal + 'static,
{
    let id = headers
        .get(ACTOR_HEADER)
        .and_then(|value| value.to_str().ok())
        .map(str::trim)
        .filter(|value| !value.is_empty());

    let Some(id) = id else {
        let payload = json!({ "error": format!("missing {ACTOR_HEADER} header") });
        return Err((StatusCode::UNAUTHORIZED, axum::Json(payload)).into_response());
    };

    engine.authenticate(&ActorId(id.to_string())).ok_or_else(|| {
        let payload = json!({ "error": "unknown actor" });
        (StatusCode::UNAUTHORIZED, axum::Json(payload)).into_response()
    })
}

fn error_response(err: DonationError) -> Response {
    let status = match &err {
        DonationError::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
        DonationError::InvalidTransition { .. } => StatusCode::CONFLICT,
        DonationError::RoleRequired { .. } | DonationError::NotClaimHolder { .. } => {
            StatusCode::FORBIDDEN
        }
        DonationError::DonationNotFound { .. } | DonationError::CookNotFound { .. } => {
            StatusCode::NOT_FOUND
        }
        DonationError::Store(_) | DonationError::Journal(_) => StatusCode::INTERNAL_SERVER_ERROR,
    };

    let payload = json!({ "error": err.to_string() });
    (status, axum::Json(payload)).into_response()
}
