use std::sync::Arc;

use axum::{
    Json,
    body::Bytes,
    extract::{Path, Query, State, rejection::QueryRejection},
    http::HeaderMap,
    response::{Html, IntoResponse},
};
use serde::Deserialize;
use serde_json::json;
use tracing::warn;

use crate::{
    access::{require_invite_code, verify},
    admin::{admin_page, render_denied},
    error::AppError,
    intake::{create_pledge, create_rsvp},
    listing::{list_pledges, list_rsvps},
    models::{PledgeItem, RsvpItem},
    state::AppState,
    utils::{get_object, text_field},
};

fn guard_intake(state: &AppState, slug: &str, headers: &HeaderMap) -> Result<(), AppError> {
    if state.config.enforce_invite_code {
        require_invite_code(&state.config, slug, headers)?;
    }

    Ok(())
}

pub async fn create_rsvp_handler(
    State(state): State<Arc<AppState>>,
    Path(slug): Path<String>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<impl IntoResponse, AppError> {
    guard_intake(&state, &slug, &headers)?;

    let id = create_rsvp(state.store.as_ref(), &slug, &get_object(&body)).await?;

    Ok(Json(json!({ "ok": true, "id": id })))
}

pub async fn list_rsvps_handler(
    State(state): State<Arc<AppState>>,
    Path(slug): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let items: Vec<RsvpItem> = list_rsvps(state.store.as_ref(), &slug)
        .await?
        .into_iter()
        .map(RsvpItem::from)
        .collect();

    Ok(Json(json!({ "ok": true, "items": items })))
}

pub async fn create_pledge_handler(
    State(state): State<Arc<AppState>>,
    Path(slug): Path<String>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<impl IntoResponse, AppError> {
    guard_intake(&state, &slug, &headers)?;

    let id = create_pledge(state.store.as_ref(), &slug, &get_object(&body)).await?;

    Ok(Json(json!({ "ok": true, "id": id })))
}

pub async fn list_pledges_handler(
    State(state): State<Arc<AppState>>,
    Path(slug): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let items: Vec<PledgeItem> = list_pledges(state.store.as_ref(), &slug)
        .await?
        .into_iter()
        .map(PledgeItem::from)
        .collect();

    Ok(Json(json!({ "ok": true, "items": items })))
}

pub async fn verify_handler(
    State(state): State<Arc<AppState>>,
    Path(slug): Path<String>,
    body: Bytes,
) -> Result<impl IntoResponse, AppError> {
    let code = text_field(&get_object(&body), "code").unwrap_or_default();

    verify(&state.config, &slug, &code).inspect_err(|e| {
        warn!("Access check for {slug} failed: {e}");
    })?;

    Ok(Json(json!({ "ok": true })))
}

#[derive(Deserialize)]
pub struct AdminQuery {
    key: Option<String>,
}

pub async fn admin_handler(
    State(state): State<Arc<AppState>>,
    Path(slug): Path<String>,
    query: Result<Query<AdminQuery>, QueryRejection>,
) -> Result<impl IntoResponse, AppError> {
    // an unparseable query string is treated as no key
    let key = query.ok().and_then(|Query(query)| query.key);

    let page = admin_page(state.store.as_ref(), &state.config, &slug, key.as_deref()).await?;

    Ok(Html(page.unwrap_or_else(|| {
        warn!("Admin access denied for {slug}");
        render_denied(&slug)
    })))
}

pub async fn health_handler() -> impl IntoResponse {
    "ok"
}
