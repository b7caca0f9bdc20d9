use std::sync::Arc;

use axum::{
    body::Bytes,
    extract::{FromRequest, Path, Request, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Form, Json, Router,
};
use serde::de::DeserializeOwned;
use thiserror::Error;
use tower_http::trace::TraceLayer;
use tracing::{info, warn};
use trafficlight_core::{
    classify,
    classify::unrecognized_errors,
    model::{CiWebhook, LightsUpdate},
    Gate, LightRepository, LightsState, MonitorEvent, StoreError,
};

#[derive(Clone)]
pub struct AppState {
    repo: LightRepository,
    gate: Arc<Gate>,
}

impl AppState {
    pub fn new(repo: LightRepository, gate: Gate) -> Self {
        Self {
            repo,
            gate: Arc::new(gate),
        }
    }
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/healthz", get(healthz))
        .route("/lights", get(get_lights).post(set_lights))
        .route("/ci/{secret}", post(ci_webhook))
        .route("/hetrix-webhook/{secret}", post(monitor_webhook))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn healthz() -> &'static str {
    "ok"
}

async fn get_lights(State(st): State<AppState>) -> Result<Json<LightsState>, AppError> {
    Ok(Json(st.repo.read_all(st.gate.mode()).await?))
}

async fn set_lights(
    State(st): State<AppState>,
    req: Request,
) -> Result<Json<LightsState>, AppError> {
    if !st.gate.authorize_user() {
        return Err(AppError::Unauthorized);
    }

    let update: LightsUpdate = if is_form(&req) {
        let Form(update) = Form::<LightsUpdate>::from_request(req, &st)
            .await
            .map_err(|e| AppError::BadRequest(e.body_text()))?;
        update
    } else {
        let body = Bytes::from_request(req, &st)
            .await
            .map_err(|e| AppError::BadRequest(e.body_text()))?;
        parse_body(&body)?
    };

    for (color, value) in update.entries() {
        st.repo.write(color, &value.to_stored()).await?;
    }

    Ok(Json(st.repo.read_all(st.gate.mode()).await?))
}

async fn ci_webhook(
    State(st): State<AppState>,
    Path(secret): Path<String>,
    body: Bytes,
) -> Result<StatusCode, AppError> {
    authorize_webhook(&st.gate, &secret)?;
    let hook: CiWebhook = parse_body(&body)?;

    info!(status = %hook.build.status, "ci webhook received");
    st.repo.set_ci_status(&hook.build.status).await?;
    Ok(StatusCode::CREATED)
}

async fn monitor_webhook(
    State(st): State<AppState>,
    Path(secret): Path<String>,
    body: Bytes,
) -> Result<StatusCode, AppError> {
    authorize_webhook(&st.gate, &secret)?;
    let event: MonitorEvent = parse_body(&body)?;

    st.repo.reset_canonical().await?;
    info!(payload = ?event, "monitor webhook received");

    for code in unrecognized_errors(&event) {
        warn!(error = code, "unrecognized monitor error");
    }

    let actions = classify(&event);
    st.repo.apply(&actions).await?;
    Ok(StatusCode::CREATED)
}

fn authorize_webhook(gate: &Gate, secret: &str) -> Result<(), AppError> {
    if gate.authorize_webhook(secret) {
        Ok(())
    } else {
        warn!("webhook called with invalid secret");
        Err(AppError::Unauthorized)
    }
}

fn is_form(req: &Request) -> bool {
    req.headers()
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|ct| ct.starts_with("application/x-www-form-urlencoded"))
}

// Called only after authorization. An empty body reads as `{}`.
fn parse_body<T: DeserializeOwned>(body: &[u8]) -> Result<T, AppError> {
    let body = if body.iter().all(u8::is_ascii_whitespace) {
        b"{}".as_slice()
    } else {
        body
    };
    serde_json::from_slice(body).map_err(|e| AppError::BadRequest(e.to_string()))
}

#[derive(Debug, Error)]
pub enum AppError {
    #[error("unauthorized")]
    Unauthorized,
    #[error("bad request: {0}")]
    BadRequest(String),
    #[error(transparent)]
    Store(#[from] StoreError),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        match self {
            AppError::Unauthorized => StatusCode::UNAUTHORIZED.into_response(),
            AppError::BadRequest(msg) => {
                let body = Json(serde_json::json!({ "error": msg }));
                (StatusCode::BAD_REQUEST, body).into_response()
            }
            AppError::Store(e) => {
                tracing::error!(error = %e, "request failed");
                let body = Json(serde_json::json!({ "error": e.to_string() }));
                (StatusCode::SERVICE_UNAVAILABLE, body).into_response()
            }
        }
    }
}
