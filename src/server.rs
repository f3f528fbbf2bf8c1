//! Bridge Server
//!
//! Exposes a controller to a browser-side renderer: the latest style and
//! legend over plain GET, view commands over POST and controller events as
//! server-sent events.

use axum::{
    extract::{Json, Path, Query, State},
    http::StatusCode,
    response::{
        sse::{Event, KeepAlive, Sse},
        IntoResponse, Response,
    },
    routing::{get, post},
    Router,
};
use futures_util::stream::Stream;
use serde::Deserialize;
use std::convert::Infallible;
use tokio_stream::{wrappers::BroadcastStream, StreamExt};
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::aggregation::CategorySort;
use crate::controller::{Command, MapViewController, ViewState};
use crate::error::MaprError;
use crate::style::legend_for;

struct ServerError(anyhow::Error);

impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        let status = match self.0.downcast_ref::<MaprError>() {
            Some(MaprError::NoProject) | Some(MaprError::Stale { .. }) => StatusCode::CONFLICT,
            Some(MaprError::ControllerClosed) => StatusCode::SERVICE_UNAVAILABLE,
            Some(MaprError::Http(_)) | Some(MaprError::BackendStatus { .. }) | Some(MaprError::Decode(_)) => {
                StatusCode::BAD_GATEWAY
            }
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };
        (status, Json(serde_json::json!({ "error": self.0.to_string() }))).into_response()
    }
}

impl<E> From<E> for ServerError
where
    E: Into<anyhow::Error>,
{
    fn from(err: E) -> Self {
        Self(err.into())
    }
}

#[derive(Clone)]
pub struct AppState {
    pub controller: MapViewController,
}

#[derive(Debug, Deserialize)]
struct SummaryQuery {
    #[serde(default)]
    sort: CategorySort,
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/style", get(style))
        .route("/legend", get(legend))
        .route("/resolution", get(resolution))
        .route("/state", get(view_state))
        .route("/view", post(view_command))
        .route("/features/{id}/summary", get(feature_summary))
        .route("/events", get(events))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

pub async fn run_server(controller: MapViewController, addr: &str) -> anyhow::Result<()> {
    let app = router(AppState { controller });
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!("🚀 Map bridge ready: http://{}", listener.local_addr()?);
    axum::serve(listener, app).await?;
    Ok(())
}

async fn style(State(state): State<AppState>) -> impl IntoResponse {
    let frame = state.controller.style().borrow().clone();
    Json(serde_json::json!({
        "revision": frame.revision,
        "style": frame.style.to_json(),
    }))
}

async fn legend(State(state): State<AppState>) -> impl IntoResponse {
    let mode = state.controller.state().borrow().mode();
    Json(serde_json::json!({ "mode": mode, "entries": legend_for(mode) }))
}

async fn resolution(State(state): State<AppState>) -> impl IntoResponse {
    let choice = *state.controller.resolution().borrow();
    Json(choice)
}

async fn view_state(State(state): State<AppState>) -> impl IntoResponse {
    let snapshot: ViewState = (**state.controller.state().borrow()).clone();
    Json(snapshot)
}

async fn view_command(
    State(state): State<AppState>,
    Json(command): Json<Command>,
) -> Result<impl IntoResponse, ServerError> {
    state.controller.send(command).await?;
    Ok((StatusCode::ACCEPTED, Json(serde_json::json!({ "status": "queued" }))))
}

async fn feature_summary(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Query(query): Query<SummaryQuery>,
) -> Result<impl IntoResponse, ServerError> {
    let summary = state.controller.analyze_feature(&id, query.sort).await?;
    Ok(Json(summary))
}

async fn events(State(state): State<AppState>) -> Sse<impl Stream<Item = Result<Event, Infallible>>> {
    // lagged receivers skip what they missed
    let stream = BroadcastStream::new(state.controller.events()).filter_map(|item| {
        let event = item.ok()?;
        let data = serde_json::to_string(&event).ok()?;
        Some(Ok(Event::default().data(data)))
    });
    Sse::new(stream).keep_alive(KeepAlive::default())
}
