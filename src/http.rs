//! HTTP servers: the JSON query API and the Prometheus metrics endpoint.
//!
//! Each entity kind gets the same pair of routes from [`entity_routes`]:
//! `GET /api/{plural}` and `GET /api/{singular}/:name`. The key check is a
//! route layer on those routes, so it runs before any path extraction,
//! lookup, or projection.

use crate::api::{AccessPolicy, EntityKind, Projectable, Target, project_all, resolve};
use crate::error::ApiError;
use crate::metrics;
use crate::state::{Channel, Client, EntitySource, Server, User};
use crate::telemetry::{RequestTimer, spans};
use axum::extract::{Path, Query, Request, State};
use axum::middleware::{self, Next};
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use std::collections::{BTreeMap, HashMap};
use std::future::Future;
use std::net::SocketAddr;
use std::sync::Arc;
use tracing::debug;

/// State shared by every API handler.
#[derive(Clone)]
pub struct AppState {
    pub source: Arc<dyn EntitySource>,
    pub policy: Arc<AccessPolicy>,
}

impl AppState {
    pub fn new(source: Arc<dyn EntitySource>, policy: AccessPolicy) -> Self {
        Self {
            source,
            policy: Arc::new(policy),
        }
    }
}

/// Build the query API router with all eight endpoints.
pub fn api_router(state: AppState) -> Router {
    Router::new()
        .merge(entity_routes::<User>(&state))
        .merge(entity_routes::<Channel>(&state))
        .merge(entity_routes::<Server>(&state))
        .merge(entity_routes::<Client>(&state))
        .with_state(state)
}

/// The list and get routes for one entity kind, behind the key check.
fn entity_routes<T: Projectable>(state: &AppState) -> Router<AppState> {
    let kind = T::KIND;
    let gate = Gate {
        policy: Arc::clone(&state.policy),
        kind,
    };

    Router::new()
        .route(&format!("/api/{}", kind.plural()), get(list::<T>))
        .route(&format!("/api/{}/:name", kind.singular()), get(show::<T>))
        .route_layer(middleware::from_fn_with_state(gate, require_key))
}

#[derive(Clone)]
struct Gate {
    policy: Arc<AccessPolicy>,
    kind: EntityKind,
}

/// Reject the request unless its `key` query parameter matches the secret.
async fn require_key(
    State(gate): State<Gate>,
    query: Option<Query<HashMap<String, String>>>,
    request: Request,
    next: Next,
) -> Response {
    let key = query
        .as_ref()
        .and_then(|Query(params)| params.get("key"))
        .map(String::as_str);

    if !gate.policy.authorized(key) {
        let err = ApiError::Forbidden;
        debug!(kind = %gate.kind, "Rejected API request without a valid key");
        metrics::record_request(gate.kind.singular(), err.error_code());
        return err.into_response();
    }

    next.run(request).await
}

/// `GET /api/{plural}`
async fn list<T: Projectable>(
    State(state): State<AppState>,
) -> Json<BTreeMap<&'static str, Vec<T::Document>>> {
    let kind = T::KIND;
    let _timer = RequestTimer::new(kind);

    let docs = spans::list(kind).in_scope(|| project_all::<T>(state.source.as_ref()));
    debug!(kind = %kind, count = docs.len(), "Listed entities");
    metrics::set_entity_count(kind.singular(), docs.len());
    metrics::record_request(kind.singular(), "ok");

    Json(BTreeMap::from([(kind.plural(), docs)]))
}

/// `GET /api/{singular}/:name`
async fn show<T: Projectable>(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> Result<Json<BTreeMap<&'static str, T::Document>>, ApiError> {
    let kind = T::KIND;
    let _timer = RequestTimer::new(kind);

    let projected = spans::show(kind, &name).in_scope(|| {
        resolve::<T>(state.source.as_ref(), Target::Identifier(name.clone()))
            .map(|entity| T::project(&entity))
    });

    match projected {
        Ok(doc) => {
            metrics::record_request(kind.singular(), "ok");
            Ok(Json(BTreeMap::from([(kind.singular(), doc)])))
        }
        Err(err) => {
            debug!(kind = %kind, identifier = %name, "Entity not found");
            metrics::record_request(kind.singular(), err.error_code());
            Err(err)
        }
    }
}

/// Serve the query API on `addr` until `shutdown` resolves.
pub async fn run_api_server<F>(addr: SocketAddr, state: AppState, shutdown: F) -> std::io::Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    let app = api_router(state);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("WebServ API listening on {}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown)
        .await
}

/// Handler for GET /metrics - returns Prometheus metrics in text format.
async fn metrics_handler() -> String {
    metrics::gather_metrics()
}

/// Run the HTTP server for Prometheus metrics.
///
/// Binds to `0.0.0.0:port` and serves the `/metrics` endpoint.
/// This is a long-running task that should be spawned in the background.
pub async fn run_metrics_server(port: u16) {
    let app = Router::new().route("/metrics", get(metrics_handler));

    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    tracing::info!("Prometheus HTTP server listening on {}", addr);

    let listener = match tokio::net::TcpListener::bind(&addr).await {
        Ok(listener) => listener,
        Err(e) => {
            tracing::error!("Failed to bind metrics server on {}: {}", addr, e);
            return;
        }
    };

    if let Err(e) = axum::serve(listener, app).await {
        tracing::error!("Metrics server error: {}", e);
    }
}
