use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::serve;
use axum::{Json, Router};
use kerb_crawler::common::bbox::BBox;
use kerb_crawler::common::config::{RouteConfig, UserRouteConfig};
use kerb_crawler::common::error::RouteError;
use kerb_crawler::common::progress::{ProgressEvent, ProgressLog, Severity};
use kerb_crawler::export::gpx::to_gpx_string;
use kerb_crawler::loading::structs::NetworkInput;
use kerb_crawler::routing::metrics::RouteStats;
use kerb_crawler::routing::pipeline::plan_route;
use log::{error, info};
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::time::Instant;

const DEFAULT_ADDR: &str = "0.0.0.0:8000";

/// Body of a route request, a filtered street network and the user's
/// preferences for how it should be driven
#[derive(Deserialize, Debug)]
struct RouteRequest {
    network: NetworkInput,
    #[serde(default)]
    config: UserRouteConfig,
}

#[derive(Serialize, Debug)]
struct RouteResponse {
    coords: Vec<(f64, f64)>,
    bbox: Option<BBox>,
    centre: Option<(f64, f64)>,
    stats: RouteStats,
    gpx: String,
    events: Vec<ProgressEvent>,
}

/// A request which could not be planned, along with every event raised
/// before it stopped
#[derive(Debug)]
struct RouteFailure {
    error: RouteError,
    events: Vec<ProgressEvent>,
}

impl RouteFailure {
    /// Record the error as a final event and bundle it with the history
    fn recorded(error: RouteError, mut progress: ProgressLog) -> Self {
        progress.record(&ProgressEvent::now(error.to_string(), Severity::Error));
        RouteFailure {
            error: error,
            events: progress.events,
        }
    }
}

/// Run a route request from start to finish, returning either a planned
/// route or the error which stopped it. Every progress event raised along
/// the way is returned in both cases.
fn run_request(request: RouteRequest) -> Result<RouteResponse, RouteFailure> {
    let mut progress = ProgressLog::new();

    let config = match RouteConfig::try_from(request.config) {
        Ok(config) => config,
        Err(err) => return Err(RouteFailure::recorded(err, progress)),
    };

    // The pipeline raises its own error event before returning
    let route = match plan_route(&request.network, &config, |event| progress.record(event)) {
        Ok(route) => route,
        Err(err) => {
            return Err(RouteFailure {
                error: err,
                events: progress.events,
            });
        }
    };

    let gpx = match to_gpx_string(&route.coords) {
        Ok(gpx) => gpx,
        Err(err) => return Err(RouteFailure::recorded(err, progress)),
    };

    let bbox = BBox::from_coords(&route.coords);
    let centre = bbox.as_ref().map(|bbox| bbox.get_centre());

    Ok(RouteResponse {
        bbox: bbox,
        centre: centre,
        coords: route.coords,
        stats: route.stats,
        gpx: gpx,
        events: progress.events,
    })
}

fn into_http_response(result: Result<RouteResponse, RouteFailure>) -> Response {
    match result {
        Ok(route) => (StatusCode::OK, Json(route)).into_response(),
        Err(failure) => {
            let json_response = json!({
                "status": "error",
                "message": failure.error.to_string(),
                "events": failure.events,
            });
            (StatusCode::UNPROCESSABLE_ENTITY, Json(json_response)).into_response()
        }
    }
}

async fn post_route(Json(request): Json<RouteRequest>) -> Response {
    let now = Instant::now();

    let outcome =
        tokio::task::spawn_blocking(move || into_http_response(run_request(request))).await;

    let response = match outcome {
        Ok(response) => response,
        Err(err) => {
            error!("Route planning task failed: {err}");
            let json_response = json!({
                "status": "error",
                "message": "route planning failed unexpectedly",
            });
            (StatusCode::INTERNAL_SERVER_ERROR, Json(json_response)).into_response()
        }
    };

    info!("Elapsed: {:.2?}", now.elapsed());

    response
}

async fn health_check() -> impl IntoResponse {
    let msg = "Hello World!";

    let json_response = json!({
        "status": "success",
        "message": msg
    });

    Json(json_response)
}

#[tokio::main]
async fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .init();

    let addr = std::env::var("KERB_CRAWLER_ADDR").unwrap_or_else(|_| DEFAULT_ADDR.to_string());

    let router = Router::new()
        .route("/healthcheck", get(health_check))
        .route("/route", post(post_route));

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .unwrap_or_else(|err| panic!("Error binding to {addr}: {err}"));
    info!("Listening on {addr}");
    serve(listener, router).await.expect("Error serving API!");
}
