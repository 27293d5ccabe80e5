use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{State, rejection::JsonRejection},
    http::{HeaderName, HeaderValue, StatusCode, header},
    response::{IntoResponse, Response},
    routing::{get, post},
};
use picking_geometry::Point3D;
use picking_planner::{CollectOptions, PickRequest, PickResult, collect_candidates, plan_candidates};
use serde::Deserialize;
use tower_http::{cors::CorsLayer, set_header::SetResponseHeaderLayer, trace::TraceLayer};
use tracing::{debug, info};

use crate::sources::Catalog;

pub const OPTIMIZE_PICKING_PATH: &str = "/api/optimize-picking";

#[derive(Clone)]
pub struct AppState {
    catalog: Arc<Catalog>,
    collect: CollectOptions,
}

impl AppState {
    pub fn new(catalog: Catalog, collect: CollectOptions) -> Self {
        AppState {
            catalog: Arc::new(catalog),
            collect,
        }
    }
}

/// Request body as sent by callers. Both fields are required; they are
/// optional here so a missing field is reported as a bad payload instead of
/// a generic deserialisation failure.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PickPayload {
    products: Option<Vec<String>>,
    starting_position: Option<Point3D>,
}

impl PickPayload {
    fn into_request(self) -> Result<PickRequest, ApiError> {
        let (Some(products), Some(starting_position)) = (self.products, self.starting_position)
        else {
            return Err(ApiError::InvalidPayload);
        };
        Ok(PickRequest {
            products,
            starting_position,
        })
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("Invalid request payload")]
    InvalidPayload,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = Json(serde_json::json!({ "error": self.to_string() }));
        (StatusCode::BAD_REQUEST, body).into_response()
    }
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(index))
        .route(OPTIMIZE_PICKING_PATH, post(optimize_picking))
        .layer(security_header(header::X_CONTENT_TYPE_OPTIONS, "nosniff"))
        .layer(security_header(header::X_FRAME_OPTIONS, "SAMEORIGIN"))
        .layer(security_header(header::REFERRER_POLICY, "no-referrer"))
        .layer(security_header(header::X_DNS_PREFETCH_CONTROL, "off"))
        .layer(security_header(
            HeaderName::from_static("cross-origin-opener-policy"),
            "same-origin",
        ))
        .layer(security_header(
            HeaderName::from_static("cross-origin-resource-policy"),
            "same-origin",
        ))
        .layer(security_header(
            HeaderName::from_static("x-permitted-cross-domain-policies"),
            "none",
        ))
        .layer(security_header(HeaderName::from_static("origin-agent-cluster"), "?1"))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

fn security_header(
    name: HeaderName,
    value: &'static str,
) -> SetResponseHeaderLayer<HeaderValue> {
    SetResponseHeaderLayer::if_not_present(name, HeaderValue::from_static(value))
}

async fn index() -> Json<String> {
    Json(format!(
        "Picking route server is running. POST {{\"products\": [...], \"startingPosition\": {{\"x\", \"y\", \"z\"}}}} to {} to get a picking order.",
        OPTIMIZE_PICKING_PATH
    ))
}

async fn optimize_picking(
    State(state): State<AppState>,
    payload: Result<Json<PickPayload>, JsonRejection>,
) -> Result<Json<PickResult>, ApiError> {
    let Json(payload) = payload.map_err(|rejection| {
        debug!(%rejection, "Rejected picking request body");
        ApiError::InvalidPayload
    })?;
    let request = payload.into_request()?;

    let candidates = collect_candidates(
        Arc::clone(&state.catalog),
        &request.products,
        &state.collect,
    )
    .await;
    let result = plan_candidates(request.starting_position, candidates);

    info!(
        products = request.products.len(),
        stops = result.len(),
        distance = result.distance,
        "Served picking request"
    );
    Ok(Json(result))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::{Body, to_bytes};
    use axum::http::Request;
    use serde_json::{Value, json};
    use tower::ServiceExt;

    use crate::sources::DatasetSource;

    const DATASET: &str = r#"[
        {"positionId": "far", "x": 3, "y": 4, "z": 0, "productId": "P1"},
        {"positionId": "near", "x": 0, "y": 3, "z": 0, "productId": "P2"},
        {"positionId": "other", "x": 0, "y": 0, "z": 10, "productId": "P3"}
    ]"#;

    fn app() -> Router {
        let dataset = DatasetSource::from_json(DATASET).unwrap();
        router(AppState::new(Catalog::Dataset(dataset), CollectOptions::default()))
    }

    async fn post_json(body: String) -> (StatusCode, Value) {
        let response = app()
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri(OPTIMIZE_PICKING_PATH)
                    .header(header::CONTENT_TYPE, "application/json")
                    .body(Body::from(body))
                    .unwrap(),
            )
            .await
            .unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn test_plans_nearest_first() {
        let (status, body) = post_json(
            json!({"products": ["P1", "P2"], "startingPosition": {"x": 0, "y": 0, "z": 0}})
                .to_string(),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(
            body["pickingOrder"],
            json!([
                {"productId": "P2", "positionId": "near"},
                {"productId": "P1", "positionId": "far"}
            ])
        );
        // 3 to "near", then sqrt(9 + 1) to "far".
        let expected = 3.0 + 10f64.sqrt();
        assert!((body["distance"].as_f64().unwrap() - expected).abs() < 1e-9);
    }

    #[tokio::test]
    async fn test_single_product_example() {
        let (status, body) = post_json(
            json!({"products": ["P1"], "startingPosition": {"x": 0, "y": 0, "z": 0}}).to_string(),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(
            body["pickingOrder"],
            json!([{"productId": "P1", "positionId": "far"}])
        );
        assert!((body["distance"].as_f64().unwrap() - 5.0).abs() < 1e-9);
    }

    #[tokio::test]
    async fn test_large_starting_coordinates_give_finite_distance() {
        let (status, body) = post_json(
            json!({"products": ["P1"], "startingPosition": {"x": 1e200, "y": -1e200, "z": 0}})
                .to_string(),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        let distance = body["distance"].as_f64().expect("distance should be a number");
        let expected = 1e200 * 2f64.sqrt();
        assert!((distance / expected - 1.0).abs() < 1e-9);
    }

    #[tokio::test]
    async fn test_unknown_products_yield_empty_route() {
        let (status, body) = post_json(
            json!({"products": ["nope", "also-nope"], "startingPosition": {"x": 1, "y": 2, "z": 3}})
                .to_string(),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({"pickingOrder": [], "distance": 0.0}));
    }

    #[tokio::test]
    async fn test_empty_product_list_is_valid() {
        let (status, body) = post_json(
            json!({"products": [], "startingPosition": {"x": 0, "y": 0, "z": 0}}).to_string(),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["pickingOrder"], json!([]));
    }

    #[tokio::test]
    async fn test_missing_starting_position_is_rejected() {
        let (status, body) = post_json(json!({"products": ["P1"]}).to_string()).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body, json!({"error": "Invalid request payload"}));
    }

    #[tokio::test]
    async fn test_missing_or_null_products_is_rejected() {
        let (status, _) =
            post_json(json!({"startingPosition": {"x": 0, "y": 0, "z": 0}}).to_string()).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let (status, _) = post_json(
            json!({"products": null, "startingPosition": {"x": 0, "y": 0, "z": 0}}).to_string(),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_malformed_json_is_rejected() {
        let (status, body) = post_json("{not json".to_string()).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "Invalid request payload");
    }

    #[tokio::test]
    async fn test_index_and_security_headers() {
        let response = app()
            .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.headers()[header::X_CONTENT_TYPE_OPTIONS], "nosniff");
        assert_eq!(response.headers()[header::X_FRAME_OPTIONS], "SAMEORIGIN");
        assert_eq!(response.headers()[header::REFERRER_POLICY], "no-referrer");
        assert_eq!(response.headers()["cross-origin-opener-policy"], "same-origin");
        assert_eq!(response.headers()["cross-origin-resource-policy"], "same-origin");
        assert_eq!(response.headers()["x-permitted-cross-domain-policies"], "none");
        assert_eq!(response.headers()["origin-agent-cluster"], "?1");

        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let message: String = serde_json::from_slice(&bytes).unwrap();
        assert!(message.contains(OPTIMIZE_PICKING_PATH));
    }

    #[tokio::test]
    async fn test_out_of_range_coordinate_is_rejected() {
        let (status, body) = post_json(
            r#"{"products": ["P1"], "startingPosition": {"x": 1e400, "y": 0, "z": 0}}"#.to_string(),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body, json!({"error": "Invalid request payload"}));
    }
}
