use axum::{
	body::{self, Body},
	http::{Request, StatusCode, header},
};
use serde_json::{Map, Value, json};
use tower::util::ServiceExt;

use cinegraph_api::{routes, state::AppState};
use cinegraph_config::{
	Config, EmbeddingProviderConfig, GraphDb, Providers, Ranking, RankingWeights, Search,
	SearchCache, Security, Service, Storage,
};
use cinegraph_testkit::{MockSparql, MockSparqlServer, ask_response, row, select_response};

fn test_config(endpoint: String, api_auth_token: Option<String>) -> Config {
	Config {
		service: Service {
			http_bind: "127.0.0.1:0".to_string(),
			admin_bind: "127.0.0.1:0".to_string(),
			log_level: "info".to_string(),
		},
		storage: Storage {
			graphdb: GraphDb {
				endpoint,
				timeout_ms: 2_000,
				max_results: 5_000,
				retry_attempts: 0,
			},
		},
		providers: Providers {
			embedding: EmbeddingProviderConfig {
				provider_id: "test".to_string(),
				api_base: "http://127.0.0.1:1".to_string(),
				api_key: "test-key".to_string(),
				path: "/v1/embeddings".to_string(),
				model: "test-model".to_string(),
				dimensions: 2,
				timeout_ms: 1_000,
				default_headers: Map::new(),
			},
		},
		search: Search {
			candidate_limit: 200,
			default_top_k: 10,
			label_language: "en".to_string(),
			cache: SearchCache { enabled: true, ttl_secs: 300, max_entries: 64 },
		},
		ranking: Ranking { weights: RankingWeights::default(), embedding_scale: 50.0 },
		security: Security { bind_localhost_only: true, api_auth_token },
	}
}

fn app(server: &MockSparqlServer) -> axum::Router {
	let state =
		AppState::new(test_config(server.endpoint(), None)).expect("Failed to build state.");

	routes::router(state)
}

async fn body_json(response: axum::response::Response) -> Value {
	let bytes = body::to_bytes(response.into_body(), 1_048_576)
		.await
		.expect("Failed to read response body.");

	serde_json::from_slice(&bytes).expect("Response body is not JSON.")
}

fn post_json(uri: &str, payload: Value) -> Request<Body> {
	Request::builder()
		.method("POST")
		.uri(uri)
		.header(header::CONTENT_TYPE, "application/json")
		.body(Body::from(payload.to_string()))
		.expect("Failed to build request.")
}

#[tokio::test]
async fn health_is_open() {
	let server = MockSparql::new().start().await.expect("Failed to start mock endpoint.");
	let response = app(&server)
		.oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
		.await
		.expect("Request failed.");

	assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn similar_movies_returns_ranked_items() {
	let server = MockSparql::new()
		.respond(
			"?graphScore",
			select_response(vec![
				row(&[
					("movie", "http://x.test/target"),
					("title", "Target"),
					("graphScore", "20"),
				]),
				row(&[("movie", "http://x.test/other"), ("title", "Other"), ("graphScore", "15")]),
			]),
		)
		.start()
		.await
		.expect("Failed to start mock endpoint.");
	let response = app(&server)
		.oneshot(post_json(
			"/v1/movies/similar",
			json!({ "target_uri": "http://x.test/target" }),
		))
		.await
		.expect("Request failed.");

	assert_eq!(response.status(), StatusCode::OK);

	let body = body_json(response).await;
	let items = body["items"].as_array().expect("Expected items array.");

	assert_eq!(items.len(), 2);
	assert_eq!(items[0]["uri"], "http://x.test/target");
	assert_eq!(items[0]["is_target"], true);
	assert_eq!(items[0]["total_score"], 10.0);
}

#[tokio::test]
async fn invalid_target_maps_to_bad_request() {
	let server = MockSparql::new().start().await.expect("Failed to start mock endpoint.");
	let response = app(&server)
		.oneshot(post_json("/v1/movies/similar", json!({ "target_uri": "not an iri" })))
		.await
		.expect("Request failed.");

	assert_eq!(response.status(), StatusCode::BAD_REQUEST);

	let body = body_json(response).await;

	assert_eq!(body["error_code"], "invalid_request");
}

#[tokio::test]
async fn upstream_failure_maps_to_bad_gateway() {
	let server = MockSparql::new()
		.respond_status("?graphScore", 503, "maintenance")
		.start()
		.await
		.expect("Failed to start mock endpoint.");
	let response = app(&server)
		.oneshot(post_json(
			"/v1/movies/similar",
			json!({ "target_uri": "http://x.test/target" }),
		))
		.await
		.expect("Request failed.");

	assert_eq!(response.status(), StatusCode::BAD_GATEWAY);

	let body = body_json(response).await;

	assert_eq!(body["error_code"], "upstream_unavailable");
}

#[tokio::test]
async fn entity_search_is_wired_through() {
	let server = MockSparql::new()
		.respond(
			"?entity a dbo:Actor",
			select_response(vec![row(&[
				("entity", "http://x.test/actor/1"),
				("label", "lauren graham"),
			])]),
		)
		.start()
		.await
		.expect("Failed to start mock endpoint.");
	let response = app(&server)
		.oneshot(
			Request::builder()
				.uri("/v1/entities/actor?name=lauren")
				.body(Body::empty())
				.unwrap(),
		)
		.await
		.expect("Request failed.");

	assert_eq!(response.status(), StatusCode::OK);

	let body = body_json(response).await;

	assert_eq!(body["items"][0]["label"], "Lauren graham");
}

#[tokio::test]
async fn unknown_entity_kind_maps_to_bad_request() {
	let server = MockSparql::new().start().await.expect("Failed to start mock endpoint.");
	let response = app(&server)
		.oneshot(Request::builder().uri("/v1/entities/starship").body(Body::empty()).unwrap())
		.await
		.expect("Request failed.");

	assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn configured_token_guards_the_api() {
	let server = MockSparql::new().start().await.expect("Failed to start mock endpoint.");
	let state = AppState::new(test_config(server.endpoint(), Some("sesame".to_string())))
		.expect("Failed to build state.");
	let app = routes::router(state);

	let denied = app
		.clone()
		.oneshot(post_json("/v1/movies/search", json!({})))
		.await
		.expect("Request failed.");

	assert_eq!(denied.status(), StatusCode::UNAUTHORIZED);

	let open = app
		.clone()
		.oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
		.await
		.expect("Request failed.");

	assert_eq!(open.status(), StatusCode::OK);
}

#[tokio::test]
async fn admin_status_reports_connectivity() {
	let server = MockSparql::new()
		.respond("ASK", ask_response(true))
		.start()
		.await
		.expect("Failed to start mock endpoint.");
	let state =
		AppState::new(test_config(server.endpoint(), None)).expect("Failed to build state.");
	let response = routes::admin_router(state)
		.oneshot(Request::builder().uri("/v1/admin/status").body(Body::empty()).unwrap())
		.await
		.expect("Request failed.");

	assert_eq!(response.status(), StatusCode::OK);

	let body = body_json(response).await;

	assert_eq!(body["connected"], true);
}

#[tokio::test]
async fn cache_clear_reports_removed_entries() {
	let server = MockSparql::new()
		.respond(
			"SELECT DISTINCT ?movie ?title",
			select_response(vec![row(&[("movie", "http://x.test/a"), ("title", "A")])]),
		)
		.start()
		.await
		.expect("Failed to start mock endpoint.");
	let state =
		AppState::new(test_config(server.endpoint(), None)).expect("Failed to build state.");
	let app = routes::router(state.clone());

	let warmed = app
		.clone()
		.oneshot(post_json("/v1/movies/search", json!({})))
		.await
		.expect("Request failed.");

	assert_eq!(warmed.status(), StatusCode::OK);

	let response = routes::admin_router(state)
		.oneshot(
			Request::builder()
				.method("POST")
				.uri("/v1/admin/cache/clear")
				.body(Body::empty())
				.unwrap(),
		)
		.await
		.expect("Request failed.");
	let body = body_json(response).await;

	assert_eq!(body["cleared_entries"], 1);
}
