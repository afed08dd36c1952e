use axum::{
	Json, Router,
	extract::{Path, Query, Request, State},
	http::{StatusCode, header::AUTHORIZATION},
	middleware::{self, Next},
	response::{IntoResponse, Response},
	routing::{get, post},
};
use serde::{Deserialize, Serialize};

use cinegraph_service::{
	EntitySearchRequest, EntitySearchResponse, Error as ServiceError, MovieDetailsRequest,
	MovieDetailsResponse, SearchMoviesRequest, SearchMoviesResponse, SimilarMoviesRequest,
	SimilarMoviesResponse, StatusResponse,
};

use crate::state::AppState;

pub fn router(state: AppState) -> Router {
	let protected = Router::new()
		.route("/v1/movies/similar", post(similar_movies))
		.route("/v1/movies/search", post(search_movies))
		.route("/v1/movies/details", post(movie_details))
		.route("/v1/entities/{kind}", get(search_entities))
		.route_layer(middleware::from_fn_with_state(state.clone(), require_auth));

	Router::new().route("/health", get(health)).merge(protected).with_state(state)
}

pub fn admin_router(state: AppState) -> Router {
	Router::new()
		.route("/v1/admin/status", get(status))
		.route("/v1/admin/cache/clear", post(clear_cache))
		.with_state(state)
}

async fn health() -> StatusCode {
	StatusCode::OK
}

async fn similar_movies(
	State(state): State<AppState>,
	Json(payload): Json<SimilarMoviesRequest>,
) -> Result<Json<SimilarMoviesResponse>, ApiError> {
	let response = state.service.similar_movies(payload).await?;

	Ok(Json(response))
}

async fn search_movies(
	State(state): State<AppState>,
	Json(payload): Json<SearchMoviesRequest>,
) -> Result<Json<SearchMoviesResponse>, ApiError> {
	let response = state.service.search_movies(payload).await?;

	Ok(Json(response))
}

async fn movie_details(
	State(state): State<AppState>,
	Json(payload): Json<MovieDetailsRequest>,
) -> Result<Json<MovieDetailsResponse>, ApiError> {
	let response = state.service.movie_details(payload).await?;

	Ok(Json(response))
}

#[derive(Debug, Deserialize)]
struct EntityQuery {
	name: Option<String>,
	limit: Option<u32>,
}

async fn search_entities(
	State(state): State<AppState>,
	Path(kind): Path<String>,
	Query(query): Query<EntityQuery>,
) -> Result<Json<EntitySearchResponse>, ApiError> {
	let request = EntitySearchRequest { kind, name: query.name, limit: query.limit };
	let response = state.service.search_entities(request).await?;

	Ok(Json(response))
}

async fn status(State(state): State<AppState>) -> Json<StatusResponse> {
	Json(state.service.status().await)
}

#[derive(Debug, Serialize)]
struct ClearCacheResponse {
	cleared_entries: usize,
}

async fn clear_cache(State(state): State<AppState>) -> Json<ClearCacheResponse> {
	Json(ClearCacheResponse { cleared_entries: state.service.clear_cache() })
}

async fn require_auth(
	State(state): State<AppState>,
	request: Request,
	next: Next,
) -> Result<Response, ApiError> {
	let Some(expected) = state.auth_token.as_deref() else {
		return Ok(next.run(request).await);
	};
	let authorized = request
		.headers()
		.get(AUTHORIZATION)
		.and_then(|value| value.to_str().ok())
		.and_then(|value| value.strip_prefix("Bearer "))
		.map(|token| token == expected)
		.unwrap_or(false);

	if !authorized {
		return Err(ApiError::new(
			StatusCode::UNAUTHORIZED,
			"unauthorized",
			"Missing or invalid API token.",
		));
	}

	Ok(next.run(request).await)
}

#[derive(Debug, Serialize)]
struct ErrorBody {
	error_code: String,
	message: String,
}

#[derive(Debug)]
pub struct ApiError {
	status: StatusCode,
	error_code: String,
	message: String,
}

impl ApiError {
	fn new(status: StatusCode, error_code: impl Into<String>, message: impl Into<String>) -> Self {
		Self { status, error_code: error_code.into(), message: message.into() }
	}
}

impl From<ServiceError> for ApiError {
	fn from(err: ServiceError) -> Self {
		match &err {
			ServiceError::InvalidRequest { .. } => {
				Self::new(StatusCode::BAD_REQUEST, "invalid_request", err.to_string())
			},
			ServiceError::NotFound { .. } => {
				Self::new(StatusCode::NOT_FOUND, "not_found", err.to_string())
			},
			ServiceError::Upstream { .. } => {
				Self::new(StatusCode::BAD_GATEWAY, "upstream_unavailable", err.to_string())
			},
			ServiceError::Provider { .. } => {
				Self::new(StatusCode::BAD_GATEWAY, "provider_error", err.to_string())
			},
		}
	}
}

impl IntoResponse for ApiError {
	fn into_response(self) -> Response {
		let body = ErrorBody { error_code: self.error_code, message: self.message };

		(self.status, Json(body)).into_response()
	}
}
