use axum::{
	Json, Router,
	extract::{
		Path, Query, State,
		rejection::{JsonRejection, PathRejection, QueryRejection},
	},
	http::StatusCode,
	response::{IntoResponse, Response},
	routing::{get, post},
};
use serde::Serialize;

use hbdb_service::{
	ArchiveEntry, CommentThreadResponse, Error as ServiceError, SearchRequest, SearchResponse,
	TagListRequest, TagListResponse,
};

use crate::state::AppState;

pub fn router(state: AppState) -> Router {
	Router::new()
		.route("/health", get(health))
		.route("/v1/search", post(search))
		.route("/v1/archives/{post_id}", get(archive))
		.route("/v1/archives/{post_id}/comments", get(comments))
		.route("/v1/tags", get(tags))
		.with_state(state)
}

async fn health() -> StatusCode {
	StatusCode::OK
}

async fn search(
	State(state): State<AppState>,
	payload: Result<Json<SearchRequest>, JsonRejection>,
) -> Result<Json<SearchResponse>, ApiError> {
	let Json(payload) = payload.map_err(|err| {
		json_error(StatusCode::BAD_REQUEST, "INVALID_REQUEST", err.body_text(), None)
	})?;
	let response = state.service.search(payload).await?;

	Ok(Json(response))
}

async fn archive(
	State(state): State<AppState>,
	post_id: Result<Path<i64>, PathRejection>,
) -> Result<Json<ArchiveEntry>, ApiError> {
	let Path(post_id) = post_id.map_err(post_id_error)?;
	let response = state.service.get_data(post_id).await?;

	Ok(Json(response))
}

async fn comments(
	State(state): State<AppState>,
	post_id: Result<Path<i64>, PathRejection>,
) -> Result<Json<CommentThreadResponse>, ApiError> {
	let Path(post_id) = post_id.map_err(post_id_error)?;
	let response = state.service.comments(post_id).await?;

	Ok(Json(response))
}

async fn tags(
	State(state): State<AppState>,
	query: Result<Query<TagListRequest>, QueryRejection>,
) -> Result<Json<TagListResponse>, ApiError> {
	let Query(query) = query.map_err(|err| {
		json_error(StatusCode::BAD_REQUEST, "INVALID_REQUEST", err.body_text(), None)
	})?;
	let response = state.service.tags(query).await?;

	Ok(Json(response))
}

fn post_id_error(err: PathRejection) -> ApiError {
	json_error(
		StatusCode::BAD_REQUEST,
		"INVALID_REQUEST",
		format!("post_id must be an integer: {}", err.body_text()),
		Some(vec!["post_id".to_string()]),
	)
}

#[derive(Debug, Serialize)]
struct ErrorBody {
	error_code: String,
	message: String,
	fields: Option<Vec<String>>,
}

#[derive(Debug)]
pub struct ApiError {
	status: StatusCode,
	error_code: String,
	message: String,
	fields: Option<Vec<String>>,
}
impl ApiError {
	fn new(
		status: StatusCode,
		error_code: impl Into<String>,
		message: impl Into<String>,
		fields: Option<Vec<String>>,
	) -> Self {
		Self { status, error_code: error_code.into(), message: message.into(), fields }
	}
}
impl From<ServiceError> for ApiError {
	fn from(err: ServiceError) -> Self {
		match err {
			ServiceError::Validation { field, message } => json_error(
				StatusCode::BAD_REQUEST,
				"INVALID_REQUEST",
				message,
				field.map(|field| vec![field]),
			),
			ServiceError::NotFound { message } =>
				json_error(StatusCode::NOT_FOUND, "NOT_FOUND", message, None),
			ServiceError::Storage { message } => {
				tracing::error!(error = %message, "Corpus store failure.");

				json_error(StatusCode::SERVICE_UNAVAILABLE, "STORAGE_ERROR", message, None)
			},
		}
	}
}
impl IntoResponse for ApiError {
	fn into_response(self) -> Response {
		let body =
			ErrorBody { error_code: self.error_code, message: self.message, fields: self.fields };

		(self.status, Json(body)).into_response()
	}
}

pub fn json_error(
	status: StatusCode,
	code: &str,
	message: impl Into<String>,
	fields: Option<Vec<String>>,
) -> ApiError {
	ApiError::new(status, code, message, fields)
}
