use std::collections::HashMap;

use axum::{
	Json, Router,
	body::Bytes,
	extract::{Query, State},
	http::{HeaderMap, StatusCode},
	response::{IntoResponse, Response},
	routing::get,
};
use serde::Serialize;
use serde_json::Value;
use tracing::Instrument;
use uuid::Uuid;

use crate::state::AppState;
use mark_service::{Error, SearchFilters, SearchRequest, SearchResponse};

pub const HEADER_SCOPE: &str = "X-Mark-Scope";

pub fn router(state: AppState) -> Router {
	Router::new()
		.route("/health", get(health))
		.route("/v1/bookmarks/search", get(search_query).post(search_body))
		.with_state(state)
}

async fn health() -> StatusCode {
	StatusCode::OK
}

async fn search_query(
	State(state): State<AppState>,
	headers: HeaderMap,
	Query(params): Query<HashMap<String, String>>,
) -> Response {
	let filters = SearchFilters::from_query(&params, &state.service.search_options());

	run_search(&state, &headers, filters).await
}

async fn search_body(
	State(state): State<AppState>,
	headers: HeaderMap,
	body: Bytes,
) -> Result<Response, ApiError> {
	let payload = if body.iter().all(u8::is_ascii_whitespace) {
		Value::Object(Default::default())
	} else {
		serde_json::from_slice::<Value>(&body).map_err(|err| {
			json_error(
				StatusCode::BAD_REQUEST,
				"INVALID_REQUEST",
				format!("Request body is not valid JSON: {err}."),
				Some(vec!["$".to_string()]),
			)
		})?
	};
	let filters = SearchFilters::from_json(&payload, &state.service.search_options())?;

	Ok(run_search(&state, &headers, filters).await)
}

async fn run_search(state: &AppState, headers: &HeaderMap, filters: SearchFilters) -> Response {
	let scope = headers
		.get(HEADER_SCOPE)
		.and_then(|value| value.to_str().ok())
		.unwrap_or_default()
		.to_string();
	let span = tracing::info_span!("search", request_id = %Uuid::new_v4(), scope = %scope);
	let response = state.service.search(SearchRequest { scope, filters }).instrument(span).await;

	(envelope_status(&response), Json(response)).into_response()
}

fn envelope_status(response: &SearchResponse) -> StatusCode {
	match response.error.as_ref().map(|error| error.code.as_str()) {
		None => StatusCode::OK,
		Some("INVALID_REQUEST") => StatusCode::BAD_REQUEST,
		Some("SOURCE_UNAVAILABLE") => StatusCode::SERVICE_UNAVAILABLE,
		Some(_) => StatusCode::INTERNAL_SERVER_ERROR,
	}
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

pub fn json_error(
	status: StatusCode,
	code: &str,
	message: impl Into<String>,
	fields: Option<Vec<String>>,
) -> ApiError {
	ApiError { status, error_code: code.to_string(), message: message.into(), fields }
}

impl From<Error> for ApiError {
	fn from(err: Error) -> Self {
		let status = match err {
			Error::InvalidRequest { .. } => StatusCode::BAD_REQUEST,
			Error::SourceUnavailable { .. } => StatusCode::SERVICE_UNAVAILABLE,
			Error::Internal { .. } => StatusCode::INTERNAL_SERVER_ERROR,
		};
		let fields = matches!(err, Error::InvalidRequest { .. }).then(|| vec!["$".to_string()]);

		json_error(status, err.code(), err.to_string(), fields)
	}
}

impl IntoResponse for ApiError {
	fn into_response(self) -> Response {
		let body =
			ErrorBody { error_code: self.error_code, message: self.message, fields: self.fields };

		(self.status, Json(body)).into_response()
	}
}

#[cfg(test)]
mod tests {
	use axum::{http::StatusCode, response::IntoResponse};

	use crate::routes::{ApiError, envelope_status};
	use mark_service::{Error, SearchFilters, SearchResponse};

	fn failed(err: Error) -> SearchResponse {
		SearchResponse::failure(SearchFilters::default(), &err, 3)
	}

	#[test]
	fn envelope_codes_map_to_statuses() {
		let internal = failed(Error::Internal { message: "boom".to_string() });
		let unavailable = failed(Error::SourceUnavailable { message: "offline".to_string() });
		let invalid = failed(Error::InvalidRequest { message: "scope".to_string() });

		assert_eq!(envelope_status(&internal), StatusCode::INTERNAL_SERVER_ERROR);
		assert_eq!(envelope_status(&unavailable), StatusCode::SERVICE_UNAVAILABLE);
		assert_eq!(envelope_status(&invalid), StatusCode::BAD_REQUEST);
		assert_eq!(internal.search_time_ms, 3);
	}

	#[test]
	fn internal_errors_become_server_errors() {
		let response =
			ApiError::from(Error::Internal { message: "boom".to_string() }).into_response();

		assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
	}
}
