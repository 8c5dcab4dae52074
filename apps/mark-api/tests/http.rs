use std::{path::PathBuf, sync::Arc};

use axum::{
	Router,
	body::{self, Body},
	http::{Request, StatusCode},
};
use serde_json::Value;
use tower::util::ServiceExt;

use mark_api::{routes, state::AppState};
use mark_config::{Config, Search, Service, Storage};
use mark_domain::{BookmarkRecord, SiteHealth};
use mark_storage::{BoxFuture, MemoryStore, RecordSource};
use mark_testkit::{TempLibrary, bookmark};

struct OfflineSource;
impl RecordSource for OfflineSource {
	fn fetch_all<'a>(
		&'a self,
		_scope: &'a str,
	) -> BoxFuture<'a, mark_storage::Result<Vec<BookmarkRecord>>> {
		Box::pin(async move {
			Err(mark_storage::Error::Unavailable("library offline".to_string()))
		})
	}
}

fn test_config(data_dir: PathBuf) -> Config {
	Config {
		service: Service { http_bind: "127.0.0.1:0".to_string(), log_level: "info".to_string() },
		storage: Storage { data_dir },
		search: Search { default_limit: 2, max_limit: 10, max_tag_facets: 50 },
	}
}

fn library() -> Vec<BookmarkRecord> {
	vec![
		bookmark("b1", "React Guide").tags(&["react"]).site_health(SiteHealth::Working).build(),
		bookmark("b2", "Cooking Basics").tags(&["food"]).build(),
		bookmark("b3", "React Hooks Deep Dive").tags(&["react", "hooks"]).visits(9).build(),
	]
}

fn memory_app() -> Router {
	let store = MemoryStore::new().with_library("alice", library());
	let state = AppState::with_source(test_config(PathBuf::from("unused")), Arc::new(store));

	routes::router(state)
}

async fn call(app: Router, request: Request<Body>) -> (StatusCode, Value) {
	let response = app.oneshot(request).await.expect("Failed to call router.");
	let status = response.status();
	let body = body::to_bytes(response.into_body(), usize::MAX)
		.await
		.expect("Failed to read response body.");
	let json = serde_json::from_slice(&body).expect("Failed to parse response.");

	(status, json)
}

fn get(uri: &str, scope: Option<&str>) -> Request<Body> {
	let mut builder = Request::builder().uri(uri);

	if let Some(scope) = scope {
		builder = builder.header(routes::HEADER_SCOPE, scope);
	}

	builder.body(Body::empty()).expect("Failed to build request.")
}

fn post(body: &str, scope: &str) -> Request<Body> {
	Request::builder()
		.method("POST")
		.uri("/v1/bookmarks/search")
		.header(routes::HEADER_SCOPE, scope)
		.header("content-type", "application/json")
		.body(Body::from(body.to_string()))
		.expect("Failed to build request.")
}

fn ids(json: &Value) -> Vec<&str> {
	json["bookmarks"]
		.as_array()
		.expect("Expected a bookmarks array.")
		.iter()
		.filter_map(|item| item["id"].as_str())
		.collect()
}

#[tokio::test]
async fn health_ok() {
	let response = memory_app()
		.oneshot(Request::builder().uri("/health").body(Body::empty()).expect("Failed to build."))
		.await
		.expect("Failed to call /health.");

	assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn query_string_search_returns_envelope() {
	let (status, json) =
		call(memory_app(), get("/v1/bookmarks/search?q=hooks&tags=react,hooks", Some("alice")))
			.await;

	assert_eq!(status, StatusCode::OK);
	assert_eq!(json["success"], true);
	assert_eq!(json["total"], 3);
	assert_eq!(json["filtered"], 1);
	assert_eq!(ids(&json), vec!["b3"]);
	assert_eq!(json["bookmarks"][0]["relevance_score"], 1.0);
	assert_eq!(json["filters_applied"]["tags"], serde_json::json!(["react", "hooks"]));
	assert_eq!(json["facets"]["site_health"][0]["name"], "unknown");
}

#[tokio::test]
async fn search_uses_configured_page_size() {
	let (status, json) =
		call(memory_app(), get("/v1/bookmarks/search?sort_by=visits&limit=oops", Some("alice")))
			.await;

	assert_eq!(status, StatusCode::OK);
	assert_eq!(json["per_page"], 2);
	assert_eq!(json["total_pages"], 2);
	assert_eq!(json["page"], 1);
	assert_eq!(ids(&json), vec!["b3", "b1"]);
	assert!(json["bookmarks"][0].get("relevance_score").is_none());
}

#[tokio::test]
async fn json_body_search_accepts_lenient_filters() {
	let body = r#"{"tags": ["react"], "site_health": "working,unknown", "sort_order": "asc"}"#;
	let (status, json) = call(memory_app(), post(body, "alice")).await;

	assert_eq!(status, StatusCode::OK);
	assert_eq!(json["filtered"], 2);
	assert_eq!(json["filters_applied"]["sort_by"], "relevance");
	assert_eq!(json["filters_applied"]["sort_order"], "asc");
}

#[tokio::test]
async fn empty_body_means_no_filters() {
	let (status, json) = call(memory_app(), post("", "alice")).await;

	assert_eq!(status, StatusCode::OK);
	assert_eq!(json["filtered"], 3);
}

#[tokio::test]
async fn non_object_body_is_rejected() {
	let (status, json) = call(memory_app(), post(r#"["react"]"#, "alice")).await;

	assert_eq!(status, StatusCode::BAD_REQUEST);
	assert_eq!(json["error_code"], "INVALID_REQUEST");
	assert_eq!(json["fields"][0], "$");

	let (status, json) = call(memory_app(), post("{ nope", "alice")).await;

	assert_eq!(status, StatusCode::BAD_REQUEST);
	assert_eq!(json["error_code"], "INVALID_REQUEST");
}

#[tokio::test]
async fn missing_scope_header_is_an_invalid_request() {
	let (status, json) = call(memory_app(), get("/v1/bookmarks/search", None)).await;

	assert_eq!(status, StatusCode::BAD_REQUEST);
	assert_eq!(json["success"], false);
	assert_eq!(json["error"]["code"], "INVALID_REQUEST");
	assert_eq!(json["bookmarks"], serde_json::json!([]));
}

#[tokio::test]
async fn source_failure_maps_to_service_unavailable() {
	let state =
		AppState::with_source(test_config(PathBuf::from("unused")), Arc::new(OfflineSource));
	let (status, json) =
		call(routes::router(state), get("/v1/bookmarks/search", Some("alice"))).await;

	assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
	assert_eq!(json["success"], false);
	assert_eq!(json["error"]["code"], "SOURCE_UNAVAILABLE");
	assert_eq!(json["total"], 0);
	assert!(json["search_time_ms"].is_u64());
}

#[tokio::test]
async fn file_store_state_serves_on_disk_library() {
	let library_dir = TempLibrary::new().expect("Failed to create temp library.");

	library_dir.write("alice", &library()).expect("Failed to write library.");

	let app = routes::router(AppState::new(test_config(library_dir.root().to_path_buf())));
	let (status, json) = call(app, get("/v1/bookmarks/search?q=cooking", Some("alice"))).await;

	assert_eq!(status, StatusCode::OK);
	assert_eq!(ids(&json), vec!["b2"]);

	library_dir.cleanup().expect("Failed to cleanup temp library.");
}

#[tokio::test]
async fn huge_offset_is_clamped_without_crashing() {
	let (status, json) = call(
		memory_app(),
		get("/v1/bookmarks/search?limit=1&offset=99999999999", Some("alice")),
	)
	.await;

	assert_eq!(status, StatusCode::OK);
	assert_eq!(json["bookmarks"], serde_json::json!([]));
	assert_eq!(json["page"], u64::from(u32::MAX) + 1);
	assert_eq!(json["total_pages"], 3);
}
