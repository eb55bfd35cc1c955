//! Integration tests for `KintoneClient` and `KintoneStore` against a local
//! axum server standing in for Kintone.

use std::{
  collections::{HashMap, VecDeque},
  sync::{Arc, Mutex},
  time::Duration,
};

use axum::{
  Json, Router,
  body::Bytes,
  extract::{Query as QueryParams, State},
  http::{HeaderMap, Method, StatusCode, Uri, header::CONTENT_TYPE},
};
use chrono::NaiveDate;
use serde_json::{Value, json};
use staffhub_core::{period::MonthPeriod, store::HrStore};

use crate::{
  AppId, AppTokens, Apps, Error, KintoneClient, KintoneStore, RetryPolicy,
  client::{MAX_PAGE_SIZE, TOKEN_HEADER},
  query::Query,
  record::FieldMap,
};

const APP: AppId = AppId(303);

// ─── Mock server ─────────────────────────────────────────────────────────────

#[derive(Debug, Clone)]
struct Seen {
  method:  Method,
  path:    String,
  query:   HashMap<String, String>,
  headers: HeaderMap,
  body:    Option<Value>,
}

#[derive(Clone, Default)]
struct Mock {
  seen:    Arc<Mutex<Vec<Seen>>>,
  replies: Arc<Mutex<VecDeque<(StatusCode, Value)>>>,
}

impl Mock {
  fn seen(&self) -> Vec<Seen> { self.seen.lock().unwrap().clone() }
}

async fn handle(
  State(mock): State<Mock>,
  method: Method,
  uri: Uri,
  QueryParams(query): QueryParams<HashMap<String, String>>,
  headers: HeaderMap,
  body: Bytes,
) -> (StatusCode, Json<Value>) {
  let body = (!body.is_empty()).then(|| serde_json::from_slice(&body).unwrap());
  mock.seen.lock().unwrap().push(Seen { method, path: uri.path().to_owned(), query, headers, body });
  mock
    .replies
    .lock()
    .unwrap()
    .pop_front()
    .map(|(status, body)| (status, Json(body)))
    .unwrap_or((StatusCode::INTERNAL_SERVER_ERROR, Json(json!({ "message": "no reply queued" }))))
}

async fn serve(replies: Vec<(StatusCode, Value)>) -> (Mock, String) {
  let mock = Mock::default();
  mock.replies.lock().unwrap().extend(replies);
  let app = Router::new().fallback(handle).with_state(mock.clone());
  let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
  let addr = listener.local_addr().unwrap();
  tokio::spawn(async move { axum::serve(listener, app).await.unwrap() });
  (mock, format!("http://{addr}"))
}

fn retry() -> RetryPolicy { RetryPolicy { max_attempts: 3, base_delay_ms: 1, max_delay_ms: 5 } }

fn client(origin: &str, tokens: AppTokens) -> KintoneClient {
  KintoneClient::with_tokens(origin, tokens, Duration::from_secs(5), retry()).unwrap()
}

fn ok(body: Value) -> (StatusCode, Value) { (StatusCode::OK, body) }

fn records(records: Vec<Value>) -> (StatusCode, Value) {
  ok(json!({ "records": records, "totalCount": null }))
}

fn text(value: &str) -> Value { json!({ "type": "SINGLE_LINE_TEXT", "value": value }) }

// ─── Client: request shaping ─────────────────────────────────────────────────

#[tokio::test]
async fn missing_token_fails_before_any_request() {
  let (mock, origin) = serve(vec![]).await;
  let c = client(&origin, AppTokens::new().with(AppId(999), "other"));

  let err = c.get_records(APP, &Query::new(), &[], false).await.unwrap_err();
  assert!(matches!(err, Error::MissingToken { app } if app == APP));
  assert!(mock.seen().is_empty());
}

#[tokio::test]
async fn get_records_sends_token_query_and_no_content_type() {
  let (mock, origin) = serve(vec![ok(json!({
    "records": [{ "$id": { "type": "__ID__", "value": "9" }, "email": text("a@example.com") }],
    "totalCount": "41",
  }))])
  .await;
  let c = client(&origin, AppTokens::new().with(APP, "emp-token"));

  let query = Query::new().eq("email", "a@example.com");
  let page = c.get_records(APP, &query, &["$id", "email"], true).await.unwrap();
  assert_eq!(page.total_count, Some(41));
  assert_eq!(page.records[0].id(), 9);

  let seen = &mock.seen()[0];
  assert_eq!(seen.method, Method::GET);
  assert_eq!(seen.path, "/k/v1/records.json");
  assert_eq!(seen.headers[TOKEN_HEADER], "emp-token");
  assert!(seen.headers.get(CONTENT_TYPE).is_none());
  assert_eq!(seen.query["app"], "303");
  assert_eq!(seen.query["query"], r#"email = "a@example.com""#);
  assert_eq!(seen.query["fields[0]"], "$id");
  assert_eq!(seen.query["fields[1]"], "email");
  assert_eq!(seen.query["totalCount"], "true");
}

#[tokio::test]
async fn add_record_posts_json_and_returns_id() {
  let (mock, origin) = serve(vec![ok(json!({ "id": "15", "revision": "1" }))]).await;
  let c = client(&origin, AppTokens::new().with(APP, "t"));

  let created = c.add_record(APP, &FieldMap::new().set("status", "Pending")).await.unwrap();
  assert_eq!((created.id, created.revision), (15, 1));

  let seen = &mock.seen()[0];
  assert_eq!(seen.method, Method::POST);
  assert_eq!(seen.path, "/k/v1/record.json");
  assert!(seen.headers[CONTENT_TYPE].to_str().unwrap().starts_with("application/json"));
  assert_eq!(seen.body, Some(json!({ "app": 303, "record": { "status": { "value": "Pending" } } })));
}

#[tokio::test]
async fn update_record_always_sends_revision() {
  let (mock, origin) = serve(vec![ok(json!({ "revision": "5" }))]).await;
  let c = client(&origin, AppTokens::new().with(APP, "t"));

  let rev = c.update_record(APP, 7, &FieldMap::new().set("time_out", "17:00"), 4).await.unwrap();
  assert_eq!(rev, 5);

  let seen = &mock.seen()[0];
  assert_eq!(seen.method, Method::PUT);
  let body = seen.body.as_ref().unwrap();
  assert_eq!(body["id"], 7);
  assert_eq!(body["revision"], 4);
  assert_eq!(body["record"]["time_out"]["value"], "17:00");
}

#[tokio::test]
async fn stale_revision_is_a_conflict() {
  let (mock, origin) = serve(vec![(
    StatusCode::CONFLICT,
    json!({ "code": "GAIA_CO02", "id": "x", "message": "The revision is not the latest." }),
  )])
  .await;
  let c = client(&origin, AppTokens::new().with(APP, "t"));

  let err = c.update_record(APP, 7, &FieldMap::new().set("a", "b"), 3).await.unwrap_err();
  assert!(matches!(err, Error::RevisionConflict { id: 7, revision: 3, .. }));
  assert_eq!(mock.seen().len(), 1);
}

#[tokio::test]
async fn missing_record_is_not_found() {
  let (_mock, origin) = serve(vec![(
    StatusCode::NOT_FOUND,
    json!({ "code": "GAIA_RE01", "id": "x", "message": "The specified record (ID: 4) is not found." }),
  )])
  .await;
  let c = client(&origin, AppTokens::new().with(APP, "t"));

  let err = c.get_record(APP, 4).await.unwrap_err();
  assert!(matches!(err, Error::NotFound { id: 4, .. }));
}

// ─── Client: errors and retry ────────────────────────────────────────────────

#[tokio::test]
async fn transient_server_errors_are_retried() {
  let (mock, origin) = serve(vec![
    (StatusCode::SERVICE_UNAVAILABLE, json!({})),
    (StatusCode::TOO_MANY_REQUESTS, json!({})),
    records(vec![]),
  ])
  .await;
  let c = client(&origin, AppTokens::new().with(APP, "t"));

  let page = c.get_records(APP, &Query::new(), &[], false).await.unwrap();
  assert!(page.records.is_empty());
  assert_eq!(mock.seen().len(), 3);
}

#[tokio::test]
async fn retries_stop_at_max_attempts() {
  let (mock, origin) = serve(vec![]).await;
  let c = client(&origin, AppTokens::new().with(APP, "t"));

  let err = c.get_records(APP, &Query::new(), &[], false).await.unwrap_err();
  assert!(matches!(err, Error::Api { status: 500, .. }));
  assert_eq!(mock.seen().len(), 3);
}

#[tokio::test]
async fn client_errors_are_not_retried() {
  let (mock, origin) = serve(vec![(
    StatusCode::BAD_REQUEST,
    json!({ "code": "GAIA_IQ11", "id": "x", "message": "Invalid query." }),
  )])
  .await;
  let c = client(&origin, AppTokens::new().with(APP, "t"));

  let err = c.get_records(APP, &Query::new(), &[], false).await.unwrap_err();
  match err {
    Error::Api { status, code, message } => {
      assert_eq!(status, 400);
      assert_eq!(code, "GAIA_IQ11");
      assert_eq!(message, "Invalid query.");
    }
    other => panic!("unexpected error: {other:?}"),
  }
  assert_eq!(mock.seen().len(), 1);
}

#[tokio::test]
async fn inserts_are_not_replayed_after_a_server_error() {
  let (mock, origin) = serve(vec![(StatusCode::BAD_GATEWAY, json!({}))]).await;
  let c = client(&origin, AppTokens::new().with(APP, "t"));

  assert!(c.add_record(APP, &FieldMap::new().set("a", "b")).await.is_err());
  assert_eq!(mock.seen().len(), 1);
}

#[tokio::test]
async fn get_all_records_pages_until_a_short_page() {
  let full: Vec<Value> = (1..=MAX_PAGE_SIZE).map(|i| json!({ "$id": { "value": i.to_string() } })).collect();
  let (mock, origin) = serve(vec![records(full), records(vec![json!({ "$id": { "value": "501" } })])]).await;
  let c = client(&origin, AppTokens::new().with(APP, "t"));

  let all = c.get_all_records(APP, &Query::new().eq("department", "Finance"), &[]).await.unwrap();
  assert_eq!(all.len(), MAX_PAGE_SIZE + 1);

  let seen = mock.seen();
  assert_eq!(seen.len(), 2);
  assert_eq!(seen[0].query["query"], r#"department = "Finance" limit 500 offset 0"#);
  assert_eq!(seen[1].query["query"], r#"department = "Finance" limit 500 offset 500"#);
}

// ─── Store ───────────────────────────────────────────────────────────────────

fn store(origin: &str) -> KintoneStore {
  let apps = Apps::default();
  let tokens = apps.named().into_iter().fold(AppTokens::new(), |t, (name, app)| t.with(app, name));
  KintoneStore::new(client(origin, tokens), apps)
}

#[tokio::test]
async fn employee_lookup_escapes_the_email() {
  let (mock, origin) = serve(vec![records(vec![json!({
    "$id": { "value": "3" },
    "$revision": { "value": "2" },
    "email": text("x\"y@example.com"),
    "is_verified": text("Yes"),
  })])])
  .await;

  let employee = store(&origin).employee_by_email("x\"y@example.com").await.unwrap().unwrap();
  assert_eq!((employee.id, employee.revision), (3, 2));
  assert!(employee.is_verified);

  let seen = &mock.seen()[0];
  assert_eq!(seen.headers[TOKEN_HEADER], "employees");
  assert_eq!(seen.query["query"], r#"email = "x\"y@example.com" limit 1"#);
}

#[tokio::test]
async fn unknown_record_id_is_none() {
  let (_mock, origin) = serve(vec![(StatusCode::NOT_FOUND, json!({ "code": "GAIA_RE01", "message": "not found" }))]).await;
  assert!(store(&origin).employee_by_record_id(99).await.unwrap().is_none());
}

#[tokio::test]
async fn dtr_month_filter_uses_the_real_last_day() {
  let (mock, origin) = serve(vec![records(vec![])]).await;
  let month: MonthPeriod = "2024-02".parse().unwrap();

  store(&origin).dtr_records("EMP-001", Some(month)).await.unwrap();

  let seen = &mock.seen()[0];
  assert_eq!(seen.query["app"], "308");
  assert_eq!(
    seen.query["query"],
    r#"employee_id = "EMP-001" and date >= "2024-02-01" and date <= "2024-02-29" order by date desc limit 100"#
  );
}

#[tokio::test]
async fn expired_announcements_are_dropped() {
  let (mock, origin) = serve(vec![records(vec![
    json!({ "$id": { "value": "1" }, "title": text("Holiday"), "is_active": text("Yes"), "expiry_date": text("2024-04-30") }),
    json!({ "$id": { "value": "2" }, "title": text("Town hall"), "is_active": text("Yes"), "expiry_date": text("") }),
  ])])
  .await;
  let today = NaiveDate::from_ymd_opt(2024, 5, 1).unwrap();

  let found = store(&origin).active_announcements(today).await.unwrap();
  assert_eq!(found.iter().map(|a| a.id).collect::<Vec<_>>(), vec![2]);
  assert_eq!(
    mock.seen()[0].query["query"],
    r#"is_active in ("Yes") and publish_date <= "2024-05-01" order by priority desc limit 20"#
  );
}

#[tokio::test]
async fn empty_update_sends_nothing() {
  let (mock, origin) = serve(vec![]).await;
  let rev = store(&origin).update_profile(3, 8, &Default::default()).await.unwrap();
  assert_eq!(rev, 8);
  assert!(mock.seen().is_empty());
}
