//! In-process mock of the Argilla REST API.
//!
//! Only the endpoints the SDK calls are served. State lives in memory and is
//! shared with the test through [`MockArgilla::state`] so tests can inspect
//! what the client sent.

use std::collections::HashMap;
use std::sync::Arc;

use argilla_sdk::auth::API_KEY_HEADER;
use argilla_sdk::ArgillaClient;
use axum::extract::{Path, Query, Request, State};
use axum::http::StatusCode;
use axum::middleware::{self, Next};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post, put};
use axum::{Json, Router};
use parking_lot::RwLock;
use serde_json::{json, Value};
use tracing_subscriber::EnvFilter;
use uuid::Uuid;

/// API key accepted by the mock server.
pub const OWNER_API_KEY: &str = "owner.apikey";

/// Id of the user behind [`OWNER_API_KEY`].
pub const OWNER_ID: Uuid = Uuid::from_u128(0x6f1d_2c3a_0000_4000_8000_0000_0000_0001);

const FIELDS: &str = "fields";
const QUESTIONS: &str = "questions";
const METADATA: &str = "metadata-properties";
const VECTORS: &str = "vectors-settings";

type Failure = (StatusCode, Json<Value>);
type Reply = Result<Json<Value>, Failure>;

/// Everything the mock server stores.
#[derive(Debug, Default)]
pub struct MockState {
    /// Workspaces.
    pub workspaces: Vec<Value>,
    /// Datasets.
    pub datasets: Vec<Value>,
    /// Schema items keyed by dataset and kind.
    pub schema: HashMap<(Uuid, &'static str), Vec<Value>>,
    /// Records per dataset, in insertion order.
    pub records: HashMap<Uuid, Vec<Value>>,
    /// Item count of every bulk request received.
    pub bulk_sizes: Vec<usize>,
    /// `(offset, limit)` of every record listing received.
    pub page_requests: Vec<(usize, usize)>,
}

impl MockState {
    fn dataset(&self, id: Uuid) -> Result<&Value, Failure> {
        self.datasets
            .iter()
            .find(|d| d["id"] == json!(id))
            .ok_or_else(|| fail(StatusCode::NOT_FOUND, format!("Dataset with id `{id}` not found")))
    }

    fn dataset_mut(&mut self, id: Uuid) -> Result<&mut Value, Failure> {
        self.datasets
            .iter_mut()
            .find(|d| d["id"] == json!(id))
            .ok_or_else(|| fail(StatusCode::NOT_FOUND, format!("Dataset with id `{id}` not found")))
    }

    fn items(&self, id: Uuid, kind: &'static str) -> Vec<Value> {
        self.schema.get(&(id, kind)).cloned().unwrap_or_default()
    }

    /// Returns the stored records of a dataset.
    pub fn records_of(&self, id: Uuid) -> Vec<Value> {
        self.records.get(&id).cloned().unwrap_or_default()
    }
}

/// Shared handle to the mock state.
pub type SharedState = Arc<RwLock<MockState>>;

/// A running mock server.
pub struct MockArgilla {
    /// Base URL, e.g. `http://127.0.0.1:41234`.
    pub base_url: String,
    /// Server state.
    pub state: SharedState,
}

impl MockArgilla {
    /// Starts a server on an ephemeral port.
    pub async fn start() -> Self {
        init_tracing();

        let state = SharedState::default();
        let app = router(Arc::clone(&state));

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind mock server");
        let addr = listener.local_addr().expect("Failed to read local address");
        tokio::spawn(async move {
            axum::serve(listener, app).await.expect("Mock server failed");
        });

        Self {
            base_url: format!("http://{addr}"),
            state,
        }
    }

    /// Returns a client authenticated as the owner.
    pub fn client(&self) -> ArgillaClient {
        self.client_with_key(OWNER_API_KEY)
    }

    /// Returns a client using the given API key.
    pub fn client_with_key(&self, key: &str) -> ArgillaClient {
        ArgillaClient::builder()
            .base_url(&self.base_url)
            .api_key(key)
            .build()
            .expect("Failed to build client")
    }

    /// Creates a workspace directly in the server state.
    pub fn seed_workspace(&self, name: &str) -> Uuid {
        let id = Uuid::new_v4();
        self.state
            .write()
            .workspaces
            .push(json!({"id": id, "name": name}));
        id
    }
}

/// Installs a test-writer subscriber honoring `RUST_LOG`.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_test_writer()
        .with_env_filter(EnvFilter::from_default_env())
        .try_init();
}

fn router(state: SharedState) -> Router {
    Router::new()
        .route("/api/v1/me", get(me))
        .route("/api/v1/users", get(list_users))
        .route("/api/v1/me/workspaces", get(list_workspaces))
        .route("/api/v1/workspaces", post(create_workspace))
        .route("/api/v1/me/datasets", get(list_datasets))
        .route("/api/v1/datasets", post(create_dataset))
        .route("/api/v1/datasets/:id", get(get_dataset).delete(delete_dataset))
        .route("/api/v1/datasets/:id/publish", put(publish_dataset))
        .route("/api/v1/datasets/:id/fields", get(list_fields).post(create_field))
        .route(
            "/api/v1/datasets/:id/questions",
            get(list_questions).post(create_question),
        )
        .route(
            "/api/v1/datasets/:id/metadata-properties",
            get(list_metadata).post(create_metadata),
        )
        .route(
            "/api/v1/datasets/:id/vectors-settings",
            get(list_vectors).post(create_vectors),
        )
        .route(
            "/api/v1/datasets/:id/records",
            get(list_records).delete(delete_records),
        )
        .route(
            "/api/v1/datasets/:id/records/bulk",
            put(upsert_records).post(create_records),
        )
        .route("/api/v1/datasets/:id/records/search", post(search_records))
        .route("/api/v1/records/:id", get(get_record))
        .layer(middleware::from_fn(require_api_key))
        .with_state(state)
}

fn fail(status: StatusCode, detail: impl Into<String>) -> Failure {
    (status, Json(json!({"detail": detail.into()})))
}

async fn require_api_key(request: Request, next: Next) -> Response {
    let authorized = request
        .headers()
        .get(API_KEY_HEADER)
        .is_some_and(|key| key.as_bytes() == OWNER_API_KEY.as_bytes());
    if authorized {
        next.run(request).await
    } else {
        fail(StatusCode::UNAUTHORIZED, "Could not validate credentials").into_response()
    }
}

fn owner() -> Value {
    json!({
        "id": OWNER_ID,
        "username": "owner",
        "first_name": "Owner",
        "role": "owner",
    })
}

async fn me() -> Json<Value> {
    Json(owner())
}

async fn list_users() -> Json<Value> {
    Json(json!({"items": [owner()]}))
}

async fn list_workspaces(State(state): State<SharedState>) -> Json<Value> {
    Json(json!({"items": state.read().workspaces}))
}

async fn create_workspace(State(state): State<SharedState>, Json(body): Json<Value>) -> Reply {
    let mut state = state.write();
    if state.workspaces.iter().any(|w| w["name"] == body["name"]) {
        return Err(fail(StatusCode::CONFLICT, "Workspace name already exists"));
    }
    let workspace = json!({"id": Uuid::new_v4(), "name": body["name"]});
    state.workspaces.push(workspace.clone());
    Ok(Json(workspace))
}

async fn list_datasets(
    State(state): State<SharedState>,
    Query(params): Query<HashMap<String, String>>,
) -> Json<Value> {
    let state = state.read();
    let items: Vec<&Value> = state
        .datasets
        .iter()
        .filter(|d| match params.get("workspace_id") {
            Some(workspace_id) => d["workspace_id"] == workspace_id.as_str(),
            None => true,
        })
        .collect();
    Json(json!({"items": items}))
}

async fn create_dataset(State(state): State<SharedState>, Json(body): Json<Value>) -> Reply {
    let mut state = state.write();
    let duplicate = state
        .datasets
        .iter()
        .any(|d| d["name"] == body["name"] && d["workspace_id"] == body["workspace_id"]);
    if duplicate {
        return Err(fail(StatusCode::CONFLICT, "Dataset name already exists"));
    }
    let dataset = json!({
        "id": Uuid::new_v4(),
        "name": body["name"],
        "guidelines": body["guidelines"],
        "allow_extra_metadata": body["allow_extra_metadata"].as_bool().unwrap_or(false),
        "distribution": body["distribution"],
        "workspace_id": body["workspace_id"],
        "status": "draft",
    });
    state.datasets.push(dataset.clone());
    Ok(Json(dataset))
}

async fn get_dataset(State(state): State<SharedState>, Path(id): Path<Uuid>) -> Reply {
    Ok(Json(state.read().dataset(id)?.clone()))
}

async fn delete_dataset(
    State(state): State<SharedState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, Failure> {
    let mut state = state.write();
    state.dataset(id)?;
    state.datasets.retain(|d| d["id"] != json!(id));
    state.records.remove(&id);
    Ok(StatusCode::NO_CONTENT)
}

async fn publish_dataset(State(state): State<SharedState>, Path(id): Path<Uuid>) -> Reply {
    let mut state = state.write();
    if state.items(id, FIELDS).is_empty() || state.items(id, QUESTIONS).is_empty() {
        state.dataset(id)?;
        return Err(fail(
            StatusCode::UNPROCESSABLE_ENTITY,
            "Dataset cannot be published without fields and questions",
        ));
    }
    let dataset = state.dataset_mut(id)?;
    dataset["status"] = json!("ready");
    Ok(Json(dataset.clone()))
}

fn list_schema(state: &SharedState, id: Uuid, kind: &'static str) -> Reply {
    let state = state.read();
    state.dataset(id)?;
    Ok(Json(json!({"items": state.items(id, kind)})))
}

fn create_schema(state: &SharedState, id: Uuid, kind: &'static str, mut body: Value) -> Reply {
    let mut state = state.write();
    let dataset = state.dataset(id)?;
    if matches!(kind, FIELDS | QUESTIONS) && dataset["status"] == "ready" {
        return Err(fail(
            StatusCode::UNPROCESSABLE_ENTITY,
            "Fields and questions cannot be added to a published dataset",
        ));
    }
    let items = state.schema.entry((id, kind)).or_default();
    if items.iter().any(|item| item["name"] == body["name"]) {
        return Err(fail(StatusCode::CONFLICT, "Name already exists"));
    }
    body["id"] = json!(Uuid::new_v4());
    body["dataset_id"] = json!(id);
    items.push(body.clone());
    Ok(Json(body))
}

async fn list_fields(State(state): State<SharedState>, Path(id): Path<Uuid>) -> Reply {
    list_schema(&state, id, FIELDS)
}

async fn create_field(
    State(state): State<SharedState>,
    Path(id): Path<Uuid>,
    Json(body): Json<Value>,
) -> Reply {
    create_schema(&state, id, FIELDS, body)
}

async fn list_questions(State(state): State<SharedState>, Path(id): Path<Uuid>) -> Reply {
    list_schema(&state, id, QUESTIONS)
}

async fn create_question(
    State(state): State<SharedState>,
    Path(id): Path<Uuid>,
    Json(body): Json<Value>,
) -> Reply {
    create_schema(&state, id, QUESTIONS, body)
}

async fn list_metadata(State(state): State<SharedState>, Path(id): Path<Uuid>) -> Reply {
    list_schema(&state, id, METADATA)
}

async fn create_metadata(
    State(state): State<SharedState>,
    Path(id): Path<Uuid>,
    Json(body): Json<Value>,
) -> Reply {
    create_schema(&state, id, METADATA, body)
}

async fn list_vectors(State(state): State<SharedState>, Path(id): Path<Uuid>) -> Reply {
    list_schema(&state, id, VECTORS)
}

async fn create_vectors(
    State(state): State<SharedState>,
    Path(id): Path<Uuid>,
    Json(body): Json<Value>,
) -> Reply {
    create_schema(&state, id, VECTORS, body)
}

fn usize_param(params: &HashMap<String, String>, name: &str, default: usize) -> usize {
    params
        .get(name)
        .and_then(|value| value.parse().ok())
        .unwrap_or(default)
}

async fn list_records(
    State(state): State<SharedState>,
    Path(id): Path<Uuid>,
    Query(params): Query<HashMap<String, String>>,
) -> Reply {
    let offset = usize_param(&params, "offset", 0);
    let limit = usize_param(&params, "limit", 50);

    let mut state = state.write();
    state.dataset(id)?;
    state.page_requests.push((offset, limit));
    let records = state.records_of(id);
    let page: Vec<&Value> = records.iter().skip(offset).take(limit).collect();
    Ok(Json(json!({"items": page, "total": records.len()})))
}

async fn delete_records(
    State(state): State<SharedState>,
    Path(id): Path<Uuid>,
    Query(params): Query<HashMap<String, String>>,
) -> Result<StatusCode, Failure> {
    let ids: Vec<Value> = params
        .get("ids")
        .map(|ids| ids.split(',').map(|id| json!(id)).collect())
        .unwrap_or_default();

    let mut state = state.write();
    state.dataset(id)?;
    if let Some(records) = state.records.get_mut(&id) {
        records.retain(|r| !ids.contains(&r["id"]));
    }
    Ok(StatusCode::NO_CONTENT)
}

#[derive(Clone, Copy, PartialEq)]
enum WriteMode {
    Create,
    Upsert,
}

async fn upsert_records(
    State(state): State<SharedState>,
    Path(id): Path<Uuid>,
    Json(body): Json<Value>,
) -> Reply {
    store_records(&state, id, &body, WriteMode::Upsert)
}

async fn create_records(
    State(state): State<SharedState>,
    Path(id): Path<Uuid>,
    Json(body): Json<Value>,
) -> Reply {
    store_records(&state, id, &body, WriteMode::Create)
}

fn same_record(stored: &Value, item: &Value) -> bool {
    (!item["id"].is_null() && stored["id"] == item["id"])
        || (!item["external_id"].is_null() && stored["external_id"] == item["external_id"])
}

fn store_records(state: &SharedState, id: Uuid, body: &Value, mode: WriteMode) -> Reply {
    let mut state = state.write();
    if state.dataset(id)?["status"] != "ready" {
        return Err(fail(
            StatusCode::UNPROCESSABLE_ENTITY,
            "Records cannot be added to a draft dataset",
        ));
    }
    let field_names: Vec<Value> = state
        .items(id, FIELDS)
        .iter()
        .map(|field| field["name"].clone())
        .collect();

    let items = body["items"].as_array().cloned().unwrap_or_default();
    state.bulk_sizes.push(items.len());

    let mut stored = Vec::with_capacity(items.len());
    for item in items {
        if let Some(fields) = item["fields"].as_object() {
            if let Some(unknown) = fields.keys().find(|name| !field_names.contains(&json!(name))) {
                return Err(fail(
                    StatusCode::UNPROCESSABLE_ENTITY,
                    format!("Found fields values for non configured fields: ['{unknown}']"),
                ));
            }
        }

        let records = state.records.entry(id).or_default();
        let position = records.iter().position(|r| same_record(r, &item));
        if mode == WriteMode::Create && position.is_some() {
            return Err(fail(StatusCode::CONFLICT, "Record already exists"));
        }

        let record_id = position.map_or_else(|| json!(Uuid::new_v4()), |i| records[i]["id"].clone());
        let suggestions: Vec<Value> = item["suggestions"]
            .as_array()
            .map(|suggestions| {
                suggestions
                    .iter()
                    .map(|s| {
                        let mut s = s.clone();
                        s["id"] = json!(Uuid::new_v4());
                        s
                    })
                    .collect()
            })
            .unwrap_or_default();

        let record = json!({
            "id": record_id,
            "external_id": item["external_id"],
            "fields": item["fields"],
            "metadata": item["metadata"],
            "vectors": item["vectors"],
            "suggestions": suggestions,
            "responses": item["responses"],
            "status": "pending",
            "dataset_id": id,
        });
        match position {
            Some(i) => records[i] = record.clone(),
            None => records.push(record.clone()),
        }
        stored.push(record);
    }

    Ok(Json(json!({"items": stored})))
}

async fn search_records(
    State(state): State<SharedState>,
    Path(id): Path<Uuid>,
    Json(body): Json<Value>,
) -> Reply {
    let text = &body["query"]["text"];
    let q = text["q"].as_str().unwrap_or_default().to_lowercase();
    let field = text["field"].as_str();

    let state = state.read();
    state.dataset(id)?;
    let hits: Vec<Value> = state
        .records_of(id)
        .into_iter()
        .filter(|record| {
            record["fields"].as_object().is_some_and(|fields| {
                fields
                    .iter()
                    .filter(|(name, _)| field.map_or(true, |f| f == name.as_str()))
                    .filter_map(|(_, value)| value.as_str())
                    .any(|value| value.to_lowercase().contains(&q))
            })
        })
        .map(|record| json!({"record": record, "query_score": 1.0}))
        .collect();
    Ok(Json(json!({"total": hits.len(), "items": hits})))
}

async fn get_record(State(state): State<SharedState>, Path(id): Path<Uuid>) -> Reply {
    state
        .read()
        .records
        .values()
        .flatten()
        .find(|r| r["id"] == json!(id))
        .cloned()
        .map(Json)
        .ok_or_else(|| fail(StatusCode::NOT_FOUND, format!("Record with id `{id}` not found")))
}
