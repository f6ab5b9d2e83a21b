//! In-memory management API for integration tests.
//!
//! Serves just enough of the organization, environment, KVM, and
//! target-server endpoints to drive the real hyper transport end to end.

#![allow(dead_code)]

use std::collections::BTreeMap;
use std::net::SocketAddr;
use std::sync::{Arc, Mutex};

use axum::extract::{Path, Request, State};
use axum::http::{header, StatusCode};
use axum::middleware::{self, Next};
use axum::response::Response;
use axum::routing::{get, post};
use axum::{Json, Router};
use serde_json::{json, Value};

use edgemgmt::connection::{Connection, Credentials};
use edgemgmt::resources::Org;

type KvmKey = (String, String);
type Reply = (StatusCode, Json<Value>);

#[derive(Debug, Default)]
pub struct Inner {
    pub cps: bool,
    pub environments: Vec<String>,
    pub kvms: BTreeMap<KvmKey, BTreeMap<String, String>>,
    pub targets: BTreeMap<(String, String), Value>,
    pub log: Vec<String>,
    pub authorization: Vec<String>,
}

#[derive(Clone, Default)]
pub struct MockApi {
    inner: Arc<Mutex<Inner>>,
}

impl MockApi {
    pub fn new(cps: bool) -> Self {
        let api = Self::default();
        {
            let mut inner = api.inner.lock().unwrap();
            inner.cps = cps;
            inner.environments = vec!["prod".into(), "test".into()];
        }
        api
    }

    pub fn with_kvm(self, env: &str, name: &str, entries: &[(&str, &str)]) -> Self {
        self.inner.lock().unwrap().kvms.insert(
            (env.into(), name.into()),
            entries
                .iter()
                .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
                .collect(),
        );
        self
    }

    pub fn with_target(self, env: &str, target: Value) -> Self {
        let name = target["name"].as_str().unwrap().to_string();
        self.inner
            .lock()
            .unwrap()
            .targets
            .insert((env.into(), name), target);
        self
    }

    /// `"METHOD /path"` for every request received, in order.
    pub fn log(&self) -> Vec<String> {
        self.inner.lock().unwrap().log.clone()
    }

    pub fn authorization(&self) -> Vec<String> {
        self.inner.lock().unwrap().authorization.clone()
    }

    pub fn kvm(&self, env: &str, name: &str) -> Option<BTreeMap<String, String>> {
        self.inner
            .lock()
            .unwrap()
            .kvms
            .get(&(env.to_string(), name.to_string()))
            .cloned()
    }

    pub fn target(&self, env: &str, name: &str) -> Option<Value> {
        self.inner
            .lock()
            .unwrap()
            .targets
            .get(&(env.to_string(), name.to_string()))
            .cloned()
    }
}

pub struct TestServer {
    pub addr: SocketAddr,
    pub api: MockApi,
    shutdown: Option<tokio::sync::oneshot::Sender<()>>,
}

impl TestServer {
    pub fn url(&self) -> String {
        format!("http://{}", self.addr)
    }

    pub fn org(&self) -> Org {
        Org::new(
            Connection::builder(self.url(), "acme")
                .credentials(Credentials::Basic {
                    username: "user".into(),
                    password: "pass".into(),
                })
                .build()
                .unwrap(),
        )
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        if let Some(tx) = self.shutdown.take() {
            let _ = tx.send(());
        }
    }
}

pub async fn start_test_server(api: MockApi) -> TestServer {
    let router = Router::new()
        .route("/v1/o/{org}", get(org_record))
        .route("/v1/o/{org}/environments", get(list_environments))
        .route(
            "/v1/o/{org}/e/{env}/keyvaluemaps",
            get(list_kvms).post(create_kvm),
        )
        .route(
            "/v1/o/{org}/e/{env}/keyvaluemaps/{map}",
            get(get_kvm).post(update_kvm).delete(delete_kvm),
        )
        .route(
            "/v1/o/{org}/e/{env}/keyvaluemaps/{map}/entries",
            post(create_entry),
        )
        .route(
            "/v1/o/{org}/e/{env}/keyvaluemaps/{map}/entries/{key}",
            get(get_entry).post(update_entry),
        )
        .route(
            "/v1/o/{org}/e/{env}/targetservers",
            get(list_targets).post(create_target),
        )
        .route(
            "/v1/o/{org}/e/{env}/targetservers/{name}",
            get(get_target).put(put_target).delete(delete_target),
        )
        .layer(middleware::from_fn_with_state(api.clone(), record))
        .with_state(api.clone());

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    let (shutdown_tx, shutdown_rx) = tokio::sync::oneshot::channel::<()>();

    tokio::spawn(async move {
        axum::serve(listener, router)
            .with_graceful_shutdown(async {
                let _ = shutdown_rx.await;
            })
            .await
            .unwrap();
    });

    TestServer {
        addr,
        api,
        shutdown: Some(shutdown_tx),
    }
}

async fn record(State(api): State<MockApi>, request: Request, next: Next) -> Response {
    {
        let mut inner = api.inner.lock().unwrap();
        inner
            .log
            .push(format!("{} {}", request.method(), request.uri().path()));
        if let Some(auth) = request
            .headers()
            .get(header::AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
        {
            inner.authorization.push(auth.to_string());
        }
    }
    next.run(request).await
}

fn not_found(code: &str, message: String) -> Reply {
    (
        StatusCode::NOT_FOUND,
        Json(json!({ "code": code, "message": message })),
    )
}

fn kvm_body(name: &str, entries: &BTreeMap<String, String>) -> Value {
    json!({
        "name": name,
        "encrypted": false,
        "entry": entries
            .iter()
            .map(|(k, v)| json!({ "name": k, "value": v }))
            .collect::<Vec<_>>(),
    })
}

fn entries_from(body: &Value) -> BTreeMap<String, String> {
    body["entry"]
        .as_array()
        .map(|entries| {
            entries
                .iter()
                .map(|e| {
                    (
                        e["name"].as_str().unwrap_or_default().to_string(),
                        e["value"].as_str().unwrap_or_default().to_string(),
                    )
                })
                .collect()
        })
        .unwrap_or_default()
}

async fn org_record(State(api): State<MockApi>, Path(org): Path<String>) -> Reply {
    let cps = api.inner.lock().unwrap().cps;
    (
        StatusCode::OK,
        Json(json!({
            "name": org,
            "type": "paid",
            "properties": {
                "property": [
                    { "name": "features.isCpsEnabled", "value": cps.to_string() },
                    { "name": "features.isSmbOrganization", "value": "false" }
                ]
            }
        })),
    )
}

async fn list_environments(State(api): State<MockApi>) -> Json<Value> {
    Json(json!(api.inner.lock().unwrap().environments))
}

async fn list_kvms(
    State(api): State<MockApi>,
    Path((_org, env)): Path<(String, String)>,
) -> Json<Value> {
    let inner = api.inner.lock().unwrap();
    let names: Vec<&str> = inner
        .kvms
        .keys()
        .filter(|(e, _)| *e == env)
        .map(|(_, name)| name.as_str())
        .collect();
    Json(json!(names))
}

async fn create_kvm(
    State(api): State<MockApi>,
    Path((_org, env)): Path<(String, String)>,
    Json(body): Json<Value>,
) -> Reply {
    let name = body["name"].as_str().unwrap_or_default().to_string();
    let mut inner = api.inner.lock().unwrap();
    let key = (env, name.clone());
    if inner.kvms.contains_key(&key) {
        return (
            StatusCode::CONFLICT,
            Json(json!({
                "code": "keyvaluemap.service.keyvaluemap.already.exists",
                "message": format!("Key value map {name} already exists")
            })),
        );
    }
    let entries = entries_from(&body);
    let reply = kvm_body(&name, &entries);
    inner.kvms.insert(key, entries);
    (StatusCode::CREATED, Json(reply))
}

async fn get_kvm(
    State(api): State<MockApi>,
    Path((_org, env, map)): Path<(String, String, String)>,
) -> Reply {
    let inner = api.inner.lock().unwrap();
    match inner.kvms.get(&(env, map.clone())) {
        Some(entries) => (StatusCode::OK, Json(kvm_body(&map, entries))),
        None => not_found(
            "keyvaluemap.service.keyvaluemap.doesnot.exist",
            format!("keyvaluemap {map} does not exist"),
        ),
    }
}

async fn update_kvm(
    State(api): State<MockApi>,
    Path((_org, env, map)): Path<(String, String, String)>,
    Json(body): Json<Value>,
) -> Reply {
    let mut inner = api.inner.lock().unwrap();
    if inner.cps {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({
                "code": "keyvaluemap.service.feature.unsupported",
                "message": "Updating a whole map is not supported in this organization"
            })),
        );
    }
    match inner.kvms.get_mut(&(env, map.clone())) {
        Some(entries) => {
            entries.extend(entries_from(&body));
            (StatusCode::OK, Json(kvm_body(&map, entries)))
        }
        None => not_found(
            "keyvaluemap.service.keyvaluemap.doesnot.exist",
            format!("keyvaluemap {map} does not exist"),
        ),
    }
}

async fn delete_kvm(
    State(api): State<MockApi>,
    Path((_org, env, map)): Path<(String, String, String)>,
) -> Reply {
    let mut inner = api.inner.lock().unwrap();
    match inner.kvms.remove(&(env, map.clone())) {
        Some(entries) => (StatusCode::OK, Json(kvm_body(&map, &entries))),
        None => not_found(
            "keyvaluemap.service.keyvaluemap.doesnot.exist",
            format!("keyvaluemap {map} does not exist"),
        ),
    }
}

async fn get_entry(
    State(api): State<MockApi>,
    Path((_org, env, map, key)): Path<(String, String, String, String)>,
) -> Reply {
    let inner = api.inner.lock().unwrap();
    match inner.kvms.get(&(env, map)).and_then(|m| m.get(&key)) {
        Some(value) => (StatusCode::OK, Json(json!({ "name": key, "value": value }))),
        None => not_found(
            "keyvaluemap.service.entry.doesnot.exist",
            format!("entry {key} does not exist"),
        ),
    }
}

async fn update_entry(
    State(api): State<MockApi>,
    Path((_org, env, map, key)): Path<(String, String, String, String)>,
    Json(body): Json<Value>,
) -> Reply {
    let mut inner = api.inner.lock().unwrap();
    match inner.kvms.get_mut(&(env, map)).and_then(|m| m.get_mut(&key)) {
        Some(value) => {
            body["value"].as_str().unwrap_or_default().clone_into(value);
            (StatusCode::OK, Json(json!({ "name": key, "value": value })))
        }
        None => not_found(
            "keyvaluemap.service.entry.doesnot.exist",
            format!("entry {key} does not exist"),
        ),
    }
}

async fn create_entry(
    State(api): State<MockApi>,
    Path((_org, env, map)): Path<(String, String, String)>,
    Json(body): Json<Value>,
) -> Reply {
    let mut inner = api.inner.lock().unwrap();
    let Some(entries) = inner.kvms.get_mut(&(env, map.clone())) else {
        return not_found(
            "keyvaluemap.service.keyvaluemap.doesnot.exist",
            format!("keyvaluemap {map} does not exist"),
        );
    };
    let name = body["name"].as_str().unwrap_or_default().to_string();
    let value = body["value"].as_str().unwrap_or_default().to_string();
    entries.insert(name.clone(), value.clone());
    (
        StatusCode::CREATED,
        Json(json!({ "name": name, "value": value })),
    )
}

fn target_missing(env: &str, name: &str) -> Reply {
    not_found(
        "messaging.config.beans.TargetServerDoesNotExist",
        format!("Target server {name} does not exist in environment {env}"),
    )
}

async fn list_targets(
    State(api): State<MockApi>,
    Path((_org, env)): Path<(String, String)>,
) -> Json<Value> {
    let inner = api.inner.lock().unwrap();
    let names: Vec<&str> = inner
        .targets
        .keys()
        .filter(|(e, _)| *e == env)
        .map(|(_, name)| name.as_str())
        .collect();
    Json(json!(names))
}

async fn create_target(
    State(api): State<MockApi>,
    Path((_org, env)): Path<(String, String)>,
    Json(body): Json<Value>,
) -> Reply {
    let name = body["name"].as_str().unwrap_or_default().to_string();
    let mut inner = api.inner.lock().unwrap();
    let key = (env.clone(), name.clone());
    if inner.targets.contains_key(&key) {
        return (
            StatusCode::CONFLICT,
            Json(json!({
                "code": "messaging.config.beans.TargetServerAlreadyExists",
                "message": format!("Target server {name} already exists in environment {env}")
            })),
        );
    }
    inner.targets.insert(key, body.clone());
    (StatusCode::CREATED, Json(body))
}

async fn get_target(
    State(api): State<MockApi>,
    Path((_org, env, name)): Path<(String, String, String)>,
) -> Reply {
    let inner = api.inner.lock().unwrap();
    match inner.targets.get(&(env.clone(), name.clone())) {
        Some(target) => (StatusCode::OK, Json(target.clone())),
        None => target_missing(&env, &name),
    }
}

async fn put_target(
    State(api): State<MockApi>,
    Path((_org, env, name)): Path<(String, String, String)>,
    Json(body): Json<Value>,
) -> Reply {
    let mut inner = api.inner.lock().unwrap();
    match inner.targets.get_mut(&(env.clone(), name.clone())) {
        Some(target) => {
            *target = body.clone();
            (StatusCode::OK, Json(body))
        }
        None => target_missing(&env, &name),
    }
}

async fn delete_target(
    State(api): State<MockApi>,
    Path((_org, env, name)): Path<(String, String, String)>,
) -> Reply {
    let mut inner = api.inner.lock().unwrap();
    match inner.targets.remove(&(env.clone(), name.clone())) {
        Some(target) => (StatusCode::OK, Json(target)),
        None => target_missing(&env, &name),
    }
}
