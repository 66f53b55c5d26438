//! Integration tests driving the HTTP API end to end.

use std::sync::Arc;
use std::time::Duration;

use axum::body::Body;
use axum::http::{Method, Request, StatusCode};
use axum::Router;
use serde_json::{json, Value};
use tower::ServiceExt;
use uuid::Uuid;

use kvgraph_core::KeyPattern;
use kvgraph_server::config::ServerConfig;
use kvgraph_server::router::build_router;
use kvgraph_server::state::AppState;
use kvgraph_storage::{digest, InMemoryStore, KvStore};

fn test_app() -> (Arc<InMemoryStore>, Router) {
    let store = Arc::new(InMemoryStore::new());
    let app = build_router(AppState::with_store(store.clone()));
    (store, app)
}

async fn request_json(
    app: &Router,
    method: Method,
    path: &str,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(path);
    let body = match body {
        Some(v) => {
            builder = builder.header("content-type", "application/json");
            Body::from(serde_json::to_vec(&v).unwrap())
        }
        None => Body::empty(),
    };

    let response = app.clone().oneshot(builder.body(body).unwrap()).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let json = serde_json::from_slice(&bytes).unwrap_or(json!(null));
    (status, json)
}

async fn op(app: &Router, operation: &str, id: &str, body: Value) -> Value {
    let (status, reply) =
        request_json(app, Method::POST, &format!("/ops/{operation}/{id}"), Some(body)).await;
    assert_eq!(status, StatusCode::OK, "{operation} {id}: {reply:?}");
    reply
}

async fn get_json(app: &Router, path: &str) -> (StatusCode, Value) {
    request_json(app, Method::GET, path, None).await
}

fn everything() -> KeyPattern {
    KeyPattern::parse(">").unwrap()
}

#[tokio::test]
async fn vertex_and_edge_round_trip_over_http() {
    let (_, app) = test_app();

    let reply = op(&app, "vertex.create", "a", json!({"body": {"name": "A"}})).await;
    assert_eq!(reply, json!({"status": "ok", "result": ""}));
    op(&app, "vertex.create", "b", json!({"body": {}})).await;

    let reply = op(
        &app,
        "edge.create",
        "a",
        json!({"link_type": "knows", "descendant_uuid": "b", "link_body": {"since": 2020, "tags": ["friend"]}}),
    )
    .await;
    assert_eq!(reply["status"], "ok");

    let (status, vertex) = get_json(&app, "/vertices/a").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(vertex, json!({"id": "a", "body": {"name": "A"}}));

    let (_, out) = get_json(&app, "/vertices/a/out").await;
    assert_eq!(out["edges"], json!([{"link_type": "knows", "target": "b"}]));

    let (_, incoming) = get_json(&app, "/vertices/b/in").await;
    assert_eq!(incoming["edges"], json!([{"source": "a", "link_type": "knows"}]));

    let (_, tagged) = get_json(&app, "/vertices/a/tags/friend").await;
    assert_eq!(tagged["edges"], json!([{"link_type": "knows", "target": "b"}]));

    let (_, edge) = get_json(&app, "/vertices/a/edges/knows/b").await;
    assert_eq!(edge["body"]["since"], 2020);

    let (_, keys) = get_json(&app, "/keys?pattern=a.out.ltp_oid-bdy.%3E").await;
    assert_eq!(keys["keys"], json!(["a.out.ltp_oid-bdy.knows.b"]));
}

#[tokio::test]
async fn unknown_operation_is_not_found() {
    let (_, app) = test_app();
    let (status, body) =
        request_json(&app, Method::POST, "/ops/vertex.upsert/a", Some(json!({}))).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["success"], false);
    assert_eq!(body["error"]["code"], "NOT_FOUND");
}

#[tokio::test]
async fn validation_failures_are_failed_replies() {
    let (store, app) = test_app();
    let reply = op(&app, "edge.update", "a", json!({"link_type": "t"})).await;
    assert_eq!(reply["status"], "failed");
    assert_eq!(
        reply["result"],
        "ERROR edge.update a: descendant_uuid:string is missing; link_body:json is missing;"
    );
    assert!(store.is_empty());
}

#[tokio::test]
async fn delete_without_body_is_accepted() {
    let (store, app) = test_app();
    op(&app, "vertex.create", "a", json!({})).await;
    let (status, reply) = request_json(&app, Method::POST, "/ops/vertex.delete/a", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(reply["status"], "ok");
    assert!(store.is_empty());

    let (status, _) = get_json(&app, "/vertices/a").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn missing_edge_delete_reports_it() {
    let (_, app) = test_app();
    let reply = op(
        &app,
        "edge.delete",
        "a",
        json!({"link_type": "t", "descendant_uuid": "b"}),
    )
    .await;
    assert_eq!(reply, json!({"status": "ok", "result": "Link does not exist"}));
}

#[tokio::test]
async fn repeated_create_is_idempotent() {
    let (store, app) = test_app();
    op(&app, "vertex.create", "b", json!({})).await;
    op(&app, "vertex.create", "a", json!({"body": {"k": [1, 2]}})).await;
    let once = digest(store.as_ref(), &everything()).unwrap();

    op(&app, "vertex.create", "a", json!({"body": {"k": [1, 2]}})).await;
    assert_eq!(digest(store.as_ref(), &everything()).unwrap(), once);

    op(
        &app,
        "edge.create",
        "a",
        json!({"link_type": "t", "descendant_uuid": "b", "link_body": {"tags": ["x"]}}),
    )
    .await;
    let with_edge = digest(store.as_ref(), &everything()).unwrap();
    op(
        &app,
        "edge.create",
        "a",
        json!({"link_type": "t", "descendant_uuid": "b", "link_body": {"tags": ["x"]}}),
    )
    .await;
    assert_eq!(digest(store.as_ref(), &everything()).unwrap(), with_edge);
}

#[tokio::test]
async fn query_id_groups_one_batch() {
    let (store, app) = test_app();
    op(&app, "vertex.create", "b", json!({})).await;
    op(
        &app,
        "edge.create",
        "a",
        json!({"query_id": "batch-1", "link_type": "t", "descendant_uuid": "b", "link_body": {"tags": ["x", "y"]}}),
    )
    .await;

    let batch = store
        .closed_batches()
        .into_iter()
        .find(|b| b.query_id.as_str() == "batch-1")
        .expect("edge create closes one batch");
    // Out-record, two tag markers and the in-record.
    assert_eq!(batch.sets, 4);
    assert_eq!(store.open_scopes(), 0);
}

#[tokio::test]
async fn synthesized_edge_is_mirrored() {
    let (store, app) = test_app();
    op(&app, "edge.create", "a", json!({"link_body": {}})).await;

    let (_, out) = get_json(&app, "/vertices/a/out").await;
    let edges = out["edges"].as_array().unwrap();
    assert_eq!(edges.len(), 1);
    let target = edges[0]["target"].as_str().unwrap();
    let link_type = edges[0]["link_type"].as_str().unwrap();

    let (_, incoming) = get_json(&app, &format!("/vertices/{target}/in")).await;
    assert_eq!(incoming["edges"], json!([{"source": "a", "link_type": link_type}]));
    assert_eq!(store.len(), 2);
}

#[tokio::test]
async fn concurrent_mixed_operations_keep_mirrors_consistent() {
    let (store, app) = test_app();
    let ids: Vec<String> = (0..6).map(|_| Uuid::new_v4().simple().to_string()).collect();
    for id in &ids {
        op(&app, "vertex.create", id, json!({})).await;
    }

    let mut tasks = Vec::new();
    for round in 0..4 {
        for (i, source) in ids.iter().enumerate() {
            for target in &ids {
                let app = app.clone();
                let source = source.clone();
                let target = target.clone();
                tasks.push(tokio::spawn(async move {
                    let payload = json!({
                        "link_type": format!("t{}", (i + round) % 3),
                        "descendant_uuid": target,
                        "link_body": {"tags": [format!("r{round}")]},
                    });
                    let operation = if (i + round) % 4 == 0 { "edge.delete" } else { "edge.create" };
                    op(&app, operation, &source, payload).await
                }));
            }
        }
    }

    tokio::time::timeout(Duration::from_secs(30), async {
        for task in tasks {
            assert_eq!(task.await.unwrap()["status"], "ok");
        }
    })
    .await
    .expect("operations must not deadlock");

    // Every out-record has its in-record and vice versa.
    for key in store.scan(&everything()).unwrap() {
        if let Ok(out) = kvgraph_core::OutEdgeKey::parse(&key) {
            assert!(store.contains(&out.mirror().encode()).unwrap(), "{key}");
        }
        if let Ok(incoming) = kvgraph_core::InEdgeKey::parse(&key) {
            assert!(store.contains(&incoming.origin().encode()).unwrap(), "{key}");
        }
    }

    for id in &ids {
        op(&app, "vertex.delete", id, json!({})).await;
    }
    assert!(store.is_empty(), "left behind: {:?}", store.scan(&everything()).unwrap());
}

#[tokio::test]
async fn signal_is_accepted_and_published() {
    let store = Arc::new(InMemoryStore::new());
    let state = AppState::with_store(store.clone());
    let mut egress = state.service.runtime().subscribe();
    let app = build_router(state);

    let (status, body) = request_json(
        &app,
        Method::POST,
        "/signal/vertex.create/a",
        Some(json!({"query_id": "sig-1", "body": {"k": 1}})),
    )
    .await;
    assert_eq!(status, StatusCode::ACCEPTED);
    assert_eq!(body["query_id"], "sig-1");

    let published = tokio::time::timeout(Duration::from_secs(5), egress.recv())
        .await
        .unwrap()
        .unwrap();
    assert_eq!(published.query_id.as_str(), "sig-1");
    assert!(published.reply.is_ok());
    assert!(store.contains("a").unwrap());
}

#[tokio::test]
async fn sqlite_backed_state_persists() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("graph.db").to_string_lossy().to_string();
    let config = ServerConfig {
        db_path: Some(path.clone()),
        ..ServerConfig::default()
    };

    {
        let app = build_router(AppState::new(&config).unwrap());
        op(&app, "vertex.create", "a", json!({"body": {"v": 1}})).await;
        op(
            &app,
            "edge.create",
            "a",
            json!({"link_type": "t", "descendant_uuid": "a", "link_body": {}}),
        )
        .await;
    }

    let app = build_router(AppState::new(&config).unwrap());
    let (status, vertex) = get_json(&app, "/vertices/a").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(vertex["body"], json!({"v": 1}));
    let (_, incoming) = get_json(&app, "/vertices/a/in").await;
    assert_eq!(incoming["edges"], json!([{"source": "a", "link_type": "t"}]));
}
