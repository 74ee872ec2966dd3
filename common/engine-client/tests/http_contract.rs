//! Contract tests for HttpEngine against a fake engine served by axum

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use axum::{
    extract::Query,
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use serde_json::{json, Value};

use engine_client::{EngineApi, EngineError, EntryKind, Fit, HttpEngine};

/// Serve `app` on an ephemeral port and return its base URL
async fn spawn_engine(app: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind fake engine");
    let addr = listener.local_addr().expect("Failed to read local addr");
    tokio::spawn(async move {
        axum::serve(listener, app).await.expect("Fake engine crashed");
    });
    format!("http://{}", addr)
}

fn fake_engine(executed: Arc<Mutex<Vec<String>>>) -> Router {
    Router::new()
        .route(
            "/disks",
            get(|| async {
                Json(json!({
                    "disks": [{
                        "name": "DiscoA.mia",
                        "path": "/tmp/DiscoA.mia",
                        "sizeMB": 5.0,
                        "fit": "BestFit",
                        "mountedPartitions": ["671A"]
                    }]
                }))
            }),
        )
        .route(
            "/partitions",
            get(|Query(params): Query<HashMap<String, String>>| async move {
                let disk_path = params.get("diskPath").cloned().unwrap_or_default();
                Json(json!({
                    "partitions": [{
                        "id": "671A",
                        "path": disk_path,
                        "name": "Part1",
                        "sizeKB": 2048.0,
                        "fit": "FirstFit",
                        "status": "Active"
                    }]
                }))
            }),
        )
        .route(
            "/filesystem",
            get(|Query(params): Query<HashMap<String, String>>| async move {
                let path = params.get("path").cloned().unwrap_or_default();
                if path == "/" {
                    Json(json!({ "entries": [] }))
                } else {
                    Json(json!({
                        "entries": [{
                            "name": "notes.txt",
                            "type": "file",
                            "size": 5,
                            "content": "hello",
                            "perm": "664",
                            "uid": 1,
                            "gid": 1,
                            "created": 1712345678,
                            "modified": 1712345678
                        }]
                    }))
                }
            }),
        )
        .route(
            "/journal",
            get(|| async {
                (
                    StatusCode::NOT_FOUND,
                    Json(json!({ "output": "Error: la partición no es EXT3" })),
                )
            }),
        )
        .route(
            "/login",
            post(|Json(body): Json<Value>| async move {
                if body["pass"] == "123" {
                    (StatusCode::OK, Json(json!({ "output": "Sesión iniciada como root" })))
                } else {
                    (
                        StatusCode::BAD_REQUEST,
                        Json(json!({ "output": "Error: contraseña incorrecta" })),
                    )
                }
            }),
        )
        .route(
            "/execute",
            post(move |Json(body): Json<Value>| {
                let executed = executed.clone();
                async move {
                    let command = body["command"].as_str().unwrap_or_default().to_string();
                    let lines = command.lines().count();
                    executed.lock().unwrap().push(command);
                    Json(json!({ "output": format!("{} comandos ejecutados", lines) }))
                }
            }),
        )
}

#[tokio::test]
async fn test_lists_disks_and_partitions() {
    let base = spawn_engine(fake_engine(Arc::default())).await;
    let engine = HttpEngine::new(&base).unwrap();

    let disks = engine.list_disks().await.unwrap();
    assert_eq!(disks.len(), 1);
    assert_eq!(disks[0].fit, Fit::BestFit);
    assert_eq!(disks[0].mounted_partitions.as_deref(), Some(&["671A".to_string()][..]));

    let partitions = engine.list_partitions("/tmp/Disco A.mia").await.unwrap();
    assert_eq!(partitions.len(), 1);
    assert_eq!(partitions[0].path, "/tmp/Disco A.mia");
}

#[tokio::test]
async fn test_empty_root_directory_is_not_an_error() {
    let base = spawn_engine(fake_engine(Arc::default())).await;
    let engine = HttpEngine::new(&base).unwrap();

    let root = engine.list_directory("671A", "/").await.unwrap();
    assert!(root.is_empty());

    let docs = engine.list_directory("671A", "/docs").await.unwrap();
    assert_eq!(docs[0].kind, EntryKind::File);
    assert_eq!(docs[0].content, "hello");
}

#[tokio::test]
async fn test_non_2xx_uses_output_message() {
    let base = spawn_engine(fake_engine(Arc::default())).await;
    let engine = HttpEngine::new(&base).unwrap();

    let err = engine.list_journal("671A").await.unwrap_err();
    assert_eq!(
        err,
        EngineError::Status {
            status: 404,
            message: "Error: la partición no es EXT3".to_string(),
        }
    );
}

#[tokio::test]
async fn test_authenticate_success_and_rejection() {
    let base = spawn_engine(fake_engine(Arc::default())).await;
    let engine = HttpEngine::new(&base).unwrap();

    let output = engine.authenticate("root", "123", "671A").await.unwrap();
    assert_eq!(output, "Sesión iniciada como root");

    let err = engine.authenticate("root", "bad", "671A").await.unwrap_err();
    assert_eq!(
        err,
        EngineError::Rejected("Error: contraseña incorrecta".to_string())
    );
}

#[tokio::test]
async fn test_execute_forwards_payload_verbatim() {
    let executed = Arc::new(Mutex::new(Vec::new()));
    let base = spawn_engine(fake_engine(executed.clone())).await;
    let engine = HttpEngine::new(&base).unwrap();

    let batch = "mkdisk -size=5 -unit=M -path=/tmp/test\nlogin -user=root -pass=123 -id=671A";
    let output = engine.execute(batch).await.unwrap();

    assert_eq!(output, "2 comandos ejecutados");
    assert_eq!(executed.lock().unwrap().as_slice(), &[batch.to_string()]);
}

#[tokio::test]
async fn test_shape_mismatch_is_protocol_error() {
    let app = Router::new()
        .route("/disks", get(|| async { Json(json!({ "disks": "not-an-array" })) }))
        .route("/execute", post(|| async { "plain text" }));
    let base = spawn_engine(app).await;
    let engine = HttpEngine::new(&base).unwrap();

    let err = engine.list_disks().await.unwrap_err();
    assert!(err.is_protocol());
    assert!(err.to_string().contains("invalid server response"));

    let err = engine.execute("mkdisk").await.unwrap_err();
    assert!(err.is_protocol());
}

#[tokio::test]
async fn test_status_without_body_falls_back_to_status_text() {
    let app = Router::new().route("/disks", get(|| async { StatusCode::SERVICE_UNAVAILABLE }));
    let base = spawn_engine(app).await;
    let engine = HttpEngine::new(&base).unwrap();

    let err = engine.list_disks().await.unwrap_err();
    assert!(err.is_transport());
    assert_eq!(
        err,
        EngineError::Status {
            status: 503,
            message: "Service Unavailable".to_string(),
        }
    );
}

#[tokio::test]
async fn test_unreachable_engine() {
    // Reserve a port, then free it so nothing is listening there
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let engine = HttpEngine::new(&format!("http://{}", addr)).unwrap();
    let err = engine.list_disks().await.unwrap_err();

    assert!(matches!(err, EngineError::Unreachable { .. }));
    assert!(err.is_transport());
}
