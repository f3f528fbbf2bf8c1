use async_trait::async_trait;
use serde_json::{json, Value};
use std::sync::Arc;
use std::time::Duration;

use mobi_mapr::backend::{Credential, MapBackend};
use mobi_mapr::error::{MaprError, Result};
use mobi_mapr::model::{BoundingBox, Project, ProjectDetail, ResolutionLevel};
use mobi_mapr::server::{router, AppState};
use mobi_mapr::{MapViewController, MaprConfig};

struct NoBackend;

#[async_trait]
impl MapBackend for NoBackend {
    async fn fetch_bounds(&self, _project: &Project, _credential: &Credential) -> Result<BoundingBox> {
        Err(MaprError::InvalidBounds)
    }

    async fn fetch_detail(
        &self,
        _project: &Project,
        _feature_id: &str,
        _level: ResolutionLevel,
        _credential: &Credential,
    ) -> Result<ProjectDetail> {
        Err(MaprError::NoProject)
    }
}

async fn serve() -> String {
    let controller = MapViewController::spawn(MaprConfig::default(), Arc::new(NoBackend));
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router(AppState { controller })).await.unwrap();
    });
    format!("http://{}", addr)
}

#[tokio::test]
async fn test_base_style_and_legend() {
    let base = serve().await;
    let client = reqwest::Client::new();

    let body: Value = client.get(format!("{}/style", base)).send().await.unwrap().json().await.unwrap();
    assert_eq!(body["revision"], 0);
    assert_eq!(body["style"]["version"], 8);
    let ids: Vec<&str> = body["style"]["layers"]
        .as_array()
        .unwrap()
        .iter()
        .map(|l| l["id"].as_str().unwrap())
        .collect();
    assert_eq!(ids.first(), Some(&"basemap"));
    assert_eq!(ids.last(), Some(&"labels"));
    assert!(!ids.contains(&"mobility-fill"));

    let legend: Value = client.get(format!("{}/legend", base)).send().await.unwrap().json().await.unwrap();
    assert_eq!(legend["mode"], "index");
    assert_eq!(legend["entries"].as_array().unwrap().len(), 7);
}

#[tokio::test]
async fn test_view_command_moves_resolution() {
    let base = serve().await;
    let client = reqwest::Client::new();

    let res = client
        .post(format!("{}/view", base))
        .json(&json!({ "command": "set_zoom", "value": 9.5 }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), reqwest::StatusCode::ACCEPTED);

    let mut level = Value::Null;
    for _ in 0..50 {
        let body: Value = client.get(format!("{}/resolution", base)).send().await.unwrap().json().await.unwrap();
        level = body["level"].clone();
        if level == "municipality" {
            break;
        }
        tokio::time::sleep(Duration::from_millis(20)).await;
    }
    assert_eq!(level, "municipality");
}

#[tokio::test]
async fn test_summary_without_project_is_conflict() {
    let base = serve().await;
    let res = reqwest::get(format!("{}/features/12/summary", base)).await.unwrap();
    assert_eq!(res.status(), reqwest::StatusCode::CONFLICT);
    let body: Value = res.json().await.unwrap();
    assert!(body["error"].as_str().unwrap().contains("no active project"));
}

#[tokio::test]
async fn test_malformed_command_is_rejected() {
    let base = serve().await;
    let res = reqwest::Client::new()
        .post(format!("{}/view", base))
        .json(&json!({ "command": "fly_to_moon" }))
        .send()
        .await
        .unwrap();
    assert!(res.status().is_client_error());
}

#[tokio::test]
async fn test_state_snapshot_is_served() {
    let base = serve().await;
    let body: Value = reqwest::get(format!("{}/state", base)).await.unwrap().json().await.unwrap();
    assert_eq!(body["phase"], "idle");
    assert_eq!(body["zoom"], 5.0);
    assert_eq!(body["generation"], 0);
    assert!(body.get("credential").is_none());
}
