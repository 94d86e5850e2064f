use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use playdex_core::Tokenizer;
use serde_json::Value;
use std::fs;
use tempfile::tempdir;

fn build_tiny_app(dir: &std::path::Path, corpus: &str) -> Router {
    let path = dir.join("scenes.json");
    fs::write(&path, corpus).unwrap();
    playdex_server::build_app(&path.to_string_lossy(), Tokenizer::new(true)).unwrap()
}

const CORPUS: &str = r#"{"corpus": [
    {"playId": "A", "sceneId": "A:1", "sceneNum": 0, "text": "the quick fox the"},
    {"playId": "A", "sceneId": "A:2", "sceneNum": 1, "text": "Quick brown fox"},
    {"playId": "B", "sceneId": "B:1", "sceneNum": 2, "text": "brown"}
]}"#;

async fn call(app: Router, uri: &str) -> (StatusCode, Value) {
    let req = Request::get(uri).body(Body::empty()).unwrap();
    let resp = tower::ServiceExt::oneshot(app, req).await.unwrap();
    let status = resp.status();
    let body = resp.into_body().collect().await.unwrap().to_bytes();
    (status, serde_json::from_slice(&body).unwrap_or(Value::Null))
}

#[tokio::test]
async fn phrase_search_returns_matching_scenes() {
    let dir = tempdir().unwrap();
    let app = build_tiny_app(dir.path(), CORPUS);

    let (status, json) = call(app, "/search/phrase?q=Quick%20fox").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["total_hits"], 1);
    assert_eq!(json["results"][0], "A:1");
}

#[tokio::test]
async fn any_search_keeps_duplicate_hits() {
    let dir = tempdir().unwrap();
    let app = build_tiny_app(dir.path(), CORPUS);

    let (status, json) = call(app, "/search/any?terms=fox,brown").await;
    assert_eq!(status, StatusCode::OK);
    let results: Vec<&str> = json["results"].as_array().unwrap().iter().map(|v| v.as_str().unwrap()).collect();
    assert_eq!(results, vec!["A:1", "A:2", "A:2", "B:1"]);
}

#[tokio::test]
async fn group_search_and_term_frequency() {
    let dir = tempdir().unwrap();
    let app = build_tiny_app(dir.path(), CORPUS);

    let (_, json) = call(app.clone(), "/search/group?term=brown").await;
    assert_eq!(json["results"], serde_json::json!(["A", "B"]));

    let (status, json) = call(app, "/tf?term=the&doc=1").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["frequency"], 2);
}

#[tokio::test]
async fn empty_phrase_is_bad_request() {
    let dir = tempdir().unwrap();
    let app = build_tiny_app(dir.path(), CORPUS);

    let (status, json) = call(app, "/search/phrase?q=%20").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(json["error"].as_str().unwrap().contains("phrase"));
}

#[tokio::test]
async fn stats_and_documents() {
    let dir = tempdir().unwrap();
    let app = build_tiny_app(dir.path(), CORPUS);

    let (status, json) = call(app.clone(), "/stats").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["avg_length"], 2);
    assert_eq!(json["longest_groups"], serde_json::json!(["A"]));

    let (status, json) = call(app.clone(), "/doc/2").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["display_name"], "A:2");

    let (status, _) = call(app, "/doc/9").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn stats_on_empty_corpus_is_unprocessable() {
    let dir = tempdir().unwrap();
    let app = build_tiny_app(dir.path(), r#"{"corpus": []}"#);

    let (status, _) = call(app, "/stats").await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn single_term_routes_reject_multi_word_terms() {
    let dir = tempdir().unwrap();
    let app = build_tiny_app(dir.path(), CORPUS);

    let (status, json) = call(app.clone(), "/search/group?term=fox%20brown").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(json["error"].as_str().unwrap().contains("exactly one term"));

    let (status, _) = call(app, "/tf?term=fox%20brown&doc=1").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn single_term_routes_reject_blank_terms() {
    let dir = tempdir().unwrap();
    let app = build_tiny_app(dir.path(), CORPUS);

    let (status, _) = call(app.clone(), "/search/group?term=%20").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = call(app, "/tf?term=%20&doc=1").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}
