use axum::{routing::post, Router};
use std::net::SocketAddr;

async fn serve(app: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr: SocketAddr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{addr}")
}

fn fixture(body: serde_json::Value) -> Router {
    Router::new().route(
        "/search",
        post(move || {
            let b = body.clone();
            async move { axum::Json(b) }
        }),
    )
}

async fn run(args: &[&str]) -> std::process::Output {
    let bin = assert_cmd::cargo::cargo_bin!("mcp-searxng");
    tokio::process::Command::new(bin)
        .args(args)
        .env("RUST_LOG", "warn")
        .env_remove("SEARXNG_INSTANCES")
        .env_remove("SEARXNG_ENV_FILE")
        .env_remove("SEARXNG_TIMEOUT_MS")
        .output()
        .await
        .expect("run mcp-searxng search")
}

#[tokio::test]
async fn search_prints_formatted_blocks() {
    let empty = serve(fixture(serde_json::json!({"results": []}))).await;
    let ok = serve(fixture(serde_json::json!({
        "results": [
            {"title": "Rust", "url": "https://www.rust-lang.org", "content": "A language", "engine": "brave"}
        ]
    })))
    .await;
    let instances = format!("{empty},{ok}");

    let out = run(&["search", "rust", "--instances", &instances]).await;
    assert!(out.status.success(), "stderr: {}", String::from_utf8_lossy(&out.stderr));
    assert_eq!(
        String::from_utf8_lossy(&out.stdout).trim_end(),
        "Title: Rust\nURL: https://www.rust-lang.org\nContent: A language\nSource: brave"
    );
}

#[tokio::test]
async fn search_json_output_reports_attempts_on_failure() {
    let empty = serve(fixture(serde_json::json!({"results": []}))).await;

    let out = run(&["search", "rust", "--instances", &empty, "--output", "json"]).await;
    assert!(!out.status.success());
    let v: serde_json::Value =
        serde_json::from_str(&String::from_utf8_lossy(&out.stdout)).expect("parse search json");
    assert_eq!(v["kind"].as_str(), Some("search"));
    assert_eq!(v["ok"].as_bool(), Some(false));
    assert_eq!(v["error"]["code"].as_str(), Some("search_failed"));
    assert_eq!(v["error"]["attempts"][0]["endpoint"].as_str(), Some(empty.as_str()));
    assert_eq!(v["request"]["query"].as_str(), Some("rust"));
    assert_eq!(v["request"]["categories"], serde_json::json!(["general"]));
}
