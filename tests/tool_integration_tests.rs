//! Integration Tests for tool workflows
//!
//! Multi-step scenarios through the dispatcher: the cache must never serve
//! content older than the last write, and the access policy holds for every tool.

use std::fs;
use std::time::Duration;

use file_context_server::{Config, McpServer};
use serde_json::{json, Value};
use tempfile::TempDir;

// == Helper Functions ==

fn server_for(root: &TempDir, patterns: &[&str]) -> McpServer {
    let config = Config {
        roots: vec![root.path().to_path_buf()],
        blocked_patterns: patterns.iter().map(|p| p.to_string()).collect(),
        cache_size: 8,
        cache_ttl: Duration::from_secs(300),
        ..Config::default()
    };
    McpServer::from_config(&config).unwrap()
}

/// Calls a tool and returns (is_error, text).
async fn call(server: &McpServer, name: &str, arguments: Value) -> (bool, String) {
    let message = json!({
        "jsonrpc": "2.0",
        "id": 1,
        "method": "tools/call",
        "params": { "name": name, "arguments": arguments },
    });
    let response = server.handle_message(&message.to_string()).await.unwrap();
    let result = response.result.unwrap();
    let is_error = result.get("isError").and_then(Value::as_bool).unwrap_or(false);
    let text = result["content"][0]["text"].as_str().unwrap().to_string();
    (is_error, text)
}

async fn call_ok(server: &McpServer, name: &str, arguments: Value) -> Value {
    let (is_error, text) = call(server, name, arguments).await;
    assert!(!is_error, "{} failed: {}", name, text);
    serde_json::from_str(&text).unwrap_or(Value::String(text))
}

// == Cache Coherence ==

#[tokio::test]
async fn test_write_read_modify_read_stays_fresh() {
    let root = TempDir::new().unwrap();
    let server = server_for(&root, &[]);
    let path = root.path().join("app.py").display().to_string();

    call_ok(&server, "write_file", json!({ "path": path, "content": "x = 1\n" })).await;
    let first = call_ok(&server, "read_context", json!({ "path": path })).await;
    assert_eq!(first["content"], "x = 1\n");

    // second read is served from the cache
    call_ok(&server, "read_context", json!({ "path": path })).await;
    let stats = call_ok(&server, "cache_stats", json!({})).await;
    assert_eq!(stats["hits"], 1);
    assert_eq!(stats["size"], 1);

    let modified = call_ok(
        &server,
        "modify_file",
        json!({ "path": path, "find": "1", "replace": "2" }),
    )
    .await;
    assert_eq!(modified["modified"], true);

    let second = call_ok(&server, "read_context", json!({ "path": path })).await;
    assert_eq!(second["content"], "x = 2\n");
}

#[tokio::test]
async fn test_move_then_read_old_path_fails() {
    let root = TempDir::new().unwrap();
    let server = server_for(&root, &[]);
    let from = root.path().join("a.txt").display().to_string();
    let to = root.path().join("b.txt").display().to_string();

    call_ok(&server, "write_file", json!({ "path": from, "content": "hello" })).await;
    call_ok(&server, "read_context", json!({ "path": from })).await;
    call_ok(&server, "move_file", json!({ "source": from, "destination": to })).await;

    let (is_error, text) = call(&server, "read_context", json!({ "path": from })).await;
    assert!(is_error);
    assert!(text.contains("not found"));

    let moved = call_ok(&server, "read_context", json!({ "path": to })).await;
    assert_eq!(moved["content"], "hello");
}

#[tokio::test]
async fn test_delete_directory_drops_cached_children() {
    let root = TempDir::new().unwrap();
    let server = server_for(&root, &[]);
    let dir = root.path().join("pkg");
    fs::create_dir(&dir).unwrap();
    fs::write(dir.join("mod.rs"), "pub fn f() {}\n").unwrap();
    let file = dir.join("mod.rs").display().to_string();

    call_ok(&server, "read_context", json!({ "path": file })).await;
    call_ok(
        &server,
        "delete_file",
        json!({ "path": dir.display().to_string(), "recursive": true }),
    )
    .await;

    let stats = call_ok(&server, "cache_stats", json!({})).await;
    assert_eq!(stats["size"], 0);
    let (is_error, _) = call(&server, "read_context", json!({ "path": file })).await;
    assert!(is_error);
}

// == Access Policy ==

#[tokio::test]
async fn test_blocked_pattern_applies_to_every_tool() {
    let root = TempDir::new().unwrap();
    let server = server_for(&root, &["*.key"]);
    fs::write(root.path().join("server.key"), "-----BEGIN-----").unwrap();
    fs::write(root.path().join("readme.txt"), "public").unwrap();
    let key = root.path().join("server.key").display().to_string();

    for tool in ["read_context", "analyze_code", "generate_outline", "get_chunk_count"] {
        let (is_error, text) = call(&server, tool, json!({ "path": key })).await;
        assert!(is_error, "{} should be denied", tool);
        assert!(text.contains("access denied"), "{}: {}", tool, text);
    }

    let (is_error, _) = call(&server, "write_file", json!({ "path": key, "content": "" })).await;
    assert!(is_error);

    let listing = call_ok(
        &server,
        "list_context_files",
        json!({ "path": root.path().display().to_string() }),
    )
    .await;
    let listing = listing.to_string();
    assert!(listing.contains("readme.txt"));
    assert!(!listing.contains("server.key"));
}

#[tokio::test]
async fn test_copy_outside_roots_denied() {
    let root = TempDir::new().unwrap();
    let outside = TempDir::new().unwrap();
    let server = server_for(&root, &[]);
    fs::write(root.path().join("a.txt"), "data").unwrap();

    let (is_error, text) = call(
        &server,
        "copy_file",
        json!({
            "source": root.path().join("a.txt").display().to_string(),
            "destination": outside.path().join("a.txt").display().to_string(),
        }),
    )
    .await;
    assert!(is_error);
    assert!(text.contains("outside allowed directories"));
    assert!(!outside.path().join("a.txt").exists());
}

#[tokio::test]
async fn test_list_allowed_directories_reports_roots() {
    let root = TempDir::new().unwrap();
    let server = server_for(&root, &[".env"]);

    let report = call_ok(&server, "list_allowed_directories", json!({})).await;
    assert_eq!(
        report["allowed_directories"],
        json!([root.path().display().to_string()])
    );
    assert_eq!(report["blocked_patterns"], json!([".env"]));
}

// == Batch Reads ==

#[tokio::test]
async fn test_get_files_mixes_content_and_errors() {
    let root = TempDir::new().unwrap();
    let server = server_for(&root, &[]);
    let present = root.path().join("here.txt");
    fs::write(&present, "here").unwrap();
    let present = present.display().to_string();
    let missing = root.path().join("gone.txt").display().to_string();

    let files = call_ok(
        &server,
        "get_files",
        json!({ "filePathList": [{ "fileName": present }, { "fileName": missing }] }),
    )
    .await;
    assert_eq!(files[&present]["content"], "here");
    assert!(files[&missing]["error"].as_str().unwrap().contains("not found"));
}
