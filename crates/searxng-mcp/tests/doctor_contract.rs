#[test]
fn doctor_reports_config_without_stdio_probe() {
    let bin = assert_cmd::cargo::cargo_bin!("mcp-searxng");
    let out = std::process::Command::new(bin)
        .args(["doctor", "--check-stdio=false"])
        .env("SEARXNG_INSTANCES", "http://127.0.0.1:9,https://mirror.example")
        .env("SEARXNG_TLS_REJECT_UNAUTHORIZED", "0")
        .env_remove("SEARXNG_USER_AGENT")
        .env_remove("SEARXNG_TIMEOUT_MS")
        .env_remove("SEARXNG_ENV_FILE")
        .output()
        .expect("run mcp-searxng doctor");

    assert!(out.status.success(), "mcp-searxng doctor failed");
    let s = String::from_utf8_lossy(&out.stdout);
    let v: serde_json::Value = serde_json::from_str(&s).expect("parse doctor json");

    assert_eq!(v["schema_version"].as_u64(), Some(1));
    assert_eq!(v["kind"].as_str(), Some("doctor"));
    assert_eq!(v["name"].as_str(), Some("mcp-searxng"));
    assert_eq!(v["ok"].as_bool(), Some(true));
    assert!(v.get("elapsed_ms").is_some());
    assert_eq!(
        v["configured"]["instances"],
        serde_json::json!(["http://127.0.0.1:9", "https://mirror.example"])
    );
    assert_eq!(v["configured"]["user_agent"].as_str(), Some("MCP-SearXNG/1.0"));
    assert_eq!(v["configured"]["tls_verify"].as_bool(), Some(false));
    assert_eq!(v["configured"]["attempt_timeout_ms"].as_u64(), Some(5000));

    let checks = v["checks"].as_array().expect("checks array");
    let handshake = checks
        .iter()
        .find(|c| c["name"].as_str() == Some("mcp_stdio_handshake"))
        .expect("mcp_stdio_handshake check");
    assert_eq!(handshake["skipped"].as_bool(), Some(true));
    assert_eq!(handshake["ok"].as_bool(), Some(true));
}

#[test]
fn doctor_flags_invalid_instances() {
    let bin = assert_cmd::cargo::cargo_bin!("mcp-searxng");
    let out = std::process::Command::new(bin)
        .args(["doctor", "--check-stdio=false", "--instances", "not a url"])
        .env_remove("SEARXNG_ENV_FILE")
        .output()
        .expect("run mcp-searxng doctor");

    assert!(out.status.success());
    let v: serde_json::Value =
        serde_json::from_str(&String::from_utf8_lossy(&out.stdout)).expect("parse doctor json");
    assert_eq!(v["ok"].as_bool(), Some(false));
    assert!(v["configured"].is_null());
    let config_check = v["checks"]
        .as_array()
        .and_then(|cs| cs.iter().find(|c| c["name"] == "config_valid"))
        .expect("config_valid check");
    assert_eq!(config_check["ok"].as_bool(), Some(false));
}
