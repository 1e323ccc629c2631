
use std::fs;

use tempfile::tempdir;

use support_single::{describe, run_hammer, run_hammer_with_env, spawn_http_server_or_skip};

#[test]
fn e2e_single_native_headless_reports_ok() -> Result<(), String> {
    let Some((url, _server)) = spawn_http_server_or_skip()? else {
        return Ok(());
    };
    let dir = tempdir().map_err(|err| format!("tempdir failed: {}", err))?;

    let args = vec![
        url,
        "--no-ui".to_owned(),
        "--fetcher".to_owned(),
        "native".to_owned(),
        "--rate".to_owned(),
        "20".to_owned(),
        "--workers".to_owned(),
        "4".to_owned(),
        "--report-interval".to_owned(),
        "500ms".to_owned(),
        "--duration".to_owned(),
        "2s".to_owned(),
    ];

    let output = run_hammer(dir.path(), args)?;
    if !output.status.success() {
        return Err(describe(&output));
    }
    let stderr = String::from_utf8_lossy(&output.stderr);
    if !stderr.contains("rate=20/s workers=4") {
        return Err(format!("Missing status line.\n{}", describe(&output)));
    }
    if !stderr.contains("OK=") {
        return Err(format!("Missing OK responses.\n{}", describe(&output)));
    }
    Ok(())
}

#[test]
fn e2e_single_noop_fetcher_sends_nothing() -> Result<(), String> {
    let dir = tempdir().map_err(|err| format!("tempdir failed: {}", err))?;

    let args = [
        "http://127.0.0.1:9/",
        "--no-ui",
        "--fetcher",
        "noop",
        "-r",
        "50",
        "-w",
        "2",
        "-t",
        "1500ms",
    ];

    let output = run_hammer(dir.path(), args)?;
    if !output.status.success() {
        return Err(describe(&output));
    }
    let stderr = String::from_utf8_lossy(&output.stderr);
    if !stderr.contains("Did nothing.=") {
        return Err(format!("Missing noop outcomes.\n{}", describe(&output)));
    }
    Ok(())
}

#[test]
fn e2e_single_default_config_file_supplies_url() -> Result<(), String> {
    let dir = tempdir().map_err(|err| format!("tempdir failed: {}", err))?;
    let config = r#"url = "http://127.0.0.1:9/"
fetcher = "noop"
rate = 30
workers = 3
duration = "1s"
report_interval = "250ms"
"#;
    fs::write(dir.path().join("hammer.toml"), config)
        .map_err(|err| format!("write config failed: {}", err))?;

    let output = run_hammer(dir.path(), ["--no-ui"])?;
    if !output.status.success() {
        return Err(describe(&output));
    }
    let stderr = String::from_utf8_lossy(&output.stderr);
    if !stderr.contains("rate=30/s workers=3") {
        return Err(format!("Config values were not applied.\n{}", describe(&output)));
    }
    Ok(())
}

#[test]
fn e2e_single_json_config_is_overridden_by_cli() -> Result<(), String> {
    let dir = tempdir().map_err(|err| format!("tempdir failed: {}", err))?;
    let config_path = dir.path().join("load.json");
    let config = serde_json::json!({
        "url": "http://127.0.0.1:9/",
        "fetcher": "noop",
        "qps": 5,
        "concurrency": 1,
        "duration": 1,
    });
    let json_bytes = serde_json::to_vec_pretty(&config)
        .map_err(|err| format!("serialize config failed: {}", err))?;
    fs::write(&config_path, json_bytes).map_err(|err| format!("write config failed: {}", err))?;

    let args = vec![
        "--config".to_owned(),
        config_path.to_string_lossy().into_owned(),
        "--no-ui".to_owned(),
        "--rate".to_owned(),
        "40".to_owned(),
        "--report-interval".to_owned(),
        "250ms".to_owned(),
    ];

    let output = run_hammer(dir.path(), args)?;
    if !output.status.success() {
        return Err(describe(&output));
    }
    let stderr = String::from_utf8_lossy(&output.stderr);
    if !stderr.contains("rate=40/s workers=1") {
        return Err(format!("CLI rate should win over config.\n{}", describe(&output)));
    }
    Ok(())
}

#[test]
fn e2e_single_missing_url_fails() -> Result<(), String> {
    let dir = tempdir().map_err(|err| format!("tempdir failed: {}", err))?;

    let output = run_hammer(dir.path(), ["--no-ui", "--duration", "1s"])?;
    if output.status.success() {
        return Err(format!("Expected failure without a URL.\n{}", describe(&output)));
    }
    let stderr = String::from_utf8_lossy(&output.stderr);
    if !stderr.contains("MissingUrl") {
        return Err(format!("Expected a missing URL error.\n{}", describe(&output)));
    }
    Ok(())
}

#[test]
fn e2e_single_unknown_fetcher_fails() -> Result<(), String> {
    let dir = tempdir().map_err(|err| format!("tempdir failed: {}", err))?;

    let output = run_hammer(
        dir.path(),
        ["http://127.0.0.1:9/", "--no-ui", "--fetcher", "telnet"],
    )?;
    if output.status.success() {
        return Err(format!("Expected failure for an unknown fetcher.\n{}", describe(&output)));
    }
    let stderr = String::from_utf8_lossy(&output.stderr);
    if !stderr.contains("invalid value 'telnet' for '--fetcher") {
        return Err(format!("Expected an unknown fetcher error.\n{}", describe(&output)));
    }
    Ok(())
}

#[test]
fn e2e_single_any_no_color_value_is_accepted() -> Result<(), String> {
    let dir = tempdir().map_err(|err| format!("tempdir failed: {}", err))?;

    let output = run_hammer_with_env(
        dir.path(),
        ["http://127.0.0.1:9/", "--no-ui", "--fetcher", "noop", "-t", "300ms"],
        [("NO_COLOR", "always")],
    )?;
    if !output.status.success() {
        return Err(format!("NO_COLOR=always should not fail.\n{}", describe(&output)));
    }
    Ok(())
}
