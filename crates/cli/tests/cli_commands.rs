//! Runs the compiled binary against a mock markets endpoint.

use serde_json::{json, Value};
use std::path::Path;
use std::process::Output;
use tempfile::TempDir;
use tokio::process::Command;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn listing() -> Value {
    json!([
        {
            "symbol": "btc", "name": "Bitcoin", "current_price": 67124.5,
            "market_cap": 1_320_000_000_000.0, "market_cap_rank": 1,
            "circulating_supply": 19_700_000.0, "total_supply": 21_000_000.0,
            "ath_date": "2024-03-14T07:10:36.635Z", "atl_date": "2013-07-06T00:00:00.000Z"
        },
        {
            "symbol": "eth", "name": "Ethereum", "current_price": 3512.4,
            "market_cap": 421_000_000_000.0, "market_cap_rank": 2,
            "ath_date": "2021-11-10T14:24:19.604Z", "atl_date": "2015-10-20T00:00:00.000Z"
        }
    ])
}

async fn serve(status: u16, body: Value) -> MockServer {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/coins/markets"))
        .respond_with(ResponseTemplate::new(status).set_body_json(body))
        .mount(&server)
        .await;
    server
}

async fn run_cli(server: &MockServer, dir: &Path, args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_crypto-analytics"))
        .arg("--config")
        .arg(dir.join("Config.toml"))
        .args(args)
        .env("APP_COINGECKO__API_URL", server.uri())
        .env("APP_COINGECKO__MAX_RETRIES", "0")
        .env("RUST_LOG", "warn")
        .current_dir(dir)
        .output()
        .await
        .expect("binary runs")
}

fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).into_owned()
}

#[tokio::test]
async fn test_summary_prints_statistics_and_rows() {
    let server = serve(200, listing()).await;
    let dir = TempDir::new().unwrap();

    let output = run_cli(&server, dir.path(), &["summary", "--target-size", "10"]).await;

    assert!(output.status.success());
    let text = stdout(&output);
    assert!(text.contains("CRYPTO MARKET SUMMARY"));
    assert!(text.contains("Bitcoin"));
    assert!(text.contains("Ethereum"));
    assert!(text.contains("67,124"));
}

#[tokio::test]
async fn test_empty_fetch_and_empty_filter_have_distinct_messages() {
    let dir = TempDir::new().unwrap();

    let empty = serve(200, json!([])).await;
    let output = run_cli(&empty, dir.path(), &["summary"]).await;
    assert!(output.status.success());
    assert!(stdout(&output).contains("No data returned"));

    let full = serve(200, listing()).await;
    let output = run_cli(&full, dir.path(), &["summary", "--search", "doge"]).await;
    assert!(output.status.success());
    assert!(stdout(&output).contains("No coins match the current filters."));
}

#[tokio::test]
async fn test_fetch_failure_exits_with_error() {
    let server = serve(404, json!({ "error": "not found" })).await;
    let dir = TempDir::new().unwrap();

    let output = run_cli(&server, dir.path(), &["summary"]).await;

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("market data fetch failed"));
}

#[tokio::test]
async fn test_export_writes_filtered_csv() {
    let server = serve(200, listing()).await;
    let dir = TempDir::new().unwrap();

    let output = run_cli(
        &server,
        dir.path(),
        &["export", "--ath-year", "2021", "--output", "out.csv"],
    )
    .await;

    assert!(output.status.success());
    let csv = std::fs::read_to_string(dir.path().join("out.csv")).unwrap();
    let lines: Vec<&str> = csv.lines().collect();
    assert_eq!(lines.len(), 2);
    assert!(lines[0].starts_with("symbol,name,image,current_price"));
    assert!(lines[1].starts_with("eth,Ethereum,"));
}

#[tokio::test]
async fn test_watch_serves_repeat_runs_from_cache() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/coins/markets"))
        .respond_with(ResponseTemplate::new(200).set_body_json(listing()))
        .expect(1)
        .mount(&server)
        .await;
    let dir = TempDir::new().unwrap();

    let output = run_cli(
        &server,
        dir.path(),
        &[
            "watch",
            "--target-size",
            "10",
            "--interval-secs",
            "1",
            "--iterations",
            "2",
            "--cache-ttl-secs",
            "3600",
        ],
    )
    .await;

    assert!(output.status.success());
    let text = stdout(&output);
    assert!(text.contains("source=upstream"));
    assert!(text.contains("source=cache"));
}

#[tokio::test]
async fn test_top_by_column() {
    let server = serve(200, listing()).await;
    let dir = TempDir::new().unwrap();

    let output = run_cli(
        &server,
        dir.path(),
        &["top", "--by", "current-price", "--smallest", "-n", "1"],
    )
    .await;

    assert!(output.status.success());
    let text = stdout(&output);
    assert!(text.contains("Ethereum"));
    assert!(!text.contains("Bitcoin"));
}

#[tokio::test]
async fn test_watch_reports_filters_without_matches() {
    let server = serve(200, listing()).await;
    let dir = TempDir::new().unwrap();

    let output = run_cli(
        &server,
        dir.path(),
        &["watch", "--target-size", "10", "--iterations", "1", "--search", "doge"],
    )
    .await;

    assert!(output.status.success());
    let text = stdout(&output);
    assert!(text.contains("No coins match the current filters."));
    assert!(!text.contains("coins=0"));
}

#[tokio::test]
async fn test_watch_prints_failed_runs_to_stderr() {
    let server = serve(404, json!({ "error": "not found" })).await;
    let dir = TempDir::new().unwrap();

    let output = Command::new(env!("CARGO_BIN_EXE_crypto-analytics"))
        .arg("--config")
        .arg(dir.path().join("Config.toml"))
        .args(["watch", "--target-size", "10", "--iterations", "1"])
        .env("APP_COINGECKO__API_URL", server.uri())
        .env("APP_COINGECKO__MAX_RETRIES", "0")
        .env("RUST_LOG", "error")
        .current_dir(dir.path())
        .output()
        .await
        .expect("binary runs");

    assert!(output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("market data fetch failed"));
}
