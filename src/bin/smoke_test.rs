//! Smoke test a running MedScan API.
//!
//! Usage:
//!   smoke_test                         health check + built-in 1x1 PNG
//!   smoke_test <path> [scan_type]      analyze a real image
//!
//! The API base URL comes from `MEDSCAN_API_URL` (default `http://localhost:8000`).

use std::path::Path;
use std::process::ExitCode;
use std::time::Duration;

use base64::Engine as _;
use reqwest::blocking::multipart::{Form, Part};
use reqwest::blocking::Client;
use serde_json::Value;

const DEFAULT_API_URL: &str = "http://localhost:8000";
const SAMPLE_PNG_BASE64: &str =
    "iVBORw0KGgoAAAANSUhEUgAAAAEAAAABCAYAAAAfFcSJAAAADUlEQVR42mNk+M9QDwADhgGAWjR9awAAAABJRU5ErkJggg==";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(120);

fn main() -> ExitCode {
    let api_url = std::env::var("MEDSCAN_API_URL")
        .ok()
        .filter(|v| !v.trim().is_empty())
        .unwrap_or_else(|| DEFAULT_API_URL.to_string());
    let api_url = api_url.trim_end_matches('/');

    let client = match Client::builder().timeout(REQUEST_TIMEOUT).build() {
        Ok(client) => client,
        Err(e) => {
            println!("[FAIL] Could not build HTTP client: {e}");
            return ExitCode::FAILURE;
        }
    };

    let args: Vec<String> = std::env::args().skip(1).collect();
    if let Some(path) = args.first() {
        let scan_type = args.get(1).map(String::as_str);
        return match analyze_file(&client, api_url, Path::new(path), scan_type) {
            Ok(()) => ExitCode::SUCCESS,
            Err(e) => {
                println!("[FAIL] {e}");
                ExitCode::FAILURE
            }
        };
    }

    println!("MedScan API smoke test against {api_url}");
    println!("{}", "=".repeat(60));

    let mut failures = 0;
    match check_health(&client, api_url) {
        Ok(()) => println!("[ OK ] Health check"),
        Err(e) => {
            println!("[FAIL] Health check: {e}");
            println!("       Is the server running? Start it with `medscan`.");
            return ExitCode::FAILURE;
        }
    }

    match analyze_sample(&client, api_url) {
        Ok(result) => {
            println!("[ OK ] Analyze sample image");
            print_summary(&result);
        }
        Err(e) => {
            println!("[FAIL] Analyze sample image: {e}");
            failures += 1;
        }
    }

    println!("{}", "=".repeat(60));
    println!("To analyze a real scan:");
    println!("  smoke_test /path/to/scan.png breast_ultrasound");
    println!("  smoke_test /path/to/scan.png pcos_ultrasound");

    if failures > 0 {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    }
}

fn check_health(client: &Client, api_url: &str) -> Result<(), String> {
    let response = client
        .get(format!("{api_url}/health"))
        .send()
        .map_err(|e| e.to_string())?;
    let status = response.status();
    let body: Value = response.json().map_err(|e| e.to_string())?;
    println!("       {status} {body}");
    if status.is_success() {
        Ok(())
    } else {
        Err(format!("status {status}"))
    }
}

fn analyze_sample(client: &Client, api_url: &str) -> Result<Value, String> {
    let bytes = base64::engine::general_purpose::STANDARD
        .decode(SAMPLE_PNG_BASE64)
        .map_err(|e| e.to_string())?;
    post_analyze(client, api_url, bytes, "sample.png", "image/png", None)
}

fn analyze_file(
    client: &Client,
    api_url: &str,
    path: &Path,
    scan_type: Option<&str>,
) -> Result<(), String> {
    println!("Analyzing {}", path.display());
    let bytes = std::fs::read(path).map_err(|e| format!("cannot read {}: {e}", path.display()))?;
    let filename = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| "scan".to_string());
    let mime = mime_guess::from_path(path).first_or_octet_stream();

    let result = post_analyze(client, api_url, bytes, &filename, mime.as_ref(), scan_type)?;
    print_report(&result);
    Ok(())
}

fn post_analyze(
    client: &Client,
    api_url: &str,
    bytes: Vec<u8>,
    filename: &str,
    content_type: &str,
    scan_type: Option<&str>,
) -> Result<Value, String> {
    let part = Part::bytes(bytes)
        .file_name(filename.to_string())
        .mime_str(content_type)
        .map_err(|e| e.to_string())?;
    let mut form = Form::new().part("file", part);
    if let Some(scan_type) = scan_type {
        form = form.text("scan_type", scan_type.to_string());
    }

    let response = client
        .post(format!("{api_url}/analyze"))
        .multipart(form)
        .send()
        .map_err(|e| e.to_string())?;
    let status = response.status();
    let text = response.text().map_err(|e| e.to_string())?;
    if !status.is_success() {
        return Err(format!("status {status}: {text}"));
    }
    serde_json::from_str(&text).map_err(|e| format!("invalid JSON response: {e}"))
}

fn print_summary(result: &Value) {
    println!("       Scan Type: {}", text(result, "scan_type"));
    println!("       Classification: {}", text(result, "classification"));
    println!("       Confidence: {}", text(result, "confidence"));
}

fn print_report(result: &Value) {
    println!("{}", "=".repeat(50));
    print_summary(result);
    println!("       Findings:");
    for finding in items(result, "findings") {
        println!("         • {finding}");
    }
    println!("       Report:");
    println!("         {}", text(result, "report"));
    println!("       Recommendations:");
    for rec in items(result, "recommendations") {
        println!("         • {rec}");
    }
    println!("{}", "=".repeat(50));
}

fn text<'a>(value: &'a Value, key: &str) -> &'a str {
    value.get(key).and_then(Value::as_str).unwrap_or("-")
}

fn items<'a>(value: &'a Value, key: &str) -> impl Iterator<Item = &'a str> {
    value
        .get(key)
        .and_then(Value::as_array)
        .into_iter()
        .flatten()
        .filter_map(Value::as_str)
}
