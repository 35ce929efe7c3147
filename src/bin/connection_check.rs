//! Diagnose connectivity to the configured Azure OpenAI endpoint.
//!
//! Usage: `AZURE_OPENAI_ENDPOINT=https://... connection_check`

use std::net::ToSocketAddrs;
use std::process::ExitCode;
use std::time::Duration;

use medscan_lib::upstream::is_tls_failure;

const PROBE_TIMEOUT: Duration = Duration::from_secs(5);
const PUBLIC_IP_URL: &str = "https://api.ipify.org";

enum ProbeFailure {
    Timeout,
    Tls(String),
    Connection(String),
    Other(String),
}

fn main() -> ExitCode {
    println!("Azure OpenAI connection check");
    println!("=============================");

    let Some(endpoint) = std::env::var("AZURE_OPENAI_ENDPOINT")
        .ok()
        .filter(|v| !v.trim().is_empty())
    else {
        println!("[FAIL] AZURE_OPENAI_ENDPOINT is not set");
        return ExitCode::FAILURE;
    };
    println!("Target endpoint: {endpoint}");

    match local_ip_address::local_ip() {
        Ok(ip) => println!("Local IP: {ip}"),
        Err(e) => println!("[WARN] Could not detect local IP: {e}"),
    }

    let public_ip = public_ip();
    match &public_ip {
        Some(ip) => println!("Public IP: {ip}"),
        None => println!("[WARN] Could not detect public IP"),
    }

    if let Err(e) = resolve(&endpoint) {
        println!("[FAIL] DNS resolution: {e}");
        return ExitCode::FAILURE;
    }

    println!();
    println!("Probing endpoint ({}s timeout)...", PROBE_TIMEOUT.as_secs());
    let ok = match probe(&endpoint, true) {
        Ok(status) => {
            println!("[ OK ] Connection established, status {status}");
            if status == 401 || status == 404 {
                println!("       Expected for the bare endpoint: the server is reachable.");
            }
            true
        }
        Err(ProbeFailure::Timeout) => {
            println!("[FAIL] Timed out connecting to the endpoint.");
            println!("       Likely cause: firewall or IP restriction on the resource.");
            false
        }
        Err(ProbeFailure::Tls(detail)) => {
            println!("[FAIL] TLS certificate error: {detail}");
            println!("       Retrying with certificate verification disabled...");
            match probe(&endpoint, false) {
                Ok(status) => {
                    println!("[WARN] Insecure connection succeeded, status {status}");
                    println!("       Likely cause: the network intercepts TLS or is a captive portal.");
                    println!("       Fix: switch networks, or set VERIFY_SSL=false for local debugging only.");
                }
                Err(_) => println!("[FAIL] Still failing with verification disabled."),
            }
            false
        }
        Err(ProbeFailure::Connection(detail)) => {
            println!("[FAIL] Connection error: {detail}");
            println!("       Likely cause: local network blocking or unreachable host.");
            false
        }
        Err(ProbeFailure::Other(detail)) => {
            println!("[FAIL] Unexpected error: {detail}");
            false
        }
    };

    if !ok {
        print_advice(public_ip.as_deref());
        return ExitCode::FAILURE;
    }
    ExitCode::SUCCESS
}

fn public_ip() -> Option<String> {
    let client = reqwest::blocking::Client::builder()
        .timeout(PROBE_TIMEOUT)
        .build()
        .ok()?;
    let text = client.get(PUBLIC_IP_URL).send().ok()?.text().ok()?;
    let ip = text.trim();
    (!ip.is_empty()).then(|| ip.to_string())
}

fn resolve(endpoint: &str) -> Result<(), String> {
    let url = reqwest::Url::parse(endpoint).map_err(|e| format!("invalid endpoint URL: {e}"))?;
    let host = url
        .host_str()
        .ok_or_else(|| "endpoint URL has no host".to_string())?;
    let port = url.port_or_known_default().unwrap_or(443);

    let addrs: Vec<_> = (host, port)
        .to_socket_addrs()
        .map_err(|e| format!("could not resolve {host}: {e}"))?
        .collect();
    match addrs.first() {
        Some(addr) => {
            println!("[ OK ] DNS resolution: {host} -> {}", addr.ip());
            Ok(())
        }
        None => Err(format!("{host} resolved to no addresses")),
    }
}

fn probe(endpoint: &str, verify_ssl: bool) -> Result<u16, ProbeFailure> {
    let client = reqwest::blocking::Client::builder()
        .timeout(PROBE_TIMEOUT)
        .danger_accept_invalid_certs(!verify_ssl)
        .build()
        .map_err(|e| ProbeFailure::Other(e.to_string()))?;

    match client.get(endpoint).send() {
        Ok(response) => Ok(response.status().as_u16()),
        Err(e) if e.is_timeout() => Err(ProbeFailure::Timeout),
        Err(e) if is_tls_failure(&e) => Err(ProbeFailure::Tls(e.to_string())),
        Err(e) if e.is_connect() => Err(ProbeFailure::Connection(e.to_string())),
        Err(e) => Err(ProbeFailure::Other(e.to_string())),
    }
}

fn print_advice(public_ip: Option<&str>) {
    println!();
    println!("Recommendation:");
    println!("If DNS works but the probe times out or cannot connect:");
    println!("1. Open the Azure OpenAI resource in the Azure Portal");
    println!("2. Go to Networking > Firewall");
    println!("3. Allow your client IP under 'Selected Networks'");
    if let Some(ip) = public_ip {
        println!("   (Client IP to add: {ip})");
    }
}
