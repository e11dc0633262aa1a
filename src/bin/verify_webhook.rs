use log::{debug, error, info};
use serde_json::Value;
use service::{config::Config, logging::Logger};
use std::{fs, io, process};
use webhook_auth::diagnostics::LogSink;
use webhook_auth::providers::provider_config;
use webhook_auth::{SignatureSource, VerificationResult, WebhookPayload, WebhookVerifier};

const EXIT_VALID: i32 = 0;
const EXIT_INVALID: i32 = 1;
const EXIT_USAGE: i32 = 2;

fn main() {
    let config = Config::new();
    Logger::init_logger(&config as &Config);

    let result = run(&config).unwrap_or_else(|e| fail(&e));
    print_result(&result);

    if result.is_valid {
        info!("Webhook signature is valid");
    } else {
        info!(
            "Webhook signature rejected: {}",
            result.error.as_deref().unwrap_or_default()
        );
    }
    process::exit(exit_code(&result));
}

/// Verifies the configured payload. `Err` carries a configuration or input
/// problem, never a signature mismatch.
fn run(config: &Config) -> Result<VerificationResult, String> {
    let verifier = build_verifier(config)?;
    let payload = parse_payload(&read_input(config.payload_file())?)?;
    let source = signature_source(config)?;

    Ok(verifier.verify(&payload, source))
}

fn exit_code(result: &VerificationResult) -> i32 {
    if result.is_valid {
        EXIT_VALID
    } else {
        EXIT_INVALID
    }
}

fn fail(message: &str) -> ! {
    error!("{message}");
    process::exit(EXIT_USAGE);
}

fn build_verifier(config: &Config) -> Result<WebhookVerifier, String> {
    let template = provider_config(&config.provider)
        .ok_or_else(|| format!("Unknown webhook provider: {}", config.provider))?;
    let secret_key = config
        .webhook_secret_key()
        .ok_or_else(|| "No webhook secret key provided".to_string())?;
    debug!("Verifying with preset {template:?}");

    let mut verification_config = template.with_secret(secret_key);
    if config.debug {
        verification_config = verification_config
            .with_debug(true)
            .with_diagnostics(LogSink);
    }

    WebhookVerifier::new(verification_config).map_err(|e| e.to_string())
}

/// Reads a file, or stdin when no path is given.
fn read_input(path: Option<&str>) -> Result<String, String> {
    match path {
        Some(path) => {
            fs::read_to_string(path).map_err(|e| format!("Failed to read {path}: {e}"))
        }
        None => io::read_to_string(io::stdin())
            .map_err(|e| format!("Failed to read payload from stdin: {e}")),
    }
}

fn parse_payload(text: &str) -> Result<WebhookPayload, String> {
    serde_json::from_str(text).map_err(|e| format!("Payload is not a JSON object: {e}"))
}

fn signature_source(config: &Config) -> Result<SignatureSource, String> {
    if let Some(signature) = config.signature() {
        return Ok(SignatureSource::from(signature));
    }

    let path = config
        .headers_file()
        .ok_or_else(|| "Either --signature or --headers-file is required".to_string())?;
    let headers: Value = serde_json::from_str(&read_input(Some(path))?)
        .map_err(|e| format!("Headers file is not valid JSON: {e}"))?;

    Ok(SignatureSource::from(headers))
}

fn print_result(result: &VerificationResult) {
    match serde_json::to_string_pretty(result) {
        Ok(json) => println!("{json}"),
        Err(e) => fail(&format!("Failed to serialize verification result: {e}")),
    }
}
