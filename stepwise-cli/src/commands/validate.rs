//! Validate command - check a request file without running it.

use anyhow::Result;
use std::path::Path;
use stepwise_algorithms::AlgorithmRegistry;
use stepwise_core::params::RunRequest;

use super::run::parse_requests;

/// Run the validate command.
pub fn run(file: &str) -> Result<()> {
    let path = Path::new(file);

    if !path.exists() {
        anyhow::bail!("Request file not found: {}", file);
    }

    tracing::info!(file = %file, "Validating requests");

    println!("Validation Results for: {}", file);
    println!("========================{}", "=".repeat(file.len()));
    println!();

    let content =
        std::fs::read_to_string(path).map_err(|e| anyhow::anyhow!("Failed to read file: {}", e))?;

    let requests = match parse_requests(&content) {
        Ok(requests) => requests,
        Err(e) => {
            println!("✗ YAML PARSE ERROR:");
            println!("  {:#}", e);
            anyhow::bail!("YAML parsing failed");
        }
    };

    println!("✓ YAML syntax is valid ({} request(s))", requests.len());
    println!();

    let registry = AlgorithmRegistry::standard();
    let failures = check(&registry, &requests);
    for (index, request) in requests.iter().enumerate() {
        match failures.iter().find(|(i, _)| *i == index) {
            Some((_, error)) => println!("✗ [{}] {}: {}", index, request.algorithm, error),
            None => println!("✓ [{}] {}", index, request.algorithm),
        }
    }
    println!();

    if failures.is_empty() {
        println!("✓ All requests are valid");
        Ok(())
    } else {
        println!("✗ {} of {} request(s) invalid", failures.len(), requests.len());
        anyhow::bail!("Validation failed");
    }
}

/// Index and message of every request that would be rejected at start.
fn check(registry: &AlgorithmRegistry, requests: &[RunRequest]) -> Vec<(usize, String)> {
    requests
        .iter()
        .enumerate()
        .filter_map(|(index, request)| {
            registry
                .get(&request.algorithm)
                .and_then(|algorithm| algorithm.validate(&request.input))
                .err()
                .map(|e| (index, e.to_string()))
        })
        .collect()
}
