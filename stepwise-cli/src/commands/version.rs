//! Version command - show version information.

use anyhow::Result;
use stepwise_algorithms::AlgorithmRegistry;

/// Version information.
const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Run the version command.
pub fn run() -> Result<()> {
    println!("stepwise - Step-by-step Algorithm Visualization Engine");
    println!();
    println!("Version:     {}", VERSION);
    println!(
        "Platform:    {} / {}",
        std::env::consts::OS,
        std::env::consts::ARCH
    );
    println!("Algorithms:  {}", AlgorithmRegistry::standard().len());
    println!();
    println!("Components:");
    println!("  stepwise-core        Checkpoints, scheduler, clock, errors, logging");
    println!("  stepwise-algorithms  Instrumented algorithms and registry");
    println!("  stepwise-engine      Run controller, replay, tracing setup");
    println!("  stepwise-cli         Command-line interface");

    Ok(())
}
