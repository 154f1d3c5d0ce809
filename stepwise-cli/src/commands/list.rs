//! List command - list registered algorithms.

use anyhow::Result;
use stepwise_algorithms::{AlgorithmInfo, AlgorithmRegistry};

/// Run the list command.
pub fn run(category: Option<&str>) -> Result<()> {
    tracing::info!(category = ?category, "Listing algorithms");

    let registry = AlgorithmRegistry::standard();
    let algorithms = filter(registry.list(), category);

    if algorithms.is_empty() {
        if let Some(category) = category {
            anyhow::bail!("No algorithms in category '{}'", category);
        }
        println!("No algorithms registered");
        return Ok(());
    }

    println!("Algorithms");
    println!("==========");
    println!();
    println!(
        "{:<24}{:<22}{:<13}DESCRIPTION",
        "NAME", "CATEGORY", "INPUT"
    );
    println!(
        "{:<24}{:<22}{:<13}-----------",
        "----", "--------", "-----"
    );
    for info in &algorithms {
        println!(
            "{:<24}{:<22}{:<13}{}",
            info.name, info.category, info.input_kind, info.description
        );
    }
    println!();
    println!("{} algorithm(s)", algorithms.len());

    Ok(())
}

fn filter(algorithms: Vec<AlgorithmInfo>, category: Option<&str>) -> Vec<AlgorithmInfo> {
    match category {
        Some(wanted) => {
            let wanted = wanted.trim().to_ascii_lowercase().replace('-', "_");
            algorithms
                .into_iter()
                .filter(|info| info.category.as_str() == wanted)
                .collect()
        }
        None => algorithms,
    }
}
