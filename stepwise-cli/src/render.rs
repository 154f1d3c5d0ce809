//! Terminal rendering of checkpoints and outcomes.

use anyhow::Result;
use clap::ValueEnum;
use stepwise_core::checkpoint::{Checkpoint, Highlight, HuffmanNode, Subject, TreeSnapshot};
use stepwise_core::logging::LogEvent;
use stepwise_core::outcome::{RunOutcome, TreeResult};

/// How checkpoints and outcomes are printed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// One aligned line per checkpoint
    Text,
    /// One JSON object per line
    Json,
}

/// Print one checkpoint to stdout.
pub fn print_checkpoint(format: OutputFormat, checkpoint: &Checkpoint) {
    match format {
        OutputFormat::Text => println!("{}", checkpoint_line(checkpoint)),
        OutputFormat::Json => match serde_json::to_string(checkpoint) {
            Ok(line) => println!("{}", line),
            Err(e) => tracing::warn!(error = %e, "Failed to encode checkpoint"),
        },
    }
}

/// Print one run log entry to stdout, between the checkpoints around it.
pub fn print_log_event(format: OutputFormat, event: &LogEvent) {
    match format {
        OutputFormat::Text => println!("  » {}", log_line(event)),
        OutputFormat::Json => match serde_json::to_string(&serde_json::json!({ "log": event })) {
            Ok(line) => println!("{}", line),
            Err(e) => tracing::warn!(error = %e, "Failed to encode log event"),
        },
    }
}

fn log_line(event: &LogEvent) -> String {
    let mut fields: Vec<String> = event
        .fields
        .iter()
        .map(|(key, value)| format!("{}={}", key, value))
        .collect();
    fields.sort();
    let mut line = format!("{:<5} {}", event.level.as_str().to_uppercase(), event.message);
    if !fields.is_empty() {
        line.push_str(&format!(" ({})", fields.join(", ")));
    }
    line
}

/// Print a run outcome to stdout.
pub fn print_outcome(format: OutputFormat, algorithm: &str, outcome: &RunOutcome) -> Result<()> {
    match format {
        OutputFormat::Json => {
            let line = serde_json::json!({ "algorithm": algorithm, "outcome": outcome });
            println!("{}", serde_json::to_string(&line)?);
        }
        OutputFormat::Text => {
            println!();
            println!("✓ {} finished", algorithm);
            for line in outcome_lines(outcome) {
                println!("  {}", line);
            }
        }
    }
    Ok(())
}

pub fn checkpoint_line(checkpoint: &Checkpoint) -> String {
    format!(
        "[{:>5}] {:<9} {:<10} {}",
        checkpoint.seq,
        checkpoint.kind,
        highlight(&checkpoint.highlight),
        subject(&checkpoint.subject),
    )
}

fn highlight(highlight: &Highlight) -> String {
    match highlight {
        Highlight::None => "-".to_string(),
        Highlight::Index { index } => format!("[{}]", index),
        Highlight::Pair { first, second } => format!("[{},{}]", first, second),
        Highlight::Cell { row, col } => format!("({},{})", row, col),
        Highlight::Vertex { name } => name.clone(),
        Highlight::Node { id } => format!("#{}", id),
    }
}

fn board(rows: &[Vec<u8>]) -> String {
    rows.iter()
        .map(|row| row.iter().map(|cell| cell.to_string()).collect::<String>())
        .collect::<Vec<_>>()
        .join("/")
}

fn tree(snapshot: &TreeSnapshot) -> String {
    let root = snapshot
        .root
        .and_then(|id| snapshot.node(id))
        .map_or_else(|| "-".to_string(), |node| node.value.to_string());
    format!("root={} in-order={:?}", root, snapshot.in_order())
}

fn huffman_weights(nodes: &[HuffmanNode]) -> String {
    nodes
        .iter()
        .map(|node| format!("{}:{}", node.symbol.as_deref().unwrap_or("*"), node.weight))
        .collect::<Vec<_>>()
        .join(" ")
}

fn subject(subject: &Subject) -> String {
    match subject {
        Subject::Empty => "-".to_string(),
        Subject::Array(values) => format!("{:?}", values),
        Subject::Table(rows) => rows
            .iter()
            .map(|row| format!("{:?}", row))
            .collect::<Vec<_>>()
            .join(" "),
        Subject::Board(rows) => board(rows),
        Subject::Traversal(frame) => format!(
            "at={} visited={:?} frontier={:?}",
            frame.current.as_deref().unwrap_or("-"),
            frame.visited,
            frame.frontier
        ),
        Subject::Activities(selected) => format!(
            "{:?}",
            selected.iter().map(|a| a.name.as_str()).collect::<Vec<_>>()
        ),
        Subject::Huffman(nodes) => huffman_weights(nodes),
        Subject::Tree(snapshot) => tree(snapshot),
    }
}

fn outcome_lines(outcome: &RunOutcome) -> Vec<String> {
    match outcome {
        RunOutcome::Sorted { values } => vec![format!("Sorted: {:?}", values)],
        RunOutcome::Search { index, probes } => vec![
            match index {
                Some(index) => format!("Found at index {}", index),
                None => "Not found (-1)".to_string(),
            },
            format!("Probes: {}", probes),
        ],
        RunOutcome::Traversal { order } => vec![format!("Order: {}", order.join(" -> "))],
        RunOutcome::Sequence { table, answer } => {
            vec![format!("Table: {:?}", table), format!("Answer: {}", answer)]
        }
        RunOutcome::Table { table, answer } => {
            let mut lines: Vec<String> = table.iter().map(|row| format!("{:?}", row)).collect();
            lines.push(format!("Answer: {}", answer));
            lines
        }
        RunOutcome::Activities { selected } => selected
            .iter()
            .map(|a| format!("{} [{}, {})", a.name, a.start, a.finish))
            .collect(),
        RunOutcome::Huffman { root, codes } => {
            let mut lines = vec![format!("Total weight: {}", root.weight)];
            lines.extend(codes.iter().map(|(symbol, code)| format!("{} = {}", symbol, code)));
            lines
        }
        RunOutcome::Solutions {
            solutions,
            exhausted,
        } => {
            let mut lines = vec![format!(
                "Solutions: {}{}",
                solutions.len(),
                if *exhausted { " (search exhausted)" } else { "" }
            )];
            lines.extend(
                solutions
                    .iter()
                    .map(|s| format!("#{} {}", s.seq, board(&s.board))),
            );
            lines
        }
        RunOutcome::Tree { snapshot, result } => {
            let result = match result {
                TreeResult::Inserted { id } => format!("Inserted as #{}", id),
                TreeResult::Duplicate { id } => format!("Already present as #{}", id),
                TreeResult::Deleted => "Deleted".to_string(),
                TreeResult::Found { id } => format!("Found #{}", id),
                TreeResult::NotFound => "Not found".to_string(),
            };
            vec![result, tree(snapshot)]
        }
    }
}
