//! Run command - execute algorithms and stream their checkpoints.

use anyhow::{Context, Result};
use clap::Args;
use serde::Deserialize;
use std::path::Path;
use std::sync::Arc;
use stepwise_algorithms::{AlgorithmInfo, AlgorithmRegistry};
use stepwise_core::clock::MockClock;
use stepwise_core::logging::{BufferedCollector, LogLevel};
use stepwise_core::params::{
    RunInput, RunRequest, SolutionLimit, SortOrder, TreeAction, TreeKind, parse_target,
    parse_values,
};
use stepwise_engine::{EngineConfig, RunController};

use crate::render::{self, OutputFormat};

/// Arguments for `stepwise run`.
#[derive(Args, Debug)]
pub struct RunArgs {
    /// Algorithm to run (see `stepwise list`)
    #[arg(required_unless_present = "file", conflicts_with = "file")]
    pub algorithm: Option<String>,

    /// Read one or more requests from a YAML file instead of flags
    #[arg(short, long)]
    pub file: Option<String>,

    /// Comma-separated integers (arrays, search input, knapsack item values)
    #[arg(long, allow_hyphen_values = true)]
    pub values: Option<String>,

    /// Search target
    #[arg(long, allow_hyphen_values = true)]
    pub target: Option<String>,

    /// Sort in descending order
    #[arg(long)]
    pub descending: bool,

    /// Fibonacci index
    #[arg(short, long)]
    pub n: Option<usize>,

    /// N-Queens board size
    #[arg(long)]
    pub size: Option<usize>,

    /// Stop after this many solutions (0 explores the whole space)
    #[arg(long)]
    pub limit: Option<usize>,

    /// Comma-separated knapsack item weights
    #[arg(long)]
    pub weights: Option<String>,

    /// Knapsack capacity
    #[arg(long)]
    pub capacity: Option<usize>,

    /// First LCS string
    #[arg(long)]
    pub first: Option<String>,

    /// Second LCS string
    #[arg(long)]
    pub second: Option<String>,

    /// Tree operations run in order, e.g. "insert 5, insert 3, delete 5"
    #[arg(long)]
    pub ops: Option<String>,

    /// Playback speed, 1 (slowest) to 100 (fastest)
    #[arg(short, long, default_value_t = 100)]
    pub speed: u32,

    /// Skip all pacing delays
    #[arg(long)]
    pub instant: bool,

    /// Output format
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,

    /// Only print outcomes
    #[arg(short, long)]
    pub quiet: bool,

    /// Print run activity (started, paused, finished, ...) at or above LEVEL
    #[arg(long, value_name = "LEVEL")]
    pub run_log: Option<LogLevel>,
}

/// Contents of a request file: one request or a batch.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum RequestFile {
    Batch { requests: Vec<RunRequest> },
    Single(RunRequest),
}

/// Parse request YAML.
pub fn parse_requests(content: &str) -> Result<Vec<RunRequest>> {
    let file: RequestFile = serde_yaml::from_str(content).context("Invalid request YAML")?;
    let requests = match file {
        RequestFile::Batch { requests } => requests,
        RequestFile::Single(request) => vec![request],
    };
    if requests.is_empty() {
        anyhow::bail!("Request file contains no requests");
    }
    Ok(requests)
}

/// Read and parse a request file.
pub fn load_requests(file: &str) -> Result<Vec<RunRequest>> {
    let path = Path::new(file);
    if !path.exists() {
        anyhow::bail!("Request file not found: {}", file);
    }
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read request file {}", file))?;
    parse_requests(&content)
}

/// Run the run command.
pub async fn run(args: RunArgs) -> Result<()> {
    let registry = AlgorithmRegistry::standard();
    let requests = match (&args.file, &args.algorithm) {
        (Some(file), _) => load_requests(file)?,
        (None, Some(name)) => {
            let info = registry.get(name)?.info();
            build_requests(&args, &info)?
        }
        (None, None) => anyhow::bail!("Name an algorithm or pass --file"),
    };

    let controller = build_controller(&args, registry)?;

    if !args.quiet {
        let format = args.format;
        controller.on_checkpoint(move |checkpoint| render::print_checkpoint(format, checkpoint));
    }

    for request in requests {
        let algorithm = request.algorithm.clone();
        let run_id = controller
            .start(request)
            .with_context(|| format!("Failed to start {}", algorithm))?;
        tracing::info!(%run_id, algorithm = %algorithm, "Run dispatched");

        let outcome = controller
            .wait()
            .await
            .with_context(|| format!("{} did not finish", algorithm))?;
        render::print_outcome(args.format, &algorithm, &outcome)?;
    }

    Ok(())
}

/// Controller configured from the environment and the playback flags.
fn build_controller(args: &RunArgs, registry: AlgorithmRegistry) -> Result<RunController> {
    let config = EngineConfig::from_env();
    tracing::debug!(?config, instant = args.instant, "Preparing controller");
    let controller = if args.instant {
        RunController::with_clock(registry, config, Arc::new(MockClock::new()))
    } else {
        RunController::new(registry, config)
    };

    let controller = match args.run_log {
        Some(level) => {
            let collector =
                Arc::new(BufferedCollector::with_default_capacity().with_min_level(level));
            let format = args.format;
            collector.subscribe(Arc::new(move |event| render::print_log_event(format, event)));
            controller.with_log_collector(collector)
        }
        None => controller,
    };

    controller.set_speed(args.speed)?;
    Ok(controller)
}

fn required<'a, T>(value: &'a Option<T>, flag: &str, info: &AlgorithmInfo) -> Result<&'a T> {
    value
        .as_ref()
        .ok_or_else(|| anyhow::anyhow!("{} needs --{}", info.name, flag))
}

fn limit(value: Option<usize>, default: SolutionLimit) -> SolutionLimit {
    match value {
        Some(0) => SolutionLimit::All,
        Some(n) => SolutionLimit::AtMost(n),
        None => default,
    }
}

fn parse_weights(text: &str) -> Result<Vec<usize>> {
    parse_values(text)?
        .into_iter()
        .map(|weight| {
            usize::try_from(weight)
                .map_err(|_| anyhow::anyhow!("weight {} must not be negative", weight))
        })
        .collect()
}

/// Parse "insert 5, delete 3, search 8" into tree actions.
pub fn parse_ops(text: &str) -> Result<Vec<TreeAction>> {
    let ops = text
        .split([',', ';'])
        .map(str::trim)
        .filter(|op| !op.is_empty())
        .map(|op| {
            let (verb, value) = op
                .split_once(char::is_whitespace)
                .ok_or_else(|| anyhow::anyhow!("'{}' should look like 'insert 5'", op))?;
            let value = parse_target(value)?;
            match verb.to_ascii_lowercase().as_str() {
                "insert" | "add" => Ok(TreeAction::Insert(value)),
                "delete" | "remove" => Ok(TreeAction::Delete(value)),
                "search" | "find" => Ok(TreeAction::Search(value)),
                other => anyhow::bail!("unknown tree operation '{}'", other),
            }
        })
        .collect::<Result<Vec<_>>>()?;

    if ops.is_empty() {
        anyhow::bail!("no tree operations given");
    }
    Ok(ops)
}

/// Turn command-line flags into requests for one algorithm.
pub fn build_requests(args: &RunArgs, info: &AlgorithmInfo) -> Result<Vec<RunRequest>> {
    let request = |input| vec![RunRequest::new(info.name.clone(), input)];

    let input = match info.input_kind.as_str() {
        "array" => RunInput::Array {
            values: parse_values(required(&args.values, "values", info)?)?,
            order: if args.descending {
                SortOrder::Descending
            } else {
                SortOrder::Ascending
            },
        },
        "search" => RunInput::Search {
            values: parse_values(required(&args.values, "values", info)?)?,
            target: parse_target(required(&args.target, "target", info)?)?,
        },
        "fibonacci" => RunInput::Fibonacci {
            n: *required(&args.n, "n", info)?,
        },
        "knapsack" => RunInput::Knapsack {
            values: parse_values(required(&args.values, "values", info)?)?,
            weights: parse_weights(required(&args.weights, "weights", info)?)?,
            capacity: *required(&args.capacity, "capacity", info)?,
        },
        "sequences" => RunInput::Sequences {
            first: required(&args.first, "first", info)?.clone(),
            second: required(&args.second, "second", info)?.clone(),
        },
        "queens" => RunInput::Queens {
            size: *required(&args.size, "size", info)?,
            limit: limit(args.limit, SolutionLimit::All),
        },
        "tree" => {
            let tree = [TreeKind::Bst, TreeKind::Avl, TreeKind::RedBlack]
                .into_iter()
                .find(|kind| kind.as_str() == info.name)
                .ok_or_else(|| anyhow::anyhow!("{} is not a tree algorithm", info.name))?;
            let ops = parse_ops(required(&args.ops, "ops", info)?)?;
            return Ok(ops
                .into_iter()
                .map(|action| {
                    RunRequest::new(info.name.clone(), RunInput::Tree {
                        tree,
                        action,
                        base: None,
                    })
                })
                .collect());
        }
        other => anyhow::bail!(
            "{} takes {} input; describe it in a request file and pass --file",
            info.name,
            other
        ),
    };

    Ok(request(input))
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[derive(Parser)]
    struct Harness {
        #[command(flatten)]
        args: RunArgs,
    }

    fn args(argv: &[&str]) -> RunArgs {
        let mut full = vec!["stepwise"];
        full.extend_from_slice(argv);
        Harness::parse_from(full).args
    }

    fn info(name: &str) -> AlgorithmInfo {
        AlgorithmRegistry::standard().get(name).unwrap().info()
    }

    #[test]
    fn array_flags() {
        let requests = build_requests(
            &args(&["quick_sort", "--values", "3, -1, 2", "--descending"]),
            &info("quick_sort"),
        )
        .unwrap();
        assert_eq!(requests, vec![RunRequest::new("quick_sort", RunInput::Array {
            values: vec![3, -1, 2],
            order: SortOrder::Descending,
        })]);
    }

    #[test]
    fn missing_flag_is_named() {
        let err = build_requests(&args(&["binary_search", "--values", "1,2"]), &info("binary_search"))
            .unwrap_err();
        assert_eq!(err.to_string(), "binary_search needs --target");
    }

    #[test]
    fn queens_limit() {
        let all = build_requests(&args(&["n_queens", "--size", "6"]), &info("n_queens")).unwrap();
        assert_eq!(all[0].input, RunInput::Queens {
            size: 6,
            limit: SolutionLimit::All,
        });

        let one = build_requests(
            &args(&["n_queens", "--size", "6", "--limit", "1"]),
            &info("n_queens"),
        )
        .unwrap();
        assert_eq!(one[0].input, RunInput::Queens {
            size: 6,
            limit: SolutionLimit::FIRST,
        });
    }

    #[test]
    fn tree_ops_become_a_sequence() {
        let requests = build_requests(
            &args(&["red_black", "--ops", "insert 5, insert 3; delete 5"]),
            &info("red_black"),
        )
        .unwrap();
        let actions: Vec<TreeAction> = requests
            .into_iter()
            .map(|r| match r.input {
                RunInput::Tree { tree, action, base } => {
                    assert_eq!(tree, TreeKind::RedBlack);
                    assert!(base.is_none());
                    action
                }
                other => panic!("unexpected input {:?}", other),
            })
            .collect();
        assert_eq!(actions, vec![
            TreeAction::Insert(5),
            TreeAction::Insert(3),
            TreeAction::Delete(5)
        ]);
    }

    #[tokio::test]
    async fn run_log_keeps_events_at_the_chosen_level() {
        let quiet = args(&["fibonacci", "--instant", "--run-log", "warn", "-q"]);
        assert_eq!(quiet.run_log, Some(LogLevel::Warn));
        let controller = build_controller(&quiet, AlgorithmRegistry::standard()).unwrap();
        controller
            .start(RunRequest::new("fibonacci", RunInput::Fibonacci { n: 4 }))
            .unwrap();
        controller.wait().await.unwrap();
        assert!(controller.logs().all().is_empty());

        let chatty = args(&["fibonacci", "--instant", "--run-log", "info", "-q"]);
        let controller = build_controller(&chatty, AlgorithmRegistry::standard()).unwrap();
        let run_id = controller
            .start(RunRequest::new("fibonacci", RunInput::Fibonacci { n: 4 }))
            .unwrap();
        controller.wait().await.unwrap();
        let messages: Vec<String> = controller
            .logs()
            .by_run(run_id)
            .into_iter()
            .map(|e| e.message)
            .collect();
        assert_eq!(messages, vec!["Run started", "Run finished"]);
    }

    #[test]
    fn playback_flags_are_checked() {
        let err = build_controller(
            &args(&["fibonacci", "--speed", "0"]),
            AlgorithmRegistry::standard(),
        )
        .unwrap_err();
        assert!(err.to_string().contains("E103"));

        assert!(Harness::try_parse_from(["stepwise", "fibonacci", "--run-log", "loud"]).is_err());
    }

    #[test]
    fn bad_ops() {
        assert!(parse_ops("insert").is_err());
        assert!(parse_ops("rotate 4").is_err());
        assert!(parse_ops("insert x").is_err());
        assert!(parse_ops(" , ").is_err());
    }

    #[test]
    fn graph_input_needs_a_file() {
        let err = build_requests(&args(&["bfs"]), &info("bfs")).unwrap_err();
        assert!(err.to_string().contains("--file"));
    }

    #[test]
    fn negative_weights_are_rejected() {
        assert!(parse_weights("1,-2").is_err());
        assert_eq!(parse_weights("1 2").unwrap(), vec![1, 2]);
    }

    #[test]
    fn request_files() {
        let single = parse_requests(
            "algorithm: fibonacci\ninput:\n  kind: fibonacci\n  n: 7\n",
        )
        .unwrap();
        assert_eq!(single, vec![RunRequest::new("fibonacci", RunInput::Fibonacci {
            n: 7
        })]);

        let batch = parse_requests(
            r#"
requests:
  - algorithm: avl
    input:
      kind: tree
      tree: avl
      action: { op: insert, value: 4 }
  - algorithm: lcs
    input:
      kind: sequences
      first: ABCBDAB
      second: BDCABA
"#,
        )
        .unwrap();
        assert_eq!(batch.len(), 2);
        assert_eq!(batch[1].algorithm, "lcs");

        assert!(parse_requests("requests: []").is_err());
        assert!(parse_requests("algorithm: [").is_err());
    }
}
