//! N-Queens and Sudoku through the registry.

mod common;

use std::collections::HashSet;
use stepwise_core::{Highlight, RunInput, SolutionLimit, StepKind};

#[tokio::test]
async fn n_queens_solution_counts() {
    for (size, expected) in [(1, 1), (4, 2), (5, 10), (6, 4), (8, 92)] {
        let (outcome, _) = common::run(
            "n_queens",
            RunInput::Queens {
                size,
                limit: SolutionLimit::All,
            },
        )
        .await;
        assert_eq!(outcome.solutions().len(), expected, "n = {}", size);
    }
}

#[tokio::test]
async fn every_removed_queen_was_placed() {
    let (outcome, harness) = common::run(
        "n_queens",
        RunInput::Queens {
            size: 6,
            limit: SolutionLimit::All,
        },
    )
    .await;

    let mut on_board: HashSet<(usize, usize)> = HashSet::new();
    for checkpoint in harness.sink.checkpoints() {
        let Highlight::Cell { row, col } = checkpoint.highlight else {
            continue;
        };
        match checkpoint.kind {
            StepKind::Place => assert!(on_board.insert((row, col))),
            StepKind::Remove => assert!(on_board.remove(&(row, col))),
            _ => {}
        }
    }
    assert!(on_board.is_empty());
    assert_eq!(outcome.solutions().len(), 4);
}

#[tokio::test]
async fn solutions_are_distinct_and_valid() {
    let (outcome, _) = common::run(
        "n_queens",
        RunInput::Queens {
            size: 8,
            limit: SolutionLimit::All,
        },
    )
    .await;

    let boards: HashSet<_> = outcome.solutions().iter().map(|s| s.board.clone()).collect();
    assert_eq!(boards.len(), 92);

    for board in boards {
        let queens: Vec<(i64, i64)> = board
            .iter()
            .enumerate()
            .flat_map(|(r, row)| {
                row.iter()
                    .enumerate()
                    .filter(|(_, cell)| **cell == 1)
                    .map(move |(c, _)| (r as i64, c as i64))
            })
            .collect();
        assert_eq!(queens.len(), 8);
        for (i, a) in queens.iter().enumerate() {
            for b in &queens[i + 1..] {
                assert_ne!(a.0, b.0);
                assert_ne!(a.1, b.1);
                assert_ne!((a.0 - b.0).abs(), (a.1 - b.1).abs());
            }
        }
    }
}

#[tokio::test]
async fn limit_stops_search() {
    let (outcome, harness) = common::run(
        "n_queens",
        RunInput::Queens {
            size: 8,
            limit: SolutionLimit::AtMost(3),
        },
    )
    .await;
    assert_eq!(outcome.solutions().len(), 3);
    assert_eq!(harness.sink.count(StepKind::Solved), 3);
    assert_eq!(harness.sink.count(StepKind::Exhausted), 0);
}

#[tokio::test]
async fn sudoku_defaults_to_first_solution() {
    let request: stepwise_core::RunRequest = serde_json::from_value(serde_json::json!({
        "algorithm": "sudoku",
        "input": {
            "kind": "sudoku",
            "grid": [
                [0, 0, 3, 0, 2, 0, 6, 0, 0],
                [9, 0, 0, 3, 0, 5, 0, 0, 1],
                [0, 0, 1, 8, 0, 6, 4, 0, 0],
                [0, 0, 8, 1, 0, 2, 9, 0, 0],
                [7, 0, 0, 0, 0, 0, 0, 0, 8],
                [0, 0, 6, 7, 0, 8, 2, 0, 0],
                [0, 0, 2, 6, 0, 9, 5, 0, 0],
                [8, 0, 0, 2, 0, 3, 0, 0, 9],
                [0, 0, 5, 0, 1, 0, 3, 0, 0]
            ]
        }
    }))
    .unwrap();

    let (outcome, harness) = common::run(&request.algorithm, request.input).await;
    let solutions = outcome.solutions();
    assert_eq!(solutions.len(), 1);

    let board = &solutions[0].board;
    for i in 0..9 {
        let row: HashSet<u8> = board[i].iter().copied().collect();
        let col: HashSet<u8> = board.iter().map(|r| r[i]).collect();
        assert_eq!(row.len(), 9);
        assert_eq!(col.len(), 9);
        assert!(!row.contains(&0));
    }
    assert_eq!(harness.sink.last().unwrap().kind, StepKind::Solved);
}
