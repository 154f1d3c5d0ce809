use super::SolutionLog;
use crate::registry::{Algorithm, AlgorithmCategory, AlgorithmInfo};
use stepwise_core::checkpoint::{Highlight, StepKind, Subject};
use stepwise_core::emitter::{StepContext, StepFuture};
use stepwise_core::error::{Result, StepwiseError};
use stepwise_core::outcome::RunOutcome;
use stepwise_core::params::{RunInput, SolutionLimit};

/// Largest accepted board side.
pub const MAX_QUEENS: usize = 12;

/// Place `size` queens column by column.
pub async fn solve_n_queens(
    ctx: &StepContext,
    size: usize,
    limit: SolutionLimit,
) -> Result<RunOutcome> {
    let mut board = vec![vec![0u8; size]; size];
    let mut log = SolutionLog::new(limit);
    let stopped = place_column(ctx, &mut board, 0, &mut log).await?;
    log.finish(ctx, &board, stopped).await
}

/// Try every row of `col`; true once the solution limit is reached.
fn place_column<'a>(
    ctx: &'a StepContext,
    board: &'a mut Vec<Vec<u8>>,
    col: usize,
    log: &'a mut SolutionLog,
) -> StepFuture<'a, bool> {
    Box::pin(async move {
        let size = board.len();
        if col == size {
            return log.record(ctx, board).await;
        }

        for row in 0..size {
            if !is_safe(board, row, col) {
                continue;
            }

            board[row][col] = 1;
            ctx.checkpoint(
                Subject::Board(board.clone()),
                Highlight::cell(row, col),
                StepKind::Place,
            )
            .await?;

            if place_column(ctx, &mut *board, col + 1, &mut *log).await? {
                return Ok(true);
            }

            board[row][col] = 0;
            ctx.checkpoint(
                Subject::Board(board.clone()),
                Highlight::cell(row, col),
                StepKind::Remove,
            )
            .await?;
        }

        Ok(false)
    })
}

/// Scan the row, the column and both diagonals through `(row, col)`.
fn is_safe(board: &[Vec<u8>], row: usize, col: usize) -> bool {
    let size = board.len();
    let occupied = |r: usize, c: usize| board[r][c] != 0;

    if (0..size).any(|c| occupied(row, c)) || (0..size).any(|r| occupied(r, col)) {
        return false;
    }

    let diagonals: [(isize, isize); 4] = [(-1, -1), (-1, 1), (1, -1), (1, 1)];
    for (dr, dc) in diagonals {
        let (mut r, mut c) = (row as isize + dr, col as isize + dc);
        while (0..size as isize).contains(&r) && (0..size as isize).contains(&c) {
            if occupied(r as usize, c as usize) {
                return false;
            }
            r += dr;
            c += dc;
        }
    }
    true
}

/// Registered N-Queens.
#[derive(Debug, Clone, Copy)]
pub struct NQueens;

impl NQueens {
    fn parts(&self, input: &RunInput) -> Result<(usize, SolutionLimit)> {
        match input {
            RunInput::Queens { size, limit } => {
                if *size == 0 || *size > MAX_QUEENS {
                    return Err(StepwiseError::invalid(
                        "size",
                        format!("board size must be between 1 and {}", MAX_QUEENS),
                    ));
                }
                Ok((*size, *limit))
            }
            other => Err(self.info().mismatch(other)),
        }
    }
}

impl Algorithm for NQueens {
    fn info(&self) -> AlgorithmInfo {
        AlgorithmInfo::new("n_queens", AlgorithmCategory::Backtracking)
            .with_display_name("N-Queens")
            .with_description("Column-by-column queen placement with backtracking")
            .with_input("queens")
    }

    fn validate(&self, input: &RunInput) -> Result<()> {
        self.parts(input).map(|_| ())
    }

    fn run<'a>(&'a self, ctx: &'a StepContext, input: RunInput) -> StepFuture<'a, RunOutcome> {
        Box::pin(async move {
            let (size, limit) = self.parts(&input)?;
            solve_n_queens(ctx, size, limit).await
        })
    }
}
