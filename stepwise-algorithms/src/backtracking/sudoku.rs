use super::SolutionLog;
use crate::registry::{Algorithm, AlgorithmCategory, AlgorithmInfo};
use stepwise_core::checkpoint::{Highlight, StepKind, Subject};
use stepwise_core::emitter::{StepContext, StepFuture};
use stepwise_core::error::{Result, StepwiseError};
use stepwise_core::outcome::RunOutcome;
use stepwise_core::params::{RunInput, SolutionLimit};

const SIDE: usize = 9;
const BOX: usize = 3;

/// Fill a 9x9 grid, always branching on the first empty cell in row-major
/// order and trying digits 1 through 9.
pub async fn solve_sudoku(
    ctx: &StepContext,
    grid: Vec<Vec<u8>>,
    limit: SolutionLimit,
) -> Result<RunOutcome> {
    let mut grid = grid;
    let mut log = SolutionLog::new(limit);
    let stopped = fill(ctx, &mut grid, &mut log).await?;
    log.finish(ctx, &grid, stopped).await
}

fn fill<'a>(
    ctx: &'a StepContext,
    grid: &'a mut Vec<Vec<u8>>,
    log: &'a mut SolutionLog,
) -> StepFuture<'a, bool> {
    Box::pin(async move {
        let Some((row, col)) = first_empty(grid) else {
            return log.record(ctx, grid).await;
        };

        for digit in 1..=SIDE as u8 {
            if !allowed(grid, row, col, digit) {
                continue;
            }

            grid[row][col] = digit;
            ctx.checkpoint(
                Subject::Board(grid.clone()),
                Highlight::cell(row, col),
                StepKind::Place,
            )
            .await?;

            if fill(ctx, &mut *grid, &mut *log).await? {
                return Ok(true);
            }

            grid[row][col] = 0;
            ctx.checkpoint(
                Subject::Board(grid.clone()),
                Highlight::cell(row, col),
                StepKind::Remove,
            )
            .await?;
        }

        Ok(false)
    })
}

fn first_empty(grid: &[Vec<u8>]) -> Option<(usize, usize)> {
    grid.iter().enumerate().find_map(|(row, cells)| {
        cells
            .iter()
            .position(|&cell| cell == 0)
            .map(|col| (row, col))
    })
}

/// Whether `digit` can go at `(row, col)` without repeating in its row,
/// column or box. The cell itself is ignored.
fn allowed(grid: &[Vec<u8>], row: usize, col: usize, digit: u8) -> bool {
    for i in 0..SIDE {
        if i != col && grid[row][i] == digit {
            return false;
        }
        if i != row && grid[i][col] == digit {
            return false;
        }
    }

    let (top, left) = (row - row % BOX, col - col % BOX);
    for r in top..top + BOX {
        for c in left..left + BOX {
            if (r, c) != (row, col) && grid[r][c] == digit {
                return false;
            }
        }
    }
    true
}

/// Registered Sudoku solver.
#[derive(Debug, Clone, Copy)]
pub struct Sudoku;

impl Sudoku {
    fn parts<'i>(&self, input: &'i RunInput) -> Result<(&'i [Vec<u8>], SolutionLimit)> {
        match input {
            RunInput::Sudoku { grid, limit } => {
                check_grid(grid)?;
                Ok((grid, *limit))
            }
            other => Err(self.info().mismatch(other)),
        }
    }
}

fn check_grid(grid: &[Vec<u8>]) -> Result<()> {
    if grid.len() != SIDE || grid.iter().any(|row| row.len() != SIDE) {
        return Err(StepwiseError::invalid("grid", "must be 9 rows of 9 cells"));
    }
    for (row, cells) in grid.iter().enumerate() {
        for (col, &cell) in cells.iter().enumerate() {
            if cell > SIDE as u8 {
                return Err(StepwiseError::invalid(
                    "grid",
                    format!("cell ({}, {}) holds {}; expected 0-9", row, col, cell),
                ));
            }
            if cell != 0 && !allowed(grid, row, col, cell) {
                return Err(StepwiseError::invalid(
                    "grid",
                    format!("given {} at ({}, {}) conflicts with another", cell, row, col),
                ));
            }
        }
    }
    Ok(())
}

impl Algorithm for Sudoku {
    fn info(&self) -> AlgorithmInfo {
        AlgorithmInfo::new("sudoku", AlgorithmCategory::Backtracking)
            .with_display_name("Sudoku")
            .with_description("Fills the first empty cell with each legal digit and backtracks")
            .with_input("sudoku")
    }

    fn validate(&self, input: &RunInput) -> Result<()> {
        self.parts(input).map(|_| ())
    }

    fn run<'a>(&'a self, ctx: &'a StepContext, input: RunInput) -> StepFuture<'a, RunOutcome> {
        Box::pin(async move {
            let (grid, limit) = self.parts(&input)?;
            solve_sudoku(ctx, grid.to_vec(), limit).await
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use stepwise_core::testing::TestHarness;

    fn parse(rows: &[&str]) -> Vec<Vec<u8>> {
        rows.iter()
            .map(|row| row.bytes().map(|b| b - b'0').collect())
            .collect()
    }

    fn puzzle() -> Vec<Vec<u8>> {
        parse(&[
            "530070000",
            "600195000",
            "098000060",
            "800060003",
            "400803001",
            "700020006",
            "060000280",
            "000419005",
            "000080079",
        ])
    }

    #[tokio::test]
    async fn solves_classic_puzzle() {
        let harness = TestHarness::new();
        let outcome = solve_sudoku(&harness.ctx, puzzle(), SolutionLimit::FIRST)
            .await
            .unwrap();

        let solutions = outcome.solutions();
        assert_eq!(solutions.len(), 1);
        assert_eq!(
            solutions[0].board,
            parse(&[
                "534678912",
                "672195348",
                "198342567",
                "859761423",
                "426853791",
                "713924856",
                "961537284",
                "287419635",
                "345286179",
            ])
        );
        assert_eq!(harness.sink.last().unwrap().kind, StepKind::Solved);
    }

    #[tokio::test]
    async fn full_grid_is_its_own_solution() {
        let harness = TestHarness::new();
        let solved = parse(&[
            "534678912",
            "672195348",
            "198342567",
            "859761423",
            "426853791",
            "713924856",
            "961537284",
            "287419635",
            "345286179",
        ]);
        let outcome = solve_sudoku(&harness.ctx, solved.clone(), SolutionLimit::All)
            .await
            .unwrap();
        assert_eq!(outcome.solutions()[0].board, solved);
        assert_eq!(harness.sink.kinds(), vec![StepKind::Solved, StepKind::Exhausted]);
    }

    #[test]
    fn rejects_conflicting_givens() {
        let mut grid = puzzle();
        grid[0][2] = 5;
        let err = Sudoku
            .validate(&RunInput::Sudoku {
                grid,
                limit: SolutionLimit::FIRST,
            })
            .unwrap_err();
        assert_eq!(err.code(), "E101");
    }

    #[test]
    fn rejects_wrong_shape() {
        let err = Sudoku
            .validate(&RunInput::Sudoku {
                grid: vec![vec![0; 9]; 8],
                limit: SolutionLimit::FIRST,
            })
            .unwrap_err();
        assert!(err.to_string().contains("9 rows"));
    }
}
