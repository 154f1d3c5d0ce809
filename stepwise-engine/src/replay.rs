//! Step scrubbing over a finished run.
//!
//! A [`Replay`] holds the recorded checkpoint stream of one run and a cursor
//! into it. Backtracking runs also carry their solutions; jumping to a
//! solution moves the step cursor to the checkpoint that revealed it.
//! Cursors clamp at both ends instead of wrapping.

use stepwise_core::checkpoint::Checkpoint;
use stepwise_core::outcome::Solution;

/// Recorded checkpoints and solutions with movable cursors.
#[derive(Debug, Clone)]
pub struct Replay {
    checkpoints: Vec<Checkpoint>,
    solutions: Vec<Solution>,
    step: usize,
    solution: Option<usize>,
}

impl Replay {
    /// Start at the first recorded step, before any solution.
    pub fn new(checkpoints: Vec<Checkpoint>, solutions: Vec<Solution>) -> Self {
        Self {
            checkpoints,
            solutions,
            step: 0,
            solution: None,
        }
    }

    /// Number of recorded steps.
    pub fn len(&self) -> usize {
        self.checkpoints.len()
    }

    /// Whether nothing was recorded.
    pub fn is_empty(&self) -> bool {
        self.checkpoints.is_empty()
    }

    /// Index of the current step.
    pub fn position(&self) -> usize {
        self.step
    }

    /// All recorded solutions in discovery order.
    pub fn solutions(&self) -> &[Solution] {
        &self.solutions
    }

    /// The checkpoint under the cursor.
    pub fn current_step(&self) -> Option<&Checkpoint> {
        self.checkpoints.get(self.step)
    }

    /// The solution under the solution cursor.
    pub fn current_solution(&self) -> Option<&Solution> {
        self.solution.and_then(|index| self.solutions.get(index))
    }

    /// Advance one step; stays on the last step.
    pub fn next_step(&mut self) -> Option<&Checkpoint> {
        if self.step + 1 < self.checkpoints.len() {
            self.step += 1;
        }
        self.current_step()
    }

    /// Go back one step; stays on the first step.
    pub fn previous_step(&mut self) -> Option<&Checkpoint> {
        self.step = self.step.saturating_sub(1);
        self.current_step()
    }

    /// Move to a step index, clamped to the recorded range.
    pub fn seek(&mut self, index: usize) -> Option<&Checkpoint> {
        self.step = index.min(self.checkpoints.len().saturating_sub(1));
        self.current_step()
    }

    /// Advance to the next solution; stays on the last one.
    pub fn next_solution(&mut self) -> Option<&Solution> {
        if self.solutions.is_empty() {
            return None;
        }
        let next = match self.solution {
            None => 0,
            Some(index) => (index + 1).min(self.solutions.len() - 1),
        };
        self.select_solution(next)
    }

    /// Go back to the previous solution; stays on the first one.
    pub fn previous_solution(&mut self) -> Option<&Solution> {
        if self.solutions.is_empty() {
            return None;
        }
        let previous = self.solution.map_or(0, |index| index.saturating_sub(1));
        self.select_solution(previous)
    }

    fn select_solution(&mut self, index: usize) -> Option<&Solution> {
        self.solution = Some(index);
        let seq = self.solutions.get(index)?.seq;
        // History may have been trimmed; leave the step cursor if so.
        if let Ok(step) = self.checkpoints.binary_search_by_key(&seq, |c| c.seq) {
            self.step = step;
        }
        self.current_solution()
    }
}
