//! Dynamic programming tables.
//!
//! Each algorithm checkpoints right after a table cell is written, with the
//! cell highlighted. One-dimensional tables (fibonacci, LIS) are sent as
//! arrays; two-dimensional ones (knapsack, LCS) as tables.

mod fibonacci;
mod knapsack;
mod lcs;
mod lis;

pub use fibonacci::{Fibonacci, MAX_FIBONACCI_N, fibonacci};
pub use knapsack::{Knapsack, MAX_CAPACITY, MAX_ITEMS, knapsack};
pub use lcs::{LongestCommonSubsequence, MAX_SEQUENCE_LEN, longest_common_subsequence};
pub use lis::{LongestIncreasing, longest_increasing_subsequence};
