//! Greedy constructions.

mod activity;
mod huffman;

pub use activity::{ActivitySelection, select_activities};
pub use huffman::{HuffmanCoding, huffman_codes, huffman_tree};
