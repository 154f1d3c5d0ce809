use crate::input::check_at_most;
use crate::registry::{Algorithm, AlgorithmCategory, AlgorithmInfo};
use std::collections::{BTreeMap, HashSet};
use stepwise_core::checkpoint::{Highlight, HuffmanNode, StepKind, Subject};
use stepwise_core::emitter::{StepContext, StepFuture};
use stepwise_core::error::{Result, StepwiseError};
use stepwise_core::outcome::RunOutcome;
use stepwise_core::params::{RunInput, SymbolWeight};

/// Largest accepted alphabet.
const MAX_SYMBOLS: usize = 64;

/// Build a Huffman tree.
///
/// The working list is re-sorted by weight at the top of every iteration
/// (stable, so equal weights keep their order), the two lightest nodes are
/// merged with the lighter one on the left, and the merged node is appended.
/// Each merge is checkpointed with the new node highlighted.
pub async fn huffman_tree(ctx: &StepContext, symbols: &[SymbolWeight]) -> Result<HuffmanNode> {
    let mut nodes: Vec<HuffmanNode> = symbols
        .iter()
        .map(|s| HuffmanNode::leaf(s.symbol.clone(), s.weight))
        .collect();

    while nodes.len() > 1 {
        nodes.sort_by_key(|n| n.weight);
        let left = nodes.remove(0);
        let right = nodes.remove(0);
        let merged = HuffmanNode::merge(left, right)
            .ok_or_else(|| StepwiseError::invalid("symbols", "total weight overflows"))?;
        nodes.push(merged);

        let merged_at = nodes.len() - 1;
        ctx.checkpoint(
            Subject::Huffman(nodes.clone()),
            Highlight::index(merged_at),
            StepKind::Merge,
        )
        .await?;
    }

    nodes
        .pop()
        .ok_or_else(|| StepwiseError::invalid("symbols", "must not be empty"))
}

/// Prefix codes read off a Huffman tree; left is `0`, right is `1`.
///
/// A tree that is a single leaf gets the code `"0"`.
pub fn huffman_codes(root: &HuffmanNode) -> BTreeMap<String, String> {
    let mut codes = BTreeMap::new();
    if root.is_leaf() {
        if let Some(symbol) = &root.symbol {
            codes.insert(symbol.clone(), "0".to_string());
        }
        return codes;
    }

    let mut stack: Vec<(&HuffmanNode, String)> = vec![(root, String::new())];
    while let Some((node, prefix)) = stack.pop() {
        if let Some(symbol) = &node.symbol {
            codes.insert(symbol.clone(), prefix);
            continue;
        }
        if let Some(right) = &node.right {
            stack.push((right, format!("{}1", prefix)));
        }
        if let Some(left) = &node.left {
            stack.push((left, format!("{}0", prefix)));
        }
    }
    codes
}

/// Registered Huffman coding.
#[derive(Debug, Clone, Copy)]
pub struct HuffmanCoding;

impl HuffmanCoding {
    fn symbols<'i>(&self, input: &'i RunInput) -> Result<&'i [SymbolWeight]> {
        match input {
            RunInput::Frequencies { symbols } => {
                if symbols.is_empty() {
                    return Err(StepwiseError::invalid("symbols", "must not be empty"));
                }
                check_at_most("symbols", symbols.len(), MAX_SYMBOLS)?;
                if symbols
                    .iter()
                    .try_fold(0u64, |total, s| total.checked_add(s.weight))
                    .is_none()
                {
                    return Err(StepwiseError::invalid("symbols", "total weight overflows"));
                }
                let mut seen = HashSet::new();
                for s in symbols {
                    if !seen.insert(s.symbol.as_str()) {
                        return Err(StepwiseError::invalid(
                            "symbols",
                            format!("'{}' is listed twice", s.symbol),
                        ));
                    }
                }
                Ok(symbols)
            }
            other => Err(self.info().mismatch(other)),
        }
    }
}

impl Algorithm for HuffmanCoding {
    fn info(&self) -> AlgorithmInfo {
        AlgorithmInfo::new("huffman", AlgorithmCategory::Greedy)
            .with_display_name("Huffman Coding")
            .with_description("Repeatedly merges the two lightest subtrees into a prefix code")
            .with_input("frequencies")
    }

    fn validate(&self, input: &RunInput) -> Result<()> {
        self.symbols(input).map(|_| ())
    }

    fn run<'a>(&'a self, ctx: &'a StepContext, input: RunInput) -> StepFuture<'a, RunOutcome> {
        Box::pin(async move {
            let symbols = self.symbols(&input)?;
            let root = huffman_tree(ctx, symbols).await?;
            let codes = huffman_codes(&root);
            Ok(RunOutcome::Huffman { root, codes })
        })
    }
}
