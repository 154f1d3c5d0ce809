use super::{SearchResult, probe};
use stepwise_core::emitter::StepContext;
use stepwise_core::error::Result;

/// Binary search over ascending values.
///
/// Each midpoint is checkpointed before it is compared. The search reports
/// "not found" once `left > right`.
pub async fn binary_search(ctx: &StepContext, values: Vec<i64>, target: i64) -> Result<SearchResult> {
    let mut left: isize = 0;
    let mut right: isize = values.len() as isize - 1;
    let mut probes = 0;

    while left <= right {
        let mid = (left + (right - left) / 2) as usize;
        let value = values[mid];
        probes += 1;
        probe(ctx, &values, mid, value == target).await?;

        if value == target {
            return Ok(SearchResult {
                index: Some(mid),
                probes,
            });
        }
        if value < target {
            left = mid as isize + 1;
        } else {
            right = mid as isize - 1;
        }
    }

    Ok(SearchResult {
        index: None,
        probes,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use stepwise_core::checkpoint::Highlight;
    use stepwise_core::testing::TestHarness;

    #[tokio::test]
    async fn finds_every_present_target() {
        let values: Vec<i64> = (0..20).map(|v| v * 3).collect();
        for (index, &target) in values.iter().enumerate() {
            let harness = TestHarness::new();
            let result = binary_search(&harness.ctx, values.clone(), target)
                .await
                .unwrap();
            assert_eq!(result.index, Some(index));
            assert!(result.probes <= 5);
        }
    }

    #[tokio::test]
    async fn absent_targets_are_not_found() {
        let values = vec![2, 4, 6, 8, 10];
        for target in [-1, 1, 5, 11] {
            let harness = TestHarness::new();
            let result = binary_search(&harness.ctx, values.clone(), target)
                .await
                .unwrap();
            assert_eq!(result.index, None);
            assert_eq!(result.probes, harness.sink.len());
        }
    }

    #[tokio::test]
    async fn probes_midpoint_first() {
        let harness = TestHarness::new();
        binary_search(&harness.ctx, vec![1, 2, 3, 4, 5, 6, 7], 6)
            .await
            .unwrap();

        let probed: Vec<_> = harness
            .sink
            .checkpoints()
            .into_iter()
            .map(|c| c.highlight)
            .collect();
        assert_eq!(probed, vec![Highlight::index(3), Highlight::index(5)]);
    }
}
