use super::{SearchResult, probe};
use stepwise_core::emitter::StepContext;
use stepwise_core::error::Result;

/// Linear search.
pub async fn linear_search(ctx: &StepContext, values: Vec<i64>, target: i64) -> Result<SearchResult> {
    for (index, &value) in values.iter().enumerate() {
        let hit = value == target;
        probe(ctx, &values, index, hit).await?;
        if hit {
            return Ok(SearchResult {
                index: Some(index),
                probes: index + 1,
            });
        }
    }

    Ok(SearchResult {
        index: None,
        probes: values.len(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use stepwise_core::checkpoint::StepKind;
    use stepwise_core::testing::TestHarness;

    #[tokio::test]
    async fn checkpoints_match_elements_scanned() {
        let harness = TestHarness::new();
        let result = linear_search(&harness.ctx, vec![8, 6, 7, 5, 3], 7)
            .await
            .unwrap();

        assert_eq!(result.index, Some(2));
        assert_eq!(result.probes, 3);
        assert_eq!(harness.sink.len(), 3);
        assert_eq!(
            harness.sink.kinds(),
            vec![StepKind::Probe, StepKind::Probe, StepKind::Found]
        );
    }

    #[tokio::test]
    async fn absent_target_scans_everything() {
        let harness = TestHarness::new();
        let result = linear_search(&harness.ctx, vec![1, 2, 3, 4], 9)
            .await
            .unwrap();

        assert_eq!(result.index, None);
        assert_eq!(harness.sink.len(), 4);
    }
}
