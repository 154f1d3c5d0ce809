use super::{compare, finish, swapped};
use stepwise_core::emitter::StepContext;
use stepwise_core::error::Result;
use stepwise_core::params::SortOrder;

/// Bubble sort.
///
/// Each pass only scans up to the last swap of the previous pass, and the
/// sort stops as soon as a pass makes no swaps.
pub async fn bubble_sort(
    ctx: &StepContext,
    mut values: Vec<i64>,
    order: SortOrder,
) -> Result<Vec<i64>> {
    let mut last_unsorted = values.len().saturating_sub(1);

    while last_unsorted > 0 {
        let mut last_swap = 0;
        let mut any_swap = false;

        for i in 0..last_unsorted {
            compare(ctx, &values, i, i + 1).await?;
            if order.should_swap(values[i], values[i + 1]) {
                values.swap(i, i + 1);
                swapped(ctx, &values, i, i + 1).await?;
                last_swap = i;
                any_swap = true;
            }
        }

        if !any_swap {
            break;
        }
        last_unsorted = last_swap;
    }

    finish(ctx, &values).await?;
    Ok(values)
}

#[cfg(test)]
mod tests {
    use super::*;
    use stepwise_core::checkpoint::StepKind;
    use stepwise_core::testing::TestHarness;

    #[tokio::test]
    async fn sorted_input_exits_after_one_pass() {
        let harness = TestHarness::new();
        let values = bubble_sort(&harness.ctx, vec![1, 2, 3, 4, 5], SortOrder::Ascending)
            .await
            .unwrap();

        assert_eq!(values, vec![1, 2, 3, 4, 5]);
        assert_eq!(harness.sink.count(StepKind::Compare), 4);
        assert_eq!(harness.sink.count(StepKind::Swap), 0);
    }

    #[tokio::test]
    async fn boundary_shrinks_to_last_swap() {
        let harness = TestHarness::new();
        // Pass 1 swaps only (0, 1); the tail is already in place.
        let values = bubble_sort(&harness.ctx, vec![2, 1, 3, 4, 5], SortOrder::Ascending)
            .await
            .unwrap();

        assert_eq!(values, vec![1, 2, 3, 4, 5]);
        assert_eq!(harness.sink.count(StepKind::Compare), 4);
        assert_eq!(harness.sink.count(StepKind::Swap), 1);
    }

    #[tokio::test]
    async fn descending() {
        let harness = TestHarness::new();
        let values = bubble_sort(&harness.ctx, vec![3, 9, 1, 9], SortOrder::Descending)
            .await
            .unwrap();
        assert_eq!(values, vec![9, 9, 3, 1]);
    }
}
