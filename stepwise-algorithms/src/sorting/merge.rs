use super::{compare, finish, written};
use stepwise_core::checkpoint::{Highlight, StepKind, Subject};
use stepwise_core::emitter::{StepContext, StepFuture};
use stepwise_core::error::Result;
use stepwise_core::params::SortOrder;

/// Top-down merge sort.
///
/// Emits `Divide` at each split index before recursing, `Compare` on each
/// merge comparison and `Write` for every element written back, leftovers
/// included. Ties take the left element, so the sort is stable.
///
/// While merging, the range always holds a permutation of its values: the
/// merged prefix, then the pending left run, then the pending right run. A
/// compare highlights the two heads of those runs.
pub async fn merge_sort(
    ctx: &StepContext,
    mut values: Vec<i64>,
    order: SortOrder,
) -> Result<Vec<i64>> {
    let len = values.len();
    sort_range(ctx, &mut values, 0, len, order).await?;
    finish(ctx, &values).await?;
    Ok(values)
}

/// Sort the half-open range `lo..hi`.
fn sort_range<'a>(
    ctx: &'a StepContext,
    values: &'a mut Vec<i64>,
    lo: usize,
    hi: usize,
    order: SortOrder,
) -> StepFuture<'a, ()> {
    Box::pin(async move {
        if hi - lo < 2 {
            return Ok(());
        }

        let mid = lo + (hi - lo) / 2;
        ctx.checkpoint(
            Subject::Array(values.clone()),
            Highlight::index(mid),
            StepKind::Divide,
        )
        .await?;

        sort_range(ctx, &mut *values, lo, mid, order).await?;
        sort_range(ctx, &mut *values, mid, hi, order).await?;
        merge(ctx, values, lo, mid, hi, order).await
    })
}

async fn merge(
    ctx: &StepContext,
    values: &mut [i64],
    lo: usize,
    mid: usize,
    hi: usize,
    order: SortOrder,
) -> Result<()> {
    let left = values[lo..mid].to_vec();
    let right = values[mid..hi].to_vec();
    let (mut i, mut j, mut k) = (0, 0, lo);

    while i < left.len() && j < right.len() {
        compare(ctx, values, k, mid + j).await?;
        if order.is_in_order(left[i], right[j]) {
            values[k] = left[i];
            i += 1;
        } else {
            values[k] = right[j];
            j += 1;
            // Shift the pending left run past the taken element.
            values[k + 1..mid + j].copy_from_slice(&left[i..]);
        }
        written(ctx, values, k).await?;
        k += 1;
    }

    for &value in left[i..].iter().chain(&right[j..]) {
        values[k] = value;
        written(ctx, values, k).await?;
        k += 1;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use stepwise_core::testing::TestHarness;

    #[tokio::test]
    async fn divides_before_recursing() {
        let harness = TestHarness::new();
        let values = merge_sort(&harness.ctx, vec![4, 3, 2, 1], SortOrder::Ascending)
            .await
            .unwrap();
        assert_eq!(values, vec![1, 2, 3, 4]);

        let checkpoints = harness.sink.checkpoints();
        assert_eq!(checkpoints[0].kind, StepKind::Divide);
        assert_eq!(checkpoints[0].highlight, Highlight::index(2));
        assert_eq!(checkpoints[1].kind, StepKind::Divide);
        assert_eq!(checkpoints[1].highlight, Highlight::index(1));
        assert_eq!(harness.sink.count(StepKind::Divide), 3);
    }

    #[tokio::test]
    async fn every_write_is_checkpointed() {
        let harness = TestHarness::new();
        merge_sort(&harness.ctx, vec![5, 1, 4, 2, 3], SortOrder::Ascending)
            .await
            .unwrap();

        // Each level of merging writes back every element of its range:
        // [5] [1] -> 2, [4] [2,3] -> 2 + 3, [1,5] [2,3,4] -> 5.
        assert_eq!(harness.sink.count(StepKind::Write), 12);
    }

    #[tokio::test]
    async fn leftover_copies_are_written() {
        let harness = TestHarness::new();
        merge_sort(&harness.ctx, vec![1, 2], SortOrder::Ascending)
            .await
            .unwrap();
        // One comparison, then left write, then the leftover right element.
        assert_eq!(
            harness.sink.kinds(),
            vec![
                StepKind::Divide,
                StepKind::Compare,
                StepKind::Write,
                StepKind::Write,
                StepKind::Final
            ]
        );
    }

    #[tokio::test]
    async fn compares_show_the_values_being_merged() {
        let harness = TestHarness::new();
        merge_sort(&harness.ctx, vec![3, 4, 1, 2], SortOrder::Ascending)
            .await
            .unwrap();

        let checkpoints = harness.sink.checkpoints();
        let compared: Vec<(i64, i64)> = checkpoints
            .iter()
            .filter(|c| c.kind == StepKind::Compare)
            .map(|c| match (&c.subject, &c.highlight) {
                (Subject::Array(values), Highlight::Pair { first, second }) => {
                    (values[*first], values[*second])
                }
                other => panic!("unexpected compare payload {:?}", other),
            })
            .collect();
        assert_eq!(compared, vec![(3, 4), (1, 2), (3, 1), (3, 2)]);

        for checkpoint in &checkpoints {
            if let Subject::Array(values) = &checkpoint.subject {
                let mut sorted = values.clone();
                sorted.sort();
                assert_eq!(sorted, vec![1, 2, 3, 4], "seq {}", checkpoint.seq);
            }
        }
    }
}
