use super::{compare, finish, insertion_range, swapped};
use stepwise_core::emitter::{StepContext, StepFuture};
use stepwise_core::error::Result;
use stepwise_core::params::SortOrder;

/// Ranges shorter than this are finished with insertion sort.
pub const INSERTION_CUTOFF: usize = 10;

/// Quicksort with median-of-three pivot selection.
///
/// The low, middle and high elements of each range are ordered in place and
/// the median is parked at `hi - 1` as the pivot. The ordered ends then act
/// as sentinels for the partition scans.
pub async fn quick_sort(
    ctx: &StepContext,
    mut values: Vec<i64>,
    order: SortOrder,
) -> Result<Vec<i64>> {
    if values.len() > 1 {
        let hi = values.len() - 1;
        sort_range(ctx, &mut values, 0, hi, order).await?;
    }
    finish(ctx, &values).await?;
    Ok(values)
}

/// Sort the inclusive range `lo..=hi`.
fn sort_range<'a>(
    ctx: &'a StepContext,
    values: &'a mut Vec<i64>,
    lo: usize,
    hi: usize,
    order: SortOrder,
) -> StepFuture<'a, ()> {
    Box::pin(async move {
        if lo >= hi {
            return Ok(());
        }
        if hi - lo + 1 < INSERTION_CUTOFF {
            return insertion_range(ctx, values, lo, hi, order).await;
        }

        let pivot = median_of_three(ctx, values, lo, hi, order).await?;
        let pivot_at = hi - 1;

        let mut i = lo;
        let mut j = pivot_at;
        loop {
            i += 1;
            loop {
                compare(ctx, values, i, pivot_at).await?;
                if !order.precedes(values[i], pivot) {
                    break;
                }
                i += 1;
            }

            j -= 1;
            loop {
                compare(ctx, values, j, pivot_at).await?;
                if !order.precedes(pivot, values[j]) {
                    break;
                }
                j -= 1;
            }

            if i >= j {
                break;
            }
            values.swap(i, j);
            swapped(ctx, values, i, j).await?;
        }

        if i != pivot_at {
            values.swap(i, pivot_at);
            swapped(ctx, values, i, pivot_at).await?;
        }

        sort_range(ctx, &mut *values, lo, i - 1, order).await?;
        sort_range(ctx, &mut *values, i + 1, hi, order).await
    })
}

/// Order `lo`, `mid`, `hi` and move the median to `hi - 1`.
async fn median_of_three(
    ctx: &StepContext,
    values: &mut [i64],
    lo: usize,
    hi: usize,
    order: SortOrder,
) -> Result<i64> {
    let mid = lo + (hi - lo) / 2;

    for (a, b) in [(lo, mid), (lo, hi), (mid, hi)] {
        compare(ctx, values, a, b).await?;
        if order.should_swap(values[a], values[b]) {
            values.swap(a, b);
            swapped(ctx, values, a, b).await?;
        }
    }

    values.swap(mid, hi - 1);
    swapped(ctx, values, mid, hi - 1).await?;
    Ok(values[hi - 1])
}
