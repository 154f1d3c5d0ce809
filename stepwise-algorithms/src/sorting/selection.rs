use super::{compare, finish, swapped};
use stepwise_core::emitter::StepContext;
use stepwise_core::error::Result;
use stepwise_core::params::SortOrder;

/// Selection sort.
pub async fn selection_sort(
    ctx: &StepContext,
    mut values: Vec<i64>,
    order: SortOrder,
) -> Result<Vec<i64>> {
    let len = values.len();

    for i in 0..len.saturating_sub(1) {
        let mut best = i;
        for j in i + 1..len {
            compare(ctx, &values, best, j).await?;
            if order.precedes(values[j], values[best]) {
                best = j;
            }
        }
        if best != i {
            values.swap(i, best);
            swapped(ctx, &values, i, best).await?;
        }
    }

    finish(ctx, &values).await?;
    Ok(values)
}
