use super::{finish, insertion_range};
use stepwise_core::emitter::StepContext;
use stepwise_core::error::Result;
use stepwise_core::params::SortOrder;

/// Insertion sort.
pub async fn insertion_sort(
    ctx: &StepContext,
    mut values: Vec<i64>,
    order: SortOrder,
) -> Result<Vec<i64>> {
    if values.len() > 1 {
        let hi = values.len() - 1;
        insertion_range(ctx, &mut values, 0, hi, order).await?;
    }

    finish(ctx, &values).await?;
    Ok(values)
}
