use crate::input::check_at_most;
use crate::registry::{Algorithm, AlgorithmCategory, AlgorithmInfo};
use stepwise_core::checkpoint::{Activity, Highlight, StepKind, Subject};
use stepwise_core::emitter::{StepContext, StepFuture};
use stepwise_core::error::{Result, StepwiseError};
use stepwise_core::outcome::RunOutcome;
use stepwise_core::params::{MAX_ARRAY_LEN, RunInput};

/// Classic activity selection.
///
/// Activities are sorted by finish time once (stable, so ties keep input
/// order). Each activity starting no earlier than the last accepted finish
/// is accepted and checkpointed with its index in the sorted order.
pub async fn select_activities(
    ctx: &StepContext,
    mut activities: Vec<Activity>,
) -> Result<Vec<Activity>> {
    activities.sort_by_key(|a| a.finish);

    let mut selected: Vec<Activity> = Vec::new();
    let mut last_finish: Option<i64> = None;

    for (index, activity) in activities.into_iter().enumerate() {
        if last_finish.is_some_and(|finish| activity.start < finish) {
            continue;
        }
        last_finish = Some(activity.finish);
        selected.push(activity);
        ctx.checkpoint(
            Subject::Activities(selected.clone()),
            Highlight::index(index),
            StepKind::Accept,
        )
        .await?;
    }

    Ok(selected)
}

/// Registered activity selection.
#[derive(Debug, Clone, Copy)]
pub struct ActivitySelection;

impl ActivitySelection {
    fn activities<'i>(&self, input: &'i RunInput) -> Result<&'i [Activity]> {
        match input {
            RunInput::Activities { activities } => {
                if activities.is_empty() {
                    return Err(StepwiseError::invalid("activities", "must not be empty"));
                }
                check_at_most("activities", activities.len(), MAX_ARRAY_LEN)?;
                if let Some(bad) = activities.iter().find(|a| a.finish < a.start) {
                    return Err(StepwiseError::invalid(
                        "activities",
                        format!(
                            "'{}' finishes at {} before it starts at {}",
                            bad.name, bad.finish, bad.start
                        ),
                    ));
                }
                Ok(activities)
            }
            other => Err(self.info().mismatch(other)),
        }
    }
}

impl Algorithm for ActivitySelection {
    fn info(&self) -> AlgorithmInfo {
        AlgorithmInfo::new("activity_selection", AlgorithmCategory::Greedy)
            .with_display_name("Activity Selection")
            .with_description("Earliest-finish-first selection of compatible activities")
            .with_input("activities")
    }

    fn validate(&self, input: &RunInput) -> Result<()> {
        self.activities(input).map(|_| ())
    }

    fn run<'a>(&'a self, ctx: &'a StepContext, input: RunInput) -> StepFuture<'a, RunOutcome> {
        Box::pin(async move {
            let activities = self.activities(&input)?.to_vec();
            let selected = select_activities(ctx, activities).await?;
            Ok(RunOutcome::Activities { selected })
        })
    }
}
