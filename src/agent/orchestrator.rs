//! Goal execution: decompose, then dispatch.

use serde::{Deserialize, Serialize};
use tracing::{Instrument, info, info_span};
use uuid::Uuid;

use super::decomposer::GoalDecomposer;
use super::dispatcher::Dispatcher;
use super::task::ExecutionResult;
use crate::error::DecomposeError;

/// Reply for a completed goal run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GoalReport {
    pub message: String,
    /// One entry per subtask, in decomposition order.
    pub results: Vec<ExecutionResult>,
}

/// Runs a goal end to end.
pub struct Orchestrator {
    decomposer: GoalDecomposer,
    dispatcher: Dispatcher,
}

impl Orchestrator {
    pub fn new(decomposer: GoalDecomposer, dispatcher: Dispatcher) -> Self {
        Self {
            decomposer,
            dispatcher,
        }
    }

    /// Decompose `goal` and dispatch every subtask.
    ///
    /// Only decomposition can fail; per-subtask failures are reported inside
    /// the returned results.
    pub async fn execute_goal(&self, goal: &str) -> Result<GoalReport, DecomposeError> {
        let run_id = Uuid::new_v4();
        let span = info_span!("goal_run", %run_id);

        async {
            info!(goal = %goal, "Received goal");
            let subtasks = self.decomposer.decompose(goal).await?;
            let results = self.dispatcher.execute(&subtasks).await;
            Ok::<_, DecomposeError>(GoalReport {
                message: "Goal execution completed".to_string(),
                results,
            })
        }
        .instrument(span)
        .await
    }
}
