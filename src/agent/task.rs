//! Subtask model and keyword-based task classification.
//!
//! Classification is a static keyword scan, no LLM involved:
//! - lists are checked in `TaskType::ALL` order
//! - first list with a case-insensitive substring hit wins
//! - no hit falls back to `processData`

use std::fmt;

use serde::{Deserialize, Serialize};

/// Kind of work a subtask represents.
///
/// The four named variants are the closed set this service classifies into.
/// `Other` only appears when a subtask arrives from outside with a tag we
/// don't recognize; it is kept verbatim so the dispatcher can report it.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum TaskType {
    FetchData,
    ProcessData,
    AnalyzeData,
    GenerateReport,
    Other(String),
}

impl TaskType {
    /// The classifiable task types, in keyword-scan order.
    pub const ALL: [TaskType; 4] = [
        TaskType::FetchData,
        TaskType::ProcessData,
        TaskType::AnalyzeData,
        TaskType::GenerateReport,
    ];

    pub fn as_str(&self) -> &str {
        match self {
            Self::FetchData => "fetchData",
            Self::ProcessData => "processData",
            Self::AnalyzeData => "analyzeData",
            Self::GenerateReport => "generateReport",
            Self::Other(tag) => tag,
        }
    }

    /// Keywords that select this task type.
    pub fn keywords(&self) -> &'static [&'static str] {
        match self {
            Self::FetchData => &["Identify", "Gather", "Retrieve", "Fetch", "Extract", "Collect"],
            Self::ProcessData => &["Sort", "Organize", "Clean", "Structure", "Filter", "Categorize"],
            Self::AnalyzeData => &["Calculate", "Analyze", "Evaluate", "Compare", "Assess"],
            Self::GenerateReport => &[
                "Prepare",
                "Compile",
                "Summarize",
                "Draft",
                "Review",
                "Finalize",
                "Submit",
                "Adjust",
                "Conclusions",
                "Recommendations",
            ],
            Self::Other(_) => &[],
        }
    }
}

impl From<String> for TaskType {
    fn from(tag: String) -> Self {
        match tag.as_str() {
            "fetchData" => Self::FetchData,
            "processData" => Self::ProcessData,
            "analyzeData" => Self::AnalyzeData,
            "generateReport" => Self::GenerateReport,
            _ => Self::Other(tag),
        }
    }
}

impl From<TaskType> for String {
    fn from(task_type: TaskType) -> Self {
        match task_type {
            TaskType::Other(tag) => tag,
            known => known.as_str().to_string(),
        }
    }
}

impl fmt::Display for TaskType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Pick a task type for a subtask description.
pub fn classify(text: &str) -> TaskType {
    let haystack = text.to_lowercase();
    TaskType::ALL
        .into_iter()
        .find(|task_type| {
            task_type
                .keywords()
                .iter()
                .any(|word| haystack.contains(&word.to_lowercase()))
        })
        .unwrap_or(TaskType::ProcessData)
}

/// One decomposed unit of work.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Subtask {
    /// Sequential id, `task-1` .. `task-N`.
    pub task_id: String,
    pub task_name: String,
    pub task_type: TaskType,
}

impl Subtask {
    /// Build the `index`-th (zero-based) subtask, classifying its name.
    pub fn classified(index: usize, name: impl Into<String>) -> Self {
        let task_name = name.into();
        Self {
            task_id: format!("task-{}", index + 1),
            task_type: classify(&task_name),
            task_name,
        }
    }
}

/// Outcome of dispatching one subtask.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "result")]
pub enum ExecutionResult {
    Success { data: serde_json::Value },
    Failed { error: String },
}

impl ExecutionResult {
    pub fn failed(error: impl Into<String>) -> Self {
        Self::Failed {
            error: error.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success { .. })
    }
}
