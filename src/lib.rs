//! Goal orchestrator: decomposes a goal with an LLM and fans the subtasks
//! out to HTTP task handlers.

pub mod agent;
pub mod api;
pub mod config;
pub mod crm;
pub mod error;
pub mod llm;
pub mod records;
pub mod report;
