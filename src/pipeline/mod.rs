pub mod assemble;
pub mod chart;
pub mod orchestrator;
pub mod sections;
pub mod summarize;

pub use orchestrator::{ReportRequest, generate_report};
