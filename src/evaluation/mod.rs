//! Program-evaluation and scheduling-preferences provider integration.

pub mod client;
pub mod error;
pub mod types;

pub use client::{EvaluationClient, EvaluationConfig};
pub use error::EvaluationError;
pub use types::{
    AdditionalProgram, CourseEntry, CoursesSection, CreditRequirementRow, GeArea,
    ParsedEvaluation, SchedulingPreferences, StudentInfo,
};
