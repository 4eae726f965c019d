//! Degree requirement extraction, matching, and program configuration.

pub mod extract;
pub mod matcher;
pub mod programs;
pub mod types;

pub use extract::extract_user_requirements;
pub use matcher::{enrich_classes, match_class_to_requirements};
pub use programs::{is_eecs_program, ProgramCatalog};
pub use types::{DegreeRequirement, RequirementBadge, RequirementType};
