//! Degree requirement types and their wire shapes.

use serde::{Deserialize, Serialize};

/// The category of a degree requirement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RequirementType {
    MajorCore,
    MajorElective,
    Ge,
    Minor,
    Concentration,
    Other,
}

impl RequirementType {
    pub fn as_str(&self) -> &'static str {
        match self {
            RequirementType::MajorCore => "major_core",
            RequirementType::MajorElective => "major_elective",
            RequirementType::Ge => "ge",
            RequirementType::Minor => "minor",
            RequirementType::Concentration => "concentration",
            RequirementType::Other => "other",
        }
    }

    /// Badge color for the client, keyed by requirement category.
    pub fn color(&self) -> &'static str {
        match self {
            RequirementType::MajorCore => "blue",
            RequirementType::MajorElective => "indigo",
            RequirementType::Ge => "green",
            RequirementType::Minor => "purple",
            RequirementType::Concentration => "orange",
            RequirementType::Other => "gray",
        }
    }
}

/// A single outstanding degree requirement extracted from a parsed
/// evaluation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DegreeRequirement {
    #[serde(rename = "type")]
    pub requirement_type: RequirementType,
    pub label: String,
    #[serde(default)]
    pub subject: Option<String>,
    #[serde(default)]
    pub number: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(rename = "creditsNeeded", default)]
    pub credits_needed: f64,
    /// General-education area name, when the requirement came from a GE row.
    #[serde(default)]
    pub area: Option<String>,
}

impl DegreeRequirement {
    pub fn new(requirement_type: RequirementType, label: impl Into<String>) -> Self {
        Self {
            requirement_type,
            label: label.into(),
            subject: None,
            number: None,
            title: None,
            credits_needed: 0.0,
            area: None,
        }
    }
}

/// A badge attached to a class indicating which requirement it satisfies.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RequirementBadge {
    #[serde(rename = "type")]
    pub requirement_type: RequirementType,
    pub label: String,
    #[serde(rename = "shortLabel")]
    pub short_label: String,
    pub color: String,
}

impl RequirementBadge {
    pub fn new(
        requirement_type: RequirementType,
        label: impl Into<String>,
        short_label: impl Into<String>,
    ) -> Self {
        Self {
            requirement_type,
            label: label.into(),
            short_label: short_label.into(),
            color: requirement_type.color().to_string(),
        }
    }
}
