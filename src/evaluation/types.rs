//! Payload types for the program-evaluation and preferences providers.
//!
//! Every field is optional at the boundary; providers vary in how much of
//! the evaluation they populate, so absence always degrades to empty.

use serde::{Deserialize, Serialize};

/// Degree types that indicate a graduate program.
const GRADUATE_DEGREES: [&str; 7] = ["M.S.", "M.A.", "MBA", "PH.D.", "PHD", "ED.D.", "J.D."];

/// Identifying fields from the top of a program evaluation.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct StudentInfo {
    #[serde(default)]
    pub program_name: Option<String>,
    #[serde(default)]
    pub major: Option<String>,
    #[serde(default)]
    pub degree_program: Option<String>,
    #[serde(default)]
    pub degree_type: Option<String>,
    #[serde(default)]
    pub class_level: Option<String>,
    #[serde(default)]
    pub catalog_year: Option<String>,
}

/// One course row from an evaluation (completed, in progress, or remaining).
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CourseEntry {
    #[serde(default)]
    pub subject: Option<String>,
    #[serde(default)]
    pub number: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub credits: Option<f64>,
    #[serde(default)]
    pub requirement_type: Option<String>,
    #[serde(default)]
    pub requirement_satisfied: Option<String>,
}

impl CourseEntry {
    /// The "SUBJ NUM" code when both parts are present.
    pub fn course_code(&self) -> Option<String> {
        let subject = self.subject.as_deref()?.trim();
        let number = self.number.as_deref()?.trim();
        if subject.is_empty() || number.is_empty() {
            return None;
        }
        Some(format!("{} {}", subject.to_uppercase(), number))
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct CoursesSection {
    #[serde(default)]
    pub remaining_required: Vec<CourseEntry>,
    #[serde(default)]
    pub completed: Vec<CourseEntry>,
    #[serde(default)]
    pub in_progress: Vec<CourseEntry>,
}

/// One general-education area row.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct GeArea {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub required: f64,
    #[serde(default)]
    pub earned: f64,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct GeneralEducation {
    #[serde(default)]
    pub areas: Vec<GeArea>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct DegreeRequirementsSection {
    #[serde(default)]
    pub general_education: GeneralEducation,
}

/// A bucketed credit-count requirement (e.g. "CPSC Elective" needing 6).
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CreditRequirementRow {
    #[serde(default)]
    pub label: String,
    #[serde(default)]
    pub needed: f64,
}

/// A secondary program (minor, concentration) tracked alongside the major.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AdditionalProgram {
    #[serde(rename = "type", default)]
    pub program_type: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub credits_required: f64,
    #[serde(default)]
    pub credits_earned: f64,
}

/// A parsed program evaluation as delivered by the evaluation provider.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ParsedEvaluation {
    #[serde(default)]
    pub student_info: StudentInfo,
    #[serde(default)]
    pub courses: CoursesSection,
    #[serde(default)]
    pub degree_requirements: DegreeRequirementsSection,
    #[serde(default)]
    pub credit_requirements: Vec<CreditRequirementRow>,
    #[serde(default)]
    pub additional_programs: Vec<AdditionalProgram>,
}

impl ParsedEvaluation {
    /// Best-effort program name: program_name, then major, then
    /// degree_program.
    pub fn program_name(&self) -> &str {
        self.student_info
            .program_name
            .as_deref()
            .or(self.student_info.major.as_deref())
            .or(self.student_info.degree_program.as_deref())
            .unwrap_or("")
    }

    /// Whether the student is in a graduate program, by class level or
    /// degree type.
    pub fn is_graduate(&self) -> bool {
        let class_level = self
            .student_info
            .class_level
            .as_deref()
            .unwrap_or("")
            .to_lowercase();
        if class_level.contains("graduate") {
            return true;
        }
        let degree_type = self
            .student_info
            .degree_type
            .as_deref()
            .unwrap_or("")
            .to_uppercase();
        GRADUATE_DEGREES.contains(&degree_type.as_str())
    }

    /// Course codes the student has already completed or is taking.
    pub fn taken_course_codes(&self) -> std::collections::HashSet<String> {
        self.courses
            .completed
            .iter()
            .chain(self.courses.in_progress.iter())
            .filter_map(CourseEntry::course_code)
            .collect()
    }
}

/// User scheduling preferences, merged field-by-field over defaults when the
/// provider row is partial or absent.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SchedulingPreferences {
    #[serde(default = "default_credits_min")]
    pub preferred_credits_min: f64,
    #[serde(default = "default_credits_max")]
    pub preferred_credits_max: f64,
    #[serde(default = "default_time_of_day")]
    pub preferred_time_of_day: String,
    #[serde(default)]
    pub days_to_avoid: Vec<String>,
    #[serde(default = "default_priority_focus")]
    pub priority_focus: String,
    #[serde(default = "default_work_status")]
    pub work_status: String,
    #[serde(default = "default_planning_mode")]
    pub planning_mode: String,
}

fn default_credits_min() -> f64 {
    12.0
}
fn default_credits_max() -> f64 {
    15.0
}
fn default_time_of_day() -> String {
    "flexible".to_string()
}
fn default_priority_focus() -> String {
    "balanced".to_string()
}
fn default_work_status() -> String {
    "none".to_string()
}
fn default_planning_mode() -> String {
    "upcoming_semester".to_string()
}

impl Default for SchedulingPreferences {
    fn default() -> Self {
        Self {
            preferred_credits_min: default_credits_min(),
            preferred_credits_max: default_credits_max(),
            preferred_time_of_day: default_time_of_day(),
            days_to_avoid: Vec::new(),
            priority_focus: default_priority_focus(),
            work_status: default_work_status(),
            planning_mode: default_planning_mode(),
        }
    }
}
