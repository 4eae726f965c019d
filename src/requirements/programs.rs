//! Program curriculum configuration.
//!
//! Two JSON files loaded from the data directory drive program-aware
//! behavior: the M.S. EECS curriculum (`ms_eecs_requirements.json`) and the
//! course-to-program mapping (`course_to_program_mapping.json`). Missing or
//! unreadable files degrade to an empty catalog and every dependent feature
//! becomes a no-op.

use std::collections::{HashMap, HashSet};
use std::fs;
use std::path::Path;

use serde::Deserialize;
use tracing::{info, warn};

use crate::catalog::ClassSection;

use super::types::{DegreeRequirement, RequirementBadge, RequirementType};

const CURRICULUM_FILE: &str = "ms_eecs_requirements.json";
const COURSE_MAPPING_FILE: &str = "course_to_program_mapping.json";

/// Program-name fragments that identify the M.S. EECS program.
const EECS_PROGRAM_ALIASES: [&str; 5] = [
    "electrical engineering and computer science",
    "eecs",
    "m.s. in electrical",
    "ms electrical",
    "ms eecs",
];

/// Checks whether a program name refers to the M.S. EECS program.
pub fn is_eecs_program(program_name: &str) -> bool {
    if program_name.is_empty() {
        return false;
    }
    let lower = program_name.to_lowercase();
    EECS_PROGRAM_ALIASES.iter().any(|alias| lower.contains(alias))
}

#[derive(Debug, Clone, Default, Deserialize)]
struct CurriculumCourse {
    #[serde(default)]
    course_code: String,
    #[serde(default)]
    title: String,
    #[serde(default)]
    credits: f64,
}

#[derive(Debug, Clone, Default, Deserialize)]
struct CoreBlock {
    #[serde(default)]
    credits_required: Option<f64>,
    #[serde(default)]
    courses: Vec<CurriculumCourse>,
}

#[derive(Debug, Clone, Default, Deserialize)]
struct TechnicalArea {
    #[serde(default)]
    name: String,
    #[serde(default)]
    credits_per_course: Option<f64>,
    #[serde(default)]
    courses: Vec<CurriculumCourse>,
}

#[derive(Debug, Clone, Default, Deserialize)]
struct TechnicalAreas {
    #[serde(default)]
    computing_systems: Option<TechnicalArea>,
    #[serde(default)]
    data_science_intelligent_systems: Option<TechnicalArea>,
    #[serde(default)]
    electrical_systems: Option<TechnicalArea>,
}

#[derive(Debug, Clone, Default, Deserialize)]
struct TechnicalCore {
    #[serde(default)]
    areas: TechnicalAreas,
}

#[derive(Debug, Clone, Default, Deserialize)]
struct MasteryTracks {
    #[serde(default)]
    thesis: Option<CoreBlock>,
}

#[derive(Debug, Clone, Default, Deserialize)]
struct MasteryBlock {
    #[serde(default)]
    credits_required: Option<f64>,
    #[serde(default)]
    tracks: MasteryTracks,
}

#[derive(Debug, Clone, Default, Deserialize)]
struct CurriculumRequirements {
    #[serde(default)]
    ethics_core: Option<CoreBlock>,
    #[serde(default)]
    leadership_core: Option<CoreBlock>,
    #[serde(default)]
    technical_core: Option<TechnicalCore>,
    #[serde(default)]
    mastery_demonstration: Option<MasteryBlock>,
}

#[derive(Debug, Clone, Default, Deserialize)]
struct CurriculumFile {
    #[serde(default)]
    program_name: String,
    #[serde(default)]
    requirements: CurriculumRequirements,
    #[serde(default)]
    valid_course_codes: Vec<String>,
}

/// One program entry in the course-to-program mapping.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProgramMappingEntry {
    #[serde(default)]
    pub program: String,
    #[serde(default)]
    pub year: String,
    #[serde(default)]
    pub catalog_type: String,
}

/// Curriculum categories, in display/precedence order.
const EECS_CATEGORIES: [(&str, &str, RequirementType, &str); 6] = [
    ("ethics_core", "Ethics Core", RequirementType::MajorCore, "Ethics"),
    (
        "leadership_core",
        "Leadership Core",
        RequirementType::MajorCore,
        "Lead",
    ),
    (
        "computing_systems",
        "Technical Core - Computing Systems",
        RequirementType::MajorElective,
        "Tech-CS",
    ),
    (
        "data_science_intelligent_systems",
        "Technical Core - Data Science & AI",
        RequirementType::MajorElective,
        "Tech-DS",
    ),
    (
        "electrical_systems",
        "Technical Core - Electrical Systems",
        RequirementType::MajorElective,
        "Tech-EE",
    ),
    (
        "mastery",
        "Mastery Demonstration",
        RequirementType::MajorCore,
        "Thesis",
    ),
];

/// Loaded program configuration.
pub struct ProgramCatalog {
    curriculum: CurriculumFile,
    course_mapping: HashMap<String, Vec<ProgramMappingEntry>>,
    /// Curriculum course codes per category, in EECS_CATEGORIES order.
    categorized: Vec<(&'static str, Vec<String>)>,
}

impl ProgramCatalog {
    /// Loads program configuration from the data directory. Missing files
    /// yield an empty catalog.
    pub fn load_from_directory(data_dir: &Path) -> Self {
        let curriculum = load_json::<CurriculumFile>(&data_dir.join(CURRICULUM_FILE))
            .unwrap_or_default();
        let course_mapping =
            load_json::<HashMap<String, Vec<ProgramMappingEntry>>>(
                &data_dir.join(COURSE_MAPPING_FILE),
            )
            .unwrap_or_default();

        if !curriculum.program_name.is_empty() {
            info!(program = %curriculum.program_name, "Loaded program curriculum");
        }
        info!(courses = course_mapping.len(), "Loaded course-to-program mapping");

        let categorized = categorize_curriculum(&curriculum.requirements);
        Self {
            curriculum,
            course_mapping,
            categorized,
        }
    }

    /// An empty catalog; every lookup degrades to a no-op.
    pub fn empty() -> Self {
        Self {
            curriculum: CurriculumFile::default(),
            course_mapping: HashMap::new(),
            categorized: categorize_curriculum(&CurriculumRequirements::default()),
        }
    }

    /// Curriculum course codes declared valid for the EECS program.
    pub fn valid_course_codes(&self) -> HashSet<&str> {
        self.curriculum
            .valid_course_codes
            .iter()
            .map(String::as_str)
            .collect()
    }

    /// Badge for an EECS curriculum course, keyed by "SUBJ NUM" code. The
    /// first category containing the course wins.
    pub fn eecs_badge(&self, course_code: &str) -> Option<RequirementBadge> {
        for (key, codes) in &self.categorized {
            if codes.iter().any(|c| c == course_code) {
                let (_, label, req_type, short) = EECS_CATEGORIES
                    .iter()
                    .find(|(k, _, _, _)| k == key)
                    .copied()?;
                return Some(RequirementBadge::new(req_type, label, short));
            }
        }
        None
    }

    /// Appends EECS curriculum badges to already-enriched classes. No-op
    /// when `program_name` is non-empty and does not match the EECS program.
    /// Existing badge labels are never duplicated.
    pub fn apply_eecs_badges(&self, classes: &mut [ClassSection], program_name: &str) {
        if !program_name.is_empty() && !is_eecs_program(program_name) {
            return;
        }

        for cls in classes.iter_mut() {
            let Some(badge) = self.eecs_badge(&cls.course_code()) else {
                continue;
            };
            let already_present = cls
                .requirements_satisfied
                .iter()
                .any(|b| b.label == badge.label);
            if !already_present {
                cls.requirements_satisfied.push(badge);
            }
        }
    }

    /// Curriculum requirements as a standalone requirement list, one entry
    /// per declared curriculum block.
    pub fn eecs_degree_requirements(&self) -> Vec<DegreeRequirement> {
        let reqs = &self.curriculum.requirements;
        let mut out = Vec::new();

        if let Some(ethics) = &reqs.ethics_core {
            let mut req = DegreeRequirement::new(RequirementType::MajorCore, "Ethics Core");
            req.credits_needed = ethics.credits_required.unwrap_or(3.0);
            out.push(req);
        }
        if let Some(leadership) = &reqs.leadership_core {
            let mut req = DegreeRequirement::new(RequirementType::MajorCore, "Leadership Core");
            req.credits_needed = leadership.credits_required.unwrap_or(6.0);
            out.push(req);
        }
        if let Some(tech) = &reqs.technical_core {
            let areas = [
                (
                    tech.areas.computing_systems.as_ref(),
                    "Technical Core - Computing Systems",
                ),
                (
                    tech.areas.data_science_intelligent_systems.as_ref(),
                    "Technical Core - Data Science & AI",
                ),
                (
                    tech.areas.electrical_systems.as_ref(),
                    "Technical Core - Electrical Systems",
                ),
            ];
            for (area, label) in areas {
                if let Some(area) = area {
                    let mut req =
                        DegreeRequirement::new(RequirementType::MajorElective, label);
                    req.credits_needed = area.credits_per_course.unwrap_or(3.0);
                    out.push(req);
                }
            }
        }
        if let Some(mastery) = &reqs.mastery_demonstration {
            let mut req =
                DegreeRequirement::new(RequirementType::MajorCore, "Mastery Demonstration");
            req.credits_needed = mastery.credits_required.unwrap_or(6.0);
            out.push(req);
        }

        out
    }

    /// Course codes valid for a program, by loose bidirectional substring
    /// match on program name. `graduate_only` restricts entries to the
    /// graduate catalog.
    pub fn valid_courses_for_program(
        &self,
        program_name: &str,
        graduate_only: bool,
    ) -> HashSet<String> {
        if program_name.is_empty() {
            warn!("Program course lookup with empty program name");
            return HashSet::new();
        }

        let wanted = program_name.to_lowercase();
        let mut valid = HashSet::new();

        for (course_code, programs) in &self.course_mapping {
            for entry in programs {
                let entry_name = entry.program.to_lowercase();
                if wanted.contains(&entry_name) || entry_name.contains(&wanted) {
                    if graduate_only && entry.catalog_type != "graduate" {
                        continue;
                    }
                    valid.insert(course_code.clone());
                    break;
                }
            }
        }

        info!(
            program = %program_name,
            courses = valid.len(),
            "Built valid course set from program mapping"
        );
        valid
    }
}

fn categorize_curriculum(reqs: &CurriculumRequirements) -> Vec<(&'static str, Vec<String>)> {
    let codes_of = |courses: &[CurriculumCourse]| -> Vec<String> {
        courses.iter().map(|c| c.course_code.clone()).collect()
    };

    let mut categorized: Vec<(&'static str, Vec<String>)> = vec![
        (
            "ethics_core",
            reqs.ethics_core
                .as_ref()
                .map(|b| codes_of(&b.courses))
                .unwrap_or_default(),
        ),
        (
            "leadership_core",
            reqs.leadership_core
                .as_ref()
                .map(|b| codes_of(&b.courses))
                .unwrap_or_default(),
        ),
        ("computing_systems", Vec::new()),
        ("data_science_intelligent_systems", Vec::new()),
        ("electrical_systems", Vec::new()),
        (
            "mastery",
            reqs.mastery_demonstration
                .as_ref()
                .and_then(|m| m.tracks.thesis.as_ref())
                .map(|b| codes_of(&b.courses))
                .unwrap_or_default(),
        ),
    ];

    if let Some(tech) = &reqs.technical_core {
        let areas = [
            ("computing_systems", tech.areas.computing_systems.as_ref()),
            (
                "data_science_intelligent_systems",
                tech.areas.data_science_intelligent_systems.as_ref(),
            ),
            ("electrical_systems", tech.areas.electrical_systems.as_ref()),
        ];
        for (key, area) in areas {
            if let Some(area) = area {
                if let Some(slot) = categorized.iter_mut().find(|(k, _)| *k == key) {
                    slot.1 = codes_of(&area.courses);
                }
            }
        }
    }

    categorized
}

fn load_json<T: serde::de::DeserializeOwned>(path: &Path) -> Option<T> {
    if !path.exists() {
        warn!(path = %path.display(), "Program configuration file not found");
        return None;
    }
    let content = match fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) => {
            warn!(path = %path.display(), error = %e, "Failed to read program configuration");
            return None;
        }
    };
    match serde_json::from_str(&content) {
        Ok(value) => Some(value),
        Err(e) => {
            warn!(path = %path.display(), error = %e, "Failed to parse program configuration");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_catalog() -> ProgramCatalog {
        let curriculum: CurriculumFile = serde_json::from_str(
            r#"{
                "program_name": "Electrical Engineering and Computer Science, M.S.",
                "requirements": {
                    "ethics_core": {
                        "credits_required": 3,
                        "courses": [{"course_code": "ENGR 501", "title": "Ethics", "credits": 1}]
                    },
                    "leadership_core": {
                        "credits_required": 6,
                        "courses": [
                            {"course_code": "ENGR 510", "title": "Leadership", "credits": 3},
                            {"course_code": "ENGR 520", "title": "Technical Writing", "credits": 3}
                        ]
                    },
                    "technical_core": {
                        "areas": {
                            "computing_systems": {
                                "name": "Computing Systems",
                                "credits_per_course": 3,
                                "courses": [{"course_code": "CPSC 542", "title": "Software", "credits": 3}]
                            }
                        }
                    },
                    "mastery_demonstration": {
                        "credits_required": 6,
                        "tracks": {
                            "thesis": {"courses": [{"course_code": "ENGR 698", "title": "Thesis", "credits": 6}]}
                        }
                    }
                },
                "valid_course_codes": ["ENGR 501", "ENGR 510", "ENGR 520", "CPSC 542", "ENGR 698"]
            }"#,
        )
        .unwrap();

        let mapping: HashMap<String, Vec<ProgramMappingEntry>> = serde_json::from_str(
            r#"{
                "ENGR 501": [{"program": "Electrical Engineering and Computer Science, M.S.",
                              "year": "2025-2026", "catalog_type": "graduate"}],
                "CPSC 350": [{"program": "Computer Science, B.S.",
                              "year": "2025-2026", "catalog_type": "undergraduate"}]
            }"#,
        )
        .unwrap();

        let categorized = categorize_curriculum(&curriculum.requirements);
        ProgramCatalog {
            curriculum,
            course_mapping: mapping,
            categorized,
        }
    }

    #[test]
    fn test_is_eecs_program_aliases() {
        assert!(is_eecs_program(
            "Electrical Engineering and Computer Science, M.S."
        ));
        assert!(is_eecs_program("MS EECS"));
        assert!(!is_eecs_program("Computer Science, B.S."));
        assert!(!is_eecs_program(""));
    }

    #[test]
    fn test_eecs_badge_per_category() {
        let catalog = sample_catalog();

        let ethics = catalog.eecs_badge("ENGR 501").unwrap();
        assert_eq!(ethics.label, "Ethics Core");
        assert_eq!(ethics.short_label, "Ethics");
        assert_eq!(ethics.requirement_type, RequirementType::MajorCore);

        let tech = catalog.eecs_badge("CPSC 542").unwrap();
        assert_eq!(tech.label, "Technical Core - Computing Systems");
        assert_eq!(tech.short_label, "Tech-CS");
        assert_eq!(tech.requirement_type, RequirementType::MajorElective);

        let thesis = catalog.eecs_badge("ENGR 698").unwrap();
        assert_eq!(thesis.short_label, "Thesis");

        assert!(catalog.eecs_badge("CPSC 599").is_none());
    }

    #[test]
    fn test_eecs_degree_requirements_order_and_credits() {
        let catalog = sample_catalog();
        let reqs = catalog.eecs_degree_requirements();
        let labels: Vec<&str> = reqs.iter().map(|r| r.label.as_str()).collect();
        assert_eq!(
            labels,
            vec![
                "Ethics Core",
                "Leadership Core",
                "Technical Core - Computing Systems",
                "Mastery Demonstration"
            ]
        );
        assert_eq!(reqs[0].credits_needed, 3.0);
        assert_eq!(reqs[1].credits_needed, 6.0);
        assert_eq!(reqs[3].credits_needed, 6.0);
    }

    #[test]
    fn test_valid_courses_for_program_graduate_filter() {
        let catalog = sample_catalog();

        let grad = catalog.valid_courses_for_program("EECS", false);
        // Loose match requires name overlap; "EECS" is not a substring of
        // the mapping's program string, so only bidirectional containment
        // counts.
        assert!(grad.is_empty());

        let full = catalog
            .valid_courses_for_program("Electrical Engineering and Computer Science, M.S.", true);
        assert!(full.contains("ENGR 501"));
        assert!(!full.contains("CPSC 350"));

        let undergrad =
            catalog.valid_courses_for_program("Computer Science, B.S.", true);
        assert!(undergrad.is_empty());
    }

    #[test]
    fn test_empty_catalog_is_inert() {
        let catalog = ProgramCatalog::empty();
        assert!(catalog.eecs_badge("ENGR 501").is_none());
        assert!(catalog.eecs_degree_requirements().is_empty());
        assert!(catalog.valid_courses_for_program("EECS", false).is_empty());
    }
}
