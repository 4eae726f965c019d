//! Extraction of outstanding degree requirements from a parsed evaluation.
//!
//! Requirements come from four sources: the remaining-required course list,
//! general-education areas, bucketed credit requirements, and in-progress
//! additional programs. Sources are independent; no cross-source dedup.

use std::sync::LazyLock;

use regex::Regex;

use crate::evaluation::ParsedEvaluation;

use super::types::{DegreeRequirement, RequirementType};

/// Leading subject prefix of a credit-requirement label, e.g. "CPSC" in
/// "CPSC Upper Division".
static LABEL_SUBJECT_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^([A-Z]+)").unwrap());

/// Extracts all remaining degree requirements from a parsed evaluation.
pub fn extract_user_requirements(evaluation: &ParsedEvaluation) -> Vec<DegreeRequirement> {
    let mut requirements = Vec::new();

    for course in &evaluation.courses.remaining_required {
        let subject = course
            .subject
            .as_deref()
            .unwrap_or("")
            .trim()
            .to_uppercase();
        let number = course.number.as_deref().unwrap_or("").trim().to_string();
        let title = course.title.as_deref().unwrap_or("").trim().to_string();
        let type_str = course
            .requirement_type
            .as_deref()
            .or(course.requirement_satisfied.as_deref())
            .unwrap_or("other")
            .to_lowercase();
        let credits = course.credits.unwrap_or(0.0);

        let requirement_type = map_requirement_type(&type_str);

        let label = if !subject.is_empty() && !number.is_empty() {
            format!("{} {}", subject, number)
        } else if !subject.is_empty() {
            if type_str.contains("elective") {
                format!("{} Elective", subject)
            } else {
                subject.clone()
            }
        } else if !title.is_empty() {
            title.clone()
        } else {
            "Required Course".to_string()
        };

        requirements.push(DegreeRequirement {
            requirement_type,
            label,
            subject: (!subject.is_empty()).then_some(subject),
            number: (!number.is_empty()).then_some(number),
            title: (!title.is_empty()).then_some(title),
            credits_needed: credits,
            area: None,
        });
    }

    for area in &evaluation.degree_requirements.general_education.areas {
        let still_needed = matches!(area.status.as_str(), "needed" | "in_progress")
            || area.earned < area.required;
        if still_needed {
            requirements.push(DegreeRequirement {
                requirement_type: RequirementType::Ge,
                label: area.name.clone(),
                subject: None,
                number: None,
                title: None,
                credits_needed: (area.required - area.earned).max(0.0),
                area: Some(area.name.clone()),
            });
        }
    }

    for row in &evaluation.credit_requirements {
        if row.needed > 0.0 && row.label.to_lowercase().contains("elective") {
            let subject = LABEL_SUBJECT_REGEX
                .captures(&row.label)
                .map(|caps| caps[1].to_string());
            requirements.push(DegreeRequirement {
                requirement_type: RequirementType::MajorElective,
                label: format!("{} Elective", row.label),
                subject,
                number: None,
                title: None,
                credits_needed: row.needed,
                area: None,
            });
        }
    }

    for program in &evaluation.additional_programs {
        if program.status != "in_progress" {
            continue;
        }
        let type_lower = program.program_type.to_lowercase();
        let requirement_type = if type_lower.contains("minor") {
            RequirementType::Minor
        } else if type_lower.contains("concentration") {
            RequirementType::Concentration
        } else {
            RequirementType::Other
        };
        requirements.push(DegreeRequirement {
            requirement_type,
            label: program.name.clone(),
            subject: None,
            number: None,
            title: None,
            credits_needed: program.credits_required - program.credits_earned,
            area: None,
        });
    }

    requirements
}

fn map_requirement_type(type_str: &str) -> RequirementType {
    if type_str.contains("core") || type_str.contains("required") {
        RequirementType::MajorCore
    } else if type_str.contains("elective") || type_str.contains("technical") {
        RequirementType::MajorElective
    } else if type_str.contains("ge") || type_str.contains("general") || type_str.contains("inquiry")
    {
        RequirementType::Ge
    } else if type_str.contains("minor") {
        RequirementType::Minor
    } else if type_str.contains("concentration") {
        RequirementType::Concentration
    } else {
        RequirementType::Other
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn evaluation_from(json: &str) -> ParsedEvaluation {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn test_remaining_courses_become_requirements() {
        let eval = evaluation_from(
            r#"{
                "courses": {
                    "remaining_required": [
                        {"subject": "cpsc", "number": "350", "requirement_type": "Major Core", "credits": 3},
                        {"subject": "CPSC", "requirement_type": "Major Elective", "credits": 3},
                        {"title": "Senior Capstone", "requirement_type": "capstone"}
                    ]
                }
            }"#,
        );
        let reqs = extract_user_requirements(&eval);
        assert_eq!(reqs.len(), 3);

        assert_eq!(reqs[0].requirement_type, RequirementType::MajorCore);
        assert_eq!(reqs[0].label, "CPSC 350");
        assert_eq!(reqs[0].subject.as_deref(), Some("CPSC"));
        assert_eq!(reqs[0].credits_needed, 3.0);

        assert_eq!(reqs[1].requirement_type, RequirementType::MajorElective);
        assert_eq!(reqs[1].label, "CPSC Elective");
        assert!(reqs[1].number.is_none());

        assert_eq!(reqs[2].requirement_type, RequirementType::Other);
        assert_eq!(reqs[2].label, "Senior Capstone");
    }

    #[test]
    fn test_ge_areas_still_needed() {
        let eval = evaluation_from(
            r#"{
                "degree_requirements": {
                    "general_education": {
                        "areas": [
                            {"name": "Written Inquiry", "status": "needed", "required": 3, "earned": 0},
                            {"name": "Scientific Inquiry", "status": "complete", "required": 3, "earned": 3},
                            {"name": "Social Inquiry", "status": "complete", "required": 6, "earned": 3}
                        ]
                    }
                }
            }"#,
        );
        let reqs = extract_user_requirements(&eval);
        assert_eq!(reqs.len(), 2);
        assert_eq!(reqs[0].label, "Written Inquiry");
        assert_eq!(reqs[0].area.as_deref(), Some("Written Inquiry"));
        assert_eq!(reqs[0].credits_needed, 3.0);
        // Partially earned area survives despite its status.
        assert_eq!(reqs[1].label, "Social Inquiry");
        assert_eq!(reqs[1].credits_needed, 3.0);
    }

    #[test]
    fn test_credit_requirements_infer_subject() {
        let eval = evaluation_from(
            r#"{
                "credit_requirements": [
                    {"label": "CPSC Upper Division Elective", "needed": 6},
                    {"label": "Total Credits", "needed": 30}
                ]
            }"#,
        );
        let reqs = extract_user_requirements(&eval);
        assert_eq!(reqs.len(), 1);
        assert_eq!(reqs[0].requirement_type, RequirementType::MajorElective);
        assert_eq!(reqs[0].label, "CPSC Upper Division Elective Elective");
        assert_eq!(reqs[0].subject.as_deref(), Some("CPSC"));
        assert_eq!(reqs[0].credits_needed, 6.0);
    }

    #[test]
    fn test_additional_programs_in_progress_only() {
        let eval = evaluation_from(
            r#"{
                "additional_programs": [
                    {"type": "Minor", "name": "Mathematics Minor", "status": "in_progress",
                     "credits_required": 18, "credits_earned": 9},
                    {"type": "Minor", "name": "History Minor", "status": "complete",
                     "credits_required": 18, "credits_earned": 18}
                ]
            }"#,
        );
        let reqs = extract_user_requirements(&eval);
        assert_eq!(reqs.len(), 1);
        assert_eq!(reqs[0].requirement_type, RequirementType::Minor);
        assert_eq!(reqs[0].label, "Mathematics Minor");
        assert_eq!(reqs[0].credits_needed, 9.0);
    }

    #[test]
    fn test_empty_evaluation_yields_no_requirements() {
        let eval = ParsedEvaluation::default();
        assert!(extract_user_requirements(&eval).is_empty());
    }
}
