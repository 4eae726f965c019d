//! Matching of class sections against outstanding degree requirements.
//!
//! At most one badge per requirement label; rules are evaluated per
//! requirement in a fixed precedence order and the first that fires wins.

use std::collections::HashSet;

use crate::catalog::ClassSection;

use super::types::{DegreeRequirement, RequirementBadge, RequirementType};

/// General-education area lookup: subject prefixes plus specific course
/// whitelists.
const GE_AREA_MAPPINGS: [(&str, &[&str], &[&str]); 7] = [
    (
        "Written Inquiry",
        &["ENG"],
        &["ENG 103", "ENG 104", "ENG 105"],
    ),
    (
        "Quantitative Inquiry",
        &["MATH"],
        &["MATH 101", "MATH 110", "MATH 111", "MATH 150"],
    ),
    ("Scientific Inquiry", &["BIOL", "CHEM", "PHYS", "ENV"], &[]),
    (
        "Social Inquiry",
        &["SOC", "PSY", "POLS", "ECON", "ANTH"],
        &[],
    ),
    ("Values and Ethical Inquiry", &["PHIL", "REL"], &[]),
    (
        "Artistic Inquiry",
        &["ART", "MUS", "DANC", "FTV", "THTR"],
        &[],
    ),
    ("Global Perspectives", &["HIST", "GS"], &[]),
];

const TITLE_STOP_WORDS: [&str; 12] = [
    "and", "or", "the", "a", "an", "in", "of", "for", "to", "i", "ii", "iii",
];

/// Strips a trailing letter suffix ("350L" -> 350) and parses the numeric
/// course level.
fn numeric_level(number: &str) -> Option<u32> {
    number
        .trim_end_matches(|c: char| c.is_ascii_uppercase())
        .parse()
        .ok()
}

fn is_ge_course(subject: &str, number: &str, area: &str) -> bool {
    let Some((_, prefixes, courses)) = GE_AREA_MAPPINGS.iter().find(|(name, _, _)| *name == area)
    else {
        return false;
    };
    let course_code = format!("{} {}", subject, number);
    courses.contains(&course_code.as_str()) || prefixes.contains(&subject)
}

/// Abbreviated badge label for display.
fn short_label(requirement_type: RequirementType, label: &str) -> String {
    let label_lower = label.to_lowercase();
    match requirement_type {
        RequirementType::MajorCore => "Core".to_string(),
        RequirementType::MajorElective => "Elective".to_string(),
        RequirementType::Ge => {
            if label_lower.contains("written") {
                "GE-WI"
            } else if label_lower.contains("quantitative") {
                "GE-QI"
            } else if label_lower.contains("scientific") {
                "GE-SI"
            } else if label_lower.contains("social") {
                "GE-SoI"
            } else if label_lower.contains("values") || label_lower.contains("ethical") {
                "GE-VEI"
            } else if label_lower.contains("artistic") {
                "GE-AI"
            } else if label_lower.contains("global") {
                "GE-GP"
            } else {
                "GE"
            }
            .to_string()
        }
        RequirementType::Minor => "Minor".to_string(),
        RequirementType::Concentration => "Conc".to_string(),
        RequirementType::Other => "Req".to_string(),
    }
}

/// Labels carrying graduate markers restrict matches to 500-level courses.
fn is_graduate_label(label: &str) -> bool {
    let lower = label.to_lowercase();
    lower.contains("graduate")
        || label.contains("500")
        || lower.contains("grad")
        || lower.contains("ms ")
        || lower.contains("m.s.")
}

/// Stop-word-filtered token overlap: at least one shared token covering at
/// least half of the requirement's token set.
fn fuzzy_title_match(req_title: &str, class_title_lower: &str) -> bool {
    let req_lower = req_title.to_lowercase();
    let req_set: HashSet<&str> = req_lower
        .split_whitespace()
        .filter(|w| !TITLE_STOP_WORDS.contains(w))
        .collect();
    let class_set: HashSet<&str> = class_title_lower
        .split_whitespace()
        .filter(|w| !TITLE_STOP_WORDS.contains(w))
        .collect();

    if req_set.is_empty() || class_set.is_empty() {
        return false;
    }
    let overlap = req_set.intersection(&class_set).count();
    overlap >= 1 && (overlap as f64) / (req_set.len() as f64) >= 0.5
}

fn requirement_matches(
    req: &DegreeRequirement,
    class: &ClassSection,
    class_title_lower: &str,
    class_level: Option<u32>,
) -> bool {
    let level = class_level.unwrap_or(0);

    // Exact course: subject plus number, accepting numeric-equivalent
    // suffix variants ("350" matches "350L").
    if let (Some(subject), Some(number)) = (&req.subject, &req.number) {
        if class.subject != *subject {
            return false;
        }
        if class.number == *number {
            return true;
        }
        return numeric_level(number).is_some_and(|req_level| req_level == level);
    }

    // Subject with a title hint: similar titles, or credits aligned with
    // the requirement.
    if let (Some(subject), Some(title)) = (&req.subject, &req.title) {
        if class.subject != *subject {
            return false;
        }
        let title_lower = title.to_lowercase();
        return title_lower.contains(class_title_lower)
            || class_title_lower.contains(&title_lower)
            || (req.credits_needed > 0.0 && class.credits == req.credits_needed);
    }

    // General-education area.
    if req.requirement_type == RequirementType::Ge {
        if let Some(area) = &req.area {
            return is_ge_course(&class.subject, &class.number, area);
        }
    }

    // Subject-level elective: upper division, or 500+ for graduate labels.
    if req.requirement_type == RequirementType::MajorElective {
        if let Some(subject) = &req.subject {
            if class.subject != *subject {
                return false;
            }
            return if is_graduate_label(&req.label) {
                level >= 500
            } else {
                level >= 300
            };
        }
    }

    // Subject-level core: any level, except graduate labels need 500+.
    if req.requirement_type == RequirementType::MajorCore {
        if let Some(subject) = &req.subject {
            return class.subject == *subject
                && (!is_graduate_label(&req.label) || level >= 500);
        }
    }

    // Subject-only fallback for the remaining types.
    if let Some(subject) = &req.subject {
        let lower = req.label.to_lowercase();
        let grad = lower.contains("graduate") || req.label.contains("500") || lower.contains("grad");
        return class.subject == *subject && (!grad || level >= 500);
    }

    // Title-only fuzzy match.
    if let Some(title) = &req.title {
        return fuzzy_title_match(title, class_title_lower);
    }

    false
}

/// Matches one class against the requirement list, returning a badge per
/// matched requirement label.
pub fn match_class_to_requirements(
    class: &ClassSection,
    requirements: &[DegreeRequirement],
) -> Vec<RequirementBadge> {
    let mut badges = Vec::new();
    let mut seen_labels: HashSet<&str> = HashSet::new();

    let class_title_lower = class.title.to_lowercase();
    let class_level = numeric_level(&class.number);

    for req in requirements {
        if seen_labels.contains(req.label.as_str()) {
            continue;
        }

        if requirement_matches(req, class, &class_title_lower, class_level) {
            seen_labels.insert(req.label.as_str());
            badges.push(RequirementBadge::new(
                req.requirement_type,
                req.label.clone(),
                short_label(req.requirement_type, &req.label),
            ));
        }
    }

    badges
}

/// Annotates classes with the requirement badges they satisfy, returning a
/// new collection. The inputs are never mutated; callers hand in owned
/// clones of cached records.
pub fn enrich_classes(
    classes: &[ClassSection],
    requirements: &[DegreeRequirement],
) -> Vec<ClassSection> {
    classes
        .iter()
        .map(|cls| {
            let mut enriched = cls.clone();
            enriched.requirements_satisfied = match_class_to_requirements(cls, requirements);
            enriched
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::OccurrenceData;

    fn make_class(subject: &str, number: &str, title: &str, credits: f64) -> ClassSection {
        ClassSection {
            id: format!("{}-{}-01", subject, number),
            code: format!("{} {}-01", subject, number),
            subject: subject.to_string(),
            number: number.to_string(),
            section: "01".to_string(),
            title: title.to_string(),
            credits,
            display_days: String::new(),
            display_time: String::new(),
            location: String::new(),
            professor: "TBA".to_string(),
            professor_rating: None,
            semester: "spring2026".to_string(),
            semesters_offered: vec![],
            occurrence_data: OccurrenceData::default(),
            requirements_satisfied: vec![],
        }
    }

    fn course_req(subject: &str, number: &str) -> DegreeRequirement {
        DegreeRequirement {
            requirement_type: RequirementType::MajorCore,
            label: format!("{} {}", subject, number),
            subject: Some(subject.to_string()),
            number: Some(number.to_string()),
            title: None,
            credits_needed: 3.0,
            area: None,
        }
    }

    #[test]
    fn test_exact_course_match() {
        let class = make_class("CPSC", "350", "Data Structures", 3.0);
        let badges = match_class_to_requirements(&class, &[course_req("CPSC", "350")]);
        assert_eq!(badges.len(), 1);
        assert_eq!(badges[0].label, "CPSC 350");
        assert_eq!(badges[0].short_label, "Core");
        assert_eq!(badges[0].color, "blue");
    }

    #[test]
    fn test_suffix_variant_matches() {
        let class = make_class("BIOL", "205L", "Biology Lab", 1.0);
        let badges = match_class_to_requirements(&class, &[course_req("BIOL", "205")]);
        assert_eq!(badges.len(), 1);
    }

    #[test]
    fn test_wrong_subject_does_not_match() {
        let class = make_class("MATH", "350", "Real Analysis", 3.0);
        let badges = match_class_to_requirements(&class, &[course_req("CPSC", "350")]);
        assert!(badges.is_empty());
    }

    #[test]
    fn test_graduate_elective_requires_500_level() {
        let req = DegreeRequirement {
            requirement_type: RequirementType::MajorElective,
            label: "Graduate Electives".to_string(),
            subject: Some("CPSC".to_string()),
            number: None,
            title: None,
            credits_needed: 9.0,
            area: None,
        };

        let grad = make_class("CPSC", "510", "Advanced Algorithms", 3.0);
        assert_eq!(match_class_to_requirements(&grad, &[req.clone()]).len(), 1);

        let undergrad = make_class("CPSC", "230", "Intro Programming", 3.0);
        assert!(match_class_to_requirements(&undergrad, &[req]).is_empty());
    }

    #[test]
    fn test_undergrad_elective_requires_300_level() {
        let req = DegreeRequirement {
            requirement_type: RequirementType::MajorElective,
            label: "CPSC Elective".to_string(),
            subject: Some("CPSC".to_string()),
            number: None,
            title: None,
            credits_needed: 3.0,
            area: None,
        };

        let upper = make_class("CPSC", "350", "Data Structures", 3.0);
        assert_eq!(match_class_to_requirements(&upper, &[req.clone()]).len(), 1);

        let lower = make_class("CPSC", "230", "Intro Programming", 3.0);
        assert!(match_class_to_requirements(&lower, &[req]).is_empty());
    }

    #[test]
    fn test_ge_area_prefix_and_whitelist() {
        let req = DegreeRequirement {
            requirement_type: RequirementType::Ge,
            label: "Written Inquiry".to_string(),
            subject: None,
            number: None,
            title: None,
            credits_needed: 3.0,
            area: Some("Written Inquiry".to_string()),
        };

        let eng = make_class("ENG", "103", "College Writing", 3.0);
        let badges = match_class_to_requirements(&eng, &[req.clone()]);
        assert_eq!(badges.len(), 1);
        assert_eq!(badges[0].short_label, "GE-WI");

        let math = make_class("MATH", "110", "Calculus I", 3.0);
        assert!(match_class_to_requirements(&math, &[req]).is_empty());
    }

    #[test]
    fn test_title_fuzzy_match_filters_stop_words() {
        let req = DegreeRequirement {
            requirement_type: RequirementType::Other,
            label: "Capstone".to_string(),
            subject: None,
            number: None,
            title: Some("Senior Capstone Project".to_string()),
            credits_needed: 3.0,
            area: None,
        };

        let close = make_class("CPSC", "490", "Senior Capstone Project in Computing", 3.0);
        assert_eq!(match_class_to_requirements(&close, &[req.clone()]).len(), 1);

        let unrelated = make_class("CPSC", "490", "Operating Systems", 3.0);
        assert!(match_class_to_requirements(&unrelated, &[req]).is_empty());
    }

    #[test]
    fn test_at_most_one_badge_per_label() {
        let reqs = vec![course_req("CPSC", "350"), course_req("CPSC", "350")];
        let class = make_class("CPSC", "350", "Data Structures", 3.0);
        assert_eq!(match_class_to_requirements(&class, &reqs).len(), 1);
    }

    #[test]
    fn test_enrich_returns_new_collection() {
        let classes = vec![make_class("CPSC", "350", "Data Structures", 3.0)];
        let enriched = enrich_classes(&classes, &[course_req("CPSC", "350")]);
        assert!(classes[0].requirements_satisfied.is_empty());
        assert_eq!(enriched[0].requirements_satisfied.len(), 1);
    }
}
