//! Candidate selection for schedule generation.
//!
//! Narrows the full catalog to classes worth showing the oracle: excludes
//! courses already taken and administrative placeholders, keeps classes tied
//! to the student's requirements or program, then enriches and takes the
//! top-rated few per requirement bucket.

use std::collections::{HashMap, HashSet};

use tracing::{info, warn};

use crate::catalog::ClassSection;
use crate::requirements::{enrich_classes, DegreeRequirement, ProgramCatalog};

/// Cap applied when no requirements are known and the whole catalog is the
/// candidate pool.
const NO_REQUIREMENTS_LIMIT: usize = 100;

/// Options taken per requirement bucket.
const PER_REQUIREMENT_LIMIT: usize = 5;

/// Subjects that count as technical-core electives when a requirement names
/// the placeholder subject "VARIOUS".
const TECHNICAL_CORE_ELECTIVE_SUBJECTS: [&str; 10] = [
    "CPSC", "CS", "ENGR", "EENG", "MATH", "PHYS", "DATA", "CSCE", "ECE", "EE",
];

/// Titles and numbers that mark administrative placeholder sections
/// (continuous-enrollment shells, 'B' administrative variants).
fn is_administrative_placeholder(class: &ClassSection) -> bool {
    let title_lower = class.title.to_lowercase();
    let placeholder_keywords = [
        "extended continuous enrollment",
        "continuous enrollment",
        "extended enrollment",
    ];
    if placeholder_keywords.iter().any(|k| title_lower.contains(k)) {
        return true;
    }
    class.number.ends_with('B') || class.number.ends_with('b')
}

/// Graduate-level check on the digits of a course number ("501", "698B").
fn is_graduate_level(number: &str) -> bool {
    let digits: String = number.chars().filter(|c| c.is_ascii_digit()).collect();
    digits.parse::<u32>().map_or(false, |n| n >= 500)
}

/// Subjects named by the requirements, expanding the "VARIOUS" placeholder
/// for technical/core/elective labels and dropping it otherwise.
fn required_subjects(requirements: &[DegreeRequirement]) -> HashSet<String> {
    let mut subjects = HashSet::new();
    for req in requirements {
        let Some(subject) = &req.subject else {
            continue;
        };
        let subject_upper = subject.to_uppercase();
        if subject_upper == "VARIOUS" {
            let label_lower = req.label.to_lowercase();
            if label_lower.contains("technical")
                || label_lower.contains("core")
                || label_lower.contains("elective")
            {
                subjects.extend(
                    TECHNICAL_CORE_ELECTIVE_SUBJECTS
                        .iter()
                        .map(|s| s.to_string()),
                );
            } else {
                warn!(label = %req.label, "Skipping VARIOUS subject, not a technical-core label");
            }
        } else {
            subjects.insert(subject_upper);
        }
    }
    subjects
}

/// Specific "SUBJ NUM" codes named by the requirements.
fn required_course_codes(requirements: &[DegreeRequirement]) -> HashSet<String> {
    requirements
        .iter()
        .filter_map(|req| {
            let subject = req.subject.as_deref()?;
            let number = req.number.as_deref()?;
            Some(format!("{} {}", subject.to_uppercase(), number))
        })
        .collect()
}

/// Selects candidate classes for the generation prompt.
///
/// With no requirements the first `NO_REQUIREMENTS_LIMIT` catalog classes
/// are returned un-enriched. Otherwise survivors of the exclusion and
/// relevance filters are enriched, grouped per requirement badge, and the
/// top-rated few of each bucket are merged with first-insertion-wins
/// id-dedup.
pub fn select_candidates(
    all_classes: &[ClassSection],
    requirements: &[DegreeRequirement],
    programs: &ProgramCatalog,
    taken_codes: &HashSet<String>,
    program_name: &str,
    is_graduate: bool,
) -> Vec<ClassSection> {
    if requirements.is_empty() {
        warn!("No requirements known, taking leading catalog classes as candidates");
        return all_classes
            .iter()
            .take(NO_REQUIREMENTS_LIMIT)
            .cloned()
            .collect();
    }

    let subjects = required_subjects(requirements);
    let course_codes = required_course_codes(requirements);
    let program_courses = if program_name.is_empty() {
        warn!("Program mapping filter skipped, program name is empty");
        HashSet::new()
    } else {
        programs.valid_courses_for_program(program_name, is_graduate)
    };

    let mut excluded_taken = 0usize;
    let mut excluded_admin = 0usize;
    let mut kept = Vec::new();

    for cls in all_classes {
        let course_code = cls.course_code();

        if taken_codes.contains(&course_code) {
            excluded_taken += 1;
            continue;
        }
        if is_administrative_placeholder(cls) {
            excluded_admin += 1;
            continue;
        }
        if is_graduate && !is_graduate_level(&cls.number) {
            continue;
        }

        if course_codes.contains(&course_code)
            || subjects.contains(&cls.subject)
            || program_courses.contains(&course_code)
        {
            kept.push(cls.clone());
        }
    }

    info!(
        total = all_classes.len(),
        kept = kept.len(),
        excluded_taken = excluded_taken,
        excluded_admin = excluded_admin,
        "Filtered catalog to requirement-relevant classes"
    );

    let enriched = enrich_classes(&kept, requirements);

    // Bucket per requirement badge so the prompt covers every requirement,
    // preserving first-seen bucket order.
    let mut bucket_order: Vec<String> = Vec::new();
    let mut buckets: HashMap<String, Vec<&ClassSection>> = HashMap::new();
    for cls in &enriched {
        if cls.requirements_satisfied.is_empty() {
            let key = "general".to_string();
            if !buckets.contains_key(&key) {
                bucket_order.push(key.clone());
            }
            buckets.entry(key).or_default().push(cls);
        } else {
            for badge in &cls.requirements_satisfied {
                let key = format!("{}_{}", badge.requirement_type.as_str(), badge.label);
                if !buckets.contains_key(&key) {
                    bucket_order.push(key.clone());
                }
                buckets.entry(key).or_default().push(cls);
            }
        }
    }

    let mut selected_ids: HashSet<String> = HashSet::new();
    let mut candidates: Vec<ClassSection> = Vec::new();
    for key in &bucket_order {
        let mut classes = buckets.remove(key).unwrap_or_default();
        classes.sort_by(|a, b| {
            let ra = a.professor_rating.unwrap_or(0.0);
            let rb = b.professor_rating.unwrap_or(0.0);
            rb.partial_cmp(&ra).unwrap_or(std::cmp::Ordering::Equal)
        });
        for cls in classes.into_iter().take(PER_REQUIREMENT_LIMIT) {
            if selected_ids.insert(cls.id.clone()) {
                candidates.push(cls.clone());
            }
        }
    }

    candidates
}
