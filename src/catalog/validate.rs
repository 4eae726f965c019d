//! Schedule validation: pairwise time conflicts and credit-load warnings.

use serde::Serialize;

use super::types::{minutes_to_time, ClassSection};

/// A single time conflict between two scheduled classes.
#[derive(Debug, Clone, Serialize)]
pub struct ConflictInfo {
    #[serde(rename = "classId1")]
    pub class_id_1: String,
    #[serde(rename = "classId2")]
    pub class_id_2: String,
    pub day: String,
    #[serde(rename = "timeRange")]
    pub time_range: String,
    pub message: String,
}

/// Result of validating a chosen set of classes.
#[derive(Debug, Clone, Serialize)]
pub struct ScheduleValidation {
    pub valid: bool,
    pub conflicts: Vec<ConflictInfo>,
    #[serde(rename = "totalCredits")]
    pub total_credits: f64,
    pub warnings: Vec<String>,
}

/// Validates a set of resolved classes for pairwise conflicts and credit
/// bounds. Credit warnings are advisory only; `valid` depends solely on
/// conflicts.
pub fn validate_schedule(classes: &[ClassSection]) -> ScheduleValidation {
    let mut conflicts = Vec::new();
    let total_credits: f64 = classes.iter().map(|c| c.credits).sum();

    for (i, first) in classes.iter().enumerate() {
        for second in &classes[i + 1..] {
            if let Some((day, slot1, slot2)) = first.first_conflict_with(second) {
                let range_start = slot1.start_time.max(slot2.start_time);
                let range_end = slot1.end_time.min(slot2.end_time);
                conflicts.push(ConflictInfo {
                    class_id_1: first.id.clone(),
                    class_id_2: second.id.clone(),
                    day: day.to_string(),
                    time_range: format!(
                        "{} - {}",
                        minutes_to_time(range_start),
                        minutes_to_time(range_end)
                    ),
                    message: format!(
                        "{} conflicts with {} on {}",
                        first.code, second.code, day
                    ),
                });
            }
        }
    }

    let mut warnings = Vec::new();
    if total_credits > 18.0 {
        warnings.push(format!(
            "Schedule has {} credits, which exceeds the typical maximum of 18.",
            total_credits
        ));
    } else if total_credits < 12.0 {
        warnings.push(format!(
            "Schedule has {} credits, which may be below full-time status (12 credits).",
            total_credits
        ));
    }

    ScheduleValidation {
        valid: conflicts.is_empty(),
        conflicts,
        total_credits,
        warnings,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::types::{DaysOccurring, OccurrenceData, TimeSlot};

    fn class_on_monday(id: &str, credits: f64, start: u32, end: u32) -> ClassSection {
        ClassSection {
            id: id.to_string(),
            code: id.replace('-', " "),
            subject: "CPSC".to_string(),
            number: "350".to_string(),
            section: "01".to_string(),
            title: "Data Structures".to_string(),
            credits,
            display_days: "M".to_string(),
            display_time: String::new(),
            location: String::new(),
            professor: "TBA".to_string(),
            professor_rating: None,
            semester: "spring2026".to_string(),
            semesters_offered: vec![],
            occurrence_data: OccurrenceData {
                starts: 0,
                ends: 0,
                days_occurring: DaysOccurring {
                    m: vec![TimeSlot::new(start, end)],
                    ..Default::default()
                },
            },
            requirements_satisfied: vec![],
        }
    }

    #[test]
    fn test_empty_schedule_is_valid() {
        let result = validate_schedule(&[]);
        assert!(result.valid);
        assert_eq!(result.total_credits, 0.0);
        assert!(result.conflicts.is_empty());
    }

    #[test]
    fn test_overlapping_monday_classes_report_one_conflict() {
        // 9:00-10:30 and 10:00-11:30 on Monday.
        let a = class_on_monday("CPSC-350-01", 3.0, 540, 630);
        let b = class_on_monday("MATH-110-01", 3.0, 600, 690);

        let result = validate_schedule(&[a, b]);
        assert!(!result.valid);
        assert_eq!(result.conflicts.len(), 1);

        let conflict = &result.conflicts[0];
        assert_eq!(conflict.day, "M");
        assert_eq!(conflict.time_range, "10:00 AM - 10:30 AM");
        assert!(conflict.message.contains("CPSC 350 01"));
        assert!(conflict.message.contains("on M"));
    }

    #[test]
    fn test_adjacent_classes_do_not_conflict() {
        let a = class_on_monday("CPSC-350-01", 3.0, 540, 600);
        let b = class_on_monday("MATH-110-01", 3.0, 600, 660);

        let result = validate_schedule(&[a, b]);
        assert!(result.valid);
        assert!(result.conflicts.is_empty());
    }

    #[test]
    fn test_overload_warning() {
        let classes: Vec<_> = (0..5)
            .map(|i| class_on_monday(&format!("CPSC-{}0-01", i + 10), 4.0, 0, 0))
            .collect();
        let result = validate_schedule(&classes);
        assert!(result.valid);
        assert_eq!(result.total_credits, 20.0);
        assert_eq!(result.warnings.len(), 1);
        assert!(result.warnings[0].contains("exceeds the typical maximum"));
    }

    #[test]
    fn test_underload_warning_is_advisory() {
        let a = class_on_monday("CPSC-350-01", 3.0, 540, 630);
        let result = validate_schedule(&[a]);
        assert!(result.valid);
        assert_eq!(result.warnings.len(), 1);
        assert!(result.warnings[0].contains("below full-time status"));
    }
}
