//! Multi-criteria search over the class catalog.

use super::types::{ClassSection, DAY_CODES};

/// Default page size when the caller does not specify one.
pub const DEFAULT_LIMIT: usize = 50;
/// Hard cap on page size.
pub const MAX_LIMIT: usize = 200;

/// Search criteria. All filters are optional and combine with AND; `days` is
/// a union (any listed day matches).
#[derive(Debug, Clone, Default)]
pub struct SearchFilters {
    /// Case-insensitive substring over "code title professor".
    pub query: Option<String>,
    pub days: Option<Vec<String>>,
    /// Minimum slot start, minutes from midnight.
    pub time_start: Option<u32>,
    /// Maximum slot end, minutes from midnight.
    pub time_end: Option<u32>,
    pub credits_min: Option<f64>,
    pub credits_max: Option<f64>,
    /// Exact subject match, case-insensitive.
    pub subject: Option<String>,
    pub limit: Option<usize>,
    pub offset: Option<usize>,
}

/// Filters the catalog and returns one page plus the pre-pagination total.
///
/// Filtering runs over the full catalog before `total` is computed; the
/// catalog's natural order is preserved.
pub fn search(classes: &[ClassSection], filters: &SearchFilters) -> (Vec<ClassSection>, usize) {
    let query_lower = filters
        .query
        .as_deref()
        .map(|q| q.trim().to_lowercase())
        .filter(|q| !q.is_empty());
    let subject_upper = filters.subject.as_deref().map(str::to_uppercase);
    let days = filters.days.as_deref().filter(|d| !d.is_empty());

    let matches: Vec<&ClassSection> = classes
        .iter()
        .filter(|cls| {
            if let Some(q) = &query_lower {
                let searchable =
                    format!("{} {} {}", cls.code, cls.title, cls.professor).to_lowercase();
                if !searchable.contains(q) {
                    return false;
                }
            }

            if let Some(subject) = &subject_upper {
                if cls.subject != *subject {
                    return false;
                }
            }

            if let Some(min) = filters.credits_min {
                if cls.credits < min {
                    return false;
                }
            }
            if let Some(max) = filters.credits_max {
                if cls.credits > max {
                    return false;
                }
            }

            if let Some(wanted) = days {
                let active = cls.occurrence_data.days_occurring.active_days();
                if !wanted.iter().any(|d| active.contains(&d.as_str())) {
                    return false;
                }
            }

            if filters.time_start.is_some() || filters.time_end.is_some() {
                if !matches_time_window(cls, filters.time_start, filters.time_end) {
                    return false;
                }
            }

            true
        })
        .collect();

    let total = matches.len();
    let limit = filters.limit.unwrap_or(DEFAULT_LIMIT).min(MAX_LIMIT);
    let offset = filters.offset.unwrap_or(0);

    let page = matches
        .into_iter()
        .skip(offset)
        .take(limit)
        .cloned()
        .collect();

    (page, total)
}

/// A class satisfies a time window if at least one slot starts at or after
/// `time_start` and ends at or before `time_end`; each bound applies
/// independently.
fn matches_time_window(
    cls: &ClassSection,
    time_start: Option<u32>,
    time_end: Option<u32>,
) -> bool {
    let days = &cls.occurrence_data.days_occurring;
    for day in DAY_CODES {
        for slot in days.slots_for(day) {
            let start_ok = time_start.map_or(true, |t| slot.start_time >= t);
            let end_ok = time_end.map_or(true, |t| slot.end_time <= t);
            if start_ok && end_ok {
                return true;
            }
        }
    }
    false
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::types::{DaysOccurring, OccurrenceData, TimeSlot};

    fn make_class(id: &str, subject: &str, credits: f64, slots_m: Vec<TimeSlot>) -> ClassSection {
        ClassSection {
            id: id.to_string(),
            code: id.replace('-', " "),
            subject: subject.to_string(),
            number: "100".to_string(),
            section: "01".to_string(),
            title: format!("{} course", subject),
            credits,
            display_days: "M".to_string(),
            display_time: String::new(),
            location: String::new(),
            professor: "Smith".to_string(),
            professor_rating: None,
            semester: "spring2026".to_string(),
            semesters_offered: vec![],
            occurrence_data: OccurrenceData {
                starts: 0,
                ends: 0,
                days_occurring: DaysOccurring {
                    m: slots_m,
                    ..Default::default()
                },
            },
            requirements_satisfied: vec![],
        }
    }

    fn sample_catalog(n: usize) -> Vec<ClassSection> {
        (0..n)
            .map(|i| {
                make_class(
                    &format!("CPSC-{}-01", 100 + i),
                    "CPSC",
                    3.0,
                    vec![TimeSlot::new(540, 590)],
                )
            })
            .collect()
    }

    #[test]
    fn test_subject_filter_exact() {
        let mut catalog = sample_catalog(3);
        catalog.push(make_class("MATH-110-01", "MATH", 3.0, vec![]));

        let (page, total) = search(
            &catalog,
            &SearchFilters {
                subject: Some("cpsc".to_string()),
                limit: Some(100),
                ..Default::default()
            },
        );
        assert_eq!(total, 3);
        assert!(page.iter().all(|c| c.subject == "CPSC"));
    }

    #[test]
    fn test_pagination_disjoint_pages_same_total() {
        let catalog = sample_catalog(25);

        let (page1, total1) = search(
            &catalog,
            &SearchFilters {
                limit: Some(10),
                offset: Some(0),
                ..Default::default()
            },
        );
        let (page2, total2) = search(
            &catalog,
            &SearchFilters {
                limit: Some(10),
                offset: Some(10),
                ..Default::default()
            },
        );

        assert_eq!(total1, 25);
        assert_eq!(total1, total2);
        let ids1: Vec<_> = page1.iter().map(|c| &c.id).collect();
        assert!(page2.iter().all(|c| !ids1.contains(&&c.id)));
    }

    #[test]
    fn test_limit_is_capped() {
        let catalog = sample_catalog(250);
        let (page, total) = search(
            &catalog,
            &SearchFilters {
                limit: Some(1000),
                ..Default::default()
            },
        );
        assert_eq!(total, 250);
        assert_eq!(page.len(), MAX_LIMIT);
    }

    #[test]
    fn test_text_query_matches_professor() {
        let catalog = sample_catalog(2);
        let (page, total) = search(
            &catalog,
            &SearchFilters {
                query: Some("smith".to_string()),
                ..Default::default()
            },
        );
        assert_eq!(total, 2);
        assert_eq!(page.len(), 2);

        let (_, total) = search(
            &catalog,
            &SearchFilters {
                query: Some("nobody".to_string()),
                ..Default::default()
            },
        );
        assert_eq!(total, 0);
    }

    #[test]
    fn test_days_filter_is_a_union() {
        let mut catalog = vec![make_class(
            "CPSC-100-01",
            "CPSC",
            3.0,
            vec![TimeSlot::new(540, 590)],
        )];
        catalog.push(make_class("CPSC-101-01", "CPSC", 3.0, vec![]));

        let (page, _) = search(
            &catalog,
            &SearchFilters {
                days: Some(vec!["M".to_string(), "F".to_string()]),
                ..Default::default()
            },
        );
        assert_eq!(page.len(), 1);
        assert_eq!(page[0].id, "CPSC-100-01");
    }

    #[test]
    fn test_time_window_bounds_apply_independently() {
        let catalog = vec![make_class(
            "CPSC-100-01",
            "CPSC",
            3.0,
            vec![TimeSlot::new(540, 590)],
        )];

        // Start bound only.
        let (page, _) = search(
            &catalog,
            &SearchFilters {
                time_start: Some(540),
                ..Default::default()
            },
        );
        assert_eq!(page.len(), 1);

        // Start bound excludes an earlier slot.
        let (page, _) = search(
            &catalog,
            &SearchFilters {
                time_start: Some(600),
                ..Default::default()
            },
        );
        assert!(page.is_empty());

        // End bound excludes a later-running slot.
        let (page, _) = search(
            &catalog,
            &SearchFilters {
                time_end: Some(560),
                ..Default::default()
            },
        );
        assert!(page.is_empty());
    }

    #[test]
    fn test_credit_bounds_inclusive() {
        let catalog = sample_catalog(1);
        let (page, _) = search(
            &catalog,
            &SearchFilters {
                credits_min: Some(3.0),
                credits_max: Some(3.0),
                ..Default::default()
            },
        );
        assert_eq!(page.len(), 1);
    }
}
