//! Catalog ingestion and memoization.
//!
//! Loads raw per-section CSV rows into canonical `ClassSection` records. The
//! loaded catalog is memoized behind an `RwLock`; readers clone the `Arc`
//! snapshot and never see partial state. `invalidate` forces a reload on the
//! next access.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, LazyLock, RwLock};

use regex::Regex;
use serde::Deserialize;
use tracing::{info, warn};

use super::types::{ClassSection, OccurrenceData};

/// Primary pattern for compound class codes like "CPSC 350-03" or
/// "BIOL 205L-01".
static CLASS_CODE_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^([A-Z]+)\s*(\d+[A-Z]?)[-_](\d+)").unwrap());

/// Raw CSV row as stored by the catalog export. Every field is optional at
/// the ingestion boundary; validation happens during conversion.
#[derive(Debug, Deserialize)]
struct RawClassRow {
    #[serde(default)]
    class: String,
    #[serde(default)]
    title: String,
    #[serde(default)]
    credits: String,
    #[serde(rename = "displayDays", default)]
    display_days: String,
    #[serde(rename = "displayTime", default)]
    display_time: String,
    #[serde(default)]
    location: String,
    #[serde(default)]
    professor: String,
    #[serde(rename = "professorRating", default)]
    professor_rating: String,
    #[serde(default)]
    semester: String,
    #[serde(rename = "semestersOffered", default)]
    semesters_offered: String,
    #[serde(rename = "occurrenceData", default)]
    occurrence_data: String,
}

/// Aggregate catalog statistics.
#[derive(Debug, Clone)]
pub struct CatalogStats {
    pub total_classes: usize,
    pub subject_count: usize,
    pub avg_credits: f64,
}

/// Memoized catalog of class sections, loaded from a CSV export.
pub struct CatalogCache {
    csv_path: PathBuf,
    snapshot: RwLock<Option<Arc<Vec<ClassSection>>>>,
}

impl CatalogCache {
    pub fn new(csv_path: impl Into<PathBuf>) -> Self {
        Self {
            csv_path: csv_path.into(),
            snapshot: RwLock::new(None),
        }
    }

    /// Returns the full catalog, loading it on first access.
    ///
    /// A missing or unreadable CSV yields an empty catalog, never an error.
    pub fn load_all(&self) -> Arc<Vec<ClassSection>> {
        if let Some(existing) = self.snapshot.read().unwrap().as_ref() {
            return Arc::clone(existing);
        }

        let mut guard = self.snapshot.write().unwrap();
        // Another thread may have loaded while we waited for the write lock.
        if let Some(existing) = guard.as_ref() {
            return Arc::clone(existing);
        }

        let loaded = Arc::new(load_classes_from_csv(&self.csv_path));
        *guard = Some(Arc::clone(&loaded));
        loaded
    }

    /// Drops the memoized snapshot, forcing a reload on the next access.
    pub fn invalidate(&self) {
        info!("Invalidating catalog cache");
        *self.snapshot.write().unwrap() = None;
    }

    /// Looks up a single class by id.
    pub fn get_by_id(&self, class_id: &str) -> Option<ClassSection> {
        self.load_all().iter().find(|c| c.id == class_id).cloned()
    }

    /// Looks up multiple classes by id, in catalog order. Unknown ids are
    /// silently dropped.
    pub fn get_by_ids(&self, class_ids: &[String]) -> Vec<ClassSection> {
        let wanted: std::collections::HashSet<&str> =
            class_ids.iter().map(String::as_str).collect();
        self.load_all()
            .iter()
            .filter(|c| wanted.contains(c.id.as_str()))
            .cloned()
            .collect()
    }

    /// Sorted list of distinct non-empty subjects.
    pub fn subjects(&self) -> Vec<String> {
        let classes = self.load_all();
        let mut subjects: Vec<String> = classes
            .iter()
            .map(|c| c.subject.clone())
            .filter(|s| !s.is_empty())
            .collect();
        subjects.sort();
        subjects.dedup();
        subjects
    }

    pub fn stats(&self) -> CatalogStats {
        let classes = self.load_all();
        let total = classes.len();
        let avg = if total == 0 {
            0.0
        } else {
            let sum: f64 = classes.iter().map(|c| c.credits).sum();
            (sum / total as f64 * 100.0).round() / 100.0
        };
        CatalogStats {
            total_classes: total,
            subject_count: self.subjects().len(),
            avg_credits: avg,
        }
    }
}

fn load_classes_from_csv(path: &Path) -> Vec<ClassSection> {
    if !path.exists() {
        warn!(path = %path.display(), "Classes CSV not found, catalog is empty");
        return Vec::new();
    }

    let mut reader = match csv::Reader::from_path(path) {
        Ok(reader) => reader,
        Err(e) => {
            warn!(path = %path.display(), error = %e, "Failed to open classes CSV");
            return Vec::new();
        }
    };

    // Keyed by id to deduplicate repeated ingestion; first occurrence wins.
    let mut classes: HashMap<String, ClassSection> = HashMap::new();
    let mut order: Vec<String> = Vec::new();
    let mut skipped = 0usize;

    for result in reader.deserialize::<RawClassRow>() {
        let row = match result {
            Ok(row) => row,
            Err(e) => {
                warn!(error = %e, "Skipping unreadable catalog row");
                skipped += 1;
                continue;
            }
        };

        let Some(section) = row_to_class_section(&row) else {
            skipped += 1;
            continue;
        };

        if !classes.contains_key(&section.id) {
            order.push(section.id.clone());
            classes.insert(section.id.clone(), section);
        }
    }

    info!(
        path = %path.display(),
        loaded = order.len(),
        skipped = skipped,
        "Loaded class catalog"
    );

    order
        .into_iter()
        .filter_map(|id| classes.remove(&id))
        .collect()
}

fn row_to_class_section(row: &RawClassRow) -> Option<ClassSection> {
    let class_code = row.class.trim();
    if class_code.is_empty() {
        return None;
    }

    let (subject, number, section) = parse_class_code(class_code);
    let class_id = class_code.replace(' ', "-").replace('/', "-");

    Some(ClassSection {
        id: class_id,
        code: class_code.to_string(),
        subject,
        number,
        section,
        title: row.title.clone(),
        credits: parse_credits(&row.credits),
        display_days: row.display_days.clone(),
        display_time: row.display_time.clone(),
        location: row.location.clone(),
        professor: if row.professor.is_empty() {
            "TBA".to_string()
        } else {
            row.professor.clone()
        },
        professor_rating: parse_professor_rating(&row.professor_rating),
        semester: row.semester.clone(),
        semesters_offered: parse_semesters_offered(&row.semesters_offered),
        occurrence_data: parse_occurrence_data(&row.occurrence_data),
        requirements_satisfied: Vec::new(),
    })
}

/// Splits a compound code like "CPSC 350-03" into (subject, number, section).
///
/// Falls back to a whitespace/dash tokenizer when the primary pattern does
/// not match; two-token codes default to section "01".
pub fn parse_class_code(class_code: &str) -> (String, String, String) {
    if let Some(caps) = CLASS_CODE_REGEX.captures(class_code) {
        return (caps[1].to_string(), caps[2].to_string(), caps[3].to_string());
    }

    let normalized = class_code.replace('-', " ");
    let parts: Vec<&str> = normalized.split_whitespace().collect();
    match parts.len() {
        n if n >= 3 => (
            parts[0].to_string(),
            parts[1].to_string(),
            parts[2].to_string(),
        ),
        2 => (parts[0].to_string(), parts[1].to_string(), "01".to_string()),
        _ => (class_code.to_string(), String::new(), String::new()),
    }
}

/// Parses a credits cell; ranged strings like "1-3" resolve to the upper
/// bound.
pub fn parse_credits(raw: &str) -> f64 {
    let raw = raw.trim();
    if raw.is_empty() {
        return 0.0;
    }
    if let Some((_, upper)) = raw.rsplit_once('-') {
        return upper.trim().parse().unwrap_or(0.0);
    }
    raw.parse().unwrap_or(0.0)
}

fn parse_professor_rating(raw: &str) -> Option<f64> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }
    raw.parse().ok()
}

fn parse_semesters_offered(raw: &str) -> Vec<String> {
    serde_json::from_str(raw).unwrap_or_default()
}

fn parse_occurrence_data(raw: &str) -> OccurrenceData {
    if raw.trim().is_empty() {
        return OccurrenceData::default();
    }
    serde_json::from_str(raw).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_class_code_standard() {
        assert_eq!(
            parse_class_code("CPSC 350-03"),
            ("CPSC".into(), "350".into(), "03".into())
        );
    }

    #[test]
    fn test_parse_class_code_letter_suffix() {
        assert_eq!(
            parse_class_code("BIOL 205L-01"),
            ("BIOL".into(), "205L".into(), "01".into())
        );
    }

    #[test]
    fn test_parse_class_code_two_tokens_defaults_section() {
        assert_eq!(
            parse_class_code("MATH 110"),
            ("MATH".into(), "110".into(), "01".into())
        );
    }

    #[test]
    fn test_parse_class_code_unparseable() {
        assert_eq!(
            parse_class_code("SEMINAR"),
            ("SEMINAR".into(), String::new(), String::new())
        );
    }

    #[test]
    fn test_parse_credits_ranged_takes_upper_bound() {
        assert_eq!(parse_credits("1-3"), 3.0);
        assert_eq!(parse_credits("3"), 3.0);
        assert_eq!(parse_credits(""), 0.0);
        assert_eq!(parse_credits("abc"), 0.0);
    }

    #[test]
    fn test_parse_occurrence_data_tolerates_garbage() {
        let occ = parse_occurrence_data("not json");
        assert_eq!(occ.starts, 0);
        assert!(occ.days_occurring.active_days().is_empty());

        let occ = parse_occurrence_data(
            r#"{"starts": 100, "ends": 200, "daysOccurring": {"M": [{"startTime": 540, "endTime": 590}]}}"#,
        );
        assert_eq!(occ.starts, 100);
        assert_eq!(occ.days_occurring.active_days(), vec!["M"]);
    }

    #[test]
    fn test_missing_csv_yields_empty_catalog() {
        let cache = CatalogCache::new("/nonexistent/classes.csv");
        assert!(cache.load_all().is_empty());
        assert_eq!(cache.stats().total_classes, 0);
        assert_eq!(cache.stats().avg_credits, 0.0);
    }

    #[test]
    fn test_duplicate_ids_collapse_first_wins() {
        use std::io::Write;

        let dir = std::env::temp_dir().join("classplan_cache_test");
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("dup.csv");
        let mut f = std::fs::File::create(&path).unwrap();
        writeln!(
            f,
            "class,title,credits,displayDays,displayTime,location,professor,professorRating,semester,semestersOffered,occurrenceData"
        )
        .unwrap();
        writeln!(f, "CPSC 350-01,Data Structures,3,MWF,,,Smith,4.2,spring2026,,").unwrap();
        writeln!(f, "CPSC 350-01,Duplicate Row,4,TuTh,,,Jones,,spring2026,,").unwrap();
        writeln!(f, ",Missing Code,3,,,,,,,,").unwrap();
        drop(f);

        let cache = CatalogCache::new(&path);
        let classes = cache.load_all();
        assert_eq!(classes.len(), 1);
        assert_eq!(classes[0].id, "CPSC-350-01");
        assert_eq!(classes[0].title, "Data Structures");
        assert_eq!(classes[0].credits, 3.0);
    }
}
