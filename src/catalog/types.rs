/// Types for the class catalog: meeting times, occurrence data, and sections.
use serde::{Deserialize, Serialize};

use crate::requirements::RequirementBadge;

/// The seven weekday codes, in display order.
pub const DAY_CODES: [&str; 7] = ["M", "Tu", "W", "Th", "F", "Sa", "Su"];

/// A single meeting time within a day, as minutes from midnight.
///
/// The interval is half-open: a slot ending at 600 does not overlap a slot
/// starting at 600.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeSlot {
    #[serde(rename = "startTime")]
    pub start_time: u32,
    #[serde(rename = "endTime")]
    pub end_time: u32,
}

impl TimeSlot {
    pub fn new(start_time: u32, end_time: u32) -> Self {
        Self {
            start_time,
            end_time,
        }
    }

    /// Checks whether this slot overlaps another.
    pub fn overlaps(&self, other: &TimeSlot) -> bool {
        self.start_time < other.end_time && self.end_time > other.start_time
    }
}

/// Time slots for each day of the week.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DaysOccurring {
    #[serde(rename = "M", default)]
    pub m: Vec<TimeSlot>,
    #[serde(rename = "Tu", default)]
    pub tu: Vec<TimeSlot>,
    #[serde(rename = "W", default)]
    pub w: Vec<TimeSlot>,
    #[serde(rename = "Th", default)]
    pub th: Vec<TimeSlot>,
    #[serde(rename = "F", default)]
    pub f: Vec<TimeSlot>,
    #[serde(rename = "Sa", default)]
    pub sa: Vec<TimeSlot>,
    #[serde(rename = "Su", default)]
    pub su: Vec<TimeSlot>,
}

impl DaysOccurring {
    /// Returns the slots for a given day code, or an empty slice for an
    /// unknown code.
    pub fn slots_for(&self, day: &str) -> &[TimeSlot] {
        match day {
            "M" => &self.m,
            "Tu" => &self.tu,
            "W" => &self.w,
            "Th" => &self.th,
            "F" => &self.f,
            "Sa" => &self.sa,
            "Su" => &self.su,
            _ => &[],
        }
    }

    /// Day codes that have at least one slot, in M..Su order.
    pub fn active_days(&self) -> Vec<&'static str> {
        DAY_CODES
            .iter()
            .copied()
            .filter(|day| !self.slots_for(day).is_empty())
            .collect()
    }
}

/// Full occurrence data for a class section: epoch bounds for the term plus
/// per-day meeting slots.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OccurrenceData {
    #[serde(default)]
    pub starts: i64,
    #[serde(default)]
    pub ends: i64,
    #[serde(rename = "daysOccurring", default)]
    pub days_occurring: DaysOccurring,
}

/// A single class section from the catalog (one offering, e.g. CPSC 350-03).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClassSection {
    /// Unique id derived from the compound code, e.g. "CPSC-350-03".
    pub id: String,
    /// Display code, e.g. "CPSC 350-03".
    pub code: String,
    pub subject: String,
    /// Course number; may carry a trailing letter (e.g. "350L").
    pub number: String,
    pub section: String,
    pub title: String,
    pub credits: f64,
    #[serde(rename = "displayDays")]
    pub display_days: String,
    #[serde(rename = "displayTime")]
    pub display_time: String,
    pub location: String,
    pub professor: String,
    #[serde(rename = "professorRating")]
    pub professor_rating: Option<f64>,
    pub semester: String,
    #[serde(rename = "semestersOffered")]
    pub semesters_offered: Vec<String>,
    #[serde(rename = "occurrenceData")]
    pub occurrence_data: OccurrenceData,
    #[serde(rename = "requirementsSatisfied", default)]
    pub requirements_satisfied: Vec<RequirementBadge>,
}

impl ClassSection {
    /// The "SUBJ NUM" course code without section, e.g. "CPSC 350".
    pub fn course_code(&self) -> String {
        format!("{} {}", self.subject, self.number)
    }

    /// Checks whether this class has a time conflict with another on any day.
    pub fn conflicts_with(&self, other: &ClassSection) -> bool {
        self.first_conflict_with(other).is_some()
    }

    /// Finds the first conflicting (day, own slot, other slot) pair, scanning
    /// days in M..Su order.
    pub fn first_conflict_with(
        &self,
        other: &ClassSection,
    ) -> Option<(&'static str, TimeSlot, TimeSlot)> {
        let mine = &self.occurrence_data.days_occurring;
        let theirs = &other.occurrence_data.days_occurring;

        for day in DAY_CODES {
            for my_slot in mine.slots_for(day) {
                for other_slot in theirs.slots_for(day) {
                    if my_slot.overlaps(other_slot) {
                        return Some((day, *my_slot, *other_slot));
                    }
                }
            }
        }

        None
    }
}

/// Converts minutes from midnight to a 12-hour time string like "10:30 AM".
pub fn minutes_to_time(minutes: u32) -> String {
    let mut hours = minutes / 60;
    let mins = minutes % 60;
    let period = if hours < 12 { "AM" } else { "PM" };
    if hours == 0 {
        hours = 12;
    } else if hours > 12 {
        hours -= 12;
    }
    format!("{}:{:02} {}", hours, mins, period)
}
