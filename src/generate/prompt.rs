//! Prompt assembly for the completion oracle.

use serde_json::json;

use crate::catalog::ClassSection;
use crate::evaluation::SchedulingPreferences;
use crate::requirements::DegreeRequirement;

/// Soft character budget for the assembled prompt; exceeding it only logs a
/// warning.
pub const MAX_CHAR_BUDGET: usize = 100_000;

fn work_context(work_status: &str) -> &'static str {
    match work_status {
        "part_time" => "has a part-time job, so prefers a lighter schedule",
        "full_time" => "works full-time, needs evening/flexible classes and lighter load",
        "none" => "can focus fully on studies",
        _ => "can focus on studies",
    }
}

fn planning_context(planning_mode: &str) -> &'static str {
    match planning_mode {
        "upcoming_semester" => "planning just the next semester",
        "four_year_plan" => "building a 4-year graduation plan",
        "view_progress" => "reviewing progress and planning next steps",
        _ => "planning next semester",
    }
}

/// System message for the oracle; carries the session id so repeated runs
/// vary.
pub fn build_system_message(session_id: u32) -> String {
    format!(
        "You are a schedule builder API. Return only valid JSON with class_ids array. \
         This is session #{} - you MUST produce a DIFFERENT valid schedule than previous \
         sessions by randomly choosing between equally valid options.",
        session_id
    )
}

/// Builds the user prompt from preferences, requirements, and the shuffled
/// candidate list.
pub fn build_prompt(
    preferences: &SchedulingPreferences,
    requirements: &[DegreeRequirement],
    candidates: &[ClassSection],
    session_id: u32,
) -> String {
    let requirements_json: Vec<_> = requirements
        .iter()
        .map(|req| {
            json!({
                "type": req.requirement_type.as_str(),
                "label": req.label,
                "credits_needed": req.credits_needed,
            })
        })
        .collect();

    let candidates_json: Vec<_> = candidates
        .iter()
        .map(|cls| {
            let satisfies: Vec<&str> = cls
                .requirements_satisfied
                .iter()
                .map(|badge| badge.label.as_str())
                .collect();
            json!({
                "id": cls.id,
                "code": cls.code,
                "title": cls.title,
                "credits": cls.credits,
                "days": cls.display_days,
                "time": cls.display_time,
                "satisfies": satisfies,
            })
        })
        .collect();

    let days_avoided = if preferences.days_to_avoid.is_empty() {
        "None".to_string()
    } else {
        preferences.days_to_avoid.join(", ")
    };
    let min_credits = preferences.preferred_credits_min;
    let max_credits = preferences.preferred_credits_max;

    format!(
        r#"You are an expert academic schedule builder. Your task is to select classes for a student's upcoming semester.

CRITICAL RULES (MUST FOLLOW):
1. You MUST ONLY select classes from the "AVAILABLE CLASSES" list below - do not invent class IDs
2. You MUST check for TIME CONFLICTS - two classes CANNOT be on the same day at overlapping times
3. You MUST prioritize classes that satisfy the student's degree requirements
4. TOTAL CREDITS REQUIREMENT: The sum of credits MUST be at least {min_credits} and no more than {max_credits}
   - Calculate: Add up the "credits" field for each selected class
   - If total is below {min_credits}, you MUST add more classes
   - If total exceeds {max_credits}, you MUST remove classes
   - This is a HARD REQUIREMENT - do NOT return schedules outside this range

Student Profile:
- Planning Goal: {planning}
- Work Status: Student {work}
- Time Preference: {time_pref} classes preferred
- Days to Avoid: {days_avoided}
- Priority Focus: {priority}
- REQUIRED Total Credits: {min_credits}-{max_credits}

Student's Remaining Degree Requirements:
{requirements}

=== AVAILABLE CLASSES (Pre-filtered to match requirements) ===
These classes have been pre-filtered to only include courses relevant to the student's degree requirements.
The "satisfies" field shows which requirements each class fulfills.

{candidates}

=== END OF CLASS DATA ===

TIME CONFLICT CHECK:
Before selecting a class, verify it does not conflict with already selected classes:
- Parse the "days" field (e.g., "MWF" or "TuTh")
- Parse the "time" field (e.g., "10:00am - 10:50am")
- If two classes share any day AND their times overlap, they CONFLICT

SELECTION PROCESS:
1. Review the student's remaining degree requirements above
2. Select classes from the AVAILABLE CLASSES list that satisfy those requirements
3. The "satisfies" field tells you which requirements each class fulfills - prioritize classes with matches
4. If the requirements imply a graduate student (500+ level courses needed), ONLY select 500+ level courses
5. Select a diverse set of requirement-satisfying classes without time conflicts
6. IMPORTANT: Keep adding classes until total credits reach at least {min_credits}
7. VERIFY: Before returning, sum up all selected class credits and ensure total is between {min_credits}-{max_credits}
8. Prefer classes matching time preferences if possible

VARIETY (Session #{session_id}): This is generation session #{session_id}. You MUST produce a DIFFERENT schedule than previous sessions.
- When multiple sections of the same course exist, pick DIFFERENT section numbers each time
- When multiple equally valid electives exist, pick DIFFERENT ones each time
- Do NOT always pick the same combination - variety is required
- Consider the classes in the order listed - they have been randomized for you

Return ONLY a JSON object: {{"class_ids": ["SUBJ-NUM-SEC", ...]}}
The IDs must be formatted with dashes (e.g., "CPSC-350-01").

FINAL CHECK: Verify your selection has {min_credits}-{max_credits} total credits before responding."#,
        min_credits = min_credits,
        max_credits = max_credits,
        planning = planning_context(&preferences.planning_mode),
        work = work_context(&preferences.work_status),
        time_pref = preferences.preferred_time_of_day,
        days_avoided = days_avoided,
        priority = preferences.priority_focus,
        requirements = serde_json::to_string_pretty(&requirements_json).unwrap_or_default(),
        candidates = serde_json::to_string_pretty(&candidates_json).unwrap_or_default(),
        session_id = session_id,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::OccurrenceData;

    fn sample_class() -> ClassSection {
        ClassSection {
            id: "CPSC-350-01".to_string(),
            code: "CPSC 350-01".to_string(),
            subject: "CPSC".to_string(),
            number: "350".to_string(),
            section: "01".to_string(),
            title: "Data Structures".to_string(),
            credits: 3.0,
            display_days: "MWF".to_string(),
            display_time: "10:00am - 10:50am".to_string(),
            location: String::new(),
            professor: "Smith".to_string(),
            professor_rating: Some(4.2),
            semester: "spring2026".to_string(),
            semesters_offered: vec![],
            occurrence_data: OccurrenceData::default(),
            requirements_satisfied: vec![],
        }
    }

    #[test]
    fn test_prompt_carries_preferences_and_candidates() {
        let mut prefs = SchedulingPreferences::default();
        prefs.days_to_avoid = vec!["F".to_string()];
        prefs.work_status = "part_time".to_string();

        let prompt = build_prompt(&prefs, &[], &[sample_class()], 4242);

        assert!(prompt.contains("CPSC-350-01"));
        assert!(prompt.contains("Days to Avoid: F"));
        assert!(prompt.contains("has a part-time job"));
        assert!(prompt.contains("Session #4242"));
        assert!(prompt.contains(r#"{"class_ids": ["SUBJ-NUM-SEC", ...]}"#));
    }

    #[test]
    fn test_system_message_carries_session() {
        let message = build_system_message(1234);
        assert!(message.contains("session #1234"));
    }
}
