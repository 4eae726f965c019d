//! Schedule generation: candidate selection, prompt assembly, the oracle
//! call, and repair of the returned selection.
//!
//! Generation never raises past this module. Every failure becomes an
//! in-band outcome with an error string and an empty id list.

pub mod oracle;
pub mod prompt;
pub mod select;

use std::collections::{HashMap, HashSet};

use rand::seq::SliceRandom;
use rand::Rng;
use tracing::{info, warn};

use crate::catalog::{CatalogCache, ClassSection};
use crate::evaluation::{ParsedEvaluation, SchedulingPreferences};
use crate::requirements::{extract_user_requirements, ProgramCatalog};

pub use oracle::{OracleClient, OracleConfig, OracleError};

/// Result of one generation attempt.
#[derive(Debug, Clone)]
pub struct GenerationOutcome {
    pub class_ids: Vec<String>,
    pub error: Option<String>,
}

impl GenerationOutcome {
    fn failure(message: impl Into<String>) -> Self {
        Self {
            class_ids: Vec::new(),
            error: Some(message.into()),
        }
    }
}

/// Generates a conflict-free schedule for one user.
pub async fn generate_schedule(
    oracle: &OracleClient,
    programs: &ProgramCatalog,
    catalog: &CatalogCache,
    preferences: &SchedulingPreferences,
    evaluation: Option<&ParsedEvaluation>,
) -> GenerationOutcome {
    let all_classes = catalog.load_all();
    if all_classes.is_empty() {
        return GenerationOutcome::failure("No classes available");
    }

    let requirements = evaluation
        .map(extract_user_requirements)
        .unwrap_or_default();
    let program_name = evaluation.map(|e| e.program_name()).unwrap_or("");
    let is_graduate = evaluation.map(ParsedEvaluation::is_graduate).unwrap_or(false);
    let taken_codes = evaluation
        .map(ParsedEvaluation::taken_course_codes)
        .unwrap_or_default();

    info!(
        requirements = requirements.len(),
        taken = taken_codes.len(),
        is_graduate = is_graduate,
        program = %program_name,
        "Assembled generation context"
    );

    let candidates = select::select_candidates(
        &all_classes,
        &requirements,
        programs,
        &taken_codes,
        program_name,
        is_graduate,
    );

    // Hard preference: drop classes meeting on any avoided day, but relax
    // entirely rather than send an empty candidate list.
    let avoided = &preferences.days_to_avoid;
    let mut filtered: Vec<ClassSection> = if avoided.is_empty() {
        candidates.clone()
    } else {
        candidates
            .iter()
            .filter(|cls| !avoided.iter().any(|d| cls.display_days.contains(d.as_str())))
            .cloned()
            .collect()
    };
    if filtered.is_empty() {
        warn!("No candidates after day-preference filtering, relaxing constraints");
        filtered = candidates;
    }
    info!(candidates = filtered.len(), "Candidates ready for prompt");

    // ThreadRng is not Send; keep it scoped so the future stays Send
    // across the oracle await below.
    let session_id: u32 = {
        let mut rng = rand::thread_rng();
        filtered.shuffle(&mut rng);
        rng.gen_range(1000..=9999)
    };

    let user_prompt = prompt::build_prompt(preferences, &requirements, &filtered, session_id);
    let system_prompt = prompt::build_system_message(session_id);

    let prompt_chars = user_prompt.len();
    info!(session_id = session_id, chars = prompt_chars, "Built generation prompt");
    if prompt_chars > prompt::MAX_CHAR_BUDGET {
        warn!(
            chars = prompt_chars,
            budget = prompt::MAX_CHAR_BUDGET,
            "Prompt exceeds character budget"
        );
    }

    let content = match oracle.complete(&system_prompt, &user_prompt).await {
        Ok(content) => content,
        Err(e) => {
            warn!(error = %e, "Oracle call failed");
            return GenerationOutcome::failure(e.to_string());
        }
    };

    let selected_ids = match oracle::parse_class_ids(&content) {
        Ok(ids) => ids,
        Err(e) => {
            warn!(error = %e, "Oracle content did not parse");
            return GenerationOutcome::failure(e.to_string());
        }
    };
    info!(selected = selected_ids.len(), "Oracle selected classes");

    // Whitelist against candidates plus the full catalog; fabricated ids
    // are dropped.
    let candidate_ids: HashSet<&str> = filtered.iter().map(|c| c.id.as_str()).collect();
    let catalog_ids: HashSet<&str> = all_classes.iter().map(|c| c.id.as_str()).collect();

    let mut valid_ids = Vec::new();
    for id in selected_ids {
        if candidate_ids.contains(id.as_str()) || catalog_ids.contains(id.as_str()) {
            valid_ids.push(id);
        } else {
            warn!(class_id = %id, "Discarding unknown class id from oracle");
        }
    }

    if valid_ids.is_empty() {
        return GenerationOutcome::failure("Model returned no valid class IDs");
    }

    let valid_ids = remove_conflicts(valid_ids, &all_classes);
    if valid_ids.is_empty() {
        return GenerationOutcome::failure("No conflict-free classes remained after validation");
    }
    info!(classes = valid_ids.len(), "Generation complete");

    GenerationOutcome {
        class_ids: valid_ids,
        error: None,
    }
}

/// Greedy conflict removal: classes are kept in oracle order, each checked
/// against everything already kept.
fn remove_conflicts(class_ids: Vec<String>, all_classes: &[ClassSection]) -> Vec<String> {
    if class_ids.len() <= 1 {
        return class_ids;
    }

    let class_map: HashMap<&str, &ClassSection> =
        all_classes.iter().map(|c| (c.id.as_str(), c)).collect();

    let mut kept_ids = Vec::new();
    let mut kept_classes: Vec<&ClassSection> = Vec::new();

    for id in class_ids {
        let Some(candidate) = class_map.get(id.as_str()).copied() else {
            continue;
        };

        let conflicting = kept_classes
            .iter()
            .find(|selected| candidate.conflicts_with(selected));
        if let Some(selected) = conflicting {
            warn!(dropped = %id, kept = %selected.id, "Removing class due to time conflict");
            continue;
        }

        kept_ids.push(id);
        kept_classes.push(candidate);
    }

    kept_ids
}
