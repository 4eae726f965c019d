pub mod cache;
pub mod search;
pub mod types;
pub mod validate;

pub use cache::{CatalogCache, CatalogStats};
pub use search::{search, SearchFilters, DEFAULT_LIMIT, MAX_LIMIT};
pub use types::{minutes_to_time, ClassSection, DaysOccurring, OccurrenceData, TimeSlot};
pub use validate::{validate_schedule, ConflictInfo, ScheduleValidation};
