//! magam-core: deadline extraction, classification and progress tracking.

pub mod record;
pub mod extract;
pub mod dates;
pub mod classify;
pub mod checklist;
pub mod progress;
pub mod reminders;

pub use record::{AssignmentRecord, Difficulty, EventType, PriorityLevel};
pub use extract::{Extraction, Extractor, FieldValue, UNKNOWN, extract_assignment_info};
pub use dates::{days_until, deadline_to_utc, format_date_korean, parse_deadline_date};
pub use classify::{
    Analysis, analyze_assignment, calculate_priority, finalize, finalize_with_pin, priority_label,
    priority_score,
};
pub use checklist::{ChecklistItem, completed_count, seed, template};
pub use progress::{
    ProgressReport, WarningLevel, expected_progress, track_progress, working_days_until,
};
pub use reminders::{AlertKind, DeadlineAlert, deadline_alerts};
